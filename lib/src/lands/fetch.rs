//! Land Step 4: fetch lands
use crate::builder::DeckBuilder;
use crate::constants;
use crate::deck::Role;
use crate::sampling::weighted_sample_without_replacement;

/// Add color-specific and generic fetches up to the configured count,
/// bounded by the global fetch cap. The landfall theme raises the cap by one,
/// applied at most once per build.
pub fn run(builder: &mut DeckBuilder) {
  if builder.themes.has_tag_containing("landfall") && !builder.landfall_fetch_bump_applied {
    builder.landfall_fetch_bump_applied = true;
    builder.dynamic_fetch_cap = constants::FETCH_LAND_MAX_CAP + 1;
    info!("fetch: landfall theme raises fetch cap to {}", builder.dynamic_fetch_cap);
  }
  let land_target = builder.land_target();
  let floor = builder.basic_floor_value();

  // Candidate order: color-specific for identity colors first, then generic
  let mut color_specific: Vec<String> = Vec::new();
  for color in builder.color_identity.colors() {
    for name in constants::color_fetch_lands(color) {
      if !color_specific.iter().any(|n| n == name)
        && !builder.library.contains(name)
        && builder.catalog.row_from_name(name).is_some()
      {
        color_specific.push(name.to_string());
      }
    }
  }
  let generic: Vec<String> = constants::GENERIC_FETCH_LANDS
    .iter()
    .filter(|n| !builder.library.contains(**n) && builder.catalog.row_from_name(n).is_some())
    .map(|n| n.to_string())
    .collect();
  if color_specific.is_empty() && generic.is_empty() {
    info!("fetch: no eligible fetch lands remaining");
    return;
  }

  let existing = crate::lands::count_existing_fetches(&builder.library);
  let remaining_slots = builder.dynamic_fetch_cap.saturating_sub(existing);
  let mut desired = builder.config.ideal_counts.fetch_lands.min(remaining_slots);
  if desired == 0 {
    info!("fetch: cap reached or desired zero; skipping");
    return;
  }

  // Free capacity by trimming basics when already at the land target
  let mut capacity = land_target.saturating_sub(builder.current_land_count());
  if capacity == 0 {
    let mut freed = 0;
    while freed < desired && builder.library.count_basic_lands() > floor {
      match builder.library.choose_basic_to_trim() {
        Some(name) if builder.library.decrement(&name) => freed += 1,
        _ => break,
      }
    }
    capacity = land_target.saturating_sub(builder.current_land_count());
  }
  desired = desired.min(capacity);
  if desired == 0 {
    info!("fetch: no capacity after trimming; skipping");
    return;
  }

  // Sample color-specific before generic
  let mut chosen: Vec<String> = Vec::new();
  let pool: Vec<(String, f64)> = color_specific.iter().map(|n| (n.clone(), 1.0)).collect();
  chosen.extend(weighted_sample_without_replacement(
    &mut builder.rng,
    &pool,
    desired as usize,
  ));
  if chosen.len() < desired as usize {
    let pool: Vec<(String, f64)> = generic.iter().map(|n| (n.clone(), 1.0)).collect();
    chosen.extend(weighted_sample_without_replacement(
      &mut builder.rng,
      &pool,
      desired as usize - chosen.len(),
    ));
  }

  let generic_set: Vec<&str> = constants::GENERIC_FETCH_LANDS.to_vec();
  let mut added = 0;
  for name in chosen {
    if builder.current_land_count() >= land_target {
      break;
    }
    let sub_role = if generic_set.contains(&name.as_str()) { "generic" } else { "color-specific" };
    if builder.add_card(&name, Role::Fetch, Some(sub_role), "lands_step4", None, None) {
      added += 1;
    }
  }
  builder.library.enforce_land_cap(land_target, floor);
  info!("fetch: added {} (cap {}); lands {}/{}", added, builder.dynamic_fetch_cap, builder.current_land_count(), land_target);
}

#[cfg(test)]
mod tests {
  use crate::builder::DeckBuilder;
  use crate::constants;
  use crate::testutil;

  fn fetch_count(builder: &DeckBuilder) -> u32 {
    crate::lands::count_existing_fetches(&builder.library)
  }

  #[test]
  fn adds_configured_number_of_fetches() {
    let catalog = testutil::fixture_catalog();
    let mut builder = DeckBuilder::new(&catalog, testutil::krenko_config()).unwrap();
    crate::lands::basics::run(&mut builder);
    super::run(&mut builder);
    assert_eq!(fetch_count(&builder), 3);
  }

  #[test]
  fn fetch_cap_is_respected() {
    let catalog = testutil::fixture_catalog();
    let mut config = testutil::krenko_config();
    config.ideal_counts.fetch_lands = 20;
    let mut builder = DeckBuilder::new(&catalog, config).unwrap();
    crate::lands::basics::run(&mut builder);
    super::run(&mut builder);
    assert!(fetch_count(&builder) <= constants::FETCH_LAND_MAX_CAP);
  }

  #[test]
  fn color_specific_preferred_over_generic() {
    let catalog = testutil::fixture_catalog();
    let mut builder = DeckBuilder::new(&catalog, testutil::krenko_config()).unwrap();
    crate::lands::basics::run(&mut builder);
    super::run(&mut builder);
    let generic_in: usize = constants::GENERIC_FETCH_LANDS
      .iter()
      .filter(|n| builder.library.contains(**n))
      .count();
    // three red-producing fetches exist in the fixture, so generics stay out
    assert_eq!(generic_in, 0);
  }

  #[test]
  fn zero_request_skips() {
    let catalog = testutil::fixture_catalog();
    let mut config = testutil::krenko_config();
    config.ideal_counts.fetch_lands = 0;
    let mut builder = DeckBuilder::new(&catalog, config).unwrap();
    crate::lands::basics::run(&mut builder);
    super::run(&mut builder);
    assert_eq!(fetch_count(&builder), 0);
  }
}

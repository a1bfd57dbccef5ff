//! Land Step 2: staple nonbasic lands
use crate::builder::DeckBuilder;
use crate::constants::STAPLE_LAND_CONDITIONS;
use crate::deck::Role;

/// Conditional staple inclusions from the fixed table. Conditions see all
/// commander tags (not just selected), the color identity, and commander
/// power. Capacity is freed by trimming basics above the floor.
pub fn run(builder: &mut DeckBuilder) {
  let tags = builder.all_known_tags();
  let colors = builder.color_identity;
  let power = builder.commander().numeric_power();
  let land_target = builder.land_target();
  let floor = builder.basic_floor_value();

  let mut added: Vec<&str> = Vec::new();
  for (name, condition) in &STAPLE_LAND_CONDITIONS {
    if builder.library.contains(name) {
      continue;
    }
    if !condition(&tags, colors, power) {
      continue;
    }
    if !builder.library.free_land_slot(land_target, floor) {
      info!("staples: cannot free capacity without violating basic floor; stopping");
      break;
    }
    if builder.add_card(name, Role::Staple, Some("generic-staple"), "lands_step2", None, None) {
      added.push(name);
    }
  }
  builder.library.enforce_land_cap(land_target, floor);
  info!(
    "staples: added {:?}; lands {}/{}",
    added,
    builder.current_land_count(),
    land_target
  );
}

#[cfg(test)]
mod tests {
  use crate::builder::DeckBuilder;
  use crate::testutil;

  #[test]
  fn mono_red_staples() {
    let catalog = testutil::fixture_catalog();
    let mut builder = DeckBuilder::new(&catalog, testutil::krenko_config()).unwrap();
    crate::lands::basics::run(&mut builder);
    super::run(&mut builder);
    // always
    assert!(builder.library.contains("Reliquary Tower"));
    // no landfall tag
    assert!(builder.library.contains("Ash Barrens"));
    // <= 2 colors
    assert!(builder.library.contains("War Room"));
    // multi-color only
    assert!(!builder.library.contains("Command Tower"));
    assert!(!builder.library.contains("Exotic Orchard"));
    // Krenko's power is 3
    assert!(!builder.library.contains("Rogue's Passage"));
  }

  #[test]
  fn staples_trim_basics_when_full() {
    let catalog = testutil::fixture_catalog();
    let mut config = testutil::krenko_config();
    config.ideal_counts.lands = 20;
    config.ideal_counts.basic_lands = 15;
    let mut builder = DeckBuilder::new(&catalog, config).unwrap();
    crate::lands::basics::run(&mut builder);
    assert_eq!(builder.current_land_count(), 20);
    super::run(&mut builder);
    // staples went in by trimming basics down toward the floor of 14
    assert!(builder.library.contains("Reliquary Tower"));
    assert_eq!(builder.current_land_count(), 20);
    assert!(builder.library.count_basic_lands() >= 14);
  }
}

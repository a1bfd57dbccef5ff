//! Land Step 7: misc / utility lands, plus tag-driven suggestions
use crate::builder::{DeckBuilder, LandSuggestion};
use crate::card::ManaColor;
use crate::constants;
use crate::deck::Role;
use crate::sampling::{uniform, weighted_sample_without_replacement};

/// Fill remaining land capacity from the ranked utility pool with weighted
/// sampling: color-fixers doubled, theme matches boosted, mono-color rainbow
/// lands excluded, fetches skipped entirely (Step 4 owns them).
pub fn run(builder: &mut DeckBuilder) {
  let land_target = builder.land_target();
  let floor = builder.basic_floor_value();
  let desired_initial = land_target.saturating_sub(builder.current_land_count());
  if desired_initial == 0 && builder.library.count_basic_lands() <= floor {
    info!("misc lands: no remaining land capacity; skipping");
    apply_suggestions(builder);
    return;
  }

  // Candidates ranked by popularity, then trimmed to a rolled keep-percent
  let basics = constants::basic_land_names();
  let mut candidates: Vec<usize> = crate::lands::available_land_rows(builder)
    .into_iter()
    .filter(|r| !basics.contains(builder.card(*r).name.as_str()))
    .collect();
  candidates.sort_by(|a, b| {
    let ca = builder.card(*a);
    let cb = builder.card(*b);
    ca.rank_or_max().cmp(&cb.rank_or_max()).then_with(|| ca.name.cmp(&cb.name))
  });
  let keep_pct = uniform(
    &mut builder.rng,
    constants::MISC_LAND_EDHREC_KEEP_PERCENT_MIN,
    constants::MISC_LAND_EDHREC_KEEP_PERCENT_MAX,
  );
  if keep_pct < 1.0 && !candidates.is_empty() {
    let keep = ((candidates.len() as f64 * keep_pct) as usize).max(1);
    candidates.truncate(keep);
  }
  if candidates.is_empty() {
    info!("misc lands: no remaining candidate lands");
    apply_suggestions(builder);
    return;
  }

  let mono = builder.color_identity.len() <= 1;
  let kindred_deck = builder.themes.has_kindred();
  let fetches = constants::all_fetch_land_names();
  let mut weighted: Vec<(String, f64)> = Vec::new();
  for row in candidates {
    let card = builder.card(row);
    let name = card.name.as_str();
    let tline = card.type_line.to_lowercase();
    let text = &card.text;
    let keep_always = constants::MONO_COLOR_MISC_LAND_KEEP_ALWAYS.contains(&name);
    let kindred_land = constants::KINDRED_LAND_NAMES.contains(&name);
    if name == "The World Tree" && !builder.color_identity.is_five_color() {
      continue;
    }
    if fetches.contains(name) {
      continue;
    }
    if mono && !keep_always && !kindred_land {
      if constants::MONO_COLOR_MISC_LAND_EXCLUDE.contains(&name) {
        continue;
      }
      let rainbow = constants::ANY_COLOR_MANA_PHRASES
        .iter()
        .chain(constants::MONO_COLOR_RAINBOW_TEXT_EXTRA.iter())
        .any(|p| text.contains(p));
      if rainbow {
        continue;
      }
    }
    let mut weight = 1.0;
    if crate::lands::is_color_fixing_land(&tline, text) {
      weight *= constants::MISC_LAND_COLOR_FIX_PRIORITY_WEIGHT;
    }
    if kindred_land && !kindred_deck && !keep_always {
      weight *= constants::MISC_LAND_KINDRED_OFF_THEME_FACTOR;
    }
    if name == "Yavimaya, Cradle of Growth" && !builder.color_identity.contains(ManaColor::Green) {
      weight *= 0.25;
    }
    if name == "Urborg, Tomb of Yawgmoth" && !builder.color_identity.contains(ManaColor::Black) {
      weight *= 0.25;
    }
    let matches = card.matched_tag_count(&builder.themes.selected);
    if matches > 0 {
      let mult = (constants::MISC_LAND_THEME_MATCH_BASE
        + (matches.saturating_sub(1)) as f64 * constants::MISC_LAND_THEME_MATCH_PER_EXTRA)
        .min(constants::MISC_LAND_THEME_MATCH_CAP);
      weight *= mult;
    }
    weight *= builder.owned_weight(name);
    weighted.push((card.name.clone(), weight));
  }

  // Trim basics if the target is already met but we still want utility slots
  let mut desired = desired_initial;
  if builder.current_land_count() >= land_target && desired > 0 {
    let mut freed = 0;
    while freed < desired && builder.library.count_basic_lands() > floor {
      match builder.library.choose_basic_to_trim() {
        Some(name) if builder.library.decrement(&name) => freed += 1,
        _ => break,
      }
    }
  }
  desired = desired
    .min(land_target.saturating_sub(builder.current_land_count()))
    .min(weighted.len() as u32);
  if desired > 0 {
    let chosen = weighted_sample_without_replacement(&mut builder.rng, &weighted, desired as usize);
    let mut added = 0;
    for name in chosen {
      if builder.current_land_count() >= land_target {
        break;
      }
      if builder.add_card(&name, Role::Utility, Some("misc"), "lands_step7", None, None) {
        added += 1;
      }
    }
    info!("misc lands: added {}; lands {}/{}", added, builder.current_land_count(), land_target);
  }
  builder.library.enforce_land_cap(land_target, floor);
  apply_suggestions(builder);
}

/// Tag-driven suggestions applied after the misc pass when slots remain (or
/// a basic above the floor can make room)
fn build_suggestions(builder: &DeckBuilder) -> Vec<LandSuggestion> {
  let tags = &builder.themes.selected;
  let has = |keys: &[&str]| tags.iter().any(|t| keys.iter().any(|k| t.contains(k)));
  let mut out = Vec::new();
  let mut push = |name: &str, reason: &str, flex: bool, min_artifacts: Option<u32>| {
    if !builder.library.contains(name) {
      out.push(LandSuggestion {
        name: name.to_string(),
        reason: reason.to_string(),
        flex,
        min_artifacts,
      });
    }
  };
  if has(&["+1/+1 counters", "counters matter"]) {
    push("Gavony Township", "+1/+1 counters support", true, None);
  }
  if has(&["token", "tokens", "wide"]) {
    push("Castle Ardenvale", "token strategy support", true, None);
  }
  if has(&["graveyard", "recursion", "reanimator"]) {
    push("Boseiju, Who Endures", "graveyard interaction / utility", false, None);
    push("Takenuma, Abandoned Mire", "recursion utility", true, None);
  }
  if has(&["artifact"]) {
    push("Inventors' Fair", "artifact payoff", true, Some(10));
  }
  out
}

fn apply_suggestions(builder: &mut DeckBuilder) {
  let suggestions = build_suggestions(builder);
  if suggestions.is_empty() {
    return;
  }
  let land_target = builder.land_target();
  let floor = builder.basic_floor_value();
  for suggestion in suggestions {
    if builder.library.contains(&suggestion.name) {
      continue;
    }
    if let Some(min_artifacts) = suggestion.min_artifacts {
      let artifacts = builder
        .library
        .iter_ordered()
        .filter(|(_, e)| e.card_type.to_lowercase().contains("artifact"))
        .map(|(_, e)| e.count)
        .sum::<u32>();
      if artifacts < min_artifacts {
        builder.suggested_lands.push(suggestion);
        continue;
      }
    }
    if !builder.library.free_land_slot(land_target, floor) {
      builder.suggested_lands.push(suggestion);
      continue;
    }
    let role = if suggestion.flex { Role::Flex } else { Role::Utility };
    if builder.add_card(
      &suggestion.name,
      role,
      Some("tag-suggested"),
      "tag_suggestion",
      Some(suggestion.reason.clone()),
      None,
    ) {
      info!("tag suggestion: added {} ({})", suggestion.name, suggestion.reason);
    }
  }
}

//! Land Step 8: ETB-tapped minimization
use crate::builder::DeckBuilder;
use crate::constants;
use crate::deck::Role;

/// Count tapped/conditional lands against the bracket threshold; when over,
/// swap the worst offenders (penalty >= the swap minimum) for the
/// best-scoring untapped replacements, falling back to basics.
pub fn run(builder: &mut DeckBuilder) {
  let threshold = constants::tapped_land_threshold(builder.config.bracket_level);
  let land_target = builder.land_target();
  let floor = builder.basic_floor_value();

  // Classify current lands
  let mut tapped_info: Vec<(String, i32)> = Vec::new();
  for (name, entry) in builder.library.iter_ordered() {
    if !entry.is_land() {
      continue;
    }
    let card = match builder.catalog.card_from_name(name) {
      Some(c) => c,
      None => continue,
    };
    let (tapped, penalty) =
      crate::lands::tapped_land_penalty(&card.type_line.to_lowercase(), &card.text);
    if tapped {
      tapped_info.push((name.clone(), penalty));
    }
  }
  let total_tapped = tapped_info.len() as u32;
  if total_tapped <= threshold {
    info!("tapped optimization: {} tapped lands (threshold {}); no changes", total_tapped, threshold);
    return;
  }

  let mut over = total_tapped - threshold;
  tapped_info.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
  let to_consider: Vec<(String, i32)> = tapped_info
    .into_iter()
    .filter(|(_, p)| *p >= constants::TAPPED_LAND_SWAP_MIN_PENALTY)
    .collect();
  if to_consider.is_empty() {
    builder.warn(format!(
      "tapped optimization: over threshold ({} > {}) but no suitable swaps",
      total_tapped, threshold
    ));
    return;
  }

  // Replacement candidates: untapped (or conditionally untapped) lands that
  // produce an identity color, best replacement score first
  let identity = builder.color_identity;
  let mut replacements: Vec<(String, i32)> = Vec::new();
  for row in crate::lands::available_land_rows(builder) {
    let card = builder.card(row);
    let tline = card.type_line.to_lowercase();
    let text = &card.text;
    if text.contains(constants::TAPPED_LAND_PHRASE)
      && !text.contains(constants::SHOCK_LIKE_PHRASE)
      && !text.contains("unless you control")
    {
      continue;
    }
    let produces_symbol = constants::COLORED_MANA_SYMBOLS.iter().any(|s| text.contains(s));
    let typed = crate::lands::basic_types_in(&tline);
    let typed_in_identity = typed.iter().any(|c| identity.contains(*c));
    if !produces_symbol && !typed_in_identity {
      continue;
    }
    let score = crate::lands::replacement_land_score(&card.name, &tline, text);
    replacements.push((card.name.clone(), score));
  }
  replacements.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

  let fetches = constants::all_fetch_land_names();
  let mut replacement_idx = 0;
  let mut swaps: Vec<(String, String)> = Vec::new();
  for (name, _penalty) in to_consider {
    if over == 0 {
      break;
    }
    if !builder.library.decrement(&name) {
      continue;
    }
    let mut pick: Option<String> = None;
    while replacement_idx < replacements.len() {
      let candidate = replacements[replacement_idx].0.clone();
      replacement_idx += 1;
      if fetches.contains(candidate.as_str())
        && crate::lands::count_existing_fetches(&builder.library) >= builder.dynamic_fetch_cap
      {
        continue;
      }
      pick = Some(candidate);
      break;
    }
    match pick {
      Some(replacement) => {
        builder.add_card(
          &replacement,
          Role::Optimized,
          Some("swap-in"),
          "lands_step8",
          Some("tapped_optimization".to_string()),
          None,
        );
        swaps.push((name, replacement));
      }
      None => {
        // no nonbasic left: take the least-stocked identity basic
        let basic = identity
          .colors()
          .into_iter()
          .map(|c| c.basic_land().to_string())
          .min_by_key(|b| builder.library.get(b).map(|e| e.count).unwrap_or(0))
          .unwrap_or_else(|| "Wastes".to_string());
        builder.add_basic(&basic, 1, false, "lands_step8");
        swaps.push((name, basic));
      }
    }
    over -= 1;
  }
  builder.library.enforce_land_cap(land_target, floor);
  if swaps.is_empty() {
    builder.warn(format!(
      "tapped optimization: could not perform swaps; {} over threshold {}",
      total_tapped, threshold
    ));
  } else {
    info!("tapped optimization: {} swaps (threshold {})", swaps.len(), threshold);
    for (old, new) in &swaps {
      debug!("  replaced {} -> {}", old, new);
    }
  }
}

#[cfg(test)]
mod tests {
  use crate::builder::DeckBuilder;
  use crate::catalog::Catalog;
  use crate::testutil::{card, tagged};

  /// Catalog with many taplands so the threshold trips at cEDH bracket
  fn tapland_catalog() -> Catalog {
    let mut cards = Vec::new();
    let mut commander = tagged(
      card("Krenko, Mob Boss", "Legendary Creature — Goblin Warrior", "R"),
      &["Goblin Kindred"],
    );
    commander.edhrec_rank = Some(100);
    cards.push(commander);
    cards.push(card("Mountain", "Basic Land — Mountain", "R"));
    for i in 0..10 {
      let mut c = card(&format!("Slowpeak {}", i + 1), "Land", "");
      c.text = "slowpeak enters the battlefield tapped. {t}: add {r}.".to_string();
      c.edhrec_rank = Some(100 + i);
      cards.push(c);
    }
    for i in 0..10 {
      let mut c = card(&format!("Quickforge {}", i + 1), "Land", "");
      c.text = "{t}: add {r}.".to_string();
      c.edhrec_rank = Some(50 + i);
      cards.push(c);
    }
    Catalog::from_cards(cards)
  }

  #[test]
  fn swaps_reduce_tapped_count_to_threshold() {
    let catalog = tapland_catalog();
    let mut config = crate::testutil::krenko_config();
    config.themes = vec!["Goblin Kindred".to_string()];
    config.bracket_level = 5; // threshold 6
    config.ideal_counts.lands = 20;
    config.ideal_counts.basic_lands = 8;
    let mut builder = DeckBuilder::new(&catalog, config).unwrap();
    crate::lands::basics::run(&mut builder);
    // Force all ten taplands in
    for i in 0..10 {
      builder.add_card(
        &format!("Slowpeak {}", i + 1),
        crate::deck::Role::Utility,
        Some("misc"),
        "lands_step7",
        None,
        None,
      );
    }
    super::run(&mut builder);
    let tapped = builder
      .library
      .iter_ordered()
      .filter(|(n, e)| {
        e.is_land()
          && builder
            .catalog
            .card_from_name(n)
            .map(|c| c.text.contains("enters the battlefield tapped"))
            .unwrap_or(false)
      })
      .count();
    assert!(tapped <= 6, "still {} tapped lands", tapped);
    // swap-ins carry the optimized role
    assert!(builder
      .library
      .iter_ordered()
      .any(|(_, e)| e.role == crate::deck::Role::Optimized));
  }

  #[test]
  fn under_threshold_is_untouched() {
    let catalog = tapland_catalog();
    let mut config = crate::testutil::krenko_config();
    config.themes = vec!["Goblin Kindred".to_string()];
    config.bracket_level = 1; // threshold 14
    config.ideal_counts.lands = 20;
    config.ideal_counts.basic_lands = 8;
    let mut builder = DeckBuilder::new(&catalog, config).unwrap();
    crate::lands::basics::run(&mut builder);
    for i in 0..5 {
      builder.add_card(
        &format!("Slowpeak {}", i + 1),
        crate::deck::Role::Utility,
        Some("misc"),
        "lands_step7",
        None,
        None,
      );
    }
    let before: Vec<String> = builder.library.names().cloned().collect();
    super::run(&mut builder);
    let after: Vec<String> = builder.library.names().cloned().collect();
    assert_eq!(before, after);
  }
}

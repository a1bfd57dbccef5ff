//! # Post-spell color rebalance
//!
//! Compares colored pip demand from non-land spells to the colored sources
//! the mana base provides, swaps lands to close deficits, and redistributes
//! basics toward the pip distribution.
use crate::builder::DeckBuilder;
use crate::card::{colored_pip_weights, ColorSet, ManaColor};
use crate::catalog::Catalog;
use crate::constants;
use crate::deck::{DeckLibrary, Role};

/// Colors a library entry can produce on the battlefield
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceColors {
  pub colors: ColorSet,
  pub colorless: bool,
  /// Multi-faced card whose land face makes it count as a source
  pub dfc_land: bool,
}

/// Relative colored pip demand of the non-land spells, hybrid symbols split
/// evenly. Falls back to an even split over the identity when no colored
/// pips exist.
pub fn spell_pip_shares(library: &DeckLibrary, identity: ColorSet) -> [f64; 5] {
  let mut pips = [0.0f64; 5];
  for (_, entry) in library.iter_ordered() {
    if entry.is_land() {
      continue;
    }
    let per_card = colored_pip_weights(&entry.mana_cost);
    for i in 0..5 {
      pips[i] += per_card[i] * entry.count as f64;
    }
  }
  let total: f64 = pips.iter().sum();
  if total <= 0.0 {
    let colors = identity.colors();
    if colors.is_empty() {
      return [0.0; 5];
    }
    let share = 1.0 / colors.len() as f64;
    let mut out = [0.0; 5];
    for c in colors {
      out[c as usize] = share;
    }
    return out;
  }
  let mut out = [0.0; 5];
  for i in 0..5 {
    out[i] = pips[i] / total;
  }
  out
}

/// Which colors each library entry can produce. Lands infer from basic land
/// types and text; non-land permanents from "add" text; instants/sorceries
/// are never sources unless a face is a land. MDFC land backs count as
/// sources at full weight.
pub fn color_source_matrix(library: &DeckLibrary, catalog: &Catalog) -> Vec<(String, SourceColors)> {
  let mut matrix = Vec::new();
  for (name, entry) in library.iter_ordered() {
    let card = catalog.card_from_name(name);
    let entry_type = entry.card_type.to_lowercase();
    let row_type = card.map(|c| c.type_line.to_lowercase()).unwrap_or_default();
    let back_type = card.map(|c| c.back_type.to_lowercase()).unwrap_or_default();
    let dfc_land = card.map(|c| c.back_face_is_land()).unwrap_or(false);
    let is_land = entry_type.contains("land") || row_type.contains("land") || dfc_land;
    let text = card.map(|c| c.text.clone()).unwrap_or_default();

    if !is_land && (entry_type.contains("instant") || entry_type.contains("sorcery")) {
      continue;
    }
    let produces_from_text = constants::ANY_COLOR_MANA_PHRASES.iter().any(|p| text.contains(p))
      || (text.contains("add")
        && (constants::COLORED_MANA_SYMBOLS.iter().any(|s| text.contains(s))
          || text.contains("{c}")));
    if !is_land && !produces_from_text {
      continue;
    }

    let mut colors = ColorSet::new();
    let mut colorless = false;
    if is_land {
      let tline = format!("{} {}", entry_type, row_type);
      for c in crate::lands::basic_types_in(&tline) {
        colors.insert(c);
      }
      for c in crate::lands::basic_types_in(&back_type) {
        colors.insert(c);
      }
    }
    if constants::ANY_COLOR_MANA_PHRASES.iter().any(|p| text.contains(p)) {
      colors = ColorSet::all();
    }
    if text.contains("add") {
      for (i, sym) in constants::COLORED_MANA_SYMBOLS.iter().enumerate() {
        if text.contains(sym) {
          colors.insert(ManaColor::ALL[i]);
        }
      }
      if text.contains("{c}") {
        colorless = true;
      }
    }
    // Name fallback for exact basics (incl. snow) and Wastes
    if colors.is_empty() && is_land {
      let base = name.trim_start_matches("Snow-Covered ");
      match base {
        "Plains" => colors.insert(ManaColor::White),
        "Island" => colors.insert(ManaColor::Blue),
        "Swamp" => colors.insert(ManaColor::Black),
        "Mountain" => colors.insert(ManaColor::Red),
        "Forest" => colors.insert(ManaColor::Green),
        "Wastes" => colorless = true,
        _ => {}
      }
    }
    // MDFC back-face colors come from the card's identity
    if dfc_land && colors.is_empty() {
      if let Some(card) = card {
        colors = card.color_identity;
      }
    }
    if !colors.is_empty() || colorless || dfc_land {
      matrix.push((name.clone(), SourceColors { colors, colorless, dfc_land }));
    }
  }
  matrix
}

/// Colored source counts (copies included)
pub fn source_counts(library: &DeckLibrary, catalog: &Catalog) -> [u32; 5] {
  let mut counts = [0u32; 5];
  for (name, sources) in color_source_matrix(library, catalog) {
    let copies = library.get(&name).map(|e| e.count).unwrap_or(0);
    for c in sources.colors.colors() {
      counts[c as usize] += copies;
    }
  }
  counts
}

fn shares(counts: &[u32; 5]) -> [f64; 5] {
  let total: u32 = counts.iter().sum();
  let total = if total == 0 { 1 } else { total };
  let mut out = [0.0; 5];
  for i in 0..5 {
    out[i] = counts[i] as f64 / total as f64;
  }
  out
}

/// Pick a land to remove for a swap. Preference: flex lands producing no
/// deficit color, then the most overrepresented color's basic, then a
/// mono-color non-flex land producing no deficit color. Commander, locked
/// entries and kindred staples are never removed.
fn select_removal(
  builder: &DeckBuilder,
  deficit_colors: &ColorSet,
  overages: &[(ManaColor, f64)],
) -> Option<String> {
  let matrix = color_source_matrix(&builder.library, builder.catalog);
  let lookup: std::collections::HashMap<&str, &SourceColors> =
    matrix.iter().map(|(n, s)| (n.as_str(), s)).collect();
  let removable = |name: &str, entry: &crate::deck::DeckEntry| -> bool {
    !entry.is_commander()
      && !entry.is_locked()
      && !constants::KINDRED_LAND_NAMES.contains(&name)
      && entry.is_land()
  };
  // 1. flex lands
  for (name, entry) in builder.library.iter_ordered() {
    if entry.role == Role::Flex && removable(name, entry) {
      if let Some(sources) = lookup.get(name.as_str()) {
        if !sources.colors.colors().iter().any(|c| deficit_colors.contains(*c)) {
          return Some(name.clone());
        }
      }
    }
  }
  // 2. basic of the most overrepresented color
  if let Some((color, _)) = overages.first() {
    let basic = color.basic_land();
    if builder.library.contains(basic) {
      return Some(basic.to_string());
    }
  }
  // 3. mono-color non-flex land
  for (name, entry) in builder.library.iter_ordered() {
    if entry.role == Role::Flex || !removable(name, entry) {
      continue;
    }
    if let Some(sources) = lookup.get(name.as_str()) {
      let produced = sources.colors.len();
      if produced <= 1 && !sources.colors.colors().iter().any(|c| deficit_colors.contains(*c)) {
        return Some(name.clone());
      }
    }
  }
  None
}

/// Rank candidate lands producing the target color (best first)
fn addition_candidates(builder: &DeckBuilder, target: ManaColor) -> Vec<String> {
  let mut out: Vec<(String, i32)> = Vec::new();
  for row in builder.available_rows() {
    let card = builder.card(row);
    if !card.is_land() {
      continue;
    }
    let tline = card.type_line.to_lowercase();
    let text = &card.text;
    let typed = crate::lands::basic_types_in(&tline);
    let symbol = constants::COLORED_MANA_SYMBOLS[target as usize];
    let any_color = constants::ANY_COLOR_MANA_PHRASES.iter().any(|p| text.contains(p));
    let produces = typed.contains(&target) || text.contains(symbol) || any_color;
    if !produces {
      continue;
    }
    let mut score = 0;
    if any_color {
      score += 30;
    }
    score += typed.len() as i32 * 10;
    if text.contains(constants::TAPPED_LAND_PHRASE) && !text.contains(constants::SHOCK_LIKE_PHRASE)
    {
      score -= 5;
    }
    out.push((card.name.clone(), score));
  }
  out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
  out.into_iter().map(|(n, _)| n).collect()
}

/// Post-spell land adjustment and basic rebalance
pub fn run(builder: &mut DeckBuilder, perform_swaps: bool, rebalance_basics: bool) {
  let pip = spell_pip_shares(&builder.library, builder.color_identity);
  let mut counts = source_counts(&builder.library, builder.catalog);
  let mut source = shares(&counts);

  let mut deficits: Vec<(ManaColor, f64)> = ManaColor::ALL
    .iter()
    .copied()
    .filter_map(|c| {
      let gap = pip[c as usize] - source[c as usize];
      if gap > constants::COLOR_SHORTFALL_THRESHOLD && pip[c as usize] > 0.0 {
        Some((c, gap))
      } else {
        None
      }
    })
    .collect();
  deficits.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
  for c in &ManaColor::ALL {
    debug!(
      "color balance {}: pip {:.1}% source {:.1}%",
      c.letter(),
      pip[*c as usize] * 100.0,
      source[*c as usize] * 100.0
    );
  }

  if perform_swaps && !deficits.is_empty() {
    let mut swaps: Vec<(String, String, ManaColor)> = Vec::new();
    for (color, _gap) in deficits.clone() {
      if swaps.len() >= constants::COLOR_BALANCE_MAX_SWAPS {
        break;
      }
      let deficit_set = {
        let mut s = ColorSet::new();
        s.insert(color);
        s
      };
      let adds = addition_candidates(builder, color);
      let to_add = match adds.into_iter().find(|n| !builder.library.contains(n)) {
        Some(n) => n,
        None => continue,
      };
      let mut overages: Vec<(ManaColor, f64)> = ManaColor::ALL
        .iter()
        .copied()
        .filter_map(|c| {
          let over = source[c as usize] - pip[c as usize];
          if over > 0.0 {
            Some((c, over))
          } else {
            None
          }
        })
        .collect();
      overages.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
      let to_remove = match select_removal(builder, &deficit_set, &overages) {
        Some(n) => n,
        None => continue,
      };
      if !builder.library.decrement(&to_remove) {
        continue;
      }
      builder.add_card(&to_add, Role::ColorFix, Some("swap-add"), "color_balance", None, None);
      info!("color balance: [{}] replaced {} -> {}", color.letter(), to_remove, to_add);
      swaps.push((to_remove, to_add, color));
      counts = source_counts(&builder.library, builder.catalog);
      source = shares(&counts);
      if pip[color as usize] - source[color as usize] <= constants::COLOR_SHORTFALL_THRESHOLD {
        continue;
      }
    }
    if swaps.is_empty() {
      builder.warn("color balance: deficits present but no viable swap available".to_string());
    }
  } else if !deficits.is_empty() {
    info!("color balance: deficits present, swaps disabled");
  }

  // Basic redistribution toward pip shares runs whenever requested
  if rebalance_basics {
    let basics_present: Vec<(ManaColor, String, u32)> = ManaColor::ALL
      .iter()
      .copied()
      .filter_map(|c| {
        let name = c.basic_land().to_string();
        builder.library.get(&name).map(|e| (c, name, e.count))
      })
      .collect();
    let total_basics: u32 = basics_present.iter().map(|(_, _, n)| n).sum();
    if total_basics > 0 {
      let mut desired: Vec<(ManaColor, i64)> = basics_present
        .iter()
        .map(|(c, _, _)| (*c, (pip[*c as usize] * total_basics as f64).round() as i64))
        .collect();
      let mut drift = total_basics as i64 - desired.iter().map(|(_, n)| n).sum::<i64>();
      if drift != 0 {
        desired.sort_by(|a, b| {
          let pa = pip[a.0 as usize];
          let pb = pip[b.0 as usize];
          if drift > 0 {
            pb.partial_cmp(&pa).unwrap_or(std::cmp::Ordering::Equal)
          } else {
            pa.partial_cmp(&pb).unwrap_or(std::cmp::Ordering::Equal)
          }
        });
        let mut i = 0;
        while drift != 0 && !desired.is_empty() {
          let idx = i % desired.len();
          desired[idx].1 += if drift > 0 { 1 } else { -1 };
          drift += if drift > 0 { -1 } else { 1 };
          i += 1;
        }
      }
      for (color, target) in desired {
        let name = color.basic_land().to_string();
        let target = target.max(0) as u32;
        let current = builder.library.get(&name).map(|e| e.count).unwrap_or(0);
        if target > current {
          builder.add_basic(&name, target - current, false, "color_balance");
        } else {
          for _ in 0..(current - target) {
            builder.library.decrement(&name);
          }
        }
        if target != current {
          info!("basic rebalance: {} {} -> {}", name, current, target);
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use crate::builder::DeckBuilder;
  use crate::card::{ColorSet, ManaColor};
  use crate::catalog::Catalog;
  use crate::color_balance::*;
  use crate::deck::Role;
  use crate::testutil::{card, tagged};

  fn kess_catalog() -> Catalog {
    let mut cards = Vec::new();
    let mut commander = tagged(
      card("Kess, Dissident Mage", "Legendary Creature — Human Wizard", "U, B, R"),
      &["Spellslinger"],
    );
    commander.mana_cost_string = "{1}{U}{B}{R}".to_string();
    commander.edhrec_rank = Some(80);
    cards.push(commander);
    for basic in &["Island", "Swamp", "Mountain"] {
      let mut c = card(basic, &format!("Basic Land — {}", basic), "");
      c.text = "{t}: add mana.".to_string();
      cards.push(c);
    }
    let mut spire = card("Mystic Spire", "Land — Island", "");
    spire.text = "{t}: add {u}.".to_string();
    cards.push(spire);
    // blue-heavy spells
    for i in 0..6 {
      let mut c = card(&format!("Blue Rite {}", i + 1), "Instant", "U");
      c.mana_cost_string = "{U}{U}".to_string();
      c.mana_value = 2.0;
      cards.push(c);
    }
    Catalog::from_cards(cards)
  }

  fn kess_builder(catalog: &Catalog) -> DeckBuilder {
    let mut config = crate::testutil::krenko_config();
    config.commander = "Kess, Dissident Mage".to_string();
    config.themes = vec!["Spellslinger".to_string()];
    DeckBuilder::new(catalog, config).unwrap()
  }

  #[test]
  fn pip_shares_split_hybrids_and_fall_back_to_identity() {
    let catalog = kess_catalog();
    let builder = kess_builder(&catalog);
    // only the commander (a creature entry) is present: cost {1}{U}{B}{R}
    let shares = spell_pip_shares(&builder.library, builder.color_identity);
    assert!((shares[ManaColor::Blue as usize] - 1.0 / 3.0).abs() < 1e-9);
    // empty library falls back to even identity split
    let empty = crate::deck::DeckLibrary::new();
    let shares = spell_pip_shares(&empty, ColorSet::from_letters("U, B, R"));
    assert!((shares[ManaColor::Black as usize] - 1.0 / 3.0).abs() < 1e-9);
  }

  #[test]
  fn swap_closes_blue_deficit() {
    let catalog = kess_catalog();
    let mut builder = kess_builder(&catalog);
    // mana base skewed away from blue: 4 swamps, 4 mountains
    builder.add_basic("Swamp", 4, false, "lands_step1");
    builder.add_basic("Mountain", 4, false, "lands_step1");
    // blue-heavy spell demand
    for i in 0..6 {
      builder.add_card(
        &format!("Blue Rite {}", i + 1),
        Role::ThemeSpell,
        None,
        "spell_theme_fill",
        None,
        None,
      );
    }
    let before = source_counts(&builder.library, builder.catalog);
    assert_eq!(before[ManaColor::Blue as usize], 0);
    super::run(&mut builder, true, false);
    let after = source_counts(&builder.library, builder.catalog);
    assert!(after[ManaColor::Blue as usize] > 0, "no blue source added");
    assert!(builder.library.contains("Island") || builder.library.contains("Mystic Spire"));
    // a non-blue land was traded away for it
    assert_eq!(builder.library.land_count(), 8);
  }

  #[test]
  fn basic_redistribution_tracks_pips() {
    let catalog = kess_catalog();
    let mut builder = kess_builder(&catalog);
    builder.add_basic("Swamp", 6, false, "lands_step1");
    builder.add_basic("Island", 1, false, "lands_step1");
    builder.add_basic("Mountain", 1, false, "lands_step1");
    for i in 0..6 {
      builder.add_card(
        &format!("Blue Rite {}", i + 1),
        Role::ThemeSpell,
        None,
        "spell_theme_fill",
        None,
        None,
      );
    }
    super::run(&mut builder, false, true);
    let islands = builder.library.get("Island").map(|e| e.count).unwrap_or(0);
    let swamps = builder.library.get("Swamp").map(|e| e.count).unwrap_or(0);
    assert!(islands > swamps, "islands {} <= swamps {}", islands, swamps);
    // total basics preserved
    assert_eq!(builder.library.count_basic_lands(), 8);
  }

  #[test]
  fn mdfc_back_land_counts_as_source() {
    let mut cards = vec![tagged(
      card("Krenko, Mob Boss", "Legendary Creature — Goblin Warrior", "R"),
      &["Goblin Kindred"],
    )];
    let mut mdfc = card("Turntimber Symbiosis // Turntimber, Serpentine Wood", "Sorcery", "G");
    mdfc.layout = "modal_dfc".to_string();
    mdfc.back_type = "Land — Forest".to_string();
    cards.push(mdfc);
    let catalog = Catalog::from_cards(cards);
    let mut lib = crate::deck::DeckLibrary::new();
    lib.add(
      "Turntimber Symbiosis // Turntimber, Serpentine Wood",
      crate::deck::DeckEntry {
        count: 1,
        card_type: "Sorcery".to_string(),
        mana_cost: "{6}{G}".to_string(),
        mana_value: 7.0,
        creature_types: Vec::new(),
        tags: Vec::new(),
        role: Role::ThemeSpell,
        sub_role: None,
        added_by: "test".to_string(),
        trigger_tag: None,
        synergy: None,
        added_at: 0,
      },
    );
    let counts = source_counts(&lib, &catalog);
    assert_eq!(counts[ManaColor::Green as usize], 1);
  }
}

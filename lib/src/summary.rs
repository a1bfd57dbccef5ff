//! # Deck summary: type, curve, pip and mana-source breakdowns
use crate::card::ColorSet;
use crate::catalog::Catalog;
use crate::color_balance;
use crate::constants::CARD_TYPE_SORT_ORDER;
use crate::deck::DeckLibrary;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeBreakdown {
  pub counts: BTreeMap<String, u32>,
  pub order: Vec<String>,
  pub cards: BTreeMap<String, Vec<String>>,
  pub total: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManaCurve {
  pub buckets: BTreeMap<String, u32>,
  pub total_spells: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeckSummary {
  pub type_breakdown: TypeBreakdown,
  pub mana_curve: ManaCurve,
  /// Colored pip demand shares by color letter
  pub pip_distribution: BTreeMap<String, f64>,
  /// Colored mana sources by color letter (copies included)
  pub mana_generation: BTreeMap<String, u32>,
  pub colors: Vec<String>,
}

fn primary_type_of(entry_type: &str) -> String {
  let lower = entry_type.to_lowercase();
  for t in &CARD_TYPE_SORT_ORDER {
    if lower.contains(&t.to_lowercase()) {
      return t.to_string();
    }
  }
  "Other".to_string()
}

pub fn summarize(library: &DeckLibrary, identity: ColorSet, catalog: &Catalog) -> DeckSummary {
  let mut breakdown = TypeBreakdown::default();
  for (name, entry) in library.iter_ordered() {
    let t = primary_type_of(&entry.card_type);
    *breakdown.counts.entry(t.clone()).or_insert(0) += entry.count;
    breakdown.cards.entry(t).or_insert_with(Vec::new).push(name.clone());
    breakdown.total += entry.count;
  }
  breakdown.order = CARD_TYPE_SORT_ORDER
    .iter()
    .filter(|t| breakdown.counts.contains_key(**t))
    .map(|t| t.to_string())
    .collect();

  let mut curve = ManaCurve::default();
  for bucket in &["0", "1", "2", "3", "4", "5", "6+"] {
    curve.buckets.insert(bucket.to_string(), 0);
  }
  for (_, entry) in library.iter_ordered() {
    if entry.is_land() {
      continue;
    }
    let mv = entry.mana_value.max(0.0) as u32;
    let key = if mv >= 6 { "6+".to_string() } else { mv.to_string() };
    *curve.buckets.entry(key).or_insert(0) += entry.count;
    curve.total_spells += entry.count;
  }

  let pip = color_balance::spell_pip_shares(library, identity);
  let sources = color_balance::source_counts(library, catalog);
  let mut pip_distribution = BTreeMap::new();
  let mut mana_generation = BTreeMap::new();
  for color in &crate::card::ManaColor::ALL {
    pip_distribution.insert(color.letter().to_string(), pip[*color as usize]);
    mana_generation.insert(color.letter().to_string(), sources[*color as usize]);
  }

  DeckSummary {
    type_breakdown: breakdown,
    mana_curve: curve,
    pip_distribution,
    mana_generation,
    colors: identity.colors().iter().map(|c| c.letter().to_string()).collect(),
  }
}

#[cfg(test)]
mod tests {
  use crate::builder::DeckBuilder;
  use crate::compliance::PolicyStore;
  use crate::testutil;

  #[test]
  fn breakdown_counts_sum_to_deck_size() {
    let catalog = testutil::fixture_catalog();
    let result = DeckBuilder::new(&catalog, testutil::krenko_config())
      .unwrap()
      .run(&PolicyStore::fallback())
      .unwrap();
    let summary = &result.summary;
    let sum: u32 = summary.type_breakdown.counts.values().sum();
    assert_eq!(sum, 100);
    assert_eq!(summary.type_breakdown.total, 100);
    assert!(summary.type_breakdown.counts.contains_key("Land"));
    assert!(summary.type_breakdown.counts.contains_key("Creature"));
  }

  #[test]
  fn curve_excludes_lands() {
    let catalog = testutil::fixture_catalog();
    let result = DeckBuilder::new(&catalog, testutil::krenko_config())
      .unwrap()
      .run(&PolicyStore::fallback())
      .unwrap();
    let lands = result.summary.type_breakdown.counts["Land"];
    assert_eq!(result.summary.mana_curve.total_spells, 100 - lands);
  }

  #[test]
  fn mono_red_deck_is_all_red() {
    let catalog = testutil::fixture_catalog();
    let result = DeckBuilder::new(&catalog, testutil::krenko_config())
      .unwrap()
      .run(&PolicyStore::fallback())
      .unwrap();
    assert_eq!(result.summary.colors, vec!["R"]);
    let red_share = result.summary.pip_distribution["R"];
    assert!((red_share - 1.0).abs() < 1e-9);
    assert!(result.summary.mana_generation["R"] > 20);
    assert_eq!(result.summary.mana_generation["U"], 0);
  }

  #[test]
  fn order_follows_sort_table() {
    let catalog = testutil::fixture_catalog();
    let result = DeckBuilder::new(&catalog, testutil::krenko_config())
      .unwrap()
      .run(&PolicyStore::fallback())
      .unwrap();
    let order = &result.summary.type_breakdown.order;
    let creature_pos = order.iter().position(|t| t == "Creature").unwrap();
    let land_pos = order.iter().position(|t| t == "Land").unwrap();
    assert!(creature_pos < land_pos);
  }
}

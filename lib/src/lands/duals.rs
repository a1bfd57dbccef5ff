//! Land Step 5: two-color typed dual lands
use crate::builder::DeckBuilder;
use crate::card::ManaColor;
use crate::constants;
use crate::deck::Role;
use crate::sampling::weighted_shuffle;
use std::collections::BTreeMap;

fn rank(name: &str, text_lower: &str) -> i32 {
  let mut score = 0;
  if constants::SHOCK_LAND_NAMES.iter().any(|s| s.eq_ignore_ascii_case(name)) {
    score += 10;
  }
  if !text_lower.contains(constants::TAPPED_LAND_PHRASE) {
    score += 2;
  }
  if text_lower.contains("snow") {
    score += 1;
  }
  if text_lower.contains(constants::TAPPED_LAND_PHRASE) && text_lower.contains("you gain") {
    score -= 1;
  }
  score
}

/// Multi-color only: collect lands carrying exactly two basic land types
/// inside the identity, rank them, weighted-shuffle within each color-pair
/// bucket, then round-robin across pairs until the target is reached.
pub fn run(builder: &mut DeckBuilder) {
  if builder.color_identity.len() < 2 {
    debug!("duals: not multi-color; skipping");
    return;
  }
  let land_target = builder.land_target();
  let floor = builder.basic_floor_value();

  // Bucket candidates by color pair (alphabetical letter key)
  let mut buckets: BTreeMap<String, Vec<(String, f64)>> = BTreeMap::new();
  for row in crate::lands::available_land_rows(builder) {
    let card = builder.card(row);
    let tline = card.type_line.to_lowercase();
    let types = crate::lands::basic_types_in(&tline);
    if types.len() != 2 {
      continue;
    }
    if !types.iter().all(|c| builder.color_identity.contains(*c)) {
      continue;
    }
    let mut letters: Vec<char> = types.iter().map(|c| c.letter()).collect();
    letters.sort();
    let key: String = letters.into_iter().collect();
    let weight = (rank(&card.name, &card.text).max(1) + 1) as f64;
    buckets.entry(key).or_insert_with(Vec::new).push((card.name.clone(), weight));
  }
  if buckets.is_empty() {
    info!("duals: no candidate typed duals in pool");
    return;
  }

  // Weighted shuffle inside each bucket so better lands tend to go first
  let mut shuffled: BTreeMap<String, Vec<String>> = BTreeMap::new();
  for (key, mut pool) in buckets {
    pool.sort_by(|a, b| {
      b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(&b.0))
    });
    let order = weighted_shuffle(&mut builder.rng, &pool);
    shuffled.insert(key, order);
  }

  let mut desired = constants::DUAL_LAND_DEFAULT_COUNT;
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
    info!("duals: no capacity after trimming; skipping");
    return;
  }

  // Round-robin across pair buckets
  let keys: Vec<String> = shuffled.keys().cloned().collect();
  let mut indices: BTreeMap<String, usize> = keys.iter().map(|k| (k.clone(), 0)).collect();
  let mut chosen: Vec<(String, String)> = Vec::new();
  while (chosen.len() as u32) < desired {
    let mut progressed = false;
    for key in &keys {
      let idx = indices[key];
      let names = &shuffled[key];
      if idx >= names.len() {
        continue;
      }
      indices.insert(key.clone(), idx + 1);
      chosen.push((names[idx].clone(), key.clone()));
      progressed = true;
      if chosen.len() as u32 >= desired {
        break;
      }
    }
    if !progressed {
      break;
    }
  }

  let mut added = 0;
  for (name, pair) in chosen {
    if builder.current_land_count() >= land_target {
      break;
    }
    if builder.add_card(&name, Role::Dual, Some(&pair), "lands_step5", None, None) {
      added += 1;
    }
  }
  builder.library.enforce_land_cap(land_target, floor);
  info!("duals: added {}; lands {}/{}", added, builder.current_land_count(), land_target);
}

/// Maps a pair of colors to its alphabetical letter key, e.g. (U, R) -> "RU"
pub fn pair_key(a: ManaColor, b: ManaColor) -> String {
  let mut letters = vec![a.letter(), b.letter()];
  letters.sort();
  letters.into_iter().collect()
}

#[cfg(test)]
mod tests {
  use crate::builder::DeckBuilder;
  use crate::card::ManaColor;
  use crate::catalog::Catalog;
  use crate::testutil::{card, tagged};

  fn izzet_catalog() -> Catalog {
    let mut cards = Vec::new();
    let mut commander = tagged(
      card("Kess, Dissident Mage", "Legendary Creature — Human Wizard", "U, B, R"),
      &["Spellslinger"],
    );
    commander.edhrec_rank = Some(80);
    cards.push(commander);
    let mut steam = card("Steam Vents", "Land — Island Mountain", "");
    steam.text = "you may pay 2 life. otherwise it enters the battlefield tapped.".to_string();
    cards.push(steam);
    let mut sulfur = card("Sulfur Falls", "Land — Island Mountain", "");
    sulfur.text = "enters the battlefield tapped unless you control an island or a mountain.".to_string();
    cards.push(sulfur);
    let mut crypt = card("Blood Crypt", "Land — Swamp Mountain", "");
    crypt.text = "you may pay 2 life.".to_string();
    cards.push(crypt);
    let mut grave = card("Watery Grave", "Land — Island Swamp", "");
    grave.text = "you may pay 2 life.".to_string();
    cards.push(grave);
    let mut temple = card("Temple of Epiphany", "Land — Island Mountain", "");
    temple.text = "temple of epiphany enters the battlefield tapped. scry 1.".to_string();
    cards.push(temple);
    // off-identity dual must stay out
    let mut garden = card("Temple Garden", "Land — Forest Plains", "");
    garden.text = "you may pay 2 life.".to_string();
    cards.push(garden);
    Catalog::from_cards(cards)
  }

  fn kess_builder(catalog: &Catalog) -> DeckBuilder {
    let mut config = crate::testutil::krenko_config();
    config.commander = "Kess, Dissident Mage".to_string();
    config.themes = vec!["Spellslinger".to_string()];
    DeckBuilder::new(catalog, config).unwrap()
  }

  #[test]
  fn round_robin_covers_pairs_within_identity() {
    let catalog = izzet_catalog();
    let mut builder = kess_builder(&catalog);
    crate::lands::basics::run(&mut builder);
    super::run(&mut builder);
    let duals: Vec<String> = builder
      .library
      .iter_ordered()
      .filter(|(_, e)| e.role == crate::deck::Role::Dual)
      .map(|(n, _)| n.clone())
      .collect();
    assert_eq!(duals.len(), 4);
    assert!(!duals.contains(&"Temple Garden".to_string()));
    // pairs spread: all three UBR pair buckets are hit before repeats
    let pairs: std::collections::HashSet<String> = duals
      .iter()
      .map(|n| builder.library.get(n).unwrap().sub_role.clone().unwrap())
      .collect();
    assert!(pairs.len() >= 3);
  }

  #[test]
  fn mono_color_skips() {
    let catalog = crate::testutil::fixture_catalog();
    let mut builder =
      DeckBuilder::new(&catalog, crate::testutil::krenko_config()).unwrap();
    crate::lands::basics::run(&mut builder);
    super::run(&mut builder);
    let duals =
      builder.library.iter_ordered().filter(|(_, e)| e.role == crate::deck::Role::Dual).count();
    assert_eq!(duals, 0);
  }

  #[test]
  fn pair_key_is_alphabetical() {
    assert_eq!(super::pair_key(ManaColor::Blue, ManaColor::Red), "RU");
    assert_eq!(super::pair_key(ManaColor::Red, ManaColor::Blue), "RU");
  }
}

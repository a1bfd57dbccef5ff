//! Land Step 1: basic lands
use crate::builder::DeckBuilder;

/// Allocate basics: target ceil(1.3 x configured minimum) capped by the land
/// target, split evenly across identity colors (alphabetical letter order for
/// a deterministic remainder). Colorless commanders run on Wastes; snow
/// variants are used when any theme or commander tag mentions snow.
pub fn run(builder: &mut DeckBuilder) {
  let basic_min = builder.config.ideal_counts.basic_lands;
  let land_total = builder.land_target();
  let mut target = (1.3 * basic_min as f64).ceil() as u32;
  if target > land_total {
    target = land_total;
  }
  if target == 0 {
    info!("basics: target is zero; skipping");
    return;
  }

  let use_snow = builder
    .all_known_tags()
    .iter()
    .any(|t| t.contains("snow"));

  let colors = builder.color_identity.colors();
  if colors.is_empty() {
    builder.add_basic("Wastes", target, false, "lands_step1");
    info!("basics: {} Wastes (colorless identity)", target);
    return;
  }

  let mut sorted = colors.clone();
  sorted.sort_by_key(|c| c.letter());
  let n = sorted.len() as u32;
  let base = target / n;
  let rem = target % n;
  for (idx, color) in sorted.iter().enumerate() {
    let count = base + if (idx as u32) < rem { 1 } else { 0 };
    let name = if use_snow { color.snow_basic_land() } else { color.basic_land() };
    builder.add_basic(name, count, use_snow, "lands_step1");
  }
  info!(
    "basics: {} across {} colors (min {}, land target {})",
    target, n, basic_min, land_total
  );
}

#[cfg(test)]
mod tests {
  use crate::builder::DeckBuilder;
  use crate::testutil;

  #[test]
  fn mono_color_gets_all_mountains() {
    let catalog = testutil::fixture_catalog();
    let mut builder = DeckBuilder::new(&catalog, testutil::krenko_config()).unwrap();
    super::run(&mut builder);
    // ceil(1.3 * 15) = 20
    assert_eq!(builder.library.get("Mountain").unwrap().count, 20);
    assert_eq!(builder.library.count_basic_lands(), 20);
  }

  #[test]
  fn target_capped_by_land_total() {
    let catalog = testutil::fixture_catalog();
    let mut config = testutil::krenko_config();
    config.ideal_counts.lands = 10;
    config.ideal_counts.basic_lands = 15;
    let mut builder = DeckBuilder::new(&catalog, config).unwrap();
    super::run(&mut builder);
    assert_eq!(builder.library.count_basic_lands(), 10);
  }

  #[test]
  fn zero_lands_adds_nothing() {
    let catalog = testutil::fixture_catalog();
    let mut config = testutil::krenko_config();
    config.ideal_counts.lands = 0;
    let mut builder = DeckBuilder::new(&catalog, config).unwrap();
    super::run(&mut builder);
    assert_eq!(builder.library.land_count(), 0);
  }

  #[test]
  fn colorless_commander_runs_on_wastes() {
    let mut commander = testutil::tagged(
      testutil::card("Kozilek, Butcher of Truth", "Legendary Creature — Eldrazi", ""),
      &["Big Mana"],
    );
    commander.edhrec_rank = Some(300);
    let catalog = crate::catalog::Catalog::from_cards(vec![commander]);
    let mut config = testutil::krenko_config();
    config.commander = "Kozilek, Butcher of Truth".to_string();
    config.themes = vec!["Big Mana".to_string()];
    let mut builder = DeckBuilder::new(&catalog, config).unwrap();
    super::run(&mut builder);
    assert_eq!(builder.library.get("Wastes").unwrap().count, 20);
    assert!(!builder.library.contains("Mountain"));
  }

  #[test]
  fn snow_theme_uses_snow_basics() {
    let mut commander = testutil::tagged(
      testutil::card("Jorn, God of Winter", "Legendary Snow Creature — God", "G"),
      &["Snow Matters"],
    );
    commander.edhrec_rank = Some(250);
    let catalog = crate::catalog::Catalog::from_cards(vec![commander]);
    let mut config = testutil::krenko_config();
    config.commander = "Jorn, God of Winter".to_string();
    config.themes = vec!["Snow Matters".to_string()];
    let mut builder = DeckBuilder::new(&catalog, config).unwrap();
    super::run(&mut builder);
    assert!(builder.library.contains("Snow-Covered Forest"));
    assert!(!builder.library.contains("Forest"));
  }

  #[test]
  fn even_split_with_remainder_is_deterministic() {
    // two-color identity: letters sorted alphabetically get the remainder
    let mut commander = testutil::tagged(
      testutil::card("Wort, Boggart Auntie", "Legendary Creature — Goblin Shaman", "B, R"),
      &["Goblin Kindred"],
    );
    commander.edhrec_rank = Some(100);
    let catalog = crate::catalog::Catalog::from_cards(vec![commander]);
    let mut config = testutil::krenko_config();
    config.commander = "Wort, Boggart Auntie".to_string();
    config.themes = vec!["Goblin Kindred".to_string()];
    config.ideal_counts.basic_lands = 15;
    let mut builder = DeckBuilder::new(&catalog, config).unwrap();
    super::run(&mut builder);
    // 20 basics over B,R: B (alphabetically first) gets 10, R gets 10
    assert_eq!(builder.library.get("Swamp").unwrap().count, 10);
    assert_eq!(builder.library.get("Mountain").unwrap().count, 10);
  }
}

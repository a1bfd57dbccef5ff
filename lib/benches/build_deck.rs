#[macro_use]
extern crate criterion;
extern crate deckforge;

use criterion::Criterion;
use deckforge::card::{Card, ColorSet};
use deckforge::catalog::Catalog;
use deckforge::compliance::PolicyStore;
use deckforge::config::{BuildConfig, IdealCounts};
use deckforge::DeckBuilder;

fn card(name: &str, type_line: &str, identity: &str, tags: &[&str], rank: u32) -> Card {
  let mut c = Card::new();
  c.name = name.to_string();
  c.type_line = type_line.to_string();
  c.color_identity = ColorSet::from_letters(identity);
  c.theme_tags = tags.iter().map(|t| t.to_lowercase()).collect();
  c.edhrec_rank = Some(rank);
  c
}

fn bench_catalog() -> Catalog {
  let mut cards = Vec::new();
  let mut commander = card(
    "Krenko, Mob Boss",
    "Legendary Creature — Goblin Warrior",
    "R",
    &["Goblin Kindred", "Tokens Matter"],
    100,
  );
  commander.power = "3".to_string();
  cards.push(commander);
  let mut mountain = card("Mountain", "Basic Land — Mountain", "R", &[], 1);
  mountain.text = "{t}: add {r}.".to_string();
  cards.push(mountain);
  for i in 0..40 {
    let mut c = card(&format!("Utility Land {}", i), "Land", "", &[], 200 + i);
    c.text = "{t}: add {r}.".to_string();
    cards.push(c);
  }
  for i in 0..120 {
    let tags: &[&str] = match i % 4 {
      0 => &["Goblin Kindred"],
      1 => &["Tokens Matter"],
      2 => &["Goblin Kindred", "Tokens Matter"],
      _ => &["Aggro"],
    };
    let mut c = card(&format!("Goblin {}", i), "Creature — Goblin", "R", tags, 500 + i);
    c.mana_cost_string = "{1}{R}".to_string();
    c.mana_value = 2.0;
    cards.push(c);
  }
  for (i, tag) in ["Ramp", "Removal", "Board Wipe", "Card Advantage", "Protection"]
    .iter()
    .enumerate()
  {
    for j in 0..20 {
      let mut c = card(
        &format!("{} Spell {}", tag, j),
        "Sorcery",
        "R",
        &[tag],
        1000 + (i * 20 + j) as u32,
      );
      c.mana_cost_string = "{2}{R}".to_string();
      c.mana_value = 3.0;
      cards.push(c);
    }
  }
  Catalog::from_cards(cards)
}

fn bench_config(seed: u64) -> BuildConfig {
  let mut config = BuildConfig::default();
  config.commander = "Krenko, Mob Boss".to_string();
  config.themes = vec!["Goblin Kindred".to_string(), "Tokens Matter".to_string()];
  config.bracket_level = 3;
  config.seed = seed;
  config.ideal_counts = IdealCounts::default();
  config
}

fn full_build(c: &mut Criterion) {
  let catalog = bench_catalog();
  let policies = PolicyStore::fallback();
  let mut seed = 0u64;
  c.bench_function("full 100-card build", |b| {
    b.iter(|| {
      seed = seed.wrapping_add(1);
      DeckBuilder::new(&catalog, bench_config(seed))
        .expect("builder")
        .run(&policies)
        .expect("build")
    })
  });
}

criterion_group!(benches, full_build);
criterion_main!(benches);

//! # Synthetic catalog fixtures for tests
//!
//! A mono-red Krenko pool rich enough to drive a full 100-card build, plus
//! helpers for multi-color scenarios. Generated names keep the fixture small
//! while exercising every selection path.
use crate::card::{Card, ColorSet};
use crate::catalog::Catalog;
use crate::config::{BuildConfig, IdealCounts, TagMode};

pub fn card(name: &str, type_line: &str, identity: &str) -> Card {
  let mut c = Card::new();
  c.name = name.to_string();
  c.type_line = type_line.to_string();
  c.color_identity = ColorSet::from_letters(identity);
  c
}

pub fn tagged(mut c: Card, tags: &[&str]) -> Card {
  c.theme_tags = tags.iter().map(|t| t.to_lowercase()).collect();
  c
}

fn ranked(mut c: Card, rank: u32) -> Card {
  c.edhrec_rank = Some(rank);
  c
}

fn texted(mut c: Card, text: &str) -> Card {
  c.text = text.to_lowercase();
  c
}

pub fn fixture_catalog() -> Catalog {
  let mut cards: Vec<Card> = Vec::new();

  let mut krenko = tagged(
    card("Krenko, Mob Boss", "Legendary Creature — Goblin Warrior", "R"),
    &["Goblin Kindred", "Tokens Matter", "Aggro"],
  );
  krenko.mana_cost_string = "{2}{R}{R}".to_string();
  krenko.mana_value = 4.0;
  krenko.power = "3".to_string();
  krenko.toughness = "3".to_string();
  krenko.edhrec_rank = Some(120);
  cards.push(krenko);

  // A second commander for resolution/random tests
  let mut boss = tagged(
    card("Krenko, Tin Street Kingpin", "Legendary Creature — Goblin", "R"),
    &["Goblin Kindred", "Aggro"],
  );
  boss.edhrec_rank = Some(600);
  cards.push(boss);

  // Basics
  cards.push(ranked(texted(card("Mountain", "Basic Land — Mountain", "R"), "{t}: add {r}."), 1));
  cards.push(ranked(
    texted(card("Snow-Covered Mountain", "Basic Snow Land — Mountain", "R"), "{t}: add {r}."),
    500,
  ));
  cards.push(ranked(texted(card("Wastes", "Basic Land", ""), "{t}: add {c}."), 900));

  // Staple lands
  cards.push(ranked(
    texted(card("Reliquary Tower", "Land", ""), "you have no maximum hand size. {t}: add {c}."),
    40,
  ));
  cards.push(ranked(
    texted(card("Ash Barrens", "Land", ""), "{t}: add {c}. basic landcycling {1}"),
    90,
  ));
  cards.push(ranked(
    texted(card("War Room", "Land", ""), "{t}: add {c}. {3}, {t}, pay life: draw a card."),
    60,
  ));
  cards.push(ranked(
    texted(
      card("Rogue's Passage", "Land", ""),
      "{t}: add {c}. {4}, {t}: target creature can't be blocked this turn.",
    ),
    70,
  ));
  cards.push(ranked(
    texted(card("Command Tower", "Land", ""), "{t}: add one mana of any color in your commander's color identity."),
    5,
  ));
  cards.push(ranked(
    texted(card("Exotic Orchard", "Land", ""), "{t}: add one mana of any color that a land an opponent controls could produce."),
    30,
  ));

  // Kindred lands
  cards.push(ranked(
    texted(
      tagged(card("Path of Ancestry", "Land", ""), &["Kindred Support"]),
      "path of ancestry enters the battlefield tapped. {t}: add one mana of any color.",
    ),
    20,
  ));
  cards.push(ranked(
    texted(card("Cavern of Souls", "Land", ""), "choose a creature type. {t}: add one mana of any color."),
    15,
  ));
  cards.push(ranked(
    texted(card("Three Tree City", "Legendary Land", ""), "{t}: add {c}. choose a creature type."),
    80,
  ));
  cards.push(ranked(
    texted(card("Goblin Burrows", "Land", ""), "{t}: add {c}. {1}{r}, {t}: target goblin gets +2/+0."),
    300,
  ));
  cards.push(ranked(
    texted(card("Den of the Bugbear", "Land", ""), "if you control two or more other lands, den of the bugbear enters the battlefield tapped. {t}: add {r}. create a 1/1 red goblin creature token."),
    45,
  ));

  // Fetches
  for (name, rank) in &[
    ("Bloodstained Mire", 25u32),
    ("Wooded Foothills", 26),
    ("Scalding Tarn", 27),
    ("Arid Mesa", 28),
    ("Maestros Theater", 400),
    ("Riveteers Overlook", 401),
    ("Cabaretti Courtyard", 402),
  ] {
    cards.push(ranked(
      texted(card(name, "Land", ""), "{t}, pay 1 life, sacrifice: search your library for a mountain card."),
      *rank,
    ));
  }
  for (name, rank) in &[("Evolving Wilds", 35u32), ("Terramorphic Expanse", 36), ("Prismatic Vista", 37)] {
    cards.push(ranked(
      texted(card(name, "Land", ""), "{t}, sacrifice: search your library for a basic land card."),
      *rank,
    ));
  }

  // Utility lands, a mix of tapped and untapped
  for (name, text, rank) in &[
    ("Castle Embereth", "castle embereth enters the battlefield tapped unless you control a mountain. {t}: add {r}.", 110u32),
    ("Great Furnace", "{t}: add {r}.", 150),
    ("Hanweir Battlements", "{t}: add {c}. {r}, {t}: target creature gains haste.", 130),
    ("Dwarven Mine", "dwarven mine enters the battlefield tapped unless you control three or more other mountains. {t}: add {r}.", 210),
    ("Forgotten Cave", "forgotten cave enters the battlefield tapped. cycling {r}. {t}: add {r}.", 380),
    ("Smoldering Crater", "smoldering crater enters the battlefield tapped. cycling {2}. {t}: add {r}.", 640),
    ("Barren Moor Annex", "barren moor annex enters the battlefield tapped. {t}: add {r}.", 700),
    ("Rustvale Bridge", "rustvale bridge enters the battlefield tapped. indestructible. {t}: add {r}.", 520),
    ("Sokenzan, Crucible of Defiance", "{t}: add {r}. channel", 95),
    ("Mishra's Foundry", "{t}: add {c}. becomes an artifact creature.", 240),
    ("Buried Ruin", "{t}: add {c}. return target artifact card from your graveyard.", 260),
    ("Myriad Landscape Annex", "enters the battlefield tapped. {t}, sacrifice: add two mana of any one color.", 720),
  ] {
    cards.push(ranked(texted(card(name, "Land", ""), text), *rank));
  }
  cards.push(ranked(
    texted(
      tagged(card("Gavony Township", "Land", ""), &["Counters Matter"]),
      "{t}: add {c}. put a +1/+1 counter on each creature you control.",
    ),
    85,
  ));

  // Goblins
  for i in 0..20 {
    let mut c = tagged(
      card(&format!("Goblin Raider {}", i + 1), "Creature — Goblin", "R"),
      &["Goblin Kindred"],
    );
    c.mana_cost_string = "{1}{R}".to_string();
    c.mana_value = 2.0;
    c.edhrec_rank = Some(1000 + i * 13);
    cards.push(c);
  }
  // Token makers
  for i in 0..10 {
    let mut c = tagged(
      card(&format!("Token Forger {}", i + 1), "Creature — Human Shaman", "R"),
      &["Tokens Matter"],
    );
    c.mana_cost_string = "{2}{R}".to_string();
    c.mana_value = 3.0;
    c.edhrec_rank = Some(1400 + i * 17);
    cards.push(c);
  }
  // Overlap creatures hitting both themes
  for (i, name) in [
    "Goblin Chieftain",
    "Goblin Rabblemaster",
    "Siege-Gang Commander",
    "Goblin Warchief",
    "Legion Warboss",
    "Goblin Matron Token",
    "Beetleback Chief",
    "Krenko's Enforcer",
  ]
  .iter()
  .enumerate()
  {
    let mut c = tagged(
      card(name, "Creature — Goblin", "R"),
      &["Goblin Kindred", "Tokens Matter"],
    );
    c.mana_cost_string = "{2}{R}".to_string();
    c.mana_value = 3.0;
    c.edhrec_rank = Some(200 + i as u32 * 9);
    cards.push(c);
  }
  // Ramp dorks
  for i in 0..5 {
    let mut c = tagged(
      card(&format!("Ember Dork {}", i + 1), "Creature — Goblin Shaman", "R"),
      &["Ramp"],
    );
    c.mana_cost_string = "{1}{R}".to_string();
    c.mana_value = 2.0;
    c.text = "{t}: add {r}.".to_string();
    c.edhrec_rank = Some(800 + i * 31);
    cards.push(c);
  }

  // Ramp rocks
  for (name, rank) in &[
    ("Sol Ring", 1u32),
    ("Arcane Signet", 2),
    ("Mind Stone", 50),
    ("Fellwar Stone", 55),
    ("Thought Vessel", 60),
    ("Fire Diamond", 300),
    ("Worn Powerstone", 120),
    ("Hedron Archive", 140),
    ("Thran Dynamo", 90),
    ("Ruby Medallion", 75),
  ] {
    let mut c = tagged(card(name, "Artifact", ""), &["Ramp"]);
    c.mana_cost_string = "{2}".to_string();
    c.mana_value = 2.0;
    c.text = "{t}: add {c}.".to_string();
    c.edhrec_rank = Some(*rank);
    cards.push(c);
  }

  // Spot removal
  for (i, name) in [
    "Lightning Bolt",
    "Chaos Warp",
    "Abrade",
    "Tibalt's Trickery Strike",
    "Fire Away",
    "Scorching Dragonfire",
    "Flame Sweep Shot",
    "Searing Spear",
    "Molten End",
    "Crush Dissent",
    "Shatterskull Bolt",
    "Spit Flame",
  ]
  .iter()
  .enumerate()
  {
    let mut c = tagged(card(name, "Instant", "R"), &["Removal", "Spot Removal"]);
    c.mana_cost_string = "{1}{R}".to_string();
    c.mana_value = 2.0;
    c.edhrec_rank = Some(100 + i as u32 * 21);
    cards.push(c);
  }

  // Board wipes
  for (i, name) in
    ["Blasphemous Act", "Vandalblast", "Chain Reaction", "Star of Extinction", "Fiery Cannonade"]
      .iter()
      .enumerate()
  {
    let mut c = tagged(card(name, "Sorcery", "R"), &["Board Wipe", "Mass Removal"]);
    c.mana_cost_string = "{3}{R}".to_string();
    c.mana_value = 4.0;
    c.edhrec_rank = Some(160 + i as u32 * 33);
    cards.push(c);
  }

  // Card advantage, some conditional
  for i in 0..10 {
    let mut c = tagged(
      card(&format!("Rummage Ritual {}", i + 1), "Sorcery", "R"),
      &["Card Advantage", "Card Draw"],
    );
    c.mana_cost_string = "{2}{R}".to_string();
    c.mana_value = 3.0;
    c.edhrec_rank = Some(900 + i * 23);
    cards.push(c);
  }
  for i in 0..4 {
    let mut c = tagged(
      card(&format!("Raid Ledger {}", i + 1), "Enchantment", "R"),
      &["Card Advantage", "Conditional", "Attacks"],
    );
    c.mana_cost_string = "{1}{R}".to_string();
    c.mana_value = 2.0;
    c.edhrec_rank = Some(1100 + i * 29);
    cards.push(c);
  }

  // Protection
  for i in 0..8 {
    let mut c = tagged(
      card(&format!("Warding Ember {}", i + 1), "Instant", "R"),
      &["Protection"],
    );
    c.mana_cost_string = "{R}".to_string();
    c.mana_value = 1.0;
    c.edhrec_rank = Some(1300 + i * 19);
    cards.push(c);
  }

  // Theme spells (non-creature)
  for i in 0..8 {
    let mut c = tagged(
      card(&format!("Mob Rally {}", i + 1), "Sorcery", "R"),
      &["Goblin Kindred", "Tokens Matter"],
    );
    c.mana_cost_string = "{2}{R}".to_string();
    c.mana_value = 3.0;
    c.edhrec_rank = Some(700 + i * 27);
    cards.push(c);
  }
  for i in 0..6 {
    let mut c = tagged(
      card(&format!("Impact Echo {}", i + 1), "Enchantment", "R"),
      &["Tokens Matter"],
    );
    c.mana_cost_string = "{1}{R}{R}".to_string();
    c.mana_value = 3.0;
    c.edhrec_rank = Some(1500 + i * 37);
    cards.push(c);
  }

  // Nonland tutors for bracket/enforcement scenarios
  for i in 0..4 {
    let mut c = tagged(
      card(&format!("Goblin Recruiter {}", i + 1), "Sorcery", "R"),
      &["Bracket:TutorNonland", "Card Advantage"],
    );
    c.mana_cost_string = "{1}{R}".to_string();
    c.mana_value = 2.0;
    c.edhrec_rank = Some(450 + i * 41);
    cards.push(c);
  }

  Catalog::from_cards(cards)
}

/// The S1-style deterministic tokens build
pub fn krenko_config() -> BuildConfig {
  let mut config = BuildConfig::default();
  config.commander = "Krenko, Mob Boss".to_string();
  config.themes = vec!["Goblin Kindred".to_string(), "Tokens Matter".to_string()];
  config.tag_mode = TagMode::And;
  config.bracket_level = 3;
  config.seed = 42;
  config.ideal_counts = IdealCounts {
    lands: 36,
    basic_lands: 15,
    creatures: 30,
    ramp: 8,
    removal: 8,
    wipes: 2,
    card_advantage: 8,
    protection: 5,
    fetch_lands: 3,
  };
  config
}

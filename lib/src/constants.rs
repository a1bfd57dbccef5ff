//! # Curated tables and tuning knobs for the build pipeline
use crate::card::{ColorSet, ManaColor};
use std::collections::HashSet;

// Deck composition defaults
pub const DEFAULT_LAND_COUNT: u32 = 35;
pub const DEFAULT_BASIC_LAND_COUNT: u32 = 15;
pub const DEFAULT_CREATURE_COUNT: u32 = 25;
pub const DEFAULT_RAMP_COUNT: u32 = 8;
pub const DEFAULT_REMOVAL_COUNT: u32 = 10;
pub const DEFAULT_WIPES_COUNT: u32 = 2;
pub const DEFAULT_CARD_ADVANTAGE_COUNT: u32 = 10;
pub const DEFAULT_PROTECTION_COUNT: u32 = 8;
pub const DEFAULT_FETCH_LAND_COUNT: u32 = 3;

pub const DECK_SIZE: u32 = 100;

// Fetch / dual / triple land targets
pub const FETCH_LAND_MAX_CAP: u32 = 7;
pub const DUAL_LAND_DEFAULT_COUNT: u32 = 4;
pub const TRIPLE_LAND_DEFAULT_COUNT: u32 = 2;

// Basic land floor: trims never drop basics below ceil(factor * configured min)
pub const BASIC_FLOOR_FACTOR: f64 = 0.9;

/// Maximum acceptable ETB-tapped land count per power bracket (1-5)
pub fn tapped_land_threshold(bracket_level: u8) -> u32 {
  match bracket_level {
    1 => 14,
    2 => 12,
    3 => 10,
    4 => 8,
    _ => 6,
  }
}

pub const TAPPED_LAND_SWAP_MIN_PENALTY: i32 = 6;

// Misc/utility land selection (Land Step 7)
pub const MISC_LAND_EDHREC_KEEP_PERCENT_MIN: f64 = 0.75;
pub const MISC_LAND_EDHREC_KEEP_PERCENT_MAX: f64 = 1.00;
pub const MISC_LAND_COLOR_FIX_PRIORITY_WEIGHT: f64 = 2.0;
pub const MISC_LAND_THEME_MATCH_BASE: f64 = 1.4;
pub const MISC_LAND_THEME_MATCH_PER_EXTRA: f64 = 0.15;
pub const MISC_LAND_THEME_MATCH_CAP: f64 = 2.0;
pub const MISC_LAND_KINDRED_OFF_THEME_FACTOR: f64 = 0.5;

// Theme weighting (creatures & theme spell fill)
pub const THEME_POOL_SIZE_MULTIPLIER: f64 = 2.0;
pub const THEME_PRIORITY_BONUS: f64 = 1.2;
pub const AND_ALL_THEME_CAP_RATIO: f64 = 0.6;
pub const AND_ALL_THEME_WEIGHT: f64 = 1.7;
pub const PREFER_OWNED_WEIGHT_MULTIPLIER: f64 = 1.25;

/// Kindred boost multipliers per theme slot (primary, secondary, tertiary)
pub const KINDRED_WEIGHT_MULTIPLIERS: [f64; 3] = [1.4, 1.3, 1.2];

/// Random bonus upper bound applied to each spell category target
pub const CATEGORY_BONUS_MAX_PCT: f64 = 0.2;

// Fuzzy resolution
pub const EXACT_NAME_THRESHOLD: u32 = 80;
pub const MAX_PRESENTED_CHOICES: usize = 5;

// Color balance
pub const COLOR_SHORTFALL_THRESHOLD: f64 = 0.15;
pub const COLOR_BALANCE_MAX_SWAPS: usize = 5;

// Random entrypoint
pub const RANDOM_DEFAULT_ATTEMPTS: u32 = 5;
pub const RANDOM_DEFAULT_TIMEOUT_MS: u64 = 5000;
/// Themes covering more than this share of the catalog are excluded from the
/// auto-fill pool
pub const RANDOM_THEME_MAX_SHARE: f64 = 0.30;
pub const RANDOM_THEME_EXCLUDED: [&str; 3] = ["goodstuff", "staples", "value"];

// Shared textual heuristics
pub const TAPPED_LAND_PHRASE: &str = "enters the battlefield tapped";
pub const SHOCK_LIKE_PHRASE: &str = "you may pay 2 life";
pub const CONDITIONAL_UNTAP_KEYWORDS: [&str; 3] =
  ["unless you control", "if you control", "as long as you control"];
pub const ANY_COLOR_MANA_PHRASES: [&str; 2] =
  ["add one mana of any color", "add one mana of any colour"];
pub const MONO_COLOR_RAINBOW_TEXT_EXTRA: [&str; 4] = [
  "add one mana of any type",
  "choose a color",
  "add one mana of any color that a gate",
  "add one mana of any color among",
];
pub const COLORED_MANA_SYMBOLS: [&str; 5] = ["{w}", "{u}", "{b}", "{r}", "{g}"];
pub const BASIC_LAND_TYPE_KEYWORDS: [&str; 5] =
  ["plains", "island", "swamp", "mountain", "forest"];

pub const BASIC_LANDS: [&str; 5] = ["Plains", "Island", "Swamp", "Mountain", "Forest"];

/// All basic land names including snow variants and Wastes
pub fn basic_land_names() -> HashSet<&'static str> {
  let mut names: HashSet<&'static str> = BASIC_LANDS.iter().copied().collect();
  for c in &ManaColor::ALL {
    names.insert(c.snow_basic_land());
  }
  names.insert("Wastes");
  names
}

pub const GENERIC_FETCH_LANDS: [&str; 9] = [
  "Evolving Wilds",
  "Terramorphic Expanse",
  "Shire Terrace",
  "Escape Tunnel",
  "Promising Vein",
  "Myriad Landscape",
  "Fabled Passage",
  "Terminal Moraine",
  "Prismatic Vista",
];

pub fn color_fetch_lands(color: ManaColor) -> &'static [&'static str] {
  match color {
    ManaColor::White => &[
      "Flooded Strand",
      "Windswept Heath",
      "Marsh Flats",
      "Arid Mesa",
      "Brokers Hideout",
      "Obscura Storefront",
      "Cabaretti Courtyard",
    ],
    ManaColor::Blue => &[
      "Flooded Strand",
      "Polluted Delta",
      "Scalding Tarn",
      "Misty Rainforest",
      "Brokers Hideout",
      "Obscura Storefront",
      "Maestros Theater",
    ],
    ManaColor::Black => &[
      "Polluted Delta",
      "Bloodstained Mire",
      "Marsh Flats",
      "Verdant Catacombs",
      "Obscura Storefront",
      "Maestros Theater",
      "Riveteers Overlook",
    ],
    ManaColor::Red => &[
      "Bloodstained Mire",
      "Wooded Foothills",
      "Scalding Tarn",
      "Arid Mesa",
      "Maestros Theater",
      "Riveteers Overlook",
      "Cabaretti Courtyard",
    ],
    ManaColor::Green => &[
      "Wooded Foothills",
      "Windswept Heath",
      "Verdant Catacombs",
      "Misty Rainforest",
      "Brokers Hideout",
      "Riveteers Overlook",
      "Cabaretti Courtyard",
    ],
  }
}

/// Returns every fetch land name (color-specific plus generic)
pub fn all_fetch_land_names() -> HashSet<&'static str> {
  let mut out: HashSet<&'static str> = HashSet::new();
  for c in &ManaColor::ALL {
    out.extend(color_fetch_lands(*c).iter().copied());
  }
  out.extend(GENERIC_FETCH_LANDS.iter().copied());
  out
}

/// Predicate inputs: commander + selected tags (lowercased), color identity,
/// commander power
pub type StapleCondition = fn(&[String], ColorSet, i32) -> bool;

pub const STAPLE_LAND_CONDITIONS: [(&str, StapleCondition); 6] = [
  ("Reliquary Tower", |_tags, _colors, _power| true),
  ("Ash Barrens", |tags, _colors, _power| !tags.iter().any(|t| t == "landfall")),
  ("Command Tower", |_tags, colors, _power| colors.len() > 1),
  ("Exotic Orchard", |_tags, colors, _power| colors.len() > 1),
  ("War Room", |_tags, colors, _power| colors.len() <= 2),
  ("Rogue's Passage", |_tags, _colors, power| power >= 5),
];

pub const KINDRED_LAND_NAMES: [&str; 6] = [
  "Path of Ancestry",
  "Three Tree City",
  "Cavern of Souls",
  "Unclaimed Territory",
  "Secluded Courtyard",
  "Plaza of Heroes",
];

/// Shock lands score highest in dual ranking and replacement scoring
pub const SHOCK_LAND_NAMES: [&str; 10] = [
  "Blood Crypt",
  "Breeding Pool",
  "Godless Shrine",
  "Hallowed Fountain",
  "Overgrown Tomb",
  "Sacred Foundry",
  "Steam Vents",
  "Stomping Ground",
  "Temple Garden",
  "Watery Grave",
];

pub const TRI_LAND_NAME_KEYWORDS: [&str; 10] = [
  "triome",
  "panorama",
  "citadel",
  "tower",
  "hub",
  "garden",
  "headquarters",
  "sanctuary",
  "shrine",
  "domain",
];

/// Rainbow/utility lands excluded from Step 7 in mono-color decks
pub const MONO_COLOR_MISC_LAND_EXCLUDE: [&str; 20] = [
  "Command Tower",
  "Mana Confluence",
  "City of Brass",
  "Grand Coliseum",
  "Tarnished Citadel",
  "Gemstone Mine",
  "Aether Hub",
  "Spire of Industry",
  "Exotic Orchard",
  "Reflecting Pool",
  "Plaza of Harmony",
  "Pillar of the Paruns",
  "Cascading Cataracts",
  "Crystal Quarry",
  "The World Tree",
  "Thriving Bluff",
  "Thriving Grove",
  "Thriving Isle",
  "Thriving Heath",
  "Thriving Moor",
];

pub const MONO_COLOR_MISC_LAND_KEEP_ALWAYS: [&str; 5] = [
  "Forbidden Orchard",
  "Plaza of Heroes",
  "Path of Ancestry",
  "Lotus Field",
  "Lotus Vale",
];

pub const CARD_TYPE_SORT_ORDER: [&str; 9] = [
  "Planeswalker",
  "Battle",
  "Creature",
  "Instant",
  "Sorcery",
  "Artifact",
  "Enchantment",
  "Land",
  "Other",
];

// Tag summaries in the TXT export header
pub const TAG_SUMMARY_MIN_COUNT: usize = 3;
pub const TAG_SUMMARY_ALWAYS_SHOW_SUBSTRS: [&str; 2] = ["board wipe", "mass removal"];

/// Fallback game-changer list used when no policy file is available
pub const GAME_CHANGERS: [&str; 62] = [
  "Ad Nauseam",
  "Ancient Tomb",
  "Aura Shards",
  "Bolas's Citadel",
  "Braids, Cabal Minion",
  "Chrome Mox",
  "Coalition Victory",
  "Consecrated Sphinx",
  "Crop Rotation",
  "Cyclonic Rift",
  "Deflecting Swat",
  "Demonic Tutor",
  "Drannith Magistrate",
  "Enlightened Tutor",
  "Expropriate",
  "Field of the Dead",
  "Fierce Guardianship",
  "Food Chain",
  "Force of Will",
  "Gaea's Cradle",
  "Gamble",
  "Gifts Ungiven",
  "Glacial Chasm",
  "Grand Arbiter Augustin IV",
  "Grim Monolith",
  "Humility",
  "Imperial Seal",
  "Intuition",
  "Jeska's Will",
  "Jin-Gitaxias, Core Augur",
  "Kinnan, Bonder Prodigy",
  "Lion's Eye Diamond",
  "Mana Vault",
  "Mishra's Workshop",
  "Mox Diamond",
  "Mystical Tutor",
  "Narset, Parter of Veils",
  "Natural Order",
  "Necropotence",
  "Notion Thief",
  "Opposition Agent",
  "Orcish Bowmasters",
  "Panoptic Mirror",
  "Rhystic Study",
  "Seedborn Muse",
  "Serra's Sanctum",
  "Smothering Tithe",
  "Survival of the Fittest",
  "Sway of the Stars",
  "Teferi's Protection",
  "Tergrid, God of Fright",
  "Thassa's Oracle",
  "The One Ring",
  "The Tabernacle at Pendrell Vale",
  "Underworld Breach",
  "Urza, Lord High Artificer",
  "Vampiric Tutor",
  "Vorinclex, Voice of Hunger",
  "Winota, Joiner of Forces",
  "Worldly Tutor",
  "Yuriko, the Tiger's Shadow",
  "Mana Drain",
];

lazy_static! {
  /// Well-known cards boosted during fuzzy resolution
  pub static ref POPULAR_CARDS: HashSet<&'static str> = [
    "Lightning Bolt", "Swords to Plowshares", "Path to Exile", "Counterspell",
    "Murder", "Go for the Throat", "Fatal Push", "Doom Blade", "Naturalize",
    "Disenchant", "Beast Within", "Chaos Warp", "Generous Gift",
    "Anguished Unmaking", "Vindicate", "Putrefy", "Terminate", "Abrupt Decay",
    "Wrath of God", "Day of Judgment", "Damnation", "Pyroclasm",
    "Anger of the Gods", "Supreme Verdict", "Austere Command", "Cyclonic Rift",
    "Toxic Deluge", "Blasphemous Act", "Pernicious Deed",
    "Rhystic Study", "Mystic Remora", "Phyrexian Arena", "Necropotence",
    "Sylvan Library", "Consecrated Sphinx", "Mulldrifter", "Divination",
    "Sign in Blood", "Night's Whisper", "Harmonize", "Blue Sun's Zenith",
    "Sol Ring", "Rampant Growth", "Cultivate", "Kodama's Reach", "Farseek",
    "Nature's Lore", "Three Visits", "Sakura-Tribe Elder", "Wood Elves",
    "Farhaven Elf", "Solemn Simulacrum", "Commander's Sphere", "Arcane Signet",
    "Fellwar Stone", "Mind Stone", "Thought Vessel", "Thran Dynamo",
    "Gilded Lotus", "Demonic Tutor", "Vampiric Tutor", "Mystical Tutor",
    "Enlightened Tutor", "Worldly Tutor", "Green Sun's Zenith",
    "Chord of Calling", "Negate", "Swan Song", "Dispel", "Force of Will",
    "Heroic Intervention", "Boros Charm", "Teferi's Protection",
    "Eternal Witness", "Snapcaster Mage", "Acidic Slime", "Reclamation Sage",
    "Oracle of Mul Daya", "Avenger of Zendikar", "Lightning Greaves",
    "Swiftfoot Boots", "Skullclamp", "Smothering Tithe", "Doubling Season",
    "Parallel Lives", "Purphoros, God of the Forge", "Command Tower",
    "Exotic Orchard", "Reflecting Pool", "City of Brass", "Mana Confluence",
    "Ancient Tomb", "Reliquary Tower", "Bojuka Bog", "Strip Mine", "Wasteland",
    "Ghost Quarter", "Maze of Ith", "Krenko, Mob Boss",
  ]
  .iter()
  .copied()
  .collect();

  /// Format-defining cards given an extra resolution boost
  pub static ref ICONIC_CARDS: HashSet<&'static str> = [
    "Lightning Bolt", "Counterspell", "Swords to Plowshares", "Dark Ritual",
    "Giant Growth", "Wrath of God", "Fireball", "Control Magic", "Terror",
    "Disenchant", "Regrowth", "Brainstorm", "Force of Will", "Wasteland",
    "Tarmogoyf", "Snapcaster Mage", "Dark Confidant", "Shivan Dragon",
    "Serra Angel", "Llanowar Elves", "Birds of Paradise", "Noble Hierarch",
    "Jace, the Mind Sculptor", "Liliana of the Veil", "Karn Liberated",
    "Ugin, the Spirit Dragon", "Necropotence", "Yawgmoth's Will",
    "Show and Tell", "Natural Order", "Survival of the Fittest",
    "Wheel of Fortune", "Windfall", "Sol Ring", "Mana Vault", "Winter Orb",
    "Chalice of the Void", "Crucible of Worlds", "Sensei's Divining Top",
    "Skullclamp", "Strip Mine", "Maze of Ith", "Gaea's Cradle",
    "Serra's Sanctum", "Cabal Coffers", "Urborg, Tomb of Yawgmoth",
    "Mana Drain", "Ponder", "Preordain", "Path to Exile", "Thoughtseize",
    "Chain Lightning", "Stoneforge Mystic", "Cryptic Command",
    "Command Tower", "Rhystic Study", "Cyclonic Rift", "Demonic Tutor",
    "Eternal Witness", "Solemn Simulacrum", "Avenger of Zendikar",
  ]
  .iter()
  .copied()
  .collect();
}

/// A multi-copy archetype allows more than one copy of its card
#[derive(Debug, Clone, Copy)]
pub struct MultiCopyArchetype {
  pub id: &'static str,
  pub name: &'static str,
  pub color_identity: &'static str,
  pub printed_cap: Option<u32>,
  pub exclusive_group: Option<&'static str>,
  pub trigger_tags: &'static [&'static str],
  pub default_count: u32,
  pub creature: bool,
}

pub const MULTI_COPY_ARCHETYPES: [MultiCopyArchetype; 9] = [
  MultiCopyArchetype {
    id: "dragons_approach",
    name: "Dragon's Approach",
    color_identity: "R",
    printed_cap: None,
    exclusive_group: None,
    trigger_tags: &["burn", "spellslinger", "storm", "copy", "treasure", "graveyard"],
    default_count: 25,
    creature: false,
  },
  MultiCopyArchetype {
    id: "hare_apparent",
    name: "Hare Apparent",
    color_identity: "W",
    printed_cap: None,
    exclusive_group: None,
    trigger_tags: &["rabbit kindred", "tokens matter", "aggro"],
    default_count: 25,
    creature: true,
  },
  MultiCopyArchetype {
    id: "slime_against_humanity",
    name: "Slime Against Humanity",
    color_identity: "G",
    printed_cap: None,
    exclusive_group: None,
    trigger_tags: &["tokens matter", "ooze kindred", "graveyard", "mill", "delirium"],
    default_count: 25,
    creature: false,
  },
  MultiCopyArchetype {
    id: "relentless_rats",
    name: "Relentless Rats",
    color_identity: "B",
    printed_cap: None,
    exclusive_group: Some("rats"),
    trigger_tags: &["rat kindred", "swarm", "aristocrats", "sacrifice matters"],
    default_count: 25,
    creature: true,
  },
  MultiCopyArchetype {
    id: "rat_colony",
    name: "Rat Colony",
    color_identity: "B",
    printed_cap: None,
    exclusive_group: Some("rats"),
    trigger_tags: &["rat kindred", "swarm", "aristocrats", "sacrifice matters"],
    default_count: 25,
    creature: true,
  },
  MultiCopyArchetype {
    id: "seven_dwarves",
    name: "Seven Dwarves",
    color_identity: "R",
    printed_cap: Some(7),
    exclusive_group: None,
    trigger_tags: &["dwarf kindred", "treasure", "equipment", "tokens matter"],
    default_count: 7,
    creature: true,
  },
  MultiCopyArchetype {
    id: "persistent_petitioners",
    name: "Persistent Petitioners",
    color_identity: "U",
    printed_cap: None,
    exclusive_group: None,
    trigger_tags: &["mill", "advisor kindred", "control", "defenders"],
    default_count: 25,
    creature: true,
  },
  MultiCopyArchetype {
    id: "shadowborn_apostle",
    name: "Shadowborn Apostle",
    color_identity: "B",
    printed_cap: None,
    exclusive_group: None,
    trigger_tags: &["demon kindred", "aristocrats", "sacrifice matters", "lifedrain"],
    default_count: 25,
    creature: true,
  },
  MultiCopyArchetype {
    id: "nazgul",
    name: "Nazgûl",
    color_identity: "B",
    printed_cap: Some(9),
    exclusive_group: None,
    trigger_tags: &["wraith kindred", "amass", "aristocrats", "sacrifice matters"],
    default_count: 9,
    creature: true,
  },
];

pub fn archetype_by_id(id: &str) -> Option<&'static MultiCopyArchetype> {
  MULTI_COPY_ARCHETYPES.iter().find(|a| a.id == id)
}

/// Rank multi-copy archetypes against a commander's colors and selected
/// tags: +2 for fitting the color identity, +1 per matched trigger tag
/// (capped at 3). Only the best-scoring member of an exclusive group
/// survives. Returns (archetype, score) best first.
pub fn detect_viable_archetypes(
  identity: ColorSet,
  tags: &[String],
) -> Vec<(&'static MultiCopyArchetype, u32)> {
  let mut scored: Vec<(&'static MultiCopyArchetype, u32)> = Vec::new();
  for archetype in &MULTI_COPY_ARCHETYPES {
    if !ColorSet::from_letters(archetype.color_identity).is_subset(identity) {
      continue;
    }
    let mut score = 2;
    let matches = archetype
      .trigger_tags
      .iter()
      .filter(|t| tags.iter().any(|tag| tag.contains(*t)))
      .count() as u32;
    score += matches.min(3);
    if matches == 0 {
      continue;
    }
    scored.push((archetype, score));
  }
  // keep the best per exclusive group
  let mut kept: Vec<(&'static MultiCopyArchetype, u32)> = Vec::new();
  for (archetype, score) in scored {
    match archetype.exclusive_group {
      Some(group) => {
        match kept
          .iter_mut()
          .find(|(a, _)| a.exclusive_group == Some(group))
        {
          Some(existing) => {
            if score > existing.1 {
              *existing = (archetype, score);
            }
          }
          None => kept.push((archetype, score)),
        }
      }
      None => kept.push((archetype, score)),
    }
  }
  kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.id.cmp(b.0.id)));
  kept
}

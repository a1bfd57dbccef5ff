//! # Power bracket taxonomy and limits
use crate::error::BuildError;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Policy categories with per-bracket caps, in evaluation order
pub const POLICY_CATEGORIES: [&str; 4] =
  ["game_changers", "extra_turns", "mass_land_denial", "tutors_nonland"];
pub const COMBO_CATEGORY: &str = "two_card_combos";

/// Hard limits per category; None = unlimited. Warn thresholds are soft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BracketLimits {
  pub game_changers: Option<u32>,
  pub extra_turns: Option<u32>,
  pub mass_land_denial: Option<u32>,
  pub tutors_nonland: Option<u32>,
  pub two_card_combos: Option<u32>,
  #[serde(default)]
  pub warn: BTreeMap<String, u32>,
}

impl BracketLimits {
  pub fn limit_for(&self, category: &str) -> Option<u32> {
    match category {
      "game_changers" => self.game_changers,
      "extra_turns" => self.extra_turns,
      "mass_land_denial" => self.mass_land_denial,
      "tutors_nonland" => self.tutors_nonland,
      "two_card_combos" => self.two_card_combos,
      _ => None,
    }
  }

  pub fn warn_for(&self, category: &str) -> Option<u32> {
    self.warn.get(category).copied()
  }

  /// True when the category is hard-disallowed (limit == 0)
  pub fn disallows(&self, category: &str) -> bool {
    self.limit_for(category) == Some(0)
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketDefinition {
  pub level: u8,
  pub name: String,
  pub short_desc: String,
  pub long_desc: String,
  pub limits: BracketLimits,
}

fn limits(
  game_changers: Option<u32>,
  extra_turns: Option<u32>,
  mass_land_denial: Option<u32>,
  tutors_nonland: Option<u32>,
  two_card_combos: Option<u32>,
) -> BracketLimits {
  BracketLimits {
    game_changers,
    extra_turns,
    mass_land_denial,
    tutors_nonland,
    two_card_combos,
    warn: BTreeMap::new(),
  }
}

lazy_static! {
  pub static ref BRACKET_DEFINITIONS: Vec<BracketDefinition> = vec![
    BracketDefinition {
      level: 1,
      name: "Exhibition".to_string(),
      short_desc: "Ultra-casual / novelty; long games; focus on fun.".to_string(),
      long_desc: "Throw down with your ultra-casual deck. Winning isn't primary; show off \
                  something unusual. Games go long and end slowly."
        .to_string(),
      limits: limits(Some(0), Some(0), Some(0), Some(3), Some(0)),
    },
    BracketDefinition {
      level: 2,
      name: "Core".to_string(),
      short_desc: "Precon baseline; splashy turns; 9+ turn games.".to_string(),
      long_desc: "Average modern precon: tuned engines and splashy turns, some pet or theme \
                  cards, usually longer games."
        .to_string(),
      limits: limits(Some(0), Some(3), Some(0), Some(3), Some(0)),
    },
    BracketDefinition {
      level: 3,
      name: "Upgraded".to_string(),
      short_desc: "Refined beyond precon; faster; selective power.".to_string(),
      long_desc: "Carefully selected cards; may include up to three Game Changers. Avoids \
                  cheap fast infinite two-card combos."
        .to_string(),
      limits: limits(Some(3), Some(3), Some(0), None, Some(0)),
    },
    BracketDefinition {
      level: 4,
      name: "Optimized".to_string(),
      short_desc: "High power, explosive, not meta-focused.".to_string(),
      long_desc: "Strong, explosive builds; any number of powerful effects, tutors, combos, \
                  and denial."
        .to_string(),
      limits: limits(None, None, None, None, None),
    },
    BracketDefinition {
      level: 5,
      name: "cEDH".to_string(),
      short_desc: "Competitive, meta-driven mindset.".to_string(),
      long_desc: "Metagame/tournament mindset; precision choices; winning prioritized over \
                  expression."
        .to_string(),
      limits: limits(None, None, None, None, None),
    },
  ];
}

/// In-code bracket lookup by level
pub fn bracket_for_level(level: u8) -> Result<BracketDefinition, BuildError> {
  BRACKET_DEFINITIONS
    .iter()
    .find(|b| b.level == level)
    .cloned()
    .ok_or_else(|| BuildError::InputValidation(format!("bracket level {} out of range 1-5", level)))
}

// YAML override shape:
//   core:
//     name: Core
//     level: 2
//     limits: { game_changers: 0, extra_turns: 3, extra_turns_warn: 1, ... }
#[derive(Debug, Deserialize)]
struct YamlBracket {
  name: Option<String>,
  level: u8,
  #[serde(default)]
  limits: BTreeMap<String, Option<u32>>,
}

pub fn brackets_from_yaml_str(text: &str) -> Result<Vec<BracketDefinition>, BuildError> {
  let parsed: BTreeMap<String, YamlBracket> = serde_yaml::from_str(text)?;
  let mut out = Vec::new();
  for (key, raw) in parsed {
    let base = bracket_for_level(raw.level)?;
    let mut def = BracketDefinition {
      level: raw.level,
      name: raw.name.unwrap_or_else(|| key.clone()),
      short_desc: base.short_desc.clone(),
      long_desc: base.long_desc.clone(),
      limits: base.limits.clone(),
    };
    for (k, v) in raw.limits {
      if let Some(category) = k.strip_suffix("_warn") {
        if let Some(value) = v {
          def.limits.warn.insert(category.to_string(), value);
        }
        continue;
      }
      match k.as_str() {
        "game_changers" => def.limits.game_changers = v,
        "extra_turns" => def.limits.extra_turns = v,
        "mass_land_denial" => def.limits.mass_land_denial = v,
        "tutors_nonland" => def.limits.tutors_nonland = v,
        "two_card_combos" => def.limits.two_card_combos = v,
        other => warn!("unknown bracket limit key '{}' ignored", other),
      }
    }
    out.push(def);
  }
  Ok(out)
}

/// Load the bracket for a level, honoring a YAML override file when present
pub fn load_bracket(level: u8, override_path: Option<&Path>) -> Result<BracketDefinition, BuildError> {
  if let Some(path) = override_path {
    if path.exists() {
      let text = fs::read_to_string(path)?;
      let defs = brackets_from_yaml_str(&text)?;
      if let Some(def) = defs.into_iter().find(|d| d.level == level) {
        return Ok(def);
      }
    }
  }
  bracket_for_level(level)
}

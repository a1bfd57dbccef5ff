//! # Build configuration and operational environment
use crate::constants;
use crate::error::BuildError;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagMode {
  #[serde(rename = "AND")]
  And,
  #[serde(rename = "OR")]
  Or,
}

impl Default for TagMode {
  fn default() -> Self {
    TagMode::And
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnforcementMode {
  Warn,
  Enforce,
}

impl Default for EnforcementMode {
  fn default() -> Self {
    EnforcementMode::Warn
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComboBalance {
  Early,
  Late,
  Mix,
}

impl Default for ComboBalance {
  fn default() -> Self {
    ComboBalance::Mix
  }
}

/// Per-category target counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdealCounts {
  pub lands: u32,
  pub basic_lands: u32,
  pub creatures: u32,
  pub ramp: u32,
  pub removal: u32,
  pub wipes: u32,
  pub card_advantage: u32,
  pub protection: u32,
  pub fetch_lands: u32,
}

impl Default for IdealCounts {
  fn default() -> Self {
    Self {
      lands: constants::DEFAULT_LAND_COUNT,
      basic_lands: constants::DEFAULT_BASIC_LAND_COUNT,
      creatures: constants::DEFAULT_CREATURE_COUNT,
      ramp: constants::DEFAULT_RAMP_COUNT,
      removal: constants::DEFAULT_REMOVAL_COUNT,
      wipes: constants::DEFAULT_WIPES_COUNT,
      card_advantage: constants::DEFAULT_CARD_ADVANTAGE_COUNT,
      protection: constants::DEFAULT_PROTECTION_COUNT,
      fetch_lands: constants::DEFAULT_FETCH_LAND_COUNT,
    }
  }
}

/// One build request. Matches the JSON body accepted by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
  #[serde(alias = "commander_name")]
  pub commander: String,
  /// Ordered: primary, optional secondary, optional tertiary
  pub themes: Vec<String>,
  pub tag_mode: TagMode,
  pub bracket_level: u8,
  pub ideal_counts: IdealCounts,
  pub seed: u64,
  pub use_owned_only: bool,
  pub prefer_owned: bool,
  pub owned_names: Vec<String>,
  pub include_cards: Vec<String>,
  pub exclude_cards: Vec<String>,
  pub enforcement_mode: EnforcementMode,
  pub prefer_combos: bool,
  pub combo_target_count: u32,
  pub combo_balance: ComboBalance,
  pub multi_copy_archetype_id: Option<String>,
  pub swap_mdfc_basics: bool,
  /// User-supplied replacement picks honored during enforcement
  pub preferred_replacements: std::collections::HashMap<String, String>,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      commander: String::new(),
      themes: Vec::new(),
      tag_mode: TagMode::default(),
      bracket_level: 2,
      ideal_counts: IdealCounts::default(),
      seed: 0,
      use_owned_only: false,
      prefer_owned: false,
      owned_names: Vec::new(),
      include_cards: Vec::new(),
      exclude_cards: Vec::new(),
      enforcement_mode: EnforcementMode::default(),
      prefer_combos: false,
      combo_target_count: 0,
      combo_balance: ComboBalance::default(),
      multi_copy_archetype_id: None,
      swap_mdfc_basics: false,
      preferred_replacements: std::collections::HashMap::new(),
    }
  }
}

impl BuildConfig {
  pub fn validate(&self) -> Result<(), BuildError> {
    if self.commander.trim().is_empty() {
      return Err(BuildError::InputValidation("commander name is required".to_string()));
    }
    if !(1..=5).contains(&self.bracket_level) {
      return Err(BuildError::InputValidation(format!(
        "bracket level {} out of range 1-5",
        self.bracket_level
      )));
    }
    if self.themes.len() > 3 {
      return Err(BuildError::InputValidation(format!(
        "at most 3 themes supported, got {}",
        self.themes.len()
      )));
    }
    if self.use_owned_only && self.owned_names.is_empty() {
      return Err(BuildError::InputValidation(
        "use_owned_only set but owned_names is empty".to_string(),
      ));
    }
    Ok(())
  }
}

/// Operational environment variables (deployment surface, not build inputs)
#[derive(Debug, Clone)]
pub struct EnvSettings {
  pub random_modes: bool,
  pub random_max_attempts: u32,
  pub random_timeout_ms: u64,
  pub random_suppress_initial_export: bool,
  pub deck_exports: PathBuf,
  pub owned_cards_dir: Option<PathBuf>,
}

impl Default for EnvSettings {
  fn default() -> Self {
    Self {
      random_modes: false,
      random_max_attempts: constants::RANDOM_DEFAULT_ATTEMPTS,
      random_timeout_ms: constants::RANDOM_DEFAULT_TIMEOUT_MS,
      random_suppress_initial_export: false,
      deck_exports: PathBuf::from("deck_files"),
      owned_cards_dir: None,
    }
  }
}

fn env_bool(key: &str) -> Option<bool> {
  std::env::var(key).ok().map(|v| {
    matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
  })
}

impl EnvSettings {
  pub fn from_env() -> Self {
    let mut s = Self::default();
    if let Some(v) = env_bool("RANDOM_MODES") {
      s.random_modes = v;
    }
    if let Ok(v) = std::env::var("RANDOM_MAX_ATTEMPTS") {
      if let Ok(n) = v.trim().parse() {
        s.random_max_attempts = n;
      }
    }
    if let Ok(v) = std::env::var("RANDOM_TIMEOUT_MS") {
      if let Ok(n) = v.trim().parse() {
        s.random_timeout_ms = n;
      }
    }
    if let Some(v) = env_bool("RANDOM_SUPPRESS_INITIAL_EXPORT") {
      s.random_suppress_initial_export = v;
    }
    if let Ok(v) = std::env::var("DECK_EXPORTS") {
      if !v.trim().is_empty() {
        s.deck_exports = PathBuf::from(v);
      }
    }
    if let Ok(v) = std::env::var("OWNED_CARDS_DIR") {
      if !v.trim().is_empty() {
        s.owned_cards_dir = Some(PathBuf::from(v));
      }
    }
    s
  }
}

#[cfg(test)]
mod tests {
  use crate::config::*;

  #[test]
  fn defaults_are_sane() {
    let counts = IdealCounts::default();
    assert_eq!(counts.lands, 35);
    assert_eq!(counts.basic_lands, 15);
    assert_eq!(counts.fetch_lands, 3);
  }

  #[test]
  fn validation_rejects_bad_requests() {
    let mut cfg = BuildConfig::default();
    assert!(cfg.validate().is_err());
    cfg.commander = "Krenko, Mob Boss".to_string();
    cfg.bracket_level = 9;
    assert!(cfg.validate().is_err());
    cfg.bracket_level = 3;
    cfg.themes = vec!["a".into(), "b".into(), "c".into(), "d".into()];
    assert!(cfg.validate().is_err());
    cfg.themes.truncate(3);
    assert!(cfg.validate().is_ok());
  }

  #[test]
  fn request_json_roundtrip() {
    let body = r#"{
      "commander": "Krenko, Mob Boss",
      "themes": ["Goblin Kindred", "Tokens Matter"],
      "tag_mode": "AND",
      "bracket_level": 3,
      "ideal_counts": {"lands": 36, "basic_lands": 15},
      "seed": 42
    }"#;
    let cfg: BuildConfig = serde_json::from_str(body).unwrap();
    assert_eq!(cfg.ideal_counts.lands, 36);
    assert_eq!(cfg.ideal_counts.creatures, 25);
    assert_eq!(cfg.seed, 42);
    assert_eq!(cfg.tag_mode, TagMode::And);
    let back = serde_json::to_string(&cfg).unwrap();
    let cfg2: BuildConfig = serde_json::from_str(&back).unwrap();
    assert_eq!(cfg2.ideal_counts, cfg.ideal_counts);
  }
}

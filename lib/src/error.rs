use thiserror::Error;

/// Diagnostics attached to a strict-theme resolution failure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeMatchDiagnostics {
  pub resolved_themes: Vec<String>,
  pub combo_fallback: bool,
  pub synergy_fallback: bool,
  pub fallback_reason: Option<String>,
}

#[derive(Debug, Error)]
pub enum BuildError {
  #[error("invalid build request: {0}")]
  InputValidation(String),

  #[error("catalog unavailable: {0}")]
  CatalogUnavailable(String),

  #[error("constraints impossible: {constraint} (candidate pool size {pool_size})")]
  ConstraintsImpossible { constraint: String, pool_size: usize },

  #[error("no commander matched the requested themes")]
  StrictThemeNoMatch { diagnostics: ThemeMatchDiagnostics },

  #[error("deck invariant broken: {0}")]
  InternalInvariantBroken(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error("policy list parse error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("compiled catalog decode error: {0}")]
  Bincode(#[from] bincode::Error),

  #[error("bracket override parse error: {0}")]
  Yaml(#[from] serde_yaml::Error),
}

impl BuildError {
  /// Exit code mapping for the CLI: 3 invalid input, 4 catalog missing
  pub fn exit_code(&self) -> i32 {
    match self {
      BuildError::InputValidation(_) | BuildError::StrictThemeNoMatch { .. } => 3,
      BuildError::CatalogUnavailable(_) | BuildError::Io(_) => 4,
      _ => 3,
    }
  }
}

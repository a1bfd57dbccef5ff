//! # Theme tag selection and per-theme weight allocation
use crate::card::Card;
use crate::constants::KINDRED_WEIGHT_MULTIPLIERS;
use crate::error::BuildError;

pub const THEME_ROLE_NAMES: [&str; 3] = ["primary", "secondary", "tertiary"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeSelection {
  /// Lowercased tags in priority order: primary, secondary, tertiary
  pub selected: Vec<String>,
}

impl ThemeSelection {
  pub fn primary(&self) -> Option<&str> {
    self.selected.get(0).map(|s| s.as_str())
  }

  pub fn is_empty(&self) -> bool {
    self.selected.is_empty()
  }

  pub fn has_kindred(&self) -> bool {
    self.selected.iter().any(|t| t.contains("kindred") || t.contains("tribal"))
  }

  pub fn has_tag_containing(&self, needle: &str) -> bool {
    self.selected.iter().any(|t| t.contains(needle))
  }
}

/// Validate requested themes against the commander's available tags.
/// Order is preserved (primary, secondary, tertiary); at most 3.
pub fn select_themes(commander: &Card, requested: &[String]) -> Result<ThemeSelection, BuildError> {
  if requested.len() > 3 {
    return Err(BuildError::InputValidation(format!(
      "at most 3 themes supported, got {}",
      requested.len()
    )));
  }
  let mut selected: Vec<String> = Vec::new();
  for theme in requested {
    let norm = theme.trim().to_lowercase();
    if norm.is_empty() {
      continue;
    }
    if !commander.theme_tags.iter().any(|t| *t == norm) {
      return Err(BuildError::InputValidation(format!(
        "theme '{}' is not available on {}",
        theme, commander.name
      )));
    }
    if !selected.contains(&norm) {
      selected.push(norm);
    }
  }
  Ok(ThemeSelection { selected })
}

/// Per-theme allocation weights. Single theme gets 1.0; two themes split
/// 0.6/0.4; three split 0.5/0.3/0.2. Kindred/tribal tags get their slot
/// multiplier, then weights renormalize: down-scaled when over 1.0, otherwise
/// the remainder is spread over the unboosted slots proportionally.
pub fn theme_weights(selected: &[String]) -> Vec<f64> {
  let base: &[f64] = match selected.len() {
    0 => return Vec::new(),
    1 => &[1.0],
    2 => &[0.6, 0.4],
    _ => &[0.5, 0.3, 0.2],
  };
  if selected.len() == 1 {
    return vec![1.0];
  }
  let mut weights: Vec<f64> = Vec::with_capacity(selected.len());
  let mut boosted = vec![false; selected.len()];
  for (i, tag) in selected.iter().enumerate() {
    let mut w = base[i];
    if tag.contains("kindred") || tag.contains("tribal") {
      w *= KINDRED_WEIGHT_MULTIPLIERS[i];
      boosted[i] = true;
    }
    weights.push(w);
  }
  let total: f64 = weights.iter().sum();
  if total > 1.0 {
    for w in weights.iter_mut() {
      *w /= total;
    }
  } else {
    let remainder = 1.0 - total;
    let unboosted_base: f64 =
      (0..selected.len()).filter(|i| !boosted[*i]).map(|i| base[i]).sum();
    if remainder > 1e-6 && unboosted_base > 0.0 {
      for i in 0..selected.len() {
        if !boosted[i] {
          weights[i] += remainder * (base[i] / unboosted_base);
        }
      }
    }
  }
  weights
}

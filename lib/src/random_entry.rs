//! # Random-mode commander selection
//!
//! Deterministic commander selection from a theme-filtered pool with a
//! graceful fallback ladder: AND of all requested themes, then pair
//! combinations, then primary alone, then a token-synergy sweep, then the
//! full pool. Strict mode turns fallbacks into errors instead.
use crate::builder::{BuildResult, DeckBuilder};
use crate::catalog::Catalog;
use crate::compliance::PolicyStore;
use crate::config::BuildConfig;
use crate::constants;
use crate::error::{BuildError, ThemeMatchDiagnostics};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

/// Feasibility filters for the selection loop. Deliberately minimal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomConstraints {
  pub reject_all: bool,
  pub reject_names: Vec<String>,
  pub require_min_candidates: Option<usize>,
}

impl RandomConstraints {
  fn candidate_ok(&self, candidate: &str) -> bool {
    if self.reject_all {
      return false;
    }
    !self.reject_names.iter().any(|n| n == candidate)
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RandomSelection {
  pub seed: u64,
  pub commander: String,
  pub primary_theme: Option<String>,
  pub secondary_theme: Option<String>,
  pub tertiary_theme: Option<String>,
  pub resolved_themes: Vec<String>,
  pub combo_fallback: bool,
  pub synergy_fallback: bool,
  pub fallback_reason: Option<String>,
  pub attempts_tried: u32,
  pub timeout_hit: bool,
  pub retries_exhausted: bool,
  pub auto_fill_applied: bool,
  pub auto_filled_themes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RandomOptions {
  pub seed: u64,
  pub attempts: u32,
  pub timeout: Duration,
  pub constraints: RandomConstraints,
  pub strict_theme_match: bool,
  pub auto_fill_secondary: bool,
  pub auto_fill_tertiary: bool,
}

impl Default for RandomOptions {
  fn default() -> Self {
    Self {
      seed: 0,
      attempts: constants::RANDOM_DEFAULT_ATTEMPTS,
      timeout: Duration::from_millis(constants::RANDOM_DEFAULT_TIMEOUT_MS),
      constraints: RandomConstraints::default(),
      strict_theme_match: false,
      auto_fill_secondary: false,
      auto_fill_tertiary: false,
    }
  }
}

fn normalize(theme: Option<&str>) -> Option<String> {
  theme.map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty())
}

/// Intersect commander rows carrying every requested tag (exact membership
/// via the catalog tag index)
fn and_filter(catalog: &Catalog, commanders: &BTreeSet<usize>, required: &[&str]) -> Vec<usize> {
  let mut result: Option<BTreeSet<usize>> = None;
  for tag in required {
    let rows: BTreeSet<usize> =
      catalog.rows_with_tag(tag).iter().copied().filter(|r| commanders.contains(r)).collect();
    if rows.is_empty() {
      return Vec::new();
    }
    result = Some(match result {
      Some(acc) => acc.intersection(&rows).copied().collect(),
      None => rows,
    });
    if result.as_ref().map(|s| s.is_empty()).unwrap_or(false) {
      return Vec::new();
    }
  }
  result.map(|s| s.into_iter().collect()).unwrap_or_default()
}

struct LadderResult {
  rows: Vec<usize>,
  diagnostics: ThemeMatchDiagnostics,
}

/// The multi-theme fallback ladder (P = primary, S = secondary, T = tertiary):
/// P&S&T, P&S, P&T, P, token synergy on P, full pool.
fn filter_multi(
  catalog: &Catalog,
  primary: Option<&str>,
  secondary: Option<&str>,
  tertiary: Option<&str>,
) -> LadderResult {
  let commanders: BTreeSet<usize> = catalog.commander_pool().into_iter().collect();
  let mut diag = ThemeMatchDiagnostics::default();
  let p = normalize(primary);
  let s = normalize(secondary);
  let t = normalize(tertiary);

  if let (Some(p), Some(s), Some(t)) = (&p, &s, &t) {
    let rows = and_filter(catalog, &commanders, &[p.as_str(), s.as_str(), t.as_str()]);
    if !rows.is_empty() {
      diag.resolved_themes = vec![p.clone(), s.clone(), t.clone()];
      return LadderResult { rows, diagnostics: diag };
    }
  }
  if let (Some(p), Some(s)) = (&p, &s) {
    let rows = and_filter(catalog, &commanders, &[p.as_str(), s.as_str()]);
    if !rows.is_empty() {
      if t.is_some() {
        diag.combo_fallback = true;
        diag.fallback_reason =
          Some("No commanders matched all three themes; using Primary+Secondary".to_string());
      }
      diag.resolved_themes = vec![p.clone(), s.clone()];
      return LadderResult { rows, diagnostics: diag };
    }
  }
  if let (Some(p), Some(t)) = (&p, &t) {
    let rows = and_filter(catalog, &commanders, &[p.as_str(), t.as_str()]);
    if !rows.is_empty() {
      if s.is_some() {
        diag.combo_fallback = true;
        diag.fallback_reason =
          Some("No commanders matched requested combinations; using Primary+Tertiary".to_string());
      }
      diag.resolved_themes = vec![p.clone(), t.clone()];
      return LadderResult { rows, diagnostics: diag };
    }
  }
  if let Some(p) = &p {
    let rows = and_filter(catalog, &commanders, &[p.as_str()]);
    if !rows.is_empty() {
      if s.is_some() || t.is_some() {
        diag.combo_fallback = true;
        diag.fallback_reason =
          Some("No multi-theme combination matched; using Primary only".to_string());
      }
      diag.resolved_themes = vec![p.clone()];
      return LadderResult { rows, diagnostics: diag };
    }
  }
  // Synergy fallback: tokenize the primary and union direct tag hits, then
  // substring hits over the tag index keys
  if let Some(p) = &p {
    let tokens: Vec<String> = p
      .replace('-', " ")
      .split_whitespace()
      .map(|w| w.to_string())
      .collect();
    let mut hits: BTreeSet<usize> = BTreeSet::new();
    let mut matched: Vec<String> = Vec::new();
    for token in &tokens {
      let rows: Vec<usize> =
        catalog.rows_with_tag(token).iter().copied().filter(|r| commanders.contains(r)).collect();
      if !rows.is_empty() {
        if !matched.contains(token) {
          matched.push(token.clone());
        }
        hits.extend(rows);
      }
    }
    if hits.is_empty() {
      for token in &tokens {
        for (tag, rows) in catalog.tag_index_entries() {
          if tag.contains(token.as_str()) {
            let filtered: Vec<usize> =
              rows.iter().copied().filter(|r| commanders.contains(r)).collect();
            if !filtered.is_empty() {
              if !matched.contains(tag) {
                matched.push(tag.clone());
              }
              hits.extend(filtered);
            }
          }
        }
      }
      matched.sort();
    }
    if !hits.is_empty() {
      diag.resolved_themes = matched;
      diag.combo_fallback = true;
      diag.synergy_fallback = true;
      diag.fallback_reason =
        Some("Primary theme had no direct matches; using synergy overlap".to_string());
      return LadderResult { rows: hits.into_iter().collect(), diagnostics: diag };
    }
  }
  // Full pool fallback
  diag.resolved_themes = Vec::new();
  diag.combo_fallback = true;
  diag.synergy_fallback = true;
  diag.fallback_reason = Some("No theme matches found; using full commander pool".to_string());
  LadderResult { rows: commanders.into_iter().collect(), diagnostics: diag }
}

/// Tags eligible for auto-fill: present on enough cards to be meaningful but
/// covering no more than the configured share of the catalog, and not on the
/// excluded list of overly-broad themes
fn theme_allowed_for_random(catalog: &Catalog, tag: &str) -> bool {
  if constants::RANDOM_THEME_EXCLUDED.iter().any(|x| tag.eq_ignore_ascii_case(x)) {
    return false;
  }
  let total = catalog.len().max(1);
  let covered = catalog.rows_with_tag(tag).len();
  (covered as f64 / total as f64) <= constants::RANDOM_THEME_MAX_SHARE
}

/// Choose a commander deterministically from the theme-filtered pool
pub fn select_random_commander(
  catalog: &Catalog,
  primary: Option<&str>,
  secondary: Option<&str>,
  tertiary: Option<&str>,
  options: &RandomOptions,
) -> Result<RandomSelection, BuildError> {
  let ladder = filter_multi(catalog, primary, secondary, tertiary);
  let diag = ladder.diagnostics;
  if options.strict_theme_match
    && primary.is_some()
    && (ladder.rows.is_empty() || diag.combo_fallback || diag.synergy_fallback)
  {
    return Err(BuildError::StrictThemeNoMatch {
      diagnostics: ThemeMatchDiagnostics {
        resolved_themes: if diag.synergy_fallback { Vec::new() } else { diag.resolved_themes },
        combo_fallback: diag.combo_fallback,
        synergy_fallback: diag.synergy_fallback,
        fallback_reason: diag.fallback_reason,
      },
    });
  }

  let mut names: Vec<String> =
    ladder.rows.iter().map(|r| catalog.cards[*r].name.clone()).collect();
  names.sort();
  names.dedup();
  if names.is_empty() {
    let mut all: Vec<String> =
      catalog.commander_pool().into_iter().map(|r| catalog.cards[r].name.clone()).collect();
    all.sort();
    names = all;
  }
  if names.is_empty() {
    return Err(BuildError::CatalogUnavailable("no commanders in catalog".to_string()));
  }
  if let Some(min) = options.constraints.require_min_candidates {
    if names.len() < min {
      return Err(BuildError::ConstraintsImpossible {
        constraint: format!("require_min_candidates >= {}", min),
        pool_size: names.len(),
      });
    }
  }

  let mut rng = SmallRng::seed_from_u64(options.seed);
  let attempts = options.attempts.max(1);
  let start = Instant::now();
  let mut pick: Option<String> = None;
  let mut attempts_tried = 0;
  let mut timeout_hit = false;
  for _ in 0..attempts {
    if start.elapsed() > options.timeout {
      timeout_hit = true;
      break;
    }
    attempts_tried += 1;
    let idx = rng.gen_range(0, names.len());
    let candidate = &names[idx];
    if options.constraints.candidate_ok(candidate) {
      pick = Some(candidate.clone());
      break;
    }
  }
  let retries_exhausted = pick.is_none() && !timeout_hit && attempts_tried >= attempts;
  let commander = pick.unwrap_or_else(|| {
    // attempts/timeout exhausted: deterministic seed-modulo fallback
    names[(options.seed % names.len() as u64) as usize].clone()
  });

  // Auto-fill missing theme slots from the commander's remaining tags,
  // restricted to the curated random theme pool
  let mut secondary_out = normalize(secondary);
  let mut tertiary_out = normalize(tertiary);
  let mut auto_filled: Vec<String> = Vec::new();
  if options.auto_fill_secondary || options.auto_fill_tertiary {
    if let Some(card) = catalog.card_from_name(&commander) {
      let taken: Vec<String> = normalize(primary)
        .into_iter()
        .chain(secondary_out.clone())
        .chain(tertiary_out.clone())
        .collect();
      let mut eligible: Vec<String> = card
        .theme_tags
        .iter()
        .filter(|t| !taken.contains(t) && theme_allowed_for_random(catalog, t))
        .cloned()
        .collect();
      eligible.sort();
      if options.auto_fill_secondary && secondary_out.is_none() && !eligible.is_empty() {
        let idx = rng.gen_range(0, eligible.len());
        let tag = eligible.remove(idx);
        auto_filled.push(tag.clone());
        secondary_out = Some(tag);
      }
      if options.auto_fill_tertiary && tertiary_out.is_none() && !eligible.is_empty() {
        let idx = rng.gen_range(0, eligible.len());
        let tag = eligible.remove(idx);
        auto_filled.push(tag.clone());
        tertiary_out = Some(tag);
      }
    }
  }
  let mut resolved = diag.resolved_themes.clone();
  for tag in &auto_filled {
    if !resolved.contains(tag) {
      resolved.push(tag.clone());
    }
  }

  Ok(RandomSelection {
    seed: options.seed,
    commander,
    primary_theme: normalize(primary),
    secondary_theme: secondary_out,
    tertiary_theme: tertiary_out,
    resolved_themes: resolved,
    combo_fallback: diag.combo_fallback,
    synergy_fallback: diag.synergy_fallback,
    fallback_reason: diag.fallback_reason,
    attempts_tried,
    timeout_hit,
    retries_exhausted,
    auto_fill_applied: !auto_filled.is_empty(),
    auto_filled_themes: auto_filled,
  })
}

/// Random commander selection followed by a full deterministic build. The
/// resolved themes are narrowed to tags the chosen commander actually has.
pub fn build_random_full_deck(
  catalog: &Catalog,
  policies: &PolicyStore,
  base_config: BuildConfig,
  primary: Option<&str>,
  secondary: Option<&str>,
  tertiary: Option<&str>,
  options: &RandomOptions,
) -> Result<(RandomSelection, BuildResult), BuildError> {
  let selection = select_random_commander(catalog, primary, secondary, tertiary, options)?;
  let commander = catalog
    .card_from_name(&selection.commander)
    .ok_or_else(|| BuildError::InputValidation("random pick missing from catalog".to_string()))?;
  let mut config = base_config;
  config.commander = selection.commander.clone();
  config.seed = options.seed;
  config.themes = selection
    .resolved_themes
    .iter()
    .filter(|t| commander.theme_tags.contains(t))
    .take(3)
    .cloned()
    .collect();
  let mut result = DeckBuilder::new(catalog, config)?.run(policies)?;
  result.diagnostics.fallback = selection.combo_fallback || selection.synergy_fallback;
  result.diagnostics.combo_fallback = selection.combo_fallback;
  result.diagnostics.synergy_fallback = selection.synergy_fallback;
  result.diagnostics.fallback_reason = selection.fallback_reason.clone();
  result.diagnostics.attempts = selection.attempts_tried;
  result.diagnostics.resolved_themes = selection.resolved_themes.clone();
  Ok((selection, result))
}

#[cfg(test)]
mod tests {
  use crate::error::BuildError;
  use crate::random_entry::*;
  use crate::testutil;

  fn options(seed: u64) -> RandomOptions {
    RandomOptions { seed, ..RandomOptions::default() }
  }

  #[test]
  fn direct_theme_match_no_fallback() {
    let catalog = testutil::fixture_catalog();
    let sel =
      select_random_commander(&catalog, Some("Goblin Kindred"), None, None, &options(9)).unwrap();
    assert!(!sel.combo_fallback);
    assert_eq!(sel.resolved_themes, vec!["goblin kindred"]);
    assert!(sel.commander.starts_with("Krenko"));
  }

  #[test]
  fn pair_fallback_marks_combo() {
    let catalog = testutil::fixture_catalog();
    // no commander has both goblin kindred and an impossible theme
    let sel = select_random_commander(
      &catalog,
      Some("Goblin Kindred"),
      Some("Tokens Matter"),
      Some("Lifegain"),
      &options(999),
    )
    .unwrap();
    assert!(sel.combo_fallback);
    assert!(!sel.synergy_fallback);
    assert_eq!(sel.resolved_themes, vec!["goblin kindred", "tokens matter"]);
  }

  #[test]
  fn synergy_fallback_tokenizes_primary() {
    let catalog = testutil::fixture_catalog();
    let sel =
      select_random_commander(&catalog, Some("goblin swarm"), None, None, &options(5)).unwrap();
    assert!(sel.synergy_fallback);
    assert!(sel.combo_fallback);
    assert!(!sel.resolved_themes.is_empty());
  }

  #[test]
  fn strict_mode_raises_on_no_match() {
    let catalog = testutil::fixture_catalog();
    let mut opts = options(1);
    opts.strict_theme_match = true;
    let err =
      select_random_commander(&catalog, Some("Impossible Theme XYZ"), None, None, &opts)
        .unwrap_err();
    match err {
      BuildError::StrictThemeNoMatch { diagnostics } => {
        assert!(diagnostics.resolved_themes.is_empty());
        assert!(diagnostics.synergy_fallback);
      }
      other => panic!("unexpected error {:?}", other),
    }
  }

  #[test]
  fn seeded_selection_is_deterministic() {
    let catalog = testutil::fixture_catalog();
    let a = select_random_commander(&catalog, None, None, None, &options(77)).unwrap();
    let b = select_random_commander(&catalog, None, None, None, &options(77)).unwrap();
    assert_eq!(a.commander, b.commander);
  }

  #[test]
  fn reject_names_falls_back_to_modulo() {
    let catalog = testutil::fixture_catalog();
    let mut opts = options(3);
    opts.constraints.reject_all = true;
    let sel = select_random_commander(&catalog, None, None, None, &opts).unwrap();
    assert!(sel.retries_exhausted);
    assert!(!sel.commander.is_empty());
  }

  #[test]
  fn min_candidates_constraint_surfaces() {
    let catalog = testutil::fixture_catalog();
    let mut opts = options(3);
    opts.constraints.require_min_candidates = Some(50);
    let err = select_random_commander(&catalog, None, None, None, &opts).unwrap_err();
    match err {
      BuildError::ConstraintsImpossible { pool_size, .. } => assert!(pool_size < 50),
      other => panic!("unexpected error {:?}", other),
    }
  }

  #[test]
  fn full_random_build_completes() {
    let catalog = testutil::fixture_catalog();
    let policies = crate::compliance::PolicyStore::fallback();
    let mut base = testutil::krenko_config();
    base.commander = String::new();
    base.themes = Vec::new();
    let mut opts = options(42);
    opts.auto_fill_secondary = true;
    let (selection, result) = build_random_full_deck(
      &catalog,
      &policies,
      base,
      Some("Goblin Kindred"),
      None,
      None,
      &opts,
    )
    .unwrap();
    assert!(!selection.commander.is_empty());
    let total: u32 = result.decklist.iter().map(|e| e.count).sum();
    assert_eq!(total, 100);
  }
}

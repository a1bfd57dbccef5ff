//! # Build orchestrator
//!
//! A flat phase pipeline over shared build state. Each phase is a free
//! function taking `&mut DeckBuilder`; the orchestrator drives them in order
//! and owns the single seeded RNG threaded through every stochastic decision.
use crate::brackets::{load_bracket, BracketDefinition, POLICY_CATEGORIES};
use crate::card::{Card, ColorSet};
use crate::catalog::Catalog;
use crate::compliance::{self, ComplianceReport, PolicyStore, Status};
use crate::config::{BuildConfig, EnforcementMode};
use crate::constants;
use crate::deck::{basic_floor, DeckEntry, DeckLibrary, Role};
use crate::enforcement;
use crate::error::BuildError;
use crate::lands;
use crate::resolver::{self, normalize_card_name};
use crate::summary::{self, DeckSummary};
use crate::themes::{select_themes, ThemeSelection};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashSet;

/// A land suggested by theme tags after the utility step. `min_artifacts`
/// models the only conditional suggestion in the table.
#[derive(Debug, Clone)]
pub struct LandSuggestion {
  pub name: String,
  pub reason: String,
  pub flex: bool,
  pub min_artifacts: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecklistEntry {
  pub name: String,
  pub count: u32,
  pub role: Role,
  pub sub_role: Option<String>,
  pub added_by: String,
  pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildDiagnostics {
  pub seed: u64,
  pub attempts: u32,
  pub elapsed_ms: u64,
  pub fallback: bool,
  pub resolved_themes: Vec<String>,
  pub combo_fallback: bool,
  pub synergy_fallback: bool,
  pub fallback_reason: Option<String>,
  pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildResult {
  pub commander: String,
  pub decklist: Vec<DecklistEntry>,
  pub summary: DeckSummary,
  pub compliance: ComplianceReport,
  pub diagnostics: BuildDiagnostics,
}

#[derive(Debug)]
pub struct DeckBuilder<'a> {
  pub catalog: &'a Catalog,
  pub config: BuildConfig,
  pub bracket: BracketDefinition,
  pub commander_row: usize,
  pub commander_name: String,
  pub color_identity: ColorSet,
  pub themes: ThemeSelection,
  /// Row ids inside the commander's color identity, minus exclusions
  pub pool: Vec<usize>,
  pub library: DeckLibrary,
  pub rng: SmallRng,
  pub dynamic_fetch_cap: u32,
  pub landfall_fetch_bump_applied: bool,
  /// Land slots credited to MDFC land faces after the basics swap
  pub mdfc_land_credit: u32,
  pub suggested_lands: Vec<LandSuggestion>,
  pub warnings: Vec<String>,
  owned_lower: HashSet<String>,
  excluded_lower: HashSet<String>,
}

impl<'a> DeckBuilder<'a> {
  pub fn new(catalog: &'a Catalog, config: BuildConfig) -> Result<Self, BuildError> {
    config.validate()?;
    if catalog.is_empty() {
      return Err(BuildError::CatalogUnavailable("catalog has no cards".to_string()));
    }
    let resolved = resolver::resolve_commander(catalog, &config.commander);
    let commander_name = match resolved.exact {
      Some(name) => name,
      None => {
        let choices: Vec<String> =
          resolved.candidates.iter().map(|c| format!("{} ({})", c.name, c.score)).collect();
        return Err(BuildError::InputValidation(format!(
          "unknown commander '{}'; closest: {}",
          config.commander,
          choices.join(", ")
        )));
      }
    };
    let commander_row = catalog
      .row_from_name(&commander_name)
      .ok_or_else(|| BuildError::InputValidation(format!("commander '{}' not found", commander_name)))?;
    let commander = &catalog.cards[commander_row];
    let themes = select_themes(commander, &config.themes)?;
    let bracket = load_bracket(config.bracket_level, None)?;
    let color_identity = commander.color_identity;

    let owned_lower: HashSet<String> =
      config.owned_names.iter().map(|n| normalize_card_name(n)).collect();
    let excluded_lower: HashSet<String> =
      config.exclude_cards.iter().map(|n| normalize_card_name(n)).collect();
    let owned_only = if config.use_owned_only { Some(&owned_lower) } else { None };
    let pool = catalog.build_pool(color_identity, &excluded_lower, owned_only);

    let rng = SmallRng::seed_from_u64(config.seed);
    let mut builder = Self {
      catalog,
      bracket,
      commander_row,
      commander_name: commander_name.clone(),
      color_identity,
      themes,
      pool,
      library: DeckLibrary::new(),
      rng,
      dynamic_fetch_cap: constants::FETCH_LAND_MAX_CAP,
      landfall_fetch_bump_applied: false,
      mdfc_land_credit: 0,
      suggested_lands: Vec::new(),
      warnings: Vec::new(),
      owned_lower,
      excluded_lower,
      config,
    };
    builder.add_commander();
    Ok(builder)
  }

  fn add_commander(&mut self) {
    let card = &self.catalog.cards[self.commander_row];
    self.library.add(
      &card.name.clone(),
      DeckEntry {
        count: 1,
        card_type: card.primary_type().to_string(),
        mana_cost: card.mana_cost_string.clone(),
        mana_value: card.mana_value,
        creature_types: card.creature_types.clone(),
        tags: card.theme_tags.clone(),
        role: Role::Commander,
        sub_role: None,
        added_by: "commander".to_string(),
        trigger_tag: None,
        synergy: None,
        added_at: 0,
      },
    );
  }

  // ---------------------------
  // State helpers shared by phases
  // ---------------------------
  pub fn card(&self, row: usize) -> &Card {
    &self.catalog.cards[row]
  }

  pub fn commander(&self) -> &Card {
    &self.catalog.cards[self.commander_row]
  }

  pub fn land_target(&self) -> u32 {
    self.config.ideal_counts.lands
  }

  pub fn basic_floor_value(&self) -> u32 {
    basic_floor(self.config.ideal_counts.basic_lands)
  }

  pub fn current_land_count(&self) -> u32 {
    self.library.land_count()
  }

  /// Commander tags plus selected tags, lowercased (staple conditions)
  pub fn all_known_tags(&self) -> Vec<String> {
    let mut tags: Vec<String> = self.commander().theme_tags.clone();
    for t in &self.themes.selected {
      if !tags.contains(t) {
        tags.push(t.clone());
      }
    }
    tags
  }

  pub fn is_owned(&self, name: &str) -> bool {
    self.owned_lower.contains(&normalize_card_name(name))
  }

  /// Sampling weight multiplier for owned cards when prefer_owned is set
  pub fn owned_weight(&self, name: &str) -> f64 {
    if self.config.prefer_owned && self.is_owned(name) {
      constants::PREFER_OWNED_WEIGHT_MULTIPLIER
    } else {
      1.0
    }
  }

  /// Stable reorder putting owned rows first while preserving prior sort
  pub fn prefer_owned_first(&self, rows: &mut Vec<usize>) {
    if !self.config.prefer_owned || self.owned_lower.is_empty() {
      return;
    }
    let catalog = self.catalog;
    let owned = &self.owned_lower;
    rows.sort_by_key(|r| !owned.contains(&normalize_card_name(&catalog.cards[*r].name)));
  }

  /// Drop rows carrying tags of hard-disallowed bracket categories
  pub fn bracket_prefilter(&self, rows: Vec<usize>) -> Vec<usize> {
    let disallowed: Vec<&str> = POLICY_CATEGORIES
      .iter()
      .copied()
      .filter(|c| self.bracket.limits.disallows(c))
      .collect();
    if disallowed.is_empty() {
      return rows;
    }
    rows
      .into_iter()
      .filter(|r| {
        let card = &self.catalog.cards[*r];
        !disallowed.iter().any(|c| compliance::tags_flag_category(&card.theme_tags, c))
      })
      .collect()
  }

  /// Pool rows not yet in the library, in pool order
  pub fn available_rows(&self) -> Vec<usize> {
    self
      .pool
      .iter()
      .copied()
      .filter(|r| !self.library.contains(&self.catalog.cards[*r].name))
      .collect()
  }

  pub fn warn(&mut self, message: String) {
    warn!("{}", message);
    self.warnings.push(message);
  }

  // ---------------------------
  // Library mutation
  // ---------------------------
  fn entry_from_card(
    card: &Card,
    role: Role,
    sub_role: Option<&str>,
    added_by: &str,
    trigger_tag: Option<String>,
    synergy: Option<u32>,
  ) -> DeckEntry {
    DeckEntry {
      count: 1,
      card_type: card.primary_type().to_string(),
      mana_cost: card.mana_cost_string.clone(),
      mana_value: card.mana_value,
      creature_types: card.creature_types.clone(),
      tags: card.theme_tags.clone(),
      role,
      sub_role: sub_role.map(|s| s.to_string()),
      added_by: added_by.to_string(),
      trigger_tag,
      synergy,
      added_at: 0,
    }
  }

  /// Add one copy of a catalog card, enforcing color identity, exclusions,
  /// owned-only mode and the singleton rule. Returns false if skipped.
  pub fn add_card(
    &mut self,
    name: &str,
    role: Role,
    sub_role: Option<&str>,
    added_by: &str,
    trigger_tag: Option<String>,
    synergy: Option<u32>,
  ) -> bool {
    let row = match self.catalog.row_from_name(name) {
      Some(r) => r,
      None => {
        debug!("add_card: '{}' not in catalog; skipped", name);
        return false;
      }
    };
    let card = &self.catalog.cards[row];
    if self.library.contains(&card.name) {
      return false;
    }
    if !card.color_identity.is_subset(self.color_identity) {
      debug!("add_card: '{}' outside color identity; skipped", card.name);
      return false;
    }
    if self.excluded_lower.contains(&normalize_card_name(&card.name)) {
      return false;
    }
    if self.config.use_owned_only && !self.is_owned(&card.name) {
      return false;
    }
    let display = card.name.clone();
    let entry = Self::entry_from_card(card, role, sub_role, added_by, trigger_tag, synergy);
    self.library.add(&display, entry);
    true
  }

  /// Add `count` copies of a basic land. Basics are synthesized when the
  /// catalog does not carry them as rows.
  pub fn add_basic(&mut self, name: &str, count: u32, snow: bool, added_by: &str) {
    if count == 0 {
      return;
    }
    let entry = match self.catalog.card_from_name(name) {
      Some(card) => {
        let mut e = Self::entry_from_card(
          card,
          Role::Basic,
          Some(if snow { "snow-basic" } else { "basic" }),
          added_by,
          if snow { Some("Snow".to_string()) } else { None },
          None,
        );
        e.count = count;
        e
      }
      None => DeckEntry {
        count,
        card_type: "Basic Land".to_string(),
        mana_cost: String::new(),
        mana_value: 0.0,
        creature_types: Vec::new(),
        tags: Vec::new(),
        role: Role::Basic,
        sub_role: Some(if snow { "snow-basic" } else { "basic" }.to_string()),
        added_by: added_by.to_string(),
        trigger_tag: if snow { Some("Snow".to_string()) } else { None },
        synergy: None,
        added_at: 0,
      },
    };
    self.library.add(name, entry);
  }

  // ---------------------------
  // Pre-land phases
  // ---------------------------
  /// Inject must-include cards as locked entries with fuzzy correction
  fn apply_includes(&mut self) {
    let includes = self.config.include_cards.clone();
    for raw in includes {
      let name = match self.catalog.card_from_name(&raw) {
        Some(card) => card.name.clone(),
        None => {
          // fuzzy-correct near misses against the pool
          let query = resolver::normalize_punctuation(&raw);
          let mut best: Option<(f64, String)> = None;
          for row in &self.pool {
            let card = &self.catalog.cards[*row];
            let score = resolver::fuzzy_score(&query, &card.name);
            if best.as_ref().map(|(s, _)| score > *s).unwrap_or(true) {
              best = Some((score, card.name.clone()));
            }
          }
          match best {
            Some((score, name)) if score >= constants::EXACT_NAME_THRESHOLD as f64 => {
              info!("include '{}' corrected to '{}'", raw, name);
              name
            }
            _ => {
              self.warn(format!("include '{}' not found in pool; skipped", raw));
              continue;
            }
          }
        }
      };
      let role = match self.catalog.card_from_name(&name) {
        Some(c) if c.is_land() => Role::Utility,
        Some(c) if c.is_creature() => Role::Creature,
        _ => Role::Flex,
      };
      if !self.add_card(&name, role, Some("include"), "lock", None, None) {
        self.warn(format!("include '{}' could not be added (identity/duplicate)", name));
      }
    }
  }

  /// Multi-copy archetype: add the configured card as a counted stack
  fn apply_multi_copy_archetype(&mut self) {
    let id = match &self.config.multi_copy_archetype_id {
      Some(id) => id.clone(),
      None => return,
    };
    let archetype = match constants::archetype_by_id(&id) {
      Some(a) => a,
      None => {
        self.warn(format!("unknown multi-copy archetype '{}'", id));
        return;
      }
    };
    let required = ColorSet::from_letters(archetype.color_identity);
    if !required.is_subset(self.color_identity) {
      self.warn(format!("archetype '{}' outside commander colors; skipped", archetype.name));
      return;
    }
    let reserved_lands = self.land_target();
    let room = constants::DECK_SIZE
      .saturating_sub(self.library.total_count())
      .saturating_sub(reserved_lands);
    let mut count = archetype.default_count.min(room);
    if let Some(cap) = archetype.printed_cap {
      count = count.min(cap);
    }
    if count == 0 {
      return;
    }
    let role = if archetype.creature { Role::Creature } else { Role::ThemeSpell };
    let entry = match self.catalog.card_from_name(archetype.name) {
      Some(card) => {
        if !card.color_identity.is_subset(self.color_identity) {
          return;
        }
        let mut e = Self::entry_from_card(card, role, Some("multi-copy"), "multi_copy", None, None);
        e.count = count;
        e
      }
      None => {
        self.warn(format!("archetype card '{}' not in catalog; skipped", archetype.name));
        return;
      }
    };
    info!("multi-copy archetype '{}': {} copies", archetype.name, count);
    self.library.add(archetype.name, entry);
  }

  /// Trade basics out for MDFC land-faced spells already in the library
  fn swap_mdfc_basics(&mut self) {
    if !self.config.swap_mdfc_basics {
      return;
    }
    let floor = self.basic_floor_value();
    let mdfc_count = self
      .library
      .iter_ordered()
      .filter(|(name, e)| {
        !e.is_land()
          && self
            .catalog
            .card_from_name(name)
            .map(|c| c.back_face_is_land())
            .unwrap_or(false)
      })
      .count() as u32;
    let mut trimmed = 0;
    for _ in 0..mdfc_count {
      if self.library.count_basic_lands() <= floor {
        break;
      }
      match self.library.choose_basic_to_trim() {
        Some(name) if self.library.decrement(&name) => trimmed += 1,
        _ => break,
      }
    }
    if trimmed > 0 {
      self.mdfc_land_credit = trimmed;
      info!("MDFC basics swap: trimmed {} basics for {} land faces", trimmed, mdfc_count);
    }
  }

  /// Try to complete detected combo pairs when the user asked for combos
  fn apply_combo_preference(&mut self, policies: &PolicyStore) {
    if !self.config.prefer_combos || self.config.combo_target_count == 0 {
      return;
    }
    let balance = self.config.combo_balance;
    let present: HashSet<String> =
      self.library.names().map(|n| compliance::canonicalize(n)).collect();
    let mut completed = 0u32;
    let pairs = policies.combos.pairs.clone();
    for pair in pairs {
      if completed >= self.config.combo_target_count {
        break;
      }
      let wanted = match balance {
        crate::config::ComboBalance::Early => pair.cheap_early,
        crate::config::ComboBalance::Late => pair.setup_dependent,
        crate::config::ComboBalance::Mix => true,
      };
      if !wanted {
        continue;
      }
      let a_in = present.contains(&compliance::canonicalize(&pair.a));
      let b_in = present.contains(&compliance::canonicalize(&pair.b));
      let missing = match (a_in, b_in) {
        (true, false) => pair.b.clone(),
        (false, true) => pair.a.clone(),
        _ => continue,
      };
      // confirm the partner is actually addable before making room for it
      let addable = self
        .catalog
        .row_from_name(&missing)
        .map(|r| {
          let card = &self.catalog.cards[r];
          card.color_identity.is_subset(self.color_identity) && !self.library.contains(&card.name)
        })
        .unwrap_or(false);
      if !addable {
        continue;
      }
      if self.library.total_count() >= constants::DECK_SIZE {
        let victim = self
          .library
          .iter_ordered()
          .filter(|(_, e)| e.role == Role::Filler)
          .map(|(n, _)| n.clone())
          .next();
        match victim {
          Some(name) => {
            self.library.remove(&name);
          }
          None => break,
        }
      }
      if self.add_card(&missing, Role::ThemeSpell, Some("combo"), "combo_preference", None, None) {
        info!("combo preference: completed {} + {}", pair.a, pair.b);
        completed += 1;
      }
    }
  }

  // ---------------------------
  // Orchestration
  // ---------------------------
  pub fn run(mut self, policies: &PolicyStore) -> Result<BuildResult, BuildError> {
    let start = std::time::Instant::now();
    self.apply_includes();
    self.apply_multi_copy_archetype();

    lands::basics::run(&mut self);
    lands::staples::run(&mut self);
    lands::kindred::run(&mut self);
    lands::fetch::run(&mut self);
    lands::duals::run(&mut self);
    lands::triples::run(&mut self);
    lands::misc::run(&mut self);
    lands::optimize::run(&mut self);

    crate::creatures::run(&mut self);
    crate::spells::run(&mut self);
    self.swap_mdfc_basics();
    self.apply_combo_preference(policies);
    if self.land_target() > 0 {
      crate::color_balance::run(&mut self, true, true);
    }
    self.final_top_up();

    self.verify_invariants()?;

    let mut compliance_report =
      compliance::evaluate_deck(&self.library, Some(&self.commander_name), &self.bracket, policies);
    if compliance_report.overall == Status::Fail
      && self.config.enforcement_mode == EnforcementMode::Enforce
    {
      compliance_report = enforcement::enforce(&mut self, policies);
    }

    let summary = summary::summarize(&self.library, self.color_identity, self.catalog);
    let decklist: Vec<DecklistEntry> = self
      .library
      .iter_ordered()
      .map(|(name, e)| DecklistEntry {
        name: name.clone(),
        count: e.count,
        role: e.role,
        sub_role: e.sub_role.clone(),
        added_by: e.added_by.clone(),
        tags: e.tags.clone(),
      })
      .collect();
    let diagnostics = BuildDiagnostics {
      seed: self.config.seed,
      attempts: 1,
      elapsed_ms: start.elapsed().as_millis() as u64,
      fallback: false,
      resolved_themes: self.themes.selected.clone(),
      combo_fallback: false,
      synergy_fallback: false,
      fallback_reason: None,
      warnings: self.warnings.clone(),
    };
    Ok(BuildResult {
      commander: self.commander_name.clone(),
      decklist,
      summary,
      compliance: compliance_report,
      diagnostics,
    })
  }

  /// Safety net for sparse pools: if earlier phases left the deck short,
  /// fill from whatever remains, lands only while the mana base is below
  /// target. A no-op for healthy builds.
  fn final_top_up(&mut self) {
    let mut progressed = true;
    while progressed && self.library.total_count() < constants::DECK_SIZE {
      progressed = false;
      let mut rows = self.available_rows();
      rows.sort_by(|a, b| {
        let ca = &self.catalog.cards[*a];
        let cb = &self.catalog.cards[*b];
        ca.rank_or_max().cmp(&cb.rank_or_max()).then_with(|| ca.name.cmp(&cb.name))
      });
      for row in rows {
        if self.library.total_count() >= constants::DECK_SIZE {
          break;
        }
        let card = &self.catalog.cards[row];
        let is_land = card.is_land();
        let effective_target = self.land_target().saturating_sub(self.mdfc_land_credit);
        if is_land && self.current_land_count() >= effective_target {
          continue;
        }
        let name = card.name.clone();
        let role = if is_land { Role::Utility } else { Role::Filler };
        if self.add_card(&name, role, Some("top-up"), "final_fill", None, None) {
          progressed = true;
        }
      }
    }
  }

  fn verify_invariants(&mut self) -> Result<(), BuildError> {
    // Color identity must hold for every entry with a catalog row
    for (name, _entry) in self.library.iter_ordered() {
      if let Some(card) = self.catalog.card_from_name(name) {
        if !card.color_identity.is_subset(self.color_identity) {
          return Err(BuildError::InternalInvariantBroken(format!(
            "'{}' violates color identity",
            name
          )));
        }
      }
    }
    let total = self.library.total_count();
    if total != constants::DECK_SIZE {
      // Shortfall on an exhausted pool is a logged partial result; anything
      // else is a broken invariant
      let addable = self
        .available_rows()
        .into_iter()
        .filter(|r| !self.catalog.cards[*r].is_land())
        .count();
      if total < constants::DECK_SIZE && addable == 0 {
        self.warn(format!("deck short at {} cards: card pool exhausted", total));
      } else {
        return Err(BuildError::InternalInvariantBroken(format!(
          "deck has {} cards, expected {}",
          total,
          constants::DECK_SIZE
        )));
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use crate::builder::*;
  use crate::compliance::PolicyStore;
  use crate::testutil;

  #[test]
  fn unknown_commander_is_input_error() {
    let catalog = testutil::fixture_catalog();
    let mut config = testutil::krenko_config();
    config.commander = "Zzyzx, Nobody".to_string();
    let err = DeckBuilder::new(&catalog, config).unwrap_err();
    assert_eq!(err.exit_code(), 3);
  }

  #[test]
  fn theme_not_on_commander_rejected() {
    let catalog = testutil::fixture_catalog();
    let mut config = testutil::krenko_config();
    config.themes = vec!["Spellslinger".to_string()];
    assert!(DeckBuilder::new(&catalog, config).is_err());
  }

  #[test]
  fn commander_seeds_library() {
    let catalog = testutil::fixture_catalog();
    let builder = DeckBuilder::new(&catalog, testutil::krenko_config()).unwrap();
    assert_eq!(builder.library.total_count(), 1);
    let entry = builder.library.get("Krenko, Mob Boss").unwrap();
    assert!(entry.is_commander());
  }

  #[test]
  fn full_build_hits_one_hundred() {
    let catalog = testutil::fixture_catalog();
    let result = DeckBuilder::new(&catalog, testutil::krenko_config())
      .unwrap()
      .run(&PolicyStore::fallback())
      .unwrap();
    let total: u32 = result.decklist.iter().map(|e| e.count).sum();
    assert_eq!(total, 100);
    assert_eq!(result.summary.type_breakdown.total, 100);
  }

  #[test]
  fn full_build_respects_land_target() {
    let catalog = testutil::fixture_catalog();
    let config = testutil::krenko_config();
    let lands_target = config.ideal_counts.lands;
    let result =
      DeckBuilder::new(&catalog, config).unwrap().run(&PolicyStore::fallback()).unwrap();
    let lands = result.summary.type_breakdown.counts.get("Land").copied().unwrap_or(0);
    assert!(lands <= lands_target, "{} lands over target {}", lands, lands_target);
  }

  #[test]
  fn determinism_same_seed_same_deck() {
    let catalog = testutil::fixture_catalog();
    let policies = PolicyStore::fallback();
    let a = DeckBuilder::new(&catalog, testutil::krenko_config())
      .unwrap()
      .run(&policies)
      .unwrap();
    let b = DeckBuilder::new(&catalog, testutil::krenko_config())
      .unwrap()
      .run(&policies)
      .unwrap();
    let names_a: Vec<&str> = a.decklist.iter().map(|e| e.name.as_str()).collect();
    let names_b: Vec<&str> = b.decklist.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names_a, names_b);
  }

  #[test]
  fn different_seed_differs() {
    let catalog = testutil::fixture_catalog();
    let policies = PolicyStore::fallback();
    let a = DeckBuilder::new(&catalog, testutil::krenko_config())
      .unwrap()
      .run(&policies)
      .unwrap();
    let mut config = testutil::krenko_config();
    config.seed = 777;
    let b = DeckBuilder::new(&catalog, config).unwrap().run(&policies).unwrap();
    let names_a: Vec<&str> = a.decklist.iter().map(|e| e.name.as_str()).collect();
    let names_b: Vec<&str> = b.decklist.iter().map(|e| e.name.as_str()).collect();
    assert_ne!(names_a, names_b);
  }

  #[test]
  fn singleton_holds_for_nonbasics() {
    let catalog = testutil::fixture_catalog();
    let result = DeckBuilder::new(&catalog, testutil::krenko_config())
      .unwrap()
      .run(&PolicyStore::fallback())
      .unwrap();
    let basics = crate::constants::basic_land_names();
    for entry in &result.decklist {
      if !basics.contains(entry.name.as_str()) {
        assert_eq!(entry.count, 1, "{} has {} copies", entry.name, entry.count);
      }
    }
  }

  #[test]
  fn excluded_card_never_appears() {
    let catalog = testutil::fixture_catalog();
    let mut config = testutil::krenko_config();
    config.exclude_cards = vec!["Sol Ring".to_string()];
    let result =
      DeckBuilder::new(&catalog, config).unwrap().run(&PolicyStore::fallback()).unwrap();
    assert!(!result.decklist.iter().any(|e| e.name == "Sol Ring"));
  }

  #[test]
  fn include_is_locked() {
    let catalog = testutil::fixture_catalog();
    let mut config = testutil::krenko_config();
    config.include_cards = vec!["Goblin Chieftain".to_string()];
    let result =
      DeckBuilder::new(&catalog, config).unwrap().run(&PolicyStore::fallback()).unwrap();
    let entry = result.decklist.iter().find(|e| e.name == "Goblin Chieftain").unwrap();
    assert_eq!(entry.added_by, "lock");
  }

  #[test]
  fn every_entry_has_provenance() {
    let catalog = testutil::fixture_catalog();
    let result = DeckBuilder::new(&catalog, testutil::krenko_config())
      .unwrap()
      .run(&PolicyStore::fallback())
      .unwrap();
    for entry in &result.decklist {
      assert!(!entry.added_by.is_empty(), "{} lacks added_by", entry.name);
    }
  }
}

//! # Bracket enforcement
//!
//! When compliance FAILs, trim over-limit categories keeping the best-ranked
//! cards, replace removals with role-consistent picks from the pool, then
//! break remaining cheap/early two-card combos by removing the card that
//! participates in the most pairs. Commander and locked entries are never
//! removed; replacements avoid every policy-listed name and anything that
//! would re-flag an over-limit category.
use crate::brackets::POLICY_CATEGORIES;
use crate::builder::DeckBuilder;
use crate::compliance::{
  self, canonicalize, ComplianceReport, EnforcementActions, PolicyStore, Status, SwapRecord,
};
use crate::deck::Role;
use std::collections::HashSet;

/// Desirability key: lower is better to keep (rank, mana value, name)
fn keep_score(builder: &DeckBuilder, name: &str) -> (u32, u32, String) {
  match builder.catalog.card_from_name(name) {
    Some(card) => (card.rank_or_max(), (card.mana_value * 100.0) as u32, name.to_string()),
    None => (u32::MAX, 9900, name.to_string()),
  }
}

fn role_matches(tags: &[String], role: Option<Role>, themes: &[String]) -> bool {
  let has = |needles: &[&str]| tags.iter().any(|t| needles.iter().any(|n| t.contains(n)));
  match role {
    Some(Role::Protection) => has(&["protection"]),
    Some(Role::CardAdvantage) => has(&["draw", "card advantage"]),
    Some(Role::Removal) => {
      has(&["removal", "spot removal"]) && !has(&["board wipe", "mass removal"])
    }
    Some(Role::Wipe) => has(&["board wipe", "mass removal"]),
    _ => themes.iter().any(|theme| tags.iter().any(|t| t.contains(theme))),
  }
}

/// Find one replacement for a removed card, preferring the same role and
/// avoiding forbidden names. Returns the name added, if any.
fn try_add_replacement(
  builder: &mut DeckBuilder,
  target_role: Option<Role>,
  forbidden: &HashSet<String>,
) -> Option<String> {
  let themes = builder.themes.selected.clone();
  let mut roles: Vec<Option<Role>> = vec![target_role];
  if !matches!(
    target_role,
    Some(Role::Protection) | Some(Role::CardAdvantage) | Some(Role::Removal) | Some(Role::Wipe)
  ) {
    roles.push(Some(Role::CardAdvantage));
    roles.push(Some(Role::Protection));
    roles.push(Some(Role::Removal));
  }
  for role in roles {
    let mut rows: Vec<usize> = builder
      .available_rows()
      .into_iter()
      .filter(|r| {
        let card = builder.card(*r);
        !card.is_land()
          && role_matches(&card.theme_tags, role, &themes)
          && !forbidden.contains(&canonicalize(&card.name))
      })
      .collect();
    rows = builder.bracket_prefilter(rows);
    rows.sort_by(|a, b| {
      let ca = builder.card(*a);
      let cb = builder.card(*b);
      ca.rank_or_max()
        .cmp(&cb.rank_or_max())
        .then_with(|| {
          ca.mana_value.partial_cmp(&cb.mana_value).unwrap_or(std::cmp::Ordering::Equal)
        })
        .then_with(|| ca.name.cmp(&cb.name))
    });
    builder.prefer_owned_first(&mut rows);
    for row in rows {
      let name = builder.card(row).name.clone();
      let add_role = target_role.unwrap_or(Role::ThemeSpell);
      if builder.add_card(&name, add_role, Some("swap-in"), "enforcement", None, None) {
        return Some(name);
      }
    }
  }
  None
}

fn remove_card(builder: &mut DeckBuilder, name: &str) -> Option<Role> {
  let entry = builder.library.get(name)?;
  if entry.is_commander() || entry.is_locked() {
    return None;
  }
  let role = entry.role;
  builder.library.remove(name);
  Some(role)
}

fn replace_removed(
  builder: &mut DeckBuilder,
  removed: &str,
  role: Option<Role>,
  forbidden: &HashSet<String>,
  actions: &mut EnforcementActions,
) {
  actions.removed.push(removed.to_string());
  // honor the user's explicit replacement pick first
  let preferred = builder
    .config
    .preferred_replacements
    .iter()
    .find(|(k, _)| canonicalize(k) == canonicalize(removed))
    .map(|(_, v)| v.clone());
  let mut added = None;
  if let Some(want) = preferred {
    let canon = canonicalize(&want);
    if !forbidden.contains(&canon) && !builder.library.contains(&want) {
      let add_role = role.unwrap_or(Role::ThemeSpell);
      if builder.add_card(&want, add_role, Some("swap-in"), "enforcement", None, None) {
        added = Some(want);
      }
    }
  }
  if added.is_none() {
    added = try_add_replacement(builder, role, forbidden);
  }
  if let Some(name) = &added {
    actions.added.push(name.clone());
  }
  actions.swaps.push(SwapRecord {
    removed: removed.to_string(),
    added,
    role: role.map(|r| r.as_str().to_string()),
  });
}

/// Run both enforcement passes and return the final report with the applied
/// actions attached. Each iteration strictly reduces over-limit counts or
/// combo count, or terminates.
pub fn enforce(builder: &mut DeckBuilder, policies: &PolicyStore) -> ComplianceReport {
  let report = compliance::evaluate_deck(
    &builder.library,
    Some(&builder.commander_name),
    &builder.bracket,
    policies,
  );
  if report.overall != Status::Fail {
    return report;
  }

  let mut forbidden = policies.prohibited_names();
  // also refuse anything that would re-flag a currently over-limit category
  let over_categories: Vec<String> = report
    .categories
    .iter()
    .filter(|(_, c)| c.status == Status::Fail)
    .map(|(k, _)| k.clone())
    .collect();
  for row in builder.available_rows() {
    let card = builder.card(row);
    if over_categories.iter().any(|c| compliance::tags_flag_category(&card.theme_tags, c)) {
      forbidden.insert(canonicalize(&card.name));
    }
  }

  let mut actions = EnforcementActions::default();

  // First pass: category trimming, keeping the best-ranked cards
  for category in &POLICY_CATEGORIES {
    let cat = match report.categories.get(*category) {
      Some(c) => c,
      None => continue,
    };
    let limit = match cat.limit {
      Some(l) => l,
      None => continue,
    };
    if cat.count <= limit {
      continue;
    }
    let mut present: Vec<String> =
      cat.flagged.iter().filter(|n| builder.library.contains(n)).cloned().collect();
    // worst keep-score first for removal
    present.sort_by_key(|n| keep_score(builder, n));
    present.reverse();
    let over = (cat.count - limit) as usize;
    let victims: Vec<String> = present.into_iter().take(over).collect();
    for name in victims {
      if let Some(role) = remove_card(builder, &name) {
        replace_removed(builder, &name, Some(role), &forbidden, &mut actions);
      }
    }
  }

  let mut final_report = compliance::evaluate_deck(
    &builder.library,
    Some(&builder.commander_name),
    &builder.bracket,
    policies,
  );

  // Second pass: break cheap/early combos still over the limit
  let combo_state = final_report
    .categories
    .get("two_card_combos")
    .and_then(|two| two.limit.map(|limit| (two.count, limit)));
  if let Some((count, limit)) = combo_state {
    if count > limit {
      {
        let mut pairs: Vec<(String, String)> = final_report
          .combos
          .iter()
          .filter(|p| p.cheap_early)
          .filter(|p| builder.library.contains(&p.a) && builder.library.contains(&p.b))
          .map(|p| (p.a.clone(), p.b.clone()))
          .collect();
        let mut blocked: HashSet<String> = HashSet::new();
        while pairs.len() as u32 > limit {
          // frequency of each card across remaining pairs
          let mut freq: Vec<(String, u32)> = Vec::new();
          for (a, b) in &pairs {
            for n in &[a.as_str(), b.as_str()] {
              match freq.iter_mut().find(|(name, _)| name == n) {
                Some((_, c)) => *c += 1,
                None => freq.push((n.to_string(), 1)),
              }
            }
          }
          // most pairs first, ties broken by worst desirability
          freq.sort_by(|a, b| {
            b.1
              .cmp(&a.1)
              .then_with(|| keep_score(builder, &b.0).cmp(&keep_score(builder, &a.0)))
          });
          let mut removed_any = false;
          for (name, _) in freq {
            if blocked.contains(&name) {
              continue;
            }
            match remove_card(builder, &name) {
              Some(role) => {
                replace_removed(builder, &name, Some(role), &forbidden, &mut actions);
                pairs.retain(|(a, b)| a != &name && b != &name);
                removed_any = true;
              }
              None => {
                blocked.insert(name);
                continue;
              }
            }
            break;
          }
          if !removed_any {
            builder.warn("enforcement: combo breaking blocked by commander/locked cards".to_string());
            break;
          }
        }
        final_report = compliance::evaluate_deck(
          &builder.library,
          Some(&builder.commander_name),
          &builder.bracket,
          policies,
        );
      }
    }
  }

  if !actions.removed.is_empty() || !actions.added.is_empty() {
    info!(
      "enforcement applied: removed {:?}, added {:?}",
      actions.removed, actions.added
    );
  }
  info!("compliance after enforcement: {:?}", final_report.overall);
  final_report.enforcement = Some(actions);
  final_report
}

//! # Creature selection: per-theme weighted allocation
use crate::builder::DeckBuilder;
use crate::config::TagMode;
use crate::constants;
use crate::deck::Role;
use crate::sampling::{uniform, weighted_sample_without_replacement};
use crate::themes::{theme_weights, THEME_ROLE_NAMES};

struct CreatureRow {
  row: usize,
  name: String,
  multi_match: usize,
  rank: u32,
  mana_value: f32,
}

fn creature_pool(builder: &DeckBuilder) -> Vec<CreatureRow> {
  let commander = builder.commander_name.clone();
  let rows: Vec<usize> = builder
    .available_rows()
    .into_iter()
    .filter(|r| {
      let card = builder.card(*r);
      card.is_creature() && card.name != commander
    })
    .collect();
  builder
    .bracket_prefilter(rows)
    .into_iter()
    .map(|row| {
      let card = builder.card(row);
      CreatureRow {
        row,
        name: card.name.clone(),
        multi_match: card.matched_tag_count(&builder.themes.selected),
        rank: card.rank_or_max(),
        mana_value: card.mana_value,
      }
    })
    .collect()
}

fn sort_pool(pool: &mut Vec<CreatureRow>) {
  pool.sort_by(|a, b| {
    b.multi_match
      .cmp(&a.multi_match)
      .then_with(|| a.rank.cmp(&b.rank))
      .then_with(|| a.mana_value.partial_cmp(&b.mana_value).unwrap_or(std::cmp::Ordering::Equal))
      .then_with(|| a.name.cmp(&b.name))
  });
}

/// Allocate creature slots across the selected themes. In AND mode a
/// pre-pass favors creatures matching every selected theme, then per-theme
/// passes run in priority order, then a fill pass compensates shortfall.
pub fn run(builder: &mut DeckBuilder) {
  if builder.themes.is_empty() {
    info!("creatures: no themes selected; skipping");
    return;
  }
  let desired_total = builder.config.ideal_counts.creatures;
  if desired_total == 0 {
    return;
  }
  let selected = builder.themes.selected.clone();
  let weights = theme_weights(&selected);
  let n_themes = selected.len();
  let and_mode = builder.config.tag_mode == TagMode::And;
  let top_n = (30.0 * constants::THEME_POOL_SIZE_MULTIPLIER) as usize;

  let mut total_added = builder.library.creature_count();

  // AND pre-pass: creatures hitting all selected themes
  if and_mode && n_themes >= 2 {
    let hard_cap = (desired_total as f64 * constants::AND_ALL_THEME_CAP_RATIO).floor() as u32;
    let remaining = desired_total.saturating_sub(total_added);
    let target_cap = hard_cap.min(remaining);
    if target_cap > 0 {
      let mut subset: Vec<CreatureRow> =
        creature_pool(builder).into_iter().filter(|c| c.multi_match >= n_themes).collect();
      subset.sort_by(|a, b| {
        a.rank
          .cmp(&b.rank)
          .then_with(|| a.mana_value.partial_cmp(&b.mana_value).unwrap_or(std::cmp::Ordering::Equal))
          .then_with(|| a.name.cmp(&b.name))
      });
      let mut ordered: Vec<usize> = subset.iter().map(|c| c.row).collect();
      builder.prefer_owned_first(&mut ordered);
      let weighted: Vec<(String, f64)> = ordered
        .iter()
        .map(|r| {
          let name = builder.card(*r).name.clone();
          let w = constants::AND_ALL_THEME_WEIGHT * builder.owned_weight(&name);
          (name, w)
        })
        .collect();
      let chosen =
        weighted_sample_without_replacement(&mut builder.rng, &weighted, target_cap as usize);
      let mut added = 0;
      for name in chosen {
        let synergy = subset.iter().find(|c| c.name == name).map(|c| c.multi_match as u32);
        let trigger = selected.join(", ");
        if builder.add_card(
          &name,
          Role::Creature,
          Some("all_theme"),
          "creature_all_theme",
          Some(trigger),
          synergy,
        ) {
          added += 1;
          total_added += 1;
          if total_added >= desired_total {
            break;
          }
        }
      }
      info!("creatures: AND pre-pass added {}/{}", added, target_cap);
    }
  }

  // Per-theme passes in priority order
  for (slot, tag) in selected.iter().enumerate() {
    if total_added >= desired_total {
      break;
    }
    let w = weights[slot];
    if w <= 0.0 {
      continue;
    }
    let remaining = desired_total - total_added;
    let jitter = uniform(&mut builder.rng, 1.0, 1.1);
    let target = ((desired_total as f64 * w * jitter).ceil() as u32).min(remaining);
    if target == 0 {
      continue;
    }
    let pool = creature_pool(builder);
    let any_overlap = pool.iter().any(|c| c.multi_match >= 2);
    let mut subset: Vec<CreatureRow> = pool
      .into_iter()
      .filter(|c| {
        let card = builder.card(c.row);
        card.has_tag(tag) || card.has_tag_containing(tag)
      })
      .collect();
    if and_mode && n_themes > 1 && any_overlap {
      subset.retain(|c| c.multi_match >= 2);
    }
    if subset.is_empty() {
      info!("creatures: theme '{}' produced no candidates", tag);
      continue;
    }
    sort_pool(&mut subset);
    subset.truncate(top_n);
    let mut ordered: Vec<usize> = subset.iter().map(|c| c.row).collect();
    builder.prefer_owned_first(&mut ordered);
    let weighted: Vec<(String, f64)> = ordered
      .iter()
      .map(|r| {
        let card = builder.card(*r);
        let mm = card.matched_tag_count(&selected);
        let base = if and_mode {
          if mm >= 2 {
            constants::THEME_PRIORITY_BONUS * 1.3
          } else if mm == 1 {
            1.1
          } else {
            0.8
          }
        } else if mm >= 2 {
          constants::THEME_PRIORITY_BONUS
        } else {
          1.0
        };
        (card.name.clone(), base * builder.owned_weight(&card.name))
      })
      .collect();
    let chosen = weighted_sample_without_replacement(&mut builder.rng, &weighted, target as usize);
    let mut added = 0;
    for name in chosen {
      let synergy = subset.iter().find(|c| c.name == name).map(|c| c.multi_match as u32);
      if builder.add_card(
        &name,
        Role::Creature,
        Some(THEME_ROLE_NAMES[slot]),
        "creature_add",
        Some(tag.clone()),
        synergy,
      ) {
        added += 1;
        total_added += 1;
        if total_added >= desired_total {
          break;
        }
      }
    }
    info!("creatures: {} for {} theme '{}' (target {})", added, THEME_ROLE_NAMES[slot], tag, target);
  }

  // Fill pass: compensate shortfall from any theme-matching creature
  if total_added < desired_total {
    let need = desired_total - total_added;
    let mut pool = creature_pool(builder);
    if and_mode && n_themes > 1 {
      let overlap: Vec<&CreatureRow> = pool.iter().filter(|c| c.multi_match >= 2).collect();
      if !overlap.is_empty() {
        pool.retain(|c| c.multi_match >= 2);
      } else {
        pool.retain(|c| c.multi_match > 0);
      }
    } else {
      pool.retain(|c| c.multi_match > 0);
    }
    sort_pool(&mut pool);
    let mut ordered: Vec<usize> = pool.iter().map(|c| c.row).collect();
    builder.prefer_owned_first(&mut ordered);
    let mut added = 0;
    for row in ordered.into_iter().take(need as usize) {
      let card = builder.card(row);
      let name = card.name.clone();
      let synergy = Some(card.matched_tag_count(&builder.themes.selected) as u32);
      if builder.add_card(&name, Role::Creature, Some("fill"), "creature_fill", None, synergy) {
        added += 1;
      }
    }
    if added > 0 {
      info!("creatures: fill pass added {} extra (shortfall compensation)", added);
    }
  }
}

//! # Non-creature spell selection
//!
//! Six categories in order: ramp (rocks/dorks/general), spot removal, board
//! wipes, card advantage (conditional split), protection, then theme-weighted
//! filler up to the 100-card deck size. Every category applies bracket
//! pre-filters and a small random bonus on top of its configured target.
use crate::builder::DeckBuilder;
use crate::config::TagMode;
use crate::constants;
use crate::deck::Role;
use crate::sampling::{adjusted_target, uniform, weighted_sample_without_replacement};
use crate::themes::{theme_weights, THEME_ROLE_NAMES};
use rand::Rng;

const CONDITIONAL_DRAW_KEYS: [&str; 5] =
  ["conditional", "situational", "attacks", "combat damage", "when you cast"];

fn is_ramp(tags: &[String]) -> bool {
  tags.iter().any(|t| t.contains("ramp"))
}

fn is_removal(tags: &[String]) -> bool {
  tags.iter().any(|t| t.contains("removal") || t.contains("spot removal")) && !is_wipe(tags)
}

fn is_wipe(tags: &[String]) -> bool {
  tags.iter().any(|t| t.contains("board wipe") || t.contains("mass removal"))
}

fn is_draw(tags: &[String]) -> bool {
  tags.iter().any(|t| t.contains("draw") || t.contains("card advantage"))
}

fn is_protection(tags: &[String]) -> bool {
  tags.iter().any(|t| t.contains("protection"))
}

fn is_conditional_draw(tags: &[String]) -> bool {
  tags.iter().any(|t| CONDITIONAL_DRAW_KEYS.iter().any(|k| t.contains(k)))
}

/// Non-land pool rows matching a tag predicate, bracket-filtered and sorted
/// by (edhrec rank, mana value, name) with owned rows stably first
fn spell_rows<F: Fn(&[String]) -> bool>(builder: &DeckBuilder, pred: F) -> Vec<usize> {
  let commander = builder.commander_name.clone();
  let rows: Vec<usize> = builder
    .available_rows()
    .into_iter()
    .filter(|r| {
      let card = builder.card(*r);
      !card.is_land() && card.name != commander && pred(&card.theme_tags)
    })
    .collect();
  let mut rows = builder.bracket_prefilter(rows);
  rows.sort_by(|a, b| {
    let ca = builder.card(*a);
    let cb = builder.card(*b);
    ca.rank_or_max()
      .cmp(&cb.rank_or_max())
      .then_with(|| ca.mana_value.partial_cmp(&cb.mana_value).unwrap_or(std::cmp::Ordering::Equal))
      .then_with(|| ca.name.cmp(&cb.name))
  });
  builder.prefer_owned_first(&mut rows);
  rows
}

fn existing_with<F: Fn(&[String]) -> bool>(builder: &DeckBuilder, pred: F) -> u32 {
  builder
    .library
    .iter_ordered()
    .filter(|(_, e)| !e.is_commander() && pred(&e.tags))
    .map(|(_, e)| e.count)
    .sum()
}

/// Land slots still owed to the mana base, bounded by what the pool can
/// actually supply so spell fill can use the slack when lands ran short
fn reserved_land_slots(builder: &DeckBuilder) -> u32 {
  let need = builder.land_target().saturating_sub(builder.current_land_count());
  let addable = builder
    .available_rows()
    .into_iter()
    .filter(|r| builder.card(*r).is_land())
    .count() as u32;
  need.min(addable)
}

fn room_left(builder: &DeckBuilder) -> u32 {
  constants::DECK_SIZE
    .saturating_sub(builder.library.total_count())
    .saturating_sub(reserved_land_slots(builder))
}

fn add_from(
  builder: &mut DeckBuilder,
  rows: &[usize],
  limit: u32,
  role: Role,
  sub_role: &str,
  added_by: &str,
) -> u32 {
  let mut added = 0;
  for row in rows {
    if added >= limit || room_left(builder) == 0 {
      break;
    }
    let name = builder.card(*row).name.clone();
    if builder.add_card(&name, role, Some(sub_role), added_by, None, None) {
      added += 1;
    }
  }
  added
}

/// Ramp in three sub-phases: mana rocks (~1/3), mana dorks (~1/4), general
fn add_ramp(builder: &mut DeckBuilder) {
  let configured = builder.config.ideal_counts.ramp;
  if configured == 0 {
    return;
  }
  let existing = existing_with(builder, is_ramp);
  let (target, _bonus) = adjusted_target(
    &mut builder.rng,
    "ramp",
    configured,
    existing,
    constants::CATEGORY_BONUS_MAX_PCT,
  );
  if target == 0 {
    return;
  }
  let rows = spell_rows(builder, is_ramp);
  let rocks: Vec<usize> =
    rows.iter().copied().filter(|r| builder.card(*r).is_artifact()).collect();
  let dorks: Vec<usize> =
    rows.iter().copied().filter(|r| builder.card(*r).is_creature()).collect();

  let rocks_target = target.min((target as f64 / 3.0).ceil() as u32);
  let added_rocks = add_from(builder, &rocks, rocks_target, Role::Ramp, "rocks", "spell_ramp");
  let dorks_target = (target - added_rocks).min((target as f64 / 4.0).ceil() as u32);
  let added_dorks = add_from(builder, &dorks, dorks_target, Role::Ramp, "dorks", "spell_ramp");
  let remaining = target.saturating_sub(added_rocks + added_dorks);
  let added_general = add_from(builder, &rows, remaining, Role::Ramp, "general", "spell_ramp");
  let total = added_rocks + added_dorks + added_general;
  info!("ramp: {}/{} (rocks {}, dorks {}, general {})", total, target, added_rocks, added_dorks, added_general);
  if total < target {
    debug!("ramp shortfall due to limited pool");
  }
}

fn add_removal(builder: &mut DeckBuilder) {
  let configured = builder.config.ideal_counts.removal;
  if configured == 0 {
    return;
  }
  let existing = existing_with(builder, is_removal);
  let (target, _bonus) = adjusted_target(
    &mut builder.rng,
    "removal",
    configured,
    existing,
    constants::CATEGORY_BONUS_MAX_PCT,
  );
  if target == 0 {
    return;
  }
  let rows = spell_rows(builder, is_removal);
  let added = add_from(builder, &rows, target, Role::Removal, "spot", "spell_removal");
  info!("removal: {}/{}", added, target);
}

fn add_board_wipes(builder: &mut DeckBuilder) {
  let configured = builder.config.ideal_counts.wipes;
  if configured == 0 {
    return;
  }
  let existing = existing_with(builder, is_wipe);
  let (target, _bonus) = adjusted_target(
    &mut builder.rng,
    "board wipes",
    configured,
    existing,
    constants::CATEGORY_BONUS_MAX_PCT,
  );
  if target == 0 {
    return;
  }
  let rows = spell_rows(builder, is_wipe);
  let added = add_from(builder, &rows, target, Role::Wipe, "board", "spell_wipe");
  info!("board wipes: {}/{}", added, target);
}

/// Card advantage with a conditional split: ~20% of the target goes to
/// conditional draw, the rest to unconditional
fn add_card_advantage(builder: &mut DeckBuilder) {
  let configured = builder.config.ideal_counts.card_advantage;
  if configured == 0 {
    return;
  }
  let existing = existing_with(builder, is_draw);
  let (target, _bonus) = adjusted_target(
    &mut builder.rng,
    "card advantage",
    configured,
    existing,
    constants::CATEGORY_BONUS_MAX_PCT,
  );
  if target == 0 {
    return;
  }
  let conditional_target = target.min((target as f64 * 0.2).ceil() as u32);
  let conditional: Vec<usize> =
    spell_rows(builder, |tags| is_draw(tags) && is_conditional_draw(tags));
  let unconditional: Vec<usize> =
    spell_rows(builder, |tags| is_draw(tags) && !is_conditional_draw(tags));
  let added_cond = add_from(
    builder,
    &conditional,
    conditional_target,
    Role::CardAdvantage,
    "conditional",
    "spell_draw",
  );
  let added_uncond = add_from(
    builder,
    &unconditional,
    target - added_cond,
    Role::CardAdvantage,
    "unconditional",
    "spell_draw",
  );
  info!("card advantage: conditional {}/{}, total {}/{}", added_cond, conditional_target, added_cond + added_uncond, target);
}

fn add_protection(builder: &mut DeckBuilder) {
  let configured = builder.config.ideal_counts.protection;
  if configured == 0 {
    return;
  }
  let existing = existing_with(builder, is_protection);
  let (target, _bonus) = adjusted_target(
    &mut builder.rng,
    "protection",
    configured,
    existing,
    constants::CATEGORY_BONUS_MAX_PCT,
  );
  if target == 0 {
    return;
  }
  let rows = spell_rows(builder, is_protection);
  let added = add_from(builder, &rows, target, Role::Protection, "spells", "spell_protection");
  info!("protection: {}/{}", added, target);
}

/// Theme-weighted filler toward the 100-card deck size, with the same
/// AND/OR semantics as the creature builder, then a categorized last resort
fn fill_remaining_theme_spells(builder: &mut DeckBuilder) {
  let remaining = constants::DECK_SIZE
    .saturating_sub(builder.library.total_count())
    .saturating_sub(reserved_land_slots(builder));
  if remaining == 0 {
    return;
  }
  let selected = builder.themes.selected.clone();
  let and_mode = builder.config.tag_mode == TagMode::And;
  let n_themes = selected.len();
  let weights = theme_weights(&selected);
  let top_n = (40.0 * constants::THEME_POOL_SIZE_MULTIPLIER) as usize;
  let mut total_added = 0u32;

  let noncreature_spell = |builder: &DeckBuilder, row: usize| -> bool {
    let card = builder.card(row);
    !card.is_land() && !card.is_creature()
  };

  for (slot, tag) in selected.iter().enumerate() {
    if total_added >= remaining {
      break;
    }
    let w = weights[slot];
    if w <= 0.0 {
      continue;
    }
    let jitter = uniform(&mut builder.rng, 1.0, 1.1);
    let target =
      (((remaining as f64) * w * jitter).ceil() as u32).min(remaining - total_added);
    if target == 0 {
      continue;
    }
    let all_rows: Vec<usize> = builder
      .available_rows()
      .into_iter()
      .filter(|r| noncreature_spell(builder, *r))
      .collect();
    let all_rows = builder.bracket_prefilter(all_rows);
    let any_overlap =
      all_rows.iter().any(|r| builder.card(*r).matched_tag_count(&selected) >= 2);
    let mut subset: Vec<usize> = all_rows
      .into_iter()
      .filter(|r| {
        let card = builder.card(*r);
        card.has_tag(tag) || card.has_tag_containing(tag)
      })
      .collect();
    if and_mode && n_themes > 1 && any_overlap {
      subset.retain(|r| builder.card(*r).matched_tag_count(&selected) >= 2);
    }
    if subset.is_empty() {
      continue;
    }
    subset.sort_by(|a, b| {
      let ca = builder.card(*a);
      let cb = builder.card(*b);
      cb.matched_tag_count(&selected)
        .cmp(&ca.matched_tag_count(&selected))
        .then_with(|| ca.rank_or_max().cmp(&cb.rank_or_max()))
        .then_with(|| {
          ca.mana_value.partial_cmp(&cb.mana_value).unwrap_or(std::cmp::Ordering::Equal)
        })
        .then_with(|| ca.name.cmp(&cb.name))
    });
    builder.prefer_owned_first(&mut subset);
    subset.truncate(top_n);
    let weighted: Vec<(String, f64)> = subset
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
    for name in chosen {
      let synergy = builder
        .catalog
        .card_from_name(&name)
        .map(|c| c.matched_tag_count(&selected) as u32);
      if builder.add_card(
        &name,
        Role::ThemeSpell,
        Some(THEME_ROLE_NAMES[slot]),
        "spell_theme_fill",
        Some(tag.clone()),
        synergy,
      ) {
        total_added += 1;
        if total_added >= remaining {
          break;
        }
      }
    }
  }

  // Any remaining theme-matching spell
  if total_added < remaining && !selected.is_empty() {
    let mut pool: Vec<usize> = builder
      .available_rows()
      .into_iter()
      .filter(|r| noncreature_spell(builder, *r))
      .collect();
    pool = builder.bracket_prefilter(pool);
    let overlap: Vec<usize> = pool
      .iter()
      .copied()
      .filter(|r| builder.card(*r).matched_tag_count(&selected) >= 2)
      .collect();
    let mut pool = if and_mode && n_themes > 1 && !overlap.is_empty() {
      overlap
    } else {
      pool
        .into_iter()
        .filter(|r| builder.card(*r).matched_tag_count(&selected) > 0)
        .collect()
    };
    pool.sort_by(|a, b| {
      let ca = builder.card(*a);
      let cb = builder.card(*b);
      cb.matched_tag_count(&selected)
        .cmp(&ca.matched_tag_count(&selected))
        .then_with(|| ca.rank_or_max().cmp(&cb.rank_or_max()))
        .then_with(|| ca.name.cmp(&cb.name))
    });
    builder.prefer_owned_first(&mut pool);
    for row in pool {
      if total_added >= remaining {
        break;
      }
      let card = builder.card(row);
      let name = card.name.clone();
      let synergy = Some(card.matched_tag_count(&selected) as u32);
      if builder.add_card(&name, Role::ThemeSpell, Some("fill_multi"), "spell_theme_fill", None, synergy)
      {
        total_added += 1;
      }
    }
  }

  // Last resort: categorize leftovers and draw one per rolled category
  while total_added < remaining {
    let leftover: Vec<usize> = builder
      .available_rows()
      .into_iter()
      .filter(|r| noncreature_spell(builder, *r))
      .collect();
    let leftover = builder.bracket_prefilter(leftover);
    if leftover.is_empty() {
      debug!("filler: spell pool exhausted {} short", remaining - total_added);
      break;
    }
    let mut by_category: Vec<(&str, Vec<usize>)> = Vec::new();
    for category in &["ramp", "card_advantage", "protection", "board_wipe", "removal"] {
      let subset: Vec<usize> = leftover
        .iter()
        .copied()
        .filter(|r| {
          let tags = &builder.card(*r).theme_tags;
          match *category {
            "ramp" => is_ramp(tags),
            "card_advantage" => is_draw(tags),
            "protection" => is_protection(tags),
            "board_wipe" => is_wipe(tags),
            _ => is_removal(tags),
          }
        })
        .collect();
      if !subset.is_empty() {
        by_category.push((*category, subset));
      }
    }
    let (category, mut subset) = if by_category.is_empty() {
      ("", leftover)
    } else {
      let pick = builder.rng.gen_range(0, by_category.len());
      let (c, s) = by_category.swap_remove(pick);
      (c, s)
    };
    subset.sort_by(|a, b| {
      let ca = builder.card(*a);
      let cb = builder.card(*b);
      ca.rank_or_max().cmp(&cb.rank_or_max()).then_with(|| ca.name.cmp(&cb.name))
    });
    builder.prefer_owned_first(&mut subset);
    let name = builder.card(subset[0]).name.clone();
    if builder.add_card(&name, Role::Filler, Some(category), "spell_general_filler", None, None) {
      total_added += 1;
    } else {
      break;
    }
  }
  info!("theme spell fill: added {} (deck at {})", total_added, builder.library.total_count());
}

/// Orchestrate all non-creature spell categories then thematic fill
pub fn run(builder: &mut DeckBuilder) {
  add_ramp(builder);
  add_removal(builder);
  add_board_wipes(builder);
  add_card_advantage(builder);
  add_protection(builder);
  fill_remaining_theme_spells(builder);
}

//! Land Step 3: kindred / tribal lands
use crate::builder::DeckBuilder;
use crate::constants;
use crate::deck::Role;
use std::collections::BTreeSet;

const DYNAMIC_KINDRED_LIMIT: usize = 5;
const PER_TRIBE_LIMIT: usize = 2;

/// Runs only when a selected theme mentions kindred/tribal. Baseline lands
/// first, then a scan for lands whose name or text references each tribe
/// term, capped at 2 per tribe and 5 dynamic lands total.
pub fn run(builder: &mut DeckBuilder) {
  if !builder.themes.has_kindred() {
    debug!("kindred lands: no kindred/tribal theme selected; skipping");
    return;
  }
  let land_target = builder.land_target();
  let floor = builder.basic_floor_value();
  let colors = builder.color_identity.len();

  let mut try_add = |builder: &mut DeckBuilder, name: &str, sub_role: &str| -> bool {
    if builder.library.contains(name) {
      return false;
    }
    if !builder.library.free_land_slot(land_target, floor) {
      return false;
    }
    builder.add_card(
      name,
      Role::Kindred,
      Some(sub_role),
      "lands_step3",
      Some("Kindred/Tribal".to_string()),
      None,
    )
  };

  // Baseline inclusions on kindred focus
  try_add(builder, "Path of Ancestry", "baseline");
  if colors <= 4 {
    try_add(builder, "Cavern of Souls", "baseline");
  }
  if colors >= 2 {
    try_add(builder, "Three Tree City", "baseline");
  }

  // Tribe terms: first word after stripping the kindred/tribal marker
  let mut tribes: BTreeSet<String> = BTreeSet::new();
  for tag in &builder.themes.selected {
    for marker in &["kindred", "tribal"] {
      if tag.contains(marker) {
        let base = tag.replace(marker, "");
        if let Some(word) = base.split_whitespace().next() {
          tribes.insert(word.to_string());
        }
      }
    }
  }

  let mut dynamic_budget = DYNAMIC_KINDRED_LIMIT;
  for tribe in &tribes {
    if dynamic_budget == 0 || builder.current_land_count() >= land_target {
      break;
    }
    let mut matches: Vec<String> = Vec::new();
    for row in crate::lands::available_land_rows(builder) {
      let card = builder.card(row);
      if constants::BASIC_LANDS.contains(&card.name.as_str()) {
        continue;
      }
      let name_lower = card.name.to_lowercase();
      let text = &card.text;
      let spaced = format!(" {}", tribe);
      let trailing = format!("{} ", tribe);
      let plural = format!("{}s", tribe);
      if name_lower.contains(tribe.as_str())
        || text.contains(&spaced)
        || text.contains(&trailing)
        || text.contains(&plural)
      {
        matches.push(card.name.clone());
      }
    }
    for name in matches.into_iter().take(PER_TRIBE_LIMIT) {
      if dynamic_budget == 0 || builder.current_land_count() >= land_target {
        break;
      }
      if try_add(builder, &name, "tribe-specific") {
        dynamic_budget -= 1;
      }
    }
  }

  builder.library.enforce_land_cap(land_target, floor);
  info!(
    "kindred lands: lands {}/{} (tribes {:?})",
    builder.current_land_count(),
    land_target,
    tribes
  );
}

//! Land Step 6: three-color lands
use crate::builder::DeckBuilder;
use crate::constants;
use crate::deck::Role;
use crate::sampling::weighted_shuffle;

fn rank(fully_typed: bool, text_lower: &str) -> i32 {
  let mut score = 0;
  if fully_typed {
    score += 5;
  }
  if !text_lower.contains(constants::TAPPED_LAND_PHRASE) {
    score += 2;
  }
  if text_lower.contains("cycling") {
    score += 1;
  }
  if text_lower.contains(constants::TAPPED_LAND_PHRASE) && text_lower.contains("you gain") {
    score -= 1;
  }
  score
}

/// Three-plus-color identities only. Heuristic candidates: three basic land
/// types, three colored symbols in text (all inside the identity), or a
/// tri-land name keyword backed by at least two produced colors.
pub fn run(builder: &mut DeckBuilder) {
  if builder.color_identity.len() < 3 {
    debug!("triples: fewer than three colors; skipping");
    return;
  }
  let land_target = builder.land_target();
  let floor = builder.basic_floor_value();

  let mut pool: Vec<(String, f64, Vec<char>)> = Vec::new();
  for row in crate::lands::available_land_rows(builder) {
    let card = builder.card(row);
    let tline = card.type_line.to_lowercase();
    let typed = crate::lands::basic_types_in(&tline);
    let text_colors = crate::lands::text_mana_colors(&card.text);
    let name_lower = card.name.to_lowercase();
    let by_types = typed.len() >= 3;
    let by_text = text_colors.len() >= 3 && text_colors.is_subset(builder.color_identity);
    let by_name = constants::TRI_LAND_NAME_KEYWORDS.iter().any(|kw| name_lower.contains(kw));
    if !(by_types || by_text || (by_name && (typed.len() >= 2 || text_colors.len() >= 2))) {
      continue;
    }
    let produced: Vec<crate::card::ManaColor> =
      if !typed.is_empty() { typed.clone() } else { text_colors.colors() };
    if !produced.iter().all(|c| builder.color_identity.contains(*c)) {
      continue;
    }
    let mut letters: Vec<char> = produced.iter().map(|c| c.letter()).collect();
    letters.sort();
    letters.dedup();
    let weight = (rank(by_types, &card.text).max(1) + 1) as f64;
    pool.push((card.name.clone(), weight, letters));
  }
  if pool.is_empty() {
    info!("triples: no candidates found");
    return;
  }
  pool.sort_by(|a, b| {
    b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(&b.0))
  });

  let weighted: Vec<(String, f64)> = pool.iter().map(|(n, w, _)| (n.clone(), *w)).collect();
  let order = weighted_shuffle(&mut builder.rng, &weighted);

  let mut desired = constants::TRIPLE_LAND_DEFAULT_COUNT;
  let mut capacity = land_target.saturating_sub(builder.current_land_count());
  if capacity == 0 {
    let mut freed = 0;
    while freed < desired && builder.library.count_basic_lands() > floor {
      match builder.library.choose_basic_to_trim() {
        Some(name) if builder.library.decrement(&name) => freed += 1,
        _ => break,
      }
    }
    capacity = land_target.saturating_sub(builder.current_land_count());
  }
  desired = desired.min(capacity);
  if desired == 0 {
    info!("triples: no capacity after trimming; skipping");
    return;
  }

  let mut added = 0;
  for name in order {
    if added >= desired || builder.current_land_count() >= land_target {
      break;
    }
    let trio: Option<String> = pool
      .iter()
      .find(|(n, _, _)| *n == name)
      .map(|(_, _, letters)| letters.iter().collect());
    if builder.add_card(&name, Role::Triple, trio.as_deref(), "lands_step6", None, None) {
      added += 1;
    }
  }
  builder.library.enforce_land_cap(land_target, floor);
  info!("triples: added {}; lands {}/{}", added, builder.current_land_count(), land_target);
}

//! # Mana base construction (Land Steps 1-8)
//!
//! Ordered sub-phases over shared build state. Each phase only adds while
//! capacity remains under the land target, or frees capacity by trimming
//! basics above the floor, and ends by re-enforcing the global land cap.
pub mod basics;
pub mod duals;
pub mod fetch;
pub mod kindred;
pub mod misc;
pub mod optimize;
pub mod staples;
pub mod triples;

use crate::builder::DeckBuilder;
use crate::card::{ColorSet, ManaColor};
use crate::constants;
use crate::deck::DeckLibrary;

/// Pool rows that are lands and not yet in the library
pub(crate) fn available_land_rows(builder: &DeckBuilder) -> Vec<usize> {
  builder
    .available_rows()
    .into_iter()
    .filter(|r| builder.card(*r).is_land())
    .collect()
}

/// Basic land types named in a type line (lowercased input)
pub(crate) fn basic_types_in(type_line_lower: &str) -> Vec<ManaColor> {
  constants::BASIC_LAND_TYPE_KEYWORDS
    .iter()
    .filter(|kw| type_line_lower.contains(*kw))
    .filter_map(|kw| ManaColor::from_basic_type(kw))
    .collect()
}

/// Colors named by explicit mana symbols in rules text (lowercased input)
pub(crate) fn text_mana_colors(text_lower: &str) -> ColorSet {
  let mut set = ColorSet::new();
  for (i, sym) in constants::COLORED_MANA_SYMBOLS.iter().enumerate() {
    if text_lower.contains(sym) {
      set.insert(ManaColor::ALL[i]);
    }
  }
  set
}

/// A land that meaningfully fixes colors: two or more basic types, an
/// any-color clause, or two or more distinct colored symbols in text
pub(crate) fn is_color_fixing_land(type_line_lower: &str, text_lower: &str) -> bool {
  if basic_types_in(type_line_lower).len() >= 2 {
    return true;
  }
  if constants::ANY_COLOR_MANA_PHRASES.iter().any(|p| text_lower.contains(p)) {
    return true;
  }
  text_mana_colors(text_lower).len() >= 2
}

/// Classify a land for the tapped-optimization pass.
/// Returns (counts_toward_threshold, penalty); higher penalty = worse to
/// keep. Shock-like lands are conditional, not always-tapped.
pub(crate) fn tapped_land_penalty(type_line_lower: &str, text_lower: &str) -> (bool, i32) {
  if !type_line_lower.contains("land") {
    return (false, 0);
  }
  let always_tapped = text_lower.contains(constants::TAPPED_LAND_PHRASE);
  let shock_like = text_lower.contains(constants::SHOCK_LIKE_PHRASE);
  let conditional =
    constants::CONDITIONAL_UNTAP_KEYWORDS.iter().any(|kw| text_lower.contains(kw)) || shock_like;
  let tapped = (always_tapped && !shock_like) || conditional;
  if !tapped {
    return (false, 0);
  }
  let any_color = constants::ANY_COLOR_MANA_PHRASES.iter().any(|p| text_lower.contains(p));
  let produces_colored = constants::COLORED_MANA_SYMBOLS.iter().any(|s| text_lower.contains(s));
  let mut penalty: i32 = if always_tapped && !conditional { 8 } else { 6 };
  if basic_types_in(type_line_lower).len() >= 3 {
    penalty -= 3;
  }
  if any_color {
    penalty -= 3;
  }
  if text_lower.contains("cycling") {
    penalty -= 2;
  }
  if conditional {
    penalty -= 2;
  }
  if !produces_colored && !any_color {
    penalty += 1;
  }
  if text_lower.contains("you gain") && text_lower.contains("life") {
    penalty += 1;
  }
  (true, penalty)
}

/// Score candidate swap-in lands (higher is better)
pub(crate) fn replacement_land_score(name: &str, type_line_lower: &str, text_lower: &str) -> i32 {
  let mut score = 0;
  if constants::SHOCK_LAND_NAMES.iter().any(|s| s.eq_ignore_ascii_case(name)) {
    score += 20;
  }
  if text_lower.contains(constants::SHOCK_LIKE_PHRASE) {
    score += 15;
  }
  if constants::ANY_COLOR_MANA_PHRASES.iter().any(|p| text_lower.contains(p)) {
    score += 10;
  }
  score += basic_types_in(type_line_lower).len() as i32 * 3;
  if text_lower.contains("unless you control") {
    score += 2;
  }
  if text_lower.contains("cycling") {
    score += 1;
  }
  score
}

/// Counted fetch lands currently in the library
pub(crate) fn count_existing_fetches(library: &DeckLibrary) -> u32 {
  let fetches = constants::all_fetch_land_names();
  library
    .iter_ordered()
    .filter(|(name, _)| fetches.contains(name.as_str()))
    .map(|(_, e)| e.count)
    .sum()
}

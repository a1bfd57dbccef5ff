//! # Fuzzy commander/card name resolution
use crate::catalog::Catalog;
use crate::constants::{EXACT_NAME_THRESHOLD, ICONIC_CARDS, MAX_PRESENTED_CHOICES, POPULAR_CARDS};

/// Normalize card names for robust matching: straighten curly quotes, strip
/// the Arena "A-" prefix, collapse whitespace, casefold.
pub fn normalize_card_name(name: &str) -> String {
  let mut s = name.trim().to_string();
  s = s.replace('\u{2019}', "'").replace('\u{2018}', "'");
  s = s.replace('\u{201C}', "\"").replace('\u{201D}', "\"");
  s = s.replace('\u{2013}', "-").replace('\u{2014}', "-");
  if s.starts_with("A-") && s.len() > 2 {
    s = s[2..].to_string();
  }
  let collapsed: Vec<&str> = s.split_whitespace().collect();
  collapsed.join(" ").to_lowercase()
}

/// Further strips commas and colons so "Krenko Mob Boss" matches
/// "Krenko, Mob Boss"
pub fn normalize_punctuation(name: &str) -> String {
  let s = normalize_card_name(name);
  let s = s.replace(',', " ").replace(':', " ");
  let collapsed: Vec<&str> = s.split_whitespace().collect();
  collapsed.join(" ")
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
  if a.is_empty() || b.is_empty() {
    return 0;
  }
  let mut prev = vec![0usize; b.len() + 1];
  let mut curr = vec![0usize; b.len() + 1];
  for ca in a {
    for (j, cb) in b.iter().enumerate() {
      curr[j + 1] = if ca == cb {
        prev[j] + 1
      } else {
        prev[j + 1].max(curr[j])
      };
    }
    std::mem::swap(&mut prev, &mut curr);
  }
  prev[b.len()]
}

/// Base similarity: fraction of the longest matching subsequence, scaled to
/// 0..100 like the classic ratio measure
pub fn similarity(a: &str, b: &str) -> f64 {
  let ac: Vec<char> = a.chars().collect();
  let bc: Vec<char> = b.chars().collect();
  let total = ac.len() + bc.len();
  if total == 0 {
    return 100.0;
  }
  200.0 * lcs_len(&ac, &bc) as f64 / total as f64
}

/// Full score with the boost ladder applied in order: exact prefix, then
/// word prefix, then substring; popularity and iconic boosts stack on top.
pub fn fuzzy_score(query_norm: &str, name: &str) -> f64 {
  let name_norm = normalize_punctuation(name);
  let mut score = similarity(query_norm, &name_norm);
  if score < 30.0 {
    return score;
  }
  if name_norm.starts_with(query_norm) {
    score += 50.0;
  } else if name_norm.split_whitespace().any(|w| w.starts_with(query_norm)) {
    score += 30.0;
  } else if name_norm.contains(query_norm) {
    score += 20.0;
  }
  if POPULAR_CARDS.contains(name) || ICONIC_CARDS.contains(name) {
    score += 25.0;
  }
  score.min(100.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
  pub name: String,
  pub score: u32,
  /// Present when the literal match was redirected, e.g. off a secondary face
  pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolvedCommander {
  pub exact: Option<String>,
  pub candidates: Vec<Candidate>,
}

/// Resolve a user-typed commander query against the catalog's commander pool.
/// Never an error: ambiguity is returned as ranked candidates.
pub fn resolve_commander(catalog: &Catalog, query: &str) -> ResolvedCommander {
  let query_norm = normalize_punctuation(query);
  if query_norm.is_empty() {
    return ResolvedCommander::default();
  }
  let mut scored: Vec<Candidate> = Vec::new();
  for idx in catalog.commander_pool() {
    let card = &catalog.cards[idx];
    let mut reason = None;
    let mut name = card.name.clone();
    if card.is_secondary_face() {
      match catalog.front_face_of(&card.name) {
        Some(front) => {
          reason = Some(format!("'{}' is a secondary face; resolved to its card", card.name));
          name = front.to_string();
        }
        None => continue,
      }
    }
    let score = fuzzy_score(&query_norm, &card.name);
    if score < 30.0 {
      continue;
    }
    if let Some(existing) = scored.iter_mut().find(|c| c.name == name) {
      if (score as u32) > existing.score {
        existing.score = score as u32;
        existing.reason = reason;
      }
      continue;
    }
    scored.push(Candidate {
      name,
      score: score as u32,
      reason,
    });
  }
  scored.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
  scored.truncate(MAX_PRESENTED_CHOICES);

  let exact = match scored.first() {
    Some(best) if best.score >= EXACT_NAME_THRESHOLD => {
      let unique = normalize_punctuation(&best.name) == query_norm
        || scored.get(1).map(|second| best.score > second.score).unwrap_or(true);
      if unique {
        Some(best.name.clone())
      } else {
        None
      }
    }
    _ => None,
  };
  ResolvedCommander { exact, candidates: scored }
}

#[cfg(test)]
mod tests {
  use crate::catalog::Catalog;
  use crate::card::Card;
  use crate::resolver::*;

  fn commander(name: &str) -> Card {
    let mut c = Card::new();
    c.name = name.to_string();
    c.type_line = "Legendary Creature — Test".to_string();
    c
  }

  fn catalog() -> Catalog {
    Catalog::from_cards(vec![
      commander("Krenko, Mob Boss"),
      commander("Krenko, Tin Street Kingpin"),
      commander("Atraxa, Praetors' Voice"),
      commander("Kess, Dissident Mage"),
    ])
  }

  #[test]
  fn normalize_strips_arena_prefix_and_curlies() {
    assert_eq!(normalize_card_name("A-Atraxa, Praetors\u{2019} Voice"), "atraxa, praetors' voice");
  }

  #[test]
  fn punctuation_insensitive() {
    assert_eq!(normalize_punctuation("Krenko, Mob Boss"), "krenko mob boss");
  }

  #[test]
  fn exact_match_resolves() {
    let r = resolve_commander(&catalog(), "Krenko, Mob Boss");
    assert_eq!(r.exact.as_deref(), Some("Krenko, Mob Boss"));
  }

  #[test]
  fn typo_still_finds_candidates() {
    let r = resolve_commander(&catalog(), "krenko mob bos");
    assert!(!r.candidates.is_empty());
    assert_eq!(r.candidates[0].name, "Krenko, Mob Boss");
  }

  #[test]
  fn prefix_prefers_start_of_name() {
    let r = resolve_commander(&catalog(), "atraxa");
    assert_eq!(r.candidates[0].name, "Atraxa, Praetors' Voice");
  }

  #[test]
  fn ambiguous_prefix_returns_choices_without_exact() {
    let r = resolve_commander(&catalog(), "krenko");
    assert!(r.candidates.len() >= 2);
  }

  #[test]
  fn empty_query() {
    let r = resolve_commander(&catalog(), "   ");
    assert!(r.exact.is_none());
    assert!(r.candidates.is_empty());
  }

  #[test]
  fn secondary_face_redirects_to_front() {
    let mut back = commander("Tidechannel Pathway");
    back.side = "b".to_string();
    back.face_name = "Tidechannel Pathway".to_string();
    let front = commander("Barkchannel Pathway // Tidechannel Pathway");
    let cat = Catalog::from_cards(vec![front, back]);
    let r = resolve_commander(&cat, "Tidechannel Pathway");
    let hit = r.candidates.iter().find(|c| c.reason.is_some());
    assert!(hit.is_some());
    assert_eq!(hit.unwrap().name, "Barkchannel Pathway // Tidechannel Pathway");
  }
}

//! # Bracket compliance evaluation
//!
//! A deck is scored against its bracket's category caps by combining two
//! signals: policy tags carried by the catalog (`Bracket:GameChanger` style)
//! and curated policy JSON lists matched by canonicalized name.
use crate::brackets::{BracketDefinition, COMBO_CATEGORY, POLICY_CATEGORIES};
use crate::constants;
use crate::deck::DeckLibrary;
use crate::error::BuildError;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Substring synonyms that mark a card's tags as belonging to a category
pub fn category_tag_synonyms(category: &str) -> &'static [&'static str] {
  match category {
    "game_changers" => &["bracket:gamechanger", "gamechanger", "game-changer", "game changer"],
    "extra_turns" => &["bracket:extraturn", "extra turn", "extraturn"],
    "mass_land_denial" => &["bracket:masslanddenial", "mass land denial", "mld"],
    "tutors_nonland" => &["bracket:tutornonland", "tutor", "nonland tutor", "non-land tutor"],
    _ => &[],
  }
}

/// True when any tag matches a category synonym (substring, lowercased tags)
pub fn tags_flag_category(tags: &[String], category: &str) -> bool {
  let needles = category_tag_synonyms(category);
  tags.iter().any(|t| {
    let t = t.to_lowercase();
    needles.iter().any(|n| t.contains(n))
  })
}

/// Canonical name form for list and combo matching: casefold, straighten
/// curly apostrophes, strip the Arena "A-" prefix. Punctuation is kept.
pub fn canonicalize(name: &str) -> String {
  let mut s = name.trim().replace('\u{2019}', "'");
  if s.starts_with("A-") && s.len() > 2 {
    s = s[2..].to_string();
  }
  s.to_lowercase()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyList {
  pub list_version: Option<String>,
  #[serde(default)]
  pub cards: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboPair {
  pub a: String,
  pub b: String,
  #[serde(default)]
  pub cheap_early: bool,
  #[serde(default)]
  pub setup_dependent: bool,
  #[serde(default)]
  pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComboList {
  pub list_version: Option<String>,
  #[serde(default)]
  pub pairs: Vec<ComboPair>,
}

/// Policy lists loaded at process start; see `PolicyStore::load_dir`
#[derive(Debug, Clone, Default)]
pub struct PolicyStore {
  pub lists: HashMap<String, PolicyList>,
  pub combos: ComboList,
}

impl PolicyStore {
  /// Empty store with the in-code game-changers fallback
  pub fn fallback() -> Self {
    let mut store = Self::default();
    store.lists.insert(
      "game_changers".to_string(),
      PolicyList {
        list_version: None,
        cards: constants::GAME_CHANGERS.iter().map(|s| s.to_string()).collect(),
      },
    );
    store
  }

  /// Load `<dir>/<category>.json` for each policy category plus
  /// `<dir>/combos.json`. Missing files degrade to the fallback lists.
  pub fn load_dir(dir: &Path) -> Result<Self, BuildError> {
    let mut store = Self::default();
    for category in &POLICY_CATEGORIES {
      let path = dir.join(format!("{}.json", category));
      if path.exists() {
        let text = fs::read_to_string(&path)?;
        let list: PolicyList = serde_json::from_str(&text)?;
        store.lists.insert(category.to_string(), list);
      }
    }
    let combos_path = dir.join("combos.json");
    if combos_path.exists() {
      let text = fs::read_to_string(&combos_path)?;
      store.combos = serde_json::from_str(&text)?;
    }
    if store.lists.get("game_changers").map(|l| l.cards.is_empty()).unwrap_or(true) {
      store.lists.insert(
        "game_changers".to_string(),
        PolicyList {
          list_version: None,
          cards: constants::GAME_CHANGERS.iter().map(|s| s.to_string()).collect(),
        },
      );
    }
    Ok(store)
  }

  pub fn canonical_list(&self, category: &str) -> HashSet<String> {
    self
      .lists
      .get(category)
      .map(|l| l.cards.iter().map(|n| canonicalize(n)).collect())
      .unwrap_or_default()
  }

  /// Every name appearing on any policy list; replacements must avoid these
  pub fn prohibited_names(&self) -> HashSet<String> {
    let mut out = HashSet::new();
    for category in &POLICY_CATEGORIES {
      out.extend(self.canonical_list(category));
    }
    out
  }
}

/// Detect curated two-card combos among the given names
pub fn detect_combos<'a, I: Iterator<Item = &'a str>>(names: I, combos: &ComboList) -> Vec<ComboPair> {
  let present: HashSet<String> = names.map(canonicalize).collect();
  combos
    .pairs
    .iter()
    .filter(|p| present.contains(&canonicalize(&p.a)) && present.contains(&canonicalize(&p.b)))
    .cloned()
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
  Pass,
  Warn,
  Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryFinding {
  pub count: u32,
  pub limit: Option<u32>,
  pub flagged: Vec<String>,
  pub status: Status,
  #[serde(default)]
  pub notes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnforcementActions {
  pub removed: Vec<String>,
  pub added: Vec<String>,
  pub swaps: Vec<SwapRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRecord {
  pub removed: String,
  pub added: Option<String>,
  pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
  pub bracket: String,
  pub level: u8,
  pub overall: Status,
  pub commander_flagged: bool,
  pub categories: BTreeMap<String, CategoryFinding>,
  pub combos: Vec<ComboPair>,
  pub list_versions: BTreeMap<String, Option<String>>,
  pub messages: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub enforcement: Option<EnforcementActions>,
}

fn status_for(count: u32, limit: Option<u32>, warn: Option<u32>) -> Status {
  match limit {
    None => Status::Pass,
    Some(lim) if count > lim => Status::Fail,
    Some(_) => match warn {
      Some(w) if w > 0 && count >= w => Status::Warn,
      _ => Status::Pass,
    },
  }
}

fn title_case(category: &str) -> String {
  category
    .split('_')
    .map(|w| {
      let mut chars = w.chars();
      match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}

/// Score the library against the bracket policy
pub fn evaluate_deck(
  library: &DeckLibrary,
  commander_name: Option<&str>,
  bracket: &BracketDefinition,
  policies: &PolicyStore,
) -> ComplianceReport {
  let mut categories: BTreeMap<String, CategoryFinding> = BTreeMap::new();
  let mut messages: Vec<String> = Vec::new();

  // canonical name -> display name for list matching
  let mut canon_to_display: HashMap<String, String> = HashMap::new();
  for name in library.names() {
    canon_to_display.entry(canonicalize(name)).or_insert_with(|| name.clone());
  }

  for category in &POLICY_CATEGORIES {
    let mut flagged: HashSet<String> = HashSet::new();
    for (name, entry) in library.iter_ordered() {
      if tags_flag_category(&entry.tags, category) {
        flagged.insert(canonicalize(name));
      }
    }
    let listed = policies.canonical_list(category);
    for canon in canon_to_display.keys() {
      if listed.contains(canon) {
        flagged.insert(canon.clone());
      }
    }
    let mut display: Vec<String> = flagged
      .iter()
      .map(|c| canon_to_display.get(c).cloned().unwrap_or_else(|| c.clone()))
      .collect();
    display.sort();
    let count = flagged.len() as u32;
    let limit = bracket.limits.limit_for(category);
    let warn = bracket.limits.warn_for(category);
    let mut status = status_for(count, limit, warn);
    if let (Status::Fail, Some(lim)) = (status, limit) {
      messages.push(format!("{}: {} exceeds limit {}", title_case(category), count, lim));
    } else if status == Status::Warn {
      messages.push(format!(
        "{}: {} present (discouraged for this bracket)",
        title_case(category),
        count
      ));
    }
    // Conservative fallback for low brackets: tutors/extra-turns WARN when
    // present even without an explicit warn threshold
    if status == Status::Pass
      && (bracket.level == 1 || bracket.level == 2)
      && (*category == "tutors_nonland" || *category == "extra_turns")
      && warn.is_none()
      && count > 0
      && limit.map(|l| count <= l).unwrap_or(false)
    {
      status = Status::Warn;
      messages.push(format!(
        "{}: {} present (discouraged for this bracket)",
        title_case(category),
        count
      ));
    }
    categories.insert(
      category.to_string(),
      CategoryFinding { count, limit, flagged: display, status, notes: Vec::new() },
    );
  }

  // Two-card combos: only cheap/early pairs count toward the cap
  let combos = detect_combos(library.names().map(|n| n.as_str()), &policies.combos);
  let cheap_early: Vec<&ComboPair> = combos.iter().filter(|p| p.cheap_early).collect();
  let combo_limit = bracket.limits.limit_for(COMBO_CATEGORY);
  let combo_status = status_for(cheap_early.len() as u32, combo_limit, None);
  if combo_status == Status::Fail {
    messages.push("Two-card combos present beyond allowed bracket".to_string());
  }
  categories.insert(
    COMBO_CATEGORY.to_string(),
    CategoryFinding {
      count: cheap_early.len() as u32,
      limit: combo_limit,
      flagged: cheap_early.iter().map(|p| format!("{} + {}", p.a, p.b)).collect(),
      status: combo_status,
      notes: vec!["Only counting cheap/early combos per policy".to_string()],
    },
  );

  // Commander on the game-changers list: automatic FAIL for brackets 1-2;
  // bracket 3 already counts it toward the limit via name matching above
  let mut commander_flagged = false;
  if let Some(name) = commander_name {
    let gch = policies.canonical_list("game_changers");
    if gch.contains(&canonicalize(name)) {
      commander_flagged = true;
      if bracket.level <= 2 {
        messages.push("Commander is on Game Changers list (not allowed for this bracket)".to_string());
        if let Some(cat) = categories.get_mut("game_changers") {
          cat.status = Status::Fail;
          if !cat.flagged.iter().any(|n| n == name) {
            cat.flagged.push(name.to_string());
          }
        }
      }
    }
  }

  let overall = if categories.values().any(|c| c.status == Status::Fail) {
    Status::Fail
  } else if categories.values().any(|c| c.status == Status::Warn) {
    Status::Warn
  } else {
    Status::Pass
  };

  let mut list_versions: BTreeMap<String, Option<String>> = BTreeMap::new();
  for category in &POLICY_CATEGORIES {
    list_versions.insert(
      category.to_string(),
      policies.lists.get(*category).and_then(|l| l.list_version.clone()),
    );
  }

  ComplianceReport {
    bracket: bracket.name.to_lowercase(),
    level: bracket.level,
    overall,
    commander_flagged,
    categories,
    combos,
    list_versions,
    messages,
    enforcement: None,
  }
}

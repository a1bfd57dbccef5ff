//! # Deck library: the mutable build target
use crate::constants;

/// Why a card is in the deck. Every entry except the commander also carries
/// a non-empty `added_by` phase identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  Commander,
  Basic,
  Staple,
  Kindred,
  Fetch,
  Dual,
  Triple,
  Utility,
  Optimized,
  Flex,
  #[serde(rename = "color-fix")]
  ColorFix,
  Creature,
  Ramp,
  Removal,
  Wipe,
  CardAdvantage,
  Protection,
  ThemeSpell,
  Filler,
}

impl Role {
  pub fn as_str(self) -> &'static str {
    match self {
      Role::Commander => "commander",
      Role::Basic => "basic",
      Role::Staple => "staple",
      Role::Kindred => "kindred",
      Role::Fetch => "fetch",
      Role::Dual => "dual",
      Role::Triple => "triple",
      Role::Utility => "utility",
      Role::Optimized => "optimized",
      Role::Flex => "flex",
      Role::ColorFix => "color-fix",
      Role::Creature => "creature",
      Role::Ramp => "ramp",
      Role::Removal => "removal",
      Role::Wipe => "wipe",
      Role::CardAdvantage => "card_advantage",
      Role::Protection => "protection",
      Role::ThemeSpell => "theme_spell",
      Role::Filler => "filler",
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckEntry {
  pub count: u32,
  pub card_type: String,
  pub mana_cost: String,
  pub mana_value: f32,
  #[serde(default)]
  pub creature_types: Vec<String>,
  #[serde(default)]
  pub tags: Vec<String>,
  pub role: Role,
  #[serde(default)]
  pub sub_role: Option<String>,
  pub added_by: String,
  #[serde(default)]
  pub trigger_tag: Option<String>,
  /// Count of matched selected themes at pick time
  #[serde(default)]
  pub synergy: Option<u32>,
  /// Stable insertion index for deterministic ordering
  pub added_at: u32,
}

impl DeckEntry {
  pub fn is_commander(&self) -> bool {
    self.role == Role::Commander
  }

  pub fn is_locked(&self) -> bool {
    self.added_by == "lock"
  }

  pub fn is_land(&self) -> bool {
    self.card_type.to_lowercase().contains("land")
  }

  pub fn is_creature(&self) -> bool {
    self.card_type.to_lowercase().contains("creature")
  }

  pub fn has_tag_containing(&self, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    self.tags.iter().any(|t| t.to_lowercase().contains(&needle))
  }
}

/// Insertion-ordered card name -> entry map. Iteration order is the order
/// cards were first added, which keeps builds reproducible for a fixed seed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeckLibrary {
  entries: std::collections::HashMap<String, DeckEntry>,
  order: Vec<String>,
  next_index: u32,
}

impl DeckLibrary {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.entries.contains_key(name)
  }

  pub fn get(&self, name: &str) -> Option<&DeckEntry> {
    self.entries.get(name)
  }

  pub fn get_mut(&mut self, name: &str) -> Option<&mut DeckEntry> {
    self.entries.get_mut(name)
  }

  /// Add one copy (or merge into an existing stack for basics/multi-copy)
  pub fn add(&mut self, name: &str, mut entry: DeckEntry) {
    if let Some(existing) = self.entries.get_mut(name) {
      existing.count += entry.count.max(1);
      return;
    }
    if entry.count == 0 {
      entry.count = 1;
    }
    entry.added_at = self.next_index;
    self.next_index += 1;
    self.order.push(name.to_string());
    self.entries.insert(name.to_string(), entry);
  }

  /// Remove one copy; drops the entry at zero. Returns false if absent.
  pub fn decrement(&mut self, name: &str) -> bool {
    match self.entries.get_mut(name) {
      Some(entry) if entry.count > 1 => {
        entry.count -= 1;
        true
      }
      Some(_) => {
        self.entries.remove(name);
        self.order.retain(|n| n != name);
        true
      }
      None => false,
    }
  }

  /// Remove the whole stack
  pub fn remove(&mut self, name: &str) -> Option<DeckEntry> {
    let removed = self.entries.remove(name);
    if removed.is_some() {
      self.order.retain(|n| n != name);
    }
    removed
  }

  pub fn iter_ordered(&self) -> impl Iterator<Item = (&String, &DeckEntry)> {
    self.order.iter().filter_map(move |n| self.entries.get(n).map(|e| (n, e)))
  }

  pub fn names(&self) -> impl Iterator<Item = &String> {
    self.order.iter()
  }

  pub fn unique_len(&self) -> usize {
    self.order.len()
  }

  pub fn total_count(&self) -> u32 {
    self.entries.values().map(|e| e.count).sum()
  }

  pub fn land_count(&self) -> u32 {
    self.entries.values().filter(|e| e.is_land()).map(|e| e.count).sum()
  }

  pub fn creature_count(&self) -> u32 {
    self
      .entries
      .values()
      .filter(|e| !e.is_commander() && e.is_creature())
      .map(|e| e.count)
      .sum()
  }

  pub fn count_basic_lands(&self) -> u32 {
    let basics = constants::basic_land_names();
    self
      .entries
      .iter()
      .filter(|(n, _)| basics.contains(n.as_str()))
      .map(|(_, e)| e.count)
      .sum()
  }

  /// The most abundant basic, for trimming. Ties break by name so trims are
  /// deterministic.
  pub fn choose_basic_to_trim(&self) -> Option<String> {
    let basics = constants::basic_land_names();
    self
      .entries
      .iter()
      .filter(|(n, e)| basics.contains(n.as_str()) && e.count > 0)
      .max_by(|a, b| a.1.count.cmp(&b.1.count).then_with(|| a.0.cmp(b.0)))
      .map(|(n, _)| n.clone())
  }

  /// Trim basics above the floor until the land count fits the target.
  /// Returns how many basics were removed.
  pub fn enforce_land_cap(&mut self, land_target: u32, basic_floor: u32) -> u32 {
    let mut removed = 0;
    while self.land_count() > land_target {
      if self.count_basic_lands() <= basic_floor {
        warn!(
          "land cap: basics at floor {} with {} lands over target {}",
          basic_floor,
          self.land_count(),
          land_target
        );
        break;
      }
      match self.choose_basic_to_trim() {
        Some(name) if self.decrement(&name) => removed += 1,
        _ => break,
      }
    }
    removed
  }

  /// Free one land slot by trimming a basic above the floor. Used by land
  /// phases that want to add when already at the target.
  pub fn free_land_slot(&mut self, land_target: u32, basic_floor: u32) -> bool {
    if self.land_count() < land_target {
      return true;
    }
    if self.count_basic_lands() <= basic_floor {
      return false;
    }
    match self.choose_basic_to_trim() {
      Some(name) => self.decrement(&name) && self.land_count() < land_target,
      None => false,
    }
  }
}

/// ceil(factor * configured minimum); trims never go below this
pub fn basic_floor(min_basics: u32) -> u32 {
  (constants::BASIC_FLOOR_FACTOR * min_basics as f64).ceil() as u32
}

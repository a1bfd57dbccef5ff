//! # Internal card representation
//!
pub use crate::card::mana_cost::*;
use std::hash::{Hash, Hasher};

/// Layouts whose cards have more than one face; used by the multi-face land
/// detector to count MDFC-style cards as land sources
pub const MULTI_FACE_LAYOUTS: [&str; 10] = [
    "adventure",
    "aftermath",
    "augment",
    "flip",
    "host",
    "meld",
    "modal_dfc",
    "reversible_card",
    "split",
    "transform",
];

/// Card represents a tagged catalog row. Immutable during a build.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    /// String representing the card name (unique key)
    pub name: String,
    /// The printed type line, e.g. "Legendary Creature — Goblin Warrior"
    pub type_line: String,
    /// String representing the card mana cost, in "{X}{R}{R}" style format
    pub mana_cost_string: String,
    /// Converted mana cost as reported by the catalog
    pub mana_value: f32,
    /// Color identity of the card
    pub color_identity: ColorSet,
    /// Rules text, lowercased at load for substring heuristics
    pub text: String,
    /// Theme tags, lowercased at load
    pub theme_tags: Vec<String>,
    pub creature_types: Vec<String>,
    pub keywords: Vec<String>,
    /// Lower is better; missing ranks sort last
    pub edhrec_rank: Option<u32>,
    pub power: String,
    pub toughness: String,
    pub is_commander_legal: bool,
    /// Multi-face metadata
    pub layout: String,
    pub side: String,
    pub face_name: String,
    pub back_type: String,
}

impl Card {
    pub fn new() -> Self {
        Self {
            is_commander_legal: true,
            ..Self::default()
        }
    }

    pub fn mana_cost(&self) -> ManaCost {
        ManaCost::from_string(&self.mana_cost_string)
    }

    fn type_contains(&self, needle: &str) -> bool {
        self.type_line.to_lowercase().contains(needle)
    }

    pub fn is_land(&self) -> bool {
        self.type_contains("land")
    }

    pub fn is_creature(&self) -> bool {
        self.type_contains("creature")
    }

    pub fn is_artifact(&self) -> bool {
        self.type_contains("artifact")
    }

    pub fn is_enchantment(&self) -> bool {
        self.type_contains("enchantment")
    }

    pub fn is_instant(&self) -> bool {
        self.type_contains("instant")
    }

    pub fn is_sorcery(&self) -> bool {
        self.type_contains("sorcery")
    }

    pub fn is_planeswalker(&self) -> bool {
        self.type_contains("planeswalker")
    }

    pub fn is_battle(&self) -> bool {
        self.type_contains("battle")
    }

    pub fn is_legendary(&self) -> bool {
        self.type_contains("legendary")
    }

    /// Primary type used for library organization and export
    pub fn primary_type(&self) -> &'static str {
        if self.is_planeswalker() {
            "Planeswalker"
        } else if self.is_battle() {
            "Battle"
        } else if self.is_creature() {
            "Creature"
        } else if self.is_instant() {
            "Instant"
        } else if self.is_sorcery() {
            "Sorcery"
        } else if self.is_land() {
            "Land"
        } else if self.is_artifact() {
            "Artifact"
        } else if self.is_enchantment() {
            "Enchantment"
        } else {
            "Other"
        }
    }

    /// Exact tag membership (tags are stored lowercased)
    pub fn has_tag(&self, tag: &str) -> bool {
        let needle = tag.to_lowercase();
        self.theme_tags.iter().any(|t| *t == needle)
    }

    /// Substring tag membership, e.g. "ramp" matches "big ramp"
    pub fn has_tag_containing(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.theme_tags.iter().any(|t| t.contains(&needle))
    }

    /// Number of the given tags present on this card (exact membership)
    pub fn matched_tag_count(&self, tags: &[String]) -> usize {
        tags.iter().filter(|t| self.theme_tags.iter().any(|c| c == *t)).count()
    }

    pub fn numeric_power(&self) -> i32 {
        self.power.trim().parse::<i32>().unwrap_or(0)
    }

    /// Sort key for popularity; missing ranks sort last
    pub fn rank_or_max(&self) -> u32 {
        self.edhrec_rank.unwrap_or(u32::MAX)
    }

    pub fn has_multi_face_layout(&self) -> bool {
        let layout = self.layout.to_lowercase();
        MULTI_FACE_LAYOUTS.iter().any(|l| *l == layout)
    }

    /// True if the back face of a multi-faced card is a land (MDFC lands)
    pub fn back_face_is_land(&self) -> bool {
        self.has_multi_face_layout() && self.back_type.to_lowercase().contains("land")
    }

    /// True if this card counts as a land source: a land proper, or a
    /// multi-faced card with a land back face
    pub fn counts_as_land_source(&self) -> bool {
        self.is_land() || self.back_face_is_land()
    }

    /// True if this row describes a secondary face rather than a whole card
    pub fn is_secondary_face(&self) -> bool {
        matches!(self.side.to_lowercase().as_str(), "b" | "back" | "c")
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use crate::card::*;

    fn land(name: &str, type_line: &str) -> Card {
        let mut c = Card::new();
        c.name = name.to_string();
        c.type_line = type_line.to_string();
        c
    }

    #[test]
    fn type_line_detection() {
        let c = land("Steam Vents", "Land — Island Mountain");
        assert!(c.is_land());
        assert!(!c.is_creature());
        assert_eq!(c.primary_type(), "Land");
    }

    #[test]
    fn artifact_creature_is_creature_first() {
        let c = land("Solemn Simulacrum", "Artifact Creature — Golem");
        assert!(c.is_creature());
        assert!(c.is_artifact());
        assert_eq!(c.primary_type(), "Creature");
    }

    #[test]
    fn mdfc_back_land() {
        let mut c = Card::new();
        c.name = "Bala Ged Recovery // Bala Ged Sanctuary".to_string();
        c.type_line = "Sorcery".to_string();
        c.layout = "modal_dfc".to_string();
        c.back_type = "Land".to_string();
        assert!(!c.is_land());
        assert!(c.back_face_is_land());
        assert!(c.counts_as_land_source());
    }

    #[test]
    fn tag_matching() {
        let mut c = Card::new();
        c.theme_tags = vec!["goblin kindred".to_string(), "tokens matter".to_string()];
        assert!(c.has_tag("Goblin Kindred"));
        assert!(c.has_tag_containing("kindred"));
        assert!(!c.has_tag("tokens"));
        let selected = vec!["goblin kindred".to_string(), "tokens matter".to_string()];
        assert_eq!(c.matched_tag_count(&selected), 2);
    }

    #[test]
    fn secondary_face_detection() {
        let mut c = Card::new();
        c.side = "b".to_string();
        assert!(c.is_secondary_face());
        c.side = "a".to_string();
        assert!(!c.is_secondary_face());
    }

    #[test]
    fn commander_power() {
        let mut c = Card::new();
        c.power = "5".to_string();
        assert_eq!(c.numeric_power(), 5);
        c.power = "*".to_string();
        assert_eq!(c.numeric_power(), 0);
    }
}

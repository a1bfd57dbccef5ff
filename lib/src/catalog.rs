//! # Tagged catalog loading and indexing
//!
//! The catalog is a tabular file of pre-tagged cards. It is loaded once per
//! process and treated as immutable; builds borrow it by reference. A
//! compressed bincode snapshot ("compiled catalog") can be produced with the
//! `csv2deckforge` converter for fast reloads.
use crate::card::{Card, ColorSet};
use crate::error::BuildError;
use crate::resolver::normalize_card_name;
use crate::tabular;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub cards: Vec<Card>,
    #[serde(skip)]
    name_index: HashMap<String, usize>,
    #[serde(skip)]
    tag_index: HashMap<String, Vec<usize>>,
}

impl Catalog {
    pub fn from_cards(cards: Vec<Card>) -> Self {
        let mut catalog = Self {
            cards,
            name_index: HashMap::new(),
            tag_index: HashMap::new(),
        };
        catalog.rebuild_indexes();
        catalog
    }

    fn rebuild_indexes(&mut self) {
        self.name_index.clear();
        self.tag_index.clear();
        for (idx, card) in self.cards.iter().enumerate() {
            let key = normalize_card_name(&card.name);
            self.name_index.entry(key).or_insert(idx);
            for tag in &card.theme_tags {
                self.tag_index.entry(tag.clone()).or_insert_with(Vec::new).push(idx);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card_from_name(&self, name: &str) -> Option<&Card> {
        self.row_from_name(name).map(|idx| &self.cards[idx])
    }

    pub fn row_from_name(&self, name: &str) -> Option<usize> {
        self.name_index.get(&normalize_card_name(name)).copied()
    }

    /// Row ids carrying the given tag (exact, lowercased). O(1) membership.
    pub fn rows_with_tag(&self, tag: &str) -> &[usize] {
        self.tag_index
            .get(&tag.to_lowercase())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Iterator over (tag, row ids); used by the random-mode synergy fallback
    pub fn tag_index_entries(&self) -> impl Iterator<Item = (&String, &Vec<usize>)> {
        self.tag_index.iter()
    }

    /// Rows eligible as commanders: legal legendary creatures plus cards
    /// whose text grants commander eligibility
    pub fn commander_pool(&self) -> Vec<usize> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                c.is_commander_legal
                    && ((c.is_legendary() && c.is_creature())
                        || c.text.contains("can be your commander"))
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Resolve a secondary face name to the full card that carries it
    pub fn front_face_of(&self, face_name: &str) -> Option<&str> {
        let needle = normalize_card_name(face_name);
        self.cards
            .iter()
            .find(|c| {
                !c.is_secondary_face()
                    && c.name.contains(" // ")
                    && c.name
                        .split(" // ")
                        .any(|part| normalize_card_name(part) == needle)
            })
            .map(|c| c.name.as_str())
    }

    /// The pool a build starts from: rows inside the commander's color
    /// identity, minus excluded names, optionally restricted to owned names.
    /// Secondary-face rows are dropped; faces are represented by their card.
    pub fn build_pool(
        &self,
        identity: ColorSet,
        exclude: &HashSet<String>,
        owned_only: Option<&HashSet<String>>,
    ) -> Vec<usize> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                c.color_identity.is_subset(identity)
                    && !c.is_secondary_face()
                    && !exclude.contains(&normalize_card_name(&c.name))
                    && owned_only
                        .map(|set| set.contains(&normalize_card_name(&c.name)))
                        .unwrap_or(true)
            })
            .map(|(i, _)| i)
            .collect()
    }

    // ---------------------------
    // Loading
    // ---------------------------
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        if !path.exists() {
            return Err(BuildError::CatalogUnavailable(format!(
                "no catalog at {}",
                path.display()
            )));
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => Self::load_csv(path),
            _ => Self::load_compiled(path),
        }
    }

    pub fn load_csv(path: &Path) -> Result<Self, BuildError> {
        let text = fs::read_to_string(path)
            .map_err(|e| BuildError::CatalogUnavailable(format!("{}: {}", path.display(), e)))?;
        Self::from_csv_str(&text)
    }

    pub fn from_csv_str(text: &str) -> Result<Self, BuildError> {
        let rows = tabular::parse(text);
        if rows.is_empty() {
            return Err(BuildError::CatalogUnavailable("empty catalog".to_string()));
        }
        let header = &rows[0];
        let col = |names: &[&str]| -> Option<usize> {
            names
                .iter()
                .find_map(|n| header.iter().position(|h| h.eq_ignore_ascii_case(n)))
        };
        let name_col = col(&["name"]).ok_or_else(|| {
            BuildError::CatalogUnavailable("catalog missing 'name' column".to_string())
        })?;
        let type_col = col(&["type", "type_line", "typeLine"]).ok_or_else(|| {
            BuildError::CatalogUnavailable("catalog missing 'type' column".to_string())
        })?;
        let mana_cost_col = col(&["manaCost", "mana_cost"]);
        let mana_value_col = col(&["manaValue", "mana_value", "cmc"]);
        let identity_col = col(&["colorIdentity", "color_identity"]);
        let text_col = col(&["text", "oracleText"]);
        let tags_col = col(&["themeTags", "theme_tags"]);
        let types_col = col(&["creatureTypes"]);
        let keywords_col = col(&["keywords"]);
        let rank_col = col(&["edhrecRank", "edhrec_rank"]);
        let power_col = col(&["power"]);
        let toughness_col = col(&["toughness"]);
        let legal_col = col(&["isCommanderLegal", "commanderLegal"]);
        let layout_col = col(&["layout"]);
        let side_col = col(&["side"]);
        let face_col = col(&["faceName", "face_name"]);
        let back_col = col(&["backType", "back_type"]);

        let get = |row: &[String], idx: Option<usize>| -> String {
            idx.and_then(|i| row.get(i)).cloned().unwrap_or_default()
        };

        let mut cards = Vec::with_capacity(rows.len() - 1);
        for row in &rows[1..] {
            let name = get(row, Some(name_col));
            if name.is_empty() {
                continue;
            }
            let mut card = Card::new();
            card.name = name;
            card.type_line = get(row, Some(type_col));
            card.mana_cost_string = get(row, mana_cost_col);
            card.mana_value = get(row, mana_value_col).trim().parse::<f32>().unwrap_or(0.0);
            card.color_identity = ColorSet::from_letters(&get(row, identity_col));
            card.text = get(row, text_col).to_lowercase();
            card.theme_tags = tabular::parse_list_cell(&get(row, tags_col))
                .into_iter()
                .map(|t| t.to_lowercase())
                .collect();
            card.creature_types = tabular::parse_list_cell(&get(row, types_col));
            card.keywords = tabular::parse_list_cell(&get(row, keywords_col));
            card.edhrec_rank = get(row, rank_col).trim().parse::<f64>().ok().map(|r| r as u32);
            card.power = get(row, power_col);
            card.toughness = get(row, toughness_col);
            card.is_commander_legal = match get(row, legal_col).trim().to_lowercase().as_str() {
                "" => true,
                "false" | "0" | "no" => false,
                _ => true,
            };
            card.layout = get(row, layout_col).to_lowercase();
            card.side = get(row, side_col).to_lowercase();
            card.face_name = get(row, face_col);
            card.back_type = get(row, back_col);
            cards.push(card);
        }
        info!("catalog loaded: {} cards", cards.len());
        Ok(Self::from_cards(cards))
    }

    /// Reads a gzip-compressed bincode snapshot produced by `csv2deckforge`
    pub fn load_compiled(path: &Path) -> Result<Self, BuildError> {
        let bytes = fs::read(path)
            .map_err(|e| BuildError::CatalogUnavailable(format!("{}: {}", path.display(), e)))?;
        let mut gz = GzDecoder::new(&bytes[..]);
        let mut raw: Vec<u8> = Vec::new();
        gz.read_to_end(&mut raw)?;
        let cards: Vec<Card> = bincode::deserialize(&raw)?;
        Ok(Self::from_cards(cards))
    }

    pub fn save_compiled(&self, path: &Path) -> Result<(), BuildError> {
        let raw = bincode::serialize(&self.cards)?;
        let file = fs::File::create(path)?;
        let mut gz = GzEncoder::new(file, Compression::default());
        gz.write_all(&raw)?;
        gz.finish()?;
        Ok(())
    }
}

/// Process-level catalog holder with mtime-based invalidation.
/// `refresh` is cheap inside the TTL window and only reloads when the
/// underlying file changed.
pub struct CatalogService {
    path: PathBuf,
    catalog: Catalog,
    loaded_mtime: Option<SystemTime>,
    checked_at: Instant,
    ttl: Duration,
}

impl CatalogService {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

    pub fn open(path: &Path) -> Result<Self, BuildError> {
        let catalog = Catalog::load(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            catalog,
            loaded_mtime: fs::metadata(path).and_then(|m| m.modified()).ok(),
            checked_at: Instant::now(),
            ttl: Self::DEFAULT_TTL,
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Reload the catalog if the TTL elapsed and the file changed on disk.
    /// Returns true when a reload happened.
    pub fn refresh(&mut self) -> Result<bool, BuildError> {
        if self.checked_at.elapsed() < self.ttl {
            return Ok(false);
        }
        self.checked_at = Instant::now();
        let mtime = fs::metadata(&self.path).and_then(|m| m.modified()).ok();
        if mtime == self.loaded_mtime {
            return Ok(false);
        }
        info!("catalog changed on disk, reloading {}", self.path.display());
        self.catalog = Catalog::load(&self.path)?;
        self.loaded_mtime = mtime;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::*;

    const CSV: &str = "\
name,type,manaCost,manaValue,colorIdentity,text,themeTags,creatureTypes,keywords,edhrecRank,power,toughness,layout,side,faceName,backType
Krenko Mob Boss,Legendary Creature — Goblin Warrior,{2}{R}{R},4,R,\"{t}: create x 1/1 red goblin creature tokens\",\"['Goblin Kindred', 'Tokens Matter']\",\"['Goblin', 'Warrior']\",[],350,3,3,normal,,,
Mountain,Basic Land — Mountain,,0,R,{t}: add {r}.,[],[],[],1,,,normal,,,
Sol Ring,Artifact,{1},1,,\"{t}: add {c}{c}.\",['Ramp'],[],[],1,,,normal,,,
";

    #[test]
    fn loads_csv_and_indexes_tags() {
        let cat = Catalog::from_csv_str(CSV).unwrap();
        assert_eq!(cat.len(), 3);
        let krenko = cat.card_from_name("krenko mob boss").unwrap();
        assert_eq!(krenko.mana_value, 4.0);
        assert!(krenko.has_tag("goblin kindred"));
        assert_eq!(cat.rows_with_tag("Ramp").len(), 1);
        assert_eq!(cat.rows_with_tag("nope").len(), 0);
    }

    #[test]
    fn commander_pool_is_legendary_creatures() {
        let cat = Catalog::from_csv_str(CSV).unwrap();
        let pool = cat.commander_pool();
        assert_eq!(pool.len(), 1);
        assert_eq!(cat.cards[pool[0]].name, "Krenko Mob Boss");
    }

    #[test]
    fn build_pool_honors_identity_and_excludes() {
        let cat = Catalog::from_csv_str(CSV).unwrap();
        let red = ColorSet::from_letters("R");
        let mut exclude = HashSet::new();
        exclude.insert(normalize_card_name("Sol Ring"));
        let pool = cat.build_pool(red, &exclude, None);
        let names: Vec<&str> = pool.iter().map(|i| cat.cards[*i].name.as_str()).collect();
        assert!(names.contains(&"Krenko Mob Boss"));
        assert!(names.contains(&"Mountain"));
        assert!(!names.contains(&"Sol Ring"));
        // colorless pool only sees colorless cards
        let pool = cat.build_pool(ColorSet::new(), &HashSet::new(), None);
        let names: Vec<&str> = pool.iter().map(|i| cat.cards[*i].name.as_str()).collect();
        assert_eq!(names, vec!["Sol Ring"]);
    }

    #[test]
    fn compiled_roundtrip() {
        let cat = Catalog::from_csv_str(CSV).unwrap();
        let path = std::env::temp_dir().join("deckforge_catalog_test.bin.gz");
        cat.save_compiled(&path).unwrap();
        let reloaded = Catalog::load_compiled(&path).unwrap();
        assert_eq!(reloaded.len(), cat.len());
        assert!(reloaded.card_from_name("Krenko Mob Boss").is_some());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_catalog_unavailable() {
        let err = Catalog::load(Path::new("/nonexistent/cards.csv")).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}

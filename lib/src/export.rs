//! # Decklist exports: CSV, TXT, and JSON sidecars
use crate::builder::BuildResult;
use crate::catalog::Catalog;
use crate::error::BuildError;
use crate::resolver::normalize_card_name;
use crate::tabular;
use chrono::{DateTime, Local};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

pub const CSV_HEADER: [&str; 15] = [
  "Name",
  "Count",
  "Type",
  "ManaCost",
  "ManaValue",
  "Colors",
  "Power",
  "Toughness",
  "Role",
  "SubRole",
  "AddedBy",
  "TriggerTag",
  "Tags",
  "Text",
  "Owned",
];

/// One row per stack (basics may carry count > 1)
pub fn decklist_csv(result: &BuildResult, catalog: &Catalog, owned: &HashSet<String>) -> String {
  let mut out = tabular::format_row(&CSV_HEADER.iter().map(|s| s.to_string()).collect::<Vec<_>>());
  for entry in &result.decklist {
    let card = catalog.card_from_name(&entry.name);
    let (type_line, mana_cost, mana_value, colors, power, toughness, text) = match card {
      Some(c) => (
        c.type_line.clone(),
        c.mana_cost_string.clone(),
        format!("{}", c.mana_value),
        c.color_identity.letters(),
        c.power.clone(),
        c.toughness.clone(),
        c.text.clone(),
      ),
      None => (
        "Basic Land".to_string(),
        String::new(),
        "0".to_string(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
      ),
    };
    let fields = vec![
      entry.name.clone(),
      entry.count.to_string(),
      type_line,
      mana_cost,
      mana_value,
      colors,
      power,
      toughness,
      entry.role.as_str().to_string(),
      entry.sub_role.clone().unwrap_or_default(),
      entry.added_by.clone(),
      String::new(),
      entry.tags.join("; "),
      text,
      if owned.contains(&normalize_card_name(&entry.name)) { "1" } else { "0" }.to_string(),
    ];
    out.push_str(&tabular::format_row(&fields));
  }
  out
}

/// Reconstruct the name -> count map from an exported CSV
pub fn parse_decklist_csv(text: &str) -> Vec<(String, u32)> {
  let rows = tabular::parse(text);
  if rows.is_empty() {
    return Vec::new();
  }
  let name_col = rows[0].iter().position(|h| h == "Name").unwrap_or(0);
  let count_col = rows[0].iter().position(|h| h == "Count").unwrap_or(1);
  rows[1..]
    .iter()
    .filter_map(|row| {
      let name = row.get(name_col)?.clone();
      let count = row.get(count_col)?.parse::<u32>().ok()?;
      if name.is_empty() {
        None
      } else {
        Some((name, count))
      }
    })
    .collect()
}

/// Plain text list: `# ` comment headers then one `<count> <name>` per line
pub fn decklist_txt(result: &BuildResult, timestamp: DateTime<Local>) -> String {
  let mut out = String::new();
  out.push_str(&format!("# Commander: {}\n", result.commander));
  out.push_str(&format!(
    "# Themes: {}\n",
    if result.diagnostics.resolved_themes.is_empty() {
      "(none)".to_string()
    } else {
      result.diagnostics.resolved_themes.join(", ")
    }
  ));
  out.push_str(&format!("# Colors: {}\n", result.summary.colors.join(", ")));
  out.push_str(&format!(
    "# Bracket: {} (level {})\n",
    result.compliance.bracket, result.compliance.level
  ));
  let synergy_entries: Vec<u32> = result
    .decklist
    .iter()
    .filter_map(|e| {
      // synergy lives on the library entry; tags overlap works as a proxy
      let matches = result
        .diagnostics
        .resolved_themes
        .iter()
        .filter(|t| e.tags.iter().any(|tag| tag == *t))
        .count() as u32;
      if matches > 0 {
        Some(matches)
      } else {
        None
      }
    })
    .collect();
  if !synergy_entries.is_empty() {
    let avg = synergy_entries.iter().sum::<u32>() as f64 / synergy_entries.len() as f64;
    out.push_str(&format!(
      "# Synergy: {} theme matches, avg {:.2}\n",
      synergy_entries.len(),
      avg
    ));
  }
  // tag summary: tags on 3+ cards, wipe tags always shown
  let mut tag_counts: BTreeMap<&str, u32> = BTreeMap::new();
  for entry in &result.decklist {
    for tag in &entry.tags {
      *tag_counts.entry(tag.as_str()).or_insert(0) += 1;
    }
  }
  let shown: Vec<String> = tag_counts
    .iter()
    .filter(|(tag, count)| {
      **count >= crate::constants::TAG_SUMMARY_MIN_COUNT as u32
        || crate::constants::TAG_SUMMARY_ALWAYS_SHOW_SUBSTRS.iter().any(|s| tag.contains(s))
    })
    .map(|(tag, count)| format!("{} x{}", tag, count))
    .collect();
  if !shown.is_empty() {
    out.push_str(&format!("# Tags: {}\n", shown.join(", ")));
  }
  out.push_str(&format!("# Exported: {}\n", timestamp.format("%Y-%m-%d %H:%M:%S")));
  for entry in &result.decklist {
    out.push_str(&format!("{} {}\n", entry.count, entry.name));
  }
  out
}

#[derive(Debug, Serialize)]
struct SummarySidecar<'a> {
  meta: SidecarMeta<'a>,
  summary: &'a crate::summary::DeckSummary,
}

#[derive(Debug, Serialize)]
struct SidecarMeta<'a> {
  commander: &'a str,
  themes: &'a [String],
  bracket: &'a str,
  level: u8,
  seed: u64,
  exported_at: String,
}

/// Write the CSV, TXT, summary sidecar and compliance sidecar next to each
/// other under `dir` with the given file stem. Returns the written paths.
pub fn write_all(
  result: &BuildResult,
  catalog: &Catalog,
  owned: &HashSet<String>,
  dir: &Path,
  stem: &str,
) -> Result<Vec<PathBuf>, BuildError> {
  fs::create_dir_all(dir)?;
  let now = Local::now();
  let mut written = Vec::new();

  let csv_path = dir.join(format!("{}.csv", stem));
  fs::write(&csv_path, decklist_csv(result, catalog, owned))?;
  written.push(csv_path);

  let txt_path = dir.join(format!("{}.txt", stem));
  fs::write(&txt_path, decklist_txt(result, now))?;
  written.push(txt_path);

  let sidecar = SummarySidecar {
    meta: SidecarMeta {
      commander: &result.commander,
      themes: &result.diagnostics.resolved_themes,
      bracket: &result.compliance.bracket,
      level: result.compliance.level,
      seed: result.diagnostics.seed,
      exported_at: now.to_rfc3339(),
    },
    summary: &result.summary,
  };
  let summary_path = dir.join(format!("{}.summary.json", stem));
  fs::write(&summary_path, serde_json::to_string_pretty(&sidecar)?)?;
  written.push(summary_path);

  let compliance_path = dir.join(format!("{}_compliance.json", stem));
  fs::write(&compliance_path, serde_json::to_string_pretty(&result.compliance)?)?;
  written.push(compliance_path);

  info!("exported {} files under {}", written.len(), dir.display());
  Ok(written)
}

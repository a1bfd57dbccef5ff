//! # Minimal CSV reading/writing for the tagged catalog and decklist exports
//!
//! Quote-aware: handles embedded commas, double-quote escaping, and quoted
//! newlines. This is all the catalog format needs; no external dialects.

/// Parses CSV text into rows of fields
pub fn parse(text: &str) -> Vec<Vec<String>> {
  let mut rows: Vec<Vec<String>> = Vec::new();
  let mut row: Vec<String> = Vec::new();
  let mut field = String::new();
  let mut in_quotes = false;
  let mut chars = text.chars().peekable();
  while let Some(c) = chars.next() {
    if in_quotes {
      match c {
        '"' => {
          if chars.peek() == Some(&'"') {
            chars.next();
            field.push('"');
          } else {
            in_quotes = false;
          }
        }
        _ => field.push(c),
      }
      continue;
    }
    match c {
      '"' => in_quotes = true,
      ',' => {
        row.push(std::mem::take(&mut field));
      }
      '\r' => {}
      '\n' => {
        row.push(std::mem::take(&mut field));
        rows.push(std::mem::take(&mut row));
      }
      _ => field.push(c),
    }
  }
  if !field.is_empty() || !row.is_empty() {
    row.push(field);
    rows.push(row);
  }
  rows
}

/// Formats one row, quoting fields that need it
pub fn format_row(fields: &[String]) -> String {
  let mut out = String::new();
  for (i, f) in fields.iter().enumerate() {
    if i > 0 {
      out.push(',');
    }
    if f.contains(',') || f.contains('"') || f.contains('\n') {
      out.push('"');
      out.push_str(&f.replace('"', "\"\""));
      out.push('"');
    } else {
      out.push_str(f);
    }
  }
  out.push('\n');
  out
}

/// Parses a list-typed cell: "['A', 'B']", "A, B", or "A; B"
pub fn parse_list_cell(raw: &str) -> Vec<String> {
  let mut s = raw.trim();
  if s.starts_with('[') && s.ends_with(']') {
    s = &s[1..s.len() - 1];
  }
  s.replace(';', ",")
    .split(',')
    .map(|p| p.trim().trim_matches(|c| c == '\'' || c == '"').trim().to_string())
    .filter(|p| !p.is_empty())
    .collect()
}

#[cfg(test)]
mod tests {
  use crate::tabular::*;

  #[test]
  fn parse_simple() {
    let rows = parse("a,b,c\n1,2,3\n");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], vec!["a", "b", "c"]);
    assert_eq!(rows[1], vec!["1", "2", "3"]);
  }

  #[test]
  fn parse_quoted_comma_and_escape() {
    let rows = parse("name,text\n\"Krenko, Mob Boss\",\"says \"\"hi\"\"\"\n");
    assert_eq!(rows[1][0], "Krenko, Mob Boss");
    assert_eq!(rows[1][1], "says \"hi\"");
  }

  #[test]
  fn parse_quoted_newline() {
    let rows = parse("a\n\"line one\nline two\"\n");
    assert_eq!(rows[1][0], "line one\nline two");
  }

  #[test]
  fn parse_crlf() {
    let rows = parse("a,b\r\n1,2\r\n");
    assert_eq!(rows[1], vec!["1", "2"]);
  }

  #[test]
  fn roundtrip_row() {
    let fields = vec![
      "Krenko, Mob Boss".to_string(),
      "plain".to_string(),
      "with \"quotes\"".to_string(),
    ];
    let line = format_row(&fields);
    let rows = parse(&line);
    assert_eq!(rows[0], fields);
  }

  #[test]
  fn list_cells() {
    assert_eq!(parse_list_cell("['Goblin', 'Warrior']"), vec!["Goblin", "Warrior"]);
    assert_eq!(parse_list_cell("Goblin, Warrior"), vec!["Goblin", "Warrior"]);
    assert_eq!(parse_list_cell("Goblin; Warrior"), vec!["Goblin", "Warrior"]);
    assert!(parse_list_cell("").is_empty());
    assert!(parse_list_cell("[]").is_empty());
  }
}

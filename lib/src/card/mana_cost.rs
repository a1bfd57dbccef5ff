use regex::Regex;

/// ManaColor represents a [color](https://mtg.gamepedia.com/Color)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ManaColor {
  #[serde(rename = "W")]
  White = 0,
  #[serde(rename = "U")]
  Blue = 1,
  #[serde(rename = "B")]
  Black = 2,
  #[serde(rename = "R")]
  Red = 3,
  #[serde(rename = "G")]
  Green = 4,
}

impl ManaColor {
  pub const ALL: [ManaColor; 5] = [
    ManaColor::White,
    ManaColor::Blue,
    ManaColor::Black,
    ManaColor::Red,
    ManaColor::Green,
  ];

  pub fn letter(self) -> char {
    match self {
      ManaColor::White => 'W',
      ManaColor::Blue => 'U',
      ManaColor::Black => 'B',
      ManaColor::Red => 'R',
      ManaColor::Green => 'G',
    }
  }

  pub fn from_letter(c: char) -> Option<Self> {
    match c {
      'W' => Some(ManaColor::White),
      'U' => Some(ManaColor::Blue),
      'B' => Some(ManaColor::Black),
      'R' => Some(ManaColor::Red),
      'G' => Some(ManaColor::Green),
      _ => None,
    }
  }

  /// The basic land that taps for this color
  pub fn basic_land(self) -> &'static str {
    match self {
      ManaColor::White => "Plains",
      ManaColor::Blue => "Island",
      ManaColor::Black => "Swamp",
      ManaColor::Red => "Mountain",
      ManaColor::Green => "Forest",
    }
  }

  pub fn snow_basic_land(self) -> &'static str {
    match self {
      ManaColor::White => "Snow-Covered Plains",
      ManaColor::Blue => "Snow-Covered Island",
      ManaColor::Black => "Snow-Covered Swamp",
      ManaColor::Red => "Snow-Covered Mountain",
      ManaColor::Green => "Snow-Covered Forest",
    }
  }

  /// Maps a basic land type word ("plains", "island", ...) to its color
  pub fn from_basic_type(word: &str) -> Option<Self> {
    match word {
      "plains" => Some(ManaColor::White),
      "island" => Some(ManaColor::Blue),
      "swamp" => Some(ManaColor::Black),
      "mountain" => Some(ManaColor::Red),
      "forest" => Some(ManaColor::Green),
      _ => None,
    }
  }
}

/// ColorSet is a WUBRG bitmask used for color identity and produced-color sets
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColorSet(pub u8);

impl ColorSet {
  pub fn new() -> Self {
    Self(0)
  }

  pub fn all() -> Self {
    let mut s = Self::new();
    for c in &ManaColor::ALL {
      s.insert(*c);
    }
    s
  }

  #[inline]
  fn bit(color: ManaColor) -> u8 {
    1 << (color as u8)
  }

  pub fn insert(&mut self, color: ManaColor) {
    self.0 |= Self::bit(color);
  }

  #[inline]
  pub fn contains(self, color: ManaColor) -> bool {
    self.0 & Self::bit(color) != 0
  }

  #[inline]
  pub fn is_subset(self, other: ColorSet) -> bool {
    self.0 & !other.0 == 0
  }

  pub fn len(self) -> usize {
    self.0.count_ones() as usize
  }

  pub fn is_empty(self) -> bool {
    self.0 == 0
  }

  pub fn is_five_color(self) -> bool {
    self.len() == 5
  }

  /// Colors in canonical WUBRG order
  pub fn colors(self) -> Vec<ManaColor> {
    ManaColor::ALL.iter().copied().filter(|c| self.contains(*c)).collect()
  }

  /// Canonical "W, U" style rendering used by the catalog and exports
  pub fn letters(self) -> String {
    let parts: Vec<String> = self.colors().iter().map(|c| c.letter().to_string()).collect();
    parts.join(", ")
  }

  /// Parses "W, U", "WU" and "['W', 'U']" style cells
  pub fn from_letters(raw: &str) -> Self {
    let mut set = Self::new();
    for ch in raw.chars() {
      if let Some(color) = ManaColor::from_letter(ch) {
        set.insert(color);
      }
    }
    set
  }
}

/// ManaCost holds the counted pips of a "{2}{W}{U}" style cost string.
/// Hybrid symbols count as their first colored component here; the even split
/// used for pip-demand analysis lives in [colored_pip_weights].
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ManaCost {
  pub w: u8,
  pub u: u8,
  pub b: u8,
  pub r: u8,
  pub g: u8,
  pub c: u8,
}

lazy_static! {
  static ref SYMBOL_REGEX: Regex = Regex::new(r"\{([^}]+)\}").expect("symbol regex");
}

impl ManaCost {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_string(cost: &str) -> Self {
    let mut out = Self::new();
    for cap in SYMBOL_REGEX.captures_iter(cost) {
      let sym = cap[1].to_ascii_uppercase();
      let first = sym.split('/').next().unwrap_or("");
      match first {
        "W" => out.w += 1,
        "U" => out.u += 1,
        "B" => out.b += 1,
        "R" => out.r += 1,
        "G" => out.g += 1,
        other => {
          // Numeric symbols add their value; X and friends count as 1
          out.c = out.c.saturating_add(other.parse::<u8>().unwrap_or(1));
        }
      }
    }
    out
  }

  /// Returns the converted mana cost
  #[inline]
  pub fn cmc(self) -> u8 {
    self.w + self.u + self.b + self.r + self.g + self.c
  }

  #[inline]
  pub fn colored(self) -> u8 {
    self.w + self.u + self.b + self.r + self.g
  }

  pub fn count_for(self, color: ManaColor) -> u8 {
    match color {
      ManaColor::White => self.w,
      ManaColor::Blue => self.u,
      ManaColor::Black => self.b,
      ManaColor::Red => self.r,
      ManaColor::Green => self.g,
    }
  }
}

/// Fractional colored-pip counts for a cost string, hybrid symbols split
/// evenly among their colored components: {W/U} contributes 0.5 W + 0.5 U,
/// while {2/G} and phyrexian {G/P} contribute 1.0 G.
pub fn colored_pip_weights(cost: &str) -> [f64; 5] {
  let mut pips = [0.0f64; 5];
  for cap in SYMBOL_REGEX.captures_iter(cost) {
    let sym = cap[1].to_ascii_uppercase();
    let colored: Vec<ManaColor> = sym
      .split('/')
      .filter_map(|part| {
        let part = part.trim();
        let mut chars = part.chars();
        match (chars.next(), chars.next()) {
          (Some(c), None) => ManaColor::from_letter(c),
          _ => None,
        }
      })
      .collect();
    if colored.is_empty() {
      continue;
    }
    let share = 1.0 / colored.len() as f64;
    for color in colored {
      pips[color as usize] += share;
    }
  }
  pips
}

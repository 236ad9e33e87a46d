use serde::Deserialize;
use std::fmt;

use sp_core::style::ColorSpec;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb` (leading `#` optional). `None` when malformed.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Self::rgb(r, g, b))
    }

    /// Like [`Color::parse_hex`], black on malformed input.
    pub fn hex(s: &str) -> Self {
        Self::parse_hex(s).unwrap_or(Self::BLACK)
    }

    pub const fn with_alpha(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    pub fn to_svg_fill(&self) -> String {
        if (self.a - 1.0).abs() < 1e-6 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation between two colors.
    pub fn lerp(a: Color, b: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: (a.r as f64 * (1.0 - t) + b.r as f64 * t).round() as u8,
            g: (a.g as f64 * (1.0 - t) + b.g as f64 * t).round() as u8,
            b: (a.b as f64 * (1.0 - t) + b.b as f64 * t).round() as u8,
            a: a.a * (1.0 - t) + b.a * t,
        }
    }

    /// Resolve a style-file colour.
    pub fn from_spec(spec: &ColorSpec) -> Option<Self> {
        match spec {
            ColorSpec::Index(i) => root_index(*i),
            ColorSpec::Name(s) => {
                let s = s.trim();
                if s.starts_with('#') {
                    Self::parse_hex(s)
                } else if let Ok(i) = s.parse::<i32>() {
                    root_index(i)
                } else {
                    root_name(s)
                }
            }
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_svg_fill())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::parse_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid colour '{}'", s)))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

// --- ROOT colours ---

/// Base indices of the ROOT colour wheel and their RGB.
const WHEEL: &[(&str, i32, (u8, u8, u8))] = &[
    ("kGray", 920, (204, 204, 204)),
    ("kRed", 632, (255, 0, 0)),
    ("kGreen", 416, (0, 255, 0)),
    ("kBlue", 600, (0, 0, 255)),
    ("kYellow", 400, (255, 255, 0)),
    ("kMagenta", 616, (255, 0, 255)),
    ("kCyan", 432, (0, 255, 255)),
    ("kOrange", 800, (255, 204, 0)),
    ("kSpring", 820, (204, 255, 0)),
    ("kTeal", 840, (0, 255, 204)),
    ("kAzure", 860, (0, 204, 255)),
    ("kViolet", 880, (204, 0, 255)),
    ("kPink", 900, (255, 0, 204)),
];

const BASIC: [(u8, u8, u8); 10] = [
    (255, 255, 255),
    (0, 0, 0),
    (255, 0, 0),
    (0, 255, 0),
    (0, 0, 255),
    (255, 255, 0),
    (255, 0, 255),
    (0, 255, 255),
    (89, 212, 84),
    (89, 84, 217),
];

/// Wheel variant: positive offsets darken, negative offsets lighten.
fn wheel_shade(base: (u8, u8, u8), offset: i32) -> Color {
    let c = Color::rgb(base.0, base.1, base.2);
    match offset {
        0 => c,
        o if o > 0 => Color::lerp(c, Color::BLACK, 0.2 * o.min(4) as f64),
        o => Color::lerp(c, Color::WHITE, 0.09 * (-o).min(10) as f64),
    }
}

/// Colour for a ROOT colour index.
pub fn root_index(index: i32) -> Option<Color> {
    if let Some(&(r, g, b)) = usize::try_from(index).ok().and_then(|i| BASIC.get(i)) {
        return Some(Color::rgb(r, g, b));
    }
    if (11..=19).contains(&index) {
        let v = (255.0 * (1.0 - (index - 10) as f64 / 10.0)).round() as u8;
        return Some(Color::rgb(v, v, v));
    }
    WHEEL
        .iter()
        .find(|(_, base, _)| (base - 10..=base + 4).contains(&index))
        .map(|(_, base, rgb)| wheel_shade(*rgb, index - base))
}

/// Colour for a ROOT colour expression such as `kRed`, `kAzure-4` or `kBlack`.
pub fn root_name(expr: &str) -> Option<Color> {
    let expr: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
    let split = expr.find(['+', '-']).unwrap_or(expr.len());
    let (name, offset) = expr.split_at(split);
    let offset: i32 = if offset.is_empty() {
        0
    } else {
        offset.strip_prefix('+').unwrap_or(offset).parse().ok()?
    };
    match name {
        "kWhite" => return root_index(offset),
        "kBlack" => return offset.checked_add(1).and_then(root_index),
        _ => {}
    }
    WHEEL
        .iter()
        .find(|(n, _, _)| *n == name)
        .and_then(|(_, base, _)| base.checked_add(offset))
        .and_then(root_index)
}

// --- Palettes ---

/// Fallback colours for groups without a configured style.
pub const CMS_PETROFF10: &[&str] = &[
    "#3f90da", "#ffa90e", "#bd1f01", "#94a4a2", "#832db6", "#a96b59", "#e76300", "#b9ac70",
    "#717581", "#92dadd",
];

pub const TABLEAU10: &[&str] = &[
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

pub fn palette_colors(name: &str) -> Vec<Color> {
    let strs = match name {
        "tableau10" => TABLEAU10,
        _ => CMS_PETROFF10,
    };
    strs.iter().map(|s| Color::hex(s)).collect()
}

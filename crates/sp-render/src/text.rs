//! Text measurement and ROOT/LaTeX label conversion.
//!
//! Widths are estimated from per-character advance classes of a Helvetica
//! like face; the SVG names a generic sans-serif family.

use crate::primitives::{FontWeight, TextStyle};

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

fn advance(ch: char) -> f64 {
    match ch {
        'i' | 'j' | 'l' | '|' | '.' | ',' | ':' | ';' | '\'' | '!' => 0.24,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | ' ' | '/' => 0.32,
        'm' | 'w' | 'M' | 'W' | '%' | '@' => 0.85,
        'A'..='Z' => 0.68,
        '0'..='9' => 0.56,
        c if c.is_ascii() => 0.52,
        _ => 0.6,
    }
}

/// Approximate extent of `text` at `size_pt`.
pub fn measure_text(text: &str, size_pt: f64) -> TextMetrics {
    let width = text.chars().map(advance).sum::<f64>() * size_pt;
    TextMetrics { width, height: 1.15 * size_pt, ascent: 0.78 * size_pt }
}

/// Measure text with a [`TextStyle`]; bold runs a little wider.
pub fn measure_styled(text: &str, style: &TextStyle) -> TextMetrics {
    let mut m = measure_text(text, style.size);
    if style.weight == FontWeight::Bold {
        m.width *= 1.06;
    }
    m
}

const SYMBOLS: &[(&str, &str)] = &[
    ("Delta", "Δ"),
    ("alpha", "α"),
    ("beta", "β"),
    ("gamma", "γ"),
    ("delta", "δ"),
    ("eta", "η"),
    ("mu", "μ"),
    ("nu", "ν"),
    ("phi", "φ"),
    ("tau", "τ"),
    ("ell", "ℓ"),
    ("pm", "±"),
    ("geq", "≥"),
    ("leq", "≤"),
    ("in", "∈"),
    ("rightarrow", "→"),
    ("times", "×"),
];

fn subscript(c: char) -> Option<char> {
    Some(match c {
        '0'..='9' => char::from_u32('₀' as u32 + (c as u32 - '0' as u32))?,
        'a' => 'ₐ',
        'e' => 'ₑ',
        'j' => 'ⱼ',
        'l' => 'ₗ',
        'T' | 't' => 'ₜ',
        'm' => 'ₘ',
        'n' => 'ₙ',
        '+' => '₊',
        '-' => '₋',
        _ => return None,
    })
}

fn superscript(c: char) -> Option<char> {
    Some(match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4'..='9' => char::from_u32('⁴' as u32 + (c as u32 - '4' as u32))?,
        '-' => '⁻',
        '+' => '⁺',
        _ => return None,
    })
}

/// Render ROOT TLatex (`#gamma`, `p_{T}`) or inline LaTeX (`Z$\gamma$`)
/// labels as plain Unicode text.
pub fn latex_to_unicode(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut chars = label.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '$' => {}
            '#' | '\\' => {
                let mut word = String::new();
                while let Some(&n) = chars.peek() {
                    if n.is_ascii_alphabetic() {
                        word.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match SYMBOLS.iter().find(|(k, _)| *k == word) {
                    Some((_, v)) => out.push_str(v),
                    // `\_` and `#,` style escapes keep the character
                    None if word.is_empty() => {
                        if let Some(n) = chars.next() {
                            if n != ',' {
                                out.push(n);
                            }
                        }
                    }
                    None => out.push_str(&word),
                }
            }
            '_' | '^' => {
                let group: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|&n| n != '}').collect()
                } else {
                    chars.next().map(String::from).unwrap_or_default()
                };
                let group = latex_to_unicode(&group);
                let map = if c == '_' { subscript } else { superscript };
                match group.chars().map(map).collect::<Option<String>>() {
                    Some(s) => out.push_str(&s),
                    None => {
                        out.push(c);
                        out.push_str(&group);
                    }
                }
            }
            '{' | '}' => {}
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wider_text_measures_wider() {
        let a = measure_text("WZ", 12.0);
        let b = measure_text("WZ (MG5_aMC@NLO)", 12.0);
        assert!(b.width > a.width);
        assert!(a.height > 12.0);
        let bold = TextStyle { size: 12.0, weight: FontWeight::Bold, ..Default::default() };
        assert!(measure_styled("WZ", &bold).width > a.width);
    }

    #[test]
    fn latex_labels() {
        assert_eq!(latex_to_unicode(r"Z$\gamma$"), "Zγ");
        assert_eq!(latex_to_unicode("Z#gamma"), "Zγ");
        assert_eq!(latex_to_unicode(r"WZ (MG5\_aMC)"), "WZ (MG5_aMC)");
        assert_eq!(latex_to_unicode("#Delta#eta_{jj} #in [2.5, 4]"), "Δηⱼⱼ ∈ [2.5, 4]");
        assert_eq!(latex_to_unicode("#geq 5"), "≥ 5");
        assert_eq!(latex_to_unicode("fb^{-1}"), "fb⁻¹");
        assert_eq!(latex_to_unicode("p_{T}^{#ell} [GeV]"), "pₜ^ℓ [GeV]");
        assert_eq!(latex_to_unicode("m_{jj} [GeV]"), "mⱼⱼ [GeV]");
    }
}

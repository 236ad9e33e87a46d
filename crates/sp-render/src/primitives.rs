use crate::color::Color;

/// Fill + stroke style for rectangles and polygons.
#[derive(Debug, Clone)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self { fill: None, stroke: None, stroke_width: 1.0, opacity: 1.0 }
    }
}

impl Style {
    pub fn filled(color: Color) -> Self {
        Self { fill: Some(color), ..Default::default() }
    }
}

/// Line style.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
    pub dash: Option<String>,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self { color: Color::BLACK, width: 1.0, dash: None }
    }
}

impl LineStyle {
    pub fn solid(color: Color, width: f64) -> Self {
        Self { color, width, dash: None }
    }

    pub fn dashed(color: Color, width: f64) -> Self {
        Self { color, width, dash: Some("6 3".into()) }
    }

    /// Line with a ROOT line-style number (`1` solid, `2`..`10` patterns).
    pub fn root(color: Color, width: f64, style: i32) -> Self {
        Self { color, width, dash: root_dash(style).map(str::to_string) }
    }
}

/// SVG dash array of a ROOT line style, at half the ROOT pattern length.
pub fn root_dash(style: i32) -> Option<&'static str> {
    match style {
        2 => Some("6 6"),
        3 => Some("2 4"),
        4 => Some("6 8 2 8"),
        5 => Some("10 6 2 6"),
        6 => Some("10 6 2 6 2 6 2 6"),
        7 => Some("10 10"),
        8 => Some("10 6 2 6 2 6"),
        9 => Some("40 10"),
        10 => Some("40 10 2 10"),
        _ => None,
    }
}

/// Text style.
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub size: f64,
    pub color: Color,
    pub weight: FontWeight,
    pub style: FontStyle,
    pub anchor: TextAnchor,
    pub baseline: TextBaseline,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 10.0,
            color: Color::BLACK,
            weight: FontWeight::Regular,
            style: FontStyle::Normal,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(&self) -> &str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Alphabetic,
    Central,
    Hanging,
}

impl TextBaseline {
    pub fn as_str(&self) -> &str {
        match self {
            TextBaseline::Alphabetic => "auto",
            TextBaseline::Central => "central",
            TextBaseline::Hanging => "hanging",
        }
    }
}

/// Marker style for data points.
#[derive(Debug, Clone)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    pub size: f64,
    pub color: Color,
    pub fill: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Square,
    Triangle,
}

impl MarkerStyle {
    /// Marker for a ROOT marker-style number.
    pub fn root(style: i32, color: Color, size: f64) -> Self {
        let (shape, fill) = match style {
            21 => (MarkerShape::Square, true),
            25 => (MarkerShape::Square, false),
            22 => (MarkerShape::Triangle, true),
            26 => (MarkerShape::Triangle, false),
            24 => (MarkerShape::Circle, false),
            _ => (MarkerShape::Circle, true),
        };
        Self { shape, size, color, fill }
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self { shape: MarkerShape::Circle, size: 3.0, color: Color::BLACK, fill: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_line_styles() {
        assert!(LineStyle::root(Color::BLACK, 2.0, 1).dash.is_none());
        assert_eq!(LineStyle::root(Color::BLACK, 2.0, 5).dash.as_deref(), Some("10 6 2 6"));
        assert!(root_dash(0).is_none());
    }

    #[test]
    fn root_markers() {
        assert_eq!(MarkerStyle::root(20, Color::BLACK, 3.0).shape, MarkerShape::Circle);
        assert!(!MarkerStyle::root(24, Color::BLACK, 3.0).fill);
        assert_eq!(MarkerStyle::root(21, Color::BLACK, 3.0).shape, MarkerShape::Square);
    }
}

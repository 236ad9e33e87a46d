use crate::config::PlotConfig;

/// Rectangular plot area within the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn manual(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }
}

/// Canvas margins around the plotting region, in pixels.
#[derive(Debug, Clone, Copy)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margins {
    /// ROOT-like margins: fractions of the canvas with room for the axis
    /// titles at the configured font sizes.
    pub fn for_canvas(width: f64, height: f64, config: &PlotConfig) -> Self {
        let label = config.font.label_size;
        let tick = config.font.tick_size;
        Self {
            left: (0.12 * width).max(3.2 * tick + 1.4 * label),
            right: (0.04 * width).max(20.0),
            top: (0.07 * height).max(1.6 * label),
            bottom: (0.11 * height).max(1.6 * tick + 1.8 * label),
        }
    }

    /// Region left inside a canvas of the given size.
    pub fn inner(&self, width: f64, height: f64) -> PlotArea {
        PlotArea::manual(
            self.left,
            self.top,
            (width - self.left - self.right).max(50.0),
            (height - self.top - self.bottom).max(50.0),
        )
    }
}

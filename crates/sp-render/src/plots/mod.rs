//! Plot kinds and the histogram drawing they share.

pub mod axes_draw;
pub mod overlay;
pub mod stack;

use sp_core::Hist1D;
use sp_core::style::{GroupStyle, HistStyle};

use crate::canvas::Canvas;
use crate::color::Color;
use crate::layout::axes::Axis;
use crate::layout::legend::{LegendEntry, LegendKind};
use crate::layout::margins::PlotArea;
use crate::primitives::{LineStyle, MarkerStyle, Style};
use crate::text::latex_to_unicode;

/// A histogram with its drawing attributes and legend label.
#[derive(Debug, Clone)]
pub struct StyledHist {
    pub hist: Hist1D,
    pub label: String,
    /// `None` draws the histogram hollow.
    pub fill: Option<Color>,
    pub line: LineStyle,
    pub marker: MarkerStyle,
}

impl StyledHist {
    /// Plain outline in `color`.
    pub fn outline(hist: Hist1D, label: impl Into<String>, color: Color) -> Self {
        Self {
            hist,
            label: label.into(),
            fill: None,
            line: LineStyle::solid(color, 2.0),
            marker: MarkerStyle { color, ..Default::default() },
        }
    }

    /// Apply a configured group style. Unset colours come from `fallback`.
    pub fn from_group(hist: Hist1D, group: &GroupStyle, fallback: Color) -> Self {
        let s: &HistStyle = &group.style;
        let resolve = |spec: &Option<_>| spec.as_ref().and_then(Color::from_spec);
        let fill_color = resolve(&s.fill_color).unwrap_or(fallback);
        let line_color = resolve(&s.line_color).unwrap_or(fill_color);
        let marker_color = resolve(&s.marker_color).unwrap_or(line_color);
        Self {
            hist,
            label: latex_to_unicode(&group.label),
            fill: if s.fill_style == 0 { None } else { Some(fill_color) },
            line: LineStyle::root(line_color, s.line_width.max(1.0), s.line_style),
            marker: MarkerStyle::root(s.marker_style, marker_color, 5.0),
        }
    }

    /// Drop the fill and set the line width and ROOT line style.
    pub fn hollow(mut self, width: f64, root_line_style: i32) -> Self {
        self.fill = None;
        self.line = LineStyle::root(self.line.color, width, root_line_style);
        self
    }

    pub fn legend_entry(&self) -> LegendEntry {
        let kind = match self.fill {
            Some(_) => LegendKind::FilledRect(self.line.color),
            None => LegendKind::Line(self.line.clone()),
        };
        LegendEntry {
            label: self.label.clone(),
            color: self.fill.unwrap_or(self.line.color),
            kind,
        }
    }
}

/// Maps data coordinates of one panel to pixels.
pub(crate) struct Frame<'a> {
    pub area: &'a PlotArea,
    pub x: &'a Axis,
    pub y: &'a Axis,
}

impl Frame<'_> {
    pub fn px(&self, x: f64) -> f64 {
        self.x.data_to_pixel(x, self.area.left, self.area.right())
    }

    pub fn py(&self, y: f64) -> f64 {
        self.y
            .data_to_pixel(y, self.area.bottom(), self.area.top)
            .clamp(self.area.top - 1.0, self.area.bottom() + 1.0)
    }

    /// Step outline through the regular bins of `values` (one per bin).
    pub fn step_points(&self, edges: &[f64], values: &[f64]) -> Vec<(f64, f64)> {
        let mut pts = Vec::with_capacity(2 * values.len());
        for (i, &v) in values.iter().enumerate() {
            let y = self.py(v);
            pts.push((self.px(edges[i]), y));
            pts.push((self.px(edges[i + 1]), y));
        }
        pts
    }

    /// Filled bars between `lower` and `upper`, then the top outline.
    pub fn draw_bars(
        &self,
        canvas: &mut Canvas,
        edges: &[f64],
        lower: &[f64],
        upper: &[f64],
        fill: Option<Color>,
        line: &LineStyle,
    ) {
        if let Some(color) = fill {
            for i in 0..upper.len() {
                let (x0, x1) = (self.px(edges[i]), self.px(edges[i + 1]));
                let (y0, y1) = (self.py(lower[i]), self.py(upper[i]));
                canvas.rect(x0, y1.min(y0), x1 - x0, (y0 - y1).abs(), &Style::filled(color));
            }
        }
        canvas.polyline(&self.step_points(edges, upper), line);
    }

    /// Hatched band `center ± error` per bin.
    pub fn draw_band(&self, canvas: &mut Canvas, edges: &[f64], lo: &[f64], hi: &[f64], color: Color) {
        for i in 0..lo.len() {
            let (x0, x1) = (self.px(edges[i]), self.px(edges[i + 1]));
            let (y0, y1) = (self.py(lo[i]), self.py(hi[i]));
            if (y0 - y1).abs() > 0.01 {
                canvas.hatch_rect(x0, y1, x1 - x0, y0 - y1, color, 8.0);
            }
        }
    }

    /// Markers with asymmetric vertical error bars at bin centres.
    pub fn draw_points(
        &self,
        canvas: &mut Canvas,
        edges: &[f64],
        values: &[f64],
        err_lo: &[f64],
        err_hi: &[f64],
        marker: &MarkerStyle,
    ) {
        let err_style = LineStyle::solid(marker.color, 2.0);
        for i in 0..values.len() {
            let x = self.px(0.5 * (edges[i] + edges[i + 1]));
            canvas.error_bar(x, self.py(values[i] - err_lo[i]), self.py(values[i] + err_hi[i]), 0.0, &err_style);
            if self.y.log && values[i] <= 0.0 {
                continue;
            }
            canvas.marker(x, self.py(values[i]), marker);
        }
    }
}

/// Regular-bin contents of `h`.
pub(crate) fn bin_values(h: &Hist1D) -> Vec<f64> {
    h.bins().map(|(_, c)| c).collect()
}

/// Regular-bin symmetric errors of `h`.
pub(crate) fn bin_errors(h: &Hist1D) -> Vec<f64> {
    (1..=h.n_bins()).map(|i| h.error(i)).collect()
}

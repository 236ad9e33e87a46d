//! Stacked backgrounds with signal outlines, data points, an uncertainty band
//! and a `Data/Pred.` ratio panel.

use sp_core::Hist1D;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::PlotConfig;
use crate::header::draw_experiment_header;
use crate::layout::axes::Axis;
use crate::layout::legend::{self, LegendEntry, LegendKind};
use crate::layout::margins::{Margins, PlotArea};
use crate::layout::multi_panel::MainRatioLayout;
use crate::plots::axes_draw::draw_axes;
use crate::plots::{Frame, StyledHist, bin_errors, bin_values};
use crate::primitives::*;
use crate::text::latex_to_unicode;

pub const RATIO_TITLE: &str = "Data/Pred.";
pub const BAND_LABEL: &str = "Total unc.";

/// Vertical separators at bin upper edges with a label per region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMarkers {
    /// Bins whose upper edge gets a line.
    pub boundaries: Vec<usize>,
    /// One label per region, left to right.
    pub labels: Vec<String>,
}

impl RegionMarkers {
    /// The three Δη_jj regions of the unrolled 2D distributions.
    pub fn delta_eta_jj() -> Self {
        let labels = ["#in [2.5, 4]", "#in [4, 5]", "#geq 5"]
            .iter()
            .map(|l| latex_to_unicode(&format!("#Delta#eta_{{jj}} {l}")))
            .collect();
        Self { boundaries: vec![4, 8], labels }
    }

    /// Markers for `plot_name`: unrolled signal-region plots only.
    pub fn for_plot(plot_name: &str) -> Option<Self> {
        (plot_name.contains("unrolled") && !plot_name.contains("CR")).then(Self::delta_eta_jj)
    }
}

#[derive(Debug, Clone)]
pub struct StackPlot {
    /// Backgrounds, bottom of the stack first.
    pub stack: Vec<StyledHist>,
    pub signals: Vec<StyledHist>,
    pub data: Option<StyledHist>,
    /// Total prediction with its uncertainty, drawn as a hatched band.
    pub band: Option<Hist1D>,
    pub x_title: String,
    pub y_title: String,
    pub width: f64,
    pub height: f64,
    pub log_y: bool,
    pub scale_ymin: f64,
    pub scale_ymax: f64,
    /// Ratio-panel range; `None` draws no ratio panel.
    pub ratio_range: Option<(f64, f64)>,
    pub luminosity_fb: f64,
    pub regions: Option<RegionMarkers>,
}

impl StackPlot {
    fn reference(&self) -> Option<&Hist1D> {
        self.stack
            .iter()
            .chain(&self.signals)
            .chain(&self.data)
            .map(|s| &s.hist)
            .chain(&self.band)
            .next()
    }

    /// Per-bin sum of the stacked backgrounds.
    pub fn stack_total(&self, n_bins: usize) -> Vec<f64> {
        let mut total = vec![0.0; n_bins];
        for s in &self.stack {
            for (t, v) in total.iter_mut().zip(bin_values(&s.hist)) {
                *t += v;
            }
        }
        total
    }

    /// Main-panel y range from everything drawn.
    pub fn y_range(&self, config: &PlotConfig) -> (f64, f64) {
        let Some(reference) = self.reference() else {
            return (0.0, 1.0);
        };
        let n = reference.n_bins();
        let mut tops = self.stack_total(n);
        let mut positives: Vec<f64> = tops.clone();
        if let Some(band) = &self.band {
            for i in 0..n {
                tops.push(band.content(i + 1) + band.error(i + 1));
                positives.push(band.content(i + 1));
            }
        }
        if let Some(data) = &self.data {
            for i in 1..=n {
                tops.push(data.hist.content(i) + data.hist.error_low_high(i).1);
                positives.push(data.hist.content(i));
            }
        }
        for s in &self.signals {
            tops.extend(bin_values(&s.hist));
            positives.extend(bin_values(&s.hist));
        }
        let y_max = tops.iter().copied().fold(0.0_f64, f64::max);
        let y_max = if y_max > 0.0 { y_max } else { 1.0 };

        if self.log_y {
            let min_pos = positives.iter().copied().filter(|v| *v > 0.0).fold(f64::INFINITY, f64::min);
            let min_pos = if min_pos.is_finite() { min_pos } else { 0.1 };
            (min_pos * 0.5 * self.scale_ymin, y_max * 10.0 * self.scale_ymax)
        } else {
            (0.0, y_max * config.axes.headroom * self.scale_ymax)
        }
    }
}

pub fn render(plot: &StackPlot, config: &PlotConfig) -> crate::Result<String> {
    let Some(reference) = plot.reference() else {
        return Err(crate::RenderError::Layout("stack plot has no histograms".into()));
    };
    let n = reference.n_bins();
    let mismatched = plot
        .stack
        .iter()
        .chain(&plot.signals)
        .chain(&plot.data)
        .map(|s| &s.hist)
        .chain(&plot.band)
        .find(|h| h.n_bins() != n);
    if let Some(h) = mismatched {
        return Err(crate::RenderError::Layout(format!(
            "'{}' has {} bins, expected {n}",
            h.name(),
            h.n_bins()
        )));
    }
    let edges = reference.edges().to_vec();
    let (x_min, x_max) = (edges[0], edges[n]);

    let mut canvas = Canvas::new(plot.width, plot.height)?;
    let area = Margins::for_canvas(plot.width, plot.height, config).inner(plot.width, plot.height);
    let ratio_range = plot.ratio_range.filter(|_| plot.data.is_some());
    let (main, ratio) = match ratio_range {
        Some(_) => {
            let l = MainRatioLayout::split(&area, 0.0, config.ratio.height_frac);
            (l.main, Some(l.ratio))
        }
        None => (area, None),
    };

    let (y_lo, y_hi) = plot.y_range(config);
    let y_axis = (if plot.log_y { Axis::log(y_lo, y_hi) } else { Axis::linear(y_lo, y_hi, 6) })
        .with_label(&plot.y_title);
    let x_axis = match ratio {
        Some(_) => Axis::linear(x_min, x_max, 6).without_tick_labels(),
        None => Axis::linear(x_min, x_max, 6).with_label(&plot.x_title),
    };

    draw_axes(&mut canvas, &main, &x_axis, &y_axis, config);
    let frame = Frame { area: &main, x: &x_axis, y: &y_axis };
    canvas.push_clip(main.left, main.top, main.width, main.height);

    let mut lower = vec![0.0; n];
    for s in &plot.stack {
        let upper: Vec<f64> = lower.iter().zip(bin_values(&s.hist)).map(|(l, v)| l + v).collect();
        frame.draw_bars(&mut canvas, &edges, &lower, &upper, s.fill, &s.line);
        lower = upper;
    }
    if let Some(band) = &plot.band {
        let (c, e) = (bin_values(band), bin_errors(band));
        let lo: Vec<f64> = c.iter().zip(&e).map(|(c, e)| c - e).collect();
        let hi: Vec<f64> = c.iter().zip(&e).map(|(c, e)| c + e).collect();
        frame.draw_band(&mut canvas, &edges, &lo, &hi, config.colors.band);
    }
    for s in &plot.signals {
        let floor = vec![y_axis.min; n];
        frame.draw_bars(&mut canvas, &edges, &floor, &bin_values(&s.hist), None, &s.line);
    }
    if let Some(data) = &plot.data {
        let (lo, hi) = asymmetric_errors(&data.hist);
        frame.draw_points(&mut canvas, &edges, &bin_values(&data.hist), &lo, &hi, &data.marker);
    }
    canvas.pop_clip();

    if let Some(regions) = &plot.regions {
        draw_regions(&mut canvas, &frame, reference, regions, config);
    }

    legend::draw_legend(&mut canvas, &main, &legend_entries(plot, config), config.legend.font_size, config.legend.frame);
    draw_experiment_header(&mut canvas, &main, config, plot.luminosity_fb);

    if let (Some(panel), Some((lo, hi)), Some(data)) = (ratio, ratio_range, &plot.data) {
        let rx = Axis::linear(x_min, x_max, 6).with_label(&plot.x_title);
        let ry = Axis::linear(lo, hi, 3).with_label(RATIO_TITLE);
        draw_axes(&mut canvas, &panel, &rx, &ry, config);
        let rframe = Frame { area: &panel, x: &rx, y: &ry };

        let one = rframe.py(1.0);
        canvas.line(panel.left, one, panel.right(), one, &LineStyle::dashed(Color::hex("#969696"), 1.0));

        canvas.push_clip(panel.left, panel.top, panel.width, panel.height);
        if let Some(band) = &plot.band {
            let (band_lo, band_hi) = relative_band(band);
            rframe.draw_band(&mut canvas, &edges, &band_lo, &band_hi, config.colors.band);
        }
        let r = data_ratio(&data.hist, &plot.stack_total(n));
        rframe.draw_points(&mut canvas, &edges, &r.values, &r.err_lo, &r.err_hi, &data.marker);
        canvas.pop_clip();
    }

    Ok(canvas.finish_svg())
}

/// Data over prediction with errors scaled by the prediction. Bins with no
/// prediction are left at 0 with no error.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRatio {
    pub values: Vec<f64>,
    pub err_lo: Vec<f64>,
    pub err_hi: Vec<f64>,
}

pub fn data_ratio(data: &Hist1D, prediction: &[f64]) -> DataRatio {
    let (lo, hi) = asymmetric_errors(data);
    let mut out = DataRatio { values: Vec::new(), err_lo: Vec::new(), err_hi: Vec::new() };
    for (i, &p) in prediction.iter().enumerate() {
        if p > 0.0 {
            out.values.push(data.content(i + 1) / p);
            out.err_lo.push(lo[i] / p);
            out.err_hi.push(hi[i] / p);
        } else {
            out.values.push(0.0);
            out.err_lo.push(0.0);
            out.err_hi.push(0.0);
        }
    }
    out
}

/// `1 ± error/content` per bin; empty bins collapse to 1.
pub fn relative_band(band: &Hist1D) -> (Vec<f64>, Vec<f64>) {
    (1..=band.n_bins())
        .map(|i| {
            let c = band.content(i);
            let rel = if c > 0.0 { band.error(i) / c } else { 0.0 };
            (1.0 - rel, 1.0 + rel)
        })
        .unzip()
}

fn asymmetric_errors(h: &Hist1D) -> (Vec<f64>, Vec<f64>) {
    (1..=h.n_bins()).map(|i| h.error_low_high(i)).unzip()
}

fn legend_entries(plot: &StackPlot, config: &PlotConfig) -> Vec<LegendEntry> {
    let mut entries = Vec::new();
    if let Some(data) = &plot.data {
        entries.push(LegendEntry {
            label: data.label.clone(),
            color: data.marker.color,
            kind: LegendKind::Marker(data.marker.clone()),
        });
    }
    entries.extend(plot.stack.iter().rev().map(StyledHist::legend_entry));
    entries.extend(plot.signals.iter().map(StyledHist::legend_entry));
    if plot.band.is_some() {
        entries.push(LegendEntry {
            label: BAND_LABEL.into(),
            color: config.colors.band,
            kind: LegendKind::HatchedRect,
        });
    }
    entries
}

fn draw_regions(
    canvas: &mut Canvas,
    frame: &Frame<'_>,
    reference: &Hist1D,
    regions: &RegionMarkers,
    config: &PlotConfig,
) {
    let area: &PlotArea = frame.area;
    let line = LineStyle::root(config.colors.region_lines, 2.0, 7);
    let mut bounds = vec![reference.low_edge(1)];
    for &b in regions.boundaries.iter().filter(|&&b| b < reference.n_bins()) {
        let x = reference.up_edge(b);
        let px = frame.px(x);
        canvas.line(px, area.top, px, area.bottom(), &line);
        bounds.push(x);
    }
    bounds.push(reference.up_edge(reference.n_bins()));

    let size = config.font.size;
    let style = TextStyle { size, anchor: TextAnchor::Middle, baseline: TextBaseline::Central, ..Default::default() };
    let last = regions.labels.len().saturating_sub(1);
    for (i, label) in regions.labels.iter().enumerate() {
        let (Some(&x0), Some(&x1)) = (bounds.get(i), bounds.get(i + 1)) else {
            break;
        };
        let cx = 0.5 * (frame.px(x0) + frame.px(x1));
        // the last region sits low, below the falling spectrum
        let cy = area.top + area.height * if i == last { 0.8 } else { 0.45 };
        let w = canvas.measure_text(label, &style).width + size;
        canvas.rect(cx - w / 2.0, cy - 0.8 * size, w, 1.6 * size, &Style::filled(Color::WHITE));
        canvas.text(cx, cy, label, &style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn filled(name: &str, values: &[f64]) -> Hist1D {
        let mut h = Hist1D::uniform(name, values.len(), 0.0, values.len() as f64).unwrap();
        for (i, &v) in values.iter().enumerate() {
            h.set_content(i + 1, v);
            h.set_error(i + 1, 0.1 * v);
        }
        h
    }

    fn plot() -> StackPlot {
        let bkg = |name: &str, v: &[f64], c: &str| {
            let mut s = StyledHist::outline(filled(name, v), name, Color::BLACK);
            s.fill = Some(Color::hex(c));
            s
        };
        let mut data = StyledHist::outline(filled("data", &[12.0, 9.0, 0.0]), "Data", Color::BLACK);
        data.hist.use_poisson_errors();
        StackPlot {
            stack: vec![bkg("nonprompt", &[4.0, 2.0, 1.0], "#9e9e9e"), bkg("wz", &[6.0, 5.0, 2.0], "#3f90da")],
            signals: vec![StyledHist::outline(filled("aqgc", &[1.0, 3.0, 5.0]), "aQGC", Color::hex("#bd1f01"))],
            data: Some(data),
            band: Some(filled("total", &[10.0, 7.0, 3.0])),
            x_title: "m_{jj} [GeV]".into(),
            y_title: "Events / bin".into(),
            width: 800.0,
            height: 800.0,
            log_y: false,
            scale_ymin: 1.0,
            scale_ymax: 1.0,
            ratio_range: Some((0.5, 1.5)),
            luminosity_fb: 35.9,
            regions: None,
        }
    }

    #[test]
    fn stack_total_sums_backgrounds() {
        assert_eq!(plot().stack_total(3), vec![10.0, 7.0, 3.0]);
    }

    #[test]
    fn linear_range_covers_data_errors() {
        let p = plot();
        let (lo, hi) = p.y_range(&PlotConfig::default());
        assert_eq!(lo, 0.0);
        let data_top = 12.0 + p.data.as_ref().unwrap().hist.error_low_high(1).1;
        assert_abs_diff_eq!(hi, data_top * 1.3, epsilon = 1e-9);
    }

    #[test]
    fn log_range_uses_smallest_positive() {
        let mut p = plot();
        p.log_y = true;
        p.scale_ymin = 0.1;
        let (lo, _) = p.y_range(&PlotConfig::default());
        assert_abs_diff_eq!(lo, 1.0 * 0.5 * 0.1, epsilon = 1e-12);
    }

    #[test]
    fn ratio_and_band() {
        let p = plot();
        let r = data_ratio(&p.data.as_ref().unwrap().hist, &[10.0, 0.0, 3.0]);
        assert_abs_diff_eq!(r.values[0], 1.2, epsilon = 1e-12);
        assert_eq!((r.values[1], r.err_hi[1]), (0.0, 0.0));
        assert_eq!(r.err_lo[2], 0.0);
        assert!(r.err_hi[2] > 0.0);

        let (lo, hi) = relative_band(p.band.as_ref().unwrap());
        assert_abs_diff_eq!(lo[0], 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(hi[1], 1.1, epsilon = 1e-12);
    }

    #[test]
    fn renders_legend_and_ratio() {
        let svg = render(&plot(), &PlotConfig::default()).unwrap();
        for label in ["Data", "wz", "nonprompt", "aQGC", BAND_LABEL, RATIO_TITLE] {
            assert!(svg.contains(&format!(">{label}</text>")), "missing {label}");
        }
        // legend lists the top of the stack first
        assert!(svg.find(">wz</text>").unwrap() < svg.find(">nonprompt</text>").unwrap());
    }

    #[test]
    fn no_data_means_no_ratio() {
        let mut p = plot();
        p.data = None;
        let svg = render(&p, &PlotConfig::default()).unwrap();
        assert!(!svg.contains(RATIO_TITLE));
    }

    #[test]
    fn region_markers() {
        assert!(RegionMarkers::for_plot("mjj_etajj_unrolled_CR").is_none());
        assert!(RegionMarkers::for_plot("mjj").is_none());
        let m = RegionMarkers::for_plot("mjj_etajj_unrolled").unwrap();
        assert_eq!(m.boundaries, vec![4, 8]);
        assert_eq!(m.labels[0], "\u{0394}\u{03B7}\u{2C7C}\u{2C7C} \u{2208} [2.5, 4]");
        assert!(m.labels[2].ends_with("\u{2265} 5"));

        let mut p = plot();
        let wide = |name: &str| {
            let mut s = StyledHist::outline(filled(name, &[1.0; 12]), name, Color::BLACK);
            s.fill = Some(Color::WHITE);
            s
        };
        p.stack = vec![wide("wz")];
        p.signals.clear();
        p.data = None;
        p.band = None;
        p.width = 1200.0;
        p.regions = Some(m);
        let svg = render(&p, &PlotConfig::default()).unwrap();
        assert!(svg.contains("[4, 5]</text>"));
        assert!(svg.contains(r#"stroke-dasharray="10 10""#));
    }

    #[test]
    fn mismatched_bins_are_rejected() {
        let mut p = plot();
        p.signals = vec![StyledHist::outline(filled("aqgc", &[1.0]), "aQGC", Color::BLACK)];
        assert!(render(&p, &PlotConfig::default()).is_err());
    }
}

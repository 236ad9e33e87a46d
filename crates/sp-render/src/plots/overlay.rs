//! Systematic-variation overlay: central, Up and Down outlines per process,
//! with an optional `syst./cent.` ratio panel.

use sp_core::Hist1D;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::PlotConfig;
use crate::header::draw_experiment_header;
use crate::layout::axes::Axis;
use crate::layout::margins::{Margins, PlotArea};
use crate::layout::multi_panel::MainRatioLayout;
use crate::plots::axes_draw::draw_axes;
use crate::plots::{Frame, StyledHist, bin_values};
use crate::primitives::*;

/// One process with its systematic shifted up and down.
#[derive(Debug, Clone)]
pub struct VariationSet {
    pub systematic: String,
    pub central: StyledHist,
    pub up: StyledHist,
    pub down: StyledHist,
}

#[derive(Debug, Clone)]
pub struct OverlayPlot {
    pub sets: Vec<VariationSet>,
    pub x_title: String,
    pub y_title: String,
    pub width: f64,
    pub height: f64,
    /// Main-panel y range.
    pub y_range: (f64, f64),
    pub log_y: bool,
    /// Ratio-panel range; `None` draws no ratio panel.
    pub ratio_range: Option<(f64, f64)>,
    pub luminosity_fb: f64,
}

pub const RATIO_TITLE: &str = "syst./cent.";
pub const BOX_TITLE: &str = "Systematic variation";

pub fn render(plot: &OverlayPlot, config: &PlotConfig) -> crate::Result<String> {
    let Some(first) = plot.sets.first() else {
        return Err(crate::RenderError::Layout("overlay plot has no histograms".into()));
    };
    let edges = first.central.hist.edges().to_vec();
    let (x_min, x_max) = (edges[0], edges[edges.len() - 1]);

    let mut canvas = Canvas::new(plot.width, plot.height)?;
    let area = Margins::for_canvas(plot.width, plot.height, config).inner(plot.width, plot.height);

    let (main, ratio) = match plot.ratio_range {
        Some(_) => {
            let l = MainRatioLayout::split(&area, 0.0, config.ratio.height_frac);
            (l.main, Some(l.ratio))
        }
        None => (area, None),
    };

    let (y_lo, y_hi) = plot.y_range;
    let y_axis = (if plot.log_y { Axis::log(y_lo, y_hi) } else { Axis::linear(y_lo, y_hi, 6) })
        .with_label(&plot.y_title);
    let x_axis = match ratio {
        Some(_) => Axis::linear(x_min, x_max, 6).without_tick_labels(),
        None => Axis::linear(x_min, x_max, 6).with_label(&plot.x_title),
    };

    draw_axes(&mut canvas, &main, &x_axis, &y_axis, config);
    let frame = Frame { area: &main, x: &x_axis, y: &y_axis };
    canvas.push_clip(main.left, main.top, main.width, main.height);
    for set in &plot.sets {
        for h in [&set.central, &set.up, &set.down] {
            let values = bin_values(&h.hist);
            let floor = vec![y_lo; values.len()];
            frame.draw_bars(&mut canvas, h.hist.edges(), &floor, &values, None, &h.line);
        }
    }
    canvas.pop_clip();

    draw_variation_box(&mut canvas, &main, &plot.sets, config);
    draw_experiment_header(&mut canvas, &main, config, plot.luminosity_fb);

    if let (Some(panel), Some((lo, hi))) = (ratio, plot.ratio_range) {
        let rx = Axis::linear(x_min, x_max, 6).with_label(&plot.x_title);
        let ry = Axis::linear(lo, hi, 3).with_label(RATIO_TITLE);
        draw_axes(&mut canvas, &panel, &rx, &ry, config);
        let rframe = Frame { area: &panel, x: &rx, y: &ry };

        let one = rframe.py(1.0);
        canvas.line(panel.left, one, panel.right(), one, &LineStyle::dashed(Color::hex("#969696"), 1.0));

        canvas.push_clip(panel.left, panel.top, panel.width, panel.height);
        for set in &plot.sets {
            for h in [&set.up, &set.down] {
                let r = variation_ratio(&h.hist, &set.central.hist)?;
                canvas.polyline(&rframe.step_points(r.edges(), &bin_values(&r)), &h.line);
            }
        }
        canvas.pop_clip();
    }

    Ok(canvas.finish_svg())
}

/// `variation / central` per bin; empty central bins give 0.
pub fn variation_ratio(variation: &Hist1D, central: &Hist1D) -> crate::Result<Hist1D> {
    Ok(variation.ratio_to(central)?)
}

/// Box in the upper right listing each systematic in its central line colour.
fn draw_variation_box(canvas: &mut Canvas, area: &PlotArea, sets: &[VariationSet], config: &PlotConfig) {
    let size = config.legend.font_size;
    let row = size * 1.4;
    let rows: Vec<(&str, Color)> = std::iter::once((BOX_TITLE, Color::BLACK))
        .chain(sets.iter().map(|s| (s.systematic.as_str(), s.central.line.color)))
        .collect();

    let base = TextStyle { size, anchor: TextAnchor::Middle, baseline: TextBaseline::Central, ..Default::default() };
    let width = rows
        .iter()
        .map(|(t, _)| canvas.measure_text(t, &base).width)
        .fold(0.0_f64, f64::max)
        + size;
    let height = rows.len() as f64 * row + 0.4 * size;
    let x = area.right() - width - 0.04 * area.width;
    let y = area.top + 0.05 * area.height;
    canvas.rect(x, y, width, height, &Style::filled(Color::WHITE));

    for (i, (label, color)) in rows.into_iter().enumerate() {
        let style = TextStyle { color, ..base.clone() };
        canvas.text(x + width / 2.0, y + 0.2 * size + (i as f64 + 0.5) * row, label, &style);
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
            h.set_error(i + 1, v.sqrt());
        }
        h
    }

    fn set(name: &str, color: Color) -> VariationSet {
        let central = StyledHist::outline(filled(name, &[10.0, 20.0]), name, color);
        let up = StyledHist::outline(filled("up", &[12.0, 22.0]), "", color).hollow(2.0, 5);
        let down = StyledHist::outline(filled("down", &[8.0, 0.0]), "", color).hollow(2.0, 5);
        VariationSet { systematic: format!("{name}_scale"), central, up, down }
    }

    fn plot(ratio: bool) -> OverlayPlot {
        OverlayPlot {
            sets: vec![set("wz", Color::hex("#3f90da")), set("zz", Color::hex("#bd1f01"))],
            x_title: "m_{jj} [GeV]".into(),
            y_title: "Events".into(),
            width: 800.0,
            height: 800.0,
            y_range: (0.001, 20.0),
            log_y: false,
            ratio_range: ratio.then_some((0.5, 1.5)),
            luminosity_fb: 35.9,
        }
    }

    #[test]
    fn box_lists_systematics_in_line_colours() {
        let svg = render(&plot(true), &PlotConfig::default()).unwrap();
        assert!(svg.contains(">Systematic variation</text>"));
        let tail = r#" text-anchor="middle" dominant-baseline="central">"#;
        assert!(svg.contains(&format!(r##"fill="#3f90da"{tail}wz_scale</text>"##)));
        assert!(svg.contains(&format!(r##"fill="#bd1f01"{tail}zz_scale</text>"##)));
        assert!(svg.contains(">syst./cent.</text>"));
    }

    #[test]
    fn no_ratio_panel() {
        let svg = render(&plot(false), &PlotConfig::default()).unwrap();
        assert!(!svg.contains("syst./cent."));
        assert!(svg.contains("m_{jj} [GeV]"));
    }

    #[test]
    fn ratio_values() {
        let p = plot(true);
        let r = variation_ratio(&p.sets[0].up.hist, &p.sets[0].central.hist).unwrap();
        assert_abs_diff_eq!(r.content(1), 1.2, epsilon = 1e-12);
        assert_abs_diff_eq!(r.content(2), 1.1, epsilon = 1e-12);
    }

    #[test]
    fn empty_overlay_is_an_error() {
        let mut p = plot(false);
        p.sets.clear();
        assert!(render(&p, &PlotConfig::default()).is_err());
    }
}

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::PlotConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// Draw a ROOT-style box frame: inward ticks on all four sides, tick labels
/// on the bottom and left, axis titles right- and top-aligned.
pub fn draw_axes(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    config: &PlotConfig,
) {
    let frame_style = LineStyle::solid(Color::BLACK, 1.5);
    let tick_style = LineStyle::solid(Color::BLACK, 1.2);
    let tl = config.axes.tick_length;
    let mtl = config.axes.minor_tick_length;

    draw_frame(canvas, area, &frame_style);

    let x_label_style = TextStyle {
        size: config.font.tick_size,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Hanging,
        ..Default::default()
    };
    for (i, &val) in x_axis.tick_positions.iter().enumerate() {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        if px < area.left - 0.5 || px > area.right() + 0.5 {
            continue;
        }
        canvas.line(px, area.bottom(), px, area.bottom() - tl, &tick_style);
        if config.axes.show_top_ticks {
            canvas.line(px, area.top, px, area.top + tl, &tick_style);
        }
        if let Some(label) = x_axis.tick_labels.get(i) {
            canvas.text(px, area.bottom() + 0.4 * config.font.tick_size, label, &x_label_style);
        }
    }
    for &val in &x_axis.minor_ticks {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        canvas.line(px, area.bottom(), px, area.bottom() - mtl, &tick_style);
        if config.axes.show_top_ticks {
            canvas.line(px, area.top, px, area.top + mtl, &tick_style);
        }
    }

    let y_label_style = TextStyle {
        size: config.font.tick_size,
        anchor: TextAnchor::End,
        baseline: TextBaseline::Central,
        ..Default::default()
    };
    for (i, &val) in y_axis.tick_positions.iter().enumerate() {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if py < area.top - 0.5 || py > area.bottom() + 0.5 {
            continue;
        }
        canvas.line(area.left, py, area.left + tl, py, &tick_style);
        if config.axes.show_right_ticks {
            canvas.line(area.right(), py, area.right() - tl, py, &tick_style);
        }
        if let Some(label) = y_axis.tick_labels.get(i) {
            canvas.text(area.left - 0.4 * config.font.tick_size, py, label, &y_label_style);
        }
    }
    for &val in &y_axis.minor_ticks {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        canvas.line(area.left, py, area.left + mtl, py, &tick_style);
        if config.axes.show_right_ticks {
            canvas.line(area.right(), py, area.right() - mtl, py, &tick_style);
        }
    }

    let title_style = TextStyle {
        size: config.font.label_size,
        anchor: TextAnchor::End,
        ..Default::default()
    };
    if !x_axis.label.is_empty() {
        let y = area.bottom() + 0.4 * config.font.tick_size + config.font.tick_size + 1.2 * config.font.label_size;
        canvas.text(area.right(), y, &x_axis.label, &title_style);
    }
    if !y_axis.label.is_empty() {
        let widest = y_axis
            .tick_labels
            .iter()
            .map(|l| canvas.measure_text(l, &y_label_style).width)
            .fold(0.0_f64, f64::max);
        let x = area.left - 0.4 * config.font.tick_size - widest - 0.5 * config.font.label_size;
        canvas.text_rotated(x, area.top, &y_axis.label, &title_style, -90.0);
    }
}

/// Frame only, no ticks.
pub fn draw_frame(canvas: &mut Canvas, area: &PlotArea, style: &LineStyle) {
    canvas.line(area.left, area.top, area.right(), area.top, style);
    canvas.line(area.left, area.bottom(), area.right(), area.bottom(), style);
    canvas.line(area.left, area.top, area.left, area.bottom(), style);
    canvas.line(area.right(), area.top, area.right(), area.bottom(), style);
}

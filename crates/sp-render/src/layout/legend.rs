use crate::canvas::Canvas;
use crate::color::Color;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

#[derive(Debug, Clone)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub kind: LegendKind,
}

#[derive(Debug, Clone)]
pub enum LegendKind {
    /// Filled box with an outline colour.
    FilledRect(Color),
    Line(LineStyle),
    Marker(MarkerStyle),
    HatchedRect,
}

/// Draw a legend in the top-right corner of `area`.
pub fn draw_legend(
    canvas: &mut Canvas,
    area: &PlotArea,
    entries: &[LegendEntry],
    font_size: f64,
    frame: bool,
) {
    if entries.is_empty() {
        return;
    }

    let row_height = font_size * 1.35;
    let swatch_w = font_size * 1.6;
    let swatch_h = font_size * 0.8;
    let gap = font_size * 0.5;
    let padding = font_size * 0.4;

    let text_style = TextStyle { size: font_size, baseline: TextBaseline::Central, ..Default::default() };

    let max_w = entries
        .iter()
        .map(|e| canvas.measure_text(&e.label, &text_style).width)
        .fold(0.0_f64, f64::max);

    let legend_w = padding + swatch_w + gap + max_w + padding;
    let legend_h = padding + entries.len() as f64 * row_height + padding;

    let lx = area.right() - legend_w - 0.03 * area.width;
    let ly = area.top + 0.03 * area.height;

    let bg_style = Style {
        fill: Some(Color::WHITE),
        stroke: if frame { Some(Color::BLACK) } else { None },
        stroke_width: 1.0,
        opacity: 1.0,
    };
    canvas.rect(lx, ly, legend_w, legend_h, &bg_style);

    for (i, entry) in entries.iter().enumerate() {
        let ey = ly + padding + i as f64 * row_height + row_height / 2.0;
        let sx = lx + padding;

        match &entry.kind {
            LegendKind::FilledRect(outline) => {
                canvas.rect(sx, ey - swatch_h / 2.0, swatch_w, swatch_h, &Style {
                    fill: Some(entry.color),
                    stroke: Some(*outline),
                    stroke_width: 1.0,
                    opacity: 1.0,
                });
            }
            LegendKind::Line(ls) => {
                canvas.line(sx, ey, sx + swatch_w, ey, ls);
            }
            LegendKind::Marker(m) => {
                let err = LineStyle::solid(m.color, 1.5);
                canvas.error_bar(sx + swatch_w / 2.0, ey - swatch_h / 2.0, ey + swatch_h / 2.0, 0.0, &err);
                canvas.marker(sx + swatch_w / 2.0, ey, m);
            }
            LegendKind::HatchedRect => {
                canvas.hatch_rect(sx, ey - swatch_h / 2.0, swatch_w, swatch_h, entry.color, 6.0);
            }
        }

        canvas.text(sx + swatch_w + gap, ey, &entry.label, &text_style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_label_per_entry() {
        let mut c = Canvas::new(800.0, 800.0).unwrap();
        let area = PlotArea::manual(100.0, 50.0, 600.0, 600.0);
        let entries = vec![
            LegendEntry {
                label: "Nonprompt".into(),
                color: Color::hex("#9e9e9e"),
                kind: LegendKind::FilledRect(Color::BLACK),
            },
            LegendEntry {
                label: "Data".into(),
                color: Color::BLACK,
                kind: LegendKind::Marker(MarkerStyle::default()),
            },
            LegendEntry { label: "Stat. unc.".into(), color: Color::BLACK, kind: LegendKind::HatchedRect },
        ];
        draw_legend(&mut c, &area, &entries, 20.0, true);
        let svg = c.finish_svg();
        assert!(svg.contains(">Nonprompt</text>"));
        assert!(svg.contains(">Data</text>"));
        assert!(svg.contains("<circle"));
        assert!(svg.contains("url(#hatch0)"));
    }
}

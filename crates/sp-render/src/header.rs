use crate::canvas::Canvas;
use crate::config::PlotConfig;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// Draw the experiment label (**CMS** *Preliminary*) inside the top-left of
/// the frame and `L fb⁻¹ (√s TeV)` above its top-right corner.
pub fn draw_experiment_header(
    canvas: &mut Canvas,
    area: &PlotArea,
    config: &PlotConfig,
    luminosity_fb: f64,
) {
    let size = config.font.label_size * 1.15;
    let x = area.left + area.width * 0.04;
    let y = area.top + size * 1.3;

    if !config.experiment.name.is_empty() {
        let bold_style = TextStyle { size, weight: FontWeight::Bold, ..Default::default() };
        canvas.text(x, y, &config.experiment.name, &bold_style);

        if !config.experiment.status.is_empty() {
            let italic_style =
                TextStyle { size: size * 0.8, style: FontStyle::Italic, ..Default::default() };
            canvas.text(x, y + size * 1.05, &config.experiment.status, &italic_style);
        }
    }

    let mut info = String::new();
    if luminosity_fb > 0.0 {
        info.push_str(&format!("{:.1} fb\u{207B}\u{00B9}", luminosity_fb));
    }
    if config.experiment.sqrt_s_tev > 0.0 {
        if !info.is_empty() {
            info.push(' ');
        }
        info.push_str(&format!("({} TeV)", config.experiment.sqrt_s_tev));
    }
    if !info.is_empty() {
        let info_style =
            TextStyle { size: config.font.size, anchor: TextAnchor::End, ..Default::default() };
        canvas.text(area.right(), area.top - 0.35 * config.font.size, &info, &info_style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_text() {
        let mut c = Canvas::new(800.0, 800.0).unwrap();
        let area = PlotArea::manual(100.0, 60.0, 650.0, 600.0);
        draw_experiment_header(&mut c, &area, &PlotConfig::default(), 35.9);
        let svg = c.finish_svg();
        assert!(svg.contains(">CMS</text>"));
        assert!(svg.contains(">Preliminary</text>"));
        assert!(svg.contains("35.9 fb\u{207B}\u{00B9} (13 TeV)"));
    }
}

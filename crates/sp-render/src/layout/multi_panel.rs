use crate::layout::margins::PlotArea;

/// Main + ratio panel layout sharing one x axis.
#[derive(Debug, Clone)]
pub struct MainRatioLayout {
    pub main: PlotArea,
    pub ratio: PlotArea,
}

impl MainRatioLayout {
    /// Split `area` vertically; the ratio panel takes `ratio_frac` of the
    /// height below a `gap`.
    pub fn split(area: &PlotArea, gap: f64, ratio_frac: f64) -> Self {
        let ratio_h = area.height * ratio_frac.clamp(0.05, 0.9);
        let main_h = area.height - ratio_h - gap;

        Self {
            main: PlotArea::manual(area.left, area.top, area.width, main_h),
            ratio: PlotArea::manual(area.left, area.top + main_h + gap, area.width, ratio_h),
        }
    }
}

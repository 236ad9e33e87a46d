use serde::Deserialize;
use std::path::Path;

use crate::color::Color;

/// Plot appearance configuration (YAML or defaults).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub experiment: ExperimentConfig,
    pub colors: ColorsConfig,
    pub palette: String,
    pub ratio: RatioConfig,
    pub legend: LegendConfig,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            font: FontConfig::default(),
            axes: AxesConfig::default(),
            experiment: ExperimentConfig::default(),
            colors: ColorsConfig::default(),
            palette: "cms_petroff10".into(),
            ratio: RatioConfig::default(),
            legend: LegendConfig::default(),
        }
    }
}

impl PlotConfig {
    pub fn from_yaml_str(s: &str) -> crate::Result<Self> {
        Ok(serde_yaml_ng::from_str(s)?)
    }

    pub fn from_yaml_file(path: &Path) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn palette_colors(&self) -> Vec<Color> {
        crate::color::palette_colors(&self.palette)
    }
}

/// Font sizes in pixels for an 800 px tall canvas; scaled with the canvas.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub size: f64,
    pub label_size: f64,
    pub tick_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { size: 22.0, label_size: 26.0, tick_size: 20.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub tick_length: f64,
    pub minor_tick_length: f64,
    pub show_top_ticks: bool,
    pub show_right_ticks: bool,
    /// Headroom above the tallest entry on linear axes.
    pub headroom: f64,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            tick_length: 14.0,
            minor_tick_length: 7.0,
            show_top_ticks: true,
            show_right_ticks: true,
            headroom: 1.3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub name: String,
    pub status: String,
    pub sqrt_s_tev: f64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self { name: "CMS".into(), status: "Preliminary".into(), sqrt_s_tev: 13.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub observed: Color,
    pub band: Color,
    pub region_lines: Color,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            observed: Color::BLACK,
            band: Color::hex("#666666"),
            region_lines: Color::hex("#666666"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RatioConfig {
    /// Fraction of the plotting height taken by the ratio panel.
    pub height_frac: f64,
}

impl Default for RatioConfig {
    fn default() -> Self {
        Self { height_frac: 0.3 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    pub frame: bool,
    pub font_size: f64,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self { frame: false, font_size: 20.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let c = PlotConfig::from_yaml_str("{}").unwrap();
        assert_eq!(c.experiment.name, "CMS");
        assert_eq!(c.ratio.height_frac, 0.3);
    }

    #[test]
    fn partial_override() {
        let c = PlotConfig::from_yaml_str(
            "experiment:\n  status: Supplementary\nfont:\n  tick_size: 18\ncolors:\n  band: '#ff0000'\n",
        )
        .unwrap();
        assert_eq!(c.experiment.name, "CMS");
        assert_eq!(c.experiment.status, "Supplementary");
        assert_eq!(c.font.tick_size, 18.0);
        assert_eq!(c.font.label_size, 26.0);
        assert_eq!(c.colors.band, Color::rgb(255, 0, 0));
    }

    #[test]
    fn bad_yaml_is_an_error() {
        assert!(PlotConfig::from_yaml_str("font: [1, 2").is_err());
        assert!(PlotConfig::from_yaml_str("colors:\n  band: 'red'\n").is_err());
    }
}

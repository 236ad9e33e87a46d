use std::path::Path;
use std::str::FromStr;

use crate::RenderError;

pub mod svg;

#[cfg(feature = "png")]
pub mod png;

/// Image format of saved plots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            other => Err(RenderError::Config(format!("unknown output format '{other}'"))),
        }
    }
}

/// Write a rendered SVG document to `path` in `format`.
pub fn save(svg: &str, path: &Path, format: OutputFormat) -> crate::Result<()> {
    match format {
        OutputFormat::Svg => svg::save_svg(svg, path),
        #[cfg(feature = "png")]
        OutputFormat::Png => {
            let bytes = png::svg_to_png(svg, 1.0)?;
            std::fs::write(path, bytes)?;
            Ok(())
        }
        #[cfg(not(feature = "png"))]
        OutputFormat::Png => {
            Err(RenderError::Config("PNG output requires the `png` feature of sp-render".into()))
        }
    }
}

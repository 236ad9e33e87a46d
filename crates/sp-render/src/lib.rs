//! Rendering of ShapePlot figures: an SVG canvas with ROOT-like axes, the
//! systematic-overlay and post-fit stack plots, image output and the HTML
//! gallery of an output directory.

pub mod canvas;
pub mod color;
pub mod config;
pub mod header;
pub mod html;
pub mod layout;
pub mod output;
pub mod plots;
pub mod primitives;
pub mod text;

pub use config::PlotConfig;
pub use output::OutputFormat;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("config error: {0}")]
    Config(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("histogram error: {0}")]
    Core(#[from] sp_core::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("format error: {0}")]
    Fmt(#[from] std::fmt::Error),
    #[cfg(feature = "png")]
    #[error("PNG encoding error: {0}")]
    Png(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

//! # sp-core
//!
//! Histogram model and analysis bookkeeping for ShapePlot.
//!
//! - [`Hist1D`]: fixed-binning histogram with under/overflow and per-cell
//!   sum of squared weights, plus Poisson errors for observed data
//! - [`transform`]: control-region removal and positional rebinning
//! - [`yields`]: yield aggregation and the LaTeX yield table
//! - [`process`]: display names, fit folders and CR normalization
//! - [`style`]: histogram styles from an analysis dataset manager

pub mod error;
pub mod hist;
pub mod process;
pub mod stats;
pub mod style;
pub mod transform;
pub mod yields;

pub use error::{Error, Result};
pub use hist::Hist1D;
pub use yields::{YieldTable, format_data_yield, format_yield};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

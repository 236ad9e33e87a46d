//! # sp-root
//!
//! Read-only access to ROOT files for ShapePlot.
//!
//! Reads TH1D/TH1F histograms and TGraph-family objects through nested
//! `TDirectoryFile`s without a ROOT installation. Supports zlib, LZ4, ZSTD
//! and XZ compressed objects.
//!
//! ```no_run
//! use sp_root::{RootFile, RootObject};
//!
//! let f = RootFile::open("fitDiagnostics.root").unwrap();
//! match f.get("shapes_fit_s/eee/wz").unwrap() {
//!     RootObject::Hist(h) => println!("{} bins", h.n_bins()),
//!     RootObject::Graph(g) => println!("{} points", g.len()),
//! }
//! ```

pub mod decompress;
pub mod directory;
pub mod error;
pub mod file;
pub mod key;
pub mod objects;
pub mod rbuffer;
#[cfg(any(test, feature = "test-writer"))]
pub mod testing;

mod datasource;

pub use error::{Result, RootError};
pub use file::RootFile;
pub use key::KeyInfo;
pub use objects::{GraphData, RootObject, TH1Data};

//! Deserialization of the object classes ShapePlot reads.

mod tgraph;
mod th1;

use crate::error::{Result, RootError};

/// A 1D histogram as stored: every cell including under/overflow.
#[derive(Debug, Clone, PartialEq)]
pub struct TH1Data {
    pub name: String,
    pub title: String,
    /// Bin edges, `n_bins + 1` values.
    pub edges: Vec<f64>,
    /// Cell contents, `n_bins + 2` values: underflow, bins, overflow.
    pub cells: Vec<f64>,
    /// Per-cell sum of squared weights, when the histogram stored them.
    pub sumw2: Option<Vec<f64>>,
    /// `fEntries`.
    pub entries: f64,
}

impl TH1Data {
    pub fn n_bins(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }
}

/// A TGraph-family point set. Errors are zero for plain TGraph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphData {
    pub name: String,
    pub title: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub ex_low: Vec<f64>,
    pub ex_high: Vec<f64>,
    pub ey_low: Vec<f64>,
    pub ey_high: Vec<f64>,
}

impl GraphData {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Any object `RootFile::get` can return.
#[derive(Debug, Clone, PartialEq)]
pub enum RootObject {
    Hist(TH1Data),
    Graph(GraphData),
}

impl RootObject {
    pub fn name(&self) -> &str {
        match self {
            RootObject::Hist(h) => &h.name,
            RootObject::Graph(g) => &g.name,
        }
    }
}

/// Decode a payload of the given class.
pub fn read_object(payload: &[u8], class_name: &str) -> Result<RootObject> {
    match class_name {
        "TH1D" => th1::read(payload, th1::Storage::Double).map(RootObject::Hist),
        "TH1F" => th1::read(payload, th1::Storage::Float).map(RootObject::Hist),
        "TGraph" => tgraph::read(payload, tgraph::Errors::None).map(RootObject::Graph),
        "TGraphErrors" => tgraph::read(payload, tgraph::Errors::Symmetric).map(RootObject::Graph),
        "TGraphAsymmErrors" => {
            tgraph::read(payload, tgraph::Errors::Asymmetric).map(RootObject::Graph)
        }
        other => Err(RootError::UnsupportedClass(other.to_string())),
    }
}

//! One-dimensional histogram with ROOT cell conventions.
//!
//! Cell `0` is the underflow, cells `1..=n` are the regular bins and cell
//! `n + 1` is the overflow. Every cell carries a content and a sum of
//! squared weights; the bin error is its square root.

use sp_root::{GraphData, RootObject, TH1Data};

use crate::error::{Error, Result};
use crate::stats::poisson_interval;

/// How bin errors are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ErrorMode {
    /// `sqrt(sumw2)`, symmetric.
    #[default]
    Normal,
    /// Garwood 68.27% interval around the (unweighted) content.
    Poisson,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hist1D {
    name: String,
    title: String,
    edges: Vec<f64>,
    contents: Vec<f64>,
    sumw2: Vec<f64>,
    error_mode: ErrorMode,
}

impl Hist1D {
    /// `n` equal-width bins over `[lo, hi]`.
    pub fn uniform(name: impl Into<String>, n: usize, lo: f64, hi: f64) -> Result<Self> {
        if n == 0 || !(hi > lo) {
            return Err(Error::Validation(format!(
                "invalid uniform binning: {} bins over [{}, {}]",
                n, lo, hi
            )));
        }
        let width = (hi - lo) / n as f64;
        let edges = (0..=n).map(|i| lo + i as f64 * width).collect();
        Self::with_edges(name, edges)
    }

    /// Empty histogram on explicit, strictly increasing edges.
    pub fn with_edges(name: impl Into<String>, edges: Vec<f64>) -> Result<Self> {
        if edges.len() < 2 || edges.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(Error::Validation(format!(
                "bin edges must be strictly increasing with at least two values, got {:?}",
                edges
            )));
        }
        let cells = edges.len() + 1;
        let name = name.into();
        Ok(Self {
            title: name.clone(),
            name,
            edges,
            contents: vec![0.0; cells],
            sumw2: vec![0.0; cells],
            error_mode: ErrorMode::Normal,
        })
    }

    /// Histogram from a decoded ROOT TH1. Without stored `sumw2` the
    /// errors default to `sqrt(|content|)`.
    pub fn from_root(h: TH1Data) -> Result<Self> {
        if h.cells.len() != h.edges.len() + 1 {
            return Err(Error::Validation(format!(
                "'{}': {} cells for {} edges",
                h.name,
                h.cells.len(),
                h.edges.len()
            )));
        }
        let mut out = Self::with_edges(h.name, h.edges)?;
        out.title = h.title;
        out.sumw2 = match h.sumw2 {
            Some(s) => s,
            None => h.cells.iter().map(|c| c.abs()).collect(),
        };
        out.contents = h.cells;
        Ok(out)
    }

    /// One bin per graph point over `[0, N]`; each point is filled at its x
    /// with its y as weight.
    pub fn from_graph(graph: &GraphData, name: &str) -> Result<Self> {
        let n = graph.len();
        if n == 0 {
            return Err(Error::Validation(format!("graph '{}' has no points", graph.name)));
        }
        let mut out = Self::uniform(name, n, 0.0, n as f64)?;
        for (&x, &y) in graph.x.iter().zip(&graph.y) {
            out.fill(x, y);
        }
        Ok(out)
    }

    /// Histogram from any readable object; graphs are converted with
    /// [`Hist1D::from_graph`] under `graph_name`.
    pub fn from_object(obj: RootObject, graph_name: &str) -> Result<Self> {
        match obj {
            RootObject::Hist(h) => Self::from_root(h),
            RootObject::Graph(g) => Self::from_graph(&g, graph_name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn low_edge(&self, bin: usize) -> f64 {
        self.edges[bin.saturating_sub(1).min(self.n_bins())]
    }

    pub fn up_edge(&self, bin: usize) -> f64 {
        self.edges[bin.min(self.n_bins())]
    }

    /// Content of cell `i`; zero outside `0..=n+1`.
    pub fn content(&self, i: usize) -> f64 {
        self.contents.get(i).copied().unwrap_or(0.0)
    }

    /// Symmetric error of cell `i`.
    pub fn error(&self, i: usize) -> f64 {
        match self.error_mode {
            ErrorMode::Normal => self.sumw2.get(i).copied().unwrap_or(0.0).sqrt(),
            ErrorMode::Poisson => {
                let (lo, hi) = self.error_low_high(i);
                0.5 * (lo + hi)
            }
        }
    }

    /// Lower and upper error of cell `i`, honoring the error mode.
    pub fn error_low_high(&self, i: usize) -> (f64, f64) {
        match self.error_mode {
            ErrorMode::Normal => {
                let e = self.error(i);
                (e, e)
            }
            ErrorMode::Poisson => {
                let n = self.content(i).max(0.0).round();
                let (lo, hi) = poisson_interval(n);
                (n - lo, hi - n)
            }
        }
    }

    /// Set the content of cell `i`. Indices past the overflow are ignored.
    pub fn set_content(&mut self, i: usize, value: f64) {
        if let Some(c) = self.contents.get_mut(i) {
            *c = value;
        }
    }

    /// Set the error of cell `i`. Indices past the overflow are ignored.
    pub fn set_error(&mut self, i: usize, error: f64) {
        if let Some(s) = self.sumw2.get_mut(i) {
            *s = error * error;
        }
    }

    /// Cell index for `x`: 0 below the first edge, `n + 1` at or above the last.
    pub fn find_bin(&self, x: f64) -> usize {
        if x < self.edges[0] {
            return 0;
        }
        // partition_point gives the number of edges <= x
        self.edges.partition_point(|&e| e <= x).min(self.n_bins() + 1)
    }

    pub fn fill(&mut self, x: f64, weight: f64) {
        let i = self.find_bin(x);
        self.contents[i] += weight;
        self.sumw2[i] += weight * weight;
    }

    /// Bin-by-bin sum. Both histograms must have the same number of bins.
    pub fn add(&mut self, other: &Hist1D) -> Result<()> {
        if other.n_bins() != self.n_bins() {
            return Err(Error::Validation(format!(
                "cannot add '{}' ({} bins) to '{}' ({} bins)",
                other.name,
                other.n_bins(),
                self.name,
                self.n_bins()
            )));
        }
        for (a, b) in self.contents.iter_mut().zip(&other.contents) {
            *a += b;
        }
        for (a, b) in self.sumw2.iter_mut().zip(&other.sumw2) {
            *a += b;
        }
        Ok(())
    }

    pub fn scale(&mut self, factor: f64) {
        self.contents.iter_mut().for_each(|c| *c *= factor);
        self.sumw2.iter_mut().for_each(|s| *s *= factor * factor);
    }

    /// Sum of contents over cells `first..=last` (clamped to the valid cell
    /// range) and the quadrature sum of their errors.
    pub fn integral_and_error(&self, first: usize, last: usize) -> (f64, f64) {
        let last = last.min(self.n_bins() + 1);
        if first > last {
            return (0.0, 0.0);
        }
        let integral = self.contents[first..=last].iter().sum();
        let variance: f64 = self.sumw2[first..=last].iter().sum();
        (integral, variance.sqrt())
    }

    /// Sum over the regular bins.
    pub fn integral(&self) -> f64 {
        self.integral_and_error(1, self.n_bins()).0
    }

    pub fn maximum(&self) -> f64 {
        self.bins().map(|(_, c)| c).fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn minimum(&self) -> f64 {
        self.bins().map(|(_, c)| c).fold(f64::INFINITY, f64::min)
    }

    /// Regular bins as `(index, content)`.
    pub fn bins(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        (1..=self.n_bins()).map(|i| (i, self.contents[i]))
    }

    /// Drop stored weights and report Poisson intervals, as done for
    /// observed data.
    pub fn use_poisson_errors(&mut self) {
        self.sumw2 = self.contents.iter().map(|c| c.abs()).collect();
        self.error_mode = ErrorMode::Poisson;
    }

    /// Bin-by-bin ratio `self / denominator`; empty denominator bins give 0.
    /// Errors are the numerator errors divided by the denominator.
    pub fn ratio_to(&self, denominator: &Hist1D) -> Result<Hist1D> {
        if denominator.n_bins() != self.n_bins() {
            return Err(Error::Validation(format!(
                "ratio of '{}' ({} bins) over '{}' ({} bins)",
                self.name,
                self.n_bins(),
                denominator.name,
                denominator.n_bins()
            )));
        }
        let mut out = Hist1D::with_edges(format!("{}_ratio", self.name), self.edges.clone())?;
        for i in 0..self.contents.len() {
            let d = denominator.contents[i];
            if d != 0.0 {
                out.contents[i] = self.contents[i] / d;
                out.sumw2[i] = self.sumw2[i] / (d * d);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn filled(contents: &[f64]) -> Hist1D {
        let mut h = Hist1D::uniform("h", contents.len() - 2, 0.0, (contents.len() - 2) as f64)
            .unwrap();
        for (i, &c) in contents.iter().enumerate() {
            h.set_content(i, c);
            h.set_error(i, c.abs().sqrt());
        }
        h
    }

    #[test]
    fn rejects_bad_binning() {
        assert!(Hist1D::uniform("h", 0, 0.0, 1.0).is_err());
        assert!(Hist1D::uniform("h", 3, 1.0, 1.0).is_err());
        assert!(Hist1D::with_edges("h", vec![0.0, 2.0, 1.0]).is_err());
    }

    #[test]
    fn find_bin_follows_root_conventions() {
        let h = Hist1D::with_edges("h", vec![0.0, 1.0, 3.0]).unwrap();
        assert_eq!(h.find_bin(-0.5), 0);
        assert_eq!(h.find_bin(0.0), 1);
        assert_eq!(h.find_bin(0.99), 1);
        assert_eq!(h.find_bin(1.0), 2);
        assert_eq!(h.find_bin(3.0), 3);
        assert_eq!(h.find_bin(1e9), 3);
    }

    #[test]
    fn integral_and_error_over_cell_range() {
        let h = filled(&[1.0, 4.0, 9.0, 16.0, 25.0]);
        let (sum, err) = h.integral_and_error(0, 3);
        assert_abs_diff_eq!(sum, 30.0);
        assert_abs_diff_eq!(err, 30.0_f64.sqrt(), epsilon = 1e-12);
        let (sum, _) = h.integral_and_error(1, 100);
        assert_abs_diff_eq!(sum, 54.0);
        assert_eq!(h.integral_and_error(3, 1), (0.0, 0.0));
        assert_abs_diff_eq!(h.integral(), 29.0);
    }

    #[test]
    fn add_and_scale_propagate_errors() {
        let mut a = filled(&[0.0, 4.0, 1.0, 0.0]);
        let b = filled(&[0.0, 5.0, 3.0, 0.0]);
        a.add(&b).unwrap();
        assert_abs_diff_eq!(a.content(1), 9.0);
        assert_abs_diff_eq!(a.error(1), 3.0, epsilon = 1e-12);
        a.scale(2.0);
        assert_abs_diff_eq!(a.content(2), 8.0);
        assert_abs_diff_eq!(a.error(2), 4.0, epsilon = 1e-12);

        let wrong = filled(&[0.0, 1.0, 0.0]);
        assert!(matches!(a.add(&wrong), Err(Error::Validation(_))));
    }

    #[test]
    fn from_root_defaults_errors_to_sqrt_content() {
        let h = Hist1D::from_root(TH1Data {
            name: "wz".into(),
            title: "WZ".into(),
            edges: vec![0.0, 1.0, 2.0],
            cells: vec![0.0, 4.0, 9.0, 1.0],
            sumw2: None,
            entries: 14.0,
        })
        .unwrap();
        assert_eq!(h.title(), "WZ");
        assert_abs_diff_eq!(h.error(2), 3.0);
        assert_abs_diff_eq!(h.error(3), 1.0);
    }

    #[test]
    fn graph_points_become_unit_bins() {
        let g = GraphData {
            name: "data".into(),
            title: String::new(),
            x: vec![0.5, 1.5, 2.5],
            y: vec![3.0, 0.0, 2.0],
            ex_low: vec![0.5; 3],
            ex_high: vec![0.5; 3],
            ey_low: vec![0.0; 3],
            ey_high: vec![0.0; 3],
        };
        let h = Hist1D::from_graph(&g, "data_eee").unwrap();
        assert_eq!(h.name(), "data_eee");
        assert_eq!(h.edges(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(h.bins().map(|(_, c)| c).collect::<Vec<_>>(), vec![3.0, 0.0, 2.0]);
        assert_abs_diff_eq!(h.error(1), 3.0);
    }

    #[test]
    fn poisson_mode_is_asymmetric() {
        let mut h = filled(&[0.0, 0.0, 4.0, 0.0]);
        h.use_poisson_errors();
        let (lo, hi) = h.error_low_high(1);
        assert_abs_diff_eq!(lo, 0.0);
        assert_abs_diff_eq!(hi, 1.8410, epsilon = 1e-3);
        let (lo, hi) = h.error_low_high(2);
        assert!(hi > lo);
        assert_abs_diff_eq!(lo, 1.9144, epsilon = 1e-3);
        assert_abs_diff_eq!(hi, 3.1620, epsilon = 1e-3);
    }

    #[test]
    fn ratio_skips_empty_denominator_bins() {
        let num = filled(&[0.0, 4.0, 2.0, 0.0]);
        let den = filled(&[0.0, 2.0, 0.0, 0.0]);
        let r = num.ratio_to(&den).unwrap();
        assert_abs_diff_eq!(r.content(1), 2.0);
        assert_abs_diff_eq!(r.error(1), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.content(2), 0.0);
    }
}

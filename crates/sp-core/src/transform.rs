//! Histogram reshaping applied before plotting.

use crate::error::Result;
use crate::hist::Hist1D;

/// Variable binning used for transverse-mass (`MTWZ`) distributions.
pub const MTWZ_BINNING: [f64; 10] =
    [0.0, 100.0, 200.0, 300.0, 400.0, 500.0, 700.0, 1000.0, 1500.0, 2000.0];

/// Whether a plot needs the fixed `MTWZ` binning.
pub fn needs_mtwz_binning(plot_name: &str) -> bool {
    plot_name.contains("MTWZ")
}

/// Drop the leading (control-region) bin.
///
/// The result is named `<name>_noCR` and has `n - 1` unit-width bins over
/// `[0, n - 1]`. Source bins `2..=n` land in `1..=n-1`; under- and overflow
/// are not carried over.
pub fn remove_control_region(h: &Hist1D) -> Result<Hist1D> {
    let n = h.n_bins().saturating_sub(1);
    let mut out = Hist1D::uniform(format!("{}_noCR", h.name()), n, 0.0, n as f64)?;
    for i in 2..=h.n_bins() {
        out.set_content(i - 1, h.content(i));
        out.set_error(i - 1, h.error(i));
    }
    Ok(out)
}

/// Copy cells `0..=n` of `h` by index onto a histogram with `edges`.
///
/// Bin positions are not consulted. Cells past the target overflow are
/// dropped.
pub fn rebin_positional(h: &Hist1D, name: &str, edges: &[f64]) -> Result<Hist1D> {
    let mut out = Hist1D::with_edges(name, edges.to_vec())?;
    for i in 0..=h.n_bins() {
        out.set_content(i, h.content(i));
        out.set_error(i, h.error(i));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn hist(cells: &[f64]) -> Hist1D {
        let n = cells.len() - 2;
        let mut h = Hist1D::uniform("wz", n, 0.0, n as f64).unwrap();
        for (i, &c) in cells.iter().enumerate() {
            h.set_content(i, c);
            h.set_error(i, 0.1 * c);
        }
        h
    }

    #[test]
    fn control_region_bin_is_dropped() {
        // underflow 7, bins [u, a, b, c] = [1, 2, 3, 4], overflow 9
        let h = hist(&[7.0, 1.0, 2.0, 3.0, 4.0, 9.0]);
        let out = remove_control_region(&h).unwrap();
        assert_eq!(out.name(), "wz_noCR");
        assert_eq!(out.n_bins(), 3);
        assert_eq!(out.edges(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(out.content(0), 0.0);
        assert_eq!(out.bins().map(|(_, c)| c).collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert_abs_diff_eq!(out.error(3), 0.4, epsilon = 1e-12);
        assert_eq!(out.content(4), 0.0);
    }

    #[test]
    fn three_bins_become_two() {
        let h = hist(&[0.0, 5.0, 6.0, 8.0, 0.0]);
        let out = remove_control_region(&h).unwrap();
        assert_eq!(out.n_bins(), 2);
        assert_eq!(out.content(1), 6.0);
        assert_eq!(out.content(2), 8.0);
        assert_abs_diff_eq!(out.error(1), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn single_bin_cannot_lose_its_control_region() {
        let h = hist(&[0.0, 5.0, 0.0]);
        assert!(remove_control_region(&h).is_err());
    }

    #[test]
    fn positional_rebin_copies_cells_by_index() {
        let cells: Vec<f64> = (0..12).map(|i| i as f64 + 1.0).collect();
        let h = hist(&cells);
        assert_eq!(h.n_bins(), 10);
        let out = rebin_positional(&h, "wz_mtwz", &MTWZ_BINNING).unwrap();
        assert_eq!(out.name(), "wz_mtwz");
        assert_eq!(out.n_bins(), 9);
        for i in 0..=9 {
            assert_eq!(out.content(i), h.content(i));
            assert_abs_diff_eq!(out.error(i), h.error(i), epsilon = 1e-12);
        }
        assert_eq!(out.edges()[6], 700.0);
    }

    #[test]
    fn positional_rebin_ignores_cells_past_overflow() {
        // 12 source bins: cell 10 lands in the target overflow, 11 and 12 are dropped
        let cells: Vec<f64> = (0..14).map(|i| i as f64).collect();
        let h = hist(&cells);
        let out = rebin_positional(&h, "tmp", &MTWZ_BINNING).unwrap();
        for i in 0..=10 {
            assert_eq!(out.content(i), i as f64);
        }
        let (sum, _) = out.integral_and_error(0, 100);
        assert_eq!(sum, (0..=10).sum::<i32>() as f64);
    }

    #[test]
    fn mtwz_detection() {
        assert!(needs_mtwz_binning("MTWZ_Fiducial"));
        assert!(!needs_mtwz_binning("mjj"));
    }
}

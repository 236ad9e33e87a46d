//! Counting-statistics helpers.

use statrs::distribution::{ContinuousCDF, Gamma};

/// Coverage of a one-sigma central interval.
pub const ONE_SIGMA: f64 = 0.682689492;

/// Garwood central interval `(low, high)` for an observed count `n`.
///
/// `low = 0` for `n = 0`, otherwise the `alpha/2` quantile of
/// Gamma(n, 1); `high` is the `1 - alpha/2` quantile of Gamma(n + 1, 1),
/// with `alpha = 1 - ONE_SIGMA`.
pub fn poisson_interval(n: f64) -> (f64, f64) {
    let alpha = 1.0 - ONE_SIGMA;
    let low = if n <= 0.0 { 0.0 } else { gamma_quantile(alpha / 2.0, n) };
    let high = gamma_quantile(1.0 - alpha / 2.0, n.max(0.0) + 1.0);
    (low, high)
}

fn gamma_quantile(p: f64, shape: f64) -> f64 {
    match Gamma::new(shape, 1.0) {
        Ok(g) => g.inverse_cdf(p),
        Err(_) => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn zero_count_has_zero_low_edge() {
        let (lo, hi) = poisson_interval(0.0);
        assert_eq!(lo, 0.0);
        assert_abs_diff_eq!(hi, 1.8410, epsilon = 1e-3);
    }

    #[test]
    fn interval_brackets_the_count() {
        for n in [1.0, 5.0, 20.0, 100.0] {
            let (lo, hi) = poisson_interval(n);
            assert!(lo < n && n < hi, "n={n}: [{lo}, {hi}]");
        }
        let (lo, hi) = poisson_interval(1.0);
        assert_abs_diff_eq!(lo, 0.1727, epsilon = 1e-3);
        assert_abs_diff_eq!(hi, 3.2995, epsilon = 1e-3);
    }
}

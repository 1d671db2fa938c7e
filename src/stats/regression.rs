//! Ordinary least squares trend line.

use statrs::distribution::{ContinuousCDF, StudentsT};

/// Fitted line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OlsFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// Two-tailed p-value of the slope, when there are residual degrees of freedom.
    pub p_value: Option<f64>,
    pub n: usize,
}

impl OlsFit {
    /// Fit a line through `(x, y)` points.
    ///
    /// Returns `None` with fewer than two points or when all x are equal.
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        let n = points.len();
        if n < 2 {
            return None;
        }

        let nf = n as f64;
        let mean_x = points.iter().map(|&(x, _)| x).sum::<f64>() / nf;
        let mean_y = points.iter().map(|&(_, y)| y).sum::<f64>() / nf;

        let sxx: f64 = points.iter().map(|&(x, _)| (x - mean_x).powi(2)).sum();
        let sxy: f64 = points
            .iter()
            .map(|&(x, y)| (x - mean_x) * (y - mean_y))
            .sum();
        let syy: f64 = points.iter().map(|&(_, y)| (y - mean_y).powi(2)).sum();

        if sxx == 0.0 {
            return None;
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;

        let sse: f64 = points
            .iter()
            .map(|&(x, y)| (y - (intercept + slope * x)).powi(2))
            .sum();
        let r_squared = if syy == 0.0 { 1.0 } else { 1.0 - sse / syy };

        Some(Self {
            slope,
            intercept,
            r_squared,
            p_value: Self::slope_p_value(slope, sse, sxx, n),
            n,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    fn slope_p_value(slope: f64, sse: f64, sxx: f64, n: usize) -> Option<f64> {
        if n <= 2 {
            return None;
        }
        let df = (n - 2) as f64;
        let se = (sse / df / sxx).sqrt();
        if se == 0.0 {
            return Some(0.0);
        }

        let t = slope / se;
        let dist = StudentsT::new(0.0, 1.0, df).ok()?;
        Some(2.0 * (1.0 - dist.cdf(t.abs())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_line_is_recovered() {
        let points = [(0.0, 1.0), (1.0, 3.0), (2.0, 5.0), (3.0, 7.0)];
        let fit = OlsFit::fit(&points).unwrap();

        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
        assert!(fit.p_value.unwrap() < 1e-9);
        assert_eq!(fit.n, 4);
        assert!((fit.predict(10.0) - 21.0).abs() < 1e-9);
    }

    #[test]
    fn noisy_points_give_partial_fit() {
        let points = [(1.0, 2.0), (2.0, 1.0), (3.0, 4.0), (4.0, 3.0), (5.0, 6.0)];
        let fit = OlsFit::fit(&points).unwrap();

        assert!((fit.slope - 1.0).abs() < 1e-9);
        assert!((fit.intercept - 0.2).abs() < 1e-9);
        assert!((fit.r_squared - (1.0 - 4.8 / 14.8)).abs() < 1e-9);
        let p = fit.p_value.unwrap();
        assert!(p > 0.05 && p < 0.15);
    }

    #[test]
    fn two_points_have_no_p_value() {
        let fit = OlsFit::fit(&[(1.0, 1.0), (2.0, 3.0)]).unwrap();
        assert_eq!(fit.p_value, None);
        assert!((fit.slope - 2.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_inputs_have_no_fit() {
        assert_eq!(OlsFit::fit(&[]), None);
        assert_eq!(OlsFit::fit(&[(1.0, 2.0)]), None);
        assert_eq!(OlsFit::fit(&[(1.0, 2.0), (1.0, 5.0)]), None);
    }
}

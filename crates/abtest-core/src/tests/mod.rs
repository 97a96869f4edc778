//! Statistical hypothesis testing
//!
//! Two-sample procedures used by the A/B analysis, computed directly on
//! `statrs` distributions.

pub mod parametric;

pub use distributional::shapiro_wilk;
pub use nonparametric::{mann_whitney_u, MannWhitneyOptions};
pub use parametric::{levene, t_test, LeveneCenter, TTestKind, TTestOptions};

use crate::StatsError;

/// Alternative hypothesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alternative {
    #[default]
    TwoSided,
    /// First sample location is less than the second
    Less,
    /// First sample location is greater than the second
    Greater,
}

/// Generic test result structure for all statistical tests
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Test statistic (W, t, U, F)
    pub statistic: f64,
    /// p-value
    pub p_value: f64,
    /// Degrees of freedom (f64::NAN if not applicable)
    pub df: f64,
    /// Effect size (Cohen's d, rank-biserial r) (f64::NAN if not applicable)
    pub effect_size: f64,
    /// Confidence interval lower bound
    pub ci_lower: f64,
    /// Confidence interval upper bound
    pub ci_upper: f64,
    /// Confidence level used
    pub confidence_level: f64,
    /// Total sample size
    pub n: usize,
    /// Group 1 sample size (for two-sample tests)
    pub n1: usize,
    /// Group 2 sample size (for two-sample tests)
    pub n2: usize,
    /// Alternative hypothesis
    pub alternative: Alternative,
    /// Test method/name
    pub method: String,
}

impl Default for TestResult {
    fn default() -> Self {
        Self {
            statistic: f64::NAN,
            p_value: f64::NAN,
            df: f64::NAN,
            effect_size: f64::NAN,
            ci_lower: f64::NAN,
            ci_upper: f64::NAN,
            confidence_level: 0.95,
            n: 0,
            n1: 0,
            n2: 0,
            alternative: Alternative::TwoSided,
            method: String::new(),
        }
    }
}

/// Convert a statrs construction error to our StatsError
fn convert_error(e: impl std::fmt::Display) -> StatsError {
    StatsError::Distribution(e.to_string())
}

/// Filter NaN values from a slice
fn filter_nan(data: &[f64]) -> Vec<f64> {
    data.iter().copied().filter(|x| !x.is_nan()).collect()
}

fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample variance (ddof = 1)
fn variance(data: &[f64]) -> f64 {
    let m = mean(data);
    data.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / (data.len() as f64 - 1.0)
}

/// Median of an unsorted sample
fn median(data: &[f64]) -> f64 {
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_filter_nan() {
        assert_eq!(filter_nan(&[1.0, f64::NAN, 3.0]), vec![1.0, 3.0]);
    }

    #[test]
    fn test_moments() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_abs_diff_eq!(mean(&data), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(variance(&data), 32.0 / 7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(median(&data), 4.5, epsilon = 1e-12);
        assert_abs_diff_eq!(median(&[3.0, 1.0, 2.0]), 2.0, epsilon = 1e-12);
    }
}

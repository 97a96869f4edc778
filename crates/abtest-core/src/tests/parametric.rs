//! Parametric statistical tests
//!
//! - t-test (Student, Welch)
//! - Levene test for homogeneity of variances (median or mean centered)

use super::{convert_error, filter_nan, mean, median, variance, Alternative, TestResult};
use crate::{StatsError, StatsResult};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};
use tracing::debug;

/// Two-sample t-test flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TTestKind {
    /// Pooled variance; assumes equal population variances
    #[default]
    Student,
    /// Welch-Satterthwaite degrees of freedom; variances may differ
    Welch,
}

/// Options for t-test
#[derive(Debug, Clone)]
pub struct TTestOptions {
    /// Alternative hypothesis
    pub alternative: Alternative,
    /// Test kind: Student (default) or Welch
    pub kind: TTestKind,
    /// Confidence level for CI (default: 0.95)
    pub confidence_level: Option<f64>,
    /// Hypothesized mean difference (default: 0.0)
    pub mu: f64,
}

impl Default for TTestOptions {
    fn default() -> Self {
        Self {
            alternative: Alternative::TwoSided,
            kind: TTestKind::Student,
            confidence_level: Some(0.95),
            mu: 0.0,
        }
    }
}

/// Two-sample t-test
///
/// Performs Student's t-test (default) or Welch's t-test on independent
/// samples. The statistic is signed as `mean(group1) - mean(group2)`.
///
/// # Arguments
/// * `group1` - First sample data
/// * `group2` - Second sample data
/// * `options` - Test options
///
/// # Returns
/// Test result with t-statistic, p-value, df, CI of the mean difference and
/// Cohen's d
pub fn t_test(group1: &[f64], group2: &[f64], options: &TTestOptions) -> StatsResult<TestResult> {
    let g1 = filter_nan(group1);
    let g2 = filter_nan(group2);

    if g1.len() < 2 {
        return Err(StatsError::InsufficientDataMsg(
            "t-test requires at least 2 observations in group 1".into(),
        ));
    }
    if g2.len() < 2 {
        return Err(StatsError::InsufficientDataMsg(
            "t-test requires at least 2 observations in group 2".into(),
        ));
    }
    if let Some(cl) = options.confidence_level {
        if !(cl > 0.0 && cl < 1.0) {
            return Err(StatsError::InvalidValue {
                field: "confidence_level",
                value: cl,
                reason: "must be in (0, 1)",
            });
        }
    }

    let (n1, n2) = (g1.len() as f64, g2.len() as f64);
    let (m1, m2) = (mean(&g1), mean(&g2));
    let (v1, v2) = (variance(&g1), variance(&g2));

    let pooled_df = n1 + n2 - 2.0;
    let pooled_var = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / pooled_df;

    let (se, df) = match options.kind {
        TTestKind::Student => ((pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt(), pooled_df),
        TTestKind::Welch => {
            let (s1, s2) = (v1 / n1, v2 / n2);
            let se2 = s1 + s2;
            let df = se2 * se2 / (s1 * s1 / (n1 - 1.0) + s2 * s2 / (n2 - 1.0));
            (se2.sqrt(), df)
        }
    };

    if se == 0.0 || !se.is_finite() {
        return Err(StatsError::InvalidInput(
            "t-test is undefined when both samples have zero variance".into(),
        ));
    }

    let diff = m1 - m2;
    let t = (diff - options.mu) / se;
    let dist = StudentsT::new(0.0, 1.0, df).map_err(convert_error)?;

    let p_value = match options.alternative {
        Alternative::TwoSided => (2.0 * dist.sf(t.abs())).min(1.0),
        Alternative::Greater => dist.sf(t),
        Alternative::Less => dist.cdf(t),
    };

    let (ci_lower, ci_upper) = match options.confidence_level {
        Some(cl) => match options.alternative {
            Alternative::TwoSided => {
                let q = dist.inverse_cdf(1.0 - (1.0 - cl) / 2.0);
                (diff - q * se, diff + q * se)
            }
            Alternative::Greater => (diff - dist.inverse_cdf(cl) * se, f64::INFINITY),
            Alternative::Less => (f64::NEG_INFINITY, diff + dist.inverse_cdf(cl) * se),
        },
        None => (f64::NAN, f64::NAN),
    };

    let effect_size = if pooled_var > 0.0 {
        diff / pooled_var.sqrt()
    } else {
        f64::NAN
    };

    debug!(kind = ?options.kind, t, df, p_value, "t-test");

    Ok(TestResult {
        statistic: t,
        p_value,
        df,
        effect_size,
        ci_lower,
        ci_upper,
        confidence_level: options.confidence_level.unwrap_or(f64::NAN),
        n: g1.len() + g2.len(),
        n1: g1.len(),
        n2: g2.len(),
        alternative: options.alternative,
        method: format!("{:?} t-test", options.kind),
    })
}

/// Center used for the absolute deviations in Levene's test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeveneCenter {
    /// Brown-Forsythe variant, robust to non-normal data
    #[default]
    Median,
    /// Classic mean-centered formulation
    Mean,
}

/// Levene test for homogeneity of variances
///
/// Tests whether groups have equal variances by running a one-way ANOVA on
/// the absolute deviations from each group's center.
///
/// # Arguments
/// * `groups` - Vector of group data
/// * `center` - Group center for the deviations
pub fn levene(groups: &[Vec<f64>], center: LeveneCenter) -> StatsResult<TestResult> {
    if groups.len() < 2 {
        return Err(StatsError::InsufficientDataMsg(
            "Levene test requires at least 2 groups".into(),
        ));
    }

    let filtered: Vec<Vec<f64>> = groups.iter().map(|g| filter_nan(g)).collect();

    for (i, g) in filtered.iter().enumerate() {
        if g.len() < 2 {
            return Err(StatsError::InsufficientDataMsg(format!(
                "Levene test requires at least 2 observations per group (group {} has {})",
                i,
                g.len()
            )));
        }
    }

    let deviations: Vec<Vec<f64>> = filtered
        .iter()
        .map(|g| {
            let c = match center {
                LeveneCenter::Median => median(g),
                LeveneCenter::Mean => mean(g),
            };
            g.iter().map(|x| (x - c).abs()).collect()
        })
        .collect();

    let k = deviations.len() as f64;
    let n: usize = deviations.iter().map(Vec::len).sum();
    let group_means: Vec<f64> = deviations.iter().map(|z| mean(z)).collect();
    let grand_mean = deviations.iter().flatten().sum::<f64>() / n as f64;

    let ss_between: f64 = deviations
        .iter()
        .zip(&group_means)
        .map(|(z, zm)| z.len() as f64 * (zm - grand_mean) * (zm - grand_mean))
        .sum();
    let ss_within: f64 = deviations
        .iter()
        .zip(&group_means)
        .map(|(z, zm)| z.iter().map(|v| (v - zm) * (v - zm)).sum::<f64>())
        .sum();

    let df1 = k - 1.0;
    let df2 = n as f64 - k;
    // Constant deviations within every group: spreads differ unless they all agree
    let (statistic, p_value) = if ss_within == 0.0 {
        if ss_between == 0.0 {
            return Err(StatsError::InvalidInput(
                "Levene test is undefined when every deviation is equal".into(),
            ));
        }
        (f64::INFINITY, 0.0)
    } else {
        let statistic = (df2 / df1) * ss_between / ss_within;
        let dist = FisherSnedecor::new(df1, df2).map_err(convert_error)?;
        (statistic, dist.sf(statistic))
    };

    debug!(?center, statistic, p_value, "levene");

    Ok(TestResult {
        statistic,
        p_value,
        df: df1,
        confidence_level: f64::NAN,
        n,
        n1: filtered[0].len(),
        n2: filtered[1].len(),
        alternative: Alternative::TwoSided,
        method: format!("Levene test ({:?} centered)", center),
        ..TestResult::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const G1: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];
    const G2: [f64; 5] = [2.0, 4.0, 6.0, 8.0, 10.0];

    #[test]
    fn test_t_test_student() {
        let result = t_test(&G1, &G2, &TTestOptions::default()).unwrap();

        // pooled variance 6.25, se = sqrt(2.5)
        assert_abs_diff_eq!(result.statistic, -3.0 / 2.5f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(result.df, 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.p_value, 0.09435, epsilon = 1e-4);
        assert_abs_diff_eq!(result.effect_size, -3.0 / 2.5, epsilon = 1e-12);
        assert!(result.ci_lower < -3.0 && result.ci_upper > 0.0);
        assert_eq!(result.n1, 5);
        assert_eq!(result.method, "Student t-test");
    }

    #[test]
    fn test_t_test_welch() {
        let opts = TTestOptions {
            kind: TTestKind::Welch,
            ..Default::default()
        };
        let result = t_test(&G1, &G2, &opts).unwrap();

        assert!(result.statistic < 0.0); // g1 mean < g2 mean
        assert_abs_diff_eq!(result.df, 100.0 / 17.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.p_value, 0.10753, epsilon = 1e-4);
    }

    #[test]
    fn test_t_test_sign_follows_argument_order() {
        let forward = t_test(&G1, &G2, &TTestOptions::default()).unwrap();
        let backward = t_test(&G2, &G1, &TTestOptions::default()).unwrap();
        assert_abs_diff_eq!(forward.statistic, -backward.statistic, epsilon = 1e-12);
        assert_abs_diff_eq!(forward.p_value, backward.p_value, epsilon = 1e-12);
    }

    #[test]
    fn test_t_test_one_sided() {
        let less = t_test(
            &G1,
            &G2,
            &TTestOptions {
                alternative: Alternative::Less,
                ..Default::default()
            },
        )
        .unwrap();
        let greater = t_test(
            &G1,
            &G2,
            &TTestOptions {
                alternative: Alternative::Greater,
                ..Default::default()
            },
        )
        .unwrap();

        assert_abs_diff_eq!(less.p_value, 0.09435 / 2.0, epsilon = 1e-4);
        assert_abs_diff_eq!(less.p_value + greater.p_value, 1.0, epsilon = 1e-9);
        assert!(less.ci_lower.is_infinite());
    }

    #[test]
    fn test_t_test_insufficient_data() {
        assert!(t_test(&[1.0], &G2, &TTestOptions::default()).is_err());
        assert!(t_test(&G1, &[f64::NAN, 2.0], &TTestOptions::default()).is_err());
    }

    #[test]
    fn test_t_test_zero_variance() {
        assert!(t_test(&[1.0, 1.0], &[2.0, 2.0], &TTestOptions::default()).is_err());
    }

    #[test]
    fn test_levene_median() {
        let groups = vec![G1.to_vec(), G2.to_vec()];
        let result = levene(&groups, LeveneCenter::Median).unwrap();

        // deviations [2,1,0,1,2] and [4,2,0,2,4]: W = 3.6 / 1.75
        assert_abs_diff_eq!(result.statistic, 3.6 / 1.75, epsilon = 1e-12);
        assert_abs_diff_eq!(result.p_value, 0.18940, epsilon = 1e-4);
        assert_eq!(result.n, 10);
    }

    #[test]
    fn test_levene_mean_matches_median_for_symmetric_data() {
        let groups = vec![G1.to_vec(), G2.to_vec()];
        let by_mean = levene(&groups, LeveneCenter::Mean).unwrap();
        let by_median = levene(&groups, LeveneCenter::Median).unwrap();
        assert_abs_diff_eq!(by_mean.statistic, by_median.statistic, epsilon = 1e-12);
    }

    #[test]
    fn test_levene_order_invariant() {
        let a = levene(&[G1.to_vec(), G2.to_vec()], LeveneCenter::Median).unwrap();
        let b = levene(&[G2.to_vec(), G1.to_vec()], LeveneCenter::Median).unwrap();
        assert_abs_diff_eq!(a.statistic, b.statistic, epsilon = 1e-12);
    }

    #[test]
    fn test_levene_requires_two_groups() {
        assert!(levene(&[G1.to_vec()], LeveneCenter::Median).is_err());
        assert!(levene(&[G1.to_vec(), vec![1.0]], LeveneCenter::Median).is_err());
    }

    #[test]
    fn test_levene_constant_deviations() {
        let groups = vec![
            vec![0.0, 0.0, 2.0, 2.0, 0.0, 2.0],
            vec![0.0, 0.0, 4.0, 4.0, 0.0, 4.0],
        ];
        let result = levene(&groups, LeveneCenter::Median).unwrap();
        assert!(result.statistic.is_infinite());
        assert_eq!(result.p_value, 0.0);

        let same = vec![vec![0.0, 2.0, 0.0, 2.0], vec![5.0, 7.0, 7.0, 5.0]];
        assert!(levene(&same, LeveneCenter::Median).is_err());
    }
}

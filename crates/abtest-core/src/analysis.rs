//! A/B hypothesis test runner
//!
//! Checks normality of each group and homogeneity of variances, then picks
//! and runs the matching comparison of the two groups.
//!
//! H0: M1 = M2 (no difference between the group means)
//! H1: M1 != M2

use std::fmt;

use tracing::{info, info_span};

use crate::data::{group_means, tag_and_combine, Column, Dataset};
use crate::tests::{
    levene, mann_whitney_u, shapiro_wilk, t_test, LeveneCenter, MannWhitneyOptions, TTestOptions,
    TestResult,
};
use crate::{AnalysisOptions, StatsError, StatsResult};

/// Outcome of comparing a p-value against the significance level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// p < alpha
    Reject,
    /// p >= alpha
    FailToReject,
}

impl Decision {
    pub fn from_p_value(p_value: f64, alpha: f64) -> Self {
        if p_value < alpha {
            Decision::Reject
        } else {
            Decision::FailToReject
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Decision::Reject => "reject H0",
            Decision::FailToReject => "fail to reject H0",
        })
    }
}

/// One assumption test and whether the assumption holds
#[derive(Debug, Clone)]
pub struct AssumptionCheck {
    pub result: TestResult,
    /// H0 of the check (normality, equal variances) is not rejected
    pub holds: bool,
}

impl AssumptionCheck {
    fn new(result: TestResult, alpha: f64) -> Self {
        let holds = Decision::from_p_value(result.p_value, alpha) == Decision::FailToReject;
        Self { result, holds }
    }
}

/// Comparison procedure chosen from the assumption checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonKind {
    /// Independent two-sample t-test with pooled variance
    StudentT,
    /// Rank-based comparison when an assumption of the t-test fails
    MannWhitneyU,
}

impl ComparisonKind {
    /// Parametric only when both groups are normal and their variances agree
    pub fn select(normal: bool, homogeneous: bool) -> Self {
        if normal && homogeneous {
            ComparisonKind::StudentT
        } else {
            ComparisonKind::MannWhitneyU
        }
    }

    pub fn is_parametric(self) -> bool {
        !matches!(self, ComparisonKind::MannWhitneyU)
    }
}

impl fmt::Display for ComparisonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComparisonKind::StudentT => "independent two-sample t-test (equal variances)",
            ComparisonKind::MannWhitneyU => "Mann-Whitney U test",
        })
    }
}

/// Everything the analysis computed, ready for reporting
#[derive(Debug, Clone)]
pub struct AbTestReport {
    pub alpha: f64,
    pub control_label: String,
    pub test_label: String,
    /// (label, mean) per group, sorted by label
    pub means: Vec<(String, f64)>,
    pub control_normality: AssumptionCheck,
    pub test_normality: AssumptionCheck,
    pub homogeneity: AssumptionCheck,
    pub comparison_kind: ComparisonKind,
    pub comparison: TestResult,
    pub decision: Decision,
}

impl AbTestReport {
    pub fn both_normal(&self) -> bool {
        self.control_normality.holds && self.test_normality.holds
    }

    pub fn significant(&self) -> bool {
        self.decision == Decision::Reject
    }

    /// Natural-language interpretation of the final comparison
    pub fn conclusion(&self) -> String {
        match self.decision {
            Decision::Reject => format!(
                "p-value {:.4} < {}: reject H0. There is a statistically significant \
                 difference between the {} and {} group means.",
                self.comparison.p_value, self.alpha, self.control_label, self.test_label
            ),
            Decision::FailToReject => format!(
                "p-value {:.4} >= {}: fail to reject H0. There is no statistically \
                 significant difference between the {} and {} group means; the observed \
                 difference can be attributed to chance.",
                self.comparison.p_value, self.alpha, self.control_label, self.test_label
            ),
        }
    }
}

/// Run the full procedure on the two metric samples
///
/// The samples are tagged and combined exactly as workbook data would be.
pub fn run_ab_test(
    control: &[f64],
    test: &[f64],
    options: &AnalysisOptions,
) -> StatsResult<AbTestReport> {
    let control = Dataset::new(
        options.control_sheet.clone(),
        vec![Column::numeric(options.metric.clone(), control)],
    )?;
    let test = Dataset::new(
        options.test_sheet.clone(),
        vec![Column::numeric(options.metric.clone(), test)],
    )?;
    let combined = tag_and_combine(&control, &test, options)?;
    analyze(&combined, options)
}

/// Run the procedure on a combined dataset, splitting rows by group label
pub fn analyze(combined: &Dataset, options: &AnalysisOptions) -> StatsResult<AbTestReport> {
    options.validate()?;
    let control =
        combined.numeric_where(&options.group_column, &options.control_label, &options.metric)?;
    let test =
        combined.numeric_where(&options.group_column, &options.test_label, &options.metric)?;

    for (label, sample) in [(&options.control_label, &control), (&options.test_label, &test)] {
        if sample.is_empty() {
            return Err(StatsError::InsufficientDataMsg(format!(
                "no {} values for group {}",
                options.metric, label
            )));
        }
    }

    let _span = info_span!("ab_test", n_control = control.len(), n_test = test.len()).entered();
    let alpha = options.alpha;

    let means = group_means(combined, &options.group_column, &options.metric)?;
    info!(?means, "group means");

    // Each group's p-value comes from its own sample
    let control_normality = AssumptionCheck::new(shapiro_wilk(&control)?, alpha);
    let test_normality = AssumptionCheck::new(shapiro_wilk(&test)?, alpha);
    info!(
        control_p = control_normality.result.p_value,
        test_p = test_normality.result.p_value,
        "normality checked"
    );

    let homogeneity = AssumptionCheck::new(
        levene(&[test.clone(), control.clone()], LeveneCenter::Median)?,
        alpha,
    );
    info!(
        p = homogeneity.result.p_value,
        holds = homogeneity.holds,
        "variance homogeneity checked"
    );

    let comparison_kind = ComparisonKind::select(
        control_normality.holds && test_normality.holds,
        homogeneity.holds,
    );
    let comparison = match comparison_kind {
        ComparisonKind::StudentT => t_test(&test, &control, &TTestOptions::default())?,
        ComparisonKind::MannWhitneyU => {
            mann_whitney_u(&test, &control, &MannWhitneyOptions::default())?
        }
    };
    let decision = Decision::from_p_value(comparison.p_value, alpha);
    info!(test = %comparison_kind, p = comparison.p_value, %decision, "groups compared");

    Ok(AbTestReport {
        alpha,
        control_label: options.control_label.clone(),
        test_label: options.test_label.clone(),
        means,
        control_normality,
        test_normality,
        homogeneity,
        comparison_kind,
        comparison,
        decision,
    })
}

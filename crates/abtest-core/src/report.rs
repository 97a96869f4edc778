//! Console rendering of the analysis results

use crate::analysis::{AbTestReport, AssumptionCheck};
use crate::describe::Table;
use crate::tests::TestResult;
use crate::DisplayOptions;

/// `Test Stat = x, p-value = y` at the given precision
pub fn format_test_line(result: &TestResult, precision: usize) -> String {
    format!(
        "Test Stat = {:.p$}, p-value = {:.p$}",
        result.statistic,
        result.p_value,
        p = precision
    )
}

pub fn hypotheses() -> &'static str {
    "H0: M1 = M2 (there is no difference between the group means)\n\
     H1: M1 != M2 (there is a difference between the group means)\n"
}

/// Group means as a one-column table
pub fn means_table(report: &AbTestReport, metric: &str, precision: usize) -> Table {
    let mut table = Table::new(vec![metric.to_string()]);
    for (label, mean) in &report.means {
        table.push_row(label.clone(), vec![format!("{mean:.precision$}")]);
    }
    table
}

fn interpret(check: &AssumptionCheck, alpha: f64, assumption: &str) -> String {
    if check.holds {
        format!(
            "p-value >= {alpha}: H0 cannot be rejected, the {assumption} assumption is provided."
        )
    } else {
        format!("p-value < {alpha}: H0 is rejected, the {assumption} assumption is not provided.")
    }
}

fn selection_reason(report: &AbTestReport) -> &'static str {
    if report.comparison_kind.is_parametric() {
        "Both assumptions are satisfied, so the parametric test is applied."
    } else if report.both_normal() {
        "Variances are not homogeneous, so the non-parametric test is applied."
    } else {
        "Normality is not provided, so the non-parametric test is applied."
    }
}

fn recommendation(report: &AbTestReport) -> String {
    if report.significant() {
        let (higher, _) = report
            .means
            .iter()
            .fold((String::new(), f64::NEG_INFINITY), |acc, (label, mean)| {
                if *mean > acc.1 {
                    (label.clone(), *mean)
                } else {
                    acc
                }
            });
        format!("Recommendation: the {higher} group performs better; prefer its method.")
    } else {
        "Recommendation: no method outperforms the other; either can be used.".to_string()
    }
}

/// Full hypothesis testing section
pub fn render_report(report: &AbTestReport, metric: &str, options: &DisplayOptions) -> String {
    let p = options.precision;
    let mut out = String::new();

    out.push_str("*************** Hypotheses ***************\n");
    out.push_str(hypotheses());

    out.push_str(&format!("*************** Mean {metric} by Group ***************\n"));
    out.push_str(&means_table(report, metric, p).render(options.max_rows, options.max_columns));

    out.push_str("*************** Normality Assumption (Shapiro-Wilk) ***************\n");
    for (label, check) in [
        (&report.control_label, &report.control_normality),
        (&report.test_label, &report.test_normality),
    ] {
        out.push_str(&format!(
            "{label}: {}\n  {}\n",
            format_test_line(&check.result, p),
            interpret(check, report.alpha, "normality")
        ));
    }

    out.push_str("*************** Variance Homogeneity (Levene) ***************\n");
    out.push_str(&format!(
        "{}\n  {}\n",
        format_test_line(&report.homogeneity.result, p),
        interpret(&report.homogeneity, report.alpha, "variance homogeneity")
    ));

    out.push_str("*************** Hypothesis Test ***************\n");
    out.push_str(&format!(
        "Selected: {}\n  {}\n",
        report.comparison_kind,
        selection_reason(report)
    ));
    out.push_str(&format_test_line(&report.comparison, p));
    out.push('\n');

    out.push_str("*************** Conclusion ***************\n");
    out.push_str(&report.conclusion());
    out.push('\n');
    out.push_str(&recommendation(report));
    out.push('\n');
    out
}

//! abtest-core: two-group A/B test analysis
//!
//! Loads control and test group records from a workbook, reports
//! descriptive statistics, checks the assumptions of the parametric
//! comparison (Shapiro-Wilk normality, Levene homogeneity) and compares
//! the group means with the appropriate two-sample test.

pub mod analysis;
pub mod data;
pub mod describe;
pub mod errors;
pub mod report;
pub mod tests;
pub mod types;

pub use analysis::{analyze, run_ab_test, AbTestReport, AssumptionCheck, ComparisonKind, Decision};
pub use data::{Cell, Column, Dataset};
pub use errors::{StatsError, StatsResult};
pub use types::*;

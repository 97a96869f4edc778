use crate::errors::{StatsError, StatsResult};

/// Options for the A/B analysis pipeline
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Sheet holding the control group records
    pub control_sheet: String,
    /// Sheet holding the test group records
    pub test_sheet: String,
    /// Numeric column compared between the groups
    pub metric: String,
    /// Name of the label column added when combining the groups
    pub group_column: String,
    /// Label assigned to control rows
    pub control_label: String,
    /// Label assigned to test rows
    pub test_label: String,
    /// Significance level shared by every decision (default: 0.05)
    pub alpha: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            control_sheet: "Control Group".into(),
            test_sheet: "Test Group".into(),
            metric: "Purchase".into(),
            group_column: "group".into(),
            control_label: "control".into(),
            test_label: "test".into(),
            alpha: 0.05,
        }
    }
}

impl AnalysisOptions {
    pub fn validate(&self) -> StatsResult<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(StatsError::InvalidValue {
                field: "alpha",
                value: self.alpha,
                reason: "must be in (0, 1)",
            });
        }
        if self.control_label == self.test_label {
            return Err(StatsError::InvalidInput(format!(
                "group labels must differ (both are {:?})",
                self.control_label
            )));
        }
        Ok(())
    }
}

/// Console rendering options
///
/// Purely cosmetic: nothing here changes a computed value.
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    /// Rows shown by the head/tail samples (default: 5)
    pub head_rows: usize,
    /// Tables longer than this elide their middle rows (default: 50)
    pub max_rows: usize,
    /// Tables wider than this elide their middle columns (default: 20)
    pub max_columns: usize,
    /// Decimal places for floats and test results (default: 3)
    pub precision: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            head_rows: 5,
            max_rows: 50,
            max_columns: 20,
            precision: 3,
        }
    }
}

impl DisplayOptions {
    pub fn validate(&self) -> StatsResult<()> {
        if self.precision > 12 {
            return Err(StatsError::InvalidValue {
                field: "precision",
                value: self.precision as f64,
                reason: "must be at most 12",
            });
        }
        if self.max_rows < 2 || self.max_columns < 2 {
            return Err(StatsError::InvalidInput(
                "max_rows and max_columns must be at least 2".into(),
            ));
        }
        Ok(())
    }
}

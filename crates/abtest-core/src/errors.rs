use thiserror::Error;

/// Errors that can occur while loading data or running statistical tests
#[derive(Error, Debug)]
pub enum StatsError {
    // Input loading errors
    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Sheet not found: {sheet}")]
    SheetNotFound { sheet: String },

    #[error("Sheet {sheet} is empty (no header row)")]
    EmptySheet { sheet: String },

    #[error("Column not found: {column} (dataset {dataset})")]
    MissingColumn { column: String, dataset: String },

    #[error("Non-numeric value {value:?} in column {column} at row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    // Input validation errors
    #[error("Insufficient data: {0}")]
    InsufficientDataMsg(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid {field}: {value} ({reason})")]
    InvalidValue {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    // Numerical errors
    #[error("Distribution error: {0}")]
    Distribution(String),
}

/// Result type for statistical operations
pub type StatsResult<T> = Result<T, StatsError>;

//! abtest - A/B test analysis of a control/test group workbook
//!
//! Usage:
//!   abtest ab_testing.xlsx                       # Default sheets and metric
//!   abtest data.xlsx --metric Earning --alpha 0.01
//!   RUST_LOG=abtest_core=debug abtest data.xlsx  # Trace every test

use std::path::PathBuf;

use abtest_core::data::{load_groups, tag_and_combine};
use abtest_core::describe::{check_dataset, head, tail};
use abtest_core::report::render_report;
use abtest_core::{analyze, AnalysisOptions, DisplayOptions};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "abtest")]
#[command(about = "Compare control and test group means with assumption-checked hypothesis tests")]
#[command(version)]
struct Cli {
    /// Workbook holding one sheet per group (.xlsx, .xls, .ods)
    workbook: PathBuf,

    /// Sheet with the control group records
    #[arg(long, default_value = "Control Group")]
    control_sheet: String,

    /// Sheet with the test group records
    #[arg(long, default_value = "Test Group")]
    test_sheet: String,

    /// Numeric column compared between the groups
    #[arg(long, default_value = "Purchase")]
    metric: String,

    /// Significance level
    #[arg(long, default_value_t = 0.05)]
    alpha: f64,

    /// Rows shown in the head/tail samples
    #[arg(long, default_value_t = 5)]
    rows: usize,

    /// Decimal places for floats and test results
    #[arg(long, default_value_t = 3)]
    precision: usize,

    /// Longest table printed before rows are elided
    #[arg(long, default_value_t = 50)]
    max_rows: usize,

    /// Widest table printed before columns are elided
    #[arg(long, default_value_t = 20)]
    max_columns: usize,

    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            control_sheet: self.control_sheet.clone(),
            test_sheet: self.test_sheet.clone(),
            metric: self.metric.clone(),
            alpha: self.alpha,
            ..Default::default()
        }
    }

    fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            head_rows: self.rows,
            max_rows: self.max_rows,
            max_columns: self.max_columns,
            precision: self.precision,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let analysis = cli.analysis_options();
    let display = cli.display_options();
    analysis.validate()?;
    display.validate()?;

    let (control, test) = load_groups(&cli.workbook, &analysis)
        .with_context(|| format!("Failed to load groups from {}", cli.workbook.display()))?;

    for dataset in [&control, &test] {
        println!("=============== {} ===============", dataset.name);
        print!("{}", check_dataset(dataset, &display));
        println!();
    }

    let combined = tag_and_combine(&control, &test, &analysis)?;
    println!("=============== Combined Dataset ===============");
    print!(
        "{}",
        head(&combined, display.head_rows, display.precision)
            .render(display.max_rows, display.max_columns)
    );
    print!(
        "{}",
        tail(&combined, display.head_rows, display.precision)
            .render(display.max_rows, display.max_columns)
    );
    println!("[{} rows x {} columns]", combined.n_rows(), combined.n_cols());
    println!();

    let report = analyze(&combined, &analysis).context("Hypothesis testing failed")?;
    print!("{}", render_report(&report, &analysis.metric, &display));

    info!(
        test = %report.comparison_kind,
        p_value = report.comparison.p_value,
        decision = %report.decision,
        "analysis complete"
    );
    Ok(())
}

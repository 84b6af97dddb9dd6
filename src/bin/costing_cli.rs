//! Costing CLI
//!
//! Commands: products, cost, variance, report, audit
//! Outputs JSON to stdout, logs to stderr
//! Returns non-zero when the data snapshot cannot be loaded

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use costing_core::{
    format_amount, format_percent, load_tables, CostReport, CostingConfig, CostingPipeline,
    VarianceAnalyzer,
};

#[derive(Parser)]
#[command(name = "costing-cli")]
#[command(about = "Costing CLI - standard cost and variance for BOM products")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding bom.csv, materials_prices.csv, labor_costs.csv, actual_costs.csv
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Currency label used in text output
    #[arg(long, global = true)]
    currency: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List products found in the BOM
    Products,

    /// Standard cost of one product
    Cost {
        #[arg(short, long)]
        product: String,
    },

    /// Compare an actual cost against a standard cost
    Variance {
        #[arg(short, long, allow_negative_numbers = true)]
        actual: f64,

        #[arg(short, long, allow_negative_numbers = true)]
        standard: f64,
    },

    /// Full cost report (all products when --product is omitted)
    Report {
        #[arg(short, long)]
        product: Option<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Data-quality findings for one product
    Audit {
        #[arg(short, long)]
        product: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = CostingConfig::default();
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(currency) = cli.currency {
        config.currency = currency;
    }

    // Variance needs no tables
    if let Commands::Variance { actual, standard } = cli.command {
        let result = VarianceAnalyzer::new().analyze(actual, standard);
        return emit(&result);
    }

    let tables = match load_tables(&config) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "failed to load costing data");
            return emit_error(&format!("Failed to load costing data: {}", e));
        }
    };

    let pipeline = CostingPipeline::new(tables);

    match cli.command {
        Commands::Products => emit(&pipeline.list_products()),

        Commands::Cost { product } => emit(&serde_json::json!({
            "product_id": product,
            "standard_cost": pipeline.calculate_cost(&product),
        })),

        Commands::Report { product, format } => {
            let reports = match product {
                Some(id) => pipeline.evaluate(&id).map(|r| vec![r]),
                None => pipeline.evaluate_all(),
            };
            let reports = match reports {
                Ok(r) => r,
                Err(e) => return emit_error(&e.to_string()),
            };

            match format {
                OutputFormat::Json => emit(&reports),
                OutputFormat::Text => {
                    for report in &reports {
                        print_summary(report, &config.currency);
                    }
                    ExitCode::SUCCESS
                }
            }
        }

        Commands::Audit { product } => emit(&pipeline.audit(&product)),

        Commands::Variance { .. } => unreachable!("handled before loading tables"),
    }
}

fn print_summary(report: &CostReport, currency: &str) {
    println!("Product:       {}", report.product_id);
    println!("Standard cost: {}", format_amount(report.standard_cost, currency));
    println!("Actual cost:   {}", format_amount(report.actual_cost, currency));
    println!(
        "Difference:    {} ({})",
        format_amount(report.variance.difference, currency),
        format_percent(report.variance.percent)
    );
    for finding in &report.findings {
        println!("  [{}] {}", finding.rule, finding.message);
    }
    println!();
}

fn emit<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => emit_error(&format!("Serialization error: {}", e)),
    }
}

fn emit_error(message: &str) -> ExitCode {
    println!("{}", serde_json::json!({ "error": message }));
    ExitCode::FAILURE
}

//! Costing Core - Standard Cost & Variance Engine
//!
//! # Ground Rules
//! 1. Tables Are Snapshots (loaded once, never mutated by a calculation)
//! 2. Missing Reference Data Costs Zero
//! 3. Zero Standard Cost Means Zero Percent
//! 4. Rounding Belongs To Presentation
//! 5. Audits Explain Zeros, They Never Change Them

pub mod tables;
pub mod calculator;
pub mod variance;
pub mod audit;
pub mod hashing;
pub mod config;
pub mod loader;
pub mod format;
pub mod pipeline;

pub use tables::{AmountTable, BomLine, CostTables, MaterialName, ProductId};
pub use calculator::{CostBreakdown, CostCalculator, LineCost};
pub use variance::{VarianceAnalyzer, VarianceResult};
pub use audit::{AuditFinding, AuditRule, DataAuditor, FindingSeverity};
pub use hashing::{canonical_json, compute_snapshot_hash};
pub use config::CostingConfig;
pub use loader::{load_tables, LoadError};
pub use format::{format_amount, format_percent};
pub use pipeline::{CostReport, CostingPipeline, ExportRecord, PipelineError};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

//! Costing Pipeline - Single Entry Point
//!
//! evaluate() = calculate -> look up actual -> analyze -> audit.
//! Every report carries its audit findings. No bypass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::audit::{AuditFinding, DataAuditor};
use crate::calculator::{CostBreakdown, CostCalculator};
use crate::hashing::compute_snapshot_hash;
use crate::tables::CostTables;
use crate::variance::{VarianceAnalyzer, VarianceResult};
use crate::ENGINE_VERSION;

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static AUDIT_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_audit_call_count() -> u32 {
    AUDIT_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_audit_call_count() {
    AUDIT_CALL_COUNT.store(0, Ordering::SeqCst);
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Flat record handed to exporters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub product_id: String,
    pub standard_cost: f64,
    pub actual_cost: f64,
    pub difference: f64,
    pub percent_diff: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostReport {
    pub id: String,
    pub product_id: String,
    pub engine_version: String,
    pub generated_at: DateTime<Utc>,
    pub snapshot_hash: String,
    pub breakdown: CostBreakdown,
    pub standard_cost: f64,
    pub actual_cost: f64,
    pub variance: VarianceResult,
    pub findings: Vec<AuditFinding>,
}

impl CostReport {
    pub fn export_record(&self) -> ExportRecord {
        ExportRecord {
            product_id: self.product_id.clone(),
            standard_cost: self.standard_cost,
            actual_cost: self.actual_cost,
            difference: self.variance.difference,
            percent_diff: self.variance.percent,
        }
    }
}

/// Owns one snapshot; every call sees the same tables
pub struct CostingPipeline {
    tables: CostTables,
    analyzer: VarianceAnalyzer,
    auditor: DataAuditor,
}

impl CostingPipeline {
    pub fn new(tables: CostTables) -> Self {
        Self {
            tables,
            analyzer: VarianceAnalyzer::new(),
            auditor: DataAuditor::new(),
        }
    }

    pub fn tables(&self) -> &CostTables {
        &self.tables
    }

    /// Products available for lookup, in BOM order
    pub fn list_products(&self) -> Vec<&str> {
        self.tables.products()
    }

    pub fn calculate_cost(&self, product_id: &str) -> f64 {
        CostCalculator::new(&self.tables).calculate_cost(product_id)
    }

    pub fn analyze(&self, actual_cost: f64, standard_cost: f64) -> VarianceResult {
        self.analyzer.analyze(actual_cost, standard_cost)
    }

    pub fn audit(&self, product_id: &str) -> Vec<AuditFinding> {
        #[cfg(feature = "test-hooks")]
        AUDIT_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        self.auditor.audit(&self.tables, product_id)
    }

    /// Full costing run for one product
    pub fn evaluate(&self, product_id: &str) -> Result<CostReport, PipelineError> {
        let breakdown = CostCalculator::new(&self.tables).breakdown(product_id);
        let standard_cost = breakdown.total();
        let actual_cost = self.tables.actual_cost(product_id);
        let variance = self.analyze(actual_cost, standard_cost);

        // MANDATORY: zero costs must ship with the findings that explain them
        let findings = self.audit(product_id);

        let snapshot_hash = compute_snapshot_hash(&self.tables)?;
        debug!(product_id, %snapshot_hash, "snapshot fingerprinted");

        info!(
            product_id,
            standard_cost,
            actual_cost,
            difference = variance.difference,
            percent = variance.percent,
            findings = findings.len(),
            "evaluated product cost"
        );

        Ok(CostReport {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            engine_version: ENGINE_VERSION.to_string(),
            generated_at: Utc::now(),
            snapshot_hash,
            breakdown,
            standard_cost,
            actual_cost,
            variance,
            findings,
        })
    }

    /// Reports for every product in the BOM
    pub fn evaluate_all(&self) -> Result<Vec<CostReport>, PipelineError> {
        self.list_products()
            .into_iter()
            .map(|id| self.evaluate(id))
            .collect()
    }
}

impl Default for CostingPipeline {
    fn default() -> Self {
        Self::new(CostTables::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{AmountTable, BomLine};

    fn pipeline() -> CostingPipeline {
        CostingPipeline::new(CostTables::new(
            vec![
                BomLine::new("P1", "wood", 2.0),
                BomLine::new("P1", "glue", 1.0),
                BomLine::new("P2", "wood", 1.0),
            ],
            [("wood", 100.0), ("glue", 50.0)].into_iter().collect(),
            [("P1", 30.0)].into_iter().collect(),
            [("P1", 300.0)].into_iter().collect::<AmountTable>(),
        ))
    }

    #[test]
    fn test_evaluate_export_record() {
        let report = pipeline().evaluate("P1").unwrap();
        let record = report.export_record();
        assert_eq!(record.product_id, "P1");
        assert_eq!(record.standard_cost, 280.0);
        assert_eq!(record.actual_cost, 300.0);
        assert_eq!(record.difference, 20.0);
        assert_eq!(record.percent_diff, 20.0 / 280.0 * 100.0);
    }

    #[test]
    fn test_missing_actual_defaults_to_zero() {
        let report = pipeline().evaluate("P2").unwrap();
        assert_eq!(report.standard_cost, 100.0);
        assert_eq!(report.actual_cost, 0.0);
        assert_eq!(report.variance.difference, -100.0);
        assert_eq!(report.variance.percent, -100.0);
        assert!(report.findings.iter().any(|f| f.rule == "missing_actual_cost"));
    }

    #[test]
    fn test_evaluate_all_in_bom_order() {
        let reports = pipeline().evaluate_all().unwrap();
        let ids: Vec<_> = reports.iter().map(|r| r.product_id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P2"]);
    }

    #[test]
    fn test_snapshot_hash_shared_across_reports() {
        let p = pipeline();
        let a = p.evaluate("P1").unwrap();
        let b = p.evaluate("P2").unwrap();
        assert_eq!(a.snapshot_hash, b.snapshot_hash);
        assert_ne!(a.id, b.id);
    }
}

//! Data Audit - Rule/Policy Separation
//!
//! The calculator costs missing reference data at zero. Audit rules report
//! where that happened so a zero can be told apart from "no data".
//! Findings never change a computed cost.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::tables::CostTables;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FindingSeverity {
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditFinding {
    pub rule: String,
    pub severity: FindingSeverity,
    pub product_id: String,
    pub message: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub remediation: Vec<String>,
}

/// Audit rule trait - produces findings for one product
pub trait AuditRule {
    fn name(&self) -> &'static str;
    fn check(&self, tables: &CostTables, product_id: &str) -> Vec<AuditFinding>;
}

// --- Concrete Rules ---

pub struct MissingMaterialPriceRule;

impl AuditRule for MissingMaterialPriceRule {
    fn name(&self) -> &'static str { "missing_material_price" }

    fn check(&self, tables: &CostTables, product_id: &str) -> Vec<AuditFinding> {
        let mut findings: Vec<AuditFinding> = vec![];
        for line in tables.lines_for(product_id) {
            if tables.material_prices.contains(&line.material) {
                continue;
            }
            // One finding per material even if it appears on several lines
            if findings.iter().any(|f| f.subject.as_deref() == Some(line.material.as_str())) {
                continue;
            }
            findings.push(AuditFinding {
                rule: self.name().to_string(),
                severity: FindingSeverity::Warning,
                product_id: product_id.to_string(),
                message: format!("Material '{}' has no price and was costed at 0", line.material),
                subject: Some(line.material.clone()),
                remediation: vec![
                    "Add a price for the material".to_string(),
                    "Check the BOM for a misspelled material name".to_string(),
                ],
            });
        }
        findings
    }
}

pub struct MissingLaborCostRule;

impl AuditRule for MissingLaborCostRule {
    fn name(&self) -> &'static str { "missing_labor_cost" }

    fn check(&self, tables: &CostTables, product_id: &str) -> Vec<AuditFinding> {
        if tables.labor_costs.contains(product_id) {
            return vec![];
        }
        vec![AuditFinding {
            rule: self.name().to_string(),
            severity: FindingSeverity::Warning,
            product_id: product_id.to_string(),
            message: "No labor cost recorded; labor costed at 0".to_string(),
            subject: None,
            remediation: vec!["Add a labor cost entry for the product".to_string()],
        }]
    }
}

pub struct MissingActualCostRule;

impl AuditRule for MissingActualCostRule {
    fn name(&self) -> &'static str { "missing_actual_cost" }

    fn check(&self, tables: &CostTables, product_id: &str) -> Vec<AuditFinding> {
        if tables.actual_costs.contains(product_id) {
            return vec![];
        }
        vec![AuditFinding {
            rule: self.name().to_string(),
            severity: FindingSeverity::Info,
            product_id: product_id.to_string(),
            message: "No actual cost recorded; variance compares against 0".to_string(),
            subject: None,
            remediation: vec!["Record the actual cost once production closes".to_string()],
        }]
    }
}

pub struct EmptyBomRule;

impl AuditRule for EmptyBomRule {
    fn name(&self) -> &'static str { "empty_bom" }

    fn check(&self, tables: &CostTables, product_id: &str) -> Vec<AuditFinding> {
        if tables.lines_for(product_id).next().is_some() {
            return vec![];
        }
        vec![AuditFinding {
            rule: self.name().to_string(),
            severity: FindingSeverity::Warning,
            product_id: product_id.to_string(),
            message: "Product has no BOM lines; material cost is 0".to_string(),
            subject: None,
            remediation: vec!["Add BOM lines for the product".to_string()],
        }]
    }
}

/// Runs every rule over a product
pub struct DataAuditor {
    rules: Vec<Box<dyn AuditRule>>,
}

impl DataAuditor {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(EmptyBomRule),
                Box::new(MissingMaterialPriceRule),
                Box::new(MissingLaborCostRule),
                Box::new(MissingActualCostRule),
            ],
        }
    }

    pub fn with_rules(rules: Vec<Box<dyn AuditRule>>) -> Self {
        Self { rules }
    }

    pub fn audit(&self, tables: &CostTables, product_id: &str) -> Vec<AuditFinding> {
        let mut findings = vec![];
        for rule in &self.rules {
            findings.extend(rule.check(tables, product_id));
        }

        for finding in findings.iter().filter(|f| f.severity == FindingSeverity::Warning) {
            warn!(product_id, rule = %finding.rule, "{}", finding.message);
        }
        findings
    }
}

impl Default for DataAuditor {
    fn default() -> Self {
        Self::new()
    }
}

//! Cost Calculator - Standard Cost from BOM
//!
//! standard_cost = sum(quantity * price(material)) + labor(product)
//! Missing prices and missing labor costs resolve to zero.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::tables::CostTables;

/// Cost contribution of a single BOM line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineCost {
    pub material: String,
    pub quantity: f64,
    pub unit_price: f64,
    /// `false` when the material had no price and was costed at zero
    pub priced: bool,
    pub cost: f64,
}

/// Material and labor split of a standard cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub product_id: String,
    pub lines: Vec<LineCost>,
    pub material_cost: f64,
    pub labor_cost: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.material_cost + self.labor_cost
    }
}

/// Computes standard cost against a borrowed snapshot
pub struct CostCalculator<'a> {
    tables: &'a CostTables,
}

impl<'a> CostCalculator<'a> {
    pub fn new(tables: &'a CostTables) -> Self {
        Self { tables }
    }

    /// Standard cost for one product. Never fails.
    pub fn calculate_cost(&self, product_id: &str) -> f64 {
        let material_cost: f64 = self
            .tables
            .lines_for(product_id)
            .map(|line| line.quantity * self.tables.material_price(&line.material))
            .sum();
        let labor_cost = self.tables.labor_cost(product_id);

        trace!(product_id, material_cost, labor_cost, "calculated standard cost");
        material_cost + labor_cost
    }

    /// Same total as `calculate_cost`, itemised per BOM line
    pub fn breakdown(&self, product_id: &str) -> CostBreakdown {
        let lines: Vec<LineCost> = self
            .tables
            .lines_for(product_id)
            .map(|line| {
                let price = self.tables.material_prices.get(&line.material);
                let unit_price = price.unwrap_or(0.0);
                LineCost {
                    material: line.material.clone(),
                    quantity: line.quantity,
                    unit_price,
                    priced: price.is_some(),
                    cost: line.quantity * unit_price,
                }
            })
            .collect();

        CostBreakdown {
            product_id: product_id.to_string(),
            material_cost: lines.iter().map(|l| l.cost).sum(),
            labor_cost: self.tables.labor_cost(product_id),
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{AmountTable, BomLine};

    fn sample_tables() -> CostTables {
        CostTables::new(
            vec![
                BomLine::new("P1", "wood", 2.0),
                BomLine::new("P1", "glue", 1.0),
                BomLine::new("P3", "varnish", 0.5),
            ],
            [("wood", 100.0), ("glue", 50.0)].into_iter().collect(),
            [("P1", 30.0), ("P4", 15.0)].into_iter().collect(),
            AmountTable::new(),
        )
    }

    #[test]
    fn test_material_plus_labor() {
        let tables = sample_tables();
        let calc = CostCalculator::new(&tables);
        assert_eq!(calc.calculate_cost("P1"), 280.0);
    }

    #[test]
    fn test_unknown_product_is_zero() {
        let tables = sample_tables();
        assert_eq!(CostCalculator::new(&tables).calculate_cost("P2"), 0.0);
    }

    #[test]
    fn test_product_without_bom_costs_labor_only() {
        let tables = sample_tables();
        assert_eq!(CostCalculator::new(&tables).calculate_cost("P4"), 15.0);
    }

    #[test]
    fn test_unpriced_material_contributes_zero() {
        let tables = sample_tables();
        let calc = CostCalculator::new(&tables);
        assert_eq!(calc.calculate_cost("P3"), 0.0);

        let breakdown = calc.breakdown("P3");
        assert_eq!(breakdown.lines.len(), 1);
        assert!(!breakdown.lines[0].priced);
        assert_eq!(breakdown.lines[0].cost, 0.0);
    }

    #[test]
    fn test_fractional_quantities() {
        let tables = CostTables::new(
            vec![BomLine::new("T", "oak", 1.5), BomLine::new("T", "oak", 0.25)],
            [("oak", 200.0)].into_iter().collect(),
            AmountTable::new(),
            AmountTable::new(),
        );
        assert_eq!(CostCalculator::new(&tables).calculate_cost("T"), 350.0);
    }

    #[test]
    fn test_breakdown_matches_total() {
        let tables = sample_tables();
        let calc = CostCalculator::new(&tables);
        let breakdown = calc.breakdown("P1");
        assert_eq!(breakdown.material_cost, 250.0);
        assert_eq!(breakdown.labor_cost, 30.0);
        assert_eq!(breakdown.total(), calc.calculate_cost("P1"));
    }
}

//! Cost Tables - Immutable Input Snapshot
//!
//! Every keyed lookup goes through a get-or-default accessor. A missing key
//! costs zero; it never errors.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub type ProductId = String;
pub type MaterialName = String;

/// One row of the bill of materials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomLine {
    pub product_id: ProductId,
    pub material: MaterialName,
    pub quantity: f64,
}

impl BomLine {
    pub fn new(product_id: impl Into<String>, material: impl Into<String>, quantity: f64) -> Self {
        Self {
            product_id: product_id.into(),
            material: material.into(),
            quantity,
        }
    }
}

/// Keyed table of non-negative amounts (prices, labor, actuals)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmountTable {
    entries: BTreeMap<String, f64>,
}

impl AmountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later inserts for the same key replace earlier ones.
    pub fn insert(&mut self, key: impl Into<String>, amount: f64) {
        self.entries.insert(key.into(), amount);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.get(key).copied()
    }

    pub fn get_or_zero(&self, key: &str) -> f64 {
        self.get(key).unwrap_or(0.0)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for AmountTable {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (key, amount) in iter {
            table.insert(key, amount);
        }
        table
    }
}

/// Snapshot of all costing inputs for one calculation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostTables {
    pub bom: Vec<BomLine>,
    pub material_prices: AmountTable,
    pub labor_costs: AmountTable,
    pub actual_costs: AmountTable,
}

impl CostTables {
    pub fn new(
        bom: Vec<BomLine>,
        material_prices: AmountTable,
        labor_costs: AmountTable,
        actual_costs: AmountTable,
    ) -> Self {
        Self { bom, material_prices, labor_costs, actual_costs }
    }

    /// BOM lines for a product, in file order
    pub fn lines_for<'a>(&'a self, product_id: &'a str) -> impl Iterator<Item = &'a BomLine> + 'a {
        self.bom.iter().filter(move |line| line.product_id == product_id)
    }

    /// Distinct product ids in order of first appearance in the BOM
    pub fn products(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.bom
            .iter()
            .map(|line| line.product_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn material_price(&self, material: &str) -> f64 {
        self.material_prices.get_or_zero(material)
    }

    pub fn labor_cost(&self, product_id: &str) -> f64 {
        self.labor_costs.get_or_zero(product_id)
    }

    pub fn actual_cost(&self, product_id: &str) -> f64 {
        self.actual_costs.get_or_zero(product_id)
    }
}

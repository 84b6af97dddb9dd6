use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostingConfig {
    pub data_dir: PathBuf,
    pub bom_file: String,
    pub prices_file: String,
    pub labor_file: String,
    pub actual_file: String,
    pub currency: String,
}

impl CostingConfig {
    pub fn bom_path(&self) -> PathBuf {
        self.data_dir.join(&self.bom_file)
    }

    pub fn prices_path(&self) -> PathBuf {
        self.data_dir.join(&self.prices_file)
    }

    pub fn labor_path(&self) -> PathBuf {
        self.data_dir.join(&self.labor_file)
    }

    pub fn actual_path(&self) -> PathBuf {
        self.data_dir.join(&self.actual_file)
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }
}

impl Default for CostingConfig {
    fn default() -> Self {
        Self {
            data_dir: std::env::var("COSTING_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            bom_file: "bom.csv".to_string(),
            prices_file: "materials_prices.csv".to_string(),
            labor_file: "labor_costs.csv".to_string(),
            actual_file: "actual_costs.csv".to_string(),
            currency: std::env::var("COSTING_CURRENCY").unwrap_or_else(|_| "VND".to_string()),
        }
    }
}

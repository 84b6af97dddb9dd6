//! Snapshot Loader - CSV tables into an immutable `CostTables`
//!
//! Loading is explicit and happens before any calculation. Callers reload
//! when the underlying files change; nothing here caches.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::CostingConfig;
use crate::tables::{AmountTable, BomLine, CostTables};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    material: String,
    price: f64,
}

#[derive(Debug, Deserialize)]
struct LaborRow {
    product_id: String,
    labor_cost: f64,
}

#[derive(Debug, Deserialize)]
struct ActualRow {
    product_id: String,
    actual_cost: f64,
}

/// Load all four tables named by the config
pub fn load_tables(config: &CostingConfig) -> Result<CostTables, LoadError> {
    let bom: Vec<BomLine> = read_rows(&config.bom_path(), &["product_id", "material", "quantity"])?;

    let material_prices: AmountTable =
        read_rows::<PriceRow>(&config.prices_path(), &["material", "price"])?
            .into_iter()
            .map(|r| (r.material, r.price))
            .collect();

    let labor_costs: AmountTable =
        read_rows::<LaborRow>(&config.labor_path(), &["product_id", "labor_cost"])?
            .into_iter()
            .map(|r| (r.product_id, r.labor_cost))
            .collect();

    let actual_costs: AmountTable =
        read_rows::<ActualRow>(&config.actual_path(), &["product_id", "actual_cost"])?
            .into_iter()
            .map(|r| (r.product_id, r.actual_cost))
            .collect();

    info!(
        data_dir = %config.data_dir.display(),
        bom_lines = bom.len(),
        materials = material_prices.len(),
        labor_entries = labor_costs.len(),
        actual_entries = actual_costs.len(),
        "loaded costing snapshot"
    );

    Ok(CostTables::new(bom, material_prices, labor_costs, actual_costs))
}

fn read_rows<T: DeserializeOwned>(path: &Path, required: &[&str]) -> Result<Vec<T>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_err = |source| LoadError::Csv { path: path.to_path_buf(), source };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers().map_err(csv_err)?.clone();
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(LoadError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            });
        }
    }

    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(csv_err)?;

    debug!(path = %path.display(), rows = rows.len(), "read table");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_dataset(dir: &Path) {
        fs::write(
            dir.join("bom.csv"),
            "product_id,material,quantity\nP1,wood,2\nP1,glue,1\nP2,wood,0.5\n",
        )
        .unwrap();
        fs::write(
            dir.join("materials_prices.csv"),
            "material,price\nwood,90\nglue,50\nwood,100\n",
        )
        .unwrap();
        fs::write(dir.join("labor_costs.csv"), "product_id,labor_cost\nP1,30\n").unwrap();
        fs::write(dir.join("actual_costs.csv"), "product_id,actual_cost\nP1,300\n").unwrap();
    }

    fn config_for(dir: &TempDir) -> CostingConfig {
        CostingConfig::default().with_data_dir(dir.path())
    }

    #[test]
    fn test_load_full_dataset() {
        let dir = TempDir::new().unwrap();
        write_dataset(dir.path());

        let tables = load_tables(&config_for(&dir)).unwrap();
        assert_eq!(tables.bom.len(), 3);
        assert_eq!(tables.bom[2], BomLine::new("P2", "wood", 0.5));
        assert_eq!(tables.labor_cost("P1"), 30.0);
        assert_eq!(tables.actual_cost("P1"), 300.0);
    }

    #[test]
    fn test_duplicate_price_last_row_wins() {
        let dir = TempDir::new().unwrap();
        write_dataset(dir.path());

        let tables = load_tables(&config_for(&dir)).unwrap();
        assert_eq!(tables.material_price("wood"), 100.0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        write_dataset(dir.path());
        fs::remove_file(dir.path().join("labor_costs.csv")).unwrap();

        let err = load_tables(&config_for(&dir)).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("labor_costs.csv"));
    }

    #[test]
    fn test_non_numeric_quantity_is_csv_error() {
        let dir = TempDir::new().unwrap();
        write_dataset(dir.path());
        fs::write(dir.path().join("bom.csv"), "product_id,material,quantity\nP1,wood,two\n").unwrap();

        let err = load_tables(&config_for(&dir)).unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }));
    }

    #[test]
    fn test_missing_column_reported() {
        let dir = TempDir::new().unwrap();
        write_dataset(dir.path());
        fs::write(dir.path().join("materials_prices.csv"), "material,cost\nwood,100\n").unwrap();

        match load_tables(&config_for(&dir)).unwrap_err() {
            LoadError::MissingColumn { column, .. } => assert_eq!(column, "price"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let dir = TempDir::new().unwrap();
        write_dataset(dir.path());
        fs::write(dir.path().join("bom.csv"), "product_id, material, quantity\nP1 , wood , 2\n").unwrap();

        let tables = load_tables(&config_for(&dir)).unwrap();
        assert_eq!(tables.bom[0], BomLine::new("P1", "wood", 2.0));
    }
}

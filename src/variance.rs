//! Variance Analyzer - Actual vs Standard

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarianceResult {
    /// actual - standard
    pub difference: f64,
    /// difference / standard * 100, or 0 when standard is 0
    pub percent: f64,
}

impl VarianceResult {
    pub fn is_overrun(&self) -> bool {
        self.difference > 0.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VarianceAnalyzer;

impl VarianceAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Unrounded; presentation rounds for display.
    pub fn analyze(&self, actual_cost: f64, standard_cost: f64) -> VarianceResult {
        let difference = actual_cost - standard_cost;
        let percent = if standard_cost != 0.0 {
            difference / standard_cost * 100.0
        } else {
            0.0
        };
        VarianceResult { difference, percent }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrun() {
        let v = VarianceAnalyzer::new().analyze(300.0, 280.0);
        assert_eq!(v.difference, 20.0);
        assert!((v.percent - 7.142857142857143).abs() < 1e-12);
        assert!(v.is_overrun());
    }

    #[test]
    fn test_zero_standard_gives_zero_percent() {
        let v = VarianceAnalyzer::new().analyze(50.0, 0.0);
        assert_eq!(v.difference, 50.0);
        assert_eq!(v.percent, 0.0);
    }

    #[test]
    fn test_under_budget_is_negative() {
        let v = VarianceAnalyzer::new().analyze(200.0, 250.0);
        assert_eq!(v.difference, -50.0);
        assert_eq!(v.percent, -20.0);
        assert!(!v.is_overrun());
    }

    #[test]
    fn test_negative_standard() {
        let v = VarianceAnalyzer::new().analyze(10.0, -20.0);
        assert_eq!(v.difference, 30.0);
        assert_eq!(v.percent, -150.0);
    }

    #[test]
    fn test_negative_zero_standard_is_guarded() {
        let v = VarianceAnalyzer::new().analyze(5.0, -0.0);
        assert_eq!(v.percent, 0.0);
    }
}

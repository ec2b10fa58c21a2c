//! # Result Validation
//!
//! Advisory plausibility checks for computed results against sector and
//! category expectations. Callers decide whether a `false` means rejecting
//! the result or merely flagging it for review.

use crate::calculations::tier::CalculationResult;
use crate::categories::{CategoryRegistry, Sector};
use crate::gases::GasType;

/// Sanity-check a computed result for a category.
///
/// Rejects when:
/// - the category code is not in the registry;
/// - the sector is ENERGY and the gas is outside {CO2, CH4, N2O};
/// - the category is livestock (`3.A*`) and the gas is not CH4;
/// - the emission or CO2-equivalent is negative.
pub fn validate_result(
    result: &CalculationResult,
    category_code: &str,
    categories: &CategoryRegistry,
) -> bool {
    let code = category_code.trim();
    let Some(category) = categories.lookup(code) else {
        return false;
    };

    if category.sector == Sector::Energy
        && !matches!(result.gas_type, GasType::Co2 | GasType::Ch4 | GasType::N2o)
    {
        return false;
    }

    if code.starts_with("3.A") && result.gas_type != GasType::Ch4 {
        return false;
    }

    if result.emission_kg < 0.0 || result.co2_equivalent_kg < 0.0 {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::tier::{CalculationRequest, EmissionEngine};
    use crate::gases::Tier;

    fn engine() -> EmissionEngine {
        EmissionEngine::with_defaults()
    }

    fn request(value: f64, unit: &str, code: &str, tier: Tier) -> CalculationRequest {
        CalculationRequest {
            activity_value: value,
            activity_unit: unit.to_string(),
            category_code: code.to_string(),
            tier,
            gas_type: None,
            activity_name: None,
        }
    }

    #[test]
    fn test_valid_energy_result_passes() {
        let engine = engine();
        let result = engine.calculate(&request(100.0, "GJ", "1.A.2", Tier::Tier1)).unwrap();
        assert!(validate_result(&result, "1.A.2", engine.categories()));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let engine = engine();
        let result = engine.calculate(&request(100.0, "GJ", "1.A.2", Tier::Tier1)).unwrap();
        assert!(!validate_result(&result, "7.Q.3", engine.categories()));
    }

    #[test]
    fn test_energy_sector_rejects_fluorinated_gases() {
        let engine = engine();
        let mut result = engine.calculate(&request(100.0, "GJ", "1.A.2", Tier::Tier1)).unwrap();
        result.gas_type = GasType::Sf6;
        assert!(!validate_result(&result, "1.A.2", engine.categories()));
    }

    #[test]
    fn test_livestock_requires_ch4() {
        let engine = engine();
        let result = engine.calculate(&request(10.0, "head", "3.A.1", Tier::Tier1)).unwrap();
        assert!(validate_result(&result, "3.A.1", engine.categories()));

        let mut wrong_gas = result.clone();
        wrong_gas.gas_type = GasType::N2o;
        assert!(!validate_result(&wrong_gas, "3.A.1", engine.categories()));
    }

    #[test]
    fn test_negative_values_rejected() {
        let engine = engine();
        let mut result = engine.calculate(&request(10.0, "kg", "4.A", Tier::Tier1)).unwrap();
        result.emission_kg = -1.0;
        assert!(!validate_result(&result, "4.A", engine.categories()));
    }
}

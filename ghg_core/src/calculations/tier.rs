//! # Tier Calculation Engine
//!
//! Applies the IPCC Tier 1/2/3 formula to an activity quantity: plain
//! multiplication by the selected factor, or multiplication through an
//! energy-content intermediate when the factor carries a heating value and
//! the category belongs to the energy sector.
//!
//! Each call is a single-pass pure computation: select factor, look up GWP,
//! reconcile units, multiply, and assemble an audit narrative. No state is
//! retained between invocations; concurrent callers are trivially safe.
//!
//! ## Example
//!
//! ```rust
//! use ghg_core::calculations::tier::{CalculationRequest, EmissionEngine};
//! use ghg_core::gases::Tier;
//!
//! let engine = EmissionEngine::with_defaults();
//! let request = CalculationRequest {
//!     activity_value: 1000.0,
//!     activity_unit: "GJ".to_string(),
//!     category_code: "1.A.1.a".to_string(),
//!     tier: Tier::Tier1,
//!     gas_type: None,
//!     activity_name: Some("coal power plant".to_string()),
//! };
//!
//! let result = engine.calculate(&request).unwrap();
//! assert_eq!(result.emission_kg, 94_600.0);
//! assert_eq!(result.co2_equivalent_kg, 94_600.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::categories::{infer_gas_type, CategoryRegistry, Sector};
use crate::errors::{CalcError, CalcResult};
use crate::factors::{EmissionFactor, FactorDatabase};
use crate::gases::{lookup_gwp, GasType, GwpValue, Tier};
use crate::selection::EmissionFactorSelector;
use crate::units;

/// Emissions above this value (kg) raise a non-fatal warning on the result
pub const HIGH_EMISSION_WARNING_KG: f64 = 1.0e9;

// ============================================================================
// Calculation Methods
// ============================================================================

/// Method tag identifying which formula branch produced a result.
///
/// Tier 1/2/3 are independent formula branches chosen by the `tier` tag and
/// by whether the selected factor carries a heating value; the tag itself
/// only labels the result and fixes its uncertainty band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculationMethod {
    /// Direct multiplication, Tier 1 factors
    #[serde(rename = "TIER_1_MULTIPLICATION")]
    Tier1Multiplication,
    /// Direct multiplication, Tier 2 factors
    #[serde(rename = "TIER_2_MULTIPLICATION")]
    Tier2Multiplication,
    /// Direct multiplication, Tier 3 factors
    #[serde(rename = "TIER_3_MULTIPLICATION")]
    Tier3Multiplication,
    /// Energy-content intermediate, Tier 1 factors
    #[serde(rename = "TIER_1_ENERGY_CONTENT")]
    Tier1EnergyContent,
    /// Energy-content intermediate, Tier 2 factors
    #[serde(rename = "TIER_2_ENERGY_CONTENT")]
    Tier2EnergyContent,
    /// Energy-content intermediate, Tier 3 factors
    #[serde(rename = "TIER_3_ENERGY_CONTENT")]
    Tier3EnergyContent,
}

impl CalculationMethod {
    /// Direct-multiplication method for a tier
    pub fn direct(tier: Tier) -> Self {
        match tier {
            Tier::Tier1 => CalculationMethod::Tier1Multiplication,
            Tier::Tier2 => CalculationMethod::Tier2Multiplication,
            Tier::Tier3 => CalculationMethod::Tier3Multiplication,
        }
    }

    /// Energy-content method for a tier
    pub fn energy(tier: Tier) -> Self {
        match tier {
            Tier::Tier1 => CalculationMethod::Tier1EnergyContent,
            Tier::Tier2 => CalculationMethod::Tier2EnergyContent,
            Tier::Tier3 => CalculationMethod::Tier3EnergyContent,
        }
    }

    /// Tier this method belongs to
    pub fn tier(&self) -> Tier {
        match self {
            CalculationMethod::Tier1Multiplication | CalculationMethod::Tier1EnergyContent => Tier::Tier1,
            CalculationMethod::Tier2Multiplication | CalculationMethod::Tier2EnergyContent => Tier::Tier2,
            CalculationMethod::Tier3Multiplication | CalculationMethod::Tier3EnergyContent => Tier::Tier3,
        }
    }

    /// Whether this method ran through the energy-content intermediate
    pub fn is_energy(&self) -> bool {
        matches!(
            self,
            CalculationMethod::Tier1EnergyContent
                | CalculationMethod::Tier2EnergyContent
                | CalculationMethod::Tier3EnergyContent
        )
    }

    /// Wire-format tag (e.g. "TIER_2_ENERGY_CONTENT")
    pub fn tag(&self) -> &'static str {
        match self {
            CalculationMethod::Tier1Multiplication => "TIER_1_MULTIPLICATION",
            CalculationMethod::Tier2Multiplication => "TIER_2_MULTIPLICATION",
            CalculationMethod::Tier3Multiplication => "TIER_3_MULTIPLICATION",
            CalculationMethod::Tier1EnergyContent => "TIER_1_ENERGY_CONTENT",
            CalculationMethod::Tier2EnergyContent => "TIER_2_ENERGY_CONTENT",
            CalculationMethod::Tier3EnergyContent => "TIER_3_ENERGY_CONTENT",
        }
    }

    /// The formula in plain text for audit output
    pub fn formula_plain(&self) -> &'static str {
        if self.is_energy() {
            "E = A * HV * EF, CO2e = E * GWP"
        } else {
            "E = A * EF, CO2e = E * GWP"
        }
    }
}

impl std::fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

// ============================================================================
// Request & Result Types
// ============================================================================

/// Input parameters for one emission calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "activity_value": 500.0,
///   "activity_unit": "ton",
///   "category_code": "1.A.1.a",
///   "tier": "TIER_2",
///   "activity_name": "natural gas power plant"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Activity quantity; must be non-negative
    pub activity_value: f64,
    /// Unit the activity quantity is expressed in (free text)
    pub activity_unit: String,
    /// IPCC category code, e.g. "1.A.1.a"
    pub category_code: String,
    /// Methodology tier to calculate at
    pub tier: Tier,
    /// Pin the gas type; when absent it is inferred from the category code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_type: Option<GasType>,
    /// Free-text activity description, used by selection heuristics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_name: Option<String>,
}

impl CalculationRequest {
    /// Validate input parameters before any computation.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.activity_value.is_finite() {
            return Err(CalcError::invalid_input(
                "activity_value",
                self.activity_value.to_string(),
                "Activity value must be a finite number",
            ));
        }
        if self.activity_value < 0.0 {
            return Err(CalcError::invalid_input(
                "activity_value",
                self.activity_value.to_string(),
                "Activity value must be non-negative",
            ));
        }
        if self.activity_unit.trim().is_empty() {
            return Err(CalcError::invalid_input(
                "activity_unit",
                &self.activity_unit,
                "Activity unit must not be empty",
            ));
        }
        if self.category_code.trim().is_empty() {
            return Err(CalcError::invalid_input(
                "category_code",
                &self.category_code,
                "Category code must not be empty",
            ));
        }
        Ok(())
    }
}

/// Audit record accompanying every result: which formula branch ran, what
/// was converted along the way, and anything worth flagging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationDetails {
    /// Formula branch that produced the result
    pub method: CalculationMethod,
    /// Human-readable derivation trail with the actual numbers
    pub formula: String,
    /// Intermediate energy content in GJ, when the energy path ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_content_gj: Option<f64>,
    /// One entry per unit conversion or compatibility fallback applied
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conversion_notes: Vec<String>,
    /// Non-fatal findings (e.g. implausibly large emission values)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Output of one emission calculation. Immutable once returned.
///
/// Invariant: `co2_equivalent_kg == emission_kg * gwp.value` exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Mass of the selected gas emitted, in kilograms
    pub emission_kg: f64,
    /// GWP-weighted mass, in kilograms of CO2-equivalent
    pub co2_equivalent_kg: f64,
    /// The factor the selector chose
    pub factor: EmissionFactor,
    /// The GWP entry applied
    pub gwp: GwpValue,
    /// Gas the emission value is expressed in
    pub gas_type: GasType,
    /// Tier the calculation ran at
    pub tier: Tier,
    /// Audit trail
    pub details: CalculationDetails,
}

impl CalculationResult {
    /// Uncertainty band of this result in percent, from its tier
    pub fn uncertainty_percent(&self) -> f64 {
        self.tier.uncertainty_percent()
    }
}

// ============================================================================
// Engine
// ============================================================================

/// The calculation engine facade: a factor database and a category registry
/// behind the tier formulas.
///
/// Holds only immutable reference data, so a single instance can serve
/// concurrent callers freely.
#[derive(Debug, Clone)]
pub struct EmissionEngine {
    factors: FactorDatabase,
    categories: CategoryRegistry,
}

impl EmissionEngine {
    /// Build an engine over caller-supplied reference data
    pub fn new(factors: FactorDatabase, categories: CategoryRegistry) -> Self {
        Self { factors, categories }
    }

    /// Engine wired to the embedded default datasets
    pub fn with_defaults() -> Self {
        Self {
            factors: FactorDatabase::with_defaults(),
            categories: CategoryRegistry::with_defaults(),
        }
    }

    /// The factor database this engine reads
    pub fn factors(&self) -> &FactorDatabase {
        &self.factors
    }

    /// The category registry this engine reads
    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    /// Run a calculation. The gas type comes from the request when pinned,
    /// otherwise it is inferred from the category code.
    pub fn calculate(&self, request: &CalculationRequest) -> CalcResult<CalculationResult> {
        let gas_type = request
            .gas_type
            .unwrap_or_else(|| infer_gas_type(&request.category_code));
        self.run(request, gas_type)
    }

    /// Run a calculation with an explicitly pinned gas type, ignoring both
    /// the request's `gas_type` field and category inference.
    pub fn calculate_with_gas_type(
        &self,
        request: &CalculationRequest,
        gas_type: GasType,
    ) -> CalcResult<CalculationResult> {
        self.run(request, gas_type)
    }

    fn run(&self, request: &CalculationRequest, gas_type: GasType) -> CalcResult<CalculationResult> {
        request.validate()?;

        let selector = EmissionFactorSelector::new(self.factors.factors());
        let factor = selector
            .select(
                &request.category_code,
                request.tier,
                gas_type,
                request.activity_name.as_deref(),
            )
            .ok_or_else(|| CalcError::no_factor_found(&request.category_code, request.tier, gas_type))?;

        let gwp = lookup_gwp(gas_type).ok_or(CalcError::NoGwpFound { gas_type })?;

        let sector = self.categories.sector_for(&request.category_code);
        let mut notes = Vec::new();
        let mut warnings = Vec::new();

        let energy = if sector == Sector::Energy {
            self.energy_emission(request, factor, &mut notes)?
        } else {
            None
        };

        let (emission_kg, method, energy_content_gj) = match energy {
            Some((emission, energy_gj)) => (emission, CalculationMethod::energy(request.tier), Some(energy_gj)),
            None => (
                self.direct_emission(request, factor, &mut notes)?,
                CalculationMethod::direct(request.tier),
                None,
            ),
        };

        if emission_kg < 0.0 {
            return Err(CalcError::NegativeEmission { emission_kg });
        }
        if emission_kg > HIGH_EMISSION_WARNING_KG {
            warnings.push(format!(
                "Emission of {emission_kg} kg exceeds {HIGH_EMISSION_WARNING_KG} kg; verify activity data and units"
            ));
        }

        let co2_equivalent_kg = emission_kg * gwp.value;

        let formula = match energy_content_gj {
            Some(energy_gj) => format!(
                "energy = {} {} x {} {} = {} GJ; emission = {} kg {}; CO2e = {} x {} = {} kg",
                request.activity_value,
                request.activity_unit.trim(),
                factor.heating_value.unwrap_or_default(),
                factor.heating_value_unit.as_deref().unwrap_or(""),
                energy_gj,
                emission_kg,
                gas_type,
                emission_kg,
                gwp.value,
                co2_equivalent_kg,
            ),
            None => format!(
                "emission = {} {} x {} {} = {} kg {}; CO2e = {} x {} = {} kg",
                request.activity_value,
                request.activity_unit.trim(),
                factor.value,
                factor.unit,
                emission_kg,
                gas_type,
                emission_kg,
                gwp.value,
                co2_equivalent_kg,
            ),
        };

        Ok(CalculationResult {
            emission_kg,
            co2_equivalent_kg,
            factor: factor.clone(),
            gwp: gwp.clone(),
            gas_type,
            tier: request.tier,
            details: CalculationDetails {
                method,
                formula,
                energy_content_gj,
                conversion_notes: notes,
                warnings,
            },
        })
    }

    /// Energy-content path: `energy = activity x heating_value`, then the
    /// factor applies per GJ (or per TJ after a /1000 rescale).
    ///
    /// Returns `Ok(None)` when the factor carries no heating value or the
    /// activity cannot be expressed in the heating value's denominator;
    /// the caller then falls through to direct multiplication.
    fn energy_emission(
        &self,
        request: &CalculationRequest,
        factor: &EmissionFactor,
        notes: &mut Vec<String>,
    ) -> CalcResult<Option<(f64, f64)>> {
        let (Some(heating_value), Some(hv_unit)) = (factor.heating_value, factor.heating_value_unit.as_deref())
        else {
            return Ok(None);
        };

        let denominator = match hv_unit.split('/').nth(1).map(units::normalize_unit) {
            Some(d) if matches!(d.as_str(), "ton" | "m3" | "liter") => d,
            _ => return Ok(None),
        };

        let fuel_quantity = if units::units_compatible(&request.activity_unit, &denominator) {
            request.activity_value
        } else {
            match units::convert(
                request.activity_value,
                &request.activity_unit,
                &denominator,
                factor.fuel_type.as_deref(),
            ) {
                Ok(converted) => {
                    notes.push(format!(
                        "Converted {} {} to {} {} for the heating value",
                        request.activity_value,
                        request.activity_unit.trim(),
                        converted,
                        denominator
                    ));
                    converted
                }
                Err(err) if err.is_conversion_failure() => {
                    notes.push(format!(
                        "Activity unit '{}' cannot be expressed per {}; heating value ignored, factor applied directly",
                        request.activity_unit.trim(),
                        denominator
                    ));
                    return Ok(None);
                }
                Err(err) => return Err(err),
            }
        };

        let energy_gj = fuel_quantity * heating_value;
        let emission = if factor.unit.per_tj() {
            let energy_tj = energy_gj / 1000.0;
            notes.push(format!("Energy content rescaled: {energy_gj} GJ = {energy_tj} TJ"));
            energy_tj * factor.value
        } else {
            energy_gj * factor.value
        };
        Ok(Some((emission, energy_gj)))
    }

    /// Direct path: reconcile the activity unit against the factor's base
    /// unit, multiply, and normalize ton-denominated factor output to kg.
    fn direct_emission(
        &self,
        request: &CalculationRequest,
        factor: &EmissionFactor,
        notes: &mut Vec<String>,
    ) -> CalcResult<f64> {
        let base_unit = factor.unit.base_unit();
        let activity_unit = units::normalize_unit(&request.activity_unit);

        let quantity = if units::units_compatible(&activity_unit, base_unit) {
            request.activity_value
        } else {
            match units::convert(
                request.activity_value,
                &request.activity_unit,
                base_unit,
                factor.fuel_type.as_deref(),
            ) {
                Ok(converted) => {
                    notes.push(format!(
                        "Converted {} {} to {} {}",
                        request.activity_value,
                        request.activity_unit.trim(),
                        converted,
                        base_unit
                    ));
                    converted
                }
                Err(err) if err.is_conversion_failure() => {
                    let both_ton = activity_unit == "ton" && units::normalize_unit(factor.unit.raw()) == "ton";
                    if factor.unit.contains_unit(&request.activity_unit) || both_ton {
                        notes.push(format!(
                            "No conversion rule for '{}' -> '{}'; activity value treated as already expressed in the factor's unit",
                            request.activity_unit.trim(),
                            base_unit
                        ));
                        request.activity_value
                    } else {
                        return Err(CalcError::unit_mismatch(
                            request.activity_unit.trim(),
                            factor.unit.raw(),
                        ));
                    }
                }
                Err(err) => return Err(err),
            }
        };

        let mut emission = quantity * factor.value;
        if factor.unit.needs_kg_normalization() {
            emission *= 1000.0;
            notes.push("Factor output is in tons; scaled by 1000 to kilograms".to_string());
        }
        Ok(emission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::EmissionFactor;

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

    fn approx(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() <= tol, "{a} != {b} (tol {tol})");
    }

    #[test]
    fn test_tier1_coal_power_direct() {
        // 1000 GJ x 94.6 kg CO2/GJ = 94,600 kg; GWP(CO2) = 1
        let engine = EmissionEngine::with_defaults();
        let mut req = request(1000.0, "GJ", "1.A.1.a", Tier::Tier1);
        req.activity_name = Some("coal power plant".to_string());

        let result = engine.calculate(&req).unwrap();
        assert_eq!(result.gas_type, GasType::Co2);
        assert_eq!(result.emission_kg, 94_600.0);
        assert_eq!(result.co2_equivalent_kg, 94_600.0);
        assert_eq!(result.details.method, CalculationMethod::Tier1Multiplication);
        assert!(result.details.energy_content_gj.is_none());
    }

    #[test]
    fn test_tier2_natural_gas_energy_content() {
        // 500 ton x 38.0 GJ/ton = 19,000 GJ; x 56.1 kg CO2/GJ = 1,065,900 kg
        let engine = EmissionEngine::with_defaults();
        let mut req = request(500.0, "ton", "1.A.1.a", Tier::Tier2);
        req.activity_name = Some("natural gas power plant".to_string());

        let result = engine.calculate(&req).unwrap();
        approx(result.details.energy_content_gj.unwrap(), 19_000.0, 1e-9);
        approx(result.emission_kg, 1_065_900.0, 1e-6);
        approx(result.co2_equivalent_kg, 1_065_900.0, 1e-6);
        assert_eq!(result.details.method, CalculationMethod::Tier2EnergyContent);
        assert!(result.details.method.is_energy());
    }

    #[test]
    fn test_tier2_waste_ch4() {
        // 10,000 kg waste x 0.185 kg CH4/kg waste = 1,850 kg CH4; x 28 = 51,800 kg CO2e
        let engine = EmissionEngine::with_defaults();
        let req = request(10_000.0, "kg", "4.A", Tier::Tier2);

        let result = engine.calculate(&req).unwrap();
        assert_eq!(result.gas_type, GasType::Ch4);
        approx(result.emission_kg, 1_850.0, 1e-9);
        approx(result.co2_equivalent_kg, 51_800.0, 1e-9);
        // the kg/kg_waste mismatch resolves via the direct-use fallback
        assert!(!result.details.conversion_notes.is_empty());
    }

    #[test]
    fn test_tier3_n2o_per_tj_factor() {
        // 1000 ton x 22.5 GJ/ton = 22,500 GJ = 22.5 TJ; x 1.4 kg N2O/TJ = 31.5 kg
        let engine = EmissionEngine::with_defaults();
        let mut req = request(1000.0, "ton", "1.A.1.a", Tier::Tier3);
        req.activity_name = Some("coal power plant".to_string());

        let result = engine.calculate_with_gas_type(&req, GasType::N2o).unwrap();
        approx(result.emission_kg, 31.5, 1e-9);
        approx(result.co2_equivalent_kg, 8_347.5, 0.1);
        assert_eq!(result.details.method.tag(), "TIER_3_ENERGY_CONTENT");
    }

    #[test]
    fn test_gas_type_inference_from_category() {
        let engine = EmissionEngine::with_defaults();
        let result = engine.calculate(&request(100.0, "head", "3.A.1", Tier::Tier1)).unwrap();
        assert_eq!(result.gas_type, GasType::Ch4);

        let result = engine.calculate(&request(50.0, "kg", "3.C.4", Tier::Tier1)).unwrap();
        assert_eq!(result.gas_type, GasType::N2o);
    }

    #[test]
    fn test_co2_equivalent_is_exactly_gwp_linear() {
        let engine = EmissionEngine::with_defaults();
        let result = engine.calculate(&request(321.5, "kg", "4.A", Tier::Tier1)).unwrap();
        assert_eq!(result.co2_equivalent_kg, result.emission_kg * result.gwp.value);
    }

    #[test]
    fn test_zero_activity_is_zero_emission() {
        let engine = EmissionEngine::with_defaults();
        let result = engine.calculate(&request(0.0, "GJ", "1.A.2", Tier::Tier1)).unwrap();
        assert_eq!(result.emission_kg, 0.0);
        assert_eq!(result.co2_equivalent_kg, 0.0);
        assert!(result.details.warnings.is_empty());
    }

    #[test]
    fn test_negative_activity_is_rejected() {
        let engine = EmissionEngine::with_defaults();
        let err = engine.calculate(&request(-5.0, "GJ", "1.A.2", Tier::Tier1)).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_no_factor_found_carries_context() {
        let engine = EmissionEngine::with_defaults();
        let mut req = request(10.0, "kg", "2.A.1", Tier::Tier3);
        req.gas_type = Some(GasType::Sf6);
        let err = engine.calculate(&req).unwrap_err();
        match err {
            CalcError::NoFactorFound {
                category_code,
                tier,
                gas_type,
            } => {
                assert_eq!(category_code, "2.A.1");
                assert_eq!(tier, Tier::Tier3);
                assert_eq!(gas_type, GasType::Sf6);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unit_mismatch_when_no_fallback_applies() {
        let engine = EmissionEngine::with_defaults();
        // kWh cannot convert to GJ and "kg_CO2/GJ" does not mention kWh
        let req = request(100.0, "kWh", "1.A.2", Tier::Tier1);
        let err = engine.calculate(&req).unwrap_err();
        assert_eq!(err.error_code(), "UNIT_MISMATCH");
    }

    #[test]
    fn test_ton_denominated_factor_output_scales_to_kg() {
        let factors = FactorDatabase::from_factors(vec![EmissionFactor::new(
            "T1",
            "Municipal Solid Waste Landfill (Bulk)",
            GasType::Ch4,
            Tier::Tier1,
            0.06,
            "ton_CH4/ton_waste",
        )]);
        let engine = EmissionEngine::new(factors, CategoryRegistry::with_defaults());
        let result = engine.calculate(&request(100.0, "ton", "4.A", Tier::Tier1)).unwrap();
        // 100 ton x 0.06 ton CH4/ton = 6 ton = 6,000 kg CH4
        approx(result.emission_kg, 6_000.0, 1e-9);
        approx(result.co2_equivalent_kg, 168_000.0, 1e-6);
    }

    #[test]
    fn test_energy_path_falls_back_when_activity_already_in_energy_units() {
        // the selected natural-gas factor carries a GJ/ton heating value,
        // but the activity arrives in GJ; the factor applies directly
        let engine = EmissionEngine::with_defaults();
        let mut req = request(19_000.0, "GJ", "1.A.1.a", Tier::Tier2);
        req.activity_name = Some("natural gas".to_string());

        let result = engine.calculate(&req).unwrap();
        approx(result.emission_kg, 1_065_900.0, 1e-6);
        assert_eq!(result.details.method, CalculationMethod::Tier2Multiplication);
        assert!(result.details.energy_content_gj.is_none());
    }

    #[test]
    fn test_high_emission_is_warning_not_error() {
        let engine = EmissionEngine::with_defaults();
        let req = request(1.0e9, "GJ", "1.A.2", Tier::Tier1);
        let result = engine.calculate(&req).unwrap();
        assert!(result.emission_kg > HIGH_EMISSION_WARNING_KG);
        assert_eq!(result.details.warnings.len(), 1);
    }

    #[test]
    fn test_determinism() {
        let engine = EmissionEngine::with_defaults();
        let mut req = request(500.0, "ton", "1.A.1.a", Tier::Tier2);
        req.activity_name = Some("natural gas".to_string());

        let a = engine.calculate(&req).unwrap();
        let b = engine.calculate(&req).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_float_fields_survive_json_exactly() {
        // 10,000 x 0.185 x 28 has no short decimal representation; the
        // parsed value must still equal the computed one bit-for-bit
        let engine = EmissionEngine::with_defaults();
        let result = engine.calculate(&request(10_000.0, "kg", "4.A", Tier::Tier2)).unwrap();
        let json = serde_json::to_string(&result.co2_equivalent_kg).unwrap();
        let back: f64 = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_bits(), result.co2_equivalent_kg.to_bits());
    }

    #[test]
    fn test_result_serialization_round_trip() {
        let engine = EmissionEngine::with_defaults();
        let result = engine.calculate(&request(10.0, "kg", "4.A", Tier::Tier2)).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let back: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}

//! # Emission Factors
//!
//! Emission factor records and the database that holds them. Factors are
//! immutable reference data: created when the dataset loads, never mutated
//! by the engine.
//!
//! Compound unit strings like `"kg_CO2/GJ"` are parsed exactly once, at
//! load time, into a [`FactorUnit`] value type. The runtime never re-parses
//! unit strings; ambiguous cases (`_N`/`_BOD` qualifier denominators) are
//! explicit fields instead of repeated string surgery.
//!
//! ## Example
//!
//! ```rust
//! use ghg_core::factors::FactorDatabase;
//! use ghg_core::gases::{GasType, Tier};
//!
//! let db = FactorDatabase::with_defaults();
//! let coal = db
//!     .factors()
//!     .iter()
//!     .find(|f| f.name.contains("Coal Power") && f.tier == Tier::Tier1)
//!     .unwrap();
//! assert_eq!(coal.gas_type, GasType::Co2);
//! assert_eq!(coal.unit.base_unit(), "gj");
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::gases::{GasType, Tier};
use crate::units;

// ============================================================================
// Parsed Factor Units
// ============================================================================

/// A factor unit string, parsed once at load time.
///
/// Serializes as the raw string (`"kg_CO2/GJ"`) so JSON reference data stays
/// plain; the in-memory form carries the parsed numerator gas, base unit and
/// qualifier alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FactorUnit {
    raw: String,
    numerator_gas: Option<GasType>,
    base_unit: String,
    qualifier: Option<String>,
    per_tj: bool,
    ton_numerator: bool,
}

impl FactorUnit {
    /// Parse a compound unit string
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = units::normalize_unit(&raw);
        let numerator = normalized.split('/').next().unwrap_or(&normalized);
        let numerator_gas = GasType::ALL
            .into_iter()
            .find(|gas| numerator.contains(&gas.code().to_lowercase()));
        let base_unit = units::extract_base_unit(&raw);
        let qualifier = units::qualifier_of(&base_unit).map(str::to_string);
        // A "ton_" numerator means the factor's own result is in tons and
        // must be normalized to kilograms downstream. "ton_CO2" units are
        // exempt per legacy behavior.
        let ton_numerator = normalized.starts_with("ton_") && !normalized.contains("ton_co2");
        let per_tj = base_unit == "tj";
        Self {
            raw,
            numerator_gas,
            base_unit,
            qualifier,
            per_tj,
            ton_numerator,
        }
    }

    /// The original unit string, as loaded
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Gas named in the numerator, when recognizable
    pub fn numerator_gas(&self) -> Option<GasType> {
        self.numerator_gas
    }

    /// The physical unit the activity value must be expressed in before
    /// multiplying by the factor
    pub fn base_unit(&self) -> &str {
        &self.base_unit
    }

    /// Qualifier suffix of the denominator (`"_n"`, `"_bod"`, ...), if any
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// Whether the factor is denominated per terajoule rather than per
    /// gigajoule of energy content
    pub fn per_tj(&self) -> bool {
        self.per_tj
    }

    /// Whether a direct multiplication by this factor yields tons that must
    /// be scaled to kilograms
    pub fn needs_kg_normalization(&self) -> bool {
        self.ton_numerator
    }

    /// Textual containment check used by the direct-use fallback policy:
    /// does this unit string mention the activity unit at all?
    pub fn contains_unit(&self, activity_unit: &str) -> bool {
        let needle = units::normalize_unit(activity_unit);
        !needle.is_empty() && units::normalize_unit(&self.raw).contains(&needle)
    }
}

impl From<String> for FactorUnit {
    fn from(raw: String) -> Self {
        FactorUnit::parse(raw)
    }
}

impl From<FactorUnit> for String {
    fn from(unit: FactorUnit) -> Self {
        unit.raw
    }
}

impl std::fmt::Display for FactorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

// ============================================================================
// Emission Factor Records
// ============================================================================

/// A single emission factor: mass of gas emitted per unit of activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactor {
    /// Stable identifier within the dataset
    pub id: String,
    /// Display name; selection heuristics match against this
    pub name: String,
    /// Gas this factor quantifies
    pub gas_type: GasType,
    /// Methodology tier the factor belongs to
    pub tier: Tier,
    /// Numeric factor value, in `unit`
    pub value: f64,
    /// Compound unit, e.g. "kg_CO2/GJ" or "kg_CH4/kg_waste"
    pub unit: FactorUnit,
    /// Fuel energy content, for factors denominated per unit of energy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heating_value: Option<f64>,
    /// Unit of the heating value, e.g. "GJ/ton"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heating_value_unit: Option<String>,
    /// Category codes this factor applies to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category_codes: Vec<String>,
    /// Fuel or activity type tag, used as a conversion hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    /// Source citation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl EmissionFactor {
    /// Create a factor with the required fields; optional fields via the
    /// `with_*` builders
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        gas_type: GasType,
        tier: Tier,
        value: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            gas_type,
            tier,
            value,
            unit: FactorUnit::parse(unit.into()),
            heating_value: None,
            heating_value_unit: None,
            category_codes: Vec::new(),
            fuel_type: None,
            source: None,
        }
    }

    /// Attach a heating value (energy content per unit of fuel)
    pub fn with_heating_value(mut self, value: f64, unit: impl Into<String>) -> Self {
        self.heating_value = Some(value);
        self.heating_value_unit = Some(unit.into());
        self
    }

    /// Attach applicable category codes
    pub fn with_categories(mut self, codes: &[&str]) -> Self {
        self.category_codes = codes.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Attach a fuel type tag
    pub fn with_fuel_type(mut self, fuel_type: impl Into<String>) -> Self {
        self.fuel_type = Some(fuel_type.into());
        self
    }

    /// Attach a source citation
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

// ============================================================================
// Factor Database
// ============================================================================

/// Read-only container for emission factor reference data.
///
/// Declaration order is significant: the selector's legacy "first match
/// wins" behavior resolves ties by position in this list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorDatabase {
    factors: Vec<EmissionFactor>,
}

impl FactorDatabase {
    /// Build a database from caller-supplied records
    pub fn from_factors(factors: Vec<EmissionFactor>) -> Self {
        Self { factors }
    }

    /// Build a database from a JSON array of factor records
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let factors: Vec<EmissionFactor> = serde_json::from_str(json)?;
        Ok(Self { factors })
    }

    /// Database with the embedded default dataset
    pub fn with_defaults() -> Self {
        Self {
            factors: default_factors(),
        }
    }

    /// All factors, in declaration order
    pub fn factors(&self) -> &[EmissionFactor] {
        &self.factors
    }

    /// Number of factors in the dataset
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Whether the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

impl Default for FactorDatabase {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Embedded default factor dataset.
///
/// Values are IPCC 2006 defaults or country-study figures; each record
/// cites its source. Declaration order doubles as the selector's tie-break
/// order, so more specific factors come before generic ones within each
/// sector block.
fn default_factors() -> Vec<EmissionFactor> {
    use GasType::*;
    use Tier::*;

    vec![
        // ------------------------------------------------------------------
        // Energy: public electricity and heat (1.A.1)
        // ------------------------------------------------------------------
        EmissionFactor::new("EF-EN-001", "Coal Power Generation", Co2, Tier1, 94.6, "kg_CO2/GJ")
            .with_categories(&["1.A.1.a", "1.A.1"])
            .with_fuel_type("Coal")
            .with_source("IPCC 2006 Vol.2 Table 2.2 (other bituminous coal)"),
        EmissionFactor::new(
            "EF-EN-002",
            "Coal Power Generation (Country-Specific)",
            Co2,
            Tier2,
            95.8,
            "kg_CO2/GJ",
        )
        .with_heating_value(25.8, "GJ/ton")
        .with_categories(&["1.A.1.a", "1.A.1"])
        .with_fuel_type("Coal")
        .with_source("National inventory report, stationary combustion"),
        EmissionFactor::new("EF-EN-003", "Coal Power Generation N2O", N2o, Tier3, 1.4, "kg_N2O/TJ")
            .with_heating_value(22.5, "GJ/ton")
            .with_categories(&["1.A.1.a"])
            .with_fuel_type("Coal")
            .with_source("Facility measurement campaign"),
        EmissionFactor::new("EF-EN-004", "Natural Gas Combustion", Co2, Tier1, 56.1, "kg_CO2/GJ")
            .with_heating_value(38.0, "GJ/ton")
            .with_categories(&["1.A.1.a", "1.A.1"])
            .with_fuel_type("Natural Gas")
            .with_source("IPCC 2006 Vol.2 Table 2.2 (natural gas)"),
        EmissionFactor::new(
            "EF-EN-005",
            "Natural Gas Combustion (Country-Specific)",
            Co2,
            Tier2,
            56.1,
            "kg_CO2/GJ",
        )
        .with_heating_value(38.0, "GJ/ton")
        .with_categories(&["1.A.1.a", "1.A.1"])
        .with_fuel_type("Natural Gas")
        .with_source("National inventory report, stationary combustion"),
        EmissionFactor::new("EF-EN-006", "Residential Heating Combustion", Co2, Tier1, 63.1, "kg_CO2/GJ")
            .with_categories(&["1.A.1", "1.A.4"])
            .with_fuel_type("Mixed Fuels")
            .with_source("IPCC 2006 Vol.2 Ch.2"),
        // ------------------------------------------------------------------
        // Energy: manufacturing and transport (1.A.2, 1.A.3)
        // ------------------------------------------------------------------
        EmissionFactor::new(
            "EF-EN-010",
            "Manufacturing Industries Combustion",
            Co2,
            Tier1,
            73.3,
            "kg_CO2/GJ",
        )
        .with_categories(&["1.A.2"])
        .with_fuel_type("Mixed Fuels")
        .with_source("IPCC 2006 Vol.2 Ch.2"),
        EmissionFactor::new("EF-EN-011", "Aviation Jet Fuel Combustion", Co2, Tier1, 71.5, "kg_CO2/GJ")
            .with_heating_value(44.3, "GJ/ton")
            .with_categories(&["1.A.3.a"])
            .with_fuel_type("Jet Kerosene")
            .with_source("IPCC 2006 Vol.2 Table 3.6.4"),
        EmissionFactor::new("EF-EN-012", "Road Transport Gasoline", Co2, Tier1, 69.3, "kg_CO2/GJ")
            .with_heating_value(44.3, "GJ/ton")
            .with_categories(&["1.A.3.b"])
            .with_fuel_type("Motor Gasoline")
            .with_source("IPCC 2006 Vol.2 Table 3.2.1"),
        EmissionFactor::new("EF-EN-013", "Road Transport Diesel", Co2, Tier1, 74.1, "kg_CO2/GJ")
            .with_heating_value(43.0, "GJ/ton")
            .with_categories(&["1.A.3.b"])
            .with_fuel_type("Diesel Oil")
            .with_source("IPCC 2006 Vol.2 Table 3.2.1"),
        // ------------------------------------------------------------------
        // IPPU: mineral industry (2.A)
        // ------------------------------------------------------------------
        EmissionFactor::new("EF-IP-001", "Cement Production (Clinker)", Co2, Tier1, 510.0, "kg_CO2/ton_clinker")
            .with_categories(&["2.A.1"])
            .with_source("IPCC 2006 Vol.3 Ch.2.2"),
        EmissionFactor::new("EF-IP-002", "Lime Production", Co2, Tier1, 750.0, "kg_CO2/ton_lime")
            .with_categories(&["2.A.2"])
            .with_source("IPCC 2006 Vol.3 Ch.2.3"),
        EmissionFactor::new("EF-IP-003", "Glass Production", Co2, Tier1, 200.0, "kg_CO2/ton")
            .with_categories(&["2.A.3"])
            .with_source("IPCC 2006 Vol.3 Ch.2.4"),
        // ------------------------------------------------------------------
        // AFOLU: livestock (3.A)
        // ------------------------------------------------------------------
        EmissionFactor::new("EF-AG-001", "Enteric Fermentation - Dairy Cattle", Ch4, Tier1, 128.0, "kg_CH4/head")
            .with_categories(&["3.A.1"])
            .with_source("IPCC 2006 Vol.4 Table 10.11"),
        EmissionFactor::new("EF-AG-002", "Manure Management - Cattle", Ch4, Tier1, 48.0, "kg_CH4/head")
            .with_categories(&["3.A.2"])
            .with_source("IPCC 2006 Vol.4 Table 10.14"),
        // ------------------------------------------------------------------
        // AFOLU: managed soils (3.C)
        // ------------------------------------------------------------------
        EmissionFactor::new("EF-AG-010", "Synthetic Fertilizer N2O Direct", N2o, Tier1, 0.01, "kg_N2O/kg_N")
            .with_categories(&["3.C.4"])
            .with_source("IPCC 2006 Vol.4 Table 11.1 (EF1)"),
        EmissionFactor::new(
            "EF-AG-011",
            "Synthetic Fertilizer N2O Direct (Country-Specific)",
            N2o,
            Tier2,
            0.012,
            "kg_N2O/kg_N",
        )
        .with_categories(&["3.C.4"])
        .with_source("National inventory report, managed soils"),
        EmissionFactor::new("EF-AG-012", "Organic Fertilizer Application", N2o, Tier3, 0.009, "kg_N2O/kg_N")
            .with_categories(&["3.C.4"])
            .with_source("Field measurement study"),
        EmissionFactor::new("EF-AG-013", "Managed Soils N2O Indirect", N2o, Tier1, 0.01, "kg_N2O/kg_N")
            .with_categories(&["3.C.5"])
            .with_source("IPCC 2006 Vol.4 Table 11.3 (EF4)"),
        EmissionFactor::new("EF-AG-014", "Wood Combustion N2O", N2o, Tier1, 4.0, "kg_N2O/TJ")
            .with_categories(&["1.A.4"])
            .with_fuel_type("Wood")
            .with_source("IPCC 2006 Vol.2 Table 2.2"),
        // ------------------------------------------------------------------
        // Waste (4.A, 4.D)
        // ------------------------------------------------------------------
        EmissionFactor::new("EF-WA-001", "Paper/Cardboard Waste Decomposition", Ch4, Tier2, 0.185, "kg_CH4/kg_waste")
            .with_categories(&["4.A"])
            .with_source("IPCC 2006 Vol.5 Ch.3, FOD parameters"),
        EmissionFactor::new("EF-WA-002", "Municipal Solid Waste Landfill", Ch4, Tier1, 0.05, "kg_CH4/kg_waste")
            .with_categories(&["4.A"])
            .with_source("IPCC 2006 Vol.5 Ch.3 default"),
        EmissionFactor::new("EF-WA-003", "Municipal Solid Waste Landfill (Bulk)", Ch4, Tier1, 0.06, "ton_CH4/ton_waste")
            .with_categories(&["4.A"])
            .with_source("IPCC 2006 Vol.5 Ch.3 default, bulk basis"),
        EmissionFactor::new("EF-WA-004", "Domestic Wastewater Treatment", Ch4, Tier1, 0.6, "kg_CH4/kg_BOD")
            .with_categories(&["4.D"])
            .with_source("IPCC 2006 Vol.5 Table 6.2"),
        EmissionFactor::new("EF-WA-005", "Wastewater Treatment Effluent N2O", N2o, Tier1, 0.005, "kg_N2O/kg_N")
            .with_categories(&["4.D"])
            .with_source("IPCC 2006 Vol.5 Table 6.11"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_unit_parsing() {
        let unit = FactorUnit::parse("kg_CO2/GJ");
        assert_eq!(unit.numerator_gas(), Some(GasType::Co2));
        assert_eq!(unit.base_unit(), "gj");
        assert_eq!(unit.qualifier(), None);
        assert!(!unit.per_tj());
        assert!(!unit.needs_kg_normalization());

        let unit = FactorUnit::parse("kg_N2O/kg_N");
        assert_eq!(unit.numerator_gas(), Some(GasType::N2o));
        assert_eq!(unit.base_unit(), "kg_n");
        assert_eq!(unit.qualifier(), Some("_n"));

        let unit = FactorUnit::parse("kg_N2O/TJ");
        assert!(unit.per_tj());
    }

    #[test]
    fn test_ton_numerator_normalization_flag() {
        assert!(FactorUnit::parse("ton_CH4/ton_waste").needs_kg_normalization());
        // legacy exemption for ton_CO2 units
        assert!(!FactorUnit::parse("ton_CO2/ton_clinker").needs_kg_normalization());
        assert!(!FactorUnit::parse("kg_CO2/ton_clinker").needs_kg_normalization());
    }

    #[test]
    fn test_factor_unit_serde_round_trip() {
        let unit = FactorUnit::parse("kg_CH4/kg_waste");
        let json = serde_json::to_string(&unit).unwrap();
        assert_eq!(json, "\"kg_CH4/kg_waste\"");
        let back: FactorUnit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, unit);
        assert_eq!(back.base_unit(), "kg_waste");
    }

    #[test]
    fn test_contains_unit_fallback_check() {
        let unit = FactorUnit::parse("kg_CH4/kg_waste");
        assert!(unit.contains_unit("kg"));
        assert!(!unit.contains_unit("m3"));
        assert!(!unit.contains_unit(""));
    }

    #[test]
    fn test_default_dataset_shape() {
        let db = FactorDatabase::with_defaults();
        assert!(!db.is_empty());
        // every heating value names its unit
        for factor in db.factors() {
            assert_eq!(
                factor.heating_value.is_some(),
                factor.heating_value_unit.is_some(),
                "factor {} has a dangling heating value",
                factor.id
            );
        }
        // ids are unique
        let mut ids: Vec<_> = db.factors().iter().map(|f| f.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), db.len());
    }

    #[test]
    fn test_database_json_round_trip() {
        let db = FactorDatabase::with_defaults();
        let json = serde_json::to_string(db.factors()).unwrap();
        let back = FactorDatabase::from_json(&json).unwrap();
        assert_eq!(back.len(), db.len());
        assert_eq!(back.factors()[0], db.factors()[0]);
    }
}

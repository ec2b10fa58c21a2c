//! # Greenhouse Gases, Tiers, and the GWP Table
//!
//! Core enumerations for the seven IPCC inventory gases and the three
//! calculation tiers, plus the fixed Global Warming Potential lookup table
//! (AR5 basis).
//!
//! ## GWP values (AR5, 100-year horizon)
//!
//! | Gas  | GWP    |
//! |------|--------|
//! | CO2  | 1      |
//! | CH4  | 28     |
//! | N2O  | 265    |
//! | HFCs | 1430   |
//! | PFCs | 6630   |
//! | SF6  | 23500  |
//! | NF3  | 16100  |
//!
//! ## Example
//!
//! ```rust
//! use ghg_core::gases::{lookup_gwp, GasType};
//!
//! let gwp = lookup_gwp(GasType::Ch4).unwrap();
//! assert_eq!(gwp.value, 28.0);
//! assert_eq!(gwp.assessment_report, "AR5");
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Gas Types
// ============================================================================

/// Greenhouse gas species per the IPCC 2006 inventory guidelines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GasType {
    /// Carbon dioxide
    #[serde(rename = "CO2")]
    Co2,
    /// Methane
    #[serde(rename = "CH4")]
    Ch4,
    /// Nitrous oxide
    #[serde(rename = "N2O")]
    N2o,
    /// Hydrofluorocarbons (family, HFC-134a basis)
    #[serde(rename = "HFCs")]
    Hfcs,
    /// Perfluorocarbons (family, CF4 basis)
    #[serde(rename = "PFCs")]
    Pfcs,
    /// Sulfur hexafluoride
    #[serde(rename = "SF6")]
    Sf6,
    /// Nitrogen trifluoride
    #[serde(rename = "NF3")]
    Nf3,
}

impl GasType {
    /// All gas type variants for UI selection
    pub const ALL: [GasType; 7] = [
        GasType::Co2,
        GasType::Ch4,
        GasType::N2o,
        GasType::Hfcs,
        GasType::Pfcs,
        GasType::Sf6,
        GasType::Nf3,
    ];

    /// Chemical formula string as used in factor unit strings (e.g. "kg_CO2/GJ")
    pub fn code(&self) -> &'static str {
        match self {
            GasType::Co2 => "CO2",
            GasType::Ch4 => "CH4",
            GasType::N2o => "N2O",
            GasType::Hfcs => "HFCs",
            GasType::Pfcs => "PFCs",
            GasType::Sf6 => "SF6",
            GasType::Nf3 => "NF3",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            GasType::Co2 => "Carbon Dioxide (CO2)",
            GasType::Ch4 => "Methane (CH4)",
            GasType::N2o => "Nitrous Oxide (N2O)",
            GasType::Hfcs => "Hydrofluorocarbons (HFCs)",
            GasType::Pfcs => "Perfluorocarbons (PFCs)",
            GasType::Sf6 => "Sulfur Hexafluoride (SF6)",
            GasType::Nf3 => "Nitrogen Trifluoride (NF3)",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "CO2" | "CARBON DIOXIDE" => Ok(GasType::Co2),
            "CH4" | "METHANE" => Ok(GasType::Ch4),
            "N2O" | "NITROUS OXIDE" => Ok(GasType::N2o),
            "HFC" | "HFCS" => Ok(GasType::Hfcs),
            "PFC" | "PFCS" => Ok(GasType::Pfcs),
            "SF6" => Ok(GasType::Sf6),
            "NF3" => Ok(GasType::Nf3),
            _ => Err(CalcError::invalid_input(
                "gas_type",
                s,
                "Unknown gas type; expected CO2, CH4, N2O, HFCs, PFCs, SF6 or NF3",
            )),
        }
    }
}

impl std::fmt::Display for GasType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Calculation Tiers
// ============================================================================

/// IPCC methodology tier.
///
/// Tier 1 uses global default factors, Tier 2 country/region-specific
/// factors, Tier 3 facility-specific measured factors. Higher tiers carry
/// lower uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tier {
    /// Global default factors: +/-150% uncertainty
    #[default]
    #[serde(rename = "TIER_1")]
    Tier1,
    /// Country/region-specific factors: +/-50% uncertainty
    #[serde(rename = "TIER_2")]
    Tier2,
    /// Facility-specific measured factors: +/-15% uncertainty
    #[serde(rename = "TIER_3")]
    Tier3,
}

impl Tier {
    /// All tier variants for UI selection
    pub const ALL: [Tier; 3] = [Tier::Tier1, Tier::Tier2, Tier::Tier3];

    /// Wire-format code ("TIER_1", "TIER_2", "TIER_3")
    pub fn code(&self) -> &'static str {
        match self {
            Tier::Tier1 => "TIER_1",
            Tier::Tier2 => "TIER_2",
            Tier::Tier3 => "TIER_3",
        }
    }

    /// Tier number (1, 2 or 3)
    pub fn number(&self) -> u8 {
        match self {
            Tier::Tier1 => 1,
            Tier::Tier2 => 2,
            Tier::Tier3 => 3,
        }
    }

    /// Default uncertainty band for results produced at this tier, in percent
    pub fn uncertainty_percent(&self) -> f64 {
        match self {
            Tier::Tier1 => 150.0,
            Tier::Tier2 => 50.0,
            Tier::Tier3 => 15.0,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Tier::Tier1 => "Tier 1",
            Tier::Tier2 => "Tier 2",
            Tier::Tier3 => "Tier 3",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_uppercase().replace([' ', '-'], "_").as_str() {
            "TIER_1" | "T1" | "1" => Ok(Tier::Tier1),
            "TIER_2" | "T2" | "2" => Ok(Tier::Tier2),
            "TIER_3" | "T3" | "3" => Ok(Tier::Tier3),
            _ => Err(CalcError::invalid_input(
                "tier",
                s,
                "Unknown tier; expected TIER_1, TIER_2 or TIER_3",
            )),
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// GWP Table
// ============================================================================

/// Global Warming Potential entry: gas type to dimensionless multiplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GwpValue {
    /// The gas this multiplier applies to
    pub gas_type: GasType,
    /// CO2-equivalent multiplier (dimensionless)
    pub value: f64,
    /// IPCC assessment report the value is taken from
    pub assessment_report: String,
}

impl GwpValue {
    fn ar5(gas_type: GasType, value: f64) -> Self {
        Self {
            gas_type,
            value,
            assessment_report: "AR5".to_string(),
        }
    }
}

/// Fixed 7-entry GWP table, AR5 100-year values.
///
/// HFCs use HFC-134a as the family representative, PFCs use CF4.
pub static GWP_TABLE: Lazy<Vec<GwpValue>> = Lazy::new(|| {
    vec![
        GwpValue::ar5(GasType::Co2, 1.0),
        GwpValue::ar5(GasType::Ch4, 28.0),
        GwpValue::ar5(GasType::N2o, 265.0),
        GwpValue::ar5(GasType::Hfcs, 1430.0),
        GwpValue::ar5(GasType::Pfcs, 6630.0),
        GwpValue::ar5(GasType::Sf6, 23500.0),
        GwpValue::ar5(GasType::Nf3, 16100.0),
    ]
});

/// Look up the GWP entry for a gas type.
///
/// Pure map lookup; with the fixed 7-gas table this never misses, but the
/// `Option` return keeps the "not found" case explicit for callers.
pub fn lookup_gwp(gas_type: GasType) -> Option<&'static GwpValue> {
    GWP_TABLE.iter().find(|g| g.gas_type == gas_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gwp_table_is_complete() {
        for gas in GasType::ALL {
            assert!(lookup_gwp(gas).is_some(), "missing GWP for {gas}");
        }
        assert_eq!(GWP_TABLE.len(), 7);
    }

    #[test]
    fn test_ar5_values() {
        assert_eq!(lookup_gwp(GasType::Co2).unwrap().value, 1.0);
        assert_eq!(lookup_gwp(GasType::Ch4).unwrap().value, 28.0);
        assert_eq!(lookup_gwp(GasType::N2o).unwrap().value, 265.0);
        assert_eq!(lookup_gwp(GasType::Hfcs).unwrap().value, 1430.0);
        assert_eq!(lookup_gwp(GasType::Pfcs).unwrap().value, 6630.0);
        assert_eq!(lookup_gwp(GasType::Sf6).unwrap().value, 23500.0);
        assert_eq!(lookup_gwp(GasType::Nf3).unwrap().value, 16100.0);
    }

    #[test]
    fn test_tier_uncertainty_is_monotonic() {
        assert!(Tier::Tier3.uncertainty_percent() < Tier::Tier2.uncertainty_percent());
        assert!(Tier::Tier2.uncertainty_percent() < Tier::Tier1.uncertainty_percent());
    }

    #[test]
    fn test_serde_wire_names() {
        assert_eq!(serde_json::to_string(&GasType::N2o).unwrap(), "\"N2O\"");
        assert_eq!(serde_json::to_string(&Tier::Tier2).unwrap(), "\"TIER_2\"");
        let tier: Tier = serde_json::from_str("\"TIER_3\"").unwrap();
        assert_eq!(tier, Tier::Tier3);
    }

    #[test]
    fn test_flexible_parsing() {
        assert_eq!(GasType::from_str_flexible("ch4").unwrap(), GasType::Ch4);
        assert_eq!(GasType::from_str_flexible("Methane").unwrap(), GasType::Ch4);
        assert_eq!(Tier::from_str_flexible("tier 2").unwrap(), Tier::Tier2);
        assert!(GasType::from_str_flexible("ozone").is_err());
    }
}

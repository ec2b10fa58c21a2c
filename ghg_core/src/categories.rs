//! # Emission Categories
//!
//! IPCC 2006 reporting categories: hierarchical dotted codes (e.g.
//! `"1.A.1.a"`) grouped into sectors, plus the category-to-gas inference
//! table used when a calculation request does not pin a gas type.
//!
//! ## Example
//!
//! ```rust
//! use ghg_core::categories::{infer_gas_type, CategoryRegistry, Sector};
//! use ghg_core::gases::GasType;
//!
//! let registry = CategoryRegistry::with_defaults();
//! let cat = registry.lookup("1.A.1.a").unwrap();
//! assert_eq!(cat.sector, Sector::Energy);
//! assert_eq!(infer_gas_type("3.A.1"), GasType::Ch4);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::gases::GasType;

// ============================================================================
// Sectors
// ============================================================================

/// Top-level IPCC inventory sector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    /// Fuel combustion and fugitive emissions (codes 1.x)
    #[serde(rename = "ENERGY")]
    Energy,
    /// Industrial processes and product use (codes 2.x)
    #[serde(rename = "IPPU")]
    Ippu,
    /// Agriculture, forestry and other land use (codes 3.x)
    #[serde(rename = "AFOLU")]
    Afolu,
    /// Waste treatment and disposal (codes 4.x)
    #[serde(rename = "WASTE")]
    Waste,
    /// Anything outside the four main sectors
    #[serde(rename = "OTHER")]
    Other,
}

impl Sector {
    /// All sector variants for UI selection
    pub const ALL: [Sector; 5] = [
        Sector::Energy,
        Sector::Ippu,
        Sector::Afolu,
        Sector::Waste,
        Sector::Other,
    ];

    /// Infer the sector from the leading digit of a category code
    pub fn from_code(code: &str) -> Sector {
        match code.trim().chars().next() {
            Some('1') => Sector::Energy,
            Some('2') => Sector::Ippu,
            Some('3') => Sector::Afolu,
            Some('4') => Sector::Waste,
            _ => Sector::Other,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Sector::Energy => "Energy",
            Sector::Ippu => "Industrial Processes and Product Use",
            Sector::Afolu => "Agriculture, Forestry and Other Land Use",
            Sector::Waste => "Waste",
            Sector::Other => "Other",
        }
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Category Records
// ============================================================================

/// A single IPCC reporting category. Immutable reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionCategory {
    /// Hierarchical dotted code, e.g. "1.A.1.a"
    pub code: String,
    /// Human-readable category name
    pub name: String,
    /// Sector this category belongs to
    pub sector: Sector,
}

impl EmissionCategory {
    pub fn new(code: impl Into<String>, name: impl Into<String>, sector: Sector) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            sector,
        }
    }
}

// ============================================================================
// Category Registry
// ============================================================================

/// Read-only container for category reference data.
///
/// Loaded once at process start; the engine never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRegistry {
    categories: Vec<EmissionCategory>,
}

impl CategoryRegistry {
    /// Build a registry from caller-supplied records
    pub fn from_categories(categories: Vec<EmissionCategory>) -> Self {
        Self { categories }
    }

    /// Build a registry from a JSON array of category records
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let categories: Vec<EmissionCategory> = serde_json::from_str(json)?;
        Ok(Self { categories })
    }

    /// Registry with the embedded IPCC 2006 category list
    pub fn with_defaults() -> Self {
        Self {
            categories: default_categories(),
        }
    }

    /// All categories, in declaration order
    pub fn categories(&self) -> &[EmissionCategory] {
        &self.categories
    }

    /// Exact-code lookup
    pub fn lookup(&self, code: &str) -> Option<&EmissionCategory> {
        let code = code.trim();
        self.categories.iter().find(|c| c.code == code)
    }

    /// Sector for a category code.
    ///
    /// Prefers the registered record; unknown codes fall back to inference
    /// from the leading digit so well-formed codes still route correctly.
    pub fn sector_for(&self, code: &str) -> Sector {
        self.lookup(code)
            .map(|c| c.sector)
            .unwrap_or_else(|| Sector::from_code(code))
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Embedded IPCC 2006 category list covering the sectors the default
/// factor dataset serves.
fn default_categories() -> Vec<EmissionCategory> {
    use Sector::*;
    vec![
        EmissionCategory::new("1.A", "Fuel Combustion Activities", Energy),
        EmissionCategory::new("1.A.1", "Energy Industries", Energy),
        EmissionCategory::new("1.A.1.a", "Main Activity Electricity and Heat Production", Energy),
        EmissionCategory::new("1.A.2", "Manufacturing Industries and Construction", Energy),
        EmissionCategory::new("1.A.3", "Transport", Energy),
        EmissionCategory::new("1.A.3.a", "Civil Aviation", Energy),
        EmissionCategory::new("1.A.3.b", "Road Transportation", Energy),
        EmissionCategory::new("1.A.4", "Other Sectors", Energy),
        EmissionCategory::new("1.B", "Fugitive Emissions from Fuels", Energy),
        EmissionCategory::new("2.A", "Mineral Industry", Ippu),
        EmissionCategory::new("2.A.1", "Cement Production", Ippu),
        EmissionCategory::new("2.A.2", "Lime Production", Ippu),
        EmissionCategory::new("2.A.3", "Glass Production", Ippu),
        EmissionCategory::new("3.A", "Livestock", Afolu),
        EmissionCategory::new("3.A.1", "Enteric Fermentation", Afolu),
        EmissionCategory::new("3.A.2", "Manure Management", Afolu),
        EmissionCategory::new("3.C", "Aggregate Sources and Non-CO2 Emissions on Land", Afolu),
        EmissionCategory::new("3.C.4", "Direct N2O Emissions from Managed Soils", Afolu),
        EmissionCategory::new("3.C.5", "Indirect N2O Emissions from Managed Soils", Afolu),
        EmissionCategory::new("4.A", "Solid Waste Disposal", Waste),
        EmissionCategory::new("4.B", "Biological Treatment of Solid Waste", Waste),
        EmissionCategory::new("4.D", "Wastewater Treatment and Discharge", Waste),
    ]
}

// ============================================================================
// Gas Inference
// ============================================================================

/// Category-prefix to default gas mapping, checked in declaration order.
/// Longer prefixes come first so `3.C.4` wins over `3.C`.
const GAS_INFERENCE: &[(&str, GasType)] = &[
    ("3.C.4", GasType::N2o),
    ("3.C.5", GasType::N2o),
    ("3.A", GasType::Ch4),
    ("4.A", GasType::Ch4),
    ("4.B", GasType::Ch4),
    ("4.D", GasType::N2o),
    ("1.A", GasType::Co2),
    ("1.B", GasType::Co2),
];

/// Infer the default gas type for a category code.
///
/// Combustion categories default to CO2, livestock and solid waste to CH4,
/// managed soils and wastewater to N2O. Unlisted prefixes default to CO2.
pub fn infer_gas_type(category_code: &str) -> GasType {
    let code = category_code.trim();
    GAS_INFERENCE
        .iter()
        .find(|(prefix, _)| code.starts_with(prefix))
        .map(|(_, gas)| *gas)
        .unwrap_or(GasType::Co2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_from_code() {
        assert_eq!(Sector::from_code("1.A.1.a"), Sector::Energy);
        assert_eq!(Sector::from_code("2.A"), Sector::Ippu);
        assert_eq!(Sector::from_code("3.C.4"), Sector::Afolu);
        assert_eq!(Sector::from_code("4.D"), Sector::Waste);
        assert_eq!(Sector::from_code("9.X"), Sector::Other);
    }

    #[test]
    fn test_registry_lookup() {
        let registry = CategoryRegistry::with_defaults();
        assert_eq!(registry.lookup("1.A.1.a").unwrap().sector, Sector::Energy);
        assert!(registry.lookup("8.Z.9").is_none());
        // unknown but well-formed codes still get a sector
        assert_eq!(registry.sector_for("4.C"), Sector::Waste);
    }

    #[test]
    fn test_gas_inference() {
        assert_eq!(infer_gas_type("1.A.1.a"), GasType::Co2);
        assert_eq!(infer_gas_type("1.B.2"), GasType::Co2);
        assert_eq!(infer_gas_type("3.A.1"), GasType::Ch4);
        assert_eq!(infer_gas_type("3.C.4"), GasType::N2o);
        assert_eq!(infer_gas_type("3.C.5"), GasType::N2o);
        assert_eq!(infer_gas_type("4.A"), GasType::Ch4);
        assert_eq!(infer_gas_type("4.B.1"), GasType::Ch4);
        assert_eq!(infer_gas_type("4.D"), GasType::N2o);
        // unlisted prefixes default to CO2
        assert_eq!(infer_gas_type("2.A.1"), GasType::Co2);
    }

    #[test]
    fn test_registry_from_json() {
        let json = r#"[{"code":"1.A","name":"Fuel Combustion","sector":"ENERGY"}]"#;
        let registry = CategoryRegistry::from_json(json).unwrap();
        assert_eq!(registry.categories().len(), 1);
        assert_eq!(registry.lookup("1.A").unwrap().sector, Sector::Energy);
    }
}

//! # ghg_core - Greenhouse-Gas Emission Calculation Engine
//!
//! `ghg_core` computes greenhouse-gas emissions from activity data using the
//! IPCC tiered methodology, with a clean, LLM-friendly API. All inputs and
//! outputs are JSON-serializable, making it ideal for integration with AI
//! assistants via MCP or similar protocols.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Deterministic**: Identical input always yields an identical result
//!
//! ## Quick Start
//!
//! ```rust
//! use ghg_core::{CalculationRequest, EmissionEngine, Tier};
//!
//! let engine = EmissionEngine::with_defaults();
//!
//! let request = CalculationRequest {
//!     activity_value: 1000.0,
//!     activity_unit: "GJ".to_string(),
//!     category_code: "1.A.1.a".to_string(),
//!     tier: Tier::Tier1,
//!     gas_type: None,
//!     activity_name: Some("Coal power plant".to_string()),
//! };
//!
//! let result = engine.calculate(&request).unwrap();
//! assert!(result.co2_equivalent_kg > 0.0);
//!
//! // Serialize to JSON for storage or transmission
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - The tier calculation engine and result validation
//! - [`selection`] - Category-aware emission factor selection
//! - [`factors`] - Emission factor records, compound units, and the factor database
//! - [`gases`] - Gas types, tiers, and global warming potential values
//! - [`categories`] - IPCC category codes, sectors, and gas inference
//! - [`units`] - Unit normalization, compatibility, and conversion
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod categories;
pub mod errors;
pub mod factors;
pub mod gases;
pub mod selection;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{
    CalculationDetails, CalculationMethod, CalculationRequest, CalculationResult, EmissionEngine,
    validate_result,
};
pub use categories::{CategoryRegistry, EmissionCategory, Sector};
pub use errors::{CalcError, CalcResult};
pub use factors::{EmissionFactor, FactorDatabase, FactorUnit};
pub use gases::{GasType, GwpValue, Tier, lookup_gwp};
pub use selection::EmissionFactorSelector;

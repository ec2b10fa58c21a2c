//! # Emission Calculations
//!
//! The tier calculation engine and the result plausibility validator.
//!
//! ## Modules
//!
//! - [`tier`] - Tier 1/2/3 calculation formulas and the [`tier::EmissionEngine`] facade
//! - [`validate`] - advisory sector/category plausibility checks

pub mod tier;
pub mod validate;

pub use tier::{
    CalculationDetails, CalculationMethod, CalculationRequest, CalculationResult, EmissionEngine,
};
pub use validate::validate_result;

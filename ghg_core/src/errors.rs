//! # Error Types
//!
//! Structured error types for ghg_core. These errors are designed to be
//! informative for both humans and LLMs, carrying enough context (unit
//! strings, category codes, tier labels) to render a user-facing message
//! or handle the failure programmatically.
//!
//! ## Example
//!
//! ```rust
//! use ghg_core::errors::{CalcError, CalcResult};
//!
//! fn validate_activity(value: f64) -> CalcResult<()> {
//!     if value < 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "activity_value".to_string(),
//!             value: value.to_string(),
//!             reason: "Activity value must be non-negative".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gases::{GasType, Tier};

/// Result type alias for ghg_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for emission calculation operations.
///
/// Every variant is caller-recoverable; none of them is expected to crash
/// the process. Each carries the specific context needed to understand
/// what went wrong.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (negative quantity, empty unit, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The unit converter has no rule bridging the two units
    #[error("Unsupported unit conversion: '{from_unit}' -> '{to_unit}'")]
    UnsupportedConversion { from_unit: String, to_unit: String },

    /// The factor selector exhausted all narrowing and fallback rules
    #[error("No emission factor found for category '{category_code}', {tier}, {gas_type}")]
    NoFactorFound {
        category_code: String,
        tier: Tier,
        gas_type: GasType,
    },

    /// Requested gas type is absent from the GWP table (defensive check)
    #[error("No GWP value found for gas type {gas_type}")]
    NoGwpFound { gas_type: GasType },

    /// Conversion failed and no compatibility fallback applied
    #[error("Unit mismatch: activity unit '{activity_unit}' is incompatible with factor unit '{factor_unit}'")]
    UnitMismatch {
        activity_unit: String,
        factor_unit: String,
    },

    /// Fatal defect signal: a computed emission came out negative
    #[error("Negative emission computed: {emission_kg} kg")]
    NegativeEmission { emission_kg: f64 },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnsupportedConversion error
    pub fn unsupported_conversion(from_unit: impl Into<String>, to_unit: impl Into<String>) -> Self {
        CalcError::UnsupportedConversion {
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
        }
    }

    /// Create a NoFactorFound error
    pub fn no_factor_found(category_code: impl Into<String>, tier: Tier, gas_type: GasType) -> Self {
        CalcError::NoFactorFound {
            category_code: category_code.into(),
            tier,
            gas_type,
        }
    }

    /// Create a UnitMismatch error
    pub fn unit_mismatch(activity_unit: impl Into<String>, factor_unit: impl Into<String>) -> Self {
        CalcError::UnitMismatch {
            activity_unit: activity_unit.into(),
            factor_unit: factor_unit.into(),
        }
    }

    /// Check if this error can be resolved by the caller's direct-use
    /// fallback policy (see the tier calculator's unit reconciliation)
    pub fn is_conversion_failure(&self) -> bool {
        matches!(self, CalcError::UnsupportedConversion { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::UnsupportedConversion { .. } => "UNSUPPORTED_CONVERSION",
            CalcError::NoFactorFound { .. } => "NO_FACTOR_FOUND",
            CalcError::NoGwpFound { .. } => "NO_GWP_FOUND",
            CalcError::UnitMismatch { .. } => "UNIT_MISMATCH",
            CalcError::NegativeEmission { .. } => "NEGATIVE_EMISSION",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::unsupported_conversion("kwh", "kg");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CalcError::unit_mismatch("liter", "kg_CO2/GJ").error_code(),
            "UNIT_MISMATCH"
        );
        assert_eq!(
            CalcError::no_factor_found("9.Z", Tier::Tier1, GasType::Sf6).error_code(),
            "NO_FACTOR_FOUND"
        );
    }

    #[test]
    fn test_conversion_failure_check() {
        assert!(CalcError::unsupported_conversion("gj", "ton").is_conversion_failure());
        assert!(!CalcError::NegativeEmission { emission_kg: -1.0 }.is_conversion_failure());
    }

    #[test]
    fn test_display_carries_context() {
        let msg = CalcError::no_factor_found("1.A.1.a", Tier::Tier3, GasType::N2o).to_string();
        assert!(msg.contains("1.A.1.a"));
        assert!(msg.contains("Tier 3"));
        assert!(msg.contains("N2O"));
    }
}

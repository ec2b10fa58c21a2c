//! # Unit Conversion
//!
//! Normalizes and converts physical quantities between the mass, volume and
//! energy units that appear in emission-factor tables. The conversion table
//! is deliberately small and fixed: these are the bridges the factor dataset
//! actually needs, not a general units library.
//!
//! Two rules make factor units workable in practice:
//!
//! - *Qualifier suffixes* (`_N`, `_BOD`, `_clinker`, ...) document what is
//!   being measured, not a different physical unit. `kg` and `kg_N` convert
//!   freely into each other.
//! - *Compound factor units* like `"kg_CO2/GJ"` carry the gas in the
//!   numerator; [`extract_base_unit`] recovers the physical unit the
//!   activity value must be expressed in before multiplying by the factor.
//!
//! ## Example
//!
//! ```rust
//! use ghg_core::units::{convert, extract_base_unit};
//!
//! assert_eq!(convert(2.0, "ton", "kg", None).unwrap(), 2000.0);
//! assert_eq!(extract_base_unit("kg_CO2/GJ"), "gj");
//! ```

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Conversion Constants
// ============================================================================

/// Liters per ton of liquid fuel. An average-density approximation
/// (~0.83 kg/l); not a high-precision value for any specific fuel.
pub const LITERS_PER_TON: f64 = 1200.0;

/// kWh of energy per m3 of natural gas. Approximation for pipeline-quality
/// natural gas; inaccurate for other gaseous fuels.
pub const KWH_PER_M3: f64 = 10.5;

/// Qualifier suffixes that document the measured substance without changing
/// the physical unit
const QUALIFIER_SUFFIXES: &[&str] = &[
    "_n", "_bod", "_charge", "_nh3", "_steel", "_clinker", "_lime",
];

/// Gas tokens that may prefix a factor-unit denominator
const GAS_TOKENS: &[&str] = &["co2", "ch4", "n2o", "hfc", "pfc", "sf6", "nf3"];

// ============================================================================
// Normalization
// ============================================================================

/// Normalize a unit string: trim, lowercase, and collapse common aliases
pub fn normalize_unit(unit: &str) -> String {
    let lower = unit.trim().to_lowercase();
    match lower.as_str() {
        "l" | "litre" | "liters" | "litres" => "liter".to_string(),
        "t" | "tonne" | "tonnes" | "tons" => "ton".to_string(),
        "m^3" | "m\u{b3}" => "m3".to_string(),
        _ => lower,
    }
}

/// Strip a trailing qualifier suffix (`_N`, `_BOD`, ...), if present
pub fn strip_qualifier(unit: &str) -> &str {
    for suffix in QUALIFIER_SUFFIXES {
        if let Some(base) = unit.strip_suffix(suffix) {
            return base;
        }
    }
    unit
}

/// The qualifier suffix a unit string ends with, if any
pub fn qualifier_of(unit: &str) -> Option<&'static str> {
    QUALIFIER_SUFFIXES.iter().find(|s| unit.ends_with(**s)).copied()
}

/// Check whether a unit string ends in a known qualifier suffix
pub fn has_qualifier(unit: &str) -> bool {
    qualifier_of(unit).is_some()
}

/// Whether two unit strings denote the same physical unit, once normalized
/// and with qualifiers stripped
pub fn units_compatible(a: &str, b: &str) -> bool {
    let a = normalize_unit(a);
    let b = normalize_unit(b);
    a == b || strip_qualifier(&a) == strip_qualifier(&b)
}

// ============================================================================
// Conversion
// ============================================================================

/// Convert `value` from one unit to another.
///
/// `fuel_type_hint` disambiguates conversions whose meaning depends on the
/// fuel (ton to m3 for gaseous fuels). Fails with
/// [`CalcError::UnsupportedConversion`] when no rule bridges the pair;
/// callers may catch that and apply their own direct-use fallback.
pub fn convert(value: f64, from_unit: &str, to_unit: &str, fuel_type_hint: Option<&str>) -> CalcResult<f64> {
    let from = normalize_unit(from_unit);
    let to = normalize_unit(to_unit);
    if from == to {
        return Ok(value);
    }

    let from_base = strip_qualifier(&from);
    let to_base = strip_qualifier(&to);
    if from_base == to_base {
        return Ok(value);
    }

    let gaseous_fuel = fuel_type_hint
        .map(|hint| hint.to_lowercase().contains("gas"))
        .unwrap_or(false);

    let converted = match (from_base, to_base) {
        ("ton", "kg") => value * 1000.0,
        ("kg", "ton") => value / 1000.0,
        ("ton", "m3") => {
            // Kept as an explicit branch: density handling differs for
            // gaseous fuels even though the current ruleset uses the same
            // bulk approximation for both.
            if gaseous_fuel {
                value * 1000.0
            } else {
                value * 1000.0
            }
        }
        ("m3", "ton") => value / 1000.0,
        ("ton", "liter") => value * LITERS_PER_TON,
        ("liter", "ton") => value / LITERS_PER_TON,
        ("liter", "m3") => value / 1000.0,
        ("m3", "liter") => value * 1000.0,
        ("kwh", "m3") => value / KWH_PER_M3,
        ("m3", "kwh") => value * KWH_PER_M3,
        _ => {
            return Err(CalcError::unsupported_conversion(from_unit.trim(), to_unit.trim()));
        }
    };
    Ok(converted)
}

// ============================================================================
// Compound Factor Units
// ============================================================================

/// Extract the physical base unit from a compound factor unit.
///
/// Given `"kg_CO2/m3"` returns `"m3"`: the unit the activity value must be
/// expressed in before multiplying by the factor. The leading gas-name token
/// (optionally prefixed `kg_`/`ton_`) is stripped from the denominator, or
/// from the whole string when there is no `/`. Denominators ending in a
/// qualifier (`kg_N`, `kg_BOD`) are returned whole, unstripped.
pub fn extract_base_unit(compound_unit: &str) -> String {
    let unit = normalize_unit(compound_unit);
    let denominator = unit.split('/').nth(1).unwrap_or(&unit);
    if has_qualifier(denominator) {
        return denominator.to_string();
    }
    strip_gas_prefix(denominator)
}

/// Strip a leading `kg_`/`ton_` + gas-token prefix from a unit fragment.
/// Fragments without a gas token are returned unchanged.
fn strip_gas_prefix(fragment: &str) -> String {
    let rest = fragment
        .strip_prefix("kg_")
        .or_else(|| fragment.strip_prefix("ton_"))
        .unwrap_or(fragment);
    for gas in GAS_TOKENS {
        if rest == *gas {
            return String::new();
        }
        // token boundary must be '_' so "n2o" does not eat unrelated text
        if let Some(tail) = rest.strip_prefix(gas).and_then(|t| t.strip_prefix('_')) {
            return tail.to_string();
        }
    }
    fragment.to_string()
}

//! # Emission Factor Selection
//!
//! Picks the single best-matching factor for a category code, tier, gas
//! type, and optional free-text activity name.
//!
//! The category-specific heuristics live in a declarative rule table
//! ([`CATEGORY_RULES`]) rather than cascading conditionals: each rule names
//! its priority, the category prefix it covers, keyword keep/drop sets, and
//! any activity-name preferences. This keeps the ruleset inspectable and
//! testable rule-by-rule.
//!
//! Selection is deterministic. Ties resolve to the first matching factor in
//! dataset declaration order (legacy "first match wins"); rule order is
//! fixed by the explicit `priority` field.
//!
//! ## Algorithm
//!
//! 1. Candidate pool = factors matching gas type and tier exactly.
//! 2. Narrow by the highest-priority rule whose prefix matches the category
//!    code (keyword keep/drop filters, activity-name preferences,
//!    short-circuits).
//! 3. Non-empty narrowed pool: return its first element.
//! 4. Empty: fall back to the first factor matching gas + tier only, then
//!    `None`.

use crate::factors::EmissionFactor;
use crate::gases::{GasType, Tier};

// ============================================================================
// Rule Table Types
// ============================================================================

/// Activity-name driven preference within a rule.
///
/// When the request's activity name mentions any of `activity_any`, the
/// stages are tried in order against the kept pool; each stage is a set of
/// keywords that must all appear in the factor name. `cross_tier_fallback`
/// extends the last resort beyond the requested tier: first TIER_2 factors
/// of the same gas across all categories, then any tier.
#[derive(Debug, Clone, Copy)]
pub struct NamePreference {
    /// Activity-name keywords that trigger this preference
    pub activity_any: &'static [&'static str],
    /// Factor-name keyword stages, most specific first
    pub stages: &'static [&'static [&'static str]],
    /// Retry across tiers (TIER_2 first) when no stage matches at the
    /// requested tier
    pub cross_tier_fallback: bool,
}

/// Immediate-return rule that bypasses keyword narrowing entirely
#[derive(Debug, Clone, Copy)]
pub struct ShortCircuit {
    /// Tier the short-circuit applies at
    pub tier: Tier,
    /// Factor-name keywords, any of which triggers the return
    pub name_any: &'static [&'static str],
}

/// One category-specific selection rule
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    /// Evaluation priority; lower wins when several prefixes match
    pub priority: u8,
    /// Category-code prefix this rule covers
    pub prefix: &'static str,
    /// Require the code to equal the prefix exactly
    pub exact: bool,
    /// Code prefixes carved out of this rule's coverage
    pub exclude: &'static [&'static str],
    /// Restrict the rule to one gas type
    pub gas: Option<GasType>,
    /// Keywords that must all appear in a kept factor name
    pub keep_all: &'static [&'static str],
    /// Keywords of which at least one must appear in a kept factor name
    pub keep_any: &'static [&'static str],
    /// Relaxed keep set applied when the strict filter empties the pool
    pub relaxed_keep_any: &'static [&'static str],
    /// Keywords that disqualify a factor name
    pub drop_any: &'static [&'static str],
    /// Activity-name preferences, tried in order
    pub preferences: &'static [NamePreference],
    /// Optional immediate-return behavior
    pub short_circuit: Option<ShortCircuit>,
}

impl CategoryRule {
    fn matches(&self, category_code: &str, gas_type: GasType) -> bool {
        if let Some(gas) = self.gas {
            if gas != gas_type {
                return false;
            }
        }
        if self.exact {
            return category_code == self.prefix;
        }
        category_code.starts_with(self.prefix)
            && !self.exclude.iter().any(|ex| category_code.starts_with(ex))
    }
}

// ============================================================================
// Rule Table
// ============================================================================

/// Fuel preferences shared by the electricity/heat rules: "coal" in the
/// activity name prefers a coal power-generation factor, then any coal
/// factor; "gas"/"natural" prefers natural-gas factors with a cross-tier
/// fallback.
const POWER_FUEL_PREFERENCES: &[NamePreference] = &[
    NamePreference {
        activity_any: &["coal"],
        stages: &[&["coal", "power"], &["coal"]],
        cross_tier_fallback: false,
    },
    NamePreference {
        activity_any: &["gas", "natural"],
        stages: &[&["natural gas"]],
        cross_tier_fallback: true,
    },
];

/// The declarative category rule table, sorted by priority.
pub static CATEGORY_RULES: &[CategoryRule] = &[
    // 1.A.1.a: public electricity and heat production
    CategoryRule {
        priority: 10,
        prefix: "1.A.1.a",
        exact: false,
        exclude: &[],
        gas: None,
        keep_all: &[],
        keep_any: &["coal power", "natural gas combustion", "power generation"],
        relaxed_keep_any: &[],
        drop_any: &[],
        preferences: POWER_FUEL_PREFERENCES,
        short_circuit: None,
    },
    // 1.A.1 general (not .a): broader keep-set, same fuel preferences
    CategoryRule {
        priority: 20,
        prefix: "1.A.1",
        exact: false,
        exclude: &["1.A.1.a"],
        gas: None,
        keep_all: &[],
        keep_any: &["coal", "natural gas", "power generation", "residential", "industrial"],
        relaxed_keep_any: &[],
        drop_any: &[],
        preferences: POWER_FUEL_PREFERENCES,
        short_circuit: None,
    },
    // 1.A.2: manufacturing industries
    CategoryRule {
        priority: 30,
        prefix: "1.A.2",
        exact: false,
        exclude: &[],
        gas: None,
        keep_all: &[],
        keep_any: &["manufacturing", "industrial"],
        relaxed_keep_any: &[],
        drop_any: &[],
        preferences: &[],
        short_circuit: None,
    },
    // 1.A.3.a: civil aviation
    CategoryRule {
        priority: 40,
        prefix: "1.A.3.a",
        exact: false,
        exclude: &[],
        gas: None,
        keep_all: &[],
        keep_any: &["aviation", "jet fuel"],
        relaxed_keep_any: &[],
        drop_any: &[],
        preferences: &[],
        short_circuit: None,
    },
    // 1.A.3.b: road transportation
    CategoryRule {
        priority: 41,
        prefix: "1.A.3.b",
        exact: false,
        exclude: &[],
        gas: None,
        keep_all: &[],
        keep_any: &["road", "gasoline", "diesel"],
        relaxed_keep_any: &[],
        drop_any: &[],
        preferences: &[],
        short_circuit: None,
    },
    // 2.A: mineral industry
    CategoryRule {
        priority: 50,
        prefix: "2.A",
        exact: false,
        exclude: &[],
        gas: None,
        keep_all: &[],
        keep_any: &["cement", "lime", "glass"],
        relaxed_keep_any: &[],
        drop_any: &[],
        preferences: &[],
        short_circuit: None,
    },
    // 3.A: livestock
    CategoryRule {
        priority: 60,
        prefix: "3.A",
        exact: false,
        exclude: &[],
        gas: None,
        keep_all: &[],
        keep_any: &["enteric", "manure", "livestock"],
        relaxed_keep_any: &[],
        drop_any: &[],
        preferences: &[],
        short_circuit: None,
    },
    // 3.C.4 with N2O: strict Fertilizer+N2O filter, relaxed to any
    // Fertilizer factor when the strict filter empties the pool
    CategoryRule {
        priority: 70,
        prefix: "3.C.4",
        exact: true,
        exclude: &[],
        gas: Some(GasType::N2o),
        keep_all: &["fertilizer", "n2o"],
        keep_any: &[],
        relaxed_keep_any: &["fertilizer"],
        drop_any: &[],
        preferences: &[],
        short_circuit: None,
    },
    // other 3.C.* with N2O: soils-related names, excluding livestock and
    // wood-combustion factors
    CategoryRule {
        priority: 71,
        prefix: "3.C",
        exact: false,
        exclude: &["3.C.4"],
        gas: Some(GasType::N2o),
        keep_all: &[],
        keep_any: &["fertilizer", "n2o", "managed soil"],
        relaxed_keep_any: &[],
        drop_any: &["manure", "cattle", "livestock", "wood"],
        preferences: &[],
        short_circuit: None,
    },
    // 4.A: solid waste disposal. At TIER_2 the first Paper/Cardboard factor
    // in the pool wins immediately, before keyword narrowing and without
    // consulting the activity name (legacy behavior, preserved).
    CategoryRule {
        priority: 80,
        prefix: "4.A",
        exact: false,
        exclude: &[],
        gas: None,
        keep_all: &[],
        keep_any: &["waste", "landfill", "municipal", "paper", "cardboard"],
        relaxed_keep_any: &[],
        drop_any: &[],
        preferences: &[],
        short_circuit: Some(ShortCircuit {
            tier: Tier::Tier2,
            name_any: &["paper", "cardboard"],
        }),
    },
];

// ============================================================================
// Selector
// ============================================================================

fn name_contains_any(name: &str, keywords: &[&str]) -> bool {
    let name = name.to_lowercase();
    keywords.iter().any(|kw| name.contains(kw))
}

fn name_contains_all(name: &str, keywords: &[&str]) -> bool {
    let name = name.to_lowercase();
    keywords.iter().all(|kw| name.contains(kw))
}

/// Deterministic factor selector over a fixed factor slice.
#[derive(Debug, Clone, Copy)]
pub struct EmissionFactorSelector<'a> {
    factors: &'a [EmissionFactor],
}

impl<'a> EmissionFactorSelector<'a> {
    pub fn new(factors: &'a [EmissionFactor]) -> Self {
        Self { factors }
    }

    /// Select the best-matching factor, or `None` when even the gas+tier
    /// fallback pool is empty. Never fails; the caller surfaces `None` as
    /// a `NoFactorFound` error with full context.
    pub fn select(
        &self,
        category_code: &str,
        tier: Tier,
        gas_type: GasType,
        activity_name: Option<&str>,
    ) -> Option<&'a EmissionFactor> {
        let category_code = category_code.trim();
        let pool: Vec<&EmissionFactor> = self
            .factors
            .iter()
            .filter(|f| f.gas_type == gas_type && f.tier == tier)
            .collect();

        let rule = CATEGORY_RULES
            .iter()
            .filter(|r| r.matches(category_code, gas_type))
            .min_by_key(|r| r.priority);

        if let Some(rule) = rule {
            if let Some(sc) = &rule.short_circuit {
                if tier == sc.tier {
                    if let Some(factor) = pool
                        .iter()
                        .find(|f| name_contains_any(&f.name, sc.name_any))
                        .copied()
                    {
                        return Some(factor);
                    }
                }
            }

            let kept = self.narrow(&pool, rule);

            if let Some(name) = activity_name {
                for pref in rule.preferences {
                    if !name_contains_any(name, pref.activity_any) {
                        continue;
                    }
                    for stage in pref.stages {
                        if let Some(factor) = kept
                            .iter()
                            .find(|f| name_contains_all(&f.name, stage))
                            .copied()
                        {
                            return Some(factor);
                        }
                    }
                    if pref.cross_tier_fallback {
                        if let Some(factor) = self.cross_tier_search(gas_type, pref.stages) {
                            return Some(factor);
                        }
                    }
                }
            }

            if let Some(first) = kept.first().copied() {
                return Some(first);
            }
        }

        // Fallback: any factor matching gas type + tier, ignoring category
        pool.first().copied()
    }

    /// Apply a rule's keep/drop keyword filters, with the relaxed keep set
    /// as a second pass when the strict filter empties the pool.
    fn narrow(&self, pool: &[&'a EmissionFactor], rule: &CategoryRule) -> Vec<&'a EmissionFactor> {
        let strict: Vec<&EmissionFactor> = pool
            .iter()
            .filter(|f| rule.keep_all.is_empty() || name_contains_all(&f.name, rule.keep_all))
            .filter(|f| rule.keep_any.is_empty() || name_contains_any(&f.name, rule.keep_any))
            .filter(|f| !name_contains_any(&f.name, rule.drop_any))
            .copied()
            .collect();
        if !strict.is_empty() || rule.relaxed_keep_any.is_empty() {
            return strict;
        }
        pool.iter()
            .filter(|f| name_contains_any(&f.name, rule.relaxed_keep_any))
            .filter(|f| !name_contains_any(&f.name, rule.drop_any))
            .copied()
            .collect()
    }

    /// Cross-tier preference fallback: TIER_2 factors of the gas first,
    /// then any tier, matched against the preference's keyword stages.
    fn cross_tier_search(
        &self,
        gas_type: GasType,
        stages: &[&[&str]],
    ) -> Option<&'a EmissionFactor> {
        for stage in stages {
            if let Some(factor) = self
                .factors
                .iter()
                .find(|f| f.gas_type == gas_type && f.tier == Tier::Tier2 && name_contains_all(&f.name, stage))
            {
                return Some(factor);
            }
        }
        for stage in stages {
            if let Some(factor) = self
                .factors
                .iter()
                .find(|f| f.gas_type == gas_type && name_contains_all(&f.name, stage))
            {
                return Some(factor);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::FactorDatabase;

    fn selector(db: &FactorDatabase) -> EmissionFactorSelector<'_> {
        EmissionFactorSelector::new(db.factors())
    }

    #[test]
    fn test_coal_preference_at_requested_tier() {
        let db = FactorDatabase::with_defaults();
        let factor = selector(&db)
            .select("1.A.1.a", Tier::Tier1, GasType::Co2, Some("Coal-fired plant"))
            .unwrap();
        assert_eq!(factor.name, "Coal Power Generation");
    }

    #[test]
    fn test_natural_gas_preference() {
        let db = FactorDatabase::with_defaults();
        let factor = selector(&db)
            .select("1.A.1.a", Tier::Tier2, GasType::Co2, Some("Natural gas turbine"))
            .unwrap();
        assert_eq!(factor.name, "Natural Gas Combustion (Country-Specific)");
    }

    #[test]
    fn test_natural_gas_cross_tier_fallback() {
        // no natural-gas factor exists at TIER_3; the preference falls back
        // to the TIER_2 factor across tiers
        let db = FactorDatabase::with_defaults();
        let factor = selector(&db)
            .select("1.A.1.a", Tier::Tier3, GasType::Co2, Some("gas boiler"))
            .unwrap();
        assert_eq!(factor.tier, Tier::Tier2);
        assert!(factor.name.contains("Natural Gas"));
    }

    #[test]
    fn test_broad_1a1_keep_set_includes_residential() {
        let db = FactorDatabase::with_defaults();
        let factor = selector(&db)
            .select("1.A.1", Tier::Tier1, GasType::Co2, Some("district heating"))
            .unwrap();
        // first kept factor in declaration order wins absent a preference hit
        assert_eq!(factor.name, "Coal Power Generation");
    }

    #[test]
    fn test_aviation_and_road_rules() {
        let db = FactorDatabase::with_defaults();
        let aviation = selector(&db)
            .select("1.A.3.a", Tier::Tier1, GasType::Co2, None)
            .unwrap();
        assert_eq!(aviation.name, "Aviation Jet Fuel Combustion");

        let road = selector(&db)
            .select("1.A.3.b", Tier::Tier1, GasType::Co2, None)
            .unwrap();
        assert_eq!(road.name, "Road Transport Gasoline");
    }

    #[test]
    fn test_minerals_rule() {
        let db = FactorDatabase::with_defaults();
        let factor = selector(&db)
            .select("2.A.2", Tier::Tier1, GasType::Co2, None)
            .unwrap();
        // cement is declared first among the kept mineral factors
        assert_eq!(factor.name, "Cement Production (Clinker)");
    }

    #[test]
    fn test_livestock_rule() {
        let db = FactorDatabase::with_defaults();
        let factor = selector(&db)
            .select("3.A.1", Tier::Tier1, GasType::Ch4, None)
            .unwrap();
        assert_eq!(factor.name, "Enteric Fermentation - Dairy Cattle");
    }

    #[test]
    fn test_fertilizer_strict_filter() {
        let db = FactorDatabase::with_defaults();
        let factor = selector(&db)
            .select("3.C.4", Tier::Tier1, GasType::N2o, None)
            .unwrap();
        assert_eq!(factor.name, "Synthetic Fertilizer N2O Direct");
    }

    #[test]
    fn test_fertilizer_relaxed_fallback() {
        // at TIER_3 the only fertilizer factor lacks "N2O" in its name, so
        // the strict filter empties and the relaxed pass applies
        let db = FactorDatabase::with_defaults();
        let factor = selector(&db)
            .select("3.C.4", Tier::Tier3, GasType::N2o, None)
            .unwrap();
        assert_eq!(factor.name, "Organic Fertilizer Application");
    }

    #[test]
    fn test_managed_soils_rule_excludes_livestock_and_wood() {
        let db = FactorDatabase::with_defaults();
        let factor = selector(&db)
            .select("3.C.5", Tier::Tier1, GasType::N2o, None)
            .unwrap();
        assert_eq!(factor.name, "Synthetic Fertilizer N2O Direct");

        let excluded = FactorDatabase::from_factors(vec![
            EmissionFactor::new("X1", "Manure Deposition N2O", GasType::N2o, Tier::Tier1, 0.02, "kg_N2O/kg_N"),
            EmissionFactor::new("X2", "Wood Combustion N2O", GasType::N2o, Tier::Tier1, 4.0, "kg_N2O/TJ"),
        ]);
        // both candidates are dropped; selection falls back to the raw
        // gas+tier pool per the legacy fallback
        let factor = selector(&excluded)
            .select("3.C.5", Tier::Tier1, GasType::N2o, None)
            .unwrap();
        assert_eq!(factor.id, "X1");
    }

    #[test]
    fn test_waste_tier2_short_circuit_ignores_activity_name() {
        let db = FactorDatabase::with_defaults();
        let factor = selector(&db)
            .select("4.A", Tier::Tier2, GasType::Ch4, Some("food waste"))
            .unwrap();
        // legacy short-circuit: Paper/Cardboard wins regardless of context
        assert_eq!(factor.name, "Paper/Cardboard Waste Decomposition");
    }

    #[test]
    fn test_waste_tier1_uses_normal_narrowing() {
        let db = FactorDatabase::with_defaults();
        let factor = selector(&db)
            .select("4.A", Tier::Tier1, GasType::Ch4, None)
            .unwrap();
        assert_eq!(factor.name, "Municipal Solid Waste Landfill");
    }

    #[test]
    fn test_unlisted_category_falls_back_to_gas_tier_pool() {
        let db = FactorDatabase::with_defaults();
        let factor = selector(&db)
            .select("5.B.9", Tier::Tier1, GasType::Ch4, None)
            .unwrap();
        assert_eq!(factor.gas_type, GasType::Ch4);
        assert_eq!(factor.tier, Tier::Tier1);
    }

    #[test]
    fn test_empty_pool_returns_none() {
        let db = FactorDatabase::with_defaults();
        assert!(selector(&db)
            .select("1.A.1.a", Tier::Tier3, GasType::Sf6, None)
            .is_none());
    }

    #[test]
    fn test_rule_table_priorities_are_unique_and_sorted() {
        let mut priorities: Vec<u8> = CATEGORY_RULES.iter().map(|r| r.priority).collect();
        let original = priorities.clone();
        priorities.sort_unstable();
        priorities.dedup();
        assert_eq!(priorities.len(), CATEGORY_RULES.len());
        assert_eq!(priorities, original);
    }

    #[test]
    fn test_determinism() {
        let db = FactorDatabase::with_defaults();
        let a = selector(&db).select("1.A.1.a", Tier::Tier1, GasType::Co2, Some("coal"));
        let b = selector(&db).select("1.A.1.a", Tier::Tier1, GasType::Co2, Some("coal"));
        assert_eq!(a.map(|f| &f.id), b.map(|f| &f.id));
    }
}

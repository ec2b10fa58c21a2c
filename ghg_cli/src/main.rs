//! # GHG CLI Application
//!
//! Terminal-based interface for greenhouse-gas emission calculations.
//! Prompts for activity data, runs the engine with the built-in factor
//! database, and prints the result both human-readably and as JSON.

use std::io::{self, BufRead, Write};

use ghg_core::{CalculationRequest, EmissionEngine, Tier, validate_result};

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn prompt_str(prompt: &str, default: &str) -> String {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default.to_string();
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default.to_string();
    }

    let trimmed = input.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

fn main() {
    println!("GHG CLI - Greenhouse-Gas Emission Calculator");
    println!("============================================");
    println!();

    let activity_value = prompt_f64("Enter activity value [1000.0]: ", 1000.0);
    let activity_unit = prompt_str("Enter activity unit [GJ]: ", "GJ");
    let category_code = prompt_str("Enter IPCC category code [1.A.1.a]: ", "1.A.1.a");
    let tier_input = prompt_str("Enter tier (1/2/3) [1]: ", "1");
    let activity_name = prompt_str("Enter activity description [Coal power plant]: ", "Coal power plant");

    let tier = Tier::from_str_flexible(&tier_input).unwrap_or(Tier::Tier1);

    println!();
    println!("Calculating {} emissions for category {}...", tier.display_name(), category_code);
    println!();

    let engine = EmissionEngine::with_defaults();
    let request = CalculationRequest {
        activity_value,
        activity_unit,
        category_code: category_code.clone(),
        tier,
        gas_type: None,
        activity_name: Some(activity_name),
    };

    match engine.calculate(&request) {
        Ok(result) => {
            let plausible = validate_result(&result, &category_code, engine.categories());

            println!("═══════════════════════════════════════");
            println!("  EMISSION CALCULATION RESULTS");
            println!("═══════════════════════════════════════");
            println!();
            println!("Input:");
            println!("  Activity: {} {}", request.activity_value, request.activity_unit);
            println!("  Category: {}", request.category_code);
            println!("  Tier:     {}", result.tier.display_name());
            println!();
            println!("Factor:");
            println!("  Name:  {}", result.factor.name);
            println!("  Value: {} {}", result.factor.value, result.factor.unit.raw());
            println!();
            println!("Result:");
            println!("  Gas:            {}", result.gas_type);
            println!("  Emission:       {:.3} kg", result.emission_kg);
            println!("  CO2-equivalent: {:.3} kg (GWP {})", result.co2_equivalent_kg, result.gwp.value);
            println!("  Uncertainty:    +/-{:.0}%", result.uncertainty_percent());
            println!("  Formula:        {}", result.details.formula);
            for note in &result.details.conversion_notes {
                println!("  Note:           {}", note);
            }
            for warning in &result.details.warnings {
                println!("  Warning:        {}", warning);
            }
            println!();
            println!("═══════════════════════════════════════");
            println!("  PLAUSIBILITY: {}", if plausible { "OK" } else { "REVIEW" });
            println!("═══════════════════════════════════════");

            println!();
            println!("JSON Output (for LLM/API use):");
            if let Ok(json) = serde_json::to_string_pretty(&result) {
                println!("{}", json);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
        }
    }
}

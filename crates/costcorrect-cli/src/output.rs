//! Output formatting module

use costcorrect_domain::BrickConstants;
use costcorrect_types::{BoqResult, OutputFormat, Result};

pub fn output_boq(output_format: OutputFormat, boq: &BoqResult) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(boq)?;
        println!("{}", content);
        return Ok(());
    }

    println!("\nBill of Quantities");
    println!("==================");
    println!("Plan:            {}", boq.filename);
    println!("Scale:           {}", boq.scale);
    println!("Wall height:     {} m", boq.wall_height_m);
    println!(
        "230 mm walls:    {} m ({} m²)",
        boq.walls_230mm_linear_m, boq.walls_230mm_area_sqm
    );
    println!(
        "110 mm walls:    {} m ({} m²)",
        boq.walls_110mm_linear_m, boq.walls_110mm_area_sqm
    );
    println!("Wastage:         {}%", boq.wastage_percent);

    println!();
    println!("{:<32} {:>10}  {:<7} {:>14}", "Item", "Quantity", "Unit", "Est. cost (R)");
    println!("{}", "-".repeat(66));
    for line in &boq.materials {
        let cost = line
            .estimated_cost
            .map(|c| format!("{:.2}", c))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<32} {:>10}  {:<7} {:>14}",
            line.item, line.quantity, line.unit, cost
        );
    }
    println!("{}", "-".repeat(66));

    println!("Total bricks:    {}", boq.total_bricks);
    if let Some(total) = boq.total_estimated_cost {
        println!("Estimated cost:  R {:.2}", total);
    }

    if let Some(ref note) = boq.confidence_note {
        println!("\nNotes:");
        println!("{}", note);
    }

    Ok(())
}

pub fn output_constants(output_format: OutputFormat, constants: &BrickConstants) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(constants)?);
    } else {
        println!("{}", constants);
    }
    Ok(())
}

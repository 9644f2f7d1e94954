//! Excel export of a Bill of Quantities

use costcorrect_types::{BoqResult, Error, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

fn excel_err(e: XlsxError) -> Error {
    Error::Excel(e.to_string())
}

/// Read a serialized BOQ (as printed by `--format json`)
pub fn load_boq_json(path: &Path) -> Result<BoqResult> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Export a BOQ to an Excel workbook with a summary and a materials sheet
pub fn export_to_excel(boq: &BoqResult, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, boq)?;

    let materials_sheet = workbook.add_worksheet();
    write_materials_sheet(materials_sheet, boq)?;

    workbook.save(output_path).map_err(excel_err)?;

    Ok(())
}

fn write_summary_sheet(sheet: &mut Worksheet, boq: &BoqResult) -> Result<()> {
    sheet.set_name("Summary").map_err(excel_err)?;

    let header_format = Format::new().set_bold();

    sheet
        .write_string_with_format(0, 0, "Bill of Quantities", &header_format)
        .map_err(excel_err)?;

    let text_rows = [("Plan:", boq.filename.as_str()), ("Scale:", boq.scale.as_str())];
    let mut row = 2;
    for (label, value) in text_rows {
        sheet.write_string(row, 0, label).map_err(excel_err)?;
        sheet.write_string(row, 1, value).map_err(excel_err)?;
        row += 1;
    }

    let number_rows = [
        ("Wall height (m):", boq.wall_height_m),
        ("230 mm walls (m):", boq.walls_230mm_linear_m),
        ("110 mm walls (m):", boq.walls_110mm_linear_m),
        ("230 mm wall area (m²):", boq.walls_230mm_area_sqm),
        ("110 mm wall area (m²):", boq.walls_110mm_area_sqm),
        ("Bricks 230 mm:", boq.bricks_230mm as f64),
        ("Bricks 110 mm:", boq.bricks_110mm as f64),
        ("Total bricks:", boq.total_bricks as f64),
        ("Cement bags:", boq.cement_bags),
        ("Sand (m³):", boq.sand_cubes),
        ("Wastage (%):", boq.wastage_percent),
    ];
    for (label, value) in number_rows {
        sheet.write_string(row, 0, label).map_err(excel_err)?;
        sheet.write_number(row, 1, value).map_err(excel_err)?;
        row += 1;
    }

    if let Some(total) = boq.total_estimated_cost {
        sheet
            .write_string_with_format(row, 0, "Total estimated cost (R):", &header_format)
            .map_err(excel_err)?;
        sheet.write_number(row, 1, total).map_err(excel_err)?;
        row += 1;
    }

    if let Some(ref note) = boq.confidence_note {
        row += 1;
        sheet.write_string(row, 0, "Notes:").map_err(excel_err)?;
        sheet.write_string(row, 1, note).map_err(excel_err)?;
    }

    sheet.set_column_width(0, 28).map_err(excel_err)?;
    sheet.set_column_width(1, 40).map_err(excel_err)?;

    Ok(())
}

fn write_materials_sheet(sheet: &mut Worksheet, boq: &BoqResult) -> Result<()> {
    sheet.set_name("Materials").map_err(excel_err)?;

    let header_format = Format::new().set_bold();
    let money_format = Format::new().set_num_format("#,##0.00");

    let headers = ["Item", "Quantity", "Unit", "Estimated Cost (R)"];
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(excel_err)?;
    }

    for (idx, line) in boq.materials.iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write_string(row, 0, &line.item).map_err(excel_err)?;
        sheet.write_number(row, 1, line.quantity).map_err(excel_err)?;
        sheet.write_string(row, 2, &line.unit).map_err(excel_err)?;
        if let Some(cost) = line.estimated_cost {
            sheet
                .write_number_with_format(row, 3, cost, &money_format)
                .map_err(excel_err)?;
        }
    }

    if let Some(total) = boq.total_estimated_cost {
        let row = (boq.materials.len() + 1) as u32;
        sheet
            .write_string_with_format(row, 0, "Total", &header_format)
            .map_err(excel_err)?;
        sheet
            .write_number_with_format(row, 3, total, &money_format)
            .map_err(excel_err)?;
    }

    sheet.set_column_width(0, 32).map_err(excel_err)?;
    sheet.set_column_width(1, 12).map_err(excel_err)?;
    sheet.set_column_width(2, 8).map_err(excel_err)?;
    sheet.set_column_width(3, 20).map_err(excel_err)?;

    Ok(())
}

//! Prompt for floor plan wall extraction
//!
//! The JSON template uses placeholders only, so the model has to measure
//! the drawing instead of echoing example numbers.

/// Instructions sent alongside the plan image
const PLAN_ANALYSIS_PROMPT: &str = r#"You are an expert quantity surveyor analysing a South African architectural floor plan.

Examine this drawing carefully and extract the following information. Return ONLY valid JSON, no markdown fences, no commentary.

{
  "scale": "<the drawing scale, e.g. '1:100'. If not visible, estimate from dimensions>",
  "walls_230mm_linear_m": <total linear meters of 230 mm (double-skin / cavity) walls>,
  "walls_110mm_linear_m": <total linear meters of 110 mm (single-skin) walls>,
  "confidence_note": "<any caveats or assumptions you made>"
}

Rules:
1. External / structural walls are typically 230 mm (double skin).
2. Internal partition walls are typically 110 mm (single skin).
3. Use the scale bar or stated scale to convert drawn lengths to real-world meters.
4. If a scale bar is present, use it. Otherwise, use any stated dimensions to infer the scale.
5. Sum ALL wall segments of each type across the entire drawing.
6. Return the JSON object only, no extra text.
"#;

/// Build the wall extraction prompt
pub fn build_plan_prompt() -> String {
    PLAN_ANALYSIS_PROMPT.to_string()
}

//! Reporting and output generation
//!
//! The engines keep full precision; this is the only place values are
//! rounded for display (3 decimals for annual rates, 2 for ratios).

use crate::interpret::Interpretation;
use crate::private::{PrivateRdParams, PrivateRdResults};
use crate::public::{PublicRdParams, PublicRdResults};
use crate::sensitivity::SensitivityTable;
use serde::{Deserialize, Serialize};

/// Complete calculator state for output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CalculationReport {
    pub private_params: PrivateRdParams,
    pub private_results: PrivateRdResults,
    pub private_interpretation: Interpretation,
    pub public_params: PublicRdParams,
    pub public_results: PublicRdResults,
    pub public_interpretation: Interpretation,
}

/// Worked private formula, e.g. `BCR = (3.5% + 54.2%) × 5.15`
///
/// The bracket holds the two terms of the social return: direct
/// productivity and technology spillover.
pub fn private_formula_line(results: &PrivateRdResults) -> String {
    format!(
        "BCR = ({:.1}% + {:.1}%) × {:.2}",
        results.direct_productivity * 100.0,
        results.spillover_gain * 100.0,
        results.multiplier
    )
}

/// Worked public formula, e.g. `BCR = (5.0% + 35.0%) × 5.15 + 0.50 × 2.97`
pub fn public_formula_line(params: &PublicRdParams, results: &PublicRdResults) -> String {
    format!(
        "BCR = ({:.1}% + {:.1}%) × {:.2} + {:.2} × {:.2}",
        params.direct_return * 100.0,
        params.spillover_return * 100.0,
        results.multiplier,
        params.leverage_ratio,
        results.private_bcr
    )
}

/// Render the private section as text
pub fn render_private_text(
    params: &PrivateRdParams,
    results: &PrivateRdResults,
    interpretation: &Interpretation,
) -> String {
    let mut output = String::new();

    output.push_str("Private R&D\n");
    output.push_str(&format!(
        "  Parameters: ψ₂ = {}, γ₁ = {}, i = {}, δ = {}\n",
        params.tech_spillover, params.product_rivalry, params.interest_rate, params.depreciation_rate
    ));
    output.push_str(&format!("  BCR = {:.2}\n", results.bcr));
    output.push_str("  Component breakdown:\n");
    push_row(&mut output, "Direct productivity gain", results.direct_productivity, 3);
    push_row(&mut output, "Business stealing", results.business_loss, 3);
    push_row(&mut output, "Technological diffusion", results.spillover_gain, 3);
    output.push_str("  Headline returns:\n");
    push_row(&mut output, "Total social return", results.social_return, 3);
    push_row(&mut output, "Private return", results.private_return, 3);
    push_row(&mut output, "Uncaptured public value", results.net_spillover, 3);
    push_row(&mut output, "Social-to-private ratio", results.ratio, 2);
    output.push_str(&format!("  {}\n", private_formula_line(results)));
    output.push_str(&format!("  Interpretation: {}\n", interpretation.text));

    output
}

/// Render the public section as text
pub fn render_public_text(
    params: &PublicRdParams,
    results: &PublicRdResults,
    interpretation: &Interpretation,
) -> String {
    let mut output = String::new();

    output.push_str("Public R&D\n");
    output.push_str(&format!(
        "  Parameters: ρ_direct = {}, λ = {}, ρ_spillover = {}, i = {}, δ = {}\n",
        params.direct_return,
        params.leverage_ratio,
        params.spillover_return,
        params.interest_rate,
        params.depreciation_rate
    ));
    output.push_str(&format!("  Total BCR = {:.2}\n", results.total_bcr));
    push_row(&mut output, "Public BCR", results.public_bcr, 2);
    push_row(&mut output, "Leverage component", results.leveraged_bcr, 2);
    push_row(&mut output, "Private BCR", results.private_bcr, 2);
    output.push_str(&format!("  {}\n", public_formula_line(params, results)));
    output.push_str(&format!("  Interpretation: {}\n", interpretation.text));

    output
}

/// Render the full report as text
pub fn render_text(report: &CalculationReport) -> String {
    let mut output = render_private_text(
        &report.private_params,
        &report.private_results,
        &report.private_interpretation,
    );
    output.push('\n');
    output.push_str(&render_public_text(
        &report.public_params,
        &report.public_results,
        &report.public_interpretation,
    ));
    output
}

/// Render the full report as JSON, full precision
///
/// Non-finite values have no JSON representation and serialize as `null`.
pub fn render_json(report: &CalculationReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

/// Render a sensitivity table as aligned text
pub fn render_sensitivity_text(table: &SensitivityTable) -> String {
    let mut output = String::new();
    output.push_str(&table.title);
    output.push('\n');
    if !table.description.is_empty() {
        output.push_str(&table.description);
        output.push('\n');
    }

    let row_width = table
        .row_headers
        .iter()
        .map(|h| h.chars().count())
        .chain(std::iter::once(table.row_axis.chars().count()))
        .max()
        .unwrap_or(0);
    let col_width = table
        .headers
        .iter()
        .map(|h| h.chars().count())
        .max()
        .unwrap_or(0)
        .max(6);

    output.push_str(&pad(&table.row_axis, row_width));
    for header in &table.headers {
        output.push_str("  ");
        output.push_str(&pad(header, col_width));
    }
    output.push('\n');

    for (row_header, row) in table.row_headers.iter().zip(&table.data) {
        output.push_str(&pad(row_header, row_width));
        for value in row {
            output.push_str("  ");
            output.push_str(&pad(&format!("{:.2}", value), col_width));
        }
        output.push('\n');
    }

    output
}

fn push_row(output: &mut String, label: &str, value: f64, decimals: usize) {
    output.push_str(&format!(
        "    {:<28} {:>8.*}\n",
        format!("{}:", label),
        decimals,
        value
    ));
}

/// Left-align to a display width counted in chars
fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}

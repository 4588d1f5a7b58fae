//! Capitalisation factor shared by the private and public engines
//!
//! Under geometric depreciation at rate δ and discounting at rate i, a
//! perpetual annual return rate ρ on one unit of R&D capital is worth
//! ρ · (1 + i) / (i + δ) in present value.

/// Capitalisation factor `(1 + i) / (i + δ)`
///
/// No guard at `i + δ == 0`: the result follows IEEE semantics
/// (`inf` or `NaN`), see [`is_singular`].
pub fn capitalisation_factor(interest_rate: f64, depreciation_rate: f64) -> f64 {
    (1.0 + interest_rate) / (interest_rate + depreciation_rate)
}

/// True when the factor's denominator vanishes
pub fn is_singular(interest_rate: f64, depreciation_rate: f64) -> bool {
    interest_rate + depreciation_rate == 0.0
}

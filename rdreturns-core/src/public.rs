//! Public R&D benefit-cost ratio
//!
//! Public R&D earns a direct return and a spillover return of its own, and
//! additionally leverages private R&D: each unit of public spend is assumed
//! to induce `leverage_ratio` units of private R&D, valued at the private
//! engine's BCR.

use crate::capital::capitalisation_factor;
use serde::{Deserialize, Serialize};

/// User-editable public R&D parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PublicRdParams {
    /// Direct return to public R&D (ρ_direct)
    pub direct_return: f64,
    /// Private R&D induced per unit of public R&D (λ)
    pub leverage_ratio: f64,
    /// Spillover return to public R&D (ρ_spillover)
    pub spillover_return: f64,
    pub interest_rate: f64,
    pub depreciation_rate: f64,
}

impl Default for PublicRdParams {
    fn default() -> Self {
        PublicRdParams {
            direct_return: 0.05,
            leverage_ratio: 0.5,
            spillover_return: 0.45,
            interest_rate: 0.055,
            depreciation_rate: 0.15,
        }
    }
}

/// Public R&D returns, including the leveraged private component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PublicRdResults {
    pub public_total_return: f64,
    pub multiplier: f64,
    pub public_bcr: f64,
    /// Private BCR the leverage component was valued at
    pub private_bcr: f64,
    pub leveraged_bcr: f64,
    pub total_bcr: f64,
}

/// Compute the public R&D BCR
///
/// `private_bcr` must be the current output of
/// [`compute_private_bcr`](crate::private::compute_private_bcr); this engine
/// knows nothing about private parameters.
///
/// Formula:
/// BCR_total = (ρ_direct + ρ_spillover) · (1 + i) / (i + δ) + λ · BCR_private
pub fn compute_public_bcr(params: &PublicRdParams, private_bcr: f64) -> PublicRdResults {
    let public_total_return = params.direct_return + params.spillover_return;
    let multiplier = capitalisation_factor(params.interest_rate, params.depreciation_rate);
    let public_bcr = public_total_return * multiplier;
    let leveraged_bcr = params.leverage_ratio * private_bcr;
    let total_bcr = public_bcr + leveraged_bcr;

    PublicRdResults {
        public_total_return,
        multiplier,
        public_bcr,
        private_bcr,
        leveraged_bcr,
        total_bcr,
    }
}

/// Editable public parameter fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicField {
    DirectReturn,
    LeverageRatio,
    SpilloverReturn,
    InterestRate,
    DepreciationRate,
}

impl PublicField {
    pub const ALL: [PublicField; 5] = [
        PublicField::DirectReturn,
        PublicField::LeverageRatio,
        PublicField::SpilloverReturn,
        PublicField::InterestRate,
        PublicField::DepreciationRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PublicField::DirectReturn => "direct_return",
            PublicField::LeverageRatio => "leverage_ratio",
            PublicField::SpilloverReturn => "spillover_return",
            PublicField::InterestRate => "interest_rate",
            PublicField::DepreciationRate => "depreciation_rate",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PublicField::DirectReturn => "Direct",
            PublicField::LeverageRatio => "Leverage",
            PublicField::SpilloverReturn => "Spillover",
            PublicField::InterestRate => "i",
            PublicField::DepreciationRate => "δ",
        }
    }

    pub fn hint_range(&self) -> (f64, f64) {
        match self {
            PublicField::DirectReturn | PublicField::SpilloverReturn => (0.0, 1.0),
            PublicField::LeverageRatio => (0.0, 2.0),
            PublicField::InterestRate => (0.0, 0.2),
            PublicField::DepreciationRate => (0.0, 0.5),
        }
    }

    pub fn get(&self, params: &PublicRdParams) -> f64 {
        match self {
            PublicField::DirectReturn => params.direct_return,
            PublicField::LeverageRatio => params.leverage_ratio,
            PublicField::SpilloverReturn => params.spillover_return,
            PublicField::InterestRate => params.interest_rate,
            PublicField::DepreciationRate => params.depreciation_rate,
        }
    }

    pub fn set(&self, params: &mut PublicRdParams, value: f64) {
        match self {
            PublicField::DirectReturn => params.direct_return = value,
            PublicField::LeverageRatio => params.leverage_ratio = value,
            PublicField::SpilloverReturn => params.spillover_return = value,
            PublicField::InterestRate => params.interest_rate = value,
            PublicField::DepreciationRate => params.depreciation_rate = value,
        }
    }
}

impl std::fmt::Display for PublicField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PublicField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").to_lowercase().as_str() {
            "direct_return" | "directreturn" => Ok(PublicField::DirectReturn),
            "leverage_ratio" | "leverageratio" => Ok(PublicField::LeverageRatio),
            "spillover_return" | "spilloverreturn" => Ok(PublicField::SpilloverReturn),
            "interest_rate" | "interestrate" => Ok(PublicField::InterestRate),
            "depreciation_rate" | "depreciationrate" => Ok(PublicField::DepreciationRate),
            _ => Err(format!(
                "Invalid public field: '{}'. Valid options: direct_return, leverage_ratio, spillover_return, interest_rate, depreciation_rate",
                s
            )),
        }
    }
}

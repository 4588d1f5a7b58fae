//! Private R&D benefit-cost ratio
//!
//! Three-channel spillover framework: the investing firm's own productivity
//! gain, technology spillovers to technologically close firms, and business
//! stealing from product market rivals. Returns are annual rates per unit of
//! R&D spend, capitalised with [`capitalisation_factor`].

use crate::capital::capitalisation_factor;
use serde::{Deserialize, Serialize};

/// Median output-to-R&D ratio (Y/G)
pub const OUTPUT_TO_RD_RATIO: f64 = 2.345;

/// Own-R&D output elasticity (ψ₁)
pub const OWN_RD_ELASTICITY: f64 = 0.015;

/// Share of the rivalry effect borne as business stealing (σ)
pub const BUSINESS_STEALING_WEIGHT: f64 = 0.5;

/// User-editable private R&D parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PrivateRdParams {
    /// Technology spillover elasticity (ψ₂)
    pub tech_spillover: f64,
    /// Product market rivalry elasticity (γ₁)
    pub product_rivalry: f64,
    /// Interest rate (i)
    pub interest_rate: f64,
    /// R&D capital depreciation rate (δ)
    pub depreciation_rate: f64,
}

impl Default for PrivateRdParams {
    /// Lucking, Bloom & Van Reenen (2019) preferred estimates
    fn default() -> Self {
        PrivateRdParams {
            tech_spillover: 0.231,
            product_rivalry: -0.086,
            interest_rate: 0.055,
            depreciation_rate: 0.15,
        }
    }
}

/// Decomposed private R&D returns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PrivateRdResults {
    pub direct_productivity: f64,
    pub spillover_gain: f64,
    pub business_loss: f64,
    /// What the investing firm captures
    pub private_return: f64,
    /// Total economic value
    pub social_return: f64,
    /// Spillovers net of business stealing, the value left uncaptured
    pub net_spillover: f64,
    /// Social-to-private return ratio, 0 when the private return is 0
    pub ratio: f64,
    pub multiplier: f64,
    pub bcr: f64,
}

/// Compute the private R&D BCR
///
/// Formula:
/// BCR = (Y/G · ψ₁ + Y/G · ψ₂) · (1 + i) / (i + δ)
///
/// Rivalry only enters through `business_loss`, which uses |γ₁|: a rival's
/// R&D is a cost whichever sign the elasticity is entered with.
pub fn compute_private_bcr(params: &PrivateRdParams) -> PrivateRdResults {
    let direct_productivity = OUTPUT_TO_RD_RATIO * OWN_RD_ELASTICITY;
    let spillover_gain = OUTPUT_TO_RD_RATIO * params.tech_spillover;
    let business_loss = OUTPUT_TO_RD_RATIO * BUSINESS_STEALING_WEIGHT * params.product_rivalry.abs();

    let private_return = direct_productivity + business_loss;
    let social_return = direct_productivity + spillover_gain;
    let net_spillover = spillover_gain - business_loss;

    let ratio = if private_return != 0.0 {
        social_return / private_return
    } else {
        0.0
    };

    let multiplier = capitalisation_factor(params.interest_rate, params.depreciation_rate);
    let bcr = social_return * multiplier;

    PrivateRdResults {
        direct_productivity,
        spillover_gain,
        business_loss,
        private_return,
        social_return,
        net_spillover,
        ratio,
        multiplier,
        bcr,
    }
}

/// Editable private parameter fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrivateField {
    TechSpillover,
    ProductRivalry,
    InterestRate,
    DepreciationRate,
}

impl PrivateField {
    pub const ALL: [PrivateField; 4] = [
        PrivateField::TechSpillover,
        PrivateField::ProductRivalry,
        PrivateField::InterestRate,
        PrivateField::DepreciationRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrivateField::TechSpillover => "tech_spillover",
            PrivateField::ProductRivalry => "product_rivalry",
            PrivateField::InterestRate => "interest_rate",
            PrivateField::DepreciationRate => "depreciation_rate",
        }
    }

    /// Short label used in table headers
    pub fn label(&self) -> &'static str {
        match self {
            PrivateField::TechSpillover => "Tech Ext",
            PrivateField::ProductRivalry => "Prod Ext",
            PrivateField::InterestRate => "i",
            PrivateField::DepreciationRate => "δ",
        }
    }

    /// Input range hint (min, max) shown next to the field
    pub fn hint_range(&self) -> (f64, f64) {
        match self {
            PrivateField::TechSpillover | PrivateField::ProductRivalry => (-1.0, 1.0),
            PrivateField::InterestRate => (0.0, 0.2),
            PrivateField::DepreciationRate => (0.0, 0.5),
        }
    }

    pub fn get(&self, params: &PrivateRdParams) -> f64 {
        match self {
            PrivateField::TechSpillover => params.tech_spillover,
            PrivateField::ProductRivalry => params.product_rivalry,
            PrivateField::InterestRate => params.interest_rate,
            PrivateField::DepreciationRate => params.depreciation_rate,
        }
    }

    pub fn set(&self, params: &mut PrivateRdParams, value: f64) {
        match self {
            PrivateField::TechSpillover => params.tech_spillover = value,
            PrivateField::ProductRivalry => params.product_rivalry = value,
            PrivateField::InterestRate => params.interest_rate = value,
            PrivateField::DepreciationRate => params.depreciation_rate = value,
        }
    }
}

impl std::fmt::Display for PrivateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PrivateField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").to_lowercase().as_str() {
            "tech_spillover" | "techspillover" => Ok(PrivateField::TechSpillover),
            "product_rivalry" | "productrivalry" => Ok(PrivateField::ProductRivalry),
            "interest_rate" | "interestrate" => Ok(PrivateField::InterestRate),
            "depreciation_rate" | "depreciationrate" => Ok(PrivateField::DepreciationRate),
            _ => Err(format!(
                "Invalid private field: '{}'. Valid options: tech_spillover, product_rivalry, interest_rate, depreciation_rate",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_default_scenario() {
        let r = compute_private_bcr(&PrivateRdParams::default());
        assert!(approx(r.direct_productivity, 0.035175, 1e-12));
        assert!(approx(r.spillover_gain, 0.541695, 1e-9));
        assert!(approx(r.business_loss, 0.100835, 1e-9));
        assert!(approx(r.social_return, 0.576870, 1e-9));
        assert!(approx(r.private_return, 0.136010, 1e-9));
        assert!(approx(r.net_spillover, 0.440860, 1e-9));
        assert!(approx(r.multiplier, 5.14634, 1e-5));
        assert!(approx(r.bcr, 2.9688, 1e-3), "bcr = {}", r.bcr);
    }

    #[test]
    fn test_bcr_is_social_return_times_multiplier() {
        let params = PrivateRdParams {
            tech_spillover: 0.1,
            product_rivalry: 0.2,
            interest_rate: 0.03,
            depreciation_rate: 0.2,
        };
        let r = compute_private_bcr(&params);
        assert_eq!(r.bcr, r.social_return * capitalisation_factor(0.03, 0.2));
    }

    #[test]
    fn test_zero_rivalry_leaves_only_direct_private_return() {
        let params = PrivateRdParams {
            product_rivalry: 0.0,
            ..Default::default()
        };
        let r = compute_private_bcr(&params);
        assert_eq!(r.business_loss, 0.0);
        assert_eq!(r.private_return, r.direct_productivity);
    }

    #[test]
    fn test_no_externalities_gives_unit_ratio() {
        let params = PrivateRdParams {
            tech_spillover: 0.0,
            product_rivalry: 0.0,
            ..Default::default()
        };
        let r = compute_private_bcr(&params);
        assert_eq!(r.social_return, r.private_return);
        assert_eq!(r.social_return, r.direct_productivity);
        assert_eq!(r.ratio, 1.0);
    }

    #[test]
    fn test_rivalry_sign_does_not_matter() {
        let neg = compute_private_bcr(&PrivateRdParams::default());
        let pos = compute_private_bcr(&PrivateRdParams {
            product_rivalry: 0.086,
            ..Default::default()
        });
        assert_eq!(neg.business_loss, pos.business_loss);
        assert_eq!(neg, pos);
    }

    #[test]
    fn test_singular_rates_propagate_infinity() {
        let r = compute_private_bcr(&PrivateRdParams {
            interest_rate: 0.0,
            depreciation_rate: 0.0,
            ..Default::default()
        });
        assert!(r.multiplier.is_infinite());
        assert!(r.bcr.is_infinite());
        // decomposition is unaffected
        assert!(approx(r.social_return, 0.576870, 1e-9));
    }

    #[test]
    fn test_field_roundtrip_by_name() {
        let mut params = PrivateRdParams::default();
        for field in PrivateField::ALL {
            field.set(&mut params, 0.42);
            assert_eq!(field.get(&params), 0.42);
            assert_eq!(field.as_str().parse::<PrivateField>().unwrap(), field);
        }
        assert_eq!("techSpillover".parse::<PrivateField>().unwrap(), PrivateField::TechSpillover);
        assert!("leverage_ratio".parse::<PrivateField>().is_err());
    }

    #[test]
    fn test_params_serialize_with_field_names() {
        let json = serde_json::to_value(PrivateRdParams::default()).unwrap();
        assert_eq!(json["tech_spillover"], 0.231);
        assert_eq!(json["depreciation_rate"], 0.15);
    }
}

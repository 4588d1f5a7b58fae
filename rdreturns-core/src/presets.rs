//! Literature-backed parameter presets
//!
//! A preset is a named partial parameter record. Applying one merges its
//! fields over the live parameters and leaves the rest untouched:
//! - **Private** presets set only the two elasticities (ψ₂, γ₁)
//! - **Public** presets fix all five public parameters

use crate::private::PrivateRdParams;
use crate::public::PublicRdParams;
use serde::{Deserialize, Serialize};

/// Partial private parameter record
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrivateOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_spillover: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_rivalry: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depreciation_rate: Option<f64>,
}

impl PrivateOverride {
    /// Shallow merge over `base`
    pub fn merge(&self, base: &PrivateRdParams) -> PrivateRdParams {
        PrivateRdParams {
            tech_spillover: self.tech_spillover.unwrap_or(base.tech_spillover),
            product_rivalry: self.product_rivalry.unwrap_or(base.product_rivalry),
            interest_rate: self.interest_rate.unwrap_or(base.interest_rate),
            depreciation_rate: self.depreciation_rate.unwrap_or(base.depreciation_rate),
        }
    }

    /// Set fields as (name, value) pairs
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        [
            ("tech_spillover", self.tech_spillover),
            ("product_rivalry", self.product_rivalry),
            ("interest_rate", self.interest_rate),
            ("depreciation_rate", self.depreciation_rate),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}

/// Partial public parameter record
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublicOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_return: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leverage_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spillover_return: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depreciation_rate: Option<f64>,
}

impl PublicOverride {
    pub fn merge(&self, base: &PublicRdParams) -> PublicRdParams {
        PublicRdParams {
            direct_return: self.direct_return.unwrap_or(base.direct_return),
            leverage_ratio: self.leverage_ratio.unwrap_or(base.leverage_ratio),
            spillover_return: self.spillover_return.unwrap_or(base.spillover_return),
            interest_rate: self.interest_rate.unwrap_or(base.interest_rate),
            depreciation_rate: self.depreciation_rate.unwrap_or(base.depreciation_rate),
        }
    }

    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        [
            ("direct_return", self.direct_return),
            ("leverage_ratio", self.leverage_ratio),
            ("spillover_return", self.spillover_return),
            ("interest_rate", self.interest_rate),
            ("depreciation_rate", self.depreciation_rate),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}

/// Private R&D scenario presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivatePreset {
    Conservative,
    Moderate,
    Optimistic,
    /// Lucking, Bloom & Van Reenen (2019), the default case
    Lucking,
}

impl PrivatePreset {
    pub const ALL: [PrivatePreset; 4] = [
        PrivatePreset::Conservative,
        PrivatePreset::Moderate,
        PrivatePreset::Optimistic,
        PrivatePreset::Lucking,
    ];

    /// Fields this preset overwrites
    pub fn overrides(self) -> PrivateOverride {
        let (tech_spillover, product_rivalry) = match self {
            PrivatePreset::Conservative => (0.15, -0.05),
            PrivatePreset::Moderate => (0.20, -0.07),
            PrivatePreset::Optimistic => (0.28, -0.03),
            PrivatePreset::Lucking => (0.231, -0.086),
        };
        PrivateOverride {
            tech_spillover: Some(tech_spillover),
            product_rivalry: Some(product_rivalry),
            ..Default::default()
        }
    }

    /// Merge this preset over `current`
    pub fn apply(self, current: &PrivateRdParams) -> PrivateRdParams {
        self.overrides().merge(current)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "conservative" => Some(PrivatePreset::Conservative),
            "moderate" => Some(PrivatePreset::Moderate),
            "optimistic" => Some(PrivatePreset::Optimistic),
            "lucking" | "lucking-et-al" => Some(PrivatePreset::Lucking),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PrivatePreset::Conservative => "conservative",
            PrivatePreset::Moderate => "moderate",
            PrivatePreset::Optimistic => "optimistic",
            PrivatePreset::Lucking => "lucking",
        }
    }

    /// Button label
    pub fn label(self) -> &'static str {
        match self {
            PrivatePreset::Conservative => "Conservative",
            PrivatePreset::Moderate => "Moderate",
            PrivatePreset::Optimistic => "Optimistic",
            PrivatePreset::Lucking => "Lucking et al.",
        }
    }
}

impl std::fmt::Display for PrivatePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PrivatePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrivatePreset::parse(s).ok_or_else(|| {
            format!(
                "Invalid private preset: '{}'. Valid options: conservative, moderate, optimistic, lucking",
                s
            )
        })
    }
}

/// Public R&D scenario presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicPreset {
    Conservative,
    /// Frontier Economics for UK DSIT (2024)
    Frontier,
    /// Fieldhouse & Mertens, US appropriations data
    Fieldhouse,
    /// OECD cross-country average
    Oecd,
}

impl PublicPreset {
    pub const ALL: [PublicPreset; 4] = [
        PublicPreset::Conservative,
        PublicPreset::Frontier,
        PublicPreset::Fieldhouse,
        PublicPreset::Oecd,
    ];

    pub fn overrides(self) -> PublicOverride {
        let (direct_return, leverage_ratio, spillover_return, interest_rate, depreciation_rate) =
            match self {
                PublicPreset::Conservative => (0.03, 0.3, 0.25, 0.055, 0.20),
                PublicPreset::Frontier => (0.05, 0.5, 0.35, 0.055, 0.15),
                PublicPreset::Fieldhouse => (0.10, 0.6, 0.80, 0.055, 0.15),
                PublicPreset::Oecd => (0.04, 0.4, 0.30, 0.055, 0.15),
            };
        PublicOverride {
            direct_return: Some(direct_return),
            leverage_ratio: Some(leverage_ratio),
            spillover_return: Some(spillover_return),
            interest_rate: Some(interest_rate),
            depreciation_rate: Some(depreciation_rate),
        }
    }

    pub fn apply(self, current: &PublicRdParams) -> PublicRdParams {
        self.overrides().merge(current)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "conservative" => Some(PublicPreset::Conservative),
            "frontier" | "frontier-economics" => Some(PublicPreset::Frontier),
            "fieldhouse" | "fieldhouse-mertens" => Some(PublicPreset::Fieldhouse),
            "oecd" => Some(PublicPreset::Oecd),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PublicPreset::Conservative => "conservative",
            PublicPreset::Frontier => "frontier",
            PublicPreset::Fieldhouse => "fieldhouse",
            PublicPreset::Oecd => "oecd",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PublicPreset::Conservative => "Conservative",
            PublicPreset::Frontier => "Frontier Economics",
            PublicPreset::Fieldhouse => "Fieldhouse-Mertens",
            PublicPreset::Oecd => "OECD Average",
        }
    }
}

impl std::fmt::Display for PublicPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PublicPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PublicPreset::parse(s).ok_or_else(|| {
            format!(
                "Invalid public preset: '{}'. Valid options: conservative, frontier, fieldhouse, oecd",
                s
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lucking_only_touches_elasticities() {
        let current = PrivateRdParams {
            tech_spillover: 0.9,
            product_rivalry: 0.4,
            interest_rate: 0.01,
            depreciation_rate: 0.33,
        };
        let applied = PrivatePreset::Lucking.apply(&current);
        assert_eq!(applied.tech_spillover, 0.231);
        assert_eq!(applied.product_rivalry, -0.086);
        assert_eq!(applied.interest_rate, 0.01);
        assert_eq!(applied.depreciation_rate, 0.33);
    }

    #[test]
    fn test_lucking_matches_defaults() {
        let defaults = PrivateRdParams::default();
        assert_eq!(PrivatePreset::Lucking.apply(&defaults), defaults);
    }

    #[test]
    fn test_private_preset_values() {
        let base = PrivateRdParams::default();
        let conservative = PrivatePreset::Conservative.apply(&base);
        assert_eq!((conservative.tech_spillover, conservative.product_rivalry), (0.15, -0.05));
        let moderate = PrivatePreset::Moderate.apply(&base);
        assert_eq!((moderate.tech_spillover, moderate.product_rivalry), (0.20, -0.07));
        let optimistic = PrivatePreset::Optimistic.apply(&base);
        assert_eq!((optimistic.tech_spillover, optimistic.product_rivalry), (0.28, -0.03));
    }

    #[test]
    fn test_public_presets_fix_every_field() {
        let wild = PublicRdParams {
            direct_return: 9.0,
            leverage_ratio: 9.0,
            spillover_return: 9.0,
            interest_rate: 9.0,
            depreciation_rate: 9.0,
        };
        for preset in PublicPreset::ALL {
            assert_eq!(preset.overrides().entries().len(), 5);
            assert_eq!(preset.apply(&wild), preset.apply(&PublicRdParams::default()));
        }
        let frontier = PublicPreset::Frontier.apply(&wild);
        assert_eq!(
            frontier,
            PublicRdParams {
                direct_return: 0.05,
                leverage_ratio: 0.5,
                spillover_return: 0.35,
                interest_rate: 0.055,
                depreciation_rate: 0.15,
            }
        );
        assert_eq!(PublicPreset::Conservative.apply(&wild).depreciation_rate, 0.20);
    }

    #[test]
    fn test_parse_and_display() {
        for preset in PrivatePreset::ALL {
            assert_eq!(preset.to_string().parse::<PrivatePreset>().unwrap(), preset);
        }
        for preset in PublicPreset::ALL {
            assert_eq!(preset.to_string().parse::<PublicPreset>().unwrap(), preset);
        }
        assert_eq!(PrivatePreset::parse("LUCKING"), Some(PrivatePreset::Lucking));
        assert!("frontier".parse::<PrivatePreset>().is_err());
        assert!("moderate".parse::<PublicPreset>().is_err());
    }

    #[test]
    fn test_override_merge_is_partial() {
        let overrides = PrivateOverride {
            interest_rate: Some(0.035),
            ..Default::default()
        };
        let merged = overrides.merge(&PrivateRdParams::default());
        assert_eq!(merged.interest_rate, 0.035);
        assert_eq!(merged.tech_spillover, 0.231);
        assert_eq!(overrides.entries(), vec![("interest_rate", 0.035)]);
    }

    #[test]
    fn test_override_rejects_unknown_fields() {
        let result: Result<PrivateOverride, _> = serde_json::from_str(r#"{"leverage_ratio": 1.0}"#);
        assert!(result.is_err());
    }
}

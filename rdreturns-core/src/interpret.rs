//! BCR interpretation bands
//!
//! A step function over the BCR with thresholds at 1, 2 and 3 (private) or
//! 4 (public). The severity tag only drives display colour.

use serde::{Deserialize, Serialize};

/// Which engine a BCR came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Perspective {
    Private,
    Public,
}

/// Severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Poor,      // < 1
    Modest,    // 1-2
    Good,      // 2-3 private, 2-4 public
    Excellent, // >= 3 private, >= 4 public
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Poor => "poor",
            Severity::Modest => "modest",
            Severity::Good => "good",
            Severity::Excellent => "excellent",
        }
    }
}

/// Descriptive text plus severity for a BCR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub text: String,
    pub severity: Severity,
}

/// Configurable band thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpretationThresholds {
    pub modest: f64,
    pub good: f64,
    pub private_excellent: f64,
    pub public_excellent: f64,
}

impl Default for InterpretationThresholds {
    fn default() -> Self {
        InterpretationThresholds {
            modest: 1.0,
            good: 2.0,
            private_excellent: 3.0,
            public_excellent: 4.0,
        }
    }
}

impl InterpretationThresholds {
    pub fn excellent(&self, perspective: Perspective) -> f64 {
        match perspective {
            Perspective::Private => self.private_excellent,
            Perspective::Public => self.public_excellent,
        }
    }
}

/// Classify a BCR with default thresholds
pub fn classify(bcr: f64, perspective: Perspective) -> Interpretation {
    classify_with_thresholds(bcr, perspective, &InterpretationThresholds::default())
}

/// Classify a BCR with custom thresholds
///
/// NaN fails every comparison and lands in the top band.
pub fn classify_with_thresholds(
    bcr: f64,
    perspective: Perspective,
    thresholds: &InterpretationThresholds,
) -> Interpretation {
    let severity = assign_severity(bcr, perspective, thresholds);
    Interpretation {
        text: band_text(severity, perspective, thresholds),
        severity,
    }
}

fn assign_severity(
    bcr: f64,
    perspective: Perspective,
    thresholds: &InterpretationThresholds,
) -> Severity {
    if bcr < thresholds.modest {
        Severity::Poor
    } else if bcr < thresholds.good {
        Severity::Modest
    } else if bcr < thresholds.excellent(perspective) {
        Severity::Good
    } else {
        Severity::Excellent
    }
}

fn band_text(
    severity: Severity,
    perspective: Perspective,
    thresholds: &InterpretationThresholds,
) -> String {
    let t = thresholds;
    let top = fmt_threshold(t.excellent(perspective));
    let public_word = match perspective {
        Perspective::Private => "",
        Perspective::Public => "public ",
    };
    match severity {
        Severity::Poor => format!(
            "BCR < {}: Investment does not cover costs from social perspective",
            fmt_threshold(t.modest)
        ),
        Severity::Modest => format!(
            "BCR {}-{}: Modest positive returns, may be worthwhile depending on policy context",
            fmt_threshold(t.modest),
            fmt_threshold(t.good)
        ),
        Severity::Good => format!(
            "BCR {}-{}: Good returns, strong case for {}investment",
            fmt_threshold(t.good),
            top,
            public_word
        ),
        Severity::Excellent => format!(
            "BCR > {}: Excellent returns, very strong case for {}investment",
            top, public_word
        ),
    }
}

/// Whole numbers print without a fraction ("3", not "3.0")
fn fmt_threshold(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

//! Calculator session state
//!
//! Owns both parameter records and the results derived from them. Every
//! mutation recomputes synchronously, private engine first, so the public
//! results always lever the current private BCR.

use crate::capital::is_singular;
use crate::input::parse_numeric_input;
use crate::interpret::{classify_with_thresholds, Interpretation, InterpretationThresholds, Perspective};
use crate::presets::{PrivatePreset, PublicPreset};
use crate::private::{compute_private_bcr, PrivateField, PrivateRdParams, PrivateRdResults};
use crate::public::{compute_public_bcr, PublicField, PublicRdParams, PublicRdResults};
use crate::report::CalculationReport;
use tracing::{debug, warn};

/// Both result records, as returned by every mutator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Results {
    pub private: PrivateRdResults,
    pub public: PublicRdResults,
}

#[derive(Debug, Clone)]
pub struct Calculator {
    private_params: PrivateRdParams,
    public_params: PublicRdParams,
    thresholds: InterpretationThresholds,
    results: Results,
}

impl Default for Calculator {
    fn default() -> Self {
        Calculator::new(PrivateRdParams::default(), PublicRdParams::default())
    }
}

impl Calculator {
    pub fn new(private_params: PrivateRdParams, public_params: PublicRdParams) -> Self {
        Calculator::with_thresholds(
            private_params,
            public_params,
            InterpretationThresholds::default(),
        )
    }

    pub fn with_thresholds(
        private_params: PrivateRdParams,
        public_params: PublicRdParams,
        thresholds: InterpretationThresholds,
    ) -> Self {
        let results = compute_all(&private_params, &public_params);
        Calculator {
            private_params,
            public_params,
            thresholds,
            results,
        }
    }

    pub fn private_params(&self) -> &PrivateRdParams {
        &self.private_params
    }

    pub fn public_params(&self) -> &PublicRdParams {
        &self.public_params
    }

    pub fn private_results(&self) -> &PrivateRdResults {
        &self.results.private
    }

    pub fn public_results(&self) -> &PublicRdResults {
        &self.results.public
    }

    pub fn results(&self) -> Results {
        self.results
    }

    pub fn set_private(&mut self, field: PrivateField, value: f64) -> Results {
        field.set(&mut self.private_params, value);
        self.recompute()
    }

    pub fn set_public(&mut self, field: PublicField, value: f64) -> Results {
        field.set(&mut self.public_params, value);
        self.recompute()
    }

    /// Field edit from text; unparseable input becomes zero
    pub fn set_private_text(&mut self, field: PrivateField, text: &str) -> Results {
        self.set_private(field, parse_numeric_input(text))
    }

    pub fn set_public_text(&mut self, field: PublicField, text: &str) -> Results {
        self.set_public(field, parse_numeric_input(text))
    }

    pub fn apply_private_preset(&mut self, preset: PrivatePreset) -> Results {
        debug!(preset = preset.as_str(), "applying private preset");
        self.private_params = preset.apply(&self.private_params);
        self.recompute()
    }

    pub fn apply_public_preset(&mut self, preset: PublicPreset) -> Results {
        debug!(preset = preset.as_str(), "applying public preset");
        self.public_params = preset.apply(&self.public_params);
        self.recompute()
    }

    pub fn replace_private(&mut self, params: PrivateRdParams) -> Results {
        self.private_params = params;
        self.recompute()
    }

    pub fn replace_public(&mut self, params: PublicRdParams) -> Results {
        self.public_params = params;
        self.recompute()
    }

    pub fn interpret_private(&self) -> Interpretation {
        classify_with_thresholds(self.results.private.bcr, Perspective::Private, &self.thresholds)
    }

    pub fn interpret_public(&self) -> Interpretation {
        classify_with_thresholds(self.results.public.total_bcr, Perspective::Public, &self.thresholds)
    }

    /// True when either parameter set sits on `i + δ == 0`
    pub fn is_singular(&self) -> bool {
        is_singular(self.private_params.interest_rate, self.private_params.depreciation_rate)
            || is_singular(self.public_params.interest_rate, self.public_params.depreciation_rate)
    }

    /// Serializable view of the current state
    pub fn snapshot(&self) -> CalculationReport {
        CalculationReport {
            private_params: self.private_params,
            private_results: self.results.private,
            private_interpretation: self.interpret_private(),
            public_params: self.public_params,
            public_results: self.results.public,
            public_interpretation: self.interpret_public(),
        }
    }

    fn recompute(&mut self) -> Results {
        self.results = compute_all(&self.private_params, &self.public_params);
        self.results
    }
}

/// Private engine first, then public with the fresh private BCR
fn compute_all(private_params: &PrivateRdParams, public_params: &PublicRdParams) -> Results {
    let private = compute_private_bcr(private_params);
    let public = compute_public_bcr(public_params, private.bcr);

    if is_singular(private_params.interest_rate, private_params.depreciation_rate) {
        warn!(
            interest_rate = private_params.interest_rate,
            depreciation_rate = private_params.depreciation_rate,
            "private capitalisation factor is singular (i + δ = 0)"
        );
    }
    if is_singular(public_params.interest_rate, public_params.depreciation_rate) {
        warn!(
            interest_rate = public_params.interest_rate,
            depreciation_rate = public_params.depreciation_rate,
            "public capitalisation factor is singular (i + δ = 0)"
        );
    }
    debug!(
        private_bcr = private.bcr,
        public_bcr = public.public_bcr,
        total_bcr = public.total_bcr,
        "recomputed returns"
    );

    Results { private, public }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpret::Severity;

    #[test]
    fn test_new_session_holds_default_results() {
        let calc = Calculator::default();
        assert_eq!(
            *calc.private_results(),
            compute_private_bcr(&PrivateRdParams::default())
        );
        assert_eq!(calc.public_results().private_bcr, calc.private_results().bcr);
    }

    #[test]
    fn test_private_edit_flows_into_public_results() {
        let mut calc = Calculator::default();
        let before = calc.public_results().total_bcr;
        let results = calc.set_private(PrivateField::TechSpillover, 0.5);

        assert_eq!(results.public.private_bcr, results.private.bcr);
        assert!(results.public.total_bcr > before);
        assert_eq!(calc.private_params().tech_spillover, 0.5);
    }

    #[test]
    fn test_public_edit_leaves_private_results_alone() {
        let mut calc = Calculator::default();
        let private_before = *calc.private_results();
        calc.set_public(PublicField::LeverageRatio, 2.0);
        assert_eq!(*calc.private_results(), private_before);
        assert_eq!(calc.public_results().leveraged_bcr, 2.0 * private_before.bcr);
    }

    #[test]
    fn test_text_edit_coerces_garbage_to_zero() {
        let mut calc = Calculator::default();
        let results = calc.set_private_text(PrivateField::ProductRivalry, "oops");
        assert_eq!(calc.private_params().product_rivalry, 0.0);
        assert_eq!(results.private.business_loss, 0.0);
    }

    #[test]
    fn test_preset_then_field_edit() {
        let mut calc = Calculator::default();
        calc.set_private(PrivateField::InterestRate, 0.035);
        calc.apply_private_preset(PrivatePreset::Conservative);
        assert_eq!(calc.private_params().tech_spillover, 0.15);
        assert_eq!(calc.private_params().interest_rate, 0.035);

        calc.apply_public_preset(PublicPreset::Oecd);
        assert_eq!(calc.public_params().leverage_ratio, 0.4);
        assert_eq!(calc.public_results().private_bcr, calc.private_results().bcr);
    }

    #[test]
    fn test_singular_state_is_reported_not_raised() {
        let mut calc = Calculator::default();
        calc.set_private(PrivateField::InterestRate, 0.0);
        let results = calc.set_private(PrivateField::DepreciationRate, 0.0);
        assert!(calc.is_singular());
        assert!(results.private.bcr.is_infinite());
        assert!(results.public.total_bcr.is_infinite());
    }

    #[test]
    fn test_interpretations_follow_results() {
        let calc = Calculator::default();
        assert_eq!(calc.interpret_private().severity, Severity::Good);
        let snapshot = calc.snapshot();
        assert_eq!(snapshot.private_results, *calc.private_results());
        assert_eq!(snapshot.public_interpretation, calc.interpret_public());
    }
}

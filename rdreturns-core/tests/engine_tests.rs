//! Engine invariants - worked scenarios and algebraic properties
//!
//! The scenario values come from Lucking, Bloom & Van Reenen (2019) and the
//! Frontier Economics public R&D estimates.

use proptest::prelude::*;
use rdreturns_core::capital::capitalisation_factor;
use rdreturns_core::{
    compute_private_bcr, compute_public_bcr, Calculator, PrivatePreset, PrivateRdParams,
    PublicPreset, PublicRdParams,
};

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

#[test]
fn test_default_private_scenario() {
    let r = compute_private_bcr(&PrivateRdParams::default());

    assert!(close(r.direct_productivity, 0.035175, 1e-9));
    assert!(close(r.spillover_gain, 0.541695, 1e-9));
    assert!(close(r.business_loss, 0.100835, 1e-9));
    assert!(close(r.social_return, 0.576870, 1e-9));
    assert!(close(r.multiplier, 5.14634, 1e-5));
    assert!(close(r.bcr, 2.9688, 1e-3));
}

#[test]
fn test_frontier_public_scenario() {
    let private = compute_private_bcr(&PrivateRdParams::default());
    let params = PublicPreset::Frontier.apply(&PublicRdParams::default());
    let r = compute_public_bcr(&params, private.bcr);

    assert!(close(r.public_bcr, 2.0585, 1e-4));
    assert!(close(r.leveraged_bcr, 1.4844, 1e-3));
    assert!(close(r.total_bcr, 3.5430, 1e-3));
}

#[test]
fn test_zero_rivalry_boundary() {
    let r = compute_private_bcr(&PrivateRdParams {
        product_rivalry: 0.0,
        ..Default::default()
    });
    assert_eq!(r.business_loss, 0.0);
    assert_eq!(r.private_return, r.direct_productivity);
}

#[test]
fn test_no_externalities_gives_unit_ratio() {
    let r = compute_private_bcr(&PrivateRdParams {
        tech_spillover: 0.0,
        product_rivalry: 0.0,
        ..Default::default()
    });
    assert_eq!(r.social_return, r.private_return);
    assert_eq!(r.social_return, r.direct_productivity);
    assert_eq!(r.ratio, 1.0);
}

#[test]
fn test_session_matches_engines_after_presets() {
    let mut calc = Calculator::default();
    calc.apply_private_preset(PrivatePreset::Optimistic);
    let results = calc.apply_public_preset(PublicPreset::Fieldhouse);

    let private = compute_private_bcr(calc.private_params());
    let public = compute_public_bcr(calc.public_params(), private.bcr);
    assert_eq!(results.private, private);
    assert_eq!(results.public, public);
}

fn private_params() -> impl Strategy<Value = PrivateRdParams> {
    (-1.0f64..1.0, -1.0f64..1.0, 0.0f64..0.2, 0.01f64..0.5).prop_map(
        |(tech_spillover, product_rivalry, interest_rate, depreciation_rate)| PrivateRdParams {
            tech_spillover,
            product_rivalry,
            interest_rate,
            depreciation_rate,
        },
    )
}

fn public_params() -> impl Strategy<Value = PublicRdParams> {
    (0.0f64..0.5, 0.0f64..3.0, 0.0f64..1.0, 0.0f64..0.2, 0.01f64..0.5).prop_map(
        |(direct_return, leverage_ratio, spillover_return, interest_rate, depreciation_rate)| {
            PublicRdParams {
                direct_return,
                leverage_ratio,
                spillover_return,
                interest_rate,
                depreciation_rate,
            }
        },
    )
}

proptest! {
    /// bcr is the social return capitalised at (1 + i) / (i + δ)
    #[test]
    fn bcr_is_capitalised_social_return(p in private_params()) {
        let r = compute_private_bcr(&p);
        let expected = r.social_return * capitalisation_factor(p.interest_rate, p.depreciation_rate);
        prop_assert!((r.bcr - expected).abs() <= 1e-12 * expected.abs().max(1.0));
    }

    /// Rivalry enters by magnitude only
    #[test]
    fn rivalry_sign_is_irrelevant(p in private_params()) {
        let flipped = PrivateRdParams { product_rivalry: -p.product_rivalry, ..p };
        prop_assert_eq!(
            compute_private_bcr(&p).business_loss,
            compute_private_bcr(&flipped).business_loss
        );
    }

    /// Pure function: identical params give bit-identical results
    #[test]
    fn private_engine_is_idempotent(p in private_params()) {
        let a = compute_private_bcr(&p);
        let b = compute_private_bcr(&p);
        prop_assert_eq!(a.bcr.to_bits(), b.bcr.to_bits());
        prop_assert_eq!(a.ratio.to_bits(), b.ratio.to_bits());
        prop_assert_eq!(a, b);
    }

    /// total = public + λ · private, for any supplied private BCR
    #[test]
    fn public_total_decomposes(p in public_params(), private_bcr in -5.0f64..20.0) {
        let r = compute_public_bcr(&p, private_bcr);
        prop_assert_eq!(r.total_bcr, r.public_bcr + p.leverage_ratio * private_bcr);
        prop_assert_eq!(r.private_bcr, private_bcr);
    }

    /// The lucking preset pins both elasticities and nothing else
    #[test]
    fn lucking_preset_overwrites_elasticities_only(p in private_params()) {
        let applied = PrivatePreset::Lucking.apply(&p);
        prop_assert_eq!(applied.tech_spillover, 0.231);
        prop_assert_eq!(applied.product_rivalry, -0.086);
        prop_assert_eq!(applied.interest_rate, p.interest_rate);
        prop_assert_eq!(applied.depreciation_rate, p.depreciation_rate);
    }

    /// The private return never drops below the direct gain, so the ratio
    /// is always the plain quotient
    #[test]
    fn ratio_is_social_over_private(p in private_params()) {
        let r = compute_private_bcr(&p);
        prop_assert!(r.private_return >= r.direct_productivity);
        prop_assert_eq!(r.ratio, r.social_return / r.private_return);
    }

    /// Public presets fix every public field regardless of prior state
    #[test]
    fn public_preset_is_total(p in public_params()) {
        for preset in PublicPreset::ALL {
            prop_assert_eq!(preset.apply(&p), preset.apply(&PublicRdParams::default()));
        }
    }
}

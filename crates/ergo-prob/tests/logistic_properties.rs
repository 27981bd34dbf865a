//! Property tests for the scaled logistic distribution.

use approx::assert_relative_eq;
use ergo_prob::{Destructured, Distribution, Logistic, MIN_S, Scale, StructureRegistry, Structured};
use proptest::prelude::*;

fn scale_strategy() -> impl Strategy<Value = Scale> {
    (-1e3f64..1e3, 1e-2f64..1e3).prop_map(|(low, width)| Scale::new(low, low + width).unwrap())
}

proptest! {
    #[test]
    fn prop_true_units_roundtrip_exactly(
        sc in scale_strategy(),
        loc_frac in -0.5f64..1.5,
        s_frac in 1e-3f64..1.0,
    ) {
        let loc = sc.denormalize_point(loc_frac);
        let s = s_frac * sc.width();
        let d = Logistic::new(loc, s, &sc);
        prop_assert_eq!(d.true_loc(), loc);
        prop_assert_eq!(d.true_s(), s);
        prop_assert!(d.s() >= MIN_S / sc.width());
    }

    #[test]
    fn prop_normalized_s_never_below_floor(s in -10.0f64..10.0) {
        let d = Logistic::normalized(0.5, s, None);
        prop_assert!(d.s() >= MIN_S);
        if s <= 0.0 {
            prop_assert_eq!(d.s(), MIN_S);
        }
    }

    #[test]
    fn prop_cdf_bounded_and_monotone(
        sc in scale_strategy(),
        loc in 0.0f64..1.0,
        s in 1e-3f64..0.5,
        a in -0.5f64..1.5,
        b in -0.5f64..1.5,
    ) {
        let d = Logistic::normalized(loc, s, Some(&sc));
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let (x_lo, x_hi) = (sc.denormalize_point(lo), sc.denormalize_point(hi));
        let (c_lo, c_hi) = (d.cdf(x_lo), d.cdf(x_hi));
        prop_assert!((0.0..=1.0).contains(&c_lo));
        prop_assert!((0.0..=1.0).contains(&c_hi));
        prop_assert!(c_lo <= c_hi);
    }

    #[test]
    fn prop_cdf_inverts_ppf(
        sc in scale_strategy(),
        loc in 0.0f64..1.0,
        s in 1e-2f64..0.5,
        q in 1e-6f64..(1.0 - 1e-6),
    ) {
        let d = Logistic::normalized(loc, s, Some(&sc));
        let back = d.cdf(d.ppf(q));
        prop_assert!((back - q).abs() < 1e-8, "q={} back={}", q, back);
    }

    #[test]
    fn prop_logpdf_is_log_of_pdf(
        sc in scale_strategy(),
        loc in 0.0f64..1.0,
        s in 1e-2f64..0.5,
        y in -0.5f64..1.5,
    ) {
        let d = Logistic::normalized(loc, s, Some(&sc));
        let x = sc.denormalize_point(y);
        let p = d.pdf(x);
        prop_assume!(p > 0.0);
        prop_assert!((d.logpdf(x) - p.ln()).abs() < 1e-9);
    }

    #[test]
    fn prop_destructure_structure_roundtrip(
        sc in scale_strategy(),
        loc in -1.0f64..2.0,
        s in 1e-4f64..1.0,
    ) {
        let d = Logistic::normalized(loc, s, Some(&sc));
        let (classes, leaves) = d.destructure().flatten();
        let tree = Destructured::unflatten(&classes, &leaves).unwrap();
        let back = Logistic::structure(&tree).unwrap();
        prop_assert_eq!(back.loc(), d.loc());
        prop_assert_eq!(back.s(), d.s());
        prop_assert!(back.scale().same_affine(d.scale()));
        prop_assert_eq!(back, d);
    }
}

#[test]
fn registry_roundtrip_through_json() {
    let d = Logistic::new(250.0, 20.0, &Scale::new(0.0, 1000.0).unwrap());
    let json = serde_json::to_string(&d.destructure()).unwrap();
    let tree: Destructured = serde_json::from_str(&json).unwrap();
    let rebuilt = StructureRegistry::with_defaults().structure(&tree).unwrap();
    for q in [0.05, 0.5, 0.95] {
        assert_relative_eq!(rebuilt.ppf(q), d.ppf(q), epsilon = 1e-9);
    }
}

#[test]
fn batch_matches_scalar_through_trait_object() {
    let d: Box<dyn Distribution> = Box::new(Logistic::new(0.0, 1.0, &Scale::new(-5.0, 5.0).unwrap()));
    let xs: Vec<f64> = (0..257).map(|i| -6.0 + 12.0 * i as f64 / 256.0).collect();
    let mut pdfs = vec![0.0; xs.len()];
    let mut logpdfs = vec![0.0; xs.len()];
    d.pdf_batch(&xs, &mut pdfs).unwrap();
    d.logpdf_batch(&xs, &mut logpdfs).unwrap();
    for (i, &x) in xs.iter().enumerate() {
        assert_eq!(pdfs[i], d.pdf(x));
        assert_eq!(logpdfs[i], d.logpdf(x));
    }
    let mut short = vec![0.0; 3];
    assert!(d.pdf_batch(&xs, &mut short).is_err());
}

#[test]
fn instances_do_not_share_scale_cache() {
    let shared = Scale::new(0.0, 10.0).unwrap();
    let narrow = Logistic::new(5.0, 0.1, &shared);
    let wide = Logistic::new(5.0, 4.0, &shared);
    assert!(shared.norm_term_cache().is_none());
    assert_ne!(
        narrow.scale().norm_term_cache().unwrap().densities,
        wide.scale().norm_term_cache().unwrap().densities
    );
}

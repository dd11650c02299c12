//! Integration tests for the right-edge bound.

use certificate_core::{sieve_primes, EulerMaclaurin, Unavailable};
use right_edge::sum::{partial_sum, prime_power_expansion};
use right_edge::{bound, compute_right_edge, convergence_study, RightEdgeConfig, REFERENCE_C_RIGHT};

#[test]
fn test_width_strictly_decreasing() {
    let cutoffs = [2u64, 3, 10, 97, 100, 1_000, 4_096, 50_000];
    let widths: Vec<f64> = cutoffs.iter().map(|&p| bound(p).unwrap().width()).collect();
    for (i, pair) in widths.windows(2).enumerate() {
        assert!(
            pair[1] < pair[0],
            "width(P={}) = {:e} is not below width(P={}) = {:e}",
            cutoffs[i + 1],
            pair[1],
            cutoffs[i],
            pair[0]
        );
    }
}

#[test]
fn test_reference_contained_at_one_million() {
    let b = bound(1_000_000).unwrap();
    assert_eq!(b.prime_count, 78_498);
    assert!(
        b.contains(REFERENCE_C_RIGHT),
        "[{}, {}] misses {}",
        b.lower,
        b.upper,
        REFERENCE_C_RIGHT
    );
    assert!(b.width() < 2e-5);
}

#[test]
fn test_separate_prime_power_loop_double_counts() {
    let cutoff = 100_000u64;
    let primes = sieve_primes(cutoff);

    let closed = partial_sum(&primes);
    assert!((closed - prime_power_expansion(&primes)).abs() < 1e-13);

    // Prime-power terms p^k <= P with k >= 2, the contribution a second loop adds.
    let mut powers = 0.0;
    for &p in &primes {
        let pf = p as f64;
        let mut pk = pf * pf;
        let mut k = 2;
        while pk <= cutoff as f64 {
            powers += pf.ln() / pf.powi(2 * k);
            pk *= pf;
            k += 1;
        }
    }
    assert!(powers > 0.0);

    // Prime-only part sum ln(p)/p^2 leaves the power-related contribution.
    let primes_only: f64 = primes.iter().map(|&p| (p as f64).ln() / (p as f64).powi(2)).sum();
    let power_part = closed - primes_only;
    assert!(power_part > powers, "closed form already holds the truncated powers");

    // The buggy variant: closed form plus a second loop over p^k.
    let double_counted = closed + powers;
    let inflated_power_part = double_counted - primes_only;
    assert!((inflated_power_part - (power_part + powers)).abs() < 1e-12);
    assert!(inflated_power_part > 1.9 * powers);

    // With the extra loop the interval no longer contains the true value.
    let tail = right_edge::sum::tail_bound(cutoff);
    let true_value = 0.569_960_993_094_532;
    assert!(closed <= true_value && true_value <= closed + tail);
    assert!(double_counted > true_value, "double counting inflates the lower bound");
}

#[test]
fn test_convergence_study_default_cutoffs() {
    let study = convergence_study(&right_edge::convergence::DEFAULT_CUTOFFS).unwrap();
    assert_eq!(study.intervals.len(), 4);
    assert!(study.strictly_shrinking);
    for b in &study.intervals {
        assert!(b.contains(REFERENCE_C_RIGHT), "P={} misses reference", b.cutoff);
    }
    // each decade shrinks the width by roughly a factor of ten
    for r in &study.width_ratios {
        assert!(*r > 0.05 && *r < 0.2, "ratio {}", r);
    }
}

#[test]
fn test_cross_check_with_euler_maclaurin() {
    let config = RightEdgeConfig {
        cutoff: 1_000_000,
        ..RightEdgeConfig::default()
    };
    let report = compute_right_edge(&config, &EulerMaclaurin::default()).unwrap();
    let hp = report.high_precision.completed().expect("cross-check should run");
    assert!((hp.zeta_2 - std::f64::consts::PI.powi(2) / 6.0).abs() < 1e-12);
    assert_eq!(report.high_precision_contained, Some(true));
    assert!(report.is_valid());
}

#[test]
fn test_cross_check_degrades_without_backend() {
    let config = RightEdgeConfig {
        cutoff: 100_000,
        ..RightEdgeConfig::default()
    };
    let report = compute_right_edge(&config, &Unavailable).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["high_precision"]["status"], "unavailable");
    assert!(json["high_precision_contained"].is_null());
    assert!(json["interval"]["partial_sum"].is_number());
    assert!(json["interval"]["tail_bound"].is_number());
    assert_eq!(json["reference_check"]["contained"], true);
}

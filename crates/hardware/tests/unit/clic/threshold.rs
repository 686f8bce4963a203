//! Threshold Gate Tests.
//!
//! Verifies per-context storage, the `priority >= threshold` blocking rule,
//! and the zero-threshold exception.

use clicsim_core::ClicError;
use clicsim_core::clic::ThresholdGate;
use clicsim_core::clic::threshold::blocks;
use rstest::rstest;

#[test]
fn thresholds_start_at_zero() {
    let gate = ThresholdGate::new(2);
    assert_eq!(gate.contexts(), 2);
    assert_eq!(gate.get_threshold(0), Ok(0));
    assert_eq!(gate.get_threshold(1), Ok(0));
}

#[test]
fn contexts_are_independent() {
    let mut gate = ThresholdGate::new(2);
    gate.set_threshold(1, 77).unwrap();
    assert_eq!(gate.get_threshold(0), Ok(0));
    assert_eq!(gate.get_threshold(1), Ok(77));
}

#[test]
fn unknown_context_is_rejected() {
    let mut gate = ThresholdGate::new(1);
    let err = ClicError::InvalidContext {
        context: 1,
        count: 1,
    };
    assert_eq!(gate.set_threshold(1, 5), Err(err));
    assert_eq!(gate.get_threshold(1), Err(err));
    assert_eq!(gate.blocked(0, 1), Err(err));
}

#[rstest]
#[case(100, 50, false)]
#[case(100, 99, false)]
#[case(100, 100, true)]
#[case(100, 200, true)]
#[case(1, 0, false)]
#[case(1, 1, true)]
#[case(255, 255, true)]
#[case(255, 254, false)]
fn blocked_when_priority_at_or_above_threshold(
    #[case] threshold: u8,
    #[case] priority: u8,
    #[case] blocked: bool,
) {
    assert_eq!(blocks(threshold, priority), blocked);
    let mut gate = ThresholdGate::new(1);
    gate.set_threshold(0, threshold).unwrap();
    assert_eq!(gate.blocked(priority, 0), Ok(blocked));
}

#[rstest]
fn zero_threshold_admits_every_priority(#[values(0, 1, 127, 128, 254, 255)] priority: u8) {
    let gate = ThresholdGate::new(1);
    assert_eq!(gate.blocked(priority, 0), Ok(false));
}

#[test]
fn priority_zero_is_never_blocked() {
    let mut gate = ThresholdGate::new(1);
    for threshold in 0..=u8::MAX {
        gate.set_threshold(0, threshold).unwrap();
        assert_eq!(gate.blocked(0, 0), Ok(false), "threshold {threshold}");
    }
}

#[test]
fn reset_returns_all_thresholds_to_zero() {
    let mut gate = ThresholdGate::new(3);
    gate.set_threshold(0, 10).unwrap();
    gate.set_threshold(2, 30).unwrap();
    gate.reset();
    for ctx in 0..3 {
        assert_eq!(gate.get_threshold(ctx), Ok(0));
    }
}

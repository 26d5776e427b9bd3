//! Tests for schedule selection and the schedule functions

use super::*;
use approx::assert_abs_diff_eq;
use proptest::prelude::*;

#[test]
fn test_parse_known_tags() {
    assert_eq!(ScheduleKind::parse("step"), ScheduleKind::Step);
    assert_eq!(ScheduleKind::parse("linear"), ScheduleKind::Linear);
    assert_eq!(ScheduleKind::parse("poly"), ScheduleKind::Poly);
    assert_eq!(ScheduleKind::parse("one_cycle"), ScheduleKind::OneCycle);
    assert_eq!(ScheduleKind::parse("standard"), ScheduleKind::Standard);
    assert_eq!(ScheduleKind::parse("none"), ScheduleKind::None);
}

#[test]
fn test_parse_unrecognized_tags_degrade_to_none() {
    assert_eq!(ScheduleKind::parse("garbage"), ScheduleKind::None);
    assert_eq!(ScheduleKind::parse("ONE_CYCLE"), ScheduleKind::None);
    assert_eq!(ScheduleKind::parse(""), ScheduleKind::None);
}

#[test]
fn test_display_round_trips_through_parse() {
    for kind in [
        ScheduleKind::Step,
        ScheduleKind::Linear,
        ScheduleKind::Poly,
        ScheduleKind::OneCycle,
        ScheduleKind::Standard,
        ScheduleKind::None,
    ] {
        assert_eq!(ScheduleKind::parse(&kind.to_string()), kind);
    }
}

#[test]
fn test_resolve_step_interval_is_epochs_over_five() {
    let (spec, _) = resolve(ScheduleKind::Step, 10, 0.01);
    match spec {
        Some(ScheduleSpec::Step(s)) => {
            assert_eq!(s.drop_every, 2);
            assert_abs_diff_eq!(s.init_alpha, 0.1, epsilon = 1e-8);
            assert_abs_diff_eq!(s.factor, 0.25, epsilon = 1e-8);
        }
        other => panic!("expected step schedule, got {other:?}"),
    }
}

#[test]
fn test_resolve_step_short_runs_never_drop() {
    for epochs in 1..5 {
        let (spec, _) = resolve(ScheduleKind::Step, epochs, 0.01);
        let spec = spec.expect("step schedule");
        for epoch in 0..epochs {
            assert_abs_diff_eq!(spec.rate_at(epoch).unwrap(), 0.1, epsilon = 1e-8);
        }
    }
}

#[test]
fn test_resolve_step_rates_end_to_end() {
    // epochs=10 gives interval 2; 0.1, then 0.1 * 0.25^k every 2 epochs
    let (spec, decay) = resolve(ScheduleKind::Step, 10, 0.01);
    let spec = spec.unwrap();
    assert_abs_diff_eq!(spec.rate_at(0).unwrap(), 0.1, epsilon = 1e-8);
    assert_abs_diff_eq!(spec.rate_at(2).unwrap(), 0.025, epsilon = 1e-8);
    assert_abs_diff_eq!(spec.rate_at(4).unwrap(), 0.00625, epsilon = 1e-8);
    assert_eq!(decay, 0.0);
}

#[test]
fn test_resolve_standard_decay_exact() {
    for (epochs, expected) in [(5, 0.1 / 5.0), (10, 0.1 / 10.0), (100, 0.1 / 100.0)] {
        let (spec, decay) = resolve(ScheduleKind::Standard, epochs, 0.01);
        // Exact equality: the decay must be the computed quotient, not an
        // approximation of it.
        assert_eq!(decay, expected);
        assert_eq!(spec.unwrap().decay(), expected);
    }
}

#[test]
fn test_resolve_none_has_no_spec_and_zero_decay() {
    let (spec, decay) = resolve(ScheduleKind::None, 20, 0.01);
    assert!(spec.is_none());
    assert_eq!(decay, 0.0);
}

#[test]
fn test_resolve_one_cycle_peaks_at_caller_rate() {
    let (spec, decay) = resolve(ScheduleKind::OneCycle, 10, 0.02);
    assert_eq!(decay, 0.0);
    match spec {
        Some(ScheduleSpec::OneCycle(s)) => assert_abs_diff_eq!(s.max_rate(), 0.02, epsilon = 1e-8),
        other => panic!("expected one-cycle schedule, got {other:?}"),
    }
}

#[test]
fn test_epoch_schedules_ignore_caller_rate() {
    // step/linear/poly run from the fixed 0.1 base rate, not the configured
    // learning rate
    for kind in [ScheduleKind::Step, ScheduleKind::Linear, ScheduleKind::Poly] {
        let (spec, _) = resolve(kind, 10, 0.007);
        assert_abs_diff_eq!(spec.unwrap().rate_at(0).unwrap(), 0.1, epsilon = 1e-7);
    }
}

#[test]
fn test_rate_at_is_none_for_stateful_variants() {
    let (spec, _) = resolve(ScheduleKind::OneCycle, 10, 0.01);
    assert!(spec.unwrap().rate_at(0).is_none());
    let (spec, _) = resolve(ScheduleKind::Standard, 10, 0.01);
    assert!(spec.unwrap().rate_at(0).is_none());
}

#[test]
fn test_kind_accessor_matches_resolved_variant() {
    for kind in [
        ScheduleKind::Step,
        ScheduleKind::Linear,
        ScheduleKind::Poly,
        ScheduleKind::OneCycle,
        ScheduleKind::Standard,
    ] {
        let (spec, _) = resolve(kind, 10, 0.01);
        assert_eq!(spec.unwrap().kind(), kind);
    }
}

proptest! {
    #[test]
    fn prop_linear_equals_poly_at_power_one(
        epochs in 1usize..200,
        epoch in 0usize..200,
        init in 1e-4f32..1.0,
    ) {
        let linear = PolynomialDecay::linear(epochs, init);
        let poly = PolynomialDecay::new(epochs, init, 1.0);
        prop_assert_eq!(linear.rate_at(epoch), poly.rate_at(epoch));
    }

    #[test]
    fn prop_step_rate_bounded_and_nonnegative(
        epochs in 1usize..500,
        epoch in 0usize..500,
    ) {
        // f32 underflows to 0.0 after enough drops, so the floor is
        // nonnegative rather than strictly positive
        let schedule = StepDecay::new(BASE_RATE, STEP_FACTOR, epochs / 5);
        let rate = schedule.rate_at(epoch);
        prop_assert!(rate >= 0.0);
        prop_assert!(rate <= BASE_RATE);
    }

    #[test]
    fn prop_step_rate_positive_within_the_run(
        epochs in 1usize..500,
        frac in 0.0f64..1.0,
    ) {
        let epoch = ((epochs as f64) * frac) as usize;
        let schedule = StepDecay::new(BASE_RATE, STEP_FACTOR, epochs / 5);
        prop_assert!(schedule.rate_at(epoch) > 0.0);
    }

    #[test]
    fn prop_poly_rate_in_unit_range_of_init(
        epochs in 1usize..500,
        epoch in 0usize..500,
        init in 1e-4f32..1.0,
    ) {
        let schedule = PolynomialDecay::new(epochs, init, POLY_POWER);
        let rate = schedule.rate_at(epoch);
        prop_assert!(rate >= 0.0);
        prop_assert!(rate <= init);
    }
}

//! Unit tests for the notification decision engine

use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use goldwatch::config::ReportWindow;
use goldwatch::decision::{evaluate, message, Action, DecisionSettings, MessageKind};
use goldwatch::models::{PriceReading, TrackedState};

fn taiwan(hour: u32, minute: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(8 * 3600)
        .unwrap()
        .with_ymd_and_hms(2026, 8, 26, hour, minute, 0)
        .unwrap()
}

/// Threshold 5%, single report window 10:00-10:05.
fn settings() -> DecisionSettings {
    DecisionSettings {
        change_threshold_percent: 5.0,
        report_windows: vec![ReportWindow {
            hour: Some(10),
            minute: 0,
        }],
        report_window_tolerance_minutes: 5,
    }
}

fn reading(price: f64) -> PriceReading {
    PriceReading::point(price, "test")
}

fn state_with_last_price(price: f64, now: DateTime<FixedOffset>) -> TrackedState {
    let mut state = TrackedState::default();
    state.observe(price, now, now.date_naive());
    state
}

#[test]
fn first_run_never_alerts() {
    let decision = evaluate(
        &reading(2345.0),
        TrackedState::default(),
        taiwan(14, 30),
        false,
        &settings(),
    );
    assert!(!decision.alert);
    assert!(!decision.scheduled);
    assert_eq!(decision.action, Action::Skip);
    assert_eq!(decision.state.last_price, Some(2345.0));
}

#[test]
fn threshold_breach_alerts_at_exact_boundary() {
    let now = taiwan(14, 30);
    let prior = state_with_last_price(100.0, now - Duration::minutes(10));

    let decision = evaluate(&reading(105.0), prior, now, false, &settings());
    assert!(decision.alert);
    assert_eq!(decision.pct_change, Some(5.0));
    match decision.action {
        Action::Notify { kind, ref message } => {
            assert_eq!(kind, MessageKind::Alert);
            assert!(message.contains("Gold Price Alert"));
            assert!(message.contains("+5.00%"));
        }
        Action::Skip => panic!("expected a notification"),
    }
}

#[test]
fn change_below_threshold_does_not_alert() {
    let now = taiwan(14, 30);
    let prior = state_with_last_price(100.0, now - Duration::minutes(10));

    let decision = evaluate(&reading(104.9), prior, now, false, &settings());
    assert!(!decision.alert);
    assert_eq!(decision.action, Action::Skip);
}

#[test]
fn downward_moves_alert_on_absolute_change() {
    let now = taiwan(14, 30);
    let prior = state_with_last_price(100.0, now - Duration::minutes(10));

    let decision = evaluate(&reading(94.0), prior, now, false, &settings());
    assert!(decision.alert);
    assert_eq!(decision.pct_change, Some(-6.0));
}

#[test]
fn report_window_triggers_scheduled_report() {
    let decision = evaluate(
        &reading(2345.0),
        TrackedState::default(),
        taiwan(10, 3),
        false,
        &settings(),
    );
    assert!(decision.scheduled);
    match decision.action {
        Action::Notify { kind, ref message } => {
            assert_eq!(kind, MessageKind::DailyReport);
            assert!(message.contains("Daily Gold Price Report"));
            assert!(message.contains("$2345.00"));
        }
        Action::Skip => panic!("expected a daily report"),
    }
    assert_eq!(decision.state.last_report_date, Some(taiwan(10, 3).date_naive()));
}

#[test]
fn outside_report_window_is_not_scheduled() {
    let decision = evaluate(
        &reading(2345.0),
        TrackedState::default(),
        taiwan(10, 6),
        false,
        &settings(),
    );
    assert!(!decision.scheduled);
    assert_eq!(decision.action, Action::Skip);
}

#[test]
fn manual_trigger_forces_a_report() {
    let decision = evaluate(
        &reading(2345.0),
        TrackedState::default(),
        taiwan(14, 30),
        true,
        &settings(),
    );
    assert!(decision.scheduled);
    assert!(matches!(
        decision.action,
        Action::Notify {
            kind: MessageKind::DailyReport,
            ..
        }
    ));
}

#[test]
fn alert_inside_window_prepends_alert_to_report() {
    let now = taiwan(10, 2);
    let prior = state_with_last_price(100.0, now - Duration::minutes(10));

    let decision = evaluate(&reading(106.0), prior, now, false, &settings());
    assert!(decision.alert);
    assert!(decision.scheduled);
    match decision.action {
        Action::Notify { kind, ref message } => {
            assert_eq!(kind, MessageKind::AlertWithReport);
            let alert_pos = message.find("Gold Price Alert").unwrap();
            let report_pos = message.find("Daily Gold Price Report").unwrap();
            assert!(alert_pos < report_pos, "alert block comes first");
        }
        Action::Skip => panic!("expected a combined notification"),
    }
}

#[test]
fn skip_still_records_the_current_price() {
    let now = taiwan(14, 30);
    let prior = state_with_last_price(100.0, now - Duration::minutes(10));

    let decision = evaluate(&reading(101.0), prior, now, false, &settings());
    assert_eq!(decision.action, Action::Skip);
    assert_eq!(decision.state.last_price, Some(101.0));
    assert_eq!(decision.state.last_price_at, Some(now));
}

#[test]
fn daily_extrema_track_max_and_min_of_the_day() {
    let prices = [4358.81, 4360.50, 4355.20, 4362.30, 4350.00, 4365.00];
    let mut state = TrackedState::default();
    let mut now = taiwan(9, 0);

    for price in prices {
        let decision = evaluate(&reading(price), state, now, false, &settings());
        state = decision.state;
        now += Duration::minutes(10);
    }

    assert_eq!(state.daily_high, Some(4365.00));
    assert_eq!(state.daily_low, Some(4350.00));
}

#[test]
fn day_boundary_reseeds_extrema_from_first_reading() {
    let yesterday = taiwan(23, 50) - Duration::days(1);
    let mut prior = TrackedState::default();
    prior.observe(1950.0, yesterday, yesterday.date_naive());
    prior.observe(1990.0, yesterday, yesterday.date_naive());

    let now = taiwan(0, 20);
    let decision = evaluate(&reading(2000.0), prior, now, false, &settings());
    assert_eq!(decision.state.daily_high, Some(2000.0));
    assert_eq!(decision.state.daily_low, Some(2000.0));
    assert_eq!(decision.state.daily_date, Some(now.date_naive()));
}

#[test]
fn report_uses_the_upstream_day_range() {
    let reading = PriceReading::new(2345.67, Some(2330.0), Some(2350.0), Some(2320.0), "cnyes");
    let decision = evaluate(&reading, TrackedState::default(), taiwan(10, 3), false, &settings());
    match decision.action {
        Action::Notify { ref message, .. } => {
            assert!(message.contains("Open price: $2330.00"));
            assert!(message.contains("Day high: $2350.00"));
            assert!(message.contains("Day low: $2320.00"));
            assert!(message.contains("Volatility: 1.28%"));
        }
        Action::Skip => panic!("expected a daily report"),
    }
    // Tracked extrema still record observed prices only.
    assert_eq!(decision.state.daily_high, Some(2345.67));
    assert_eq!(decision.state.daily_low, Some(2345.67));
}

#[test]
fn observed_extrema_widen_the_reported_range() {
    let now = taiwan(10, 3);
    let mut prior = TrackedState::default();
    prior.observe(2360.0, now - Duration::minutes(30), now.date_naive());

    let reading = PriceReading::new(2345.67, Some(2330.0), Some(2350.0), Some(2320.0), "cnyes");
    let decision = evaluate(&reading, prior, now, false, &settings());
    match decision.action {
        Action::Notify { ref message, .. } => {
            // Observed high beats the upstream range; upstream low beats ours.
            assert!(message.contains("Day high: $2360.00"));
            assert!(message.contains("Day low: $2320.00"));
        }
        Action::Skip => panic!("expected a daily report"),
    }
}

#[test]
fn first_reading_of_day_has_equal_extrema() {
    // Expected, not an error: both are seeded from the same first value.
    let decision = evaluate(
        &reading(2000.0),
        TrackedState::default(),
        taiwan(10, 3),
        false,
        &settings(),
    );
    assert_eq!(decision.state.daily_high, decision.state.daily_low);
    match decision.action {
        Action::Notify { ref message, .. } => assert!(message.contains("Volatility: 0.00%")),
        Action::Skip => panic!("expected a daily report"),
    }
}

#[test]
fn volatility_guards_against_zero_high() {
    assert_eq!(message::volatility(0.0, 0.0), 0.0);
    assert_eq!(message::volatility(-1.0, -2.0), 0.0);
}

#[test]
fn volatility_uses_day_range_over_day_high() {
    let v = message::volatility(2350.0, 2340.0);
    assert!((v - (10.0 / 2350.0 * 100.0)).abs() < 1e-9);
}

//! Scorecard tests: before/after split at the unlock snapshot.

use deskday_core::{
    config::ScoringConfig,
    stats::{admin_ratio, Counters, Scorecard, StatsSnapshot},
};

fn counters(
    tasks_completed: u32,
    clients_lost: u32,
    revenue: f64,
    satisfaction: f64,
    admin_seconds: f64,
    selling_seconds: f64,
) -> Counters {
    Counters {
        tasks_completed,
        clients_lost,
        revenue,
        satisfaction,
        admin_seconds,
        selling_seconds,
        ..Counters::new(72.0)
    }
}

#[test]
fn admin_ratio_is_zero_before_any_work() {
    assert_eq!(admin_ratio(0.0, 0.0), 0.0);
    assert_eq!(admin_ratio(3.0, 1.0), 0.75);
    assert_eq!(admin_ratio(0.0, 8.0), 0.0);
    assert_eq!(Counters::new(72.0).admin_ratio(), 0.0);
}

#[test]
fn after_values_are_current_minus_snapshot() {
    let before = counters(4, 2, 1150.0, 62.0, 90.0, 10.0);
    let snapshot = StatsSnapshot::take(&before, 330.0, 297.0);
    let mut now = counters(10, 3, 4400.0, 60.0, 100.0, 50.0);
    now.discovery_calls = 2;
    now.policies_bound = 1;

    let card = Scorecard::compute(&now, Some(&snapshot), 600.0, &ScoringConfig::default());
    let row = |label: &str| card.row(label).unwrap().clone();

    let tasks = row("Tasks completed");
    assert_eq!((tasks.before, tasks.after), (4.0, 6.0));
    assert!(tasks.improved);

    let lost = row("Clients lost");
    assert_eq!((lost.before, lost.after), (2.0, 1.0));
    assert!(lost.improved, "fewer losses is better");

    assert_eq!(row("Revenue").after, 3250.0);
    assert_eq!(row("Discovery calls").after, 2.0);
    assert_eq!(row("Policies bound").after, 1.0);

    let sat = row("Client satisfaction");
    assert_eq!((sat.before, sat.after), (62.0, 60.0));
    assert!(!sat.improved);

    let ratio = row("Admin time ratio");
    assert_eq!(ratio.before, 0.9);
    assert_eq!(ratio.after, 0.2);
    assert!(ratio.improved);

    let avg = row("Avg seconds per task");
    assert_eq!((avg.before, avg.after), (82.5, 45.0));

    assert_eq!(card.total_revenue, 4400.0);
    assert_eq!(card.final_satisfaction, 60.0);
    assert!((card.overall_admin_ratio - 100.0 / 150.0).abs() < 1e-12);
}

#[test]
fn revenue_per_hour_uses_the_fixed_segment_lengths() {
    let before = counters(1, 0, 1150.0, 72.0, 0.0, 0.0);
    // Snapshot time is irrelevant to the per-hour rows.
    let snapshot = StatsSnapshot::take(&before, 10.0, 9.0);
    let now = counters(2, 0, 4400.0, 72.0, 0.0, 0.0);

    let card = Scorecard::compute(&now, Some(&snapshot), 600.0, &ScoringConfig::default());
    let per_hour = card.row("Revenue / hour").unwrap();
    assert_eq!(per_hour.before, 200.0);
    assert_eq!(per_hour.after, 1000.0);
}

#[test]
fn without_an_unlock_the_whole_day_is_before() {
    let now = counters(5, 1, 900.0, 67.0, 40.0, 10.0);
    let card = Scorecard::compute(&now, None, 300.0, &ScoringConfig::default());

    let tasks = card.row("Tasks completed").unwrap();
    assert_eq!((tasks.before, tasks.after), (5.0, 0.0));
    let ratio = card.row("Admin time ratio").unwrap();
    assert_eq!((ratio.before, ratio.after), (0.8, 0.0));
    let avg = card.row("Avg seconds per task").unwrap();
    assert_eq!((avg.before, avg.after), (60.0, 0.0));
    assert!(card.row("No such row").is_none());
}

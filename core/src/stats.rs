//! Scoring counters, the unlock-time snapshot, and the end-of-day scorecard.
//!
//! Derived values are pure functions of the counters and are never
//! stored alongside them.

use crate::{
    config::ScoringConfig,
    types::{GameMinutes, RealSeconds},
};
use serde::{Deserialize, Serialize};

/// Cumulative counters owned by the task store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Counters {
    pub tasks_completed:    u32,
    pub clients_lost:       u32,
    pub revenue:            f64,
    pub satisfaction:       f64,
    /// Seconds spent on an active non-gold task.
    pub admin_seconds:      f64,
    /// Seconds spent on an active gold task.
    pub selling_seconds:    f64,
    pub discovery_calls:    u32,
    pub policies_bound:     u32,
    pub total_interactions: u32,
}

impl Counters {
    pub fn new(starting_satisfaction: f64) -> Self {
        Self {
            tasks_completed:    0,
            clients_lost:       0,
            revenue:            0.0,
            satisfaction:       starting_satisfaction,
            admin_seconds:      0.0,
            selling_seconds:    0.0,
            discovery_calls:    0,
            policies_bound:     0,
            total_interactions: 0,
        }
    }

    pub fn admin_ratio(&self) -> f64 {
        admin_ratio(self.admin_seconds, self.selling_seconds)
    }
}

/// `admin / (admin + selling)`, zero when nothing has been worked yet.
pub fn admin_ratio(admin_seconds: f64, selling_seconds: f64) -> f64 {
    let total = admin_seconds + selling_seconds;
    if total > 0.0 { admin_seconds / total } else { 0.0 }
}

/// Counters frozen at the unlock instant. Taken once, never modified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsSnapshot {
    pub counters:             Counters,
    pub taken_at_real_seconds: RealSeconds,
    pub taken_at_game_minutes: GameMinutes,
    pub avg_seconds_per_task: f64,
    pub admin_ratio:          f64,
}

impl StatsSnapshot {
    pub fn take(counters: &Counters, elapsed: RealSeconds, game_minutes: GameMinutes) -> Self {
        Self {
            counters:             counters.clone(),
            taken_at_real_seconds: elapsed,
            taken_at_game_minutes: game_minutes,
            avg_seconds_per_task: avg_seconds_per_task(elapsed, counters.tasks_completed),
            admin_ratio:          counters.admin_ratio(),
        }
    }
}

fn avg_seconds_per_task(seconds: RealSeconds, tasks: u32) -> f64 {
    if tasks > 0 { seconds / f64::from(tasks) } else { 0.0 }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScorecardRow {
    pub label:  String,
    pub before: f64,
    pub after:  f64,
    /// True when "after" beats "before" (lower is better for losses and ratios).
    pub improved: bool,
}

impl ScorecardRow {
    fn higher_is_better(label: &str, before: f64, after: f64) -> Self {
        Self { label: label.into(), before, after, improved: after > before }
    }

    fn lower_is_better(label: &str, before: f64, after: f64) -> Self {
        Self { label: label.into(), before, after, improved: after < before }
    }
}

/// Before/after comparison for the end-of-day summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scorecard {
    pub rows:          Vec<ScorecardRow>,
    pub total_revenue: f64,
    pub final_satisfaction: f64,
    pub overall_admin_ratio: f64,
}

impl Scorecard {
    /// "After" values are `current − snapshot`. Without a snapshot (the
    /// unlock never fired) the whole day counts as "before".
    ///
    /// Revenue per hour divides by the fixed designed segment lengths,
    /// not the actual unlock time.
    pub fn compute(
        current: &Counters,
        before: Option<&StatsSnapshot>,
        elapsed: RealSeconds,
        scoring: &ScoringConfig,
    ) -> Self {
        let b = before.map(|s| s.counters.clone()).unwrap_or_else(|| current.clone());
        let before_elapsed = before.map(|s| s.taken_at_real_seconds).unwrap_or(elapsed);

        let after_tasks = current.tasks_completed.saturating_sub(b.tasks_completed);
        let after_lost = current.clients_lost.saturating_sub(b.clients_lost);
        let after_revenue = current.revenue - b.revenue;
        let after_admin = current.admin_seconds - b.admin_seconds;
        let after_selling = current.selling_seconds - b.selling_seconds;

        let rows = vec![
            ScorecardRow::higher_is_better(
                "Tasks completed",
                f64::from(b.tasks_completed),
                f64::from(after_tasks),
            ),
            ScorecardRow::lower_is_better(
                "Clients lost",
                f64::from(b.clients_lost),
                f64::from(after_lost),
            ),
            ScorecardRow::higher_is_better(
                "Discovery calls",
                f64::from(b.discovery_calls),
                f64::from(current.discovery_calls.saturating_sub(b.discovery_calls)),
            ),
            ScorecardRow::higher_is_better(
                "Policies bound",
                f64::from(b.policies_bound),
                f64::from(current.policies_bound.saturating_sub(b.policies_bound)),
            ),
            ScorecardRow::higher_is_better("Revenue", b.revenue, after_revenue),
            ScorecardRow::higher_is_better(
                "Revenue / hour",
                b.revenue / scoring.before_segment_hours,
                after_revenue / scoring.after_segment_hours,
            ),
            ScorecardRow::higher_is_better("Client satisfaction", b.satisfaction, current.satisfaction),
            ScorecardRow::lower_is_better(
                "Admin time ratio",
                b.admin_ratio(),
                admin_ratio(after_admin, after_selling),
            ),
            ScorecardRow::lower_is_better(
                "Avg seconds per task",
                avg_seconds_per_task(before_elapsed, b.tasks_completed),
                avg_seconds_per_task(elapsed - before_elapsed, after_tasks),
            ),
            ScorecardRow::lower_is_better(
                "Interactions",
                f64::from(b.total_interactions),
                f64::from(current.total_interactions.saturating_sub(b.total_interactions)),
            ),
        ];

        Self {
            rows,
            total_revenue: current.revenue,
            final_satisfaction: current.satisfaction,
            overall_admin_ratio: current.admin_ratio(),
        }
    }

    pub fn row(&self, label: &str) -> Option<&ScorecardRow> {
        self.rows.iter().find(|r| r.label == label)
    }
}

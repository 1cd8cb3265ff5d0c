//! Pacing schedule generator.
//!
//! Builds, once per session start, the full ordered list of task
//! arrivals. Exact timings and types vary with the random source;
//! window boundaries, burst mechanics, the tutorial coverage pass and
//! the guaranteed mastery gold events do not.
//!
//! WINDOWS (real seconds, designed tuning):
//!   tutorial   [0, 150)    fixed order, every 20s, 35s deadlines
//!   moderate   [150, 240)  single spawns every 8–12s, 18s deadlines
//!   heavy      [240, 330)  bursts of 2–3 every 5–8s, 13–16s deadlines
//!   mastery    [360, 570)  spawns every 6–10s + four guaranteed gold
//!   winddown   [570, 600)  nothing new

use crate::{
    config::{PacingConfig, Range, Window},
    rng::RandomSource,
    task::TaskType,
    types::RealSeconds,
};
use serde::{Deserialize, Serialize};

/// Which pass of the generator produced an event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpawnSource {
    Tutorial,
    Moderate,
    Heavy,
    #[default]
    Guaranteed,
    Mastery,
}

/// A planned task arrival. Immutable once generated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpawnEvent {
    pub spawn_at_real_seconds:    RealSeconds,
    pub task_type:                TaskType,
    pub initial_deadline_seconds: f64,
    #[serde(default)]
    pub source:                   SpawnSource,
}

impl SpawnEvent {
    pub fn new(at: RealSeconds, task_type: TaskType, deadline: f64) -> Self {
        Self {
            spawn_at_real_seconds:    at,
            task_type,
            initial_deadline_seconds: deadline,
            source:                   SpawnSource::Guaranteed,
        }
    }

    fn from(source: SpawnSource, at: RealSeconds, task_type: TaskType, deadline: f64) -> Self {
        Self {
            spawn_at_real_seconds:    at,
            task_type,
            initial_deadline_seconds: deadline,
            source,
        }
    }
}

/// Generate the session's spawn schedule, sorted ascending by spawn time.
///
/// Assumes a validated config (`DayConfig::validate`): every interval
/// must be positive or the window loops never terminate.
pub fn generate_schedule(config: &PacingConfig, rng: &mut dyn RandomSource) -> Vec<SpawnEvent> {
    let mut events = Vec::new();

    tutorial_pass(config, &mut events);
    moderate_pass(config, rng, &mut events);
    heavy_pass(config, rng, &mut events);

    events.extend(config.guaranteed_gold.iter().cloned().map(|mut e| {
        e.source = SpawnSource::Guaranteed;
        e
    }));
    mastery_pass(config, rng, &mut events);

    // Stable: equal timestamps keep generation order.
    events.sort_by(|a, b| a.spawn_at_real_seconds.total_cmp(&b.spawn_at_real_seconds));

    log::debug!(
        "schedule: {} events, last at {:.1}s",
        events.len(),
        events.last().map(|e| e.spawn_at_real_seconds).unwrap_or(0.0)
    );
    events
}

fn tutorial_pass(config: &PacingConfig, events: &mut Vec<SpawnEvent>) {
    let mut t = config.tutorial_start;
    for task_type in &config.tutorial_order {
        events.push(SpawnEvent::from(
            SpawnSource::Tutorial,
            t,
            *task_type,
            config.tutorial_deadline,
        ));
        t += config.tutorial_interval;
    }
}

fn moderate_pass(config: &PacingConfig, rng: &mut dyn RandomSource, events: &mut Vec<SpawnEvent>) {
    let Window { start, end } = config.moderate_window;
    let mut t = start;
    while t < end {
        let task_type = pick_weighted(config, rng);
        events.push(SpawnEvent::from(SpawnSource::Moderate, t, task_type, config.moderate_deadline));
        t += sample(config.moderate_interval, rng);
    }
}

fn heavy_pass(config: &PacingConfig, rng: &mut dyn RandomSource, events: &mut Vec<SpawnEvent>) {
    let Window { start, end } = config.heavy_window;
    let mut t = start;
    while t < end {
        let burst = config.burst_size + u32::from(rng.chance(config.burst_extra_chance));
        for b in 0..burst {
            // Gold can only lead a burst.
            let task_type = if b == 0 && rng.chance(config.burst_gold_chance) {
                TaskType::GOLD[rng.index_below(TaskType::GOLD.len())]
            } else {
                pick_admin(rng)
            };
            events.push(SpawnEvent::from(
                SpawnSource::Heavy,
                t + f64::from(b) * config.burst_offset,
                task_type,
                sample(config.heavy_deadline, rng),
            ));
        }
        t += sample(config.heavy_interval, rng);
    }
}

fn mastery_pass(config: &PacingConfig, rng: &mut dyn RandomSource, events: &mut Vec<SpawnEvent>) {
    let Window { start, end } = config.mastery_window;
    let mut t = start;
    while t < end {
        let task_type = pick_weighted(config, rng);
        let deadline = if task_type.is_gold() {
            config.mastery_gold_deadline
        } else {
            config.mastery_deadline
        };
        events.push(SpawnEvent::from(SpawnSource::Mastery, t, task_type, deadline));
        t += sample(config.mastery_interval, rng);
    }
}

fn sample(range: Range, rng: &mut dyn RandomSource) -> f64 {
    rng.uniform(range.min, range.max)
}

fn pick_admin(rng: &mut dyn RandomSource) -> TaskType {
    TaskType::ADMIN[rng.index_below(TaskType::ADMIN.len())]
}

/// Weighted draw over admin (uniform within), comparison, and the two gold types.
fn pick_weighted(config: &PacingConfig, rng: &mut dyn RandomSource) -> TaskType {
    let w = &config.weights;
    let r = rng.next_f64() * w.total();
    if r < w.admin {
        pick_admin(rng)
    } else if r < w.admin + w.quote_comparison {
        TaskType::QuoteComparison
    } else if r < w.admin + w.quote_comparison + w.discovery_call {
        TaskType::DiscoveryCall
    } else {
        TaskType::ProposalPresentation
    }
}

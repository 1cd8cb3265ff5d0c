//! Session tuning: clock constants, pacing windows, scoring, unlock ramp.
//!
//! Every section is `#[serde(default)]`, so a data file only has to name
//! the values it overrides. `DayConfig::default()` is the designed tuning.

use crate::{
    error::{DayError, DayResult},
    schedule::SpawnEvent,
    task::TaskType,
    types::{GameMinutes, RealSeconds},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClockConfig {
    pub total_real_seconds: RealSeconds,
    pub total_game_minutes: GameMinutes,
    /// Hour of day at game minute 0, on a 24-hour clock.
    pub day_start_hour:     u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            total_real_seconds: 600.0,
            total_game_minutes: 540.0,
            day_start_hour:     8,
        }
    }
}

/// Lower bounds (real seconds) of every pacing phase after `tutorial`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhaseBounds {
    pub ramp:              RealSeconds,
    pub overwhelm:         RealSeconds,
    pub unlock_transition: RealSeconds,
    pub mastery:           RealSeconds,
    pub winddown:          RealSeconds,
}

impl Default for PhaseBounds {
    fn default() -> Self {
        Self {
            ramp:              150.0,
            overwhelm:         270.0,
            unlock_transition: 330.0,
            mastery:           360.0,
            winddown:          570.0,
        }
    }
}

/// A half-open `[start, end)` window in real seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Window {
    pub start: RealSeconds,
    pub end:   RealSeconds,
}

/// An inclusive `[min, max]` range, sampled uniformly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn fixed(value: f64) -> Self {
        Self { min: value, max: value }
    }
}

/// Relative weights of the mixed-type draw.
/// Admin weight is split uniformly across the five admin types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TypeWeights {
    pub admin:                 f64,
    pub quote_comparison:      f64,
    pub discovery_call:        f64,
    pub proposal_presentation: f64,
}

impl Default for TypeWeights {
    fn default() -> Self {
        Self {
            admin:                 0.6,
            quote_comparison:      0.2,
            discovery_call:        0.1,
            proposal_presentation: 0.1,
        }
    }
}

impl TypeWeights {
    pub fn total(&self) -> f64 {
        self.admin + self.quote_comparison + self.discovery_call + self.proposal_presentation
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PacingConfig {
    // ── Tutorial ───────────────────────────────────
    /// Hand-ordered: every type once, ending on a gold type.
    pub tutorial_order:    Vec<TaskType>,
    pub tutorial_start:    RealSeconds,
    pub tutorial_interval: RealSeconds,
    pub tutorial_deadline: f64,

    // ── Ramp: moderate ─────────────────────────────
    pub moderate_window:   Window,
    pub moderate_interval: Range,
    pub moderate_deadline: f64,

    // ── Ramp: heavy (bursts) ───────────────────────
    pub heavy_window:          Window,
    pub heavy_interval:        Range,
    pub burst_size:            u32,
    pub burst_extra_chance:    f64,
    pub burst_offset:          RealSeconds,
    pub heavy_deadline:        Range,
    pub burst_gold_chance:     f64,

    // ── Mastery ────────────────────────────────────
    pub mastery_window:        Window,
    pub mastery_interval:      Range,
    pub mastery_deadline:      f64,
    pub mastery_gold_deadline: f64,
    pub guaranteed_gold:       Vec<SpawnEvent>,

    pub weights: TypeWeights,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            tutorial_order: vec![
                TaskType::AcordForm,
                TaskType::FollowUpEmail,
                TaskType::CoiIssuance,
                TaskType::CarrierSubmission,
                TaskType::QuoteComparison,
                TaskType::RenewalProcessing,
                TaskType::DiscoveryCall,
            ],
            tutorial_start:    3.0,
            tutorial_interval: 20.0,
            tutorial_deadline: 35.0,

            moderate_window:   Window { start: 150.0, end: 240.0 },
            moderate_interval: Range { min: 8.0, max: 12.0 },
            moderate_deadline: 18.0,

            heavy_window:       Window { start: 240.0, end: 330.0 },
            heavy_interval:     Range { min: 5.0, max: 8.0 },
            burst_size:         2,
            burst_extra_chance: 0.3,
            burst_offset:       0.5,
            heavy_deadline:     Range { min: 13.0, max: 16.0 },
            burst_gold_chance:  0.15,

            mastery_window:        Window { start: 360.0, end: 570.0 },
            mastery_interval:      Range { min: 6.0, max: 10.0 },
            mastery_deadline:      20.0,
            mastery_gold_deadline: 28.0,
            guaranteed_gold: vec![
                SpawnEvent::new(380.0, TaskType::DiscoveryCall, 30.0),
                SpawnEvent::new(420.0, TaskType::ProposalPresentation, 30.0),
                SpawnEvent::new(470.0, TaskType::DiscoveryCall, 30.0),
                SpawnEvent::new(510.0, TaskType::ProposalPresentation, 30.0),
            ],

            weights: TypeWeights::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    /// Starting satisfaction; completions never raise it past this.
    pub satisfaction_ceiling: f64,
    pub completion_boost:     f64,
    pub expiry_penalty:       f64,
    /// Fixed game-hour divisors for the revenue/hour rows (8AM–1:45PM, 1:45PM–5PM).
    pub before_segment_hours: f64,
    pub after_segment_hours:  f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            satisfaction_ceiling: 72.0,
            completion_boost:     3.0,
            expiry_penalty:       5.0,
            before_segment_hours: 5.75,
            after_segment_hours:  3.25,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolConfig {
    pub id:     String,
    pub label:  String,
    /// Real seconds after the unlock trigger.
    pub offset: RealSeconds,
}

impl ToolConfig {
    fn new(id: &str, label: &str, offset: RealSeconds) -> Self {
        Self { id: id.into(), label: label.into(), offset }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UnlockConfig {
    pub tools:        Vec<ToolConfig>,
    /// Collapse the tool ramp to the trigger instant (automated runs).
    pub instant_ramp: bool,
}

impl Default for UnlockConfig {
    fn default() -> Self {
        Self {
            tools: vec![
                ToolConfig::new("smart-applications", "AI Form Completion", 0.0),
                ToolConfig::new("instant-quote", "Carrier Matching", 5.0),
                ToolConfig::new("auto-coi", "Auto-COI", 10.0),
                ToolConfig::new("renewal-autopilot", "Renewal Autopilot", 15.0),
                ToolConfig::new("smart-followups", "Smart Follow-ups", 20.0),
            ],
            instant_ramp: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DayConfig {
    pub clock:   ClockConfig,
    pub phases:  PhaseBounds,
    pub pacing:  PacingConfig,
    pub scoring: ScoringConfig,
    pub unlock:  UnlockConfig,
    /// Upper bound on a single tick's real delta. `None` lets a long
    /// stall catch up in one tick.
    pub max_tick_delta:    Option<RealSeconds>,
    /// How many expired tasks stay visible for the UI.
    pub expired_trail_len: usize,
}

impl Default for DayConfig {
    fn default() -> Self {
        Self {
            clock:   ClockConfig::default(),
            phases:  PhaseBounds::default(),
            pacing:  PacingConfig::default(),
            scoring: ScoringConfig::default(),
            unlock:  UnlockConfig::default(),
            max_tick_delta:    None,
            expired_trail_len: 5,
        }
    }
}

impl DayConfig {
    /// Load from `{data_dir}/day_config.json` and validate.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/day_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DayConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject tunings that would divide by zero, loop forever while
    /// generating the schedule, or break the phase chain.
    pub fn validate(&self) -> DayResult<()> {
        let c = &self.clock;
        positive("clock.total_real_seconds", c.total_real_seconds)?;
        positive("clock.total_game_minutes", c.total_game_minutes)?;
        if c.day_start_hour > 23 {
            return invalid(format!("clock.day_start_hour out of range: {}", c.day_start_hour));
        }

        let b = &self.phases;
        let chain = [b.ramp, b.overwhelm, b.unlock_transition, b.mastery, b.winddown];
        if chain.iter().any(|v| !v.is_finite() || *v < 0.0)
            || chain.windows(2).any(|w| w[0] > w[1])
        {
            return invalid(format!("phase bounds must be finite, non-negative and ascending: {chain:?}"));
        }

        let p = &self.pacing;
        if p.tutorial_order.len() > 1 {
            positive("pacing.tutorial_interval", p.tutorial_interval)?;
        }
        for (name, range) in [
            ("pacing.moderate_interval", p.moderate_interval),
            ("pacing.heavy_interval", p.heavy_interval),
            ("pacing.mastery_interval", p.mastery_interval),
        ] {
            positive(name, range.min)?;
            if range.max < range.min {
                return invalid(format!("{name}: max < min"));
            }
        }
        if p.heavy_deadline.max < p.heavy_deadline.min {
            return invalid("pacing.heavy_deadline: max < min".to_string());
        }
        if p.burst_size == 0 {
            return invalid("pacing.burst_size must be at least 1".to_string());
        }
        positive("pacing.weights (sum)", p.weights.total())?;

        let s = &self.scoring;
        positive("scoring.before_segment_hours", s.before_segment_hours)?;
        positive("scoring.after_segment_hours", s.after_segment_hours)?;

        if let Some(cap) = self.max_tick_delta {
            positive("max_tick_delta", cap)?;
        }

        let offsets: Vec<f64> = self.unlock.tools.iter().map(|t| t.offset).collect();
        if offsets.windows(2).any(|w| w[0] > w[1]) {
            return invalid("unlock.tools offsets must be ascending".to_string());
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> DayResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        invalid(format!("{name} must be finite and > 0, got {value}"))
    }
}

fn invalid(reason: String) -> DayResult<()> {
    Err(DayError::InvalidConfig { reason })
}

//! Everything the engine reports back to widgets, sound, and the runner.
//!
//! RULE: Every mutating engine call returns the events it caused.
//! An empty list means nothing changed.

use crate::{
    phase::PacingPhase,
    stats::StatsSnapshot,
    task::TaskType,
    types::{GameMinutes, RealSeconds, SessionId, TaskId, ToolId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    // ── Session events ─────────────────────────────
    SessionStarted {
        session_id:  SessionId,
        spawn_count: usize,
    },
    SessionPaused,
    SessionResumed,
    SessionEnded {
        elapsed_real_seconds: RealSeconds,
        game_time_minutes:    GameMinutes,
    },
    SessionReset,
    SpeedChanged {
        speed: f64,
    },

    // ── Pacing events ──────────────────────────────
    PhaseChanged {
        from: Option<PacingPhase>,
        to:   PacingPhase,
        at:   RealSeconds,
    },
    PhaseSkipped {
        to:      PacingPhase,
        elapsed: RealSeconds,
        /// Scheduled arrivals passed over by the jump.
        skipped_spawns: usize,
    },

    // ── Task lifecycle events ──────────────────────
    TaskSpawned {
        task_id:   TaskId,
        task_type: TaskType,
        deadline:  f64,
        capability_assisted: bool,
    },
    TaskSelected {
        task_id:   TaskId,
        task_type: TaskType,
    },
    TaskCompleted {
        task_id:   TaskId,
        task_type: TaskType,
        revenue:   f64,
    },
    TaskExpired {
        task_id:   TaskId,
        task_type: TaskType,
    },

    // ── Capability events ──────────────────────────
    CapabilityUnlocked {
        snapshot: StatsSnapshot,
    },
    ToolUnlocked {
        tool_id: ToolId,
        label:   String,
    },
}

impl GameEvent {
    /// Stable snake_case name, matching the serde tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SessionStarted { .. }     => "session_started",
            Self::SessionPaused             => "session_paused",
            Self::SessionResumed            => "session_resumed",
            Self::SessionEnded { .. }       => "session_ended",
            Self::SessionReset              => "session_reset",
            Self::SpeedChanged { .. }       => "speed_changed",
            Self::PhaseChanged { .. }       => "phase_changed",
            Self::PhaseSkipped { .. }       => "phase_skipped",
            Self::TaskSpawned { .. }        => "task_spawned",
            Self::TaskSelected { .. }       => "task_selected",
            Self::TaskCompleted { .. }      => "task_completed",
            Self::TaskExpired { .. }        => "task_expired",
            Self::CapabilityUnlocked { .. } => "capability_unlocked",
            Self::ToolUnlocked { .. }       => "tool_unlocked",
        }
    }
}

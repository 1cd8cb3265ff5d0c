use serde::{Deserialize, Serialize};
use crate::{phase::PacingPhase, types::TaskId};

/// All commands a widget, the shell, or the debug bridge can issue.
/// Variants are appended only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    // ── Session control ───────────────────────────
    Start,
    Pause,
    Resume,
    SetPaused { paused: bool },
    End,
    Reset,

    // ── Widget callbacks ──────────────────────────
    SelectTask { task_id: TaskId },
    CompleteActive { revenue: f64 },
    RecordInteraction,

    // ── Debug surface ─────────────────────────────
    SetSpeed { speed: f64 },
    SkipToPhase { phase: PacingPhase },
    SkipUnlockRamp,
}

//! Read-only view of the whole engine for the debug surface.
//!
//! Built on demand from live state; holding one never blocks the engine.

use crate::{
    engine::SessionStatus,
    phase::PacingPhase,
    stats::{Counters, StatsSnapshot},
    task::TaskInstance,
    types::{GameMinutes, RealSeconds, SessionId, ToolId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub session_id:        SessionId,
    pub seed:              Option<u64>,
    pub status:            SessionStatus,
    pub phase:             Option<PacingPhase>,
    pub elapsed_real_seconds: RealSeconds,
    pub game_time_minutes: GameMinutes,
    pub display_time:      String,
    pub paused:            bool,
    pub speed_multiplier:  f64,
    pub queue:             Vec<TaskInstance>,
    pub active_task:       Option<TaskInstance>,
    /// The active task's tool is online, so its widget runs automated.
    pub active_tool_online: bool,
    pub recently_expired:  Vec<TaskInstance>,
    pub counters:          Counters,
    pub admin_ratio:       f64,
    pub capability_unlocked: bool,
    pub unlocked_tools:    Vec<ToolId>,
    pub before_unlock:     Option<StatsSnapshot>,
    pub spawns_remaining:  usize,
}

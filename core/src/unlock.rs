//! Capability unlock controller.
//!
//! Fires once. On trigger it freezes the stats snapshot, flips the global
//! flag, then brings the tools online one at a time as ramp time passes.
//! A second trigger is a no-op: the snapshot and ramp are never redone.

use crate::{
    config::{ToolConfig, UnlockConfig},
    stats::{Counters, StatsSnapshot},
    task::TaskInstance,
    types::{GameMinutes, RealSeconds, ToolId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CapabilityState {
    pub globally_unlocked: bool,
    /// Grows one id at a time, in configured order. Never shrinks.
    pub unlocked_tool_ids: Vec<ToolId>,
}

impl CapabilityState {
    pub fn has_tool(&self, tool_id: &str) -> bool {
        self.unlocked_tool_ids.iter().any(|t| t == tool_id)
    }

    /// Whether the widget for `task` runs in its automated form: the task
    /// was spawned assisted and its own tool is already online.
    pub fn assists(&self, task: &TaskInstance) -> bool {
        task.capability_assisted
            && task.task_type.assisting_tool().is_some_and(|tool| self.has_tool(tool))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockController {
    pub state:    CapabilityState,
    snapshot:     Option<StatsSnapshot>,
    /// Ramp seconds since the trigger.
    ramp_elapsed: RealSeconds,
    instant_ramp: bool,
    tools:        Vec<ToolConfig>,
}

impl UnlockController {
    pub fn new(config: UnlockConfig) -> Self {
        Self {
            state:        CapabilityState::default(),
            snapshot:     None,
            ramp_elapsed: 0.0,
            instant_ramp: config.instant_ramp,
            tools:        config.tools,
        }
    }

    /// Back to locked. The instant-ramp override survives.
    pub fn reset(&mut self) {
        self.state = CapabilityState::default();
        self.snapshot = None;
        self.ramp_elapsed = 0.0;
    }

    pub fn is_unlocked(&self) -> bool {
        self.state.globally_unlocked
    }

    pub fn snapshot(&self) -> Option<&StatsSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn tools(&self) -> &[ToolConfig] {
        &self.tools
    }

    pub fn ramp_complete(&self) -> bool {
        self.state.unlocked_tool_ids.len() >= self.tools.len()
    }

    /// Snapshot first, then flip the flag. Returns the snapshot on the
    /// first call, None on every later one.
    pub fn trigger(
        &mut self,
        counters: &Counters,
        elapsed: RealSeconds,
        game_minutes: GameMinutes,
    ) -> Option<&StatsSnapshot> {
        if self.state.globally_unlocked {
            return None;
        }
        self.snapshot = Some(StatsSnapshot::take(counters, elapsed, game_minutes));
        self.state.globally_unlocked = true;
        self.ramp_elapsed = 0.0;
        log::info!("capability unlocked at {elapsed:.1}s ({} tools pending)", self.tools.len());
        self.snapshot.as_ref()
    }

    /// Move the ramp forward by `dt` and release at most one due tool.
    /// With the instant-ramp override, releases everything left.
    pub fn advance(&mut self, dt: RealSeconds) -> Vec<ToolConfig> {
        if !self.state.globally_unlocked {
            return Vec::new();
        }
        if self.instant_ramp {
            return self.release_all();
        }
        self.ramp_elapsed += dt.max(0.0);
        match self.tools.get(self.state.unlocked_tool_ids.len()) {
            Some(next) if next.offset <= self.ramp_elapsed => {
                let tool = next.clone();
                self.state.unlocked_tool_ids.push(tool.id.clone());
                log::debug!("tool {} online at ramp {:.1}s", tool.id, self.ramp_elapsed);
                vec![tool]
            }
            _ => Vec::new(),
        }
    }

    /// Short-circuit the ramp. If the unlock has not fired yet, the
    /// override applies from the trigger onward.
    pub fn skip_ramp(&mut self) -> Vec<ToolConfig> {
        self.instant_ramp = true;
        if self.state.globally_unlocked {
            self.release_all()
        } else {
            Vec::new()
        }
    }

    fn release_all(&mut self) -> Vec<ToolConfig> {
        let pending: Vec<ToolConfig> = self.tools[self.state.unlocked_tool_ids.len()..].to_vec();
        for tool in &pending {
            self.state.unlocked_tool_ids.push(tool.id.clone());
        }
        pending
    }
}

//! The session engine: one workday from 8:00 AM to 5:00 PM.
//!
//! EXECUTION ORDER per tick (fixed, documented, never reordered):
//!   1. Sanitize the frame delta (non-finite / negative → 0, optional cap)
//!   2. Clock advances by delta × speed
//!   3. Task store counts down Queued deadlines and expires what hit zero
//!   4. Phase is reclassified from elapsed time (event on change)
//!   5. Due spawn events are drained into the queue
//!   6. Unlock fires on the first tick at or past the unlock phase
//!   7. Tool ramp releases at most one tool
//!   8. Day ends once game time reaches the configured total
//!
//! RULES:
//!   - Single writer. Every mutation happens inside one `&mut self` call
//!     that runs to completion; player actions and ticks are never
//!     interleaved. Share the engine behind a Mutex if it must cross threads.
//!   - Pausing is a gate, not a stop: `tick` is still called every frame
//!     and simply does nothing.
//!   - All randomness flows through the engine's `RandomSource`.

use crate::{
    clock::SessionClock,
    command::PlayerCommand,
    config::DayConfig,
    error::{DayError, DayResult},
    event::GameEvent,
    lifecycle::TaskStore,
    phase::PacingPhase,
    rng::{RandomSource, SessionRng},
    scenario::{RoundRobinScenarios, ScenarioSource},
    schedule::{generate_schedule, SpawnEvent},
    snapshot::EngineSnapshot,
    stats::Scorecard,
    task::TaskInstance,
    types::{RealSeconds, SessionId, TaskId},
    unlock::UnlockController,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Before the first start, or after a reset.
    Idle,
    Running,
    /// Terminal summary state. Clock frozen.
    Ended,
}

pub struct DayEngine {
    session_id:   SessionId,
    seed:         Option<u64>,
    config:       DayConfig,
    status:       SessionStatus,
    clock:        SessionClock,
    tasks:        TaskStore,
    unlock:       UnlockController,
    schedule:     Vec<SpawnEvent>,
    spawn_cursor: usize,
    /// Last classified phase, for edge detection.
    phase:        Option<PacingPhase>,
    rng:          Box<dyn RandomSource>,
    scenarios:    Box<dyn ScenarioSource>,
}

impl DayEngine {
    /// Entropy-seeded engine over the built-in client catalog.
    pub fn new(config: DayConfig) -> DayResult<Self> {
        let rng = SessionRng::from_entropy();
        let seed = rng.seed();
        Self::with_sources(config, Box::new(rng), Box::new(RoundRobinScenarios::builtin()))
            .map(|e| e.with_recorded_seed(seed))
    }

    /// Reproducible engine: same seed, same schedule.
    pub fn with_seed(config: DayConfig, seed: u64) -> DayResult<Self> {
        Self::with_sources(
            config,
            Box::new(SessionRng::new(seed)),
            Box::new(RoundRobinScenarios::builtin()),
        )
        .map(|e| e.with_recorded_seed(seed))
    }

    /// Engine with caller-supplied randomness and client catalog.
    pub fn with_sources(
        config: DayConfig,
        rng: Box<dyn RandomSource>,
        scenarios: Box<dyn ScenarioSource>,
    ) -> DayResult<Self> {
        config.validate()?;
        Ok(Self::assemble(config, rng, scenarios))
    }

    /// Designed tuning and a fixed seed. Used in tests.
    pub fn build_test(seed: u64) -> Self {
        Self::assemble(
            DayConfig::default(),
            Box::new(SessionRng::new(seed)),
            Box::new(RoundRobinScenarios::builtin()),
        )
        .with_recorded_seed(seed)
    }

    fn assemble(
        config: DayConfig,
        rng: Box<dyn RandomSource>,
        scenarios: Box<dyn ScenarioSource>,
    ) -> Self {
        Self {
            session_id:   String::new(),
            seed:         None,
            status:       SessionStatus::Idle,
            clock:        SessionClock::new(config.clock.clone()),
            tasks:        TaskStore::new(config.scoring.clone(), config.expired_trail_len),
            unlock:       UnlockController::new(config.unlock.clone()),
            schedule:     Vec::new(),
            spawn_cursor: 0,
            phase:        None,
            rng,
            scenarios,
            config,
        }
    }

    fn with_recorded_seed(mut self, seed: u64) -> Self {
        log::info!("engine seeded with {seed}");
        self.seed = Some(seed);
        self
    }

    // ── Session control ────────────────────────────────────────

    /// Reset everything, generate a fresh schedule, and begin ticking.
    pub fn start(&mut self) -> Vec<GameEvent> {
        self.reset_state();
        self.session_id = Uuid::new_v4().to_string();
        self.schedule = generate_schedule(&self.config.pacing, self.rng.as_mut());
        self.status = SessionStatus::Running;
        log::info!("session {} started: {} spawns scheduled", self.session_id, self.schedule.len());

        let mut events = vec![GameEvent::SessionStarted {
            session_id:  self.session_id.clone(),
            spawn_count: self.schedule.len(),
        }];
        self.update_phase(&mut events);
        self.drain_spawns(&mut events);
        events
    }

    /// Stop ticking and enter the summary state.
    pub fn end(&mut self) -> Vec<GameEvent> {
        if self.status != SessionStatus::Running {
            return Vec::new();
        }
        self.status = SessionStatus::Ended;
        log::info!(
            "session {} ended at {} ({} done, {} lost, ${:.0})",
            self.session_id,
            self.clock.display_time(),
            self.tasks.counters.tasks_completed,
            self.tasks.counters.clients_lost,
            self.tasks.counters.revenue,
        );
        vec![GameEvent::SessionEnded {
            elapsed_real_seconds: self.clock.elapsed_real_seconds,
            game_time_minutes:    self.clock.game_time_minutes,
        }]
    }

    /// Back to the pre-start state. All session state is discarded.
    pub fn reset(&mut self) -> Vec<GameEvent> {
        self.reset_state();
        self.status = SessionStatus::Idle;
        log::info!("session reset");
        vec![GameEvent::SessionReset]
    }

    pub fn set_paused(&mut self, paused: bool) -> Vec<GameEvent> {
        if self.status != SessionStatus::Running || self.clock.paused == paused {
            return Vec::new();
        }
        if paused {
            self.clock.pause();
            vec![GameEvent::SessionPaused]
        } else {
            self.clock.resume();
            vec![GameEvent::SessionResumed]
        }
    }

    pub fn pause(&mut self) -> Vec<GameEvent>  { self.set_paused(true) }
    pub fn resume(&mut self) -> Vec<GameEvent> { self.set_paused(false) }

    fn reset_state(&mut self) {
        self.clock.reset();
        self.tasks.reset();
        self.unlock.reset();
        self.scenarios.reset();
        self.schedule.clear();
        self.spawn_cursor = 0;
        self.phase = None;
    }

    // ── Tick ───────────────────────────────────────────────────

    /// Advance one frame. Frame-rate independent: `delta_real` is the
    /// measured wall-clock gap since the previous frame.
    pub fn tick(&mut self, delta_real: RealSeconds) -> Vec<GameEvent> {
        if self.status != SessionStatus::Running || self.clock.paused {
            return Vec::new();
        }
        let delta = self.sanitize_delta(delta_real);
        let dt = self.clock.advance(delta);

        let mut events: Vec<GameEvent> = self
            .tasks
            .advance(dt)
            .into_iter()
            .map(|t| GameEvent::TaskExpired { task_id: t.id, task_type: t.task_type })
            .collect();

        self.after_clock_moved(&mut events, dt);
        events
    }

    /// Steps 4–8 of the tick order. Shared with the debug phase skip.
    fn after_clock_moved(&mut self, events: &mut Vec<GameEvent>, ramp_dt: RealSeconds) {
        self.update_phase(events);
        self.drain_spawns(events);
        // The trigger tick starts the ramp at zero.
        let ramp_dt = if self.check_unlock(events) { 0.0 } else { ramp_dt };
        for tool in self.unlock.advance(ramp_dt) {
            events.push(GameEvent::ToolUnlocked { tool_id: tool.id, label: tool.label });
        }
        if self.clock.is_day_over() {
            events.extend(self.end());
        }
    }

    fn sanitize_delta(&self, delta: RealSeconds) -> RealSeconds {
        if !delta.is_finite() || delta < 0.0 {
            log::warn!("tick delta {delta} rejected; treating as 0");
            return 0.0;
        }
        match self.config.max_tick_delta {
            Some(cap) if delta > cap => cap,
            _ => delta,
        }
    }

    fn update_phase(&mut self, events: &mut Vec<GameEvent>) {
        let elapsed = self.clock.elapsed_real_seconds;
        let phase = PacingPhase::classify(elapsed, &self.config.phases);
        if self.phase != Some(phase) {
            log::debug!("phase {:?} -> {phase} at {elapsed:.1}s", self.phase);
            events.push(GameEvent::PhaseChanged { from: self.phase, to: phase, at: elapsed });
            self.phase = Some(phase);
        }
    }

    fn drain_spawns(&mut self, events: &mut Vec<GameEvent>) {
        let elapsed = self.clock.elapsed_real_seconds;
        while let Some(spawn) = self.schedule.get(self.spawn_cursor) {
            if spawn.spawn_at_real_seconds > elapsed {
                break;
            }
            let (task_type, deadline) = (spawn.task_type, spawn.initial_deadline_seconds);
            self.spawn_cursor += 1;

            let task = self.tasks.create_task(
                task_type,
                deadline,
                self.clock.game_time_minutes,
                self.unlock.is_unlocked(),
                self.scenarios.as_mut(),
            );
            log::debug!("spawned task {} ({task_type}) for {}", task.id, task.business_name);
            events.push(GameEvent::TaskSpawned {
                task_id:   task.id,
                task_type,
                deadline:  task.original_deadline_seconds,
                capability_assisted: task.capability_assisted,
            });
            self.tasks.enqueue(task);
        }
    }

    /// Fire the unlock on the first observation of the unlock phase or
    /// later. Returns true only on the tick that fired it.
    fn check_unlock(&mut self, events: &mut Vec<GameEvent>) -> bool {
        let due = self.phase.is_some_and(|p| p.is_unlock_or_later());
        if !due || self.unlock.is_unlocked() {
            return false;
        }
        let fired = self
            .unlock
            .trigger(
                &self.tasks.counters,
                self.clock.elapsed_real_seconds,
                self.clock.game_time_minutes,
            )
            .cloned();
        match fired {
            Some(snapshot) => {
                events.push(GameEvent::CapabilityUnlocked { snapshot });
                true
            }
            None => false,
        }
    }

    // ── Widget callbacks ───────────────────────────────────────

    /// Make a Queued task Active. Stale ids are a silent no-op.
    pub fn select_task(&mut self, task_id: TaskId) -> Vec<GameEvent> {
        if self.status != SessionStatus::Running {
            return Vec::new();
        }
        match self.tasks.select(task_id) {
            Some(task) => vec![GameEvent::TaskSelected { task_id, task_type: task.task_type }],
            None => Vec::new(),
        }
    }

    /// The active task's widget reports success with the revenue earned.
    pub fn complete_active(&mut self, revenue: f64) -> Vec<GameEvent> {
        if self.status != SessionStatus::Running {
            return Vec::new();
        }
        let unlocked = self.unlock.is_unlocked();
        match self.tasks.complete_active(revenue, unlocked) {
            Some((task, credited)) => vec![GameEvent::TaskCompleted {
                task_id:   task.id,
                task_type: task.task_type,
                revenue:   credited,
            }],
            None => Vec::new(),
        }
    }

    pub fn record_interaction(&mut self) {
        if self.status == SessionStatus::Running {
            self.tasks.record_interaction();
        }
    }

    // ── Debug surface ──────────────────────────────────────────

    pub fn set_speed(&mut self, speed: f64) -> DayResult<Vec<GameEvent>> {
        self.clock.set_speed(speed)?;
        log::debug!("speed set to {speed}x");
        Ok(vec![GameEvent::SpeedChanged { speed }])
    }

    /// Jump to the start of `phase`. Arrivals scheduled before the new
    /// time are discarded. Landing at or past the unlock phase fires the
    /// unlock exactly as a natural arrival would.
    pub fn skip_to_phase(&mut self, phase: PacingPhase) -> DayResult<Vec<GameEvent>> {
        if self.status != SessionStatus::Running {
            return Err(DayError::SessionNotRunning);
        }
        let target = phase.start_seconds(&self.config.phases);
        self.clock.set_elapsed(target);

        let cursor = self.schedule.partition_point(|e| e.spawn_at_real_seconds < target);
        let skipped = cursor.saturating_sub(self.spawn_cursor);
        self.spawn_cursor = cursor;
        log::info!("skipped to {phase} ({target:.0}s), {skipped} spawns discarded");

        let mut events = vec![GameEvent::PhaseSkipped { to: phase, elapsed: target, skipped_spawns: skipped }];
        self.after_clock_moved(&mut events, 0.0);
        Ok(events)
    }

    /// Bring every remaining tool online now, and make any future
    /// unlock instant.
    pub fn skip_unlock_ramp(&mut self) -> Vec<GameEvent> {
        self.unlock
            .skip_ramp()
            .into_iter()
            .map(|tool| GameEvent::ToolUnlocked { tool_id: tool.id, label: tool.label })
            .collect()
    }

    pub fn apply(&mut self, command: PlayerCommand) -> DayResult<Vec<GameEvent>> {
        let events = match command {
            PlayerCommand::Start                 => self.start(),
            PlayerCommand::Pause                 => self.pause(),
            PlayerCommand::Resume                => self.resume(),
            PlayerCommand::SetPaused { paused }  => self.set_paused(paused),
            PlayerCommand::End                   => self.end(),
            PlayerCommand::Reset                 => self.reset(),
            PlayerCommand::SelectTask { task_id } => self.select_task(task_id),
            PlayerCommand::CompleteActive { revenue } => self.complete_active(revenue),
            PlayerCommand::RecordInteraction     => {
                self.record_interaction();
                Vec::new()
            }
            PlayerCommand::SetSpeed { speed }    => self.set_speed(speed)?,
            PlayerCommand::SkipToPhase { phase } => self.skip_to_phase(phase)?,
            PlayerCommand::SkipUnlockRamp        => self.skip_unlock_ramp(),
        };
        Ok(events)
    }

    // ── Queries ────────────────────────────────────────────────

    pub fn session_id(&self) -> &str { &self.session_id }
    pub fn seed(&self) -> Option<u64> { self.seed }
    pub fn status(&self) -> SessionStatus { self.status }
    pub fn clock(&self) -> &SessionClock { &self.clock }
    pub fn phase(&self) -> Option<PacingPhase> { self.phase }
    pub fn config(&self) -> &DayConfig { &self.config }
    pub fn tasks(&self) -> &TaskStore { &self.tasks }
    pub fn unlock(&self) -> &UnlockController { &self.unlock }
    pub fn schedule(&self) -> &[SpawnEvent] { &self.schedule }

    /// True when `task` should be worked through its automation tool.
    /// Assisted tasks wait for their tool to come online on the ramp.
    pub fn tool_online_for(&self, task: &TaskInstance) -> bool {
        self.unlock.state.assists(task)
    }

    pub fn spawns_remaining(&self) -> usize {
        self.schedule.len().saturating_sub(self.spawn_cursor)
    }

    /// End-of-day before/after comparison. Valid at any time.
    pub fn scorecard(&self) -> Scorecard {
        Scorecard::compute(
            &self.tasks.counters,
            self.unlock.snapshot(),
            self.clock.elapsed_real_seconds,
            &self.config.scoring,
        )
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            session_id:        self.session_id.clone(),
            seed:              self.seed,
            status:            self.status,
            phase:             self.phase,
            elapsed_real_seconds: self.clock.elapsed_real_seconds,
            game_time_minutes: self.clock.game_time_minutes,
            display_time:      self.clock.display_time(),
            paused:            self.clock.paused,
            speed_multiplier:  self.clock.speed_multiplier,
            queue:             self.tasks.queue().to_vec(),
            active_task:       self.tasks.active().cloned(),
            active_tool_online: self.tasks.active().is_some_and(|t| self.tool_online_for(t)),
            recently_expired:  self.tasks.recently_expired().cloned().collect(),
            counters:          self.tasks.counters.clone(),
            admin_ratio:       self.tasks.counters.admin_ratio(),
            capability_unlocked: self.unlock.is_unlocked(),
            unlocked_tools:    self.unlock.state.unlocked_tool_ids.clone(),
            before_unlock:     self.unlock.snapshot().cloned(),
            spawns_remaining:  self.spawns_remaining(),
        }
    }
}

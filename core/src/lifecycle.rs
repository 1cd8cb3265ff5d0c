//! Task lifecycle store: the authoritative task state machine.
//!
//!   Queued ──select──▶ Active ──complete──▶ Completed
//!     │
//!     └──deadline hits 0──▶ Expired
//!
//! RULES:
//!   - At most one Active task; it is removed from the queue the instant
//!     it is selected.
//!   - Only Queued tasks count down and expire. Selecting a task freezes
//!     its timer.
//!   - Stale references (unknown, expired, completed ids) are silent no-ops.
//!   - Selection is rejected while another task is Active.

use crate::{
    config::ScoringConfig,
    scenario::ScenarioSource,
    stats::Counters,
    task::{TaskInstance, TaskStatus, TaskType},
    types::{GameMinutes, RealSeconds, TaskId},
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStore {
    next_id:  TaskId,
    queue:    Vec<TaskInstance>,
    active:   Option<TaskInstance>,
    /// Display only. Never read by scoring or transitions.
    recently_expired: VecDeque<TaskInstance>,
    expired_trail_len: usize,
    pub counters: Counters,
    scoring:  ScoringConfig,
}

impl TaskStore {
    pub fn new(scoring: ScoringConfig, expired_trail_len: usize) -> Self {
        Self {
            next_id:  0,
            queue:    Vec::new(),
            active:   None,
            recently_expired: VecDeque::new(),
            expired_trail_len,
            counters: Counters::new(scoring.satisfaction_ceiling),
            scoring,
        }
    }

    /// Drop every task and zero the counters. Ids restart at 1.
    pub fn reset(&mut self) {
        self.next_id = 0;
        self.queue.clear();
        self.active = None;
        self.recently_expired.clear();
        self.counters = Counters::new(self.scoring.satisfaction_ceiling);
    }

    // ── Creation ───────────────────────────────────────────────

    /// Build a new Queued task. Never fails: the scenario source always
    /// yields a client.
    ///
    /// `capability_unlocked` is read once here; the resulting
    /// `capability_assisted` flag is never recomputed.
    pub fn create_task(
        &mut self,
        task_type: TaskType,
        deadline: f64,
        created_at: GameMinutes,
        capability_unlocked: bool,
        scenarios: &mut dyn ScenarioSource,
    ) -> TaskInstance {
        let scenario = scenarios.next_scenario();
        self.next_id += 1;
        let is_gold = task_type.is_gold();
        let deadline = if deadline.is_finite() { deadline.max(0.0) } else { 0.0 };
        TaskInstance {
            id: self.next_id,
            task_type,
            client_name: scenario.client_name.clone(),
            business_name: scenario.business_name.clone(),
            scenario: scenario.to_payload(),
            created_at_game_minutes: created_at,
            remaining_deadline_seconds: deadline,
            original_deadline_seconds: deadline,
            is_gold,
            capability_assisted: capability_unlocked && !is_gold,
            status: TaskStatus::Queued,
        }
    }

    pub fn enqueue(&mut self, mut task: TaskInstance) {
        task.status = TaskStatus::Queued;
        self.queue.push(task);
    }

    // ── Tick ───────────────────────────────────────────────────

    /// Count down every Queued deadline by `dt` (already speed-scaled),
    /// bucket active time, then expire whatever reached zero.
    /// Returns the tasks expired this tick, in queue order.
    pub fn advance(&mut self, dt: RealSeconds) -> Vec<TaskInstance> {
        if dt > 0.0 {
            for task in &mut self.queue {
                task.remaining_deadline_seconds = (task.remaining_deadline_seconds - dt).max(0.0);
            }
            match &self.active {
                Some(t) if t.is_gold => self.counters.selling_seconds += dt,
                Some(_)              => self.counters.admin_seconds += dt,
                None                 => {}
            }
        }
        self.expire_due()
    }

    fn expire_due(&mut self) -> Vec<TaskInstance> {
        let (due, keep): (Vec<_>, Vec<_>) = std::mem::take(&mut self.queue)
            .into_iter()
            .partition(|t| t.remaining_deadline_seconds <= 0.0);
        self.queue = keep;

        let mut expired = Vec::with_capacity(due.len());
        for mut task in due {
            task.remaining_deadline_seconds = 0.0;
            task.status = TaskStatus::Expired;
            self.counters.clients_lost += 1;
            self.counters.satisfaction =
                (self.counters.satisfaction - self.scoring.expiry_penalty).max(0.0);
            log::debug!("task {} ({}) expired; clients lost = {}",
                task.id, task.task_type, self.counters.clients_lost);

            self.recently_expired.push_back(task.clone());
            while self.recently_expired.len() > self.expired_trail_len {
                self.recently_expired.pop_front();
            }
            expired.push(task);
        }
        expired
    }

    // ── Player actions ─────────────────────────────────────────

    /// Queued → Active. Returns the newly active task, or None if the id
    /// is stale or another task is already being worked.
    pub fn select(&mut self, task_id: TaskId) -> Option<&TaskInstance> {
        if self.active.is_some() {
            log::debug!("select {task_id} ignored: a task is already active");
            return None;
        }
        let Some(index) = self
            .queue
            .iter()
            .position(|t| t.id == task_id && t.status == TaskStatus::Queued)
        else {
            log::debug!("select {task_id} ignored: not queued");
            return None;
        };
        let mut task = self.queue.remove(index);
        task.status = TaskStatus::Active;
        self.active = Some(task);
        self.active.as_ref()
    }

    /// Active → Completed. `capability_unlocked` gates the satisfaction
    /// boost. Returns the completed task and the revenue actually
    /// credited, or None when nothing is active.
    pub fn complete_active(
        &mut self,
        revenue: f64,
        capability_unlocked: bool,
    ) -> Option<(TaskInstance, f64)> {
        let mut task = self.active.take()?;
        task.status = TaskStatus::Completed;

        let revenue = if revenue.is_finite() && revenue >= 0.0 {
            revenue
        } else {
            log::warn!("task {} completed with invalid revenue {revenue}; counting 0", task.id);
            0.0
        };

        let c = &mut self.counters;
        c.tasks_completed += 1;
        c.revenue += revenue;
        if capability_unlocked {
            c.satisfaction = (c.satisfaction + self.scoring.completion_boost)
                .min(self.scoring.satisfaction_ceiling);
        }
        match task.task_type {
            TaskType::DiscoveryCall        => c.discovery_calls += 1,
            TaskType::ProposalPresentation => c.policies_bound += 1,
            _ => {}
        }
        Some((task, revenue))
    }

    pub fn record_interaction(&mut self) {
        self.counters.total_interactions += 1;
    }

    // ── Queries ────────────────────────────────────────────────

    pub fn queue(&self) -> &[TaskInstance] {
        &self.queue
    }

    pub fn active(&self) -> Option<&TaskInstance> {
        self.active.as_ref()
    }

    pub fn recently_expired(&self) -> impl Iterator<Item = &TaskInstance> {
        self.recently_expired.iter()
    }

    pub fn find_queued(&self, task_id: TaskId) -> Option<&TaskInstance> {
        self.queue.iter().find(|t| t.id == task_id)
    }

    /// Oldest Queued task, i.e. the head of the spawn order.
    pub fn oldest_queued(&self) -> Option<&TaskInstance> {
        self.queue.first()
    }
}

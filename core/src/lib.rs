//! Deskday core: pacing, scheduling and task lifecycle for a compressed
//! broker workday.
//!
//! The engine is the only mutator. Widgets read the active task from
//! [`engine::DayEngine`] and report back through its callbacks; nothing in
//! here knows how a task is rendered or solved.

pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod phase;
pub mod rng;
pub mod scenario;
pub mod schedule;
pub mod snapshot;
pub mod stats;
pub mod task;
pub mod types;
pub mod unlock;

//! Shared primitive types used across the entire engine.

/// Real (wall-clock) seconds since session start, after speed scaling.
pub type RealSeconds = f64;

/// In-game minutes since the start of the workday (0 = 8:00 AM).
pub type GameMinutes = f64;

/// Monotonic task identifier, unique within a session.
pub type TaskId = u64;

/// The canonical session identifier.
pub type SessionId = String;

/// Stable identifier of an automation tool.
pub type ToolId = String;

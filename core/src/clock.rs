//! Session clock. Owns elapsed time, speed and pause.
//!
//! Real seconds drive everything; game minutes are always derived:
//! `game = elapsed × total_game_minutes / total_real_seconds`, clamped
//! to `[0, total_game_minutes]`.

use crate::{
    config::ClockConfig,
    error::{DayError, DayResult},
    types::{GameMinutes, RealSeconds},
};
use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClock {
    pub elapsed_real_seconds: RealSeconds,
    pub game_time_minutes:    GameMinutes,
    pub speed_multiplier:     f64,
    pub paused:               bool,
    config:                   ClockConfig,
}

impl SessionClock {
    pub fn new(config: ClockConfig) -> Self {
        Self {
            elapsed_real_seconds: 0.0,
            game_time_minutes:    0.0,
            speed_multiplier:     1.0,
            paused:               false,
            config,
        }
    }

    /// Back to 8:00 AM. Speed survives a reset; pause does not.
    pub fn reset(&mut self) {
        self.elapsed_real_seconds = 0.0;
        self.game_time_minutes = 0.0;
        self.paused = false;
    }

    /// Advance by `delta_real × speed`. Returns the scaled delta applied,
    /// 0.0 while paused. Callers sanitize `delta_real` first.
    pub fn advance(&mut self, delta_real: RealSeconds) -> RealSeconds {
        if self.paused {
            return 0.0;
        }
        let scaled = delta_real * self.speed_multiplier;
        self.elapsed_real_seconds += scaled;
        self.recompute_game_time();
        scaled
    }

    /// Jump straight to `elapsed`. Used by the debug phase skip.
    pub fn set_elapsed(&mut self, elapsed: RealSeconds) {
        self.elapsed_real_seconds = elapsed.max(0.0);
        self.recompute_game_time();
    }

    pub fn pause(&mut self)  { self.paused = true;  }
    pub fn resume(&mut self) { self.paused = false; }

    /// Any finite positive multiplier. Anything else is rejected and the
    /// current speed is kept.
    pub fn set_speed(&mut self, speed: f64) -> DayResult<()> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(DayError::InvalidSpeed { value: speed });
        }
        self.speed_multiplier = speed;
        Ok(())
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn is_day_over(&self) -> bool {
        self.game_time_minutes >= self.config.total_game_minutes
    }

    pub fn display_time(&self) -> String {
        to_display_time(&self.config, self.game_time_minutes)
    }

    fn recompute_game_time(&mut self) {
        self.game_time_minutes = game_minutes_at(&self.config, self.elapsed_real_seconds);
    }
}

pub fn game_minutes_at(config: &ClockConfig, elapsed: RealSeconds) -> GameMinutes {
    (elapsed * config.total_game_minutes / config.total_real_seconds)
        .clamp(0.0, config.total_game_minutes)
}

const MINUTES_PER_DAY: i64 = 24 * 60;

/// 12-hour wall-clock label for a game minute: 0 → "8:00 AM", 540 → "5:00 PM".
pub fn to_display_time(config: &ClockConfig, game_minutes: GameMinutes) -> String {
    let minutes = if game_minutes.is_finite() {
        game_minutes.clamp(0.0, config.total_game_minutes.max(0.0)).floor() as i64
    } else {
        0
    };
    let start = NaiveTime::from_hms_opt(config.day_start_hour, 0, 0).unwrap_or_default();
    let offset = Duration::minutes(minutes.rem_euclid(MINUTES_PER_DAY));
    let (time, _) = start.overflowing_add_signed(offset);
    time.format("%-I:%M %p").to_string()
}

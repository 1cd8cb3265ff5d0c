//! Session engine tests. Clock and pause gate, plus the debug surface.

use deskday_core::{
    command::PlayerCommand,
    config::DayConfig,
    engine::{DayEngine, SessionStatus},
    error::DayError,
    event::GameEvent,
    phase::PacingPhase,
    scenario::{builtin_catalog, load_catalog},
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn started(seed: u64) -> DayEngine {
    init_logging();
    let mut engine = DayEngine::build_test(seed);
    engine.start();
    engine
}

fn spawned_ids(events: &[GameEvent]) -> Vec<u64> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::TaskSpawned { task_id, .. } => Some(*task_id),
            _ => None,
        })
        .collect()
}

#[test]
fn start_enters_tutorial_with_a_fresh_schedule() {
    init_logging();
    let mut engine = DayEngine::build_test(1);
    assert_eq!(engine.status(), SessionStatus::Idle);

    let events = engine.start();
    assert!(matches!(
        events[0],
        GameEvent::SessionStarted { spawn_count, .. } if spawn_count == engine.schedule().len()
    ));
    assert!(events.contains(&GameEvent::PhaseChanged { from: None, to: PacingPhase::Tutorial, at: 0.0 }));
    assert_eq!(engine.status(), SessionStatus::Running);
    assert!(!engine.session_id().is_empty());
    assert_eq!(engine.seed(), Some(1));
    assert_eq!(engine.clock().display_time(), "8:00 AM");
    assert!(engine.tasks().queue().is_empty());
}

#[test]
fn unattended_day_runs_to_five_pm_and_loses_every_client() {
    let mut engine = started(2024);
    let mut phases = Vec::new();
    let mut ticks = 0;
    while engine.status() == SessionStatus::Running {
        for event in engine.tick(1.0) {
            if let GameEvent::PhaseChanged { to, .. } = event {
                phases.push(to);
            }
        }
        ticks += 1;
        assert!(ticks <= 600, "day did not end on time");
    }

    assert_eq!(ticks, 600);
    assert_eq!(engine.status(), SessionStatus::Ended);
    assert_eq!(engine.clock().elapsed_real_seconds, 600.0);
    assert_eq!(engine.clock().game_time_minutes, 540.0);
    assert_eq!(engine.clock().display_time(), "5:00 PM");
    assert_eq!(engine.phase(), Some(PacingPhase::Winddown));
    assert_eq!(phases, PacingPhase::ALL[1..].to_vec());

    let counters = &engine.tasks().counters;
    assert_eq!(counters.clients_lost as usize, engine.schedule().len());
    assert_eq!(counters.satisfaction, 0.0);
    assert!(engine.tasks().queue().is_empty());
    assert!(engine.unlock().ramp_complete());

    // Frozen after the end.
    assert!(engine.tick(1.0).is_empty());
    assert!(engine.end().is_empty());
    assert_eq!(engine.clock().elapsed_real_seconds, 600.0);
}

#[test]
fn large_frame_gaps_catch_up_in_one_tick() {
    let mut engine = started(9);
    let events = engine.tick(400.0);
    assert_eq!(engine.phase(), Some(PacingPhase::Mastery));
    assert!(events.iter().any(|e| matches!(e, GameEvent::CapabilityUnlocked { .. })));
    let changes = events.iter().filter(|e| matches!(e, GameEvent::PhaseChanged { .. })).count();
    assert_eq!(changes, 1, "only the observed transition is reported");
}

#[test]
fn pausing_gates_the_tick() {
    let mut engine = started(4);
    engine.tick(10.0);
    assert_eq!(engine.pause(), vec![GameEvent::SessionPaused]);
    assert!(engine.pause().is_empty());

    assert!(engine.tick(100.0).is_empty());
    assert_eq!(engine.clock().elapsed_real_seconds, 10.0);
    let deadline = engine.tasks().queue()[0].remaining_deadline_seconds;

    // Player actions still land while paused.
    let id = engine.tasks().queue()[0].id;
    assert_eq!(engine.select_task(id).len(), 1);

    assert_eq!(engine.resume(), vec![GameEvent::SessionResumed]);
    engine.tick(1.0);
    assert_eq!(engine.clock().elapsed_real_seconds, 11.0);
    assert_eq!(engine.tasks().active().map(|t| t.remaining_deadline_seconds), Some(deadline));
}

#[test]
fn degenerate_deltas_are_treated_as_zero() {
    let mut engine = started(6);
    engine.tick(5.0);
    for bad in [f64::NAN, -3.0, f64::INFINITY, f64::NEG_INFINITY] {
        engine.tick(bad);
        assert_eq!(engine.clock().elapsed_real_seconds, 5.0, "delta {bad}");
    }
    assert_eq!(engine.status(), SessionStatus::Running);
}

#[test]
fn configured_cap_limits_a_single_tick() {
    init_logging();
    let mut config = DayConfig::default();
    config.max_tick_delta = Some(0.5);
    let mut engine = DayEngine::with_seed(config, 6).unwrap();
    engine.start();
    engine.tick(30.0);
    assert_eq!(engine.clock().elapsed_real_seconds, 0.5);
}

#[test]
fn speed_scales_time_and_rejects_bad_values() {
    let mut engine = started(12);
    assert_eq!(engine.set_speed(4.0).unwrap(), vec![GameEvent::SpeedChanged { speed: 4.0 }]);
    engine.tick(1.0);
    assert_eq!(engine.clock().elapsed_real_seconds, 4.0);
    assert!((engine.clock().game_time_minutes - 3.6).abs() < 1e-9);

    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(engine.set_speed(bad), Err(DayError::InvalidSpeed { .. })));
    }
    assert_eq!(engine.clock().speed_multiplier, 4.0);

    // Deadlines count down in scaled time.
    engine.tick(1.0);
    let tutorial = &engine.tasks().queue()[0];
    assert_eq!(tutorial.remaining_deadline_seconds, 35.0 - 4.0);
}

#[test]
fn skip_to_phase_discards_passed_arrivals() {
    let mut engine = started(31);
    let passed = engine
        .schedule()
        .iter()
        .filter(|e| e.spawn_at_real_seconds < 360.0)
        .count();

    let events = engine.skip_to_phase(PacingPhase::Mastery).unwrap();
    assert!(events.contains(&GameEvent::PhaseSkipped {
        to: PacingPhase::Mastery,
        elapsed: 360.0,
        skipped_spawns: passed,
    }));
    assert_eq!(engine.clock().elapsed_real_seconds, 360.0);
    assert_eq!(engine.clock().display_time(), "1:24 PM");
    assert_eq!(engine.spawns_remaining() + passed, engine.schedule().len() - spawned_ids(&events).len());
    assert_eq!(engine.tasks().counters.clients_lost, 0);
}

#[test]
fn skip_to_phase_requires_a_running_session() {
    init_logging();
    let mut engine = DayEngine::build_test(1);
    assert!(matches!(
        engine.skip_to_phase(PacingPhase::Ramp),
        Err(DayError::SessionNotRunning)
    ));
}

#[test]
fn actions_outside_a_running_session_are_no_ops() {
    let mut engine = started(2);
    engine.tick(5.0);
    let id = engine.tasks().queue()[0].id;
    assert!(!engine.end().is_empty());

    assert!(engine.select_task(id).is_empty());
    assert!(engine.complete_active(100.0).is_empty());
    engine.record_interaction();
    assert_eq!(engine.tasks().counters.total_interactions, 0);
    assert!(engine.pause().is_empty());
}

#[test]
fn reset_and_restart_discard_the_previous_day() {
    let mut engine = started(17);
    engine.tick(50.0);
    let first_session = engine.session_id().to_string();
    assert!(!engine.tasks().queue().is_empty());

    engine.start();
    assert_ne!(engine.session_id(), first_session);
    assert_eq!(engine.clock().elapsed_real_seconds, 0.0);
    assert!(engine.tasks().queue().is_empty());
    assert_eq!(engine.tasks().counters.clients_lost, 0);

    engine.tick(400.0);
    assert!(engine.unlock().is_unlocked());
    assert_eq!(engine.reset(), vec![GameEvent::SessionReset]);
    assert_eq!(engine.status(), SessionStatus::Idle);
    assert!(!engine.unlock().is_unlocked());
    assert_eq!(engine.phase(), None);
    assert!(engine.tick(1.0).is_empty());
}

#[test]
fn gold_work_after_unlock_shows_up_as_after_revenue() {
    let mut engine = started(77);
    engine.tick(3.0);
    let acord = engine.tasks().queue()[0].id;
    engine.select_task(acord);
    engine.tick(2.0);
    engine.complete_active(500.0);

    engine.skip_to_phase(PacingPhase::UnlockTransition).unwrap();
    let events = engine.skip_to_phase(PacingPhase::Mastery).unwrap();
    let first_mastery = spawned_ids(&events)[0];
    assert_eq!(engine.select_task(first_mastery).len(), 1);
    engine.tick(1.0);
    let completed = engine.complete_active(1200.0);
    assert!(matches!(completed[0], GameEvent::TaskCompleted { revenue, .. } if revenue == 1200.0));

    let card = engine.scorecard();
    let revenue = card.row("Revenue").unwrap();
    assert_eq!((revenue.before, revenue.after), (500.0, 1200.0));
    let per_hour = card.row("Revenue / hour").unwrap();
    assert_eq!(per_hour.before, 500.0 / 5.75);
    assert_eq!(per_hour.after, 1200.0 / 3.25);
    assert_eq!(engine.tasks().counters.satisfaction, 72.0);
}

#[test]
fn commands_round_trip_through_json() {
    let mut engine = started(5);
    engine.tick(3.0);

    let select: PlayerCommand = serde_json::from_str(r#"{"cmd":"select_task","task_id":1}"#).unwrap();
    assert_eq!(select, PlayerCommand::SelectTask { task_id: 1 });
    assert_eq!(engine.apply(select).unwrap().len(), 1);

    let complete: PlayerCommand =
        serde_json::from_str(r#"{"cmd":"complete_active","revenue":250.0}"#).unwrap();
    engine.apply(complete).unwrap();
    assert_eq!(engine.tasks().counters.revenue, 250.0);

    let skip: PlayerCommand =
        serde_json::from_str(r#"{"cmd":"skip_to_phase","phase":"harper-unlock-transition"}"#).unwrap();
    engine.apply(skip).unwrap();
    assert!(engine.unlock().is_unlocked());

    assert!(engine.apply(PlayerCommand::SetSpeed { speed: -2.0 }).is_err());
    engine.apply(PlayerCommand::SetPaused { paused: true }).unwrap();
    assert!(engine.clock().paused);
}

#[test]
fn snapshot_reflects_live_state() {
    let mut engine = started(8);
    engine.tick(25.0);
    let snap = engine.snapshot();
    assert_eq!(snap.status, SessionStatus::Running);
    assert_eq!(snap.phase, Some(PacingPhase::Tutorial));
    assert_eq!(snap.queue.len(), 2);
    assert_eq!(snap.display_time, "8:22 AM");
    assert!(!snap.capability_unlocked);
    assert!(snap.before_unlock.is_none());
    assert!(!snap.active_tool_online);

    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["status"], "running");
    assert_eq!(json["phase"], "tutorial");
    assert_eq!(json["queue"][0]["task_type"], "acord-form");
}

#[test]
fn event_type_names_match_the_serde_tag() {
    let mut engine = started(3);
    let mut events = engine.tick(400.0);
    events.extend(engine.end());
    for event in events {
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.type_name());
    }
}

#[test]
fn shipped_data_files_load_and_validate() {
    init_logging();
    let config = DayConfig::load("../data").unwrap();
    assert_eq!(config, DayConfig::default());
    let catalog = load_catalog("../data").unwrap();
    assert_eq!(catalog.len(), 20);
    assert_eq!(catalog, builtin_catalog(), "the compiled-in book is the shipped file");
    assert!(catalog.iter().all(|c| !c.business_name.is_empty()));
}

#[test]
fn broken_tunings_are_rejected() {
    let config: DayConfig =
        serde_json::from_str(r#"{"pacing":{"moderate_interval":{"min":0.0,"max":4.0}}}"#).unwrap();
    assert!(matches!(
        DayEngine::with_seed(config, 1),
        Err(DayError::InvalidConfig { .. })
    ));

    let empty: DayConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, DayConfig::default());
}

//! day-runner: headless session runner for the broker workday engine.
//!
//! Usage:
//!   day-runner --seed 12345 --fps 60 --speed 4 --autoplay
//!   day-runner --seed 12345 --data-dir ./data --skip-ramp --autoplay
//!   day-runner --ipc-mode

use anyhow::Result;
use deskday_core::{
    command::PlayerCommand,
    config::DayConfig,
    engine::{DayEngine, SessionStatus},
    event::GameEvent,
    rng::{RandomSource, SessionRng},
    scenario::{load_catalog, RoundRobinScenarios},
    snapshot::EngineSnapshot,
    task::{TaskInstance, TaskType},
    types::TaskId,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Tick {
        delta: f64,
        #[serde(default = "one_frame")]
        frames: u32,
    },
    Command {
        command: PlayerCommand,
    },
    Scorecard,
    Quit,
}

fn one_frame() -> u32 {
    1
}

#[derive(serde::Serialize)]
struct IpcReply<'a> {
    events: &'a [GameEvent],
    state:  EngineSnapshot,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", rand_seed());
    let fps = parse_arg(&args, "--fps", 60.0f64).max(1.0);
    let speed = parse_arg(&args, "--speed", 1.0f64);
    let autoplay = args.iter().any(|a| a == "--autoplay");
    let skip_ramp = args.iter().any(|a| a == "--skip-ramp");
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str());

    let (config, catalog) = match data_dir {
        Some(dir) => (DayConfig::load(dir)?, load_catalog(dir)?),
        None => (DayConfig::default(), deskday_core::scenario::builtin_catalog()),
    };

    let mut engine = DayEngine::with_sources(
        config,
        Box::new(SessionRng::new(seed)),
        Box::new(RoundRobinScenarios::new(catalog)),
    )?;
    engine.set_speed(speed)?;
    if skip_ramp {
        engine.skip_unlock_ramp();
    }

    if ipc_mode {
        return run_ipc_loop(&mut engine);
    }

    println!("Broker workday: day-runner");
    println!("  seed:      {seed}");
    println!("  fps:       {fps}");
    println!("  speed:     {speed}x");
    println!("  autoplay:  {autoplay}");
    println!("  data_dir:  {}", data_dir.unwrap_or("(built-in)"));
    println!();

    run_batch(&mut engine, 1.0 / fps, autoplay, seed)?;
    print_summary(&engine);
    Ok(())
}

fn run_batch(engine: &mut DayEngine, frame: f64, autoplay: bool, seed: u64) -> Result<()> {
    let mut broker = Autoplayer::new(seed ^ 0x5eed);
    log_events(&engine.start());

    while engine.status() == SessionStatus::Running {
        let events = engine.tick(frame);
        log_events(&events);
        if autoplay {
            let dt = frame * engine.clock().speed_multiplier;
            log_events(&broker.step(engine, dt));
        }
    }
    Ok(())
}

fn run_ipc_loop(engine: &mut DayEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let events = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => Vec::new(),
            IpcCommand::Tick { delta, frames } => {
                (0..frames).flat_map(|_| engine.tick(delta)).collect()
            }
            IpcCommand::Command { command } => match engine.apply(command) {
                Ok(events) => events,
                Err(e) => {
                    writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                    stdout.flush()?;
                    continue;
                }
            },
            IpcCommand::Scorecard => {
                writeln!(stdout, "{}", serde_json::to_string(&engine.scorecard())?)?;
                stdout.flush()?;
                continue;
            }
        };

        let reply = IpcReply { events: &events, state: engine.snapshot() };
        writeln!(stdout, "{}", serde_json::to_string(&reply)?)?;
        stdout.flush()?;
    }
    Ok(())
}

/// A scripted broker: always works the oldest queued task, spends a
/// per-type dwell on it, then completes it with the revenue the
/// matching widget would report.
struct Autoplayer {
    rng:     SessionRng,
    working: Option<(TaskId, f64)>,
}

impl Autoplayer {
    fn new(seed: u64) -> Self {
        Self { rng: SessionRng::new(seed), working: None }
    }

    fn step(&mut self, engine: &mut DayEngine, dt: f64) -> Vec<GameEvent> {
        if let Some((task_id, remaining)) = self.working {
            let remaining = remaining - dt;
            if remaining > 0.0 {
                self.working = Some((task_id, remaining));
                return Vec::new();
            }
            self.working = None;
            let revenue = engine
                .tasks()
                .active()
                .map(|t| self.revenue_for(t, engine.tool_online_for(t)))
                .unwrap_or(0.0);
            engine.record_interaction();
            return engine.complete_active(revenue);
        }

        let Some(next) = engine
            .tasks()
            .oldest_queued()
            .map(|t| (t.id, dwell_seconds(t, engine.tool_online_for(t))))
        else {
            return Vec::new();
        };
        engine.record_interaction();
        let events = engine.select_task(next.0);
        if !events.is_empty() {
            self.working = Some(next);
        }
        events
    }

    fn revenue_for(&mut self, task: &TaskInstance, automated: bool) -> f64 {
        // Automated widgets pre-fill the right answer.
        let correct = automated || self.rng.chance(0.75);
        match task.task_type {
            TaskType::AcordForm            => (200.0 + self.rng.uniform(0.0, 800.0)).floor(),
            TaskType::CarrierSubmission    => 150.0,
            TaskType::CoiIssuance          => 50.0,
            TaskType::FollowUpEmail        => 100.0,
            TaskType::RenewalProcessing    => 300.0,
            TaskType::QuoteComparison      => if correct { 500.0 } else { 200.0 },
            TaskType::DiscoveryCall        => if correct { 800.0 } else { 300.0 },
            TaskType::ProposalPresentation => if correct { 1200.0 } else { 400.0 },
        }
    }
}

fn dwell_seconds(task: &TaskInstance, automated: bool) -> f64 {
    if automated {
        return 2.0;
    }
    match task.task_type {
        TaskType::AcordForm            => 9.0,
        TaskType::CarrierSubmission    => 10.0,
        TaskType::QuoteComparison      => 6.0,
        TaskType::CoiIssuance          => 5.0,
        TaskType::FollowUpEmail        => 4.0,
        TaskType::RenewalProcessing    => 8.0,
        TaskType::DiscoveryCall        => 7.0,
        TaskType::ProposalPresentation => 7.0,
    }
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::PhaseChanged { to, at, .. } => log::info!("{at:>6.1}s  phase -> {to}"),
            GameEvent::CapabilityUnlocked { snapshot } => log::info!(
                "{:>6.1}s  capability unlocked ({} done, {} lost so far)",
                snapshot.taken_at_real_seconds,
                snapshot.counters.tasks_completed,
                snapshot.counters.clients_lost
            ),
            GameEvent::ToolUnlocked { label, .. } => log::info!("         tool online: {label}"),
            GameEvent::TaskSpawned { task_id, task_type, deadline, .. } => {
                log::debug!("task {task_id}: {} ({deadline:.0}s)", task_type.label())
            }
            other => log::debug!("{}", other.type_name()),
        }
    }
}

fn print_summary(engine: &DayEngine) {
    let s = engine.snapshot();
    println!("=== DAY SUMMARY ===");
    println!("  session:        {}", s.session_id);
    println!("  final time:     {} ({:.1}s real)", s.display_time, s.elapsed_real_seconds);
    println!("  completed:      {}", s.counters.tasks_completed);
    println!("  clients lost:   {}", s.counters.clients_lost);
    println!("  revenue:        ${:.0}", s.counters.revenue);
    println!("  satisfaction:   {:.0}", s.counters.satisfaction);
    println!("  admin ratio:    {:.0}%", s.admin_ratio * 100.0);
    println!("  tools online:   {}", s.unlocked_tools.join(", "));

    println!();
    println!("=== BEFORE / AFTER ===");
    let card = engine.scorecard();
    for row in &card.rows {
        println!(
            "  {:<22} {:>10.1} {:>10.1} {}",
            row.label,
            row.before,
            row.after,
            if row.improved { "▲" } else { "" }
        );
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn rand_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

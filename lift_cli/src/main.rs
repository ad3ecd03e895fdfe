use clap::{Parser, Subcommand};
use lift_core::*;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "lift")]
#[command(about = "Workout session tracker with supersets and rest timing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Load workout days from a JSON file instead of the built-in programs
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List available workout days (default)
    Days,

    /// Run a workout session
    Run {
        /// Day to run (see `lift days`)
        #[arg(long)]
        day: String,

        /// Finish each exercise before moving on, even inside supersets
        #[arg(long)]
        no_superset: bool,

        /// Auto-complete (for testing) - log every set at target and skip rests
        #[arg(long)]
        auto_complete: bool,

        /// Identity recorded on the workout log
        #[arg(long)]
        user: Option<String>,
    },

    /// Show logged workouts, newest first
    History {
        /// Only this day
        #[arg(long)]
        day: Option<String>,

        /// Maximum number of workouts to show
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Export logged sets to CSV
    Export,

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        lift_core::logging::init_with_level("debug");
    } else {
        lift_core::logging::init();
    }

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    let programs = match &cli.catalog {
        Some(path) => ProgramCatalog::load_from(path)?,
        None => get_default_programs().clone(),
    };

    match cli.command {
        Some(Commands::Days) | None => cmd_days(&programs),
        Some(Commands::Run {
            day,
            no_superset,
            auto_complete,
            user,
        }) => cmd_run(
            &data_dir,
            &programs,
            &day,
            no_superset,
            auto_complete,
            user,
            &config,
        ),
        Some(Commands::History { day, limit }) => cmd_history(&data_dir, &programs, day, limit),
        Some(Commands::Export) => cmd_export(&data_dir),
        Some(Commands::Init { force }) => cmd_init(force),
    }
}

fn wal_path(data_dir: &Path) -> PathBuf {
    data_dir.join("wal").join("workouts.wal")
}

fn cmd_days(programs: &ProgramCatalog) -> Result<()> {
    let selectable = programs.selectable_days();

    for day in &programs.days {
        if selectable.iter().any(|d| d.id == day.id) {
            println!("  {:<16} {} ({} sets)", day.id, day.name, day.total_sets());
        } else {
            tracing::warn!("Day '{}' is malformed and cannot be run", day.id);
        }
    }

    Ok(())
}

fn cmd_run(
    data_dir: &Path,
    programs: &ProgramCatalog,
    day_id: &str,
    no_superset: bool,
    auto_complete: bool,
    user: Option<String>,
    config: &Config,
) -> Result<()> {
    let day = programs.selectable_day(day_id)?;
    let exercises = get_default_exercises();
    let superset_mode = config.session.superset_mode && !no_superset;
    let user_id = user.unwrap_or_else(|| config.session.user_id.clone());

    let mut session = WorkoutSession::new(day, RestPolicy::from_config(&config.rest))?;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", day.name);
    println!("╰─────────────────────────────────────────╯");

    if auto_complete {
        run_auto(&mut session, exercises, superset_mode)?;
    } else {
        run_interactive(&mut session, exercises, superset_mode)?;
    }

    match session.state() {
        SessionState::Complete => {
            let mut sink = JsonlSink::new(wal_path(data_dir));
            if let Some(log) = session.finish(&user_id, &mut sink)? {
                println!(
                    "\n✓ Workout logged! ({} sets)",
                    log.completed_sets()
                );
            }
        }
        _ => {
            println!("\nSession cancelled - nothing logged.");
        }
    }

    Ok(())
}

/// Log every set at its target and skip every rest
fn run_auto(
    session: &mut WorkoutSession,
    exercises: &ExerciseCatalog,
    superset_mode: bool,
) -> Result<()> {
    display_set(session, exercises);

    while !session.state().is_terminal() {
        let measured = Measurement::from_target(session.current_target());
        match session.complete_set(measured, superset_mode)? {
            Transition::RestStarted { seconds, .. } => {
                println!("  Rest {}s (skipped)", seconds);
                session.skip_rest();
                display_set(session, exercises);
            }
            Transition::Advanced(_) => display_set(session, exercises),
            _ => {}
        }
    }

    Ok(())
}

enum Event {
    Tick,
    Line(String),
    Eof,
}

fn spawn_stdin_reader(tx: Sender<Event>) {
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(Event::Line(line)).is_err() {
                        return;
                    }
                }
                Err(_) => break,
            }
        }
        let _ = tx.send(Event::Eof);
    });
}

/// Drive the session from stdin and a one-second ticker.
///
/// Both sources feed one channel, so every event is handled to completion
/// before the next one is read.
fn run_interactive(
    session: &mut WorkoutSession,
    exercises: &ExerciseCatalog,
    superset_mode: bool,
) -> Result<()> {
    let (tx, rx): (Sender<Event>, Receiver<Event>) = channel();
    spawn_stdin_reader(tx.clone());
    let mut ticker = Ticker::spawn(Duration::from_secs(1), tx, || Event::Tick);

    display_set(session, exercises);
    prompt_logging(session)?;

    while !session.state().is_terminal() {
        let event = match rx.recv() {
            Ok(event) => event,
            Err(_) => break,
        };

        let from_input = matches!(event, Event::Line(_));
        let transition = match event {
            Event::Tick => session.tick(),
            Event::Eof => session.cancel(),
            Event::Line(line) => match session.state() {
                SessionState::Logging => handle_logging_input(session, &line, superset_mode)?,
                SessionState::Resting => handle_resting_input(session, &line),
                _ => Transition::Ignored,
            },
        };

        match transition {
            Transition::Advanced(_) | Transition::Resumed(_) => {
                display_set(session, exercises);
                prompt_logging(session)?;
            }
            Transition::RestStarted { seconds, .. } => {
                println!("  Rest {}s  ('s' skip, '+N' add seconds, 'p' pause, 'q' quit)", seconds);
            }
            Transition::RestTick { remaining } => {
                if remaining % 15 == 0 || remaining <= 5 {
                    println!("  {}s", remaining);
                }
            }
            Transition::RestAdjusted(rest) => {
                let status = if rest.is_running { "running" } else { "paused" };
                println!("  Rest {}s remaining ({})", rest.time_remaining, status);
            }
            Transition::Ignored => {
                if from_input && session.state() == SessionState::Logging {
                    prompt_logging(session)?;
                }
            }
            Transition::Completed | Transition::Cancelled => {}
        }
    }

    ticker.stop();
    Ok(())
}

fn handle_logging_input(
    session: &mut WorkoutSession,
    line: &str,
    superset_mode: bool,
) -> Result<Transition> {
    let input = line.trim();
    if input.eq_ignore_ascii_case("q") {
        return Ok(session.cancel());
    }

    match parse_measurement(input, session.current_target()) {
        Ok(measured) => session.complete_set(measured, superset_mode),
        Err(msg) => {
            println!("  {}", msg);
            Ok(Transition::Ignored)
        }
    }
}

fn handle_resting_input(session: &mut WorkoutSession, line: &str) -> Transition {
    let input = line.trim().to_lowercase();
    match input.as_str() {
        "" | "s" => session.skip_rest(),
        "p" => {
            if session.rest_clock().is_running {
                session.pause_rest()
            } else {
                session.resume_rest()
            }
        }
        "q" => session.cancel(),
        other => match other.strip_prefix('+').and_then(|n| n.parse::<u32>().ok()) {
            Some(seconds) => session.add_rest_time(seconds),
            None => {
                tracing::debug!("Ignoring rest input {:?}", other);
                Transition::Ignored
            }
        },
    }
}

/// Parse what the athlete typed for a set.
///
/// Empty input accepts the target. Rep targets take `reps` or
/// `weight reps`; timed targets take seconds.
fn parse_measurement(input: &str, target: &TargetSet) -> std::result::Result<Measurement, String> {
    if input.is_empty() {
        return Ok(Measurement::from_target(target));
    }

    let parts: Vec<&str> = input.split_whitespace().collect();

    if let TargetKind::Time { .. } = target.kind() {
        return parts[0]
            .trim_end_matches('s')
            .parse::<u32>()
            .map(Measurement::duration)
            .map_err(|_| format!("Expected seconds, got '{}'", input));
    }

    match parts.as_slice() {
        [reps] => reps
            .parse::<u32>()
            .map(|r| Measurement::reps(None, r))
            .map_err(|_| format!("Expected reps, got '{}'", input)),
        [weight, reps] => {
            let weight = weight
                .parse::<f64>()
                .map_err(|_| format!("Expected weight, got '{}'", weight))?;
            let reps = reps
                .parse::<u32>()
                .map_err(|_| format!("Expected reps, got '{}'", reps))?;
            Ok(Measurement::reps(Some(weight), reps))
        }
        _ => Err("Enter 'reps' or 'weight reps'".into()),
    }
}

fn display_set(session: &WorkoutSession, exercises: &ExerciseCatalog) {
    let snap = session.snapshot();
    let name = exercises.display_name(&snap.exercise_slot);

    println!();
    print!("  [{}] {}", snap.section_name, name);
    if let Some(pos) = snap.superset {
        print!("  (superset {}/{})", pos.index, pos.size);
    }
    println!();

    let per_side = if snap.is_per_side { " per side" } else { "" };
    println!(
        "  Set {}/{}: {}{}",
        snap.set_number, snap.set_count, snap.target_reps, per_side
    );
    println!(
        "  Progress: {}/{} sets ({:.0}%)",
        snap.progress.completed,
        snap.progress.total,
        snap.progress.fraction() * 100.0
    );
}

fn prompt_logging(session: &WorkoutSession) -> Result<()> {
    let hint = match session.current_target().kind() {
        TargetKind::Time { .. } => "seconds",
        _ => "weight reps",
    };
    print!("  Enter {} (blank = target, 'q' quit) > ", hint);
    io::stdout().flush()?;
    Ok(())
}

fn cmd_history(
    data_dir: &Path,
    programs: &ProgramCatalog,
    day: Option<String>,
    limit: Option<usize>,
) -> Result<()> {
    let filter = LogFilter {
        day_id: day,
        limit,
        ..LogFilter::default()
    };
    let logs = query_logs(&wal_path(data_dir), &filter)?;

    if logs.is_empty() {
        println!("No workouts logged yet.");
        return Ok(());
    }

    for log in &logs {
        let name = programs
            .day(&log.day_id)
            .map_or(log.day_name.as_str(), |d| d.name.as_str());
        let minutes = (log.completed_at - log.started_at).num_minutes();
        println!(
            "  {}  {:<16} {} sets  {} min",
            log.completed_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M"),
            name,
            log.completed_sets(),
            minutes
        );
    }

    Ok(())
}

fn cmd_export(data_dir: &Path) -> Result<()> {
    let wal = wal_path(data_dir);
    if !wal.exists() {
        println!("No workouts logged - nothing to export.");
        return Ok(());
    }

    let csv_path = data_dir.join("workouts.csv");
    let count = lift_core::csv_export::export_csv(&wal, &csv_path)?;

    println!("✓ Exported {} sets to CSV", count);
    println!("  CSV: {}", csv_path.display());
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let path = Config::default_config_path();
    if path.exists() && !force {
        println!("Config already exists at {}", path.display());
        println!("  Use --force to overwrite.");
        return Ok(());
    }

    Config::default().save()?;
    println!("✓ Wrote default config to {}", path.display());
    Ok(())
}

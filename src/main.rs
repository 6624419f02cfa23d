use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use truestreak::handlers::{
    CreateCycleRequest, LogWorkoutRequest, RenameCycleRequest, ReviewRequest, SkipWorkoutRequest,
    UpdateCycleStructureRequest,
};
use truestreak::models::{CompletedExercise, DayInput, Plan, TierUpEvent};
use truestreak::{ApiError, Caller, Config, SqliteStore, SystemClock, TracingTelemetry, TrueStreak};

type App = TrueStreak<SqliteStore, TracingTelemetry, SystemClock>;

#[derive(Parser)]
#[command(name = "truestreak")]
#[command(about = "Workout streaks, levels and tiered challenges")]
#[command(version)]
struct Cli {
    /// Database file (defaults to $TRUESTREAK_DB or the platform data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// User id to act as (defaults to $TRUESTREAK_USER)
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the user document
    Init,

    /// Manage workout plans
    Cycle {
        #[command(subcommand)]
        action: CycleCommand,
    },

    /// Log a workout for a day of the active plan
    Log {
        /// Day id (defaults to the next day in the rotation)
        #[arg(long)]
        day: Option<String>,

        /// Exercise id that was completed (repeatable)
        #[arg(long = "done")]
        done: Vec<String>,

        /// Mark every exercise of the day as completed
        #[arg(long)]
        all: bool,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Skip a day of the active plan
    Skip {
        /// Day id (defaults to the next day in the rotation)
        #[arg(long)]
        day: Option<String>,

        /// "cant" or "wont"
        #[arg(long)]
        reason: String,

        /// Position to resume from
        #[arg(long)]
        next: Option<usize>,
    },

    /// Show logged workouts, newest first
    History {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show streak, xp and level
    Stats,

    /// Show challenge tiers and progress
    Challenges,

    /// Mark all unlocked tiers as seen
    MarkViewed,

    /// Send a feedback message
    Feedback { message: String },

    /// Rate the app (once per user)
    Review {
        #[arg(long)]
        rating: u8,

        #[arg(long)]
        comment: Option<String>,

        /// Allow the review to be shown publicly
        #[arg(long)]
        public: bool,
    },

    /// Append a canned workout history (streak-alto, streak-quebrado, semana-perfeita, massivo,
    /// irregular, muitos-skips, exercicios-variados)
    Seed { scenario: String },

    /// Remove all workouts and reset stats
    Clear,
}

#[derive(Subcommand)]
enum CycleCommand {
    /// Start a new plan from a JSON file of days
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        days: PathBuf,
    },

    /// Rename the active plan
    Rename {
        #[arg(long)]
        id: String,

        #[arg(long)]
        name: String,
    },

    /// Replace the active plan's days; starts a new plan
    Edit {
        #[arg(long)]
        id: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        days: PathBuf,
    },

    /// Show the active plan
    Active,

    /// Show archived plans
    History,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_env();

    let log_level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ApiError>() {
                Some(api) => eprintln!("error [{}]: {}", api.code(), api),
                None => eprintln!("error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: Config) -> Result<()> {
    let db_path = cli.db.unwrap_or(config.db_path);
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("opening database at {}", db_path.display()))?;
    let app = TrueStreak::new(store, TracingTelemetry, SystemClock);
    let caller = Caller {
        user_id: cli.user.or(config.user_id),
    };

    match cli.command {
        Commands::Init => print_json(&app.create_user(&caller)?),
        Commands::Cycle { action } => run_cycle(&app, &caller, action),
        Commands::Log {
            day,
            done,
            all,
            notes,
        } => {
            let (cycle, day_id) = resolve_day(&app, &caller, day)?;
            let plan_day = cycle
                .day(&day_id)
                .ok_or_else(|| ApiError::not_found("Dia não encontrado"))?;
            let completed_exercises = plan_day
                .exercises
                .iter()
                .map(|e| CompletedExercise {
                    exercise_id: e.id.clone(),
                    exercise_name: e.name.clone(),
                    completed: all || done.contains(&e.id),
                })
                .collect();

            let res = app.log_workout(
                &caller,
                LogWorkoutRequest {
                    cycle_id: cycle.id.clone(),
                    day_id,
                    completed_exercises,
                    notes,
                },
            )?;
            celebrate(&res.tier_ups);
            print_json(&res)
        }
        Commands::Skip { day, reason, next } => {
            let (cycle, day_id) = resolve_day(&app, &caller, day)?;
            let res = app.skip_workout(
                &caller,
                SkipWorkoutRequest {
                    cycle_id: cycle.id,
                    day_id,
                    reason,
                    next_day_choice: next,
                },
            )?;
            celebrate(&res.tier_ups);
            print_json(&res)
        }
        Commands::History { limit } => print_json(&app.get_workout_history(&caller, limit)?),
        Commands::Stats => print_json(&app.get_current_stats(&caller)?),
        Commands::Challenges => print_json(&app.get_user_challenges(&caller)?),
        Commands::MarkViewed => print_json(&app.mark_achievements_as_viewed(&caller)?),
        Commands::Feedback { message } => print_json(&app.submit_feedback(&caller, &message)?),
        Commands::Review {
            rating,
            comment,
            public,
        } => print_json(&app.submit_review(
            &caller,
            ReviewRequest {
                rating,
                comment,
                allow_public_share: public,
            },
        )?),
        Commands::Seed { scenario } => print_json(&app.seed_workouts(&caller, &scenario)?),
        Commands::Clear => print_json(&app.clear_workouts(&caller)?),
    }
}

fn run_cycle(app: &App, caller: &Caller, action: CycleCommand) -> Result<()> {
    match action {
        CycleCommand::Create { name, days } => {
            let days = read_days(&days)?;
            print_json(&app.create_cycle(caller, CreateCycleRequest { name, days })?)
        }
        CycleCommand::Rename { id, name } => print_json(&app.update_cycle_name(
            caller,
            RenameCycleRequest {
                cycle_id: id,
                new_name: name,
            },
        )?),
        CycleCommand::Edit { id, name, days } => {
            let days = read_days(&days)?;
            print_json(&app.update_cycle_structure(
                caller,
                UpdateCycleStructureRequest {
                    cycle_id: id,
                    name,
                    days,
                },
            )?)
        }
        CycleCommand::Active => print_json(&app.get_active_cycle(caller)?),
        CycleCommand::History => print_json(&app.get_cycle_history(caller)?),
    }
}

/// active plan plus the requested day, or the next one in the rotation
fn resolve_day(app: &App, caller: &Caller, day: Option<String>) -> Result<(Plan, String)> {
    let cycle = app
        .get_active_cycle(caller)?
        .cycle
        .ok_or_else(|| ApiError::not_found("Ciclo ativo não encontrado"))?;

    let day_id = match day {
        Some(id) => id,
        None => {
            let position = app.get_current_stats(caller)?.stats.next_day_position;
            cycle
                .days
                .iter()
                .find(|d| d.position == position)
                .or_else(|| cycle.days.first())
                .map(|d| d.id.clone())
                .ok_or_else(|| ApiError::not_found("Dia não encontrado"))?
        }
    };
    Ok((cycle, day_id))
}

fn read_days(path: &Path) -> Result<Vec<DayInput>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing days from {}", path.display()))
}

fn celebrate(tier_ups: &[TierUpEvent]) {
    for t in tier_ups {
        eprintln!(
            "{} {} · {}: {}",
            t.tier.icon(),
            t.tier.label(),
            t.challenge_id.definition().name,
            t.tier.celebration_message()
        );
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

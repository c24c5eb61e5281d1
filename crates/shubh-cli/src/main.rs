//! shubh: Chowgadhiya lookup and auspicious-period command gate.
//!
//! # Usage
//!
//! ```bash
//! shubh status                       # Evaluation as JSON
//! shubh schedule [--json]            # the eight periods of the current phase
//! shubh next                         # start of the next auspicious period
//! shubh run -- backup.sh --full      # run only during an auspicious period
//! ```
//!
//! Location, timezone and debug output default to the `LATITUDE`,
//! `LONGITUDE`, `TIMEZONE` and `DEBUG` environment variables; the matching
//! flags override them.

use std::fmt::Display;
use std::process::{Command as Process, ExitCode, ExitStatus};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use shubh_engine::config::parse_timezone;
use shubh_engine::{
    debug_log, locate, schedule_from, Location, Settings, ShubhEvaluator, Slot, SpaSunTimes,
};

/// Exit code for a `run` that was skipped because the period is inauspicious.
const EXIT_SKIPPED: u8 = 1;

/// Exit code for configuration, time computation and I/O failures.
const EXIT_ERROR: u8 = 2;

#[derive(Parser)]
#[command(
    name = "shubh",
    version,
    about = "Chowgadhiya periods and an auspicious-time command gate"
)]
struct Cli {
    /// Observer latitude in decimal degrees (overrides LATITUDE)
    #[arg(long, global = true, allow_hyphen_values = true)]
    latitude: Option<f64>,

    /// Observer longitude in decimal degrees (overrides LONGITUDE)
    #[arg(long, global = true, allow_hyphen_values = true)]
    longitude: Option<f64>,

    /// IANA timezone used for "now" and for printed times (overrides TIMEZONE)
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Evaluate at this RFC 3339 instant instead of the current time
    #[arg(long, global = true)]
    at: Option<String>,

    /// Print the evaluator's step-by-step trace to stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current evaluation as JSON
    Status,
    /// Print the schedule of the current day or night phase
    Schedule {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print when the next auspicious period starts
    Next,
    /// Run a command only if the current period is auspicious
    Run {
        /// Command and arguments to execute
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match dispatch(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn dispatch(cli: &Cli) -> Result<ExitCode> {
    let settings = Settings::from_env()?;
    let debug = cli.debug || settings.debug;
    init_tracing(debug);

    let location = Location::new(
        cli.latitude.unwrap_or(settings.location.latitude),
        cli.longitude.unwrap_or(settings.location.longitude),
    )?;
    let timezone = match &cli.timezone {
        Some(name) => Some(parse_timezone(name)?),
        None => settings.timezone,
    };
    debug!(
        latitude = location.latitude,
        longitude = location.longitude,
        timezone = ?timezone,
        "settings resolved"
    );

    let evaluator = ShubhEvaluator::new(location, SpaSunTimes).with_log(debug_log(debug));

    let command = &cli.command;
    match (cli.at.as_deref(), timezone) {
        (Some(at), Some(tz)) => execute(command, &evaluator, parse_at(at)?.with_timezone(&tz)),
        (Some(at), None) => execute(command, &evaluator, parse_at(at)?),
        (None, Some(tz)) => execute(command, &evaluator, Utc::now().with_timezone(&tz)),
        (None, None) => execute(command, &evaluator, Local::now()),
    }
}

fn init_tracing(debug: bool) {
    let level = if debug {
        Level::DEBUG
    } else {
        std::env::var("RUST_LOG")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Level::WARN)
    };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_at(raw: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .with_context(|| format!("--at '{raw}' is not an RFC 3339 timestamp"))
}

fn execute<Tz>(
    command: &Command,
    evaluator: &ShubhEvaluator<SpaSunTimes>,
    now: DateTime<Tz>,
) -> Result<ExitCode>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match command {
        Command::Status => {
            let evaluation = evaluator.evaluate(&now)?;
            println!("{}", serde_json::to_string_pretty(&evaluation)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Schedule { json } => {
            print_schedule(evaluator, &now, *json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Next => {
            let slot = evaluator.next_auspicious_slot(&now)?;
            println!("{} {}", slot.start.to_rfc3339(), slot.kind);
            Ok(ExitCode::SUCCESS)
        }
        Command::Run { command } => run_gated(evaluator, &now, command),
    }
}

// ── schedule ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleView {
    phase: String,
    weekday: String,
    period_seconds: f64,
    current_index: usize,
    slots: Vec<SlotView>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SlotView {
    index: usize,
    name: String,
    auspicious: bool,
    start: String,
    start_unix: i64,
}

impl SlotView {
    fn from_slot<Tz: TimeZone>(slot: &Slot<Tz>) -> Self {
        Self {
            index: slot.index,
            name: slot.kind.name().to_string(),
            auspicious: slot.is_auspicious(),
            start: slot.start.to_rfc3339(),
            start_unix: slot.start.timestamp(),
        }
    }
}

fn print_schedule<Tz>(
    evaluator: &ShubhEvaluator<SpaSunTimes>,
    now: &DateTime<Tz>,
    json: bool,
) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let day = evaluator.resolve(now)?;
    let position = locate(now, &day);
    let schedule = schedule_from(now, &day);

    if json {
        let view = ScheduleView {
            phase: schedule.phase.to_string(),
            weekday: schedule.weekday.to_string(),
            period_seconds: schedule.period_seconds,
            current_index: position.index,
            slots: schedule.slots.iter().map(SlotView::from_slot).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!(
        "{} of {} ({}s per period)",
        schedule.phase, schedule.weekday, schedule.period_seconds
    );
    for slot in &schedule.slots {
        let marker = if slot.index == position.index { ">" } else { " " };
        let star = if slot.is_auspicious() { "*" } else { " " };
        println!(
            "{marker} {}  {}  {star} {}",
            slot.index + 1,
            slot.start.format("%Y-%m-%d %H:%M:%S %:z"),
            slot.kind
        );
    }
    Ok(())
}

// ── run ─────────────────────────────────────────────────────────────────────

fn run_gated<Tz>(
    evaluator: &ShubhEvaluator<SpaSunTimes>,
    now: &DateTime<Tz>,
    command: &[String],
) -> Result<ExitCode>
where
    Tz: TimeZone,
{
    let Some((program, args)) = command.split_first() else {
        bail!("no command given to run");
    };

    let (position, next) = evaluator.locate_with_next(now)?;
    if !position.is_auspicious() {
        eprintln!(
            "skipping '{program}': {} is not auspicious; next auspicious period ({}) starts at {}",
            position.kind,
            next.kind,
            next.start.to_rfc3339()
        );
        return Ok(ExitCode::from(EXIT_SKIPPED));
    }

    info!(program = %program, period = %position.kind, "auspicious period, running command");
    let status = Process::new(program)
        .args(args)
        .status()
        .with_context(|| format!("failed to run '{program}'"))?;
    Ok(exit_code_of(status))
}

fn exit_code_of(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(EXIT_ERROR)),
        // Terminated by a signal.
        None => ExitCode::from(EXIT_ERROR),
    }
}

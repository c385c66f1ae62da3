//! `slots` CLI — list bookable lesson slots and check reservations from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Slots on a date for a 25-minute lesson
//! slots list --rules rules.json --date 2026-03-16 --duration 25
//!
//! # Same, with reservations flagged and a fixed "now"
//! slots list --rules rules.json --reserved bookings.json --date 2026-03-16 \
//!   --duration 50 --now 2026-03-16T08:30:00Z --timezone Europe/Berlin
//!
//! # Does a 10:15 lesson collide with anything?
//! slots check --reserved bookings.json --date 2026-03-16 --start 10:15 --duration 30
//!
//! # Whole week, Monday first, as JSON
//! slots week --rules rules.json --week-of 2026-03-18 --duration 25 --monday --json
//! ```
//!
//! Rule files hold a JSON array of `{day_of_week, start_time, end_time, enabled}`.
//! Reservation files hold a JSON array of `{start, end}` timestamps. A path of
//! `-` reads from stdin. Set `RUST_LOG` or pass `-v` for diagnostics on stderr.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use slot_engine::time::{local_now, parse_date, parse_local_datetime, parse_timezone};
use slot_engine::{
    AvailabilityRule, DayBoard, ReservedInterval, SlotQuery, SlotStatus, TimeOfDay, WeekStart,
    DEFAULT_STEP_MINUTES,
};
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

#[derive(Parser)]
#[command(name = "slots", version, about = "Bookable lesson slots from availability rules")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// IANA timezone of the mentor's calendar
    #[arg(long, global = true, env = "SLOTS_TIMEZONE", default_value = "UTC")]
    timezone: String,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Options shared by the commands that generate slots.
#[derive(Args)]
struct SlotArgs {
    /// JSON file of availability rules (`-` for stdin)
    #[arg(long)]
    rules: String,
    /// JSON file of reservations to flag as booked
    #[arg(long)]
    reserved: Option<String>,
    /// Lesson length in minutes
    #[arg(long)]
    duration: u32,
    /// Current time (RFC 3339 or local); defaults to the system clock
    #[arg(long)]
    now: Option<String>,
    /// Minutes between candidate start times
    #[arg(long, env = "SLOTS_STEP_MINUTES", default_value_t = DEFAULT_STEP_MINUTES)]
    step: u32,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the slots offered on one date
    List {
        #[command(flatten)]
        slot: SlotArgs,
        /// Calendar date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Leave out slots that are already booked
        #[arg(long)]
        open_only: bool,
    },
    /// Check whether a lesson collides with a reservation
    Check {
        /// JSON file of reservations (`-` for stdin)
        #[arg(long)]
        reserved: String,
        /// Calendar date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Lesson start (HH:MM)
        #[arg(long)]
        start: String,
        /// Lesson length in minutes
        #[arg(long)]
        duration: u32,
    },
    /// Show the slots for each day of a calendar week
    Week {
        #[command(flatten)]
        slot: SlotArgs,
        /// Any date inside the week
        #[arg(long)]
        week_of: String,
        /// Weeks start on Monday instead of Sunday
        #[arg(long)]
        monday: bool,
    },
}

/// Input format for reservations read from JSON.
#[derive(Deserialize)]
struct ReservationInput {
    start: String,
    end: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let tz = parse_timezone(&cli.timezone)?;

    match cli.command {
        Commands::List {
            slot,
            date,
            open_only,
        } => {
            let date = parse_date(&date)?;
            let inputs = SlotInputs::load(&slot, tz)?;
            let query = SlotQuery::new(date, slot.duration, inputs.now).with_step(slot.step);

            let mut board = slot_engine::slot_board(&inputs.rules, &inputs.reserved, &query)
                .context("Failed to compute slots")?;
            if open_only {
                board.retain(|s| !s.booked);
            }

            if slot.json {
                println!("{}", serde_json::to_string_pretty(&board)?);
            } else if board.is_empty() {
                println!("No slots on {}", date);
            } else {
                for status in &board {
                    println!("{}", format_status(status));
                }
            }
        }
        Commands::Check {
            reserved,
            date,
            start,
            duration,
        } => {
            let reserved = load_reserved(&reserved, tz)?;
            let date = parse_date(&date)?;
            let start: TimeOfDay = start.parse()?;

            let booked = slot_engine::try_is_slot_booked(&reserved, date, start, duration)
                .context("Failed to check reservations")?;
            println!("{}", if booked { "booked" } else { "free" });
        }
        Commands::Week {
            slot,
            week_of,
            monday,
        } => {
            let week_of = parse_date(&week_of)?;
            let inputs = SlotInputs::load(&slot, tz)?;
            let week_start = if monday {
                WeekStart::Monday
            } else {
                WeekStart::Sunday
            };

            let board = slot_engine::week_board(
                &inputs.rules,
                &inputs.reserved,
                slot_engine::week_start_for(week_of, week_start),
                slot.duration,
                inputs.now,
                slot.step,
            )
            .context("Failed to compute week")?;

            if slot.json {
                println!("{}", serde_json::to_string_pretty(&board)?);
            } else {
                for day in &board.days {
                    println!("{}", format_day(day));
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    Registry::default()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init()
        .context("Failed to initialize tracing subscriber")
}

/// Everything a slot-generating command reads before calling the engine.
struct SlotInputs {
    rules: Vec<AvailabilityRule>,
    reserved: Vec<ReservedInterval>,
    now: NaiveDateTime,
}

impl SlotInputs {
    fn load(args: &SlotArgs, tz: Tz) -> Result<Self> {
        let rules: Vec<AvailabilityRule> = serde_json::from_str(&read_input(&args.rules)?)
            .with_context(|| format!("Failed to parse rules from {}", args.rules))?;

        let reserved = match &args.reserved {
            Some(path) => load_reserved(path, tz)?,
            None => Vec::new(),
        };

        let now = match &args.now {
            Some(s) => parse_local_datetime(s, tz)?,
            None => local_now(tz),
        };

        for rule in &rules {
            if let Err(e) = rule.validate() {
                debug!(error = %e, "rule will offer no slots");
            }
        }
        debug!(
            rules = rules.len(),
            reserved = reserved.len(),
            %now,
            "loaded inputs"
        );
        Ok(Self {
            rules,
            reserved,
            now,
        })
    }
}

fn load_reserved(path: &str, tz: Tz) -> Result<Vec<ReservedInterval>> {
    let inputs: Vec<ReservationInput> = serde_json::from_str(&read_input(path)?)
        .with_context(|| format!("Failed to parse reservations from {}", path))?;

    inputs
        .into_iter()
        .map(|input| -> Result<ReservedInterval> {
            Ok(ReservedInterval::new(
                parse_local_datetime(&input.start, tz)?,
                parse_local_datetime(&input.end, tz)?,
            ))
        })
        .collect()
}

/// `09:30-09:55`, with ` booked` appended when taken.
fn format_status(status: &SlotStatus) -> String {
    let end = status.slot.end().unwrap_or(TimeOfDay::END_OF_DAY);
    if status.booked {
        format!("{}-{} booked", status.slot.start, end)
    } else {
        format!("{}-{}", status.slot.start, end)
    }
}

/// `2026-03-16 Mon  09:00 09:30*`, where `*` marks a booked slot.
fn format_day(day: &DayBoard) -> String {
    let label = day_label(day.date);
    if day.slots.is_empty() {
        return format!("{}  -", label);
    }
    let starts: Vec<String> = day
        .slots
        .iter()
        .map(|s| {
            if s.booked {
                format!("{}*", s.slot.start)
            } else {
                s.slot.start.to_string()
            }
        })
        .collect();
    format!("{}  {}", label, starts.join(" "))
}

fn day_label(date: NaiveDate) -> String {
    date.format("%Y-%m-%d %a").to_string()
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
}

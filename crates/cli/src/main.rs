// crewpay CLI - crew bonus and agent commission payouts
// Reads a finance config and exported job records, prints payout reports.

mod exit_codes;
mod input;
mod payout;
mod views;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use exit_codes::{EXIT_ERROR, EXIT_INPUT, EXIT_INVALID_CONFIG, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "crewpay")]
#[command(about = "Crew bonus and agent commission payouts from completed jobs")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute bonuses for every employee across a job set
    #[command(after_help = "\
Examples:
  crewpay allocate --finance finance.toml --jobs jobs.json
  crewpay allocate --finance finance.toml --jobs jobs.json --directory staff.json --json
  crewpay allocate --finance finance.toml --jobs jobs.json --week 2024-03-10 --rows --json
  crewpay allocate --finance finance.toml --jobs jobs.json --employee 'Tom Reed' --output tom.json")]
    Allocate {
        /// Finance config (.toml, or .json snapshot)
        #[arg(long, env = "CREWPAY_FINANCE")]
        finance: PathBuf,

        /// Job records (JSON array)
        #[arg(long)]
        jobs: PathBuf,

        /// Employee directory (JSON array) for display-name resolution
        #[arg(long)]
        directory: Option<PathBuf>,

        /// Only this employee (matched on normalized display name)
        #[arg(long)]
        employee: Option<String>,

        /// Only jobs paid for the work week starting on this Sunday (YYYY-MM-DD)
        #[arg(long, value_parser = parse_week)]
        week: Option<NaiveDate>,

        /// Output JSON to stdout instead of human summary
        #[arg(long)]
        json: bool,

        /// Emit flattened payout rows instead of the grouped report
        #[arg(long)]
        rows: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show every intermediate value for one job
    #[command(after_help = "\
Examples:
  crewpay job --finance finance.toml --jobs jobs.json --id job-100
  crewpay job --finance finance.toml --jobs jobs.json --id job-100 --json")]
    Job {
        #[arg(long, env = "CREWPAY_FINANCE")]
        finance: PathBuf,

        #[arg(long)]
        jobs: PathBuf,

        /// Job id to break down
        #[arg(long)]
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// List work weeks that have payouts, newest first
    Periods {
        #[arg(long)]
        jobs: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// List active and former employees named in the job set
    Roster {
        #[arg(long)]
        jobs: PathBuf,

        #[arg(long)]
        directory: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Agent commission statement
    Commissions {
        #[arg(long, env = "CREWPAY_FINANCE")]
        finance: PathBuf,

        #[arg(long)]
        jobs: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Validate a finance config without running
    #[command(after_help = "\
Examples:
  crewpay validate finance.toml")]
    Validate {
        /// Path to the finance config
        config: PathBuf,
    },
}

fn parse_week(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nengine:  crewpay-bonus ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nengine:  crewpay-bonus ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
        )
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Allocate {
            finance,
            jobs,
            directory,
            employee,
            week,
            json,
            rows,
            output,
        } => payout::cmd_allocate(payout::AllocateArgs {
            finance,
            jobs,
            directory,
            employee,
            week,
            json,
            rows,
            output,
        }),
        Commands::Job { finance, jobs, id, json } => payout::cmd_job(finance, jobs, id, json),
        Commands::Periods { jobs, json } => views::cmd_periods(jobs, json),
        Commands::Roster { jobs, directory, json } => views::cmd_roster(jobs, directory, json),
        Commands::Commissions { finance, jobs, json } => views::cmd_commissions(finance, jobs, json),
        Commands::Validate { config } => views::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INVALID_CONFIG, message: msg.into(), hint: None }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INPUT, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use log::{debug, warn};
mod report;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use timeseed::{
    CiphertextContainer, DEFAULT_PROGRESS_INTERVAL, KeySpaceSearcher, SearchResult, SearchWindow,
    window::{self, DEFAULT_NUM_DAYS, format_utc},
};

/// Exit status when the key was found.
const EXIT_FOUND: u8 = 0;
/// Exit status when the window was exhausted without a match.
const EXIT_NOT_FOUND: u8 = 1;
/// Exit status for unusable input (bad date, unreadable or short file).
const EXIT_INPUT: u8 = 2;
/// Exit status after Ctrl-C, as a shell reports SIGINT.
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Debug, Parser)]
#[command(name = "timeseed")]
#[command(
    version,
    about = "Recovers AES-GCM plaintext whose key came from a timestamp-seeded Mersenne Twister."
)]
struct Cli {
    /// Ciphertext file: nonce (16) | tag (16) | ciphertext
    file: PathBuf,

    /// First day to search, YYYY-MM-DD in UTC (default: 7 days ago)
    #[arg(value_parser = parse_start_date)]
    start_date: Option<NaiveDate>,

    /// Number of days to search
    #[arg(default_value_t = DEFAULT_NUM_DAYS)]
    num_days: u32,

    /// Worker threads (1 searches sequentially)
    #[arg(short = 'j', long, env = "TIMESEED_THREADS", default_value_t = 1)]
    threads: usize,

    /// Attempts between progress lines (0 disables them)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    progress_interval: u64,

    /// Print the result as JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn parse_start_date(input: &str) -> Result<NaiveDate, timeseed::InputParseError> {
    window::parse_date(input)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> ExitCode {
    let args = Cli::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(result) => ExitCode::from(exit_status(&result)),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_INPUT)
        }
    }
}

fn run(args: Cli) -> Result<SearchResult> {
    let window = match args.start_date {
        Some(date) => SearchWindow::from_date(date, args.num_days)?,
        None => SearchWindow::recent(Utc::now(), args.num_days)?,
    };
    let container = CiphertextContainer::load(&args.file)?;
    debug!(
        "loaded {}: {} byte ciphertext body",
        args.file.display(),
        container.body().len()
    );

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        if let Err(e) = ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst)) {
            warn!("failed to install Ctrl-C handler: {e}");
        }
    }

    let json = args.json;
    if !json {
        println!(
            "Brute forcing timestamps from {} to {} UTC",
            format_utc(window.start()),
            format_utc(window.end())
        );
        println!("That's {} possible timestamps to try...", window.len());
    }

    let result = KeySpaceSearcher::new(&container)
        .threads(args.threads)
        .progress_interval(args.progress_interval)
        .stop_flag(stop)
        .search(&window, |progress| {
            if !json {
                println!(
                    "Tried {} timestamps... currently at {} UTC",
                    progress.attempts,
                    format_utc(progress.timestamp)
                );
            }
        });

    if json {
        report::print_json(&result)?;
    } else {
        report::print_text(&result);
    }
    Ok(result)
}

fn exit_status(result: &SearchResult) -> u8 {
    match result {
        SearchResult::Found { .. } => EXIT_FOUND,
        SearchResult::NotFound { .. } => EXIT_NOT_FOUND,
        SearchResult::Interrupted { .. } => EXIT_INTERRUPTED,
    }
}

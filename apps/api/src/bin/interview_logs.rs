use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};

use interview_api::config::{log_dir_from_env, DEFAULT_LOG_RETENTION_DAYS};
use interview_api::log_inspect::{self, DailySummary, TokenReport};
use interview_api::logging::log_file_name;

const RECENT_LINES: usize = 10;

/// inspect the interview service's daily log files
#[derive(Parser, Debug)]
#[clap(version, about)]
struct Cli {
    /// directory holding excel_interview_<date>.log files (defaults to LOG_DIR or ./logs)
    #[clap(long)]
    log_dir: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// summarise today's log file
    Logs,
    /// total estimated token usage across all log files
    Tokens,
    /// delete log files older than the retention window
    Cleanup {
        /// days of logs to keep (at least 1)
        #[clap(
            long,
            default_value_t = DEFAULT_LOG_RETENTION_DAYS,
            value_parser = clap::value_parser!(i64).range(1..)
        )]
        retention_days: i64,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let dir = cli.log_dir.unwrap_or_else(log_dir_from_env);

    match cli.command {
        Command::Logs => {
            let today = Local::now().date_naive();
            match log_inspect::daily_summary(&dir, today, RECENT_LINES)? {
                Some(summary) => print_daily(&summary),
                None => println!("No log file for today ({})", log_file_name(today)),
            }
        }
        Command::Tokens => print_tokens(&log_inspect::token_usage(&dir)?),
        Command::Cleanup { retention_days } => {
            let removed = log_inspect::remove_expired_logs(&dir, retention_days, Local::now())?;
            for path in &removed {
                println!("Deleted {}", path.display());
            }
            println!(
                "Removed {} log file(s) older than {} days",
                removed.len(),
                retention_days
            );
        }
    }

    Ok(())
}

fn print_daily(summary: &DailySummary) {
    println!("Today's summary");
    println!("  API calls:              {}", summary.api_calls);
    println!("  Questions generated:    {}", summary.questions_generated);
    println!("  Evaluations completed:  {}", summary.evaluations_completed);
    println!("  Sessions completed:     {}", summary.sessions_completed);
    println!("  Interview info entries: {}", summary.info_collected);
    println!("  Errors:                 {}", summary.errors);

    if !summary.info_lines.is_empty() {
        println!("\nInterview information");
        for line in &summary.info_lines {
            println!("  {line}");
        }
    }

    println!("\nRecent activity (last {RECENT_LINES} lines)");
    for line in &summary.recent {
        println!("  {line}");
    }

    if !summary.error_lines.is_empty() {
        println!("\nErrors");
        for line in &summary.error_lines {
            println!("  {line}");
        }
    }
}

fn print_tokens(report: &TokenReport) {
    println!("Token usage ({} log file(s))", report.files_scanned);
    println!("  Total tokens:       {}", report.total_tokens);
    println!("  Total API calls:    {}", report.total_calls);
    println!("  Sessions completed: {}", report.total_sessions);
    if let (Some(tokens), Some(calls)) = (
        report.avg_tokens_per_session(),
        report.avg_calls_per_session(),
    ) {
        println!("  Avg tokens/session: {tokens:.1}");
        println!("  Avg calls/session:  {calls:.1}");
    }
}

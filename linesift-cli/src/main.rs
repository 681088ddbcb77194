use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use linesift::{ScanConfig, ScanHandler, ScanProgress, ScanResults, ScanSession};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Line of text to search for (literal substring, not a regex)
    pattern: String,

    /// Root directory to scan; defaults to the whole filesystem when the
    /// process is elevated, the current directory otherwise
    #[arg(short = 'd', long)]
    root: Option<PathBuf>,

    /// File extensions to include (e.g. log,txt)
    #[arg(short = 'e', long)]
    extensions: Option<String>,

    /// Paths to skip (glob format)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Follow symbolic links during traversal
    #[arg(long)]
    follow_links: bool,

    /// Read each file on an isolated worker so a stalled read cannot hang
    /// the scan
    #[arg(short = 'I', long)]
    isolate: bool,

    /// Per-file read budget in seconds (implies --isolate)
    #[arg(short = 't', long)]
    timeout: Option<u64>,

    /// Print results as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Path to a config file
    #[arg(long)]
    config: Option<PathBuf>,
}

struct CliHandler {
    bar: ProgressBar,
    json: bool,
    started: Instant,
}

impl ScanHandler for CliHandler {
    fn on_progress(&self, progress: ScanProgress) {
        self.bar.set_length(progress.files_total as u64);
        self.bar.set_position(progress.files_processed as u64);
    }

    fn on_complete(&self, results: ScanResults) {
        self.bar.finish_and_clear();
        if self.json {
            match serde_json::to_string_pretty(&results) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("{}", format!("Could not serialize results: {}", e).red()),
            }
        } else {
            print_results(&results, self.started.elapsed());
        }
    }
}

fn print_results(results: &ScanResults, elapsed: Duration) {
    if results.matched.is_empty() {
        println!("{}", "No files contain the search line.".yellow());
    } else {
        let header = format!(
            "Files containing the search line ({}):",
            results.matched.len()
        );
        println!("{}", header.green().bold());
        for path in &results.matched {
            println!("  {}", path.display());
        }
    }

    if !results.failed.is_empty() {
        println!();
        let header = format!("Excluded files ({}):", results.failed.len());
        println!("{}", header.red().bold());
        for (path, message) in &results.failed {
            println!("  {} - {}", path.display(), message);
        }
    }

    // Sub-millisecond noise is meaningless here.
    let elapsed = Duration::from_millis(elapsed.as_millis() as u64);
    println!();
    println!("Scanned in {}", humantime::format_duration(elapsed));
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let file_config =
        ScanConfig::load_from(cli.config.as_deref()).context("Failed to load configuration")?;

    let cli_config = ScanConfig {
        pattern: cli.pattern,
        root_path: cli.root,
        file_extensions: cli.extensions.as_ref().map(|e| {
            e.split(',')
                .map(|s| s.trim().to_string())
                .collect::<Vec<_>>()
        }),
        ignore_patterns: cli.ignore,
        follow_links: cli.follow_links,
        isolate_reads: cli.isolate || cli.timeout.is_some(),
        read_timeout_secs: cli.timeout.unwrap_or(10),
        ..Default::default()
    };

    let config = file_config.merge_with_cli(cli_config);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Resolved scan configuration: {:?}", config);

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} files ({percent}%)")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let handler = CliHandler {
        bar,
        json: cli.json,
        started: Instant::now(),
    };

    let session = ScanSession::spawn(config, handler)?;
    session.join();
    Ok(())
}

use std::error::Error;
use std::fmt::Display;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{CommandFactory, FromArgMatches};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs::File;
use tokio::io::BufReader;
use urlgrab::grabber::grab;
use urlgrab::network::{self, HttpFetcher};
use urlgrab::options::{Cli, ConfigFile};
use urlgrab::report::Report;
use urlgrab::storage;

/// Prints a fatal setup error and exits before any fetch has started.
fn fail(message: impl Display) -> ! {
    eprintln!("{} {}", style("[ERROR]").red(), message);
    std::process::exit(1);
}

fn step(options: &Cli, label: &str, message: &str) {
    if !options.json {
        println!("{} {}", style(label).dim(), message);
    }
}

fn progress_bar(options: &Cli) -> Result<ProgressBar, Box<dyn Error>> {
    if options.json {
        return Ok(ProgressBar::hidden());
    }
    let progress = ProgressBar::new_spinner();
    progress.set_style(ProgressStyle::default_spinner().template(concat!(
        "\x1b[2m[3/3]\x1b[0m",
        " 📥 [{elapsed_precise}] {spinner} {pos} URLs done {msg}"
    ))?);
    progress.enable_steady_tick(Duration::from_millis(100));
    Ok(progress)
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // Parse terminal arguments.
    let matches = Cli::command().get_matches();
    let mut options = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    // Load config file and apply values (CLI args take priority).
    let config = ConfigFile::load(options.config.as_ref()).unwrap_or_else(|e| fail(e));
    options
        .apply_config(&config, &matches)
        .unwrap_or_else(|e| fail(e));

    // Build the shared HTTP client.
    let client = network::build_client(&options)
        .unwrap_or_else(|e| fail(format!("Failed to build the HTTP client: {}", e)));

    step(&options, "[1/3]", "📄 Open URL list...");
    let source = File::open(&options.src).await.unwrap_or_else(|e| {
        fail(format!(
            "Failed to open the URL list {}: {}",
            options.src.display(),
            e
        ))
    });

    step(&options, "[2/3]", "📁 Prepare destination directory...");
    let destination = storage::prepare_destination(&options.dst).unwrap_or_else(|e| {
        fail(format!(
            "Failed to create directory {}: {}",
            options.dst.display(),
            e
        ))
    });

    // Fetch every URL with a fixed pool of workers.
    let workers = options.workers as usize;
    let fetcher = Arc::new(HttpFetcher::new(client, &destination));
    let grabbed = grab(BufReader::new(source), fetcher, workers, progress_bar(&options)?).await?;
    let report = Report::new(&options.src, &destination, workers, grabbed);

    if options.json {
        // Print clean JSON to stdout for piping.
        println!("{}", report.to_json_string()?);
    } else {
        report.show_text_report();
    }

    // Optionally, write the failures to a CSV file.
    if let Some(path) = options.report_path.as_ref() {
        report.write_csv_report(path, options.json)?;
    }

    // Optionally, write the report to a JSON file.
    if let Some(path) = options.report_path_json.as_ref() {
        report.write_json_report(path, options.json)?;
    }

    // Per-URL failures are part of the report, not a failed run.
    Ok(ExitCode::SUCCESS)
}

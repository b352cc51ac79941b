use crate::error::FetchError;
use crate::grabber::Grabbed;
use crate::metrics::{Entry, Metrics};
use crate::network::Saved;
use crate::utils;
use console::style;
use csv::Writer;
use serde_json::json;
use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Outcome of one run, ready to be printed or written to disk.
#[derive(Debug)]
pub struct Report {
    pub source: String,
    pub destination: String,
    pub workers: usize,
    pub total_time: Duration,
    pub dispatched: usize,
    pub attempted: usize,
    pub saved: Vec<Saved>,
    pub failures: Vec<FetchError>,
}

impl Report {
    pub fn new(source: &Path, destination: &Path, workers: usize, grabbed: Grabbed) -> Report {
        Report {
            source: source.display().to_string(),
            destination: destination.display().to_string(),
            workers,
            total_time: grabbed.total_time,
            dispatched: grabbed.dispatched,
            attempted: grabbed.attempted,
            saved: grabbed.saved,
            failures: grabbed.failures,
        }
    }

    pub fn downloaded_bytes(&self) -> u64 {
        self.saved.iter().map(|s| s.bytes).sum()
    }

    fn summary(&self) -> Metrics {
        Metrics(vec![
            Entry {
                label: "Destination",
                value: self.destination.clone(),
            },
            Entry {
                label: "Workers",
                value: self.workers.to_string(),
            },
            Entry {
                label: "URLs",
                value: self.attempted.to_string(),
            },
            Entry {
                label: "Saved",
                value: self.saved.len().to_string(),
            },
            Entry {
                label: "Failed",
                value: self.failures.len().to_string(),
            },
            Entry {
                label: "Downloaded",
                value: utils::kb(self.downloaded_bytes()),
            },
            Entry {
                label: "Elapsed Time",
                value: utils::ms(self.total_time),
            },
        ])
    }

    /// Prints the summary table followed by one line per failure.
    ///
    /// Nothing is printed for failures when there are none.
    pub fn show_text_report(&self) {
        println!(
            "\n{} {}\n",
            style("Summary for").bold(),
            style(&self.source).bold().underlined()
        );
        println!("{}", self.summary().build_table());

        if !self.failures.is_empty() {
            println!("{}\n", style("Errors:").bold());
            for line in self.failure_lines() {
                println!("{}", line);
            }
        }
    }

    /// One unstyled `kind: message` line per failure, in collection order.
    pub fn failure_lines(&self) -> Vec<String> {
        self.failures
            .iter()
            .map(|f| format!("{}: {}", f.kind(), f))
            .collect()
    }

    fn build_json_data(&self) -> serde_json::Value {
        json!({
            "config": {
                "source": self.source,
                "destination": self.destination,
                "workers": self.workers,
            },
            "summary": {
                "dispatched": self.dispatched,
                "attempted": self.attempted,
                "saved": self.saved.len(),
                "failed": self.failures.len(),
                "downloadedBytes": self.downloaded_bytes(),
                "elapsedTime": self.total_time.as_millis(),
            },
            "saved": self.saved.iter().map(|s| json!({
                "url": s.url,
                "path": s.path.display().to_string(),
                "bytes": s.bytes,
            })).collect::<Vec<serde_json::Value>>(),
            "failures": self.failures.iter().map(|f| json!({
                "kind": f.kind(),
                "url": f.url(),
                "message": f.to_string(),
            })).collect::<Vec<serde_json::Value>>(),
        })
    }

    /// Returns the JSON report as a pretty-printed string.
    pub fn to_json_string(&self) -> Result<String, Box<dyn Error>> {
        Ok(serde_json::to_string_pretty(&self.build_json_data())?)
    }

    pub fn write_json_report(&self, report_path: &Path, quiet: bool) -> Result<(), Box<dyn Error>> {
        // If the report path parent is a directory, create it if it doesn't exist yet
        if let Some(parent) = report_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = File::create(report_path)?;
        file.write_all(self.to_json_string()?.as_bytes())?;

        if !quiet {
            println!(
                "\n📄 The JSON report was written to {}",
                style(report_path.display()).underlined().cyan()
            );
        }

        Ok(())
    }

    /// Write the failures as CSV, one row each.
    pub fn write_csv_report(&self, report_path: &Path, quiet: bool) -> Result<(), Box<dyn Error>> {
        if let Some(parent) = report_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = Writer::from_path(report_path)?;
        writer.write_record(["URL", "Kind", "Message"])?;
        for f in &self.failures {
            writer.write_record([f.url().unwrap_or_default(), f.kind(), f.to_string().as_str()])?;
        }
        writer.flush()?;

        if !quiet {
            println!(
                "\n📊 The CSV report was written to {}",
                style(report_path.display()).underlined().cyan()
            );
        }

        Ok(())
    }
}

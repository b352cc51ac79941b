use crate::utils::validate_basic_auth;
use clap::parser::ValueSource;
use clap::{ArgMatches, Parser, ValueHint, value_parser};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Default values used throughout the project.
pub mod defaults {
    /// Number of workers fetching URLs at the same time.
    pub const WORKERS: u8 = 5;

    /// The default timeout for a single fetch, in seconds.
    pub const TIMEOUT: u64 = 30;

    /// The default user agent header value used for network requests.
    pub const USER_AGENT: &str = concat!("urlgrab/", env!("CARGO_PKG_VERSION"));

    /// Config file looked up in the working directory when `--config` is absent.
    pub const CONFIG_FILE: &str = ".urlgrab.toml";
}

/// Expands `~` and environment variables in a path argument.
fn expand_path(s: &str) -> Result<PathBuf, String> {
    shellexpand::full(s)
        .map(|expanded| PathBuf::from(expanded.as_ref()))
        .map_err(|e| format!("Failed to expand path '{}': {}", s, e))
}

#[derive(Debug, Parser)]
#[command(term_width = 80, version, about)]
pub struct Cli {
    #[arg(
        short = 's',
        long,
        help = "Path to the file with one URL per line",
        value_hint = ValueHint::FilePath,
        value_parser = expand_path
    )]
    pub src: PathBuf,

    #[arg(
        short = 'd',
        long,
        help = "Directory where the downloaded documents will be saved. Created if missing.",
        value_hint = ValueHint::DirPath,
        value_parser = expand_path
    )]
    pub dst: PathBuf,

    #[arg(
        short = 'w',
        long,
        help = "Number of workers fetching URLs concurrently",
        default_value_t = defaults::WORKERS,
        value_parser = value_parser!(u8).range(1..=100)
    )]
    pub workers: u8,

    #[arg(
        short = 't',
        long,
        help = "Timeout (in seconds) for each fetch, body download included",
        default_value_t = defaults::TIMEOUT,
        value_parser = value_parser!(u64).range(1..=600)
    )]
    pub request_timeout: u64,

    #[arg(
        long,
        help = "Custom User-Agent header to be used in requests",
        default_value_t = defaults::USER_AGENT.to_string(),
    )]
    pub user_agent: String,

    #[arg(
        long,
        help = "Basic authentication credentials in the format `username:password`",
        value_parser = validate_basic_auth,
    )]
    pub basic_auth: Option<String>,

    #[arg(
        long,
        help = "Print the report as JSON to stdout and hide progress output"
    )]
    pub json: bool,

    #[arg(
        short = 'r',
        long,
        help = "File path for storing the failures as CSV",
        value_hint = ValueHint::FilePath,
        value_parser = expand_path
    )]
    pub report_path: Option<PathBuf>,

    #[arg(
        long,
        help = "File path for storing the report as JSON",
        value_hint = ValueHint::FilePath,
        value_parser = expand_path
    )]
    pub report_path_json: Option<PathBuf>,

    #[arg(
        long,
        help = "Path to a TOML config file. Defaults to `.urlgrab.toml` in the working directory if present.",
        value_hint = ValueHint::FilePath,
        value_parser = expand_path
    )]
    pub config: Option<PathBuf>,
}

/// Settings read from a TOML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub workers: Option<u8>,
    pub request_timeout: Option<u64>,
    pub user_agent: Option<String>,
    pub basic_auth: Option<String>,
    pub report_path: Option<String>,
    pub report_path_json: Option<String>,
}

impl ConfigFile {
    /// Loads the config file.
    ///
    /// With an explicit `path` the file must exist. Without one,
    /// `.urlgrab.toml` in the working directory is used when present,
    /// otherwise an empty config is returned.
    pub fn load(path: Option<&PathBuf>) -> Result<ConfigFile, String> {
        let path = match path {
            Some(p) if !p.exists() => {
                return Err(format!("Config file not found: {}", p.display()));
            }
            Some(p) => p.clone(),
            None => {
                let default = PathBuf::from(defaults::CONFIG_FILE);
                if !default.exists() {
                    return Ok(ConfigFile::default());
                }
                default
            }
        };

        let content = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;
        toml::from_str(&content)
            .map_err(|e| format!("Invalid config file {}: {}", path.display(), e))
    }
}

/// Whether the user passed `id` explicitly on the command line.
fn from_command_line(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

impl Cli {
    /// Fills in values from the config file. Arguments given on the command
    /// line always win.
    pub fn apply_config(&mut self, config: &ConfigFile, matches: &ArgMatches) -> Result<(), String> {
        if let Some(workers) = config.workers {
            if !from_command_line(matches, "workers") {
                if !(1..=100).contains(&workers) {
                    return Err(format!("workers must be between 1 and 100, got {}", workers));
                }
                self.workers = workers;
            }
        }
        if let Some(timeout) = config.request_timeout {
            if !from_command_line(matches, "request_timeout") {
                if !(1..=600).contains(&timeout) {
                    return Err(format!(
                        "request_timeout must be between 1 and 600, got {}",
                        timeout
                    ));
                }
                self.request_timeout = timeout;
            }
        }
        if let Some(user_agent) = &config.user_agent {
            if !from_command_line(matches, "user_agent") {
                self.user_agent = user_agent.clone();
            }
        }
        if let Some(auth) = &config.basic_auth {
            if !from_command_line(matches, "basic_auth") {
                self.basic_auth = Some(validate_basic_auth(auth)?);
            }
        }
        if let Some(path) = &config.report_path {
            if !from_command_line(matches, "report_path") {
                self.report_path = Some(expand_path(path)?);
            }
        }
        if let Some(path) = &config.report_path_json {
            if !from_command_line(matches, "report_path_json") {
                self.report_path_json = Some(expand_path(path)?);
            }
        }
        Ok(())
    }
}

use std::{fs, path::PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{CustomType, Select};
use serde_json::json;
use sunmoon_core::{CivilZone, DataQuery, Datasource, QueryRequest, Settings, TimeRange};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "sunmoon", version, about = "Sun and moon time series")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table, global = true)]
    pub format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the default location and civil time zone.
    Configure,

    /// Check that the configured default location is usable.
    Check,

    /// List the metrics and annotations a query can request.
    Targets,

    /// Run a single query.
    Query {
        /// Metric or annotation identifier; repeat for several.
        #[arg(short, long = "target", required = true)]
        targets: Vec<String>,

        /// Latitude override in degrees.
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,

        /// Longitude override in degrees.
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<String>,

        /// Range start (inclusive): RFC 3339 or YYYY-MM-DD.
        #[arg(long)]
        from: String,

        /// Range end (exclusive): RFC 3339 or YYYY-MM-DD.
        #[arg(long)]
        to: String,

        /// Sampling interval for metrics, e.g. 90s, 30m, 1h.
        #[arg(short, long, default_value = "30m")]
        interval: String,

        /// Identifier grouping the frames in the output.
        #[arg(long, default_value = "A")]
        ref_id: String,
    },

    /// Run every query of a JSON request file.
    Run {
        /// Path to a request document: { "queries": [...] }.
        request: PathBuf,
    },
}

impl Cli {
    pub fn run(self, settings: Settings) -> Result<()> {
        match self.command {
            Command::Configure => configure(settings),
            Command::Check => {
                let report = settings.check_health();
                println!("{report}");
                if !report.is_ok() {
                    bail!("datasource check failed");
                }
                Ok(())
            }
            Command::Targets => {
                output::print_targets(Datasource::from_settings(&settings).catalog());
                Ok(())
            }
            Command::Query {
                targets,
                lat,
                lon,
                from,
                to,
                interval,
                ref_id,
            } => {
                let query = DataQuery {
                    ref_id,
                    time_range: TimeRange::new(parse_time(&from)?, parse_time(&to)?),
                    interval_ms: Some(parse_interval(&interval)?.num_milliseconds()),
                    payload: json!({
                        "latitude": lat,
                        "longitude": lon,
                        "target": targets,
                    }),
                };
                execute(&settings, &QueryRequest { queries: vec![query] }, self.format)
            }
            Command::Run { request } => {
                let contents = fs::read_to_string(&request)
                    .with_context(|| format!("Failed to read request file: {}", request.display()))?;
                let request: QueryRequest = serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse request file: {}", request.display()))?;
                execute(&settings, &request, self.format)
            }
        }
    }
}

fn execute(settings: &Settings, request: &QueryRequest, format: Format) -> Result<()> {
    let datasource = Datasource::from_settings(settings);
    let response = datasource.query_data(request)?;

    match format {
        Format::Json => {
            let json = serde_json::to_string_pretty(&response)
                .context("Failed to serialize response")?;
            println!("{json}");
        }
        Format::Table => output::print_response(&response),
    }

    Ok(())
}

fn configure(mut settings: Settings) -> Result<()> {
    let latitude = coordinate_prompt("Default latitude:", "Degrees, -90 to +90", settings.latitude)?;
    let longitude = coordinate_prompt(
        "Default longitude:",
        "Degrees, -180 to +180 (east positive)",
        settings.longitude,
    )?;

    let zones = CivilZone::all().to_vec();
    let start = zones.iter().position(|z| *z == settings.civil_zone).unwrap_or(0);
    let zone = Select::new("Civil time zone for noon/midnight and calendar days:", zones)
        .with_starting_cursor(start)
        .prompt()?;

    settings.set_default_location(latitude, longitude);
    settings.civil_zone = zone;

    let path = settings.save()?;
    println!("Saved settings to {}", path.display());
    println!("{}", settings.check_health());

    Ok(())
}

fn coordinate_prompt(message: &str, help: &str, current: Option<f64>) -> Result<f64> {
    let mut prompt = CustomType::<f64>::new(message)
        .with_help_message(help)
        .with_error_message("Please enter a number");
    if let Some(value) = current {
        prompt = prompt.with_default(value);
    }
    Ok(prompt.prompt()?)
}

/// RFC 3339 timestamp, or a bare date meaning UTC midnight.
pub fn parse_time(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid time '{s}'. Use RFC 3339 or YYYY-MM-DD"))?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// `<n>s`, `<n>m`, `<n>h` or `<n>d`.
pub fn parse_interval(s: &str) -> Result<TimeDelta> {
    let s = s.trim().to_lowercase();

    let (count, unit): (&str, fn(i64) -> Option<TimeDelta>) =
        if let Some(n) = s.strip_suffix('s') {
            (n, TimeDelta::try_seconds)
        } else if let Some(n) = s.strip_suffix('m') {
            (n, TimeDelta::try_minutes)
        } else if let Some(n) = s.strip_suffix('h') {
            (n, TimeDelta::try_hours)
        } else if let Some(n) = s.strip_suffix('d') {
            (n, TimeDelta::try_days)
        } else {
            bail!("Invalid interval format: {s}. Use: 90s, 30m, 1h, 1d");
        };

    let count: i64 = count
        .trim()
        .parse()
        .with_context(|| format!("Invalid interval format: {s}. Use: 90s, 30m, 1h, 1d"))?;
    if count <= 0 {
        bail!("Interval must be positive: {s}");
    }

    unit(count).ok_or_else(|| anyhow!("Interval out of range: {s}"))
}

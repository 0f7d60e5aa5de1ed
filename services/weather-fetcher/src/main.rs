//! Weather snapshot fetcher.
//!
//! Fetches the latest QPEplus station snapshot, keeps one city's readings
//! and writes them to a JSON file. Exit status: 0 on success, 2 when the
//! portal rejects the query, 1 on any other failure. No file is written
//! unless the run succeeds.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use city_common::logging::init_tracing;
use clap::Parser;
use tracing::{error, info, warn};

use weather_fetcher::config::SessionConfig;
use weather_fetcher::{FetchError, FetcherConfig, WeatherPipeline};

#[derive(Parser, Debug)]
#[command(name = "weather-fetcher")]
#[command(about = "Fetch QPEplus station readings for one city")]
struct Args {
    /// Configuration file
    #[arg(long, env = "WEATHER_CONFIG", default_value = "config/weather.yaml")]
    config: PathBuf,

    /// City to keep (overrides filter.target)
    #[arg(long, env = "WEATHER_CITY")]
    city: Option<String>,

    /// Output file (overrides output.path)
    #[arg(short, long, env = "WEATHER_OUTPUT")]
    output: Option<PathBuf>,

    /// Session cookie NAME=VALUE; repeat to inject several and skip the
    /// landing page visit
    #[arg(long = "cookie", value_parser = parse_cookie_arg)]
    cookies: Vec<(String, String)>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn parse_cookie_arg(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=VALUE, got '{raw}'"))?;
    if name.is_empty() {
        return Err(anyhow!("cookie name is empty in '{raw}'"));
    }
    Ok((name.to_string(), value.to_string()))
}

fn load_config(args: &Args) -> Result<FetcherConfig> {
    let mut config = FetcherConfig::load_or_default(&args.config)?;

    if let Some(city) = &args.city {
        config.filter.target = city.clone();
    }
    if let Some(output) = &args.output {
        config.output.path = output.clone();
    }
    if !args.cookies.is_empty() {
        let csrf_cookie = match &config.session {
            SessionConfig::Live { csrf_cookie } | SessionConfig::Static { csrf_cookie, .. } => {
                csrf_cookie.clone()
            }
        };
        config.session = SessionConfig::Static {
            cookies: args.cookies.iter().cloned().collect(),
            csrf_token: None,
            csrf_cookie,
        };
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    if let Err(e) = init_tracing(&args.log_level, args.json_logs) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let config = match load_config(&args).context("Failed to load configuration") {
        Ok(config) => config,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    let pipeline = match WeatherPipeline::from_config(config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    match pipeline.run().await {
        Ok(report) => {
            info!(
                snapshot = %report.snapshot_time,
                total = report.total,
                kept = report.kept,
                path = %report.path.display(),
                "Weather snapshot saved"
            );
            ExitCode::SUCCESS
        }
        Err(e @ FetchError::Rejected { .. }) => {
            warn!(error = %e, "Portal rejected the snapshot query, nothing written");
            ExitCode::from(2)
        }
        Err(e) => {
            error!(error = %e, "Error occurred, nothing written");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookie_arg() {
        assert_eq!(
            parse_cookie_arg("csrftoken=abc=def").unwrap(),
            ("csrftoken".to_string(), "abc=def".to_string())
        );
        assert!(parse_cookie_arg("novalue").is_err());
        assert!(parse_cookie_arg("=x").is_err());
    }

    #[test]
    fn test_cookie_flags_switch_to_static_session() {
        let args = Args::parse_from([
            "weather-fetcher",
            "--config",
            "/nonexistent/weather.yaml",
            "--cookie",
            "csrftoken=abc",
            "--cookie",
            "sessionid=def",
            "--city",
            "新竹市",
        ]);
        let config = load_config(&args).unwrap();

        assert_eq!(config.filter.target, "新竹市");
        match config.session {
            SessionConfig::Static { cookies, .. } => assert_eq!(cookies.len(), 2),
            other => panic!("expected static session, got {other:?}"),
        }
    }
}

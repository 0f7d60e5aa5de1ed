//! The weather snapshot run.
//!
//! credentials -> snapshot time -> POST -> station filter -> envelope -> file
//!
//! Every step before the write can fail; the output file is only touched
//! once the envelope is complete.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use city_common::{write_json_atomic, JsonStyle};
use tracing::{info, warn};

use crate::client::PortalClient;
use crate::config::FetcherConfig;
use crate::envelope::SnapshotEnvelope;
use crate::error::Result;
use crate::session::{provider_from_config, CredentialProvider};
use crate::snapshot::{
    format_snapshot_time, resolve_snapshot_time, step_back, Clock, SystemClock,
};
use crate::station::{Station, StationFilter, StationSummary};

/// Filtered readings of one snapshot.
#[derive(Debug, Clone)]
pub struct FetchedSnapshot {
    /// Snapshot that was answered
    pub snapshot_time: NaiveDateTime,
    /// Readings across all cities
    pub total: usize,
    /// Readings of the target city, in portal order
    pub stations: Vec<Station>,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub snapshot_time: NaiveDateTime,
    pub total: usize,
    pub kept: usize,
    pub path: PathBuf,
}

pub struct WeatherPipeline {
    config: FetcherConfig,
    client: PortalClient,
    credentials: Box<dyn CredentialProvider>,
    clock: Box<dyn Clock>,
    filter: StationFilter,
}

impl WeatherPipeline {
    /// Pipeline with the configured session provider and the system clock.
    pub fn from_config(config: FetcherConfig) -> Result<Self> {
        let credentials = provider_from_config(&config.session, &config.portal.landing_url);
        let clock = SystemClock::from_config(config.snapshot.utc_offset_hours)?;
        Self::new(config, credentials, Box::new(clock))
    }

    pub fn new(
        config: FetcherConfig,
        credentials: Box<dyn CredentialProvider>,
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        let client = PortalClient::new(config.portal.clone(), &config.request)?;
        let filter = StationFilter::new(config.filter.city_filter());
        Ok(Self {
            config,
            client,
            credentials,
            clock,
            filter,
        })
    }

    /// Fetch and filter the latest snapshot without writing anything.
    pub async fn fetch(&self) -> Result<FetchedSnapshot> {
        let credentials = self.credentials.credentials(&self.client).await?;

        let mut snapshot_time = resolve_snapshot_time(self.clock.now());
        let mut steps_left = self.config.snapshot.step_back_attempts;

        let all_stations = loop {
            let data_time = format_snapshot_time(snapshot_time);
            let response = self.client.fetch_snapshot(&data_time, &credentials).await?;

            match response.into_stations() {
                Ok(stations) => break stations,
                Err(e) if e.is_soft() && steps_left > 0 => {
                    steps_left -= 1;
                    warn!(
                        data_time = %data_time,
                        error = %e,
                        "Snapshot rejected, trying the previous one"
                    );
                    snapshot_time = step_back(snapshot_time);
                }
                Err(e) => return Err(e),
            }
        };

        let total = all_stations.len();
        info!(total, "Total stations retrieved: {}", total);

        let stations = self.filter.apply(all_stations);
        info!(
            kept = stations.len(),
            city = %self.filter.target(),
            "Found {} stations in {}",
            stations.len(),
            self.filter.target()
        );

        for station in stations.iter().take(self.config.output.sample_size) {
            info!("{}", StationSummary::new(station, &self.config.labels));
        }

        Ok(FetchedSnapshot {
            snapshot_time,
            total,
            stations,
        })
    }

    /// Fetch, wrap and write the configured output file.
    pub async fn run(&self) -> Result<RunReport> {
        let fetched = self.fetch().await?;
        let kept = fetched.stations.len();

        let envelope = SnapshotEnvelope::new(self.clock.now(), fetched.stations);
        let path = self.config.output.path.clone();
        write_json_atomic(&path, &envelope, JsonStyle::Pretty)?;

        info!(path = %path.display(), "Saved filtered data to {}", path.display());

        Ok(RunReport {
            snapshot_time: fetched.snapshot_time,
            total: fetched.total,
            kept,
            path,
        })
    }
}

//! Weather snapshot fetcher.
//!
//! Pulls the station readings the CWA QPEplus monitor publishes every ten
//! minutes, keeps the stations of one city and saves them with the time of
//! the fetch.

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod pipeline;
pub mod session;
pub mod snapshot;
pub mod station;

pub use config::FetcherConfig;
pub use envelope::SnapshotEnvelope;
pub use error::{FetchError, Result};
pub use pipeline::{FetchedSnapshot, RunReport, WeatherPipeline};
pub use session::{CredentialProvider, LiveSession, SessionCredentials, StaticSession};
pub use snapshot::{resolve_snapshot_time, Clock, FixedClock, SystemClock};
pub use station::{Station, StationFilter};

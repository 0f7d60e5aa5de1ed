//! Output envelope: filtered readings plus the time they were saved.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::station::Station;

/// Format of `updated_at` (minute precision).
pub const UPDATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEnvelope {
    pub updated_at: String,
    pub data: Vec<Station>,
}

impl SnapshotEnvelope {
    /// `updated_at` is the write time, not the snapshot time queried.
    pub fn new(updated_at: NaiveDateTime, data: Vec<Station>) -> Self {
        Self {
            updated_at: updated_at.format(UPDATED_AT_FORMAT).to_string(),
            data,
        }
    }
}

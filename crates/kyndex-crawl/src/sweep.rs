//! Per-site sweep watermarks.
//!
//! `SweepTracker` records when each site was last swept, stored as one JSON
//! file in a state directory. Hosts use it to run "index everything changed
//! since the last sweep" without carrying their own timestamp; a missing
//! file simply means no site has ever been swept, so the next sweep is a
//! full reindex.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use kyndex_core::model::SiteId;
use kyndex_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tracker filename inside the state directory.
const TRACKER_FILE: &str = "kyndex-sweeps.json";

/// Record of one site's most recent sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepRecord {
    /// Start time of the sweep, used as the next incremental watermark.
    pub last_swept_at: DateTime<Utc>,
    /// Units committed by that sweep.
    pub units_indexed: usize,
}

/// Map from site id to its latest sweep record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepTracker {
    pub sites: HashMap<SiteId, SweepRecord>,
}

impl SweepTracker {
    /// Load the tracker from a state directory.
    ///
    /// Returns `Ok(None)` if the tracker file doesn't exist.
    /// Returns `Err` if the file exists but cannot be parsed.
    pub fn load(state_dir: &Path) -> Result<Option<Self>> {
        let path = state_dir.join(TRACKER_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
        let tracker: Self = serde_json::from_str(&content)
            .map_err(|e| Error::parse(format!("invalid sweep tracker JSON: {e}")))?;
        Ok(Some(tracker))
    }

    /// Save the tracker into a state directory.
    pub fn save(&self, state_dir: &Path) -> Result<()> {
        if !state_dir.exists() {
            std::fs::create_dir_all(state_dir).map_err(|e| Error::io_with_path(e, state_dir))?;
        }

        let path = state_dir.join(TRACKER_FILE);
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::operation(format!("failed to serialize sweep tracker: {e}")))?;
        std::fs::write(&path, content).map_err(|e| Error::io_with_path(e, &path))?;
        Ok(())
    }

    /// Watermark of a site's last sweep, if it was ever swept.
    pub fn last_swept(&self, site_id: SiteId) -> Option<DateTime<Utc>> {
        self.sites.get(&site_id).map(|r| r.last_swept_at)
    }

    /// Record a completed sweep.
    pub fn record(&mut self, site_id: SiteId, swept_at: DateTime<Utc>, units_indexed: usize) {
        self.sites.insert(
            site_id,
            SweepRecord {
                last_swept_at: swept_at,
                units_indexed,
            },
        );
    }
}

// ============================================================================
// Tests
// ============================================================================

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{SizegateError, SizegateResult};
use crate::region::margin::{Preload, parse_margin};
use crate::tracker::dimension_tracker::TrackerOpts;

/// JSON-facing tracker configuration.
///
/// ```json
/// { "preload": "0px 0px 200px 0px" }
/// ```
///
/// `preload` accepts `true`, `false` or a margin string and defaults to `true`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// Preload behavior, see [`TrackerOpts::preload`].
    pub preload: Preload,
}

impl TrackerConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json_str(s: &str) -> SizegateResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| SizegateError::serde(format!("parse tracker config JSON: {e}")))
    }

    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> SizegateResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| SizegateError::serde(format!("parse tracker config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SizegateResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SizegateError::Other(
                anyhow::Error::new(e)
                    .context(format!("open tracker config '{}'", path.display())),
            )
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> SizegateResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SizegateError::serde(e.to_string()))
    }

    /// Check the margin grammar now instead of at attach time.
    pub fn validate(&self) -> SizegateResult<()> {
        parse_margin(&self.preload).offsets().map(|_| ())
    }

    /// Tracker options for this configuration.
    pub fn opts(&self) -> TrackerOpts {
        TrackerOpts {
            preload: self.preload.clone(),
        }
    }
}

impl From<TrackerConfig> for TrackerOpts {
    fn from(cfg: TrackerConfig) -> Self {
        Self {
            preload: cfg.preload,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tracker/config.rs"]
mod tests;

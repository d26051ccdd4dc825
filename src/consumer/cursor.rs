//! Cursor Store - durable record of how far the consumer has read
//!
//! The record is a small UTF-8 text file:
//!
//! ```text
//! epoch=3f0c9a52-...
//! cursor=41
//! ```
//!
//! A bare integer on its own line is also accepted (older cursor-only
//! files). Anything unreadable degrades to the starting state, which
//! simply means a full resync from the beginning of the log.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{RelayError, RelayResult};
use crate::utils::atomic::{atomic_write, remove_stale_temp};

/// Cursor value meaning "nothing consumed yet"
pub const START_CURSOR: i64 = -1;

/// Last consumed index together with the epoch it belongs to
///
/// A storable epoch is non-empty, has no leading or trailing whitespace and
/// no line breaks. `CursorStore::save` rejects anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorState {
    pub last_index: i64,
    pub epoch: Option<String>,
}

impl CursorState {
    /// Cursor at `index` within `epoch`
    pub fn new(last_index: i64, epoch: Option<String>) -> Self {
        Self { last_index, epoch }
    }

    /// Whether `epoch` survives a render/parse cycle unchanged
    pub fn is_storable_epoch(epoch: &str) -> bool {
        !epoch.is_empty() && epoch.trim() == epoch && !epoch.contains(['\n', '\r'])
    }

    /// Parse the file format; `None` if the content is unusable
    pub fn parse(content: &str) -> Option<Self> {
        let mut last_index = None;
        let mut epoch = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(value) = line.strip_prefix("cursor=") {
                last_index = Some(value.trim().parse::<i64>().ok()?);
            } else if let Some(value) = line.strip_prefix("epoch=") {
                let value = value.trim();
                epoch = (!value.is_empty()).then(|| value.to_string());
            } else if let Ok(index) = line.parse::<i64>() {
                last_index = Some(index);
            }
        }

        let last_index = last_index.unwrap_or(START_CURSOR);
        if last_index < START_CURSOR {
            return None;
        }
        Some(Self { last_index, epoch })
    }

    /// Render the file format
    pub fn render(&self) -> String {
        let mut content = String::new();
        if let Some(epoch) = self.epoch.as_deref() {
            content.push_str("epoch=");
            content.push_str(epoch);
            content.push('\n');
        }
        content.push_str("cursor=");
        content.push_str(&self.last_index.to_string());
        content.push('\n');
        content
    }
}

impl Default for CursorState {
    fn default() -> Self {
        Self {
            last_index: START_CURSOR,
            epoch: None,
        }
    }
}

/// File-backed cursor record for one consumer
#[derive(Debug, Clone)]
pub struct CursorStore {
    path: PathBuf,
}

impl CursorStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the cursor file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored cursor, or the starting state if there is none
    pub fn load(&self) -> CursorState {
        match remove_stale_temp(&self.path) {
            Ok(true) => debug!(path = %self.path.display(), "Removed interrupted cursor write"),
            Ok(false) => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Could not remove stale cursor temp file"),
        }

        if !self.path.exists() {
            return CursorState::default();
        }

        match fs::read_to_string(&self.path) {
            Ok(content) => CursorState::parse(&content).unwrap_or_else(|| {
                warn!(path = %self.path.display(), "Unparseable cursor file, starting from the beginning");
                CursorState::default()
            }),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read cursor file, starting from the beginning");
                CursorState::default()
            }
        }
    }

    /// Replace the stored cursor
    pub fn save(&self, state: &CursorState) -> RelayResult<()> {
        if let Some(epoch) = state.epoch.as_deref() {
            if !CursorState::is_storable_epoch(epoch) {
                return Err(RelayError::InvalidEpoch(epoch.to_string()));
            }
        }
        atomic_write(&self.path, &state.render())?;
        Ok(())
    }
}

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::controller::{PersistedState, TranslationRequestController};

/// Where the widget keeps its session between runs
pub trait SnapshotStore: Send + Sync {
    fn save(&self, state: &PersistedState) -> Result<()>;

    /// `None` when nothing was saved yet
    fn load(&self) -> Result<Option<PersistedState>>;
}

/// Stores the session as pretty-printed JSON in a single file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&self, state: &PersistedState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write state file: {:?}", self.path))?;
        debug!("Saved widget state to {:?}", self.path);
        Ok(())
    }

    fn load(&self) -> Result<Option<PersistedState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let state = serde_json::from_str(&content)
            .with_context(|| format!("Corrupt state file: {:?}", self.path))?;
        Ok(Some(state))
    }
}

/// Save the controller's state every `period` until the handle is aborted
pub fn spawn_autosave(
    controller: TranslationRequestController,
    store: Arc<dyn SnapshotStore>,
    period: Duration,
) -> AbortHandle {
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if controller.is_disposed() {
                break;
            }
            if let Err(e) = store.save(&controller.persisted_state()) {
                warn!("Autosave failed: {:#}", e);
            }
        }
    });
    task.abort_handle()
}

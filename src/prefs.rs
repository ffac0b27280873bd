use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use anyhow::{Context, Result};

use crate::data::model::ModuleCode;

/// Key under which the last selected module code is kept.
pub const SELECTED_MODULE_KEY: &str = "selected_module";

/// Called once a write has finished, successfully or not.
pub type Completion = Box<dyn FnOnce(Result<()>) + Send + 'static>;

// ---------------------------------------------------------------------------
// PreferenceStore
// ---------------------------------------------------------------------------

/// String key/value persistence. Writes never block the caller.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;

    /// Start a write; `on_done` reports its outcome later.
    fn set(&self, key: &str, value: &str, on_done: Completion);
}

/// Read the stored selection. Absent or undecodable values mean `all`.
pub fn restore_selection(store: &dyn PreferenceStore) -> ModuleCode {
    match store.get(SELECTED_MODULE_KEY) {
        None => {
            log::debug!("no stored module selection, showing all");
            ModuleCode::All
        }
        Some(stored) => stored.parse().unwrap_or_else(|e| {
            log::warn!("ignoring stored module selection: {e}");
            ModuleCode::All
        }),
    }
}

/// Persist `code` in the background; failures are only logged.
pub fn persist_selection(store: &dyn PreferenceStore, code: ModuleCode) {
    let value = code.to_string();
    log::debug!("persisting module selection {value}");
    let stored = value.clone();
    store.set(
        SELECTED_MODULE_KEY,
        &stored,
        Box::new(move |result| match result {
            Ok(()) => log::debug!("stored module selection {value}"),
            Err(e) => log::warn!("failed to store module selection {value}: {e:#}"),
        }),
    );
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// Preferences kept as one flat JSON object on disk.
///
/// Reads come from an in-memory copy loaded at open time; each write updates
/// the copy immediately and rewrites the file on a background thread.
/// Dropping the store waits for writes still in flight.
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    values: Arc<Mutex<BTreeMap<String, String>>>,
    /// Serializes file rewrites so an older snapshot never lands last.
    write_lock: Arc<Mutex<()>>,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl JsonFilePreferenceStore {
    /// Open the store; a missing or unreadable file starts empty.
    pub fn open(path: &Path) -> Self {
        let values = match read_values(path) {
            Ok(values) => values,
            Err(e) => {
                if path.exists() {
                    log::warn!("starting with empty preferences: {e:#}");
                }
                BTreeMap::new()
            }
        };
        Self {
            path: path.to_path_buf(),
            values: Arc::new(Mutex::new(values)),
            write_lock: Arc::new(Mutex::new(())),
            pending: Mutex::new(Vec::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until every write started so far has finished.
    pub fn flush(&self) {
        let handles = match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(_) => return,
        };
        for handle in handles {
            if handle.join().is_err() {
                log::warn!("preference writer panicked");
            }
        }
    }
}

impl Drop for JsonFilePreferenceStore {
    fn drop(&mut self) {
        self.flush();
    }
}

fn read_values(path: &Path) -> Result<BTreeMap<String, String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn write_values(path: &Path, values: &BTreeMap<String, String>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let text = serde_json::to_string_pretty(values).context("serializing preferences")?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str, on_done: Completion) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }

        let path = self.path.clone();
        let values = Arc::clone(&self.values);
        let write_lock = Arc::clone(&self.write_lock);
        let handle = std::thread::spawn(move || {
            let result = match write_lock.lock() {
                Ok(_guard) => {
                    let snapshot = values.lock().map(|v| v.clone()).unwrap_or_default();
                    write_values(&path, &snapshot)
                }
                Err(_) => Err(anyhow::anyhow!("preference writer poisoned")),
            };
            on_done(result);
        });
        if let Ok(mut pending) = self.pending.lock() {
            pending.retain(|h| !h.is_finished());
            pending.push(handle);
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Store without persistence; writes complete immediately.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<BTreeMap<String, String>>,
}

#[cfg(test)]
impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str, on_done: Completion) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        on_done(Ok(()));
    }
}

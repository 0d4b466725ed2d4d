use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Key-value persistence the session reads at startup and writes on change.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String);

    /// Push buffered writes to the backing medium.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Key holding the hex value of slot `id`.
pub fn color_key(id: usize) -> String {
    format!("color_{id}")
}

/// Key holding the lock flag of slot `id`.
pub fn locked_key(id: usize) -> String {
    format!("color_{id}_locked")
}

pub const DARK_MODE_KEY: &str = "darkMode";

/// In-memory store, for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}

/// A flat JSON object on disk. Writes are buffered until [`flush`].
///
/// [`flush`]: KeyValueStore::flush
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
    dirty: bool,
}

impl JsonFileStore {
    /// Open the store at `path`.
    ///
    /// A missing, unreadable or malformed file is an empty store, and values
    /// that are not strings are dropped one by one. The session falls back to
    /// defaults for whatever is absent.
    pub fn open(path: &Path) -> Self {
        let values = match std::fs::read_to_string(path) {
            Ok(text) => parse_values(path, &text),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "state file not found, starting empty");
                BTreeMap::new()
            }
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "failed to read state file; starting empty"
                );
                BTreeMap::new()
            }
        };
        Self {
            path: path.to_path_buf(),
            values,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        if self.values.get(key) != Some(&value) {
            self.values.insert(key.to_string(), value);
            self.dirty = true;
        }
    }

    fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create state directory: {}", parent.display())
            })?;
        }
        let text = serde_json::to_string_pretty(&self.values)?;
        // readers only ever see the old file or the complete new one
        let tmp = temp_path_for(&self.path);
        std::fs::write(&tmp, text)
            .with_context(|| format!("failed to write state file {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace state file {}", self.path.display()))?;
        debug!(path = %self.path.display(), keys = self.values.len(), "state saved");
        self.dirty = false;
        Ok(())
    }
}

/// Keep the string entries of a JSON object, warning about everything else.
fn parse_values(path: &Path, text: &str) -> BTreeMap<String, String> {
    let object: Map<String, Value> = match serde_json::from_str(text) {
        Ok(object) => object,
        Err(error) => {
            warn!(
                path = %path.display(),
                error = %error,
                "state file is not a JSON object; starting empty"
            );
            return BTreeMap::new();
        }
    };
    object
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            other => {
                warn!(
                    path = %path.display(),
                    key = %key,
                    value = %other,
                    "ignoring non-string state value"
                );
                None
            }
        })
        .collect()
}

/// `state.json` -> `state.json.tmp` in the same directory.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "state.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Default state file: `$XDG_CONFIG_HOME/paletto/state.json`, falling back to
/// `~/.config/paletto/state.json`.
pub fn default_state_path() -> PathBuf {
    let config_home = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
            PathBuf::from(home).join(".config")
        });
    config_home.join("paletto").join("state.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("paletto-test-storage-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn keys_match_slot_layout() {
        assert_eq!(color_key(3), "color_3");
        assert_eq!(locked_key(3), "color_3_locked");
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("color_0"), None);
        store.set("color_0", "#112233".to_string());
        assert_eq!(store.get("color_0").as_deref(), Some("#112233"));
    }

    #[test]
    fn json_store_missing_file_is_empty() {
        let store = JsonFileStore::open(&temp_path("missing/state.json"));
        assert_eq!(store.get("color_0"), None);
    }

    #[test]
    fn json_store_persists_after_flush() {
        let path = temp_path("persist/state.json");
        let mut store = JsonFileStore::open(&path);
        store.set("color_1", "#ABCDEF".to_string());
        store.set(&locked_key(1), "true".to_string());
        store.flush().unwrap();

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("color_1").as_deref(), Some("#ABCDEF"));
        assert_eq!(reopened.get("color_1_locked").as_deref(), Some("true"));
        assert!(!temp_path_for(&path).exists());

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn json_store_treats_garbage_file_as_empty() {
        let path = temp_path("garbage/state.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();

        for content in ["not json", "", "[1, 2, 3]", "{\"color_0\": "] {
            std::fs::write(&path, content).unwrap();
            let store = JsonFileStore::open(&path);
            assert_eq!(store.get("color_0"), None, "content {content:?}");
        }

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn json_store_drops_only_non_string_values() {
        let path = temp_path("mixed/state.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r##"{"color_0": "#112233", "color_0_locked": true, "color_1": 7, "darkMode": "true"}"##,
        )
        .unwrap();

        let store = JsonFileStore::open(&path);
        assert_eq!(store.get("color_0").as_deref(), Some("#112233"));
        assert_eq!(store.get("color_0_locked"), None);
        assert_eq!(store.get("color_1"), None);
        assert_eq!(store.get(DARK_MODE_KEY).as_deref(), Some("true"));

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn flush_overwrites_corrupt_file() {
        let path = temp_path("corrupt/state.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ truncated").unwrap();

        let mut store = JsonFileStore::open(&path);
        store.set("color_0", "#445566".to_string());
        store.flush().unwrap();

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("color_0").as_deref(), Some("#445566"));

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn temp_path_sits_beside_target() {
        assert_eq!(
            temp_path_for(Path::new("/a/b/state.json")),
            PathBuf::from("/a/b/state.json.tmp")
        );
    }

    #[test]
    fn default_path_uses_xdg_config_home() {
        let path = default_state_path();
        assert!(path.ends_with("paletto/state.json"));
    }
}

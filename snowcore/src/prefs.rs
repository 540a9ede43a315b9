//! Persisted snowfall preference — per-user key with a global fallback.
//!
//! The store is a flat string-to-string map in one JSON file. Each viewer
//! touches two keys: `snow_enabled_user_<id>`, which wins when present,
//! and `snow_enabled`, the fallback for hosts that don't know who is
//! looking. Keys are written on every enable/disable and never deleted.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::storage;

const USER_KEY_PREFIX: &str = "snow_enabled_user_";
const GLOBAL_KEY: &str = "snow_enabled";

/// Sentinel identity for hosts without a signed-in user.
const ANON_USER: &str = "anon";

/// Normalize a raw user identifier. Hosts hand through whatever their
/// settings contain, so empty and junk values collapse to the anonymous
/// sentinel instead of producing keys like `snow_enabled_user_undefined`.
pub fn sanitize_user_id(raw: Option<&str>) -> &str {
    match raw {
        None | Some("") | Some("undefined") | Some("null") => ANON_USER,
        Some(id) => id,
    }
}

/// The storage-key pair for one viewer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefKeys {
    pub user_key: String,
    pub global_key: String,
}

impl PrefKeys {
    pub fn for_user(raw: Option<&str>) -> Self {
        Self {
            user_key: format!("{}{}", USER_KEY_PREFIX, sanitize_user_id(raw)),
            global_key: GLOBAL_KEY.to_string(),
        }
    }
}

/// On-disk preference store.
///
/// Reads and writes go through the file on every call; the store holds no
/// cache, so several instances pointed at the same file stay consistent.
pub struct PrefStore {
    path: PathBuf,
}

impl PrefStore {
    /// A store backed by a specific file.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// A store at the standard location for `app_name`.
    pub fn for_app(app_name: &str) -> Self {
        Self::new(storage::config_dir(app_name).join("snow_prefs.json"))
    }

    fn read_map(&self) -> HashMap<String, String> {
        // Missing or corrupt file reads as the empty map.
        storage::read_json(&self.path).unwrap_or_default()
    }

    /// Persist `enabled` under both the user-scoped and the global key.
    pub fn store(&self, keys: &PrefKeys, enabled: bool) {
        let mut map = self.read_map();
        let value = if enabled { "1" } else { "0" };
        map.insert(keys.user_key.clone(), value.to_string());
        map.insert(keys.global_key.clone(), value.to_string());
        let _ = storage::write_json(&self.path, &map);
    }

    /// Read the persisted preference: user-scoped key first, then the
    /// global fallback. Snow is on for first-time viewers.
    pub fn read_stored(&self, keys: &PrefKeys) -> bool {
        let map = self.read_map();
        match map.get(&keys.user_key).or_else(|| map.get(&keys.global_key)) {
            Some(value) => value == "1",
            None => true,
        }
    }
}

//! Durable key/value storage for client state.
//!
//! Web builds persist to `localStorage`; desktop builds persist each key as a
//! JSON file under the platform config directory (`~/.config/campusfeed/` on
//! Linux). Loading a missing or malformed value yields `None` — callers treat
//! that as "nothing stored".

use serde::{de::DeserializeOwned, Serialize};

/// Serialize and store a value under `key`. Returns `false` if the value
/// could not be serialized or the backing store rejected the write.
pub fn save<T: Serialize>(key: &str, value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(json) => save_raw(key, &json),
        Err(_) => false,
    }
}

/// Load and deserialize the value stored under `key`.
pub fn load<T: DeserializeOwned>(key: &str) -> Option<T> {
    let json = load_raw(key)?;
    serde_json::from_str(&json).ok()
}

/// Remove the value stored under `key`, if any.
pub fn remove(key: &str) {
    remove_raw(key);
}

// --- Web (WASM) backend ---

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[cfg(target_arch = "wasm32")]
fn save_raw(key: &str, value: &str) -> bool {
    local_storage()
        .map(|storage| storage.set_item(key, value).is_ok())
        .unwrap_or(false)
}

#[cfg(target_arch = "wasm32")]
fn load_raw(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok()?
}

#[cfg(target_arch = "wasm32")]
fn remove_raw(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

// --- Desktop (native) backend ---

#[cfg(not(target_arch = "wasm32"))]
fn key_path(key: &str) -> Option<std::path::PathBuf> {
    let dir = dirs::config_dir()?.join("campusfeed");
    if !dir.exists() {
        std::fs::create_dir_all(&dir).ok()?;
    }
    // Keys are fixed identifiers, but sanitize anyway so a key can never
    // escape the app directory.
    let safe = key.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
    Some(dir.join(format!("{safe}.json")))
}

#[cfg(not(target_arch = "wasm32"))]
fn save_raw(key: &str, value: &str) -> bool {
    key_path(key)
        .map(|path| std::fs::write(path, value).is_ok())
        .unwrap_or(false)
}

#[cfg(not(target_arch = "wasm32"))]
fn load_raw(key: &str) -> Option<String> {
    std::fs::read_to_string(key_path(key)?).ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn remove_raw(key: &str) {
    if let Some(path) = key_path(key) {
        let _ = std::fs::remove_file(path);
    }
}

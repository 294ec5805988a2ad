//! Live tuning parameter registry
//!
//! A process-wide store of named scalar parameters which operators can change
//! at runtime (for example from a tuning dashboard between control cycles).
//! Modules read their parameters back out of the registry at the start of
//! every processing cycle, so a value set between cycles takes effect on the
//! next one.
//!
//! Each key is read and written independently. A caller reading several keys
//! may observe a set which arrived part way through its reads; callers which
//! need a coherent set must tolerate this, as the registry provides no
//! cross-key transaction.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use conquer_once::Lazy;
use log::warn;
use std::collections::HashMap;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

static STORE: Lazy<Mutex<HashMap<String, f64>>> = Lazy::new(|| Mutex::new(HashMap::new()));

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Register a named parameter with its default value.
///
/// If the parameter is already present its current value is kept, so operator
/// overrides survive module re-initialisation.
pub fn register(key: &str, default: f64) {
    match STORE.lock() {
        Ok(mut map) => {
            map.entry(String::from(key)).or_insert(default);
        }
        Err(_) => warn!("Couldn't get lock on tuning store to register {:?}", key),
    }
}

/// Get the current value of a named parameter.
///
/// Unregistered keys return the given default.
pub fn get(key: &str, default: f64) -> f64 {
    match STORE.lock() {
        Ok(map) => *map.get(key).unwrap_or(&default),
        Err(_) => {
            warn!("Couldn't get lock on tuning store to read {:?}", key);
            default
        }
    }
}

/// Set the value of a named parameter.
pub fn set(key: &str, value: f64) {
    match STORE.lock() {
        Ok(mut map) => {
            map.insert(String::from(key), value);
        }
        Err(_) => warn!("Couldn't get lock on tuning store to set {:?}", key),
    }
}

/// Get a copy of the full registry, for archiving at session end.
pub fn snapshot() -> HashMap<String, f64> {
    match STORE.lock() {
        Ok(map) => map.clone(),
        Err(_) => {
            warn!("Couldn't get lock on tuning store for snapshot");
            HashMap::new()
        }
    }
}

//! Browser `localStorage` copy of the last known session.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session controller reads this once at startup so the loading screen
//! can greet a returning user before the identity backend reports. It is
//! never treated as signed in.
//!
//! TRADE-OFFS
//! ==========
//! Persistence is best-effort browser-only behavior; SSR paths no-op to keep
//! server rendering deterministic.

#[cfg(test)]
#[path = "session_cache_test.rs"]
mod session_cache_test;

use serde::Serialize;
use serde::de::DeserializeOwned;
use session::{Session, SessionCache};

const STORAGE_KEY: &str = "lawme_user";

/// [`SessionCache`] backed by `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSessionCache;

impl SessionCache for BrowserSessionCache {
    fn load(&self) -> Option<Session> {
        load_json(STORAGE_KEY)
    }

    fn store(&self, session: Option<&Session>) {
        match session {
            Some(session) => save_json(STORAGE_KEY, session),
            None => remove(STORAGE_KEY),
        }
    }
}

#[cfg(feature = "hydrate")]
fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Load a JSON value from `localStorage` for `key`.
fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    #[cfg(feature = "hydrate")]
    {
        let raw = storage()?.get_item(key).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = key;
        None
    }
}

/// Save a JSON value to `localStorage` for `key`.
fn save_json<T: Serialize>(key: &str, value: &T) {
    #[cfg(feature = "hydrate")]
    {
        let Some(storage) = storage() else {
            return;
        };
        let Ok(raw) = serde_json::to_string(value) else {
            return;
        };
        if storage.set_item(key, &raw).is_err() {
            leptos::logging::warn!("could not persist {key}");
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (key, value);
    }
}

fn remove(key: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(storage) = storage() {
            if storage.remove_item(key).is_err() {
                leptos::logging::warn!("could not clear {key}");
            }
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = key;
    }
}

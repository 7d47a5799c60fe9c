//! # client
//!
//! Leptos + WASM frontend for the Law Me legal-services platform.
//!
//! This crate contains the pages (login, registration, dashboard), the route
//! guard component, the browser bindings for the identity/profile backend,
//! and the bridge that mirrors `session::SessionController` snapshots into
//! reactive signals.

#![recursion_limit = "256"]

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install browser logging and hydrate the SSR markup.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        leptos::logging::warn!("console logger already installed");
    }
    leptos::mount::hydrate_body(app::App);
}

//! Neutral placeholder shown while the session is being resolved.

#[cfg(test)]
#[path = "loading_screen_test.rs"]
mod loading_screen_test;

use leptos::prelude::*;
use session::{Session, SessionSnapshot};

const LOADING_TEXT: &str = "Carregando...";

/// Placeholder text, greeting a returning user from the local cache.
fn loading_message(cached: Option<&Session>) -> String {
    match cached.and_then(Session::greeting_name) {
        Some(name) => format!("Olá, {name}. {LOADING_TEXT}"),
        None => LOADING_TEXT.to_owned(),
    }
}

#[component]
pub fn LoadingScreen() -> impl IntoView {
    let snapshot = expect_context::<RwSignal<SessionSnapshot>>();

    view! {
        <div class="loading-screen" aria-busy="true">
            <div class="loading-screen__spinner" aria-hidden="true"></div>
            <p class="loading-screen__text">{move || snapshot.with(|s| loading_message(s.cached.as_ref()))}</p>
        </div>
    }
}

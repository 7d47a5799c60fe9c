//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every guarded surface applies identical redirect behavior, driven by
//! [`session::decide`].

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use session::{GuardDecision, Route, SessionSnapshot, decide};

/// Where `target` should send the user right now, if anywhere.
pub fn redirect_target(snapshot: &SessionSnapshot, target: Route) -> Option<Route> {
    match decide(snapshot, target) {
        GuardDecision::Redirect(next) => Some(next),
        GuardDecision::Loading | GuardDecision::Render => None,
    }
}

/// Guard redirects replace the history entry so Back does not bounce.
fn redirect_options() -> NavigateOptions {
    NavigateOptions { replace: true, ..NavigateOptions::default() }
}

/// Navigate away from `target` whenever the snapshot says it does not apply.
pub fn install_route_redirect<F>(snapshot: RwSignal<SessionSnapshot>, target: Route, navigate: F)
where
    F: Fn(&str, NavigateOptions) + 'static,
{
    Effect::new(move || {
        if let Some(next) = snapshot.with(|state| redirect_target(state, target)) {
            navigate(next.path(), redirect_options());
        }
    });
}

//! Navigation decisions derived from a session snapshot.
//!
//! The guard only reads state. Views apply the decision: show a loading
//! placeholder, navigate, or render the requested surface.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::snapshot::{Phase, SessionSnapshot};

/// Top-level surfaces of the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Registration,
    Dashboard,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Registration => "/register",
            Self::Dashboard => "/dashboard",
        }
    }
}

/// What a surface should do for the current snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// State not settled yet; render a neutral placeholder, do not navigate.
    Loading,
    Redirect(Route),
    Render,
}

/// Decide how `target` should respond to `snapshot`.
#[must_use]
pub fn decide(snapshot: &SessionSnapshot, target: Route) -> GuardDecision {
    let protected = protected_decision(snapshot);
    match target {
        Route::Dashboard => protected,
        Route::Registration => match protected {
            GuardDecision::Redirect(Route::Registration) => GuardDecision::Render,
            GuardDecision::Render => GuardDecision::Redirect(Route::Dashboard),
            other => other,
        },
        Route::Login => {
            if !snapshot.resolved {
                return GuardDecision::Loading;
            }
            match snapshot.phase() {
                // Unlike the protected surfaces, login is not replaced by the
                // placeholder while its own sign-in attempt is in flight: the
                // form stays mounted so a rejection lands in its fault banner.
                // Only the initial unresolved load shows the placeholder.
                Phase::SignedOut | Phase::Authenticating => GuardDecision::Render,
                _ => match protected {
                    GuardDecision::Render => GuardDecision::Redirect(Route::Dashboard),
                    other => other,
                },
            }
        }
    }
}

fn protected_decision(snapshot: &SessionSnapshot) -> GuardDecision {
    match snapshot.phase() {
        Phase::Authenticating => GuardDecision::Loading,
        Phase::SignedOut => GuardDecision::Redirect(Route::Login),
        Phase::SignedInNoProfile if snapshot.is_profile_pending() => GuardDecision::Loading,
        Phase::SignedInNoProfile | Phase::SignedInIncomplete => GuardDecision::Redirect(Route::Registration),
        Phase::SignedInComplete => GuardDecision::Render,
    }
}

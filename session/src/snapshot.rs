//! Published session state and its derived phase.
//!
//! DESIGN
//! ======
//! The phase is computed from the snapshot fields instead of being stored
//! next to them, so a snapshot can never claim a phase its fields disagree
//! with (e.g. "complete" without a profile).

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use crate::fault::AuthFault;
use crate::types::{Profile, Session};

/// Position in the authentication lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    SignedOut,
    /// Initial load not yet reconciled, or a sign-in attempt is in flight.
    Authenticating,
    /// Identity confirmed; profile not loaded or not found.
    SignedInNoProfile,
    SignedInIncomplete,
    SignedInComplete,
}

impl Phase {
    #[must_use]
    pub fn is_signed_in(self) -> bool {
        matches!(self, Self::SignedInNoProfile | Self::SignedInIncomplete | Self::SignedInComplete)
    }
}

/// Immutable view of the controller state handed to readers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Authoritative session. `None` when signed out or not yet known.
    pub session: Option<Session>,
    /// Profile of `session`. Always `None` while `session` is `None`.
    pub profile: Option<Profile>,
    /// Whether the profile fetch for the current session has finished.
    pub profile_checked: bool,
    pub fault: Option<AuthFault>,
    /// An operation is in flight.
    pub busy: bool,
    /// The backend has reported the startup session at least once.
    pub resolved: bool,
    /// A sign-in attempt is in flight and no session exists yet.
    pub signing_in: bool,
    /// Last session from the local cache, for first paint only. Never grants
    /// access; cleared once the backend reports.
    pub cached: Option<Session>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn phase(&self) -> Phase {
        match (&self.session, &self.profile) {
            (None, _) if !self.resolved || self.signing_in => Phase::Authenticating,
            (None, _) => Phase::SignedOut,
            (Some(_), None) => Phase::SignedInNoProfile,
            (Some(_), Some(profile)) if profile.completed_registration => Phase::SignedInComplete,
            (Some(_), Some(_)) => Phase::SignedInIncomplete,
        }
    }

    /// The profile exists and is marked complete.
    #[must_use]
    pub fn is_registration_complete(&self) -> bool {
        self.profile.as_ref().is_some_and(|profile| profile.completed_registration)
    }

    /// A session exists but its profile fetch has not finished.
    #[must_use]
    pub fn is_profile_pending(&self) -> bool {
        self.session.is_some() && !self.profile_checked
    }

    pub(crate) fn uid(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.uid.as_str())
    }
}

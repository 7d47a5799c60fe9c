//! Session state controller.
//!
//! ARCHITECTURE
//! ============
//! `SessionController` is the single owner of the session/profile state and
//! the only caller of the identity and profile adapters. It is constructed
//! with its adapters injected and handed to the UI by reference; readers
//! either take a [`SessionSnapshot`] or [`subscribe`](SessionController::subscribe)
//! to receive every new snapshot.
//!
//! Startup is two-tier: [`prime_from_cache`](SessionController::prime_from_cache)
//! exposes the locally cached identity for first paint, then
//! [`listen`](SessionController::listen) consumes the backend's session feed.
//! The first feed item reconciles the state; the cache is only ever written
//! from authoritative changes.
//!
//! TRADE-OFFS
//! ==========
//! Concurrent calls are not serialized here. `busy` is derived from a count
//! of operations in flight, so it stays raised until the last one finishes
//! (or is dropped). Profile fetches carry the profile generation they
//! started under and are discarded when a save, sign-out, or identity change
//! has bumped it in the meantime.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures::StreamExt;

use crate::adapter::{IdentityBackend, ProfileStore, SessionCache};
use crate::fault::{BackendError, SessionError, map_to_friendly_fault};
use crate::snapshot::SessionSnapshot;
use crate::types::{Profile, ProfileDraft, Session};

type Listener = Arc<dyn Fn(&SessionSnapshot) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Keeps a listener registered; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            lock(&listeners).entries.retain(|(id, _)| *id != self.id);
        }
    }
}

/// Published snapshot plus bookkeeping that readers never see.
#[derive(Default)]
struct State {
    snapshot: SessionSnapshot,
    in_flight: usize,
    profile_generation: u64,
}

/// Counts one operation in flight for as long as it lives.
struct Operation<'a> {
    controller: &'a SessionController,
}

impl Drop for Operation<'_> {
    fn drop(&mut self) {
        self.controller.mutate(|state| state.in_flight = state.in_flight.saturating_sub(1));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owner of the authentication/profile state.
pub struct SessionController {
    identity: Arc<dyn IdentityBackend>,
    profiles: Arc<dyn ProfileStore>,
    cache: Arc<dyn SessionCache>,
    state: Mutex<State>,
    listeners: Arc<Mutex<Listeners>>,
}

impl SessionController {
    /// Create a controller in the unresolved (`Authenticating`) state.
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityBackend>,
        profiles: Arc<dyn ProfileStore>,
        cache: Arc<dyn SessionCache>,
    ) -> Self {
        Self {
            identity,
            profiles,
            cache,
            state: Mutex::new(State::default()),
            listeners: Arc::new(Mutex::new(Listeners::default())),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        lock(&self.state).snapshot.clone()
    }

    /// Register `listener` for every subsequent snapshot change.
    pub fn subscribe(&self, listener: impl Fn(&SessionSnapshot) + Send + Sync + 'static) -> Subscription {
        let mut listeners = lock(&self.listeners);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));
        Subscription { id, listeners: Arc::downgrade(&self.listeners) }
    }

    /// Expose the locally cached identity for first paint.
    ///
    /// Has no effect once the backend has reported; the cached identity is
    /// published in [`SessionSnapshot::cached`] and never as the session.
    pub fn prime_from_cache(&self) {
        let cached = self.cache.load();
        self.update(|state| {
            if !state.resolved {
                state.cached = cached;
            }
        });
    }

    /// Consume the backend's session feed until it ends.
    ///
    /// The feed subscription is released when this future completes or is
    /// dropped.
    pub async fn listen(&self) {
        let mut feed = self.identity.subscribe_to_session_changes();
        while let Some(change) = feed.next().await {
            self.apply_session_change(change).await;
        }
        tracing::debug!("session feed closed");
    }

    /// Apply an authoritative session-changed notification.
    ///
    /// A new identity starts a profile fetch; a repeat notification for the
    /// current identity only marks the state resolved.
    pub async fn apply_session_change(&self, session: Option<Session>) {
        self.cache.store(session.as_ref());
        let Some(session) = session else {
            self.mutate(|state| state.profile_generation += 1);
            self.update(|state| {
                state.session = None;
                state.profile = None;
                state.profile_checked = false;
                state.resolved = true;
                state.cached = None;
                state.fault = None;
            });
            return;
        };

        let uid = session.uid.clone();
        let is_new = self.snapshot().uid() != Some(uid.as_str());
        self.mutate(|state| {
            if is_new {
                state.profile_generation += 1;
            }
        });
        self.update(|state| {
            if is_new {
                state.profile = None;
                state.profile_checked = false;
            }
            state.session = Some(session);
            state.resolved = true;
            state.cached = None;
            state.fault = None;
        });

        if is_new {
            if let Err(error) = self.load_profile(&uid).await {
                tracing::warn!(%uid, %error, "profile fetch failed; treating account as unregistered");
            }
        }
    }

    /// Sign in through the third-party provider popup.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Fault`] when the provider flow is cancelled or
    /// the backend rejects it.
    pub async fn sign_in_with_federated_provider(&self) -> Result<(), SessionError> {
        self.authenticate("federated", self.identity.sign_in_with_federated_provider())
            .await
    }

    /// Create a password account and sign in with it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Fault`] for weak passwords, emails already in
    /// use, and every other backend rejection.
    pub async fn register_with_credentials(&self, email: &str, password: &str) -> Result<(), SessionError> {
        self.authenticate("register", self.identity.create_account_with_password(email, password))
            .await
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Fault`] for unknown users, wrong credentials,
    /// and every other backend rejection.
    pub async fn login_with_credentials(&self, email: &str, password: &str) -> Result<(), SessionError> {
        self.authenticate("login", self.identity.sign_in_with_password(email, password))
            .await
    }

    /// Sign out. Local session and profile are cleared even when the backend
    /// call fails.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Fault`] when the backend reports a failure.
    pub async fn sign_out(&self) -> Result<(), SessionError> {
        let _operation = self.begin();
        self.update(|state| state.fault = None);
        let result = self.identity.sign_out().await;
        self.cache.store(None);

        let fault = result.as_ref().err().map(map_to_friendly_fault);
        if let Some(fault) = &fault {
            tracing::warn!(code = %fault.code, "sign-out reported a failure; local session cleared anyway");
        }
        self.mutate(|state| state.profile_generation += 1);
        self.update(|state| {
            state.session = None;
            state.profile = None;
            state.profile_checked = false;
            state.resolved = true;
            state.signing_in = false;
            state.cached = None;
            state.fault = fault.clone();
        });
        fault.map_or(Ok(()), |fault| Err(SessionError::Fault(fault)))
    }

    /// Complete registration with `draft`.
    ///
    /// The stored profile always has `completed_registration = true` and is
    /// written with merge semantics.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotAuthenticated`] without touching state when
    /// no session exists, and [`SessionError::Adapter`] when the store fails.
    pub async fn save_profile(&self, draft: ProfileDraft) -> Result<Profile, SessionError> {
        let Some(uid) = self.snapshot().uid().map(str::to_owned) else {
            return Err(SessionError::NotAuthenticated);
        };
        let profile = draft.into_profile();

        let _operation = self.begin();
        let result = self.profiles.put_profile(&uid, &profile, true).await;
        match result {
            Ok(()) => {
                tracing::info!(%uid, kind = ?profile.kind(), "registration completed");
                self.mutate(|state| {
                    if state.snapshot.uid() == Some(uid.as_str()) {
                        // Fetches started before the write may hold the old document.
                        state.profile_generation += 1;
                        state.snapshot.profile = Some(profile.clone());
                        state.snapshot.profile_checked = true;
                    }
                });
                Ok(profile)
            }
            Err(error) => {
                tracing::warn!(%uid, %error, "profile save failed");
                Err(SessionError::Adapter(error))
            }
        }
    }

    /// Re-fetch the profile of the current session. No-op when signed out.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Adapter`] when the store fails.
    pub async fn refresh_profile(&self) -> Result<(), SessionError> {
        let Some(uid) = self.snapshot().uid().map(str::to_owned) else {
            return Ok(());
        };
        let _operation = self.begin();
        self.load_profile(&uid).await.map_err(SessionError::Adapter)
    }

    /// Whether the current account finished registration, fetching the
    /// profile first if it is not loaded.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Adapter`] when the fetch fails.
    pub async fn is_registration_complete(&self) -> Result<bool, SessionError> {
        let snapshot = self.snapshot();
        if snapshot.session.is_none() {
            return Ok(false);
        }
        if let Some(profile) = &snapshot.profile {
            return Ok(profile.completed_registration);
        }
        self.refresh_profile().await?;
        Ok(self.snapshot().is_registration_complete())
    }

    /// Acknowledge and clear the current fault.
    pub fn clear_fault(&self) {
        self.update(|state| state.fault = None);
    }

    async fn authenticate<F>(&self, operation: &'static str, attempt: F) -> Result<(), SessionError>
    where
        F: Future<Output = Result<Session, BackendError>>,
    {
        let _operation = self.begin();
        self.update(|state| {
            state.fault = None;
            if state.session.is_none() {
                state.signing_in = true;
            }
        });

        match attempt.await {
            Ok(session) => {
                tracing::info!(operation, uid = %session.uid, "sign-in accepted");
                self.apply_session_change(Some(session)).await;
                self.update(|state| state.signing_in = false);
                Ok(())
            }
            Err(error) => {
                let fault = map_to_friendly_fault(&error);
                tracing::warn!(operation, code = %fault.code, raw = %fault.raw_message, "sign-in rejected");
                self.update(|state| {
                    state.signing_in = false;
                    state.fault = Some(fault.clone());
                });
                Err(SessionError::Fault(fault))
            }
        }
    }

    async fn load_profile(&self, uid: &str) -> Result<(), BackendError> {
        let generation = lock(&self.state).profile_generation;
        let fetched = self.profiles.get_profile(uid).await;
        if let Ok(profile) = &fetched {
            tracing::debug!(%uid, found = profile.is_some(), "profile fetched");
        }
        self.mutate(|state| {
            // A save, sign-out, or identity change happened while in flight.
            if state.profile_generation != generation || state.snapshot.uid() != Some(uid) {
                tracing::debug!(%uid, "discarding stale profile fetch");
                return;
            }
            state.snapshot.profile_checked = true;
            if let Ok(profile) = &fetched {
                state.snapshot.profile.clone_from(profile);
            }
        });
        fetched.map(|_| ())
    }

    fn begin(&self) -> Operation<'_> {
        self.mutate(|state| state.in_flight += 1);
        Operation { controller: self }
    }

    fn update(&self, change: impl FnOnce(&mut SessionSnapshot)) {
        self.mutate(|state| change(&mut state.snapshot));
    }

    /// Apply `change`, re-derive `busy`, and publish if the snapshot moved.
    fn mutate(&self, change: impl FnOnce(&mut State)) {
        let next = {
            let mut state = lock(&self.state);
            let before = state.snapshot.clone();
            change(&mut state);
            state.snapshot.busy = state.in_flight > 0;
            if state.snapshot == before {
                return;
            }
            if before.phase() != state.snapshot.phase() {
                tracing::debug!(from = ?before.phase(), to = ?state.snapshot.phase(), "session phase changed");
            }
            state.snapshot.clone()
        };
        self.publish(&next);
    }

    fn publish(&self, snapshot: &SessionSnapshot) {
        let listeners: Vec<Listener> = lock(&self.listeners)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(snapshot);
        }
    }
}

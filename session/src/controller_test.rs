use super::*;
use std::collections::HashMap;

use async_trait::async_trait;
use futures::StreamExt;
use futures::channel::oneshot;

use crate::adapter::{NoCache, SessionFeed};
use crate::fault::FaultCode;
use crate::guard::{GuardDecision, Route, decide};
use crate::snapshot::Phase;
use crate::types::AccountDetails;

// =========================================================================
// Fakes
// =========================================================================

#[derive(Default)]
struct FakeIdentity {
    /// email -> (password, session)
    accounts: Mutex<HashMap<String, (String, Session)>>,
    federated: Mutex<Option<Result<Session, BackendError>>>,
    forced_error: Mutex<Option<BackendError>>,
    sign_out_error: Mutex<Option<BackendError>>,
    feed: Mutex<Vec<Option<Session>>>,
}

impl FakeIdentity {
    fn with_account(email: &str, password: &str, uid: &str) -> Self {
        let identity = Self::default();
        identity.accounts.lock().unwrap().insert(
            email.to_owned(),
            (password.to_owned(), session_for(uid, email)),
        );
        identity
    }

    fn take_forced(&self) -> Option<BackendError> {
        self.forced_error.lock().unwrap().take()
    }
}

#[async_trait(?Send)]
impl IdentityBackend for FakeIdentity {
    async fn sign_in_with_federated_provider(&self) -> Result<Session, BackendError> {
        self.federated
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(BackendError::new("auth/popup-closed-by-user", "closed")))
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        if let Some(error) = self.take_forced() {
            return Err(error);
        }
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(email) {
            None => Err(BackendError::new("auth/user-not-found", "no user")),
            Some((stored, _)) if stored != password => {
                Err(BackendError::new("auth/invalid-credential", "bad password"))
            }
            Some((_, session)) => Ok(session.clone()),
        }
    }

    async fn create_account_with_password(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        if let Some(error) = self.take_forced() {
            return Err(error);
        }
        if password.len() < 6 {
            return Err(BackendError::new("auth/weak-password", "too short"));
        }
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(BackendError::new("auth/email-already-in-use", "taken"));
        }
        let session = session_for(&format!("uid-{}", accounts.len() + 1), email);
        accounts.insert(email.to_owned(), (password.to_owned(), session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.sign_out_error.lock().unwrap().take().map_or(Ok(()), Err)
    }

    fn subscribe_to_session_changes(&self) -> SessionFeed {
        let changes = std::mem::take(&mut *self.feed.lock().unwrap());
        futures::stream::iter(changes).boxed_local()
    }
}

#[derive(Default)]
struct FakeProfiles {
    docs: Mutex<HashMap<String, Profile>>,
    get_error: Mutex<Option<BackendError>>,
    put_error: Mutex<Option<BackendError>>,
    gets: Mutex<usize>,
    puts: Mutex<Vec<(String, Profile, bool)>>,
    /// Holds the next `get_profile` after it has read the store.
    gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl FakeProfiles {
    /// Make the next fetch read the store now but return only once the
    /// returned sender fires.
    fn hold_next_get(&self) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        *self.gate.lock().unwrap() = Some(gate);
        release
    }
}

#[async_trait(?Send)]
impl ProfileStore for FakeProfiles {
    async fn get_profile(&self, uid: &str) -> Result<Option<Profile>, BackendError> {
        *self.gets.lock().unwrap() += 1;
        if let Some(error) = self.get_error.lock().unwrap().take() {
            return Err(error);
        }
        let doc = self.docs.lock().unwrap().get(uid).cloned();
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(doc)
    }

    async fn put_profile(&self, uid: &str, profile: &Profile, merge: bool) -> Result<(), BackendError> {
        if let Some(error) = self.put_error.lock().unwrap().take() {
            return Err(error);
        }
        self.puts.lock().unwrap().push((uid.to_owned(), profile.clone(), merge));
        self.docs.lock().unwrap().insert(uid.to_owned(), profile.clone());
        Ok(())
    }
}

#[derive(Default)]
struct MemoryCache {
    session: Mutex<Option<Session>>,
}

impl SessionCache for MemoryCache {
    fn load(&self) -> Option<Session> {
        self.session.lock().unwrap().clone()
    }

    fn store(&self, session: Option<&Session>) {
        *self.session.lock().unwrap() = session.cloned();
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn session_for(uid: &str, email: &str) -> Session {
    Session { uid: uid.to_owned(), email: Some(email.to_owned()), display_name: None }
}

fn client_draft(interests: &[&str]) -> ProfileDraft {
    ProfileDraft {
        full_name: "Ana".to_owned(),
        phone: "11 99999-0000".to_owned(),
        national_id: "123.456.789-00".to_owned(),
        account: AccountDetails::Client { interests: interests.iter().map(|s| (*s).to_owned()).collect() },
    }
}

fn complete_profile() -> Profile {
    client_draft(&["Penal"]).into_profile()
}

struct Harness {
    identity: Arc<FakeIdentity>,
    profiles: Arc<FakeProfiles>,
    cache: Arc<MemoryCache>,
    controller: SessionController,
}

impl Harness {
    fn new(identity: FakeIdentity) -> Self {
        let identity = Arc::new(identity);
        let profiles = Arc::new(FakeProfiles::default());
        let cache = Arc::new(MemoryCache::default());
        let controller = SessionController::new(identity.clone(), profiles.clone(), cache.clone());
        Self { identity, profiles, cache, controller }
    }

    async fn signed_out(identity: FakeIdentity) -> Self {
        let harness = Self::new(identity);
        harness.controller.apply_session_change(None).await;
        harness
    }

    fn record(&self) -> (Arc<Mutex<Vec<SessionSnapshot>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let subscription = self.controller.subscribe(move |snapshot| sink.lock().unwrap().push(snapshot.clone()));
        (seen, subscription)
    }
}

fn assert_busy_bracketed(seen: &Mutex<Vec<SessionSnapshot>>) {
    let seen = seen.lock().unwrap();
    assert!(!seen.is_empty(), "operation published nothing");
    assert!(seen.iter().any(|s| s.busy), "busy was never raised");
    assert!(!seen.last().unwrap().busy, "busy left raised");
}

// =========================================================================
// Startup
// =========================================================================

#[tokio::test]
async fn fresh_load_without_session_resolves_to_signed_out() {
    let identity = FakeIdentity::default();
    identity.feed.lock().unwrap().push(None);
    let harness = Harness::new(identity);

    let initial = harness.controller.snapshot();
    assert_eq!(initial.phase(), Phase::Authenticating);
    assert_eq!(decide(&initial, Route::Dashboard), GuardDecision::Loading);

    harness.controller.listen().await;

    let snapshot = harness.controller.snapshot();
    assert_eq!(snapshot.phase(), Phase::SignedOut);
    assert_eq!(decide(&snapshot, Route::Dashboard), GuardDecision::Redirect(Route::Login));
}

#[tokio::test]
async fn feed_restores_existing_complete_account() {
    let identity = FakeIdentity::default();
    identity.feed.lock().unwrap().extend([None, Some(session_for("u1", "a@b.com"))]);
    let harness = Harness::new(identity);
    harness.profiles.docs.lock().unwrap().insert("u1".to_owned(), complete_profile());

    harness.controller.listen().await;

    let snapshot = harness.controller.snapshot();
    assert_eq!(snapshot.phase(), Phase::SignedInComplete);
    assert_eq!(decide(&snapshot, Route::Dashboard), GuardDecision::Render);
}

#[tokio::test]
async fn cached_identity_is_shown_but_not_trusted() {
    let harness = Harness::new(FakeIdentity::default());
    harness.cache.store(Some(&session_for("stale", "old@b.com")));

    harness.controller.prime_from_cache();
    let primed = harness.controller.snapshot();
    assert_eq!(primed.cached.as_ref().map(|s| s.uid.as_str()), Some("stale"));
    assert_eq!(primed.session, None);
    assert_eq!(primed.phase(), Phase::Authenticating);

    harness.controller.apply_session_change(None).await;
    let resolved = harness.controller.snapshot();
    assert_eq!(resolved.cached, None);
    assert_eq!(resolved.phase(), Phase::SignedOut);
    assert_eq!(harness.cache.load(), None);
}

#[tokio::test]
async fn priming_after_resolution_is_ignored() {
    let harness = Harness::signed_out(FakeIdentity::default()).await;
    harness.cache.store(Some(&session_for("stale", "old@b.com")));
    harness.controller.prime_from_cache();
    assert_eq!(harness.controller.snapshot().cached, None);
}

#[tokio::test]
async fn authoritative_session_is_written_to_cache() {
    let harness = Harness::new(FakeIdentity::default());
    harness.controller.apply_session_change(Some(session_for("u1", "a@b.com"))).await;
    assert_eq!(harness.cache.load().map(|s| s.uid), Some("u1".to_owned()));
}

#[tokio::test]
async fn repeated_notification_does_not_refetch_profile() {
    let harness = Harness::new(FakeIdentity::default());
    harness.controller.apply_session_change(Some(session_for("u1", "a@b.com"))).await;
    harness.controller.apply_session_change(Some(session_for("u1", "a@b.com"))).await;
    assert_eq!(*harness.profiles.gets.lock().unwrap(), 1);
}

#[tokio::test]
async fn profile_fetch_failure_is_treated_as_unregistered() {
    let harness = Harness::new(FakeIdentity::default());
    *harness.profiles.get_error.lock().unwrap() = Some(BackendError::new("unavailable", "offline"));

    harness.controller.apply_session_change(Some(session_for("u1", "a@b.com"))).await;

    let snapshot = harness.controller.snapshot();
    assert!(snapshot.profile_checked);
    assert_eq!(snapshot.profile, None);
    assert_eq!(decide(&snapshot, Route::Dashboard), GuardDecision::Redirect(Route::Registration));
}

// =========================================================================
// Credential sign-in
// =========================================================================

#[tokio::test]
async fn weak_password_login_keeps_signed_out_and_sets_fault() {
    let harness = Harness::signed_out(FakeIdentity::default()).await;
    *harness.identity.forced_error.lock().unwrap() =
        Some(BackendError::new("auth/weak-password", "Password should be at least 6 characters"));
    let (seen, _sub) = harness.record();

    let err = harness.controller.login_with_credentials("a@b.com", "short").await.unwrap_err();

    let snapshot = harness.controller.snapshot();
    assert_eq!(snapshot.phase(), Phase::SignedOut);
    let fault = snapshot.fault.unwrap();
    assert_eq!(fault.display_message, "A senha é muito fraca (mínimo de 6 caracteres)");
    assert_eq!(err.fault(), Some(&fault));
    assert_busy_bracketed(&seen);
    assert!(seen.lock().unwrap().iter().any(|s| s.phase() == Phase::Authenticating));
}

#[tokio::test]
async fn login_with_unknown_email_reports_user_not_found() {
    let harness = Harness::signed_out(FakeIdentity::default()).await;
    let err = harness.controller.login_with_credentials("x@b.com", "secret1").await.unwrap_err();
    assert_eq!(err.fault().map(|f| f.code.clone()), Some(FaultCode::UserNotFound));
}

#[tokio::test]
async fn login_with_wrong_password_reports_invalid_credential() {
    let harness = Harness::signed_out(FakeIdentity::with_account("a@b.com", "secret1", "u1")).await;
    let err = harness.controller.login_with_credentials("a@b.com", "nope").await.unwrap_err();
    assert_eq!(err.to_string(), "Senha incorreta");
    assert_eq!(harness.controller.snapshot().phase(), Phase::SignedOut);
}

#[tokio::test]
async fn login_with_complete_profile_reaches_dashboard() {
    let harness = Harness::signed_out(FakeIdentity::with_account("a@b.com", "secret1", "u1")).await;
    harness.profiles.docs.lock().unwrap().insert("u1".to_owned(), complete_profile());
    let (seen, _sub) = harness.record();

    harness.controller.login_with_credentials("a@b.com", "secret1").await.unwrap();

    let snapshot = harness.controller.snapshot();
    assert_eq!(snapshot.phase(), Phase::SignedInComplete);
    assert_eq!(snapshot.fault, None);
    assert_eq!(decide(&snapshot, Route::Login), GuardDecision::Redirect(Route::Dashboard));
    assert_busy_bracketed(&seen);
}

#[tokio::test]
async fn register_creates_account_without_profile() {
    let harness = Harness::signed_out(FakeIdentity::default()).await;
    harness.controller.register_with_credentials("new@b.com", "secret1").await.unwrap();

    let snapshot = harness.controller.snapshot();
    assert_eq!(snapshot.phase(), Phase::SignedInNoProfile);
    assert_eq!(decide(&snapshot, Route::Dashboard), GuardDecision::Redirect(Route::Registration));
}

#[tokio::test]
async fn register_rejections_become_faults() {
    let harness = Harness::signed_out(FakeIdentity::with_account("a@b.com", "secret1", "u1")).await;

    let weak = harness.controller.register_with_credentials("n@b.com", "123").await.unwrap_err();
    assert_eq!(weak.fault().map(|f| f.code.clone()), Some(FaultCode::WeakPassword));

    let taken = harness.controller.register_with_credentials("a@b.com", "secret1").await.unwrap_err();
    assert_eq!(taken.to_string(), "Este e-mail já está em uso por outra conta");
    assert!(!harness.controller.snapshot().busy);
}

// =========================================================================
// Federated sign-in
// =========================================================================

#[tokio::test]
async fn federated_sign_in_for_new_account_goes_to_registration() {
    let harness = Harness::signed_out(FakeIdentity::default()).await;
    *harness.identity.federated.lock().unwrap() = Some(Ok(session_for("g1", "g@b.com")));
    let (seen, _sub) = harness.record();

    harness.controller.sign_in_with_federated_provider().await.unwrap();

    let snapshot = harness.controller.snapshot();
    assert_eq!(snapshot.phase(), Phase::SignedInNoProfile);
    assert!(snapshot.profile_checked);
    assert_eq!(decide(&snapshot, Route::Dashboard), GuardDecision::Redirect(Route::Registration));
    assert!(!harness.controller.is_registration_complete().await.unwrap());
    assert_busy_bracketed(&seen);
}

#[tokio::test]
async fn cancelled_popup_returns_to_previous_state() {
    let harness = Harness::signed_out(FakeIdentity::default()).await;
    let (seen, _sub) = harness.record();

    let err = harness.controller.sign_in_with_federated_provider().await.unwrap_err();

    assert_eq!(err.to_string(), "Login com Google cancelado");
    assert_eq!(harness.controller.snapshot().phase(), Phase::SignedOut);
    assert_busy_bracketed(&seen);
}

// =========================================================================
// Profile
// =========================================================================

#[tokio::test]
async fn save_profile_completes_registration() {
    let harness = Harness::signed_out(FakeIdentity::default()).await;
    harness.controller.apply_session_change(Some(session_for("u1", "a@b.com"))).await;
    let (seen, _sub) = harness.record();

    let profile = harness.controller.save_profile(client_draft(&["Civil"])).await.unwrap();

    assert!(profile.completed_registration);
    assert_eq!(profile.account, AccountDetails::Client { interests: vec!["Civil".to_owned()] });
    let snapshot = harness.controller.snapshot();
    assert_eq!(snapshot.profile.as_ref(), Some(&profile));
    assert_eq!(snapshot.phase(), Phase::SignedInComplete);
    assert_busy_bracketed(&seen);

    let puts = harness.profiles.puts.lock().unwrap();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].0, "u1");
    assert!(puts[0].1.completed_registration);
    assert!(puts[0].2, "profile writes must merge");
}

#[tokio::test]
async fn save_profile_moves_incomplete_profile_to_complete() {
    let harness = Harness::signed_out(FakeIdentity::default()).await;
    let mut stored = complete_profile();
    stored.completed_registration = false;
    harness.profiles.docs.lock().unwrap().insert("u1".to_owned(), stored);
    harness.controller.apply_session_change(Some(session_for("u1", "a@b.com"))).await;
    assert_eq!(harness.controller.snapshot().phase(), Phase::SignedInIncomplete);

    harness.controller.save_profile(client_draft(&[])).await.unwrap();

    assert_eq!(harness.controller.snapshot().phase(), Phase::SignedInComplete);
}

#[tokio::test]
async fn save_profile_without_session_leaves_state_untouched() {
    let harness = Harness::signed_out(FakeIdentity::default()).await;
    let before = harness.controller.snapshot();
    let (seen, _sub) = harness.record();

    let err = harness.controller.save_profile(client_draft(&["Civil"])).await.unwrap_err();

    assert_eq!(err, SessionError::NotAuthenticated);
    assert_eq!(harness.controller.snapshot(), before);
    assert!(seen.lock().unwrap().is_empty());
    assert!(harness.profiles.puts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn save_profile_store_failure_is_passed_through() {
    let harness = Harness::signed_out(FakeIdentity::default()).await;
    harness.controller.apply_session_change(Some(session_for("u1", "a@b.com"))).await;
    let failure = BackendError::new("permission-denied", "rules rejected write");
    *harness.profiles.put_error.lock().unwrap() = Some(failure.clone());
    let (seen, _sub) = harness.record();

    let err = harness.controller.save_profile(client_draft(&["Civil"])).await.unwrap_err();

    assert_eq!(err, SessionError::Adapter(failure));
    let snapshot = harness.controller.snapshot();
    assert_eq!(snapshot.fault, None);
    assert_eq!(snapshot.profile, None);
    assert_busy_bracketed(&seen);
}

#[tokio::test]
async fn refresh_profile_is_noop_when_signed_out() {
    let harness = Harness::signed_out(FakeIdentity::default()).await;
    harness.controller.refresh_profile().await.unwrap();
    assert_eq!(*harness.profiles.gets.lock().unwrap(), 0);
}

#[tokio::test]
async fn is_registration_complete_fetches_missing_profile() {
    let harness = Harness::signed_out(FakeIdentity::default()).await;
    *harness.profiles.get_error.lock().unwrap() = Some(BackendError::new("unavailable", "offline"));
    harness.controller.apply_session_change(Some(session_for("u1", "a@b.com"))).await;
    harness.profiles.docs.lock().unwrap().insert("u1".to_owned(), complete_profile());

    assert!(harness.controller.is_registration_complete().await.unwrap());
    assert_eq!(*harness.profiles.gets.lock().unwrap(), 2);
    assert!(!harness.controller.snapshot().busy);
}

#[tokio::test]
async fn is_registration_complete_is_false_when_signed_out() {
    let harness = Harness::signed_out(FakeIdentity::default()).await;
    assert!(!harness.controller.is_registration_complete().await.unwrap());
}

// =========================================================================
// Overlapping operations
// =========================================================================

async fn signed_in_without_profile() -> Harness {
    let harness = Harness::new(FakeIdentity::default());
    harness.controller.apply_session_change(Some(session_for("u1", "a@b.com"))).await;
    assert_eq!(harness.controller.snapshot().phase(), Phase::SignedInNoProfile);
    harness
}

#[tokio::test]
async fn fetch_started_before_save_does_not_undo_registration() {
    let harness = signed_in_without_profile().await;
    let controller = &harness.controller;
    let release = harness.profiles.hold_next_get();

    let (refreshed, saved) = futures::join!(controller.refresh_profile(), async {
        let saved = controller.save_profile(client_draft(&["Civil"])).await;
        release.send(()).unwrap();
        saved
    });

    assert!(refreshed.is_ok());
    assert!(saved.is_ok());
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase(), Phase::SignedInComplete);
    assert_eq!(snapshot.profile.unwrap().account.areas(), ["Civil".to_owned()]);
    assert_eq!(decide(&controller.snapshot(), Route::Dashboard), GuardDecision::Render);
}

#[tokio::test]
async fn fetch_from_before_sign_out_is_discarded_after_sign_in_again() {
    let harness = signed_in_without_profile().await;
    let controller = &harness.controller;
    let release = harness.profiles.hold_next_get();

    futures::join!(
        async {
            controller.refresh_profile().await.unwrap();
        },
        async {
            controller.sign_out().await.unwrap();
            harness.profiles.docs.lock().unwrap().insert("u1".to_owned(), complete_profile());
            controller.apply_session_change(Some(session_for("u1", "a@b.com"))).await;
            release.send(()).unwrap();
        }
    );

    assert_eq!(controller.snapshot().phase(), Phase::SignedInComplete);
}

#[tokio::test]
async fn busy_stays_raised_until_last_operation_finishes() {
    let harness = signed_in_without_profile().await;
    let controller = &harness.controller;
    let release = harness.profiles.hold_next_get();

    let (refreshed, busy_after_save) = futures::join!(controller.refresh_profile(), async {
        controller.save_profile(client_draft(&["Civil"])).await.unwrap();
        let busy = controller.snapshot().busy;
        release.send(()).unwrap();
        busy
    });

    assert!(refreshed.is_ok());
    assert!(busy_after_save, "busy dropped while a refresh was still in flight");
    assert!(!controller.snapshot().busy);
}

#[tokio::test]
async fn dropped_operation_releases_busy() {
    let harness = signed_in_without_profile().await;
    let _release = harness.profiles.hold_next_get();
    {
        let refresh = harness.controller.refresh_profile();
        futures::pin_mut!(refresh);
        assert!(futures::poll!(refresh.as_mut()).is_pending());
        assert!(harness.controller.snapshot().busy);
    }
    assert!(!harness.controller.snapshot().busy);
}

// =========================================================================
// Sign-out
// =========================================================================

#[tokio::test]
async fn sign_out_clears_session_and_profile() {
    let harness = Harness::signed_out(FakeIdentity::default()).await;
    harness.profiles.docs.lock().unwrap().insert("u1".to_owned(), complete_profile());
    harness.controller.apply_session_change(Some(session_for("u1", "a@b.com"))).await;
    let (seen, _sub) = harness.record();

    harness.controller.sign_out().await.unwrap();

    let snapshot = harness.controller.snapshot();
    assert_eq!(snapshot.session, None);
    assert_eq!(snapshot.profile, None);
    assert_eq!(snapshot.phase(), Phase::SignedOut);
    assert_eq!(harness.cache.load(), None);
    assert_busy_bracketed(&seen);
}

#[tokio::test]
async fn sign_out_is_idempotent() {
    let harness = Harness::signed_out(FakeIdentity::default()).await;
    harness.controller.sign_out().await.unwrap();
    harness.controller.sign_out().await.unwrap();
    assert_eq!(harness.controller.snapshot().phase(), Phase::SignedOut);
}

#[tokio::test]
async fn sign_out_failure_still_clears_local_state() {
    let harness = Harness::signed_out(FakeIdentity::default()).await;
    harness.controller.apply_session_change(Some(session_for("u1", "a@b.com"))).await;
    *harness.identity.sign_out_error.lock().unwrap() =
        Some(BackendError::new("auth/network-request-failed", "offline"));

    let err = harness.controller.sign_out().await.unwrap_err();

    assert_eq!(err.fault().map(|f| f.code.clone()), Some(FaultCode::NetworkRequestFailed));
    let snapshot = harness.controller.snapshot();
    assert_eq!(snapshot.session, None);
    assert_eq!(snapshot.profile, None);
    assert!(snapshot.fault.is_some());
    assert!(!snapshot.busy);
}

// =========================================================================
// Faults and subscriptions
// =========================================================================

#[tokio::test]
async fn clear_fault_acknowledges_error() {
    let harness = Harness::signed_out(FakeIdentity::default()).await;
    let _ = harness.controller.login_with_credentials("x@b.com", "secret1").await;
    assert!(harness.controller.snapshot().fault.is_some());

    harness.controller.clear_fault();
    assert_eq!(harness.controller.snapshot().fault, None);
}

#[tokio::test]
async fn session_notification_clears_fault() {
    let harness = Harness::signed_out(FakeIdentity::default()).await;
    let _ = harness.controller.login_with_credentials("x@b.com", "secret1").await;

    harness.controller.apply_session_change(Some(session_for("u1", "a@b.com"))).await;
    assert_eq!(harness.controller.snapshot().fault, None);
}

#[tokio::test]
async fn dropped_subscription_stops_notifications() {
    let harness = Harness::new(FakeIdentity::default());
    let (seen, subscription) = harness.record();
    drop(subscription);

    harness.controller.apply_session_change(None).await;
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unchanged_state_is_not_republished() {
    let harness = Harness::signed_out(FakeIdentity::default()).await;
    let (seen, _sub) = harness.record();
    harness.controller.clear_fault();
    harness.controller.apply_session_change(None).await;
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn controller_works_without_cache() {
    let controller = SessionController::new(
        Arc::new(FakeIdentity::default()),
        Arc::new(FakeProfiles::default()),
        Arc::new(NoCache),
    );
    controller.prime_from_cache();
    assert_eq!(controller.snapshot(), SessionSnapshot::default());
}

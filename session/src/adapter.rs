//! Capability traits for the external identity and profile backends.
//!
//! SYSTEM CONTEXT
//! ==============
//! The controller is the only caller of these traits. Browser builds bind
//! them to the hosted identity/document SDK; tests bind them to in-memory
//! fakes.
//!
//! TRADE-OFFS
//! ==========
//! Adapter futures are `?Send` because browser promises are single-threaded.
//! The adapter handles themselves are `Send + Sync` so a controller holding
//! them can be shared through UI context.

use async_trait::async_trait;
use futures::stream::LocalBoxStream;

use crate::fault::BackendError;
use crate::types::{Profile, Session};

/// Standing stream of session-changed notifications.
///
/// `None` means "signed out". Dropping the stream releases the underlying
/// backend subscription.
pub type SessionFeed = LocalBoxStream<'static, Option<Session>>;

/// Identity provider: credential checks, session issuance, federated sign-in.
#[async_trait(?Send)]
pub trait IdentityBackend: Send + Sync {
    /// Run the third-party provider popup/redirect flow.
    async fn sign_in_with_federated_provider(&self) -> Result<Session, BackendError>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, BackendError>;

    async fn create_account_with_password(&self, email: &str, password: &str) -> Result<Session, BackendError>;

    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Open the session-changed subscription. The first item reports the
    /// session restored (or not) at startup.
    fn subscribe_to_session_changes(&self) -> SessionFeed;
}

/// Per-account profile document store.
#[async_trait(?Send)]
pub trait ProfileStore: Send + Sync {
    /// Fetch the profile for `uid`, `None` when no document exists.
    async fn get_profile(&self, uid: &str) -> Result<Option<Profile>, BackendError>;

    /// Write the profile for `uid`. With `merge`, fields not present in
    /// `profile` are kept on the stored document.
    async fn put_profile(&self, uid: &str, profile: &Profile, merge: bool) -> Result<(), BackendError>;
}

/// Best-effort local copy of the last known session, for first paint only.
///
/// Never authoritative: the controller reads it once before the backend
/// reports, and overwrites it on every authoritative change.
pub trait SessionCache: Send + Sync {
    fn load(&self) -> Option<Session>;

    /// Replace the cached session; `None` removes it.
    fn store(&self, session: Option<&Session>);
}

/// Cache that remembers nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCache;

impl SessionCache for NoCache {
    fn load(&self) -> Option<Session> {
        None
    }

    fn store(&self, _session: Option<&Session>) {}
}

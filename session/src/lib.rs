//! Authentication and profile session state for the Law Me client.
//!
//! This crate owns the session state machine that sits between the hosted
//! identity/document backend and the UI. It has no browser or framework
//! dependencies: the backend is reached through the traits in [`adapter`],
//! and the UI reads immutable [`SessionSnapshot`]s published by the
//! [`SessionController`].
//!
//! ARCHITECTURE
//! ============
//! - `types`: session, profile, and registration draft records.
//! - `fault`: backend errors, friendly fault mapping, controller errors.
//! - `adapter`: identity/profile/cache capability traits.
//! - `snapshot`: the published state plus its derived [`Phase`].
//! - `controller`: the only component that mutates state or calls adapters.
//! - `guard`: pure navigation decisions for each route surface.

pub mod adapter;
pub mod controller;
pub mod fault;
pub mod guard;
pub mod snapshot;
pub mod types;

pub use adapter::{IdentityBackend, NoCache, ProfileStore, SessionCache, SessionFeed};
pub use controller::{SessionController, Subscription};
pub use fault::{AuthFault, BackendError, FaultCode, SessionError, map_to_friendly_fault};
pub use guard::{GuardDecision, Route, decide};
pub use snapshot::{Phase, SessionSnapshot};
pub use types::{AccountDetails, AccountKind, Profile, ProfileDraft, Session};

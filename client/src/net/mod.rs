//! Networking for the browser client.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` talks to our own server over REST, `firebase` bridges the hosted
//! identity provider and profile document store through a small JS module,
//! and `types` defines the shared wire schema.

pub mod api;
pub mod firebase;
pub mod types;

//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! The session snapshot is the only shared state. It is owned by the
//! `session` crate's controller; this module bridges it into Leptos context.

pub mod auth;

//! Route-level page components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each page wraps its content in `RouteGuard` so navigation follows the
//! session snapshot, then calls controller operations through
//! `SessionHandle`.

pub mod dashboard;
pub mod login;
pub mod registration;

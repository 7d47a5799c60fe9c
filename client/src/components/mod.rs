//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render shared chrome around the pages and read the session
//! snapshot from Leptos context.

pub mod fault_banner;
pub mod loading_screen;
pub mod route_guard;

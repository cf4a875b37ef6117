//! Application stores.
//!
//! # Responsibility
//! - Orchestrate source calls into session and notes use-case APIs.
//! - Keep page-level callers decoupled from source details.

pub mod notes;
pub mod session;

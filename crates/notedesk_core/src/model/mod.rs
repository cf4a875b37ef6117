//! Domain models shared across sources, stores and guards.
//!
//! # Responsibility
//! - Define the canonical user and note records.
//! - Keep model types free of storage and runtime concerns.

pub mod note;
pub mod user;

//! Core library components.
//!
//! The synchronization and rotation protocol plus the collaborators it
//! drives: recipient directory, policy builder, encryption engines and the
//! remote version store.

pub mod api;
pub mod cipher;
pub mod config;
pub mod constants;
pub mod directory;
pub mod domain;
pub mod keys;
pub mod policy;
pub mod scratch;
pub mod store;
pub mod types;
pub mod workflow;

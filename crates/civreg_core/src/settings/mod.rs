//! UI preference blob persisted beside the record collections.
//!
//! # Invariants
//! - Settings live under their own key and are never read by the record
//!   store.
//! - An absent blob reads as defaults; a malformed blob is an error.

pub mod app_settings;

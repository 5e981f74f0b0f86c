//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store, export, certificate and settings calls into the
//!   use cases a front end invokes.
//! - Derive cross-collection feeds (dashboard activity, notifications).

pub mod activity;
pub mod registry_service;

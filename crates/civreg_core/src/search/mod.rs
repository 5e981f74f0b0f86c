//! Case-insensitive substring search over record collections.
//!
//! # Responsibility
//! - Normalize user queries once, then match them against each kind's
//!   fixed searchable fields.
//! - Provide the cross-kind profile lookup used by the global search box.

pub mod query;

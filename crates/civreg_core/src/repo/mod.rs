//! Record persistence over a key-value backend.
//!
//! # Responsibility
//! - Mediate every read and write of the birth and death collections.
//! - Translate storage and decoding failures into semantic store errors.
//!
//! # Invariants
//! - Write paths enforce `Record::validate()` before persisting.
//! - Each mutation reads the whole collection and rewrites it in full.

pub mod record_store;

//! Printable certificates for single records.
//!
//! Certificates take the record as stored; they derive nothing beyond
//! display formatting.

pub mod text;

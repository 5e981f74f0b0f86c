//! Spreadsheet export of record listings.
//!
//! # Responsibility
//! - Map each record kind onto its fixed column layout.
//! - Write CSV documents to any writer or to a dated file.
//!
//! # Invariants
//! - Export is a pure transform of the records it is handed; it never reads
//!   storage itself, so callers export exactly what they filtered.

pub mod csv_export;

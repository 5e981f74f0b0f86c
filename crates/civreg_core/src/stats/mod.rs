//! Read-only aggregation over record snapshots.
//!
//! Nothing here is persisted; every summary is recomputed from whatever the
//! caller just listed.

pub mod summary;

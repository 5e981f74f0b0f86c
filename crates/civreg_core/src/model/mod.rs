//! Closed record schema for birth and death registrations.
//!
//! # Responsibility
//! - Define the canonical record shapes persisted in each collection.
//! - Keep the stored JSON layout (camelCase keys, date strings) compatible
//!   with documents written by the browser front end.
//!
//! # Invariants
//! - Every record carries a `RecordId` and a `registrationDate` that the
//!   store assigns; callers only supply form fields.
//! - Write paths call `Record::validate()`; read paths never re-validate.

/// Copies every `Some` field of a patch onto its target.
macro_rules! overlay {
    ($target:expr, $patch:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = value;
            }
        )+
    };
}

pub mod birth;
pub mod death;
pub mod record;
pub mod wire;

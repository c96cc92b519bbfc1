//! Caller-number privacy.
//!
//! A raw caller number is turned into a [`PhoneNumberData`] record: a keyed
//! join key for grouping calls by caller and a masked string for display.
//! Only that record is ever persisted.

pub mod key;
pub mod processor;

pub use key::PhoneHashKey;
pub use processor::{
    DisplayForm, PhoneNumberData, PhoneNumberProcessor, ANONYMOUS_DISPLAY, ANONYMOUS_JOIN_KEY,
    UNKNOWN_DISPLAY,
};

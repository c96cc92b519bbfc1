pub mod domain;
pub mod dto;
pub mod error;
pub mod privacy;
pub mod signature;
pub mod time;
pub mod twiml;

pub use domain::*;
pub use dto::*;
pub use error::CoreError;
pub use privacy::{DisplayForm, PhoneHashKey, PhoneNumberData, PhoneNumberProcessor};
pub use signature::{expected_signature, verify_signature};

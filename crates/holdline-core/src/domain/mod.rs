pub mod call;
pub mod ids;
pub mod phone;

pub use call::{parse_duration_seconds, Call, CallStatus, CallerLocation};
pub use ids::CallSid;
pub use phone::{clean_digits, trailing_digits};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("phone hash secret is empty")]
    EmptySecret,
    #[error("phone hash secret rejected by hmac")]
    InvalidSecret,
    #[error("invalid call sid: {0:?}")]
    InvalidCallSid(String),
    #[error("unknown call status: {0}")]
    InvalidCallStatus(String),
    #[error("invalid call duration: {0}")]
    InvalidDuration(String),
}

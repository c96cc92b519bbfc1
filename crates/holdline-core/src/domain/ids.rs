use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MAX_CALL_SID_LEN: usize = 64;

/// Provider-assigned call identifier, e.g. `CA` followed by 32 hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CallSid(String);

impl CallSid {
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        let trimmed = value.trim();
        if trimmed.is_empty()
            || trimmed.len() > MAX_CALL_SID_LEN
            || !trimmed.chars().all(|ch| ch.is_ascii_alphanumeric())
        {
            return Err(CoreError::InvalidCallSid(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallSid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CallSid {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CallSid {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CallSid> for String {
    fn from(value: CallSid) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::CallSid;

    #[test]
    fn call_sid_trims_and_accepts_alphanumeric() {
        let sid = CallSid::parse("  CA1234567890abcdef1234567890abcdef ").unwrap();
        assert_eq!(sid.as_str(), "CA1234567890abcdef1234567890abcdef");
    }

    #[test]
    fn call_sid_rejects_empty_and_symbols() {
        assert!(CallSid::parse("   ").is_err());
        assert!(CallSid::parse("CA12;DROP TABLE").is_err());
        assert!(CallSid::parse(&"A".repeat(65)).is_err());
    }
}

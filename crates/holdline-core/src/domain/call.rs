use crate::domain::ids::CallSid;
use crate::error::CoreError;
use crate::privacy::PhoneNumberData;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle states reported by the telephony provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallStatus {
    Queued,
    Ringing,
    InProgress,
    Answered,
    Completed,
    Busy,
    Failed,
    NoAnswer,
    Canceled,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Queued => "queued",
            CallStatus::Ringing => "ringing",
            CallStatus::InProgress => "in-progress",
            CallStatus::Answered => "answered",
            CallStatus::Completed => "completed",
            CallStatus::Busy => "busy",
            CallStatus::Failed => "failed",
            CallStatus::NoAnswer => "no-answer",
            CallStatus::Canceled => "canceled",
        }
    }

    /// The caller is still on the line.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            CallStatus::Ringing | CallStatus::InProgress | CallStatus::Answered
        )
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "queued" => Ok(CallStatus::Queued),
            "ringing" => Ok(CallStatus::Ringing),
            "in-progress" => Ok(CallStatus::InProgress),
            "answered" => Ok(CallStatus::Answered),
            "completed" => Ok(CallStatus::Completed),
            "busy" => Ok(CallStatus::Busy),
            "failed" => Ok(CallStatus::Failed),
            "no-answer" => Ok(CallStatus::NoAnswer),
            "canceled" => Ok(CallStatus::Canceled),
            _ => Err(CoreError::InvalidCallStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerLocation {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub call_sid: CallSid,
    pub caller: PhoneNumberData,
    pub to_number: Option<String>,
    pub location: CallerLocation,
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub duration_seconds: Option<i64>,
    pub status: CallStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Parses the provider's `CallDuration` field (whole seconds).
pub fn parse_duration_seconds(raw: &str) -> Result<i64, CoreError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| CoreError::InvalidDuration(raw.to_string()))?;
    if value < 0 {
        return Err(CoreError::InvalidDuration(raw.to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{parse_duration_seconds, CallStatus};
    use std::str::FromStr;

    #[test]
    fn status_parses_provider_values() {
        assert_eq!(
            CallStatus::from_str("in-progress").unwrap(),
            CallStatus::InProgress
        );
        assert_eq!(
            CallStatus::from_str(" Completed ").unwrap(),
            CallStatus::Completed
        );
        assert!(CallStatus::from_str("on-hold").is_err());
    }

    #[test]
    fn status_round_trips_through_as_str() {
        for status in [
            CallStatus::Queued,
            CallStatus::NoAnswer,
            CallStatus::Canceled,
            CallStatus::Answered,
        ] {
            assert_eq!(CallStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn active_statuses() {
        assert!(CallStatus::Answered.is_active());
        assert!(CallStatus::Ringing.is_active());
        assert!(!CallStatus::Completed.is_active());
        assert!(!CallStatus::Busy.is_active());
    }

    #[test]
    fn duration_rejects_garbage() {
        assert_eq!(parse_duration_seconds("42").unwrap(), 42);
        assert!(parse_duration_seconds("-1").is_err());
        assert!(parse_duration_seconds("forever").is_err());
    }
}

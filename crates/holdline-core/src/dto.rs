use crate::domain::CallStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongestHoldDto {
    pub from_number_display: String,
    pub from_area_code: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub duration_seconds: i64,
    pub start_time: i64,
}

/// Totals for one caller, grouped by join key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerTotalsDto {
    pub from_number_display: String,
    pub from_area_code: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub total_calls: i64,
    pub total_duration_seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionTotalsDto {
    pub state: Option<String>,
    pub country: Option<String>,
    pub total_calls: i64,
    pub total_duration_seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSummaryDto {
    pub from_number_display: String,
    pub from_area_code: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub status: CallStatus,
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub duration_seconds: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveCallDto {
    pub from_number_display: String,
    pub from_area_code: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub start_time: i64,
    pub current_duration_seconds: i64,
}

/// Payload behind the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsDto {
    pub longest_hold: Option<LongestHoldDto>,
    pub most_calls: Option<CallerTotalsDto>,
    pub total_time: Option<CallerTotalsDto>,
    pub geo_leader: Option<RegionTotalsDto>,
    pub recent_calls: Vec<CallSummaryDto>,
    pub active_calls: Vec<ActiveCallDto>,
}

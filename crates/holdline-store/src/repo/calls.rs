use crate::error::{Result, StoreError};
use holdline_core::domain::{Call, CallSid, CallStatus, CallerLocation};
use holdline_core::PhoneNumberData;
use rusqlite::{params, Connection};
use std::str::FromStr;

const CALL_COLUMNS: &str = "call_sid, from_number_hash, from_number_display, from_area_code,
     to_number, city, state, country, start_time, end_time, duration_seconds, status,
     created_at, updated_at";

/// A call as first seen by the voice webhook. Carries only the processed
/// caller record, never the raw number.
#[derive(Debug, Clone)]
pub struct CallStart {
    pub call_sid: CallSid,
    pub caller: PhoneNumberData,
    pub to_number: Option<String>,
    pub location: CallerLocation,
}

#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub call_sid: CallSid,
    pub status: CallStatus,
    pub duration_seconds: Option<i64>,
    pub ended_at: Option<i64>,
}

pub struct CallsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> CallsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Inserts the call as `answered`. A repeated webhook for the same sid only
    /// resets the status; the caller columns are written once.
    pub fn record_start(&self, now_utc: i64, input: CallStart) -> Result<Call> {
        let sql = format!(
            "INSERT INTO calls (
                call_sid, from_number_hash, from_number_display, from_area_code,
                to_number, city, state, country, start_time, status, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?9, ?9)
             ON CONFLICT(call_sid) DO UPDATE SET
                status = excluded.status,
                updated_at = excluded.updated_at
             RETURNING {CALL_COLUMNS};"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![
            input.call_sid.as_str(),
            input.caller.join_key,
            input.caller.display_format,
            input.caller.area_code,
            input.to_number,
            input.location.city,
            input.location.state,
            input.location.country,
            now_utc,
            CallStatus::Answered.as_str(),
        ])?;
        match rows.next()? {
            Some(row) => call_from_row(row),
            None => Err(rusqlite::Error::QueryReturnedNoRows.into()),
        }
    }

    /// Returns `false` when no call with that sid exists.
    pub fn apply_status(&self, now_utc: i64, update: StatusUpdate) -> Result<bool> {
        let updated = match (update.status, update.duration_seconds) {
            (CallStatus::Completed, Some(duration)) => self.conn.execute(
                "UPDATE calls
                 SET end_time = ?2, duration_seconds = ?3, status = ?4, updated_at = ?5
                 WHERE call_sid = ?1;",
                params![
                    update.call_sid.as_str(),
                    update.ended_at.unwrap_or(now_utc),
                    duration,
                    update.status.as_str(),
                    now_utc,
                ],
            )?,
            _ => self.conn.execute(
                "UPDATE calls SET status = ?2, updated_at = ?3 WHERE call_sid = ?1;",
                params![update.call_sid.as_str(), update.status.as_str(), now_utc],
            )?,
        };
        Ok(updated > 0)
    }

    pub fn get(&self, call_sid: &CallSid) -> Result<Option<Call>> {
        let sql = format!("SELECT {CALL_COLUMNS} FROM calls WHERE call_sid = ?1;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([call_sid.as_str()])?;
        match rows.next()? {
            Some(row) => Ok(Some(call_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM calls;", [], |row| row.get(0))?;
        Ok(count)
    }
}

pub(crate) fn parse_status(raw: &str) -> Result<CallStatus> {
    CallStatus::from_str(raw).map_err(|_| StoreError::InvalidStoredValue {
        column: "status",
        value: raw.to_string(),
    })
}

fn call_from_row(row: &rusqlite::Row<'_>) -> Result<Call> {
    let sid_raw: String = row.get(0)?;
    let call_sid = CallSid::parse(&sid_raw).map_err(|_| StoreError::InvalidStoredValue {
        column: "call_sid",
        value: sid_raw.clone(),
    })?;
    let status_raw: String = row.get(11)?;

    Ok(Call {
        call_sid,
        caller: PhoneNumberData {
            join_key: row.get(1)?,
            display_format: row.get(2)?,
            area_code: row.get(3)?,
        },
        to_number: row.get(4)?,
        location: CallerLocation {
            city: row.get(5)?,
            state: row.get(6)?,
            country: row.get(7)?,
        },
        start_time: row.get(8)?,
        end_time: row.get(9)?,
        duration_seconds: row.get(10)?,
        status: parse_status(&status_raw)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

use crate::error::Result;
use crate::repo::calls::parse_status;
use holdline_core::dto::{
    ActiveCallDto, AnalyticsDto, CallSummaryDto, CallerTotalsDto, LongestHoldDto, RegionTotalsDto,
};
use holdline_core::domain::CallStatus;
use holdline_core::privacy::ANONYMOUS_JOIN_KEY;
use rusqlite::{params, Connection, OptionalExtension};

/// Aggregate queries behind the dashboard. Callers are grouped by join key;
/// anonymous calls never compete for a per-caller title.
pub struct AnalyticsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> AnalyticsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// All dashboard figures, read inside one transaction.
    pub fn snapshot(
        &self,
        now_utc: i64,
        recent_limit: i64,
        active_window_secs: i64,
    ) -> Result<AnalyticsDto> {
        let tx = self.conn.unchecked_transaction()?;
        let repo = AnalyticsRepo::new(&tx);
        let dto = AnalyticsDto {
            longest_hold: repo.longest_single_hold()?,
            most_calls: repo.most_calls()?,
            total_time: repo.most_time_overall()?,
            geo_leader: repo.geographic_leader()?,
            recent_calls: repo.recent_calls(recent_limit)?,
            active_calls: repo.active_calls(now_utc, active_window_secs)?,
        };
        tx.commit()?;
        Ok(dto)
    }

    pub fn longest_single_hold(&self) -> Result<Option<LongestHoldDto>> {
        let dto = self
            .conn
            .query_row(
                "SELECT from_number_display, from_area_code, city, state, country,
                        duration_seconds, start_time
                 FROM calls
                 WHERE status = ?1 AND duration_seconds IS NOT NULL
                 ORDER BY duration_seconds DESC, start_time ASC
                 LIMIT 1;",
                [CallStatus::Completed.as_str()],
                |row| {
                    Ok(LongestHoldDto {
                        from_number_display: row.get(0)?,
                        from_area_code: row.get(1)?,
                        city: row.get(2)?,
                        state: row.get(3)?,
                        country: row.get(4)?,
                        duration_seconds: row.get(5)?,
                        start_time: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(dto)
    }

    pub fn most_calls(&self) -> Result<Option<CallerTotalsDto>> {
        self.top_caller("total_calls DESC, total_duration DESC, last_call DESC", false)
    }

    pub fn most_time_overall(&self) -> Result<Option<CallerTotalsDto>> {
        self.top_caller("total_duration DESC, total_calls DESC, last_call DESC", true)
    }

    // SQLite fills bare columns from the row holding MAX(start_time), so the
    // location shown is the caller's most recent one.
    fn top_caller(&self, order_by: &str, require_duration: bool) -> Result<Option<CallerTotalsDto>> {
        let having = if require_duration {
            "HAVING total_duration > 0"
        } else {
            ""
        };
        let sql = format!(
            "SELECT from_number_display, from_area_code, city, state, country,
                    COUNT(*) AS total_calls,
                    COALESCE(SUM(duration_seconds), 0) AS total_duration,
                    MAX(start_time) AS last_call
             FROM calls
             WHERE from_number_hash <> ?1
             GROUP BY from_number_hash
             {having}
             ORDER BY {order_by}
             LIMIT 1;"
        );
        let dto = self
            .conn
            .query_row(&sql, [ANONYMOUS_JOIN_KEY], |row| {
                Ok(CallerTotalsDto {
                    from_number_display: row.get(0)?,
                    from_area_code: row.get(1)?,
                    city: row.get(2)?,
                    state: row.get(3)?,
                    country: row.get(4)?,
                    total_calls: row.get(5)?,
                    total_duration_seconds: row.get(6)?,
                })
            })
            .optional()?;
        Ok(dto)
    }

    pub fn geographic_leader(&self) -> Result<Option<RegionTotalsDto>> {
        let dto = self
            .conn
            .query_row(
                "SELECT state, country,
                        COUNT(*) AS total_calls,
                        COALESCE(SUM(duration_seconds), 0) AS total_duration
                 FROM calls
                 WHERE state IS NOT NULL OR country IS NOT NULL
                 GROUP BY state, country
                 ORDER BY total_calls DESC, total_duration DESC
                 LIMIT 1;",
                [],
                |row| {
                    Ok(RegionTotalsDto {
                        state: row.get(0)?,
                        country: row.get(1)?,
                        total_calls: row.get(2)?,
                        total_duration_seconds: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(dto)
    }

    pub fn recent_calls(&self, limit: i64) -> Result<Vec<CallSummaryDto>> {
        let mut stmt = self.conn.prepare(
            "SELECT from_number_display, from_area_code, city, state, country,
                    status, start_time, end_time, duration_seconds
             FROM calls
             WHERE status = ?1
             ORDER BY start_time DESC, call_sid ASC
             LIMIT ?2;",
        )?;
        let mut rows = stmt.query(params![CallStatus::Completed.as_str(), limit])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let status_raw: String = row.get(5)?;
            items.push(CallSummaryDto {
                from_number_display: row.get(0)?,
                from_area_code: row.get(1)?,
                city: row.get(2)?,
                state: row.get(3)?,
                country: row.get(4)?,
                status: parse_status(&status_raw)?,
                start_time: row.get(6)?,
                end_time: row.get(7)?,
                duration_seconds: row.get(8)?,
            });
        }
        Ok(items)
    }

    /// Calls still on the line that started within the last `window_secs`.
    /// Older rows stuck in an active status (missed status callbacks) are skipped.
    pub fn active_calls(&self, now_utc: i64, window_secs: i64) -> Result<Vec<ActiveCallDto>> {
        let mut stmt = self.conn.prepare(
            "SELECT from_number_display, from_area_code, city, state, country, start_time
             FROM calls
             WHERE status IN (?1, ?2, ?3) AND start_time >= ?4
             ORDER BY start_time ASC, call_sid ASC;",
        )?;
        let mut rows = stmt.query(params![
            CallStatus::Ringing.as_str(),
            CallStatus::InProgress.as_str(),
            CallStatus::Answered.as_str(),
            now_utc - window_secs,
        ])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let start_time: i64 = row.get(5)?;
            items.push(ActiveCallDto {
                from_number_display: row.get(0)?,
                from_area_code: row.get(1)?,
                city: row.get(2)?,
                state: row.get(3)?,
                country: row.get(4)?,
                start_time,
                current_duration_seconds: (now_utc - start_time).max(0),
            });
        }
        Ok(items)
    }
}

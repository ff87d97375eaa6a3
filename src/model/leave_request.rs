use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Maximum length accepted for the free-text reason field.
pub const MAX_REASON_LEN: usize = 128;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    /// Rejected and Cancelled requests admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LeaveStatus::Rejected | LeaveStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    #[serde(rename = "leaveRequestID")]
    #[schema(example = 1)]
    pub id: u64,
    #[serde(rename = "userID")]
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Annual Leave")]
    pub leave_type: String,
    #[schema(example = "Pending")]
    pub status: LeaveStatus,
    #[schema(example = "Family holiday")]
    pub reason: String,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    pub fn day_count(&self) -> i64 {
        day_count(self.start_date, self.end_date)
    }
}

/// Insert payload; a new request always starts out Pending.
#[derive(Debug, Clone)]
pub struct NewLeaveRequest {
    pub employee_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_type: String,
    pub reason: String,
}

/// Inclusive number of calendar days between two dates. Both the start and
/// the end day count, so a single-day leave has length 1.
pub fn day_count(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Two closed ranges [s1, e1] and [s2, e2] overlap iff s1 <= e2 and s2 <= e1.
pub fn ranges_overlap(s1: NaiveDate, e1: NaiveDate, s2: NaiveDate, e2: NaiveDate) -> bool {
    s1 <= e2 && s2 <= e1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn day_count_is_inclusive() {
        assert_eq!(day_count(date("2024-01-01"), date("2024-01-01")), 1);
        assert_eq!(day_count(date("2024-01-01"), date("2024-01-05")), 5);
        assert_eq!(day_count(date("2024-01-31"), date("2024-02-01")), 2);
    }

    #[test]
    fn overlap_includes_shared_boundary_days() {
        let (s1, e1) = (date("2024-01-01"), date("2024-01-05"));
        assert!(ranges_overlap(s1, e1, date("2024-01-05"), date("2024-01-10")));
        assert!(ranges_overlap(s1, e1, date("2023-12-20"), date("2024-01-01")));
        assert!(ranges_overlap(s1, e1, date("2024-01-02"), date("2024-01-03")));
        // adjacent, not overlapping
        assert!(!ranges_overlap(s1, e1, date("2024-01-06"), date("2024-01-10")));
        assert!(!ranges_overlap(s1, e1, date("2023-12-20"), date("2023-12-31")));
    }

    #[test]
    fn terminal_statuses() {
        assert!(!LeaveStatus::Pending.is_terminal());
        assert!(!LeaveStatus::Approved.is_terminal());
        assert!(LeaveStatus::Rejected.is_terminal());
        assert!(LeaveStatus::Cancelled.is_terminal());
    }

    #[test]
    fn status_round_trips_through_storage_text() {
        use std::str::FromStr;
        for status in [
            LeaveStatus::Pending,
            LeaveStatus::Approved,
            LeaveStatus::Rejected,
            LeaveStatus::Cancelled,
        ] {
            assert_eq!(LeaveStatus::from_str(&status.to_string()).unwrap(), status);
        }
    }
}

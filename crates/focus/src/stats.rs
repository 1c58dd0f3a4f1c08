//! Focus statistics
//!
//! Snapshot and summary records handed to reporters, plus the score rule:
//! - share of elapsed time not spent distracted, as a percentage
//! - one decimal place
//! - 100 when no time has elapsed yet

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Live figures for the active session, copied out under the store lock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    /// Closed intervals plus whatever is still open
    pub distracted_total_ms: u64,
    pub ongoing_distraction_ms: u64,
    /// Elapsed minus distracted; negative only under clock skew
    pub focused_ms: i64,
    #[serde(rename = "currentFocusScore")]
    pub focus_score: f64,
    pub distraction_count: u64,
    pub is_distracted: bool,
    pub current_activity: String,
    pub current_severity: f64,
}

/// Final (or last known) totals returned by `stop`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// `None` if no session was ever started
    pub session_id: Option<String>,
    pub distracted_total_ms: u64,
    pub interval_count: u64,
}

impl SessionSummary {
    /// Average closed interval length in milliseconds
    pub fn average_interval_ms(&self) -> u64 {
        if self.interval_count == 0 {
            0
        } else {
            self.distracted_total_ms / self.interval_count
        }
    }
}

/// Percentage of `elapsed_ms` not spent distracted, rounded to one decimal
pub fn focus_score(distracted_ms: u64, elapsed_ms: u64) -> f64 {
    if elapsed_ms == 0 {
        return 100.0;
    }

    let score = (1.0 - distracted_ms as f64 / elapsed_ms as f64) * 100.0;
    let rounded = (score * 10.0).round() / 10.0;
    rounded.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_zero_elapsed_is_perfect() {
        assert_eq!(focus_score(0, 0), 100.0);
        assert_eq!(focus_score(500, 0), 100.0);
    }

    #[test]
    fn test_score_calculation() {
        assert_eq!(focus_score(0, 10_000), 100.0);
        assert_eq!(focus_score(2_500, 10_000), 75.0);
        assert_eq!(focus_score(10_000, 10_000), 0.0);
    }

    #[test]
    fn test_score_rounds_to_one_decimal() {
        // 1 - 1/3 = 66.666...
        assert_eq!(focus_score(1_000, 3_000), 66.7);
        // 1 - 1/7 = 85.714...
        assert_eq!(focus_score(1_000, 7_000), 85.7);
    }

    #[test]
    fn test_score_never_negative() {
        // Distraction backdated before the session start
        assert_eq!(focus_score(15_000, 10_000), 0.0);
    }

    #[test]
    fn test_average_interval() {
        let summary = SessionSummary {
            session_id: Some("session_1".to_string()),
            distracted_total_ms: 900,
            interval_count: 2,
        };
        assert_eq!(summary.average_interval_ms(), 450);

        let empty = SessionSummary {
            session_id: None,
            distracted_total_ms: 0,
            interval_count: 0,
        };
        assert_eq!(empty.average_interval_ms(), 0);
    }

    #[test]
    fn test_snapshot_wire_keys() {
        let snapshot = StatsSnapshot {
            session_id: "session_1".to_string(),
            user_id: None,
            username: Some("ada".to_string()),
            started_at: Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0).unwrap(),
            elapsed_ms: 4000,
            distracted_total_ms: 1000,
            ongoing_distraction_ms: 0,
            focused_ms: 3000,
            focus_score: 75.0,
            distraction_count: 1,
            is_distracted: false,
            current_activity: "unknown".to_string(),
            current_severity: 0.0,
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["sessionId"], "session_1");
        assert_eq!(json["distractedTotalMs"], 1000);
        assert_eq!(json["currentFocusScore"], 75.0);
        assert_eq!(json["isDistracted"], false);
        assert_eq!(json["username"], "ada");
        assert!(json.get("userId").is_none());
    }

    #[test]
    fn test_summary_wire_keys() {
        let summary = SessionSummary {
            session_id: Some("session_1".to_string()),
            distracted_total_ms: 700,
            interval_count: 3,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["intervalCount"], 3);
        assert_eq!(json["distractedTotalMs"], 700);
    }
}

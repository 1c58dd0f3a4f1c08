//! Session state and distraction intervals
//!
//! `SessionState` is the plain record the store keeps behind its lock. All
//! arithmetic lives here and takes the current instant as an argument, so
//! the rules can be exercised without threads or clocks.

use chrono::{DateTime, Utc};

use crate::stats::{focus_score, SessionSummary, StatsSnapshot};

/// Activity label reported when nothing is open
pub const NEUTRAL_ACTIVITY: &str = "unknown";

/// Severity reported when nothing is open
pub const NEUTRAL_SEVERITY: f64 = 0.0;

/// Bounds for interval severity
pub const SEVERITY_RANGE: (f64, f64) = (0.0, 1.0);

/// An open distraction interval
#[derive(Debug, Clone, PartialEq)]
pub struct DistractionInterval {
    pub started_at: DateTime<Utc>,
    pub activity: String,
    pub severity: f64,
}

impl DistractionInterval {
    pub fn new(started_at: DateTime<Utc>, activity: &str, severity: f64) -> Self {
        let activity = activity.trim();
        Self {
            started_at,
            activity: if activity.is_empty() {
                NEUTRAL_ACTIVITY.to_string()
            } else {
                activity.to_string()
            },
            severity: clamp_severity(severity),
        }
    }

    /// Milliseconds between the interval start and `at`, never negative
    pub fn duration_until(&self, at: DateTime<Utc>) -> u64 {
        millis_between(self.started_at, at)
    }
}

/// Everything the store knows about the current (or last) session
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub session_id: Option<String>,
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    /// Sum of closed interval durations
    pub distracted_total_ms: u64,
    /// Number of closed intervals
    pub interval_count: u64,
    pub current_interval: Option<DistractionInterval>,
    /// Millisecond stamp of the last issued id; survives restarts so ids stay unique
    last_issued_ms: Option<i64>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset everything and begin a new session at `now`, returning its id
    ///
    /// Anything left open in the previous session is dropped, not folded in.
    pub fn begin(
        &mut self,
        now: DateTime<Utc>,
        user_id: Option<String>,
        username: Option<String>,
    ) -> String {
        let stamp = match self.last_issued_ms {
            Some(last) if now.timestamp_millis() <= last => last + 1,
            _ => now.timestamp_millis(),
        };
        let session_id = format!("session_{}", stamp);

        *self = Self {
            session_id: Some(session_id.clone()),
            user_id,
            username,
            started_at: Some(now),
            is_active: true,
            distracted_total_ms: 0,
            interval_count: 0,
            current_interval: None,
            last_issued_ms: Some(stamp),
        };

        session_id
    }

    pub fn is_distracted(&self) -> bool {
        self.current_interval.is_some()
    }

    /// Open an interval; returns false when inactive or one is already open
    pub fn open_interval(&mut self, started_at: DateTime<Utc>, activity: &str, severity: f64) -> bool {
        if !self.is_active || self.current_interval.is_some() {
            return false;
        }
        self.current_interval = Some(DistractionInterval::new(started_at, activity, severity));
        true
    }

    /// Close the open interval at `ended_at`, folding it into the totals
    ///
    /// Returns the interval's duration, or `None` when nothing was closed.
    pub fn close_interval(&mut self, ended_at: DateTime<Utc>) -> Option<u64> {
        if !self.is_active {
            return None;
        }
        let interval = self.current_interval.take()?;
        let duration_ms = interval.duration_until(ended_at);

        self.distracted_total_ms = self.distracted_total_ms.saturating_add(duration_ms);
        self.interval_count += 1;
        Some(duration_ms)
    }

    /// Point-in-time statistics at `now`; `None` unless a session is active
    pub fn snapshot(&self, now: DateTime<Utc>) -> Option<StatsSnapshot> {
        if !self.is_active {
            return None;
        }
        let started_at = self.started_at?;

        let elapsed_ms = millis_between(started_at, now);
        let ongoing_distraction_ms = self
            .current_interval
            .as_ref()
            .map(|interval| interval.duration_until(now))
            .unwrap_or(0);
        let distracted_total_ms = self.distracted_total_ms.saturating_add(ongoing_distraction_ms);
        let focused_ms = elapsed_ms as i64 - distracted_total_ms as i64;

        let (current_activity, current_severity) = match &self.current_interval {
            Some(interval) => (interval.activity.clone(), interval.severity),
            None => (NEUTRAL_ACTIVITY.to_string(), NEUTRAL_SEVERITY),
        };

        Some(StatsSnapshot {
            session_id: self.session_id.clone().unwrap_or_default(),
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            started_at,
            elapsed_ms,
            distracted_total_ms,
            ongoing_distraction_ms,
            focused_ms,
            focus_score: focus_score(distracted_total_ms, elapsed_ms),
            distraction_count: self.interval_count,
            is_distracted: self.is_distracted(),
            current_activity,
            current_severity,
        })
    }

    /// Close whatever is open at `now`, deactivate, and summarize
    ///
    /// Safe to call when already inactive: the last known totals come back.
    pub fn finish(&mut self, now: DateTime<Utc>) -> SessionSummary {
        self.close_interval(now);
        self.is_active = false;
        self.summary()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.session_id.clone(),
            distracted_total_ms: self.distracted_total_ms,
            interval_count: self.interval_count,
        }
    }
}

fn clamp_severity(severity: f64) -> f64 {
    if severity.is_nan() {
        return NEUTRAL_SEVERITY;
    }
    severity.clamp(SEVERITY_RANGE.0, SEVERITY_RANGE.1)
}

/// Whole milliseconds from `from` to `to`, zero if `to` is earlier
fn millis_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    to.signed_duration_since(from).num_milliseconds().max(0) as u64
}

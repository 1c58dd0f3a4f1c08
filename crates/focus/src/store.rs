//! Session store
//!
//! One active session at a time, guarded by a single mutex. Every call takes
//! the lock for its whole read-or-mutate step, reads the clock once, and
//! returns owned data.
//!
//! Misuse is never an error: marking while inactive, a second distraction
//! start, or a focus without an open interval are all silent no-ops. Callers
//! that care inspect `stats()` instead.

use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::session::SessionState;
use crate::stats::{SessionSummary, StatsSnapshot};

/// Thread-safe focus session store
pub struct SessionStore<C: Clock = SystemClock> {
    clock: C,
    state: Mutex<SessionState>,
}

impl SessionStore<SystemClock> {
    /// Create a store reading the wall clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for SessionStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> SessionStore<C> {
    /// Create a store reading time from `clock`
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            state: Mutex::new(SessionState::new()),
        }
    }

    // No critical section can leave the record half-written, so a panic
    // elsewhere while holding the lock does not make the data unusable.
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Begin a new session, replacing whatever was there
    pub fn start(&self, user_id: Option<String>, username: Option<String>) -> String {
        let mut state = self.lock();
        let now = self.clock.now();

        if state.is_active {
            warn!(
                previous = state.session_id.as_deref().unwrap_or_default(),
                discarded_open_interval = state.is_distracted(),
                "Starting over an active session"
            );
        }

        let session_id = state.begin(now, user_id, username);
        info!(session_id = %session_id, "Session started");
        session_id
    }

    /// Record the start of a distraction
    ///
    /// Ignored when no session is active or the user is already distracted;
    /// the first call after a focused period sets activity and severity.
    pub fn mark_distracted(
        &self,
        session_id: &str,
        start_at: Option<DateTime<Utc>>,
        activity: &str,
        severity: f64,
    ) {
        let mut state = self.lock();
        let started_at = start_at.unwrap_or_else(|| self.clock.now());

        if !state.is_active {
            debug!(session_id, "Ignoring distraction: no active session");
            return;
        }
        check_session_id(&state, session_id);

        if state.open_interval(started_at, activity, severity) {
            debug!(activity, severity, "Distraction interval opened");
        } else {
            debug!(activity, "Ignoring distraction: interval already open");
        }
    }

    /// Record the end of a distraction
    pub fn mark_focused(&self, session_id: &str, end_at: Option<DateTime<Utc>>) {
        let mut state = self.lock();
        let ended_at = end_at.unwrap_or_else(|| self.clock.now());

        if !state.is_active {
            debug!(session_id, "Ignoring focus: no active session");
            return;
        }
        check_session_id(&state, session_id);

        match state.close_interval(ended_at) {
            Some(duration_ms) => debug!(
                duration_ms,
                interval_count = state.interval_count,
                "Distraction interval closed"
            ),
            None => debug!("Ignoring focus: no open interval"),
        }
    }

    /// Current figures, or `None` when no session is active
    pub fn stats(&self) -> Option<StatsSnapshot> {
        let state = self.lock();
        state.snapshot(self.clock.now())
    }

    /// End the session, folding any open interval into the totals
    ///
    /// When nothing is active this returns the last known totals unchanged.
    pub fn stop(&self, session_id: &str) -> SessionSummary {
        let mut state = self.lock();
        let now = self.clock.now();

        if !state.is_active {
            debug!(session_id, "Stop without an active session; returning last totals");
            return state.summary();
        }
        check_session_id(&state, session_id);

        let summary = state.finish(now);
        info!(
            session_id = summary.session_id.as_deref().unwrap_or_default(),
            distracted_total_ms = summary.distracted_total_ms,
            interval_count = summary.interval_count,
            "Session stopped"
        );
        summary
    }

    pub fn is_active(&self) -> bool {
        self.lock().is_active
    }

    pub fn active_session_id(&self) -> Option<String> {
        let state = self.lock();
        if state.is_active {
            state.session_id.clone()
        } else {
            None
        }
    }

    /// Shut the store down, stopping an active session first
    pub fn close(self) -> Option<SessionSummary> {
        let mut state = self.state.into_inner().unwrap_or_else(PoisonError::into_inner);
        if !state.is_active {
            return None;
        }

        let summary = state.finish(self.clock.now());
        info!(
            session_id = summary.session_id.as_deref().unwrap_or_default(),
            "Session stopped on close"
        );
        Some(summary)
    }
}

/// Ids are not used for routing; a mismatch is only worth a warning
fn check_session_id(state: &SessionState, session_id: &str) {
    if let Some(active) = state.session_id.as_deref() {
        if !session_id.is_empty() && session_id != active {
            warn!(
                given = session_id,
                active, "Session id does not match the active session; applying to active session"
            );
        }
    }
}

//! Detection event stream
//!
//! The detection process speaks JSON lines, one event per line:
//!
//! ```text
//! {"event":"start","userId":"u1","username":"ada","at":"2026-01-01T09:00:00Z"}
//! {"event":"distracted","activity":"phone_distraction","severity":0.8}
//! {"event":"focused"}
//! {"event":"stats"}
//! {"event":"stop"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use thiserror::Error;

/// Event stream errors
#[derive(Error, Debug)]
pub enum EventError {
    #[error("line {line}: invalid event: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One state change reported by the detection process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum DetectionEvent {
    #[serde(rename_all = "camelCase")]
    Start {
        #[serde(default)]
        user_id: Option<String>,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        at: Option<DateTime<Utc>>,
    },
    #[serde(rename_all = "camelCase")]
    Distracted {
        #[serde(default)]
        session_id: Option<String>,
        #[serde(default)]
        activity: Option<String>,
        #[serde(default)]
        severity: Option<f64>,
        #[serde(default)]
        at: Option<DateTime<Utc>>,
    },
    #[serde(rename_all = "camelCase")]
    Focused {
        #[serde(default)]
        session_id: Option<String>,
        #[serde(default)]
        at: Option<DateTime<Utc>>,
    },
    Stats {
        #[serde(default)]
        at: Option<DateTime<Utc>>,
    },
    #[serde(rename_all = "camelCase")]
    Stop {
        #[serde(default)]
        session_id: Option<String>,
        #[serde(default)]
        at: Option<DateTime<Utc>>,
    },
}

impl DetectionEvent {
    /// When the event happened, if the sender said
    pub fn at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Start { at, .. }
            | Self::Distracted { at, .. }
            | Self::Focused { at, .. }
            | Self::Stats { at }
            | Self::Stop { at, .. } => *at,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Distracted { .. } => "distracted",
            Self::Focused { .. } => "focused",
            Self::Stats { .. } => "stats",
            Self::Stop { .. } => "stop",
        }
    }

    /// Parse a single line; `Ok(None)` for blank and comment lines
    pub fn parse_line(line: &str, line_num: usize) -> Result<Option<Self>, EventError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        serde_json::from_str(trimmed)
            .map(Some)
            .map_err(|source| EventError::Parse {
                line: line_num,
                source,
            })
    }
}

/// Read every event from `reader`
///
/// Bad lines are collected next to the good ones so a single typo does not
/// sink a whole recording. IO failures stop the read.
pub fn read_events<R: BufRead>(reader: R) -> Result<(Vec<DetectionEvent>, Vec<EventError>), EventError> {
    let mut events = Vec::new();
    let mut errors = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        match DetectionEvent::parse_line(&line, index + 1) {
            Ok(Some(event)) => events.push(event),
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }

    Ok((events, errors))
}

//! Applies detection events to a session store

use studytrack_core::Config;

use crate::clock::Clock;
use crate::events::DetectionEvent;
use crate::stats::{SessionSummary, StatsSnapshot};
use crate::store::SessionStore;

/// Values used when a distraction event leaves fields out
#[derive(Debug, Clone, PartialEq)]
pub struct EventDefaults {
    pub activity: String,
    pub severity: f64,
}

impl Default for EventDefaults {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for EventDefaults {
    fn from(config: &Config) -> Self {
        Self {
            activity: config.default_activity.clone(),
            severity: config.default_severity,
        }
    }
}

/// What applying one event produced
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Started(String),
    Distracted,
    Focused,
    Stats(Option<StatsSnapshot>),
    Stopped(SessionSummary),
}

/// Feeds events into a store, remembering the session they belong to
///
/// Events without a `sessionId` target the id returned by the most recent
/// `start`. Timestamps on distraction, focus and stop events become the
/// interval boundaries; start and stats always use the store's clock.
pub struct EventDriver<'a, C: Clock> {
    store: &'a SessionStore<C>,
    defaults: EventDefaults,
    session_id: Option<String>,
}

impl<'a, C: Clock> EventDriver<'a, C> {
    pub fn new(store: &'a SessionStore<C>, defaults: EventDefaults) -> Self {
        Self {
            store,
            defaults,
            session_id: None,
        }
    }

    /// Id of the session started by this driver, if any
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn apply(&mut self, event: &DetectionEvent) -> Applied {
        match event {
            DetectionEvent::Start {
                user_id, username, ..
            } => {
                let id = self.store.start(user_id.clone(), username.clone());
                self.session_id = Some(id.clone());
                Applied::Started(id)
            }
            DetectionEvent::Distracted {
                session_id,
                activity,
                severity,
                at,
            } => {
                let target = self.target(session_id);
                let activity = activity.as_deref().unwrap_or(&self.defaults.activity);
                let severity = severity.unwrap_or(self.defaults.severity);
                self.store.mark_distracted(&target, *at, activity, severity);
                Applied::Distracted
            }
            DetectionEvent::Focused { session_id, at } => {
                let target = self.target(session_id);
                self.store.mark_focused(&target, *at);
                Applied::Focused
            }
            DetectionEvent::Stats { .. } => Applied::Stats(self.store.stats()),
            DetectionEvent::Stop { session_id, at } => {
                let target = self.target(session_id);
                if at.is_some() {
                    self.store.mark_focused(&target, *at);
                }
                Applied::Stopped(self.store.stop(&target))
            }
        }
    }

    fn target(&self, given: &Option<String>) -> String {
        given
            .clone()
            .or_else(|| self.session_id.clone())
            .unwrap_or_default()
    }
}

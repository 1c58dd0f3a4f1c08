//! focus - live focus/distraction tracking for study sessions
//!
//! A detection process reports when the user starts and stops being
//! distracted; reporters poll for a running focus score.
//!
//! - `SessionStore`: the thread-safe session and interval accumulator
//! - `Clock`: injectable time source (`SystemClock`, `ManualClock`)
//! - `DetectionEvent` / `EventDriver`: the JSON-lines event stream that
//!   drives a store from outside the process

pub mod clock;
pub mod driver;
pub mod events;
pub mod session;
pub mod stats;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use driver::{Applied, EventDefaults, EventDriver};
pub use events::{DetectionEvent, EventError};
pub use session::{DistractionInterval, SessionState};
pub use stats::{SessionSummary, StatsSnapshot};
pub use store::SessionStore;

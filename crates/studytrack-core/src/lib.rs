//! studytrack core - shared functionality for the studytrack tools
//!
//! Holds the pieces every binary needs before it can touch a session:
//! where files live, how the config is loaded, and how numbers are shown.

pub mod config;
pub mod format;
pub mod paths;

pub use config::Config;
pub use paths::Paths;

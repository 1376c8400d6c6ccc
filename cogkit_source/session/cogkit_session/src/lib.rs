//! Session layer: sequences activities, fans their events out and captures
//! their failures.

pub mod activity;
pub mod config;
pub mod diagnostics;
pub mod session;

pub use activity::{Activity, ActivityFactory};
pub use config::{CogkitConfig, DiagnosticsConfig, RunnerConfig, SessionConfig};
pub use diagnostics::{DiagnosticReport, DiagnosticsReporter};
pub use session::{Session, SessionEvent, SessionEventKind, SessionState};

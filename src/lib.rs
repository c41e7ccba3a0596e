//! Workforce, task, performance and meeting dashboard state.
//!
//! Each collection lives in its own holder ([`TaskBoard`],
//! [`WorkforceRoster`], [`PerformanceLedger`], [`MeetingBook`]); alerts go to
//! a [`NotificationCenter`] passed in by the caller. [`Dashboard`] wires them
//! together and owns the file-import boundary.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod import;
pub mod meetings;
pub mod models;
pub mod notifications;
pub mod performance;
pub mod report;
pub mod seed;
pub mod tasks;
pub mod theme;
pub mod workforce;

pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::DashboardError;
pub use meetings::MeetingBook;
pub use notifications::{NotificationCenter, NotificationDraft};
pub use performance::PerformanceLedger;
pub use tasks::TaskBoard;
pub use theme::ThemePreference;
pub use workforce::WorkforceRoster;

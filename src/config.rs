use std::path::PathBuf;

use clap::Args;

use crate::notifications::DEFAULT_MAX_NOTIFICATIONS;

/// Settings shared by every command. Each flag falls back to an environment
/// variable.
#[derive(Debug, Clone, Args)]
pub struct DashboardConfig {
    /// Directory holding the persisted theme preference
    #[arg(long, env = "DASHBOARD_STATE_DIR", default_value = ".dashboard", global = true)]
    pub state_dir: PathBuf,

    /// Maximum notifications kept before the oldest are dropped
    #[arg(
        long,
        env = "DASHBOARD_MAX_NOTIFICATIONS",
        default_value_t = DEFAULT_MAX_NOTIFICATIONS,
        global = true
    )]
    pub max_notifications: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from(".dashboard"),
            max_notifications: DEFAULT_MAX_NOTIFICATIONS,
        }
    }
}

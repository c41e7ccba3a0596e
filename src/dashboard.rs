//! Composition of the state holders and the import boundary.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::import;
use crate::meetings::MeetingBook;
use crate::models::{EmployeePatch, NotificationKind, Priority};
use crate::notifications::{NotificationCenter, NotificationDraft};
use crate::performance::PerformanceLedger;
use crate::seed;
use crate::tasks::TaskBoard;
use crate::workforce::WorkforceRoster;

/// User whose performance series the ledger tracks.
pub const PERFORMANCE_SUBJECT: &str = "1";

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub tasks: TaskBoard,
    pub workforce: WorkforceRoster,
    pub performance: PerformanceLedger,
    pub meetings: MeetingBook,
    pub notifications: NotificationCenter,
}

impl Dashboard {
    pub fn empty(config: &DashboardConfig) -> Self {
        Self {
            tasks: TaskBoard::default(),
            workforce: WorkforceRoster::default(),
            performance: PerformanceLedger::new(PERFORMANCE_SUBJECT),
            meetings: MeetingBook::default(),
            notifications: NotificationCenter::with_capacity_limit(config.max_notifications),
        }
    }

    /// Dashboard preloaded with the sample team, tasks, meetings and a year
    /// of performance history ending at `today`.
    pub fn seeded(config: &DashboardConfig, today: NaiveDate) -> Self {
        let mut dashboard = Self::empty(config);
        dashboard.tasks = TaskBoard::new(seed::tasks(), seed::users());
        dashboard.workforce = WorkforceRoster::new(seed::employees());
        dashboard.meetings = MeetingBook::new(seed::meetings());
        dashboard.performance.replace(seed::performance_samples(today));
        dashboard
    }

    /// Parses a performance CSV and merges it into the ledger. Failures are
    /// announced as a warning and returned unchanged.
    pub fn import_performance(&mut self, file_name: &str, contents: &str) -> Result<usize> {
        let samples = self.reject_on_error(import::parse_performance_file(file_name, contents))?;
        let count = self.performance.ingest(samples);

        info!(file = file_name, count, "performance import applied");
        self.notifications.add(NotificationDraft::new(
            "Data Import Successful",
            format!("Successfully imported {count} performance records"),
            NotificationKind::Success,
            Priority::Medium,
        ));
        self.notifications.add(NotificationDraft::new(
            "Performance Data Updated",
            "Performance metrics have been updated with new data",
            NotificationKind::Success,
            Priority::Medium,
        ));
        Ok(count)
    }

    /// Validates a meeting dataset and replaces the meeting book with it.
    pub fn import_meetings(&mut self, contents: &str) -> Result<usize> {
        let meetings = self.reject_on_error(import::parse_meeting_dataset(contents))?;
        let count = meetings.len();
        self.meetings.set_meetings(meetings);

        self.notifications.add(NotificationDraft::new(
            "Dataset Imported",
            format!("Imported {count} meetings"),
            NotificationKind::Success,
            Priority::Medium,
        ));
        Ok(count)
    }

    pub fn import_workforce(&mut self, file_name: &str, contents: &str) -> Result<usize> {
        let rows = self.reject_on_error(
            import::ensure_csv(file_name).and_then(|()| import::parse_workforce_csv(contents)),
        )?;
        Ok(self.workforce.import_employees(rows, &mut self.notifications))
    }

    pub fn delegate_task(&mut self, task_id: &str) -> Result<String> {
        self.tasks.delegate(task_id, &mut self.notifications)
    }

    pub fn update_employee(&mut self, id: &str, patch: EmployeePatch) -> Result<()> {
        self.workforce
            .update_employee(id, patch, &mut self.notifications)
    }

    fn reject_on_error<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            warn!(error = %err, "import rejected");
            self.notifications.add(NotificationDraft::new(
                "Import Error",
                err.to_string(),
                NotificationKind::Warning,
                Priority::High,
            ));
        }
        result
    }
}

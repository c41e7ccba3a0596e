//! Employee workload roster.
//!
//! Status labels and recommendation lists are derived from the stored
//! workload every time they are read; only `trend` is stored, and it changes
//! solely through [`WorkforceRoster::update_employee`] or an import.

use serde::{de, Deserialize, Deserializer};
use tracing::info;

use crate::error::{DashboardError, Result};
use crate::models::{EmployeePatch, EmployeeWorkload, NotificationKind, Priority, Trend};
use crate::notifications::{NotificationCenter, NotificationDraft};
use crate::performance::round_half_up;

const OVERLOADED_ABOVE: u32 = 80;
const UNDERUTILIZED_BELOW: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadStatus {
    Overloaded,
    Balanced,
    Underutilized,
}

impl WorkloadStatus {
    pub fn from_workload(workload: u32) -> Self {
        if workload > OVERLOADED_ABOVE {
            WorkloadStatus::Overloaded
        } else if workload < UNDERUTILIZED_BELOW {
            WorkloadStatus::Underutilized
        } else {
            WorkloadStatus::Balanced
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WorkloadStatus::Overloaded => "Overloaded",
            WorkloadStatus::Balanced => "Balanced",
            WorkloadStatus::Underutilized => "Underutilized",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            WorkloadStatus::Overloaded => "red",
            WorkloadStatus::Balanced => "green",
            WorkloadStatus::Underutilized => "yellow",
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            WorkloadStatus::Overloaded => "Reduce workload",
            WorkloadStatus::Balanced => "Maintain current workload",
            WorkloadStatus::Underutilized => "Can take more tasks",
        }
    }

    pub fn recommendations(self) -> [&'static str; 3] {
        match self {
            WorkloadStatus::Overloaded => [
                "Redistribute tasks to reduce workload",
                "Schedule workload review meeting",
                "Consider postponing non-critical tasks",
            ],
            WorkloadStatus::Balanced => [
                "Maintain current workload balance",
                "Regular check-ins scheduled",
                "Monitor for changes in capacity",
            ],
            WorkloadStatus::Underutilized => [
                "Available for additional tasks",
                "Consider skill development opportunities",
                "Review task allocation strategy",
            ],
        }
    }
}

impl EmployeeWorkload {
    pub fn status(&self) -> WorkloadStatus {
        WorkloadStatus::from_workload(self.workload)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmployeeMetrics {
    pub efficiency: u32,
    pub completion_rate: u32,
    pub trend: Trend,
}

/// Efficiency relative to a 40%-workload baseline, capped at 100.
/// Zero workload yields zero efficiency.
pub fn efficiency(tasks: u32, workload: u32) -> u32 {
    if workload == 0 {
        return 0;
    }
    let raw = f64::from(tasks) / (f64::from(workload) / 40.0) * 100.0;
    round_half_up(raw).min(100.0) as u32
}

/// Completion rate against a ten-task baseline, capped at 100.
pub fn completion_rate(tasks: u32) -> u32 {
    round_half_up(f64::from(tasks) / 10.0 * 100.0).min(100.0) as u32
}

/// One row of a workforce import.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkforceRow {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub role: String,
    pub workload: u32,
    pub tasks: u32,
    #[serde(default, deserialize_with = "trend_from_str")]
    pub trend: Option<Trend>,
}

/// Parses the trend cell with [`Trend`]'s case-insensitive `FromStr`; a blank
/// cell means no trend.
fn trend_from_str<'de, D>(deserializer: D) -> std::result::Result<Option<Trend>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            raw.parse::<Trend>().map(Some).map_err(de::Error::custom)
        }
        _ => Ok(None),
    }
}

/// Team-wide workload risk from the average workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn from_average(average_workload: f64) -> Self {
        if average_workload > 75.0 {
            RiskLevel::High
        } else if average_workload > 60.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::High => "high",
            RiskLevel::Medium => "medium",
            RiskLevel::Low => "low",
        }
    }
}

pub const TEAM_RECOMMENDATIONS: [&str; 4] = [
    "Consider hiring additional team members",
    "Redistribute tasks among team members",
    "Review project timelines and deadlines",
    "Implement automation for repetitive tasks",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamOverview {
    pub headcount: usize,
    pub average_workload: f64,
    pub overloaded: usize,
    pub balanced: usize,
    pub underutilized: usize,
    pub overloaded_percentage: u32,
    pub balanced_percentage: u32,
    pub underutilized_percentage: u32,
    pub risk_level: RiskLevel,
    /// Increasing when more than half the team is trending up, otherwise stable.
    pub workload_trend: Trend,
    pub recommendations: [&'static str; 4],
}

#[derive(Debug, Clone, Default)]
pub struct WorkforceRoster {
    employees: Vec<EmployeeWorkload>,
}

impl WorkforceRoster {
    pub fn new(employees: Vec<EmployeeWorkload>) -> Self {
        Self { employees }
    }

    pub fn employees(&self) -> &[EmployeeWorkload] {
        &self.employees
    }

    pub fn employee(&self, id: &str) -> Option<&EmployeeWorkload> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn set_employees(&mut self, employees: Vec<EmployeeWorkload>) {
        self.employees = employees;
    }

    pub fn metrics(&self, id: &str) -> Option<EmployeeMetrics> {
        self.employee(id).map(|employee| EmployeeMetrics {
            efficiency: efficiency(employee.tasks, employee.workload),
            completion_rate: completion_rate(employee.tasks),
            trend: employee.trend,
        })
    }

    /// Applies the patch, recomputes the trend from the workload change and
    /// raises workload/trend alerts.
    pub fn update_employee(
        &mut self,
        id: &str,
        patch: EmployeePatch,
        notifications: &mut NotificationCenter,
    ) -> Result<()> {
        let employee = self
            .employees
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| DashboardError::NotFound {
                kind: "Employee",
                id: id.to_string(),
            })?;

        let previous_workload = employee.workload;
        let previous_trend = employee.trend;
        let new_workload = patch.workload.unwrap_or(previous_workload);

        let trend = if new_workload > previous_workload {
            Trend::Increasing
        } else if new_workload < previous_workload {
            Trend::Decreasing
        } else {
            previous_trend
        };

        if let Some(name) = patch.name {
            employee.name = name;
        }
        if let Some(role) = patch.role {
            employee.role = role;
        }
        if let Some(tasks) = patch.tasks {
            employee.tasks = tasks;
        }
        employee.workload = new_workload;
        employee.trend = trend;

        let name = employee.name.clone();
        info!(employee = %name, workload = new_workload, trend = trend.as_str(), "employee updated");

        if new_workload > OVERLOADED_ABOVE {
            notifications.add(NotificationDraft::new(
                "High Workload Alert",
                format!("{name}'s workload has increased to {new_workload}%"),
                NotificationKind::Workload,
                Priority::High,
            ));
        }
        if trend != previous_trend {
            notifications.add(NotificationDraft::new(
                "Performance Trend Change",
                format!("{name}'s performance trend has changed to {trend}"),
                NotificationKind::Performance,
                Priority::Medium,
            ));
        }
        Ok(())
    }

    /// Replaces the roster with imported rows.
    pub fn import_employees(
        &mut self,
        rows: Vec<WorkforceRow>,
        notifications: &mut NotificationCenter,
    ) -> usize {
        self.employees = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| EmployeeWorkload {
                id: row
                    .id
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or_else(|| (index + 1).to_string()),
                trend: row.trend.unwrap_or_else(|| default_trend(row.workload)),
                name: row.name,
                role: row.role,
                workload: row.workload,
                tasks: row.tasks,
            })
            .collect();

        for employee in &self.employees {
            if employee.workload > OVERLOADED_ABOVE {
                notifications.add(NotificationDraft::new(
                    "High Workload Alert",
                    format!(
                        "{} has a high workload of {}%",
                        employee.name, employee.workload
                    ),
                    NotificationKind::Workload,
                    Priority::High,
                ));
            }
        }

        info!(count = self.employees.len(), "workforce imported");
        self.employees.len()
    }

    pub fn team_overview(&self) -> TeamOverview {
        let headcount = self.employees.len();
        let total: f64 = self.employees.iter().map(|e| f64::from(e.workload)).sum();
        let average_workload = if headcount == 0 {
            0.0
        } else {
            total / headcount as f64
        };
        let count = |status: WorkloadStatus| {
            self.employees
                .iter()
                .filter(|e| e.status() == status)
                .count()
        };
        let share = |count: usize| {
            if headcount == 0 {
                0
            } else {
                round_half_up(count as f64 / headcount as f64 * 100.0) as u32
            }
        };

        let overloaded = count(WorkloadStatus::Overloaded);
        let balanced = count(WorkloadStatus::Balanced);
        let underutilized = count(WorkloadStatus::Underutilized);
        let increasing = self
            .employees
            .iter()
            .filter(|e| e.trend == Trend::Increasing)
            .count();

        TeamOverview {
            headcount,
            average_workload,
            overloaded,
            balanced,
            underutilized,
            overloaded_percentage: share(overloaded),
            balanced_percentage: share(balanced),
            underutilized_percentage: share(underutilized),
            risk_level: RiskLevel::from_average(average_workload),
            workload_trend: if increasing * 2 > headcount {
                Trend::Increasing
            } else {
                Trend::Stable
            },
            recommendations: TEAM_RECOMMENDATIONS,
        }
    }
}

fn default_trend(workload: u32) -> Trend {
    match workload {
        w if w > 75 => Trend::Increasing,
        w if w < 40 => Trend::Decreasing,
        _ => Trend::Stable,
    }
}

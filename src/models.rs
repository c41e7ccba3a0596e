use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DashboardError;

/// Generates a fresh entity id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trend {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "increasing" => Ok(Trend::Increasing),
            "decreasing" => Ok(Trend::Decreasing),
            "stable" => Ok(Trend::Stable),
            other => Err(DashboardError::InvalidData(format!("Unknown trend: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub assignee: String,
    pub status: TaskStatus,
    pub due_date: NaiveDate,
    pub estimated_hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,
    pub complexity: u8,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Task {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        assignee: impl Into<String>,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            description: description.into(),
            priority: Priority::Medium,
            assignee: assignee.into(),
            status: TaskStatus::Todo,
            due_date,
            estimated_hours: 0.0,
            actual_hours: None,
            complexity: 1,
            tags: Vec::new(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Field-wise update for a [`Task`]; `Some` fields overwrite.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub assignee: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub complexity: Option<u8>,
    pub tags: Option<Vec<String>>,
}

impl TaskPatch {
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(assignee) = self.assignee {
            task.assignee = assignee;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(hours) = self.estimated_hours {
            task.estimated_hours = hours;
        }
        if let Some(hours) = self.actual_hours {
            task.actual_hours = Some(hours);
        }
        if let Some(complexity) = self.complexity {
            task.complexity = complexity;
        }
        if let Some(tags) = self.tags {
            task.tags = tags;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: String,
    pub workload: f64,
    pub efficiency: f64,
    pub engagement_score: f64,
    pub work_hours: f64,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeWorkload {
    pub id: String,
    pub name: String,
    pub role: String,
    pub workload: u32,
    pub tasks: u32,
    #[serde(default)]
    pub trend: Trend,
}

#[derive(Debug, Clone, Default)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub workload: Option<u32>,
    pub tasks: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Efficiency,
    Engagement,
    Quality,
    Leadership,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Efficiency,
        MetricKind::Engagement,
        MetricKind::Quality,
        MetricKind::Leadership,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Efficiency => "efficiency",
            MetricKind::Engagement => "engagement",
            MetricKind::Quality => "quality",
            MetricKind::Leadership => "leadership",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "efficiency" => Ok(MetricKind::Efficiency),
            "engagement" => Ok(MetricKind::Engagement),
            "quality" => Ok(MetricKind::Quality),
            "leadership" => Ok(MetricKind::Leadership),
            other => Err(DashboardError::InvalidData(format!("Unknown metric: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformancePoint {
    pub id: String,
    pub user_id: String,
    pub metric: MetricKind,
    pub value: f64,
    pub timestamp: NaiveDate,
    #[serde(default)]
    pub trend: Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadershipCategory {
    Communication,
    Initiative,
    Mentorship,
    Innovation,
}

impl LeadershipCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            LeadershipCategory::Communication => "communication",
            LeadershipCategory::Initiative => "initiative",
            LeadershipCategory::Mentorship => "mentorship",
            LeadershipCategory::Innovation => "innovation",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeadershipMetric {
    pub id: String,
    pub user_id: String,
    pub category: LeadershipCategory,
    pub score: u8,
    pub evidence: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Strength,
    Improvement,
    Opportunity,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceInsight {
    pub id: String,
    pub user_id: String,
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub metrics: Vec<MetricKind>,
    pub recommendations: Vec<String>,
    pub priority: Priority,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    pub title: String,
    #[serde(with = "crate::meetings::meeting_date")]
    pub date: NaiveDateTime,
    pub participants: Vec<String>,
    pub action_items: Vec<String>,
    pub decisions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_takeaways: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_tasks: Option<Vec<Task>>,
}

#[derive(Debug, Clone, Default)]
pub struct MeetingPatch {
    pub title: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub participants: Option<Vec<String>>,
    pub action_items: Option<Vec<String>>,
    pub decisions: Option<Vec<String>>,
    pub key_takeaways: Option<Vec<String>>,
    pub follow_up_tasks: Option<Vec<Task>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Warning,
    Workload,
    Performance,
    Info,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Workload => "workload",
            NotificationKind::Performance => "performance",
            NotificationKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub priority: Priority,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

use std::fmt::Write;

use chrono::NaiveDate;

use crate::dashboard::Dashboard;
use crate::meetings::summarize;
use crate::performance::MetricChange;
use crate::tasks::detect_automation;
use crate::workforce::{completion_rate, efficiency};

fn signed(change: &MetricChange) -> String {
    format!("{} ({:+}%)", change.value, change.change)
}

pub fn build_report(dashboard: &Dashboard, today: NaiveDate) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Workforce Dashboard");
    let _ = writeln!(output, "Generated for {today}");

    let overview = dashboard.workforce.team_overview();
    let _ = writeln!(output);
    let _ = writeln!(output, "## Workforce");

    if overview.headcount == 0 {
        let _ = writeln!(output, "No employees on the roster.");
    } else {
        let _ = writeln!(
            output,
            "{} people, average workload {:.1}% ({} overloaded, {} balanced, {} underutilized)",
            overview.headcount,
            overview.average_workload,
            overview.overloaded,
            overview.balanced,
            overview.underutilized
        );
        let _ = writeln!(
            output,
            "Distribution: {}% overloaded, {}% balanced, {}% underutilized",
            overview.overloaded_percentage,
            overview.balanced_percentage,
            overview.underutilized_percentage
        );
        let _ = writeln!(
            output,
            "Risk level {}, team workload trend {}",
            overview.risk_level.as_str(),
            overview.workload_trend
        );
        for recommendation in overview.recommendations {
            let _ = writeln!(output, "  - {recommendation}");
        }
        for employee in dashboard.workforce.employees() {
            let status = employee.status();
            let _ = writeln!(
                output,
                "- {} ({}): {}% workload, {} [{}], trend {}, efficiency {}%, completion {}%. {}",
                employee.name,
                employee.role,
                employee.workload,
                status.label(),
                status.color(),
                employee.trend,
                efficiency(employee.tasks, employee.workload),
                completion_rate(employee.tasks),
                status.recommendation()
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Task Delegation");
    let tasks = dashboard.tasks.tasks();
    if tasks.is_empty() {
        let _ = writeln!(output, "No tasks recorded.");
    } else {
        let _ = writeln!(
            output,
            "{} automatable of {} tasks, {} team members",
            dashboard.tasks.automatable_tasks().count(),
            tasks.len(),
            dashboard.tasks.users().len()
        );
        for task in tasks {
            let optimal = dashboard
                .tasks
                .optimal_assignee(task)
                .map_or("-", |u| u.name.as_str());
            let mut flags = Vec::new();
            if detect_automation(task) {
                flags.push("automatable");
            }
            if dashboard.tasks.is_suboptimal(task) {
                flags.push("suboptimal assignment");
            }
            let flags = if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", "))
            };
            let _ = writeln!(
                output,
                "- {} ({}, {}) assigned to {}, best fit {}{}",
                task.title,
                task.priority,
                task.status.as_str(),
                task.assignee,
                optimal,
                flags
            );
        }
    }

    let latest = dashboard.performance.latest_metrics_at(today);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Performance");
    if dashboard.performance.points().is_empty() {
        let _ = writeln!(output, "No performance data imported.");
    } else {
        let _ = writeln!(output, "- Productivity: {}", signed(&latest.productivity));
        let _ = writeln!(output, "- Growth: {}", signed(&latest.growth));
        let _ = writeln!(output, "- Team capacity: {}", signed(&latest.capacity));
        let _ = writeln!(output, "- Response: {}", signed(&latest.response));

        let _ = writeln!(output);
        let _ = writeln!(output, "### Leadership");
        for metric in dashboard.performance.leadership_metrics() {
            let _ = writeln!(
                output,
                "- {}: {}/10 ({})",
                metric.category.as_str(),
                metric.score,
                metric.evidence.join("; ")
            );
        }

        let _ = writeln!(output);
        let _ = writeln!(output, "### Insights");
        for insight in dashboard.performance.insights() {
            let _ = writeln!(
                output,
                "- {} [{}]: {}",
                insight.title, insight.priority, insight.description
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Meetings");
    let mut meetings = dashboard.meetings.meetings().to_vec();
    meetings.sort_by(|a, b| b.date.cmp(&a.date));
    if meetings.is_empty() {
        let _ = writeln!(output, "No meetings recorded.");
    } else {
        for meeting in &meetings {
            let summary = meeting
                .summary
                .clone()
                .unwrap_or_else(|| summarize(meeting));
            let _ = writeln!(
                output,
                "- {} on {} with {}: {}",
                meeting.title,
                meeting.date.format("%Y-%m-%d %H:%M"),
                meeting.participants.join(", "),
                summary
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Notifications");
    let unread: Vec<_> = dashboard.notifications.unread().collect();
    if unread.is_empty() {
        let _ = writeln!(output, "No unread notifications.");
    } else {
        for notification in unread {
            let _ = writeln!(
                output,
                "- [{}] {}: {}",
                notification.priority, notification.title, notification.message
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 18).unwrap()
    }

    #[test]
    fn report_covers_every_section() {
        let dashboard = Dashboard::seeded(&DashboardConfig::default(), today());
        let report = build_report(&dashboard, today());

        for heading in [
            "## Workforce",
            "## Task Delegation",
            "## Performance",
            "### Leadership",
            "## Meetings",
            "## Notifications",
        ] {
            assert!(report.contains(heading), "missing {heading}");
        }
        assert!(report.contains("Sarah Johnson (Senior Developer): 85% workload, Overloaded [red]"));
        assert!(report.contains("Update User Authentication"));
        assert!(report.contains("automatable"));
        assert!(report.contains("Meeting focused on 2 key decisions"));
        assert!(report.contains("Distribution: 33% overloaded, 33% balanced, 33% underutilized"));
        assert!(report.contains("Risk level medium, team workload trend stable"));
        assert!(report.contains("Implement automation for repetitive tasks"));
    }

    #[test]
    fn empty_dashboard_reports_placeholders() {
        let dashboard = Dashboard::empty(&DashboardConfig::default());
        let report = build_report(&dashboard, today());

        assert!(report.contains("No employees on the roster."));
        assert!(report.contains("No tasks recorded."));
        assert!(report.contains("No performance data imported."));
        assert!(report.contains("No meetings recorded."));
        assert!(report.contains("No unread notifications."));
    }
}

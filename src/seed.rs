//! Realistic starting data for a fresh session.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};

use crate::models::{
    EmployeeWorkload, Meeting, MetricKind, Priority, Task, TaskStatus, Trend, User,
};
use crate::performance::PerformanceSample;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn at(day: NaiveDate, hour: u32) -> NaiveDateTime {
    day.and_hms_opt(hour, 0, 0).unwrap_or_default()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn users() -> Vec<User> {
    vec![
        User {
            id: "1".to_string(),
            name: "Sarah Johnson".to_string(),
            role: "Senior Developer".to_string(),
            workload: 85.0,
            efficiency: 92.0,
            engagement_score: 88.0,
            work_hours: 45.0,
            skills: strings(&["React", "TypeScript", "Node.js", "AWS"]),
            tasks: strings(&["1", "4", "7"]),
        },
        User {
            id: "2".to_string(),
            name: "Michael Chen".to_string(),
            role: "Product Manager".to_string(),
            workload: 65.0,
            efficiency: 85.0,
            engagement_score: 90.0,
            work_hours: 42.0,
            skills: strings(&["Product Strategy", "Agile", "User Research"]),
            tasks: strings(&["2", "5"]),
        },
        User {
            id: "3".to_string(),
            name: "Emily Rodriguez".to_string(),
            role: "UX Designer".to_string(),
            workload: 45.0,
            efficiency: 95.0,
            engagement_score: 92.0,
            work_hours: 38.0,
            skills: strings(&["UI Design", "User Research", "Prototyping"]),
            tasks: strings(&["3", "6"]),
        },
    ]
}

pub fn employees() -> Vec<EmployeeWorkload> {
    let employee = |id: &str, name: &str, role: &str, workload: u32, tasks: u32, trend: Trend| {
        EmployeeWorkload {
            id: id.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            workload,
            tasks,
            trend,
        }
    };

    vec![
        employee("1", "Sarah Johnson", "Senior Developer", 85, 8, Trend::Increasing),
        employee("2", "Michael Chen", "Product Manager", 65, 5, Trend::Stable),
        employee("3", "Emily Rodriguez", "UX Designer", 45, 3, Trend::Decreasing),
    ]
}

pub fn tasks() -> Vec<Task> {
    vec![
        Task {
            id: "1".to_string(),
            title: "Update User Authentication".to_string(),
            description: "Implement new security features for user authentication system"
                .to_string(),
            priority: Priority::High,
            assignee: "Sarah Johnson".to_string(),
            status: TaskStatus::InProgress,
            due_date: date(2025, 3, 20),
            estimated_hours: 16.0,
            actual_hours: None,
            complexity: 8,
            tags: strings(&["security", "backend"]),
        },
        Task {
            id: "2".to_string(),
            title: "Design System Review".to_string(),
            description: "Review and update component library documentation".to_string(),
            priority: Priority::Medium,
            assignee: "Emily Rodriguez".to_string(),
            status: TaskStatus::Todo,
            due_date: date(2025, 3, 25),
            estimated_hours: 8.0,
            actual_hours: None,
            complexity: 5,
            tags: strings(&["design", "documentation"]),
        },
        Task {
            id: "3".to_string(),
            title: "Sprint Planning".to_string(),
            description: "Prepare and conduct Q2 sprint planning session".to_string(),
            priority: Priority::High,
            assignee: "Michael Chen".to_string(),
            status: TaskStatus::Completed,
            due_date: date(2025, 3, 15),
            estimated_hours: 4.0,
            actual_hours: Some(3.5),
            complexity: 4,
            tags: strings(&["planning", "management"]),
        },
    ]
}

pub fn meetings() -> Vec<Meeting> {
    vec![
        Meeting {
            id: "1".to_string(),
            title: "Sprint Planning".to_string(),
            date: at(date(2025, 3, 20), 10),
            participants: strings(&["Sarah Johnson", "Michael Chen", "Emily Rodriguez"]),
            action_items: strings(&["Review backlog", "Set sprint goals", "Assign tasks"]),
            decisions: strings(&["Prioritize user authentication", "Postpone API updates"]),
            key_takeaways: Some(strings(&[
                "Focus on security features",
                "Need to reduce technical debt",
                "Team capacity is at 85%",
            ])),
            summary: None,
            follow_up_tasks: Some(Vec::new()),
        },
        Meeting {
            id: "2".to_string(),
            title: "Design Review".to_string(),
            date: at(date(2025, 3, 21), 14),
            participants: strings(&["Emily Rodriguez", "Sarah Johnson"]),
            action_items: strings(&["Update style guide", "Create component library"]),
            decisions: strings(&["Adopt new color scheme", "Implement design system"]),
            key_takeaways: Some(strings(&[
                "New design system will improve consistency",
                "Need to document component usage",
                "Plan for accessibility improvements",
            ])),
            summary: None,
            follow_up_tasks: Some(Vec::new()),
        },
    ]
}

/// Twelve monthly samples per metric ending at the month of `today`.
/// Values vary deterministically between 75 and 94.
pub fn performance_samples(today: NaiveDate) -> Vec<PerformanceSample> {
    let month_start = date(today.year(), today.month(), 1);
    let mut samples = Vec::new();

    for months_back in 0..12u32 {
        let Some(timestamp) = month_start.checked_sub_months(Months::new(months_back)) else {
            continue;
        };
        for (index, metric) in MetricKind::ALL.into_iter().enumerate() {
            let offset = (months_back * 7 + index as u32 * 5) % 20;
            samples.push(PerformanceSample {
                metric,
                value: f64::from(75 + offset),
                timestamp,
                trend: if offset % 2 == 0 {
                    Trend::Increasing
                } else {
                    Trend::Decreasing
                },
            });
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::optimal_assignee;

    #[test]
    fn performance_seed_covers_a_year_of_each_metric() {
        let samples = performance_samples(date(2026, 3, 18));
        assert_eq!(samples.len(), 48);
        assert!(samples.iter().all(|s| (75.0..95.0).contains(&s.value)));
        assert_eq!(samples[0].timestamp, date(2026, 3, 1));
        assert_eq!(samples[47].timestamp, date(2025, 4, 1));
    }

    #[test]
    fn seeded_assignees_are_known_users() {
        let users = users();
        for task in tasks() {
            assert!(users.iter().any(|u| u.name == task.assignee));
            let best = optimal_assignee(&task, &users).unwrap();
            assert!(users.iter().any(|u| u.name == best.name));
        }
    }
}

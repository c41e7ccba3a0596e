use tracing::info;

use crate::error::{DashboardError, Result};
use crate::models::{NotificationKind, Priority, Task, TaskPatch, User};
use crate::notifications::{NotificationCenter, NotificationDraft};

const AUTOMATION_KEYWORDS: [&str; 5] = ["report", "generate", "update", "sync", "backup"];
const AUTOMATION_TAGS: [&str; 2] = ["recurring", "automated"];

const SKILL_MATCH_POINTS: f64 = 3.0;

/// Task and user collections plus delegation heuristics.
#[derive(Debug, Clone, Default)]
pub struct TaskBoard {
    tasks: Vec<Task>,
    users: Vec<User>,
}

impl TaskBoard {
    pub fn new(tasks: Vec<Task>, users: Vec<User>) -> Self {
        Self { tasks, users }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("Task", id))?;
        patch.apply(task);
        Ok(())
    }

    pub fn delete_task(&mut self, id: &str) {
        self.tasks.retain(|t| t.id != id);
    }

    pub fn add_user(&mut self, user: User) {
        self.users.push(user);
    }

    /// Removes a user. Tasks keep whatever assignee name they carried.
    pub fn remove_user(&mut self, id: &str) {
        self.users.retain(|u| u.id != id);
    }

    /// Copies the named user's name onto the task. An unknown user id leaves
    /// the current assignee in place.
    pub fn assign_task(&mut self, task_id: &str, user_id: &str) -> Result<()> {
        let name = self
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.name.clone());
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| not_found("Task", task_id))?;
        if let Some(name) = name {
            task.assignee = name;
        }
        Ok(())
    }

    /// Best user for the task: the first user reaching the highest score.
    pub fn optimal_assignee(&self, task: &Task) -> Option<&User> {
        optimal_assignee(task, &self.users)
    }

    pub fn automatable_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| detect_automation(t))
    }

    /// True when someone other than the current assignee scores best.
    pub fn is_suboptimal(&self, task: &Task) -> bool {
        self.optimal_assignee(task)
            .is_some_and(|user| user.name != task.assignee)
    }

    /// Reassigns the task to its optimal user and announces the change.
    /// Returns the new assignee's name.
    pub fn delegate(
        &mut self,
        task_id: &str,
        notifications: &mut NotificationCenter,
    ) -> Result<String> {
        let task = self.task(task_id).ok_or_else(|| not_found("Task", task_id))?;
        let user = self.optimal_assignee(task).ok_or(DashboardError::NoUsers)?;
        let (user_id, user_name, title) = (user.id.clone(), user.name.clone(), task.title.clone());

        self.assign_task(task_id, &user_id)?;
        info!(task = %title, assignee = %user_name, "task delegated");
        notifications.add(NotificationDraft::new(
            "Task Reassigned",
            format!("Task \"{title}\" has been assigned to {user_name}"),
            NotificationKind::Success,
            Priority::Medium,
        ));
        Ok(user_name)
    }
}

/// A task is automatable when it is tagged recurring/automated or its text
/// mentions one of the automation keywords.
pub fn detect_automation(task: &Task) -> bool {
    let tagged = AUTOMATION_TAGS.iter().any(|tag| task.has_tag(tag));
    let title = task.title.to_lowercase();
    let description = task.description.to_lowercase();
    let keyword = AUTOMATION_KEYWORDS
        .iter()
        .any(|k| title.contains(k) || description.contains(k));

    tagged || keyword
}

/// Skill match (3) + idle capacity (0-5) + efficiency (0-5).
pub fn assignee_score(task: &Task, user: &User) -> f64 {
    let skill_match = user.skills.iter().any(|skill| {
        let skill = skill.to_lowercase();
        task.tags.iter().any(|tag| tag.to_lowercase().contains(&skill))
    });

    let mut score = if skill_match { SKILL_MATCH_POINTS } else { 0.0 };
    score += (100.0 - user.workload) / 20.0;
    score += user.efficiency / 20.0;
    score
}

pub fn optimal_assignee<'a>(task: &Task, users: &'a [User]) -> Option<&'a User> {
    let mut best: Option<(&User, f64)> = None;
    for user in users {
        let score = assignee_score(task, user);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((user, score)),
        }
    }
    best.map(|(user, _)| user)
}

fn not_found(kind: &'static str, id: &str) -> DashboardError {
    DashboardError::NotFound {
        kind,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_task(title: &str, description: &str, tags: &[&str]) -> Task {
        let mut task = Task::new(
            title,
            description,
            "Avery Lee",
            NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
        );
        task.tags = tags.iter().map(|t| t.to_string()).collect();
        task
    }

    fn sample_user(id: &str, name: &str, workload: f64, efficiency: f64, skills: &[&str]) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            role: "Engineer".to_string(),
            workload,
            efficiency,
            engagement_score: 80.0,
            work_hours: 40.0,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            tasks: Vec::new(),
        }
    }

    #[test]
    fn keyword_in_title_is_automatable() {
        let task = sample_task("Generate weekly report", "", &[]);
        assert!(detect_automation(&task));
    }

    #[test]
    fn keyword_match_ignores_case_and_checks_description() {
        let task = sample_task("Nightly job", "Runs a BACKUP of the db", &[]);
        assert!(detect_automation(&task));
    }

    #[test]
    fn recurring_tag_is_automatable() {
        let task = sample_task("Standup notes", "", &["recurring"]);
        assert!(detect_automation(&task));
        let task = sample_task("Standup notes", "", &["automated"]);
        assert!(detect_automation(&task));
    }

    #[test]
    fn plain_task_is_not_automatable() {
        let task = sample_task("Fix login bug", "Users cannot sign in", &["frontend"]);
        assert!(!detect_automation(&task));
    }

    #[test]
    fn score_combines_skill_capacity_and_efficiency() {
        let task = sample_task("Build API", "", &["backend-node.js"]);
        let user = sample_user("1", "Sam", 60.0, 80.0, &["Node.js"]);
        let expected = 3.0 + 40.0 / 20.0 + 80.0 / 20.0;
        assert!((assignee_score(&task, &user) - expected).abs() < 1e-9);
    }

    #[test]
    fn optimal_assignee_prefers_highest_score() {
        let task = sample_task("Design review", "", &["ui design"]);
        let users = vec![
            sample_user("1", "Sarah", 85.0, 92.0, &["React"]),
            sample_user("2", "Emily", 45.0, 95.0, &["UI Design"]),
        ];
        assert_eq!(optimal_assignee(&task, &users).unwrap().name, "Emily");
    }

    #[test]
    fn ties_resolve_to_first_user() {
        let task = sample_task("Anything", "", &[]);
        let users = vec![
            sample_user("1", "First", 50.0, 50.0, &[]),
            sample_user("2", "Second", 50.0, 50.0, &[]),
        ];
        assert_eq!(optimal_assignee(&task, &users).unwrap().name, "First");
    }

    #[test]
    fn optimal_assignee_is_none_without_users() {
        let task = sample_task("Anything", "", &[]);
        assert!(optimal_assignee(&task, &[]).is_none());
    }

    #[test]
    fn assign_with_unknown_user_keeps_assignee() {
        let task = sample_task("Anything", "", &[]);
        let id = task.id.clone();
        let mut board = TaskBoard::new(vec![task], vec![sample_user("1", "Sam", 10.0, 10.0, &[])]);

        board.assign_task(&id, "missing").unwrap();
        assert_eq!(board.task(&id).unwrap().assignee, "Avery Lee");

        board.assign_task(&id, "1").unwrap();
        assert_eq!(board.task(&id).unwrap().assignee, "Sam");
    }

    #[test]
    fn removing_user_does_not_touch_tasks() {
        let task = sample_task("Anything", "", &[]);
        let id = task.id.clone();
        let mut board = TaskBoard::new(vec![task], vec![sample_user("1", "Sam", 10.0, 10.0, &[])]);
        board.assign_task(&id, "1").unwrap();

        board.remove_user("1");
        assert!(board.users().is_empty());
        assert_eq!(board.task(&id).unwrap().assignee, "Sam");
    }

    #[test]
    fn delegate_assigns_optimal_user_and_notifies() {
        let task = sample_task("Refactor UI", "", &["ui design"]);
        let id = task.id.clone();
        let mut board = TaskBoard::new(
            vec![task],
            vec![
                sample_user("1", "Sarah", 85.0, 92.0, &["React"]),
                sample_user("2", "Emily", 45.0, 95.0, &["UI Design"]),
            ],
        );
        assert!(board.is_suboptimal(board.task(&id).unwrap()));

        let mut notifications = NotificationCenter::default();
        let name = board.delegate(&id, &mut notifications).unwrap();

        assert_eq!(name, "Emily");
        assert!(!board.is_suboptimal(board.task(&id).unwrap()));
        assert_eq!(notifications.all()[0].title, "Task Reassigned");
        assert_eq!(notifications.all()[0].kind, NotificationKind::Success);
    }

    #[test]
    fn delegate_without_users_fails() {
        let task = sample_task("Anything", "", &[]);
        let id = task.id.clone();
        let mut board = TaskBoard::new(vec![task], Vec::new());
        let mut notifications = NotificationCenter::default();

        let result = board.delegate(&id, &mut notifications);
        assert!(matches!(result, Err(DashboardError::NoUsers)));
        assert!(notifications.is_empty());
    }

    #[test]
    fn update_and_delete_task() {
        let task = sample_task("Draft", "", &[]);
        let id = task.id.clone();
        let mut board = TaskBoard::new(vec![task], Vec::new());

        board
            .update_task(
                &id,
                TaskPatch {
                    title: Some("Final".to_string()),
                    actual_hours: Some(2.5),
                    ..TaskPatch::default()
                },
            )
            .unwrap();
        let task = board.task(&id).unwrap();
        assert_eq!(task.title, "Final");
        assert_eq!(task.actual_hours, Some(2.5));

        assert!(board.update_task("missing", TaskPatch::default()).is_err());

        board.delete_task(&id);
        assert!(board.tasks().is_empty());
    }

    #[test]
    fn optimal_assignee_matches_first_highest_score() {
        let task = sample_task("Audit login flow", "", &["Security", "backend-api"]);
        let rosters = vec![
            vec![
                sample_user("1", "Avery", 85.0, 92.0, &["React", "Security"]),
                sample_user("2", "Jules", 65.0, 88.0, &["Backend"]),
                sample_user("3", "Noor", 45.0, 95.0, &["UI Design"]),
            ],
            vec![
                sample_user("1", "Tied A", 60.0, 80.0, &[]),
                sample_user("2", "Tied B", 60.0, 80.0, &[]),
                sample_user("3", "Tied C", 60.0, 80.0, &[]),
            ],
            vec![
                sample_user("1", "Low", 95.0, 40.0, &["api"]),
                sample_user("2", "Skilled", 40.0, 60.0, &["security"]),
                sample_user("3", "Idle", 0.0, 40.0, &[]),
                sample_user("4", "Also Skilled", 40.0, 60.0, &["BACKEND"]),
            ],
            vec![sample_user("1", "Solo", 100.0, 0.0, &["Cooking"])],
            vec![
                sample_user("1", "Busy", 100.0, 100.0, &[]),
                sample_user("2", "Free", 0.0, 0.0, &[]),
                sample_user("3", "Even", 50.0, 50.0, &[]),
            ],
        ];

        for users in &rosters {
            let scores: Vec<f64> = users.iter().map(|u| assignee_score(&task, u)).collect();
            let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let expected = scores.iter().position(|&s| s == max).unwrap();

            let chosen = optimal_assignee(&task, users).unwrap();
            assert_eq!(chosen.id, users[expected].id, "roster {:?}", scores);
            assert!(users.iter().any(|u| u.name == chosen.name));
        }
    }
}

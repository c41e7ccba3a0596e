use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{DashboardError, Result};
use crate::models::{Meeting, MeetingPatch, Task, TaskPatch};

const REQUIRED_FIELDS: [&str; 6] = [
    "id",
    "title",
    "date",
    "participants",
    "actionItems",
    "decisions",
];

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Accepts RFC 3339, local `YYYY-MM-DDTHH:MM[:SS]`, or a bare date
/// (midnight).
pub fn parse_meeting_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Serde adapter for meeting dates.
pub mod meeting_date {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_meeting_date(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid meeting date: {raw}")))
    }
}

/// Checks a parsed dataset and reports the first problem found.
pub fn validate_dataset(dataset: &Value) -> Result<()> {
    let meetings = dataset
        .as_array()
        .ok_or_else(|| invalid("Dataset must be an array of meetings"))?;

    for meeting in meetings {
        validate_meeting(meeting)?;
    }
    Ok(())
}

fn validate_meeting(meeting: &Value) -> Result<()> {
    for field in REQUIRED_FIELDS {
        if meeting.get(field).is_none() {
            return Err(invalid(format!("Missing required field: {field}")));
        }
    }

    if !meeting["id"].is_string() {
        return Err(invalid("Meeting ID must be a string"));
    }
    if !meeting["title"].is_string() {
        return Err(invalid("Meeting title must be a string"));
    }
    if meeting["date"]
        .as_str()
        .and_then(parse_meeting_date)
        .is_none()
    {
        return Err(invalid("Invalid date format"));
    }

    let lists = [
        ("participants", "Participants"),
        ("actionItems", "Action items"),
        ("decisions", "Decisions"),
    ];
    for (field, label) in lists {
        if !meeting[field].is_array() {
            return Err(invalid(format!("{label} must be an array")));
        }
    }
    for (field, label) in lists {
        let all_strings = meeting[field]
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string));
        if !all_strings {
            return Err(invalid(format!("{label} must be strings")));
        }
    }

    let takeaways = &meeting["keyTakeaways"];
    if !takeaways.is_null() {
        let items = takeaways
            .as_array()
            .ok_or_else(|| invalid("Key takeaways must be an array"))?;
        if !items.iter().all(Value::is_string) {
            return Err(invalid("Key takeaways must be strings"));
        }
    }
    let summary = &meeting["summary"];
    if !summary.is_null() && !summary.is_string() {
        return Err(invalid("Summary must be a string"));
    }
    let follow_ups = &meeting["followUpTasks"];
    if !follow_ups.is_null() {
        let items = follow_ups
            .as_array()
            .ok_or_else(|| invalid("Follow-up tasks must be an array"))?;
        if !items.iter().all(Value::is_object) {
            return Err(invalid("Follow-up tasks must be objects"));
        }
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> DashboardError {
    DashboardError::InvalidDataset(message.into())
}

/// Summary line built from the meeting's counts.
pub fn summarize(meeting: &Meeting) -> String {
    let takeaways = meeting.key_takeaways.as_ref().map_or(0, Vec::len);
    format!(
        "Meeting focused on {} key decisions, with {} action items identified. {} key takeaways were recorded.",
        meeting.decisions.len(),
        meeting.action_items.len(),
        takeaways
    )
}

#[derive(Debug, Clone, Default)]
pub struct MeetingBook {
    meetings: Vec<Meeting>,
}

impl MeetingBook {
    pub fn new(meetings: Vec<Meeting>) -> Self {
        Self { meetings }
    }

    pub fn meetings(&self) -> &[Meeting] {
        &self.meetings
    }

    pub fn meeting(&self, id: &str) -> Option<&Meeting> {
        self.meetings.iter().find(|m| m.id == id)
    }

    pub fn set_meetings(&mut self, meetings: Vec<Meeting>) {
        info!(count = meetings.len(), "meetings replaced");
        self.meetings = meetings;
    }

    pub fn add_meeting(&mut self, meeting: Meeting) {
        self.meetings.push(meeting);
    }

    /// Overwrites every field set in the patch. Changing decisions, action
    /// items or takeaways regenerates the summary.
    pub fn update_meeting(&mut self, id: &str, patch: MeetingPatch) -> Result<()> {
        let meeting = self.meeting_mut(id)?;
        let counts_changed = patch.decisions.is_some()
            || patch.action_items.is_some()
            || patch.key_takeaways.is_some();

        if let Some(title) = patch.title {
            meeting.title = title;
        }
        if let Some(date) = patch.date {
            meeting.date = date;
        }
        if let Some(participants) = patch.participants {
            meeting.participants = participants;
        }
        if let Some(action_items) = patch.action_items {
            meeting.action_items = action_items;
        }
        if let Some(decisions) = patch.decisions {
            meeting.decisions = decisions;
        }
        if let Some(takeaways) = patch.key_takeaways {
            meeting.key_takeaways = Some(takeaways);
        }
        if let Some(tasks) = patch.follow_up_tasks {
            meeting.follow_up_tasks = Some(tasks);
        }
        if counts_changed {
            refresh_summary(meeting);
        }
        Ok(())
    }

    pub fn delete_meeting(&mut self, id: &str) {
        self.meetings.retain(|m| m.id != id);
    }

    pub fn add_follow_up_task(&mut self, meeting_id: &str, task: Task) -> Result<()> {
        let meeting = self.meeting_mut(meeting_id)?;
        meeting.follow_up_tasks.get_or_insert_with(Vec::new).push(task);
        Ok(())
    }

    pub fn update_follow_up_task(
        &mut self,
        meeting_id: &str,
        task_id: &str,
        patch: TaskPatch,
    ) -> Result<()> {
        let meeting = self.meeting_mut(meeting_id)?;
        let task = meeting
            .follow_up_tasks
            .iter_mut()
            .flatten()
            .find(|t| t.id == task_id)
            .ok_or_else(|| DashboardError::NotFound {
                kind: "Follow-up task",
                id: task_id.to_string(),
            })?;
        patch.apply(task);
        Ok(())
    }

    pub fn add_decision(&mut self, meeting_id: &str, decision: impl Into<String>) -> Result<()> {
        let meeting = self.meeting_mut(meeting_id)?;
        meeting.decisions.push(decision.into());
        refresh_summary(meeting);
        Ok(())
    }

    pub fn add_action_item(&mut self, meeting_id: &str, item: impl Into<String>) -> Result<()> {
        let meeting = self.meeting_mut(meeting_id)?;
        meeting.action_items.push(item.into());
        refresh_summary(meeting);
        Ok(())
    }

    pub fn add_key_takeaway(&mut self, meeting_id: &str, takeaway: impl Into<String>) -> Result<()> {
        let meeting = self.meeting_mut(meeting_id)?;
        meeting
            .key_takeaways
            .get_or_insert_with(Vec::new)
            .push(takeaway.into());
        refresh_summary(meeting);
        Ok(())
    }

    /// Overwrites the stored summary and returns it.
    pub fn generate_summary(&mut self, meeting_id: &str) -> Result<String> {
        let meeting = self.meeting_mut(meeting_id)?;
        refresh_summary(meeting);
        Ok(meeting.summary.clone().unwrap_or_default())
    }

    fn meeting_mut(&mut self, id: &str) -> Result<&mut Meeting> {
        self.meetings
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| DashboardError::NotFound {
                kind: "Meeting",
                id: id.to_string(),
            })
    }
}

fn refresh_summary(meeting: &mut Meeting) {
    meeting.summary = Some(summarize(meeting));
    debug!(meeting = %meeting.id, "meeting summary regenerated");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_record() -> Value {
        json!({
            "id": "1",
            "title": "T",
            "date": "2025-01-01",
            "participants": [],
            "actionItems": [],
            "decisions": []
        })
    }

    fn message(result: Result<()>) -> String {
        result.unwrap_err().to_string()
    }

    fn sample_meeting() -> Meeting {
        Meeting {
            id: "m-1".to_string(),
            title: "Sprint Planning".to_string(),
            date: parse_meeting_date("2025-03-20T10:00:00").unwrap(),
            participants: vec!["Avery Lee".to_string()],
            action_items: vec!["Review backlog".to_string()],
            decisions: Vec::new(),
            key_takeaways: None,
            summary: None,
            follow_up_tasks: None,
        }
    }

    #[test]
    fn minimal_dataset_is_valid() {
        assert!(validate_dataset(&json!([valid_record()])).is_ok());
        assert!(validate_dataset(&json!([])).is_ok());
    }

    #[test]
    fn numeric_id_is_rejected() {
        let mut record = valid_record();
        record["id"] = json!(1);
        assert_eq!(
            message(validate_dataset(&json!([record]))),
            "Meeting ID must be a string"
        );
    }

    #[test]
    fn non_array_dataset_is_rejected() {
        assert_eq!(
            message(validate_dataset(&json!({"id": "1"}))),
            "Dataset must be an array of meetings"
        );
    }

    #[test]
    fn missing_fields_reported_in_declared_order() {
        let mut record = valid_record();
        record.as_object_mut().unwrap().remove("decisions");
        record.as_object_mut().unwrap().remove("title");
        assert_eq!(
            message(validate_dataset(&json!([record]))),
            "Missing required field: title"
        );
    }

    #[test]
    fn first_failing_record_wins() {
        let mut bad_date = valid_record();
        bad_date["date"] = json!("not a date");
        let mut bad_title = valid_record();
        bad_title["title"] = json!(5);

        assert_eq!(
            message(validate_dataset(&json!([valid_record(), bad_date, bad_title]))),
            "Invalid date format"
        );
    }

    #[test]
    fn array_shape_checked_before_contents() {
        let mut record = valid_record();
        record["participants"] = json!([1]);
        record["decisions"] = json!("approve");
        assert_eq!(
            message(validate_dataset(&json!([record]))),
            "Decisions must be an array"
        );

        let mut record = valid_record();
        record["actionItems"] = json!(["ok", 2]);
        assert_eq!(
            message(validate_dataset(&json!([record]))),
            "Action items must be strings"
        );
    }

    #[test]
    fn non_object_entry_reports_missing_id() {
        assert_eq!(
            message(validate_dataset(&json!(["meeting"]))),
            "Missing required field: id"
        );
    }

    #[test]
    fn date_formats_accepted() {
        assert!(parse_meeting_date("2025-03-20T10:00:00").is_some());
        assert!(parse_meeting_date("2025-03-20T10:00").is_some());
        assert!(parse_meeting_date("2025-03-20T10:00:00Z").is_some());
        assert!(parse_meeting_date("2025-03-20").is_some());
        assert!(parse_meeting_date("20/03/2025").is_none());
    }

    #[test]
    fn mutations_regenerate_summary() {
        let mut book = MeetingBook::new(vec![sample_meeting()]);

        book.add_decision("m-1", "Ship it").unwrap();
        book.add_action_item("m-1", "Write notes").unwrap();
        book.add_key_takeaway("m-1", "Team aligned").unwrap();

        let meeting = book.meeting("m-1").unwrap();
        assert_eq!(
            meeting.summary.as_deref(),
            Some("Meeting focused on 1 key decisions, with 2 action items identified. 1 key takeaways were recorded.")
        );
    }

    #[test]
    fn follow_up_tasks_can_be_added_and_updated() {
        let mut book = MeetingBook::new(vec![sample_meeting()]);
        let task = Task::new(
            "Send recap",
            "",
            "Avery Lee",
            NaiveDate::from_ymd_opt(2025, 3, 21).unwrap(),
        );
        let task_id = task.id.clone();

        book.add_follow_up_task("m-1", task).unwrap();
        book.update_follow_up_task(
            "m-1",
            &task_id,
            TaskPatch {
                assignee: Some("Jules Moreno".to_string()),
                ..TaskPatch::default()
            },
        )
        .unwrap();

        let tasks = book.meeting("m-1").unwrap().follow_up_tasks.as_ref().unwrap();
        assert_eq!(tasks[0].assignee, "Jules Moreno");
        assert!(book
            .update_follow_up_task("m-1", "missing", TaskPatch::default())
            .is_err());
    }

    #[test]
    fn unknown_meeting_operations_fail() {
        let mut book = MeetingBook::default();
        assert!(matches!(
            book.add_decision("nope", "x"),
            Err(DashboardError::NotFound { .. })
        ));
        assert!(book.generate_summary("nope").is_err());
    }

    #[test]
    fn update_and_delete_meeting() {
        let mut book = MeetingBook::new(vec![sample_meeting()]);
        book.update_meeting(
            "m-1",
            MeetingPatch {
                title: Some("Retro".to_string()),
                ..MeetingPatch::default()
            },
        )
        .unwrap();
        assert_eq!(book.meeting("m-1").unwrap().title, "Retro");

        book.delete_meeting("m-1");
        assert!(book.meetings().is_empty());
    }

    #[test]
    fn mistyped_optional_fields_are_rejected() {
        let cases = [
            ("keyTakeaways", json!("none"), "Key takeaways must be an array"),
            ("keyTakeaways", json!([1]), "Key takeaways must be strings"),
            ("summary", json!(3), "Summary must be a string"),
            ("followUpTasks", json!({}), "Follow-up tasks must be an array"),
            ("followUpTasks", json!(["call"]), "Follow-up tasks must be objects"),
        ];
        for (field, value, expected) in cases {
            let mut record = valid_record();
            record[field] = value;
            assert_eq!(message(validate_dataset(&json!([record]))), expected, "{field}");
        }

        let mut record = valid_record();
        record["keyTakeaways"] = Value::Null;
        record["summary"] = json!("Short sync");
        assert!(validate_dataset(&json!([record])).is_ok());
    }

    #[test]
    fn patching_lists_regenerates_summary() {
        let mut book = MeetingBook::new(vec![sample_meeting()]);
        let follow_up = Task::new(
            "Send recap",
            "",
            "Avery Lee",
            NaiveDate::from_ymd_opt(2025, 3, 21).unwrap(),
        );

        book.update_meeting(
            "m-1",
            MeetingPatch {
                decisions: Some(vec!["Ship".to_string(), "Hire".to_string()]),
                action_items: Some(Vec::new()),
                key_takeaways: Some(vec!["Aligned".to_string()]),
                follow_up_tasks: Some(vec![follow_up]),
                ..MeetingPatch::default()
            },
        )
        .unwrap();

        let meeting = book.meeting("m-1").unwrap();
        assert_eq!(meeting.decisions.len(), 2);
        assert!(meeting.action_items.is_empty());
        assert_eq!(meeting.follow_up_tasks.as_ref().unwrap().len(), 1);
        assert_eq!(
            meeting.summary.as_deref(),
            Some("Meeting focused on 2 key decisions, with 0 action items identified. 1 key takeaways were recorded.")
        );
    }

    #[test]
    fn title_patch_leaves_summary_alone() {
        let mut book = MeetingBook::new(vec![sample_meeting()]);
        book.update_meeting(
            "m-1",
            MeetingPatch {
                title: Some("Retro".to_string()),
                ..MeetingPatch::default()
            },
        )
        .unwrap();
        assert!(book.meeting("m-1").unwrap().summary.is_none());
    }

    #[test]
    fn meetings_deserialize_from_camel_case_json() {
        let meetings: Vec<Meeting> = serde_json::from_value(json!([{
            "id": "1",
            "title": "Design Review",
            "date": "2025-03-21T14:00:00",
            "participants": ["Emily Rodriguez"],
            "actionItems": ["Update style guide"],
            "decisions": ["Adopt new color scheme"],
            "keyTakeaways": ["Plan for accessibility"]
        }]))
        .unwrap();

        assert_eq!(meetings[0].action_items, vec!["Update style guide"]);
        assert_eq!(meetings[0].key_takeaways.as_ref().unwrap().len(), 1);
        assert!(meetings[0].follow_up_tasks.is_none());
    }
}

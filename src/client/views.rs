// View-side helpers for the admin/student dashboards: list ordering by
// status and client-side form validation before a mutation is sent.

use chrono::NaiveDate;

use crate::models::{Project, Status, Task};

/// Sort projects by lifecycle status (declared enum order), then title.
pub fn sort_projects_by_status(projects: &mut [Project]) {
    projects.sort_by(|a, b| a.status.cmp(&b.status).then_with(|| a.title.cmp(&b.title)));
}

/// Sort tasks by lifecycle status, then due date.
pub fn sort_tasks_by_status(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        a.status
            .cmp(&b.status)
            .then_with(|| a.due_date.cmp(&b.due_date))
    });
}

pub fn filter_tasks_by_status(tasks: &[Task], status: Status) -> Vec<Task> {
    tasks.iter().filter(|t| t.status == status).cloned().collect()
}

/// A field-level validation failure shown next to the form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Project form: required title/description, start must not be after end.
pub fn validate_project_form(
    title: &str,
    description: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    if title.trim().is_empty() {
        errors.push(FieldError::new("title", "Title is required"));
    }
    if description.trim().is_empty() {
        errors.push(FieldError::new("description", "Description is required"));
    }
    if start_date > end_date {
        errors.push(FieldError::new(
            "endDate",
            "End date must not be before start date",
        ));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Task form: required title, due date not in the past unless it is the
/// unchanged baseline of the record being edited.
pub fn validate_task_form(
    title: &str,
    due_date: NaiveDate,
    edit_baseline: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    if title.trim().is_empty() {
        errors.push(FieldError::new("title", "Title is required"));
    }
    let unchanged = edit_baseline == Some(due_date);
    if due_date < today && !unchanged {
        errors.push(FieldError::new(
            "dueDate",
            "Due date must not be in the past",
        ));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn project(title: &str, status: Status) -> Project {
        Project {
            id: title.to_string(),
            title: title.to_string(),
            description: String::new(),
            start_date: date("2026-01-01"),
            end_date: date("2026-12-31"),
            status,
            progress: 0,
            created_by: "a1".to_string(),
            students_working_on: vec![],
            tasks: vec![],
            created_at: Utc::now(),
        }
    }

    fn task(title: &str, status: Status, due: &str) -> Task {
        Task {
            id: title.to_string(),
            title: title.to_string(),
            description: String::new(),
            due_date: date(due),
            status,
            project_id: "p1".to_string(),
            created_by: "a1".to_string(),
            students_working_on: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn projects_sort_by_declared_status_order() {
        let mut projects = vec![
            project("c", Status::Completed),
            project("a", Status::InProgress),
            project("b", Status::NotStarted),
            project("d", Status::Pending),
        ];
        sort_projects_by_status(&mut projects);
        let order: Vec<Status> = projects.iter().map(|p| p.status).collect();
        assert_eq!(
            order,
            vec![
                Status::NotStarted,
                Status::Pending,
                Status::InProgress,
                Status::Completed
            ]
        );
    }

    #[test]
    fn tasks_sort_by_status_then_due_date() {
        let mut tasks = vec![
            task("late", Status::Pending, "2026-03-01"),
            task("done", Status::Completed, "2026-01-01"),
            task("early", Status::Pending, "2026-02-01"),
        ];
        sort_tasks_by_status(&mut tasks);
        let order: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(order, vec!["early", "late", "done"]);
    }

    #[test]
    fn filter_keeps_only_the_requested_status() {
        let tasks = vec![
            task("a", Status::Pending, "2026-02-01"),
            task("b", Status::Completed, "2026-02-01"),
            task("c", Status::Pending, "2026-03-01"),
        ];
        let pending = filter_tasks_by_status(&tasks, Status::Pending);
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|t| t.status == Status::Pending));
        assert!(filter_tasks_by_status(&tasks, Status::InProgress).is_empty());
    }

    #[test]
    fn project_form_rejects_inverted_dates() {
        let err = validate_project_form("t", "d", date("2026-02-01"), date("2026-01-01"))
            .unwrap_err();
        assert_eq!(err[0].field, "endDate");

        assert!(validate_project_form("t", "d", date("2026-01-01"), date("2026-01-01")).is_ok());
    }

    #[test]
    fn project_form_collects_all_field_errors() {
        let err =
            validate_project_form("", "", date("2026-02-01"), date("2026-01-01")).unwrap_err();
        let fields: Vec<&str> = err.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "description", "endDate"]);
    }

    #[test]
    fn task_form_allows_past_due_date_only_as_unchanged_baseline() {
        let today = date("2026-08-23");
        let past = date("2026-08-01");

        assert!(validate_task_form("t", past, None, today).is_err());
        assert!(validate_task_form("t", past, Some(past), today).is_ok());
        // Baseline differs: the past date was actively chosen, reject it.
        assert!(validate_task_form("t", past, Some(date("2026-08-02")), today).is_err());
        assert!(validate_task_form("t", today, None, today).is_ok());
    }
}

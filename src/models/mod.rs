// Canonical entity shapes for the task-management domain.
// Documents are stored as JSON; field names here are the storage schema.

use async_graphql::{ComplexObject, Enum, InputObject, SimpleObject};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Collection names in the document store.
pub mod collections {
    pub const USERS: &str = "users";
    pub const ADMINS: &str = "admins";
    pub const STUDENTS: &str = "students";
    pub const PROJECTS: &str = "projects";
    pub const TASKS: &str = "tasks";
    pub const MESSAGES: &str = "messages";
}

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

/// Shared project/task lifecycle states. The declared order is the
/// dashboard's sort order.
#[derive(
    Enum, Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Status {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

#[derive(SimpleObject, Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Argon2 hash; never exposed through the API.
    #[graphql(skip)]
    #[serde(default)]
    pub password: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(InputObject, Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Role is fixed at creation and deliberately absent here.
#[derive(InputObject, Debug, Clone, Serialize)]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(SimpleObject, Debug, Clone, Serialize, Deserialize)]
#[graphql(complex)]
pub struct Admin {
    pub id: String,
    pub user_id: String,
    pub permissions: Vec<String>,
}

#[derive(InputObject, Debug, Clone)]
pub struct NewAdmin {
    pub user_id: String,
    pub permissions: Vec<String>,
}

#[derive(InputObject, Debug, Clone, Serialize)]
pub struct UpdateAdmin {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

#[derive(SimpleObject, Debug, Clone, Serialize, Deserialize)]
#[graphql(complex)]
pub struct Student {
    pub id: String,
    pub user_id: String,
    pub university_id: String,
    pub major: String,
    pub year: i32,
}

#[derive(InputObject, Debug, Clone)]
pub struct NewStudent {
    pub user_id: String,
    pub university_id: String,
    pub major: String,
    pub year: i32,
}

#[derive(InputObject, Debug, Clone, Serialize)]
pub struct UpdateStudent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

#[derive(SimpleObject, Debug, Clone, Serialize, Deserialize)]
#[graphql(complex)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: Status,
    /// Percentage in [0, 100]; not correlated with status by the server.
    pub progress: i32,
    pub created_by: String,
    pub students_working_on: Vec<String>,
    pub tasks: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(InputObject, Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[graphql(default)]
    pub status: Status,
    #[graphql(default, validator(minimum = 0, maximum = 100))]
    pub progress: i32,
    pub created_by: String,
    #[graphql(default)]
    pub students_working_on: Vec<String>,
}

#[derive(InputObject, Debug, Clone, Serialize)]
pub struct UpdateProject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[graphql(validator(minimum = 0, maximum = 100))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub students_working_on: Option<Vec<String>>,
}

#[derive(SimpleObject, Debug, Clone, Serialize, Deserialize)]
#[graphql(complex)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub status: Status,
    pub project_id: String,
    pub created_by: String,
    pub students_working_on: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(InputObject, Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    #[graphql(default)]
    pub status: Status,
    pub project_id: String,
    pub created_by: String,
    #[graphql(default)]
    pub students_working_on: Vec<String>,
}

#[derive(InputObject, Debug, Clone, Serialize)]
pub struct UpdateTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub students_working_on: Option<Vec<String>>,
}

/// Either end of a message: a user id plus the role it was acting under.
#[derive(SimpleObject, InputObject, Debug, Clone, Serialize, Deserialize)]
#[graphql(input_name = "ParticipantInput")]
pub struct Participant {
    pub id: String,
    pub role: Role,
}

#[derive(SimpleObject, Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: Participant,
    pub receiver: Participant,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

#[derive(InputObject, Debug, Clone)]
pub struct NewMessage {
    pub content: String,
    pub receiver: Participant,
}

/// Result of a successful login: the signed session token plus the user.
#[derive(SimpleObject, Debug, Clone)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

// Reference-resolving fields. Dangling references (deletes do not cascade)
// resolve to None / are skipped rather than erroring the whole query.

#[ComplexObject]
impl Admin {
    async fn user(&self, ctx: &async_graphql::Context<'_>) -> async_graphql::Result<Option<User>> {
        crate::graphql::resolve_reference(ctx, collections::USERS, &self.user_id).await
    }
}

#[ComplexObject]
impl Student {
    async fn user(&self, ctx: &async_graphql::Context<'_>) -> async_graphql::Result<Option<User>> {
        crate::graphql::resolve_reference(ctx, collections::USERS, &self.user_id).await
    }
}

#[ComplexObject]
impl Project {
    async fn creator(
        &self,
        ctx: &async_graphql::Context<'_>,
    ) -> async_graphql::Result<Option<Admin>> {
        crate::graphql::resolve_reference(ctx, collections::ADMINS, &self.created_by).await
    }

    async fn students(
        &self,
        ctx: &async_graphql::Context<'_>,
    ) -> async_graphql::Result<Vec<Student>> {
        crate::graphql::resolve_references(ctx, collections::STUDENTS, &self.students_working_on)
            .await
    }

    async fn task_list(
        &self,
        ctx: &async_graphql::Context<'_>,
    ) -> async_graphql::Result<Vec<Task>> {
        crate::graphql::resolve_references(ctx, collections::TASKS, &self.tasks).await
    }
}

#[ComplexObject]
impl Task {
    async fn project(
        &self,
        ctx: &async_graphql::Context<'_>,
    ) -> async_graphql::Result<Option<Project>> {
        crate::graphql::resolve_reference(ctx, collections::PROJECTS, &self.project_id).await
    }

    async fn creator(
        &self,
        ctx: &async_graphql::Context<'_>,
    ) -> async_graphql::Result<Option<Admin>> {
        crate::graphql::resolve_reference(ctx, collections::ADMINS, &self.created_by).await
    }

    async fn students(
        &self,
        ctx: &async_graphql::Context<'_>,
    ) -> async_graphql::Result<Vec<Student>> {
        crate::graphql::resolve_references(ctx, collections::STUDENTS, &self.students_working_on)
            .await
    }
}

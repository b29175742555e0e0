use async_graphql::{Context, ErrorExtensions, Object, Result};
use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::graphql::{
    decode_doc, encode_doc, fetch_all, fetch_one, merge_one, remove_one, require_admin,
    require_students, AppContext,
};
use crate::models::{collections, NewTask, Project, Task, UpdateTask};

#[derive(Default)]
pub struct TaskQuery;

#[Object]
impl TaskQuery {
    async fn tasks(&self, ctx: &Context<'_>) -> Result<Vec<Task>> {
        let app = ctx.data::<AppContext>()?;
        fetch_all(&app.store, collections::TASKS)
            .await
            .map_err(|e| e.extend())
    }

    async fn task(&self, ctx: &Context<'_>, id: String) -> Result<Task> {
        let app = ctx.data::<AppContext>()?;
        fetch_one(&app.store, collections::TASKS, &id, "Task")
            .await
            .map_err(|e| e.extend())
    }
}

#[derive(Default)]
pub struct TaskMutation;

#[Object]
impl TaskMutation {
    async fn add_task(&self, ctx: &Context<'_>, input: NewTask) -> Result<Task> {
        let app = ctx.data::<AppContext>()?;
        create_task(app, input).await.map_err(|e| e.extend())
    }

    async fn update_task(&self, ctx: &Context<'_>, id: String, input: UpdateTask) -> Result<Task> {
        let app = ctx.data::<AppContext>()?;
        update_task(app, &id, input).await.map_err(|e| e.extend())
    }

    /// Removes the task and returns it. The owning project's task list is
    /// not retracted.
    async fn delete_task(&self, ctx: &Context<'_>, id: String) -> Result<Task> {
        let app = ctx.data::<AppContext>()?;
        remove_one(&app.store, collections::TASKS, &id, "Task")
            .await
            .map_err(|e| e.extend())
    }
}

async fn create_task(app: &AppContext, input: NewTask) -> crate::error::AppResult<Task> {
    if input.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }

    if app
        .store
        .find_by_field(collections::TASKS, "title", &input.title)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Task with title {} already exists",
            input.title
        )));
    }

    let project_doc = app
        .store
        .get(collections::PROJECTS, &input.project_id)
        .await?
        .ok_or_else(|| {
            AppError::Validation(format!("Project {} does not exist", input.project_id))
        })?;
    let project: Project = decode_doc(project_doc)?;

    require_admin(app, &input.created_by).await?;
    require_students(app, &input.students_working_on).await?;

    let task = Task {
        id: Uuid::new_v4().to_string(),
        title: input.title,
        description: input.description,
        due_date: input.due_date,
        status: input.status,
        project_id: input.project_id,
        created_by: input.created_by,
        students_working_on: input.students_working_on,
        created_at: Utc::now(),
    };
    app.store
        .insert(collections::TASKS, &task.id, &encode_doc(&task)?)
        .await?;

    // Register the task on its project. Not transactional with the insert;
    // a failure here leaves the task reachable via the tasks collection.
    let mut task_ids = project.tasks;
    task_ids.push(task.id.clone());
    if let Err(e) = app
        .store
        .merge(
            collections::PROJECTS,
            &task.project_id,
            &json!({ "tasks": task_ids }),
        )
        .await
    {
        warn!(
            "Failed to register task {} on project {}: {}",
            task.id, task.project_id, e
        );
    }

    info!("Created task {} ({})", task.title, task.id);
    Ok(task)
}

async fn update_task(
    app: &AppContext,
    id: &str,
    input: UpdateTask,
) -> crate::error::AppResult<Task> {
    if let Some(title) = &input.title {
        if let Some(existing) = app
            .store
            .find_by_field(collections::TASKS, "title", title)
            .await?
        {
            if existing["id"] != id {
                return Err(AppError::Conflict(format!(
                    "Task with title {} already exists",
                    title
                )));
            }
        }
    }
    if let Some(students) = &input.students_working_on {
        require_students(app, students).await?;
    }
    merge_one(&app.store, collections::TASKS, id, &input, "Task").await
}

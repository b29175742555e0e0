use async_graphql::{Context, ErrorExtensions, Object, Result};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::graphql::{
    encode_doc, fetch_all, fetch_one, merge_one, remove_one, require_admin, require_students,
    AppContext,
};
use crate::models::{collections, NewProject, Project, UpdateProject};

#[derive(Default)]
pub struct ProjectQuery;

#[Object]
impl ProjectQuery {
    async fn projects(&self, ctx: &Context<'_>) -> Result<Vec<Project>> {
        let app = ctx.data::<AppContext>()?;
        fetch_all(&app.store, collections::PROJECTS)
            .await
            .map_err(|e| e.extend())
    }

    async fn project(&self, ctx: &Context<'_>, id: String) -> Result<Project> {
        let app = ctx.data::<AppContext>()?;
        fetch_one(&app.store, collections::PROJECTS, &id, "Project")
            .await
            .map_err(|e| e.extend())
    }
}

#[derive(Default)]
pub struct ProjectMutation;

#[Object]
impl ProjectMutation {
    async fn add_project(&self, ctx: &Context<'_>, input: NewProject) -> Result<Project> {
        let app = ctx.data::<AppContext>()?;
        create_project(app, input).await.map_err(|e| e.extend())
    }

    async fn update_project(
        &self,
        ctx: &Context<'_>,
        id: String,
        input: UpdateProject,
    ) -> Result<Project> {
        let app = ctx.data::<AppContext>()?;
        update_project(app, &id, input).await.map_err(|e| e.extend())
    }

    /// Removes the project and returns it. Its tasks are not deleted.
    async fn delete_project(&self, ctx: &Context<'_>, id: String) -> Result<Project> {
        let app = ctx.data::<AppContext>()?;
        remove_one(&app.store, collections::PROJECTS, &id, "Project")
            .await
            .map_err(|e| e.extend())
    }
}

async fn create_project(app: &AppContext, input: NewProject) -> crate::error::AppResult<Project> {
    if input.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if input.start_date > input.end_date {
        return Err(AppError::Validation(
            "Start date must not be after end date".to_string(),
        ));
    }

    require_admin(app, &input.created_by).await?;
    require_students(app, &input.students_working_on).await?;

    let project = Project {
        id: Uuid::new_v4().to_string(),
        title: input.title,
        description: input.description,
        start_date: input.start_date,
        end_date: input.end_date,
        status: input.status,
        progress: input.progress,
        created_by: input.created_by,
        students_working_on: input.students_working_on,
        tasks: Vec::new(),
        created_at: Utc::now(),
    };
    app.store
        .insert(collections::PROJECTS, &project.id, &encode_doc(&project)?)
        .await?;
    info!("Created project {} ({})", project.title, project.id);
    Ok(project)
}

async fn update_project(
    app: &AppContext,
    id: &str,
    input: UpdateProject,
) -> crate::error::AppResult<Project> {
    if let Some(students) = &input.students_working_on {
        require_students(app, students).await?;
    }
    merge_one(&app.store, collections::PROJECTS, id, &input, "Project").await
}

use async_graphql::{Context, ErrorExtensions, Object, Result};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::graphql::{
    decode_doc, encode_doc, fetch_all, fetch_one, merge_one, remove_one, AppContext,
};
use crate::models::{collections, NewStudent, Role, Student, UpdateStudent, User};

#[derive(Default)]
pub struct StudentQuery;

#[Object]
impl StudentQuery {
    async fn students(&self, ctx: &Context<'_>) -> Result<Vec<Student>> {
        let app = ctx.data::<AppContext>()?;
        fetch_all(&app.store, collections::STUDENTS)
            .await
            .map_err(|e| e.extend())
    }

    async fn student(&self, ctx: &Context<'_>, id: String) -> Result<Student> {
        let app = ctx.data::<AppContext>()?;
        fetch_one(&app.store, collections::STUDENTS, &id, "Student")
            .await
            .map_err(|e| e.extend())
    }
}

#[derive(Default)]
pub struct StudentMutation;

#[Object]
impl StudentMutation {
    async fn add_student(&self, ctx: &Context<'_>, input: NewStudent) -> Result<Student> {
        let app = ctx.data::<AppContext>()?;
        create_student(app, input).await.map_err(|e| e.extend())
    }

    async fn update_student(
        &self,
        ctx: &Context<'_>,
        id: String,
        input: UpdateStudent,
    ) -> Result<Student> {
        let app = ctx.data::<AppContext>()?;
        merge_one(&app.store, collections::STUDENTS, &id, &input, "Student")
            .await
            .map_err(|e| e.extend())
    }

    /// Removes the student and returns it. Assignments on projects and
    /// tasks are left as dangling references.
    async fn delete_student(&self, ctx: &Context<'_>, id: String) -> Result<Student> {
        let app = ctx.data::<AppContext>()?;
        remove_one(&app.store, collections::STUDENTS, &id, "Student")
            .await
            .map_err(|e| e.extend())
    }
}

async fn create_student(app: &AppContext, input: NewStudent) -> crate::error::AppResult<Student> {
    let doc = app
        .store
        .get(collections::USERS, &input.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Validation(format!("User {} does not exist", input.user_id))
        })?;
    let user: User = decode_doc(doc)?;

    if user.role != Role::Student {
        return Err(AppError::Validation(format!(
            "User {} does not have the student role",
            input.user_id
        )));
    }

    // One Student per User. Checked, not enforced atomically.
    if app
        .store
        .find_by_field(collections::STUDENTS, "user_id", &input.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Student for user {} already exists",
            input.user_id
        )));
    }

    let student = Student {
        id: Uuid::new_v4().to_string(),
        user_id: input.user_id,
        university_id: input.university_id,
        major: input.major,
        year: input.year,
    };
    app.store
        .insert(collections::STUDENTS, &student.id, &encode_doc(&student)?)
        .await?;
    info!("Created student {} for user {}", student.id, student.user_id);
    Ok(student)
}

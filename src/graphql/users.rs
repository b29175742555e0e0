use async_graphql::{Context, ErrorExtensions, Object, Result};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::graphql::{encode_doc, fetch_all, fetch_one, merge_one, remove_one, AppContext};
use crate::models::{collections, AuthPayload, NewUser, UpdateUser, User};
use crate::session::{hash_password, verify_password};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// All registered users.
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let app = ctx.data::<AppContext>()?;
        fetch_all(&app.store, collections::USERS)
            .await
            .map_err(|e| e.extend())
    }

    async fn user(&self, ctx: &Context<'_>, id: String) -> Result<User> {
        let app = ctx.data::<AppContext>()?;
        fetch_one(&app.store, collections::USERS, &id, "User")
            .await
            .map_err(|e| e.extend())
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    async fn add_user(&self, ctx: &Context<'_>, input: NewUser) -> Result<User> {
        let app = ctx.data::<AppContext>()?;
        create_user(app, input).await.map_err(|e| e.extend())
    }

    async fn update_user(&self, ctx: &Context<'_>, id: String, input: UpdateUser) -> Result<User> {
        let app = ctx.data::<AppContext>()?;
        update_user(app, &id, input).await.map_err(|e| e.extend())
    }

    /// Removes the user and returns it. Dependent Admin/Student records and
    /// project/task assignments are not cleaned up.
    async fn delete_user(&self, ctx: &Context<'_>, id: String) -> Result<User> {
        let app = ctx.data::<AppContext>()?;
        remove_one(&app.store, collections::USERS, &id, "User")
            .await
            .map_err(|e| e.extend())
    }

    /// Verifies credentials and returns a signed session token.
    async fn login(&self, ctx: &Context<'_>, name: String, password: String) -> Result<AuthPayload> {
        let app = ctx.data::<AppContext>()?;
        login(app, &name, &password).await.map_err(|e| e.extend())
    }
}

async fn create_user(app: &AppContext, input: NewUser) -> crate::error::AppResult<User> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if input.password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }
    if !EMAIL_RE.is_match(&input.email) {
        return Err(AppError::Validation(format!(
            "Invalid email address: {}",
            input.email
        )));
    }

    if app
        .store
        .find_by_field(collections::USERS, "name", &input.name)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "User with name {} already exists",
            input.name
        )));
    }
    if app
        .store
        .find_by_field(collections::USERS, "email", &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "User with email {} already exists",
            input.email
        )));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        email: input.email,
        password: hash_password(&input.password)?,
        role: input.role,
        created_at: Utc::now(),
    };

    app.store
        .insert(collections::USERS, &user.id, &encode_doc(&user)?)
        .await?;
    info!("Created user {} ({})", user.name, user.id);
    Ok(user)
}

async fn update_user(
    app: &AppContext,
    id: &str,
    input: UpdateUser,
) -> crate::error::AppResult<User> {
    if let Some(name) = &input.name {
        if let Some(existing) = app
            .store
            .find_by_field(collections::USERS, "name", name)
            .await?
        {
            if existing["id"] != id {
                return Err(AppError::Conflict(format!(
                    "User with name {} already exists",
                    name
                )));
            }
        }
    }
    if let Some(email) = &input.email {
        if !EMAIL_RE.is_match(email) {
            return Err(AppError::Validation(format!(
                "Invalid email address: {}",
                email
            )));
        }
        if let Some(existing) = app
            .store
            .find_by_field(collections::USERS, "email", email)
            .await?
        {
            if existing["id"] != id {
                return Err(AppError::Conflict(format!(
                    "User with email {} already exists",
                    email
                )));
            }
        }
    }

    merge_one(&app.store, collections::USERS, id, &input, "User").await
}

async fn login(app: &AppContext, name: &str, password: &str) -> crate::error::AppResult<AuthPayload> {
    let doc = app
        .store
        .find_by_field(collections::USERS, "name", name)
        .await?
        .ok_or_else(|| AppError::Authentication("Invalid name or password".to_string()))?;
    let user: User = crate::graphql::decode_doc(doc)?;

    if !verify_password(password, &user.password) {
        return Err(AppError::Authentication(
            "Invalid name or password".to_string(),
        ));
    }

    let token = app.keys.issue(&user.id, user.role)?;
    info!("User {} logged in", user.id);
    Ok(AuthPayload { token, user })
}

use async_graphql::{Context, ErrorExtensions, Object, Result};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::graphql::{
    decode_doc, encode_doc, fetch_all, fetch_one, merge_one, remove_one, AppContext,
};
use crate::models::{collections, Admin, NewAdmin, Role, UpdateAdmin, User};

#[derive(Default)]
pub struct AdminQuery;

#[Object]
impl AdminQuery {
    async fn admins(&self, ctx: &Context<'_>) -> Result<Vec<Admin>> {
        let app = ctx.data::<AppContext>()?;
        fetch_all(&app.store, collections::ADMINS)
            .await
            .map_err(|e| e.extend())
    }

    async fn admin(&self, ctx: &Context<'_>, id: String) -> Result<Admin> {
        let app = ctx.data::<AppContext>()?;
        fetch_one(&app.store, collections::ADMINS, &id, "Admin")
            .await
            .map_err(|e| e.extend())
    }
}

#[derive(Default)]
pub struct AdminMutation;

#[Object]
impl AdminMutation {
    async fn add_admin(&self, ctx: &Context<'_>, input: NewAdmin) -> Result<Admin> {
        let app = ctx.data::<AppContext>()?;
        create_admin(app, input).await.map_err(|e| e.extend())
    }

    async fn update_admin(
        &self,
        ctx: &Context<'_>,
        id: String,
        input: UpdateAdmin,
    ) -> Result<Admin> {
        let app = ctx.data::<AppContext>()?;
        merge_one(&app.store, collections::ADMINS, &id, &input, "Admin")
            .await
            .map_err(|e| e.extend())
    }

    async fn delete_admin(&self, ctx: &Context<'_>, id: String) -> Result<Admin> {
        let app = ctx.data::<AppContext>()?;
        remove_one(&app.store, collections::ADMINS, &id, "Admin")
            .await
            .map_err(|e| e.extend())
    }
}

async fn create_admin(app: &AppContext, input: NewAdmin) -> crate::error::AppResult<Admin> {
    let doc = app
        .store
        .get(collections::USERS, &input.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Validation(format!("User {} does not exist", input.user_id))
        })?;
    let user: User = decode_doc(doc)?;

    if user.role != Role::Admin {
        return Err(AppError::Validation(format!(
            "User {} does not have the admin role",
            input.user_id
        )));
    }

    // One Admin per User. Checked, not enforced atomically.
    if app
        .store
        .find_by_field(collections::ADMINS, "user_id", &input.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Admin for user {} already exists",
            input.user_id
        )));
    }

    let admin = Admin {
        id: Uuid::new_v4().to_string(),
        user_id: input.user_id,
        permissions: input.permissions,
    };
    app.store
        .insert(collections::ADMINS, &admin.id, &encode_doc(&admin)?)
        .await?;
    info!("Created admin {} for user {}", admin.id, admin.user_id);
    Ok(admin)
}

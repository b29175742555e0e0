// Message resolvers. Every operation resolves the caller's identity from
// the session before touching the store.

use async_graphql::{Context, ErrorExtensions, Object, Result};
use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::graphql::{decode_doc, encode_doc, fetch_all, AppContext};
use crate::models::{collections, Message, NewMessage, Participant};
use crate::session::Session;

fn require_session<'a>(ctx: &'a Context<'_>) -> Result<&'a Session> {
    ctx.data_opt::<Session>().ok_or_else(|| {
        AppError::Authentication("Not authenticated".to_string()).extend()
    })
}

#[derive(Default)]
pub struct MessageQuery;

#[Object]
impl MessageQuery {
    /// Messages the caller sent or received.
    async fn messages(&self, ctx: &Context<'_>) -> Result<Vec<Message>> {
        let session = require_session(ctx)?;
        let app = ctx.data::<AppContext>()?;

        let all: Vec<Message> = fetch_all(&app.store, collections::MESSAGES)
            .await
            .map_err(|e| e.extend())?;
        Ok(all
            .into_iter()
            .filter(|m| m.sender.id == session.user_id || m.receiver.id == session.user_id)
            .collect())
    }

    async fn message(&self, ctx: &Context<'_>, id: String) -> Result<Message> {
        let session = require_session(ctx)?;
        let app = ctx.data::<AppContext>()?;

        let message = get_message(app, &id).await.map_err(|e| e.extend())?;
        if message.sender.id != session.user_id && message.receiver.id != session.user_id {
            return Err(AppError::Authentication(
                "Not a participant in this message".to_string(),
            )
            .extend());
        }
        Ok(message)
    }
}

#[derive(Default)]
pub struct MessageMutation;

#[Object]
impl MessageMutation {
    async fn add_message(&self, ctx: &Context<'_>, input: NewMessage) -> Result<Message> {
        let session = require_session(ctx)?.clone();
        let app = ctx.data::<AppContext>()?;
        create_message(app, &session, input)
            .await
            .map_err(|e| e.extend())
    }

    /// Marks a received message as read; only the receiver may do this.
    async fn mark_message_read(&self, ctx: &Context<'_>, id: String) -> Result<Message> {
        let session = require_session(ctx)?.clone();
        let app = ctx.data::<AppContext>()?;

        let message = get_message(app, &id).await.map_err(|e| e.extend())?;
        if message.receiver.id != session.user_id {
            return Err(AppError::Authentication(
                "Only the receiver can mark a message read".to_string(),
            )
            .extend());
        }

        let doc = app
            .store
            .merge(collections::MESSAGES, &id, &json!({ "read": true }))
            .await
            .map_err(|e| e.extend())?
            .ok_or_else(|| AppError::NotFound("Message not found".to_string()).extend())?;
        decode_doc(doc).map_err(|e| e.extend())
    }

    /// Removes a message; only the sender may do this. Returns the deleted
    /// message.
    async fn delete_message(&self, ctx: &Context<'_>, id: String) -> Result<Message> {
        let session = require_session(ctx)?.clone();
        let app = ctx.data::<AppContext>()?;

        let message = get_message(app, &id).await.map_err(|e| e.extend())?;
        if message.sender.id != session.user_id {
            return Err(AppError::Authentication(
                "Only the sender can delete a message".to_string(),
            )
            .extend());
        }

        let doc = app
            .store
            .remove(collections::MESSAGES, &id)
            .await
            .map_err(|e| e.extend())?
            .ok_or_else(|| AppError::NotFound("Message not found".to_string()).extend())?;
        decode_doc(doc).map_err(|e| e.extend())
    }
}

async fn get_message(app: &AppContext, id: &str) -> AppResult<Message> {
    let doc = app
        .store
        .get(collections::MESSAGES, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Message not found".to_string()))?;
    decode_doc(doc)
}

async fn create_message(
    app: &AppContext,
    session: &Session,
    input: NewMessage,
) -> AppResult<Message> {
    if input.content.trim().is_empty() {
        return Err(AppError::Validation("Content is required".to_string()));
    }
    if app
        .store
        .get(collections::USERS, &input.receiver.id)
        .await?
        .is_none()
    {
        return Err(AppError::Validation(format!(
            "Receiver {} does not exist",
            input.receiver.id
        )));
    }

    let message = Message {
        id: Uuid::new_v4().to_string(),
        content: input.content,
        sender: Participant {
            id: session.user_id.clone(),
            role: session.role,
        },
        receiver: input.receiver,
        timestamp: Utc::now(),
        read: false,
    };
    app.store
        .insert(collections::MESSAGES, &message.id, &encode_doc(&message)?)
        .await?;
    info!(
        "Message {} sent from {} to {}",
        message.id, message.sender.id, message.receiver.id
    );
    Ok(message)
}

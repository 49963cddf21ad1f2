use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::{
    error::{AppError, ServiceError},
    models::{comment::CreateCommentRequest, query::ListCommentsParams},
    service::CommentService,
    utils::json::threads_envelope,
};

/// Create a new comment, optionally as a reply.
pub async fn create_comment(
    State(service): State<Arc<CommentService>>,
    State(shutdown): State<CancellationToken>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|e| {
        tracing::debug!("Rejected comment payload: {}", e);
        ServiceError::InvalidJson
    })?;

    payload
        .validate()
        .map_err(|e| ServiceError::Validation(e.to_string()))?;

    let cancel = shutdown.child_token();
    let id = service.create_comment(payload.into(), &cancel).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "result": id })),
    ))
}

/// List a page of comment threads.
/// With `parent`, returns only the thread rooted at that comment.
pub async fn list_comments(
    State(service): State<Arc<CommentService>>,
    State(shutdown): State<CancellationToken>,
    Query(params): Query<ListCommentsParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = params.normalize()?;

    let cancel = shutdown.child_token();
    let threads = service.list_threads(&query, &cancel).await?;

    let body = threads_envelope(&threads).map_err(|e| {
        tracing::error!("Failed to encode comment threads: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

/// Delete a single comment. Its replies are kept.
pub async fn delete_comment(
    State(service): State<Arc<CommentService>>,
    State(shutdown): State<CancellationToken>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = id
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(ServiceError::InvalidCommentId)?;

    let cancel = shutdown.child_token();
    service.delete_comment(id, &cancel).await?;

    Ok(Json(serde_json::json!({ "result": "deleted" })))
}

// src/service/mod.rs

pub mod tree;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    error::ServiceError,
    models::{
        comment::{Comment, NewComment},
        query::QueryDescriptor,
    },
    repository::{CommentStore, StoreError},
    utils::html::clean_html,
};

/// Comment creation, deletion and thread retrieval.
///
/// Holds no per-request state; all coordination between concurrent
/// requests is left to the store.
#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn CommentStore>,
}

impl CommentService {
    pub fn new(store: Arc<dyn CommentStore>) -> Self {
        Self { store }
    }

    /// Validates and inserts a comment, returning its new id.
    pub async fn create_comment(
        &self,
        comment: NewComment,
        cancel: &CancellationToken,
    ) -> Result<i64, ServiceError> {
        let comment = validate_comment(comment)?;

        self.store
            .create_comment(&comment, cancel)
            .await
            .map_err(|e| match e {
                StoreError::ParentNotFound => ServiceError::ParentNotFound,
                other => internal("create_comment", comment.parent_id, other),
            })
    }

    /// Returns the requested page of threads, each root expanded to its
    /// full reply tree. Any store failure aborts the whole page.
    pub async fn list_threads(
        &self,
        query: &QueryDescriptor,
        cancel: &CancellationToken,
    ) -> Result<Vec<Comment>, ServiceError> {
        let roots = self
            .store
            .get_root_comments(query, cancel)
            .await
            .map_err(|e| internal("get_root_comments", query.parent_id, e))?;

        let mut threads = Vec::with_capacity(roots.len());
        for root in roots {
            let flat = self
                .store
                .get_comment_tree(root.id, cancel)
                .await
                .map_err(|e| internal("get_comment_tree", Some(root.id), e))?;

            // Seeded from a single id, so at most one tree comes back.
            if let Some(thread) = tree::assemble(flat).into_iter().next() {
                threads.push(thread);
            }
        }

        Ok(threads)
    }

    /// Deletes a single comment. Replies are not touched.
    pub async fn delete_comment(
        &self,
        id: i64,
        cancel: &CancellationToken,
    ) -> Result<(), ServiceError> {
        self.store
            .delete_comment(id, cancel)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => ServiceError::CommentNotFound,
                other => internal("delete_comment", Some(id), other),
            })
    }
}

fn validate_comment(comment: NewComment) -> Result<NewComment, ServiceError> {
    if comment.content.trim().is_empty() {
        return Err(ServiceError::EmptyContent);
    }
    if comment.author.trim().is_empty() {
        return Err(ServiceError::EmptyAuthor);
    }

    // Markup-only content (a bare script tag) counts as empty; anything
    // else is stored exactly as posted and escaped by whoever renders it.
    if clean_html(&comment.content).trim().is_empty() {
        return Err(ServiceError::EmptyContent);
    }

    Ok(comment)
}

/// Logs a store failure once and hides it behind a generic error.
fn internal(operation: &'static str, id: Option<i64>, err: StoreError) -> ServiceError {
    match err {
        StoreError::Cancelled => {
            tracing::info!(operation, id = ?id, "Store operation cancelled");
            ServiceError::Cancelled
        }
        err => {
            tracing::error!(operation, id = ?id, "Store operation failed: {:?}", err);
            ServiceError::Internal
        }
    }
}

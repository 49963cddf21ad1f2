// src/repository/mod.rs

pub mod postgres;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::models::{
    comment::{Comment, NewComment},
    query::QueryDescriptor,
};

pub use postgres::PgCommentStore;

const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Errors surfaced by a [`CommentStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The referenced parent comment does not exist.
    #[error("parent comment does not exist")]
    ParentNotFound,
    /// The statement affected no rows.
    #[error("no rows affected")]
    NotFound,
    #[error("operation cancelled")]
    Cancelled,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Whether the failure is worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Database(err) => is_transient_sqlx(err),
            _ => false,
        }
    }

    /// Maps a foreign key violation to [`StoreError::ParentNotFound`].
    pub(crate) fn from_insert(err: sqlx::Error) -> Self {
        let is_fk = err
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| code == FOREIGN_KEY_VIOLATION);

        if is_fk {
            StoreError::ParentNotFound
        } else {
            StoreError::Database(err)
        }
    }
}

fn is_transient_sqlx(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db) => db.code().is_some_and(|code| {
            code.starts_with("08")
                || matches!(&*code, "40001" | "40P01" | "57P01" | "57P02" | "57P03")
        }),
        _ => false,
    }
}

/// Storage collaborator for comments.
///
/// Every call takes the caller's cancellation token; implementations are
/// expected to stop work and return [`StoreError::Cancelled`] once it fires.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Inserts a comment and returns the id assigned by the store.
    async fn create_comment(
        &self,
        comment: &NewComment,
        cancel: &CancellationToken,
    ) -> Result<i64, StoreError>;

    /// One page of root comments, or the single comment named by
    /// `query.parent_id` (pagination is ignored in that mode).
    async fn get_root_comments(
        &self,
        query: &QueryDescriptor,
        cancel: &CancellationToken,
    ) -> Result<Vec<Comment>, StoreError>;

    /// The comment `root_id` and all of its transitive replies, flat and
    /// ascending by `created_at`.
    async fn get_comment_tree(
        &self,
        root_id: i64,
        cancel: &CancellationToken,
    ) -> Result<Vec<Comment>, StoreError>;

    /// Removes one comment. Replies are left in place.
    async fn delete_comment(&self, id: i64, cancel: &CancellationToken) -> Result<(), StoreError>;
}

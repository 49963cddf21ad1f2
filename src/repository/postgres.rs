// src/repository/postgres.rs

use async_trait::async_trait;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use super::{CommentStore, StoreError};
use crate::{
    models::{
        comment::{Comment, NewComment},
        query::{QueryDescriptor, SortOrder},
    },
    utils::retry::{RetryStrategy, with_retry},
};

// The parent row is key-share locked, so a concurrent delete either
// commits first (no row, no insert) or waits for this insert to commit.
const INSERT_COMMENT: &str = r#"
    WITH parent AS (
        SELECT id FROM comments WHERE id = $1::BIGINT FOR KEY SHARE
    )
    INSERT INTO comments (parent_id, content, author)
    SELECT $1::BIGINT, $2::TEXT, $3::TEXT
    WHERE $1::BIGINT IS NULL
       OR EXISTS (SELECT 1 FROM parent)
    RETURNING id
"#;

const ROOT_PAGE_DESC: &str = r#"
    SELECT id, parent_id, content, author, created_at, updated_at
    FROM comments
    WHERE parent_id IS NULL
    ORDER BY created_at DESC, id DESC
    LIMIT $1 OFFSET $2
"#;

const ROOT_PAGE_ASC: &str = r#"
    SELECT id, parent_id, content, author, created_at, updated_at
    FROM comments
    WHERE parent_id IS NULL
    ORDER BY created_at ASC, id ASC
    LIMIT $1 OFFSET $2
"#;

const SINGLE_COMMENT: &str = r#"
    SELECT id, parent_id, content, author, created_at, updated_at
    FROM comments
    WHERE id = $1
"#;

// UNION (not UNION ALL) so the fixed point is reached even on bad data.
const COMMENT_TREE: &str = r#"
    WITH RECURSIVE tree AS (
        SELECT id, parent_id, content, author, created_at, updated_at
        FROM comments
        WHERE id = $1

        UNION

        SELECT c.id, c.parent_id, c.content, c.author, c.created_at, c.updated_at
        FROM comments c
        JOIN tree t ON c.parent_id = t.id
    )
    SELECT id, parent_id, content, author, created_at, updated_at
    FROM tree
    ORDER BY created_at ASC, id ASC
"#;

const DELETE_COMMENT: &str = "DELETE FROM comments WHERE id = $1";

/// Postgres-backed [`CommentStore`]. Every statement runs under the
/// configured retry strategy.
#[derive(Clone)]
pub struct PgCommentStore {
    pool: PgPool,
    retry: RetryStrategy,
}

impl PgCommentStore {
    pub fn new(pool: PgPool, retry: RetryStrategy) -> Self {
        Self { pool, retry }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl CommentStore for PgCommentStore {
    async fn create_comment(
        &self,
        comment: &NewComment,
        cancel: &CancellationToken,
    ) -> Result<i64, StoreError> {
        let pool = &self.pool;

        let inserted = with_retry(&self.retry, cancel, "create_comment", || async move {
            sqlx::query_scalar::<_, i64>(INSERT_COMMENT)
                .bind(comment.parent_id)
                .bind(comment.content.as_str())
                .bind(comment.author.as_str())
                .fetch_optional(pool)
                .await
                .map_err(StoreError::from_insert)
        })
        .await?;

        inserted.ok_or(StoreError::ParentNotFound)
    }

    async fn get_root_comments(
        &self,
        query: &QueryDescriptor,
        cancel: &CancellationToken,
    ) -> Result<Vec<Comment>, StoreError> {
        let pool = &self.pool;
        let query = *query;

        with_retry(&self.retry, cancel, "get_root_comments", || async move {
            let rows = match query.parent_id {
                Some(id) => {
                    sqlx::query_as::<_, Comment>(SINGLE_COMMENT)
                        .bind(id)
                        .fetch_all(pool)
                        .await?
                }
                None => {
                    let sql = match query.sort {
                        SortOrder::CreatedAtAsc => ROOT_PAGE_ASC,
                        SortOrder::CreatedAtDesc => ROOT_PAGE_DESC,
                    };
                    sqlx::query_as::<_, Comment>(sql)
                        .bind(query.limit)
                        .bind(query.offset)
                        .fetch_all(pool)
                        .await?
                }
            };
            Ok::<_, StoreError>(rows)
        })
        .await
    }

    async fn get_comment_tree(
        &self,
        root_id: i64,
        cancel: &CancellationToken,
    ) -> Result<Vec<Comment>, StoreError> {
        let pool = &self.pool;

        with_retry(&self.retry, cancel, "get_comment_tree", || async move {
            let rows = sqlx::query_as::<_, Comment>(COMMENT_TREE)
                .bind(root_id)
                .fetch_all(pool)
                .await?;
            Ok::<_, StoreError>(rows)
        })
        .await
    }

    async fn delete_comment(&self, id: i64, cancel: &CancellationToken) -> Result<(), StoreError> {
        let pool = &self.pool;

        let result = with_retry(&self.retry, cancel, "delete_comment", || async move {
            let result = sqlx::query(DELETE_COMMENT).bind(id).execute(pool).await?;
            Ok::<_, StoreError>(result)
        })
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}

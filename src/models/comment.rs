use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'comments' table in the database.
///
/// `children` is never stored; it is filled in by the tree assembler
/// when a flat subtree is turned into a nested thread. Threads can nest
/// arbitrarily deep; dropping and encoding (`utils::json`) are iterative.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Comment {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub content: String,
    pub author: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,

    #[sqlx(skip)]
    pub children: Vec<Comment>,
}

impl Drop for Comment {
    // Detach descendants onto a heap stack so each node is dropped with no
    // children left; the default glue would recurse once per level.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// A comment about to be inserted. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub parent_id: Option<i64>,
    pub content: String,
    pub author: String,
}

/// DTO for creating a new comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(max = 10000, message = "Content must be at most 10000 characters"))]
    pub content: String,

    #[validate(length(max = 100, message = "Author must be at most 100 characters"))]
    pub author: String,

    /// Optional: the ID of the comment being replied to.
    pub parent_id: Option<i64>,
}

impl From<CreateCommentRequest> for NewComment {
    fn from(request: CreateCommentRequest) -> Self {
        Self {
            parent_id: request.parent_id,
            content: request.content,
            author: request.author,
        }
    }
}

// src/utils/json.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::comment::Comment;

/// The scalar fields of a comment, in wire order.
#[derive(Serialize)]
struct CommentFields<'a> {
    id: i64,
    parent_id: Option<i64>,
    content: &'a str,
    author: &'a str,
    created_at: &'a DateTime<Utc>,
    updated_at: &'a DateTime<Utc>,
}

/// Encodes `{"result": threads}` with each comment carrying a nested
/// `children` array.
///
/// The forest is walked with an explicit stack, so stack usage does not
/// grow with thread depth. Only the scalar fields go through serde.
pub fn threads_envelope(threads: &[Comment]) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(128 * threads.len().max(1));
    out.extend_from_slice(br#"{"result":["#);

    // Each frame is a sibling list and the index of the next one to write.
    // Closing a frame ends its array and the object that owns it; the
    // outermost owner is the envelope itself.
    let mut stack: Vec<(&[Comment], usize)> = vec![(threads, 0)];
    while let Some(frame) = stack.last_mut() {
        let (siblings, next) = *frame;
        if next == siblings.len() {
            stack.pop();
            out.extend_from_slice(b"]}");
            continue;
        }
        frame.1 += 1;

        if next > 0 {
            out.push(b',');
        }
        let node = &siblings[next];
        write_fields(&mut out, node)?;
        out.extend_from_slice(br#","children":["#);
        stack.push((node.children.as_slice(), 0));
    }

    Ok(out)
}

/// Writes the comment object minus its closing brace.
fn write_fields(out: &mut Vec<u8>, comment: &Comment) -> serde_json::Result<()> {
    let fields = CommentFields {
        id: comment.id,
        parent_id: comment.parent_id,
        content: &comment.content,
        author: &comment.author,
        created_at: &comment.created_at,
        updated_at: &comment.updated_at,
    };
    serde_json::to_writer(&mut *out, &fields)?;
    out.pop();
    Ok(())
}

// src/service/tree.rs

use std::collections::HashMap;

use crate::models::comment::Comment;

/// Turns a flat list of comments into a forest.
///
/// A comment becomes a root when its `parent_id` is null or names a comment
/// that is not in `comments` (an orphan). Roots keep the order in which they
/// appear in the input; children are ordered by `created_at`, then `id`.
/// Input order is otherwise irrelevant: a parent may come after its replies.
pub fn assemble(comments: Vec<Comment>) -> Vec<Comment> {
    let mut index: HashMap<i64, usize> = HashMap::with_capacity(comments.len());
    for (pos, comment) in comments.iter().enumerate() {
        index.entry(comment.id).or_insert(pos);
    }

    let mut roots = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];

    for (pos, comment) in comments.iter().enumerate() {
        let parent = comment
            .parent_id
            .filter(|parent_id| *parent_id != comment.id)
            .and_then(|parent_id| index.get(&parent_id).copied());

        match parent {
            Some(parent_pos) => children[parent_pos].push(pos),
            None => roots.push(pos),
        }
    }

    for kids in children.iter_mut() {
        kids.sort_by(|&a, &b| {
            (comments[a].created_at, comments[a].id).cmp(&(comments[b].created_at, comments[b].id))
        });
    }

    // Breadth-first order from the roots; walked backwards every node is
    // finished before its parent needs it. Nodes caught in a parent cycle
    // are never reached and are dropped.
    let mut order = Vec::with_capacity(comments.len());
    order.extend(roots.iter().copied());
    let mut cursor = 0;
    while cursor < order.len() {
        let pos = order[cursor];
        order.extend(children[pos].iter().copied());
        cursor += 1;
    }

    let mut slots: Vec<Option<Comment>> = comments.into_iter().map(Some).collect();
    for &pos in order.iter().rev() {
        let attached: Vec<Comment> = children[pos]
            .iter()
            .filter_map(|&child| slots[child].take())
            .collect();
        if let Some(node) = slots[pos].as_mut() {
            node.children = attached;
        }
    }

    roots.into_iter().filter_map(|pos| slots[pos].take()).collect()
}

// tests/store_tests.rs

mod common;

use comment_threads::{
    models::{comment::NewComment, query::{QueryDescriptor, SortOrder}},
    repository::{CommentStore, StoreError},
    service::tree::assemble,
};
use tokio_util::sync::CancellationToken;

fn new_comment(content: &str, parent_id: Option<i64>) -> NewComment {
    NewComment {
        parent_id,
        content: content.to_string(),
        author: "test".to_string(),
    }
}

#[tokio::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn create_with_missing_parent_fails() {
    let db = common::test_db().await;
    let store = common::store(&db);
    let cancel = CancellationToken::new();

    let err = store
        .create_comment(&new_comment("Invalid parent", Some(999_999_999)), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::ParentNotFound), "unexpected error: {err:?}");
}

#[tokio::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn reply_racing_a_parent_delete_is_rejected() {
    let db = common::test_db().await;
    let store = common::store(&db);
    let cancel = CancellationToken::new();

    let parent = store.create_comment(&new_comment("Parent", None), &cancel).await.unwrap();

    // Hold the delete open so the reply has to wait on the parent row.
    let mut tx = db.pool.begin().await.unwrap();
    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(parent)
        .execute(&mut *tx)
        .await
        .unwrap();

    let replier = store.clone();
    let reply = tokio::spawn(async move {
        replier
            .create_comment(&new_comment("Reply", Some(parent)), &CancellationToken::new())
            .await
    });

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    tx.commit().await.unwrap();

    let err = reply.await.unwrap().unwrap_err();
    assert!(matches!(err, StoreError::ParentNotFound), "unexpected error: {err:?}");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn delete_removes_one_row() {
    let db = common::test_db().await;
    let store = common::store(&db);
    let cancel = CancellationToken::new();

    let id = store.create_comment(&new_comment("To be deleted", None), &cancel).await.unwrap();
    store.delete_comment(id, &cancel).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE id = $1")
        .bind(id)
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
    assert!(store.get_comment_tree(id, &cancel).await.unwrap().is_empty());

    let err = store.delete_comment(999_999, &cancel).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn comment_tree_is_flat_and_ordered() {
    let db = common::test_db().await;
    let store = common::store(&db);
    let cancel = CancellationToken::new();

    let root = store.create_comment(&new_comment("Root", None), &cancel).await.unwrap();
    let child = store.create_comment(&new_comment("Child", Some(root)), &cancel).await.unwrap();
    let grandchild = store
        .create_comment(&new_comment("Grandchild", Some(child)), &cancel)
        .await
        .unwrap();
    let unrelated = store.create_comment(&new_comment("Other", None), &cancel).await.unwrap();

    let flat = store.get_comment_tree(root, &cancel).await.unwrap();
    assert_eq!(
        flat.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![root, child, grandchild]
    );
    assert!(flat.iter().all(|c| c.id != unrelated));

    let forest = assemble(flat);
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].id, root);
    assert_eq!(forest[0].children[0].id, child);
    assert_eq!(forest[0].children[0].children[0].id, grandchild);

    assert!(store.get_comment_tree(999_999, &cancel).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn root_pages_follow_sort_and_parent_scope() {
    let db = common::test_db().await;
    let store = common::store(&db);
    let cancel = CancellationToken::new();

    let r1 = store.create_comment(&new_comment("Root1", None), &cancel).await.unwrap();
    let r2 = store.create_comment(&new_comment("Root2", None), &cancel).await.unwrap();
    let r3 = store.create_comment(&new_comment("Root3", None), &cancel).await.unwrap();
    store.create_comment(&new_comment("Child", Some(r1)), &cancel).await.unwrap();

    let mut query = QueryDescriptor {
        limit: 2,
        ..QueryDescriptor::default()
    };

    let roots = store.get_root_comments(&query, &cancel).await.unwrap();
    assert_eq!(roots.iter().map(|c| c.id).collect::<Vec<_>>(), vec![r3, r2]);

    query.sort = SortOrder::CreatedAtAsc;
    let roots = store.get_root_comments(&query, &cancel).await.unwrap();
    assert_eq!(roots.iter().map(|c| c.id).collect::<Vec<_>>(), vec![r1, r2]);

    query.offset = 2;
    let roots = store.get_root_comments(&query, &cancel).await.unwrap();
    assert_eq!(roots.iter().map(|c| c.id).collect::<Vec<_>>(), vec![r3]);

    query.parent_id = Some(r2);
    let roots = store.get_root_comments(&query, &cancel).await.unwrap();
    assert_eq!(roots.iter().map(|c| c.id).collect::<Vec<_>>(), vec![r2]);

    query.parent_id = Some(999_999);
    assert!(store.get_root_comments(&query, &cancel).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn deleting_a_parent_leaves_orphans() {
    let db = common::test_db().await;
    let store = common::store(&db);
    let cancel = CancellationToken::new();

    let root = store.create_comment(&new_comment("Root", None), &cancel).await.unwrap();
    let child = store.create_comment(&new_comment("Child", Some(root)), &cancel).await.unwrap();
    let grandchild = store
        .create_comment(&new_comment("Grandchild", Some(child)), &cancel)
        .await
        .unwrap();

    store.delete_comment(child, &cancel).await.unwrap();

    let flat = store.get_comment_tree(root, &cancel).await.unwrap();
    assert_eq!(flat.len(), 1);

    let orphan_tree = assemble(store.get_comment_tree(grandchild, &cancel).await.unwrap());
    assert_eq!(orphan_tree.len(), 1);
    assert_eq!(orphan_tree[0].parent_id, Some(child));
}

#[tokio::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn cancelled_calls_do_not_touch_the_store() {
    let db = common::test_db().await;
    let store = common::store(&db);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = store.create_comment(&new_comment("never", None), &cancel).await.unwrap_err();
    assert!(matches!(err, StoreError::Cancelled));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

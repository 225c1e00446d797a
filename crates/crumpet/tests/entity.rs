mod support;

use crumpet::stmt::Value;
use support::{
    models::{Account, Comment, Post, Tag, ACCOUNTS_DELETED},
    row, Scripted,
};

use chrono::Timelike;
use pretty_assertions::assert_eq;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn new_entity_is_dirty_until_saved() {
    let driver = Scripted::new();
    let db = driver.db().await;
    let log = driver.log();

    let mut post = db.instance::<Post>().unwrap();
    assert!(!post.exists());
    assert!(post.dirty());

    post.fill([("title", "Hello")]);
    post.save(&db).await.unwrap();

    assert_eq!(
        log.statements(),
        [r#"INSERT INTO "posts" ("title") VALUES (?)"#]
    );
    assert!(post.exists());
    assert!(!post.dirty());
    assert_eq!(post.key(), Some(&Value::I64(1)));
    assert_eq!(post.original().get("id"), Some(&Value::I64(1)));
}

#[tokio::test]
async fn set_marks_only_changed_attributes() {
    let driver = Scripted::new();
    driver.rows(vec![row([
        ("id", Value::I64(7)),
        ("title", Value::from("Draft")),
        ("body", Value::from("...")),
    ])]);

    let db = driver.db().await;
    let log = driver.log();

    let mut post = db.find::<Post>(7).await.unwrap().unwrap();
    assert!(!post.dirty());

    post.set("title", "Final");
    assert!(post.dirty());
    assert_eq!(
        post.get_dirty().into_iter().collect::<Vec<_>>(),
        [("title".to_string(), Value::from("Final"))]
    );

    // Setting an attribute back to its original value cleans it
    post.set("title", "Draft");
    assert!(!post.dirty());

    post.set("title", "Final");
    post.save(&db).await.unwrap();
    assert!(!post.dirty());

    assert_eq!(
        log.statements(),
        [
            r#"SELECT * FROM "posts" WHERE "posts"."id" = ? LIMIT 1"#,
            r#"UPDATE "posts" SET "title" = ? WHERE "id" = ?"#,
        ]
    );
    assert_eq!(log.bindings(1), [Value::from("Final"), Value::I64(7)]);
}

#[tokio::test]
async fn changed_key_writes_through_the_stored_key() {
    let driver = Scripted::new();
    driver.rows(vec![row([("id", Value::I64(7)), ("title", Value::from("Draft"))])]);

    let db = driver.db().await;
    let log = driver.log();

    let mut post = db.find_or_fail::<Post>(7).await.unwrap();
    post.set("id", 9);
    post.save(&db).await.unwrap();

    assert_eq!(
        log.statements()[1],
        r#"UPDATE "posts" SET "id" = ? WHERE "id" = ?"#
    );
    assert_eq!(log.bindings(1), [Value::I64(9), Value::I64(7)]);

    // After saving, the new key is the stored one
    post.delete(&db).await.unwrap();
    assert_eq!(log.bindings(2), [Value::I64(9)]);

    // Deleting with an unsaved key change removes the stored row
    driver.rows(vec![row([("id", Value::I64(8)), ("title", Value::from("Other"))])]);
    let mut other = db.find_or_fail::<Post>(8).await.unwrap();
    other.set("id", 10);
    other.delete(&db).await.unwrap();

    assert_eq!(log.statements()[4], r#"DELETE FROM "posts" WHERE "id" = ?"#);
    assert_eq!(log.bindings(4), [Value::I64(8)]);
}

#[tokio::test]
async fn saving_a_clean_entity_is_a_no_op() {
    let driver = Scripted::new();
    let db = driver.db().await;
    let log = driver.log();

    let mut post = db.create::<Post>([("title", "Hello")]).await.unwrap();
    log.clear();

    post.save(&db).await.unwrap();
    assert!(log.is_empty());
}

#[tokio::test]
async fn fill_respects_the_allow_list() {
    let driver = Scripted::new();
    let db = driver.db().await;

    let mut post = db.instance::<Post>().unwrap();
    post.fill([("title", "Hello"), ("admin_note", "ignored")]);

    assert!(post.has("title"));
    assert!(!post.has("admin_note"));

    post.fill_raw([("admin_note", "kept")]);
    assert_eq!(post.get("admin_note"), Some(&Value::from("kept")));

    // No allow-list accepts everything
    let mut comment = db.instance::<Comment>().unwrap();
    comment.fill([("body", Value::from("Nice")), ("post_id", Value::I64(1))]);
    assert_eq!(comment.attributes().len(), 2);
}

#[tokio::test]
async fn remove_drops_an_attribute() {
    let driver = Scripted::new();
    let db = driver.db().await;

    let mut post = db.instance::<Post>().unwrap();
    post.set("title", "Hello").set("body", "Text");

    assert_eq!(post.remove("body"), Some(Value::from("Text")));
    assert!(!post.has("body"));
    assert_eq!(post.remove("body"), None);
}

#[tokio::test]
async fn timestamps_are_stamped_in_whole_seconds() {
    let driver = Scripted::new();
    let db = driver.db().await;
    let log = driver.log();

    let tag = db.create::<Tag>([("name", "rust")]).await.unwrap();

    let created_at = tag.get("created_at").and_then(Value::as_timestamp).unwrap();
    let updated_at = tag.get("updated_at").and_then(Value::as_timestamp).unwrap();

    assert_eq!(created_at, updated_at);
    assert_eq!(created_at.nanosecond(), 0);

    assert_eq!(
        log.statements(),
        [r#"INSERT INTO "tags" ("name", "updated_at", "created_at") VALUES (?, ?, ?)"#]
    );

    // Timestamps are bound as text
    assert_eq!(
        log.bindings(0)[1],
        Value::from(created_at.format("%Y-%m-%d %H:%M:%S").to_string())
    );
}

#[tokio::test]
async fn touch_updates_the_timestamp() {
    let driver = Scripted::new();
    driver.rows(vec![row([
        ("id", Value::I64(3)),
        ("name", Value::from("rust")),
        ("updated_at", Value::from("2020-01-01 00:00:00")),
    ])]);

    let db = driver.db().await;
    let log = driver.log();

    let mut tag = db.find_or_fail::<Tag>(3).await.unwrap();
    tag.touch(&db).await.unwrap();

    assert_eq!(
        log.statements()[1],
        r#"UPDATE "tags" SET "updated_at" = ? WHERE "id" = ?"#
    );
    assert!(!tag.dirty());
}

#[tokio::test]
async fn saving_hook_can_reject_and_rewrite() {
    let driver = Scripted::new();
    let db = driver.db().await;
    let log = driver.log();

    let err = db.create::<Account>([("name", "")]).await.unwrap_err();
    assert_eq!(err.to_string(), "account name is required");
    assert!(log.is_empty());

    let account = db.create::<Account>([("name", "  ada ")]).await.unwrap();
    assert_eq!(account.get("name"), Some(&Value::from("ada")));
    assert_eq!(log.bindings(0), [Value::from("ada")]);
}

#[tokio::test]
async fn delete_runs_hooks_and_keeps_attributes() {
    let driver = Scripted::new();
    let db = driver.db().await;
    let log = driver.log();

    let mut account = db.create::<Account>([("name", "ada")]).await.unwrap();
    log.clear();

    let deleted = ACCOUNTS_DELETED.load(Ordering::SeqCst);
    account.delete(&db).await.unwrap();

    assert_eq!(log.statements(), [r#"DELETE FROM "accounts" WHERE "id" = ?"#]);
    assert!(!account.exists());
    assert_eq!(account.get("name"), Some(&Value::from("ada")));
    assert_eq!(ACCOUNTS_DELETED.load(Ordering::SeqCst), deleted + 1);

    // Deleting again does nothing
    account.delete(&db).await.unwrap();
    assert_eq!(log.len(), 1);
}

#[tokio::test]
async fn find_or_fail_reports_the_missing_key() {
    let driver = Scripted::new();
    let db = driver.db().await;

    let err = db.find_or_fail::<Post>(42).await.unwrap_err();

    assert!(err.is_entity_not_found());
    assert_eq!(err.to_string(), "entity not found: table=posts key=42");
}

#[tokio::test]
async fn to_map_includes_loaded_relationships() {
    let driver = Scripted::new();
    driver
        .rows(vec![row([
            ("id", Value::I64(1)),
            ("title", Value::from("Hello")),
        ])])
        .rows(vec![row([
            ("id", Value::I64(10)),
            ("post_id", Value::I64(1)),
            ("body", Value::from("First")),
        ])]);

    let db = driver.db().await;

    let post = db
        .query::<Post>()
        .unwrap()
        .with(["comments"])
        .first()
        .await
        .unwrap()
        .unwrap();

    let map = serde_json::Value::Object(post.to_map());

    assert_eq!(
        map,
        serde_json::json!({
            "id": 1,
            "title": "Hello",
            "comments": [{ "id": 10, "post_id": 1, "body": "First" }],
        })
    );
}

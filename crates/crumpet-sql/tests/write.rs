use crumpet_core::{
    driver::operation::Transaction,
    stmt::{raw, Delete, Insert, Query, Statement, Truncate, Update, Value},
};
use crumpet_sql::Serializer;

use pretty_assertions::assert_eq;

fn serialize(serializer: Serializer, stmt: impl Into<Statement>) -> (String, Vec<Value>) {
    let mut params: Vec<Value> = vec![];
    let sql = serializer.serialize(&stmt.into(), &mut params).unwrap();
    (sql, params)
}

fn two_users() -> Insert {
    let mut insert = Insert::new("users", ["name", "votes"]);
    insert
        .push_row([Value::from("ann"), Value::from(1)])
        .push_row([Value::from("bob"), Value::from(2)]);
    insert
}

#[test]
fn insert_single_row() {
    let mut insert = Insert::new("users", ["name", "email"]);
    insert.push_row(["ann", "ann@example.com"]);

    let (sql, params) = serialize(Serializer::generic(), insert.clone());
    assert_eq!(sql, r#"INSERT INTO "users" ("name", "email") VALUES (?, ?)"#);
    assert_eq!(
        params,
        vec![Value::from("ann"), Value::from("ann@example.com")]
    );

    let (sql, _) = serialize(Serializer::sqlite(), insert);
    assert_eq!(
        sql,
        r#"INSERT INTO "users" ("name", "email") VALUES (?1, ?2)"#
    );
}

#[test]
fn insert_many_rows() {
    let (sql, params) = serialize(Serializer::mysql(), two_users());

    assert_eq!(
        sql,
        "INSERT INTO `users` (`name`, `votes`) VALUES (?, ?), (?, ?)"
    );
    assert_eq!(params.len(), 4);
}

#[test]
fn sqlite_inserts_many_rows_with_union_all() {
    let (sql, params) = serialize(Serializer::sqlite(), two_users());

    assert_eq!(
        sql,
        r#"INSERT INTO "users" ("name", "votes") SELECT ?1 AS "name", ?2 AS "votes" UNION ALL SELECT ?3 AS "name", ?4 AS "votes""#
    );
    assert_eq!(
        params,
        vec![
            Value::from("ann"),
            Value::I64(1),
            Value::from("bob"),
            Value::I64(2)
        ]
    );
}

#[test]
fn insert_without_columns() {
    let mut insert = Insert::new("users", Vec::<String>::new());
    insert.push_row(Vec::<Value>::new());

    let (sql, _) = serialize(Serializer::sqlite(), insert.clone());
    assert_eq!(sql, r#"INSERT INTO "users" DEFAULT VALUES"#);

    let (sql, _) = serialize(Serializer::mysql(), insert);
    assert_eq!(sql, "INSERT INTO `users` () VALUES ()");
}

#[test]
fn postgresql_returns_generated_key() {
    let mut insert = Insert::new("users", ["name"]);
    insert.push_row(["ann"]).returning("id");

    let (sql, _) = serialize(Serializer::postgresql(), insert);
    assert_eq!(sql, r#"INSERT INTO "users" ("name") VALUES ($1) RETURNING "id""#);
}

#[test]
fn returning_is_unsupported_elsewhere() {
    let mut insert = Insert::new("users", ["name"]);
    insert.push_row(["ann"]).returning("id");
    let stmt = Statement::from(insert);

    for serializer in [
        Serializer::generic(),
        Serializer::mysql(),
        Serializer::sqlite(),
        Serializer::sql_server(),
    ] {
        let mut params: Vec<Value> = vec![];
        let err = serializer.serialize(&stmt, &mut params).unwrap_err();
        assert!(err.is_unsupported_operation(), "{err}");
        assert!(params.is_empty());
    }
}

#[test]
fn update_binds_assignments_before_filters() {
    let mut target = Query::table("users");
    target.filter("id", 7);

    let mut update = Update::new(target);
    update.set("name", "ann").set("votes", raw(r#""votes" + 1"#));

    let (sql, params) = serialize(Serializer::postgresql(), update);

    assert_eq!(
        sql,
        r#"UPDATE "users" SET "name" = $1, "votes" = "votes" + 1 WHERE "id" = $2"#
    );
    assert_eq!(params, vec![Value::from("ann"), Value::I64(7)]);
}

#[test]
fn update_requires_assignments_and_table() {
    let mut params: Vec<Value> = vec![];

    let update = Update::new(Query::table("users"));
    let err = Serializer::generic()
        .serialize(&update.into(), &mut params)
        .unwrap_err();
    assert!(err.is_adhoc());

    let mut update = Update::new(Query::new());
    update.set("name", "ann");
    let err = Serializer::generic()
        .serialize(&update.into(), &mut params)
        .unwrap_err();
    assert!(err.is_adhoc());
}

#[test]
fn delete_by_key() {
    let mut target = Query::table("users");
    target.filter("id", 7);

    let (sql, params) = serialize(Serializer::sql_server(), Delete::new(target));

    assert_eq!(sql, "DELETE FROM [users] WHERE [id] = @P1");
    assert_eq!(params, vec![Value::I64(7)]);

    let (sql, _) = serialize(Serializer::mysql(), Delete::new(Query::table("users")));
    assert_eq!(sql, "DELETE FROM `users`");
}

#[test]
fn truncate() {
    let (sql, _) = serialize(Serializer::postgresql(), Truncate::new("users"));
    assert_eq!(sql, r#"TRUNCATE TABLE "users""#);

    let mut params: Vec<Value> = vec![];
    let err = Serializer::sqlite()
        .serialize(&Truncate::new("users").into(), &mut params)
        .unwrap_err();
    assert!(err.is_unsupported_operation());
}

#[test]
fn transactions() {
    let start = Transaction::Start;

    assert_eq!(Serializer::generic().serialize_transaction(&start), "BEGIN");
    assert_eq!(Serializer::sqlite().serialize_transaction(&start), "BEGIN");
    assert_eq!(
        Serializer::mysql().serialize_transaction(&start),
        "START TRANSACTION"
    );
    assert_eq!(
        Serializer::sql_server().serialize_transaction(&start),
        "BEGIN TRANSACTION"
    );
    assert_eq!(
        Serializer::postgresql().serialize_transaction(&Transaction::Commit),
        "COMMIT"
    );
    assert_eq!(
        Serializer::postgresql().serialize_transaction(&Transaction::Rollback),
        "ROLLBACK"
    );
}

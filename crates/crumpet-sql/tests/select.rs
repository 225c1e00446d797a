use crumpet_core::stmt::{raw, AggregateFunc, BinaryOp, JoinKind, Query, Statement, Value};
use crumpet_sql::Serializer;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

fn serialize(serializer: Serializer, stmt: impl Into<Statement>) -> (String, Vec<Value>) {
    let mut params: Vec<Value> = vec![];
    let sql = serializer.serialize(&stmt.into(), &mut params).unwrap();
    (sql, params)
}

fn users() -> Query {
    Query::table("users")
}

#[test]
fn select_all() {
    let (sql, params) = serialize(Serializer::generic(), users());

    assert_eq!(sql, r#"SELECT * FROM "users""#);
    assert!(params.is_empty());
}

#[test]
fn components_render_in_fixed_order() {
    let mut query = users();
    query
        .limit(10)
        .order_by("name")
        .filter("active", true)
        .select(["id", "name"]);

    let (sql, params) = serialize(Serializer::generic(), query);

    assert_eq!(
        sql,
        r#"SELECT "id", "name" FROM "users" WHERE "active" = ? ORDER BY "name" ASC LIMIT 10"#
    );
    assert_eq!(params, vec![Value::Bool(true)]);
}

#[test]
fn qualified_names_are_quoted_per_segment() {
    let mut query = users();
    query.select(["users.name"]);

    let (sql, _) = serialize(Serializer::mysql(), query.clone());
    assert_eq!(sql, "SELECT `users`.`name` FROM `users`");

    let (sql, _) = serialize(Serializer::generic(), query.clone());
    assert_eq!(sql, r#"SELECT "users"."name" FROM "users""#);

    let (sql, _) = serialize(Serializer::postgresql(), query.clone());
    assert_eq!(sql, r#"SELECT "users"."name" FROM "users""#);

    let (sql, _) = serialize(Serializer::sql_server(), query);
    assert_eq!(sql, "SELECT [users].[name] FROM [users]");
}

#[test]
fn aliases_and_wildcards() {
    let mut query = users();
    query.select(["users.*", "name as title", "email AS contact"]);

    let (sql, _) = serialize(Serializer::generic(), query);

    assert_eq!(
        sql,
        r#"SELECT "users".*, "name" AS "title", "email" AS "contact" FROM "users""#
    );
}

#[test]
fn quote_characters_are_escaped() {
    let mut query = Query::table(r#"we"ird"#);
    query.select(["a`b", "c]d"]);

    let (sql, _) = serialize(Serializer::generic(), query.clone());
    assert_eq!(sql, r#"SELECT "a`b", "c]d" FROM "we""ird""#);

    let (sql, _) = serialize(Serializer::mysql(), query.clone());
    assert_eq!(sql, r#"SELECT `a``b`, `c]d` FROM `we"ird`"#);

    let (sql, _) = serialize(Serializer::sql_server(), query);
    assert_eq!(sql, r#"SELECT [a`b], [c]]d] FROM [we"ird]"#);
}

#[test]
fn leading_connector_is_stripped() {
    let mut query = users();
    query.filter("a", 1).or_filter("b", 2);

    let (sql, params) = serialize(Serializer::generic(), query);
    assert_eq!(sql, r#"SELECT * FROM "users" WHERE "a" = ? OR "b" = ?"#);
    assert_eq!(params, vec![Value::I64(1), Value::I64(2)]);

    let mut query = users();
    query.or_filter("a", 1).filter("b", 2);

    let (sql, _) = serialize(Serializer::generic(), query);
    assert_eq!(sql, r#"SELECT * FROM "users" WHERE "a" = ? AND "b" = ?"#);
}

#[test]
fn placeholder_styles() {
    let mut query = users();
    query.filter("a", 1).filter("b", "two");

    let (sql, _) = serialize(Serializer::generic(), query.clone());
    assert_eq!(sql, r#"SELECT * FROM "users" WHERE "a" = ? AND "b" = ?"#);

    let (sql, _) = serialize(Serializer::mysql(), query.clone());
    assert_eq!(sql, "SELECT * FROM `users` WHERE `a` = ? AND `b` = ?");

    let (sql, _) = serialize(Serializer::postgresql(), query.clone());
    assert_eq!(sql, r#"SELECT * FROM "users" WHERE "a" = $1 AND "b" = $2"#);

    let (sql, _) = serialize(Serializer::sqlite(), query.clone());
    assert_eq!(sql, r#"SELECT * FROM "users" WHERE "a" = ?1 AND "b" = ?2"#);

    let (sql, params) = serialize(Serializer::sql_server(), query);
    assert_eq!(sql, "SELECT * FROM [users] WHERE [a] = @P1 AND [b] = @P2");
    assert_eq!(params, vec![Value::I64(1), Value::from("two")]);
}

#[test]
fn predicate_variants() {
    let mut query = users();
    query
        .filter_op("votes", BinaryOp::Gt, 100)
        .filter_op("name", BinaryOp::Like, "J%")
        .filter_in("role", ["admin", "editor"])
        .or_filter_not_in("id", [1, 2, 3])
        .filter_between("age", 18, 30)
        .filter_not_between("score", 0, 10)
        .filter_null("deleted_at")
        .or_filter_not_null("banned_at");

    let (sql, params) = serialize(Serializer::generic(), query);

    assert_eq!(
        sql,
        r#"SELECT * FROM "users" WHERE "votes" > ? AND "name" LIKE ? AND "role" IN (?, ?) OR "id" NOT IN (?, ?, ?) AND "age" BETWEEN ? AND ? AND "score" NOT BETWEEN ? AND ? AND "deleted_at" IS NULL OR "banned_at" IS NOT NULL"#
    );
    assert_eq!(params.len(), 11);
}

#[test]
fn empty_in_lists() {
    let mut query = users();
    query
        .filter_in("id", Vec::<i64>::new())
        .or_filter_not_in("id", Vec::<i64>::new());

    let (sql, params) = serialize(Serializer::generic(), query);

    assert_eq!(sql, r#"SELECT * FROM "users" WHERE 0 = 1 OR 1 = 1"#);
    assert!(params.is_empty());
}

#[test]
fn null_comparisons() {
    let mut query = users();
    query
        .filter("deleted_at", Value::Null)
        .filter_op("parent_id", BinaryOp::Ne, None::<i64>);

    let (sql, params) = serialize(Serializer::generic(), query);

    assert_eq!(
        sql,
        r#"SELECT * FROM "users" WHERE "deleted_at" IS NULL AND "parent_id" IS NOT NULL"#
    );
    assert!(params.is_empty());
}

#[test]
fn nested_groups() {
    let mut query = users();
    query.filter("a", 1).or_filter_nested(|q| {
        q.filter("b", 2).or_filter("c", 3);
    });

    let (sql, params) = serialize(Serializer::postgresql(), query);

    assert_eq!(
        sql,
        r#"SELECT * FROM "users" WHERE "a" = $1 OR ("b" = $2 OR "c" = $3)"#
    );
    assert_eq!(params, vec![Value::I64(1), Value::I64(2), Value::I64(3)]);
}

#[test]
fn empty_nested_group_is_dropped() {
    let mut query = users();
    query.filter("a", 1).filter_nested(|_| {});

    let (sql, _) = serialize(Serializer::generic(), query);
    assert_eq!(sql, r#"SELECT * FROM "users" WHERE "a" = ?"#);
}

#[test]
fn exists_shares_bindings() {
    let mut posts = Query::table("posts");
    posts
        .filter_raw(raw(r#""posts"."user_id" = "users"."id""#))
        .filter("published", true);

    let mut query = users();
    query.filter("active", true).filter_not_exists(posts.clone());
    query.or_filter_exists(posts);

    let (sql, params) = serialize(Serializer::sqlite(), query);

    assert_eq!(
        sql,
        r#"SELECT * FROM "users" WHERE "active" = ?1 AND NOT EXISTS (SELECT * FROM "posts" WHERE "posts"."user_id" = "users"."id" AND "published" = ?2) OR EXISTS (SELECT * FROM "posts" WHERE "posts"."user_id" = "users"."id" AND "published" = ?3)"#
    );
    assert_eq!(params.len(), 3);
}

#[test]
fn raw_fragments_are_inlined() {
    let mut query = users();
    query
        .select([raw("COUNT(*) AS total")])
        .filter("votes", raw("downvotes + 1"));

    let (sql, params) = serialize(Serializer::generic(), query);

    assert_eq!(
        sql,
        r#"SELECT COUNT(*) AS total FROM "users" WHERE "votes" = downvotes + 1"#
    );
    assert!(params.is_empty());
}

#[test]
fn joins() {
    let mut query = users();
    query
        .select(["users.*"])
        .join("posts", "users.id", BinaryOp::Eq, "posts.user_id")
        .left_join("avatars", "users.id", BinaryOp::Eq, "avatars.user_id")
        .join_on(JoinKind::Right, "teams", |join| {
            join.on("users.team_id", BinaryOp::Eq, "teams.id")
                .or_on("users.owner_of", BinaryOp::Eq, "teams.id");
        });

    let (sql, _) = serialize(Serializer::generic(), query);

    assert_eq!(
        sql,
        r#"SELECT "users".* FROM "users" INNER JOIN "posts" ON "users"."id" = "posts"."user_id" LEFT JOIN "avatars" ON "users"."id" = "avatars"."user_id" RIGHT JOIN "teams" ON "users"."team_id" = "teams"."id" OR "users"."owner_of" = "teams"."id""#
    );
}

#[test]
fn join_without_clauses_matches_every_row() {
    let mut query = users();
    query.join_on(JoinKind::Inner, "teams", |_| {});

    let (sql, params) = serialize(Serializer::generic(), query);

    assert_eq!(sql, r#"SELECT * FROM "users" INNER JOIN "teams" ON 1 = 1"#);
    assert!(params.is_empty());
}

#[test]
fn grouping_and_having() {
    let mut query = users();
    query
        .select(["role"])
        .group_by("role")
        .having(raw("COUNT(*)"), BinaryOp::Gt, 5)
        .or_having("role", BinaryOp::Eq, "admin");

    let (sql, params) = serialize(Serializer::postgresql(), query);

    assert_eq!(
        sql,
        r#"SELECT "role" FROM "users" GROUP BY "role" HAVING COUNT(*) > $1 OR "role" = $2"#
    );
    assert_eq!(params, vec![Value::I64(5), Value::from("admin")]);
}

#[test]
fn aggregates() {
    let mut query = users();
    query.aggregate(AggregateFunc::Count, ["*"]);

    let (sql, _) = serialize(Serializer::generic(), query);
    assert_eq!(sql, r#"SELECT COUNT(*) AS "aggregate" FROM "users""#);

    let mut query = users();
    query.distinct().aggregate(AggregateFunc::Count, ["email"]);

    let (sql, _) = serialize(Serializer::generic(), query);
    assert_eq!(
        sql,
        r#"SELECT COUNT(DISTINCT "email") AS "aggregate" FROM "users""#
    );

    let mut query = users();
    query
        .filter("active", true)
        .aggregate(AggregateFunc::Max, ["votes"]);

    let (sql, _) = serialize(Serializer::mysql(), query);
    assert_eq!(
        sql,
        "SELECT MAX(`votes`) AS `aggregate` FROM `users` WHERE `active` = ?"
    );
}

#[test]
fn distinct_select() {
    let mut query = users();
    query.distinct().select(["role"]);

    let (sql, _) = serialize(Serializer::generic(), query);
    assert_eq!(sql, r#"SELECT DISTINCT "role" FROM "users""#);
}

#[test]
fn offset_without_limit() {
    let mut query = users();
    query.offset(5);

    let (sql, _) = serialize(Serializer::sqlite(), query.clone());
    assert_eq!(sql, r#"SELECT * FROM "users" LIMIT -1 OFFSET 5"#);

    let (sql, _) = serialize(Serializer::mysql(), query.clone());
    assert_eq!(
        sql,
        "SELECT * FROM `users` LIMIT 18446744073709551615 OFFSET 5"
    );

    let (sql, _) = serialize(Serializer::postgresql(), query);
    assert_eq!(sql, r#"SELECT * FROM "users" OFFSET 5"#);
}

#[test]
fn for_page() {
    let mut query = users();
    query.for_page(3, 15);

    let (sql, _) = serialize(Serializer::generic(), query);
    assert_eq!(sql, r#"SELECT * FROM "users" LIMIT 15 OFFSET 30"#);
}

#[test]
fn timestamps_bind_as_flavor_strings() {
    let at = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 5)
        .unwrap();

    let mut query = users();
    query.filter_op("created_at", BinaryOp::Ge, at);

    let (_, params) = serialize(Serializer::postgresql(), query.clone());
    assert_eq!(params, vec![Value::from("2024-01-02 03:04:05")]);

    let (_, params) = serialize(Serializer::sql_server(), query);
    assert_eq!(params, vec![Value::from("2024-01-02 03:04:05.000")]);
}

#[test]
fn placeholder_count_matches_bindings() {
    let mut query = users();
    query
        .filter("a", 1)
        .filter_in("b", [1, 2, 3])
        .or_filter_nested(|q| {
            q.filter_between("c", 1, 2).filter("d", raw("e"));
        })
        .having("f", BinaryOp::Lt, 9)
        .limit(3);

    let (sql, params) = serialize(Serializer::generic(), query);

    assert_eq!(sql.matches('?').count(), params.len());
    assert_eq!(params.len(), 7);
}

#[test]
fn serialization_is_deterministic() {
    let mut query = users();
    query
        .select(["id", "name as title"])
        .join("posts", "users.id", BinaryOp::Eq, "posts.user_id")
        .filter("a", 1)
        .or_filter_in("b", ["x", "y"])
        .order_by_desc("id")
        .limit(5)
        .offset(10);

    for serializer in [
        Serializer::generic(),
        Serializer::postgresql(),
        Serializer::mysql(),
        Serializer::sqlite(),
        Serializer::sql_server(),
    ] {
        let first = serialize(serializer, query.clone());
        let second = serialize(serializer, query.clone());
        assert_eq!(first, second);
    }
}

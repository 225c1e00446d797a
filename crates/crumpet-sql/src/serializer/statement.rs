use super::{filter::Filters, Comma, Delimited, Flavor, Formatter, Ident, Name, Params, ToSql};

use crumpet_core::stmt::{self, Direction, Statement};

/// Largest row count MySQL accepts; it has no syntax for an offset without
/// a limit.
const MYSQL_NO_LIMIT: u64 = 18446744073709551615;

impl ToSql for &Statement {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Statement::Query(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::Truncate(stmt) => stmt.to_sql(f),
        }
    }
}

/// The rendered pieces of a SELECT, in output order. Empty pieces are
/// skipped when joined.
pub(super) struct Components {
    pub(super) select: String,
    pub(super) from: String,
    pub(super) joins: String,
    pub(super) wheres: String,
    pub(super) groups: String,
    pub(super) havings: String,
    pub(super) orders: String,
    pub(super) limit: String,
    pub(super) offset: String,
}

impl Components {
    /// Render every component of `query`.
    ///
    /// Components are captured in output order so bindings are pushed in
    /// the order their placeholders appear.
    pub(super) fn render<P: Params>(query: &stmt::Query, f: &mut Formatter<'_, P>) -> Components {
        Components {
            select: f.capture(|f| select(query, f)),
            from: f.capture(|f| {
                if let Some(source) = &query.from {
                    fmt!(f, "FROM " source);
                }
            }),
            joins: f.capture(|f| fmt!(f, Delimited(&query.joins, " "))),
            wheres: f.capture(|f| {
                if !query.filters.is_empty() {
                    fmt!(f, "WHERE " Filters(&query.filters));
                }
            }),
            groups: f.capture(|f| {
                if !query.groupings.is_empty() {
                    fmt!(f, "GROUP BY " Comma(&query.groupings));
                }
            }),
            havings: f.capture(|f| {
                if !query.havings.is_empty() {
                    fmt!(f, "HAVING " Filters(&query.havings));
                }
            }),
            orders: f.capture(|f| {
                if !query.orderings.is_empty() {
                    fmt!(f, "ORDER BY " Comma(&query.orderings));
                }
            }),
            limit: f.capture(|f| limit(query, f)),
            offset: f.capture(|f| {
                // SQL Server pages through the ROW_NUMBER rewrite instead
                if let (Some(offset), false) = (query.offset, f.serializer.is_sql_server()) {
                    fmt!(f, "OFFSET " offset);
                }
            }),
        }
    }
}

/// Join the non-empty parts with single spaces.
pub(super) fn concat(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

impl ToSql for &stmt::Query {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if f.serializer.is_sql_server() && self.offset.is_some() {
            super::sql_server::OffsetQuery(self).to_sql(f);
            return;
        }

        let c = Components::render(self, f);

        let sql = concat(&[
            &c.select, &c.from, &c.joins, &c.wheres, &c.groups, &c.havings, &c.orders, &c.limit,
            &c.offset,
        ]);

        fmt!(f, &sql);
    }
}

fn select<P: Params>(query: &stmt::Query, f: &mut Formatter<'_, P>) {
    if let Some(aggregate) = &query.aggregate {
        aggregate_select(query, aggregate, f);
        return;
    }

    fmt!(f, "SELECT ");

    if query.distinct {
        fmt!(f, "DISTINCT ");
    }

    // A bare limit on SQL Server is `TOP n`
    if let (Some(limit), None, true) = (query.limit, query.offset, f.serializer.is_sql_server()) {
        fmt!(f, "TOP " limit " ");
    }

    if query.columns.is_empty() {
        fmt!(f, "*");
    } else {
        fmt!(f, Comma(&query.columns));
    }
}

fn aggregate_select<P: Params>(
    query: &stmt::Query,
    aggregate: &stmt::Aggregate,
    f: &mut Formatter<'_, P>,
) {
    let wildcard = aggregate.columns.is_empty()
        || aggregate
            .columns
            .iter()
            .all(|column| *column == stmt::Column::from("*"));

    fmt!(f, "SELECT " aggregate.func.as_str() "(");

    if wildcard {
        fmt!(f, "*");
    } else {
        if query.distinct {
            fmt!(f, "DISTINCT ");
        }

        fmt!(f, Comma(&aggregate.columns));
    }

    fmt!(f, ") AS " Ident("aggregate"));
}

fn limit<P: Params>(query: &stmt::Query, f: &mut Formatter<'_, P>) {
    match (query.limit, query.offset, f.serializer.flavor) {
        // TOP or the ROW_NUMBER rewrite
        (_, _, Flavor::SqlServer) => {}
        (Some(limit), _, _) => fmt!(f, "LIMIT " limit),
        (None, Some(_), Flavor::Sqlite) => fmt!(f, "LIMIT -1"),
        (None, Some(_), Flavor::Mysql) => fmt!(f, "LIMIT " MYSQL_NO_LIMIT),
        (None, _, _) => {}
    }
}

impl ToSql for &stmt::Join {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, self.kind.as_str() " " Name(&self.table) " ON ");

        if self.clauses.is_empty() {
            fmt!(f, "1 = 1");
        }

        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                fmt!(f, " " clause.connector.as_str() " ");
            }

            let (left, right) = (&clause.left, &clause.right);
            fmt!(f, left " " clause.op.as_str() " " right);
        }
    }
}

impl ToSql for &stmt::OrderBy {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let direction = match self.direction {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        };

        fmt!(f, &self.column direction);
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let table = Name(&self.table);

        if self.columns.is_empty() {
            if f.serializer.is_mysql() {
                fmt!(f, "INSERT INTO " table " () VALUES ()");
            } else {
                fmt!(f, "INSERT INTO " table " DEFAULT VALUES");
            }
        } else {
            let columns = Comma(self.columns.iter().map(Name));
            fmt!(f, "INSERT INTO " table " (" columns ") ");

            if f.serializer.is_sqlite() && self.rows.len() > 1 {
                // Older SQLite releases lack multi-row VALUES
                let rows = self.rows.iter().map(|row| UnionRow(&self.columns, row));
                fmt!(f, Delimited(rows, " UNION ALL "));
            } else {
                let rows = Comma(self.rows.iter().map(|row| ValuesRow(row)));
                fmt!(f, "VALUES " rows);
            }
        }

        if let Some(returning) = &self.returning {
            fmt!(f, " RETURNING " Name(returning));
        }
    }
}

/// `(?, ?)`
struct ValuesRow<'a>(&'a [stmt::Expr]);

impl ToSql for ValuesRow<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "(" Comma(self.0) ")");
    }
}

/// `SELECT ? AS "a", ? AS "b"`
struct UnionRow<'a>(&'a [String], &'a [stmt::Expr]);

impl ToSql for UnionRow<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "SELECT ");

        for (i, (column, value)) in self.0.iter().zip(self.1).enumerate() {
            if i > 0 {
                fmt!(f, ", ");
            }

            fmt!(f, value " AS " Ident(column));
        }
    }
}

impl ToSql for &stmt::Update {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let assignments = Comma(
            self.assignments
                .iter()
                .map(|(column, value)| Assignment(column, value)),
        );

        fmt!(f, "UPDATE " TargetTable(&self.target) " SET " assignments);

        if !self.target.filters.is_empty() {
            fmt!(f, " WHERE " Filters(&self.target.filters));
        }
    }
}

/// `"column" = ?`
struct Assignment<'a>(&'a str, &'a stmt::Expr);

impl ToSql for Assignment<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Name(self.0) " = " self.1);
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "DELETE FROM " TargetTable(&self.target));

        if !self.target.filters.is_empty() {
            fmt!(f, " WHERE " Filters(&self.target.filters));
        }
    }
}

impl ToSql for &stmt::Truncate {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "TRUNCATE TABLE " Name(&self.table));
    }
}

/// The table an UPDATE or DELETE targets. Statements without one are
/// rejected before rendering starts.
struct TargetTable<'a>(&'a stmt::Query);

impl ToSql for TargetTable<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if let Some(table) = self.0.table_name() {
            fmt!(f, Name(table));
        }
    }
}

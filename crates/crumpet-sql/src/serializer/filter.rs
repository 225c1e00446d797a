use super::{Comma, Formatter, Params, ToSql};

use crumpet_core::stmt::{self, BinaryOp, Expr, FilterKind, Value};

/// A WHERE or HAVING predicate list.
///
/// Every predicate after the first is prefixed with its connector, so the
/// connector of the leading predicate never reaches the output.
pub(super) struct Filters<'a>(pub(super) &'a [stmt::Filter]);

impl ToSql for Filters<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        for (i, filter) in self.0.iter().enumerate() {
            if i > 0 {
                fmt!(f, " " filter.connector.as_str() " ");
            }

            filter.kind.to_sql(f);
        }
    }
}

impl ToSql for &stmt::FilterKind {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            FilterKind::Compare { column, op, value } => match (op, value) {
                // `= NULL` never matches; compare nulls the SQL way
                (BinaryOp::Eq, Expr::Value(Value::Null)) => fmt!(f, column " IS NULL"),
                (BinaryOp::Ne, Expr::Value(Value::Null)) => fmt!(f, column " IS NOT NULL"),
                _ => fmt!(f, column " " op.as_str() " " value),
            },
            FilterKind::In {
                values, negate, ..
            } if values.is_empty() => {
                let always = if *negate { "1 = 1" } else { "0 = 1" };
                fmt!(f, always);
            }
            FilterKind::In {
                column,
                values,
                negate,
            } => {
                let keyword = if *negate { " NOT IN (" } else { " IN (" };
                fmt!(f, column keyword Comma(values) ")");
            }
            FilterKind::Between {
                column,
                low,
                high,
                negate,
            } => {
                let keyword = if *negate {
                    " NOT BETWEEN "
                } else {
                    " BETWEEN "
                };
                fmt!(f, column keyword low " AND " high);
            }
            FilterKind::Null { column, negate } => {
                let keyword = if *negate { " IS NOT NULL" } else { " IS NULL" };
                fmt!(f, column keyword);
            }
            FilterKind::Exists { query, negate } => {
                let keyword = if *negate { "NOT EXISTS (" } else { "EXISTS (" };
                let query: &stmt::Query = query;
                fmt!(f, keyword query ")");
            }
            FilterKind::Raw(raw) => fmt!(f, raw.as_str()),
            FilterKind::Nested(query) => fmt!(f, "(" Filters(&query.filters) ")"),
        }
    }
}

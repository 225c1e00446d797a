use super::{Expr, IntoExpr, Value};

use indexmap::IndexMap;

/// `INSERT INTO table (columns) VALUES rows...`
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Expr>>,

    /// Column whose generated value the statement should return. Only
    /// flavors with `RETURNING` support render it.
    pub returning: Option<String>,
}

impl Insert {
    pub fn new<I>(table: impl Into<String>, columns: I) -> Insert
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Insert {
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: vec![],
            returning: None,
        }
    }

    /// Single-row insert of an attribute map, in map order.
    pub fn from_map(table: impl Into<String>, attributes: &IndexMap<String, Value>) -> Insert {
        let mut insert = Insert::new(table, attributes.keys().cloned());
        insert.push_row(attributes.values());
        insert
    }

    /// Append a row. The row must have one value per column.
    pub fn push_row<I>(&mut self, row: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: IntoExpr,
    {
        let row: Vec<_> = row.into_iter().map(IntoExpr::into_expr).collect();
        assert_eq!(
            row.len(),
            self.columns.len(),
            "insert row width does not match column count"
        );
        self.rows.push(row);
        self
    }

    pub fn returning(&mut self, column: impl Into<String>) -> &mut Self {
        self.returning = Some(column.into());
        self
    }
}

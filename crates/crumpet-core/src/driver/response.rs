use crate::stmt::Value;

use indexmap::IndexMap;

/// One result row, column name to value, in select order.
pub type Row = IndexMap<String, Value>;

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,

    /// Key generated by an insert, when requested.
    pub generated_key: Option<Value>,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Rows returned by a query
    Values(Vec<Row>),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
            generated_key: None,
        }
    }

    pub fn values(rows: Vec<Row>) -> Self {
        Self {
            rows: Rows::Values(rows),
            generated_key: None,
        }
    }

    pub fn inserted(count: u64, key: Value) -> Self {
        Self {
            rows: Rows::Count(count),
            generated_key: Some(key),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }

    /// Rows affected; a row set counts its rows.
    pub fn count(&self) -> u64 {
        match self {
            Rows::Count(count) => *count,
            Rows::Values(rows) => rows.len() as u64,
        }
    }

    pub fn into_values(self) -> crate::Result<Vec<Row>> {
        match self {
            Self::Values(values) => Ok(values),
            Self::Count(count) => Err(crate::err!(
                "expected rows from the driver, got a count of {count}"
            )),
        }
    }
}

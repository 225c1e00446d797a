use super::Query;

/// `DELETE FROM table WHERE ...`, table and filters taken from `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub target: Query,
}

impl Delete {
    pub fn new(target: Query) -> Delete {
        Delete { target }
    }
}

/// `TRUNCATE TABLE table`
#[derive(Debug, Clone, PartialEq)]
pub struct Truncate {
    pub table: String,
}

impl Truncate {
    pub fn new(table: impl Into<String>) -> Truncate {
        Truncate {
            table: table.into(),
        }
    }
}

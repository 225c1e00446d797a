use crate::stmt::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Execute a statement that returns rows
    QuerySql(QuerySql),

    /// Execute a statement that modifies data
    ExecSql(ExecSql),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuerySql {
    pub sql: String,
    pub bindings: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecSql {
    pub sql: String,
    pub bindings: Vec<Value>,

    /// The statement is an insert whose generated key the driver must report
    /// in [`Response::generated_key`](super::Response::generated_key).
    pub generated_key: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    Start,
    Commit,
    Rollback,
}

impl Operation {
    /// SQL text, for operations that carry it.
    pub fn sql(&self) -> Option<&str> {
        match self {
            Operation::QuerySql(op) => Some(&op.sql),
            Operation::ExecSql(op) => Some(&op.sql),
            Operation::Transaction(_) => None,
        }
    }

    pub fn bindings(&self) -> &[Value] {
        match self {
            Operation::QuerySql(op) => &op.bindings,
            Operation::ExecSql(op) => &op.bindings,
            Operation::Transaction(_) => &[],
        }
    }

    pub fn is_query_sql(&self) -> bool {
        matches!(self, Operation::QuerySql(_))
    }
}

impl From<QuerySql> for Operation {
    fn from(value: QuerySql) -> Self {
        Operation::QuerySql(value)
    }
}

impl From<ExecSql> for Operation {
    fn from(value: ExecSql) -> Self {
        Operation::ExecSql(value)
    }
}

impl From<Transaction> for Operation {
    fn from(value: Transaction) -> Self {
        Operation::Transaction(value)
    }
}

mod aggregate;
pub use aggregate::{Aggregate, AggregateFunc};

mod column;
pub use column::Column;

mod delete;
pub use delete::{Delete, Truncate};

mod expr;
pub use expr::{raw, Expr, IntoExpr, Raw};

mod filter;
pub use filter::{BinaryOp, Connector, Filter, FilterKind};

mod insert;
pub use insert::Insert;

mod join;
pub use join::{Join, JoinClause, JoinKind};

mod order_by;
pub use order_by::{Direction, OrderBy};

mod query;
pub use query::{Query, Source};

mod update;
pub use update::Update;

mod value;
pub use value::Value;

/// A statement the serializer can compile.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Query(Query),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    Truncate(Truncate),
}

impl Statement {
    pub fn is_query(&self) -> bool {
        matches!(self, Statement::Query(_))
    }
}

impl From<Query> for Statement {
    fn from(value: Query) -> Self {
        Statement::Query(value)
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Statement::Insert(value)
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Statement::Update(value)
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Statement::Delete(value)
    }
}

impl From<Truncate> for Statement {
    fn from(value: Truncate) -> Self {
        Statement::Truncate(value)
    }
}

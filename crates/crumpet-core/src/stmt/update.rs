use super::{Expr, IntoExpr, Query};

/// `UPDATE table SET assignments WHERE ...`
///
/// The table and the filters come from `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub target: Query,
    pub assignments: Vec<(String, Expr)>,
}

impl Update {
    pub fn new(target: Query) -> Update {
        Update {
            target,
            assignments: vec![],
        }
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl IntoExpr) -> &mut Self {
        self.assignments.push((column.into(), value.into_expr()));
        self
    }
}

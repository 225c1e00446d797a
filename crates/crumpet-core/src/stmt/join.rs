use super::{BinaryOp, Column, Connector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub clauses: Vec<JoinClause>,
}

/// `left op right`, comparing two columns.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub connector: Connector,
    pub left: Column,
    pub op: BinaryOp,
    pub right: Column,
}

impl Join {
    pub fn new(kind: JoinKind, table: impl Into<String>) -> Join {
        Join {
            kind,
            table: table.into(),
            clauses: vec![],
        }
    }

    pub fn on(
        &mut self,
        left: impl Into<Column>,
        op: BinaryOp,
        right: impl Into<Column>,
    ) -> &mut Self {
        self.push(Connector::And, left.into(), op, right.into())
    }

    pub fn or_on(
        &mut self,
        left: impl Into<Column>,
        op: BinaryOp,
        right: impl Into<Column>,
    ) -> &mut Self {
        self.push(Connector::Or, left.into(), op, right.into())
    }

    fn push(&mut self, connector: Connector, left: Column, op: BinaryOp, right: Column) -> &mut Self {
        self.clauses.push(JoinClause {
            connector,
            left,
            op,
            right,
        });
        self
    }
}

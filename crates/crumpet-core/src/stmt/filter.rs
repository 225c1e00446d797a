use super::{Column, Expr, Query, Raw};

/// How a predicate attaches to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn as_str(self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    NotLike,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Like => "LIKE",
            BinaryOp::NotLike => "NOT LIKE",
        }
    }
}

/// One predicate in a WHERE or HAVING list.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub connector: Connector,
    pub kind: FilterKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterKind {
    /// `column op value`
    Compare {
        column: Column,
        op: BinaryOp,
        value: Expr,
    },

    /// `column [NOT] IN (values)`
    In {
        column: Column,
        values: Vec<Expr>,
        negate: bool,
    },

    /// `column [NOT] BETWEEN low AND high`
    Between {
        column: Column,
        low: Expr,
        high: Expr,
        negate: bool,
    },

    /// `column IS [NOT] NULL`
    Null { column: Column, negate: bool },

    /// `[NOT] EXISTS (query)`
    Exists { query: Box<Query>, negate: bool },

    /// Inlined verbatim
    Raw(Raw),

    /// Parenthesized group made of the nested query's filters
    Nested(Box<Query>),
}

impl Filter {
    pub fn and(kind: FilterKind) -> Filter {
        Filter {
            connector: Connector::And,
            kind,
        }
    }

    pub fn or(kind: FilterKind) -> Filter {
        Filter {
            connector: Connector::Or,
            kind,
        }
    }
}

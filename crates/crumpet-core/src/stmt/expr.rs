use super::Value;

use chrono::NaiveDateTime;

/// A fragment of SQL inlined verbatim into the compiled statement.
///
/// Raw fragments are never quoted and never produce a binding. They can only
/// be built through [`raw`], keeping them apart from ordinary values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Raw(String);

/// Mark a SQL fragment as raw.
pub fn raw(sql: impl Into<String>) -> Raw {
    Raw(sql.into())
}

impl Raw {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The right-hand side of a predicate or an assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Bound as a statement parameter
    Value(Value),

    /// Inlined into the SQL text
    Raw(Raw),
}

impl Expr {
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Raw(_) => None,
        }
    }
}

/// Conversion into an [`Expr`].
pub trait IntoExpr {
    fn into_expr(self) -> Expr;
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

impl IntoExpr for Raw {
    fn into_expr(self) -> Expr {
        Expr::Raw(self)
    }
}

impl IntoExpr for Value {
    fn into_expr(self) -> Expr {
        Expr::Value(self)
    }
}

impl IntoExpr for &Value {
    fn into_expr(self) -> Expr {
        Expr::Value(self.clone())
    }
}

impl<T: Into<Value>> IntoExpr for Option<T> {
    fn into_expr(self) -> Expr {
        Expr::Value(self.into())
    }
}

macro_rules! impl_into_expr {
    ( $( $ty:ty ),* ) => {
        $(
            impl IntoExpr for $ty {
                fn into_expr(self) -> Expr {
                    Expr::Value(Value::from(self))
                }
            }
        )*
    };
}

impl_into_expr!(
    bool, i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64, String, &String, &str, Vec<u8>,
    NaiveDateTime
);

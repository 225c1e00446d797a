use super::{Flavor, Formatter, ToSql};

use crumpet_core::stmt;

/// Collects statement bindings in render order.
pub trait Params {
    fn push(&mut self, param: &stmt::Value) -> Placeholder;
}

/// 1-based position of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder(pub usize);

impl Params for Vec<stmt::Value> {
    fn push(&mut self, value: &stmt::Value) -> Placeholder {
        self.push(value.clone());
        Placeholder(self.len())
    }
}

impl ToSql for Placeholder {
    fn to_sql<P: super::Params>(self, f: &mut Formatter<'_, P>) {
        use std::fmt::Write;

        match f.serializer.flavor {
            Flavor::Generic | Flavor::Mysql => write!(f.dst, "?").unwrap(),
            Flavor::Postgresql => write!(f.dst, "${}", self.0).unwrap(),
            Flavor::Sqlite => write!(f.dst, "?{}", self.0).unwrap(),
            Flavor::SqlServer => write!(f.dst, "@P{}", self.0).unwrap(),
        }
    }
}

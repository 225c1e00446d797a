use super::{Ident, Name, Params, ToSql};

use crumpet_core::stmt;

impl ToSql for &stmt::Column {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        match self {
            stmt::Column::Name(name) => fmt!(f, Name(name)),
            stmt::Column::Aliased { name, alias } => fmt!(f, Name(name) " AS " Ident(alias)),
            stmt::Column::Raw(raw) => fmt!(f, raw.as_str()),
        }
    }
}

impl ToSql for &stmt::Source {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        match self {
            stmt::Source::Table(table) => stmt::Column::from(table).to_sql(f),
            stmt::Source::Raw(raw) => fmt!(f, raw.as_str()),
        }
    }
}

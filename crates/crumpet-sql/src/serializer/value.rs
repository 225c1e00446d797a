use super::{Params, ToSql};

use crumpet_core::stmt;

impl ToSql for &stmt::Value {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let placeholder = match self {
            // Timestamps travel as text in the flavor's format
            stmt::Value::Timestamp(ts) => {
                let format = f.serializer.flavor.datetime_format();
                let text = stmt::Value::String(ts.format(format).to_string());
                f.params.push(&text)
            }
            value => f.params.push(value),
        };

        fmt!(f, placeholder);
    }
}

impl ToSql for &stmt::Expr {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        match self {
            stmt::Expr::Value(value) => value.to_sql(f),
            stmt::Expr::Raw(raw) => fmt!(f, raw.as_str()),
        }
    }
}

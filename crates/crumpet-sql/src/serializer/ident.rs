use super::{Formatter, Params, Period, ToSql};

/// A single identifier segment, quoted for the flavor.
///
/// The `*` wildcard is written bare.
pub(super) struct Ident<S>(pub(super) S);

/// A possibly qualified name (`table.column`); each segment is quoted on
/// its own.
pub(super) struct Name<S>(pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let ident = self.0.as_ref();

        if ident == "*" {
            f.dst.push('*');
            return;
        }

        let (open, close) = f.serializer.flavor.quotes();

        f.dst.push(open);
        for ch in ident.chars() {
            // Escape by doubling the closing quote
            if ch == close {
                f.dst.push(close);
            }
            f.dst.push(ch);
        }
        f.dst.push(close);
    }
}

impl<S: AsRef<str>> ToSql for Name<S> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Period(self.0.as_ref().split('.').map(Ident)));
    }
}

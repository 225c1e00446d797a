use super::{
    statement::{concat, Components},
    Formatter, Params, ToSql,
};

use crumpet_core::stmt;

/// SQL Server has no `OFFSET` without `ORDER BY ... FETCH`, so offset
/// queries number their rows and filter on the row number.
///
/// ```sql
/// SELECT * FROM (SELECT *, ROW_NUMBER() OVER (ORDER BY (SELECT 0)) AS RowNum FROM [users])
///     AS TempTable WHERE RowNum BETWEEN 11 AND 15
/// ```
pub(super) struct OffsetQuery<'a>(pub(super) &'a stmt::Query);

impl ToSql for OffsetQuery<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let query = self.0;
        let offset = query.offset.unwrap_or(0);

        let c = Components::render(query, f);

        let over = if c.orders.is_empty() {
            "ORDER BY (SELECT 0)"
        } else {
            c.orders.as_str()
        };

        let select = format!("{}, ROW_NUMBER() OVER ({over}) AS RowNum", c.select);
        let inner = concat(&[&select, &c.from, &c.joins, &c.wheres, &c.groups, &c.havings]);

        let start = offset.saturating_add(1);

        fmt!(f, "SELECT * FROM (" inner.as_str() ") AS TempTable WHERE RowNum ");

        match query.limit {
            Some(limit) => {
                let end = offset.saturating_add(limit);
                fmt!(f, "BETWEEN " start " AND " end);
            }
            None => fmt!(f, ">= " start),
        }
    }
}

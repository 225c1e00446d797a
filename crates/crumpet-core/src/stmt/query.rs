use super::*;

/// Where a SELECT reads from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Table(String),
    Raw(Raw),
}

/// A SELECT statement under construction.
///
/// The query stores names and values only; quoting and placeholders are the
/// serializer's business. Builder methods return `&mut Self` so calls can be
/// chained on a binding:
///
/// ```
/// # use crumpet_core::stmt::Query;
/// let mut query = Query::table("users");
/// query.filter("active", true).order_by("name").limit(10);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub from: Option<Source>,
    pub columns: Vec<Column>,
    pub aggregate: Option<Aggregate>,
    pub joins: Vec<Join>,
    pub filters: Vec<Filter>,
    pub groupings: Vec<Column>,
    pub havings: Vec<Filter>,
    pub orderings: Vec<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub distinct: bool,
}

impl Query {
    /// A query with no source; used for nested predicate groups.
    pub fn new() -> Query {
        Query::default()
    }

    pub fn table(table: impl Into<String>) -> Query {
        Query {
            from: Some(Source::Table(table.into())),
            ..Query::default()
        }
    }

    pub fn from_raw(source: Raw) -> Query {
        Query {
            from: Some(Source::Raw(source)),
            ..Query::default()
        }
    }

    /// The table name, when the query reads from a plain table.
    pub fn table_name(&self) -> Option<&str> {
        match &self.from {
            Some(Source::Table(name)) => Some(name),
            _ => None,
        }
    }

    /// Replace the select list.
    pub fn select<I>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Column>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append to the select list.
    pub fn add_select(&mut self, column: impl Into<Column>) -> &mut Self {
        self.columns.push(column.into());
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    /// `column = value`
    pub fn filter(&mut self, column: impl Into<Column>, value: impl IntoExpr) -> &mut Self {
        self.filter_op(column, BinaryOp::Eq, value)
    }

    /// `OR column = value`
    pub fn or_filter(&mut self, column: impl Into<Column>, value: impl IntoExpr) -> &mut Self {
        self.or_filter_op(column, BinaryOp::Eq, value)
    }

    pub fn filter_op(
        &mut self,
        column: impl Into<Column>,
        op: BinaryOp,
        value: impl IntoExpr,
    ) -> &mut Self {
        self.push_filter(Filter::and(compare(column, op, value)))
    }

    pub fn or_filter_op(
        &mut self,
        column: impl Into<Column>,
        op: BinaryOp,
        value: impl IntoExpr,
    ) -> &mut Self {
        self.push_filter(Filter::or(compare(column, op, value)))
    }

    pub fn filter_in<I>(&mut self, column: impl Into<Column>, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: IntoExpr,
    {
        self.push_filter(Filter::and(in_list(column, values, false)))
    }

    pub fn or_filter_in<I>(&mut self, column: impl Into<Column>, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: IntoExpr,
    {
        self.push_filter(Filter::or(in_list(column, values, false)))
    }

    pub fn filter_not_in<I>(&mut self, column: impl Into<Column>, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: IntoExpr,
    {
        self.push_filter(Filter::and(in_list(column, values, true)))
    }

    pub fn or_filter_not_in<I>(&mut self, column: impl Into<Column>, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: IntoExpr,
    {
        self.push_filter(Filter::or(in_list(column, values, true)))
    }

    pub fn filter_between(
        &mut self,
        column: impl Into<Column>,
        low: impl IntoExpr,
        high: impl IntoExpr,
    ) -> &mut Self {
        self.push_filter(Filter::and(between(column, low, high, false)))
    }

    pub fn or_filter_between(
        &mut self,
        column: impl Into<Column>,
        low: impl IntoExpr,
        high: impl IntoExpr,
    ) -> &mut Self {
        self.push_filter(Filter::or(between(column, low, high, false)))
    }

    pub fn filter_not_between(
        &mut self,
        column: impl Into<Column>,
        low: impl IntoExpr,
        high: impl IntoExpr,
    ) -> &mut Self {
        self.push_filter(Filter::and(between(column, low, high, true)))
    }

    pub fn filter_null(&mut self, column: impl Into<Column>) -> &mut Self {
        self.push_filter(Filter::and(FilterKind::Null {
            column: column.into(),
            negate: false,
        }))
    }

    pub fn or_filter_null(&mut self, column: impl Into<Column>) -> &mut Self {
        self.push_filter(Filter::or(FilterKind::Null {
            column: column.into(),
            negate: false,
        }))
    }

    pub fn filter_not_null(&mut self, column: impl Into<Column>) -> &mut Self {
        self.push_filter(Filter::and(FilterKind::Null {
            column: column.into(),
            negate: true,
        }))
    }

    pub fn or_filter_not_null(&mut self, column: impl Into<Column>) -> &mut Self {
        self.push_filter(Filter::or(FilterKind::Null {
            column: column.into(),
            negate: true,
        }))
    }

    pub fn filter_exists(&mut self, query: Query) -> &mut Self {
        self.push_filter(Filter::and(FilterKind::Exists {
            query: Box::new(query),
            negate: false,
        }))
    }

    pub fn or_filter_exists(&mut self, query: Query) -> &mut Self {
        self.push_filter(Filter::or(FilterKind::Exists {
            query: Box::new(query),
            negate: false,
        }))
    }

    pub fn filter_not_exists(&mut self, query: Query) -> &mut Self {
        self.push_filter(Filter::and(FilterKind::Exists {
            query: Box::new(query),
            negate: true,
        }))
    }

    pub fn filter_raw(&mut self, sql: Raw) -> &mut Self {
        self.push_filter(Filter::and(FilterKind::Raw(sql)))
    }

    pub fn or_filter_raw(&mut self, sql: Raw) -> &mut Self {
        self.push_filter(Filter::or(FilterKind::Raw(sql)))
    }

    /// Add a parenthesized group built by `f` on a fresh query.
    ///
    /// A group that ends up with no predicates is dropped.
    pub fn filter_nested(&mut self, f: impl FnOnce(&mut Query)) -> &mut Self {
        self.nested(Connector::And, f)
    }

    pub fn or_filter_nested(&mut self, f: impl FnOnce(&mut Query)) -> &mut Self {
        self.nested(Connector::Or, f)
    }

    fn nested(&mut self, connector: Connector, f: impl FnOnce(&mut Query)) -> &mut Self {
        let mut nested = Query::new();
        f(&mut nested);

        if !nested.filters.is_empty() {
            self.filters.push(Filter {
                connector,
                kind: FilterKind::Nested(Box::new(nested)),
            });
        }

        self
    }

    pub fn push_filter(&mut self, filter: Filter) -> &mut Self {
        self.filters.push(filter);
        self
    }

    /// `INNER JOIN table ON left op right`
    pub fn join(
        &mut self,
        table: impl Into<String>,
        left: impl Into<Column>,
        op: BinaryOp,
        right: impl Into<Column>,
    ) -> &mut Self {
        let mut join = Join::new(JoinKind::Inner, table);
        join.on(left, op, right);
        self.joins.push(join);
        self
    }

    /// `LEFT JOIN table ON left op right`
    pub fn left_join(
        &mut self,
        table: impl Into<String>,
        left: impl Into<Column>,
        op: BinaryOp,
        right: impl Into<Column>,
    ) -> &mut Self {
        let mut join = Join::new(JoinKind::Left, table);
        join.on(left, op, right);
        self.joins.push(join);
        self
    }

    /// Join with several `ON` clauses built by `f`.
    pub fn join_on(
        &mut self,
        kind: JoinKind,
        table: impl Into<String>,
        f: impl FnOnce(&mut Join),
    ) -> &mut Self {
        let mut join = Join::new(kind, table);
        f(&mut join);
        self.joins.push(join);
        self
    }

    pub fn group_by(&mut self, column: impl Into<Column>) -> &mut Self {
        self.groupings.push(column.into());
        self
    }

    pub fn having(
        &mut self,
        column: impl Into<Column>,
        op: BinaryOp,
        value: impl IntoExpr,
    ) -> &mut Self {
        self.havings.push(Filter::and(compare(column, op, value)));
        self
    }

    pub fn or_having(
        &mut self,
        column: impl Into<Column>,
        op: BinaryOp,
        value: impl IntoExpr,
    ) -> &mut Self {
        self.havings.push(Filter::or(compare(column, op, value)));
        self
    }

    pub fn order_by(&mut self, column: impl Into<Column>) -> &mut Self {
        self.orderings.push(OrderBy {
            column: column.into(),
            direction: Direction::Asc,
        });
        self
    }

    pub fn order_by_desc(&mut self, column: impl Into<Column>) -> &mut Self {
        self.orderings.push(OrderBy {
            column: column.into(),
            direction: Direction::Desc,
        });
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    /// Limit and offset for a 1-based page number.
    pub fn for_page(&mut self, page: u64, per_page: u64) -> &mut Self {
        let page = page.max(1);
        self.limit(per_page).offset((page - 1).saturating_mul(per_page))
    }

    /// Replace the select list with an aggregate.
    pub fn aggregate<I>(&mut self, func: AggregateFunc, columns: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Column>,
    {
        self.aggregate = Some(Aggregate {
            func,
            columns: columns.into_iter().map(Into::into).collect(),
        });
        self
    }
}

fn compare(column: impl Into<Column>, op: BinaryOp, value: impl IntoExpr) -> FilterKind {
    FilterKind::Compare {
        column: column.into(),
        op,
        value: value.into_expr(),
    }
}

fn in_list<I>(column: impl Into<Column>, values: I, negate: bool) -> FilterKind
where
    I: IntoIterator,
    I::Item: IntoExpr,
{
    FilterKind::In {
        column: column.into(),
        values: values.into_iter().map(IntoExpr::into_expr).collect(),
        negate,
    }
}

fn between(
    column: impl Into<Column>,
    low: impl IntoExpr,
    high: impl IntoExpr,
    negate: bool,
) -> FilterKind {
    FilterKind::Between {
        column: column.into(),
        low: low.into_expr(),
        high: high.into_expr(),
        negate,
    }
}

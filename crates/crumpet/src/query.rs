use crate::{
    entity::now,
    hydrate::{self, Constraints, Includes},
    schema,
    stmt::{AggregateFunc, BinaryOp, Column, Delete, Query, Update, Value},
    Db, Entity, Error, Result,
};

use std::sync::Arc;

/// Retrieves entities of one model.
///
/// ```no_run
/// # use crumpet::{Db, Model};
/// # struct Post;
/// # impl Model for Post { const NAME: &'static str = "Post"; }
/// # async fn example(db: Db) -> crumpet::Result<()> {
/// let posts = db
///     .query::<Post>()?
///     .filter("published", true)
///     .with(["comments.author", "tags"])
///     .order_by_desc("created_at")
///     .get()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ModelQuery {
    db: Db,
    model: Arc<schema::Model>,
    query: Query,
    includes: Includes,
    constraints: Constraints,
}

impl ModelQuery {
    pub(crate) fn new(db: Db, model: Arc<schema::Model>) -> ModelQuery {
        let query = Query::table(&model.table);

        ModelQuery {
            db,
            model,
            query,
            includes: Includes::default(),
            constraints: Constraints::new(),
        }
    }

    pub fn model(&self) -> &Arc<schema::Model> {
        &self.model
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn query_mut(&mut self) -> &mut Query {
        &mut self.query
    }

    /// Refine the underlying query with `f`.
    pub fn scope(mut self, f: impl FnOnce(&mut Query)) -> Self {
        f(&mut self.query);
        self
    }

    /// Eager load relationships. Nested relationships are named with dots:
    /// `"comments.author"`.
    pub fn with<I>(mut self, paths: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for path in paths {
            self.includes.insert(path.as_ref());
        }
        self
    }

    /// Eager load the relationship at `path`, constraining its query with `f`.
    pub fn with_constraint(
        mut self,
        path: &str,
        f: impl Fn(&mut Query) + Send + Sync + 'static,
    ) -> Self {
        self.includes.insert(path);
        self.constraints.insert(path.to_string(), Arc::new(f));
        self
    }

    pub fn filter(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.query.filter(column, value.into());
        self
    }

    pub fn filter_op(mut self, column: &str, op: BinaryOp, value: impl Into<Value>) -> Self {
        self.query.filter_op(column, op, value.into());
        self
    }

    pub fn filter_in<I>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.query
            .filter_in(column, values.into_iter().map(Into::<Value>::into));
        self
    }

    pub fn filter_null(mut self, column: &str) -> Self {
        self.query.filter_null(column);
        self
    }

    pub fn order_by(mut self, column: &str) -> Self {
        self.query.order_by(column);
        self
    }

    pub fn order_by_desc(mut self, column: &str) -> Self {
        self.query.order_by_desc(column);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.query.limit(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.query.offset(offset);
        self
    }

    /// Run the query and eager load the requested relationships.
    ///
    /// Relationship names are checked before any query runs.
    pub async fn get(self) -> Result<Vec<Entity>> {
        self.includes.validate(self.db.schema(), &self.model)?;

        let rows = self.db.select(&self.query).await?;

        let mut entities: Vec<Entity> = rows
            .into_iter()
            .map(|row| Entity::from_row(self.model.clone(), row))
            .collect();

        tracing::trace!(model = %self.model.name, rows = entities.len(), "hydrated");

        hydrate::eager_load(
            &self.db,
            &self.model,
            &mut entities,
            &self.includes,
            &self.constraints,
            "",
        )
        .await?;

        Ok(entities)
    }

    pub async fn first(self) -> Result<Option<Entity>> {
        Ok(self.limit(1).get().await?.into_iter().next())
    }

    /// The entity with primary key `id`.
    pub async fn find(self, id: impl Into<Value>) -> Result<Option<Entity>> {
        let key = format!("{}.{}", self.model.table, self.model.key);
        self.filter(&key, id).first().await
    }

    pub async fn find_or_fail(self, id: impl Into<Value>) -> Result<Entity> {
        let id = id.into();
        let table = self.model.table.clone();

        match self.find(&id).await? {
            Some(entity) => Ok(entity),
            None => Err(Error::entity_not_found(format!(
                "table={table} key={}",
                describe(&id)
            ))),
        }
    }

    pub async fn count(self) -> Result<u64> {
        let mut query = self.query;
        query.orderings.clear();
        query.aggregate(AggregateFunc::Count, Vec::<Column>::new());

        let rows = self.db.select(&query).await?;

        let count = rows
            .into_iter()
            .next()
            .and_then(|mut row| row.swap_remove("aggregate"))
            .unwrap_or(Value::I64(0))
            .to_i64()?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    pub async fn exists(self) -> Result<bool> {
        Ok(self.count().await? > 0)
    }

    /// Values of one column, in row order.
    pub async fn pluck(mut self, column: &str) -> Result<Vec<Value>> {
        self.query.select([column]);

        let rows = self.db.select(&self.query).await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_iter().next().map(|(_, value)| value))
            .collect())
    }

    /// Update every matching row, returning the number of rows affected.
    /// `updated_at` is stamped for models with timestamps.
    pub async fn update(
        self,
        attributes: impl IntoIterator<Item = (impl Into<String>, impl Into<Value>)>,
    ) -> Result<u64> {
        let mut update = Update::new(self.query);

        for (column, value) in attributes {
            update.set(column, value.into());
        }

        if self.model.timestamps {
            update.set("updated_at", now());
        }

        self.db.exec(update).await
    }

    /// Delete every matching row, returning the number of rows affected.
    /// No hooks run.
    pub async fn delete(self) -> Result<u64> {
        self.db.exec(Delete::new(self.query)).await
    }
}

impl std::fmt::Debug for ModelQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelQuery")
            .field("model", &self.model.name)
            .field("query", &self.query)
            .field("includes", &self.includes)
            .field("constraints", &self.constraints.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(v) => v.to_string(),
        Value::I64(v) => v.to_string(),
        Value::F64(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Bytes(v) => format!("{v:?}"),
        Value::Timestamp(v) => v.to_string(),
    }
}

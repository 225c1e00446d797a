use super::RelationQuery;
use crate::{
    entity::now,
    schema::{self, HasManyAndBelongsTo, ModelId, RelationKind},
    stmt::{Delete, Insert, Query, Update, Value},
    Attributes, Entity, Result,
};

use indexmap::IndexSet;
use std::sync::Arc;

/// What [`RelationQuery::sync`] changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changes {
    pub attached: Vec<Value>,
    pub detached: Vec<Value>,
}

/// Model of a join table's rows. It is never registered, so no hooks run
/// for pivot entities.
pub(super) fn model(rel: &HasManyAndBelongsTo) -> Arc<schema::Model> {
    let mut model = schema::Model::new(ModelId(usize::MAX), rel.table.as_str());
    model.table = rel.table.clone();
    model.key = rel.foreign_key.clone();
    Arc::new(model)
}

impl RelationQuery {
    /// A query on the join table, restricted to the parent's rows.
    pub fn pivot(&self) -> Result<Query> {
        let rel = self.many_to_many("pivot")?;

        let mut query = Query::table(&rel.table);
        query.filter(rel.foreign_key.as_str(), &self.parent_key);
        Ok(query)
    }

    /// Insert a join row linking the parent to `id`, with extra join table
    /// attributes.
    pub async fn attach(
        &self,
        id: impl Into<Value>,
        attributes: impl IntoIterator<Item = (impl Into<String>, impl Into<Value>)>,
    ) -> Result<()> {
        let rel = self.many_to_many("attach")?;
        let parent_key = self.require_parent_key("attach")?;

        let mut row = self.join_row(rel, parent_key, id.into());
        for (name, value) in attributes {
            row.insert(name.into(), value.into());
        }

        self.db.exec(Insert::from_map(&rel.table, &row)).await?;
        Ok(())
    }

    /// Delete the join rows linking the parent to `ids`. No ids detaches
    /// everything. Returns the number of join rows deleted.
    pub async fn detach<I>(&self, ids: I) -> Result<u64>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let ids: Vec<Value> = ids.into_iter().map(Into::into).collect();
        let delete = self.detach_statement(&ids)?;
        self.db.exec(delete).await
    }

    /// Make `ids` the exact set of related keys.
    ///
    /// Rows for keys no longer listed are detached and missing keys are
    /// attached, inside one transaction.
    pub async fn sync<I>(&self, ids: I) -> Result<Changes>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let rel = self.many_to_many("sync")?;
        let parent_key = self.require_parent_key("sync")?;
        let desired: IndexSet<Value> = ids.into_iter().map(Into::into).collect();

        let mut current_query = self.pivot()?;
        current_query.select([rel.other_key.as_str()]);

        let mut conn = self.db.conn().await;
        conn.begin().await?;

        let result = async {
            let current: IndexSet<Value> = conn
                .select(&current_query)
                .await?
                .into_iter()
                .filter_map(|mut row| row.swap_remove(&rel.other_key))
                .collect();

            let changes = Changes {
                detached: current.difference(&desired).cloned().collect(),
                attached: desired.difference(&current).cloned().collect(),
            };

            if !changes.detached.is_empty() {
                conn.exec(self.detach_statement(&changes.detached)?.into())
                    .await?;
            }

            if !changes.attached.is_empty() {
                let rows: Vec<Attributes> = changes
                    .attached
                    .iter()
                    .map(|id| self.join_row(rel, parent_key, id.clone()))
                    .collect();

                let mut insert = Insert::new(&rel.table, rows[0].keys().cloned());
                for row in &rows {
                    insert.push_row(row.values());
                }

                conn.exec(insert.into()).await?;
            }

            Ok::<_, crate::Error>(changes)
        }
        .await;

        match result {
            Ok(changes) => {
                conn.commit().await?;
                tracing::trace!(
                    relation = %self.relation.name,
                    attached = changes.attached.len(),
                    detached = changes.detached.len(),
                    "synced"
                );
                Ok(changes)
            }
            Err(err) => {
                if let Err(rollback) = conn.rollback().await {
                    tracing::warn!(error = %rollback, "rollback after failed sync failed");
                }
                Err(err)
            }
        }
    }

    /// Update the join row linking the parent to `id`.
    pub async fn update_pivot(
        &self,
        id: impl Into<Value>,
        attributes: impl IntoIterator<Item = (impl Into<String>, impl Into<Value>)>,
    ) -> Result<u64> {
        let rel = self.many_to_many("update_pivot")?;

        let mut target = self.pivot()?;
        target.filter(rel.other_key.as_str(), id.into());

        let mut update = Update::new(target);
        for (name, value) in attributes {
            update.set(name, value.into());
        }

        if rel.pivot_columns.iter().any(|column| column == "updated_at") {
            update.set("updated_at", now());
        }

        self.db.exec(update).await
    }

    /// Create a related entity and attach it with extra join table
    /// attributes.
    pub async fn insert_with_pivot(
        &self,
        attributes: impl IntoIterator<Item = (impl Into<String>, impl Into<Value>)>,
        pivot: impl IntoIterator<Item = (impl Into<String>, impl Into<Value>)>,
    ) -> Result<Entity> {
        self.many_to_many("insert_with_pivot")?;
        self.require_parent_key("insert_with_pivot")?;

        let mut entity = Entity::new(self.related.clone());
        entity.fill(attributes);
        entity.save(&self.db).await?;

        let Some(key) = entity.key().cloned() else {
            crate::bail!("saved `{}` entity has no key", self.related.name);
        };

        self.attach(key, pivot).await?;
        Ok(entity)
    }

    fn many_to_many(&self, operation: &str) -> Result<&HasManyAndBelongsTo> {
        match &self.relation.kind {
            RelationKind::HasManyAndBelongsTo(rel) => Ok(rel),
            _ => Err(self.wrong_kind(operation)),
        }
    }

    /// Join row columns for one related key, stamped when the join table
    /// keeps timestamps.
    fn join_row(&self, rel: &HasManyAndBelongsTo, parent_key: &Value, id: Value) -> Attributes {
        let mut row = Attributes::new();
        row.insert(rel.foreign_key.clone(), parent_key.clone());
        row.insert(rel.other_key.clone(), id);

        for column in ["created_at", "updated_at"] {
            if rel.pivot_columns.iter().any(|c| c == column) {
                row.insert(column.to_string(), Value::Timestamp(now()));
            }
        }

        row
    }

    fn detach_statement(&self, ids: &[Value]) -> Result<Delete> {
        let rel = self.many_to_many("detach")?;
        self.require_parent_key("detach")?;

        let mut target = self.pivot()?;
        if !ids.is_empty() {
            target.filter_in(rel.other_key.as_str(), ids);
        }

        Ok(Delete::new(target))
    }
}

mod pivot;
pub use pivot::Changes;

use crate::{
    entity::wrong_kind,
    schema::{self, RelationKind},
    stmt::{BinaryOp, Query, Value},
    Db, Entity, Related, Result,
};

use crumpet_core::driver::Row;
use std::sync::Arc;

/// Prefix of the join table columns selected alongside many-to-many rows.
pub(crate) const PIVOT_PREFIX: &str = "pivot_";

/// The entities related to one parent entity through a relationship.
///
/// The underlying query can be refined before it runs. Mutations write
/// through the relationship's keys.
#[derive(Debug, Clone)]
pub struct RelationQuery {
    db: Db,
    parent: Arc<schema::Model>,
    relation: schema::Relation,
    related: Arc<schema::Model>,

    /// Parent value the relationship is constrained by. `Null` when the
    /// parent has none, in which case nothing is related.
    parent_key: Value,

    query: Query,
}

impl RelationQuery {
    pub(crate) fn new(db: &Db, parent: &Entity, name: &str) -> Result<RelationQuery> {
        let model = parent.model();
        let relation = model.relation(name)?.clone();
        let related = db.schema().model(relation.target).clone();

        let parent_key = parent
            .get(parent_column(model, &relation))
            .cloned()
            .unwrap_or_default();

        let mut query = base_query(&related, &relation);
        query.filter(constrained_column(&related, &relation), &parent_key);

        Ok(RelationQuery {
            db: db.clone(),
            parent: model.clone(),
            relation,
            related,
            parent_key,
            query,
        })
    }

    pub fn relation(&self) -> &schema::Relation {
        &self.relation
    }

    /// Model of the related entities.
    pub fn related(&self) -> &Arc<schema::Model> {
        &self.related
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn query_mut(&mut self) -> &mut Query {
        &mut self.query
    }

    pub fn filter(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.query.filter(column, value.into());
        self
    }

    pub fn filter_op(mut self, column: &str, op: BinaryOp, value: impl Into<Value>) -> Self {
        self.query.filter_op(column, op, value.into());
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

    pub async fn get(&self) -> Result<Vec<Entity>> {
        self.fetch(&self.query).await
    }

    pub async fn first(&self) -> Result<Option<Entity>> {
        let mut query = self.query.clone();
        query.limit(1);
        Ok(self.fetch(&query).await?.into_iter().next())
    }

    /// The relationship's value: one optional entity for belongs-to and
    /// has-one, all related entities otherwise.
    pub async fn results(&self) -> Result<Related> {
        if self.relation.is_single() {
            Ok(Related::One(self.first().await?.map(Box::new)))
        } else {
            Ok(Related::Many(self.get().await?))
        }
    }

    /// Create a related entity from `attributes`, linked to the parent.
    ///
    /// Has-one and has-many set the foreign key on the new entity;
    /// many-to-many saves it and attaches it.
    pub async fn insert(
        &self,
        attributes: impl IntoIterator<Item = (impl Into<String>, impl Into<Value>)>,
    ) -> Result<Entity> {
        let mut entity = Entity::new(self.related.clone());
        entity.fill(attributes);
        self.save(&mut entity).await?;
        Ok(entity)
    }

    /// Link `entity` to the parent and save it.
    pub async fn save(&self, entity: &mut Entity) -> Result<()> {
        let parent_key = self.require_parent_key("save")?.clone();

        match &self.relation.kind {
            RelationKind::HasOne(rel) => {
                entity.set(rel.foreign_key.clone(), parent_key);
                entity.save(&self.db).await
            }
            RelationKind::HasMany(rel) => {
                entity.set(rel.foreign_key.clone(), parent_key);
                entity.save(&self.db).await
            }
            RelationKind::HasManyAndBelongsTo(_) => {
                entity.save(&self.db).await?;

                let Some(key) = entity.key().cloned() else {
                    crate::bail!("saved `{}` entity has no key", self.related.name);
                };

                self.attach(key, crate::Attributes::new()).await
            }
            RelationKind::BelongsTo(_) => Err(self.wrong_kind("save")),
        }
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<Entity>> {
        if self.parent_key.is_null() {
            return Ok(vec![]);
        }

        let rows = self.db.select(query).await?;
        let loader = Loader::new(&self.related, &self.relation);

        Ok(rows.into_iter().map(|row| loader.entity(row)).collect())
    }

    fn require_parent_key(&self, operation: &str) -> Result<&Value> {
        if self.parent_key.is_null() {
            crate::bail!(
                "`{operation}` through `{}` needs a parent entity with a key",
                self.relation.name
            );
        }

        Ok(&self.parent_key)
    }

    fn wrong_kind(&self, operation: &str) -> crate::Error {
        wrong_kind(&self.parent, &self.relation, operation)
    }
}

/// Parent attribute holding the value related rows are matched against.
pub(crate) fn parent_column<'a>(
    parent: &'a schema::Model,
    relation: &'a schema::Relation,
) -> &'a str {
    match &relation.kind {
        RelationKind::BelongsTo(rel) => &rel.foreign_key,
        RelationKind::HasOne(_)
        | RelationKind::HasMany(_)
        | RelationKind::HasManyAndBelongsTo(_) => &parent.key,
    }
}

/// Attribute of a loaded related entity that matches `parent_column`. For
/// many-to-many it is read from the pivot.
pub(crate) fn child_key<'a>(
    related: &schema::Model,
    relation: &schema::Relation,
    child: &'a Entity,
) -> Option<&'a Value> {
    match &relation.kind {
        RelationKind::BelongsTo(_) => child.get(&related.key),
        RelationKind::HasOne(rel) => child.get(&rel.foreign_key),
        RelationKind::HasMany(rel) => child.get(&rel.foreign_key),
        RelationKind::HasManyAndBelongsTo(rel) => child.pivot()?.get(&rel.foreign_key),
    }
}

/// Select over the related table. Many-to-many joins the join table and
/// selects its columns under [`PIVOT_PREFIX`].
pub(crate) fn base_query(related: &schema::Model, relation: &schema::Relation) -> Query {
    let mut query = Query::table(&related.table);

    if let RelationKind::HasManyAndBelongsTo(rel) = &relation.kind {
        query.select([format!("{}.*", related.table)]);

        let pivot_columns = [&rel.foreign_key, &rel.other_key]
            .into_iter()
            .chain(&rel.pivot_columns);

        for column in pivot_columns {
            query.add_select(format!(
                "{}.{column} as {PIVOT_PREFIX}{column}",
                rel.table
            ));
        }

        query.join(
            &rel.table,
            format!("{}.{}", related.table, related.key),
            BinaryOp::Eq,
            format!("{}.{}", rel.table, rel.other_key),
        );
    }

    query
}

/// Column the parent values are compared with.
pub(crate) fn constrained_column(related: &schema::Model, relation: &schema::Relation) -> String {
    match &relation.kind {
        RelationKind::BelongsTo(_) => format!("{}.{}", related.table, related.key),
        RelationKind::HasOne(rel) => format!("{}.{}", related.table, rel.foreign_key),
        RelationKind::HasMany(rel) => format!("{}.{}", related.table, rel.foreign_key),
        RelationKind::HasManyAndBelongsTo(rel) => format!("{}.{}", rel.table, rel.foreign_key),
    }
}

/// Turns rows of a relationship's query into related entities.
pub(crate) struct Loader<'a> {
    related: &'a Arc<schema::Model>,

    /// Join table model, many-to-many only
    pivot: Option<Arc<schema::Model>>,
}

impl<'a> Loader<'a> {
    pub(crate) fn new(related: &'a Arc<schema::Model>, relation: &schema::Relation) -> Loader<'a> {
        let pivot = match &relation.kind {
            RelationKind::HasManyAndBelongsTo(rel) => Some(pivot::model(rel)),
            _ => None,
        };

        Loader { related, pivot }
    }

    /// Build an entity from a row, moving `pivot_*` columns onto its pivot.
    pub(crate) fn entity(&self, row: Row) -> Entity {
        let Some(pivot_model) = &self.pivot else {
            return Entity::from_row(self.related.clone(), row);
        };

        let (pivot, attributes): (Row, Row) = row
            .into_iter()
            .partition(|(name, _)| name.starts_with(PIVOT_PREFIX));

        let pivot = pivot
            .into_iter()
            .map(|(name, value)| (name[PIVOT_PREFIX.len()..].to_string(), value))
            .collect();

        let mut entity = Entity::from_row(self.related.clone(), attributes);
        entity.set_pivot(Entity::from_row(pivot_model.clone(), pivot));
        entity
    }
}

mod json;

use crate::{
    schema,
    stmt::{Delete, Insert, Query, Update, Value},
    Attributes, Db, Error, RelationQuery, Result,
};

use chrono::{NaiveDateTime, Timelike, Utc};
use indexmap::IndexMap;
use std::sync::Arc;

/// One row of a model's table.
///
/// An entity holds its current attributes and a snapshot of them as last
/// read from or written to the database. It is dirty when it has never been
/// saved or when the two differ.
#[derive(Debug, Clone)]
pub struct Entity {
    model: Arc<schema::Model>,
    attributes: Attributes,
    original: Attributes,
    exists: bool,

    /// Loaded relationships, by name
    relations: IndexMap<String, Related>,

    /// Join row a many-to-many relationship loaded this entity through
    pivot: Option<Box<Entity>>,
}

/// The loaded value of a relationship.
#[derive(Debug, Clone)]
pub enum Related {
    /// Belongs-to and has-one
    One(Option<Box<Entity>>),

    /// Has-many and many-to-many
    Many(Vec<Entity>),
}

impl Entity {
    /// A new, unsaved entity.
    pub(crate) fn new(model: Arc<schema::Model>) -> Entity {
        Entity {
            model,
            attributes: Attributes::new(),
            original: Attributes::new(),
            exists: false,
            relations: IndexMap::new(),
            pivot: None,
        }
    }

    /// An entity read from the database.
    pub(crate) fn from_row(model: Arc<schema::Model>, row: Attributes) -> Entity {
        Entity {
            model,
            original: row.clone(),
            attributes: row,
            exists: true,
            relations: IndexMap::new(),
            pivot: None,
        }
    }

    pub fn model(&self) -> &Arc<schema::Model> {
        &self.model
    }

    /// Primary key value; `None` until the entity has one.
    pub fn key(&self) -> Option<&Value> {
        self.attributes
            .get(&self.model.key)
            .filter(|value| !value.is_null())
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }

    pub fn set(&mut self, attribute: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.attributes.insert(attribute.into(), value.into());
        self
    }

    pub fn has(&self, attribute: &str) -> bool {
        self.attributes.contains_key(attribute)
    }

    pub fn remove(&mut self, attribute: &str) -> Option<Value> {
        self.attributes.shift_remove(attribute)
    }

    /// Mass-assign attributes. Attributes outside the model's fillable list
    /// are ignored.
    pub fn fill(
        &mut self,
        attributes: impl IntoIterator<Item = (impl Into<String>, impl Into<Value>)>,
    ) -> &mut Self {
        for (name, value) in attributes {
            let name = name.into();

            if self.model.is_fillable(&name) {
                self.attributes.insert(name, value.into());
            }
        }
        self
    }

    /// Assign attributes, ignoring the fillable list.
    pub fn fill_raw(
        &mut self,
        attributes: impl IntoIterator<Item = (impl Into<String>, impl Into<Value>)>,
    ) -> &mut Self {
        for (name, value) in attributes {
            self.attributes.insert(name.into(), value.into());
        }
        self
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn original(&self) -> &Attributes {
        &self.original
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn dirty(&self) -> bool {
        !self.exists || self.attributes != self.original
    }

    /// Attributes that differ from the original snapshot.
    pub fn get_dirty(&self) -> Attributes {
        self.attributes
            .iter()
            .filter(|(name, value)| self.original.get(name.as_str()) != Some(*value))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    pub fn pivot(&self) -> Option<&Entity> {
        self.pivot.as_deref()
    }

    pub(crate) fn set_pivot(&mut self, pivot: Entity) {
        self.pivot = Some(Box::new(pivot));
    }

    /// A loaded relationship.
    pub fn related(&self, name: &str) -> Option<&Related> {
        self.relations.get(name)
    }

    pub fn related_mut(&mut self, name: &str) -> Option<&mut Related> {
        self.relations.get_mut(name)
    }

    pub fn set_related(&mut self, name: impl Into<String>, related: Related) -> &mut Self {
        self.relations.insert(name.into(), related);
        self
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    pub fn relations(&self) -> &IndexMap<String, Related> {
        &self.relations
    }

    /// Write the entity.
    ///
    /// A clean entity is left alone. Otherwise new entities are inserted and
    /// take the generated key, and existing entities update the attributes
    /// that changed.
    pub async fn save(&mut self, db: &Db) -> Result<()> {
        if !self.dirty() {
            return Ok(());
        }

        let hooks = db.hooks(self.model.id);

        if self.model.timestamps {
            let now = Value::Timestamp(now());

            self.attributes.insert("updated_at".to_string(), now.clone());

            if !self.exists && !self.has("created_at") {
                self.attributes.insert("created_at".to_string(), now);
            }
        }

        (hooks.saving)(self)?;

        if self.exists {
            let dirty = self.get_dirty();

            if !dirty.is_empty() {
                let mut update = Update::new(self.by_key()?);

                for (column, value) in dirty {
                    update.set(column, value);
                }

                db.exec(update).await?;
            }
        } else {
            let insert = Insert::from_map(&self.model.table, &self.attributes);
            let key = db.conn().await.insert(insert, &self.model.key).await?;

            if let Some(key) = key.filter(|_| self.key().is_none()) {
                self.attributes.insert(self.model.key.clone(), key);
            }

            self.exists = true;
        }

        self.original = self.attributes.clone();

        tracing::trace!(model = %self.model.name, key = ?self.key(), "saved");

        (hooks.saved)(self)
    }

    /// Delete the entity's row. The attributes stay in memory and the entity
    /// no longer exists.
    pub async fn delete(&mut self, db: &Db) -> Result<()> {
        if !self.exists {
            return Ok(());
        }

        let hooks = db.hooks(self.model.id);

        (hooks.deleting)(self)?;

        db.exec(Delete::new(self.by_key()?)).await?;
        self.exists = false;

        (hooks.deleted)(self)
    }

    /// Stamp `updated_at` and save.
    pub async fn touch(&mut self, db: &Db) -> Result<()> {
        if !self.model.timestamps {
            return Ok(());
        }

        self.set("updated_at", now());
        self.save(db).await
    }

    /// The loaded relationship, querying for it on first use.
    pub async fn resolve(&mut self, db: &Db, name: &str) -> Result<&Related> {
        if !self.relations.contains_key(name) {
            let related = self.relation(db, name)?.results().await?;
            self.relations.insert(name.to_string(), related);
        }

        Ok(&self.relations[name])
    }

    /// Query the entities related to this one.
    pub fn relation(&self, db: &Db, name: &str) -> Result<RelationQuery> {
        RelationQuery::new(db, self, name)
    }

    /// Point the belongs-to relationship `name` at `related`. The owner is
    /// not saved.
    pub fn associate(&mut self, name: &str, related: &Entity) -> Result<&mut Self> {
        let relation = self.model.relation(name)?;

        let schema::RelationKind::BelongsTo(belongs_to) = &relation.kind else {
            return Err(wrong_kind(&self.model, relation, "associate"));
        };

        let key = related.key().cloned().unwrap_or_default();
        let foreign_key = belongs_to.foreign_key.clone();

        self.set(foreign_key, key);
        self.set_related(name, Related::One(Some(Box::new(related.clone()))));
        Ok(self)
    }

    /// Clear the belongs-to relationship `name`. The owner is not saved.
    pub fn dissociate(&mut self, name: &str) -> Result<&mut Self> {
        let relation = self.model.relation(name)?;

        let schema::RelationKind::BelongsTo(belongs_to) = &relation.kind else {
            return Err(wrong_kind(&self.model, relation, "dissociate"));
        };

        let foreign_key = belongs_to.foreign_key.clone();

        self.set(foreign_key, Value::Null);
        self.set_related(name, Related::One(None));
        Ok(self)
    }

    /// A query selecting this entity's row by key. Saved entities are
    /// matched by the key they were read or written with.
    fn by_key(&self) -> Result<Query> {
        let stored = self
            .original
            .get(&self.model.key)
            .filter(|value| self.exists && !value.is_null());

        let Some(key) = stored.or_else(|| self.key()) else {
            return Err(crate::err!(
                "`{}` entity has no value for key `{}`",
                self.model.name,
                self.model.key
            ));
        };

        let mut query = Query::table(&self.model.table);
        query.filter(self.model.key.as_str(), key);
        Ok(query)
    }
}

impl Related {
    pub fn as_one(&self) -> Option<&Entity> {
        match self {
            Related::One(entity) => entity.as_deref(),
            Related::Many(_) => None,
        }
    }

    pub fn as_many(&self) -> &[Entity] {
        match self {
            Related::One(_) => &[],
            Related::Many(entities) => entities,
        }
    }

    /// Loaded entities, zero or one for a to-one relationship.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        let (one, many): (Option<&Entity>, &[Entity]) = match self {
            Related::One(entity) => (entity.as_deref(), Default::default()),
            Related::Many(entities) => (None, entities),
        };

        one.into_iter().chain(many)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        let (one, many): (Option<&mut Entity>, &mut [Entity]) = match self {
            Related::One(entity) => (entity.as_deref_mut(), Default::default()),
            Related::Many(entities) => (None, entities),
        };

        one.into_iter().chain(many)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub(crate) fn wrong_kind(
    model: &schema::Model,
    relation: &schema::Relation,
    operation: &str,
) -> Error {
    crate::err!(
        "`{operation}` is not available on `{}.{}` ({})",
        model.name,
        relation.name,
        kind_name(&relation.kind)
    )
}

fn kind_name(kind: &schema::RelationKind) -> &'static str {
    match kind {
        schema::RelationKind::BelongsTo(_) => "belongs-to",
        schema::RelationKind::HasOne(_) => "has-one",
        schema::RelationKind::HasMany(_) => "has-many",
        schema::RelationKind::HasManyAndBelongsTo(_) => "many-to-many",
    }
}

/// Current time, truncated to whole seconds as stored.
pub(crate) fn now() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}

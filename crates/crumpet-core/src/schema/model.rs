use super::{Name, Relation};

use indexmap::IndexMap;
use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub usize);

impl fmt::Debug for ModelId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ModelId({})", self.0)
    }
}

/// Type-level metadata of an entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Uniquely identifies the model within the schema
    pub id: ModelId,

    pub name: String,

    /// Backing table
    pub table: String,

    /// Primary key column
    pub key: String,

    /// `created_at` / `updated_at` are stamped on save
    pub timestamps: bool,

    /// Mass-assignable attributes. `None` accepts every attribute.
    pub fillable: Option<Vec<String>>,

    /// Declared relationships, in declaration order
    pub relations: IndexMap<String, Relation>,
}

impl Model {
    /// A model with the conventional table and key and no relationships.
    pub fn new(id: ModelId, name: impl Into<String>) -> Model {
        let name = name.into();
        Model {
            id,
            table: Name::new(name.as_str()).table_name(),
            name,
            key: "id".to_string(),
            timestamps: false,
            fillable: None,
            relations: IndexMap::new(),
        }
    }

    pub fn relation(&self, name: &str) -> crate::Result<&Relation> {
        self.relations
            .get(name)
            .ok_or_else(|| crate::Error::unknown_relationship(&self.name, name))
    }

    pub fn is_fillable(&self, attribute: &str) -> bool {
        match &self.fillable {
            Some(fillable) => fillable.iter().any(|name| name == attribute),
            None => true,
        }
    }

    /// Order requested relationship names for eager loading.
    ///
    /// Names keep their requested order, except that a relationship declared
    /// `after` another requested relationship is moved behind it. Names that
    /// are not declared are passed through in place. Dependencies have been
    /// verified acyclic when the schema was built.
    pub fn eager_order<'a>(&self, requested: &[&'a str]) -> Vec<&'a str> {
        let mut pending: Vec<&'a str> = requested.to_vec();
        let mut sorted: Vec<&'a str> = Vec::with_capacity(pending.len());

        while !pending.is_empty() {
            let ready = pending.iter().position(|name| {
                let Some(relation) = self.relations.get(*name) else {
                    return true;
                };

                // Placed names leave `pending`
                relation
                    .after
                    .iter()
                    .all(|dep| !pending.iter().any(|other| *other == dep.as_str()))
            });

            // Verification rules out cycles, so something is always ready
            let index = ready.unwrap_or(0);
            sorted.push(pending.remove(index));
        }

        sorted
    }
}

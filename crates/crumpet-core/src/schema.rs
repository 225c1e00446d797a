mod model;
pub use model::{Model, ModelId};

mod name;
pub use name::Name;

mod relation;
pub use relation::{BelongsTo, HasMany, HasManyAndBelongsTo, HasOne, Relation, RelationKind};

mod verify;

use crate::{Error, Result};

use indexmap::IndexMap;
use std::sync::Arc;

/// Registry of every model known to a database handle.
///
/// Built once, when the handle is built, and immutable afterwards.
#[derive(Debug, Default)]
pub struct Schema {
    models: Vec<Arc<Model>>,
    by_name: IndexMap<String, ModelId>,
}

impl Schema {
    /// Build a schema from resolved models, verifying relationship
    /// declarations.
    ///
    /// Each model's `id` must equal its position in `models`.
    pub fn from_models(models: Vec<Model>) -> Result<Schema> {
        let mut by_name = IndexMap::new();

        for (index, model) in models.iter().enumerate() {
            assert_eq!(model.id, ModelId(index), "model ids must be positional");

            if by_name.insert(model.name.clone(), model.id).is_some() {
                crate::bail!("model `{}` registered more than once", model.name);
            }
        }

        let schema = Schema {
            models: models.into_iter().map(Arc::new).collect(),
            by_name,
        };

        schema.verify()?;
        Ok(schema)
    }

    pub fn models(&self) -> impl ExactSizeIterator<Item = &Arc<Model>> {
        self.models.iter()
    }

    #[track_caller]
    pub fn model(&self, id: impl Into<ModelId>) -> &Arc<Model> {
        &self.models[id.into().0]
    }

    pub fn model_by_name(&self, name: &str) -> Result<&Arc<Model>> {
        self.by_name
            .get(name)
            .map(|id| &self.models[id.0])
            .ok_or_else(|| Error::unknown_model(name))
    }
}

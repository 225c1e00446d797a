use super::{RelationBuilder, RelationDecl};
use crate::Model;

/// A model declaration, as written by [`Model::declare`].
///
/// Names left unset fall back to conventions when the schema is built: the
/// table is the plural snake case of the model name and the key is `id`.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    /// Name of the model
    pub name: &'static str,

    /// Table override
    pub table: Option<String>,

    /// Primary key override
    pub key: Option<String>,

    pub timestamps: bool,

    pub fillable: Option<Vec<String>>,

    /// Relationship declarations, in declaration order
    pub relations: Vec<RelationBuilder>,
}

impl ModelBuilder {
    pub(crate) fn new(name: &'static str) -> ModelBuilder {
        ModelBuilder {
            name,
            table: None,
            key: None,
            timestamps: false,
            fillable: None,
            relations: vec![],
        }
    }

    pub fn table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    pub fn key(&mut self, column: impl Into<String>) -> &mut Self {
        self.key = Some(column.into());
        self
    }

    /// Stamp `created_at` and `updated_at` on save.
    pub fn timestamps(&mut self) -> &mut Self {
        self.timestamps = true;
        self
    }

    /// Restrict mass assignment through [`Entity::fill`](crate::Entity::fill)
    /// to the given attributes.
    pub fn fillable<I>(&mut self, attributes: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.fillable = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    /// The foreign key lives on this model and points at `T`.
    pub fn belongs_to<T: Model>(&mut self, name: &str) -> &mut RelationBuilder {
        self.push(name, T::NAME, RelationDecl::BelongsTo)
    }

    /// `T` holds a foreign key pointing at this model; at most one matches.
    pub fn has_one<T: Model>(&mut self, name: &str) -> &mut RelationBuilder {
        self.push(name, T::NAME, RelationDecl::HasOne)
    }

    /// `T` holds a foreign key pointing at this model.
    pub fn has_many<T: Model>(&mut self, name: &str) -> &mut RelationBuilder {
        self.push(name, T::NAME, RelationDecl::HasMany)
    }

    /// Many-to-many through a join table.
    pub fn has_many_and_belongs_to<T: Model>(&mut self, name: &str) -> &mut RelationBuilder {
        self.push(name, T::NAME, RelationDecl::HasManyAndBelongsTo)
    }

    fn push(&mut self, name: &str, target: &'static str, decl: RelationDecl) -> &mut RelationBuilder {
        let index = self.relations.len();
        self.relations.push(RelationBuilder::new(name, target, decl));
        &mut self.relations[index]
    }
}

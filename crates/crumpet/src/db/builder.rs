use super::{Db, Shared};
use crate::{
    model::Hooks,
    schema::{
        self, BelongsTo, HasMany, HasManyAndBelongsTo, HasOne, ModelBuilder, ModelId, Name,
        RelationDecl, RelationKind, Schema,
    },
    Error, Model, Result,
};

use crumpet_core::driver::{Dialect, Driver};
use crumpet_sql::Serializer;

use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
pub struct Builder {
    /// Model declarations, unresolved
    models: Vec<ModelBuilder>,

    /// Hooks of each registered model, in registration order
    hooks: Vec<Hooks>,

    /// Prepended to every table name, join tables included
    table_name_prefix: Option<String>,

    /// Compile for this dialect instead of the driver's
    dialect: Option<Dialect>,
}

impl Builder {
    pub fn register<T: Model>(&mut self) -> &mut Self {
        let mut model = ModelBuilder::new(T::NAME);
        T::declare(&mut model);

        self.models.push(model);
        self.hooks.push(Hooks::of::<T>());
        self
    }

    /// Set the table name prefix for all tables
    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.table_name_prefix = Some(prefix.to_string());
        self
    }

    /// Override the SQL dialect reported by the driver.
    pub fn dialect(&mut self, dialect: Dialect) -> &mut Self {
        self.dialect = Some(dialect);
        self
    }

    /// Resolve every registered declaration into a verified schema.
    ///
    /// Fails when a relationship targets a model that was not registered or
    /// when relationship dependencies are invalid.
    pub fn build_schema(&self) -> Result<Schema> {
        let ids: IndexMap<&str, ModelId> = self
            .models
            .iter()
            .enumerate()
            .map(|(index, model)| (model.name, ModelId(index)))
            .collect();

        let models = self
            .models
            .iter()
            .enumerate()
            .map(|(index, model)| self.resolve_model(&ids, model, ModelId(index)))
            .collect::<Result<Vec<_>>>()?;

        Schema::from_models(models)
    }

    fn resolve_model(
        &self,
        ids: &IndexMap<&str, ModelId>,
        decl: &ModelBuilder,
        id: ModelId,
    ) -> Result<schema::Model> {
        let owner = Name::new(decl.name);

        let mut model = schema::Model::new(id, decl.name);
        model.table = self.prefixed(decl.table.clone().unwrap_or_else(|| owner.table_name()));
        model.timestamps = decl.timestamps;
        model.fillable = decl.fillable.clone();

        if let Some(key) = &decl.key {
            model.key = key.clone();
        }

        for relation in &decl.relations {
            let Some(&target) = ids.get(relation.target) else {
                tracing::debug!(
                    model = decl.name,
                    relation = %relation.name,
                    target = relation.target,
                    "relationship targets an unregistered model"
                );
                return Err(Error::unknown_model(relation.target));
            };

            let related = Name::new(relation.target);

            let kind = match relation.decl {
                RelationDecl::BelongsTo => RelationKind::BelongsTo(BelongsTo {
                    foreign_key: relation
                        .foreign_key
                        .clone()
                        .unwrap_or_else(|| Name::new(relation.name.as_str()).foreign_key()),
                }),
                RelationDecl::HasOne => RelationKind::HasOne(HasOne {
                    foreign_key: relation
                        .foreign_key
                        .clone()
                        .unwrap_or_else(|| owner.foreign_key()),
                }),
                RelationDecl::HasMany => RelationKind::HasMany(HasMany {
                    foreign_key: relation
                        .foreign_key
                        .clone()
                        .unwrap_or_else(|| owner.foreign_key()),
                }),
                RelationDecl::HasManyAndBelongsTo => {
                    RelationKind::HasManyAndBelongsTo(HasManyAndBelongsTo {
                        table: self.prefixed(
                            relation
                                .table
                                .clone()
                                .unwrap_or_else(|| owner.join_table(&related)),
                        ),
                        foreign_key: relation
                            .foreign_key
                            .clone()
                            .unwrap_or_else(|| owner.foreign_key()),
                        other_key: relation
                            .other_key
                            .clone()
                            .unwrap_or_else(|| related.foreign_key()),
                        pivot_columns: relation.pivot_columns.clone(),
                    })
                }
            };

            model.relations.insert(
                relation.name.clone(),
                schema::Relation {
                    name: relation.name.clone(),
                    target,
                    kind,
                    after: relation.after.clone(),
                },
            );
        }

        Ok(model)
    }

    fn prefixed(&self, table: String) -> String {
        match &self.table_name_prefix {
            Some(prefix) => format!("{prefix}{table}"),
            None => table,
        }
    }

    /// Build a handle over the driver selected by the URL scheme.
    pub async fn connect(&mut self, url: &str) -> Result<Db> {
        self.build(super::Connect::new(url)?).await
    }

    pub async fn build(&mut self, driver: impl Driver) -> Result<Db> {
        let schema = self.build_schema()?;

        let capability = driver.capability();
        let dialect = self.dialect.unwrap_or(capability.dialect);
        let serializer = Serializer::new(dialect);

        let connection = driver.connect().await?;

        tracing::debug!(
            models = schema.models().len(),
            ?dialect,
            "database handle built"
        );

        Ok(Db {
            shared: Arc::new(Shared {
                schema: Arc::new(schema),
                hooks: self.hooks.clone(),
                serializer,
                insert_returning: capability.insert_returning && serializer.supports_returning(),
                connection: Mutex::new(connection),
            }),
        })
    }
}

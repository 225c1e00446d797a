mod builder;
mod conn;
mod connect;

pub use builder::Builder;
pub(crate) use conn::Conn;
pub use connect::Connect;

use crate::{
    model::{Hooks, Model},
    schema::{self, ModelId, Schema},
    stmt::{Query, Statement, Value},
    Entity, ModelQuery, Result,
};

use crumpet_core::driver::{Connection, Row};
use crumpet_sql::Serializer;

use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared state between all `Db` clones.
pub(crate) struct Shared {
    pub(crate) schema: Arc<Schema>,

    /// Lifecycle hooks, indexed by model id
    pub(crate) hooks: Vec<Hooks>,

    pub(crate) serializer: Serializer,

    /// Inserts return their key through `RETURNING`
    pub(crate) insert_returning: bool,

    /// The single connection all clones share
    pub(crate) connection: Mutex<Box<dyn Connection>>,
}

/// A database handle.
///
/// Cloning is cheap; clones share the schema and one connection.
#[derive(Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// A handle with no registered models, for running statements directly.
    pub async fn connect(url: &str) -> Result<Db> {
        Db::builder().connect(url).await
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.shared.schema
    }

    pub fn serializer(&self) -> Serializer {
        self.shared.serializer
    }

    /// Schema entry of a registered model.
    pub fn model<M: Model>(&self) -> Result<&Arc<schema::Model>> {
        self.shared.schema.model_by_name(M::NAME)
    }

    pub(crate) fn hooks(&self, id: ModelId) -> Hooks {
        self.shared
            .hooks
            .get(id.0)
            .copied()
            .unwrap_or_else(Hooks::none)
    }

    pub(crate) fn insert_returning(&self) -> bool {
        self.shared.insert_returning
    }

    /// Take the connection for a sequence of operations.
    pub(crate) async fn conn(&self) -> Conn<'_> {
        Conn {
            db: self,
            connection: self.shared.connection.lock().await,
        }
    }

    /// Run a SELECT and return its rows.
    pub async fn select(&self, query: &Query) -> Result<Vec<Row>> {
        self.conn().await.select(query).await
    }

    /// Run a write statement and return the number of affected rows.
    pub async fn exec(&self, stmt: impl Into<Statement>) -> Result<u64> {
        self.conn().await.exec(stmt.into()).await
    }

    pub fn query<M: Model>(&self) -> Result<ModelQuery> {
        Ok(ModelQuery::new(self.clone(), self.model::<M>()?.clone()))
    }

    pub async fn find<M: Model>(&self, id: impl Into<Value>) -> Result<Option<Entity>> {
        self.query::<M>()?.find(id).await
    }

    /// Like [`find`](Db::find), failing with `EntityNotFound` when no row
    /// has the key.
    pub async fn find_or_fail<M: Model>(&self, id: impl Into<Value>) -> Result<Entity> {
        self.query::<M>()?.find_or_fail(id).await
    }

    pub async fn all<M: Model>(&self) -> Result<Vec<Entity>> {
        self.query::<M>()?.get().await
    }

    /// Fill a new entity with `attributes` and save it.
    pub async fn create<M: Model>(
        &self,
        attributes: impl IntoIterator<Item = (impl Into<String>, impl Into<Value>)>,
    ) -> Result<Entity> {
        let mut entity = self.instance::<M>()?;
        entity.fill(attributes);
        entity.save(self).await?;
        Ok(entity)
    }

    /// A new, unsaved entity.
    pub fn instance<M: Model>(&self) -> Result<Entity> {
        Ok(Entity::new(self.model::<M>()?.clone()))
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("schema", &self.shared.schema)
            .field("serializer", &self.shared.serializer)
            .finish()
    }
}

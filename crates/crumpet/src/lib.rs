pub mod db;
pub use db::Db;

mod entity;
pub use entity::{Entity, Related};

mod hydrate;

mod model;
pub use model::Model;

pub mod query;
pub use query::ModelQuery;

pub mod relation;
pub use relation::RelationQuery;

pub mod schema;

pub use crumpet_core::{
    bail, err,
    stmt::{self, raw, Value},
    Error, Result,
};

/// Attribute map of an entity, in column order.
pub type Attributes = indexmap::IndexMap<String, Value>;

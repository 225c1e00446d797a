mod model;
pub use model::ModelBuilder;

mod relation;
pub use relation::{RelationBuilder, RelationDecl};

pub use crumpet_core::schema::*;

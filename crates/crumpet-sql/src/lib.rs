pub mod serializer;
pub use serializer::{Params, Placeholder, Serializer};

pub use crumpet_core::stmt::{self, Statement};

mod capability;
pub use capability::{Capability, Dialect};

mod response;
pub use response::{Response, Row, Rows};

pub mod operation;
pub use operation::Operation;

use crate::{async_trait, Result};

use std::fmt::Debug;

/// Opens connections to a database.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Describes the database, which decides the SQL flavor statements are
    /// compiled for.
    fn capability(&self) -> &'static Capability;

    /// Open a new connection.
    async fn connect(&self) -> Result<Box<dyn Connection>>;
}

/// A single database connection.
///
/// The engine hands the connection fully compiled SQL and its ordered
/// bindings. Errors are returned as [`Error::driver`](crate::Error::driver)
/// and are propagated to the caller unchanged.
#[async_trait]
pub trait Connection: Debug + Send + 'static {
    async fn exec(&mut self, op: Operation) -> Result<Response>;
}

#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Delimited, Period};

mod flavor;
use flavor::Flavor;

mod ident;
use ident::{Ident, Name};

mod params;
pub use params::{Params, Placeholder};

// Fragment serializers
mod column;
mod filter;
mod sql_server;
mod statement;
mod value;

use crumpet_core::{driver::operation::Transaction, stmt::Statement, Result};

/// Compiles statements to SQL text for one flavor.
///
/// A serializer holds no state besides its flavor. Compiling the same
/// statement twice yields the same SQL and the same bindings, so a single
/// serializer can be shared freely between tasks and threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Serializer {
    /// The database flavor handles the differences between SQL dialects and
    /// supported features.
    flavor: Flavor,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,
}

impl<T: Params> Formatter<'_, T> {
    /// Render into a fresh buffer, returning what was written.
    ///
    /// Parameters keep accumulating in `params`, so captures must happen in
    /// final text order.
    fn capture(&mut self, f: impl FnOnce(&mut Self)) -> String {
        let mut buf = String::new();
        std::mem::swap(self.dst, &mut buf);
        f(self);
        std::mem::swap(self.dst, &mut buf);
        buf
    }
}

impl Serializer {
    /// Serialize a statement, pushing its bindings into `params` in the order
    /// their placeholders appear in the returned SQL.
    ///
    /// Fails with `UnsupportedOperation` when the flavor cannot express the
    /// statement.
    pub fn serialize(&self, stmt: &Statement, params: &mut impl Params) -> Result<String> {
        self.check_supported(stmt)?;

        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
        };

        stmt.to_sql(&mut fmt);

        Ok(ret)
    }

    /// Serialize a transaction control operation to a SQL string.
    ///
    /// MySQL uses `START TRANSACTION` and SQL Server `BEGIN TRANSACTION`;
    /// the others use `BEGIN`.
    pub fn serialize_transaction(&self, op: &Transaction) -> String {
        match op {
            Transaction::Start => match self.flavor {
                Flavor::Mysql => "START TRANSACTION".to_string(),
                Flavor::SqlServer => "BEGIN TRANSACTION".to_string(),
                _ => "BEGIN".to_string(),
            },
            Transaction::Commit => "COMMIT".to_string(),
            Transaction::Rollback => "ROLLBACK".to_string(),
        }
    }

    /// `strftime`-style format used when binding timestamps.
    pub fn datetime_format(&self) -> &'static str {
        self.flavor.datetime_format()
    }

    /// True when inserts can return their generated key.
    pub fn supports_returning(&self) -> bool {
        self.flavor.supports_returning()
    }

    fn check_supported(&self, stmt: &Statement) -> Result<()> {
        match stmt {
            Statement::Insert(insert) if insert.returning.is_some() => {
                if !self.flavor.supports_returning() {
                    return Err(crumpet_core::Error::unsupported_operation(
                        self.flavor.name(),
                        "INSERT ... RETURNING",
                    ));
                }
            }
            Statement::Truncate(_) if self.is_sqlite() => {
                return Err(crumpet_core::Error::unsupported_operation(
                    self.flavor.name(),
                    "TRUNCATE",
                ));
            }
            Statement::Update(update) if update.target.table_name().is_none() => {
                crumpet_core::bail!("UPDATE requires a target table");
            }
            Statement::Update(update) if update.assignments.is_empty() => {
                crumpet_core::bail!("UPDATE requires at least one assignment");
            }
            Statement::Delete(delete) if delete.target.table_name().is_none() => {
                crumpet_core::bail!("DELETE requires a target table");
            }
            _ => {}
        }

        Ok(())
    }
}

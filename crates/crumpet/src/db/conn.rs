use super::Db;
use crate::{
    stmt::{Insert, Query, Statement, Value},
    Result,
};

use crumpet_core::driver::{
    operation::{ExecSql, QuerySql, Transaction},
    Connection, Operation, Response, Row,
};

use tokio::sync::MutexGuard;

/// Exclusive use of the shared connection.
///
/// Operations that must not interleave with other handles, such as the
/// statements of a transaction, run through one `Conn`.
pub(crate) struct Conn<'a> {
    pub(super) db: &'a Db,
    pub(super) connection: MutexGuard<'a, Box<dyn Connection>>,
}

impl Conn<'_> {
    fn compile(&self, stmt: &Statement) -> Result<(String, Vec<Value>)> {
        let mut bindings = vec![];
        let sql = self.db.serializer().serialize(stmt, &mut bindings)?;
        Ok((sql, bindings))
    }

    async fn run(&mut self, op: Operation) -> Result<Response> {
        if let Some(sql) = op.sql() {
            tracing::debug!(sql = %sql, params = op.bindings().len(), "crumpet.query");
        }

        self.connection.exec(op).await
    }

    pub(crate) async fn select(&mut self, query: &Query) -> Result<Vec<Row>> {
        let (sql, bindings) = self.compile(&Statement::Query(query.clone()))?;

        self.run(QuerySql { sql, bindings }.into())
            .await?
            .rows
            .into_values()
    }

    pub(crate) async fn exec(&mut self, stmt: Statement) -> Result<u64> {
        let (sql, bindings) = self.compile(&stmt)?;

        let response = self
            .run(
                ExecSql {
                    sql,
                    bindings,
                    generated_key: false,
                }
                .into(),
            )
            .await?;

        Ok(response.rows.count())
    }

    /// Insert one row, returning the key the database generated for it.
    pub(crate) async fn insert(&mut self, mut insert: Insert, key: &str) -> Result<Option<Value>> {
        if self.db.insert_returning() {
            insert.returning(key);

            let (sql, bindings) = self.compile(&insert.into())?;
            let rows = self
                .run(QuerySql { sql, bindings }.into())
                .await?
                .rows
                .into_values()?;

            return Ok(rows
                .into_iter()
                .next()
                .and_then(|mut row| row.swap_remove(key)));
        }

        let (sql, bindings) = self.compile(&insert.into())?;
        let response = self
            .run(
                ExecSql {
                    sql,
                    bindings,
                    generated_key: true,
                }
                .into(),
            )
            .await?;

        Ok(response.generated_key)
    }

    pub(crate) async fn begin(&mut self) -> Result<()> {
        tracing::debug!(event = "begin", "crumpet.transaction");
        self.run(Transaction::Start.into()).await?;
        Ok(())
    }

    pub(crate) async fn commit(&mut self) -> Result<()> {
        tracing::debug!(event = "commit", "crumpet.transaction");
        self.run(Transaction::Commit.into()).await?;
        Ok(())
    }

    pub(crate) async fn rollback(&mut self) -> Result<()> {
        tracing::debug!(event = "rollback", "crumpet.transaction");
        self.run(Transaction::Rollback.into()).await?;
        Ok(())
    }
}

//! Connection boundary: the only place where built queries meet a database.

use tokio_postgres::types::ToSql;
use tokio_postgres::{Row, Statement};

use crate::error::{SegError, SegResult};

/// A trait that unifies database clients and transactions.
///
/// Built queries are executed through this trait only, so callers can pass a
/// direct connection, a pooled connection or a transaction.
pub trait GenericClient: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = SegResult<Vec<Row>>> + Send;

    /// Execute a query and return the **first** row.
    ///
    /// Returns `SegError::NotFound` if no rows are returned; extra rows are ignored.
    fn query_one(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = SegResult<Row>> + Send {
        async move {
            let rows = self.query(sql, params).await?;
            rows.into_iter()
                .next()
                .ok_or_else(|| SegError::not_found("Expected one row, got none"))
        }
    }

    /// Execute a query and return the first row, if any.
    fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = SegResult<Option<Row>>> + Send {
        async move {
            let rows = self.query(sql, params).await?;
            Ok(rows.into_iter().next())
        }
    }

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = SegResult<u64>> + Send;

    /// Prepare a statement on this connection.
    fn prepare(&self, sql: &str) -> impl std::future::Future<Output = SegResult<Statement>> + Send;
}

impl GenericClient for tokio_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> SegResult<Vec<Row>> {
        Ok(tokio_postgres::Client::query(self, sql, params).await?)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> SegResult<u64> {
        Ok(tokio_postgres::Client::execute(self, sql, params).await?)
    }

    async fn prepare(&self, sql: &str) -> SegResult<Statement> {
        Ok(tokio_postgres::Client::prepare(self, sql).await?)
    }
}

impl GenericClient for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> SegResult<Vec<Row>> {
        Ok(tokio_postgres::Transaction::query(self, sql, params).await?)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> SegResult<u64> {
        Ok(tokio_postgres::Transaction::execute(self, sql, params).await?)
    }

    async fn prepare(&self, sql: &str) -> SegResult<Statement> {
        Ok(tokio_postgres::Transaction::prepare(self, sql).await?)
    }
}

impl<C: GenericClient> GenericClient for &C {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> SegResult<Vec<Row>> {
        C::query(*self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> SegResult<u64> {
        C::execute(*self, sql, params).await
    }

    async fn prepare(&self, sql: &str) -> SegResult<Statement> {
        C::prepare(*self, sql).await
    }
}

// ===== deadpool-postgres support =====

/// Implement `GenericClient` for a type by delegating to its deref target.
#[cfg(feature = "pool")]
macro_rules! delegate_to_deref {
    ($($ty:ty),* $(,)?) => {
        $(
            impl GenericClient for $ty {
                async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> SegResult<Vec<Row>> {
                    GenericClient::query(&**self, sql, params).await
                }

                async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> SegResult<u64> {
                    GenericClient::execute(&**self, sql, params).await
                }

                async fn prepare(&self, sql: &str) -> SegResult<Statement> {
                    GenericClient::prepare(&**self, sql).await
                }
            }
        )*
    };
}

#[cfg(feature = "pool")]
delegate_to_deref!(
    deadpool_postgres::Client,
    deadpool_postgres::ClientWrapper,
    deadpool_postgres::Transaction<'_>,
);

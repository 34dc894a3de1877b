/// Generate query execution methods for a type whose `$prepare` block
/// evaluates to a `Cow<'_, BuiltQuery>`.
///
/// Queries built in positional style are rejected before they reach the
/// connection.
///
/// Usage:
/// ```ignore
/// impl_query_exec! {
///     prepare(self) {
///         Cow::Owned(self.build()?)
///     }
/// }
/// ```
macro_rules! impl_query_exec {
    (prepare($this:ident) $prepare:block) => {
        /// Execute the built SQL and return all rows.
        pub async fn fetch_all(&$this, conn: &impl $crate::client::GenericClient) -> $crate::error::SegResult<Vec<tokio_postgres::Row>> {
            let built: std::borrow::Cow<'_, $crate::build::BuiltQuery> = $prepare;
            built.check_executable()?;
            conn.query(&built.sql, &built.params_ref()).await
        }

        /// Execute the built SQL and return all rows mapped to `T`.
        pub async fn fetch_all_as<T: $crate::row::FromRow>(&$this, conn: &impl $crate::client::GenericClient) -> $crate::error::SegResult<Vec<T>> {
            let rows = $this.fetch_all(conn).await?;
            rows.iter().map(T::from_row).collect()
        }

        /// Execute the built SQL and return the **first** row.
        pub async fn fetch_one(&$this, conn: &impl $crate::client::GenericClient) -> $crate::error::SegResult<tokio_postgres::Row> {
            let built: std::borrow::Cow<'_, $crate::build::BuiltQuery> = $prepare;
            built.check_executable()?;
            conn.query_one(&built.sql, &built.params_ref()).await
        }

        /// Execute the built SQL and return the **first** row mapped to `T`.
        pub async fn fetch_one_as<T: $crate::row::FromRow>(&$this, conn: &impl $crate::client::GenericClient) -> $crate::error::SegResult<T> {
            let row = $this.fetch_one(conn).await?;
            T::from_row(&row)
        }

        /// Execute the built SQL and return the first row, if any.
        pub async fn fetch_opt(&$this, conn: &impl $crate::client::GenericClient) -> $crate::error::SegResult<Option<tokio_postgres::Row>> {
            let built: std::borrow::Cow<'_, $crate::build::BuiltQuery> = $prepare;
            built.check_executable()?;
            conn.query_opt(&built.sql, &built.params_ref()).await
        }

        /// Execute the built SQL and return at most one row mapped to `T`.
        pub async fn fetch_opt_as<T: $crate::row::FromRow>(&$this, conn: &impl $crate::client::GenericClient) -> $crate::error::SegResult<Option<T>> {
            let row = $this.fetch_opt(conn).await?;
            row.as_ref().map(T::from_row).transpose()
        }

        /// Execute the built SQL and return exactly one scalar value from column 0.
        pub async fn fetch_scalar_one<T>(&$this, conn: &impl $crate::client::GenericClient) -> $crate::error::SegResult<T>
        where
            T: for<'b> tokio_postgres::types::FromSql<'b> + Send + Sync,
        {
            let row = $this.fetch_one(conn).await?;
            row.try_get(0)
                .map_err(|e| $crate::error::SegError::decode("0", e.to_string()))
        }

        /// Execute the built SQL and return affected row count.
        pub async fn execute(&$this, conn: &impl $crate::client::GenericClient) -> $crate::error::SegResult<u64> {
            let built: std::borrow::Cow<'_, $crate::build::BuiltQuery> = $prepare;
            built.check_executable()?;
            conn.execute(&built.sql, &built.params_ref()).await
        }
    };
}

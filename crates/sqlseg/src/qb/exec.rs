use std::borrow::Cow;

use super::QueryBuilder;
use crate::build::Builder;
use crate::client::GenericClient;
use crate::error::SegResult;

impl QueryBuilder {
    impl_query_exec! {
        prepare(self) {
            Cow::Owned(self.build()?)
        }
    }

    /// Count the rows the query returns.
    pub async fn count(&self, conn: &impl GenericClient) -> SegResult<i64> {
        self.count_query(Vec::new())?
            .fetch_scalar_one::<i64>(conn)
            .await
    }
}

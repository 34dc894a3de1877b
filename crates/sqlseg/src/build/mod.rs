//! Building segments into SQL text plus an ordered argument list.
//!
//! A build walks the segment tree depth-first. One [`Session`] is threaded
//! through the whole walk and owns the argument store and the bind-var style;
//! each template gets transient caches and usage bits that are dropped when
//! its build completes.

mod eval;
mod funcs;
mod session;

use std::borrow::Cow;
use std::fmt;

use tokio_postgres::types::ToSql;

pub use eval::Context;
pub use funcs::{CustomFn, FuncMap};
pub use session::Session;

use crate::error::{SegError, SegResult};
use crate::segment::Segment;
use crate::syntax::BindVarStyle;
use crate::value::Value;

/// Anything that renders into a [`Session`].
///
/// Implemented by [`Segment`] and [`QueryBuilder`](crate::qb::QueryBuilder),
/// so both can be nested as CTEs or UNION members.
pub trait Builder: fmt::Debug + Send + Sync {
    /// Render into `session`, sharing its argument store and bind-var style.
    fn build_in(&self, session: &mut Session) -> SegResult<String>;

    /// The session a top-level [`build`](Builder::build) starts from.
    fn session(&self) -> Session {
        Session::new()
    }

    /// Build with a fresh session.
    fn build(&self) -> SegResult<BuiltQuery> {
        let mut session = self.session();
        match self.build_in(&mut session) {
            Ok(sql) => Ok(BuiltQuery::from_session(sql, session)),
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(target: "sqlseg.build", error = %err, "build failed");
                Err(err)
            }
        }
    }
}

impl Builder for Segment {
    fn build_in(&self, session: &mut Session) -> SegResult<String> {
        eval::build_segment(session, self)
    }
}

/// A finished query: SQL text and the arguments for its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub args: Vec<Value>,
    /// `Auto` when the query has no placeholders.
    pub style: BindVarStyle,
}

impl BuiltQuery {
    pub fn new(sql: impl Into<String>, args: Vec<Value>, style: BindVarStyle) -> Self {
        Self {
            sql: sql.into(),
            args,
            style,
        }
    }

    pub(crate) fn from_session(sql: String, session: Session) -> Self {
        let style = session.style();
        Self {
            sql,
            args: session.into_args(),
            style,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Parameters as the slice `tokio-postgres` expects.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.args
            .iter()
            .map(|v| v as &(dyn ToSql + Sync))
            .collect()
    }

    /// PostgreSQL only understands `$N` placeholders.
    pub fn check_executable(&self) -> SegResult<()> {
        if self.style == BindVarStyle::Positional {
            return Err(SegError::Validation(format!(
                "positional placeholders cannot be sent to PostgreSQL, build with indexed style: {}",
                self.sql
            )));
        }
        Ok(())
    }

    /// The query with arguments rendered inline, for logging only.
    pub fn interpolate(&self) -> SegResult<String> {
        crate::interpolate::interpolate(&self.sql, &self.args)
    }

    impl_query_exec! {
        prepare(self) {
            Cow::Borrowed(self)
        }
    }
}

impl fmt::Display for BuiltQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

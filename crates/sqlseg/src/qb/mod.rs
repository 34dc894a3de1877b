//! Query composition from segments.
//!
//! [`QueryBuilder`] assembles a SELECT query clause by clause. Every clause
//! is itself a segment, so columns, conditions and joins keep their own
//! arguments and are numbered globally when the query is built.
//!
//! ```
//! use sqlseg::{Builder, QueryBuilder, Segment, Table};
//!
//! let foo = Table::new("foo", "f");
//! let bar = Table::new("bar", "b");
//!
//! let built = QueryBuilder::new()
//!     .select([foo.column("*")])
//!     .from(foo.clone())
//!     .inner_join(
//!         bar.clone(),
//!         Segment::new("#c1=#c2").columns([bar.column("foo_id"), foo.column("id")]),
//!     )
//!     .and_where(
//!         Segment::new("(#c1=$1 OR #c2=$1)")
//!             .columns([foo.column("a"), foo.column("b")])
//!             .arg(1),
//!     )
//!     .eq(bar.column("c"), 2)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     built.sql,
//!     "SELECT f.* FROM foo AS f INNER JOIN bar AS b ON b.foo_id=f.id \
//!      WHERE (f.a=$1 OR f.b=$1) AND b.c=$2"
//! );
//! ```
//!
//! Declaration mistakes (empty table names, duplicate joins, ...) do not
//! break the chain: they are collected and reported together by `build()`.

mod compose;
mod dependency;
mod exec;
mod filter;
mod join;
mod with;

use std::collections::HashMap;
use std::sync::Arc;

pub use join::JoinKind;

use crate::build::{Builder, FuncMap};
use crate::config::SegConfig;
use crate::segment::Segment;
use crate::syntax::BindVarStyle;
use crate::table::{Table, TableColumn};

#[derive(Debug, Clone)]
struct FromTable {
    table: Table,
    segment: Segment,
    optional: bool,
}

#[derive(Debug, Clone)]
struct Cte {
    name: String,
    builder: Arc<dyn Builder>,
}

/// Builder for SELECT queries.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    config: SegConfig,
    funcs: Option<Arc<FuncMap>>,
    ctes: Vec<Cte>,
    /// Applied name of the FROM table.
    anchor: Option<String>,
    /// Applied names of joined tables, in declaration order.
    joins: Vec<String>,
    froms: HashMap<String, FromTable>,
    selects: Segment,
    /// Columns selected only to keep `SELECT DISTINCT ... ORDER BY` valid.
    touches: Segment,
    conditions: Segment,
    orders: Segment,
    group_bys: Segment,
    distinct: bool,
    limit: u64,
    offset: u64,
    unions: Vec<Arc<dyn Builder>>,
    errors: Vec<String>,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::with_config(SegConfig::default())
    }

    pub fn with_config(config: SegConfig) -> Self {
        Self {
            config,
            funcs: None,
            ctes: Vec::new(),
            anchor: None,
            joins: Vec::new(),
            froms: HashMap::new(),
            selects: Segment::new("#join('#column', ', ')"),
            touches: Segment::new("#join('#segment', ', ')"),
            conditions: Segment::new("#join('#segment', ' AND ')").prefix("WHERE"),
            orders: Segment::new("#join('#segment', ', ')").prefix("ORDER BY"),
            group_bys: Segment::new("#join('#segment', ', ')").prefix("GROUP BY"),
            distinct: false,
            limit: 0,
            offset: 0,
            unions: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Render placeholders in `style` regardless of the markers templates use.
    pub fn bind_var(mut self, style: BindVarStyle) -> Self {
        self.config.bind_var_style = style;
        self
    }

    /// Log the query every time it is built.
    pub fn debug(mut self) -> Self {
        self.config.debug = true;
        self
    }

    /// Use a function registry with custom functions.
    pub fn funcs(mut self, funcs: Arc<FuncMap>) -> Self {
        self.funcs = Some(funcs);
        self
    }

    /// Use `SELECT DISTINCT`. Also enables optional-join elimination.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Add projection columns.
    pub fn select(mut self, columns: impl IntoIterator<Item = TableColumn>) -> Self {
        self.selects.append_columns(columns);
        self
    }

    /// Order by `column`; `order` is appended verbatim (`ASC`, `DESC NULLS LAST`, ...).
    ///
    /// The column is also selected as `_order_N`, which keeps the query valid
    /// under `SELECT DISTINCT`.
    pub fn order_by(mut self, column: TableColumn, order: &str) -> Self {
        let alias = format!("_order_{}", self.orders.segments.len() + 1);
        self.touches
            .append_segments([Segment::new(format!("#c1 AS {alias}")).column(column)]);
        self.orders
            .append_segments([Segment::new(format!("{alias} {order}"))]);
        self
    }

    pub fn group_by(mut self, column: TableColumn) -> Self {
        self.group_bys
            .append_segments([Segment::new("#c1").column(column)]);
        self
    }

    /// Emitted only when greater than zero.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Emitted only when greater than zero.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Append `UNION (<query>)`; the query shares this builder's argument numbering.
    pub fn union(mut self, builder: impl Builder + 'static) -> Self {
        self.unions.push(Arc::new(builder));
        self
    }

    fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}

#[cfg(test)]
mod tests;

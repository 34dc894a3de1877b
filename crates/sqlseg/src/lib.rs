//! # sqlseg
//!
//! Composable SQL segment templates for PostgreSQL.
//!
//! A [`Segment`] is a fragment of SQL that declares what it needs: bound
//! arguments, table columns, tables and child segments. Its template refers to
//! them by position, and building the tree yields one SQL string with globally
//! numbered placeholders plus the matching argument list.
//!
//! ## Placeholders
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `$N`, `#$N` | argument N, indexed style (`$1, $2, ...`) |
//! | `?`, `#?N` | argument, positional style (one `?` per occurrence) |
//! | `#cN`, `#tN`, `#sN` | column, table, child segment N |
//! | `#join('<template>', '<sep>')` | repeat a template over every column, arg or segment |
//!
//! Every declaration must be used by its template; unused ones fail the build.
//!
//! ## Example
//!
//! ```
//! use sqlseg::{Builder, Segment, Table};
//!
//! let users = Table::named("users");
//! let seg = Segment::new("SELECT #join('#column', ', ') FROM #t1")
//!     .columns(users.expressions(["id", "name", "email"]))
//!     .table(users.clone());
//!
//! let built = seg.build().unwrap();
//! assert_eq!(built.sql, "SELECT id, name, email FROM users");
//! assert!(built.args.is_empty());
//! ```
//!
//! ## Query builder
//!
//! [`QueryBuilder`] composes SELECT queries from segments, collects
//! declaration errors until `build()`, and drops unreferenced optional joins
//! from `SELECT DISTINCT` queries:
//!
//! ```
//! use sqlseg::{Builder, QueryBuilder, Segment, Table};
//!
//! let u = Table::new("users", "u");
//! let o = Table::new("orders", "o");
//!
//! let built = QueryBuilder::new()
//!     .distinct()
//!     .select([u.column("id")])
//!     .from(u.clone())
//!     .left_join_optional(
//!         o.clone(),
//!         Segment::new("#c1=#c2").columns([o.column("user_id"), u.column("id")]),
//!     )
//!     .eq(u.column("active"), true)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(built.sql, "SELECT DISTINCT u.id FROM users AS u WHERE u.active=$1");
//! ```

#[macro_use]
mod exec_macros;

pub mod build;
pub mod client;
pub mod config;
pub mod error;
pub mod interpolate;
pub mod prelude;
pub mod qb;
pub mod row;
pub mod segment;
pub mod syntax;
pub mod table;
pub mod value;

#[cfg(feature = "tracing")]
pub mod trace;

#[cfg(feature = "pool")]
pub mod pool;

pub use build::{Builder, BuiltQuery, Context, CustomFn, FuncMap, Session};
pub use client::GenericClient;
pub use config::SegConfig;
pub use error::{DeclKind, SegError, SegResult};
pub use interpolate::interpolate;
pub use qb::{JoinKind, QueryBuilder};
pub use row::{FromRow, RowExt};
pub use segment::Segment;
pub use syntax::BindVarStyle;
pub use table::{Table, TableColumn};
pub use value::Value;

#[cfg(feature = "tracing")]
pub use trace::SqlTrace;

#[cfg(feature = "pool")]
pub use pool::create_pool;

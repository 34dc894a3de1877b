//! Common imports.
//!
//! ```ignore
//! use sqlseg::prelude::*;
//! ```

pub use crate::{
    BindVarStyle, Builder, BuiltQuery, FromRow, GenericClient, QueryBuilder, RowExt, SegError,
    SegResult, Segment, Table, TableColumn, Value,
};

#[cfg(feature = "pool")]
pub use crate::create_pool;

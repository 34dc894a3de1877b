//! The `Segment` declaration.

use crate::table::{Table, TableColumn};
use crate::value::Value;

/// A reusable SQL fragment.
///
/// `raw` may reference the segment's own declarations:
///
/// | Reference | Resolves to |
/// |-----------|-------------|
/// | `$N`, `?`, `#$N`, `#?N` | `args[N-1]` |
/// | `#cN`, `#colN`, `#columnN` | `columns[N-1]` |
/// | `#tN`, `#tableN` | `tables[N-1]` |
/// | `#sN`, `#segN`, `#segmentN` | `segments[N-1]` |
/// | `#join('<template>', '<sep>')` | `<template>` repeated per declaration |
///
/// Every declaration must be referenced at least once, otherwise building
/// fails. `prefix` and `suffix` are emitted only when the body is non-empty.
/// A segment holds no build state and can be shared between concurrent builds.
///
/// # Example
///
/// ```
/// use sqlseg::{Builder, Segment, Table};
///
/// let t = Table::new("users", "u");
/// let seg = Segment::new("#c1 = $1")
///     .column(t.column("id"))
///     .arg(42)
///     .prefix("WHERE");
///
/// let built = seg.build().unwrap();
/// assert_eq!(built.sql, "WHERE u.id = $1");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    pub raw: String,
    pub args: Vec<Value>,
    pub columns: Vec<TableColumn>,
    pub tables: Vec<Table>,
    pub segments: Vec<Segment>,
    pub prefix: String,
    pub suffix: String,
}

impl Segment {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn args<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.append_args(values);
        self
    }

    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = TableColumn>) -> Self {
        self.append_columns(columns);
        self
    }

    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn tables(mut self, tables: impl IntoIterator<Item = Table>) -> Self {
        self.append_tables(tables);
        self
    }

    pub fn segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn segments(mut self, segments: impl IntoIterator<Item = Segment>) -> Self {
        self.append_segments(segments);
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn append_args<I, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.args.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn append_columns(&mut self, columns: impl IntoIterator<Item = TableColumn>) -> &mut Self {
        self.columns.extend(columns);
        self
    }

    pub fn append_tables(&mut self, tables: impl IntoIterator<Item = Table>) -> &mut Self {
        self.tables.extend(tables);
        self
    }

    pub fn append_segments(&mut self, segments: impl IntoIterator<Item = Segment>) -> &mut Self {
        self.segments.extend(segments);
        self
    }

    /// Whether the segment has no template (and so renders nothing).
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl From<&str> for Segment {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Segment {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

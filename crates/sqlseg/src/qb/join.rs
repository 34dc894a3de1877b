use std::fmt;

use super::{FromTable, QueryBuilder};
use crate::segment::Segment;
use crate::table::Table;

/// SQL join kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl QueryBuilder {
    /// Set the FROM table. Calling it again replaces the previous one.
    pub fn from(mut self, table: Table) -> Self {
        if table.name.is_empty() {
            self.push_error("from table name is empty");
            return self;
        }
        let name = table.applied_name().to_string();
        if self.froms.contains_key(&name) && self.anchor.as_ref() != Some(&name) {
            self.push_error(format!("table [{table}] is already joined"));
            return self;
        }
        if let Some(previous) = self.anchor.take() {
            self.froms.remove(&previous);
        }
        let segment = Segment::new(table.to_string());
        self.froms.insert(
            name.clone(),
            FromTable {
                table,
                segment,
                optional: false,
            },
        );
        self.anchor = Some(name);
        self
    }

    pub fn inner_join(self, table: Table, on: Segment) -> Self {
        self.join(JoinKind::Inner, table, Some(on), false)
    }

    pub fn left_join(self, table: Table, on: Segment) -> Self {
        self.join(JoinKind::Left, table, Some(on), false)
    }

    /// LEFT JOIN that is dropped from a `SELECT DISTINCT` query when nothing
    /// references the table.
    ///
    /// Only use it when `table` cannot multiply the rows of the query; the
    /// DISTINCT removes the duplicates the join would otherwise introduce.
    pub fn left_join_optional(self, table: Table, on: Segment) -> Self {
        self.join(JoinKind::Left, table, Some(on), true)
    }

    pub fn right_join(self, table: Table, on: Segment) -> Self {
        self.join(JoinKind::Right, table, Some(on), false)
    }

    pub fn full_join(self, table: Table, on: Segment) -> Self {
        self.join(JoinKind::Full, table, Some(on), false)
    }

    pub fn cross_join(self, table: Table) -> Self {
        self.join(JoinKind::Cross, table, None, false)
    }

    /// Add a join of any kind. The ON segment's declarations are carried over;
    /// its prefix and suffix are ignored. An ON segment with an empty template
    /// is dropped together with its declarations.
    pub fn join(mut self, kind: JoinKind, table: Table, on: Option<Segment>, optional: bool) -> Self {
        if table.name.is_empty() {
            self.push_error(format!("{kind} table name is empty"));
            return self;
        }
        let name = table.applied_name().to_string();
        if self.froms.contains_key(&name) {
            self.push_error(format!("table [{table}] is already joined"));
            return self;
        }

        // An empty ON clause takes its declarations with it.
        let segment = match on {
            Some(on) if !on.raw.is_empty() => Segment {
                raw: format!("{kind} {table} ON {}", on.raw),
                prefix: String::new(),
                suffix: String::new(),
                ..on
            },
            _ => Segment::new(format!("{kind} {table}")),
        };

        self.froms.insert(
            name.clone(),
            FromTable {
                table,
                segment,
                optional,
            },
        );
        self.joins.push(name);
        self
    }
}

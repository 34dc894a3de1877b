//! Tables and table-bound columns.

use std::fmt;

use crate::value::Value;

/// A table reference: a name plus an optional alias.
///
/// Equality and hashing consider both fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Table {
    pub name: String,
    pub alias: String,
}

impl Table {
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
        }
    }

    /// A table without alias.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// The alias if present, otherwise the name.
    pub fn applied_name(&self) -> &str {
        if self.alias.is_empty() {
            &self.name
        } else {
            &self.alias
        }
    }

    /// The name and the alias as two single-name tables, for templates like
    /// `FROM #t1 AS #t2`.
    pub fn names(&self) -> Vec<Table> {
        vec![Table::named(&self.name), Table::named(&self.alias)]
    }

    /// A column of this table, rendered as `<applied name>.<name>`.
    pub fn column(&self, name: &str) -> TableColumn {
        TableColumn::new(self.clone(), format!("#t1.{name}"))
    }

    pub fn columns<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Vec<TableColumn> {
        names.into_iter().map(|name| self.column(name)).collect()
    }

    /// An expression bound to this table; `#t1` inside it renders the applied name.
    pub fn expression<I, V>(&self, raw: impl Into<String>, args: I) -> TableColumn
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        TableColumn::new(self.clone(), raw).args(args)
    }

    /// Argument-free expressions bound to this table.
    pub fn expressions<'a>(&self, raws: impl IntoIterator<Item = &'a str>) -> Vec<TableColumn> {
        raws.into_iter()
            .map(|raw| TableColumn::new(self.clone(), raw))
            .collect()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alias.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{} AS {}", self.name, self.alias)
        }
    }
}

/// A column or expression owned by a table.
///
/// `raw` is a template built as a nested segment whose only table is
/// `table`; an empty `raw` renders as the empty string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableColumn {
    pub table: Table,
    pub raw: String,
    pub args: Vec<Value>,
}

impl TableColumn {
    pub fn new(table: Table, raw: impl Into<String>) -> Self {
        Self {
            table,
            raw: raw.into(),
            args: Vec::new(),
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
        self.args.extend(values.into_iter().map(Into::into));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applied_name_prefers_alias() {
        assert_eq!(Table::new("users", "u").applied_name(), "u");
        assert_eq!(Table::named("users").applied_name(), "users");
    }

    #[test]
    fn display() {
        assert_eq!(Table::new("users", "u").to_string(), "users AS u");
        assert_eq!(Table::named("users").to_string(), "users");
    }

    #[test]
    fn column_templates() {
        let t = Table::new("users", "u");
        assert_eq!(t.column("id").raw, "#t1.id");
        let expr = t.expression("#t1.age > $1", [18]);
        assert_eq!(expr.args, vec![Value::Int(18)]);
        assert_eq!(
            t.expressions(["COUNT(*)"]),
            vec![TableColumn::new(t.clone(), "COUNT(*)")]
        );
    }
}

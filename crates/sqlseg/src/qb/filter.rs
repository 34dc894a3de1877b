use super::QueryBuilder;
use crate::segment::Segment;
use crate::table::TableColumn;
use crate::value::Value;

impl QueryBuilder {
    /// Add a WHERE condition. Conditions are joined with `AND`; an empty
    /// segment adds nothing.
    pub fn and_where(mut self, condition: Segment) -> Self {
        self.conditions.append_segments([condition]);
        self
    }

    /// `<column><op>$1`, for example `compare(t.column("age"), ">=", 18)`.
    pub fn compare(self, column: TableColumn, op: &str, value: impl Into<Value>) -> Self {
        self.and_where(
            Segment::new(format!("#c1{op}$1"))
                .column(column)
                .arg(value),
        )
    }

    pub fn eq(self, column: TableColumn, value: impl Into<Value>) -> Self {
        self.compare(column, "=", value)
    }

    pub fn ne(self, column: TableColumn, value: impl Into<Value>) -> Self {
        self.compare(column, "<>", value)
    }

    pub fn gt(self, column: TableColumn, value: impl Into<Value>) -> Self {
        self.compare(column, ">", value)
    }

    pub fn gte(self, column: TableColumn, value: impl Into<Value>) -> Self {
        self.compare(column, ">=", value)
    }

    pub fn lt(self, column: TableColumn, value: impl Into<Value>) -> Self {
        self.compare(column, "<", value)
    }

    pub fn lte(self, column: TableColumn, value: impl Into<Value>) -> Self {
        self.compare(column, "<=", value)
    }

    pub fn is_null(self, column: TableColumn) -> Self {
        self.and_where(Segment::new("#c1 IS NULL").column(column))
    }

    pub fn is_not_null(self, column: TableColumn) -> Self {
        self.and_where(Segment::new("#c1 IS NOT NULL").column(column))
    }

    /// `<column> IN (...)`. An empty list matches nothing and renders `FALSE`.
    pub fn in_list<I, V>(self, column: TableColumn, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.membership(column, values, "IN", "FALSE")
    }

    /// `<column> NOT IN (...)`. An empty list matches everything and renders `TRUE`.
    pub fn not_in<I, V>(self, column: TableColumn, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.membership(column, values, "NOT IN", "TRUE")
    }

    fn membership<I, V>(self, column: TableColumn, values: I, op: &str, empty: &str) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return self.and_where(Segment::new(empty));
        }
        self.and_where(
            Segment::new(format!("#c1 {op} (#join('#$', ', '))"))
                .column(column)
                .args(values),
        )
    }
}

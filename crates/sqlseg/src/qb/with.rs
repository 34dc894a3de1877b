use std::sync::Arc;

use super::{Cte, QueryBuilder};
use crate::build::Builder;

impl QueryBuilder {
    /// Declare `WITH <name> AS (<query>)`.
    ///
    /// The CTE is rendered only while a table named `name` is part of the
    /// FROM clause, so an eliminated optional join drops its CTE too.
    pub fn with(mut self, name: impl Into<String>, builder: impl Builder + 'static) -> Self {
        let name = name.into();
        if name.is_empty() {
            self.push_error("with name is empty");
            return self;
        }
        if self.ctes.iter().any(|cte| cte.name == name) {
            self.push_error(format!("CTE [{name}] is already declared"));
            return self;
        }
        self.ctes.push(Cte {
            name,
            builder: Arc::new(builder),
        });
        self
    }
}

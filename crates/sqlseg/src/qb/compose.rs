use std::collections::HashSet;
use std::iter;

use super::{FromTable, QueryBuilder};
use crate::build::{Builder, BuiltQuery, FuncMap, Session};
use crate::error::{SegError, SegResult};
use crate::segment::Segment;
use crate::table::TableColumn;

impl QueryBuilder {
    /// Render the query into `session` with `selects` as projection.
    fn compose(&self, session: &mut Session, selects: &Segment) -> SegResult<String> {
        if !self.errors.is_empty() {
            return Err(SegError::Composition(self.errors.clone()));
        }
        let Some(anchor) = &self.anchor else {
            return Err(SegError::Composition(vec!["no FROM table".to_string()]));
        };

        let deps = self.dependencies(selects)?;
        let froms = self.rendered_froms(anchor.as_str(), &deps);
        let mut clauses = Vec::new();

        let ctes = self.build_ctes(session, &froms)?;
        if !ctes.is_empty() {
            clauses.push(ctes);
        }

        let columns = selects.build_in(session)?;
        if columns.is_empty() {
            return Err(SegError::Composition(vec![
                "no columns selected".to_string(),
            ]));
        }
        let mut select = String::from(if self.distinct {
            "SELECT DISTINCT "
        } else {
            "SELECT "
        });
        select.push_str(&columns);
        let touches = self.touches.build_in(session)?;
        if !touches.is_empty() {
            select.push_str(", ");
            select.push_str(&touches);
        }
        clauses.push(select);

        let mut tables = Vec::with_capacity(froms.len());
        for from in &froms {
            tables.push(from.segment.build_in(session)?);
        }
        clauses.push(format!("FROM {}", tables.join(" ")));

        for clause in [&self.conditions, &self.group_bys, &self.orders] {
            let built = clause.build_in(session)?;
            if !built.is_empty() {
                clauses.push(built);
            }
        }
        if self.limit > 0 {
            clauses.push(format!("LIMIT {}", self.limit));
        }
        if self.offset > 0 {
            clauses.push(format!("OFFSET {}", self.offset));
        }
        let query = clauses.join(" ");

        let mut unions = Vec::with_capacity(self.unions.len());
        for union in &self.unions {
            let built = union.build_in(session)?;
            if !built.is_empty() {
                unions.push(built);
            }
        }
        if unions.is_empty() {
            return Ok(query);
        }
        Ok(format!("{query} UNION ({})", unions.join(") UNION (")))
    }

    /// The anchor, then joins in declaration order. Under DISTINCT, optional
    /// joins nothing depends on are left out.
    fn rendered_froms<'a>(&'a self, anchor: &'a str, deps: &HashSet<String>) -> Vec<&'a FromTable> {
        iter::once(anchor)
            .chain(self.joins.iter().map(String::as_str))
            .filter_map(|name| self.froms.get(name))
            .filter(|from| !self.distinct || !from.optional || deps.contains(from.table.applied_name()))
            .collect()
    }

    fn build_ctes(&self, session: &mut Session, froms: &[&FromTable]) -> SegResult<String> {
        let mut ctes = Vec::new();
        for cte in &self.ctes {
            if !froms.iter().any(|from| from.table.name == cte.name) {
                continue;
            }
            let query = cte
                .builder
                .build_in(session)
                .map_err(|e| e.in_template(&format!("WITH {}", cte.name)))?;
            if query.is_empty() {
                continue;
            }
            ctes.push(format!("{} AS ({query})", cte.name));
        }
        if ctes.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("WITH {}", ctes.join(", ")))
    }

    fn build_with(&self, selects: &Segment) -> SegResult<BuiltQuery> {
        let mut session = self.session();
        let sql = self.compose(&mut session, selects)?;
        Ok(self.finish(sql, session))
    }

    fn finish(&self, sql: String, session: Session) -> BuiltQuery {
        let built = BuiltQuery::from_session(sql, session);
        #[cfg(feature = "tracing")]
        if self.config.debug {
            crate::trace::SqlTrace::from_config(&self.config).emit(&built);
        }
        built
    }

    fn projection(&self, columns: Vec<TableColumn>) -> Segment {
        Segment::new(self.selects.raw.clone()).columns(columns)
    }

    /// Build with `columns` in place of the declared projection.
    pub fn build_select(&self, columns: Vec<TableColumn>) -> SegResult<BuiltQuery> {
        self.build_with(&self.projection(columns))
    }

    /// `SELECT COUNT(1) FROM (<query>) list`, projecting `columns`, or the
    /// declared projection when `columns` is empty.
    pub fn count_query(&self, columns: Vec<TableColumn>) -> SegResult<BuiltQuery> {
        let selects = if columns.is_empty() {
            self.selects.clone()
        } else {
            self.projection(columns)
        };
        let mut session = self.session();
        let query = self.compose(&mut session, &selects)?;
        Ok(self.finish(format!("SELECT COUNT(1) FROM ({query}) list"), session))
    }
}

impl Builder for QueryBuilder {
    fn build_in(&self, session: &mut Session) -> SegResult<String> {
        self.compose(session, &self.selects)
    }

    fn session(&self) -> Session {
        let funcs = self.funcs.clone().unwrap_or_else(FuncMap::shared);
        Session::from_config(&self.config, funcs)
    }

    fn build(&self) -> SegResult<BuiltQuery> {
        self.build_with(&self.selects).inspect_err(|_err| {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "sqlseg.build", error = %_err, "build failed");
        })
    }
}

use std::collections::HashSet;

use super::QueryBuilder;
use crate::error::{SegError, SegResult};
use crate::segment::Segment;
use crate::table::TableColumn;

impl QueryBuilder {
    /// Applied names of the FROM tables the query needs.
    ///
    /// The anchor and every mandatory join are needed unconditionally. A table
    /// owning a column of any clause is needed, and so is every table its ON
    /// segment references, recursively.
    pub(super) fn dependencies(&self, selects: &Segment) -> SegResult<HashSet<String>> {
        let mut reachable = HashSet::new();
        let seeds = self
            .anchor
            .iter()
            .chain(self.joins.iter().filter(|name| {
                self.froms.get(name.as_str()).is_some_and(|from| !from.optional)
            }));
        for name in seeds {
            self.mark(&mut reachable, name)?;
        }

        let mut columns = Vec::new();
        for segment in [
            selects,
            &self.touches,
            &self.conditions,
            &self.group_bys,
            &self.orders,
        ] {
            collect_columns(segment, &mut columns);
        }
        for column in columns {
            self.mark(&mut reachable, column.table.applied_name())?;
        }
        Ok(reachable)
    }

    fn mark(&self, reachable: &mut HashSet<String>, name: &str) -> SegResult<()> {
        if name.is_empty() || reachable.contains(name) {
            return Ok(());
        }
        let Some(from) = self.froms.get(name) else {
            return Err(SegError::Composition(vec![format!(
                "table '{name}' not found in FROM"
            )]));
        };
        reachable.insert(name.to_string());

        let mut columns = Vec::new();
        collect_columns(&from.segment, &mut columns);
        for column in columns {
            self.mark(reachable, column.table.applied_name())?;
        }
        Ok(())
    }
}

/// Columns of `segment` and of its descendants.
fn collect_columns<'s>(segment: &'s Segment, out: &mut Vec<&'s TableColumn>) {
    out.extend(&segment.columns);
    for child in &segment.segments {
        collect_columns(child, out);
    }
}

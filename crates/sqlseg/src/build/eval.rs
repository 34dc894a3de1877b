use super::session::Session;
use crate::error::{DeclKind, SegError, SegResult};
use crate::segment::Segment;
use crate::syntax::{self, BindVarStyle, Clause, Expr, FuncCallExpr};
use crate::table::{Table, TableColumn};
use crate::value::Value;

/// The declarations a template resolves references against.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Decls<'s> {
    pub raw: &'s str,
    pub args: &'s [Value],
    pub columns: &'s [TableColumn],
    pub tables: &'s [Table],
    pub segments: &'s [Segment],
}

impl<'s> Decls<'s> {
    fn of_segment(segment: &'s Segment) -> Self {
        Self {
            raw: &segment.raw,
            args: &segment.args,
            columns: &segment.columns,
            tables: &segment.tables,
            segments: &segment.segments,
        }
    }

    /// A column builds as a nested template whose only table is its owner.
    fn of_column(column: &'s TableColumn) -> Self {
        Self {
            raw: &column.raw,
            args: &column.args,
            columns: &[],
            tables: std::slice::from_ref(&column.table),
            segments: &[],
        }
    }
}

/// Per-call state of one template being built: caches and usage bits.
#[derive(Debug)]
pub(crate) struct Node<'s> {
    decls: Decls<'s>,
    args_built: Vec<Option<String>>,
    columns_built: Vec<Option<String>>,
    segments_built: Vec<Option<String>>,
    args_used: Vec<bool>,
    columns_used: Vec<bool>,
    tables_used: Vec<bool>,
    segments_used: Vec<bool>,
}

impl<'s> Node<'s> {
    fn new(decls: Decls<'s>) -> Self {
        Self {
            decls,
            args_built: vec![None; decls.args.len()],
            columns_built: vec![None; decls.columns.len()],
            segments_built: vec![None; decls.segments.len()],
            args_used: vec![false; decls.args.len()],
            columns_used: vec![false; decls.columns.len()],
            tables_used: vec![false; decls.tables.len()],
            segments_used: vec![false; decls.segments.len()],
        }
    }

    fn check_usage(&self) -> SegResult<()> {
        let used = [
            (DeclKind::Arg, &self.args_used),
            (DeclKind::Column, &self.columns_used),
            (DeclKind::Table, &self.tables_used),
            (DeclKind::Segment, &self.segments_used),
        ];
        for (kind, bits) in used {
            if let Some(i) = bits.iter().position(|used| !used) {
                return Err(SegError::UnusedDeclaration { kind, index: i + 1 });
            }
        }
        Ok(())
    }
}

fn slot(kind: DeclKind, index: usize, len: usize) -> SegResult<usize> {
    if index == 0 || index > len {
        return Err(SegError::IndexOutOfRange { kind, index, len });
    }
    Ok(index - 1)
}

/// Build `segment` into `session`: body trimmed, wrapped in prefix and
/// suffix, or empty when the body is blank.
pub(crate) fn build_segment(session: &mut Session, segment: &Segment) -> SegResult<String> {
    let body = render(session, Decls::of_segment(segment), false)?;
    let body = body.trim();
    if body.is_empty() {
        return Ok(String::new());
    }

    let mut out = String::with_capacity(segment.prefix.len() + body.len() + segment.suffix.len() + 2);
    if !segment.prefix.is_empty() {
        out.push_str(&segment.prefix);
        out.push(' ');
    }
    out.push_str(body);
    if !segment.suffix.is_empty() {
        out.push(' ');
        out.push_str(&segment.suffix);
    }
    Ok(out)
}

fn build_column(session: &mut Session, column: &TableColumn) -> SegResult<String> {
    let built = render(session, Decls::of_column(column), true)?;
    Ok(built.trim().to_string())
}

fn render(session: &mut Session, decls: Decls<'_>, tables_used: bool) -> SegResult<String> {
    let raw = decls.raw;
    let clause = syntax::parse(raw).map_err(|e| e.in_template(raw))?;
    let mut node = Node::new(decls);
    if tables_used {
        node.tables_used.fill(true);
    }
    let body = Context {
        session,
        node: &mut node,
    }
    .eval(&clause)
    .map_err(|e| e.in_template(raw))?;
    node.check_usage().map_err(|e| e.in_template(raw))?;
    Ok(body)
}

/// Resolution context handed to template functions.
///
/// Every resolution marks the referenced declaration as used.
#[derive(Debug)]
pub struct Context<'a, 's> {
    session: &'a mut Session,
    node: &'a mut Node<'s>,
}

impl<'a, 's> Context<'a, 's> {
    /// The template being built.
    pub fn raw(&self) -> &'s str {
        self.node.decls.raw
    }

    /// The bind-var style of the build, `Auto` until the first marker.
    pub fn style(&self) -> BindVarStyle {
        self.session.style()
    }

    pub(crate) fn decls(&self) -> Decls<'s> {
        self.node.decls
    }

    /// Bind argument `index` (1-based) in the active style, indexed if none is
    /// active yet.
    pub fn arg(&mut self, index: usize) -> SegResult<String> {
        let marker = match self.session.style() {
            BindVarStyle::Auto => BindVarStyle::Indexed,
            style => style,
        };
        self.bind_var(marker, index)
    }

    /// Bind argument `index` for a marker of style `marker`.
    ///
    /// Indexed references append once per index and reuse the placeholder;
    /// positional references append on every occurrence.
    pub(crate) fn bind_var(&mut self, marker: BindVarStyle, index: usize) -> SegResult<String> {
        let style = self.session.observe_style(marker, self.node.decls.raw)?;
        let args = self.node.decls.args;
        let i = slot(DeclKind::Arg, index, args.len())?;
        self.node.args_used[i] = true;

        if style == BindVarStyle::Positional {
            self.session.push_arg(args[i].clone());
            return Ok("?".to_string());
        }
        if let Some(built) = &self.node.args_built[i] {
            return Ok(built.clone());
        }
        let n = self.session.push_arg(args[i].clone());
        let built = format!("${n}");
        self.node.args_built[i] = Some(built.clone());
        Ok(built)
    }

    /// Build column `index` (1-based).
    pub fn column(&mut self, index: usize) -> SegResult<String> {
        let columns = self.node.decls.columns;
        let i = slot(DeclKind::Column, index, columns.len())?;
        self.node.columns_used[i] = true;
        let column = &columns[i];

        if !self.rebuild_each_time(&column.args) {
            if let Some(built) = &self.node.columns_built[i] {
                return Ok(built.clone());
            }
        }
        let built = build_column(self.session, column)?;
        self.node.columns_built[i] = Some(built.clone());
        Ok(built)
    }

    /// The applied name of table `index` (1-based).
    pub fn table(&mut self, index: usize) -> SegResult<String> {
        let tables = self.node.decls.tables;
        let i = slot(DeclKind::Table, index, tables.len())?;
        self.node.tables_used[i] = true;
        Ok(tables[i].applied_name().to_string())
    }

    /// Build child segment `index` (1-based) into the same session.
    pub fn segment(&mut self, index: usize) -> SegResult<String> {
        let segments = self.node.decls.segments;
        let i = slot(DeclKind::Segment, index, segments.len())?;
        self.node.segments_used[i] = true;
        let child = &segments[i];

        if !self.rebuild_each_time(&child.args) {
            if let Some(built) = &self.node.segments_built[i] {
                return Ok(built.clone());
            }
        }
        let built = build_segment(self.session, child)?;
        self.node.segments_built[i] = Some(built.clone());
        Ok(built)
    }

    /// Positional placeholders carry no index, so a nested template with its
    /// own arguments must re-emit them on every reference.
    fn rebuild_each_time(&self, args: &[Value]) -> bool {
        self.session.style() == BindVarStyle::Positional && !args.is_empty()
    }

    pub(crate) fn eval(&mut self, clause: &Clause) -> SegResult<String> {
        let mut out = String::new();
        for expr in &clause.exprs {
            match expr {
                Expr::Plain(plain) => out.push_str(&plain.text),
                Expr::BindVar(var) => out.push_str(&self.bind_var(var.style, var.index)?),
                Expr::FuncCall(call) => out.push_str(&self.call(call)?),
                Expr::Func(marker) => {
                    return Err(SegError::syntax(
                        marker.pos,
                        format!("bare '#{}' is only allowed in a join template", marker.name),
                    ));
                }
            }
        }
        Ok(out)
    }

    fn call(&mut self, call: &FuncCallExpr) -> SegResult<String> {
        let func = self
            .session
            .funcs()
            .get(&call.name)
            .cloned()
            .ok_or_else(|| SegError::UnknownFunction(call.name.clone()))?;
        func.call(self, &call.args)
    }
}

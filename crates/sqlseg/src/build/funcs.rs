use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use super::eval::{Context, Decls};
use crate::error::{SegError, SegResult};
use crate::syntax::{self, BindVarStyle, Expr, FuncCallExpr};

/// Signature of a registered template function.
pub type CustomFn = dyn Fn(&mut Context<'_, '_>, &[String]) -> SegResult<String> + Send + Sync;

#[derive(Clone)]
pub(crate) enum Func {
    Arg(BindVarStyle),
    Column,
    Table,
    Segment,
    Join,
    Custom(Arc<CustomFn>),
}

impl Func {
    fn builtin(name: &str) -> Option<Self> {
        Some(match name {
            "$" => Self::Arg(BindVarStyle::Indexed),
            "?" => Self::Arg(BindVarStyle::Positional),
            "c" | "col" | "column" => Self::Column,
            "t" | "table" => Self::Table,
            "s" | "seg" | "segment" => Self::Segment,
            "join" => Self::Join,
            _ => return None,
        })
    }

    pub(crate) fn call(&self, ctx: &mut Context<'_, '_>, args: &[String]) -> SegResult<String> {
        match self {
            Self::Arg(style) => ctx.bind_var(*style, index_arg("$(index)", args)?),
            Self::Column => ctx.column(index_arg("column(index)", args)?),
            Self::Table => ctx.table(index_arg("table(index)", args)?),
            Self::Segment => ctx.segment(index_arg("segment(index)", args)?),
            Self::Join => join(ctx, args),
            Self::Custom(f) => f(ctx, args),
        }
    }
}

const BUILTIN_NAMES: &[&str] = &[
    "$", "?", "c", "col", "column", "t", "table", "s", "seg", "segment", "join",
];

/// Registry of template functions, shared by every build of a session.
///
/// Always contains the built-ins (`$`, `?`, `c`/`col`/`column`,
/// `t`/`table`, `s`/`seg`/`segment`, `join`).
#[derive(Clone)]
pub struct FuncMap {
    funcs: HashMap<String, Func>,
}

impl Default for FuncMap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FuncMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.funcs.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("FuncMap").field("funcs", &names).finish()
    }
}

impl FuncMap {
    pub fn new() -> Self {
        let funcs = BUILTIN_NAMES
            .iter()
            .filter_map(|name| Func::builtin(name).map(|f| (name.to_string(), f)))
            .collect();
        Self { funcs }
    }

    /// The built-ins only, shared process-wide.
    pub(crate) fn shared() -> Arc<FuncMap> {
        static SHARED: OnceLock<Arc<FuncMap>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(FuncMap::new())))
    }

    /// Register a function callable as `#name(...)`.
    ///
    /// Names must consist of ASCII letters and `_` only: a digit would be read
    /// as the `#nameN` shorthand. Built-in names cannot be replaced.
    ///
    /// ```
    /// use sqlseg::{Builder, FuncMap, Segment, Session};
    /// use std::sync::Arc;
    ///
    /// let mut funcs = FuncMap::new();
    /// funcs
    ///     .register("upper", |ctx, args| {
    ///         let index = args.first().and_then(|a| a.parse().ok()).unwrap_or(1);
    ///         Ok(format!("UPPER({})", ctx.arg(index)?))
    ///     })
    ///     .unwrap();
    ///
    /// let seg = Segment::new("name = #upper(1)").arg("bob");
    /// let mut session = Session::with_funcs(Arc::new(funcs));
    /// assert_eq!(seg.build_in(&mut session).unwrap(), "name = UPPER($1)");
    /// ```
    pub fn register<F>(&mut self, name: impl Into<String>, f: F) -> SegResult<&mut Self>
    where
        F: Fn(&mut Context<'_, '_>, &[String]) -> SegResult<String> + Send + Sync + 'static,
    {
        let name = name.into();
        let valid = !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphabetic() || c == '_')
            && !BUILTIN_NAMES.contains(&name.as_str());
        if !valid {
            return Err(SegError::InvalidFunctionName(name));
        }
        self.funcs.insert(name, Func::Custom(Arc::new(f)));
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Func> {
        self.funcs.get(name)
    }
}

fn bad_arguments(signature: &'static str, args: &[String]) -> SegError {
    SegError::BadArguments {
        signature,
        got: args.to_vec(),
    }
}

fn index_arg(signature: &'static str, args: &[String]) -> SegResult<usize> {
    match args {
        [index] => index
            .parse::<usize>()
            .map_err(|_| bad_arguments(signature, args)),
        _ => Err(bad_arguments(signature, args)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefFamily {
    Arg,
    Column,
    Segment,
}

impl RefFamily {
    /// The family of marker `name` and its repeat count on `decls`.
    fn of(name: &str, decls: &Decls<'_>) -> Option<(Self, usize)> {
        match name {
            "$" | "?" => Some((Self::Arg, decls.args.len())),
            "c" | "col" | "column" => Some((Self::Column, decls.columns.len())),
            "t" | "table" => Some((Self::Column, decls.tables.len())),
            "s" | "seg" | "segment" => Some((Self::Segment, decls.segments.len())),
            _ => None,
        }
    }
}

/// `#join(template, separator)`: repeat `template` once per declaration of the
/// family its bare markers reference, substituting the index into each marker.
fn join(ctx: &mut Context<'_, '_>, args: &[String]) -> SegResult<String> {
    let [template, separator] = args else {
        return Err(bad_arguments("join(template, separator)", args));
    };
    let mut clause = syntax::parse(template).map_err(|e| e.in_template(template))?;
    let decls = ctx.decls();

    let mut reference: Option<(RefFamily, usize, String)> = None;
    let mut markers = Vec::new();
    for (i, expr) in clause.exprs.iter_mut().enumerate() {
        let Expr::Func(marker) = expr else {
            continue;
        };
        let name = std::mem::take(&mut marker.name);
        let pos = marker.pos;

        if let Some((family, count)) = RefFamily::of(&name, &decls) {
            if let Some((first_family, first_count, first)) = &reference {
                if *first_family != family {
                    return Err(SegError::UnalignedJoinReference(format!(
                        "'#{first}' and '#{name}' reference different declarations in '{template}'"
                    )));
                }
                if *first_count != count {
                    return Err(SegError::UnalignedJoinReference(format!(
                        "'#{first}' repeats {first_count} times but '#{name}' repeats {count} times in '{template}'"
                    )));
                }
            } else {
                reference = Some((family, count, name.clone()));
            }
        }

        *expr = Expr::FuncCall(FuncCallExpr {
            name,
            args: vec![String::new()],
            pos,
        });
        markers.push(i);
    }

    let Some((_, count, _)) = reference else {
        return Err(SegError::UnalignedJoinReference(format!(
            "no references found in '{template}'"
        )));
    };

    let mut out = String::new();
    for index in 1..=count {
        let index = index.to_string();
        for &i in &markers {
            if let Expr::FuncCall(call) = &mut clause.exprs[i] {
                call.args[0].clone_from(&index);
            }
        }
        let part = ctx.eval(&clause).map_err(|e| e.in_template(template))?;
        if part.trim().is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push_str(separator);
        }
        out.push_str(&part);
    }
    Ok(out)
}

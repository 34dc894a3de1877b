//! Render bound arguments into query text for logging.
//!
//! The output is meant for humans reading logs. It is not escaped for
//! execution and must never be sent to a database.

use crate::error::{SegError, SegResult};
use crate::syntax::{self, Expr};
use crate::value::Value;

/// Replace every `$N` / `?` placeholder of `query` with the inline literal of
/// its argument.
///
/// ```
/// use sqlseg::{Value, interpolate};
///
/// let sql = interpolate(
///     "SELECT * FROM foo WHERE id IN ($1, $2, $3) AND status=$4",
///     &[1.into(), 2.into(), 3.into(), Value::from("ok")],
/// )
/// .unwrap();
/// assert_eq!(sql, "SELECT * FROM foo WHERE id IN (1, 2, 3) AND status='ok'");
/// ```
pub fn interpolate(query: &str, args: &[Value]) -> SegResult<String> {
    let clause = syntax::parse(query)?;
    let mut out = String::with_capacity(query.len());
    for expr in &clause.exprs {
        match expr {
            Expr::Plain(plain) => out.push_str(&plain.text),
            Expr::BindVar(var) => {
                let value = var
                    .index
                    .checked_sub(1)
                    .and_then(|i| args.get(i))
                    .ok_or_else(|| {
                        SegError::Interpolate(format!(
                            "{}: placeholder {} has no argument ({} given)",
                            var.pos,
                            var.index,
                            args.len()
                        ))
                    })?;
                out.push_str(&value.to_sql_inline());
            }
            Expr::FuncCall(_) | Expr::Func(_) => {
                return Err(SegError::Interpolate(format!(
                    "{}: template functions cannot be interpolated",
                    expr.pos()
                )));
            }
        }
    }
    Ok(out)
}

use std::sync::Arc;

use super::funcs::FuncMap;
use crate::config::SegConfig;
use crate::error::{SegError, SegResult};
use crate::syntax::BindVarStyle;
use crate::value::Value;

/// Mutable state of one top-level build.
///
/// Owns the argument store and the bind-var style for the whole segment tree.
/// Create one per build and drop it afterwards; never share it between
/// concurrent builds.
#[derive(Debug, Clone)]
pub struct Session {
    args: Vec<Value>,
    style: BindVarStyle,
    /// Set when the style was chosen by the caller instead of inferred.
    configured: bool,
    /// The template whose marker fixed an inferred style.
    style_origin: String,
    funcs: Arc<FuncMap>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session with the built-in functions and an inferred style.
    pub fn new() -> Self {
        Self::with_funcs(FuncMap::shared())
    }

    pub fn with_funcs(funcs: Arc<FuncMap>) -> Self {
        Self {
            args: Vec::new(),
            style: BindVarStyle::Auto,
            configured: false,
            style_origin: String::new(),
            funcs,
        }
    }

    /// A session configured from `config`.
    pub fn from_config(config: &SegConfig, funcs: Arc<FuncMap>) -> Self {
        Self::with_funcs(funcs).bind_var_style(config.bind_var_style)
    }

    /// Fix the output style.
    ///
    /// With an explicit style, templates may use either marker and are
    /// rendered in this style. `Auto` restores inference.
    pub fn bind_var_style(mut self, style: BindVarStyle) -> Self {
        self.style = style;
        self.configured = style != BindVarStyle::Auto;
        self.style_origin.clear();
        self
    }

    pub fn style(&self) -> BindVarStyle {
        self.style
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn into_args(self) -> Vec<Value> {
        self.args
    }

    pub(crate) fn funcs(&self) -> &FuncMap {
        &self.funcs
    }

    /// Append a value to the store, returning its 1-based position.
    pub(crate) fn push_arg(&mut self, value: Value) -> usize {
        self.args.push(value);
        self.args.len()
    }

    /// Record a marker of style `marker` seen in template `raw` and return the
    /// style to render it with.
    pub(crate) fn observe_style(&mut self, marker: BindVarStyle, raw: &str) -> SegResult<BindVarStyle> {
        match self.style {
            BindVarStyle::Auto => {
                self.style = marker;
                self.style_origin = raw.to_string();
                Ok(marker)
            }
            style if self.configured || style == marker => Ok(style),
            _ => Err(SegError::MixedBindVarStyle {
                first: self.style_origin.clone(),
                second: raw.to_string(),
            }),
        }
    }
}

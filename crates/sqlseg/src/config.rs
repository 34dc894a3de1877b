//! Build configuration.

use serde::{Deserialize, Serialize};

use crate::syntax::BindVarStyle;

/// Configuration for query builders.
///
/// Deserializable from any serde format; missing fields take their defaults.
///
/// ```
/// use sqlseg::{BindVarStyle, SegConfig};
///
/// let config = SegConfig::new()
///     .with_bind_var_style(BindVarStyle::Positional)
///     .enable_debug();
/// assert!(config.debug);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegConfig {
    /// `auto` infers the style from the first placeholder and rejects mixing;
    /// `indexed` / `positional` render every placeholder in that style.
    pub bind_var_style: BindVarStyle,
    /// Log every built query.
    pub debug: bool,
    /// Truncate logged SQL longer than this many bytes. `None` disables truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for SegConfig {
    fn default() -> Self {
        Self {
            bind_var_style: BindVarStyle::Auto,
            debug: false,
            max_sql_length: Some(200),
        }
    }
}

impl SegConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output bind-var style.
    pub fn with_bind_var_style(mut self, style: BindVarStyle) -> Self {
        self.bind_var_style = style;
        self
    }

    /// Log built queries.
    pub fn enable_debug(mut self) -> Self {
        self.debug = true;
        self
    }

    /// Set the maximum logged SQL length.
    pub fn with_max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Log SQL in full.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }
}

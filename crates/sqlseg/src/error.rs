//! Error types for sqlseg

use std::fmt;

use thiserror::Error;

use crate::syntax::Pos;

/// Result type alias for sqlseg operations
pub type SegResult<T> = Result<T, SegError>;

/// The kind of declaration a reference resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Arg,
    Column,
    Table,
    Segment,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Arg => "arg",
            Self::Column => "column",
            Self::Table => "table",
            Self::Segment => "segment",
        })
    }
}

/// Error types for template parsing, building and execution
#[derive(Debug, Error)]
pub enum SegError {
    /// Malformed template text
    #[error("syntax error at {pos}: {message}")]
    Syntax { pos: Pos, message: String },

    /// `#name` does not resolve to a registered function
    #[error("function '{0}' is not found")]
    UnknownFunction(String),

    /// A reference points outside its declaration list (indices are 1-based)
    #[error("invalid {kind} index {index}: {len} declared")]
    IndexOutOfRange {
        kind: DeclKind,
        index: usize,
        len: usize,
    },

    /// A declared item was never referenced by the template
    #[error("{kind} {index} is not used")]
    UnusedDeclaration { kind: DeclKind, index: usize },

    /// Two templates of one build tree use different bind-var styles
    #[error("mixed bind-var styles between '{first}' and '{second}'")]
    MixedBindVarStyle { first: String, second: String },

    /// A join template whose references disagree on family or length
    #[error("unaligned join references: {0}")]
    UnalignedJoinReference(String),

    /// Wrong argument shape for a built-in function
    #[error("bad arguments for #{signature}: got {got:?}")]
    BadArguments {
        signature: &'static str,
        got: Vec<String>,
    },

    /// Rejected custom function name
    #[error("invalid function name '{0}': must be non-empty, digit-free and not a built-in")]
    InvalidFunctionName(String),

    /// Errors collected while composing a query
    #[error("collected errors: {}", format_collected(.0))]
    Composition(Vec<String>),

    /// An error raised while building the template `raw`
    #[error("build '{raw}': {source}")]
    Build {
        raw: String,
        #[source]
        source: Box<SegError>,
    },

    /// Debug interpolation failure
    #[error("interpolate: {0}")]
    Interpolate(String),

    /// A query that cannot be executed as built
    #[error("Validation error: {0}")]
    Validation(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

fn format_collected(errors: &[String]) -> String {
    errors
        .iter()
        .map(|e| format!(" * {e};"))
        .collect::<String>()
}

impl SegError {
    /// Create a syntax error at `pos`
    pub fn syntax(pos: Pos, message: impl Into<String>) -> Self {
        Self::Syntax {
            pos,
            message: message.into(),
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Attach the template being built to this error.
    pub fn in_template(self, raw: &str) -> Self {
        Self::Build {
            raw: raw.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with every `Build` layer removed.
    pub fn root_cause(&self) -> &SegError {
        let mut err = self;
        while let Self::Build { source, .. } = err {
            err = source;
        }
        err
    }

    /// Check if the root cause is a syntax error
    pub fn is_syntax(&self) -> bool {
        matches!(self.root_cause(), Self::Syntax { .. })
    }

    /// Check if the root cause is an unknown function
    pub fn is_unknown_function(&self) -> bool {
        matches!(self.root_cause(), Self::UnknownFunction(_))
    }

    /// Check if the root cause is an out-of-range reference
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self.root_cause(), Self::IndexOutOfRange { .. })
    }

    /// Check if the root cause is an unused declaration
    pub fn is_unused_declaration(&self) -> bool {
        matches!(self.root_cause(), Self::UnusedDeclaration { .. })
    }

    /// Check if the root cause is a bind-var style conflict
    pub fn is_mixed_bind_var_style(&self) -> bool {
        matches!(self.root_cause(), Self::MixedBindVarStyle { .. })
    }

    /// Check if the root cause is an unaligned join template
    pub fn is_unaligned_join_reference(&self) -> bool {
        matches!(self.root_cause(), Self::UnalignedJoinReference(_))
    }

    /// Check if the root cause is a collected composition error
    pub fn is_composition(&self) -> bool {
        matches!(self.root_cause(), Self::Composition(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for SegError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

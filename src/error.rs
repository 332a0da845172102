use thiserror::Error;

/// Structural problems found while parsing a template, or while checking the
/// shape of an `if`/`for` tag at render time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("unknown block tag `{0}`")]
    UnknownTag(String),

    #[error("empty block tag")]
    EmptyTag,

    #[error("variable tag has no path")]
    EmptyVariable,

    #[error("unexpected `{found}`, expected {}", describe_closer(.expected))]
    UnexpectedCloser {
        found: String,
        expected: Option<&'static str>,
    },

    #[error("`else` may appear only once per `if` block")]
    DuplicateElse,

    #[error("`else` outside of an `if` block")]
    ElseOutsideIf,

    #[error("blocks nested deeper than {max} levels")]
    TooDeep { max: usize },

    #[error("{open} block(s) never closed")]
    Unclosed { open: usize },

    #[error("malformed if tag `{0}`, expected `if <path>`")]
    MalformedIf(String),

    #[error("malformed for tag `{0}`, expected four words: `for <var> in <path>`")]
    MalformedFor(String),
}

fn describe_closer(expected: &Option<&'static str>) -> String {
    match expected {
        Some(tag) => format!("`{tag}`"),
        None => "no closing tag".to_string(),
    }
}

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("cannot resolve `{path}`: `{segment}` is missing from the context")]
    Context { path: String, segment: String },

    #[error("`{path}` is not iterable")]
    NotIterable { path: String },

    #[error("invalid context: {0}")]
    InvalidContext(String),

    #[error("internal template error: {0}")]
    Internal(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TemplateError {
    pub fn is_syntax(&self) -> bool {
        matches!(self, TemplateError::Syntax(_))
    }

    /// True for failures caused by the data a template was rendered against.
    pub fn is_context(&self) -> bool {
        matches!(
            self,
            TemplateError::Context { .. } | TemplateError::NotIterable { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;

//! tagtree: a minimal text templating engine.
//!
//! A template is compiled once into a tree of nodes and can then be rendered
//! any number of times against different data.
//!
//! Supported subset:
//! - Literal text, reproduced verbatim (whitespace and newlines included).
//! - `{{ path }}` interpolation, where `path` is a dotted lookup such as
//!   `user.address.city`.
//! - `{% if path %} ... {% else %} ... {% endif %}`, testing the truthiness of
//!   the resolved value (`else` is optional).
//! - `{% for item in path %} ... {% endfor %}` over arrays, map keys or the
//!   characters of a string. The loop variable is visible only inside the
//!   loop body.
//!
//! Not supported:
//! - Filters, expressions, comparisons.
//! - Template inheritance or includes.
//! - Escaping of any kind.
//! - Whitespace control.
//!
//! Lenient lexing: something that only looks like the start of a tag, such
//! as `{{ name` without a closing `}}` on the same line, is plain text.
//!
//! ```
//! use tagtree::{Context, Template};
//!
//! let template = Template::new("{% for v in values %}{{ v }}: item\n{% endfor %}")?;
//! let ctx = Context::new().with("values", vec![1, 2, 3]);
//! assert_eq!(template.render(&ctx)?, "1: item\n2: item\n3: item\n");
//! # Ok::<(), tagtree::TemplateError>(())
//! ```

pub mod ast;
pub mod error;
mod eval;
pub mod lexer;
pub mod parser;
pub mod value;

pub use ast::Node;
pub use error::{Result, SyntaxError, TemplateError};
pub use value::{Context, Value};

use std::str::FromStr;
use tracing::debug;
use value::Scope;

/// A parsed template, ready to render.
///
/// Rendering never mutates the tree, so one `Template` can be shared across
/// threads and rendered concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    root: Node,
}

impl Template {
    /// Lex and parse `source`. Structural problems are reported here as
    /// [`TemplateError::Syntax`].
    pub fn new(source: &str) -> Result<Self> {
        let root = parser::Parser::new(source).parse()?;
        debug!(source_len = source.len(), nodes = root.count(), "parsed template");
        Ok(Self { root })
    }

    pub fn render(&self, context: &Context) -> Result<String> {
        let mut output = String::new();
        eval::render(&self.root, &Scope::Root(context), &mut output)?;
        debug!(output_len = output.len(), "rendered template");
        Ok(output)
    }

    /// Render with an empty context.
    pub fn render_empty(&self) -> Result<String> {
        self.render(&Context::new())
    }

    pub fn root(&self) -> &Node {
        &self.root
    }
}

impl FromStr for Template {
    type Err = TemplateError;

    fn from_str(source: &str) -> Result<Self> {
        Self::new(source)
    }
}

/// Parse and render in one go.
pub fn render(source: &str, context: &Context) -> Result<String> {
    Template::new(source)?.render(context)
}

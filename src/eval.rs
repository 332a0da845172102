use crate::ast::Node;
use crate::error::{Result, SyntaxError, TemplateError};
use crate::value::Scope;
use std::fmt::Write;
use tracing::trace;

/// Render `node` against `scope`, appending to `output`.
///
/// Nothing is mutated but `output`; callers discard it on error.
pub(crate) fn render(node: &Node, scope: &Scope<'_>, output: &mut String) -> Result<()> {
    match node {
        Node::Text(s) => output.push_str(s),
        Node::Var(path) => {
            let value = scope.resolve(path)?;
            write!(output, "{value}")
                .map_err(|_| TemplateError::Internal(format!("failed to format `{path}`")))?;
        }
        Node::If {
            contents,
            body,
            else_at,
        } => {
            let path = match contents.split_whitespace().collect::<Vec<_>>()[..] {
                [_, path] => path,
                _ => return Err(SyntaxError::MalformedIf(contents.clone()).into()),
            };

            let branch = if scope.resolve(path)?.is_truthy() {
                &body[..else_at.unwrap_or(body.len())]
            } else {
                else_at.map_or(&[][..], |at| &body[at + 1..])
            };
            render_all(branch, scope, output)?;
        }
        Node::For { contents, body } => {
            let (target, path) = match contents.split_whitespace().collect::<Vec<_>>()[..] {
                // The third word is conventionally `in` but is not checked.
                [_, target, _, path] => (target, path),
                _ => return Err(SyntaxError::MalformedFor(contents.clone()).into()),
            };

            let items = scope
                .resolve(path)?
                .iter_items()
                .ok_or_else(|| TemplateError::NotIterable {
                    path: path.to_string(),
                })?;

            for (i, item) in items.iter().enumerate() {
                trace!(var = target, index = i, "loop iteration");
                let inner = scope.bind(target, item);
                render_all(body, &inner, output)?;
            }
        }
        Node::Else => {}
        Node::Root(body) => render_all(body, scope, output)?,
    }
    Ok(())
}

fn render_all(nodes: &[Node], scope: &Scope<'_>, output: &mut String) -> Result<()> {
    for node in nodes {
        render(node, scope, output)?;
    }
    Ok(())
}

use crate::ast::Node;
use crate::error::{Result, SyntaxError, TemplateError};
use crate::lexer::{Token, TokenKind, Tokenizer};
use tracing::trace;

/// Deepest allowed nesting of `if`/`for` blocks. Rendering and dropping the
/// tree recurse once per level.
pub const MAX_DEPTH: usize = 128;

pub struct Parser<'a> {
    lexer: Tokenizer<'a>,
    /// Open containers, innermost last. Never empty while parsing.
    scopes: Vec<Node>,
}

fn empty_stack() -> TemplateError {
    TemplateError::Internal("scope stack is empty".to_string())
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Tokenizer::new(input),
            scopes: vec![Node::Root(Vec::new())],
        }
    }

    /// Consume every token and return the `Root` node.
    pub fn parse(mut self) -> Result<Node> {
        while let Some(token) = self.lexer.next_token() {
            trace!(kind = ?token.kind, content = token.content, "token");

            if token.kind == TokenKind::Block && matches!(token.content, "endif" | "endfor") {
                self.close(token.content)?;
                continue;
            }

            let node = create_node(&token)?;
            self.push(node)?;
        }

        if self.scopes.len() > 1 {
            return Err(SyntaxError::Unclosed {
                open: self.scopes.len() - 1,
            }
            .into());
        }
        self.scopes.pop().ok_or_else(empty_stack)
    }

    fn close(&mut self, closer: &str) -> Result<()> {
        let innermost = self.scopes.last().ok_or_else(empty_stack)?;
        let expected = innermost.close_by();
        if expected != Some(closer) {
            return Err(SyntaxError::UnexpectedCloser {
                found: closer.to_string(),
                expected,
            }
            .into());
        }

        let closed = self.scopes.pop().ok_or_else(empty_stack)?;
        self.append(closed)
    }

    fn push(&mut self, node: Node) -> Result<()> {
        match node {
            Node::Else => {
                let innermost = self.scopes.last_mut().ok_or_else(empty_stack)?;
                match innermost {
                    Node::If { body, else_at, .. } => {
                        if else_at.is_some() {
                            return Err(SyntaxError::DuplicateElse.into());
                        }
                        *else_at = Some(body.len());
                        body.push(Node::Else);
                        Ok(())
                    }
                    _ => Err(SyntaxError::ElseOutsideIf.into()),
                }
            }
            // Children accumulate on the stack; the container joins its
            // parent when its closer arrives.
            node if node.is_container() => {
                // `scopes[0]` is the root.
                if self.scopes.len() > MAX_DEPTH {
                    return Err(SyntaxError::TooDeep { max: MAX_DEPTH }.into());
                }
                self.scopes.push(node);
                Ok(())
            }
            node => self.append(node),
        }
    }

    fn append(&mut self, node: Node) -> Result<()> {
        self.scopes
            .last_mut()
            .and_then(Node::children_mut)
            .ok_or_else(empty_stack)?
            .push(node);
        Ok(())
    }
}

fn create_node(token: &Token<'_>) -> Result<Node> {
    match token.kind {
        TokenKind::Text => Ok(Node::Text(token.content.to_string())),
        TokenKind::Variable => {
            if token.content.is_empty() {
                return Err(SyntaxError::EmptyVariable.into());
            }
            Ok(Node::Var(token.content.to_string()))
        }
        TokenKind::Block => {
            let contents = token.content.to_string();
            match token.content.split_whitespace().next() {
                Some("for") => Ok(Node::For {
                    contents,
                    body: Vec::new(),
                }),
                Some("if") => Ok(Node::If {
                    contents,
                    body: Vec::new(),
                    else_at: None,
                }),
                Some("else") => Ok(Node::Else),
                Some(other) => Err(SyntaxError::UnknownTag(other.to_string()).into()),
                None => Err(SyntaxError::EmptyTag.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Node> {
        Parser::new(input).parse()
    }

    fn syntax_error(input: &str) -> SyntaxError {
        match parse(input) {
            Err(TemplateError::Syntax(e)) => e,
            other => panic!("expected syntax error for {input:?}, got {other:?}"),
        }
    }

    #[test]
    fn builds_nested_tree() {
        let root = parse("a{% for v in vs %}{% if v %}{{ v }}{% else %}-{% endif %}{% endfor %}b").unwrap();
        assert_eq!(
            root,
            Node::Root(vec![
                Node::Text("a".into()),
                Node::For {
                    contents: "for v in vs".into(),
                    body: vec![Node::If {
                        contents: "if v".into(),
                        body: vec![
                            Node::Var("v".into()),
                            Node::Else,
                            Node::Text("-".into()),
                        ],
                        else_at: Some(1),
                    }],
                },
                Node::Text("b".into()),
            ])
        );
        assert_eq!(root.count(), 8);
    }

    #[test]
    fn empty_template_is_an_empty_root() {
        assert_eq!(parse("").unwrap(), Node::Root(vec![]));
    }

    #[test]
    fn tag_shape_is_not_checked_while_parsing() {
        assert!(parse("{% if %}x{% endif %}{% for a b %}{% endfor %}").is_ok());
    }

    #[test]
    fn unclosed_blocks() {
        assert_eq!(
            syntax_error("{% if name %}Hello, {{ name }}{% else %}Hello, people"),
            SyntaxError::Unclosed { open: 1 }
        );
        assert_eq!(
            syntax_error("{% for v in values %}{% if v %}"),
            SyntaxError::Unclosed { open: 2 }
        );
    }

    #[test]
    fn mismatched_closers() {
        assert_eq!(
            syntax_error("{% if a %}{% endfor %}"),
            SyntaxError::UnexpectedCloser {
                found: "endfor".into(),
                expected: Some("endif"),
            }
        );
        assert_eq!(
            syntax_error("text{% endif %}"),
            SyntaxError::UnexpectedCloser {
                found: "endif".into(),
                expected: None,
            }
        );
        assert_eq!(
            syntax_error("{% for a in b %}{% if a %}{% endfor %}{% endif %}"),
            SyntaxError::UnexpectedCloser {
                found: "endfor".into(),
                expected: Some("endif"),
            }
        );
    }

    #[test]
    fn else_placement() {
        assert_eq!(
            syntax_error("{% if a %}1{% else %}2{% else %}3{% endif %}"),
            SyntaxError::DuplicateElse
        );
        assert_eq!(syntax_error("{% else %}"), SyntaxError::ElseOutsideIf);
        assert_eq!(
            syntax_error("{% for a in b %}{% else %}{% endfor %}"),
            SyntaxError::ElseOutsideIf
        );
        // Each conditional gets its own else.
        assert!(parse("{% if a %}{% if b %}{% else %}{% endif %}{% else %}{% endif %}").is_ok());
    }

    #[test]
    fn tag_errors() {
        assert_eq!(syntax_error("{{ }}"), SyntaxError::EmptyVariable);
        assert_eq!(syntax_error("{% %}"), SyntaxError::EmptyTag);
        assert_eq!(
            syntax_error("{% block x %}"),
            SyntaxError::UnknownTag("block".into())
        );
        // Closers must be exact; anything else after them is an unknown tag.
        assert_eq!(
            syntax_error("{% if a %}{% endif now %}"),
            SyntaxError::UnknownTag("endif".into())
        );
    }

    fn nested_ifs(depth: usize) -> String {
        format!("{}x{}", "{% if a %}".repeat(depth), "{% endif %}".repeat(depth))
    }

    #[test]
    fn nesting_up_to_the_limit_parses() {
        let root = parse(&nested_ifs(MAX_DEPTH)).unwrap();
        // root + one `if` per level + the text
        assert_eq!(root.count(), MAX_DEPTH + 2);
    }

    #[test]
    fn nesting_past_the_limit_is_rejected() {
        assert_eq!(
            syntax_error(&nested_ifs(MAX_DEPTH + 1)),
            SyntaxError::TooDeep { max: MAX_DEPTH }
        );
        let mixed = "{% for v in vs %}{% if v %}".repeat(MAX_DEPTH);
        assert_eq!(syntax_error(&mixed), SyntaxError::TooDeep { max: MAX_DEPTH });
    }

    #[test]
    fn closer_names_in_variable_tags_are_plain_paths() {
        assert_eq!(
            parse("{{ endif }}").unwrap(),
            Node::Root(vec![Node::Var("endif".into())])
        );
    }
}

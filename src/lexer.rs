use regex::Regex;
use std::sync::LazyLock;

pub const OPEN_BLOCK_TAG: &str = "{%";
pub const CLOSE_BLOCK_TAG: &str = "%}";
pub const OPEN_VAR_TAG: &str = "{{";
pub const CLOSE_VAR_TAG: &str = "}}";

// Non-greedy, and `.` stops at newlines: a tag never spans lines.
static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%.*?%\}|\{\{.*?\}\}").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Text,
    Variable,
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Verbatim for text; trimmed tag body for variables and blocks.
    pub content: &'a str,
}

impl<'a> Token<'a> {
    fn text(piece: &'a str) -> Self {
        Token {
            kind: TokenKind::Text,
            content: piece,
        }
    }

    /// `tag` is a complete match of the tag pattern.
    fn from_tag(tag: &'a str) -> Self {
        if tag.starts_with(OPEN_VAR_TAG) {
            Token {
                kind: TokenKind::Variable,
                content: tag[OPEN_VAR_TAG.len()..tag.len() - CLOSE_VAR_TAG.len()].trim(),
            }
        } else {
            Token {
                kind: TokenKind::Block,
                content: tag[OPEN_BLOCK_TAG.len()..tag.len() - CLOSE_BLOCK_TAG.len()].trim(),
            }
        }
    }
}

/// Lazily splits template source into text, variable and block tokens.
///
/// Every byte of the input lands in exactly one token. Text that merely looks
/// like the start of a tag (`{{ name` with no `}}` on the same line) stays
/// literal.
#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    cursor: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, cursor: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.cursor..]
    }

    pub fn next_token(&mut self) -> Option<Token<'a>> {
        if self.remaining().is_empty() {
            return None;
        }

        let (token, consumed) = match TAG_REGEX.find_at(self.input, self.cursor) {
            // Tag right at the cursor
            Some(m) if m.start() == self.cursor => (Token::from_tag(m.as_str()), m.len()),
            // Text up to the next tag
            Some(m) => {
                let text = &self.input[self.cursor..m.start()];
                (Token::text(text), text.len())
            }
            // All text
            None => (Token::text(self.remaining()), self.remaining().len()),
        };
        self.cursor += consumed;

        Some(token)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    /// Dotted path, never empty.
    Var(String),
    If {
        /// Tag body as written, e.g. `if user.active`; its shape is checked
        /// at render time.
        contents: String,
        body: Vec<Node>,
        /// Position of the `Else` marker within `body`, if any.
        else_at: Option<usize>,
    },
    For {
        /// Tag body as written, e.g. `for item in items`.
        contents: String,
        body: Vec<Node>,
    },
    /// Split point inside an `If` body. Renders nothing.
    Else,
    Root(Vec<Node>),
}

impl Node {
    /// The block tag that closes this container. `Root` and leaves have none.
    pub fn close_by(&self) -> Option<&'static str> {
        match self {
            Node::If { .. } => Some("endif"),
            Node::For { .. } => Some("endfor"),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Node::If { .. } | Node::For { .. } | Node::Root(_))
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::If { body, .. } | Node::For { body, .. } | Node::Root(body) => body,
            _ => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::If { body, .. } | Node::For { body, .. } | Node::Root(body) => Some(body),
            _ => None,
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(Node::count).sum::<usize>()
    }
}

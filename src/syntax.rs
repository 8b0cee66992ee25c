use std::fmt;

use tree_sitter::{Node, Parser, Tree};

/// Source location of a node: byte range plus the 1-based line and column of its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The node shapes the analysis cares about. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    CompositeLiteral,
    KeyValue,
    Identifier,
    StringLiteral,
    Selector,
    Other,
}

/// A parsed Go source file.
pub struct GoFile<'src> {
    tree: Tree,
    text: &'src str,
}

impl<'src> GoFile<'src> {
    /// Parse Go source. Returns `None` if the parser cannot be set up or produces no tree.
    pub fn parse(text: &'src str) -> Option<Self> {
        let mut parser = Parser::new();
        parser.set_language(tree_sitter_go::language()).ok()?;
        let tree = parser.parse(text, None)?;
        Some(Self { tree, text })
    }

    /// Whether the parser had to recover from syntax errors anywhere in the file.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode::new(self.tree.root_node(), self.text)
    }

    /// Every composite literal in the file, in document order.
    pub fn composite_literals(&self) -> Vec<SyntaxNode<'_>> {
        let mut literals = Vec::new();
        let mut cursor = self.tree.walk();

        loop {
            let node = SyntaxNode::new(cursor.node(), self.text);
            if node.kind() == NodeKind::CompositeLiteral {
                literals.push(node);
            }

            if cursor.goto_first_child() {
                continue;
            }

            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return literals;
                }
            }
        }
    }
}

/// Read-only handle into a parsed tree.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'t> {
    node: Node<'t>,
    text: &'t str,
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxNode")
            .field("kind", &self.node.kind())
            .field("span", &self.span())
            .finish()
    }
}

/// One `key: value` element of a composite literal.
#[derive(Debug, Clone, Copy)]
pub struct KeyValue<'t> {
    pub key: SyntaxNode<'t>,
    pub value: SyntaxNode<'t>,
    pub span: Span,
}

impl<'t> KeyValue<'t> {
    /// The key as a bare identifier, e.g. `Description`.
    pub fn key_name(&self) -> Option<&'t str> {
        self.key.identifier()
    }
}

impl<'t> SyntaxNode<'t> {
    fn new(node: Node<'t>, text: &'t str) -> Self {
        Self { node, text }
    }

    pub fn kind(&self) -> NodeKind {
        match self.node.kind() {
            "composite_literal" => NodeKind::CompositeLiteral,
            // A literal_value outside a composite_literal is a literal with an elided type.
            "literal_value" => match self.node.parent() {
                Some(parent) if parent.kind() == "composite_literal" => NodeKind::Other,
                _ => NodeKind::CompositeLiteral,
            },
            "keyed_element" => NodeKind::KeyValue,
            "identifier" | "field_identifier" | "type_identifier" | "package_identifier" => {
                NodeKind::Identifier
            }
            "interpreted_string_literal" | "raw_string_literal" => NodeKind::StringLiteral,
            "qualified_type" | "selector_expression" => NodeKind::Selector,
            _ => NodeKind::Other,
        }
    }

    pub fn span(&self) -> Span {
        let start = self.node.start_position();
        Span {
            start: self.node.start_byte(),
            end: self.node.end_byte(),
            line: start.row + 1,
            column: start.column + 1,
        }
    }

    pub fn text(&self) -> &'t str {
        self.text.get(self.node.byte_range()).unwrap_or_default()
    }

    /// Declared type expression of a composite literal; `None` when the type is elided.
    pub fn type_expr(&self) -> Option<SyntaxNode<'t>> {
        if self.node.kind() != "composite_literal" {
            return None;
        }
        self.node
            .child_by_field_name("type")
            .map(|node| SyntaxNode::new(node, self.text))
    }

    /// The key-value elements of a composite literal, in source order.
    /// Positional elements and comments are not included.
    pub fn entries(&self) -> Vec<KeyValue<'t>> {
        let body = match self.node.kind() {
            "composite_literal" => match self.node.child_by_field_name("body") {
                Some(body) => body,
                None => return Vec::new(),
            },
            "literal_value" => self.node,
            _ => return Vec::new(),
        };

        let mut cursor = body.walk();
        body.named_children(&mut cursor)
            .filter(|child| child.kind() == "keyed_element")
            .filter_map(|element| self.key_value(element))
            .collect()
    }

    fn key_value(&self, element: Node<'t>) -> Option<KeyValue<'t>> {
        let mut cursor = element.walk();
        let parts: Vec<Node<'t>> = element
            .named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .collect();

        let (key, value) = match parts.as_slice() {
            [key, value] => (*key, *value),
            _ => return None,
        };

        Some(KeyValue {
            key: SyntaxNode::new(unwrap_element(key), self.text),
            value: SyntaxNode::new(unwrap_element(value), self.text),
            span: SyntaxNode::new(element, self.text).span(),
        })
    }

    /// Name of an identifier node.
    pub fn identifier(&self) -> Option<&'t str> {
        (self.kind() == NodeKind::Identifier).then(|| self.text())
    }

    /// Contents of a string literal without its quotes. Escapes are left as written.
    pub fn string_value(&self) -> Option<&'t str> {
        if self.kind() != NodeKind::StringLiteral {
            return None;
        }
        let text = self.text();
        let quote = if self.node.kind() == "raw_string_literal" { '`' } else { '"' };
        text.strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
    }

    /// `(qualifier, member)` of a qualified type such as `schema.Schema`.
    pub fn qualified_name(&self) -> Option<(&'t str, &'t str)> {
        let (left, right) = match self.node.kind() {
            "qualified_type" => ("package", "name"),
            "selector_expression" => ("operand", "field"),
            _ => return None,
        };
        let qualifier = self.node.child_by_field_name(left)?;
        let member = self.node.child_by_field_name(right)?;
        let qualifier = SyntaxNode::new(qualifier, self.text).identifier()?;
        let member = SyntaxNode::new(member, self.text).identifier()?;
        Some((qualifier, member))
    }

    /// The key-value element this node is the value of, if any.
    pub fn enclosing_entry(&self) -> Option<KeyValue<'t>> {
        let mut parent = self.node.parent()?;
        if is_element_wrapper(parent.kind()) {
            parent = parent.parent()?;
        }
        if parent.kind() != "keyed_element" {
            return None;
        }
        let entry = self.key_value(parent)?;
        (entry.value.node.id() == self.node.id()).then_some(entry)
    }

    /// Depth-first search for descendants of the given tree-sitter kind.
    pub(crate) fn descendants_of_kind(&self, kind: &str) -> Vec<SyntaxNode<'t>> {
        let mut found = Vec::new();
        let mut stack = vec![self.node];
        while let Some(node) = stack.pop() {
            if node.kind() == kind {
                found.push(SyntaxNode::new(node, self.text));
            }
            let mut cursor = node.walk();
            let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
        found
    }

    pub(crate) fn field(&self, name: &str) -> Option<SyntaxNode<'t>> {
        self.node
            .child_by_field_name(name)
            .map(|node| SyntaxNode::new(node, self.text))
    }

    pub(crate) fn raw_kind(&self) -> &'static str {
        self.node.kind()
    }
}

fn is_element_wrapper(kind: &str) -> bool {
    matches!(kind, "literal_element" | "element")
}

/// Grammar versions differ on whether keyed element parts are wrapped in `literal_element`.
fn unwrap_element(node: Node<'_>) -> Node<'_> {
    if is_element_wrapper(node.kind()) {
        if let Some(inner) = node.named_child(0) {
            return inner;
        }
    }
    node
}

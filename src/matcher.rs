use crate::config::AuditConfig;
use crate::resolve::TypeResolver;
use crate::syntax::{NodeKind, SyntaxNode};

/// Verdict for a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeMatch {
    SchemaType,
    AttributeType,
    None,
}

/// Decides whether a composite literal is one of the configured schema or attribute types.
pub struct ShapeMatcher<'a> {
    config: &'a AuditConfig,
    resolver: Option<&'a dyn TypeResolver>,
}

impl<'a> ShapeMatcher<'a> {
    /// Syntactic matching only.
    pub fn new(config: &'a AuditConfig) -> Self {
        Self {
            config,
            resolver: None,
        }
    }

    /// Prefer the resolver's answer; nodes it cannot resolve are matched syntactically.
    pub fn with_resolver(config: &'a AuditConfig, resolver: &'a dyn TypeResolver) -> Self {
        Self {
            config,
            resolver: Some(resolver),
        }
    }

    /// Whether `node` is a composite literal of `schema.<expected>`.
    pub fn matches(&self, node: &SyntaxNode<'_>, expected: &str) -> bool {
        self.type_name(node).is_some_and(|name| name == expected)
    }

    pub fn classify(&self, node: &SyntaxNode<'_>) -> TypeMatch {
        self.matched_type(node)
            .map_or(TypeMatch::None, |(verdict, _)| verdict)
    }

    /// The verdict together with the configured type name that produced it.
    pub fn matched_type(&self, node: &SyntaxNode<'_>) -> Option<(TypeMatch, &'a str)> {
        let name = self.type_name(node)?;
        let config = self.config;

        if let Some(schema) = config.schema_types.iter().find(|ty| **ty == name) {
            return Some((TypeMatch::SchemaType, schema.as_str()));
        }
        config
            .attribute_types
            .iter()
            .find(|ty| **ty == name)
            .map(|attribute| (TypeMatch::AttributeType, attribute.as_str()))
    }

    /// Name of the literal's type if it is defined in the configured package.
    fn type_name(&self, node: &SyntaxNode<'_>) -> Option<String> {
        if node.kind() != NodeKind::CompositeLiteral {
            return None;
        }

        if let Some(named) = self.resolver.and_then(|r| r.resolve_named_type(node)) {
            return (named.package == self.config.package).then_some(named.name);
        }

        let (qualifier, member) = node.type_expr()?.qualified_name()?;
        (qualifier == self.config.package).then(|| member.to_string())
    }
}

use std::collections::HashSet;

use tracing::trace;

use crate::config::{AuditConfig, DescriptionCheck};
use crate::syntax::{KeyValue, NodeKind, Span, SyntaxNode};

/// A literal that fails the description requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub span: Span,
    pub message: String,
}

/// What is being audited, and where a violation for it is reported.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'n> {
    /// A schema literal, with the configured type name it matched.
    Schema { type_name: &'n str },
    /// An attribute literal, reported at its `"name": {...}` entry.
    Attribute { name: &'n str, entry: Span },
}

/// Recursively checks schema and attribute literals for description fields.
///
/// One auditor instance covers one traversal: a literal reached twice, directly and through a
/// wrapper or as both a schema member and a standalone attribute, is only audited once.
pub struct DescriptionAuditor<'c> {
    config: &'c AuditConfig,
    audited: HashSet<Span>,
    violations: Vec<Violation>,
}

impl<'c> DescriptionAuditor<'c> {
    pub fn new(config: &'c AuditConfig) -> Self {
        Self {
            config,
            audited: HashSet::new(),
            violations: Vec::new(),
        }
    }

    /// Whether `literal` has already been audited in this traversal.
    pub fn is_audited(&self, literal: &SyntaxNode<'_>) -> bool {
        self.audited.contains(&literal.span())
    }

    pub fn audit(&mut self, literal: SyntaxNode<'_>, subject: Subject<'_>) {
        if !self.audited.insert(literal.span()) {
            return;
        }

        if let Some(message) = self.check_description(&literal, subject) {
            let span = match subject {
                Subject::Schema { .. } => literal.span(),
                Subject::Attribute { entry, .. } => entry,
            };
            self.violations.push(Violation { span, message });
        }

        for entry in literal.entries() {
            match entry.key_name() {
                Some(key) if key == self.config.attributes_field => {
                    self.audit_collection(entry.value);
                }
                Some(key) if key == self.config.wrapper_field => {
                    self.audit_wrapper(entry.value);
                }
                _ => {}
            }
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    fn check_description(&self, literal: &SyntaxNode<'_>, subject: Subject<'_>) -> Option<String> {
        let descriptions: Vec<KeyValue<'_>> = literal
            .entries()
            .into_iter()
            .filter(|entry| {
                entry
                    .key_name()
                    .is_some_and(|key| self.config.is_description_field(key))
            })
            .collect();

        let failed = match self.config.check {
            DescriptionCheck::Presence => descriptions.is_empty(),
            DescriptionCheck::NonEmpty => {
                !descriptions.is_empty()
                    && descriptions
                        .iter()
                        .all(|entry| entry.value.string_value() == Some(""))
            }
        };

        failed.then(|| self.message(subject))
    }

    fn message(&self, subject: Subject<'_>) -> String {
        match (self.config.check, subject) {
            (DescriptionCheck::Presence, Subject::Schema { type_name }) => format!(
                "{}.{} should have Description or MarkdownDescription",
                self.config.package, type_name
            ),
            (DescriptionCheck::Presence, Subject::Attribute { name, .. }) => {
                format!("attribute \"{}\" is missing Description or MarkdownDescription", name)
            }
            (DescriptionCheck::NonEmpty, Subject::Schema { type_name }) => format!(
                "{}.{} should have non-empty Description or MarkdownDescription",
                self.config.package, type_name
            ),
            (DescriptionCheck::NonEmpty, Subject::Attribute { name, .. }) => {
                format!("attribute \"{}\" has empty Description or MarkdownDescription", name)
            }
        }
    }

    /// `NestedObject: X{Attributes: {...}}`
    fn audit_wrapper(&mut self, wrapper: SyntaxNode<'_>) {
        if wrapper.kind() != NodeKind::CompositeLiteral {
            trace!(at = %wrapper.span(), "skipping non-literal wrapper");
            return;
        }
        for entry in wrapper.entries() {
            if entry.key_name() == Some(self.config.attributes_field.as_str()) {
                self.audit_collection(entry.value);
            }
        }
    }

    /// `Attributes: map[string]T{"name": T{...}, ...}`
    fn audit_collection(&mut self, collection: SyntaxNode<'_>) {
        if collection.kind() != NodeKind::CompositeLiteral {
            trace!(at = %collection.span(), "skipping dynamic attribute collection");
            return;
        }

        for entry in collection.entries() {
            let Some(name) = entry.key.string_value() else {
                continue;
            };
            if entry.value.kind() != NodeKind::CompositeLiteral {
                trace!(attribute = name, "skipping non-literal attribute");
                continue;
            }
            self.audit(
                entry.value,
                Subject::Attribute {
                    name,
                    entry: entry.span,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::GoFile;
    use pretty_assertions::assert_eq;

    fn audit_first(source: &str, config: &AuditConfig) -> Vec<Violation> {
        let file = GoFile::parse(source).unwrap();
        assert!(!file.has_errors(), "fixture does not parse");
        let literal = file.composite_literals()[0];
        let mut auditor = DescriptionAuditor::new(config);
        auditor.audit(literal, Subject::Schema { type_name: "Schema" });
        auditor.into_violations()
    }

    fn messages(violations: &[Violation]) -> Vec<&str> {
        violations.iter().map(|v| v.message.as_str()).collect()
    }

    #[test]
    fn schema_without_description() {
        let violations = audit_first(
            "package p\n\nvar s = schema.Schema{}\n",
            &AuditConfig::default(),
        );

        assert_eq!(
            messages(&violations),
            vec!["schema.Schema should have Description or MarkdownDescription"]
        );
        assert_eq!(violations[0].span.line, 3);
        assert_eq!(violations[0].span.column, 9);
    }

    #[test]
    fn markdown_description_counts() {
        let violations = audit_first(
            "package p\n\nvar s = schema.Schema{MarkdownDescription: \"docs\"}\n",
            &AuditConfig::default(),
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn empty_description_is_present() {
        let source = r#"package p

var s = schema.Schema{
	Description: "",
	Attributes: map[string]schema.Attribute{
		"id": schema.StringAttribute{Description: ""},
	},
}
"#;
        assert!(audit_first(source, &AuditConfig::default()).is_empty());
    }

    #[test]
    fn non_empty_check_flags_empty_literals_only() {
        let source = r#"package p

var s = schema.Schema{
	Description: "",
	Attributes: map[string]schema.Attribute{
		"id":    schema.StringAttribute{Description: ``},
		"name":  schema.StringAttribute{Description: "", MarkdownDescription: "Name"},
		"other": schema.StringAttribute{Description: description},
		"bare":  schema.StringAttribute{Computed: true},
	},
}
"#;
        let config = AuditConfig::default().with_check(DescriptionCheck::NonEmpty);
        let violations = audit_first(source, &config);

        assert_eq!(
            messages(&violations),
            vec![
                "schema.Schema should have non-empty Description or MarkdownDescription",
                "attribute \"id\" has empty Description or MarkdownDescription",
            ]
        );
        assert_eq!(violations[1].span.line, 6);
    }

    #[test]
    fn attribute_violation_points_at_its_entry() {
        let source = r#"package p

var s = schema.Schema{
	Description: "Widget",
	Attributes: map[string]schema.Attribute{
		"id": schema.StringAttribute{
			Computed: true,
		},
	},
}
"#;
        let violations = audit_first(source, &AuditConfig::default());

        assert_eq!(
            messages(&violations),
            vec!["attribute \"id\" is missing Description or MarkdownDescription"]
        );
        let span = violations[0].span;
        assert_eq!((span.line, span.column), (6, 3));
        assert!(source[span.start..span.end].starts_with("\"id\": schema.StringAttribute{"));
        assert!(source[span.start..span.end].ends_with('}'));
    }

    #[test]
    fn descends_through_nested_object_wrapper() {
        let source = r#"package p

var s = schema.Schema{
	Description: "Widget",
	Attributes: map[string]schema.Attribute{
		"members": schema.ListNestedAttribute{
			Description: "Members",
			NestedObject: schema.NestedAttributeObject{
				Attributes: map[string]schema.Attribute{
					"email": schema.StringAttribute{Computed: true},
				},
			},
		},
	},
}
"#;
        let violations = audit_first(source, &AuditConfig::default());

        assert_eq!(
            messages(&violations),
            vec!["attribute \"email\" is missing Description or MarkdownDescription"]
        );
        assert_eq!((violations[0].span.line, violations[0].span.column), (10, 6));
    }

    #[test]
    fn direct_and_wrapped_attributes_on_one_literal() {
        let source = r#"package p

var s = schema.Schema{
	Description: "Widget",
	Attributes: map[string]schema.Attribute{
		"both": schema.SingleNestedAttribute{
			Description: "Both shapes",
			Attributes: map[string]schema.Attribute{
				"a": schema.StringAttribute{},
			},
			NestedObject: schema.NestedAttributeObject{
				Attributes: map[string]schema.Attribute{
					"b": schema.StringAttribute{},
				},
			},
		},
	},
}
"#;
        let violations = audit_first(source, &AuditConfig::default());

        assert_eq!(
            messages(&violations),
            vec![
                "attribute \"a\" is missing Description or MarkdownDescription",
                "attribute \"b\" is missing Description or MarkdownDescription",
            ]
        );
        assert_eq!((violations[0].span.line, violations[0].span.column), (9, 5));
        assert_eq!((violations[1].span.line, violations[1].span.column), (13, 6));
    }

    #[test]
    fn raw_string_keys_are_named_without_backquotes() {
        let source = r#"package p

var s = schema.Schema{
	Description: "Widget",
	Attributes: map[string]schema.Attribute{
		`raw`: schema.StringAttribute{},
	},
}
"#;
        assert_eq!(
            messages(&audit_first(source, &AuditConfig::default())),
            vec!["attribute \"raw\" is missing Description or MarkdownDescription"]
        );
    }

    #[test]
    fn dynamic_shapes_are_skipped() {
        let source = r#"package p

var s = schema.Schema{
	Description: "Widget",
	Attributes:  commonAttributes,
}

var t = schema.Schema{
	Description: "Widget",
	Attributes: map[string]schema.Attribute{
		"id":   idAttribute(),
		nameKey: schema.StringAttribute{},
		"tags": schema.MapNestedAttribute{
			Description:  "Tags",
			NestedObject: tagObject,
		},
	},
}
"#;
        let file = GoFile::parse(source).unwrap();
        assert!(!file.has_errors());
        let config = AuditConfig::default();
        let mut auditor = DescriptionAuditor::new(&config);
        for literal in file.composite_literals() {
            if literal.type_expr().is_some_and(|ty| ty.text() == "schema.Schema") {
                auditor.audit(literal, Subject::Schema { type_name: "Schema" });
            }
        }

        assert!(auditor.violations().is_empty());
    }

    #[test]
    fn literal_is_audited_once() {
        let file = GoFile::parse("package p\n\nvar s = schema.Schema{}\n").unwrap();
        let config = AuditConfig::default();
        let literal = file.composite_literals()[0];
        let mut auditor = DescriptionAuditor::new(&config);

        auditor.audit(literal, Subject::Schema { type_name: "Schema" });
        assert!(auditor.is_audited(&literal));
        auditor.audit(literal, Subject::Schema { type_name: "Schema" });

        assert_eq!(auditor.violations().len(), 1);
    }

    #[test]
    fn configured_field_names_are_honoured() {
        let source = r#"package p

var s = schema.Schema{
	Summary: "Widget",
	Fields: map[string]schema.Attribute{
		"id": schema.StringAttribute{},
		"nested": schema.ListNestedAttribute{
			Summary: "Nested",
			Element: schema.NestedAttributeObject{
				Fields: map[string]schema.Attribute{
					"inner": schema.StringAttribute{},
				},
			},
		},
	},
}
"#;
        let config = AuditConfig {
            description_fields: vec!["Summary".to_string()],
            attributes_field: "Fields".to_string(),
            wrapper_field: "Element".to_string(),
            ..AuditConfig::default()
        };

        assert_eq!(
            messages(&audit_first(source, &config)),
            vec![
                "attribute \"id\" is missing Description or MarkdownDescription",
                "attribute \"inner\" is missing Description or MarkdownDescription",
            ]
        );
    }
}

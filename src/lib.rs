//! Forseti ruleset that checks Terraform plugin-framework schemas written in Go for
//! missing `Description`/`MarkdownDescription` fields.
//!
//! The analysis itself is available as a plain library call:
//!
//! ```no_run
//! use forseti_ruleset_tfschema::{audit_source, AuditConfig};
//!
//! let source = std::fs::read_to_string("internal/provider/widget_resource.go").unwrap();
//! for violation in audit_source(&source, &AuditConfig::default()).unwrap_or_default() {
//!     println!("{}: {}", violation.span, violation.message);
//! }
//! ```

pub mod auditor;
pub mod config;
pub mod matcher;
pub mod resolve;
pub mod rules;
pub mod syntax;
pub mod utils;

use tracing::debug;

pub use auditor::{DescriptionAuditor, Subject, Violation};
pub use config::{AuditConfig, ConfigError, DescriptionCheck, TypeResolution};
pub use matcher::{ShapeMatcher, TypeMatch};
pub use resolve::{ImportResolver, NamedType, TypeResolver};
pub use syntax::{GoFile, Span, SyntaxNode};

/// Audit every schema literal in `file`, returning violations in discovery order.
pub fn audit(file: &GoFile<'_>, config: &AuditConfig) -> Vec<Violation> {
    let resolver = match config.type_resolution {
        TypeResolution::Imports => Some(ImportResolver::from_file(file)),
        TypeResolution::Syntactic => None,
    };
    let matcher = match &resolver {
        Some(resolver) => ShapeMatcher::with_resolver(config, resolver),
        None => ShapeMatcher::new(config),
    };
    let mut auditor = DescriptionAuditor::new(config);

    for literal in file.composite_literals() {
        match matcher.matched_type(&literal) {
            Some((TypeMatch::SchemaType, type_name)) => {
                debug!(at = %literal.span(), type_name, "auditing schema literal");
                auditor.audit(literal, Subject::Schema { type_name });
            }
            Some((TypeMatch::AttributeType, _))
                if config.standalone_attributes && !auditor.is_audited(&literal) =>
            {
                let Some(entry) = literal.enclosing_entry() else {
                    continue;
                };
                let Some(name) = entry.key.string_value() else {
                    continue;
                };
                debug!(at = %literal.span(), attribute = name, "auditing standalone attribute");
                auditor.audit(
                    literal,
                    Subject::Attribute {
                        name,
                        entry: entry.span,
                    },
                );
            }
            _ => {}
        }
    }

    let violations = auditor.into_violations();
    debug!(count = violations.len(), "schema description audit finished");
    violations
}

/// Parse and audit Go source. Returns `None` when the source does not parse cleanly.
pub fn audit_source(text: &str, config: &AuditConfig) -> Option<Vec<Violation>> {
    let file = GoFile::parse(text)?;
    if file.has_errors() {
        return None;
    }
    Some(audit(&file, config))
}

use forseti_sdk::core::{Diagnostic, LineIndex, Range};
use forseti_sdk::ruleset::RuleContext;
use tracing::warn;

use crate::auditor::Violation;
use crate::syntax::GoFile;

/// Shared utilities for Terraform provider schema rules
pub struct SchemaUtils;

impl SchemaUtils {
    /// Parse Go source, or None if it does not parse cleanly
    pub fn parse_go(text: &str) -> Option<GoFile<'_>> {
        let file = GoFile::parse(text)?;
        if file.has_errors() {
            warn!("skipping Go source with syntax errors");
            return None;
        }
        Some(file)
    }

    /// Create a diagnostic underlining the literal or attribute entry a violation points at
    pub fn create_violation_diagnostic(
        rule_id: &str,
        code: &str,
        violation: &Violation,
        line_index: &LineIndex,
    ) -> Diagnostic {
        Diagnostic {
            rule_id: rule_id.to_string(),
            message: violation.message.clone(),
            severity: "warn".to_string(),
            range: Range {
                start: line_index.to_pos(violation.span.start),
                end: line_index.to_pos(violation.span.end),
            },
            code: Some(code.to_string()),
            suggest: None,
            docs_url: Some(format!("https://forseti.dev/rules/terraform-schema/{}", rule_id)),
        }
    }
}

/// Trait for rules that work on a parsed Go file
pub trait GoRule {
    /// Check rule with Go parsing handled automatically
    fn check_go(&self, file: &GoFile<'_>, ctx: &mut RuleContext);

    /// Default implementation that handles Go parsing
    fn check(&self, ctx: &mut RuleContext) {
        if let Some(file) = SchemaUtils::parse_go(ctx.text) {
            self.check_go(&file, ctx);
        }
        // Files that fail to parse are left to the compiler
    }
}

use forseti_sdk::core::LineIndex;
use forseti_sdk::ruleset::{Rule, RuleContext};

use crate::audit;
use crate::config::{AuditConfig, DescriptionCheck};
use crate::syntax::GoFile;
use crate::utils::{GoRule, SchemaUtils};

/// Flags descriptions that are present but written as empty string literals.
/// Literals with no description field at all are not reported by this rule.
pub struct SchemaDescriptionNonEmptyRule {
    config: AuditConfig,
}

impl SchemaDescriptionNonEmptyRule {
    pub fn new(config: &AuditConfig) -> Self {
        Self {
            config: config.clone().with_check(DescriptionCheck::NonEmpty),
        }
    }
}

impl Rule for SchemaDescriptionNonEmptyRule {
    fn id(&self) -> &'static str {
        "schema-description-non-empty"
    }

    fn description(&self) -> &'static str {
        "Flags Terraform provider schemas and attributes whose Description and MarkdownDescription are empty strings"
    }

    fn default_config(&self) -> serde_json::Value {
        serde_json::Value::String("warn".to_string())
    }

    fn check(&self, ctx: &mut RuleContext) {
        GoRule::check(self, ctx);
    }
}

impl GoRule for SchemaDescriptionNonEmptyRule {
    fn check_go(&self, file: &GoFile<'_>, ctx: &mut RuleContext) {
        let line_index = LineIndex::new(ctx.text);

        for violation in audit(file, &self.config) {
            let diagnostic = SchemaUtils::create_violation_diagnostic(
                self.id(),
                "EMPTY_DESCRIPTION",
                &violation,
                &line_index,
            );
            ctx.report(diagnostic);
        }
    }
}

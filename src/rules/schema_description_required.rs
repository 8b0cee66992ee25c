use forseti_sdk::core::LineIndex;
use forseti_sdk::ruleset::{Rule, RuleContext};

use crate::audit;
use crate::config::{AuditConfig, DescriptionCheck};
use crate::syntax::GoFile;
use crate::utils::{GoRule, SchemaUtils};

pub struct SchemaDescriptionRequiredRule {
    config: AuditConfig,
}

impl SchemaDescriptionRequiredRule {
    pub fn new(config: &AuditConfig) -> Self {
        Self {
            config: config.clone().with_check(DescriptionCheck::Presence),
        }
    }
}

impl Rule for SchemaDescriptionRequiredRule {
    fn id(&self) -> &'static str {
        "schema-description-required"
    }

    fn description(&self) -> &'static str {
        "Requires that Terraform provider schemas and every nested attribute declare a Description or MarkdownDescription"
    }

    fn default_config(&self) -> serde_json::Value {
        serde_json::Value::String("error".to_string())
    }

    fn check(&self, ctx: &mut RuleContext) {
        // Use the GoRule trait's default implementation
        GoRule::check(self, ctx);
    }
}

impl GoRule for SchemaDescriptionRequiredRule {
    fn check_go(&self, file: &GoFile<'_>, ctx: &mut RuleContext) {
        let line_index = LineIndex::new(ctx.text);

        for violation in audit(file, &self.config) {
            let diagnostic = SchemaUtils::create_violation_diagnostic(
                self.id(),
                "MISSING_DESCRIPTION",
                &violation,
                &line_index,
            );
            ctx.report(diagnostic);
        }
    }
}

mod schema_description_non_empty;
mod schema_description_required;

use forseti_sdk::ruleset::Ruleset;

use crate::config::{AuditConfig, DescriptionCheck};

pub use schema_description_non_empty::SchemaDescriptionNonEmptyRule;
pub use schema_description_required::SchemaDescriptionRequiredRule;

/// Build the ruleset, registering the description rule selected by `config.check`.
pub fn create_terraform_schema_ruleset(config: &AuditConfig) -> Ruleset {
    let ruleset = Ruleset::new("terraform-schema");
    match config.check {
        DescriptionCheck::Presence => {
            ruleset.with_rule(Box::new(SchemaDescriptionRequiredRule::new(config)))
        }
        DescriptionCheck::NonEmpty => {
            ruleset.with_rule(Box::new(SchemaDescriptionNonEmptyRule::new(config)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forseti_sdk::ruleset::Rule;
    use pretty_assertions::assert_eq;

    fn rule_ids(ruleset: &Ruleset) -> Vec<&'static str> {
        ruleset.rules.iter().map(|rule| rule.id()).collect()
    }

    #[test]
    fn default_settings_register_the_presence_rule() {
        let ruleset = create_terraform_schema_ruleset(&AuditConfig::default());

        assert_eq!(ruleset.id, "terraform-schema");
        assert_eq!(rule_ids(&ruleset), vec!["schema-description-required"]);
    }

    #[test]
    fn check_setting_selects_the_non_empty_rule() {
        let config = AuditConfig::from_json(r#"{"check": "non_empty"}"#).unwrap();
        let ruleset = create_terraform_schema_ruleset(&config);

        assert_eq!(rule_ids(&ruleset), vec!["schema-description-non-empty"]);
    }
}

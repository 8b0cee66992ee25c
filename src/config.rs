use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

/// Which property of the description fields is required.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionCheck {
    /// A description key must be present. Its value is not inspected.
    #[default]
    Presence,
    /// Description keys that are present must not all be empty string literals.
    NonEmpty,
}

/// How literal types are recognised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeResolution {
    /// Resolve qualifiers through the file's imports, falling back to `Syntactic`.
    #[default]
    Imports,
    /// Compare the literal qualifier against `package` as written.
    Syntactic,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid settings: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("`{0}` must list at least one name")]
    EmptyList(&'static str),

    #[error("`{field}` contains `{value}`, which is not a Go identifier")]
    InvalidIdentifier { field: &'static str, value: String },

    #[error("identifier pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
}

/// Settings for schema description auditing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Short name of the package that defines the schema types.
    pub package: String,
    pub schema_types: Vec<String>,
    pub attribute_types: Vec<String>,
    /// Fields that satisfy the documentation requirement.
    pub description_fields: Vec<String>,
    /// Field holding the name -> attribute mapping.
    pub attributes_field: String,
    /// Field of container attributes whose value holds a further `attributes_field`.
    pub wrapper_field: String,
    pub type_resolution: TypeResolution,
    pub check: DescriptionCheck,
    /// Also audit attribute literals that are not reachable from a schema literal.
    pub standalone_attributes: bool,
}

const ATTRIBUTE_TYPES: &[&str] = &[
    "StringAttribute",
    "BoolAttribute",
    "Int32Attribute",
    "Int64Attribute",
    "Float32Attribute",
    "Float64Attribute",
    "NumberAttribute",
    "ListAttribute",
    "SetAttribute",
    "MapAttribute",
    "ObjectAttribute",
    "DynamicAttribute",
    "SingleNestedAttribute",
    "ListNestedAttribute",
    "SetNestedAttribute",
    "MapNestedAttribute",
];

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            package: "schema".to_string(),
            schema_types: vec!["Schema".to_string()],
            attribute_types: ATTRIBUTE_TYPES.iter().map(|name| name.to_string()).collect(),
            description_fields: vec!["Description".to_string(), "MarkdownDescription".to_string()],
            attributes_field: "Attributes".to_string(),
            wrapper_field: "NestedObject".to_string(),
            type_resolution: TypeResolution::default(),
            check: DescriptionCheck::default(),
            standalone_attributes: false,
        }
    }
}

impl AuditConfig {
    /// Decode and validate settings. `null` yields the defaults.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, ConfigError> {
        let config = if value.is_null() {
            Self::default()
        } else {
            Self::deserialize(value)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_check(mut self, check: DescriptionCheck) -> Self {
        self.check = check;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let identifier = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$")?;

        let lists: [(&'static str, &[String]); 3] = [
            ("schema_types", &self.schema_types),
            ("attribute_types", &self.attribute_types),
            ("description_fields", &self.description_fields),
        ];
        for (field, names) in lists {
            if names.is_empty() {
                return Err(ConfigError::EmptyList(field));
            }
            for name in names {
                if !identifier.is_match(name) {
                    return Err(ConfigError::InvalidIdentifier {
                        field,
                        value: name.clone(),
                    });
                }
            }
        }

        let singles: [(&'static str, &String); 3] = [
            ("package", &self.package),
            ("attributes_field", &self.attributes_field),
            ("wrapper_field", &self.wrapper_field),
        ];
        for (field, name) in singles {
            if !identifier.is_match(name) {
                return Err(ConfigError::InvalidIdentifier {
                    field,
                    value: name.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn is_description_field(&self, name: &str) -> bool {
        self.description_fields.iter().any(|field| field == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn null_settings_use_defaults() {
        let config = AuditConfig::from_value(&serde_json::Value::Null).unwrap();
        assert_eq!(config, AuditConfig::default());
        assert_eq!(config.package, "schema");
        assert!(config.attribute_types.contains(&"ListNestedAttribute".to_string()));
        assert_eq!(config.check, DescriptionCheck::Presence);
        assert_eq!(config.type_resolution, TypeResolution::Imports);
    }

    #[test]
    fn partial_settings_keep_other_defaults() {
        let config = AuditConfig::from_value(&json!({
            "attribute_types": ["StringAttribute", "CustomAttribute"],
            "check": "non_empty",
            "type_resolution": "syntactic",
        }))
        .unwrap();

        assert_eq!(config.attribute_types, vec!["StringAttribute", "CustomAttribute"]);
        assert_eq!(config.check, DescriptionCheck::NonEmpty);
        assert_eq!(config.type_resolution, TypeResolution::Syntactic);
        assert_eq!(config.wrapper_field, "NestedObject");
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = AuditConfig::from_json(r#"{"attributes": []}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Decode(_)));
    }

    #[test]
    fn rejects_empty_type_lists() {
        let err = AuditConfig::from_value(&json!({ "schema_types": [] })).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyList("schema_types")));
    }

    #[test]
    fn rejects_non_identifiers() {
        let err = AuditConfig::from_value(&json!({ "wrapper_field": "Nested.Object" })).unwrap_err();
        assert_eq!(
            err.to_string(),
            "`wrapper_field` contains `Nested.Object`, which is not a Go identifier"
        );
    }
}

use anyhow::{Context, Result};
use forseti_sdk::core::{FileContext, PreprocessingContext, RulesetCapabilities};
use forseti_sdk::ruleset::{Ruleset, RulesetOptions, RulesetServer};
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use forseti_ruleset_tfschema::AuditConfig;
use forseti_ruleset_tfschema::rules::create_terraform_schema_ruleset;

/// Path of an optional JSON settings file for the schema rules
const CONFIG_ENV: &str = "FORSETI_TFSCHEMA_CONFIG";

struct TerraformSchemaRuleset {
    config: AuditConfig,
}

impl RulesetOptions for TerraformSchemaRuleset {
    fn create_ruleset(&self) -> Ruleset {
        create_terraform_schema_ruleset(&self.config)
    }

    fn get_capabilities(&self) -> RulesetCapabilities {
        RulesetCapabilities {
            ruleset_id: "terraform-schema".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            file_patterns: vec!["*.go".to_string()],
            max_file_size: Some(5 * 1024 * 1024), // 5MB limit for Go sources
            annotation_prefixes: vec![
                "//".to_string(), // Go line comments
                "/*".to_string(), // Go block comments
            ],
            rules: vec![], // Will be populated by the server
            default_config: self.get_default_config(),
            config_settings: vec![], // Schema settings come from FORSETI_TFSCHEMA_CONFIG
        }
    }

    fn preprocess_files(&self, file_uris: &[String]) -> Result<PreprocessingContext> {
        let mut files = Vec::new();
        let mut global_context = HashMap::new();

        let mut go_files = 0;
        let mut go_test_files = 0;

        for uri in file_uris {
            let mut context = HashMap::new();

            // Only gather lightweight file metadata
            if uri.starts_with("file://") {
                let path = uri.strip_prefix("file://").unwrap_or(uri);
                if let Ok(metadata) = std::fs::metadata(path) {
                    context.insert("file_size".to_string(), json!(metadata.len()));
                    context.insert("is_file".to_string(), json!(metadata.is_file()));
                }

                let path_obj = std::path::Path::new(path);
                if let Some(ext) = path_obj.extension() {
                    let extension = ext.to_string_lossy();
                    context.insert("extension".to_string(), json!(extension));

                    if extension == "go" {
                        if path.ends_with("_test.go") {
                            go_test_files += 1;
                            context.insert("go_file_type".to_string(), json!("test"));
                        } else {
                            go_files += 1;
                            context.insert("go_file_type".to_string(), json!("source"));
                        }
                    }
                }

                // Vendored dependencies are not the provider's own schemas
                if path.contains("/vendor/") {
                    context.insert("vendored".to_string(), json!(true));
                }
            }

            files.push(FileContext {
                uri: uri.clone(),
                content: String::new(), // Empty - rulesets will load content themselves
                language: infer_language(uri),
                context,
            });
        }

        global_context.insert("total_files".to_string(), json!(files.len()));
        global_context.insert("go_files".to_string(), json!(go_files));
        global_context.insert("go_test_files".to_string(), json!(go_test_files));
        global_context.insert("ruleset_type".to_string(), json!("terraform-schema"));

        debug!(go_files, go_test_files, "preprocessed files");

        Ok(PreprocessingContext {
            ruleset_id: "terraform-schema".to_string(),
            files,
            global_context,
        })
    }
}

fn infer_language(uri: &str) -> Option<String> {
    let path = if uri.starts_with("file://") {
        uri.strip_prefix("file://").unwrap_or(uri)
    } else {
        uri
    };

    match std::path::Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
    {
        Some("go") => Some("go".to_string()),
        _ => None,
    }
}

fn load_config() -> Result<AuditConfig> {
    let Some(path) = std::env::var_os(CONFIG_ENV) else {
        return Ok(AuditConfig::default());
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {} from {}", CONFIG_ENV, path.to_string_lossy()))?;
    let config = AuditConfig::from_json(&text)
        .with_context(|| format!("invalid settings in {}", path.to_string_lossy()))?;

    info!(path = %path.to_string_lossy(), "loaded schema settings");
    Ok(config)
}

fn main() -> Result<()> {
    // stdout carries the ruleset protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = load_config()?;
    let mut server = RulesetServer::new(Box::new(TerraformSchemaRuleset { config }));
    server.run_stdio()
}

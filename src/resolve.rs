use std::collections::HashMap;

use crate::syntax::{GoFile, SyntaxNode};

/// A named type as seen from its defining package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedType {
    /// Short name of the defining package, e.g. `schema`.
    pub package: String,
    pub name: String,
}

/// Resolves the named type of a composite literal.
///
/// Implementations may know more than the literal's spelling: a resolver that understands
/// imports sees through `tfschema "…/resource/schema"` aliases where a syntactic match cannot.
pub trait TypeResolver {
    fn resolve_named_type(&self, literal: &SyntaxNode<'_>) -> Option<NamedType>;
}

/// Resolves qualified type references through the file's import declarations.
#[derive(Debug, Default, Clone)]
pub struct ImportResolver {
    /// Local qualifier -> package short name.
    qualifiers: HashMap<String, String>,
    /// Short names of packages imported with `.`.
    dot_imports: Vec<String>,
}

impl ImportResolver {
    pub fn from_file(file: &GoFile<'_>) -> Self {
        let mut resolver = Self::default();

        for declaration in file.root().descendants_of_kind("import_declaration") {
            for spec in declaration.descendants_of_kind("import_spec") {
                let Some(path) = spec.field("path").and_then(|path| path.string_value()) else {
                    continue;
                };
                let package = package_short_name(path).to_string();

                match spec.field("name") {
                    None => {
                        resolver.qualifiers.insert(package.clone(), package);
                    }
                    Some(name) => match name.raw_kind() {
                        "dot" => resolver.dot_imports.push(package),
                        "package_identifier" => {
                            resolver.qualifiers.insert(name.text().to_string(), package);
                        }
                        // blank imports bring nothing into scope
                        _ => {}
                    },
                }
            }
        }

        resolver
    }

    pub fn package_for(&self, qualifier: &str) -> Option<&str> {
        self.qualifiers.get(qualifier).map(String::as_str)
    }
}

impl TypeResolver for ImportResolver {
    fn resolve_named_type(&self, literal: &SyntaxNode<'_>) -> Option<NamedType> {
        let type_expr = literal.type_expr()?;

        if let Some((qualifier, name)) = type_expr.qualified_name() {
            let package = self.package_for(qualifier)?;
            return Some(NamedType {
                package: package.to_string(),
                name: name.to_string(),
            });
        }

        // An unqualified name only resolves unambiguously through a single dot import.
        match (type_expr.raw_kind(), self.dot_imports.as_slice()) {
            ("type_identifier", [package]) => Some(NamedType {
                package: package.clone(),
                name: type_expr.text().to_string(),
            }),
            _ => None,
        }
    }
}

/// Go package short name from an import path, skipping a trailing `/vN` major version.
pub fn package_short_name(path: &str) -> &str {
    let mut segments = path.rsplit('/');
    let last = segments.next().unwrap_or(path);
    if is_major_version(last) {
        if let Some(previous) = segments.next() {
            return previous;
        }
    }
    last
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

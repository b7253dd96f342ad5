//! Meta-Model Loading
//!
//! Deserializes a meta-model graph from its JSON document form and checks
//! structural well-formedness (identifier legality, non-empty names).
//!
//! Cross-feature type resolution is deliberately NOT checked here - that is
//! the translator's job, and the translator re-checks it regardless of which
//! loader produced the graph.

use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::info;

use super::{Classifier, MetaModel, Package};

/// Load a meta-model from a JSON file
pub fn load_from_file(path: &Path) -> anyhow::Result<MetaModel> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read meta-model {}", path.display()))?;
    let model = load_from_str(&content)
        .with_context(|| format!("invalid meta-model {}", path.display()))?;
    info!(
        path = %path.display(),
        packages = model.packages.len(),
        "loaded meta-model"
    );
    Ok(model)
}

/// Parse a meta-model from JSON text and validate its structure
pub fn load_from_str(content: &str) -> anyhow::Result<MetaModel> {
    let model: MetaModel = serde_json::from_str(content)?;
    validate(&model)?;
    Ok(model)
}

fn validate(model: &MetaModel) -> anyhow::Result<()> {
    for pkg in &model.packages {
        validate_package(pkg, "")?;
    }
    Ok(())
}

fn validate_package(pkg: &Package, parent: &str) -> anyhow::Result<()> {
    if !is_valid_identifier(&pkg.name) {
        anyhow::bail!(
            "invalid package name `{}` under `{}`",
            pkg.name,
            if parent.is_empty() { "<root>" } else { parent }
        );
    }
    let path = if parent.is_empty() {
        pkg.name.clone()
    } else {
        format!("{}.{}", parent, pkg.name)
    };

    for classifier in &pkg.classifiers {
        if !is_valid_identifier(classifier.name()) {
            anyhow::bail!(
                "invalid classifier name `{}` in package `{}`",
                classifier.name(),
                path
            );
        }
        match classifier {
            Classifier::Class(class) => {
                for feature in &class.features {
                    if !is_valid_identifier(&feature.name) {
                        anyhow::bail!(
                            "invalid feature name `{}` in class `{}.{}`",
                            feature.name,
                            path,
                            class.name
                        );
                    }
                }
            }
            Classifier::Enum(enum_def) => {
                for literal in &enum_def.literals {
                    if !is_valid_identifier(literal) {
                        anyhow::bail!(
                            "invalid enum literal `{}` in enum `{}.{}`",
                            literal,
                            path,
                            enum_def.name
                        );
                    }
                }
            }
        }
    }

    for sub in &pkg.subpackages {
        validate_package(sub, &path)?;
    }
    Ok(())
}

/// Avro name rule: `[A-Za-z_][A-Za-z0-9_]*`
fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

//! Error types for meta-model translation

use thiserror::Error;

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslateError>;

/// Translation errors
///
/// All variants are fatal for the translation they occur in: no partial
/// protocol document is ever returned. Each variant carries enough context
/// (package, class, feature) to locate the offending declaration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("unresolved type reference `{reference}` in {context}")]
    UnresolvedTypeReference { reference: String, context: String },

    #[error("name collision in namespace `{namespace}`: `{name}` is declared more than once")]
    NameCollision { namespace: String, name: String },

    #[error("unsupported feature shape for `{feature}` in class `{class}`: {reason}")]
    UnsupportedFeatureShape {
        class: String,
        feature: String,
        reason: String,
    },

    #[error("meta-model contains no packages")]
    EmptyModel,
}

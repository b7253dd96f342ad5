//! Meta-Model Graph
//!
//! In-memory representation of the meta-model input: a tree of packages
//! owning classes and enums, with typed features and inheritance edges
//! between classes. The graph is constructed once (by the loader or a test)
//! and read-only for the duration of a translation.

pub mod loader;

use serde::{Deserialize, Serialize};

/// Sentinel upper bound meaning "unbounded" (Ecore's UNBOUNDED_MULTIPLICITY)
pub const UNBOUNDED: i32 = -1;

/// Primitive attribute types supported by the meta-model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    String,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    Short,
    Char,
    Date,
}

/// Declared type of a feature: a primitive or a reference to a classifier.
///
/// Classifier references are either simple names (resolved within the owning
/// package) or fully-qualified dotted names (resolved from a root package).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    Primitive(Primitive),
    Classifier(String),
}

/// An attribute or reference declared on a class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    /// Declared type
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    /// Lower multiplicity bound
    #[serde(default)]
    pub lower: u32,
    /// Upper multiplicity bound; [`UNBOUNDED`] means no limit
    #[serde(default = "default_upper")]
    pub upper: i32,
    /// Whether a referenced object is owned by the referrer (vs. linked).
    /// Containment has no effect on the generated field shape.
    #[serde(default)]
    pub containment: bool,
}

fn default_upper() -> i32 {
    1
}

impl Feature {
    /// Multi-valued: upper bound above one or unbounded
    pub fn is_many(&self) -> bool {
        self.upper == UNBOUNDED || self.upper > 1
    }

    /// Optional single-valued: may legally hold zero values
    pub fn is_optional(&self) -> bool {
        self.lower == 0 && self.upper == 1
    }
}

/// A class declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    /// Abstract classes still produce a record (subtypes flatten them in,
    /// but consumers may also address the ancestor shape directly)
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    /// Interface flag; interfaces contributing no features are pure
    /// capability markers and produce no record of their own
    #[serde(default, rename = "interface")]
    pub is_interface: bool,
    /// Supertype references, in declaration order (multiple inheritance)
    #[serde(default)]
    pub supertypes: Vec<String>,
    /// Declared features, in declaration order
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// An enumeration declaration; literal order is meaningful
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,
    #[serde(default)]
    pub literals: Vec<String>,
}

/// A classifier owned by a package
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    Class(Class),
    Enum(EnumDef),
}

impl Classifier {
    pub fn name(&self) -> &str {
        match self {
            Classifier::Class(c) => &c.name,
            Classifier::Enum(e) => &e.name,
        }
    }

    pub fn as_class(&self) -> Option<&Class> {
        match self {
            Classifier::Class(c) => Some(c),
            Classifier::Enum(_) => None,
        }
    }
}

/// A namespace node grouping classifiers, nestable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    /// Owned classifiers, in declaration order (classes and enums interleave)
    #[serde(default)]
    pub classifiers: Vec<Classifier>,
    #[serde(default)]
    pub subpackages: Vec<Package>,
}

/// The root of the meta-model graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaModel {
    #[serde(default)]
    pub packages: Vec<Package>,
}

impl MetaModel {
    /// Walk every classifier in global declared order: pre-order over the
    /// package tree, classifiers in declaration order within each package.
    ///
    /// Yields the owning package's dotted path alongside each classifier.
    /// This order is the stable tie-break for all output ordering.
    pub fn walk_classifiers(&self) -> Vec<(String, &Classifier)> {
        let mut out = Vec::new();
        for pkg in &self.packages {
            walk_package(pkg, "", &mut out);
        }
        out
    }
}

fn walk_package<'a>(pkg: &'a Package, parent: &str, out: &mut Vec<(String, &'a Classifier)>) {
    let path = if parent.is_empty() {
        pkg.name.clone()
    } else {
        format!("{}.{}", parent, pkg.name)
    };
    for classifier in &pkg.classifiers {
        out.push((path.clone(), classifier));
    }
    for sub in &pkg.subpackages {
        walk_package(sub, &path, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(name: &str, lower: u32, upper: i32) -> Feature {
        Feature {
            name: name.to_string(),
            type_ref: TypeRef::Primitive(Primitive::String),
            lower,
            upper,
            containment: false,
        }
    }

    #[test]
    fn test_multiplicity_helpers() {
        assert!(feature("a", 0, UNBOUNDED).is_many());
        assert!(feature("a", 1, 5).is_many());
        assert!(!feature("a", 0, 1).is_many());

        assert!(feature("a", 0, 1).is_optional());
        assert!(!feature("a", 1, 1).is_optional());
        assert!(!feature("a", 0, UNBOUNDED).is_optional());
    }

    #[test]
    fn test_walk_order_is_preorder() {
        let model = MetaModel {
            packages: vec![Package {
                name: "root".to_string(),
                classifiers: vec![Classifier::Enum(EnumDef {
                    name: "Color".to_string(),
                    literals: vec![],
                })],
                subpackages: vec![
                    Package {
                        name: "a".to_string(),
                        classifiers: vec![Classifier::Class(Class {
                            name: "First".to_string(),
                            is_abstract: false,
                            is_interface: false,
                            supertypes: vec![],
                            features: vec![],
                        })],
                        subpackages: vec![],
                    },
                    Package {
                        name: "b".to_string(),
                        classifiers: vec![Classifier::Class(Class {
                            name: "Second".to_string(),
                            is_abstract: false,
                            is_interface: false,
                            supertypes: vec![],
                            features: vec![],
                        })],
                        subpackages: vec![],
                    },
                ],
            }],
        };

        let walked: Vec<(String, &str)> = model
            .walk_classifiers()
            .into_iter()
            .map(|(ns, c)| (ns, c.name()))
            .collect();
        assert_eq!(
            walked,
            vec![
                ("root".to_string(), "Color"),
                ("root.a".to_string(), "First"),
                ("root.b".to_string(), "Second"),
            ]
        );
    }
}

//! Schema Translator
//!
//! Pure translation from a meta-model graph to an Avro protocol document.
//! The pipeline runs in fixed stages over an immutable input:
//!
//! 1. Index all classifiers by fully-qualified name (collision check)
//! 2. Flatten the supertype closure of every class into a flat feature list
//! 3. Map flattened features to record fields, collecting type dependencies
//! 4. Order emitted types dependencies-first with a stable declared-order
//!    tie-break, so repeated runs produce byte-identical output
//!
//! Any violated input invariant aborts the whole translation - no partial
//! document is ever returned.

mod flatten;
mod order;

use std::collections::{BTreeSet, HashMap, HashSet};

use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Result, TranslateError};
use crate::model::{Classifier, MetaModel, TypeRef, UNBOUNDED};
use crate::protocol::{Field, FieldSchema, NamedType, Protocol, TypeDef};

use flatten::{flatten_features, FlatFeature};

/// A classifier together with its owning package's dotted path
#[derive(Debug)]
pub(crate) struct Entry<'a> {
    pub namespace: String,
    pub classifier: &'a Classifier,
}

/// All classifiers of the model in global declared order, indexed by
/// fully-qualified name. Building the index detects name collisions.
#[derive(Debug)]
pub(crate) struct ClassifierIndex<'a> {
    entries: Vec<Entry<'a>>,
    by_fqn: HashMap<String, usize>,
}

impl<'a> ClassifierIndex<'a> {
    pub(crate) fn build(model: &'a MetaModel) -> Result<Self> {
        let mut entries = Vec::new();
        let mut by_fqn = HashMap::new();
        for (namespace, classifier) in model.walk_classifiers() {
            let fqn = format!("{}.{}", namespace, classifier.name());
            if by_fqn.insert(fqn, entries.len()).is_some() {
                return Err(TranslateError::NameCollision {
                    namespace,
                    name: classifier.name().to_string(),
                });
            }
            entries.push(Entry {
                namespace,
                classifier,
            });
        }
        Ok(Self { entries, by_fqn })
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entry(&self, idx: usize) -> &Entry<'a> {
        &self.entries[idx]
    }

    pub(crate) fn fqn(&self, idx: usize) -> String {
        let entry = &self.entries[idx];
        format!("{}.{}", entry.namespace, entry.classifier.name())
    }

    /// Resolve a classifier reference. Simple names resolve within the
    /// referencing package only; dotted names resolve from a root package.
    pub(crate) fn resolve(&self, reference: &str, owning_ns: &str) -> Option<usize> {
        if reference.contains('.') {
            self.by_fqn.get(reference).copied()
        } else {
            self.by_fqn
                .get(&format!("{}.{}", owning_ns, reference))
                .copied()
        }
    }
}

/// Translate a meta-model graph into an Avro protocol document.
///
/// Total: returns either a complete, self-contained protocol or an error.
pub fn translate(model: &MetaModel) -> Result<Protocol> {
    let root = model.packages.first().ok_or(TranslateError::EmptyModel)?;
    let index = ClassifierIndex::build(model)?;
    let count = index.len();

    // Flatten every class up front; marker-interface detection needs the
    // complete flattened feature sets before any field is mapped.
    let mut flattened: Vec<Vec<FlatFeature<'_>>> = Vec::with_capacity(count);
    for idx in 0..count {
        let entry = index.entry(idx);
        flattened.push(match entry.classifier.as_class() {
            Some(class) => flatten_features(idx, class, &index)?,
            None => Vec::new(),
        });
    }

    // Marker interfaces contribute nothing and produce no record
    let skipped: HashSet<usize> = (0..count)
        .filter(|&idx| {
            index
                .entry(idx)
                .classifier
                .as_class()
                .map_or(false, |c| c.is_interface)
                && flattened[idx].is_empty()
        })
        .collect();

    // Map classifiers to type definitions, collecting named-reference
    // dependencies for the ordering pass
    let mut defs: Vec<Option<TypeDef>> = Vec::with_capacity(count);
    let mut deps: Vec<Vec<usize>> = vec![Vec::new(); count];
    for idx in 0..count {
        if skipped.contains(&idx) {
            defs.push(None);
            continue;
        }
        match index.entry(idx).classifier {
            Classifier::Enum(enum_def) => {
                defs.push(Some(TypeDef::Enum {
                    symbols: enum_def.literals.clone(),
                }));
            }
            Classifier::Class(_) => {
                let mut fields = Vec::with_capacity(flattened[idx].len());
                let mut field_deps = BTreeSet::new();
                for flat in &flattened[idx] {
                    let (field, dep) = map_field(flat, &index, &skipped)?;
                    fields.push(field);
                    if let Some(dep) = dep {
                        // A self-reference needs no ordering edge
                        if dep != idx {
                            field_deps.insert(dep);
                        }
                    }
                }
                defs.push(Some(TypeDef::Record { fields }));
                deps[idx] = field_deps.into_iter().collect();
            }
        }
    }

    let emission = order::emission_order(count, &deps);
    let mut types = Vec::with_capacity(count - skipped.len());
    for idx in emission {
        if let Some(def) = defs[idx].take() {
            let entry = index.entry(idx);
            types.push(NamedType {
                name: entry.classifier.name().to_string(),
                namespace: entry.namespace.clone(),
                def,
            });
        }
    }

    debug!(
        classifiers = count,
        types = types.len(),
        namespace = %root.name,
        "translated meta-model"
    );

    Ok(Protocol {
        name: protocol_name(&root.name),
        namespace: root.name.clone(),
        types,
    })
}

/// Map one flattened feature to a record field.
///
/// Returns the field plus the declared index of the referenced classifier,
/// if the feature is classifier-typed.
fn map_field(
    flat: &FlatFeature<'_>,
    index: &ClassifierIndex<'_>,
    skipped: &HashSet<usize>,
) -> Result<(Field, Option<usize>)> {
    let feature = flat.feature;

    if feature.upper == 0 || feature.upper < UNBOUNDED {
        return Err(TranslateError::UnsupportedFeatureShape {
            class: flat.declared_class.clone(),
            feature: feature.name.clone(),
            reason: format!("upper bound of {} can never hold a value", feature.upper),
        });
    }
    if feature.upper > 0 && feature.lower > feature.upper as u32 {
        return Err(TranslateError::UnsupportedFeatureShape {
            class: flat.declared_class.clone(),
            feature: feature.name.clone(),
            reason: format!(
                "lower bound {} exceeds upper bound {}",
                feature.lower, feature.upper
            ),
        });
    }

    let (element, dep) = match &feature.type_ref {
        TypeRef::Primitive(primitive) => (FieldSchema::Primitive((*primitive).into()), None),
        TypeRef::Classifier(reference) => {
            let target = index.resolve(reference, &flat.declared_ns).ok_or_else(|| {
                TranslateError::UnresolvedTypeReference {
                    reference: reference.clone(),
                    context: format!(
                        "feature `{}` of class `{}`",
                        feature.name, flat.declared_class
                    ),
                }
            })?;
            if skipped.contains(&target) {
                return Err(TranslateError::UnsupportedFeatureShape {
                    class: flat.declared_class.clone(),
                    feature: feature.name.clone(),
                    reason: format!(
                        "references marker interface `{}` which produces no record",
                        index.fqn(target)
                    ),
                });
            }
            (FieldSchema::Named(index.fqn(target)), Some(target))
        }
    };

    // Containment vs. plain reference makes no structural difference
    let (schema, default) = if feature.is_many() {
        (FieldSchema::Array(Box::new(element)), Some(json!([])))
    } else if feature.is_optional() {
        (FieldSchema::Optional(Box::new(element)), Some(Value::Null))
    } else {
        (element, None)
    };

    Ok((
        Field {
            name: feature.name.clone(),
            schema,
            default,
        },
        dep,
    ))
}

/// Protocol name derived from the root package's simple name
fn protocol_name(package: &str) -> String {
    let mut chars = package.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

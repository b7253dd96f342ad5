//! Inheritance Flattening
//!
//! The target format has no class hierarchy, so every record carries the
//! features of its transitive supertype closure. The closure is linearized
//! by breadth-first traversal from the class (supertypes in declaration
//! order, first visit wins) and then reversed: most distant ancestor first,
//! the class itself last. Feature lists are concatenated in that order with
//! later same-named declarations shadowing earlier ones - the shadowed slot
//! keeps its position, the subtype's definition wins.

use std::collections::{HashSet, VecDeque};

use crate::error::{Result, TranslateError};
use crate::model::{Class, Feature};

use super::ClassifierIndex;

/// A feature paired with the class that declared it, for reference
/// resolution and error context
#[derive(Debug)]
pub(super) struct FlatFeature<'a> {
    pub feature: &'a Feature,
    /// Dotted path of the declaring class's package
    pub declared_ns: String,
    /// Fully-qualified name of the declaring class
    pub declared_class: String,
}

/// Linearize the supertype closure of a class, distant ancestors first.
///
/// Each class is visited at its breadth-first depth (first visit wins) and
/// the result is stable-sorted by descending depth: classes at equal
/// distance keep their declaration order rather than being flipped by a
/// whole-vector reverse. Inheritance cycles terminate via the visited set;
/// every supertype reference must resolve to a class.
pub(super) fn linearize<'a>(
    class_idx: usize,
    class: &'a Class,
    index: &ClassifierIndex<'a>,
) -> Result<Vec<(usize, &'a Class)>> {
    let mut visited = HashSet::new();
    let mut order: Vec<(usize, &'a Class, usize)> = Vec::new();
    let mut queue: VecDeque<(usize, &'a Class, usize)> = VecDeque::new();
    queue.push_back((class_idx, class, 0));

    while let Some((idx, current, depth)) = queue.pop_front() {
        if !visited.insert(idx) {
            continue;
        }
        order.push((idx, current, depth));

        let fqn = index.fqn(idx);
        let namespace = &index.entry(idx).namespace;
        for supertype_ref in &current.supertypes {
            let sup_idx = index.resolve(supertype_ref, namespace).ok_or_else(|| {
                TranslateError::UnresolvedTypeReference {
                    reference: supertype_ref.clone(),
                    context: format!("supertypes of class `{}`", fqn),
                }
            })?;
            let supertype = index.entry(sup_idx).classifier.as_class().ok_or_else(|| {
                TranslateError::UnresolvedTypeReference {
                    reference: supertype_ref.clone(),
                    context: format!(
                        "supertypes of class `{}` (`{}` is not a class)",
                        fqn,
                        index.fqn(sup_idx)
                    ),
                }
            })?;
            queue.push_back((sup_idx, supertype, depth + 1));
        }
    }

    order.sort_by(|a, b| b.2.cmp(&a.2));
    Ok(order.into_iter().map(|(idx, class, _)| (idx, class)).collect())
}

/// Flatten the full feature set of a class in ancestor-first order with
/// shadowing by name
pub(super) fn flatten_features<'a>(
    class_idx: usize,
    class: &'a Class,
    index: &ClassifierIndex<'a>,
) -> Result<Vec<FlatFeature<'a>>> {
    let order = linearize(class_idx, class, index)?;

    let mut flat: Vec<FlatFeature<'a>> = Vec::new();
    let mut position_by_name: std::collections::HashMap<&'a str, usize> =
        std::collections::HashMap::new();

    for (idx, current) in order {
        let entry = index.entry(idx);
        for feature in &current.features {
            let flat_feature = FlatFeature {
                feature,
                declared_ns: entry.namespace.clone(),
                declared_class: index.fqn(idx),
            };
            match position_by_name.get(feature.name.as_str()) {
                Some(&position) => flat[position] = flat_feature,
                None => {
                    position_by_name.insert(&feature.name, flat.len());
                    flat.push(flat_feature);
                }
            }
        }
    }

    Ok(flat)
}

//! Meta-model lookup service and relation paths.

use crate::error::{ModelError, ModelResult};
use crate::object::{MetaAttribute, MetaObject, MetaRelation};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::VecDeque;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Separator between relation aliases in attribute paths.
pub const RELATION_SEPARATOR: &str = "__";

/// One hop of a relation path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationStep {
    pub alias: String,
    /// Object reached by this hop.
    pub object: String,
    pub reverse: bool,
}

/// Chain of relations leading from one object to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationPath {
    start: String,
    steps: Vec<RelationStep>,
}

impl RelationPath {
    /// Empty path starting (and ending) at `start`.
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            steps: Vec::new(),
        }
    }

    fn with_step(&self, relation: &MetaRelation) -> Self {
        let mut steps = self.steps.clone();
        steps.push(RelationStep {
            alias: relation.alias.clone(),
            object: relation.right_object.clone(),
            reverse: relation.is_reverse(),
        });
        Self {
            start: self.start.clone(),
            steps,
        }
    }

    pub fn start_object(&self) -> &str {
        &self.start
    }

    pub fn end_object(&self) -> &str {
        self.steps.last().map_or(&self.start, |s| &s.object)
    }

    pub fn steps(&self) -> &[RelationStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True if any hop is 1:N, i.e. one start row may yield many values.
    pub fn has_reverse(&self) -> bool {
        self.steps.iter().any(|s| s.reverse)
    }

    /// Prefix an attribute path with this relation path.
    pub fn prefix(&self, attribute_path: &str) -> String {
        if self.steps.is_empty() {
            return attribute_path.to_string();
        }
        format!("{}{}{}", self, RELATION_SEPARATOR, attribute_path)
    }
}

impl fmt::Display for RelationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let aliases: Vec<&str> = self.steps.iter().map(|s| s.alias.as_str()).collect();
        f.write_str(&aliases.join(RELATION_SEPARATOR))
    }
}

/// An attribute reached through a (possibly empty) relation path.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAttribute {
    pub attribute: MetaAttribute,
    /// Path from the lookup object to the object owning the attribute.
    pub path: RelationPath,
}

impl ResolvedAttribute {
    /// Alias of the object owning the attribute.
    pub fn object_alias(&self) -> &str {
        self.path.end_object()
    }
}

/// Lookup service for meta-objects.
///
/// Implementors only need [`MetaModel::object`]; attribute resolution and
/// relation-path search are derived from it.
pub trait MetaModel: Send + Sync {
    /// Get an object by its fully qualified alias.
    fn object(&self, alias: &str) -> ModelResult<Arc<MetaObject>>;

    fn has_object(&self, alias: &str) -> bool {
        self.object(alias).is_ok()
    }

    /// Resolve an attribute path like `CUSTOMER__CITY` starting at `object`.
    fn resolve_attribute(&self, object: &str, path: &str) -> ModelResult<ResolvedAttribute> {
        let mut current = self.object(object)?;
        let mut relation_path = RelationPath::new(object);
        let parts: Vec<&str> = path.split(RELATION_SEPARATOR).collect();
        let Some((attribute_alias, relations)) = parts.split_last() else {
            return Err(ModelError::AttributeNotFound {
                object: object.to_string(),
                alias: path.to_string(),
            });
        };

        for rel_alias in relations {
            let relation = current
                .relation(rel_alias)
                .ok_or_else(|| ModelError::RelationNotFound {
                    object: current.alias().to_string(),
                    alias: rel_alias.to_string(),
                })?
                .clone();
            relation_path = relation_path.with_step(&relation);
            current = self.object(&relation.right_object)?;
        }

        let attribute = current
            .attribute(attribute_alias)
            .cloned()
            .ok_or_else(|| ModelError::AttributeNotFound {
                object: object.to_string(),
                alias: path.to_string(),
            })?;

        Ok(ResolvedAttribute {
            attribute,
            path: relation_path,
        })
    }

    /// Find the shortest relation path from `from` to `to`.
    ///
    /// Breadth-first over relations in declaration order, so among equally
    /// short paths the first declared wins. Returns an empty path when both
    /// objects are the same and `None` when nothing is found within `max_depth` hops.
    fn find_relation_path(
        &self,
        from: &str,
        to: &str,
        max_depth: usize,
    ) -> ModelResult<Option<RelationPath>> {
        if from == to {
            return Ok(Some(RelationPath::new(from)));
        }
        self.object(to)?;

        let mut queue = VecDeque::from([RelationPath::new(from)]);
        let mut visited = vec![from.to_string()];

        while let Some(path) = queue.pop_front() {
            if path.len() >= max_depth {
                continue;
            }
            let object = self.object(path.end_object())?;
            for relation in object.relations() {
                if visited.iter().any(|v| v == &relation.right_object) {
                    continue;
                }
                let next = path.with_step(relation);
                if relation.right_object == to {
                    return Ok(Some(next));
                }
                visited.push(relation.right_object.clone());
                queue.push_back(next);
            }
        }
        Ok(None)
    }
}

#[derive(Deserialize)]
struct ModelDefinition {
    objects: Vec<MetaObject>,
}

/// In-memory meta-model.
#[derive(Debug, Default, Clone)]
pub struct ModelRegistry {
    objects: IndexMap<String, Arc<MetaObject>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object, replacing one with the same alias.
    pub fn register(&mut self, object: MetaObject) {
        tracing::trace!("Registering meta object {}", object.alias());
        self.objects
            .insert(object.alias().to_string(), Arc::new(object));
    }

    /// Builder-style [`ModelRegistry::register`].
    pub fn with_object(mut self, object: MetaObject) -> Self {
        self.register(object);
        self
    }

    /// Load from a JSON definition `{ "objects": [...] }`.
    pub fn from_json(json: &str) -> ModelResult<Self> {
        let definition: ModelDefinition = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for object in definition.objects {
            registry.register(object);
        }
        registry.validate()?;
        Ok(registry)
    }

    /// Load a JSON definition from a file.
    pub fn load_file(path: impl AsRef<Path>) -> ModelResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ModelError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loading meta model from {}", path.display());
        Self::from_json(&json)
    }

    /// Check that every relation points to a known object and known keys.
    pub fn validate(&self) -> ModelResult<()> {
        for object in self.objects.values() {
            for relation in object.relations() {
                let right = self.object(&relation.right_object)?;
                if object.attribute(&relation.left_key).is_none() {
                    return Err(ModelError::AttributeNotFound {
                        object: object.alias().to_string(),
                        alias: relation.left_key.clone(),
                    });
                }
                if right.attribute(&relation.right_key).is_none() {
                    return Err(ModelError::AttributeNotFound {
                        object: right.alias().to_string(),
                        alias: relation.right_key.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl MetaModel for ModelRegistry {
    fn object(&self, alias: &str) -> ModelResult<Arc<MetaObject>> {
        self.objects
            .get(alias)
            .cloned()
            .ok_or_else(|| ModelError::ObjectNotFound {
                alias: alias.to_string(),
            })
    }
}

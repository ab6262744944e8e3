//! Entity type to class lookups shared by the generators.

use std::collections::BTreeMap;

use crate::config::ScaffoldConfig;
use crate::php::ClassName;
use crate::resolver::ModelIndex;

/// Resolves the PHP classes of entity types and bundles.
#[derive(Debug, Clone)]
pub struct TypeLookup {
    entity_classes: BTreeMap<String, String>,
    fallback: ClassName,
    models: ModelIndex,
}

impl TypeLookup {
    pub fn new(config: &ScaffoldConfig, models: ModelIndex) -> Self {
        Self {
            entity_classes: config.entity_class_map(),
            fallback: ClassName::new(&config.fallback_entity_class),
            models,
        }
    }

    pub fn models(&self) -> &ModelIndex {
        &self.models
    }

    pub fn models_mut(&mut self) -> &mut ModelIndex {
        &mut self.models
    }

    /// The entity class of an entity type, e.g. `Node` for `node`.
    pub fn entity_class(&self, entity_type: &str) -> ClassName {
        self.entity_classes
            .get(entity_type)
            .map(ClassName::new)
            .unwrap_or_else(|| self.fallback.clone())
    }

    /// The class a reference field points to: the target bundle's model class
    /// when exactly one bundle is allowed and it has a model, else the entity class.
    pub fn reference_class(&self, target_type: &str, target_bundles: &[String]) -> ClassName {
        if let [bundle] = target_bundles {
            if let Some(model) = self.models.get(target_type, bundle) {
                return model.clone();
            }
        }
        self.entity_class(target_type)
    }
}

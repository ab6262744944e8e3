//! Class-path conventions for generated classes.
//!
//! ```text
//! model:      Drupal\<module>\Entity\<EntityType>\<Bundle>
//!             <module_dir>/src/Entity/<EntityType>/<Bundle>.php
//! controller: Drupal\<module>\Controller\<EntityType>\<Bundle>Controller
//!             <module_dir>/src/Controller/<EntityType>/<Bundle>Controller.php
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::field::BundleFields;
use crate::naming::{to_pascal_case, to_snake_case};
use crate::php::ClassName;

/// Where a generated class lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLocation {
    pub class: ClassName,
    pub path: PathBuf,
}

impl ClassLocation {
    pub fn namespace(&self) -> &str {
        self.class.namespace()
    }

    pub fn short_name(&self) -> &str {
        self.class.short_name()
    }
}

/// Maps (entity type, bundle) to class names and paths inside one module.
#[derive(Debug, Clone)]
pub struct ClassPathResolver {
    module: String,
    module_dir: PathBuf,
}

impl ClassPathResolver {
    pub fn new(module: impl Into<String>, module_dir: impl Into<PathBuf>) -> Self {
        Self {
            module: module.into(),
            module_dir: module_dir.into(),
        }
    }

    pub fn module_dir(&self) -> &Path {
        &self.module_dir
    }

    /// Directory holding the model classes.
    pub fn entity_dir(&self) -> PathBuf {
        self.module_dir.join("src").join("Entity")
    }

    pub fn model_location(&self, entity_type: &str, bundle: &str) -> ClassLocation {
        self.locate("Entity", entity_type, &to_pascal_case(bundle))
    }

    pub fn controller_location(&self, entity_type: &str, bundle: &str) -> ClassLocation {
        self.locate(
            "Controller",
            entity_type,
            &format!("{}Controller", to_pascal_case(bundle)),
        )
    }

    /// Path relative to the module root, for display.
    pub fn display_path(&self, path: &Path) -> String {
        pathdiff::diff_paths(path, &self.module_dir)
            .unwrap_or_else(|| path.to_path_buf())
            .display()
            .to_string()
    }

    fn locate(&self, kind: &str, entity_type: &str, class_name: &str) -> ClassLocation {
        let entity_segment = to_pascal_case(entity_type);
        let class = ClassName::new(format!(
            "Drupal\\{}\\{}\\{}\\{}",
            self.module, kind, entity_segment, class_name
        ));
        let path = self
            .module_dir
            .join("src")
            .join(kind)
            .join(&entity_segment)
            .join(format!("{}.php", class_name));
        ClassLocation { class, path }
    }
}

/// Known model classes, keyed by (entity type, bundle).
#[derive(Debug, Clone, Default)]
pub struct ModelIndex {
    models: BTreeMap<(String, String), ClassName>,
}

impl ModelIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity_type: &str, bundle: &str, class: ClassName) {
        self.models
            .insert((entity_type.to_string(), bundle.to_string()), class);
    }

    pub fn get(&self, entity_type: &str, bundle: &str) -> Option<&ClassName> {
        self.models
            .get(&(entity_type.to_string(), bundle.to_string()))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Registers the model classes already present under `src/Entity/<Type>/<Bundle>.php`.
    ///
    /// Directory and file names are mapped back to machine names with
    /// snake_case, so `TaxonomyTerm/Tags.php` registers `taxonomy_term.tags`.
    pub fn scan(&mut self, resolver: &ClassPathResolver) -> usize {
        let root = resolver.entity_dir();
        let mut found = 0;

        for entry in WalkDir::new(&root)
            .min_depth(2)
            .max_depth(2)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || path.extension().map_or(true, |ext| ext != "php") {
                continue;
            }

            let (Some(dir), Some(stem)) = (
                path.parent().and_then(|p| p.file_name()),
                path.file_stem(),
            ) else {
                continue;
            };

            let entity_type = to_snake_case(&dir.to_string_lossy());
            let bundle = to_snake_case(&stem.to_string_lossy());
            let location = resolver.model_location(&entity_type, &bundle);
            tracing::debug!(entity_type = %entity_type, bundle = %bundle, class = location.class.as_str(), "found model class");
            self.insert(&entity_type, &bundle, location.class);
            found += 1;
        }

        found
    }

    /// Registers bundles whose model classes are about to be generated.
    pub fn register_bundles<'b>(
        &mut self,
        bundles: impl IntoIterator<Item = &'b BundleFields>,
        resolver: &ClassPathResolver,
    ) {
        for bundle in bundles {
            let location = resolver.model_location(&bundle.entity_type, &bundle.bundle);
            self.insert(&bundle.entity_type, &bundle.bundle, location.class);
        }
    }
}

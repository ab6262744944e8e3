//! # bundlegen
//!
//! Generates typed PHP classes for Drupal bundles: a model class per bundle
//! with one getter per field, and a controller class with a `show` action.
//! Generated methods are merged into existing class files without touching
//! hand-written code, and running the generator twice changes nothing.
//!
//! ## Architecture
//!
//! ```text
//! Field manifest (JSON)
//!        │
//!        ▼
//! ┌──────────────┐
//! │  Generators  │  Field type → getter body + return type
//! │ (field → AST)│
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │    Reader    │  Existing class file → layout + method fingerprints
//! │ (tree-sitter)│
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │    Merge     │  Skip equivalent methods, rename on collision
//! │  (skeleton)  │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │    Write     │  Render the whole file once, run the formatter
//! │  (PHP file)  │
//! └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bundlegen::{FieldManifest, ScaffoldConfig, Scaffolder};
//!
//! let manifest = FieldManifest::load("fields.json".as_ref())?;
//! let mut scaffolder = Scaffolder::new(ScaffoldConfig::default());
//! scaffolder.index_models();
//!
//! let bundles: Vec<_> = manifest.bundles.iter().collect();
//! for outcome in scaffolder.generate_models(&bundles, &[], false)? {
//!     println!("{:?}", outcome.plan.outcome);
//! }
//! ```

pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod field;
pub mod formatter;
pub mod generator;
pub mod naming;
pub mod php;
pub mod resolver;

use std::path::Path;

pub use codegen::{MergeReport, MethodCandidate};
pub use config::{Capabilities, PhpVersion, ScaffoldConfig};
pub use diagnostic::ScaffoldError;
pub use field::{BundleFields, Cardinality, FieldDescriptor, FieldManifest};
pub use formatter::{FormatStatus, SourceFormatter};
pub use generator::{FieldMethodGenerator, GeneratorContext, GeneratorRegistry, TypeLookup};
pub use resolver::{ClassLocation, ClassPathResolver, ModelIndex};

use codegen::{controller, merge_methods, model, ClassSkeleton};
use php::{ClassName, PhpParser};

/// What generating a class does, or would do, to its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The file did not exist.
    Created,
    /// Methods were added to an existing file.
    Updated,
    /// Every generated method was already present; the file is untouched.
    Unchanged,
    /// The existing file could not be read as a class; nothing was done.
    NothingToDo { reason: String },
}

impl Outcome {
    /// True when the file is (re)written.
    pub fn writes(&self) -> bool {
        matches!(self, Outcome::Created | Outcome::Updated)
    }
}

/// The result of merging generated methods into a class, before any write.
#[derive(Debug, Clone)]
pub struct ClassPlan {
    pub location: ClassLocation,
    pub outcome: Outcome,
    pub report: MergeReport,
    /// Full rendered file, when it is to be written.
    pub source: Option<String>,
}

/// A plan after it has been carried out.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub plan: ClassPlan,
    /// False for dry runs and for plans that write nothing.
    pub written: bool,
    pub format: FormatStatus,
}

/// Drives class generation for one module.
pub struct Scaffolder {
    config: ScaffoldConfig,
    resolver: ClassPathResolver,
    registry: GeneratorRegistry,
    types: TypeLookup,
    formatter: SourceFormatter,
}

impl Scaffolder {
    /// Creates a scaffolder with the built-in generators.
    pub fn new(config: ScaffoldConfig) -> Self {
        let resolver = ClassPathResolver::new(config.module.clone(), config.module_dir.clone());
        let types = TypeLookup::new(&config, ModelIndex::new());
        let formatter = SourceFormatter::new(config.formatter.clone());

        Self {
            config,
            resolver,
            registry: GeneratorRegistry::with_defaults(),
            types,
            formatter,
        }
    }

    /// Replaces the generator registry.
    pub fn with_registry(mut self, registry: GeneratorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &ScaffoldConfig {
        &self.config
    }

    pub fn resolver(&self) -> &ClassPathResolver {
        &self.resolver
    }

    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    pub fn models(&self) -> &ModelIndex {
        self.types.models()
    }

    /// Registers the model classes already on disk. Returns the number of
    /// known models.
    pub fn index_models(&mut self) -> usize {
        let models = self.types.models_mut();
        let found = models.scan(&self.resolver);
        tracing::debug!(on_disk = found, total = models.len(), "indexed model classes");
        models.len()
    }

    fn context<'a>(&self, types: &'a TypeLookup) -> GeneratorContext<'a> {
        GeneratorContext {
            capabilities: self.config.php_version.capabilities(),
            types,
        }
    }

    /// Type lookup for one run: models on disk plus the models being generated.
    fn run_lookup(&self, bundles: &[&BundleFields]) -> TypeLookup {
        let mut types = self.types.clone();
        types
            .models_mut()
            .register_bundles(bundles.iter().copied(), &self.resolver);
        types
    }

    /// Plans the model classes of `bundles`, restricted to the fields in
    /// `only` when it is not empty. Fails on the first bundle that cannot be
    /// generated, before any file is written.
    pub fn plan_models(&self, bundles: &[&BundleFields], only: &[String]) -> Result<Vec<ClassPlan>, ScaffoldError> {
        let types = self.run_lookup(bundles);
        let ctx = self.context(&types);
        bundles
            .iter()
            .map(|bundle| self.plan_bundle(bundle, only, &ctx))
            .collect()
    }

    /// Plans the model class of a single bundle.
    pub fn plan_model(&self, bundle: &BundleFields, only: &[String]) -> Result<ClassPlan, ScaffoldError> {
        let types = self.run_lookup(&[bundle]);
        self.plan_bundle(bundle, only, &self.context(&types))
    }

    /// Plans every bundle, then writes the plans.
    pub fn generate_models(
        &self,
        bundles: &[&BundleFields],
        only: &[String],
        dry_run: bool,
    ) -> Result<Vec<GenerationOutcome>, ScaffoldError> {
        let plans = self.plan_models(bundles, only)?;
        plans
            .into_iter()
            .map(|plan| self.apply(plan, dry_run))
            .collect()
    }

    pub fn generate_model(
        &self,
        bundle: &BundleFields,
        only: &[String],
        dry_run: bool,
    ) -> Result<GenerationOutcome, ScaffoldError> {
        let plan = self.plan_model(bundle, only)?;
        self.apply(plan, dry_run)
    }

    fn plan_bundle(
        &self,
        bundle: &BundleFields,
        only: &[String],
        ctx: &GeneratorContext<'_>,
    ) -> Result<ClassPlan, ScaffoldError> {
        let location = self.resolver.model_location(&bundle.entity_type, &bundle.bundle);

        // All getters are generated before the target file is touched.
        let candidates = model::model_candidates(&self.registry, bundle, only, ctx)?;

        self.plan_class(location, &candidates, |location| {
            model::model_skeleton(location, ctx, &bundle.entity_type)
        })
    }

    /// Plans the controller class of a bundle.
    pub fn plan_controller(&self, entity_type: &str, bundle: &str) -> Result<ClassPlan, ScaffoldError> {
        let location = self.resolver.controller_location(entity_type, bundle);
        let model = self.resolver.model_location(entity_type, bundle).class;
        let base = ClassName::new(&self.config.controller_base_class);

        let candidates = vec![controller::show_action(entity_type, bundle, &model)];
        self.plan_class(location, &candidates, |location| {
            controller::controller_skeleton(location, &base)
        })
    }

    pub fn generate_controller(
        &self,
        entity_type: &str,
        bundle: &str,
        dry_run: bool,
    ) -> Result<GenerationOutcome, ScaffoldError> {
        let plan = self.plan_controller(entity_type, bundle)?;
        self.apply(plan, dry_run)
    }

    /// Reads the target once and merges `candidates` into it, or into a new
    /// class when the file does not exist.
    fn plan_class(
        &self,
        location: ClassLocation,
        candidates: &[MethodCandidate],
        new_class: impl FnOnce(&ClassLocation) -> ClassSkeleton,
    ) -> Result<ClassPlan, ScaffoldError> {
        let mut parser = PhpParser::new()?;

        let existing = if location.path.exists() {
            let source = std::fs::read_to_string(&location.path)
                .map_err(|e| ScaffoldError::io(&location.path, e.to_string()))?;
            match parser.read_class(&source) {
                Some(class) => Some(ClassSkeleton::from_existing(class)),
                None => {
                    tracing::warn!(
                        file = %self.resolver.display_path(&location.path),
                        "existing file is not a plain parsable class, leaving it alone"
                    );
                    return Ok(ClassPlan {
                        location,
                        outcome: Outcome::NothingToDo {
                            reason: "the existing file could not be read as a single PHP class (parse errors, no class, or inline HTML)".to_string(),
                        },
                        report: MergeReport::default(),
                        source: None,
                    });
                }
            }
        } else {
            None
        };

        let is_new = existing.is_none();
        let skeleton = existing.unwrap_or_else(|| new_class(&location));
        let (merged, report) = merge_methods(&skeleton, candidates, &mut parser)?;

        let outcome = if is_new {
            Outcome::Created
        } else if report.is_unchanged() {
            Outcome::Unchanged
        } else {
            Outcome::Updated
        };
        let source = outcome.writes().then(|| merged.render());

        Ok(ClassPlan {
            location,
            outcome,
            report,
            source,
        })
    }

    /// Writes a plan's file and runs the formatter on it.
    fn apply(&self, plan: ClassPlan, dry_run: bool) -> Result<GenerationOutcome, ScaffoldError> {
        let shown = self.resolver.display_path(&plan.location.path);

        if dry_run || !plan.outcome.writes() {
            if plan.outcome == Outcome::Unchanged {
                tracing::info!(file = %shown, "class is up to date");
            }
            return Ok(GenerationOutcome {
                plan,
                written: false,
                format: FormatStatus::Skipped,
            });
        }

        if let Some(source) = &plan.source {
            write_file(&plan.location.path, source)?;
        }
        tracing::info!(
            file = %shown,
            added = plan.report.added.len(),
            skipped = plan.report.skipped.len(),
            "wrote class"
        );

        let format = self.formatter.run(&plan.location.path);
        Ok(GenerationOutcome {
            plan,
            written: true,
            format,
        })
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), ScaffoldError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ScaffoldError::write(parent, e.to_string()))?;
    }
    std::fs::write(path, content).map_err(|e| ScaffoldError::write(path, e.to_string()))
}

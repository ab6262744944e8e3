//! bundlegen command-line interface.
//!
//! Generates model and controller classes for the bundles of a Drupal module.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bundlegen::{
    BundleFields, FieldManifest, GenerationOutcome, Outcome, PhpVersion, ScaffoldConfig, Scaffolder,
};

mod ui;

#[derive(Parser)]
#[command(name = "bundlegen")]
#[command(version, about = "Generate typed Drupal model and controller classes from field metadata")]
struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Machine name of the module receiving the classes
    #[arg(long, global = true)]
    module: Option<String>,

    /// Root directory of that module
    #[arg(long, global = true)]
    module_dir: Option<PathBuf>,

    /// Target PHP version, e.g. 7.4
    #[arg(long, global = true)]
    php: Option<String>,

    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate or update model classes with field getters
    Model {
        /// Field manifest (JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Entity type of a single bundle to generate
        #[arg(long, requires = "bundle")]
        entity_type: Option<String>,

        /// Bundle to generate
        #[arg(long, requires = "entity_type")]
        bundle: Option<String>,

        /// Only generate getters for these fields
        #[arg(long = "field", requires = "bundle")]
        fields: Vec<String>,

        /// Print the resulting files instead of writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate or update the controller class of a bundle
    Controller {
        /// Entity type, e.g. node
        #[arg(long)]
        entity_type: String,

        /// Bundle, e.g. article
        #[arg(long)]
        bundle: String,

        /// Print the resulting file instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// List the field types getters can be generated for
    FieldTypes,
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Model {
            manifest,
            entity_type,
            bundle,
            fields,
            dry_run,
        } => {
            let selection = entity_type.zip(bundle);
            generate_models(config, &manifest, selection, &fields, dry_run)?;
        }

        Commands::Controller {
            entity_type,
            bundle,
            dry_run,
        } => {
            generate_controller(config, &entity_type, &bundle, dry_run)?;
        }

        Commands::FieldTypes => {
            list_field_types(config);
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries the report and dry-run output.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "warn,bundlegen=info",
        _ => "info,bundlegen=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Config file (or defaults) with command-line overrides applied.
fn load_config(cli: &Cli) -> miette::Result<ScaffoldConfig> {
    let mut config = match &cli.config {
        Some(path) => ScaffoldConfig::load(path)?,
        None => ScaffoldConfig::default(),
    };

    if let Some(module) = &cli.module {
        config.module = module.clone();
    }
    if let Some(module_dir) = &cli.module_dir {
        config.module_dir = module_dir.clone();
    }
    if let Some(php) = &cli.php {
        config.php_version = PhpVersion::parse(php)?;
    }

    tracing::debug!(
        module = %config.module,
        module_dir = %config.module_dir.display(),
        php = %config.php_version,
        "configuration loaded"
    );
    Ok(config)
}

fn generate_models(
    config: ScaffoldConfig,
    manifest_path: &Path,
    selection: Option<(String, String)>,
    fields: &[String],
    dry_run: bool,
) -> miette::Result<()> {
    let start = Instant::now();
    let manifest = FieldManifest::load(manifest_path)?;

    let bundles: Vec<&BundleFields> = match &selection {
        Some((entity_type, bundle)) => vec![manifest.find(entity_type, bundle)?],
        None => manifest.bundles.iter().collect(),
    };

    let spinner = ui::spinner("Indexing model classes...");
    let mut scaffolder = Scaffolder::new(config);
    scaffolder.index_models();

    spinner.set_message(format!("Generating {}...", ui::count(bundles.len(), "bundle")));
    let result = scaffolder.generate_models(&bundles, fields, dry_run);
    spinner.finish_and_clear();
    let outcomes = result?;

    report(&scaffolder, &outcomes, dry_run);
    ui::timing("Done", start.elapsed().as_millis());
    Ok(())
}

fn generate_controller(
    config: ScaffoldConfig,
    entity_type: &str,
    bundle: &str,
    dry_run: bool,
) -> miette::Result<()> {
    let start = Instant::now();
    let scaffolder = Scaffolder::new(config);
    let outcome = scaffolder.generate_controller(entity_type, bundle, dry_run)?;

    report(&scaffolder, std::slice::from_ref(&outcome), dry_run);
    ui::timing("Done", start.elapsed().as_millis());
    Ok(())
}

fn list_field_types(config: ScaffoldConfig) {
    let scaffolder = Scaffolder::new(config);
    let field_types = scaffolder.registry().field_types();

    ui::box_header("FIELD TYPES");
    ui::box_line("");
    for field_type in &field_types {
        ui::box_line(&format!("{} {}", ui::symbols::TRIANGLE, field_type));
    }
    ui::box_line("");
    ui::box_footer();
    ui::dim(&ui::count(field_types.len(), "field type"));
}

fn report(scaffolder: &Scaffolder, outcomes: &[GenerationOutcome], dry_run: bool) {
    let mut written = 0;
    let mut unchanged = 0;
    let mut left_alone = 0;

    for outcome in outcomes {
        let plan = &outcome.plan;
        let path = scaffolder.resolver().display_path(&plan.location.path);
        let methods = ui::count(plan.report.added.len(), "method");

        match &plan.outcome {
            Outcome::Created if dry_run => ui::info(&format!("Would create {} ({})", path, methods)),
            Outcome::Updated if dry_run => ui::info(&format!("Would update {} (+{})", path, methods)),
            Outcome::Created => ui::success(&format!("Created {} ({})", path, methods)),
            Outcome::Updated => ui::success(&format!("Updated {} (+{})", path, methods)),
            Outcome::Unchanged => ui::dim(&format!("{} is up to date", path)),
            Outcome::NothingToDo { reason } => ui::error(&format!("Left {} alone: {}", path, reason)),
        }

        for name in &plan.report.added {
            ui::detail("+", name);
        }
        for skipped in &plan.report.skipped {
            if skipped.candidate != skipped.existing {
                let line = skipped
                    .location
                    .map(|span| format!(" (line {})", span.start_line + 1))
                    .unwrap_or_default();
                ui::detail(
                    ui::symbols::TARGET_EMPTY,
                    &format!("{} already exists as {}{}", skipped.candidate, skipped.existing, line),
                );
            }
        }
        for renamed in &plan.report.renamed {
            ui::detail(
                ui::symbols::ARROW,
                &format!("{} renamed to {} (name taken)", renamed.from, renamed.to),
            );
        }
        if outcome.format.is_failure() {
            ui::error(&format!("Formatter failed on {}: {:?}", path, outcome.format));
        }

        if dry_run {
            if let Some(source) = &plan.source {
                println!();
                print!("{}", source);
                println!();
            }
        }

        match &plan.outcome {
            Outcome::Created | Outcome::Updated => written += 1,
            Outcome::Unchanged => unchanged += 1,
            Outcome::NothingToDo { .. } => left_alone += 1,
        }
    }

    println!();
    ui::summary(written, unchanged, left_alone);
}

//! Scaffolding error types.
#![allow(unused_assignments)]

use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while generating classes.
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum ScaffoldError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("Failed to read file '{path}': {message}")]
    #[diagnostic(code(bundlegen::io::read_error))]
    IoError {
        path: PathBuf,
        message: String,
    },

    #[error("Failed to write file '{path}': {message}")]
    #[diagnostic(code(bundlegen::io::write_error))]
    WriteError {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Config Errors
    // =========================================================================
    #[error("Invalid configuration in '{path}': {message}")]
    #[diagnostic(code(bundlegen::config::invalid))]
    InvalidConfig {
        path: PathBuf,
        message: String,
    },

    #[error("Invalid field manifest '{path}': {message}")]
    #[diagnostic(
        code(bundlegen::config::invalid_manifest),
        help("A manifest is {{ \"bundles\": [{{ \"entity_type\", \"bundle\", \"fields\": [...] }}] }}; cardinality -1 means unlimited")
    )]
    InvalidManifest {
        path: PathBuf,
        message: String,
    },

    #[error("Invalid PHP version '{value}'")]
    #[diagnostic(
        code(bundlegen::config::invalid_php_version),
        help("Use <major>.<minor>, for example 7.4 or 8.1")
    )]
    InvalidPhpVersion {
        value: String,
    },

    #[error("Bundle '{entity_type}.{bundle}' is not in the field manifest")]
    #[diagnostic(code(bundlegen::config::unknown_bundle))]
    UnknownBundle {
        entity_type: String,
        bundle: String,
    },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("Failed to initialize parser")]
    #[diagnostic(code(bundlegen::parse::init_failed))]
    ParserInitFailed,

    #[error("Generated method '{method}' could not be re-parsed")]
    #[diagnostic(
        code(bundlegen::parse::unparsable_candidate),
        help("This is a printer bug: the generated PHP is not syntactically valid")
    )]
    UnparsableCandidate {
        method: String,
    },

    // =========================================================================
    // Generation Errors
    // =========================================================================
    #[error("No generator for field type '{field_type}' (field '{field}')")]
    #[diagnostic(
        code(bundlegen::generator::no_generator),
        help("Register a FieldMethodGenerator for this field type; run `bundlegen field-types` to list the registered ones")
    )]
    NoGenerator {
        field_type: String,
        field: String,
    },

    #[error("Field '{field}' of type '{field_type}' has no target entity type")]
    #[diagnostic(code(bundlegen::generator::missing_target_type))]
    MissingTargetType {
        field: String,
        field_type: String,
    },

    #[error("Bundle '{entity_type}.{bundle}' has no field '{field}'")]
    #[diagnostic(code(bundlegen::generator::unknown_field))]
    UnknownField {
        entity_type: String,
        bundle: String,
        field: String,
    },
}

impl ScaffoldError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a write error.
    pub fn write(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::WriteError {
            path: path.into(),
            message: message.into(),
        }
    }
}

//! Scaffolder configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::diagnostic::ScaffoldError;

/// Configuration for the bundlegen scaffolder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// Machine name of the Drupal module receiving generated classes.
    pub module: String,

    /// Filesystem root of that module.
    pub module_dir: PathBuf,

    /// Target PHP language level.
    pub php_version: PhpVersion,

    /// Entity type id to entity class overrides, merged over the built-in map.
    pub entity_classes: BTreeMap<String, String>,

    /// Entity class used for entity types without a mapping.
    pub fallback_entity_class: String,

    /// Base class of generated controllers.
    pub controller_base_class: String,

    /// Code-style fixer run on every written file.
    pub formatter: Option<FormatterCommand>,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            module: "custom".to_string(),
            module_dir: PathBuf::from("."),
            php_version: PhpVersion::new(8, 1),
            entity_classes: BTreeMap::new(),
            fallback_entity_class: "Drupal\\Core\\Entity\\ContentEntityBase".to_string(),
            controller_base_class: "Drupal\\wmcontroller\\Controller\\ControllerBase".to_string(),
            formatter: None,
        }
    }
}

impl ScaffoldConfig {
    /// Loads a configuration file. Keys left out keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ScaffoldError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ScaffoldError::io(path, e.to_string()))?;

        serde_json::from_str(&content).map_err(|e| ScaffoldError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Entity classes for every known entity type, with overrides applied.
    pub fn entity_class_map(&self) -> BTreeMap<String, String> {
        let mut map: BTreeMap<String, String> = DEFAULT_ENTITY_CLASSES
            .iter()
            .map(|(entity_type, class)| (entity_type.to_string(), class.to_string()))
            .collect();
        map.extend(self.entity_classes.clone());
        map
    }
}

/// Core and contrib entity classes known out of the box.
pub const DEFAULT_ENTITY_CLASSES: &[(&str, &str)] = &[
    ("block_content", "Drupal\\block_content\\Entity\\BlockContent"),
    ("comment", "Drupal\\comment\\Entity\\Comment"),
    ("file", "Drupal\\file\\Entity\\File"),
    ("media", "Drupal\\media\\Entity\\Media"),
    ("menu_link_content", "Drupal\\menu_link_content\\Entity\\MenuLinkContent"),
    ("node", "Drupal\\node\\Entity\\Node"),
    ("paragraph", "Drupal\\paragraphs\\Entity\\Paragraph"),
    ("taxonomy_term", "Drupal\\taxonomy\\Entity\\Term"),
    ("user", "Drupal\\user\\Entity\\User"),
];

/// External code-style fixer, e.g. `phpcbf --standard=Drupal {file}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormatterCommand {
    pub program: String,
    /// Arguments; `{file}` is replaced with the written path. When no argument
    /// mentions `{file}` the path is appended.
    #[serde(default)]
    pub args: Vec<String>,
}

/// A `<major>.<minor>` PHP language level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhpVersion {
    pub major: u32,
    pub minor: u32,
}

impl PhpVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parses `"7.4"`. Patch levels are not accepted.
    pub fn parse(value: &str) -> Result<Self, ScaffoldError> {
        let invalid = || ScaffoldError::InvalidPhpVersion {
            value: value.to_string(),
        };

        let (major, minor) = value.trim().split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }

    /// Language features available at this level.
    pub fn capabilities(self) -> Capabilities {
        Capabilities {
            return_types: self >= Self::new(7, 0),
            nullable_types: self >= Self::new(7, 1),
            arrow_functions: self >= Self::new(7, 4),
            optional_chaining: self >= Self::new(8, 0),
        }
    }
}

impl fmt::Display for PhpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Serialize for PhpVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PhpVersion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        PhpVersion::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// Feature flags handed to every generator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities {
    /// Native return type declarations (7.0).
    pub return_types: bool,
    /// `?T` declarations (7.1).
    pub nullable_types: bool,
    /// `fn ($x) => ...` (7.4).
    pub arrow_functions: bool,
    /// `?->` (8.0).
    pub optional_chaining: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_versions() {
        assert_eq!(PhpVersion::parse("7.4").unwrap(), PhpVersion::new(7, 4));
        assert_eq!(PhpVersion::parse(" 8.10 ").unwrap(), PhpVersion::new(8, 10));
        assert!(PhpVersion::parse("8").is_err());
        assert!(PhpVersion::parse("8.1.2").is_err());
        assert!(PhpVersion::parse("eight.one").is_err());
    }

    #[test]
    fn test_capabilities_follow_language_level() {
        let caps = PhpVersion::new(7, 0).capabilities();
        assert!(caps.return_types);
        assert!(!caps.nullable_types);

        let caps = PhpVersion::new(7, 1).capabilities();
        assert!(caps.nullable_types);
        assert!(!caps.arrow_functions);

        let caps = PhpVersion::new(7, 4).capabilities();
        assert!(caps.arrow_functions);
        assert!(!caps.optional_chaining);

        let caps = PhpVersion::new(8, 0).capabilities();
        assert!(caps.optional_chaining);

        assert!(!PhpVersion::new(5, 6).capabilities().return_types);
    }

    #[test]
    fn test_entity_class_overrides_win() {
        let mut config = ScaffoldConfig::default();
        assert_eq!(
            config.entity_class_map().get("node").map(String::as_str),
            Some("Drupal\\node\\Entity\\Node")
        );
        assert!(config.entity_class_map().get("thing").is_none());

        config
            .entity_classes
            .insert("node".to_string(), "Drupal\\my_module\\Entity\\Node".to_string());
        assert_eq!(config.entity_class_map().len(), DEFAULT_ENTITY_CLASSES.len());
        assert_eq!(
            config.entity_class_map().get("node").map(String::as_str),
            Some("Drupal\\my_module\\Entity\\Node")
        );
    }

    #[test]
    fn test_loads_partial_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bundlegen.json");
        std::fs::write(&path, r#"{ "module": "my_module", "php_version": "7.1" }"#).unwrap();

        let config = ScaffoldConfig::load(&path).unwrap();
        assert_eq!(config.module, "my_module");
        assert_eq!(config.php_version, PhpVersion::new(7, 1));
        assert!(config.formatter.is_none());

        std::fs::write(&path, r#"{ "php_version": "seven" }"#).unwrap();
        assert!(matches!(
            ScaffoldConfig::load(&path),
            Err(ScaffoldError::InvalidConfig { .. })
        ));
    }
}

//! Field metadata: descriptors and the JSON manifest they are read from.
//!
//! The manifest stands in for Drupal's field storage/config entities. It is
//! read once per invocation and never written.

use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::diagnostic::ScaffoldError;

/// Drupal's sentinel for "unlimited" cardinality.
pub const CARDINALITY_UNLIMITED: i64 = -1;

/// Maximum number of values a field may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Cardinality {
    Limited(u32),
    Unlimited,
}

impl Cardinality {
    /// True for exactly one value.
    pub fn is_single(self) -> bool {
        self == Cardinality::Limited(1)
    }
}

impl Default for Cardinality {
    fn default() -> Self {
        Cardinality::Limited(1)
    }
}

impl TryFrom<i64> for Cardinality {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            CARDINALITY_UNLIMITED => Ok(Cardinality::Unlimited),
            n if n >= 1 && n <= u32::MAX as i64 => Ok(Cardinality::Limited(n as u32)),
            n => Err(format!(
                "cardinality must be a positive integer or {} (unlimited), got {}",
                CARDINALITY_UNLIMITED, n
            )),
        }
    }
}

impl From<Cardinality> for i64 {
    fn from(cardinality: Cardinality) -> Self {
        match cardinality {
            Cardinality::Limited(n) => n as i64,
            Cardinality::Unlimited => CARDINALITY_UNLIMITED,
        }
    }
}

/// One configurable field on an entity bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Machine name, e.g. `field_subtitle`.
    pub name: String,

    /// Field type id, e.g. `string` or `entity_reference`.
    #[serde(rename = "type")]
    pub field_type: String,

    #[serde(default)]
    pub cardinality: Cardinality,

    #[serde(default)]
    pub required: bool,

    /// Target entity type of reference fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,

    /// Allowed target bundles of reference fields; empty means any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_bundles: Vec<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            cardinality: Cardinality::default(),
            required: false,
            target_type: None,
            target_bundles: Vec::new(),
        }
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn targeting(mut self, target_type: impl Into<String>, bundles: &[&str]) -> Self {
        self.target_type = Some(target_type.into());
        self.target_bundles = bundles.iter().map(|b| b.to_string()).collect();
        self
    }
}

/// Fields of one bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleFields {
    pub entity_type: String,
    pub bundle: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

/// All bundles known to one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldManifest {
    pub bundles: Vec<BundleFields>,
}

impl FieldManifest {
    /// Loads a manifest from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ScaffoldError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ScaffoldError::io(path, e.to_string()))?;
        Self::from_json(&content).map_err(|message| ScaffoldError::InvalidManifest {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    /// Looks up one bundle.
    pub fn find(&self, entity_type: &str, bundle: &str) -> Result<&BundleFields, ScaffoldError> {
        self.bundles
            .iter()
            .find(|b| b.entity_type == entity_type && b.bundle == bundle)
            .ok_or_else(|| ScaffoldError::UnknownBundle {
                entity_type: entity_type.to_string(),
                bundle: bundle.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_manifest() {
        let manifest = FieldManifest::from_json(
            r#"{
                "bundles": [{
                    "entity_type": "node",
                    "bundle": "article",
                    "fields": [
                        { "name": "field_subtitle", "type": "string" },
                        {
                            "name": "field_tags",
                            "type": "entity_reference",
                            "cardinality": -1,
                            "required": true,
                            "target_type": "taxonomy_term",
                            "target_bundles": ["tags"]
                        }
                    ]
                }]
            }"#,
        )
        .unwrap();

        let article = manifest.find("node", "article").unwrap();
        assert_eq!(article.fields.len(), 2);
        assert_eq!(article.fields[0].cardinality, Cardinality::Limited(1));
        assert!(!article.fields[0].required);
        assert_eq!(article.fields[1].cardinality, Cardinality::Unlimited);
        assert_eq!(article.fields[1].target_type.as_deref(), Some("taxonomy_term"));
        assert_eq!(article.fields[1].target_bundles, vec!["tags".to_string()]);

        assert!(matches!(
            manifest.find("node", "page"),
            Err(ScaffoldError::UnknownBundle { .. })
        ));
    }

    #[test]
    fn test_rejects_invalid_cardinality() {
        let err = FieldManifest::from_json(
            r#"{ "bundles": [{ "entity_type": "node", "bundle": "page",
                 "fields": [{ "name": "f", "type": "string", "cardinality": 0 }] }] }"#,
        )
        .unwrap_err();
        assert!(err.contains("cardinality"));

        assert!(Cardinality::try_from(-2).is_err());
        assert_eq!(Cardinality::try_from(3), Ok(Cardinality::Limited(3)));
    }

    #[test]
    fn test_cardinality_serializes_with_sentinel() {
        assert_eq!(serde_json::to_string(&Cardinality::Unlimited).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&Cardinality::Limited(2)).unwrap(), "2");
        assert!(Cardinality::Limited(1).is_single());
        assert!(!Cardinality::Limited(2).is_single());
        assert!(!Cardinality::Unlimited.is_single());
    }
}

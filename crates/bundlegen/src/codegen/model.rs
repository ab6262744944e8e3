//! Model classes: one class per bundle, extending the entity class, with a
//! getter per field.

use crate::codegen::merge::MethodCandidate;
use crate::codegen::skeleton::ClassSkeleton;
use crate::diagnostic::ScaffoldError;
use crate::field::{BundleFields, FieldDescriptor};
use crate::generator::{GeneratorContext, GeneratorRegistry};
use crate::resolver::ClassLocation;

/// A new model class for `entity_type`.
pub fn model_skeleton(location: &ClassLocation, ctx: &GeneratorContext<'_>, entity_type: &str) -> ClassSkeleton {
    let parent = ctx.types.entity_class(entity_type);
    ClassSkeleton::generated(location, Some(&parent))
}

/// Fields of `bundle` to generate getters for; all of them when `only` is empty.
pub fn select_fields<'b>(
    bundle: &'b BundleFields,
    only: &[String],
) -> Result<Vec<&'b FieldDescriptor>, ScaffoldError> {
    if only.is_empty() {
        return Ok(bundle.fields.iter().collect());
    }

    only.iter()
        .map(|name| {
            bundle
                .fields
                .iter()
                .find(|field| &field.name == name)
                .ok_or_else(|| ScaffoldError::UnknownField {
                    entity_type: bundle.entity_type.clone(),
                    bundle: bundle.bundle.clone(),
                    field: name.clone(),
                })
        })
        .collect()
}

/// Getter candidates for the selected fields, in manifest order.
pub fn model_candidates(
    registry: &GeneratorRegistry,
    bundle: &BundleFields,
    only: &[String],
    ctx: &GeneratorContext<'_>,
) -> Result<Vec<MethodCandidate>, ScaffoldError> {
    select_fields(bundle, only)?
        .into_iter()
        .map(|field| registry.generate_getter(field, ctx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::test_support::{context, lookup};

    fn article() -> BundleFields {
        BundleFields {
            entity_type: "node".to_string(),
            bundle: "article".to_string(),
            fields: vec![
                FieldDescriptor::new("field_subtitle", "string"),
                FieldDescriptor::new("field_body", "text_with_summary"),
            ],
        }
    }

    #[test]
    fn test_selects_requested_fields() {
        let bundle = article();
        assert_eq!(select_fields(&bundle, &[]).unwrap().len(), 2);

        let only = vec!["field_body".to_string()];
        let selected = select_fields(&bundle, &only).unwrap();
        assert_eq!(selected[0].name, "field_body");

        let err = select_fields(&bundle, &["field_missing".to_string()]).unwrap_err();
        assert!(matches!(err, ScaffoldError::UnknownField { ref field, .. } if field == "field_missing"));
    }

    #[test]
    fn test_builds_getters_in_manifest_order() {
        let lookup = lookup();
        let ctx = context(&lookup, "8.1");
        let candidates = model_candidates(&GeneratorRegistry::with_defaults(), &article(), &[], &ctx).unwrap();

        let names: Vec<&str> = candidates.iter().map(|c| c.method.name.as_str()).collect();
        assert_eq!(names, vec!["getFieldSubtitle", "getFieldBody"]);
        assert_eq!(candidates[0].origin, "field_subtitle");
    }

    #[test]
    fn test_models_extend_the_entity_class() {
        let lookup = lookup();
        let ctx = context(&lookup, "8.1");
        let location = crate::resolver::ClassPathResolver::new("my_module", "/tmp/my_module")
            .model_location("taxonomy_term", "tags");

        let source = model_skeleton(&location, &ctx, "taxonomy_term").render();
        assert!(source.contains("use Drupal\\taxonomy\\Entity\\Term;\n"));
        assert!(source.contains("class Tags extends Term\n"));
    }
}

//! Getters for entity reference fields.

use super::{FieldMethodGenerator, FieldShape, GeneratorContext};
use crate::diagnostic::ScaffoldError;
use crate::field::FieldDescriptor;
use crate::php::{Expr, PhpType};

/// `entity_reference`, `entity_reference_revisions` and `file`.
///
/// Returns the loaded entity (`->entity`) or all of them
/// (`->referencedEntities()`), typed as the target bundle's model when the
/// field allows exactly one bundle that has a model.
pub struct ReferenceGenerator;

impl FieldMethodGenerator for ReferenceGenerator {
    fn field_types(&self) -> &[&'static str] {
        &["entity_reference", "entity_reference_revisions", "file"]
    }

    fn generate(
        &self,
        field: &FieldDescriptor,
        ctx: &GeneratorContext<'_>,
    ) -> Result<FieldShape, ScaffoldError> {
        let target_type = match (&field.target_type, field.field_type.as_str()) {
            (Some(target), _) => target.as_str(),
            (None, "file") => "file",
            (None, _) => {
                return Err(ScaffoldError::MissingTargetType {
                    field: field.name.clone(),
                    field_type: field.field_type.clone(),
                })
            }
        };

        let class = ctx.types.reference_class(target_type, &field.target_bundles);
        let items = Expr::field_list(&field.name);
        let expr = if field.cardinality.is_single() {
            items.prop("entity")
        } else {
            items.call("referencedEntities", vec![])
        };

        Ok(FieldShape::returning(PhpType::Class(class), expr))
    }
}

//! Getters for fields stored as a single `value` property.

use super::{FieldMethodGenerator, FieldShape, GeneratorContext};
use crate::diagnostic::ScaffoldError;
use crate::field::FieldDescriptor;
use crate::php::ast::CastType;
use crate::php::{Expr, PhpType};

const STRING_TYPES: &[&str] = &[
    "string",
    "string_long",
    "text",
    "text_long",
    "text_with_summary",
    "list_string",
    "email",
    "telephone",
    "uri",
];
const INT_TYPES: &[&str] = &["integer", "list_integer"];
const FLOAT_TYPES: &[&str] = &["float", "list_float", "decimal"];
const BOOL_TYPES: &[&str] = &["boolean"];

const FIELD_TYPES: &[&str] = &[
    "string",
    "string_long",
    "text",
    "text_long",
    "text_with_summary",
    "list_string",
    "email",
    "telephone",
    "uri",
    "integer",
    "list_integer",
    "float",
    "list_float",
    "decimal",
    "boolean",
];

/// How a scalar type is read: value type, single-value cast, list mapper.
struct ScalarKind {
    value_type: PhpType,
    cast: Option<CastType>,
    always_cast: bool,
    mapper: Option<&'static str>,
}

fn scalar_kind(field_type: &str) -> Option<ScalarKind> {
    let kind = if STRING_TYPES.contains(&field_type) {
        ScalarKind {
            value_type: PhpType::String,
            cast: None,
            always_cast: false,
            mapper: None,
        }
    } else if INT_TYPES.contains(&field_type) {
        ScalarKind {
            value_type: PhpType::Int,
            cast: Some(CastType::Int),
            always_cast: false,
            mapper: Some("intval"),
        }
    } else if FLOAT_TYPES.contains(&field_type) {
        ScalarKind {
            value_type: PhpType::Float,
            cast: Some(CastType::Float),
            always_cast: false,
            mapper: Some("floatval"),
        }
    } else if BOOL_TYPES.contains(&field_type) {
        // An empty boolean field reads as false, never null.
        ScalarKind {
            value_type: PhpType::Bool,
            cast: Some(CastType::Bool),
            always_cast: true,
            mapper: Some("boolval"),
        }
    } else {
        return None;
    };
    Some(kind)
}

/// Strings, numbers and booleans.
///
/// Single values read `->value`, casting numbers only when the field is
/// required since an empty optional field must stay `null`. Multiple values
/// collect the `value` column of the item list.
pub struct ScalarGenerator;

impl FieldMethodGenerator for ScalarGenerator {
    fn field_types(&self) -> &[&'static str] {
        FIELD_TYPES
    }

    fn generate(
        &self,
        field: &FieldDescriptor,
        _ctx: &GeneratorContext<'_>,
    ) -> Result<FieldShape, ScaffoldError> {
        let kind = scalar_kind(&field.field_type).ok_or_else(|| ScaffoldError::NoGenerator {
            field_type: field.field_type.clone(),
            field: field.name.clone(),
        })?;
        let items = Expr::field_list(&field.name);

        let expr = if field.cardinality.is_single() {
            let value = items.prop("value");
            match kind.cast {
                Some(cast) if kind.always_cast || field.required => value.cast(cast),
                _ => value,
            }
        } else {
            let values = Expr::func(
                "array_column",
                vec![items.call("getValue", vec![]), Expr::str("value")],
            );
            match kind.mapper {
                Some(mapper) => Expr::func("array_map", vec![Expr::str(mapper), values]),
                None => values,
            }
        };

        Ok(FieldShape::returning(kind.value_type, expr))
    }
}

#[cfg(test)]
mod tests {
    use crate::field::{Cardinality, FieldDescriptor};
    use crate::generator::test_support::getter;

    #[test]
    fn test_optional_integers_are_not_cast() {
        let field = FieldDescriptor::new("field_year", "integer");
        assert!(getter(&field, "8.1").contains("return $this->get('field_year')->value;"));
    }

    #[test]
    fn test_required_numbers_are_cast() {
        let field = FieldDescriptor::new("field_price", "decimal").required(true);
        let code = getter(&field, "8.1");
        assert!(code.contains("public function getFieldPrice(): float\n"));
        assert!(code.contains("return (float) $this->get('field_price')->value;"));
    }

    #[test]
    fn test_booleans_are_always_cast() {
        let field = FieldDescriptor::new("field_featured", "boolean");
        let code = getter(&field, "8.1");
        assert!(code.contains("public function getFieldFeatured(): ?bool\n"));
        assert!(code.contains("return (bool) $this->get('field_featured')->value;"));
    }

    #[test]
    fn test_multiple_values_collect_the_value_column() {
        let field = FieldDescriptor::new("field_aliases", "string").with_cardinality(Cardinality::Unlimited);
        let code = getter(&field, "8.1");
        assert!(code.contains(" * @return string[]\n"));
        assert!(code.contains("return array_column($this->get('field_aliases')->getValue(), 'value');"));

        let field = FieldDescriptor::new("field_scores", "list_integer").with_cardinality(Cardinality::Limited(5));
        assert!(getter(&field, "8.1").contains(
            "return array_map('intval', array_column($this->get('field_scores')->getValue(), 'value'));"
        ));
    }
}

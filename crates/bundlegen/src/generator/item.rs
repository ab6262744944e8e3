//! Getters returning field items for compound field types.

use super::{FieldMethodGenerator, FieldShape, GeneratorContext};
use crate::diagnostic::ScaffoldError;
use crate::field::FieldDescriptor;
use crate::php::{Expr, PhpType};

const ITEM_CLASSES: &[(&str, &str)] = &[
    ("address", "Drupal\\address\\Plugin\\Field\\FieldType\\AddressItem"),
    ("daterange", "Drupal\\datetime_range\\Plugin\\Field\\FieldType\\DateRangeItem"),
    ("field_item", "Drupal\\Core\\Field\\FieldItemInterface"),
    ("image", "Drupal\\image\\Plugin\\Field\\FieldType\\ImageItem"),
    ("link", "Drupal\\link\\Plugin\\Field\\FieldType\\LinkItem"),
];

/// Field types with several properties per item return the item itself.
pub struct FieldItemGenerator;

impl FieldMethodGenerator for FieldItemGenerator {
    fn field_types(&self) -> &[&'static str] {
        &["address", "daterange", "field_item", "image", "link"]
    }

    fn generate(
        &self,
        field: &FieldDescriptor,
        _ctx: &GeneratorContext<'_>,
    ) -> Result<FieldShape, ScaffoldError> {
        let item_class = ITEM_CLASSES
            .iter()
            .find(|(field_type, _)| *field_type == field.field_type)
            .map(|(_, class)| *class)
            .ok_or_else(|| ScaffoldError::NoGenerator {
                field_type: field.field_type.clone(),
                field: field.name.clone(),
            })?;

        let items = Expr::field_list(&field.name);
        let expr = if field.cardinality.is_single() {
            items.call("first", vec![])
        } else {
            Expr::func("iterator_to_array", vec![items])
        };

        Ok(FieldShape::returning(PhpType::class(item_class), expr))
    }
}

#[cfg(test)]
mod tests {
    use crate::field::{Cardinality, FieldDescriptor};
    use crate::generator::test_support::getter;

    #[test]
    fn test_single_item_returns_first() {
        let field = FieldDescriptor::new("field_link", "link");
        let code = getter(&field, "8.1");
        assert!(code.contains("public function getFieldLink(): ?LinkItem\n"));
        assert!(code.contains("return $this->get('field_link')->first();"));
    }

    #[test]
    fn test_multiple_items_return_all_of_them() {
        let field = FieldDescriptor::new("field_gallery", "image").with_cardinality(Cardinality::Limited(4));
        let code = getter(&field, "8.1");
        assert!(code.contains(" * @return ImageItem[]\n"));
        assert!(code.contains("return iterator_to_array($this->get('field_gallery'));"));
    }
}

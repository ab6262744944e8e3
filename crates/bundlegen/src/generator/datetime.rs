//! Getters for date fields.

use super::{map_items, FieldMethodGenerator, FieldShape, GeneratorContext};
use crate::diagnostic::ScaffoldError;
use crate::field::FieldDescriptor;
use crate::php::ast::CastType;
use crate::php::{ClassName, Expr, PhpType};

const DRUPAL_DATE_TIME: &str = "Drupal\\Core\\Datetime\\DrupalDateTime";
const DATE_TIME_ITEM: &str = "Drupal\\datetime\\Plugin\\Field\\FieldType\\DateTimeItem";
const DATE_TIME_IMMUTABLE: &str = "DateTimeImmutable";

fn timestamp_item(field_type: &str) -> Option<&'static str> {
    match field_type {
        "timestamp" => Some("Drupal\\Core\\Field\\Plugin\\Field\\FieldType\\TimestampItem"),
        "created" => Some("Drupal\\Core\\Field\\Plugin\\Field\\FieldType\\CreatedItem"),
        "changed" => Some("Drupal\\Core\\Field\\Plugin\\Field\\FieldType\\ChangedItem"),
        _ => None,
    }
}

/// `(new \DateTimeImmutable())->setTimestamp((int) <value>)`
fn from_timestamp(value: Expr) -> Expr {
    Expr::New {
        class: ClassName::new(DATE_TIME_IMMUTABLE),
        args: vec![],
    }
    .call("setTimestamp", vec![value.cast(CastType::Int)])
}

/// `datetime` fields return the computed `DrupalDateTime`; timestamp-backed
/// fields (`timestamp`, `created`, `changed`) return `DateTimeImmutable`.
pub struct DateTimeGenerator;

impl FieldMethodGenerator for DateTimeGenerator {
    fn field_types(&self) -> &[&'static str] {
        &["datetime", "timestamp", "created", "changed"]
    }

    fn generate(
        &self,
        field: &FieldDescriptor,
        ctx: &GeneratorContext<'_>,
    ) -> Result<FieldShape, ScaffoldError> {
        let items = Expr::field_list(&field.name);
        let single = field.cardinality.is_single();

        if let Some(item_class) = timestamp_item(&field.field_type) {
            let expr = if !single {
                map_items(field, ctx, item_class, from_timestamp(Expr::var("item").prop("value")))
            } else if field.required {
                from_timestamp(items.prop("value"))
            } else {
                Expr::ternary(
                    items.clone().call("isEmpty", vec![]),
                    Expr::Null,
                    from_timestamp(items.prop("value")),
                )
            };
            return Ok(FieldShape::returning(PhpType::class(DATE_TIME_IMMUTABLE), expr));
        }

        let expr = if !single {
            map_items(field, ctx, DATE_TIME_ITEM, Expr::var("item").prop("date"))
        } else if ctx.capabilities.optional_chaining {
            items.call("first", vec![]).nullsafe_prop("date")
        } else {
            items.prop("date")
        };
        Ok(FieldShape::returning(PhpType::class(DRUPAL_DATE_TIME), expr))
    }
}

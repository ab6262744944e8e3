//! Getter generation per field type.
//!
//! Each field type id maps to one [`FieldMethodGenerator`]. A generator only
//! decides the body and the value type of a single item; the registry turns
//! that into a method, applying the same multiplicity and nullability rules
//! to every field type:
//!
//! | cardinality | required | native return   | doc comment  |
//! |-------------|----------|-----------------|--------------|
//! | ≠ 1         | any      | `array`         | `@return T[]`|
//! | 1           | yes      | `T`             | none         |
//! | 1           | no       | `?T` (≥ 7.1)    | none         |
//! | 1           | no       | none (< 7.1)    | `@return T\|null` |

mod datetime;
mod item;
mod lookup;
mod reference;
mod scalar;

use std::collections::BTreeMap;

pub use datetime::DateTimeGenerator;
pub use item::FieldItemGenerator;
pub use lookup::TypeLookup;
pub use reference::ReferenceGenerator;
pub use scalar::ScalarGenerator;

use crate::codegen::MethodCandidate;
use crate::config::Capabilities;
use crate::diagnostic::ScaffoldError;
use crate::field::FieldDescriptor;
use crate::naming::getter_name;
use crate::php::{Expr, MethodDeclaration, Param, PhpType, Stmt};

/// Everything a generator may consult besides the field itself.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorContext<'a> {
    pub capabilities: Capabilities,
    pub types: &'a TypeLookup,
}

/// What a generator produces for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldShape {
    /// Type of a single value; lists and nullability are applied by the registry.
    pub value_type: PhpType,
    pub body: Vec<Stmt>,
}

impl FieldShape {
    /// A body consisting of a single `return`.
    pub fn returning(value_type: PhpType, expr: Expr) -> Self {
        Self {
            value_type,
            body: vec![Stmt::Return(Some(expr))],
        }
    }
}

/// Generates getter bodies for one or more field types.
pub trait FieldMethodGenerator: Send + Sync {
    /// Field type ids this generator handles.
    fn field_types(&self) -> &[&'static str];

    /// Builds the getter body for `field`.
    fn generate(
        &self,
        field: &FieldDescriptor,
        ctx: &GeneratorContext<'_>,
    ) -> Result<FieldShape, ScaffoldError>;
}

/// Field type id → generator dispatch table.
pub struct GeneratorRegistry {
    generators: Vec<Box<dyn FieldMethodGenerator>>,
    by_type: BTreeMap<String, usize>,
}

impl GeneratorRegistry {
    /// A registry without any generators.
    pub fn empty() -> Self {
        Self {
            generators: Vec::new(),
            by_type: BTreeMap::new(),
        }
    }

    /// A registry with the built-in generators.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(ScalarGenerator));
        registry.register(Box::new(ReferenceGenerator));
        registry.register(Box::new(DateTimeGenerator));
        registry.register(Box::new(FieldItemGenerator));
        registry
    }

    /// Registers a generator. It replaces earlier generators for the same ids.
    pub fn register(&mut self, generator: Box<dyn FieldMethodGenerator>) {
        let index = self.generators.len();
        for field_type in generator.field_types() {
            self.by_type.insert(field_type.to_string(), index);
        }
        self.generators.push(generator);
    }

    /// Registered field type ids, sorted.
    pub fn field_types(&self) -> Vec<&str> {
        self.by_type.keys().map(String::as_str).collect()
    }

    pub fn supports(&self, field_type: &str) -> bool {
        self.by_type.contains_key(field_type)
    }

    fn generator_for(&self, field_type: &str) -> Option<&dyn FieldMethodGenerator> {
        self.by_type
            .get(field_type)
            .map(|&index| self.generators[index].as_ref())
    }

    /// Builds the `get<FieldName>()` method of a field.
    pub fn generate_getter(
        &self,
        field: &FieldDescriptor,
        ctx: &GeneratorContext<'_>,
    ) -> Result<MethodCandidate, ScaffoldError> {
        let generator = self
            .generator_for(&field.field_type)
            .ok_or_else(|| ScaffoldError::NoGenerator {
                field_type: field.field_type.clone(),
                field: field.name.clone(),
            })?;

        let shape = generator.generate(field, ctx)?;
        let (return_type, doc_return) = return_declaration(&shape.value_type, field, ctx.capabilities);

        let mut method = MethodDeclaration::public(getter_name(&field.name));
        method.return_type = return_type;
        method.doc_return = doc_return;
        method.body = shape.body;

        Ok(MethodCandidate::new(field.name.clone(), method))
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Native return type and `@return` type for a field's getter.
pub fn return_declaration(
    value_type: &PhpType,
    field: &FieldDescriptor,
    capabilities: Capabilities,
) -> (Option<PhpType>, Option<PhpType>) {
    if !field.cardinality.is_single() {
        let native = capabilities.return_types.then_some(PhpType::Array);
        return (native, Some(PhpType::list_of(value_type.clone())));
    }

    if field.required {
        if capabilities.return_types {
            (Some(value_type.clone()), None)
        } else {
            (None, Some(value_type.clone()))
        }
    } else if capabilities.nullable_types {
        (Some(PhpType::nullable(value_type.clone())), None)
    } else {
        (None, Some(PhpType::nullable(value_type.clone())))
    }
}

/// `array_map(<mapper>, iterator_to_array($this->get('<field>')))`, where the
/// mapper turns `$item` into `mapped`. Uses an arrow function when available.
pub(crate) fn map_items(
    field: &FieldDescriptor,
    ctx: &GeneratorContext<'_>,
    item_class: &str,
    mapped: Expr,
) -> Expr {
    let params = vec![Param::typed(PhpType::class(item_class), "item")];
    let mapper = if ctx.capabilities.arrow_functions {
        Expr::ArrowFn {
            params,
            body: Box::new(mapped),
        }
    } else {
        Expr::Closure {
            params,
            body: vec![Stmt::Return(Some(mapped))],
        }
    };

    Expr::func(
        "array_map",
        vec![
            mapper,
            Expr::func("iterator_to_array", vec![Expr::field_list(&field.name)]),
        ],
    )
}

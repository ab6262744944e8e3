//! Deterministic PHP printer for generated syntax trees.
//!
//! Output follows PSR-12 layout: four-space indentation, braces of classes
//! and methods on their own line, closure braces on the same line.

use super::ast::{ArrayItem, ClassName, Expr, MethodDeclaration, Param, PhpType, Stmt};
use super::imports::ImportSet;

const INDENT: &str = "    ";

/// Prints nodes in the context of a file's imports.
pub struct Printer<'a> {
    imports: &'a ImportSet,
}

impl<'a> Printer<'a> {
    pub fn new(imports: &'a ImportSet) -> Self {
        Self { imports }
    }

    /// Prints a method at `depth` levels of indentation, without a trailing newline.
    pub fn method(&self, method: &MethodDeclaration, depth: usize) -> String {
        let pad = INDENT.repeat(depth);
        let mut output = String::new();

        if let Some(doc) = &method.doc_return {
            output.push_str(&format!("{}/**\n", pad));
            output.push_str(&format!("{} * @return {}\n", pad, self.doc_type(doc)));
            output.push_str(&format!("{} */\n", pad));
        }

        let params = self.params(&method.params);
        let return_type = method
            .return_type
            .as_ref()
            .map(|t| format!(": {}", self.native_type(t)))
            .unwrap_or_default();

        output.push_str(&format!(
            "{}{} function {}({}){}\n",
            pad,
            method.visibility.keyword(),
            method.name,
            params,
            return_type
        ));
        output.push_str(&format!("{}{{\n", pad));
        for stmt in &method.body {
            output.push_str(&self.stmt(stmt, depth + 1));
        }
        output.push_str(&format!("{}}}", pad));
        output
    }

    /// Prints a statement line (with trailing newline).
    pub fn stmt(&self, stmt: &Stmt, depth: usize) -> String {
        let pad = INDENT.repeat(depth);
        match stmt {
            Stmt::Return(None) => format!("{}return;\n", pad),
            Stmt::Return(Some(expr)) => format!("{}return {};\n", pad, self.expr(expr, depth)),
        }
    }

    /// Prints an expression. `depth` is the indentation of the enclosing
    /// statement; multi-line closures indent relative to it.
    pub fn expr(&self, expr: &Expr, depth: usize) -> String {
        match expr {
            Expr::This => "$this".to_string(),
            Expr::Null => "null".to_string(),
            Expr::Var(name) => format!("${}", name),
            Expr::Str(value) => quote(value),
            Expr::Int(value) => value.to_string(),
            Expr::PropertyFetch {
                target,
                property,
                nullsafe,
            } => format!(
                "{}{}{}",
                self.deref_target(target, depth),
                arrow(*nullsafe),
                property
            ),
            Expr::MethodCall {
                target,
                method,
                args,
                nullsafe,
            } => format!(
                "{}{}{}({})",
                self.deref_target(target, depth),
                arrow(*nullsafe),
                method,
                self.args(args, depth)
            ),
            Expr::FuncCall { name, args } => format!("{}({})", name, self.args(args, depth)),
            Expr::New { class, args } => {
                format!("new {}({})", self.class_name(class), self.args(args, depth))
            }
            Expr::Cast { to, expr } => format!("({}) {}", to.keyword(), self.operand(expr, depth)),
            Expr::Ternary {
                condition,
                then,
                otherwise,
            } => format!(
                "{} ? {} : {}",
                self.operand(condition, depth),
                self.operand(then, depth),
                self.operand(otherwise, depth)
            ),
            Expr::Closure { params, body } => {
                let pad = INDENT.repeat(depth);
                let mut output = format!("function ({}) {{\n", self.params(params));
                for stmt in body {
                    output.push_str(&self.stmt(stmt, depth + 1));
                }
                output.push_str(&format!("{}}}", pad));
                output
            }
            Expr::ArrowFn { params, body } => {
                format!("fn ({}) => {}", self.params(params), self.expr(body, depth))
            }
            Expr::Array(items) => {
                let items: Vec<String> = items.iter().map(|item| self.array_item(item, depth)).collect();
                format!("[{}]", items.join(", "))
            }
        }
    }

    /// Native declaration: `?T`, `array`, `string`, short class names.
    pub fn native_type(&self, ty: &PhpType) -> String {
        match ty {
            PhpType::Nullable(inner) => format!("?{}", self.native_type(inner)),
            PhpType::ListOf(_) => "array".to_string(),
            other => self.base_type(other),
        }
    }

    /// Doc comment type: `T|null`, `T[]`.
    pub fn doc_type(&self, ty: &PhpType) -> String {
        match ty {
            PhpType::Nullable(inner) => format!("{}|null", self.doc_type(inner)),
            PhpType::ListOf(inner) => format!("{}[]", self.doc_type(inner)),
            other => self.base_type(other),
        }
    }

    fn base_type(&self, ty: &PhpType) -> String {
        match ty {
            PhpType::String => "string".to_string(),
            PhpType::Int => "int".to_string(),
            PhpType::Float => "float".to_string(),
            PhpType::Bool => "bool".to_string(),
            PhpType::Array => "array".to_string(),
            PhpType::Class(name) => self.class_name(name),
            PhpType::Nullable(_) | PhpType::ListOf(_) => self.native_type(ty),
        }
    }

    /// Short name when imported, otherwise fully qualified.
    pub fn class_name(&self, class: &ClassName) -> String {
        self.imports
            .local_name(class)
            .unwrap_or_else(|| format!("\\{}", class.as_str()))
    }

    fn params(&self, params: &[Param]) -> String {
        params
            .iter()
            .map(|param| match &param.ty {
                Some(ty) => format!("{} ${}", self.native_type(ty), param.name),
                None => format!("${}", param.name),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn args(&self, args: &[Expr], depth: usize) -> String {
        args.iter()
            .map(|arg| self.expr(arg, depth))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn array_item(&self, item: &ArrayItem, depth: usize) -> String {
        match &item.key {
            Some(key) => format!("{} => {}", self.expr(key, depth), self.expr(&item.value, depth)),
            None => self.expr(&item.value, depth),
        }
    }

    /// `new` and casts need parentheses before `->`.
    fn deref_target(&self, target: &Expr, depth: usize) -> String {
        match target {
            Expr::New { .. } | Expr::Cast { .. } | Expr::Ternary { .. } => {
                format!("({})", self.expr(target, depth))
            }
            _ => self.expr(target, depth),
        }
    }

    fn operand(&self, expr: &Expr, depth: usize) -> String {
        match expr {
            Expr::Ternary { .. } | Expr::ArrowFn { .. } => format!("({})", self.expr(expr, depth)),
            _ => self.expr(expr, depth),
        }
    }
}

fn arrow(nullsafe: bool) -> &'static str {
    if nullsafe {
        "?->"
    } else {
        "->"
    }
}

/// Single-quoted PHP string literal.
fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::php::ast::{CastType, MethodDeclaration};

    fn imports() -> ImportSet {
        let mut imports = ImportSet::new("Drupal\\my_module\\Entity\\Node");
        imports.add(&ClassName::new("Drupal\\taxonomy\\Entity\\Term"), "Article");
        imports
    }

    #[test]
    fn test_prints_nullable_getter() {
        let imports = imports();
        let mut method = MethodDeclaration::public("getFieldSubtitle");
        method.return_type = Some(PhpType::nullable(PhpType::String));
        method.body = vec![Stmt::Return(Some(Expr::field_list("field_subtitle").prop("value")))];

        assert_eq!(
            Printer::new(&imports).method(&method, 1),
            "    public function getFieldSubtitle(): ?string\n    {\n        return $this->get('field_subtitle')->value;\n    }"
        );
    }

    #[test]
    fn test_prints_doc_comment() {
        let imports = imports();
        let mut method = MethodDeclaration::public("getFieldTags");
        method.return_type = Some(PhpType::Array);
        method.doc_return = Some(PhpType::list_of(PhpType::class("Drupal\\taxonomy\\Entity\\Term")));
        method.body = vec![Stmt::Return(Some(
            Expr::field_list("field_tags").call("referencedEntities", vec![]),
        ))];

        let code = Printer::new(&imports).method(&method, 1);
        assert!(code.starts_with("    /**\n     * @return Term[]\n     */\n"));
        assert!(code.contains("public function getFieldTags(): array\n"));
        assert!(code.contains("return $this->get('field_tags')->referencedEntities();"));
    }

    #[test]
    fn test_prints_closures_relative_to_statement() {
        let imports = imports();
        let closure = Expr::Closure {
            params: vec![Param::typed(PhpType::class("Drupal\\Foo\\Item"), "item")],
            body: vec![Stmt::Return(Some(Expr::var("item").prop("date")))],
        };
        let stmt = Stmt::Return(Some(Expr::func("array_map", vec![closure, Expr::var("items")])));

        assert_eq!(
            Printer::new(&imports).stmt(&stmt, 2),
            "        return array_map(function (\\Drupal\\Foo\\Item $item) {\n            return $item->date;\n        }, $items);\n"
        );
    }

    #[test]
    fn test_prints_operators() {
        let imports = imports();
        let printer = Printer::new(&imports);

        let cast = Expr::field_list("field_flag").prop("value").cast(CastType::Bool);
        assert_eq!(printer.expr(&cast, 0), "(bool) $this->get('field_flag')->value");

        let created = Expr::New {
            class: ClassName::new("DateTimeImmutable"),
            args: vec![],
        }
        .call("setTimestamp", vec![Expr::Int(0)]);
        assert_eq!(printer.expr(&created, 0), "(new \\DateTimeImmutable())->setTimestamp(0)");

        let nullsafe = Expr::field_list("field_date").call("first", vec![]).nullsafe_prop("date");
        assert_eq!(printer.expr(&nullsafe, 0), "$this->get('field_date')->first()?->date");

        let arrow = Expr::ArrowFn {
            params: vec![Param { ty: None, name: "x".to_string() }],
            body: Box::new(Expr::var("x")),
        };
        assert_eq!(printer.expr(&arrow, 0), "fn ($x) => $x");

        let array = Expr::Array(vec![ArrayItem {
            key: Some(Expr::str("it's")),
            value: Expr::Null,
        }]);
        assert_eq!(printer.expr(&array, 0), "['it\\'s' => null]");
    }

    #[test]
    fn test_doc_types_for_legacy_levels() {
        let imports = imports();
        let printer = Printer::new(&imports);
        let term = PhpType::class("Drupal\\taxonomy\\Entity\\Term");

        assert_eq!(printer.doc_type(&PhpType::nullable(term.clone())), "Term|null");
        assert_eq!(printer.native_type(&PhpType::nullable(term.clone())), "?Term");
        assert_eq!(printer.native_type(&PhpType::list_of(term)), "array");
    }
}

//! Whole-file model of a class being generated or merged into.

use std::collections::HashSet;

use crate::php::{ClassName, ExistingClass, ExistingMethod, ImportSet, MethodDeclaration, Printer};
use crate::resolver::ClassLocation;

/// The class declaration line(s) up to the opening brace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassHead {
    /// A class created by this tool.
    Generated {
        name: String,
        extends: Option<ClassName>,
    },
    /// A class head read from disk, reproduced as written.
    Verbatim { name: String, text: String },
}

impl ClassHead {
    pub fn name(&self) -> &str {
        match self {
            ClassHead::Generated { name, .. } | ClassHead::Verbatim { name, .. } => name,
        }
    }
}

/// A class file: everything around the class is kept as text, methods
/// added by the merge engine are kept as syntax until rendering.
#[derive(Debug, Clone)]
pub struct ClassSkeleton {
    /// Statements before the namespace declaration.
    pub header: Vec<String>,
    pub namespace: String,
    pub imports: ImportSet,
    /// Statements between the imports and the class.
    pub statements: Vec<String>,
    pub head: ClassHead,
    /// Source between the braces of an existing class.
    pub body: Option<String>,
    pub existing_methods: Vec<ExistingMethod>,
    /// Methods appended after the existing body.
    pub methods: Vec<MethodDeclaration>,
}

impl ClassSkeleton {
    /// An empty class at `location`, optionally extending `parent`.
    pub fn generated(location: &ClassLocation, parent: Option<&ClassName>) -> Self {
        let name = location.short_name().to_string();
        let mut imports = ImportSet::new(location.namespace());
        if let Some(parent) = parent {
            imports.add(parent, &name);
        }

        Self {
            header: Vec::new(),
            namespace: location.namespace().to_string(),
            imports,
            statements: Vec::new(),
            head: ClassHead::Generated {
                name,
                extends: parent.cloned(),
            },
            body: None,
            existing_methods: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn from_existing(existing: ExistingClass) -> Self {
        Self {
            header: existing.header,
            namespace: existing.namespace,
            imports: existing.imports,
            statements: existing.statements,
            head: ClassHead::Verbatim {
                name: existing.name,
                text: existing.head,
            },
            body: Some(existing.body),
            existing_methods: existing.methods,
            methods: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.head.name()
    }

    /// Lowercased names of every method in the class.
    pub fn taken_method_names(&self) -> HashSet<String> {
        self.existing_methods
            .iter()
            .map(|m| m.name.to_lowercase())
            .chain(self.methods.iter().map(|m| m.name.to_lowercase()))
            .collect()
    }

    /// Renders the full file.
    pub fn render(&self) -> String {
        let printer = Printer::new(&self.imports);
        let mut out = String::from("<?php\n\n");

        for statement in &self.header {
            out.push_str(statement);
            out.push_str("\n\n");
        }

        if !self.namespace.is_empty() {
            out.push_str(&format!("namespace {};\n\n", self.namespace));
        }

        let uses = self.imports.lines();
        if !uses.is_empty() {
            out.push_str(&uses.join("\n"));
            out.push_str("\n\n");
        }

        for statement in &self.statements {
            out.push_str(statement);
            out.push_str("\n\n");
        }

        match &self.head {
            ClassHead::Generated { name, extends } => {
                out.push_str(&format!("class {}", name));
                if let Some(parent) = extends {
                    out.push_str(&format!(" extends {}", printer.class_name(parent)));
                }
            }
            ClassHead::Verbatim { text, .. } => out.push_str(text),
        }
        out.push_str("\n{");

        let methods: Vec<String> = self.methods.iter().map(|m| printer.method(m, 1)).collect();
        let existing = self.body.as_deref().map(str::trim_end).unwrap_or("");

        if existing.trim().is_empty() {
            out.push('\n');
            if !methods.is_empty() {
                out.push_str(&methods.join("\n\n"));
                out.push('\n');
            }
        } else {
            out.push_str(existing);
            for method in &methods {
                out.push_str("\n\n");
                out.push_str(method);
            }
            out.push('\n');
        }

        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::php::{Expr, PhpParser, PhpType, Stmt};
    use crate::resolver::ClassPathResolver;

    fn location() -> ClassLocation {
        ClassPathResolver::new("my_module", "/tmp/my_module").model_location("node", "article")
    }

    fn subtitle() -> MethodDeclaration {
        let mut method = MethodDeclaration::public("getFieldSubtitle");
        method.return_type = Some(PhpType::nullable(PhpType::String));
        method.body = vec![Stmt::Return(Some(Expr::field_list("field_subtitle").prop("value")))];
        method
    }

    #[test]
    fn test_renders_new_class() {
        let node = ClassName::new("Drupal\\node\\Entity\\Node");
        let mut skeleton = ClassSkeleton::generated(&location(), Some(&node));
        skeleton.methods.push(subtitle());

        assert_eq!(
            skeleton.render(),
            "<?php\n\nnamespace Drupal\\my_module\\Entity\\Node;\n\nuse Drupal\\node\\Entity\\Node;\n\nclass Article extends Node\n{\n    public function getFieldSubtitle(): ?string\n    {\n        return $this->get('field_subtitle')->value;\n    }\n}\n"
        );
    }

    #[test]
    fn test_renders_empty_class() {
        let skeleton = ClassSkeleton::generated(&location(), None);
        assert_eq!(
            skeleton.render(),
            "<?php\n\nnamespace Drupal\\my_module\\Entity\\Node;\n\nclass Article\n{\n}\n"
        );
    }

    #[test]
    fn test_aliases_parent_with_the_same_short_name() {
        let location = ClassPathResolver::new("my_module", "/tmp/my_module").model_location("user", "user");
        let user = ClassName::new("Drupal\\user\\Entity\\User");
        let skeleton = ClassSkeleton::generated(&location, Some(&user));

        let source = skeleton.render();
        assert!(source.contains("use Drupal\\user\\Entity\\User as UserBase;\n"));
        assert!(source.contains("class User extends UserBase\n"));
    }

    #[test]
    fn test_appends_methods_after_existing_body() {
        let source = "<?php\n\ndeclare(strict_types=1);\n\nnamespace App;\n\nuse Drupal\\node\\Entity\\Node;\n\nconst VERSION = 2;\n\n/**\n * Hand-written.\n */\nclass Article extends Node\n{\n    protected $cache = [];\n}\n";
        let existing = PhpParser::new().unwrap().read_class(source).unwrap();
        let mut skeleton = ClassSkeleton::from_existing(existing);
        assert_eq!(skeleton.render(), source);

        skeleton.methods.push(subtitle());
        let rendered = skeleton.render();
        assert!(rendered.starts_with("<?php\n\ndeclare(strict_types=1);\n\nnamespace App;\n\nuse Drupal\\node\\Entity\\Node;\n\nconst VERSION = 2;\n\n/**\n * Hand-written.\n */\nclass Article extends Node\n{\n    protected $cache = [];\n\n    public function getFieldSubtitle(): ?string\n"));
        assert!(rendered.ends_with("    }\n}\n"));
        assert!(skeleton.taken_method_names().contains("getfieldsubtitle"));
    }
}

//! Reads existing PHP class files with tree-sitter.
//!
//! Only the file layout the merge engine needs is recovered: statements
//! ahead of the namespace, the namespace, its imports, other statements, and
//! the single class. Everything but the imports is kept as source text so
//! hand-written code survives a rewrite untouched.

use tree_sitter::{Node, Parser};

use super::ast::ClassName;
use super::fingerprint::fingerprint;
use super::imports::ImportSet;
use crate::diagnostic::{ScaffoldError, Span};

/// Name of the wrapper class used to re-parse a lone method.
const WRAPPER_CLASS: &str = "BundlegenWrapper";

/// A class file as found on disk.
#[derive(Debug, Clone)]
pub struct ExistingClass {
    /// Statements before the namespace declaration (`declare(strict_types=1);`, file docblock).
    pub header: Vec<String>,
    /// Declared namespace; empty for the global namespace.
    pub namespace: String,
    pub imports: ImportSet,
    /// Other statements between the imports and the class.
    pub statements: Vec<String>,
    /// Short name of the class.
    pub name: String,
    /// Everything from the class's leading doc comment up to its opening brace.
    pub head: String,
    /// Source between the class braces.
    pub body: String,
    pub methods: Vec<ExistingMethod>,
}

/// A method found in an existing class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingMethod {
    pub name: String,
    pub fingerprint: u64,
    pub span: Span,
}

/// PHP parser.
pub struct PhpParser {
    parser: Parser,
}

impl PhpParser {
    /// Creates a new PHP parser.
    pub fn new() -> Result<Self, ScaffoldError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_php::LANGUAGE_PHP.into())
            .map_err(|_| ScaffoldError::ParserInitFailed)?;
        Ok(Self { parser })
    }

    /// Parses a class file. Returns `None` when the source does not parse
    /// cleanly, declares no class, or mixes in inline HTML (a rewrite would
    /// lose it).
    pub fn read_class(&mut self, source: &str) -> Option<ExistingClass> {
        let tree = self.parser.parse(source, None)?;
        let root = tree.root_node();
        if root.has_error() || root.named_child_count() == 0 {
            return None;
        }

        let mut visitor = Visitor::new(source);
        visitor.visit_statements(root);
        visitor.finish()
    }

    /// Fingerprints a single printed method by parsing it inside a wrapper class.
    pub fn fingerprint_method(&mut self, method_source: &str) -> Option<u64> {
        let wrapped = format!("<?php\nclass {}\n{{\n{}\n}}\n", WRAPPER_CLASS, method_source);
        let class = self.read_class(&wrapped)?;
        match class.methods.as_slice() {
            [method] => Some(method.fingerprint),
            _ => None,
        }
    }
}

/// Collects the file layout from top-level tree-sitter nodes.
struct Visitor<'a> {
    source: &'a str,
    header: Vec<String>,
    namespace: Option<String>,
    uses: Vec<String>,
    statements: Vec<String>,
    pending_comments: Vec<String>,
    class: Option<(String, String, String, Vec<ExistingMethod>)>,
    inline_html: bool,
}

impl<'a> Visitor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            header: Vec::new(),
            namespace: None,
            uses: Vec::new(),
            statements: Vec::new(),
            pending_comments: Vec::new(),
            class: None,
            inline_html: false,
        }
    }

    fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn visit_statements(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "php_tag" | "{" | "}" => {}
                "text" | "text_interpolation" => self.inline_html = true,
                "comment" => {
                    let text = self.node_text(child).to_string();
                    self.pending_comments.push(text);
                }
                "namespace_definition" => self.visit_namespace(child),
                "namespace_use_declaration" => {
                    self.flush_comments();
                    let text = self.node_text(child).to_string();
                    self.uses.push(text);
                }
                "class_declaration" if self.class.is_none() => self.visit_class(child),
                _ => {
                    let text = self.with_comments(self.node_text(child));
                    self.section().push(text);
                }
            }
        }
    }

    fn visit_namespace(&mut self, node: Node) {
        self.flush_comments();

        let name = node
            .child_by_field_name("name")
            .or_else(|| find_child(node, "namespace_name"))
            .map(|n| self.node_text(n).to_string())
            .unwrap_or_default();
        self.namespace = Some(name);

        let body = node
            .child_by_field_name("body")
            .or_else(|| find_child(node, "compound_statement"));
        if let Some(body) = body {
            self.visit_statements(body);
        }
    }

    fn visit_class(&mut self, node: Node) {
        let Some(body) = node
            .child_by_field_name("body")
            .or_else(|| find_child(node, "declaration_list"))
        else {
            return;
        };

        let name = node
            .child_by_field_name("name")
            .map(|n| self.node_text(n).to_string())
            .unwrap_or_default();

        let source = self.source;
        let head_source = &source[node.start_byte()..body.start_byte()];
        let head = self.with_comments(head_source.trim_end());

        let inner_start = (body.start_byte() + 1).min(body.end_byte());
        let inner_end = body.end_byte().saturating_sub(1).max(inner_start);
        let inner = source[inner_start..inner_end].to_string();

        let mut methods = Vec::new();
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            if member.kind() != "method_declaration" {
                continue;
            }
            let method_name = member
                .child_by_field_name("name")
                .map(|n| self.node_text(n).to_string())
                .unwrap_or_default();
            methods.push(ExistingMethod {
                name: method_name,
                fingerprint: fingerprint(member, source.as_bytes()),
                span: Span::new(
                    member.start_position().row,
                    member.start_position().column,
                    member.end_position().row,
                    member.end_position().column,
                ),
            });
        }

        self.class = Some((name, head, inner, methods));
    }

    /// Prefixes pending comments (usually a docblock) to a statement.
    fn with_comments(&mut self, text: &str) -> String {
        let mut lines = std::mem::take(&mut self.pending_comments);
        lines.push(text.to_string());
        lines.join("\n")
    }

    fn flush_comments(&mut self) {
        let comments = std::mem::take(&mut self.pending_comments);
        self.section().extend(comments);
    }

    fn section(&mut self) -> &mut Vec<String> {
        if self.namespace.is_some() {
            &mut self.statements
        } else {
            &mut self.header
        }
    }

    fn finish(mut self) -> Option<ExistingClass> {
        if self.inline_html {
            return None;
        }
        self.flush_comments();
        let (name, head, body, methods) = self.class.take()?;
        let namespace = self.namespace.unwrap_or_default();

        let mut imports = ImportSet::new(namespace.clone());
        for statement in &self.uses {
            read_use_statement(statement, &mut imports);
        }

        Some(ExistingClass {
            header: self.header,
            namespace,
            imports,
            statements: self.statements,
            name,
            head,
            body,
            methods,
        })
    }
}

fn find_child<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|child| child.kind() == kind);
    found
}

/// Breaks `use A\B, C\D as E;` into imports; anything else stays verbatim.
fn read_use_statement(statement: &str, imports: &mut ImportSet) {
    let text = statement.trim();
    let clauses = text
        .get(3..)
        .filter(|_| text[..3].eq_ignore_ascii_case("use"))
        .map(|rest| rest.trim().trim_end_matches(';').trim());

    let Some(clauses) = clauses else {
        imports.insert_verbatim(text);
        return;
    };

    let lowered = clauses.to_lowercase();
    if lowered.starts_with("function ") || lowered.starts_with("const ") {
        imports.insert_verbatim(text);
        return;
    }
    if clauses.contains('{') {
        imports.insert_grouped(text, read_group_members(clauses));
        return;
    }

    let mut parsed = Vec::new();
    for clause in clauses.split(',') {
        let tokens: Vec<&str> = clause.split_whitespace().collect();
        match tokens.as_slice() {
            [path] => parsed.push((ClassName::new(path), None)),
            [path, keyword, alias] if keyword.eq_ignore_ascii_case("as") => {
                parsed.push((ClassName::new(path), Some(alias.to_string())))
            }
            _ => {
                imports.insert_verbatim(text);
                return;
            }
        }
    }

    for (class, alias) in parsed {
        imports.insert_existing(class, alias);
    }
}

/// Classes imported by `A\B\{C, D\E as F}`. Function and const members
/// are left out.
fn read_group_members(clauses: &str) -> Vec<(ClassName, Option<String>)> {
    let Some((prefix, rest)) = clauses.split_once('{') else {
        return Vec::new();
    };
    let prefix = prefix.trim().trim_end_matches('\\');
    let inner = rest.split('}').next().unwrap_or("");

    let mut members = Vec::new();
    for member in inner.split(',') {
        let tokens: Vec<&str> = member.split_whitespace().collect();
        let (path, alias) = match tokens.as_slice() {
            [path] => (*path, None),
            [path, keyword, alias] if keyword.eq_ignore_ascii_case("as") => (*path, Some(alias.to_string())),
            _ => continue,
        };
        members.push((ClassName::new(format!("{}\\{}", prefix, path)), alias));
    }
    members
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"<?php

declare(strict_types=1);

namespace Drupal\my_module\Entity\Node;

use Drupal\taxonomy\Entity\Term;
use Drupal\node\Entity\Node as CoreNode, Drupal\Core\Url;
use function array_map;

/**
 * Article model.
 */
final class Article extends CoreNode
{
    protected $cache = [];

    // Hand-written.
    public function getFieldSubtitle(): ?string
    {
        return $this->get('field_subtitle')->value;
    }

    public function url(): Url
    {
        return $this->toUrl();
    }
}
"#;

    #[test]
    fn test_reads_class_layout() {
        let mut parser = PhpParser::new().unwrap();
        let class = parser.read_class(ARTICLE).unwrap();

        assert_eq!(class.header, vec!["declare(strict_types=1);".to_string()]);
        assert_eq!(class.namespace, "Drupal\\my_module\\Entity\\Node");
        assert_eq!(class.name, "Article");
        assert!(class.head.starts_with("/**\n * Article model.\n */\nfinal class Article extends CoreNode"));
        assert!(class.body.contains("protected $cache = [];"));
        assert!(class.body.contains("// Hand-written."));
        assert!(class.statements.is_empty());

        assert_eq!(
            class.imports.lines(),
            vec![
                "use Drupal\\Core\\Url;".to_string(),
                "use Drupal\\node\\Entity\\Node as CoreNode;".to_string(),
                "use Drupal\\taxonomy\\Entity\\Term;".to_string(),
                "use function array_map;".to_string(),
            ]
        );

        let names: Vec<&str> = class.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["getFieldSubtitle", "url"]);
        assert_eq!(class.methods[0].span.start_line, 18);
    }

    #[test]
    fn test_rejects_broken_or_classless_files() {
        let mut parser = PhpParser::new().unwrap();
        assert!(parser.read_class("").is_none());
        assert!(parser.read_class("<?php\n\nfunction helper() {}\n").is_none());
        assert!(parser.read_class("<?php\nclass Broken {\n    public function (\n").is_none());
    }

    #[test]
    fn test_fingerprint_ignores_name_comments_and_layout() {
        let mut parser = PhpParser::new().unwrap();

        let original = parser
            .fingerprint_method(
                "public function getFieldSubtitle(): ?string\n{\n    return $this->get('field_subtitle')->value;\n}",
            )
            .unwrap();
        let renamed = parser
            .fingerprint_method(
                "public function subtitle(): ?string {\n  // Shortcut.\n  return $this->get('field_subtitle')->value;\n}",
            )
            .unwrap();
        let different = parser
            .fingerprint_method(
                "public function getFieldSubtitle(): string\n{\n    return $this->get('field_subtitle')->value;\n}",
            )
            .unwrap();

        assert_eq!(original, renamed);
        assert_ne!(original, different);
    }

    #[test]
    fn test_existing_methods_match_candidate_fingerprints() {
        let mut parser = PhpParser::new().unwrap();
        let class = parser.read_class(ARTICLE).unwrap();

        let candidate = parser
            .fingerprint_method(
                "    public function getFieldSubtitle(): ?string\n    {\n        return $this->get('field_subtitle')->value;\n    }",
            )
            .unwrap();
        assert_eq!(class.methods[0].fingerprint, candidate);
        assert_ne!(class.methods[1].fingerprint, candidate);
    }

    #[test]
    fn test_reads_files_without_namespace() {
        let mut parser = PhpParser::new().unwrap();
        let class = parser
            .read_class("<?php\n\nuse Foo\\Bar;\n\nclass Plain\n{\n}\n")
            .unwrap();

        assert_eq!(class.namespace, "");
        assert_eq!(class.name, "Plain");
        assert!(class.methods.is_empty());
        assert_eq!(class.imports.lines(), vec!["use Foo\\Bar;".to_string()]);
    }

    #[test]
    fn test_grouped_use_counts_as_imported() {
        let mut parser = PhpParser::new().unwrap();
        let mut class = parser
            .read_class(
                "<?php\n\nnamespace Drupal\\my_module\\Entity\\Node;\n\nuse Drupal\\taxonomy\\Entity\\{Term, Vocabulary as Vocab};\n\nclass Article\n{\n}\n",
            )
            .unwrap();

        let term = ClassName::new("Drupal\\taxonomy\\Entity\\Term");
        let vocabulary = ClassName::new("Drupal\\taxonomy\\Entity\\Vocabulary");
        assert_eq!(class.imports.local_name(&vocabulary).as_deref(), Some("Vocab"));
        assert_eq!(class.imports.add(&term, "Article"), "Term");
        assert_eq!(
            class.imports.lines(),
            vec!["use Drupal\\taxonomy\\Entity\\{Term, Vocabulary as Vocab};".to_string()]
        );
    }

    #[test]
    fn test_rejects_inline_html() {
        let mut parser = PhpParser::new().unwrap();
        assert!(parser
            .read_class("<?php\n\nclass Page\n{\n}\n?>\n<p>Footer</p>\n")
            .is_none());
        assert!(parser
            .read_class("<!-- banner -->\n<?php\n\nclass Page\n{\n}\n")
            .is_none());
    }
}

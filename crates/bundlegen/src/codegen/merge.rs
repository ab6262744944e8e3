//! Idempotent insertion of generated methods into a class.
//!
//! A candidate is compared against every method already in the class by
//! structural fingerprint, so a getter that exists under any name, with any
//! formatting or comments, is not added twice. A candidate that is new but
//! whose name is taken gets the first free numeric suffix.

use crate::codegen::skeleton::ClassSkeleton;
use crate::diagnostic::{ScaffoldError, Span};
use crate::naming::unique_method_name;
use crate::php::{ClassName, ImportSet, MethodDeclaration, PhpParser, Printer};

/// A generated method waiting to be merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCandidate {
    /// What the method was generated for, e.g. the field name.
    pub origin: String,
    pub method: MethodDeclaration,
}

impl MethodCandidate {
    pub fn new(origin: impl Into<String>, method: MethodDeclaration) -> Self {
        Self {
            origin: origin.into(),
            method,
        }
    }

    /// Classes that must be importable for the method to print with short names.
    pub fn imports(&self) -> Vec<ClassName> {
        self.method.referenced_classes()
    }
}

/// A candidate left out because an equivalent method exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMethod {
    pub candidate: String,
    /// Name of the equivalent method in the class.
    pub existing: String,
    /// Where the equivalent method is, when it was read from disk.
    pub location: Option<Span>,
}

/// A candidate added under a suffixed name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamedMethod {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Names of the added methods, final names included.
    pub added: Vec<String>,
    pub skipped: Vec<SkippedMethod>,
    pub renamed: Vec<RenamedMethod>,
}

impl MergeReport {
    /// True when the merge added nothing.
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty()
    }
}

/// Merges `candidates` into a copy of `skeleton`, in order.
///
/// The input skeleton is left untouched. Candidates are printed with the
/// imports they would get in the target file and fingerprinted through
/// `parser`, the same way the methods on disk were.
pub fn merge_methods(
    skeleton: &ClassSkeleton,
    candidates: &[MethodCandidate],
    parser: &mut PhpParser,
) -> Result<(ClassSkeleton, MergeReport), ScaffoldError> {
    let mut merged = skeleton.clone();
    let mut report = MergeReport::default();
    let class_name = skeleton.name().to_string();

    let mut known: Vec<(u64, String, Option<Span>)> = skeleton
        .existing_methods
        .iter()
        .map(|m| (m.fingerprint, m.name.clone(), Some(m.span)))
        .collect();
    for method in &skeleton.methods {
        let fingerprint = fingerprint_with(parser, &merged.imports, method)?;
        known.push((fingerprint, method.name.clone(), None));
    }
    let mut taken = merged.taken_method_names();

    for candidate in candidates {
        let mut imports = merged.imports.clone();
        for class in candidate.imports() {
            imports.add(&class, &class_name);
        }

        let fingerprint = fingerprint_with(parser, &imports, &candidate.method)?;
        if let Some((_, existing, location)) = known.iter().find(|(fp, _, _)| *fp == fingerprint) {
            tracing::debug!(
                origin = %candidate.origin,
                method = %candidate.method.name,
                existing = %existing,
                "equivalent method exists"
            );
            report.skipped.push(SkippedMethod {
                candidate: candidate.method.name.clone(),
                existing: existing.clone(),
                location: *location,
            });
            continue;
        }

        let mut method = candidate.method.clone();
        let name = unique_method_name(&method.name, &taken);
        if name != method.name {
            tracing::debug!(from = %method.name, to = %name, "method name taken");
            report.renamed.push(RenamedMethod {
                from: method.name.clone(),
                to: name.clone(),
            });
            method.name = name;
        }

        tracing::debug!(origin = %candidate.origin, method = %method.name, "adding method");
        taken.insert(method.name.to_lowercase());
        known.push((fingerprint, method.name.clone(), None));
        report.added.push(method.name.clone());
        merged.imports = imports;
        merged.methods.push(method);
    }

    Ok((merged, report))
}

fn fingerprint_with(
    parser: &mut PhpParser,
    imports: &ImportSet,
    method: &MethodDeclaration,
) -> Result<u64, ScaffoldError> {
    let source = Printer::new(imports).method(method, 1);
    parser
        .fingerprint_method(&source)
        .ok_or_else(|| ScaffoldError::UnparsableCandidate {
            method: method.name.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::php::{Expr, PhpType, Stmt};

    const ARTICLE: &str = "<?php\n\nnamespace Drupal\\my_module\\Entity\\Node;\n\nuse Drupal\\node\\Entity\\Node;\n\nclass Article extends Node\n{\n    public function subtitle(): ?string\n    {\n        // Renamed by hand.\n        return $this->get('field_subtitle')->value;\n    }\n\n    public function getFieldTags(): string\n    {\n        return 'custom';\n    }\n}\n";

    fn getter(name: &str, field: &str, value_type: PhpType) -> MethodCandidate {
        let mut method = MethodDeclaration::public(name);
        method.return_type = Some(PhpType::nullable(value_type));
        method.body = vec![Stmt::Return(Some(Expr::field_list(field).prop("value")))];
        MethodCandidate::new(field, method)
    }

    fn existing() -> (ClassSkeleton, PhpParser) {
        let mut parser = PhpParser::new().unwrap();
        let class = parser.read_class(ARTICLE).unwrap();
        (ClassSkeleton::from_existing(class), parser)
    }

    #[test]
    fn test_skips_structurally_equal_methods() {
        let (skeleton, mut parser) = existing();
        let candidates = vec![getter("getFieldSubtitle", "field_subtitle", PhpType::String)];

        let (merged, report) = merge_methods(&skeleton, &candidates, &mut parser).unwrap();
        assert!(report.is_unchanged());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].candidate, "getFieldSubtitle");
        assert_eq!(report.skipped[0].existing, "subtitle");
        assert_eq!(report.skipped[0].location.map(|span| span.to_string()).as_deref(), Some("9:5"));
        assert!(merged.methods.is_empty());
    }

    #[test]
    fn test_renames_on_collision() {
        let (skeleton, mut parser) = existing();
        let mut tags = MethodDeclaration::public("getFieldTags");
        tags.return_type = Some(PhpType::Array);
        tags.body = vec![Stmt::Return(Some(
            Expr::field_list("field_tags").call("referencedEntities", vec![]),
        ))];
        let candidates = vec![MethodCandidate::new("field_tags", tags)];

        let (merged, report) = merge_methods(&skeleton, &candidates, &mut parser).unwrap();
        assert_eq!(report.added, vec!["getFieldTags1".to_string()]);
        assert_eq!(
            report.renamed,
            vec![RenamedMethod {
                from: "getFieldTags".to_string(),
                to: "getFieldTags1".to_string(),
            }]
        );
        assert_eq!(merged.methods[0].name, "getFieldTags1");
        assert!(skeleton.methods.is_empty());
    }

    #[test]
    fn test_skips_duplicates_within_one_batch() {
        let (skeleton, mut parser) = existing();
        let candidates = vec![
            getter("getFieldIntro", "field_intro", PhpType::String),
            getter("getFieldIntro", "field_intro", PhpType::String),
        ];

        let (merged, report) = merge_methods(&skeleton, &candidates, &mut parser).unwrap();
        assert_eq!(report.added, vec!["getFieldIntro".to_string()]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(merged.methods.len(), 1);
    }

    #[test]
    fn test_merging_the_result_again_adds_nothing() {
        let (skeleton, mut parser) = existing();
        let candidates = vec![
            getter("getFieldIntro", "field_intro", PhpType::String),
            getter(
                "getFieldImage",
                "field_image",
                PhpType::class("Drupal\\image\\Plugin\\Field\\FieldType\\ImageItem"),
            ),
        ];

        let (merged, report) = merge_methods(&skeleton, &candidates, &mut parser).unwrap();
        assert_eq!(report.added.len(), 2);
        let source = merged.render();
        assert!(source.contains("use Drupal\\image\\Plugin\\Field\\FieldType\\ImageItem;\n"));

        let reread = ClassSkeleton::from_existing(parser.read_class(&source).unwrap());
        let (_, again) = merge_methods(&reread, &candidates, &mut parser).unwrap();
        assert!(again.is_unchanged());
        assert_eq!(again.skipped.len(), 2);
    }
}

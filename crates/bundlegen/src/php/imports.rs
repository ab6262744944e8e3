//! `use` statements of a PHP file.

use std::collections::BTreeMap;

use super::ast::ClassName;
use crate::naming::to_pascal_case;

/// One `use` import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub class: ClassName,
    pub alias: Option<String>,
}

impl Import {
    /// The name the class goes by inside the file.
    pub fn local_name(&self) -> &str {
        self.alias.as_deref().unwrap_or_else(|| self.class.short_name())
    }

    fn render(&self) -> String {
        match &self.alias {
            Some(alias) if alias != self.class.short_name() => {
                format!("use {} as {};", self.class.as_str(), alias)
            }
            _ => format!("use {};", self.class.as_str()),
        }
    }
}

/// Deduplicated, alphabetically ordered imports of a file.
///
/// Grouped `use A\{B, C}` statements are carried verbatim, but the classes
/// they bring in still count as imported. Function and const imports are
/// carried verbatim only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    namespace: String,
    imports: BTreeMap<String, Import>,
    grouped: BTreeMap<String, Import>,
    verbatim: Vec<String>,
}

impl ImportSet {
    /// Creates an empty set for a file declaring `namespace`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            imports: BTreeMap::new(),
            grouped: BTreeMap::new(),
            verbatim: Vec::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.verbatim.is_empty()
    }

    /// Records an import read from an existing file, keeping its alias.
    pub fn insert_existing(&mut self, class: ClassName, alias: Option<String>) {
        self.imports
            .entry(class.as_str().to_string())
            .or_insert(Import { class, alias });
    }

    /// Records a `use` statement that is kept as written.
    pub fn insert_verbatim(&mut self, statement: impl Into<String>) {
        let statement = statement.into();
        if !self.verbatim.contains(&statement) {
            self.verbatim.push(statement);
        }
    }

    /// Records a grouped `use` statement, kept as written, and the classes it imports.
    pub fn insert_grouped(&mut self, statement: impl Into<String>, members: Vec<(ClassName, Option<String>)>) {
        for (class, alias) in members {
            self.grouped
                .entry(class.as_str().to_string())
                .or_insert(Import { class, alias });
        }
        self.insert_verbatim(statement);
    }

    /// Makes `class` usable in the file and returns the name to refer to it by.
    ///
    /// `reserved` is the short name of the class declared in the file; an
    /// import may not shadow it. Classes of the file's own namespace are not
    /// imported unless their short name is taken.
    pub fn add(&mut self, class: &ClassName, reserved: &str) -> String {
        if let Some(existing) = self.imported(class) {
            return existing.local_name().to_string();
        }

        let short = class.short_name();
        if class.namespace() == self.namespace
            && (short.eq_ignore_ascii_case(reserved) || !self.is_taken(short))
        {
            return short.to_string();
        }

        let local = if self.is_taken(short) || short.eq_ignore_ascii_case(reserved) {
            self.free_alias(class, reserved)
        } else {
            short.to_string()
        };

        let alias = (local != short).then(|| local.clone());
        self.imports.insert(
            class.as_str().to_string(),
            Import {
                class: class.clone(),
                alias,
            },
        );
        local
    }

    /// The name `class` goes by in the file, if it can be referred to unqualified.
    pub fn local_name(&self, class: &ClassName) -> Option<String> {
        if let Some(import) = self.imported(class) {
            return Some(import.local_name().to_string());
        }
        if class.namespace() == self.namespace && !self.is_taken(class.short_name()) {
            return Some(class.short_name().to_string());
        }
        None
    }

    /// Rendered `use` lines, sorted.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.imports.values().map(Import::render).collect();
        lines.extend(self.verbatim.iter().cloned());
        lines.sort_by_key(|line| line.to_lowercase());
        lines.dedup();
        lines
    }

    fn imported(&self, class: &ClassName) -> Option<&Import> {
        self.imports
            .get(class.as_str())
            .or_else(|| self.grouped.get(class.as_str()))
    }

    fn is_taken(&self, local: &str) -> bool {
        self.imports
            .values()
            .chain(self.grouped.values())
            .any(|import| import.local_name().eq_ignore_ascii_case(local))
    }

    fn free_alias(&self, class: &ClassName, reserved: &str) -> String {
        let short = class.short_name();
        let base = if short.eq_ignore_ascii_case(reserved) {
            format!("{}Base", short)
        } else {
            // Drupal\taxonomy\Entity\Term -> TaxonomyTerm
            let module = class
                .as_str()
                .split('\\')
                .find(|segment| *segment != "Drupal" && !segment.is_empty())
                .unwrap_or("");
            format!("{}{}", to_pascal_case(module), short)
        };

        let mut alias = base.clone();
        let mut suffix = 1u32;
        while self.is_taken(&alias) || alias.eq_ignore_ascii_case(reserved) {
            alias = format!("{}{}", base, suffix);
            suffix += 1;
        }
        alias
    }
}

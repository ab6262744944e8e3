//! Naming and capitalization helpers for generated PHP identifiers.

use std::collections::HashSet;

/// Converts a snake_case (or kebab-case, or space separated) name to PascalCase.
pub fn to_pascal_case(s: &str) -> String {
    s.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Converts a PascalCase or camelCase name to snake_case.
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Converts a name to camelCase.
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// Getter name for a field: `field_subtitle` becomes `getFieldSubtitle`.
pub fn getter_name(field_name: &str) -> String {
    format!("get{}", to_pascal_case(field_name))
}

/// Returns `base` when no taken name matches it, else the first free `base1`, `base2`, ...
///
/// `taken` must hold lowercased names: PHP method names are case-insensitive.
pub fn unique_method_name(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(&base.to_lowercase()) {
        return base.to_string();
    }

    let mut suffix = 1u32;
    loop {
        let candidate = format!("{}{}", base, suffix);
        if !taken.contains(&candidate.to_lowercase()) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Last segment of a fully qualified class name.
pub fn short_class_name(fqcn: &str) -> &str {
    fqcn.rsplit('\\').next().unwrap_or(fqcn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_conversions() {
        assert_eq!(to_pascal_case("taxonomy_term"), "TaxonomyTerm");
        assert_eq!(to_pascal_case("blog-post"), "BlogPost");
        assert_eq!(to_snake_case("TaxonomyTerm"), "taxonomy_term");
        assert_eq!(to_camel_case("landing_page"), "landingPage");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn test_getter_name() {
        assert_eq!(getter_name("field_subtitle"), "getFieldSubtitle");
        assert_eq!(getter_name("body"), "getBody");
    }

    #[test]
    fn test_unique_method_name() {
        let mut taken = HashSet::new();
        assert_eq!(unique_method_name("getFoo", &taken), "getFoo");

        taken.insert("getfoo".to_string());
        assert_eq!(unique_method_name("getFoo", &taken), "getFoo1");

        taken.insert("getfoo1".to_string());
        taken.insert("getfoo2".to_string());
        assert_eq!(unique_method_name("getFoo", &taken), "getFoo3");
    }

    #[test]
    fn test_collisions_ignore_case() {
        let taken: HashSet<String> = ["getfieldtags".to_string()].into_iter().collect();
        assert_eq!(unique_method_name("getFieldTags", &taken), "getFieldTags1");
    }

    #[test]
    fn test_short_class_name() {
        assert_eq!(short_class_name("Drupal\\taxonomy\\Entity\\Term"), "Term");
        assert_eq!(short_class_name("DateTimeImmutable"), "DateTimeImmutable");
    }
}

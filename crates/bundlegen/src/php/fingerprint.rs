//! Structural fingerprints of method declarations.
//!
//! A method's canonical form is its parse tree written as nested
//! `(kind leaf-text)` groups. Comments, whitespace, positions and the method's
//! own name never reach the canonical form, so two methods that differ only in
//! those share a fingerprint.

use tree_sitter::Node;
use xxhash_rust::xxh3::xxh3_64;

/// Canonical form of a `method_declaration` node.
pub fn canonical_form(method: Node, source: &[u8]) -> String {
    let name_id = method.child_by_field_name("name").map(|n| n.id());
    let mut output = String::new();
    write_node(method, source, name_id, &mut output);
    output
}

/// XXH3 hash of the canonical form.
pub fn fingerprint(method: Node, source: &[u8]) -> u64 {
    xxh3_64(canonical_form(method, source).as_bytes())
}

fn write_node(node: Node, source: &[u8], skip: Option<usize>, output: &mut String) {
    if node.is_extra() || node.kind() == "comment" || Some(node.id()) == skip {
        return;
    }

    output.push('(');
    output.push_str(node.kind());

    if node.child_count() == 0 {
        output.push(' ');
        output.push_str(node.utf8_text(source).unwrap_or(""));
    } else {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            write_node(child, source, skip, output);
        }
    }

    output.push(')');
}

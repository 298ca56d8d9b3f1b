//! Language-agnostic tree-sitter helpers

use modelgen_core::error::{Error, Result};
use tree_sitter::Node;

/// Convert tree-sitter node to text
pub fn node_to_text(node: Node, source: &str) -> Result<String> {
    node.utf8_text(source.as_bytes())
        .map(|s| s.to_string())
        .map_err(|e| Error::parse("<source>", format!("Failed to convert node to text: {e}")))
}

/// Node text with all whitespace removed (`App . Data` -> `App.Data`)
pub fn compact_text(node: Node, source: &str) -> Result<String> {
    Ok(node_to_text(node, source)?
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect())
}

/// First named child of the given kind
pub fn find_child_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|child| child.kind() == kind);
    found
}

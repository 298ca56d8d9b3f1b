//! C# symbol front-end backed by tree-sitter
//!
//! Walks the top-level structure of a compilation unit once. Type
//! declarations are collected at file level, inside namespaces (nested
//! namespaces included) and inside `#if` branches; bodies of types are not
//! entered. Base lists are read with a tree-sitter query.

#[cfg(test)]
mod tests;

use crate::common::{compact_text, find_child_of_kind};
use crate::{LanguageDescriptor, SymbolInspector};
use modelgen_core::{
    error::{Error, Result},
    DeclarationKind, Inspection, NamespaceScope, TypeDeclaration, TypeDeclarationBuilder,
};
use std::path::Path;
use std::sync::OnceLock;
use streaming_iterator::StreamingIterator;
use tracing::debug;
use tree_sitter::{Node, Parser, Query, QueryCursor};

const NAMESPACE_KINDS: &[&str] = &[
    "namespace_declaration",
    "file_scoped_namespace_declaration",
];

/// Conditional-compilation blocks whose branches may hold declarations
const PREPROCESSOR_KINDS: &[&str] = &["preproc_if", "preproc_elif", "preproc_else"];

/// Each entry of a base list, in the order written
const BASE_TYPES_QUERY_SOURCE: &str = "(base_list (_) @base)";

static BASE_TYPES_QUERY: OnceLock<Option<Query>> = OnceLock::new();

fn base_types_query() -> Option<&'static Query> {
    BASE_TYPES_QUERY
        .get_or_init(|| {
            let language = tree_sitter_c_sharp::LANGUAGE.into();
            Query::new(&language, BASE_TYPES_QUERY_SOURCE).ok()
        })
        .as_ref()
}

inventory::submit! {
    LanguageDescriptor {
        name: "csharp",
        extensions: &["cs"],
        factory: create_csharp_inspector,
    }
}

fn create_csharp_inspector() -> Result<Box<dyn SymbolInspector>> {
    Ok(Box::new(CSharpInspector))
}

/// Symbol inspector for C# source files
#[derive(Debug, Default, Clone, Copy)]
pub struct CSharpInspector;

impl SymbolInspector for CSharpInspector {
    fn inspect(&self, source: &str, file_path: &Path) -> Result<Inspection> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .map_err(|e| Error::parse(file_path.display().to_string(), e.to_string()))?;

        let tree = parser.parse(source, None).ok_or_else(|| {
            Error::parse(
                file_path.display().to_string(),
                "tree-sitter returned no syntax tree",
            )
        })?;
        let root = tree.root_node();

        let mut declarations = Vec::new();
        collect_declarations(root, source, &mut declarations)?;
        let namespace = first_namespace(root, source)?;

        debug!(
            "Inspected {}: {} type declaration(s), namespace {:?}",
            file_path.display(),
            declarations.len(),
            namespace.as_ref().map(|n| n.full_name.as_str())
        );

        Ok(Inspection {
            declarations,
            namespace,
        })
    }
}

/// First namespace among the file's top-level children, in declaration order
fn first_namespace(root: Node, source: &str) -> Result<Option<NamespaceScope>> {
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if !NAMESPACE_KINDS.contains(&child.kind()) {
            continue;
        }
        let Some(name_node) = child.child_by_field_name("name") else {
            continue;
        };
        return Ok(Some(NamespaceScope::new(compact_text(name_node, source)?)));
    }
    Ok(None)
}

fn collect_declarations(
    node: Node,
    source: &str,
    declarations: &mut Vec<TypeDeclaration>,
) -> Result<()> {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if let Some(kind) = declaration_kind(child.kind()) {
            if let Some(declaration) = build_declaration(child, kind, source)? {
                declarations.push(declaration);
            }
        } else if NAMESPACE_KINDS.contains(&child.kind()) {
            // Block-scoped namespaces hold members in a declaration_list body;
            // file-scoped ones may hold them directly.
            match child.child_by_field_name("body") {
                Some(body) => collect_declarations(body, source, declarations)?,
                None => collect_declarations(child, source, declarations)?,
            }
        } else if child.kind() == "declaration_list"
            || PREPROCESSOR_KINDS.contains(&child.kind())
        {
            collect_declarations(child, source, declarations)?;
        }
    }
    Ok(())
}

fn declaration_kind(node_kind: &str) -> Option<DeclarationKind> {
    match node_kind {
        "class_declaration" => Some(DeclarationKind::Class),
        "struct_declaration" => Some(DeclarationKind::Struct),
        "interface_declaration" => Some(DeclarationKind::Interface),
        "record_declaration" | "record_struct_declaration" => Some(DeclarationKind::Record),
        _ => None,
    }
}

fn build_declaration(
    node: Node,
    kind: DeclarationKind,
    source: &str,
) -> Result<Option<TypeDeclaration>> {
    let Some(name_node) = node.child_by_field_name("name") else {
        return Ok(None);
    };
    let name = compact_text(name_node, source)?;
    let base_types = extract_base_types(node, source)?;

    TypeDeclarationBuilder::default()
        .name(name)
        .kind(kind)
        .base_types(base_types)
        .build()
        .map(Some)
        .map_err(|e| Error::parse("<source>", format!("Failed to build TypeDeclaration: {e}")))
}

/// Base types in the order written, e.g. `: DbContext, IDisposable`
fn extract_base_types(node: Node, source: &str) -> Result<Vec<String>> {
    let Some(base_list) = find_child_of_kind(node, "base_list") else {
        return Ok(Vec::new());
    };
    let query = base_types_query()
        .ok_or_else(|| Error::parse("<source>", "Failed to compile base list query"))?;

    let mut bases = Vec::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, base_list, source.as_bytes());
    while let Some(query_match) = matches.next() {
        for capture in query_match.captures {
            let entry = capture.node;
            // record primary constructors pass arguments to the base: `: Base(x)`
            let type_node = match entry.kind() {
                "argument_list" | "comment" => continue,
                "primary_constructor_base_type" => {
                    entry.child_by_field_name("type").unwrap_or(entry)
                }
                _ => entry,
            };
            bases.push(compact_text(type_node, source)?);
        }
    }
    Ok(bases)
}

//! Tree-sitter parser integration for Go.
//!
//! Turns a `.go` file into a [`SourceUnit`]: the raw tree plus the package
//! name and the import alias table the extractor resolves qualified type
//! references against.

use crate::core::SourceUnit;
use crate::errors::StubgenError;
use crate::io;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tree_sitter::{Node, Parser};

pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .context("Failed to set Go language")?;
        Ok(Self { parser })
    }

    pub fn parse_file(&mut self, path: &Path) -> Result<SourceUnit> {
        let content = io::read_file(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        self.parse_source(&content, path)
    }

    /// Parse Go source text into a compilation unit. Files that do not
    /// parse cleanly are rejected outright; extraction never runs over
    /// error nodes.
    pub fn parse_source(&mut self, content: &str, path: &Path) -> Result<SourceUnit> {
        let tree = self
            .parser
            .parse(content, None)
            .context("Failed to parse Go source")?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(StubgenError::Parse {
                path: path.to_path_buf(),
            }
            .into());
        }

        let package_name = package_name(root, content).ok_or(StubgenError::Parse {
            path: path.to_path_buf(),
        })?;
        let imports = import_table(root, content);

        Ok(SourceUnit {
            path: path.to_path_buf(),
            source: content.to_string(),
            tree,
            package_name,
            imports,
        })
    }
}

/// Get text for a tree-sitter node.
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Get the line number for a tree-sitter node (1-indexed).
pub fn node_line(node: &Node) -> usize {
    node.start_position().row + 1
}

fn package_name(root: Node, source: &str) -> Option<String> {
    let mut cursor = root.walk();
    let clause = root
        .named_children(&mut cursor)
        .find(|n| n.kind() == "package_clause")?;
    let mut inner = clause.walk();
    let ident = clause
        .named_children(&mut inner)
        .find(|n| n.kind() == "package_identifier")?;
    Some(node_text(&ident, source).to_string())
}

/// Build the alias table for one file. An import without an explicit alias
/// gets the last path segment; dot and blank imports cannot qualify a type
/// and are skipped.
fn import_table(root: Node, source: &str) -> HashMap<String, String> {
    let mut table = HashMap::new();
    let mut cursor = root.walk();
    for decl in root.named_children(&mut cursor) {
        if decl.kind() != "import_declaration" {
            continue;
        }
        let mut specs = decl.walk();
        for child in decl.named_children(&mut specs) {
            match child.kind() {
                "import_spec" => add_import(child, source, &mut table),
                "import_spec_list" => {
                    let mut list = child.walk();
                    for spec in child.named_children(&mut list) {
                        if spec.kind() == "import_spec" {
                            add_import(spec, source, &mut table);
                        }
                    }
                }
                _ => {}
            }
        }
    }
    table
}

fn add_import(spec: Node, source: &str, table: &mut HashMap<String, String>) {
    let Some(path_node) = spec.child_by_field_name("path") else {
        return;
    };
    let path = node_text(&path_node, source)
        .trim_matches('"')
        .trim_matches('`')
        .to_string();
    let alias = match spec.child_by_field_name("name") {
        Some(name) if name.kind() == "package_identifier" => node_text(&name, source).to_string(),
        Some(_) => return, // dot or blank import
        None => default_alias(&path).to_string(),
    };
    table.insert(alias, path);
}

fn default_alias(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

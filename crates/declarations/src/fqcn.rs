use crate::extractor::DeclarationExtractor;
use crate::grammar::{is_type_declaration, new_parser, node_text};
use tree_sitter::{Node, Parser};

/// Fully-qualified name of the first top-level type, e.g. `com.app.Service`.
///
/// Tolerates syntax errors elsewhere in the file; returns `None` when no type
/// declaration can be found.
#[must_use]
pub fn extract_fqcn(content: &str) -> Option<String> {
    let mut parser = new_parser().ok()?;
    fqcn_with(&mut parser, content)
}

impl DeclarationExtractor {
    /// Same as [`extract_fqcn`], reusing this extractor's parser
    pub fn fqcn(&mut self, content: &str) -> Option<String> {
        fqcn_with(self.parser_mut(), content)
    }
}

fn fqcn_with(parser: &mut Parser, content: &str) -> Option<String> {
    let tree = parser.parse(content, None)?;
    let root = tree.root_node();

    let mut package = None;
    let mut type_name = None;

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "package_declaration" if package.is_none() => package = package_name(content, child),
            kind if is_type_declaration(kind) => {
                type_name = child
                    .child_by_field_name("name")
                    .map(|name| node_text(content, name).to_string());
                if type_name.is_some() {
                    break;
                }
            }
            _ => {}
        }
    }

    let type_name = type_name?;
    Some(match package {
        Some(package) if !package.is_empty() => format!("{package}.{type_name}"),
        _ => type_name,
    })
}

fn package_name(content: &str, node: Node) -> Option<String> {
    let mut cursor = node.walk();
    let name = node
        .named_children(&mut cursor)
        .find(|child| matches!(child.kind(), "scoped_identifier" | "identifier"))?;
    Some(node_text(content, name).split_whitespace().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_package_and_type() {
        assert_eq!(
            extract_fqcn("package com.app.core;\n\npublic final class Service {}").as_deref(),
            Some("com.app.core.Service")
        );
    }

    #[test]
    fn default_package_yields_simple_name() {
        assert_eq!(extract_fqcn("interface Api { void call(); }").as_deref(), Some("Api"));
    }

    #[test]
    fn first_type_wins() {
        let source = "package p;\nrecord Point(int x, int y) {}\nclass Helper {}";
        assert_eq!(extract_fqcn(source).as_deref(), Some("p.Point"));
    }

    #[test]
    fn no_type_yields_none() {
        assert_eq!(extract_fqcn("package only.here;"), None);
        assert_eq!(extract_fqcn(""), None);
    }

    #[test]
    fn extractor_reuses_parser() {
        let mut extractor = DeclarationExtractor::new().unwrap();
        assert_eq!(extractor.fqcn("package a.b; enum E { X }").as_deref(), Some("a.b.E"));
    }
}

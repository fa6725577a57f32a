use crate::error::{DeclarationError, Result};
use tree_sitter::{Node, Parser, Tree};

/// Create a parser bound to the Java grammar
pub(crate) fn new_parser() -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .map_err(|e| DeclarationError::tree_sitter(format!("Failed to set language: {e}")))?;
    Ok(parser)
}

/// Parse `content`, rejecting any tree that contains error or missing nodes.
pub(crate) fn parse_strict(parser: &mut Parser, content: &str) -> Result<Tree> {
    let tree = parser
        .parse(content, None)
        .ok_or_else(|| DeclarationError::tree_sitter("Parser returned no tree"))?;

    let root = tree.root_node();
    if root.has_error() {
        let location = first_error(root)
            .map(|node| {
                let pos = node.start_position();
                format!("syntax error at line {}, column {}", pos.row + 1, pos.column + 1)
            })
            .unwrap_or_else(|| "syntax error".to_string());
        return Err(DeclarationError::unparsable(location));
    }

    Ok(tree)
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// Top-level type declarations the grammar knows about
pub(crate) fn is_type_declaration(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration"
    )
}

/// Text covered by a node
pub(crate) fn node_text<'a>(content: &'a str, node: Node) -> &'a str {
    &content[node.start_byte()..node.end_byte()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_location_of_syntax_error() {
        let mut parser = new_parser().unwrap();
        let err = parse_strict(&mut parser, "class A {\n  void f( {\n}").unwrap_err();
        assert!(err.is_unparsable());
        assert!(err.to_string().contains("line"), "{err}");
    }

    #[test]
    fn accepts_well_formed_source() {
        let mut parser = new_parser().unwrap();
        assert!(parse_strict(&mut parser, "package a; class A { int x; }").is_ok());
    }
}

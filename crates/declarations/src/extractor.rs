use crate::error::Result;
use crate::grammar::{is_type_declaration, new_parser, node_text, parse_strict};
use crate::render::{canonical, is_comment, CanonicalWriter};
use crate::types::{Declaration, DeclarationSnapshot};
use impact_protocol::MemberKind;
use tree_sitter::{Node, Parser};

/// Extracts method, field and type declarations from Java source.
///
/// Holds a tree-sitter parser, which is neither `Sync` nor cheap to share, so callers
/// that work concurrently create one extractor per task.
pub struct DeclarationExtractor {
    parser: Parser,
}

impl DeclarationExtractor {
    /// Create an extractor bound to the Java grammar
    pub fn new() -> Result<Self> {
        Ok(Self {
            parser: new_parser()?,
        })
    }

    /// Build the full member snapshot of one file.
    ///
    /// Fails with `UnparsableSource` if the text contains any syntax error.
    pub fn snapshot(&mut self, content: &str) -> Result<DeclarationSnapshot> {
        let tree = parse_strict(&mut self.parser, content)?;
        let root = tree.root_node();

        let mut snapshot = DeclarationSnapshot::new(content);

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            if is_type_declaration(child.kind()) {
                if let Some(decl) = type_declaration(content, child) {
                    snapshot.insert(decl);
                }
            }
        }

        let mut members = Vec::new();
        collect_members(content, root, &mut members);
        for decl in members {
            snapshot.insert(decl);
        }

        log::trace!("Extracted {} member slots", snapshot.len());
        Ok(snapshot)
    }

    /// Every method of one file in source order, overloads kept apart.
    pub fn methods(&mut self, content: &str) -> Result<Vec<Declaration>> {
        let tree = parse_strict(&mut self.parser, content)?;
        let mut members = Vec::new();
        collect_members(content, tree.root_node(), &mut members);
        members.retain(|decl| decl.kind == MemberKind::Method);
        Ok(members)
    }

    /// Parser access for crate-internal helpers that tolerate errors
    pub(crate) fn parser_mut(&mut self) -> &mut Parser {
        &mut self.parser
    }
}

/// Depth-first walk collecting methods and fields at any nesting level
fn collect_members(content: &str, node: Node, out: &mut Vec<Declaration>) {
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();

    for child in children {
        match child.kind() {
            "method_declaration" => {
                if let Some(decl) = method_declaration(content, child) {
                    out.push(decl);
                }
            }
            "field_declaration" | "constant_declaration" => {
                out.extend(field_declarations(content, child));
            }
            _ => {}
        }
        collect_members(content, child, out);
    }
}

fn method_declaration(content: &str, node: Node) -> Option<Declaration> {
    let name = node_text(content, node.child_by_field_name("name")?).to_string();
    Some(build(
        content,
        node,
        MemberKind::Method,
        name,
        canonical(content, node),
        method_signature(content, node),
    ))
}

/// Modifiers, type parameters, result type, name, parameters and throws clause;
/// annotations and the body are left out.
fn method_signature(content: &str, node: Node) -> String {
    let body = node.child_by_field_name("body").map(|b| b.id());
    let mut writer = CanonicalWriter::default();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if Some(child.id()) == body || child.kind() == ";" {
            continue;
        }
        if child.kind() == "modifiers" {
            let mut inner = child.walk();
            for modifier in child.children(&mut inner) {
                if !matches!(modifier.kind(), "annotation" | "marker_annotation") {
                    writer.push_node(content, modifier);
                }
            }
            continue;
        }
        writer.push_node(content, child);
    }

    writer.finish()
}

/// One declaration per declarator; `int a, b;` yields `a` and `b`, both rendered
/// as the whole statement.
fn field_declarations(content: &str, node: Node) -> Vec<Declaration> {
    let rendering = canonical(content, node);

    let mut cursor = node.walk();
    let declarators: Vec<_> = node.children_by_field_name("declarator", &mut cursor).collect();

    declarators
        .into_iter()
        .filter_map(|declarator| declarator.child_by_field_name("name"))
        .map(|name| {
            build(
                content,
                node,
                MemberKind::Field,
                node_text(content, name).to_string(),
                rendering.clone(),
                rendering.clone(),
            )
        })
        .collect()
}

/// Type slot: the header as signature, and as canonical text the header followed by
/// the body's structure (enum constants, constructors, initializer blocks, annotation
/// elements and nested types rendered the same way).
///
/// Methods and fields are left out since they own slots, so editing one does not also
/// register as a change of its enclosing type.
fn type_declaration(content: &str, node: Node) -> Option<Declaration> {
    let name = node_text(content, node.child_by_field_name("name")?).to_string();

    let mut header = CanonicalWriter::default();
    push_type_header(&mut header, content, node);

    let mut structure = CanonicalWriter::default();
    push_type(&mut structure, content, node);

    Some(build(
        content,
        node,
        MemberKind::Type,
        name,
        structure.finish(),
        header.finish(),
    ))
}

fn push_type_header(writer: &mut CanonicalWriter, content: &str, node: Node) {
    let body_id = node.child_by_field_name("body").map(|b| b.id());
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if Some(child.id()) != body_id {
            writer.push_node(content, child);
        }
    }
}

fn push_type(writer: &mut CanonicalWriter, content: &str, node: Node) {
    push_type_header(writer, content, node);
    let Some(body) = node.child_by_field_name("body") else {
        return;
    };

    let mut constants = Vec::new();
    let mut items = Vec::new();
    collect_body_items(body, &mut constants, &mut items);

    writer.push_token("{");
    for (idx, constant) in constants.iter().enumerate() {
        if idx > 0 {
            writer.push_token(",");
        }
        writer.push_node(content, *constant);
    }
    if !constants.is_empty() && !items.is_empty() {
        writer.push_token(";");
    }
    for item in items {
        if is_type_declaration(item.kind()) {
            push_type(writer, content, item);
        } else {
            writer.push_node(content, item);
        }
    }
    writer.push_token("}");
}

fn collect_body_items<'t>(body: Node<'t>, constants: &mut Vec<Node<'t>>, items: &mut Vec<Node<'t>>) {
    let mut cursor = body.walk();
    for child in body.named_children(&mut cursor) {
        match child.kind() {
            "enum_constant" => constants.push(child),
            "enum_body_declarations" => collect_body_items(child, constants, items),
            "method_declaration" | "field_declaration" | "constant_declaration" => {}
            _ if is_comment(child) => {}
            _ => items.push(child),
        }
    }
}

fn build(
    content: &str,
    node: Node,
    kind: MemberKind,
    name: String,
    canonical: String,
    signature: String,
) -> Declaration {
    Declaration {
        kind,
        name,
        canonical,
        signature,
        source: node_text(content, node).to_string(),
        documentation: javadoc(content, node),
        start_line: node.start_position().row + 1,
        end_line: node.end_position().row + 1,
        overloads: 1,
    }
}

/// Javadoc block immediately preceding a declaration
fn javadoc(content: &str, node: Node) -> Option<String> {
    let prev = node.prev_sibling()?;
    if !is_comment(prev) {
        return None;
    }
    let text = node_text(content, prev);
    text.starts_with("/**").then(|| text.to_string())
}

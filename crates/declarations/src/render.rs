use tree_sitter::Node;

/// Literal nodes emitted verbatim instead of token by token
const ATOMIC_KINDS: &[&str] = &["string_literal", "character_literal", "text_block"];

/// Parents whose `<` / `>` children are generic brackets, not comparisons
const GENERIC_PARENTS: &[&str] = &["type_arguments", "type_parameters"];

const TIGHT_BEFORE: &[&str] = &["(", ")", "[", "]", ".", ",", ";", "::", "..."];
const TIGHT_AFTER: &[&str] = &["(", "[", ".", "@", "::"];

pub(crate) fn is_comment(node: Node) -> bool {
    matches!(node.kind(), "line_comment" | "block_comment")
}

/// Builds a layout-insensitive rendering of syntax nodes.
///
/// Comments are dropped and tokens are re-joined with a fixed spacing rule, so two
/// renderings compare equal whenever the token streams are equal. A call always
/// renders as `name(`, which the caller discovery relies on.
#[derive(Debug, Default)]
pub(crate) struct CanonicalWriter {
    out: String,
    tight_next: bool,
}

impl CanonicalWriter {
    pub(crate) fn push_node(&mut self, content: &str, node: Node) {
        if is_comment(node) {
            return;
        }

        if node.child_count() == 0 || ATOMIC_KINDS.contains(&node.kind()) {
            let generic = node
                .parent()
                .is_some_and(|parent| GENERIC_PARENTS.contains(&parent.kind()))
                && matches!(node.kind(), "<" | ">");
            let token = &content[node.start_byte()..node.end_byte()];
            self.push_token_with(token, generic);
            return;
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.push_node(content, child);
        }
    }

    pub(crate) fn push_token(&mut self, token: &str) {
        self.push_token_with(token, false);
    }

    fn push_token_with(&mut self, token: &str, force_tight: bool) {
        let token = token.trim();
        if token.is_empty() {
            return;
        }

        let tight = force_tight || self.tight_next || TIGHT_BEFORE.contains(&token);
        if !self.out.is_empty() && !tight {
            self.out.push(' ');
        }
        self.out.push_str(token);
        self.tight_next = (force_tight && token == "<") || TIGHT_AFTER.contains(&token);
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

/// Canonical rendering of a single node
pub(crate) fn canonical(content: &str, node: Node) -> String {
    let mut writer = CanonicalWriter::default();
    writer.push_node(content, node);
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::new_parser;

    fn render(code: &str) -> String {
        let mut parser = new_parser().unwrap();
        let tree = parser.parse(code, None).unwrap();
        canonical(code, tree.root_node())
    }

    #[test]
    fn layout_and_comments_do_not_matter() {
        let a = render("class A {\n  // helper\n  int  run( int x ) {\n    return x+1;\n  }\n}");
        let b = render("class A { int run(int x) { /* inline */ return x + 1; } }");
        assert_eq!(a, b);
    }

    #[test]
    fn calls_render_without_space_before_paren() {
        let out = render("class A { void f() { b . foo ( 1, 2 ); } }");
        assert!(out.contains("b.foo(1, 2);"), "{out}");
    }

    #[test]
    fn generics_and_string_literals_are_kept_readable() {
        let out = render("class A { java.util.List<String> names = java.util.List.of(\"a  b\"); }");
        assert!(out.contains("java.util.List<String> names"), "{out}");
        assert!(out.contains("\"a  b\""), "{out}");
    }

    #[test]
    fn annotations_stay_attached() {
        let out = render("class A { @Override public String toString() { return \"\"; } }");
        assert!(out.contains("@Override public String toString()"), "{out}");
    }
}

use impact_declarations::{extract_fqcn, DeclarationExtractor, MemberKind};
use pretty_assertions::assert_eq;

const ORIGINAL: &str = r#"package com.app.data;

import java.util.List;

public class DataService {
    private final int limit = 10;

    public String generateData() {
        return "payload";
    }

    public void otherMethod() {
        System.out.println(generateData());
    }
}
"#;

#[test]
fn snapshot_covers_every_member_kind() {
    let mut extractor = DeclarationExtractor::new().unwrap();
    let snapshot = extractor.snapshot(ORIGINAL).unwrap();

    assert_eq!(snapshot.len(), 4);
    assert_eq!(snapshot.members_of(MemberKind::Method).count(), 2);
    assert_eq!(snapshot.members_of(MemberKind::Field).count(), 1);
    assert_eq!(snapshot.members_of(MemberKind::Type).count(), 1);
    assert_eq!(snapshot.source(), ORIGINAL);

    let generate = snapshot.get(MemberKind::Method, "generateData").unwrap();
    assert_eq!(generate.signature, "public String generateData()");
    assert_eq!((generate.start_line, generate.end_line), (8, 10));
    assert!(generate.source.contains("return \"payload\";"));
}

#[test]
fn formatting_and_comments_do_not_change_canonical_text() {
    let reformatted = r#"package com.app.data;

import java.util.List;

public class DataService
{
    // tuned for the batch size
    private final int limit=10;

    public String generateData( )
    {
        /* cached elsewhere */
        return "payload";
    }

    public void otherMethod() { System.out.println( generateData() ); }
}
"#;

    let mut extractor = DeclarationExtractor::new().unwrap();
    let before = extractor.snapshot(ORIGINAL).unwrap();
    let after = extractor.snapshot(reformatted).unwrap();

    for (key, decl) in before.iter() {
        let other = after.get(key.kind, &key.name).unwrap();
        assert_eq!(decl.canonical, other.canonical, "member {}", key.name);
    }
}

#[test]
fn canonical_text_contains_call_pattern() {
    let mut extractor = DeclarationExtractor::new().unwrap();
    let methods = extractor.methods(ORIGINAL).unwrap();

    let callers: Vec<_> = methods
        .iter()
        .filter(|m| m.canonical.contains("generateData("))
        .map(|m| m.name.as_str())
        .collect();
    // the declaration itself also matches; callers skip the declaring file
    assert_eq!(callers, vec!["generateData", "otherMethod"]);
}

#[test]
fn string_contents_are_not_normalized() {
    let mut extractor = DeclarationExtractor::new().unwrap();
    let a = extractor
        .snapshot("class A { String s() { return \"a b\"; } }")
        .unwrap();
    let b = extractor
        .snapshot("class A { String s() { return \"a  b\"; } }")
        .unwrap();

    assert_ne!(
        a.get(MemberKind::Method, "s").unwrap().canonical,
        b.get(MemberKind::Method, "s").unwrap().canonical
    );
}

#[test]
fn records_and_nested_members_are_collected() {
    let source = r#"package geo;
public record Point(int x, int y) {
    static final Point ORIGIN = new Point(0, 0);
    double length() { return Math.sqrt(x * x + y * y); }
    static class Builder {
        int x;
        Point build() { return new Point(x, 0); }
    }
}
"#;
    let mut extractor = DeclarationExtractor::new().unwrap();
    let snapshot = extractor.snapshot(source).unwrap();

    assert_eq!(
        snapshot.get(MemberKind::Type, "Point").map(|d| d.signature.as_str()),
        Some("public record Point(int x, int y)")
    );
    assert!(snapshot.get(MemberKind::Method, "length").is_some());
    assert!(snapshot.get(MemberKind::Method, "build").is_some());
    assert!(snapshot.get(MemberKind::Field, "ORIGIN").is_some());
    assert!(snapshot.get(MemberKind::Field, "x").is_some());
    assert!(snapshot.get(MemberKind::Type, "Builder").is_none());
    assert_eq!(extract_fqcn(source).as_deref(), Some("geo.Point"));
}

#[test]
fn unparsable_source_is_an_error() {
    let mut extractor = DeclarationExtractor::new().unwrap();
    assert!(extractor.snapshot("class {").unwrap_err().is_unparsable());
    assert!(extractor.methods("class A { void f() { return }").is_err());
}

#[test]
fn empty_file_has_no_members() {
    let mut extractor = DeclarationExtractor::new().unwrap();
    let snapshot = extractor.snapshot("").unwrap();
    assert!(snapshot.is_empty());
}

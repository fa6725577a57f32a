use impact_store::{RepositoryStore, StoreError};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn sample_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "src/main/java/com/app/DataService.java",
        "package com.app;\npublic class DataService { String generateData() { return \"x\"; } }\n",
    );
    write(
        root,
        "src/main/java/com/app/Report.java",
        "package com.app;\nclass Report { void run(DataService s) { s.generateData(); } }\n",
    );
    write(root, "src/main/java/package-info.java", "/** Docs only. */\n");
    write(root, "target/classes/com/app/Stale.java", "package com.app;\nclass Stale {}\n");
    write(root, "README.md", "# not java\n");
    dir
}

#[test]
fn loads_java_sources_keyed_by_fqcn() {
    let dir = sample_repo();
    let mut store = RepositoryStore::new();

    let count = store.load_directory("main", dir.path()).unwrap();
    assert_eq!(count, 3);
    assert_eq!(
        store.file_ids("main"),
        vec!["com.app.DataService", "com.app.Report", "src/main/java/package-info.java"]
    );
    assert!(store
        .file("main", "com.app.Report")
        .unwrap()
        .contains("s.generateData()"));
}

#[test]
fn reload_picks_up_new_files() {
    let dir = sample_repo();
    let mut store = RepositoryStore::new();
    store.load_directory("main", dir.path()).unwrap();

    write(
        dir.path(),
        "src/main/java/com/app/Export.java",
        "package com.app;\nclass Export {}\n",
    );
    assert_eq!(store.reload("main").unwrap(), 4);
    assert!(store.file("main", "com.app.Export").is_some());
}

#[test]
fn missing_directory_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut store = RepositoryStore::new();

    let err = store
        .load_directory("main", dir.path().join("does-not-exist"))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidPath(_)));
    assert!(!store.contains("main"));
}

#[test]
fn directory_and_memory_repositories_merge() {
    let dir = sample_repo();
    let mut store = RepositoryStore::new();
    store.load_directory("main", dir.path()).unwrap();
    store.insert_file("feature", "com.app.Extra", "class Extra {}");

    let corpus = store.merged_corpus(&["main".to_string(), "feature".to_string()]);
    assert_eq!(corpus.len(), 4);
    assert!(corpus.contains_key("com.app.Extra"));
    assert!(corpus.contains_key("com.app.DataService"));
}

use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};

/// Finds Java sources in a checked-out repository (.gitignore aware)
pub(crate) struct JavaScanner {
    root: PathBuf,
}

impl JavaScanner {
    pub(crate) fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub(crate) fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let root = self.root.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true);
        builder.filter_entry(move |entry| !is_ignored_scope(entry.path(), &root));

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    if !entry.file_type().is_some_and(|t| t.is_file()) {
                        continue;
                    }

                    let path = entry.path();
                    if !is_java_file(path) {
                        continue;
                    }

                    if let Ok(meta) = entry.metadata() {
                        if meta.len() > MAX_FILE_SIZE_BYTES {
                            log::debug!(
                                "Skipping large file {} ({} bytes > {})",
                                path.display(),
                                meta.len(),
                                MAX_FILE_SIZE_BYTES
                            );
                            continue;
                        }
                    }

                    files.push(path.to_path_buf());
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        log::info!("Found {} Java files under {}", files.len(), self.root.display());
        files
    }
}

fn is_java_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("java"))
}

fn is_ignored_scope(path: &Path, root: &Path) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    relative.components().any(|component| match component {
        Component::Normal(name) => {
            let lowered = name.to_string_lossy().to_lowercase();
            IGNORED_SCOPES.contains(&lowered.as_str())
        }
        _ => false,
    })
}

/// Build output and tooling directories never holding repository sources
const IGNORED_SCOPES: &[&str] = &["target", "build", "out", "node_modules", ".gradle", ".idea"];

const MAX_FILE_SIZE_BYTES: u64 = 1_048_576; // 1 MB

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_build_output() {
        let root = Path::new("/repo");
        assert!(is_ignored_scope(Path::new("/repo/target/classes/A.java"), root));
        assert!(is_ignored_scope(Path::new("/repo/app/Build/A.java"), root));
        assert!(!is_ignored_scope(Path::new("/repo/src/main/java/A.java"), root));
    }

    #[test]
    fn java_extension_only() {
        assert!(is_java_file(Path::new("A.java")));
        assert!(is_java_file(Path::new("A.JAVA")));
        assert!(!is_java_file(Path::new("A.kt")));
        assert!(!is_java_file(Path::new("java")));
    }
}

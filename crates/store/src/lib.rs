//! # Impact Store
//!
//! In-memory snapshots of repository sources: repository id → file id → text.
//!
//! A store is an explicit value owned by the caller and passed into each analysis
//! run. It can be filled programmatically or by scanning checked-out directories,
//! and refreshed per repository with [`RepositoryStore::reload`] or dropped with
//! [`RepositoryStore::invalidate`].

mod error;
mod scanner;

use impact_declarations::DeclarationExtractor;
use impact_protocol::{Corpus, FileId};
use scanner::JavaScanner;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

pub use error::{Result, StoreError};

#[derive(Debug, Default)]
pub struct RepositoryStore {
    repositories: HashMap<String, Corpus>,
    /// Directories the directory-backed repositories were loaded from
    roots: HashMap<String, PathBuf>,
}

impl RepositoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a repository's files with the given set.
    pub fn insert_repository<I, K, V>(&mut self, repository_id: impl Into<String>, files: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<FileId>,
        V: Into<String>,
    {
        let files: Corpus = files
            .into_iter()
            .map(|(id, text)| (id.into(), text.into()))
            .collect();
        let repository_id = repository_id.into();
        log::debug!("Stored {} files for repository {repository_id}", files.len());
        self.roots.remove(&repository_id);
        self.repositories.insert(repository_id, files);
    }

    /// Add or overwrite one file, creating the repository if needed.
    pub fn insert_file(
        &mut self,
        repository_id: impl Into<String>,
        file_id: impl Into<FileId>,
        text: impl Into<String>,
    ) {
        self.repositories
            .entry(repository_id.into())
            .or_default()
            .insert(file_id.into(), text.into());
    }

    /// Load every `.java` file under `root`, keyed by fully-qualified class name.
    ///
    /// Files without a recognisable top-level type are keyed by their path relative
    /// to `root`. Returns the number of files stored.
    pub fn load_directory(&mut self, repository_id: impl Into<String>, root: impl AsRef<Path>) -> Result<usize> {
        let repository_id = repository_id.into();
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(StoreError::InvalidPath(root.display().to_string()));
        }

        let files = read_sources(root)?;
        let count = files.len();
        log::info!("Loaded {count} files for repository {repository_id} from {}", root.display());

        self.repositories.insert(repository_id.clone(), files);
        self.roots.insert(repository_id, root.to_path_buf());
        Ok(count)
    }

    /// Re-scan the directory a repository was loaded from.
    pub fn reload(&mut self, repository_id: &str) -> Result<usize> {
        let root = self
            .roots
            .get(repository_id)
            .cloned()
            .ok_or_else(|| {
                if self.repositories.contains_key(repository_id) {
                    StoreError::NotDirectoryBacked(repository_id.to_string())
                } else {
                    StoreError::UnknownRepository(repository_id.to_string())
                }
            })?;
        self.load_directory(repository_id, root)
    }

    /// Drop one repository; returns whether it was present.
    pub fn invalidate(&mut self, repository_id: &str) -> bool {
        self.roots.remove(repository_id);
        self.repositories.remove(repository_id).is_some()
    }

    pub fn clear(&mut self) {
        self.repositories.clear();
        self.roots.clear();
    }

    #[must_use]
    pub fn contains(&self, repository_id: &str) -> bool {
        self.repositories.contains_key(repository_id)
    }

    /// Known repository ids, sorted
    #[must_use]
    pub fn repository_ids(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.repositories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    #[must_use]
    pub fn repository(&self, repository_id: &str) -> Option<&Corpus> {
        self.repositories.get(repository_id)
    }

    /// Source text of one file
    #[must_use]
    pub fn file(&self, repository_id: &str, file_id: &str) -> Option<&str> {
        self.repositories
            .get(repository_id)?
            .get(file_id)
            .map(String::as_str)
    }

    /// File ids of one repository, sorted
    #[must_use]
    pub fn file_ids(&self, repository_id: &str) -> Vec<&str> {
        self.repositories
            .get(repository_id)
            .map(|files| files.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Union of several repositories; later ids win on file id collisions.
    ///
    /// Unknown ids are logged and contribute nothing.
    #[must_use]
    pub fn merged_corpus<I, S>(&self, repository_ids: I) -> Corpus
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut corpus = Corpus::new();
        for id in repository_ids {
            let id = id.as_ref();
            let Some(files) = self.repositories.get(id) else {
                log::warn!("Repository {id} is not loaded; skipping");
                continue;
            };
            for (file_id, text) in files {
                if corpus.insert(file_id.clone(), text.clone()).is_some() {
                    log::debug!("{file_id} from {id} overrides an earlier repository");
                }
            }
        }
        corpus
    }
}

fn read_sources(root: &Path) -> Result<Corpus> {
    let mut extractor = DeclarationExtractor::new()?;

    let mut files = BTreeMap::new();
    for path in JavaScanner::new(root).scan() {
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Failed to read {}: {e}", path.display());
                continue;
            }
        };

        let file_id = extractor
            .fqcn(&text)
            .unwrap_or_else(|| relative_id(root, &path));

        if files.contains_key(&file_id) {
            log::warn!("Duplicate file id {file_id} at {}; keeping the first", path.display());
            continue;
        }
        files.insert(file_id, text);
    }
    Ok(files)
}

fn relative_id(root: &Path, path: &Path) -> FileId {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

//! # Artifact Path Resolution

use std::{
    env,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    engine::TokenizerArtifacts,
    errors::{SCResult, SubcorpusError},
};

/// Files or directories whose presence marks a project root.
pub const PROJECT_ROOT_MARKERS: &[&str] = &["Cargo.lock", ".git"];

/// The default corpus file, relative to the [`PathBase`].
pub const DEFAULT_CORPUS_FILE: &str = "textFiles/output.txt";

/// The default tokenizer artifact prefix, relative to the [`PathBase`].
pub const DEFAULT_FILE_PREFIX: &str = "tokenizers/tokenizer";

/// The directory relative layout paths resolve against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathBase {
    /// The process working directory.
    #[default]
    WorkingDirectory,

    /// The nearest ancestor of the working directory holding a
    /// [`PROJECT_ROOT_MARKERS`] entry.
    ProjectRoot,

    /// An explicit directory.
    Directory(PathBuf),
}

impl PathBase {
    /// Resolve the base directory, treating `cwd` as the working directory.
    pub fn resolve_from(
        &self,
        cwd: &Path,
    ) -> SCResult<PathBuf> {
        match self {
            PathBase::WorkingDirectory => Ok(cwd.to_path_buf()),
            PathBase::ProjectRoot => find_project_root(cwd),
            PathBase::Directory(dir) => Ok(cwd.join(dir)),
        }
    }
}

/// Walk up from `start` to the first directory holding a project marker.
///
/// ## Errors
/// [`SubcorpusError::ProjectRootNotFound`] if no ancestor qualifies.
pub fn find_project_root(start: &Path) -> SCResult<PathBuf> {
    start
        .ancestors()
        .find(|dir| PROJECT_ROOT_MARKERS.iter().any(|m| dir.join(m).exists()))
        .map(Path::to_path_buf)
        .ok_or_else(|| SubcorpusError::ProjectRootNotFound {
            start: start.to_path_buf(),
        })
}

/// Where the corpus and tokenizer artifacts live.
///
/// Relative paths resolve against `base`; absolute paths pass through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerLayout {
    /// The directory relative paths resolve against.
    pub base: PathBase,

    /// The corpus text file.
    pub corpus_file: PathBuf,

    /// The artifact prefix; artifacts are ``{prefix}.model`` and ``{prefix}.vocab``.
    pub file_prefix: PathBuf,
}

impl Default for TokenizerLayout {
    fn default() -> Self {
        Self {
            base: PathBase::default(),
            corpus_file: DEFAULT_CORPUS_FILE.into(),
            file_prefix: DEFAULT_FILE_PREFIX.into(),
        }
    }
}

impl TokenizerLayout {
    /// Set the path base.
    pub fn with_base(
        self,
        base: PathBase,
    ) -> Self {
        Self { base, ..self }
    }

    /// Set the corpus file.
    pub fn with_corpus_file<P: Into<PathBuf>>(
        self,
        corpus_file: P,
    ) -> Self {
        Self {
            corpus_file: corpus_file.into(),
            ..self
        }
    }

    /// Set the artifact prefix.
    pub fn with_file_prefix<P: Into<PathBuf>>(
        self,
        file_prefix: P,
    ) -> Self {
        Self {
            file_prefix: file_prefix.into(),
            ..self
        }
    }

    /// Resolve against the process working directory.
    pub fn resolve(&self) -> SCResult<ResolvedLayout> {
        self.resolve_from(&env::current_dir()?)
    }

    /// Resolve, treating `cwd` as the working directory.
    pub fn resolve_from(
        &self,
        cwd: &Path,
    ) -> SCResult<ResolvedLayout> {
        let base = self.base.resolve_from(cwd)?;
        log::debug!("resolved path base {:?} to {}", self.base, base.display());

        Ok(ResolvedLayout::new(
            base.join(&self.corpus_file),
            base.join(&self.file_prefix),
        ))
    }
}

/// A [`TokenizerLayout`] with every path made concrete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLayout {
    /// The corpus text file.
    pub corpus_file: PathBuf,

    /// The artifact prefix.
    pub file_prefix: PathBuf,

    /// ``{prefix}.model``
    pub model_file: PathBuf,

    /// ``{prefix}.vocab``
    pub vocab_file: PathBuf,
}

impl ResolvedLayout {
    /// Build from a corpus file and an artifact prefix.
    pub fn new(
        corpus_file: PathBuf,
        file_prefix: PathBuf,
    ) -> Self {
        let TokenizerArtifacts {
            model_path,
            vocab_path,
        } = TokenizerArtifacts::for_prefix(&file_prefix);
        Self {
            corpus_file,
            file_prefix,
            model_file: model_path,
            vocab_file: vocab_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempdir::TempDir;

    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = TokenizerLayout::default()
            .resolve_from(Path::new("/work"))
            .unwrap();
        assert_eq!(
            layout,
            ResolvedLayout {
                corpus_file: "/work/textFiles/output.txt".into(),
                file_prefix: "/work/tokenizers/tokenizer".into(),
                model_file: "/work/tokenizers/tokenizer.model".into(),
                vocab_file: "/work/tokenizers/tokenizer.vocab".into(),
            }
        );
    }

    #[test]
    fn test_absolute_and_directory_paths() {
        let layout = TokenizerLayout::default()
            .with_base(PathBase::Directory("data".into()))
            .with_corpus_file("/abs/corpus.txt")
            .with_file_prefix("tok/bpe")
            .resolve_from(Path::new("/work"))
            .unwrap();
        assert_eq!(layout.corpus_file, PathBuf::from("/abs/corpus.txt"));
        assert_eq!(layout.model_file, PathBuf::from("/work/data/tok/bpe.model"));
    }

    #[test]
    fn test_project_root() {
        let root = TempDir::new("project_root_test").unwrap();
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        fs::write(root.path().join("Cargo.lock"), "").unwrap();
        assert_eq!(find_project_root(&nested).unwrap(), root.path());

        let layout = TokenizerLayout::default()
            .with_base(PathBase::ProjectRoot)
            .resolve_from(&nested)
            .unwrap();
        assert_eq!(
            layout.corpus_file,
            root.path().join("textFiles").join("output.txt")
        );
    }

    #[test]
    fn test_project_root_not_found() {
        let dir = TempDir::new("no_root_test").unwrap();
        assert!(matches!(
            find_project_root(dir.path()),
            Err(SubcorpusError::ProjectRootNotFound { .. })
        ));
    }

    #[test]
    fn test_layout_serde() {
        let layout: TokenizerLayout =
            serde_json::from_str(r#"{"base": {"directory": "/srv"}, "file_prefix": "m/tok"}"#)
                .unwrap();
        assert_eq!(layout.base, PathBase::Directory("/srv".into()));
        assert_eq!(layout.corpus_file, PathBuf::from(DEFAULT_CORPUS_FILE));
        assert_eq!(layout.file_prefix, PathBuf::from("m/tok"));

        let base: PathBase = serde_json::from_str(r#""project_root""#).unwrap();
        assert_eq!(base, PathBase::ProjectRoot);
    }
}

//! # Cache Path Resolver

use std::{
    env,
    path::{Path, PathBuf},
};

use directories_next::ProjectDirs;

/// Static configuration for cache directory resolution.
pub struct PathResolver {
    /// The qualifier for [`ProjectDirs`].
    pub qualifier: &'static str,

    /// The organization for [`ProjectDirs`].
    pub organization: &'static str,

    /// The application for [`ProjectDirs`].
    pub application: &'static str,

    /// The resolution order for cache directory environment variables.
    pub cache_env_vars: &'static [&'static str],
}

impl PathResolver {
    /// Get the [`ProjectDirs`] for this config.
    pub fn project_dirs(&self) -> Option<ProjectDirs> {
        ProjectDirs::from(self.qualifier, self.organization, self.application)
    }

    /// Resolve the cache directory.
    ///
    /// Resolution Order:
    /// 1. `path`, if present.
    /// 2. ``env[$VAR]`` for each `self.cache_env_vars`; in order.
    /// 3. `self.project_dirs().cache_dir()`, if present.
    /// 4. `None`
    ///
    /// Explicit and environment paths are shell-expanded (`~`, `$VAR`).
    pub fn resolve_cache_dir<P: AsRef<Path>>(
        &self,
        path: Option<P>,
    ) -> anyhow::Result<Option<PathBuf>> {
        if let Some(path) = path.as_ref() {
            return expand_path(path.as_ref()).map(Some);
        }

        for env_var in self.cache_env_vars {
            if let Ok(path) = env::var(env_var) {
                log::debug!("cache dir from ${env_var}: {path}");
                return expand_path(Path::new(&path)).map(Some);
            }
        }

        Ok(self.project_dirs().map(|pds| pds.cache_dir().to_path_buf()))
    }
}

/// Shell-expand a path (``~`` and ``$VAR``).
pub fn expand_path(path: &Path) -> anyhow::Result<PathBuf> {
    let text = path.to_string_lossy();
    Ok(PathBuf::from(shellexpand::full(&text)?.into_owned()))
}

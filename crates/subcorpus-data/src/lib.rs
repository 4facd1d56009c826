//! # subcorpus-data
//!
//! Fetches the raw subtitle dataset into a local cache, and extracts its
//! record column.
#![warn(missing_docs)]

pub mod dataset;
pub mod path_resolver;

pub use dataset::{DatasetCache, DatasetCacheOptions, DatasetSource, read_string_column};
pub use path_resolver::PathResolver;

/// Environment variable key to override the default cache directory.
pub const SUBCORPUS_CACHE_DIR: &str = "SUBCORPUS_CACHE_DIR";

/// Default [`PathResolver`] for subcorpus.
pub const SUBCORPUS_PATH_CONFIG: PathResolver = PathResolver {
    qualifier: "io.github",
    organization: "zspacelabs",
    application: "subcorpus",
    cache_env_vars: &[SUBCORPUS_CACHE_DIR],
};

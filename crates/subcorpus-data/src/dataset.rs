//! # Subtitle Dataset Loader

use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use anyhow::Context;
use arrow::{
    array::{Array, AsArray},
    datatypes::DataType,
};
use downloader::{Download, Downloader};
use parquet::arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder};

use crate::SUBCORPUS_PATH_CONFIG;

/// The upstream dataset URL.
pub static OPEN_SUBTITLES_BASE_URL: &str =
    "https://huggingface.co/datasets/FradSer/OpenSubtitles-en-zh-cn-20m/resolve/main";

/// The upstream dataset file.
pub static OPEN_SUBTITLES_FILE_NAME: &str = "OpenSubtitles-en-zh-cn-20m-v1.parquet";

/// The English text column.
pub static OPEN_SUBTITLES_COLUMN: &str = "source";

/// Where the raw records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSource {
    /// The upstream dataset URL.
    pub base_url: String,

    /// The parquet file name under `base_url`; also the cached file name.
    pub file_name: String,

    /// The string column holding the records.
    pub column: String,
}

impl Default for DatasetSource {
    fn default() -> Self {
        Self {
            base_url: OPEN_SUBTITLES_BASE_URL.to_string(),
            file_name: OPEN_SUBTITLES_FILE_NAME.to_string(),
            column: OPEN_SUBTITLES_COLUMN.to_string(),
        }
    }
}

impl DatasetSource {
    /// Set the base URL.
    pub fn with_base_url<S: Into<String>>(
        self,
        base_url: S,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            ..self
        }
    }

    /// Set the file name.
    pub fn with_file_name<S: Into<String>>(
        self,
        file_name: S,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            ..self
        }
    }

    /// Set the column.
    pub fn with_column<S: Into<String>>(
        self,
        column: S,
    ) -> Self {
        Self {
            column: column.into(),
            ..self
        }
    }

    /// The download URL.
    pub fn url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.file_name
        )
    }
}

/// Options for [`DatasetCache`].
#[derive(Debug, Clone, Default)]
pub struct DatasetCacheOptions {
    /// Optional cache directory; see [`crate::PathResolver::resolve_cache_dir`].
    pub cache_dir: Option<PathBuf>,

    /// The dataset source.
    pub source: DatasetSource,
}

impl DatasetCacheOptions {
    /// Set the cache directory.
    pub fn with_cache_dir<P: AsRef<Path>>(
        self,
        cache_dir: Option<P>,
    ) -> Self {
        Self {
            cache_dir: cache_dir.map(|p| p.as_ref().to_path_buf()),
            ..self
        }
    }

    /// Set the dataset source.
    pub fn with_source(
        self,
        source: DatasetSource,
    ) -> Self {
        Self { source, ..self }
    }
}

/// Download cache for the dataset file.
pub struct DatasetCache {
    cache_dir: PathBuf,
    source: DatasetSource,
    downloader: Downloader,
}

impl DatasetCache {
    /// Construct a cache; creates the cache directory.
    pub fn new(options: DatasetCacheOptions) -> anyhow::Result<Self> {
        let cache_dir = SUBCORPUS_PATH_CONFIG
            .resolve_cache_dir(options.cache_dir.as_ref())?
            .context("failed to resolve cache directory")?
            .join("dataset");

        fs::create_dir_all(&cache_dir)
            .with_context(|| format!("failed to create {}", cache_dir.display()))?;

        let downloader = Downloader::builder().build()?;

        Ok(Self {
            cache_dir,
            source: options.source,
            downloader,
        })
    }

    /// Get the cache directory.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Get the dataset source.
    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    /// The cached dataset path; which may not exist.
    pub fn dataset_path(&self) -> PathBuf {
        self.cache_dir.join(&self.source.file_name)
    }

    /// Is the dataset cached?
    pub fn has_dataset(&self) -> bool {
        self.dataset_path().is_file()
    }

    /// Get the dataset path, downloading it first if needed and allowed.
    ///
    /// # Arguments
    /// * `download` - whether to download the dataset if not cached.
    pub fn load_dataset(
        &mut self,
        download: bool,
    ) -> anyhow::Result<PathBuf> {
        let path = self.dataset_path();
        if path.is_file() {
            log::debug!("dataset cached: {}", path.display());
            return Ok(path);
        }

        if !download {
            anyhow::bail!("cached dataset not found: {}", path.display());
        }

        let url = self.source.url();
        log::info!("downloading {url} to {}", path.display());
        for summary in self
            .downloader
            .download(&[Download::new(&url).file_name(path.as_ref())])?
        {
            summary.with_context(|| format!("failed to download {url}"))?;
        }

        if !path.is_file() {
            anyhow::bail!("download of {url} produced no file");
        }
        Ok(path)
    }

    /// Load the dataset, and read its record column.
    pub fn read_records(
        &mut self,
        download: bool,
    ) -> anyhow::Result<Vec<String>> {
        let path = self.load_dataset(download)?;
        read_string_column(&path, &self.source.column)
    }
}

/// Read every non-null value of a string column from a parquet file.
///
/// Only `column` is decoded; the record batches are released before returning.
/// `Utf8`, `LargeUtf8` and `Utf8View` columns are accepted.
///
/// # Arguments
/// * `path` - the parquet file.
/// * `column` - the top-level column name.
pub fn read_string_column<P: AsRef<Path>>(
    path: P,
    column: &str,
) -> anyhow::Result<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let (index, field) = builder
        .schema()
        .column_with_name(column)
        .with_context(|| format!("column {column:?} not found in {}", path.display()))?;
    log::debug!("reading column {column:?} ({})", field.data_type());

    let mask = ProjectionMask::roots(builder.parquet_schema(), [index]);
    let reader = builder.with_projection(mask).build()?;

    let mut records = Vec::new();
    let mut nulls = 0;
    for batch in reader {
        let batch = batch?;
        let array = batch.column(0);
        nulls += array.null_count();

        match array.data_type() {
            DataType::Utf8 => {
                records.extend(array.as_string::<i32>().iter().flatten().map(str::to_string))
            }
            DataType::LargeUtf8 => {
                records.extend(array.as_string::<i64>().iter().flatten().map(str::to_string))
            }
            DataType::Utf8View => {
                records.extend(array.as_string_view().iter().flatten().map(str::to_string))
            }
            other => anyhow::bail!("column {column:?} is {other}, not a string column"),
        }
    }

    if nulls > 0 {
        log::warn!("skipped {nulls} null values in column {column:?}");
    }
    log::info!("read {} records from {}", records.len(), path.display());
    Ok(records)
}

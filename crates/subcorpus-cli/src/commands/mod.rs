mod prepare;
mod run;
mod tokenizer;

use std::path::PathBuf;

use subcorpus::{
    config::SubcorpusConfig,
    corpus::CorpusWriterOptions,
    lifecycle::{PathBase, ResolvedLayout},
};
use subcorpus_data::{DatasetCache, DatasetCacheOptions, DatasetSource, read_string_column};

/// Subcommands for subcorpus.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Build the corpus file from the dataset.
    Prepare(prepare::PrepareArgs),

    /// Load the tokenizer, or train and save it from the corpus file.
    Tokenizer(tokenizer::TokenizerArgs),

    /// Prepare the corpus, then load or train the tokenizer.
    Run(run::RunArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Prepare(cmd) => cmd.run(),
            Commands::Tokenizer(cmd) => cmd.run(),
            Commands::Run(cmd) => cmd.run(),
        }
    }
}

/// How relative corpus and artifact paths resolve.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PathBaseArg {
    /// The working directory.
    WorkingDirectory,

    /// The nearest ancestor holding `Cargo.lock` or `.git`.
    ProjectRoot,
}

/// Config file and override args.
#[derive(clap::Args, Debug)]
pub struct ConfigArgs {
    /// JSON config file; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path base for relative paths.
    #[arg(long, value_enum)]
    path_base: Option<PathBaseArg>,

    /// Explicit base directory for relative paths.
    #[arg(long, conflicts_with = "path_base")]
    base_dir: Option<PathBuf>,

    /// Corpus file.
    #[arg(long)]
    corpus_file: Option<PathBuf>,

    /// Tokenizer artifact prefix.
    #[arg(long)]
    file_prefix: Option<PathBuf>,
}

impl ConfigArgs {
    /// Load the config file (or defaults), and apply the flag overrides.
    pub fn load_config(&self) -> Result<SubcorpusConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => {
                log::info!("config: {}", path.display());
                SubcorpusConfig::load_json_path(path)?
            }
            None => SubcorpusConfig::default(),
        };

        let layout = &mut config.tokenizer.layout;
        if let Some(base) = self.path_base {
            layout.base = match base {
                PathBaseArg::WorkingDirectory => PathBase::WorkingDirectory,
                PathBaseArg::ProjectRoot => PathBase::ProjectRoot,
            };
        }
        if let Some(dir) = &self.base_dir {
            layout.base = PathBase::Directory(dir.clone());
        }
        if let Some(path) = &self.corpus_file {
            layout.corpus_file = path.clone();
        }
        if let Some(path) = &self.file_prefix {
            layout.file_prefix = path.clone();
        }

        Ok(config)
    }

    /// Resolve the config layout.
    pub fn resolve_layout(
        config: &SubcorpusConfig
    ) -> Result<ResolvedLayout, Box<dyn std::error::Error>> {
        let layout = config.tokenizer.layout.resolve()?;
        log::info!("corpus file: {}", layout.corpus_file.display());
        log::info!("tokenizer prefix: {}", layout.file_prefix.display());
        Ok(layout)
    }
}

/// Corpus selection override args.
#[derive(clap::Args, Debug)]
pub struct CorpusArgs {
    /// Corpus word budget.
    #[arg(long)]
    word_budget: Option<usize>,

    /// Text written between corpus lines (none by default).
    #[arg(long)]
    separator: Option<String>,
}

impl CorpusArgs {
    /// Apply the overrides.
    pub fn apply(
        &self,
        config: &mut SubcorpusConfig,
    ) {
        if let Some(budget) = self.word_budget {
            config.corpus.word_budget = budget;
        }
        if let Some(separator) = &self.separator {
            config.corpus.writer = CorpusWriterOptions::default().with_separator(separator.clone());
        }
    }
}

/// Tokenizer override args.
#[derive(clap::Args, Debug)]
pub struct TrainingArgs {
    /// Vocab size to train.
    #[arg(long)]
    vocab_size: Option<usize>,

    /// Span split regex for training.
    #[arg(long)]
    split_pattern: Option<String>,

    /// Encode the corpus with the ready tokenizer, and report the token count.
    #[arg(long)]
    pub count_tokens: bool,
}

impl TrainingArgs {
    /// Apply the overrides.
    pub fn apply(
        &self,
        config: &mut SubcorpusConfig,
    ) {
        if let Some(vocab_size) = self.vocab_size {
            config.tokenizer.vocab_size = vocab_size;
        }
        if let Some(pattern) = &self.split_pattern {
            config.tokenizer.split_pattern = Some(pattern.clone());
        }
    }
}

/// Dataset source args.
#[derive(clap::Args, Debug)]
pub struct DatasetArgs {
    /// Read this local parquet file instead of the cached dataset.
    #[arg(long)]
    dataset_file: Option<PathBuf>,

    /// Dataset cache directory.
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Record column name.
    #[arg(long)]
    column: Option<String>,

    /// Fail instead of downloading a missing dataset.
    #[arg(long)]
    no_download: bool,
}

impl DatasetArgs {
    /// Read the raw records.
    pub fn read_records(&self) -> Result<Vec<String>, Box<dyn std::error::Error>> {
        let mut source = DatasetSource::default();
        if let Some(column) = &self.column {
            source = source.with_column(column.clone());
        }

        if let Some(path) = &self.dataset_file {
            log::info!("dataset: {}", path.display());
            return Ok(read_string_column(path, &source.column)?);
        }

        let mut cache = DatasetCache::new(
            DatasetCacheOptions::default()
                .with_cache_dir(self.cache_dir.as_ref())
                .with_source(source),
        )?;
        log::info!("dataset: {}", cache.source().url());
        Ok(cache.read_records(!self.no_download)?)
    }
}

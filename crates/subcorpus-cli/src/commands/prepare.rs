use std::path::Path;

use subcorpus::{config::SubcorpusConfig, corpus::CorpusPipeline};

use super::{ConfigArgs, CorpusArgs, DatasetArgs};
use crate::logging::LogArgs;

/// Args for the prepare command.
#[derive(clap::Args, Debug)]
pub struct PrepareArgs {
    #[clap(flatten)]
    pub logging: LogArgs,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub corpus: CorpusArgs,

    #[command(flatten)]
    pub dataset: DatasetArgs,
}

impl PrepareArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging()?;

        let mut config = self.config.load_config()?;
        self.corpus.apply(&mut config);

        let layout = ConfigArgs::resolve_layout(&config)?;
        prepare_corpus(&config, &self.dataset, &layout.corpus_file)
    }
}

/// Read the dataset records, and write the selected corpus to `corpus_file`.
pub fn prepare_corpus(
    config: &SubcorpusConfig,
    dataset: &DatasetArgs,
    corpus_file: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = dataset.read_records()?;

    let pipeline = CorpusPipeline::new(config.corpus.clone());
    let selection = pipeline.select(&records);
    drop(records);

    let bytes = pipeline.write(&selection, corpus_file)?;
    log::info!(
        "corpus: {} lines, {} words, {} -> {}",
        selection.stats.selected_lines,
        selection.stats.selected_words,
        humansize::format_size(bytes, humansize::DECIMAL),
        corpus_file.display()
    );

    Ok(())
}

use super::{
    ConfigArgs,
    CorpusArgs,
    DatasetArgs,
    TrainingArgs,
    prepare::prepare_corpus,
    tokenizer::ready_tokenizer,
};
use crate::logging::LogArgs;

/// Args for the run command.
#[derive(clap::Args, Debug)]
pub struct RunArgs {
    #[clap(flatten)]
    pub logging: LogArgs,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub corpus: CorpusArgs,

    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[command(flatten)]
    pub training: TrainingArgs,

    /// Reuse an existing corpus file instead of rebuilding it.
    #[arg(long)]
    keep_corpus: bool,
}

impl RunArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging()?;

        let mut config = self.config.load_config()?;
        self.corpus.apply(&mut config);
        self.training.apply(&mut config);

        let layout = ConfigArgs::resolve_layout(&config)?;
        if self.keep_corpus && layout.corpus_file.is_file() {
            log::info!("keeping corpus: {}", layout.corpus_file.display());
        } else {
            prepare_corpus(&config, &self.dataset, &layout.corpus_file)?;
        }

        ready_tokenizer(&config, &self.training, layout)
    }
}

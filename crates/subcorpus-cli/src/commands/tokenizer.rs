use subcorpus::{
    config::SubcorpusConfig,
    corpus::{read_corpus_path, split_corpus_text},
    engine::{BasicBpeEngine, TokenizerEngine},
    lifecycle::{ResolvedLayout, TokenizerLifecycle},
};

use super::{ConfigArgs, TrainingArgs};
use crate::logging::LogArgs;

/// Args for the tokenizer command.
#[derive(clap::Args, Debug)]
pub struct TokenizerArgs {
    #[clap(flatten)]
    pub logging: LogArgs,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub training: TrainingArgs,
}

impl TokenizerArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging()?;

        let mut config = self.config.load_config()?;
        self.training.apply(&mut config);

        let layout = ConfigArgs::resolve_layout(&config)?;
        ready_tokenizer(&config, &self.training, layout)
    }
}

/// Load or train the tokenizer for `layout`.
pub fn ready_tokenizer(
    config: &SubcorpusConfig,
    training: &TrainingArgs,
    layout: ResolvedLayout,
) -> Result<(), Box<dyn std::error::Error>> {
    let corpus_file = layout.corpus_file.clone();
    let lifecycle = TokenizerLifecycle::new(config.tokenizer.lifecycle_options(layout));

    let engine = BasicBpeEngine::<u32>::new(config.tokenizer.engine_options())?;
    let handle = lifecycle.get_tokenizer(engine)?;

    log::info!("tokenizer {}:", handle.origin);
    log::info!("  model: {}", handle.artifacts.model_path.display());
    log::info!("  vocab: {}", handle.artifacts.vocab_path.display());
    log::info!("  vocab size: {}", handle.engine.vocab().len());
    for (name, id) in handle.engine.special_tokens().iter() {
        log::info!("  {name}: {id}");
    }

    if training.count_tokens {
        let text = read_corpus_path(&corpus_file)?;
        let mut token_count = 0;
        let mut lines = 0;
        for line in split_corpus_text(&text) {
            token_count += handle.engine.encode(line)?.len();
            lines += 1;
        }
        log::info!(
            "corpus: {lines} lines, {token_count} tokens, {} bytes",
            text.len()
        );
    }

    Ok(())
}

#![allow(missing_docs)]

use std::path::Path;

use subcorpus::{
    corpus::{CorpusOptions, CorpusPipeline, read_corpus_path, split_corpus_text},
    engine::{BasicBpeEngine, TokenizerEngine},
    lifecycle::{
        TokenizerHandle,
        TokenizerLayout,
        TokenizerLifecycle,
        TokenizerLifecycleOptions,
        TokenizerOrigin,
    },
    vocab::ReservedToken,
};
use tempdir::TempDir;

const WORD_BUDGET: usize = 2_000;
const VOCAB_SIZE: usize = 400;

fn records() -> Vec<String> {
    let subjects = ["I", "You", "We", "They", "Nobody"];
    let verbs = ["need", "want", "found", "lost", "remember"];
    let objects = ["the key", "a better plan", "my old friend", "that song"];

    let mut records = vec![
        "...".to_string(),
        "1984 was a year".to_string(),
        "thisisaveryveryverylongword".to_string(),
        "helloThere friend".to_string(),
    ];
    for i in 0..400 {
        records.push(format!(
            "{} {} {}, again!",
            subjects[i % subjects.len()],
            verbs[(i / 5) % verbs.len()],
            objects[(i / 3) % objects.len()],
        ));
    }
    records
}

fn run_pipeline(dir: &Path) -> TokenizerHandle<BasicBpeEngine<u32>> {
    let layout = TokenizerLayout::default().resolve_from(dir).unwrap();

    let pipeline = CorpusPipeline::new(CorpusOptions::default().with_word_budget(WORD_BUDGET));
    let report = pipeline.run(records(), &layout.corpus_file).unwrap();
    assert!(report.stats.selected_words <= WORD_BUDGET);
    assert_eq!(report.stats.rejected_total(), 4);
    assert!(report.stats.budget_exhausted);

    let lifecycle = TokenizerLifecycle::new(
        TokenizerLifecycleOptions::new(layout).with_vocab_size(VOCAB_SIZE),
    );
    lifecycle
        .get_tokenizer(BasicBpeEngine::<u32>::default())
        .unwrap()
}

#[test]
fn test_corpus_file_reconstructs_lines() {
    let dir = TempDir::new("end_to_end").unwrap();
    let layout = TokenizerLayout::default().resolve_from(dir.path()).unwrap();

    let pipeline = CorpusPipeline::new(CorpusOptions::default().with_word_budget(WORD_BUDGET));
    let selection = pipeline.select(records());
    pipeline.write(&selection, &layout.corpus_file).unwrap();

    let text = read_corpus_path(&layout.corpus_file).unwrap();
    assert_eq!(split_corpus_text(&text), selection.lines);
    assert!(selection.lines.iter().all(|l| l.ends_with(" again.")));
}

#[test]
fn test_training_is_reproducible() {
    let first_dir = TempDir::new("end_to_end").unwrap();
    let second_dir = TempDir::new("end_to_end").unwrap();

    let first = run_pipeline(first_dir.path());
    let second = run_pipeline(second_dir.path());

    assert_eq!(first.origin, TokenizerOrigin::Trained);
    assert_eq!(second.origin, TokenizerOrigin::Trained);
    assert_eq!(first.engine.vocab(), second.engine.vocab());
    assert_eq!(first.engine.merges(), second.engine.merges());
    assert_eq!(
        first.engine.special_tokens(),
        second.engine.special_tokens()
    );
}

#[test]
fn test_second_run_loads_the_saved_tokenizer() {
    let dir = TempDir::new("end_to_end").unwrap();

    let trained = run_pipeline(dir.path());
    assert_eq!(trained.origin, TokenizerOrigin::Trained);
    assert_eq!(trained.engine.vocab().len(), VOCAB_SIZE);

    let max_id = trained.engine.vocab().max_token().unwrap();
    let specials = trained.engine.special_tokens();
    assert_eq!(
        specials.get_reserved(ReservedToken::StartOfText),
        Some(max_id + 1)
    );
    assert_eq!(specials.get_reserved(ReservedToken::Unknown), Some(max_id + 4));

    let loaded = run_pipeline(dir.path());
    assert_eq!(loaded.origin, TokenizerOrigin::Loaded);
    assert_eq!(loaded.artifacts, trained.artifacts);
    assert_eq!(loaded.engine.vocab(), trained.engine.vocab());
    assert_eq!(loaded.engine.special_tokens(), trained.engine.special_tokens());

    for text in [
        "We found the key, again?!",
        "Something entirely new.",
        "",
    ] {
        let tokens = loaded.engine.encode(text).unwrap();
        assert_eq!(tokens, trained.engine.encode(text).unwrap());
        assert_eq!(loaded.engine.decode(&tokens).unwrap(), text);
    }
}

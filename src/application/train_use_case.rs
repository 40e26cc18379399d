// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Locate or download the archive   (Layer 4 - data)
//   Step 2: Read the train / test members    (Layer 4 - data)
//   Step 3: Parse stories                    (Layer 4 - data)
//   Step 4: Fit vocabulary + max lengths     (Layer 4 - data)
//   Step 5: Vectorize both splits            (Layer 4 - data)
//   Step 6: Split off validation records     (Layer 4 - data)
//   Step 7: Save config and vectorizer       (Layer 6 - infra)
//   Step 8: Train, validate, test            (Layer 5 - ml)
//   Step 9: Answer a few test questions      (Layer 5 - ml)
//
// Corpus statistics are printed as soon as they are known, since
// training can take a while. The test metrics and demonstrations
// come back as a TrainReport for the CLI layer to print.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::data::{
    archive::{ensure_archive, BabiArchive},
    dataset::QaDataset,
    parser::{filter_by_length, parse_stories},
    splitter::split_train_val,
    vectorizer::Vectorizer,
};
use crate::domain::{
    story::StoryQuery,
    task::{SampleSize, Split, Task},
    traits::StorySource,
};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::MetricsLogger,
    vectorizer_store::VectorizerStore,
};
use crate::ml::{
    inferencer::Inferencer,
    model::RnnQaConfig,
    trainer::{run_training, Evaluation, Splits},
};

// ─── Training Configuration ──────────────────────────────────────────────────
// All settings for a training run. Saved to JSON so inference can
// rebuild the same model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub task:            Task,
    pub sample_size:     SampleSize,
    pub only_supporting: bool,
    pub max_story_len:   Option<usize>,
    pub cache_dir:       String,
    pub archive:         Option<String>,
    pub dataset_url:     String,
    pub checkpoint_dir:  String,
    pub batch_size:      usize,
    pub epochs:          usize,
    pub lr:              f64,
    pub embed_size:      usize,
    pub story_hidden:    usize,
    pub query_hidden:    usize,
    pub dropout:         f64,
    pub val_fraction:    f64,
    pub seed:            u64,
    pub demos:           usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            task:            Task::default(),
            sample_size:     SampleSize::OneK,
            only_supporting: false,
            max_story_len:   None,
            cache_dir:       "data/datasets".to_string(),
            archive:         None,
            dataset_url:     crate::data::archive::DATASET_URL.to_string(),
            checkpoint_dir:  "checkpoints".to_string(),
            batch_size:      32,
            epochs:          20,
            lr:              1e-3,
            embed_size:      50,
            story_hidden:    100,
            query_hidden:    100,
            dropout:         0.3,
            val_fraction:    0.05,
            seed:            42,
            demos:           5,
        }
    }
}

impl TrainConfig {
    /// Burn model config for a vocabulary of `num_classes` (padding included)
    pub fn model_config(&self, num_classes: usize) -> RnnQaConfig {
        RnnQaConfig::new(
            num_classes,
            self.embed_size,
            self.story_hidden,
            self.query_hidden,
            self.dropout,
        )
    }
}

// ─── Report ──────────────────────────────────────────────────────────────────
/// Corpus statistics printed before the training summary
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusStats {
    pub vocab:        Vec<String>,
    pub vocab_size:   usize,
    pub story_maxlen: usize,
    pub query_maxlen: usize,
    pub train:        usize,
    pub val:          usize,
    pub test:         usize,
}

/// One answered test question
#[derive(Debug, Clone)]
pub struct Demo {
    pub story:      String,
    pub question:   String,
    pub expected:   String,
    pub predicted:  String,
    pub confidence: f32,
}

pub struct TrainReport {
    pub test:  Evaluation,
    pub demos: Vec<Demo>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainReport> {
        let cfg = &self.config;

        // ── Steps 1-3: archive → raw text → records ──────────────────────────
        let archive_path = self.archive_path()?;
        let source       = BabiArchive::new(&archive_path, cfg.task, cfg.sample_size);
        tracing::info!(
            "Task #{} {} ({}), only_supporting={}",
            cfg.task.number(), cfg.task, cfg.sample_size, cfg.only_supporting
        );

        let train = load_records(&source, Split::Train, cfg)?;
        let test  = load_records(&source, Split::Test, cfg)?;

        // ── Step 4: vocabulary and max lengths over train + test ─────────────
        let vectorizer = Vectorizer::fit(&train, &test);
        if vectorizer.vocab.is_empty() {
            bail!("No question records left after parsing task {}", cfg.task);
        }
        tracing::info!(
            "Vocab size: {} unique words, story_maxlen={}, query_maxlen={}",
            vectorizer.num_classes(), vectorizer.story_maxlen, vectorizer.query_maxlen
        );

        // ── Step 5: vectorize ────────────────────────────────────────────────
        let train_samples = vectorizer.vectorize_all(&train).context("Vectorizing train split")?;
        let test_samples  = vectorizer.vectorize_all(&test).context("Vectorizing test split")?;

        // ── Step 6: validation split ─────────────────────────────────────────
        let (train_samples, val_samples) = split_train_val(train_samples, cfg.val_fraction, cfg.seed);

        let stats = CorpusStats {
            vocab:        vectorizer.vocab.words().to_vec(),
            vocab_size:   vectorizer.num_classes(),
            story_maxlen: vectorizer.story_maxlen,
            query_maxlen: vectorizer.query_maxlen,
            train:        train_samples.len(),
            val:          val_samples.len(),
            test:         test_samples.len(),
        };
        println!("{}", stats);

        // ── Step 7: persist everything inference needs ───────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir)?;
        ckpt_manager.save_config(cfg)?;
        VectorizerStore::new(&cfg.checkpoint_dir).save(&vectorizer)?;
        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;

        // ── Step 8: train / validate / test ──────────────────────────────────
        let model_cfg = cfg.model_config(vectorizer.num_classes());
        let splits = Splits {
            train: QaDataset::new(train_samples),
            val:   QaDataset::new(val_samples),
            test:  QaDataset::new(test_samples.clone()),
        };
        let (model, test_eval) = run_training(cfg, &model_cfg, splits, &ckpt_manager, &metrics)?;
        tracing::info!("Metrics written to '{}'", metrics.csv_path().display());

        // ── Step 9: demonstrations on the first few test stories ─────────────
        let inferencer = Inferencer::new(model, vectorizer);
        let mut demos  = Vec::with_capacity(cfg.demos);
        for (record, sample) in test.iter().zip(&test_samples).take(cfg.demos) {
            let (predicted, confidence) = inferencer.predict_ids(&sample.story, &sample.query)?;
            demos.push(Demo {
                story:    record.flat_story().join(" "),
                question: record.query.join(" "),
                expected: record.answer.clone(),
                predicted,
                confidence,
            });
        }

        Ok(TrainReport { test: test_eval, demos })
    }

    /// Explicit --archive wins; otherwise use (or fill) the cache.
    fn archive_path(&self) -> Result<PathBuf> {
        match &self.config.archive {
            Some(path) => Ok(PathBuf::from(path)),
            None       => ensure_archive(Path::new(&self.config.cache_dir), &self.config.dataset_url),
        }
    }
}

fn load_records(source: &dyn StorySource, split: Split, cfg: &TrainConfig) -> Result<Vec<StoryQuery>> {
    let text    = source.read_split(split)?;
    let records = parse_stories(&text, cfg.only_supporting)
        .with_context(|| format!("Parsing {} split", split.as_str()))?;
    let records = filter_by_length(records, cfg.max_story_len);
    tracing::info!("Loaded {} {} records", records.len(), split.as_str());
    Ok(records)
}

impl std::fmt::Display for CorpusStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "-")?;
        writeln!(f, "Vocab: {:?}", self.vocab)?;
        writeln!(f, "Vocab size: {} unique words", self.vocab_size)?;
        writeln!(f, "Story max length: {} words", self.story_maxlen)?;
        writeln!(f, "Query max length: {} words", self.query_maxlen)?;
        writeln!(f, "Number of training stories: {}", self.train)?;
        writeln!(f, "Number of validation stories: {}", self.val)?;
        writeln!(f, "Number of test stories: {}", self.test)?;
        writeln!(f, "-")?;
        writeln!(f, "stories_train shape: [{}, {}]", self.train, self.story_maxlen)?;
        writeln!(f, "queries_train shape: [{}, {}]", self.train, self.query_maxlen)?;
        writeln!(f, "answers_train shape: [{}, {}]", self.train, self.vocab_size)?;
        writeln!(f, "stories_test shape:  [{}, {}]", self.test, self.story_maxlen)?;
        writeln!(f, "queries_test shape:  [{}, {}]", self.test, self.query_maxlen)?;
        write!(f,   "answers_test shape:  [{}, {}]", self.test, self.vocab_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct InMemory {
        train: &'static str,
        test:  &'static str,
    }

    impl StorySource for InMemory {
        fn read_split(&self, split: Split) -> Result<String> {
            Ok(match split {
                Split::Train => self.train,
                Split::Test  => self.test,
            }.to_string())
        }
    }

    const SOURCE: InMemory = InMemory {
        train: "1 Mary went to the garden.\n2 Mary went to the kitchen.\n3 Where is Mary?\tkitchen\t2\n",
        test:  "1 John went to the garden.\n2 Where is John?\tgarden\t1\n",
    };

    #[test]
    fn test_load_records_applies_mode_and_length_filter() {
        let cfg = TrainConfig { only_supporting: true, ..TrainConfig::default() };
        let records = load_records(&SOURCE, Split::Train, &cfg).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].story.len(), 1);

        let cfg = TrainConfig { max_story_len: Some(5), ..TrainConfig::default() };
        assert!(load_records(&SOURCE, Split::Train, &cfg).unwrap().is_empty());
    }

    #[test]
    fn test_model_config_uses_padding_inclusive_classes() {
        let cfg   = TrainConfig::default();
        let model = cfg.model_config(37);
        assert_eq!(model.num_classes, 37);
        assert_eq!(model.embed_size, 50);
        assert_eq!(model.story_hidden, 100);
        assert_eq!(model.query_hidden, 100);
    }

    #[test]
    fn test_stats_display_lists_shapes() {
        let stats = CorpusStats {
            vocab: vec![".".to_string(), "Mary".to_string()],
            vocab_size: 36, story_maxlen: 552, query_maxlen: 5,
            train: 950, val: 50, test: 1000,
        };
        let text = stats.to_string();
        assert!(text.contains(r#"Vocab: [".", "Mary"]"#));
        assert!(text.contains("Vocab size: 36 unique words"));
        assert!(text.contains("stories_train shape: [950, 552]"));
        assert!(text.contains("answers_test shape:  [1000, 36]"));
    }
}

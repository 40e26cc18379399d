// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `ask`, and all their
// flags. Every default matches the classic bAbI RNN setup, so a
// bare `train` reproduces it.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;
use crate::domain::task::{SampleSize, Task};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the RNN on one bAbI task and evaluate it on the test split
    Train(TrainArgs),

    /// Answer a question about a story using a trained checkpoint
    Ask(AskArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// bAbI task: a number 1-20, "qa2" or a name like "two-supporting-facts"
    #[arg(long, default_value = "2")]
    pub task: Task,

    /// Training set size variant: 1k or 10k
    #[arg(long, default_value = "1k")]
    pub sample_size: SampleSize,

    /// Feed the model only the supporting facts instead of the whole story
    #[arg(long)]
    pub only_supporting: bool,

    /// Keep only stories with fewer tokens than this
    #[arg(long)]
    pub max_story_len: Option<usize>,

    /// Where the downloaded tarball is cached
    #[arg(long, default_value = "data/datasets")]
    pub cache_dir: String,

    /// Use an already downloaded babi_tasks_1-20_v1-2.tar.gz
    #[arg(long)]
    pub archive: Option<String>,

    /// Source URL of the dataset tarball
    #[arg(long, default_value = crate::data::archive::DATASET_URL)]
    pub dataset_url: String,

    /// Directory for checkpoints, config, vectorizer and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 20)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Word embedding size, shared by both encoders
    #[arg(long, default_value_t = 50)]
    pub embed_size: usize,

    /// Hidden size of the story LSTM
    #[arg(long, default_value_t = 100)]
    pub story_hidden: usize,

    /// Hidden size of the query LSTM
    #[arg(long, default_value_t = 100)]
    pub query_hidden: usize,

    #[arg(long, default_value_t = 0.3)]
    pub dropout: f64,

    /// Fraction of training stories held out for validation
    #[arg(long, default_value_t = 0.05)]
    pub val_fraction: f64,

    /// Seed for the validation split and batch shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of test questions to answer after training
    #[arg(long, default_value_t = 5)]
    pub demos: usize,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            task:            a.task,
            sample_size:     a.sample_size,
            only_supporting: a.only_supporting,
            max_story_len:   a.max_story_len,
            cache_dir:       a.cache_dir,
            archive:         a.archive,
            dataset_url:     a.dataset_url,
            checkpoint_dir:  a.checkpoint_dir,
            batch_size:      a.batch_size,
            epochs:          a.epochs,
            lr:              a.lr,
            embed_size:      a.embed_size,
            story_hidden:    a.story_hidden,
            query_hidden:    a.query_hidden,
            dropout:         a.dropout,
            val_fraction:    a.val_fraction,
            seed:            a.seed,
            demos:           a.demos,
        }
    }
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Story text, e.g. "Mary moved to the bathroom. John went to the hallway."
    #[arg(long)]
    pub story: String,

    /// Question about the story, e.g. "Where is Mary?"
    #[arg(long)]
    pub question: String,

    /// Directory where `train` saved its checkpoints
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

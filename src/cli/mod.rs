// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and prints results. All work is
// delegated to Layer 2 (application).
//
//   1. `train` - trains on a bAbI task, prints stats, per-epoch
//                metrics, test accuracy and a few demo answers
//   2. `ask`   - loads a checkpoint and answers one question
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, TrainArgs, AskArgs};

use crate::domain::traits::QuestionAnswerer;

#[derive(Parser, Debug)]
#[command(
    name = "babi-rnn-qa",
    version = "0.1.0",
    about = "Train a two-encoder LSTM on the bAbI tasks, then ask it questions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => run_train(args),
            Commands::Ask(args)   => run_ask(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on bAbI task {}", args.task);

    let use_case = TrainUseCase::new(args.into());
    let report   = use_case.execute()?;

    println!("-");
    println!(
        "Test loss / test accuracy = {:.4} / {:.4} ({} stories)",
        report.test.loss, report.test.accuracy, report.test.samples
    );

    for demo in &report.demos {
        println!("-");
        println!("Story:     {}", demo.story);
        println!("Question:  {}", demo.question);
        println!("Predicted: {} (p={:.3})", demo.predicted, demo.confidence);
        println!("Expected:  {}", demo.expected);
    }

    println!("\nTraining complete. Checkpoint saved.");
    Ok(())
}

fn run_ask(args: AskArgs) -> Result<()> {
    use crate::application::ask_use_case::AskUseCase;

    let use_case: AskUseCase = AskUseCase::new(&args.checkpoint_dir)?;
    tracing::debug!("Model knows {} words", use_case.known_words().len());

    let (answer, confidence) = use_case.answer(&args.story, &args.question)?;
    println!("\nAnswer: {} (p={:.3})", answer, confidence);
    Ok(())
}

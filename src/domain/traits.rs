// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits, so the
// tarball reader can be replaced by any other source of bAbI
// text and the neural answerer by any other strategy.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::task::Split;

// ─── StorySource ──────────────────────────────────────────────────────────────
/// Anything that can hand back the raw text of one task split.
///
/// Implementations:
///   - BabiArchive → reads a member of the bAbI tarball
pub trait StorySource {
    /// Raw line-numbered bAbI text for the requested split
    fn read_split(&self, split: Split) -> Result<String>;
}

// ─── QuestionAnswerer ─────────────────────────────────────────────────────────
/// Any component that can answer a question about a story.
///
/// Implementations:
///   - AskUseCase → uses the trained RNN model
pub trait QuestionAnswerer {
    /// Returns the predicted answer word and its probability
    fn answer(&self, story: &str, question: &str) -> Result<(String, f32)>;
}

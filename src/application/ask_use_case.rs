// ============================================================
// Layer 2 - Ask Use Case
// ============================================================
// Answers one question about a user-supplied story with the
// model saved by `train`:
//   1. Load vectorizer.json, train_config.json and the weights
//   2. Tokenise and vectorize story + question
//   3. Return the most probable answer word
//
// Words the model has never seen are an error rather than being
// dropped silently; the message names the offending word.

use anyhow::Result;
use burn::prelude::Backend;

use crate::domain::traits::QuestionAnswerer;
use crate::infra::{checkpoint::CheckpointManager, vectorizer_store::VectorizerStore};
use crate::ml::inferencer::{InferBackend, Inferencer};

pub struct AskUseCase<B: Backend = InferBackend> {
    inferencer: Inferencer<B>,
}

impl<B: Backend> AskUseCase<B> {
    pub fn new(checkpoint_dir: &str) -> Result<Self> {
        let ckpt       = CheckpointManager::new(checkpoint_dir)?;
        let store      = VectorizerStore::new(checkpoint_dir);
        let inferencer = Inferencer::from_checkpoint(&ckpt, &store)?;
        Ok(Self { inferencer })
    }

    /// Sorted vocabulary the model understands
    pub fn known_words(&self) -> &[String] {
        self.inferencer.vectorizer().vocab.words()
    }
}

impl<B: Backend> QuestionAnswerer for AskUseCase<B> {
    fn answer(&self, story: &str, question: &str) -> Result<(String, f32)> {
        self.inferencer.predict(story, question)
    }
}

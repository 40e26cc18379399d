// ============================================================
// Layer 4 - Vectorizer
// ============================================================
// Converts tokenised records into fixed-size numeric samples.
//
//   story tokens  → vocab indices → left-padded to story_maxlen
//   query tokens  → vocab indices → left-padded to query_maxlen
//   answer word   → one-hot vector of width vocab.len() + 1
//
// Padding goes on the LEFT so the last real token is always the
// final step the LSTM sees:
//
//   maxlen = 6, ids = [4, 9, 2]  →  [0, 0, 0, 4, 9, 2]
//
// A sequence longer than maxlen keeps its LAST maxlen tokens.
// That only happens at inference time, because the max lengths
// are measured over the whole train+test corpus.
//
// Reference: Rust Book §8 (Vectors)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::{dataset::QaSample, tokenizer::tokenize, vocab::{Vocabulary, PAD_INDEX}};
use crate::domain::story::StoryQuery;

/// Everything needed to turn text into model input.
/// Computed once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vectorizer {
    pub vocab:        Vocabulary,
    pub story_maxlen: usize,
    pub query_maxlen: usize,
}

impl Vectorizer {
    /// Build the vocabulary and measure max lengths over train + test.
    pub fn fit(train: &[StoryQuery], test: &[StoryQuery]) -> Self {
        let all = || train.iter().chain(test.iter());

        let vocab        = Vocabulary::build(all());
        let story_maxlen = all().map(StoryQuery::story_len).max().unwrap_or(0);
        let query_maxlen = all().map(|s| s.query.len()).max().unwrap_or(0);

        tracing::debug!(
            "Vectorizer fitted: vocab={} story_maxlen={} query_maxlen={}",
            vocab.len(), story_maxlen, query_maxlen
        );

        Self { vocab, story_maxlen, query_maxlen }
    }

    /// Width of every one-hot answer vector
    pub fn num_classes(&self) -> usize {
        self.vocab.size_with_padding()
    }

    /// Vectorize one parsed record.
    pub fn vectorize(&self, sample: &StoryQuery) -> Result<QaSample> {
        let story  = self.indices(sample.story.iter().flat_map(|s| s.tokens.iter()))?;
        let query  = self.indices(sample.query.iter())?;
        let answer = self.one_hot(&sample.answer)?;

        Ok(QaSample {
            story: pad_sequence(&story, self.story_maxlen),
            query: pad_sequence(&query, self.query_maxlen),
            answer,
        })
    }

    /// Vectorize every record, failing on the first unknown word.
    pub fn vectorize_all(&self, samples: &[StoryQuery]) -> Result<Vec<QaSample>> {
        samples
            .iter()
            .enumerate()
            .map(|(i, s)| self.vectorize(s).with_context(|| format!("record {i}")))
            .collect()
    }

    /// Tokenise and encode free story text.
    pub fn encode_story(&self, text: &str) -> Result<Vec<u32>> {
        let ids = self.indices(tokenize(text).iter())?;
        Ok(pad_sequence(&ids, self.story_maxlen))
    }

    /// Tokenise and encode a free question.
    pub fn encode_query(&self, text: &str) -> Result<Vec<u32>> {
        let ids = self.indices(tokenize(text).iter())?;
        Ok(pad_sequence(&ids, self.query_maxlen))
    }

    /// One-hot vector with a single 1.0 at the answer's index
    pub fn one_hot(&self, answer: &str) -> Result<Vec<f32>> {
        let mut y = vec![0.0f32; self.num_classes()];
        y[self.vocab.index(answer)?] = 1.0;
        Ok(y)
    }

    fn indices<'a>(&self, tokens: impl Iterator<Item = &'a String>) -> Result<Vec<u32>> {
        tokens
            .map(|t| self.vocab.index(t).map(|i| i as u32))
            .collect()
    }
}

/// Left-pad with PAD_INDEX (or keep the last `maxlen` ids) so the
/// result is exactly `maxlen` long.
pub fn pad_sequence(ids: &[u32], maxlen: usize) -> Vec<u32> {
    if ids.len() >= maxlen {
        return ids[ids.len() - maxlen..].to_vec();
    }
    let mut out = vec![PAD_INDEX as u32; maxlen - ids.len()];
    out.extend_from_slice(ids);
    out
}

// ============================================================
// Layer 4 - Vocabulary
// ============================================================
// Every distinct token across stories, queries and answers of
// BOTH the train and test splits, sorted, mapped to 1..=N.
//
// Index 0 is never assigned to a word: it is the padding value
// the vectorizer prepends to short sequences. That's why the
// model needs N + 1 output classes.
//
// Sorting makes the mapping deterministic, so the same corpus
// always produces the same indices across runs.
//
// Reference: Rust Book §8 (Hash Maps)

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::domain::story::StoryQuery;

/// Index reserved for padding
pub const PAD_INDEX: usize = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    /// Sorted words; words[i] has index i + 1
    words: Vec<String>,
    /// Reverse lookup built from `words`
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Collect the vocabulary from any number of record sets.
    pub fn build<'a>(samples: impl IntoIterator<Item = &'a StoryQuery>) -> Self {
        let set: BTreeSet<&str> = samples
            .into_iter()
            .flat_map(|s| s.words())
            .collect();
        Self::from(set.into_iter().map(str::to_string).collect::<Vec<_>>())
    }

    /// Number of real words (padding excluded)
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Width of one-hot vectors and model output: words + padding slot
    pub fn size_with_padding(&self) -> usize {
        self.words.len() + 1
    }

    pub fn get(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    /// Index of `word`, or an error naming it
    pub fn index(&self, word: &str) -> Result<usize> {
        self.get(word)
            .ok_or_else(|| anyhow!("word '{word}' is not in the vocabulary"))
    }

    /// Word for an index; `None` for padding or out of range
    pub fn word(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.words.get(i))
            .map(String::as_str)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(mut words: Vec<String>) -> Self {
        words.sort();
        words.dedup();
        let index = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i + 1))
            .collect();
        Self { words, index }
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(v: Vocabulary) -> Self {
        v.words
    }
}

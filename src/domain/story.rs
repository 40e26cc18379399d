// ============================================================
// Layer 3 - Story Domain Types
// ============================================================
// A bAbI file is a sequence of numbered episodes:
//
//   1 Mary moved to the bathroom.
//   2 John went to the hallway.
//   3 Where is Mary? 	bathroom	1
//   4 Daniel went back to the hallway.
//   ...
//
// Narrative lines become Sentences. Lines with tab-separated
// fields are questions, and each one becomes a StoryQuery holding
// the sentences that came before it in the same episode.
//
// Reference: Weston et al. (2015) - Towards AI-Complete QA
//            Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

/// One narrative sentence of an episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// 1-based line number inside its episode
    pub line: usize,

    /// Word and punctuation tokens
    pub tokens: Vec<String>,
}

impl Sentence {
    pub fn new(line: usize, tokens: Vec<String>) -> Self {
        Self { line, tokens }
    }
}

/// A question record together with the story that precedes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryQuery {
    /// Story sentences visible to this question, in order
    pub story: Vec<Sentence>,

    /// Tokenised question
    pub query: Vec<String>,

    /// Single-word answer, verbatim from the dataset
    pub answer: String,

    /// Line numbers of the supporting facts
    pub supporting: Vec<usize>,

    /// Line number of the question itself
    pub line: usize,
}

impl StoryQuery {
    /// All story tokens concatenated into one sequence.
    /// This is what the vectorizer and the model see.
    pub fn flat_story(&self) -> Vec<String> {
        self.story
            .iter()
            .flat_map(|s| s.tokens.iter().cloned())
            .collect()
    }

    /// Number of tokens in the flattened story
    pub fn story_len(&self) -> usize {
        self.story.iter().map(|s| s.tokens.len()).sum()
    }

    /// Every token this record contributes to the vocabulary
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.story
            .iter()
            .flat_map(|s| s.tokens.iter())
            .chain(self.query.iter())
            .map(String::as_str)
            .chain(std::iter::once(self.answer.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split(' ').map(str::to_string).collect()
    }

    fn sample() -> StoryQuery {
        StoryQuery {
            story: vec![
                Sentence::new(1, toks("Mary moved to the bathroom .")),
                Sentence::new(2, toks("John went to the hallway .")),
            ],
            query:      toks("Where is Mary ?"),
            answer:     "bathroom".to_string(),
            supporting: vec![1],
            line:       3,
        }
    }

    #[test]
    fn test_flat_story_concatenates_in_order() {
        let flat = sample().flat_story();
        assert_eq!(flat.len(), 12);
        assert_eq!(flat[0], "Mary");
        assert_eq!(flat[6], "John");
        assert_eq!(sample().story_len(), 12);
    }

    #[test]
    fn test_words_include_query_and_answer() {
        let s     = sample();
        let words: Vec<&str> = s.words().collect();
        assert!(words.contains(&"Where"));
        assert_eq!(words.last(), Some(&"bathroom"));
        assert_eq!(words.len(), 12 + 4 + 1);
    }
}

// ============================================================
// Layer 4 - Tokenizer
// ============================================================
// Splits a sentence into word and punctuation tokens.
//
// The sentence is cut at every run of non-word characters (\W+).
// Both the words AND the separator runs are kept, then every
// fragment is trimmed and empty fragments are dropped:
//
//   "Bob dropped the apple. Where is the apple?"
//    │   │       │   │    │ │     │  │   │    │
//    Bob dropped the apple . Where is the apple ?
//
// So spaces vanish, while punctuation survives as its own token.
// No lowercasing, stemming or locale handling is applied.
//
// Reference: regex crate documentation (Regex::find_iter)

use regex::Regex;
use std::sync::LazyLock;

/// Runs of non-word characters
static SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\W+").expect("separator regex is valid")
});

/// Tokenise a sentence, keeping punctuation as separate tokens.
pub fn tokenize(sentence: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut last   = 0usize;

    for m in SEPARATOR.find_iter(sentence) {
        // The word fragment before this separator run
        push_trimmed(&mut tokens, &sentence[last..m.start()]);
        // The separator run itself (whitespace trims away)
        push_trimmed(&mut tokens, m.as_str());
        last = m.end();
    }

    // Trailing word after the final separator
    push_trimmed(&mut tokens, &sentence[last..]);
    tokens
}

fn push_trimmed(tokens: &mut Vec<String>, fragment: &str) {
    let fragment = fragment.trim();
    if !fragment.is_empty() {
        tokens.push(fragment.to_string());
    }
}

// ============================================================
// Layer 4 - Story Parser
// ============================================================
// Turns raw bAbI text into StoryQuery records.
//
// Every line starts with its number inside the episode:
//
//   1 Mary moved to the bathroom.
//   2 John went to the hallway.
//   3 Where is Mary? \t bathroom \t 1
//
// Rules:
//   - Line number 1 starts a new episode, so the story resets.
//   - A line containing a tab is a question record with three
//     fields: question, answer, supporting-fact line numbers.
//     It emits one StoryQuery and then takes up a slot of its own,
//     so later supporting-fact numbers still line up.
//   - Any other line is a narrative sentence and is appended to
//     the running story.
//
// In "only supporting" mode a question sees just the sentences
// named by its supporting-fact numbers instead of the whole story.
//
// Reference: Weston et al. (2015) - bAbI file format
//            Rust Book §9 (Error Handling)

use anyhow::{anyhow, bail, Context, Result};

use crate::data::tokenizer::tokenize;
use crate::domain::story::{Sentence, StoryQuery};

/// Parse the full text of one bAbI file.
pub fn parse_stories(text: &str, only_supporting: bool) -> Result<Vec<StoryQuery>> {
    // Slot i holds line i + 1 of the current episode.
    // Question lines hold None so indices stay aligned.
    let mut episode: Vec<Option<Sentence>> = Vec::new();
    let mut records = Vec::new();

    for (file_line, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let (id, body) = line
            .split_once(' ')
            .ok_or_else(|| anyhow!("line {}: expected '<id> <text>'", file_line + 1))?;
        let id: usize = id
            .parse()
            .with_context(|| format!("line {}: bad line number '{id}'", file_line + 1))?;

        if id == 1 {
            episode.clear();
        }

        if body.contains('\t') {
            let record = parse_question(id, body, &episode, only_supporting)
                .with_context(|| format!("line {}", file_line + 1))?;
            records.push(record);
            episode.push(None);
        } else {
            episode.push(Some(Sentence::new(id, tokenize(body))));
        }
    }

    tracing::debug!("Parsed {} question records", records.len());
    Ok(records)
}

fn parse_question(
    id:              usize,
    body:            &str,
    episode:         &[Option<Sentence>],
    only_supporting: bool,
) -> Result<StoryQuery> {
    let fields: Vec<&str> = body.split('\t').collect();
    let [question, answer, supporting] = fields.as_slice() else {
        bail!("question record needs 3 tab-separated fields, found {}", fields.len());
    };

    let supporting: Vec<usize> = supporting
        .split_whitespace()
        .map(|s| s.parse::<usize>().with_context(|| format!("bad supporting fact '{s}'")))
        .collect::<Result<_>>()?;

    let story: Vec<Sentence> = if only_supporting {
        let mut picked = Vec::with_capacity(supporting.len());
        for &fact in &supporting {
            if fact == 0 || fact >= id || fact > episode.len() {
                bail!("supporting fact {fact} does not precede question line {id}");
            }
            if let Some(sentence) = &episode[fact - 1] {
                picked.push(sentence.clone());
            }
        }
        picked
    } else {
        episode.iter().flatten().cloned().collect()
    };

    Ok(StoryQuery {
        story,
        query:  tokenize(question),
        answer: answer.trim().to_string(),
        supporting,
        line:   id,
    })
}

/// Keep only records whose flattened story is shorter than `max_story_len`.
/// `None` keeps every record.
pub fn filter_by_length(samples: Vec<StoryQuery>, max_story_len: Option<usize>) -> Vec<StoryQuery> {
    match max_story_len {
        None => samples,
        Some(max) => {
            let before = samples.len();
            let kept: Vec<StoryQuery> = samples
                .into_iter()
                .filter(|s| s.story_len() < max)
                .collect();
            if kept.len() < before {
                tracing::info!(
                    "Dropped {} stories of {} tokens or more",
                    before - kept.len(),
                    max
                );
            }
            kept
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const TWO_FACTS: &str = "\
1 Mary got the milk there.
2 John moved to the bedroom.
3 Sandra went back to the kitchen.
4 Mary travelled to the hallway.
5 Where is the milk?\thallway\t1 4
6 John got the football there.
7 John went to the hallway.
8 Where is the football?\thallway\t6 7
1 Daniel went to the office.
2 Where is Daniel?\toffice\t1
";

    #[test]
    fn test_emits_one_record_per_question() {
        let records = parse_stories(TWO_FACTS, false).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].answer, "hallway");
        assert_eq!(records[0].query, vec!["Where", "is", "the", "milk", "?"]);
        assert_eq!(records[0].supporting, vec![1, 4]);
    }

    #[test]
    fn test_story_accumulates_within_episode() {
        let records = parse_stories(TWO_FACTS, false).unwrap();
        assert_eq!(records[0].story.len(), 4);
        // Second question sees all 6 narrative lines, not the question line
        assert_eq!(records[1].story.len(), 6);
        let lines: Vec<usize> = records[1].story.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![1, 2, 3, 4, 6, 7]);
    }

    #[test]
    fn test_story_only_has_earlier_lines_of_same_episode() {
        let records = parse_stories(TWO_FACTS, false).unwrap();
        for r in &records {
            assert!(r.story.iter().all(|s| s.line < r.line));
        }
        // New episode resets the story
        assert_eq!(records[2].story.len(), 1);
        assert_eq!(records[2].flat_story(), vec!["Daniel", "went", "to", "the", "office", "."]);
    }

    #[test]
    fn test_only_supporting_keeps_referenced_sentences() {
        let records = parse_stories(TWO_FACTS, true).unwrap();
        let lines: Vec<usize> = records[0].story.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![1, 4]);
        let lines: Vec<usize> = records[1].story.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![6, 7]);
    }

    #[test]
    fn test_supporting_fact_pointing_forward_is_an_error() {
        let text = "1 Mary went home.\n2 Where is Mary?\thome\t3\n";
        assert!(parse_stories(text, true).is_err());
        // Full-story mode never looks at supporting facts
        assert!(parse_stories(text, false).is_ok());
    }

    #[test]
    fn test_malformed_lines_are_errors() {
        assert!(parse_stories("Mary went home.\n", false).is_err());
        assert!(parse_stories("1 Where is Mary?\thome\n", false).is_err());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let text = "1 Mary went home.\n\n2 Where is Mary?\thome\t1\n\n";
        assert_eq!(parse_stories(text, false).unwrap().len(), 1);
    }

    #[test]
    fn test_filter_by_length() {
        let records = parse_stories(TWO_FACTS, false).unwrap();
        assert_eq!(filter_by_length(records.clone(), None).len(), 3);
        // Only the single-sentence Daniel story is under 7 tokens
        let kept = filter_by_length(records, Some(7));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].answer, "office");
    }

    #[test]
    fn test_filter_drops_story_at_the_limit() {
        let records = parse_stories("1 Daniel went to the office.\n2 Where is Daniel?\toffice\t1\n", false).unwrap();
        assert_eq!(records[0].story_len(), 6);
        assert!(filter_by_length(records.clone(), Some(6)).is_empty());
        assert_eq!(filter_by_length(records, Some(7)).len(), 1);
    }
}

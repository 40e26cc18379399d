// ============================================================
// Layer 6 - Vectorizer Store
// ============================================================
// Persists the fitted Vectorizer (vocabulary + max lengths) as
// vectorizer.json next to the checkpoints.
//
// `ask` must map words to exactly the indices the model was
// trained with, and pad to the same lengths. Re-deriving them
// would mean downloading and parsing the dataset again.
//
//   {
//     "vocab": [".", "?", "Daniel", ...],
//     "story_maxlen": 552,
//     "query_maxlen": 5
//   }

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::data::vectorizer::Vectorizer;

pub struct VectorizerStore {
    dir: PathBuf,
}

impl VectorizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self) -> PathBuf {
        self.dir.join("vectorizer.json")
    }

    pub fn save(&self, vectorizer: &Vectorizer) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create directory '{}'", self.dir.display()))?;
        let path = self.path();
        fs::write(&path, serde_json::to_string_pretty(vectorizer)?)
            .with_context(|| format!("Cannot write vectorizer to '{}'", path.display()))?;

        tracing::info!(
            "Vectorizer saved ({} words) to '{}'",
            vectorizer.vocab.len(),
            path.display()
        );
        Ok(())
    }

    pub fn load(&self) -> Result<Vectorizer> {
        let path = self.path();
        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!("Cannot read '{}'. Have you run 'train' first?", path.display())
            })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Corrupt vectorizer file '{}'", path.display()))
    }
}

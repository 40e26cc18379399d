// ============================================================
// Layer 5 - Inferencer
// ============================================================
use anyhow::{anyhow, Result};
use burn::{prelude::*, tensor::TensorData};

use crate::data::vectorizer::Vectorizer;
use crate::infra::{checkpoint::CheckpointManager, vectorizer_store::VectorizerStore};
use crate::ml::model::RnnQaModel;

pub type InferBackend = burn::backend::Wgpu;

pub struct Inferencer<B: Backend = InferBackend> {
    model:      RnnQaModel<B>,
    vectorizer: Vectorizer,
    device:     B::Device,
}

impl<B: Backend> Inferencer<B> {
    /// Wrap a model that is already in memory (e.g. straight after training)
    pub fn new(model: RnnQaModel<B>, vectorizer: Vectorizer) -> Self {
        Self { model, vectorizer, device: Default::default() }
    }

    /// Rebuild the model from train_config.json and load the latest weights.
    pub fn from_checkpoint(
        ckpt_manager: &CheckpointManager,
        store:        &VectorizerStore,
    ) -> Result<Self> {
        let device     = B::Device::default();
        let vectorizer = store.load()?;
        let cfg        = ckpt_manager.load_config()?;

        // Dropout is a no-op without autodiff, so the training config can be reused
        let model_cfg = cfg.model_config(vectorizer.num_classes());
        let model: RnnQaModel<B> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Model loaded from checkpoint");

        Ok(Self { model, vectorizer, device })
    }

    pub fn vectorizer(&self) -> &Vectorizer {
        &self.vectorizer
    }

    /// Answer a free-text question about a free-text story.
    /// Unknown words are an error.
    pub fn predict(&self, story: &str, question: &str) -> Result<(String, f32)> {
        let story_ids = self.vectorizer.encode_story(story)?;
        let query_ids = self.vectorizer.encode_query(question)?;
        self.predict_ids(&story_ids, &query_ids)
    }

    /// Answer from already padded index sequences.
    pub fn predict_ids(&self, story_ids: &[u32], query_ids: &[u32]) -> Result<(String, f32)> {
        let to_tensor = |ids: &[u32]| {
            let flat: Vec<i32> = ids.iter().map(|&x| x as i32).collect();
            Tensor::<B, 2, Int>::from_data(TensorData::new(flat, [1, ids.len()]), &self.device)
        };

        let logits = self.model.forward(to_tensor(story_ids), to_tensor(query_ids));
        let probs: Vec<f32> = burn::tensor::activation::softmax(logits, 1)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read model output: {e:?}"))?;

        // Index 0 is padding, never a real answer
        let (best, confidence) = probs
            .iter()
            .copied()
            .enumerate()
            .skip(1)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or_else(|| anyhow!("Model produced no classes"))?;

        let answer = self
            .vectorizer
            .vocab
            .word(best)
            .ok_or_else(|| anyhow!("Predicted index {best} is outside the vocabulary"))?
            .to_string();

        tracing::debug!("Predicted '{}' (index {}) p={:.4}", answer, best, confidence);
        Ok((answer, confidence))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::parser::parse_stories;
    use crate::ml::model::RnnQaConfig;

    pub(crate) type TestBackend = burn::backend::NdArray;

    const STORIES: &str = "1 Mary moved to the bathroom.\n\
                           2 John went to the hallway.\n\
                           3 Where is Mary?\tbathroom\t1\n";

    pub(crate) fn untrained() -> Inferencer<TestBackend> {
        let records    = parse_stories(STORIES, false).unwrap();
        let vectorizer = Vectorizer::fit(&records, &[]);
        let device     = Default::default();
        let model      = RnnQaConfig::new(vectorizer.num_classes(), 8, 10, 6, 0.0)
            .init::<TestBackend>(&device);
        Inferencer::new(model, vectorizer)
    }

    #[test]
    fn test_predict_ids_returns_a_vocabulary_word() {
        let inferencer = untrained();
        let v          = inferencer.vectorizer().clone();
        let story      = v.encode_story("Mary moved to the bathroom .").unwrap();
        let query      = v.encode_query("Where is Mary ?").unwrap();

        let (answer, p) = inferencer.predict_ids(&story, &query).unwrap();
        assert!(v.vocab.get(&answer).is_some_and(|i| i >= 1));
        assert!(p > 0.0 && p <= 1.0);
    }

    #[test]
    fn test_all_padding_input_never_answers_padding() {
        let inferencer = untrained();
        let v          = inferencer.vectorizer();
        let story      = vec![0u32; v.story_maxlen];
        let query      = vec![0u32; v.query_maxlen];

        let (answer, _) = inferencer.predict_ids(&story, &query).unwrap();
        assert!(v.vocab.words().contains(&answer));
    }

    #[test]
    fn test_predict_from_text() {
        let inferencer = untrained();
        let (answer, _) = inferencer
            .predict("John went to the hallway.", "Where is John?")
            .unwrap();
        assert!(inferencer.vectorizer().vocab.words().contains(&answer));
    }

    #[test]
    fn test_predict_rejects_unknown_words() {
        let inferencer = untrained();
        let err = inferencer
            .predict("Sandra journeyed to the garden.", "Where is Sandra?")
            .unwrap_err();
        assert!(format!("{err:#}").contains("Sandra"));
    }
}

// ============================================================
// Layer 4 - Story Batcher
// ============================================================
// Implements Burn's Batcher trait to stack a Vec<QaSample>
// into tensors for one forward pass.
//
//   Input:  N QaSamples (story len S, query len Q, classes V)
//   Output: StoryBatch with
//             stories [N, S]  Int
//             queries [N, Q]  Int
//             answers [N, V]  Float (one-hot)
//
// All sequences are already padded to the same length by the
// Vectorizer, so batching is a flatten + reshape.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::data::dataset::QaSample;

// ─── StoryBatch ───────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct StoryBatch<B: Backend> {
    /// Padded story ids - shape: [batch_size, story_maxlen]
    pub stories: Tensor<B, 2, Int>,

    /// Padded query ids - shape: [batch_size, query_maxlen]
    pub queries: Tensor<B, 2, Int>,

    /// One-hot answers - shape: [batch_size, num_classes]
    pub answers: Tensor<B, 2>,
}

// ─── StoryBatcher ─────────────────────────────────────────────────────────────
/// Stateless; the DataLoader hands in the target device.
#[derive(Clone, Debug, Default)]
pub struct StoryBatcher;

impl StoryBatcher {
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Batcher<B, QaSample, StoryBatch<B>> for StoryBatcher {
    fn batch(&self, items: Vec<QaSample>, device: &B::Device) -> StoryBatch<B> {
        let batch_size  = items.len();
        let story_len   = items[0].story.len();
        let query_len   = items[0].query.len();
        let num_classes = items[0].answer.len();

        // Vec<Vec<u32>> → flat Vec<i32> in row-major order
        let story_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.story.iter().map(|&x| x as i32))
            .collect();

        let query_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.query.iter().map(|&x| x as i32))
            .collect();

        let answer_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.answer.iter().copied())
            .collect();

        let stories = Tensor::<B, 2, Int>::from_data(
            TensorData::new(story_flat, [batch_size, story_len]), device,
        );
        let queries = Tensor::<B, 2, Int>::from_data(
            TensorData::new(query_flat, [batch_size, query_len]), device,
        );
        let answers = Tensor::<B, 2>::from_data(
            TensorData::new(answer_flat, [batch_size, num_classes]), device,
        );

        StoryBatch { stories, queries, answers }
    }
}

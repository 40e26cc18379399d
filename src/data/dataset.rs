use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One vectorized question record.
/// story and query are left-padded index sequences, answer is one-hot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaSample {
    pub story:  Vec<u32>,
    pub query:  Vec<u32>,
    pub answer: Vec<f32>,
}

pub struct QaDataset {
    samples: Vec<QaSample>,
}

impl QaDataset {
    pub fn new(samples: Vec<QaSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<QaSample> for QaDataset {
    fn get(&self, index: usize) -> Option<QaSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

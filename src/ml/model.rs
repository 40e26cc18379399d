use burn::{
    nn::{
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
        Lstm, LstmConfig,
    },
    prelude::*,
    tensor::activation::log_softmax,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally - do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct RnnQaConfig {
    /// Vocabulary size including the padding slot
    pub num_classes:  usize,
    pub embed_size:   usize,
    pub story_hidden: usize,
    pub query_hidden: usize,
    pub dropout:      f64,
}

impl RnnQaConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> RnnQaModel<B> {
        let story_embedding = EmbeddingConfig::new(self.num_classes, self.embed_size).init(device);
        let query_embedding = EmbeddingConfig::new(self.num_classes, self.embed_size).init(device);
        let query_rnn = LstmConfig::new(self.embed_size, self.query_hidden, true).init(device);
        // Story steps carry their own embedding plus the broadcast query state
        let story_rnn = LstmConfig::new(self.embed_size + self.query_hidden, self.story_hidden, true)
            .init(device);
        let output  = LinearConfig::new(self.story_hidden, self.num_classes).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        RnnQaModel {
            story_embedding, query_embedding,
            query_rnn, story_rnn,
            output, dropout,
        }
    }
}

/// Two-encoder LSTM answer classifier.
///
/// ```text
/// query [B,Q] → embed → LSTM → h_q [B,Hq] → broadcast [B,S,Hq] ─┐
/// story [B,S] → embed [B,S,E] ──────────────────────────── concat [B,S,E+Hq]
///                                                              → LSTM → h [B,Hs]
///                                                              → dropout → dense [B,V]
/// ```
#[derive(Module, Debug)]
pub struct RnnQaModel<B: Backend> {
    pub story_embedding: Embedding<B>,
    pub query_embedding: Embedding<B>,
    pub query_rnn:       Lstm<B>,
    pub story_rnn:       Lstm<B>,
    pub output:          Linear<B>,
    pub dropout:         Dropout,
}

impl<B: Backend> RnnQaModel<B> {
    /// stories: [batch, story_len], queries: [batch, query_len] → logits [batch, num_classes]
    pub fn forward(&self, stories: Tensor<B, 2, Int>, queries: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let [batch_size, story_len] = stories.dims();

        let q = self.dropout.forward(self.query_embedding.forward(queries));
        let (_, q_state) = self.query_rnn.forward(q, None);
        let [_, query_hidden] = q_state.hidden.dims();

        // Final query state repeated at every story step
        let q_seq = q_state.hidden
            .unsqueeze_dim::<3>(1)
            .expand([batch_size, story_len, query_hidden]);

        let s = self.dropout.forward(self.story_embedding.forward(stories));
        let merged = Tensor::cat(vec![s, q_seq], 2);

        let (_, s_state) = self.story_rnn.forward(merged, None);
        let h = self.dropout.forward(s_state.hidden);
        self.output.forward(h)
    }

    /// Categorical cross-entropy against one-hot answers.
    /// Returns (mean loss [1], logits [batch, num_classes]).
    pub fn forward_loss(
        &self,
        stories: Tensor<B, 2, Int>,
        queries: Tensor<B, 2, Int>,
        answers: Tensor<B, 2>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(stories, queries);
        let loss   = categorical_cross_entropy(logits.clone(), answers);
        (loss, logits)
    }
}

/// -mean(sum(one_hot * log_softmax(logits)))
pub fn categorical_cross_entropy<B: Backend>(logits: Tensor<B, 2>, one_hot: Tensor<B, 2>) -> Tensor<B, 1> {
    (log_softmax(logits, 1) * one_hot)
        .sum_dim(1)
        .neg()
        .mean()
}

/// Number of rows whose argmax matches the one-hot argmax
pub fn count_correct<B: Backend>(logits: Tensor<B, 2>, one_hot: Tensor<B, 2>) -> usize {
    // argmax(1) returns shape [batch, 1] - flatten to [batch]
    let predicted = logits.argmax(1).flatten::<1>(0, 1);
    let expected  = one_hot.argmax(1).flatten::<1>(0, 1);
    predicted
        .equal(expected)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::TensorData;

    type TestBackend     = burn::backend::NdArray;
    type TestAutodiff    = burn::backend::Autodiff<TestBackend>;

    fn config() -> RnnQaConfig {
        RnnQaConfig::new(12, 8, 10, 6, 0.0)
    }

    fn inputs<B: Backend>(device: &B::Device) -> (Tensor<B, 2, Int>, Tensor<B, 2, Int>, Tensor<B, 2>) {
        let stories = Tensor::<B, 2, Int>::from_data(
            TensorData::new(vec![0i32, 0, 1, 2, 3, 0, 4, 5, 6, 7], [2, 5]), device,
        );
        let queries = Tensor::<B, 2, Int>::from_data(
            TensorData::new(vec![0i32, 8, 9, 10, 11, 9], [2, 3]), device,
        );
        let mut one_hot = vec![0.0f32; 24];
        one_hot[3]      = 1.0;
        one_hot[12 + 7] = 1.0;
        let answers = Tensor::<B, 2>::from_data(TensorData::new(one_hot, [2, 12]), device);
        (stories, queries, answers)
    }

    #[test]
    fn test_forward_shape() {
        let device = Default::default();
        let model: RnnQaModel<TestBackend> = config().init(&device);
        let (stories, queries, _) = inputs::<TestBackend>(&device);
        assert_eq!(model.forward(stories, queries).dims(), [2, 12]);
    }

    #[test]
    fn test_loss_is_finite_and_backpropagates() {
        let device = Default::default();
        let model: RnnQaModel<TestAutodiff> = config().init(&device);
        let (stories, queries, answers) = inputs::<TestAutodiff>(&device);

        let (loss, logits) = model.forward_loss(stories, queries, answers);
        assert_eq!(logits.dims(), [2, 12]);

        let value: f64 = loss.clone().into_scalar().elem::<f64>();
        assert!(value.is_finite());
        // Near-uniform predictions at init → loss close to ln(12)
        assert!(value > 0.0);

        let grads = loss.backward();
        let embed_grad = model.story_embedding.weight.grad(&grads);
        assert!(embed_grad.is_some());
    }

    #[test]
    fn test_cross_entropy_of_perfect_prediction_is_small() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 2>::from_data(
            TensorData::new(vec![20.0f32, 0.0, 0.0, 0.0, 20.0, 0.0], [2, 3]), &device,
        );
        let one_hot = Tensor::<TestBackend, 2>::from_data(
            TensorData::new(vec![1.0f32, 0.0, 0.0, 0.0, 1.0, 0.0], [2, 3]), &device,
        );
        let loss: f64 = categorical_cross_entropy(logits.clone(), one_hot.clone())
            .into_scalar().elem::<f64>();
        assert!(loss < 1e-3);
        assert_eq!(count_correct(logits, one_hot), 2);
    }
}

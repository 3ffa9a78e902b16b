use burn::{
    module::{Ignored, Param},
    nn::{
        loss::CrossEntropyLossConfig,
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation,
};
use serde::{Deserialize, Serialize};

/// How the word vectors of a sentence are reduced to one vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pooling {
    Avg,
    Max,
}

/// Nonlinearity between the two feed-forward layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Relu,
    Tanh,
}

// Padding positions are pushed this far down before max pooling.
const MASK_FILL: f64 = 1.0e9;

#[derive(Config, Debug)]
pub struct DanConfig {
    pub vocab_size:    usize,
    pub embedding_dim: usize,
    pub hidden_size:   usize,
    #[config(default = 2)]
    pub num_classes:   usize,
    #[config(default = 0.0)]
    pub dropout:       f64,
    #[config(default = "Pooling::Avg")]
    pub pooling:       Pooling,
    #[config(default = "Activation::Relu")]
    pub activation:    Activation,
}

impl DanConfig {
    /// Randomly initialised model. Used as the skeleton that a saved
    /// record is loaded into.
    pub fn init<B: Backend>(&self, device: &B::Device) -> DanModel<B> {
        let embedding = EmbeddingConfig::new(self.vocab_size, self.embedding_dim).init(device);
        self.assemble(embedding, device)
    }

    /// Model whose embedding layer starts from a pretrained row-major
    /// `[vocab_size, embedding_dim]` table.
    pub fn init_with_embeddings<B: Backend>(
        &self,
        weights: &[f32],
        freeze:  bool,
        device:  &B::Device,
    ) -> DanModel<B> {
        let table = Tensor::<B, 1>::from_floats(weights, device)
            .reshape([self.vocab_size, self.embedding_dim]);
        let weight = Param::from_tensor(table).set_require_grad(!freeze);
        self.assemble(Embedding { weight }, device)
    }

    fn assemble<B: Backend>(&self, embedding: Embedding<B>, device: &B::Device) -> DanModel<B> {
        DanModel {
            embedding,
            hidden:     LinearConfig::new(self.embedding_dim, self.hidden_size).init(device),
            output:     LinearConfig::new(self.hidden_size, self.num_classes).init(device),
            dropout:    DropoutConfig::new(self.dropout).init(),
            pooling:    Ignored(self.pooling),
            activation: Ignored(self.activation),
        }
    }
}

/// Deep Averaging Network:
/// embed → pool over real tokens → Linear → activation → dropout → Linear.
#[derive(Module, Debug)]
pub struct DanModel<B: Backend> {
    pub embedding:  Embedding<B>,
    pub hidden:     Linear<B>,
    pub output:     Linear<B>,
    pub dropout:    Dropout,
    pub pooling:    Ignored<Pooling>,
    pub activation: Ignored<Activation>,
}

impl<B: Backend> DanModel<B> {
    /// tokens: [batch, len], mask: [batch, len] → logits: [batch, num_classes]
    pub fn forward(&self, tokens: Tensor<B, 2, Int>, mask: Tensor<B, 2>) -> Tensor<B, 2> {
        let pooled = self.pool(self.embedding.forward(tokens), mask);

        let h = self.hidden.forward(pooled);
        let h = match *self.activation {
            Activation::Relu => activation::relu(h),
            Activation::Tanh => activation::tanh(h),
        };
        self.output.forward(self.dropout.forward(h))
    }

    /// Cross-entropy loss together with the logits it was computed from.
    pub fn forward_loss(
        &self,
        tokens: Tensor<B, 2, Int>,
        mask:   Tensor<B, 2>,
        labels: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(tokens, mask);
        let loss   = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), labels);
        (loss, logits)
    }

    /// embedded: [batch, len, dim], mask: [batch, len] → [batch, dim]
    fn pool(&self, embedded: Tensor<B, 3>, mask: Tensor<B, 2>) -> Tensor<B, 2> {
        let [batch_size, _, dim] = embedded.dims();

        // [batch, 1]; 0 for empty sentences
        let lengths  = mask.clone().sum_dim(1);
        let mask3    = mask.unsqueeze_dim::<3>(2);

        match *self.pooling {
            Pooling::Avg => {
                let summed = (embedded * mask3).sum_dim(1).reshape([batch_size, dim]);
                summed / lengths.clamp_min(1.0)
            }
            Pooling::Max => {
                let shifted = embedded + (mask3 - 1.0) * MASK_FILL;
                let maxed   = shifted.max_dim(1).reshape([batch_size, dim]);
                // empty sentences would otherwise pool to -MASK_FILL
                maxed * lengths.clamp_max(1.0)
            }
        }
    }
}

// ============================================================
// Layer 4 — Sentiment Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<SentimentItem>
// into tensors for the DAN forward pass.
//
// Sentences have different lengths, so each batch is padded
// to its own longest sentence (not a global maximum):
//
//   Input:  N items with lengths l_1 .. l_N
//   Output: tokens [N, L] with L = max(l_i, 1), PAD-filled
//           mask   [N, L] with 1.0 on real tokens, 0.0 on PAD
//
// An empty sentence becomes a single PAD column with mask 0,
// which the model pools to a zero vector.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::SentimentItem;
use crate::data::embeddings::PAD_INDEX;

#[derive(Debug, Clone)]
pub struct SentimentBatch<B: Backend> {
    /// Embedding row ids, shape: [batch_size, max_len]
    pub tokens: Tensor<B, 2, Int>,

    /// 1.0 for real tokens, 0.0 for padding, shape: [batch_size, max_len]
    pub mask: Tensor<B, 2>,

    /// Gold labels, shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

#[derive(Clone, Debug)]
pub struct SentimentBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> SentimentBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<SentimentItem, SentimentBatch<B>> for SentimentBatcher<B> {
    fn batch(&self, items: Vec<SentimentItem>) -> SentimentBatch<B> {
        let batch_size = items.len();
        let max_len    = items
            .iter()
            .map(|i| i.token_ids.len())
            .max()
            .unwrap_or(0)
            .max(1);

        let mut tokens_flat = Vec::with_capacity(batch_size * max_len);
        let mut mask_flat   = Vec::with_capacity(batch_size * max_len);

        for item in &items {
            let len = item.token_ids.len();
            tokens_flat.extend(item.token_ids.iter().map(|&id| id as i32));
            tokens_flat.extend(std::iter::repeat(PAD_INDEX as i32).take(max_len - len));
            mask_flat.extend(std::iter::repeat(1.0f32).take(len));
            mask_flat.extend(std::iter::repeat(0.0f32).take(max_len - len));
        }

        let labels: Vec<i32> = items.iter().map(|i| i.label as i32).collect();

        let tokens = Tensor::<B, 1, Int>::from_ints(tokens_flat.as_slice(), &self.device)
            .reshape([batch_size, max_len]);
        let mask = Tensor::<B, 1>::from_floats(mask_flat.as_slice(), &self.device)
            .reshape([batch_size, max_len]);
        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        SentimentBatch { tokens, mask, labels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn item(ids: &[usize], label: usize) -> SentimentItem {
        SentimentItem { token_ids: ids.to_vec(), label }
    }

    #[test]
    fn test_pads_to_longest_sentence() {
        let batcher = SentimentBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.batch(vec![item(&[5, 6, 7], 1), item(&[8], 0)]);

        assert_eq!(batch.tokens.dims(), [2, 3]);
        assert_eq!(batch.mask.dims(), [2, 3]);

        let tokens: Vec<i64> = batch.tokens.into_data().iter::<i64>().collect();
        assert_eq!(tokens, vec![5, 6, 7, 8, 0, 0]);

        let mask: Vec<f32> = batch.mask.into_data().iter::<f32>().collect();
        assert_eq!(mask, vec![1.0, 1.0, 1.0, 1.0, 0.0, 0.0]);

        let labels: Vec<i64> = batch.labels.into_data().iter::<i64>().collect();
        assert_eq!(labels, vec![1, 0]);
    }

    #[test]
    fn test_empty_sentence_gets_one_masked_column() {
        let batcher = SentimentBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.batch(vec![item(&[], 1)]);

        assert_eq!(batch.tokens.dims(), [1, 1]);
        let mask: Vec<f32> = batch.mask.into_data().iter::<f32>().collect();
        assert_eq!(mask, vec![0.0]);
    }
}

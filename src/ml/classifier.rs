// ============================================================
// Layer 5 — Classifiers
// ============================================================
// The two SentimentClassifier implementations the driver can
// run: a majority-style baseline and the trained DAN.

use std::sync::Arc;

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::{
    batcher::SentimentBatcher,
    dataset::SentimentItem,
    embeddings::UNK_INDEX,
};
use crate::domain::{
    example::{SentimentExample, POSITIVE},
    indexer::Indexer,
    traits::SentimentClassifier,
};
use crate::ml::model::DanModel;

// Sentences per forward pass when predicting many at once
const PREDICT_BATCH: usize = 256;

/// Always predicts the positive class.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrivialSentimentClassifier;

impl SentimentClassifier for TrivialSentimentClassifier {
    fn predict(&self, _ex: &SentimentExample) -> usize {
        POSITIVE
    }
}

/// A trained DAN plus the word indexer its embedding rows follow.
pub struct NeuralSentimentClassifier<B: Backend> {
    model:   DanModel<B>,
    indexer: Arc<Indexer>,
    batcher: SentimentBatcher<B>,
}

impl<B: Backend> NeuralSentimentClassifier<B> {
    pub fn new(model: DanModel<B>, indexer: Arc<Indexer>, device: B::Device) -> Self {
        Self { model, indexer, batcher: SentimentBatcher::new(device) }
    }

    fn to_item(&self, ex: &SentimentExample) -> SentimentItem {
        SentimentItem {
            token_ids: ex
                .words
                .iter()
                .map(|w| self.indexer.index_of(w).unwrap_or(UNK_INDEX))
                .collect(),
            label: ex.label,
        }
    }

    fn predict_batch(&self, exs: &[SentimentExample]) -> Vec<usize> {
        let items  = exs.iter().map(|ex| self.to_item(ex)).collect();
        let batch  = self.batcher.batch(items);
        let logits = self.model.forward(batch.tokens, batch.mask);

        logits
            .argmax(1)
            .into_data()
            .iter::<i64>()
            .map(|class| class as usize)
            .collect()
    }
}

impl<B: Backend> SentimentClassifier for NeuralSentimentClassifier<B> {
    fn predict(&self, ex: &SentimentExample) -> usize {
        self.predict_batch(std::slice::from_ref(ex))[0]
    }

    fn predict_all(&self, exs: &[SentimentExample]) -> Vec<usize> {
        exs.chunks(PREDICT_BATCH)
            .flat_map(|chunk| self.predict_batch(chunk))
            .collect()
    }
}

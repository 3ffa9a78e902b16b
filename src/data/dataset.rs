use burn::data::dataset::Dataset;

use crate::data::embeddings::WordEmbeddings;
use crate::domain::example::SentimentExample;

/// One sentence mapped to embedding row ids, unpadded.
#[derive(Debug, Clone)]
pub struct SentimentItem {
    pub token_ids: Vec<usize>,
    pub label:     usize,
}

impl SentimentItem {
    /// Index every word through the embedding table (unknown → UNK).
    pub fn from_example(ex: &SentimentExample, embeddings: &WordEmbeddings) -> Self {
        Self {
            token_ids: ex.words.iter().map(|w| embeddings.index_of(w)).collect(),
            label:     ex.label,
        }
    }
}

pub struct SentimentDataset {
    items: Vec<SentimentItem>,
}

impl SentimentDataset {
    pub fn new(items: Vec<SentimentItem>) -> Self { Self { items } }

    pub fn from_examples(exs: &[SentimentExample], embeddings: &WordEmbeddings) -> Self {
        Self::new(exs.iter().map(|ex| SentimentItem::from_example(ex, embeddings)).collect())
    }

    /// Fraction of sentence tokens that fell back to UNK
    pub fn unk_rate(&self) -> f64 {
        let total: usize = self.items.iter().map(|i| i.token_ids.len()).sum();
        if total == 0 {
            return 0.0;
        }
        let unk = self
            .items
            .iter()
            .flat_map(|i| i.token_ids.iter())
            .filter(|&&id| id == crate::data::embeddings::UNK_INDEX)
            .count();
        unk as f64 / total as f64
    }
}

impl Dataset<SentimentItem> for SentimentDataset {
    fn get(&self, index: usize) -> Option<SentimentItem> {
        self.items.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::embeddings::{parse_word_embeddings, UNK_INDEX};

    #[test]
    fn test_items_use_embedding_rows() {
        let emb = parse_word_embeddings("good 1 0\nfilm 0 1\n").unwrap();
        let exs = vec![SentimentExample::new(
            vec!["good".into(), "odd".into(), "film".into()],
            1,
        )];
        let ds = SentimentDataset::from_examples(&exs, &emb);

        assert_eq!(ds.len(), 1);
        let item = ds.get(0).unwrap();
        assert_eq!(item.token_ids, vec![2, UNK_INDEX, 3]);
        assert_eq!(item.label, 1);
        assert!((ds.unk_rate() - 1.0 / 3.0).abs() < 1e-9);
        assert!(ds.get(1).is_none());
    }
}

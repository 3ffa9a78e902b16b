// ============================================================
// Layer 3 — SentimentExample Domain Type
// ============================================================
// One sentence of the sentiment corpus: lower-cased word
// tokens plus a binary gold label.
//
//   label 0 → negative
//   label 1 → positive

/// Label value of the negative class
pub const NEGATIVE: usize = 0;

/// Label value of the positive class
pub const POSITIVE: usize = 1;

/// A tokenised sentence with its sentiment label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentExample {
    /// Word tokens, already lower-cased and split
    pub words: Vec<String>,

    /// 0 (negative) or 1 (positive)
    pub label: usize,
}

impl SentimentExample {
    pub fn new(words: Vec<String>, label: usize) -> Self {
        Self { words, label }
    }

    /// Copy of this example carrying a different label.
    /// Used when writing predictions for the blind test set.
    pub fn relabel(&self, label: usize) -> Self {
        Self { words: self.words.clone(), label }
    }
}

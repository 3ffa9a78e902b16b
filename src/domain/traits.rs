// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer evaluates and writes predictions
// through this trait only, so the trivial baseline and the
// neural model are interchangeable.

use crate::domain::example::SentimentExample;

// ─── SentimentClassifier ──────────────────────────────────────────────────────
/// Anything that assigns a 0/1 sentiment label to a sentence.
///
/// Implementations:
///   - TrivialSentimentClassifier → always positive
///   - NeuralSentimentClassifier  → Deep Averaging Network
pub trait SentimentClassifier {
    /// Predict the label of a single example
    fn predict(&self, ex: &SentimentExample) -> usize;

    /// Predict labels for many examples, in order.
    /// Implementations backed by tensors override this to batch.
    fn predict_all(&self, exs: &[SentimentExample]) -> Vec<usize> {
        exs.iter().map(|ex| self.predict(ex)).collect()
    }
}

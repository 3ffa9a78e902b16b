// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model and training code lives here.
//
//   model.rs      - the Deep Averaging Network:
//                   • pretrained word embeddings
//                   • masked average (or max) pooling
//                   • one hidden feed-forward layer
//                   • two-class output head
//
//   trainer.rs    - the training loop: forward pass, loss,
//                   backward pass, Adam step, per-epoch dev
//                   evaluation and optional checkpointing
//
//   classifier.rs - SentimentClassifier implementations:
//                   the trivial baseline and the trained DAN

/// Deep Averaging Network architecture
pub mod model;

/// Training loop with dev evaluation and checkpointing
pub mod trainer;

/// Baseline and neural classifiers
pub mod classifier;

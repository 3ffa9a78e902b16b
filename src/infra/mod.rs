// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by the training loop and the
// driver:
//
//   metrics.rs    - Evaluation (accuracy / precision / recall /
//                   F1) and the per-epoch CSV logger.
//
//   checkpoint.rs - Saving and loading a trained DAN: config
//                   JSON, vocabulary, and Burn records.

/// Evaluation metrics and epoch CSV logging
pub mod metrics;

/// Model checkpoint saving and loading
pub mod checkpoint;

// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from text files on disk to tensor batches.
//
//   train.txt / dev.txt / test.txt      glove.*.txt
//       │                                   │
//       ▼                                   ▼
//   reader (+ preprocessor)             embeddings
//       │                                   │
//       └──────────────┬────────────────────┘
//                      ▼
//   SentimentDataset  → word ids via the embedding indexer
//       │
//       ▼
//   SentimentBatcher  → padded tokens + mask tensors
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop

/// Reads and writes labelled example files
pub mod reader;

/// Lower-cases and splits raw sentences
pub mod preprocessor;

/// Pretrained word vectors with PAD/UNK rows
pub mod embeddings;

/// Implements Burn's Dataset trait for indexed sentences
pub mod dataset;

/// Implements Burn's Batcher trait with per-batch padding
pub mod batcher;

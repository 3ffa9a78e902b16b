// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that describe the problem: a labelled
// sentence, a word indexer, and the classifier abstraction.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits

// A tokenised sentence with a 0/1 sentiment label
pub mod example;

// Bidirectional word <-> index map
pub mod indexer;

// Core abstractions (traits) that other layers implement
pub mod traits;

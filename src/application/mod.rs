// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to run one experiment:
// load data, train or build the baseline, evaluate, and write
// test predictions.
//
// Rules for this layer:
//   - No tensor code here (that's Layer 5)
//   - No argument parsing here (that's Layer 1)
//   - Only workflow coordination and result printing

// The end-to-end train / evaluate / predict workflow
pub mod experiment_use_case;

// Evaluation helpers shared by the workflow and the trainer
pub mod evaluate;

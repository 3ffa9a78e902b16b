// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses command line flags with clap and hands a finished
// ExperimentConfig to Layer 2. Flag names keep the
// underscore style of the course driver it replaces
// (--train_path, --num_epochs, ...).
//
// Example:
//   dan-sentiment --model DAN \
//       --word_vecs_path glove.6B.300d-relativized.txt \
//       --train_path train.txt --dev_path dev.txt \
//       --blind_test_path test.txt

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{BackendArg, ModelArg};

use crate::application::experiment_use_case::ExperimentUseCase;

#[derive(Parser, Debug)]
#[command(
    name = "dan-sentiment",
    version,
    about = "Train and evaluate a Deep Averaging Network sentiment classifier.",
    rename_all = "snake_case"
)]
pub struct Cli {
    /// Model to run (TRIVIAL or DAN)
    #[arg(long, value_enum, ignore_case = true, default_value_t = ModelArg::Dan)]
    pub model: ModelArg,

    /// Path to the training set
    #[arg(long, default_value = "train.txt")]
    pub train_path: String,

    /// Path to the dev set
    #[arg(long, default_value = "dev.txt")]
    pub dev_path: String,

    /// Path to the blind test set
    #[arg(long, default_value = "test.txt")]
    pub blind_test_path: String,

    /// Output path for test predictions
    #[arg(long, default_value = "test.output.txt")]
    pub test_output_path: String,

    /// Skip writing predictions for the test set
    #[arg(long)]
    pub no_run_on_test: bool,

    /// Path to word embeddings (GloVe text format)
    #[arg(long, default_value = "glove.6B.300d-relativized.txt")]
    pub word_vecs_path: String,

    /// How word vectors are pooled: avg (default) or max
    #[arg(long)]
    pub method: Option<String>,

    /// Hidden layer nonlinearity: relu (default) or tanh
    #[arg(long)]
    pub func: Option<String>,

    /// Learning rate
    #[arg(long, default_value_t = 0.001)]
    pub lr: f64,

    /// Number of epochs to train for
    #[arg(long, default_value_t = 10)]
    pub num_epochs: usize,

    /// Hidden layer size
    #[arg(long, default_value_t = 100)]
    pub hidden_size: usize,

    /// Training batch size
    #[arg(long, default_value_t = 1)]
    pub batch_size: usize,

    /// Dropout probability after the hidden layer
    #[arg(long, default_value_t = 0.0)]
    pub dropout: f64,

    /// Seed for weight initialisation and shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Tensor backend for training
    #[arg(long, value_enum, default_value_t = BackendArg::Ndarray)]
    pub backend: BackendArg,

    /// Keep the pretrained embeddings fixed during training
    #[arg(long)]
    pub freeze_embeddings: bool,

    /// Directory for checkpoints, config and per-epoch metrics
    #[arg(long)]
    pub save_dir: Option<String>,

    /// Evaluate a DAN saved by an earlier --save_dir run instead of training
    #[arg(long)]
    pub load_dir: Option<String>,

    /// Write the embeddings restricted to the corpus vocabulary here
    #[arg(long)]
    pub relativize_output: Option<String>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        tracing::info!("Running model {:?} on '{}'", self.model, self.train_path);
        ExperimentUseCase::new(self.into()).execute()
    }
}

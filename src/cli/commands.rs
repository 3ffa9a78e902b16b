// ============================================================
// Layer 1 — CLI Value Types
// ============================================================
// Enumerated flag values and the conversion from parsed flags
// to the application-layer ExperimentConfig. The application
// layer never sees clap types.

use clap::ValueEnum;

use crate::application::experiment_use_case::{BackendKind, ExperimentConfig, ModelKind};
use crate::cli::Cli;

/// `--model` values
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelArg {
    /// Always predict positive
    #[value(name = "TRIVIAL")]
    Trivial,

    /// Deep Averaging Network over word embeddings
    #[value(name = "DAN")]
    Dan,
}

/// `--backend` values
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendArg {
    /// CPU, pure Rust
    Ndarray,

    /// GPU through WebGPU
    Wgpu,
}

impl From<ModelArg> for ModelKind {
    fn from(m: ModelArg) -> Self {
        match m {
            ModelArg::Trivial => ModelKind::Trivial,
            ModelArg::Dan     => ModelKind::Dan,
        }
    }
}

impl From<BackendArg> for BackendKind {
    fn from(b: BackendArg) -> Self {
        match b {
            BackendArg::Ndarray => BackendKind::NdArray,
            BackendArg::Wgpu    => BackendKind::Wgpu,
        }
    }
}

impl From<Cli> for ExperimentConfig {
    fn from(a: Cli) -> Self {
        ExperimentConfig {
            model:             a.model.into(),
            train_path:        a.train_path,
            dev_path:          a.dev_path,
            blind_test_path:   a.blind_test_path,
            test_output_path:  a.test_output_path,
            run_on_test:       !a.no_run_on_test,
            word_vecs_path:    a.word_vecs_path,
            method:            a.method,
            func:              a.func,
            lr:                a.lr,
            num_epochs:        a.num_epochs,
            hidden_size:       a.hidden_size,
            batch_size:        a.batch_size,
            dropout:           a.dropout,
            seed:              a.seed,
            backend:           a.backend.into(),
            freeze_embeddings: a.freeze_embeddings,
            save_dir:          a.save_dir,
            load_dir:          a.load_dir,
            relativize_output: a.relativize_output,
        }
    }
}

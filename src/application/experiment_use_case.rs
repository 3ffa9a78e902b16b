// ============================================================
// Layer 2 — ExperimentUseCase
// ============================================================
// Runs one experiment end to end:
//
//   Step 1: Read train / dev / blind test examples   (Layer 4)
//   Step 2: Read word embeddings                     (Layer 4)
//   Step 3: Optionally write relativized embeddings  (Layer 4)
//   Step 4: Train (or load) the DAN, or the baseline (Layer 5)
//   Step 5: Print train and dev metrics              (Layer 6)
//   Step 6: Write blind test predictions             (Layer 4)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::application::evaluate::print_evaluation;
use crate::data::{
    embeddings::{read_word_embeddings, write_word_embeddings},
    reader::{read_sentiment_examples, write_sentiment_examples},
};
use crate::domain::{example::SentimentExample, traits::SentimentClassifier};
use crate::ml::{
    classifier::TrivialSentimentClassifier,
    model::{Activation, DanConfig, Pooling},
    trainer::{load_trained, run_training},
};

/// Which classifier to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    Trivial,
    Dan,
}

/// Which Burn backend the DAN trains on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendKind {
    NdArray,
    Wgpu,
}

// ─── Experiment Configuration ─────────────────────────────────────────────────
// Everything one run needs. Serialisable so a saved model
// carries the settings it was trained with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub model:             ModelKind,
    pub train_path:        String,
    pub dev_path:          String,
    pub blind_test_path:   String,
    pub test_output_path:  String,
    pub run_on_test:       bool,
    pub word_vecs_path:    String,
    pub method:            Option<String>,
    pub func:              Option<String>,
    pub lr:                f64,
    pub num_epochs:        usize,
    pub hidden_size:       usize,
    pub batch_size:        usize,
    pub dropout:           f64,
    pub seed:              u64,
    pub backend:           BackendKind,
    pub freeze_embeddings: bool,
    pub save_dir:          Option<String>,
    pub load_dir:          Option<String>,
    pub relativize_output: Option<String>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            model:             ModelKind::Dan,
            train_path:        "train.txt".to_string(),
            dev_path:          "dev.txt".to_string(),
            blind_test_path:   "test.txt".to_string(),
            test_output_path:  "test.output.txt".to_string(),
            run_on_test:       true,
            word_vecs_path:    "glove.6B.300d-relativized.txt".to_string(),
            method:            None,
            func:              None,
            lr:                0.001,
            num_epochs:        10,
            hidden_size:       100,
            batch_size:        1,
            dropout:           0.0,
            seed:              42,
            backend:           BackendKind::NdArray,
            freeze_embeddings: false,
            save_dir:          None,
            load_dir:          None,
            relativize_output: None,
        }
    }
}

impl ExperimentConfig {
    /// Pooling named by `--method`; average when unset.
    pub fn pooling(&self) -> Result<Pooling> {
        match self.method.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("avg") | Some("average") | Some("mean") => Ok(Pooling::Avg),
            Some("max") => Ok(Pooling::Max),
            Some(other) => bail!("Unknown --method '{other}' (expected avg or max)"),
        }
    }

    /// Hidden nonlinearity named by `--func`; ReLU when unset.
    pub fn activation(&self) -> Result<Activation> {
        match self.func.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("relu") => Ok(Activation::Relu),
            Some("tanh") => Ok(Activation::Tanh),
            Some(other) => bail!("Unknown --func '{other}' (expected relu or tanh)"),
        }
    }

    /// Check hyperparameters before any data is read.
    pub fn validate(&self) -> Result<()> {
        if self.model == ModelKind::Dan {
            if self.batch_size == 0 {
                bail!("--batch_size must be at least 1");
            }
            if self.hidden_size == 0 {
                bail!("--hidden_size must be at least 1");
            }
            if !(self.lr > 0.0) {
                bail!("--lr must be positive, got {}", self.lr);
            }
            if !(0.0..1.0).contains(&self.dropout) {
                bail!("--dropout must be in [0, 1), got {}", self.dropout);
            }
            self.pooling()?;
            self.activation()?;
        }
        Ok(())
    }

    /// DAN architecture for an embedding table of the given shape.
    pub fn dan_config(&self, vocab_size: usize, embedding_dim: usize) -> Result<DanConfig> {
        Ok(DanConfig::new(vocab_size, embedding_dim, self.hidden_size)
            .with_dropout(self.dropout)
            .with_pooling(self.pooling()?)
            .with_activation(self.activation()?))
    }
}

// ─── ExperimentUseCase ────────────────────────────────────────────────────────
pub struct ExperimentUseCase {
    config: ExperimentConfig,
}

impl ExperimentUseCase {
    pub fn new(config: ExperimentConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;
        cfg.validate()?;
        println!("{cfg:?}");

        // ── Step 1: Load examples ─────────────────────────────────────────────
        let train_exs = read_sentiment_examples(&cfg.train_path)?;
        let dev_exs   = read_sentiment_examples(&cfg.dev_path)?;
        let test_exs  = read_sentiment_examples(&cfg.blind_test_path)?;
        println!(
            "{} / {} / {} train/dev/test examples",
            train_exs.len(),
            dev_exs.len(),
            test_exs.len()
        );

        // ── Step 2: Load embeddings ───────────────────────────────────────────
        let embeddings = read_word_embeddings(&cfg.word_vecs_path)?;

        // ── Step 3: Relativize ────────────────────────────────────────────────
        if let Some(path) = &cfg.relativize_output {
            let vocab = train_exs
                .iter()
                .chain(&dev_exs)
                .chain(&test_exs)
                .flat_map(|ex| ex.words.iter().map(String::as_str));
            write_word_embeddings(&embeddings.relativize(vocab), path)?;
        }

        // ── Step 4: Train ─────────────────────────────────────────────────────
        let start = Instant::now();
        let classifier: Box<dyn SentimentClassifier> = match cfg.model {
            ModelKind::Dan => match &cfg.load_dir {
                Some(dir) => load_trained(cfg, dir)?,
                None => run_training(cfg, &train_exs, &dev_exs, &embeddings)?,
            },
            ModelKind::Trivial => Box::new(TrivialSentimentClassifier),
        };

        // ── Step 5: Evaluate ──────────────────────────────────────────────────
        println!("=====Train Accuracy=====");
        report(classifier.as_ref(), &train_exs)?;
        println!("=====Dev Accuracy=====");
        report(classifier.as_ref(), &dev_exs)?;
        println!(
            "Time for training and evaluation: {:.2} seconds",
            start.elapsed().as_secs_f64()
        );

        // ── Step 6: Blind test predictions ────────────────────────────────────
        if cfg.run_on_test {
            let predicted: Vec<SentimentExample> = test_exs
                .iter()
                .zip(classifier.predict_all(&test_exs))
                .map(|(ex, label)| ex.relabel(label))
                .collect();
            write_sentiment_examples(&predicted, &cfg.test_output_path)?;
        } else {
            tracing::info!("Skipping blind test predictions");
        }

        Ok(())
    }
}

fn report(classifier: &dyn SentimentClassifier, exs: &[SentimentExample]) -> Result<()> {
    let golds: Vec<usize> = exs.iter().map(|ex| ex.label).collect();
    print_evaluation(&golds, &classifier.predict_all(exs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_method_and_func_parsing() {
        let mut cfg = ExperimentConfig::default();
        assert_eq!(cfg.pooling().unwrap(), Pooling::Avg);
        assert_eq!(cfg.activation().unwrap(), Activation::Relu);

        cfg.method = Some("MAX".into());
        cfg.func   = Some("tanh".into());
        assert_eq!(cfg.pooling().unwrap(), Pooling::Max);
        assert_eq!(cfg.activation().unwrap(), Activation::Tanh);

        cfg.method = Some("attention".into());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_batch() {
        let cfg = ExperimentConfig { batch_size: 0, ..Default::default() };
        assert!(cfg.validate().is_err());

        // the baseline ignores training hyperparameters
        let cfg = ExperimentConfig { batch_size: 0, model: ModelKind::Trivial, ..Default::default() };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_trivial_ignores_method_and_func() {
        let cfg = ExperimentConfig {
            model:  ModelKind::Trivial,
            method: Some("foo".into()),
            func:   Some("bar".into()),
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    // Writes a tiny corpus into `dir` and returns a config pointing at it.
    fn corpus_config(dir: &std::path::Path, model: ModelKind) -> ExperimentConfig {
        let path = |name: &str| dir.join(name).to_string_lossy().into_owned();

        fs::write(path("train.txt"), "1\tgood film\n0\tbad film\n1\tgood plot\n0\tbad plot\n").unwrap();
        fs::write(path("dev.txt"), "0\tbad\n1\tgood\n").unwrap();
        fs::write(path("test.txt"), "0\tsome plot\n0\tanother\n").unwrap();
        fs::write(path("vecs.txt"), "good 1 0\nbad -1 0\nplot 0 1\nunused 2 2\n").unwrap();

        ExperimentConfig {
            model,
            train_path:       path("train.txt"),
            dev_path:         path("dev.txt"),
            blind_test_path:  path("test.txt"),
            test_output_path: path("out.txt"),
            word_vecs_path:   path("vecs.txt"),
            ..Default::default()
        }
    }

    #[test]
    fn test_trivial_run_writes_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let rel = dir.path().join("rel.txt");
        let cfg = ExperimentConfig {
            relativize_output: Some(rel.to_string_lossy().into_owned()),
            ..corpus_config(dir.path(), ModelKind::Trivial)
        };
        ExperimentUseCase::new(cfg).execute().unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("out.txt")).unwrap(),
            "1\tsome plot\n1\tanother\n"
        );
        let relativized = fs::read_to_string(&rel).unwrap();
        assert!(relativized.contains("plot"));
        assert!(!relativized.contains("unused"));
    }

    #[test]
    fn test_no_run_on_test_skips_prediction_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ExperimentConfig {
            run_on_test: false,
            ..corpus_config(dir.path(), ModelKind::Trivial)
        };
        ExperimentUseCase::new(cfg).execute().unwrap();

        assert!(!dir.path().join("out.txt").exists());
    }

    #[test]
    fn test_dan_run_writes_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ExperimentConfig {
            lr:          0.01,
            num_epochs:  2,
            hidden_size: 4,
            batch_size:  2,
            ..corpus_config(dir.path(), ModelKind::Dan)
        };
        ExperimentUseCase::new(cfg).execute().unwrap();

        let written = read_sentiment_examples(dir.path().join("out.txt")).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(written[0].words, vec!["some", "plot"]);
        assert_eq!(written[1].words, vec!["another"]);
    }

    #[test]
    fn test_missing_train_file_fails() {
        let cfg = ExperimentConfig {
            model:      ModelKind::Trivial,
            train_path: "/no/such/train.txt".into(),
            ..Default::default()
        };
        assert!(ExperimentUseCase::new(cfg).execute().is_err());
    }
}

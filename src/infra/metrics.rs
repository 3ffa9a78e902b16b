// ============================================================
// Layer 6 — Metrics
// ============================================================
// Two kinds of metrics live here:
//
//   Evaluation     - accuracy and positive-class precision /
//                    recall / F1 of a prediction run. Printed
//                    after training for the train and dev sets.
//
//   EpochMetrics   - one row per training epoch, appended to
//   MetricsLogger    {save_dir}/metrics.csv when a save
//                    directory is configured.
//
// Example Evaluation output:
//   Accuracy: 5 / 8 = 0.625000
//   Precision: 3 / 4 = 0.750000
//   Recall: 3 / 5 = 0.600000
//   F1: 0.666667
//
// Example CSV output:
//   epoch,train_loss,dev_accuracy,dev_f1
//   1,0.512300,0.771000,0.780100
//   2,0.401800,0.786000,0.792400

use anyhow::{bail, Context, Result};
use std::{
    fmt,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::domain::example::POSITIVE;

/// Counts and scores comparing gold labels to predictions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub num_correct:     usize,
    pub num_total:       usize,
    pub num_pos_correct: usize,
    pub num_pred:        usize,
    pub num_gold:        usize,
    pub accuracy:        f64,
    pub precision:       f64,
    pub recall:          f64,
    pub f1:              f64,
}

impl Evaluation {
    /// Compare `golds` and `predictions` position by position.
    ///
    /// Precision, recall and F1 are for the positive class and fall back
    /// to 0.0 when their denominators are zero. Accuracy over an empty
    /// input is 0.0.
    pub fn compute(golds: &[usize], predictions: &[usize]) -> Result<Self> {
        if golds.len() != predictions.len() {
            bail!(
                "Mismatched gold/pred lengths: {} / {}",
                golds.len(),
                predictions.len()
            );
        }

        let mut num_correct     = 0usize;
        let mut num_pos_correct = 0usize;
        let mut num_pred        = 0usize;
        let mut num_gold        = 0usize;

        for (&gold, &pred) in golds.iter().zip(predictions) {
            if pred == gold {
                num_correct += 1;
            }
            if pred == POSITIVE {
                num_pred += 1;
            }
            if gold == POSITIVE {
                num_gold += 1;
            }
            if pred == POSITIVE && gold == POSITIVE {
                num_pos_correct += 1;
            }
        }

        let num_total = golds.len();
        let ratio     = |num: usize, den: usize| if den > 0 { num as f64 / den as f64 } else { 0.0 };

        let accuracy  = ratio(num_correct, num_total);
        let precision = ratio(num_pos_correct, num_pred);
        let recall    = ratio(num_pos_correct, num_gold);
        let f1 = if precision > 0.0 && recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Ok(Self {
            num_correct, num_total, num_pos_correct, num_pred, num_gold,
            accuracy, precision, recall, f1,
        })
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Accuracy: {} / {} = {:.6}", self.num_correct, self.num_total, self.accuracy)?;
        writeln!(f, "Precision: {} / {} = {:.6}", self.num_pos_correct, self.num_pred, self.precision)?;
        writeln!(f, "Recall: {} / {} = {:.6}", self.num_pos_correct, self.num_gold, self.recall)?;
        write!(f, "F1: {:.6}", self.f1)
    }
}

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average cross-entropy loss over all training batches
    pub train_loss: f64,

    /// Dev set accuracy after this epoch
    pub dev_accuracy: f64,

    /// Dev set positive-class F1 after this epoch
    pub dev_f1: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, dev: &Evaluation) -> Self {
        Self {
            epoch,
            train_loss,
            dev_accuracy: dev.accuracy,
            dev_f1:       dev.f1,
        }
    }

    /// Returns true if this epoch beat the previous best dev accuracy
    pub fn is_improvement(&self, best_dev_accuracy: f64) -> bool {
        self.dev_accuracy > best_dev_accuracy
    }
}

/// Appends epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Start a fresh `metrics.csv` in `dir`, replacing any previous run's log.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "epoch,train_loss,dev_accuracy,dev_f1")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6}",
            m.epoch, m.train_loss, m.dev_accuracy, m.dev_f1,
        )?;
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_counts_and_scores() {
        let golds = [1, 1, 1, 1, 1, 0, 0, 0];
        let preds = [1, 1, 1, 0, 0, 1, 0, 0];
        let e = Evaluation::compute(&golds, &preds).unwrap();

        assert_eq!(e.num_correct, 5);
        assert_eq!(e.num_total, 8);
        assert_eq!(e.num_pos_correct, 3);
        assert_eq!(e.num_pred, 4);
        assert_eq!(e.num_gold, 5);
        assert!(approx(e.accuracy, 0.625));
        assert!(approx(e.precision, 0.75));
        assert!(approx(e.recall, 0.6));
        assert!(approx(e.f1, 2.0 * 0.75 * 0.6 / 1.35));
    }

    #[test]
    fn test_no_positive_predictions() {
        let e = Evaluation::compute(&[1, 0, 1], &[0, 0, 0]).unwrap();
        assert_eq!(e.precision, 0.0);
        assert_eq!(e.recall, 0.0);
        assert_eq!(e.f1, 0.0);
        assert!(approx(e.accuracy, 1.0 / 3.0));
    }

    #[test]
    fn test_no_positive_golds() {
        let e = Evaluation::compute(&[0, 0], &[1, 0]).unwrap();
        assert_eq!(e.recall, 0.0);
        assert_eq!(e.precision, 0.0);
        assert_eq!(e.f1, 0.0);
    }

    #[test]
    fn test_perfect_predictions() {
        let e = Evaluation::compute(&[1, 0, 1], &[1, 0, 1]).unwrap();
        assert_eq!(e.accuracy, 1.0);
        assert_eq!(e.f1, 1.0);
    }

    #[test]
    fn test_mismatched_lengths_is_an_error() {
        let err = Evaluation::compute(&[1, 0, 1], &[1]).unwrap_err();
        assert_eq!(err.to_string(), "Mismatched gold/pred lengths: 3 / 1");
    }

    #[test]
    fn test_empty_input() {
        let e = Evaluation::compute(&[], &[]).unwrap();
        assert_eq!(e.num_total, 0);
        assert_eq!(e.accuracy, 0.0);
    }

    #[test]
    fn test_display_format() {
        let e = Evaluation::compute(&[1, 0], &[1, 1]).unwrap();
        assert_eq!(
            e.to_string(),
            "Accuracy: 1 / 2 = 0.500000\n\
             Precision: 1 / 2 = 0.500000\n\
             Recall: 1 / 1 = 1.000000\n\
             F1: 0.666667"
        );
    }

    #[test]
    fn test_is_improvement() {
        let dev = Evaluation::compute(&[1, 0], &[1, 1]).unwrap();
        let m   = EpochMetrics::new(2, 0.4, &dev);
        assert!(m.is_improvement(0.4));
        assert!(!m.is_improvement(0.5));
    }

    #[test]
    fn test_logger_writes_header_and_rows() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        let dev    = Evaluation::compute(&[1, 0], &[1, 0]).unwrap();

        logger.log(&EpochMetrics::new(1, 0.25, &dev)).unwrap();
        let csv = fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(csv, "epoch,train_loss,dev_accuracy,dev_f1\n1,0.250000,1.000000,1.000000\n");
    }
}

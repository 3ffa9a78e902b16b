use anyhow::Result;

use crate::domain::{example::SentimentExample, traits::SentimentClassifier};
use crate::infra::metrics::Evaluation;

/// Run `classifier` over `exs` and score it against their gold labels.
pub fn evaluate(classifier: &dyn SentimentClassifier, exs: &[SentimentExample]) -> Result<Evaluation> {
    let golds: Vec<usize> = exs.iter().map(|ex| ex.label).collect();
    let predictions       = classifier.predict_all(exs);
    Evaluation::compute(&golds, &predictions)
}

/// Print the metrics block for `golds` against `predictions`.
pub fn print_evaluation(golds: &[usize], predictions: &[usize]) -> Result<()> {
    let evaluation = Evaluation::compute(golds, predictions)?;
    println!("{evaluation}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::classifier::TrivialSentimentClassifier;

    #[test]
    fn test_trivial_baseline_scores() {
        let exs = vec![
            SentimentExample::new(vec!["good".into()], 1),
            SentimentExample::new(vec!["bad".into()], 0),
            SentimentExample::new(vec!["fine".into()], 1),
            SentimentExample::new(vec!["meh".into()], 0),
        ];
        let e = evaluate(&TrivialSentimentClassifier, &exs).unwrap();
        assert_eq!(e.num_correct, 2);
        assert_eq!(e.accuracy, 0.5);
        assert_eq!(e.recall, 1.0);
        assert_eq!(e.precision, 0.5);
    }

    #[test]
    fn test_print_rejects_mismatch() {
        assert!(print_evaluation(&[0, 1], &[0]).is_err());
        assert!(print_evaluation(&[0, 1], &[0, 1]).is_ok());
    }
}

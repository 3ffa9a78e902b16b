// ============================================================
// Layer 4 — Example Reader / Writer
// ============================================================
// Reads and writes the sentiment corpus format:
//
//   <label>\t<sentence>
//
// One example per line. Blank lines are skipped. Lines without
// exactly one tab fall back to whitespace splitting, where the
// first field is the label and the rest is the sentence.
//
// A label field containing the character '0' means negative;
// anything else means positive. This tolerates prediction files
// that were written with extra decoration around the label.
//
// Files are decoded as ISO-8859-1: every byte maps to the
// Unicode code point with the same value, so no input byte
// sequence can fail to decode.

use anyhow::{Context, Result};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use crate::data::preprocessor::Preprocessor;
use crate::domain::example::{SentimentExample, NEGATIVE, POSITIVE};

/// Load every example from `path`.
pub fn read_sentiment_examples(path: impl AsRef<Path>) -> Result<Vec<SentimentExample>> {
    let path  = path.as_ref();
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read examples from '{}'", path.display()))?;

    let text: String = bytes.iter().map(|&b| b as char).collect();
    let examples     = parse_sentiment_examples(&text);

    tracing::debug!("Read {} examples from '{}'", examples.len(), path.display());
    Ok(examples)
}

/// Parse examples from already-decoded file contents.
pub fn parse_sentiment_examples(text: &str) -> Vec<SentimentExample> {
    let preprocessor = Preprocessor::new();

    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let fields: Vec<&str> = line.split('\t').collect();
            let (label_field, sentence) = if fields.len() == 2 {
                (fields[0].to_string(), fields[1].to_string())
            } else {
                let mut parts = line.split_whitespace();
                let label     = parts.next().unwrap_or_default().to_string();
                (label, parts.collect::<Vec<_>>().join(" "))
            };

            let label = if label_field.contains('0') { NEGATIVE } else { POSITIVE };
            SentimentExample::new(preprocessor.tokenize(&sentence), label)
        })
        .collect()
}

/// Write examples in the same format `read_sentiment_examples` accepts.
pub fn write_sentiment_examples(exs: &[SentimentExample], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Cannot create '{}'", path.display()))?;
    let mut out = BufWriter::new(file);

    for ex in exs {
        writeln!(out, "{}\t{}", ex.label, ex.words.join(" "))?;
    }
    out.flush()
        .with_context(|| format!("Cannot write examples to '{}'", path.display()))?;

    tracing::info!("Wrote {} examples to '{}'", exs.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_tab_separated_lines() {
        let exs = parse_sentiment_examples("1\tA Gripping , Funny Film .\n0\tdull and slow\n");
        assert_eq!(exs.len(), 2);
        assert_eq!(exs[0].label, POSITIVE);
        assert_eq!(exs[0].words, vec!["a", "gripping", ",", "funny", "film", "."]);
        assert_eq!(exs[1].label, NEGATIVE);
        assert_eq!(exs[1].words, vec!["dull", "and", "slow"]);
    }

    #[test]
    fn test_skips_blank_lines() {
        let exs = parse_sentiment_examples("\n1\tfine\n   \n\n0\tbad\n");
        assert_eq!(exs.len(), 2);
    }

    #[test]
    fn test_falls_back_to_whitespace_split() {
        let exs = parse_sentiment_examples("0 not  worth it\n1 a\tb\tc\n");
        assert_eq!(exs[0].label, NEGATIVE);
        assert_eq!(exs[0].words, vec!["not", "worth", "it"]);
        // more than one tab also takes the whitespace path
        assert_eq!(exs[1].label, POSITIVE);
        assert_eq!(exs[1].words, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_label_containing_zero_is_negative() {
        let exs = parse_sentiment_examples("10\tx\n2\ty\n");
        assert_eq!(exs[0].label, NEGATIVE);
        assert_eq!(exs[1].label, POSITIVE);
    }

    #[test]
    fn test_write_then_read_file() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let exs  = vec![
            SentimentExample::new(vec!["great".into(), "cast".into()], POSITIVE),
            SentimentExample::new(vec!["no".into()], NEGATIVE),
        ];

        write_sentiment_examples(&exs, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1\tgreat cast\n0\tno\n");
        assert_eq!(read_sentiment_examples(&path).unwrap(), exs);
    }

    #[test]
    fn test_latin1_bytes_decode() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        // "café" with é encoded as the single byte 0xE9
        fs::write(&path, b"1\tcaf\xe9\n").unwrap();
        let exs = read_sentiment_examples(&path).unwrap();
        assert_eq!(exs[0].words, vec!["café"]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = read_sentiment_examples("/definitely/not/here.txt").unwrap_err();
        assert!(err.to_string().contains("Cannot read examples"));
    }
}

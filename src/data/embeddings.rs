// ============================================================
// Layer 4 — Word Embeddings
// ============================================================
// Loads pretrained word vectors (GloVe text format):
//
//   the 0.418 0.24968 -0.41242 ...
//   ,   0.013441 0.23682 -0.16899 ...
//
// Two reserved rows are prepended before the file contents:
//   index 0 → PAD  (fills short sentences in a batch)
//   index 1 → UNK  (any word not in the file)
// Both are zero vectors.
//
// Full GloVe files are large, so `relativize` can cut a table
// down to the words that actually occur in the corpus. The
// result is written back in the same text format.

use anyhow::{bail, Context, Result};
use std::{
    collections::HashSet,
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use crate::domain::indexer::Indexer;

pub const PAD_TOKEN: &str = "PAD";
pub const UNK_TOKEN: &str = "UNK";
pub const PAD_INDEX: usize = 0;
pub const UNK_INDEX: usize = 1;

/// A word indexer plus a dense row-major `[vocab_len, dim]` table.
#[derive(Debug, Clone)]
pub struct WordEmbeddings {
    indexer: Indexer,
    vectors: Vec<f32>,
    dim:     usize,
}

impl WordEmbeddings {
    /// Build a table from `(word, vector)` rows. PAD and UNK are
    /// added in front; a row for either name is skipped.
    pub fn from_rows<I>(dim: usize, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<f32>)>,
    {
        if dim == 0 {
            bail!("Embedding dimension must be positive");
        }

        let mut indexer = Indexer::new();
        indexer.add_and_get_index(PAD_TOKEN);
        indexer.add_and_get_index(UNK_TOKEN);
        let mut vectors = vec![0.0f32; 2 * dim];

        for (word, vector) in rows {
            if vector.len() != dim {
                bail!(
                    "Embedding for '{}' has {} values, expected {}",
                    word, vector.len(), dim
                );
            }
            if indexer.contains(&word) {
                tracing::debug!("Skipping duplicate embedding row for '{}'", word);
                continue;
            }
            indexer.add_and_get_index(&word);
            vectors.extend_from_slice(&vector);
        }

        Ok(Self { indexer, vectors, dim })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of rows, including PAD and UNK
    pub fn vocab_len(&self) -> usize {
        self.indexer.len()
    }

    pub fn indexer(&self) -> &Indexer {
        &self.indexer
    }

    /// Row index for `word`, falling back to UNK
    pub fn index_of(&self, word: &str) -> usize {
        self.indexer.index_of(word).unwrap_or(UNK_INDEX)
    }

    /// Vector for `word`, or the UNK vector for unknown words
    pub fn get_embedding(&self, word: &str) -> &[f32] {
        let row = self.index_of(word);
        &self.vectors[row * self.dim..(row + 1) * self.dim]
    }

    /// The whole table, row-major
    pub fn weights(&self) -> &[f32] {
        &self.vectors
    }

    /// Keep only rows whose word is in `words` (PAD and UNK are always kept).
    pub fn relativize<'a, I>(&self, words: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let keep: HashSet<&str> = words.into_iter().collect();
        let rows = self
            .indexer
            .iter()
            .enumerate()
            .skip(2)
            .filter(|(_, w)| keep.contains(w))
            .map(|(i, w)| (w.to_string(), self.vectors[i * self.dim..(i + 1) * self.dim].to_vec()));

        // rows come from a table that already passed validation
        let mut indexer = Indexer::new();
        indexer.add_and_get_index(PAD_TOKEN);
        indexer.add_and_get_index(UNK_TOKEN);
        let mut vectors = vec![0.0f32; 2 * self.dim];
        for (word, vector) in rows {
            indexer.add_and_get_index(&word);
            vectors.extend_from_slice(&vector);
        }

        tracing::info!(
            "Relativized embeddings: {} of {} words kept",
            indexer.len() - 2,
            self.vocab_len() - 2
        );
        Self { indexer, vectors, dim: self.dim }
    }
}

/// Parse a GloVe-style text file.
pub fn read_word_embeddings(path: impl AsRef<Path>) -> Result<WordEmbeddings> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read word vectors from '{}'", path.display()))?;

    let emb = parse_word_embeddings(&text)
        .with_context(|| format!("Malformed word vectors in '{}'", path.display()))?;

    tracing::info!(
        "Read {} word vectors of dimension {} from '{}'",
        emb.vocab_len(),
        emb.dim(),
        path.display()
    );
    Ok(emb)
}

/// Parse word vectors from already-loaded file contents.
pub fn parse_word_embeddings(text: &str) -> Result<WordEmbeddings> {
    let mut rows = Vec::new();
    let mut dim  = None;

    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (word, numbers) = line
            .split_once(' ')
            .with_context(|| format!("Line {}: no vector after word", line_no + 1))?;

        let vector = numbers
            .split_whitespace()
            .map(str::parse::<f32>)
            .collect::<Result<Vec<f32>, _>>()
            .with_context(|| format!("Line {}: bad number in vector for '{}'", line_no + 1, word))?;

        let expected = *dim.get_or_insert(vector.len());
        if vector.len() != expected {
            bail!(
                "Line {}: '{}' has {} values, expected {}",
                line_no + 1, word, vector.len(), expected
            );
        }
        rows.push((word.to_string(), vector));
    }

    let Some(dim) = dim else {
        bail!("No word vectors found");
    };
    WordEmbeddings::from_rows(dim, rows)
}

/// Write embeddings (without the PAD and UNK rows) in GloVe text format.
pub fn write_word_embeddings(emb: &WordEmbeddings, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Cannot create '{}'", path.display()))?;
    let mut out = BufWriter::new(file);

    for (i, word) in emb.indexer().iter().enumerate().skip(2) {
        let row = &emb.weights()[i * emb.dim()..(i + 1) * emb.dim()];
        let nums: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(out, "{} {}", word, nums.join(" "))?;
    }
    out.flush()
        .with_context(|| format!("Cannot write word vectors to '{}'", path.display()))?;

    tracing::info!("Wrote {} word vectors to '{}'", emb.vocab_len() - 2, path.display());
    Ok(())
}

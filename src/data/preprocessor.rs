// ============================================================
// Layer 4 — Sentence Preprocessor
// ============================================================
// Turns one raw sentence into the word tokens the rest of the
// pipeline works with.
//
// Cleaning steps (applied in order):
//   1. Lower-case the whole sentence
//   2. Trim trailing whitespace (line endings, stray tabs)
//   3. Split on single spaces
//   4. Drop empty tokens left by repeated spaces
//
// The corpus is already tokenised upstream (punctuation is
// space-separated), so no further splitting happens here.

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean and split a sentence into owned word tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .trim_end()
            .split(' ')
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

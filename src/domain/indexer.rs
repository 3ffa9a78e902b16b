// ============================================================
// Layer 3 — Indexer
// ============================================================
// Maps words to dense integer ids and back. Ids are handed out
// in insertion order starting at 0, so the embedding table row
// for a word is simply its id.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Indexer {
    objs_to_ints: HashMap<String, usize>,
    ints_to_objs: Vec<String>,
}

impl Indexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of `object`, assigning the next free id if unseen.
    pub fn add_and_get_index(&mut self, object: &str) -> usize {
        if let Some(&idx) = self.objs_to_ints.get(object) {
            return idx;
        }
        let idx = self.ints_to_objs.len();
        self.objs_to_ints.insert(object.to_string(), idx);
        self.ints_to_objs.push(object.to_string());
        idx
    }

    pub fn index_of(&self, object: &str) -> Option<usize> {
        self.objs_to_ints.get(object).copied()
    }

    pub fn get_object(&self, index: usize) -> Option<&str> {
        self.ints_to_objs.get(index).map(String::as_str)
    }

    pub fn contains(&self, object: &str) -> bool {
        self.objs_to_ints.contains_key(object)
    }

    pub fn len(&self) -> usize {
        self.ints_to_objs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ints_to_objs.is_empty()
    }

    /// Words in id order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ints_to_objs.iter().map(String::as_str)
    }
}

//! In-memory vector index for similarity search.

use parking_lot::RwLock;

use crate::embedding::Embedding;

/// Search result from the index.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub id: String,
    pub score: f32,
}

/// Brute-force cosine index.
///
/// Entries keep insertion order, and equal scores are returned in that
/// order, so a search over the same index is reproducible.
pub struct VectorIndex {
    entries: RwLock<Vec<(String, Embedding)>>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Insert a vector, replacing any entry with the same id in place.
    pub fn insert(&self, id: String, embedding: Embedding) {
        let mut entries = self.entries.write();
        match entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = embedding,
            None => entries.push((id, embedding)),
        }
    }

    /// Up to `limit` entries scoring at least `min_score`, best first.
    pub fn search(&self, query: &Embedding, limit: usize, min_score: f32) -> Vec<SearchResult> {
        let entries = self.entries.read();
        let mut results: Vec<SearchResult> = entries
            .iter()
            .map(|(id, emb)| SearchResult {
                id: id.clone(),
                score: query.cosine_similarity(emb),
            })
            .filter(|r| r.score >= min_score)
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);
        results
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for VectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

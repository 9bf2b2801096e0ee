//! In-memory passage index.
//!
//! Cosine similarity over hashed-feature embeddings. Not semantically
//! accurate like a real embedding model, but deterministic and
//! content-dependent, which is what the CLI and the test suite need. Real
//! deployments put an actual vector store behind [`PassageIndex`].

use crate::retrieval::PassageIndex;
use crate::types::{PassageChunk, ScoredPassage};
use docqa_core::{QaError, QaResult};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

/// Embedding width. Vectors only need to discriminate between passages of
/// one corpus.
const EMBED_DIM: usize = 256;

struct StoredPassage {
    chunk: PassageChunk,
    embedding: Vec<f32>,
}

/// In-memory index with one vector store per named collection.
#[derive(Default)]
pub struct MemoryIndex {
    collections: HashMap<String, Vec<StoredPassage>>,
}

impl MemoryIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one passage into a collection.
    pub fn insert(&mut self, collection: &str, chunk: PassageChunk) {
        let embedding = embed(&chunk.content);
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(StoredPassage { chunk, embedding });
    }

    /// Load pre-chunked passages from a JSONL file into every named
    /// collection.
    ///
    /// Each line is one [`PassageChunk`] (`content`, `source`, `page`,
    /// `seq`). Chunking itself happens upstream, at index-build time.
    pub fn load_jsonl(path: &Path, collections: &[&str]) -> QaResult<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            QaError::RetrievalUnavailable(format!("Cannot open corpus {:?}: {}", path, e))
        })?;

        let mut index = Self::new();
        let mut count = 0usize;

        for line in std::io::BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let chunk: PassageChunk = serde_json::from_str(&line).map_err(|e| {
                QaError::Serialization(format!("Bad passage record in {:?}: {}", path, e))
            })?;

            for collection in collections {
                index.insert(collection, chunk.clone());
            }
            count += 1;
        }

        tracing::info!(
            "Loaded {} passages into {} collections from {:?}",
            count,
            collections.len(),
            path
        );

        Ok(index)
    }

    /// Number of passages in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, Vec::len)
    }

    /// Whether a collection is absent or empty.
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

#[async_trait::async_trait]
impl PassageIndex for MemoryIndex {
    async fn search(
        &self,
        collection: &str,
        query: &str,
        top_k: usize,
    ) -> QaResult<Vec<ScoredPassage>> {
        let Some(stored) = self.collections.get(collection) else {
            return Err(QaError::RetrievalUnavailable(format!(
                "Collection '{}' does not exist",
                collection
            )));
        };

        if stored.is_empty() {
            return Err(QaError::RetrievalUnavailable(format!(
                "Collection '{}' is empty",
                collection
            )));
        }

        let query_embedding = embed(query);

        let mut scored: Vec<ScoredPassage> = stored
            .iter()
            .map(|p| {
                let score = dot(&query_embedding, &p.embedding);
                let mut chunk = p.chunk.clone();
                chunk.score = Some(score);
                (chunk, score)
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored)
    }
}

/// Hashed-feature embedding: every word and word bigram lands in a bucket,
/// the vector is then normalized so dot product equals cosine similarity.
fn embed(text: &str) -> Vec<f32> {
    let mut embedding = vec![0.0f32; EMBED_DIM];

    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 1)
        .collect();

    for word in &words {
        embedding[bucket(word)] += 1.0;
    }

    // Bigrams carry phrase identity that single words cannot.
    for pair in words.windows(2) {
        let bigram = format!("{} {}", pair[0], pair[1]);
        embedding[bucket(&bigram)] += 0.5;
    }

    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in &mut embedding {
            *v /= norm;
        }
    }

    embedding
}

/// FNV-style bucket assignment for a feature string.
fn bucket(feature: &str) -> usize {
    let hash = feature
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
            (acc ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3)
        });
    (hash as usize) % EMBED_DIM
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn chunk(content: &str, source: &str, page: u32, seq: u32) -> PassageChunk {
        PassageChunk {
            content: content.to_string(),
            source: source.to_string(),
            page,
            seq,
            score: None,
        }
    }

    #[test]
    fn test_embedding_is_normalized_and_deterministic() {
        let a = embed("communication based train control");
        let b = embed("communication based train control");
        assert_eq!(a, b);

        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_text_embeds_to_zero() {
        let e = embed("");
        assert!(e.iter().all(|&x| x == 0.0));
    }

    #[tokio::test]
    async fn test_search_ranks_matching_content_first() {
        let mut index = MemoryIndex::new();
        index.insert(
            "precise",
            chunk("CBTC means communication based train control", "rail.pdf", 3, 0),
        );
        index.insert(
            "precise",
            chunk("catering menus for the onboard restaurant", "menu.pdf", 1, 0),
        );

        let results = index
            .search("precise", "what is communication based train control", 2)
            .await
            .unwrap();

        assert_eq!(results[0].0.source, "rail.pdf");
        assert!(results[0].1 > results[1].1);
        assert_eq!(results[0].0.score, Some(results[0].1));
    }

    #[tokio::test]
    async fn test_missing_collection_is_unavailable() {
        let index = MemoryIndex::new();
        let err = index.search("precise", "q", 5).await.unwrap_err();
        assert!(matches!(err, QaError::RetrievalUnavailable(_)));
    }

    #[tokio::test]
    async fn test_top_k_cap() {
        let mut index = MemoryIndex::new();
        for seq in 0..10 {
            index.insert("c", chunk("repeated filler text", "doc.pdf", 1, seq));
        }

        let results = index.search("c", "filler", 3).await.unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_load_jsonl_into_all_collections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passages.jsonl");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "{}",
            r#"{"content":"CBTC overview","source":"rail.pdf","page":1,"seq":0}"#
        )
        .unwrap();
        writeln!(
            file,
            "{}",
            r#"{"content":"Moving block principle","source":"rail.pdf","page":2,"seq":1}"#
        )
        .unwrap();

        let index =
            MemoryIndex::load_jsonl(&path, &["precise", "synthesis", "decomposition"]).unwrap();
        assert_eq!(index.len("precise"), 2);
        assert_eq!(index.len("synthesis"), 2);
        assert_eq!(index.len("decomposition"), 2);
        assert!(!index.is_empty("precise"));
    }

    #[test]
    fn test_load_jsonl_rejects_bad_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", r#"{"content":"missing provenance"}"#).unwrap();

        assert!(MemoryIndex::load_jsonl(&path, &["precise"]).is_err());
    }
}

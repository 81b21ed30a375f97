//! Text embedding.
//!
//! The catalog consumes embeddings through the [`Embedder`] trait and never
//! looks inside. [`HashEmbedder`] is a deterministic, model-free embedder that
//! hashes lower-cased word tokens into a fixed number of buckets and
//! L2-normalizes the result, so texts sharing words land close together.

use crate::error::CatalogResult;
use crate::vector::l2_norm;

/// Turns text into a fixed-length vector.
///
/// Implementations must be deterministic for identical input and report
/// model or transport failures as [`CatalogError::EmbeddingUnavailable`].
///
/// [`CatalogError::EmbeddingUnavailable`]: crate::CatalogError::EmbeddingUnavailable
pub trait Embedder: Send + Sync {
    /// Length of every vector returned by [`embed`](Embedder::embed).
    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> CatalogResult<Vec<f32>>;
}

/// Feature-hashing bag-of-words embedder.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    /// Creates an embedder producing vectors of `dimension` floats.
    ///
    /// A zero dimension is bumped to one so every vector has a slot.
    pub fn new(dimension: usize) -> HashEmbedder {
        HashEmbedder { dimension: dimension.max(1) }
    }

    fn bucket(&self, token: &str) -> (usize, f32) {
        let hash = blake3::hash(token.as_bytes());
        let bytes = hash.as_bytes();
        let mut word = [0u8; 8];
        word.copy_from_slice(&bytes[..8]);
        let value = u64::from_le_bytes(word);

        let index = (value % self.dimension as u64) as usize;
        // Top bit picks the sign
        let sign = if value >> 63 == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }
}

impl Embedder for HashEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> CatalogResult<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in tokenize(text) {
            let (index, sign) = self.bucket(&token);
            vector[index] += sign;
        }

        // Text without any word characters embeds to the origin
        if vector.iter().all(|x| *x == 0.0) {
            return Ok(vector);
        }

        l2_norm(&vector)
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

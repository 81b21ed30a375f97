//! The similarity index module
//! Flat, exact L2 nearest-neighbor search over description embeddings

use crate::error::{CatalogError, CatalogResult};
use crate::snapshot::replace_file;
use crate::vector::l2_distance_squared;
use serde::{Serialize, Deserialize};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

#[derive(Default, Serialize, Deserialize)]
struct Snapshot {
    links: Vec<String>,
    vectors: Vec<f32>,
    dimension: Option<usize>,
}

/// Append-only vector index mapping each slot position to a resource link.
///
/// Vectors are stored contiguously as `[v1_d1, v1_d2, ..., v2_d1, ...]` and
/// slots are never removed, so a position stays valid for the life of the
/// index. Stale slots are filtered out by the caller against the store.
pub struct VectorIndex {
    snapshot: Snapshot,
    path: Option<PathBuf>,
}

impl VectorIndex {
    /// Creates a new empty index that is never written to disk.
    ///
    /// The dimension is fixed by the first vector added.
    ///
    /// # Examples
    ///
    /// ```
    /// use rescat::VectorIndex;
    ///
    /// let index = VectorIndex::in_memory();
    /// assert_eq!(index.count(), 0);
    /// ```
    pub fn in_memory() -> VectorIndex {
        VectorIndex { snapshot: Snapshot::default(), path: None }
    }

    /// Opens the index snapshotted at `path`.
    ///
    /// A missing snapshot leaves the index empty rather than failing.
    pub fn open(path: impl AsRef<Path>) -> CatalogResult<VectorIndex> {
        let mut index = VectorIndex {
            snapshot: Snapshot::default(),
            path: Some(path.as_ref().to_path_buf()),
        };
        index.load()?;
        Ok(index)
    }

    /// Appends `vector` at the next position and records its link.
    ///
    /// When the index is file-backed the snapshot is rewritten; if that write
    /// fails the append is undone and [`CatalogError::IndexPersistenceError`]
    /// is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use rescat::VectorIndex;
    ///
    /// let mut index = VectorIndex::in_memory();
    /// index.add("http://a.com", vec![1.0, 0.0]).unwrap();
    ///
    /// // Dimension mismatch error
    /// assert!(index.add("http://b.com", vec![1.0, 2.0, 3.0]).is_err());
    /// ```
    pub fn add(&mut self, link: &str, vector: Vec<f32>) -> CatalogResult<()> {
        let dim = vector.len();
        if dim == 0 {
            return Err(CatalogError::InvalidInput("Cannot index an empty vector".to_string()));
        }
        let fresh = self.snapshot.dimension.is_none();
        match self.snapshot.dimension {
            None => {
                self.snapshot.dimension = Some(dim);
            }
            Some(d) => {
                if dim != d {
                    return Err(CatalogError::DimensionMismatch { expected: d, actual: dim });
                }
            }
        }

        self.snapshot.links.push(link.to_string());
        self.snapshot.vectors.extend(vector);

        if let Err(e) = self.save() {
            self.snapshot.links.pop();
            self.snapshot.vectors.truncate(self.snapshot.links.len() * dim);
            if fresh {
                self.snapshot.dimension = None;
            }
            return Err(e);
        }

        debug!(link, position = self.snapshot.links.len() - 1, "indexed vector");
        Ok(())
    }

    /// Returns the `k` nearest stored vectors to `query`, closest first.
    ///
    /// Distances are Euclidean. Equal distances keep insertion order, so the
    /// earliest slot wins a tie. An empty index yields an empty result.
    ///
    /// # Examples
    ///
    /// ```
    /// use rescat::VectorIndex;
    ///
    /// let mut index = VectorIndex::in_memory();
    /// index.add("http://a.com", vec![1.0, 0.0, 0.0]).unwrap();
    /// index.add("http://b.com", vec![0.0, 1.0, 0.0]).unwrap();
    /// index.add("http://c.com", vec![0.7, 0.7, 0.0]).unwrap();
    ///
    /// let results = index.search(&[1.0, 0.0, 0.0], 2).unwrap();
    /// assert_eq!(results.len(), 2);
    /// assert_eq!(results[0].0, "http://a.com");
    /// assert!(results[0].1.abs() < 1e-6);
    /// ```
    pub fn search(&self, query: &[f32], k: usize) -> CatalogResult<Vec<(String, f32)>> {
        let Some(dim) = self.snapshot.dimension else {
            return Ok(Vec::new());
        };
        if query.len() != dim {
            return Err(CatalogError::DimensionMismatch { expected: dim, actual: query.len() });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        // Bounded sorted buffer of (position, squared distance)
        let mut best: Vec<(usize, f32)> = Vec::with_capacity(k + 1);
        for i in 0..self.snapshot.links.len() {
            let dist = l2_distance_squared(self.get_vector(i, dim), query)?;
            if best.len() == k && best[k - 1].1 <= dist {
                continue;
            }
            let insert_index = best.partition_point(|&(_, d)| d <= dist);
            best.insert(insert_index, (i, dist));
            best.truncate(k);
        }

        let result = best.iter()
            .map(|&(i, dist)| (self.snapshot.links[i].clone(), dist.sqrt()))
            .collect();

        Ok(result)
    }

    /// Number of slots, live or stale.
    pub fn count(&self) -> usize {
        self.snapshot.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.links.is_empty()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.snapshot.dimension
    }

    /// Link recorded at slot `position`.
    pub fn link_at(&self, position: usize) -> Option<&str> {
        self.snapshot.links.get(position).map(String::as_str)
    }

    fn get_vector(&self, index: usize, dim: usize) -> &[f32] {
        let start = index * dim;
        &self.snapshot.vectors[start..start + dim]
    }

    /// Writes the vectors and the position→link table with bincode.
    ///
    /// A no-op for in-memory indexes.
    pub fn save(&self) -> CatalogResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        replace_file(path, |writer| {
            bincode::serialize_into(writer, &self.snapshot).map_err(std::io::Error::other)
        })
        .map_err(|e| persistence_error(path, e))
    }

    /// Replaces the in-memory state with the snapshot on disk.
    ///
    /// A missing snapshot empties the index instead of failing.
    pub fn load(&mut self) -> CatalogResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if !path.exists() {
            warn!(path = %path.display(), "no index snapshot found, starting empty");
            self.snapshot = Snapshot::default();
            return Ok(());
        }

        let file = File::open(path)
            .map_err(|e| persistence_error(path, e))?;

        let reader = BufReader::new(file);
        let snapshot: Snapshot = bincode::deserialize_from(reader)
            .map_err(|e| persistence_error(path, e))?;

        if let Some(dim) = snapshot.dimension {
            if snapshot.vectors.len() != snapshot.links.len() * dim {
                return Err(persistence_error(path, "vector data does not match link table"));
            }
        }

        info!(path = %path.display(), vectors = snapshot.links.len(), "loaded index snapshot");
        self.snapshot = snapshot;
        Ok(())
    }
}

fn persistence_error(path: &Path, err: impl std::fmt::Display) -> CatalogError {
    CatalogError::IndexPersistenceError(format!("'{}': {}", path.display(), err))
}

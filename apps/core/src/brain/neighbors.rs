//! Brute-force k-nearest-neighbor search under cosine distance.

use serde::{Deserialize, Serialize};

/// Default number of neighbors returned per query.
pub const DEFAULT_NEIGHBORS: usize = 3;

/// A corpus row close to a query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Row index in the fitted corpus
    pub index: usize,
    /// Cosine distance: 0.0 for identical direction, 1.0 for no overlap
    pub distance: f32,
}

/// Calculate cosine distance between two vectors.
///
/// A zero vector has no direction, so its distance to anything is 1.0.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 1.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 1.0;
    }

    (1.0 - dot_product / (magnitude_a * magnitude_b)).clamp(0.0, 2.0)
}

/// Nearest-neighbor index over fitted corpus vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborIndex {
    k: usize,
    rows: Vec<Vec<f32>>,
}

impl NeighborIndex {
    pub fn new(k: usize) -> Self {
        Self {
            k: k.max(1),
            rows: Vec::new(),
        }
    }

    /// Replace the indexed rows.
    pub fn fit(&mut self, rows: Vec<Vec<f32>>) {
        self.rows = rows;
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Up to `k` rows closest to `query`, nearest first.
    ///
    /// Equal distances keep corpus order, so the earlier row wins.
    pub fn kneighbors(&self, query: &[f32]) -> Vec<Neighbor> {
        let mut neighbors: Vec<Neighbor> = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| Neighbor {
                index,
                distance: cosine_distance(query, row),
            })
            .collect();

        neighbors.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        neighbors.truncate(self.k);
        neighbors
    }
}

impl Default for NeighborIndex {
    fn default() -> Self {
        Self::new(DEFAULT_NEIGHBORS)
    }
}

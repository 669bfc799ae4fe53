use docqa_core::{Error, Result};

/// Brute-force L2 index. The first non-empty `add` fixes the dimension until
/// the next `clear`.
#[derive(Debug, Default, Clone)]
pub struct FlatL2Index {
    dim: Option<usize>,
    data: Vec<f32>,
    rows: usize,
}

impl FlatL2Index {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.rows }

    pub fn is_empty(&self) -> bool { self.rows == 0 }

    pub fn dim(&self) -> Option<usize> { self.dim }

    /// Append rows. Either every vector is appended or, on error, none is.
    pub fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()> {
        let Some(first) = vectors.first() else { return Ok(()) };
        let expected = self.dim.unwrap_or(first.len());
        if expected == 0 {
            return Err(Error::EmptyVector);
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
            return Err(Error::DimensionMismatch { expected, actual: bad.len() });
        }
        self.data.reserve(expected * vectors.len());
        for v in vectors {
            self.data.extend_from_slice(v);
        }
        self.dim = Some(expected);
        self.rows += vectors.len();
        tracing::debug!(added = vectors.len(), rows = self.rows, dim = expected, "vector rows appended");
        Ok(())
    }

    /// Up to `k` `(squared distance, row)` pairs, closest first. Equal
    /// distances are ordered by row.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(f32, usize)>> {
        let Some(dim) = self.dim else { return Ok(vec![]) };
        if k == 0 || self.rows == 0 {
            return Ok(vec![]);
        }
        if query.len() != dim {
            return Err(Error::DimensionMismatch { expected: dim, actual: query.len() });
        }
        let mut scored: Vec<(f32, usize)> = self
            .data
            .chunks_exact(dim)
            .enumerate()
            .map(|(row, v)| (squared_l2(query, v), row))
            .collect();
        let by_distance = |a: &(f32, usize), b: &(f32, usize)| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1));
        if k < scored.len() {
            scored.select_nth_unstable_by(k - 1, by_distance);
            scored.truncate(k);
        }
        scored.sort_by(by_distance);
        Ok(scored)
    }

    pub fn row(&self, row: usize) -> Option<&[f32]> {
        let dim = self.dim?;
        (row < self.rows).then(|| &self.data[row * dim..(row + 1) * dim])
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.rows = 0;
        self.dim = None;
    }
}

pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Map a non-negative distance into (0, 1]; closer means larger.
pub fn distance_to_similarity(distance: f32) -> f32 {
    1.0 / (1.0 + distance.max(0.0))
}

/// Sparse, non-negative weighted term vector in a fixed-dimension space.
///
/// Entries are kept sorted by column with no duplicates so that dot products
/// are a linear merge.
#[derive(Debug, Clone, PartialEq)]
pub struct TermVector {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

impl TermVector {
    /// Builds a vector from unordered `(column, weight)` pairs. Duplicate
    /// columns are summed; zero weights are dropped.
    pub fn from_pairs(dimension: usize, pairs: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut entries: Vec<(usize, f64)> = pairs.into_iter().collect();
        entries.sort_by_key(|(col, _)| *col);

        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (col, weight) in entries {
            match merged.last_mut() {
                Some((last, acc)) if *last == col => *acc += weight,
                _ => merged.push((col, weight)),
            }
        }
        merged.retain(|(_, w)| *w != 0.0);

        Self {
            dimension,
            entries: merged,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Scales the vector to unit length. A zero vector stays zero.
    pub fn l2_normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
        self
    }

    pub fn dot(&self, other: &TermVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ci, wi) = self.entries[i];
            let (cj, wj) = other.entries[j];
            if ci == cj {
                sum += wi * wj;
                i += 1;
                j += 1;
            } else if ci < cj {
                i += 1;
            } else {
                j += 1;
            }
        }
        sum
    }

    /// Cosine similarity clamped to [0, 1]; 0 when either vector is all-zero.
    pub fn cosine(&self, other: &TermVector) -> f64 {
        if self.is_zero() || other.is_zero() {
            return 0.0;
        }
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            return 0.0;
        }
        (self.dot(other) / denom).clamp(0.0, 1.0)
    }
}

//! The assembled QUBO matrix and its energy evaluator.

use serde::{Deserialize, Serialize};

/// A dense symmetric QUBO matrix.
///
/// Row-major storage; the leading `departure_count` positions belong to
/// departure variables, auxiliary track-pair variables follow. The matrix
/// is immutable once assembled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Qubo {
    size: usize,
    departure_count: usize,
    data: Vec<f64>,
}

impl Qubo {
    pub(crate) fn new(size: usize, departure_count: usize, data: Vec<f64>) -> Self {
        assert_eq!(data.len(), size * size, "matrix storage size mismatch");
        assert!(departure_count <= size);
        Self {
            size,
            departure_count,
            data,
        }
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of leading departure variables.
    pub fn departure_count(&self) -> usize {
        self.departure_count
    }

    /// The cell at row `k`, column `l`.
    pub fn get(&self, k: usize, l: usize) -> f64 {
        self.data[k * self.size + l]
    }

    /// Whether `Q[k][l] == Q[l][k]` holds everywhere. The assembler
    /// produces symmetric matrices by construction; this is a regression
    /// guard for tests.
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|k| (0..k).all(|l| self.get(k, l) == self.get(l, k)))
    }

    /// Evaluates `vᵀ Q v` for a candidate assignment.
    ///
    /// Accepts {0, 1} vectors as well as {-1, 1} spin vectors; a vector
    /// containing any negative entry is treated as spins and recoded via
    /// `(v + 1) / 2` first.
    ///
    /// # Panics
    /// Panics if the assignment length differs from the matrix size.
    pub fn energy(&self, assignment: &[f64]) -> f64 {
        assert_eq!(
            assignment.len(),
            self.size,
            "assignment length {} does not match matrix size {}",
            assignment.len(),
            self.size
        );

        let spins = assignment.iter().any(|&v| v < 0.0);
        let bit = |v: f64| if spins { (v + 1.0) / 2.0 } else { v };

        let mut total = 0.0;
        for (k, &vk) in assignment.iter().enumerate() {
            let vk = bit(vk);
            if vk == 0.0 {
                continue;
            }
            for (l, &vl) in assignment.iter().enumerate() {
                total += vk * self.get(k, l) * bit(vl);
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ones(size: usize) -> Qubo {
        Qubo::new(size, size, vec![1.0; size * size])
    }

    #[test]
    fn test_energy_spin_vector() {
        let q = ones(3);
        // Spins (-1, 1, 1) recode to bits (0, 1, 1): four cells contribute.
        assert_eq!(q.energy(&[-1.0, 1.0, 1.0]), 4.0);
    }

    #[test]
    fn test_energy_binary_spin_invariance() {
        let q = Qubo::new(
            2,
            2,
            vec![-1.0, 0.5, 0.5, -1.0],
        );
        assert_eq!(q.energy(&[1.0, 1.0]), q.energy(&[1.0, 1.0]));
        assert_eq!(q.energy(&[0.0, 1.0]), q.energy(&[-1.0, 1.0]));
        assert_eq!(q.energy(&[1.0, 0.0]), q.energy(&[1.0, -1.0]));
    }

    #[test]
    fn test_symmetry_check() {
        let symmetric = Qubo::new(2, 2, vec![1.0, 2.0, 2.0, 1.0]);
        let skewed = Qubo::new(2, 2, vec![1.0, 2.0, 3.0, 1.0]);
        assert!(symmetric.is_symmetric());
        assert!(!skewed.is_symmetric());
    }

    #[test]
    #[should_panic(expected = "does not match matrix size")]
    fn test_energy_length_mismatch_panics() {
        ones(3).energy(&[1.0, 0.0]);
    }
}

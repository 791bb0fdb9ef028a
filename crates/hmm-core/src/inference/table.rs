//! Dense per-iteration tables.
//!
//! `LogTable` is an `N × S` row-major array (time × state); `PairTable` is an
//! `(N-1) × S × S` array (time × from-state × to-state). Both are allocated
//! once per iteration and dropped when the iteration ends.

/// Dense `rows × cols` table of log-values.
#[derive(Debug, Clone, PartialEq)]
pub struct LogTable {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl LogTable {
    /// Table with every entry set to `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        LogTable {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Entry at time `t`, state `i`.
    pub fn get(&self, t: usize, i: usize) -> f64 {
        self.data[t * self.cols + i]
    }

    pub(crate) fn set(&mut self, t: usize, i: usize, value: f64) {
        self.data[t * self.cols + i] = value;
    }

    /// All states at time `t`.
    pub fn row(&self, t: usize) -> &[f64] {
        let start = t * self.cols;
        &self.data[start..start + self.cols]
    }

    /// State `i` across all time steps.
    pub fn column(&self, i: usize) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().skip(i).step_by(self.cols.max(1)).copied()
    }
}

/// Dense `steps × states × states` table of pairwise log-values.
#[derive(Debug, Clone, PartialEq)]
pub struct PairTable {
    steps: usize,
    states: usize,
    data: Vec<f64>,
}

impl PairTable {
    /// Table with every entry set to `value`.
    pub fn filled(steps: usize, states: usize, value: f64) -> Self {
        PairTable {
            steps,
            states,
            data: vec![value; steps * states * states],
        }
    }

    /// Number of consecutive pairs (N - 1).
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn states(&self) -> usize {
        self.states
    }

    pub fn is_empty(&self) -> bool {
        self.steps == 0
    }

    /// Entry for the pair `(t, t+1)` going from state `i` to state `j`.
    pub fn get(&self, t: usize, i: usize, j: usize) -> f64 {
        self.data[(t * self.states + i) * self.states + j]
    }

    pub(crate) fn set(&mut self, t: usize, i: usize, j: usize, value: f64) {
        self.data[(t * self.states + i) * self.states + j] = value;
    }

    /// All `S²` entries of time slice `t`, row-major in `(i, j)`.
    pub fn slice(&self, t: usize) -> &[f64] {
        let width = self.states * self.states;
        let start = t * width;
        &self.data[start..start + width]
    }

    /// Transition `i → j` across all time steps.
    pub fn transition_series(&self, i: usize, j: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.steps).map(move |t| self.get(t, i, j))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_table_indexing() {
        let mut table = LogTable::filled(3, 2, 0.0);
        table.set(1, 1, 5.0);
        table.set(2, 0, -1.0);
        assert_eq!(table.rows(), 3);
        assert_eq!(table.cols(), 2);
        assert_eq!(table.get(1, 1), 5.0);
        assert_eq!(table.row(1), &[0.0, 5.0]);
        assert_eq!(table.column(0).collect::<Vec<_>>(), vec![0.0, 0.0, -1.0]);
        assert_eq!(table.column(1).collect::<Vec<_>>(), vec![0.0, 5.0, 0.0]);
    }

    #[test]
    fn test_pair_table_indexing() {
        let mut table = PairTable::filled(2, 2, f64::NEG_INFINITY);
        table.set(1, 0, 1, 3.0);
        assert_eq!(table.get(1, 0, 1), 3.0);
        assert_eq!(table.slice(1)[1], 3.0);
        assert_eq!(table.slice(0).len(), 4);
        assert_eq!(
            table.transition_series(0, 1).collect::<Vec<_>>(),
            vec![f64::NEG_INFINITY, 3.0]
        );
    }

    #[test]
    fn test_empty_pair_table() {
        let table = PairTable::filled(0, 3, 0.0);
        assert!(table.is_empty());
        assert_eq!(table.transition_series(0, 0).count(), 0);
    }
}

use super::config::ConfigError;

/// Result of moving the enumerator forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The enumerator now holds a new combination.
    Moved,
    /// No combinations remain. The enumerator keeps its last combination.
    Exhausted,
}

/// Walks the strictly increasing k-tuples of indices into a lattice of size `n`
/// in lexicographic order.
///
/// The held combination is always valid: strictly increasing with every index
/// below `n`. Intermediate states of the prune jump live in a scratch buffer and
/// are only committed once a valid successor has been found.
#[derive(Debug, Clone)]
pub struct CombinationEnumerator {
    lattice_size: usize,
    indices: Vec<usize>,
    scratch: Vec<usize>,
    started: bool,
    exhausted: bool,
}

impl CombinationEnumerator {
    pub fn new(lattice_size: usize, k: usize) -> Result<Self, ConfigError> {
        if k == 0 || k > lattice_size {
            return Err(ConfigError::InvalidParameter {
                name: "points",
                reason: format!(
                    "cannot enumerate {}-combinations of {} lattice points",
                    k, lattice_size
                ),
            });
        }
        Ok(Self {
            lattice_size,
            indices: (0..k).collect(),
            scratch: Vec::with_capacity(k),
            started: false,
            exhausted: false,
        })
    }

    /// Moves to the lexicographically first combination `[0, 1, ..., k-1]`.
    pub fn reset(&mut self) {
        for (position, index) in self.indices.iter_mut().enumerate() {
            *index = position;
        }
        self.started = true;
        self.exhausted = false;
    }

    /// Moves to the next combination in lexicographic order.
    ///
    /// On an enumerator that has not been reset yet this is equivalent to
    /// [`reset`](Self::reset).
    pub fn advance_exhaustive(&mut self) -> Advance {
        if let Some(outcome) = self.check_bounds() {
            return outcome;
        }
        if next_combination(&mut self.indices, self.lattice_size) {
            Advance::Moved
        } else {
            self.exhausted = true;
            Advance::Exhausted
        }
    }

    /// Skips the remaining combinations that keep `indices[pivot]` fixed.
    ///
    /// `indices[pivot]` is incremented and every later position is re-derived as
    /// its predecessor plus one. When that overshoots the lattice the carry
    /// propagates to earlier positions exactly as in
    /// [`advance_exhaustive`](Self::advance_exhaustive). A pivot at the last
    /// position behaves like an exhaustive advance.
    ///
    /// The visited sequence is a strict subsequence of the exhaustive order, so
    /// this mode carries no completeness guarantee.
    pub fn advance_with_prune_hint(&mut self, pivot: usize) -> Advance {
        if let Some(outcome) = self.check_bounds() {
            return outcome;
        }
        debug_assert!(pivot < self.indices.len(), "pivot {} out of range", pivot);

        self.scratch.clear();
        self.scratch.extend_from_slice(&self.indices);
        apply_prune_jump(&mut self.scratch, pivot);

        if next_combination(&mut self.scratch, self.lattice_size) {
            std::mem::swap(&mut self.indices, &mut self.scratch);
            Advance::Moved
        } else {
            self.exhausted = true;
            Advance::Exhausted
        }
    }

    fn check_bounds(&mut self) -> Option<Advance> {
        if self.exhausted {
            return Some(Advance::Exhausted);
        }
        if !self.started {
            self.reset();
            return Some(Advance::Moved);
        }
        None
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn k(&self) -> usize {
        self.indices.len()
    }

    pub fn lattice_size(&self) -> usize {
        self.lattice_size
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Number of combinations visited by exhaustive enumeration, saturating at `u64::MAX`.
    pub fn total_combinations(&self) -> u64 {
        binomial(self.lattice_size, self.indices.len())
    }
}

/// Advances `indices` to the next strictly increasing tuple below `n`.
///
/// Positions whose value already exceeds their maximum are skipped over, which
/// lets the same routine repair the state left by [`apply_prune_jump`].
fn next_combination(indices: &mut [usize], n: usize) -> bool {
    let k = indices.len();
    for p in (0..k).rev() {
        if indices[p] < n - k + p {
            indices[p] += 1;
            for q in p + 1..k {
                indices[q] = indices[p] + (q - p);
            }
            return true;
        }
    }
    false
}

/// Increments `indices[pivot]` and re-derives the later positions.
///
/// The last position is set equal to its predecessor so that the following
/// [`next_combination`] step lands on predecessor plus one. A pivot at the last
/// position leaves the tuple untouched.
fn apply_prune_jump(indices: &mut [usize], pivot: usize) {
    let last = indices.len() - 1;
    if pivot >= last {
        return;
    }
    indices[pivot] += 1;
    for q in pivot + 1..=last {
        indices[q] = if q == last {
            indices[q - 1]
        } else {
            indices[q - 1] + 1
        };
    }
}

/// `n choose k`, saturating at `u64::MAX`.
pub fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        result = result * (n - i) as u128 / (i + 1) as u128;
        if result > u64::MAX as u128 {
            return u64::MAX;
        }
    }
    result as u64
}

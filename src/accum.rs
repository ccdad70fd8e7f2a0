//! Compensated summation
//!
//! Naive left-to-right summation accumulates rounding error that grows
//! with the number of terms. The accumulators here keep that error under
//! control: [`KahanSum`] carries an explicit correction term and gives the
//! tightest bound at the cost of extra arithmetic per element, while
//! [`PairwiseSum`] merges 64-element blocks binary-tree style and is the
//! cheaper choice for data that is already materialized in a slice.
//!
//! Both implement the [`Accumulator`] contract, so inner products inside
//! the decompositions can swap strategies without touching the call sites.

use crate::error::{Error, Result};

/// A running summation that controls floating-point error accumulation.
///
/// `sum` may be called at any time; more values can be added afterward.
pub trait Accumulator {
    /// Add a single value to the summation.
    fn add(&mut self, value: f64);

    /// Add every element of a slice to the summation.
    fn add_slice(&mut self, values: &[f64]);

    /// Add the elements with indices in `[start, end)` to the summation.
    ///
    /// Fails if the index pair is inverted or out of range.
    fn add_range(&mut self, values: &[f64], start: usize, end: usize) -> Result<()>;

    /// Add every value produced by an iterator to the summation.
    fn add_iter<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = f64>,
        Self: Sized,
    {
        for value in values {
            self.add(value);
        }
    }

    /// The sum of all values added so far.
    fn sum(&self) -> f64;

    /// Reset the accumulator to sum a new set of values.
    fn reset(&mut self);
}

fn check_range(len: usize, start: usize, end: usize) -> Result<()> {
    if end < start || end > len {
        return Err(Error::IndexRange { start, end, len });
    }
    Ok(())
}

/// Kahan (compensated) summation.
///
/// Each addition recovers the rounding error of the previous one and
/// reapplies it, giving an error bound independent of how many values are
/// summed. Slightly more expensive per element than [`PairwiseSum`].
#[derive(Debug, Clone, Default)]
pub struct KahanSum {
    total: f64,
    c: f64,
}

impl KahanSum {
    /// Create an accumulator with a zero sum.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Accumulator for KahanSum {
    #[inline]
    fn add(&mut self, value: f64) {
        // The parenthesization is the algorithm; do not simplify.
        let y = value - self.c;
        let t = self.total + y;
        self.c = (t - self.total) - y;
        self.total = t;
    }

    fn add_slice(&mut self, values: &[f64]) {
        for &value in values {
            self.add(value);
        }
    }

    fn add_range(&mut self, values: &[f64], start: usize, end: usize) -> Result<()> {
        check_range(values.len(), start, end)?;
        for &value in &values[start..end] {
            self.add(value);
        }
        Ok(())
    }

    #[inline]
    fn sum(&self) -> f64 {
        self.total
    }

    fn reset(&mut self) {
        self.total = 0.0;
        self.c = 0.0;
    }
}

// Blocks of BLOCK values are summed naively, which trims the bottom
// log2(BLOCK) levels off the recursion.
const BLOCK: usize = 64;

const INITIAL_LEVELS: usize = 32;
const LEVEL_INCREMENT: usize = 16;

/// Pairwise (cascade) summation.
///
/// Values are grouped into blocks of 64, summed naively within a block,
/// and completed blocks are merged upward binary-tree style: a carry at
/// level `k` combines two partial sums into one at level `k + 1`. For a
/// one-shot sum of a slice, use [`PairwiseSum::sum_slice`], which needs no
/// persistent state.
#[derive(Debug, Clone)]
pub struct PairwiseSum {
    psums: Vec<f64>,
    occupied: Vec<bool>,
    max: usize,
    subtotal: f64,
    count: usize,
}

impl Default for PairwiseSum {
    fn default() -> Self {
        Self {
            psums: vec![0.0; INITIAL_LEVELS],
            occupied: vec![false; INITIAL_LEVELS],
            max: 0,
            subtotal: 0.0,
            count: 0,
        }
    }
}

impl PairwiseSum {
    /// Create an accumulator with a zero sum.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum the elements of a slice with no persistent state.
    pub fn sum_slice(values: &[f64]) -> f64 {
        pairwise(values)
    }

    /// Merge `sum` into the level array starting at `index`, carrying
    /// upward until a free slot is found.
    fn merge_at_level(&mut self, mut index: usize, mut sum: f64) {
        while self.occupied[index] {
            sum += self.psums[index];
            self.occupied[index] = false;
            self.psums[index] = 0.0;
            index += 1;
            if index == self.psums.len() {
                self.psums.resize(self.psums.len() + LEVEL_INCREMENT, 0.0);
                self.occupied.resize(self.occupied.len() + LEVEL_INCREMENT, false);
            }
        }
        self.psums[index] = sum;
        self.occupied[index] = true;
        if index >= self.max {
            self.max = index + 1;
        }
    }
}

impl Accumulator for PairwiseSum {
    fn add(&mut self, value: f64) {
        self.subtotal += value;
        self.count += 1;
        if self.count == BLOCK {
            let block_sum = self.subtotal;
            self.subtotal = 0.0;
            self.count = 0;
            self.merge_at_level(0, block_sum);
        }
    }

    fn add_slice(&mut self, values: &[f64]) {
        // Infallible: the full range is always in bounds.
        let _ = self.add_range(values, 0, values.len());
    }

    fn add_range(&mut self, values: &[f64], start: usize, end: usize) -> Result<()> {
        check_range(values.len(), start, end)?;
        let mut start = start;

        // Feed the mod-BLOCK remainder through the scalar path so the
        // rest of the range is an exact multiple of BLOCK.
        let mut remainder = (end - start) % BLOCK;
        while remainder > 0 {
            self.add(values[start]);
            start += 1;
            remainder -= 1;
        }
        if start == end {
            return Ok(());
        }

        // Find the tree level whose span covers the remaining elements:
        // the largest power of two times BLOCK that does not exceed n.
        let n = end - start;
        let mut span = BLOCK;
        let mut index = 0;
        while span < n {
            span <<= 1;
            index += 1;
        }
        if span > n {
            index -= 1;
        }

        let sum = pairwise(&values[start..end]);
        self.merge_at_level(index, sum);
        Ok(())
    }

    fn sum(&self) -> f64 {
        let mut sum = self.subtotal;
        for &psum in &self.psums[..self.max] {
            sum += psum;
        }
        sum
    }

    fn reset(&mut self) {
        self.psums.fill(0.0);
        self.occupied.fill(false);
        self.max = 0;
        self.subtotal = 0.0;
        self.count = 0;
    }
}

/// Recursive pairwise sum: split at the midpoint down to blocks shorter
/// than [`BLOCK`], which are summed linearly.
fn pairwise(values: &[f64]) -> f64 {
    if values.len() < BLOCK {
        let mut total = 0.0;
        for &value in values {
            total += value;
        }
        total
    } else {
        let (lo, hi) = values.split_at(values.len() / 2);
        pairwise(lo) + pairwise(hi)
    }
}

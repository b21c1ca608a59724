//! Fixed-size packed bit vector backing the filter

use crate::error::{FilterError, Result};

/// Packed boolean vector over 64-bit words.
///
/// Length is fixed at construction and bits only ever transition from unset
/// to set. `num_bits` is not rounded up: trailing bits of the last word past
/// the addressable range stay zero.
#[derive(Clone, Debug, PartialEq)]
pub struct BitArray {
    words: Vec<u64>,
    num_bits: usize,
}

impl BitArray {
    /// Allocates a zeroed array addressing `num_bits` positions.
    ///
    /// Allocation failure surfaces as [`FilterError::AllocationFailed`]
    /// instead of aborting the process.
    pub fn new(num_bits: usize) -> Result<Self> {
        let word_count = Self::word_count(num_bits);
        let mut words = Vec::new();
        words
            .try_reserve_exact(word_count)
            .map_err(|_| FilterError::AllocationFailed {
                bytes: word_count.saturating_mul(8),
            })?;
        words.resize(word_count, 0);
        Ok(Self { words, num_bits })
    }

    /// Rebuilds an array from previously exported words.
    ///
    /// The word count must match the geometry exactly; a mismatched sequence
    /// does not describe an array of `num_bits` bits and is rejected rather
    /// than truncated or padded.
    pub fn from_words(num_bits: usize, words: Vec<u64>) -> Result<Self> {
        let expected = Self::word_count(num_bits);
        if words.len() != expected {
            return Err(FilterError::CorruptState {
                num_bits,
                expected,
                actual: words.len(),
            });
        }
        Ok(Self { words, num_bits })
    }

    /// Sets the bit at `index`. Idempotent.
    ///
    /// Callers guarantee `index < num_bits`; the index generator reduces
    /// every probe modulo the bit count.
    pub fn set(&mut self, index: usize) {
        self.words[index / 64] |= 1u64 << (index % 64);
    }

    /// Whether the bit at `index` is set.
    pub fn test(&self, index: usize) -> bool {
        self.words[index / 64] & (1u64 << (index % 64)) != 0
    }

    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Read-only view of the backing words, reflecting current state exactly.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Number of set bits across the whole array.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    fn word_count(num_bits: usize) -> usize {
        num_bits.div_ceil(64)
    }
}

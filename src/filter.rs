//! Bloom filter: probabilistic set membership over byte content
//!
//! Answers "possibly present" or "definitely absent" in sub-linear memory.
//! False positives are possible and bounded by the configured rate; false
//! negatives cannot happen. There is no removal and no resizing: bits only
//! ever transition from unset to set.

use crate::bits::BitArray;
use crate::error::{FilterError, Result};
use crate::hash::probe_indices;
use crate::params::optimal_params;

/// A space-efficient probabilistic membership filter.
///
/// Items are presented as raw bytes; text and binary content are treated
/// uniformly. `add` takes `&mut self` and `might_contain` takes `&self`, so
/// the borrow checker enforces the supported access pattern: one exclusive
/// writer, or any number of readers with no writer.
#[derive(Clone)]
pub struct BloomFilter {
    bits: BitArray,
    num_hashes: u32,
}

/// Exported filter state, sufficient to reconstruct an identical filter via
/// [`BloomFilter::from_snapshot`].
///
/// The `(num_bits, num_hashes, words)` triple is the entire wire format; any
/// serialization mechanism that preserves the three fields and the word order
/// can persist a filter. The words are an independent copy of the live bit
/// array, so mutating a snapshot never corrupts the filter it came from.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub num_bits: usize,
    pub num_hashes: u32,
    pub words: Vec<u64>,
}

impl BloomFilter {
    /// Creates a filter sized for `expected_items` at `false_positive_rate`.
    ///
    /// Bit count and hash count are derived with the standard optimal-sizing
    /// formulas; see [`optimal_params`](crate::params::optimal_params) for
    /// the failure conditions.
    pub fn with_capacity(expected_items: usize, false_positive_rate: f64) -> Result<Self> {
        let (num_bits, num_hashes) = optimal_params(expected_items, false_positive_rate)?;
        let bits = BitArray::new(num_bits)?;
        tracing::debug!(
            "sized filter to {} bits / {} hashes for {} items at rate {}",
            num_bits,
            num_hashes,
            expected_items,
            false_positive_rate
        );
        Ok(Self { bits, num_hashes })
    }

    /// Creates a filter with an explicit geometry.
    ///
    /// No cap is applied to `num_hashes` on this path; the caller's count is
    /// taken as given. Zero for either parameter is rejected.
    pub fn with_params(num_bits: usize, num_hashes: u32) -> Result<Self> {
        Self::check_geometry(num_bits, num_hashes)?;
        let bits = BitArray::new(num_bits)?;
        Ok(Self { bits, num_hashes })
    }

    /// Reconstructs a filter from previously exported state.
    ///
    /// `words` must have exactly `ceil(num_bits / 64)` entries in their
    /// original order; any other length fails with
    /// [`FilterError::CorruptState`].
    pub fn restore(num_bits: usize, num_hashes: u32, words: Vec<u64>) -> Result<Self> {
        Self::check_geometry(num_bits, num_hashes)?;
        let bits = BitArray::from_words(num_bits, words)?;
        Ok(Self { bits, num_hashes })
    }

    /// Reconstructs a filter from a [`Snapshot`].
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        Self::restore(snapshot.num_bits, snapshot.num_hashes, snapshot.words)
    }

    fn check_geometry(num_bits: usize, num_hashes: u32) -> Result<()> {
        if num_bits == 0 {
            return Err(FilterError::InvalidParameter(
                "number of bits must be greater than zero".to_string(),
            ));
        }
        if num_hashes == 0 {
            return Err(FilterError::InvalidParameter(
                "number of hash functions must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Inserts an item given as raw bytes.
    ///
    /// Never fails once the filter is constructed; the only effect is setting
    /// bits that may already be set.
    pub fn add(&mut self, item: &[u8]) {
        for index in probe_indices(item, self.bits.num_bits(), self.num_hashes) {
            self.bits.set(index);
        }
    }

    /// Whether `item` might have been added.
    ///
    /// Returns `false` on the first probe position found unset, which makes
    /// the answer "definitely absent". `true` means "possibly present": every
    /// probe position is set, either because this exact content was added or
    /// because other insertions happen to cover all of them.
    pub fn might_contain(&self, item: &[u8]) -> bool {
        for index in probe_indices(item, self.bits.num_bits(), self.num_hashes) {
            if !self.bits.test(index) {
                return false;
            }
        }
        true
    }

    /// Total addressable bit positions (m).
    pub fn num_bits(&self) -> usize {
        self.bits.num_bits()
    }

    /// Probe positions derived per item (k).
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    /// Exports the persisted state as an independent copy.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            num_bits: self.bits.num_bits(),
            num_hashes: self.num_hashes,
            words: self.bits.words().to_vec(),
        }
    }

    /// Number of set bits in the backing array.
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Estimated false positive rate at the current occupancy.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        let fill_ratio = self.bits_set() as f64 / self.bits.num_bits() as f64;
        fill_ratio.powf(f64::from(self.num_hashes))
    }

    /// Size of the backing bit array in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.bits.words().len() * 8
    }
}

impl std::fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BloomFilter")
            .field("num_bits", &self.num_bits())
            .field("num_hashes", &self.num_hashes)
            .field("bits_set", &self.bits_set())
            .field("memory_bytes", &self.memory_bytes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn test_basic_add_lookup() {
        let mut filter = BloomFilter::with_capacity(100, 0.01).unwrap();

        filter.add(b"hello");
        filter.add(b"world");

        assert!(filter.might_contain(b"hello"));
        assert!(filter.might_contain(b"world"));
        assert!(!filter.might_contain(b"something else entirely"));
    }

    #[test]
    fn test_empty_filter_contains_nothing() {
        let filter = BloomFilter::with_capacity(100, 0.01).unwrap();
        assert!(!filter.might_contain(b""));
        assert!(!filter.might_contain(b"anything"));
        assert_eq!(filter.bits_set(), 0);
        assert_eq!(filter.estimated_false_positive_rate(), 0.0);
    }

    #[test]
    fn test_no_false_negatives() {
        let mut filter = BloomFilter::with_params(2048, 5).unwrap();

        let items: Vec<Vec<u8>> = (0..500u32)
            .map(|i| format!("item-{}", i).into_bytes())
            .chain([b"\x00\x01\x02\xff".to_vec(), b"".to_vec()])
            .collect();
        for item in &items {
            filter.add(item);
        }
        for item in &items {
            assert!(filter.might_contain(item));
        }
    }

    #[test]
    fn test_binary_and_text_content_uniform() {
        let mut filter = BloomFilter::with_capacity(10, 0.01).unwrap();
        filter.add("text item".as_bytes());
        filter.add(&[0u8, 159, 146, 150]);

        assert!(filter.might_contain(b"text item"));
        assert!(filter.might_contain(&[0u8, 159, 146, 150]));
    }

    #[test]
    fn test_monotonicity_under_inserts() {
        let mut filter = BloomFilter::with_capacity(1000, 0.01).unwrap();
        filter.add(b"pinned");
        assert!(filter.might_contain(b"pinned"));

        for i in 0..1000u32 {
            filter.add(format!("noise-{}", i).as_bytes());
            assert!(filter.might_contain(b"pinned"));
        }
    }

    #[test]
    fn test_single_bit_filter_saturates() {
        let mut filter = BloomFilter::with_params(1, 1).unwrap();
        assert_eq!(filter.num_bits(), 1);
        assert!(!filter.might_contain(b"x"));

        filter.add(b"x");

        // The only bit is now set, so every query reports possibly-present.
        assert!(filter.might_contain(b"x"));
        assert!(filter.might_contain(b"y"));
        assert!(filter.might_contain(b"completely unrelated"));
        assert_eq!(filter.bits_set(), 1);
    }

    #[test]
    fn test_determinism_across_instances() {
        let mut a = BloomFilter::with_params(4096, 3).unwrap();
        let mut b = BloomFilter::with_params(4096, 3).unwrap();

        for i in 0..200u32 {
            let item = format!("record-{}", i);
            a.add(item.as_bytes());
            b.add(item.as_bytes());
        }

        assert_eq!(a.snapshot().words, b.snapshot().words);
    }

    #[test]
    fn test_restore_round_trip() {
        let mut original = BloomFilter::with_capacity(500, 0.01).unwrap();
        let items: Vec<String> = (0..500).map(|i| format!("key-{}", i)).collect();
        for item in &items {
            original.add(item.as_bytes());
        }

        let snapshot = original.snapshot();
        let restored = BloomFilter::from_snapshot(snapshot.clone()).unwrap();

        assert_eq!(restored.num_bits(), original.num_bits());
        assert_eq!(restored.num_hashes(), original.num_hashes());
        assert_eq!(restored.snapshot().words, snapshot.words);
        for item in &items {
            assert!(restored.might_contain(item.as_bytes()));
        }
        // Queries agree on non-members too, false positives included.
        for i in 500..1500 {
            let probe = format!("key-{}", i);
            assert_eq!(
                restored.might_contain(probe.as_bytes()),
                original.might_contain(probe.as_bytes())
            );
        }
    }

    #[test]
    fn test_snapshot_is_independent_copy() {
        let mut filter = BloomFilter::with_params(128, 2).unwrap();
        filter.add(b"present");
        let pristine = filter.snapshot();

        let mut mutated = filter.snapshot();
        for word in &mut mutated.words {
            *word = !0;
        }

        // Corrupting the export must not leak into the live filter.
        assert_eq!(filter.snapshot(), pristine);
        assert_ne!(mutated.words, pristine.words);

        // A restore from the untouched export still works.
        let restored = BloomFilter::from_snapshot(pristine).unwrap();
        assert!(restored.might_contain(b"present"));
    }

    #[test]
    fn test_snapshot_serde_round_trip() {
        let mut filter = BloomFilter::with_capacity(50, 0.05).unwrap();
        filter.add(b"persisted");

        let encoded = serde_json::to_string(&filter.snapshot()).unwrap();
        let decoded: Snapshot = serde_json::from_str(&encoded).unwrap();
        let restored = BloomFilter::from_snapshot(decoded).unwrap();

        assert!(restored.might_contain(b"persisted"));
        assert_eq!(restored.snapshot(), filter.snapshot());
    }

    #[test]
    fn test_with_params_rejects_zero_geometry() {
        assert!(matches!(
            BloomFilter::with_params(0, 3),
            Err(FilterError::InvalidParameter(_))
        ));
        assert!(matches!(
            BloomFilter::with_params(64, 0),
            Err(FilterError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_with_capacity_propagates_optimizer_errors() {
        assert!(matches!(
            BloomFilter::with_capacity(0, 0.01),
            Err(FilterError::InvalidParameter(_))
        ));
        assert!(matches!(
            BloomFilter::with_capacity(100, 1.0),
            Err(FilterError::InvalidParameter(_))
        ));
        assert!(matches!(
            BloomFilter::with_capacity(usize::MAX, 1e-300),
            Err(FilterError::BitCountOverflow(_))
        ));
    }

    #[test]
    fn test_restore_rejects_zero_geometry() {
        assert!(matches!(
            BloomFilter::restore(0, 1, vec![]),
            Err(FilterError::InvalidParameter(_))
        ));
        assert!(matches!(
            BloomFilter::restore(64, 0, vec![0]),
            Err(FilterError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_restore_rejects_word_count_mismatch() {
        assert!(matches!(
            BloomFilter::restore(128, 3, vec![0u64; 3]),
            Err(FilterError::CorruptState { expected: 2, actual: 3, .. })
        ));
    }

    #[test]
    fn test_explicit_hash_count_not_capped() {
        let filter = BloomFilter::with_params(1 << 16, 40).unwrap();
        assert_eq!(filter.num_hashes(), 40);
    }

    #[test]
    fn test_empirical_false_positive_rate() {
        let n = 10_000usize;
        let target = 0.01f64;
        let mut filter = BloomFilter::with_capacity(n, target).unwrap();

        // Draw distinct random keys; first n go in, the rest probe for
        // false positives.
        let mut rng = StdRng::seed_from_u64(0xB10F);
        let mut keys = HashSet::new();
        while keys.len() < n * 11 {
            keys.insert(rng.gen::<u64>());
        }
        let keys: Vec<u64> = keys.into_iter().collect();

        for key in &keys[..n] {
            filter.add(&key.to_le_bytes());
        }

        let false_positives = keys[n..]
            .iter()
            .filter(|key| filter.might_contain(&key.to_le_bytes()))
            .count();
        let observed = false_positives as f64 / (keys.len() - n) as f64;

        assert!(
            observed < target * 2.5,
            "observed rate {:.4} too far above target {}",
            observed,
            target
        );
        // A filter loaded to capacity should also not be suspiciously clean.
        assert!(observed > target / 10.0, "observed rate {:.4} implausibly low", observed);

        // The occupancy-based estimate should agree with reality.
        let estimated = filter.estimated_false_positive_rate();
        assert!(estimated > 0.0 && estimated < target * 2.5);
    }
}

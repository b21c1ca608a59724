//! Bitsift: Probabilistic Set-Membership Filter
//!
//! A Bloom filter over raw byte content: queries answer "possibly present"
//! or "definitely absent" in sub-linear memory, trading a configurable
//! false-positive rate for space.
//!
//! # Features
//!
//! - **Optimal Sizing**: Derive bit count and hash count from expected
//!   capacity and target error rate
//! - **Explicit Geometry**: Construct directly from `(num_bits, num_hashes)`
//! - **Double Hashing**: k probe positions from two seeded XXH64 base hashes
//! - **Bit-Exact Persistence**: Export `(num_bits, num_hashes, words)` and
//!   restore an indistinguishable filter
//! - **No False Negatives**: An added item is always reported as possibly
//!   present
//!
//! # Example
//!
//! ```
//! use bitsift::BloomFilter;
//!
//! let mut filter = BloomFilter::with_capacity(1000, 0.01).unwrap();
//!
//! filter.add(b"alpha");
//! filter.add(b"beta");
//!
//! assert!(filter.might_contain(b"alpha"));
//! assert!(!filter.might_contain(b"gamma"));
//!
//! // Persist and rehydrate bit-for-bit.
//! let snapshot = filter.snapshot();
//! let restored = BloomFilter::from_snapshot(snapshot).unwrap();
//! assert!(restored.might_contain(b"alpha"));
//! ```

pub mod error;
pub mod filter;
pub mod params;

mod bits;
mod hash;

// Re-export commonly used types
pub use error::FilterError;
pub use filter::{BloomFilter, Snapshot};
pub use hash::{HASH_SEED_1, HASH_SEED_2};
pub use params::{optimal_params, MAX_NUM_HASHES};

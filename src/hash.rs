//! Probe index derivation from item bytes
//!
//! Two seeded XXH64 base hashes are stretched into k probe positions by the
//! double-hashing recurrence `index_i = (h1 + i * h2) mod m`. The hash
//! algorithm, the two seeds, and the recurrence together define the persisted
//! wire format: a snapshot written under this scheme is only queryable under
//! this scheme.

use xxhash_rust::xxh64::xxh64;

/// Seed for the first base hash.
pub const HASH_SEED_1: u64 = 0x5F0D_42B1_A956_789F;
/// Seed for the second base hash.
pub const HASH_SEED_2: u64 = 0x9B1A_75C3_E0D6_F2A7;

/// Derives `num_hashes` bit indices in `[0, num_bits)` from `item`.
///
/// Identical bytes with identical `(num_bits, num_hashes)` always yield the
/// identical sequence, which is what makes membership queries sound relative
/// to earlier insertions. Collisions between distinct items are the accepted
/// source of false positives and are not handled.
pub fn probe_indices(
    item: &[u8],
    num_bits: usize,
    num_hashes: u32,
) -> impl Iterator<Item = usize> {
    let h1 = xxh64(item, HASH_SEED_1);
    let h2 = xxh64(item, HASH_SEED_2);
    let m = num_bits as u64;
    (0..u64::from(num_hashes)).map(move |i| (h1.wrapping_add(i.wrapping_mul(h2)) % m) as usize)
}

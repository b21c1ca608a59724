//! Optimal filter sizing from capacity and target error rate

use crate::error::{FilterError, Result};

/// Ceiling on the number of hash functions the optimizer will pick.
///
/// Past this point extra probes cost more than they improve the error rate.
/// Applies to derived parameters only; explicit construction takes the
/// caller's count as given.
pub const MAX_NUM_HASHES: u32 = 32;

/// Computes the optimal bit count and hash count for holding
/// `expected_items` at `false_positive_rate`.
///
/// Uses the standard sizing formulas:
/// `m = -n * ln(p) / ln(2)^2` and `k = (m / n) * ln(2)`,
/// with m floored at 1 and k clamped to `[1, MAX_NUM_HASHES]`.
///
/// Fails with [`FilterError::InvalidParameter`] when `expected_items` is zero
/// or the rate is not strictly between 0 and 1, and with
/// [`FilterError::BitCountOverflow`] when the computed bit count cannot be
/// addressed on this platform. The overflow check runs before any allocation
/// would take place.
pub fn optimal_params(expected_items: usize, false_positive_rate: f64) -> Result<(usize, u32)> {
    if expected_items == 0 {
        return Err(FilterError::InvalidParameter(
            "expected item count must be greater than zero".to_string(),
        ));
    }
    // NaN fails both comparisons and lands here as well.
    if !(false_positive_rate > 0.0 && false_positive_rate < 1.0) {
        return Err(FilterError::InvalidParameter(format!(
            "false positive rate must be between 0.0 and 1.0 exclusive, got {}",
            false_positive_rate
        )));
    }

    let n = expected_items as f64;
    let ln2_squared = std::f64::consts::LN_2 * std::f64::consts::LN_2;
    let target_bits = -n * false_positive_rate.ln() / ln2_squared;
    if target_bits > usize::MAX as f64 {
        return Err(FilterError::BitCountOverflow(target_bits));
    }
    let num_bits = (target_bits.ceil() as usize).max(1);

    let num_hashes = ((num_bits as f64 / n) * std::f64::consts::LN_2).ceil() as u32;
    let num_hashes = num_hashes.clamp(1, MAX_NUM_HASHES);

    Ok((num_bits, num_hashes))
}

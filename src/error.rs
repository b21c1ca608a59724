//! Error types shared across the crate

/// Errors raised by filter construction.
///
/// Steady-state operations (`add`, `might_contain`) are infallible; every
/// variant here surfaces synchronously from one of the constructors. Failures
/// are terminal for the call that triggered them: a filter is either fully
/// constructed or not constructed at all.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The optimizer's real-valued bit count exceeds what `usize` can
    /// address on this platform. Raised before any allocation is attempted.
    #[error("computed bit count {0:.0} exceeds addressable memory")]
    BitCountOverflow(f64),

    /// A restored word sequence does not match the filter geometry.
    #[error("corrupt state: {num_bits} bits require {expected} words, got {actual}")]
    CorruptState {
        num_bits: usize,
        expected: usize,
        actual: usize,
    },

    #[error("failed to allocate {bytes} bytes for the bit array")]
    AllocationFailed { bytes: usize },
}

pub type Result<T> = std::result::Result<T, FilterError>;

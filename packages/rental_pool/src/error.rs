use thiserror::Error;

/// Errors that can occur when configuring a pool.
///
/// Discarding an instance, whether because the policy rejected it or because the pool was
/// full, is a normal outcome and never surfaces as an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The caller asked for a pool with a capacity below zero.
    #[error("invalid pool capacity {capacity}: capacity must not be negative")]
    NegativeCapacity {
        /// The capacity value that was rejected.
        capacity: isize,
    },
}

/// A specialized `Result` type for pool operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;

use std::any::type_name;

use tracing::debug;

use crate::{Error, Pool, PoolPolicy, Result};

/// Creates a pool that binds `policy` to a signed `capacity`, validating the capacity first.
///
/// This is the entry point for capacities that originate outside of Rust's type system (e.g.
/// from another component's configuration) and may therefore be negative. A capacity of zero is
/// valid and produces a pass-through pool.
///
/// # Errors
///
/// Returns [`Error::NegativeCapacity`] if `capacity` is below zero.
///
/// # Example
///
/// ```rust
/// use rental_pool::{ClearPolicy, Error, create_pool};
///
/// let pool = create_pool::<Vec<u8>, _>(ClearPolicy, 16).unwrap();
/// assert_eq!(pool.capacity(), 16);
///
/// let result = create_pool::<Vec<u8>, _>(ClearPolicy, -1);
/// assert!(matches!(result, Err(Error::NegativeCapacity { capacity: -1 })));
/// ```
pub fn create_pool<T, P>(policy: P, capacity: isize) -> Result<Pool<T, P>>
where
    P: PoolPolicy<T>,
{
    let Ok(capacity) = usize::try_from(capacity) else {
        return Err(Error::NegativeCapacity { capacity });
    };

    debug!(item_type = type_name::<T>(), capacity, "created pool");

    Ok(Pool::new(policy, capacity))
}

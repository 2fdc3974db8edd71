use std::any::type_name;
use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::{Pool, PoolPolicy};

const ERR_ITEM_TAKEN: &str = "lease item is only taken by methods that consume the lease";

/// A rented instance bound to the scope of this value.
///
/// Created by [`Pool::rent_scoped()`]. Dereferences to the rented instance and returns it to the
/// pool exactly once: when the lease is dropped, whether the scope ends normally, through an
/// early return or because of a panic. Calling [`release()`][Self::release] returns the instance
/// earlier; the drop that follows does nothing.
///
/// # Example
///
/// ```rust
/// use rental_pool::{ClearPolicy, Pool};
///
/// fn parse(pool: &Pool<Vec<u32>, ClearPolicy>, input: &str) -> Result<u32, std::num::ParseIntError> {
///     let mut numbers = pool.rent_scoped();
///
///     for part in input.split(',') {
///         // An early return still gives the list back to the pool.
///         numbers.push(part.parse()?);
///     }
///
///     Ok(numbers.iter().sum())
/// }
///
/// let pool = Pool::new(ClearPolicy, 4);
///
/// assert_eq!(parse(&pool, "1,2,3").unwrap(), 6);
/// assert!(parse(&pool, "1,x").is_err());
///
/// // Both calls used the same list.
/// assert_eq!(pool.idle_count(), 1);
/// ```
pub struct PoolLease<'a, T, P>
where
    P: PoolPolicy<T>,
{
    pool: &'a Pool<T, P>,

    // Always `Some` until a consuming method or the destructor takes it.
    item: Option<T>,
}

impl<'a, T, P> PoolLease<'a, T, P>
where
    P: PoolPolicy<T>,
{
    pub(crate) fn new(pool: &'a Pool<T, P>, item: T) -> Self {
        Self {
            pool,
            item: Some(item),
        }
    }

    /// Returns the instance to the pool now instead of at the end of the scope.
    pub fn release(mut self) {
        self.return_to_pool();
    }

    /// Takes the instance out of the lease without returning it to the pool.
    ///
    /// The instance still counts as rented. The caller may hand it back later via
    /// [`Pool::return_item()`] or simply drop it.
    #[must_use]
    pub fn detach(mut self) -> T {
        self.item.take().expect(ERR_ITEM_TAKEN)
    }

    fn return_to_pool(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.return_item(item);
        }
    }
}

impl<T, P> Deref for PoolLease<'_, T, P>
where
    P: PoolPolicy<T>,
{
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.item.as_ref().expect(ERR_ITEM_TAKEN)
    }
}

impl<T, P> DerefMut for PoolLease<'_, T, P>
where
    P: PoolPolicy<T>,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.item.as_mut().expect(ERR_ITEM_TAKEN)
    }
}

impl<T, P> Drop for PoolLease<'_, T, P>
where
    P: PoolPolicy<T>,
{
    fn drop(&mut self) {
        self.return_to_pool();
    }
}

impl<T, P> fmt::Debug for PoolLease<'_, T, P>
where
    T: fmt::Debug,
    P: PoolPolicy<T>,
{
    #[cfg_attr(test, mutants::skip)] // Debug output is not part of the contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("item", &self.item)
            .finish_non_exhaustive()
    }
}

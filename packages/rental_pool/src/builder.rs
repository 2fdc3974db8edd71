use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

use crate::{DEFAULT_CAPACITY, Pool, PoolPolicy};

/// Builder for creating an instance of [`Pool`].
///
/// You only need to use this builder if you want to customize the pool configuration.
/// Without an explicit capacity, the pool retains up to [`DEFAULT_CAPACITY`] idle instances.
///
/// # Examples
///
/// ```
/// use rental_pool::{ClearPolicy, Pool};
///
/// let pool = Pool::<Vec<u32>, _>::builder(ClearPolicy)
///     .capacity(128)
///     .prewarm(16)
///     .build();
///
/// assert_eq!(pool.capacity(), 128);
/// assert_eq!(pool.idle_count(), 16);
/// ```
#[must_use]
pub struct PoolBuilder<T, P> {
    policy: P,
    capacity: usize,
    prewarm: usize,

    _item: PhantomData<fn() -> T>,
}

impl<T, P> fmt::Debug for PoolBuilder<T, P>
where
    P: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolBuilder")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("policy", &self.policy)
            .field("capacity", &self.capacity)
            .field("prewarm", &self.prewarm)
            .finish()
    }
}

impl<T, P> PoolBuilder<T, P>
where
    P: PoolPolicy<T>,
{
    pub(crate) fn new(policy: P) -> Self {
        Self {
            policy,
            capacity: DEFAULT_CAPACITY,
            prewarm: 0,
            _item: PhantomData,
        }
    }

    /// Sets the maximum number of idle instances the pool retains.
    ///
    /// Zero is allowed and produces a pool that discards every returned instance.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets how many instances to create eagerly when the pool is built.
    ///
    /// The count is clamped to the capacity. See [`Pool::prewarm()`].
    pub fn prewarm(mut self, count: usize) -> Self {
        self.prewarm = count;
        self
    }

    /// Builds the pool with the specified configuration.
    #[must_use]
    pub fn build(self) -> Pool<T, P> {
        let pool = Pool::new(self.policy, self.capacity);

        if self.prewarm > 0 {
            pool.prewarm(self.prewarm);
        }

        pool
    }
}

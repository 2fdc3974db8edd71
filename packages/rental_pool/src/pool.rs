use std::any::type_name;
use std::cell::{Cell, RefCell};
use std::fmt;

use tracing::{debug, trace};

use crate::{PoolBuilder, PoolLease, PoolPolicy};

/// The capacity used by [`PoolBuilder`] when the caller does not specify one.
pub const DEFAULT_CAPACITY: usize = 32;

/// A bounded pool of reusable instances of `T`, governed by the policy `P`.
///
/// Instances are created on demand by [`rent()`][Self::rent] and handed back with
/// [`return_item()`][Self::return_item]. The pool keeps at most [`capacity()`][Self::capacity]
/// idle instances; anything beyond that is dropped on return. Idle instances are reused in
/// last-in-first-out order so the most recently touched (and most likely cached) instance is
/// handed out first.
///
/// # Thread safety
///
/// The pool is [`Send`] (if `T` and `P` are) but not [`Sync`]: it is meant to be owned by one
/// thread or task at a time and performs no locking. For a pool that can be used from anywhere,
/// see [`shared_list`][crate::shared_list].
///
/// # Example
///
/// ```rust
/// use rental_pool::{ClearPolicy, Pool};
///
/// let pool = Pool::<Vec<u32>, _>::new(ClearPolicy, 4);
///
/// let mut list = pool.rent();
/// list.extend([1, 2, 3]);
/// pool.return_item(list);
///
/// // The same allocation comes back, already cleared.
/// let list = pool.rent();
/// assert!(list.is_empty());
/// assert!(list.capacity() >= 3);
/// ```
pub struct Pool<T, P> {
    policy: P,
    capacity: usize,

    // Used as a stack: the last returned instance is the first one rented.
    idle: RefCell<Vec<T>>,

    // Instances handed out and not yet returned. Saturates at zero because the pool cannot tell
    // whether a returned instance originally came from it.
    rented: Cell<usize>,

    // Returns that were accepted by the policy but discarded because the pool was full.
    #[cfg(debug_assertions)]
    rejected: Cell<u64>,
}

impl<T, P> Pool<T, P>
where
    P: PoolPolicy<T>,
{
    /// Creates an empty pool that retains at most `capacity` idle instances.
    ///
    /// A capacity of zero is valid and results in a pass-through pool that never retains
    /// anything. To validate a signed capacity coming from elsewhere, use
    /// [`create_pool()`][crate::create_pool].
    ///
    /// # Example
    ///
    /// ```rust
    /// use rental_pool::{DefaultPolicy, Pool};
    ///
    /// let pool = Pool::<u64, _>::new(DefaultPolicy, 10);
    /// assert_eq!(pool.capacity(), 10);
    /// assert_eq!(pool.idle_count(), 0);
    /// ```
    #[must_use]
    pub fn new(policy: P, capacity: usize) -> Self {
        Self {
            policy,
            capacity,
            idle: RefCell::new(Vec::new()),
            rented: Cell::new(0),
            #[cfg(debug_assertions)]
            rejected: Cell::new(0),
        }
    }

    /// Returns a builder for creating a [`Pool`] with custom configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rental_pool::{ClearPolicy, Pool};
    ///
    /// let pool = Pool::<String, _>::builder(ClearPolicy).capacity(2).build();
    /// assert_eq!(pool.capacity(), 2);
    /// ```
    pub fn builder(policy: P) -> PoolBuilder<T, P> {
        PoolBuilder::new(policy)
    }

    /// Rents an instance from the pool.
    ///
    /// The most recently returned idle instance is reused if there is one, otherwise the policy
    /// creates a new instance. Either way, the policy's `on_rent` hook runs before the instance
    /// is handed out.
    ///
    /// # Panics
    ///
    /// Propagates any panic raised by the policy while creating or preparing the instance.
    #[must_use]
    pub fn rent(&self) -> T {
        let reused = self.idle.borrow_mut().pop();

        let mut item = reused.unwrap_or_else(|| {
            trace!(item_type = type_name::<T>(), "no idle instance, creating a new one");
            self.policy.create()
        });

        self.policy.on_rent(&mut item);

        self.rented.set(
            self.rented
                .get()
                .checked_add(1)
                .expect("cannot have more than usize::MAX instances rented out"),
        );

        item
    }

    /// Rents an instance and binds it to a [`PoolLease`] that returns it when dropped.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rental_pool::{ClearPolicy, Pool};
    ///
    /// let pool = Pool::<Vec<u8>, _>::new(ClearPolicy, 4);
    ///
    /// {
    ///     let mut buffer = pool.rent_scoped();
    ///     buffer.extend_from_slice(b"temporary");
    /// }
    ///
    /// assert_eq!(pool.idle_count(), 1);
    /// ```
    #[must_use]
    pub fn rent_scoped(&self) -> PoolLease<'_, T, P> {
        PoolLease::new(self, self.rent())
    }

    /// Gives an instance back to the pool.
    ///
    /// The policy's `on_return` hook runs first. If it rejects the instance, or if the pool
    /// already holds [`capacity()`][Self::capacity] idle instances, the instance is dropped.
    /// Neither case is an error.
    ///
    /// Ownership guarantees an instance cannot be returned twice without being rented again.
    /// Instances that did not come from this pool are accepted like any other.
    pub fn return_item(&self, mut item: T) {
        self.rented.set(self.rented.get().saturating_sub(1));

        if !self.policy.on_return(&mut item) {
            trace!(
                item_type = type_name::<T>(),
                "policy rejected returned instance, discarding"
            );
            return;
        }

        {
            let mut idle = self.idle.borrow_mut();

            if idle.len() < self.capacity {
                idle.push(item);
                return;
            }
        }

        #[cfg(debug_assertions)]
        self.rejected.set(
            self.rejected
                .get()
                .checked_add(1)
                .expect("rejection counter cannot realistically overflow u64"),
        );

        trace!(
            item_type = type_name::<T>(),
            capacity = self.capacity,
            "pool is at capacity, discarding returned instance"
        );

        // The instance is dropped here, after the idle storage borrow has been released.
    }

    /// Creates up to `count` instances ahead of demand and stores them as idle instances.
    ///
    /// Never grows the idle storage beyond [`capacity()`][Self::capacity]: if the pool already
    /// holds idle instances, only the remaining room is filled. Each new instance passes through
    /// the policy's `on_return` hook, so prewarmed instances are in the same state as returned
    /// ones, and instances the policy rejects are not stored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rental_pool::{DefaultPolicy, Pool};
    ///
    /// let pool = Pool::<Vec<u8>, _>::new(DefaultPolicy, 3);
    ///
    /// pool.prewarm(10);
    /// assert_eq!(pool.idle_count(), 3);
    /// ```
    pub fn prewarm(&self, count: usize) {
        let room = self.capacity.saturating_sub(self.idle_count());
        let to_create = count.min(room);

        let mut stored: usize = 0;

        for _ in 0..to_create {
            let mut item = self.policy.create();

            if self.policy.on_return(&mut item) {
                self.idle.borrow_mut().push(item);

                stored = stored
                    .checked_add(1)
                    .expect("bounded by capacity, which is a usize");
            }
        }

        debug!(
            item_type = type_name::<T>(),
            requested = count,
            stored,
            "prewarmed pool"
        );
    }
}

impl<T, P> Pool<T, P> {
    /// The maximum number of idle instances the pool retains.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of idle instances currently held by the pool.
    #[must_use]
    pub fn idle_count(&self) -> usize {
        self.idle.borrow().len()
    }

    /// The number of instances rented out and not yet returned.
    #[must_use]
    pub fn rented_count(&self) -> usize {
        self.rented.get()
    }

    /// The number of returned instances that were accepted by the policy but discarded because
    /// the pool was at capacity.
    ///
    /// This method is only available in debug builds (`cfg(debug_assertions)`).
    #[cfg(debug_assertions)]
    #[must_use]
    pub fn rejected_count(&self) -> u64 {
        self.rejected.get()
    }

    /// Drops all idle instances. Rented instances are not affected.
    pub fn clear(&self) {
        // Dropping outside the borrow keeps the idle storage usable from item destructors.
        let drained = self.idle.take();
        drop(drained);
    }
}

impl<T, P> fmt::Debug for Pool<T, P>
where
    P: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(type_name::<Self>());

        s.field("policy", &self.policy)
            .field("capacity", &self.capacity)
            .field("idle_count", &self.idle_count())
            .field("rented_count", &self.rented.get());

        #[cfg(debug_assertions)]
        s.field("rejected_count", &self.rejected.get());

        s.finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::rc::Rc;

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;
    use crate::{ClearPolicy, DefaultPolicy, FnPolicy};

    assert_impl_all!(Pool<Vec<u8>, ClearPolicy>: Send);
    assert_not_impl_any!(Pool<Vec<u8>, ClearPolicy>: Sync);
    assert_not_impl_any!(Pool<Rc<u8>, DefaultPolicy>: Send);

    #[derive(Debug, Default)]
    struct Counter {
        value: u32,
        rented: bool,
    }

    /// Counts creations and resets `value` on return, marks `rented` on rent.
    #[derive(Debug, Default)]
    struct CountingPolicy {
        created: Cell<usize>,
    }

    impl PoolPolicy<Counter> for CountingPolicy {
        fn create(&self) -> Counter {
            self.created.set(
                self.created
                    .get()
                    .checked_add(1)
                    .expect("test creates far fewer than usize::MAX instances"),
            );
            Counter::default()
        }

        fn on_rent(&self, item: &mut Counter) {
            item.rented = true;
        }

        fn on_return(&self, item: &mut Counter) -> bool {
            item.value = 0;
            item.rented = false;
            true
        }
    }

    /// Accepts only even values.
    #[derive(Debug)]
    struct EvenOnlyPolicy;

    impl PoolPolicy<u32> for EvenOnlyPolicy {
        fn create(&self) -> u32 {
            0
        }

        fn on_rent(&self, _item: &mut u32) {}

        fn on_return(&self, item: &mut u32) -> bool {
            *item % 2 == 0
        }
    }

    #[test]
    fn smoke_test() {
        let pool = Pool::<Counter, _>::new(CountingPolicy::default(), 4);

        assert_eq!(pool.capacity(), 4);
        assert_eq!(pool.idle_count(), 0);
        assert_eq!(pool.rented_count(), 0);

        let mut item = pool.rent();
        assert!(item.rented);
        item.value = 42;

        assert_eq!(pool.rented_count(), 1);
        assert_eq!(pool.policy.created.get(), 1);

        pool.return_item(item);

        assert_eq!(pool.idle_count(), 1);
        assert_eq!(pool.rented_count(), 0);

        let item = pool.rent();
        assert_eq!(item.value, 0);
        assert!(item.rented);
        assert_eq!(pool.policy.created.get(), 1);
    }

    #[test]
    fn return_then_rent_reuses_same_instance() {
        let pool = Pool::<Vec<u8>, _>::new(ClearPolicy, 2);

        let mut list = pool.rent();
        list.push(1);
        let address = list.as_ptr();

        pool.return_item(list);

        let list = pool.rent();
        assert_eq!(list.as_ptr(), address);
        assert!(list.is_empty());
    }

    #[test]
    fn idle_instances_are_reused_last_in_first_out() {
        let pool = Pool::<Box<u32>, _>::new(DefaultPolicy, 4);

        let first = Box::new(1);
        let second = Box::new(2);

        pool.return_item(first);
        pool.return_item(second);

        assert_eq!(*pool.rent(), 2);
        assert_eq!(*pool.rent(), 1);
    }

    #[test]
    fn policy_rejection_discards() {
        let pool = Pool::<u32, _>::new(EvenOnlyPolicy, 4);

        pool.return_item(3);
        assert_eq!(pool.idle_count(), 0);

        pool.return_item(4);
        assert_eq!(pool.idle_count(), 1);

        // Policy rejections are not capacity rejections.
        #[cfg(debug_assertions)]
        assert_eq!(pool.rejected_count(), 0);
    }

    #[test]
    fn capacity_one_keeps_one_of_two() {
        let pool = Pool::<Counter, _>::new(CountingPolicy::default(), 1);

        let a = pool.rent();
        let b = pool.rent();

        pool.return_item(a);
        pool.return_item(b);

        assert_eq!(pool.idle_count(), 1);

        #[cfg(debug_assertions)]
        assert_eq!(pool.rejected_count(), 1);
    }

    #[test]
    fn idle_count_never_exceeds_capacity() {
        let pool = Pool::<Vec<u8>, _>::new(ClearPolicy, 3);

        let rented: Vec<_> = (0..10).map(|_| pool.rent()).collect();

        for list in rented {
            pool.return_item(list);
            assert!(pool.idle_count() <= 3);
        }

        assert_eq!(pool.idle_count(), 3);

        #[cfg(debug_assertions)]
        assert_eq!(pool.rejected_count(), 7);
    }

    #[test]
    fn zero_capacity_is_pass_through() {
        let pool = Pool::<Counter, _>::new(CountingPolicy::default(), 0);

        for _ in 0..5 {
            let item = pool.rent();
            pool.return_item(item);
            assert_eq!(pool.idle_count(), 0);
        }

        assert_eq!(pool.policy.created.get(), 5);

        #[cfg(debug_assertions)]
        assert_eq!(pool.rejected_count(), 5);
    }

    #[test]
    fn prewarm_fills_without_later_creates() {
        let pool = Pool::<Counter, _>::new(CountingPolicy::default(), 8);

        pool.prewarm(5);

        assert_eq!(pool.idle_count(), 5);
        assert_eq!(pool.policy.created.get(), 5);

        let rented: Vec<_> = (0..5).map(|_| pool.rent()).collect();

        assert!(rented.iter().all(|item| item.rented));
        assert_eq!(pool.policy.created.get(), 5);
        assert_eq!(pool.idle_count(), 0);
    }

    #[test]
    fn prewarm_respects_capacity() {
        let pool = Pool::<Counter, _>::new(CountingPolicy::default(), 4);

        let item = pool.rent();
        pool.return_item(item);

        pool.prewarm(100);

        assert_eq!(pool.idle_count(), 4);
        // One from the rent, three to fill the remaining room.
        assert_eq!(pool.policy.created.get(), 4);
    }

    #[test]
    fn prewarm_skips_rejected_instances() {
        let pool = Pool::new(
            FnPolicy::new(|| 1_u32, |item: &mut u32| *item % 2 == 0),
            4,
        );

        pool.prewarm(4);

        assert_eq!(pool.idle_count(), 0);
    }

    #[test]
    fn prewarm_on_zero_capacity_creates_nothing() {
        let pool = Pool::<Counter, _>::new(CountingPolicy::default(), 0);

        pool.prewarm(10);

        assert_eq!(pool.policy.created.get(), 0);
    }

    #[test]
    fn clear_drops_idle_instances() {
        let pool = Pool::<Vec<u8>, _>::new(ClearPolicy, 4);
        pool.prewarm(4);

        pool.clear();

        assert_eq!(pool.idle_count(), 0);
    }

    #[test]
    fn rented_count_saturates_for_foreign_returns() {
        let pool = Pool::<Vec<u8>, _>::new(ClearPolicy, 4);

        pool.return_item(Vec::new());

        assert_eq!(pool.rented_count(), 0);
        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn debug_output_names_counters() {
        let pool = Pool::<Vec<u8>, _>::new(ClearPolicy, 4);

        let output = format!("{pool:?}");

        assert!(output.contains("capacity: 4"));
        assert!(output.contains("idle_count: 0"));
    }
}

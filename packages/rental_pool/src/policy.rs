use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

/// Defines how a pool creates instances of `T` and how it prepares them when they change hands.
///
/// The pool never looks inside an instance; every type-specific decision is made here. A policy
/// is a small value (often a unit struct) handed to the pool at construction. It does not own
/// any instances.
///
/// # Example
///
/// ```rust
/// use rental_pool::{Pool, PoolPolicy};
///
/// #[derive(Default)]
/// struct Packet {
///     bytes: Vec<u8>,
///     sealed: bool,
/// }
///
/// struct PacketPolicy;
///
/// impl PoolPolicy<Packet> for PacketPolicy {
///     fn create(&self) -> Packet {
///         Packet::default()
///     }
///
///     fn on_rent(&self, packet: &mut Packet) {
///         packet.sealed = false;
///     }
///
///     fn on_return(&self, packet: &mut Packet) -> bool {
///         packet.bytes.clear();
///
///         // Oversized buffers are not worth keeping around.
///         packet.bytes.capacity() <= 64 * 1024
///     }
/// }
///
/// let pool = Pool::<Packet, _>::new(PacketPolicy, 8);
///
/// let mut packet = pool.rent();
/// packet.bytes.extend_from_slice(b"hello");
/// pool.return_item(packet);
///
/// assert_eq!(pool.idle_count(), 1);
/// ```
pub trait PoolPolicy<T> {
    /// Produces a fresh, independent instance.
    ///
    /// A construction failure is a panic and propagates to the caller of
    /// [`Pool::rent()`][crate::Pool::rent]; it is never retried.
    fn create(&self) -> T;

    /// Prepares an instance that is about to be handed to a caller.
    ///
    /// Called for freshly created and for reused instances alike.
    fn on_rent(&self, item: &mut T);

    /// Prepares an instance that is being given back to the pool.
    ///
    /// Returns `false` if the instance must be discarded instead of retained. Rejection is a
    /// normal outcome and must be signaled through the return value, not by panicking.
    fn on_return(&self, item: &mut T) -> bool;
}

/// A policy that creates instances via [`Default`] and does not touch them afterwards.
///
/// Suitable for types that carry no state between uses or that the caller resets manually.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultPolicy;

impl<T: Default> PoolPolicy<T> for DefaultPolicy {
    fn create(&self) -> T {
        T::default()
    }

    fn on_rent(&self, _item: &mut T) {}

    fn on_return(&self, _item: &mut T) -> bool {
        true
    }
}

/// A container that can be emptied in place while keeping its allocation.
pub trait Clear {
    /// Removes all contents, retaining allocated capacity where the container has any.
    fn clear(&mut self);
}

impl<T> Clear for Vec<T> {
    fn clear(&mut self) {
        Self::clear(self);
    }
}

impl<T> Clear for VecDeque<T> {
    fn clear(&mut self) {
        Self::clear(self);
    }
}

impl Clear for String {
    fn clear(&mut self) {
        Self::clear(self);
    }
}

impl<K, V, S> Clear for HashMap<K, V, S> {
    fn clear(&mut self) {
        Self::clear(self);
    }
}

impl<T, S> Clear for HashSet<T, S> {
    fn clear(&mut self) {
        Self::clear(self);
    }
}

impl<K, V> Clear for BTreeMap<K, V> {
    fn clear(&mut self) {
        Self::clear(self);
    }
}

impl<T> Clear for BTreeSet<T> {
    fn clear(&mut self) {
        Self::clear(self);
    }
}

/// A policy for containers: creates them empty and clears them on return.
///
/// Every returned container is accepted. This is the policy behind the
/// [shared list pools][crate::shared_list].
///
/// # Example
///
/// ```rust
/// use rental_pool::{ClearPolicy, Pool};
///
/// let pool = Pool::<String, _>::new(ClearPolicy, 4);
///
/// let mut text = pool.rent();
/// text.push_str("scratch");
/// pool.return_item(text);
///
/// assert!(pool.rent().is_empty());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ClearPolicy;

impl<T: Clear + Default> PoolPolicy<T> for ClearPolicy {
    fn create(&self) -> T {
        T::default()
    }

    fn on_rent(&self, _item: &mut T) {}

    fn on_return(&self, item: &mut T) -> bool {
        item.clear();
        true
    }
}

/// A policy assembled from closures.
///
/// The `create` closure produces new instances and the `reset` closure is applied on return,
/// with its result deciding whether the instance is retained. By default renting does not modify
/// instances; [`with_on_rent()`][Self::with_on_rent] adds a closure that prepares every instance
/// as it is handed out.
///
/// # Example
///
/// ```rust
/// use rental_pool::{FnPolicy, Pool};
///
/// let policy = FnPolicy::new(
///     || Vec::<u8>::with_capacity(1024),
///     |buffer: &mut Vec<u8>| {
///         buffer.clear();
///         buffer.capacity() >= 1024
///     },
/// )
/// .with_on_rent(|buffer: &mut Vec<u8>| buffer.push(b'>'));
///
/// let pool: Pool<Vec<u8>, _> = Pool::new(policy, 16);
/// let buffer = pool.rent();
/// assert!(buffer.capacity() >= 1024);
/// assert_eq!(buffer, b">");
/// ```
pub struct FnPolicy<C, R, N = NoRentHook> {
    create: C,
    reset: R,
    on_rent: N,
}

/// Marks an [`FnPolicy`] that leaves instances untouched when they are rented.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRentHook;

impl<C, R> FnPolicy<C, R> {
    /// Creates a policy from a creation closure and a reset closure.
    #[must_use]
    pub fn new(create: C, reset: R) -> Self {
        Self {
            create,
            reset,
            on_rent: NoRentHook,
        }
    }
}

impl<C, R, N> FnPolicy<C, R, N> {
    /// Sets a closure that runs on every instance as it is rented, whether freshly created or
    /// reused.
    #[must_use]
    pub fn with_on_rent<F>(self, on_rent: F) -> FnPolicy<C, R, F> {
        FnPolicy {
            create: self.create,
            reset: self.reset,
            on_rent,
        }
    }
}

impl<T, C, R> PoolPolicy<T> for FnPolicy<C, R, NoRentHook>
where
    C: Fn() -> T,
    R: Fn(&mut T) -> bool,
{
    fn create(&self) -> T {
        (self.create)()
    }

    fn on_rent(&self, _item: &mut T) {}

    fn on_return(&self, item: &mut T) -> bool {
        (self.reset)(item)
    }
}

impl<T, C, R, N> PoolPolicy<T> for FnPolicy<C, R, N>
where
    C: Fn() -> T,
    R: Fn(&mut T) -> bool,
    N: Fn(&mut T),
{
    fn create(&self) -> T {
        (self.create)()
    }

    fn on_rent(&self, item: &mut T) {
        (self.on_rent)(item);
    }

    fn on_return(&self, item: &mut T) -> bool {
        (self.reset)(item)
    }
}

impl<C, R, N> fmt::Debug for FnPolicy<C, R, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPolicy").finish_non_exhaustive()
    }
}

//! Process-wide pools of [`Vec<T>`], one per element type, usable from any thread.
//!
//! These pools need no setup: the pool for a given element type is created on first use with a
//! capacity of [`SHARED_LIST_CAPACITY`] and the [`ClearPolicy`], and lives until the process
//! exits. Unlike [`Pool`], every operation here is synchronized, so lists can be rented on one
//! thread and returned on another.
//!
//! # Example
//!
//! ```rust
//! use rental_pool::shared_list;
//!
//! let mut names = shared_list::rent::<String>();
//! names.push("alpha".to_string());
//! names.push("beta".to_string());
//!
//! // ... use the list ...
//!
//! shared_list::return_list(names);
//!
//! // Or let a lease return it at the end of the scope.
//! {
//!     let mut ids = shared_list::rent_scoped::<u64>();
//!     ids.extend([1, 2, 3]);
//! }
//! ```

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, LazyLock};

use foldhash::HashMap;
use parking_lot::Mutex;
use tracing::debug;

use crate::{ClearPolicy, Pool};

/// The number of idle lists retained by the shared pool of each element type.
pub const SHARED_LIST_CAPACITY: usize = 32;

const ERR_ITEM_TAKEN: &str = "lease list is only taken by the destructor";

type ListPool<T> = Pool<Vec<T>, ClearPolicy>;

// Each element type has its own separately locked pool. The registry lock is only held while
// looking up (or creating) the pool for a type and is always released before the pool's own
// lock is taken.
type Registry = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

static REGISTRY: LazyLock<Mutex<Registry>> = LazyLock::new(|| Mutex::new(Registry::default()));

fn pool_for<T: Send + 'static>() -> Arc<Mutex<ListPool<T>>> {
    let entry = {
        let mut registry = REGISTRY.lock();

        let entry = registry.entry(TypeId::of::<T>()).or_insert_with(|| {
            debug!(
                element_type = type_name::<T>(),
                capacity = SHARED_LIST_CAPACITY,
                "creating shared list pool"
            );

            let pool: Arc<dyn Any + Send + Sync> = Arc::new(Mutex::new(ListPool::<T>::new(
                ClearPolicy,
                SHARED_LIST_CAPACITY,
            )));

            pool
        });

        Arc::clone(entry)
    };

    entry
        .downcast::<Mutex<ListPool<T>>>()
        .expect("registry entries are keyed by the TypeId of their element type")
}

/// Rents an empty list from the shared pool for element type `T`.
///
/// The list may carry capacity left over from an earlier use.
#[must_use]
pub fn rent<T: Send + 'static>() -> Vec<T> {
    pool_for::<T>().lock().rent()
}

/// Returns a list to the shared pool for element type `T`.
///
/// The list is cleared. It is retained for reuse if the pool has room, otherwise dropped.
pub fn return_list<T: Send + 'static>(mut list: Vec<T>) {
    // Element destructors run before the lock is taken, so they may use shared lists themselves.
    list.clear();

    pool_for::<T>().lock().return_item(list);
}

/// Rents a list from the shared pool for element type `T`, wrapped in a lease that returns it
/// when dropped.
#[must_use]
pub fn rent_scoped<T: Send + 'static>() -> SharedListLease<T> {
    SharedListLease { list: Some(rent()) }
}

/// A list rented from a shared pool, returned to it when dropped.
///
/// Created by [`rent_scoped()`]. Dereferences to [`Vec<T>`].
pub struct SharedListLease<T: Send + 'static> {
    // Always `Some` until the destructor takes it.
    list: Option<Vec<T>>,
}

impl<T: Send + 'static> Deref for SharedListLease<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        self.list.as_ref().expect(ERR_ITEM_TAKEN)
    }
}

impl<T: Send + 'static> DerefMut for SharedListLease<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.list.as_mut().expect(ERR_ITEM_TAKEN)
    }
}

impl<T: Send + 'static> Drop for SharedListLease<T> {
    fn drop(&mut self) {
        if let Some(list) = self.list.take() {
            return_list(list);
        }
    }
}

impl<T: Send + fmt::Debug + 'static> fmt::Debug for SharedListLease<T> {
    #[cfg_attr(test, mutants::skip)] // Debug output is not part of the contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("list", &self.list)
            .finish()
    }
}

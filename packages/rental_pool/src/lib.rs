#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A bounded object pool that rents out reusable instances of a type, resets them when they are
//! returned and caps how many idle instances it retains.
//!
//! Pooling reduces allocation churn for objects that are frequently created and discarded, such
//! as short-lived lists or buffers in latency-sensitive code.
//!
//! # Overview
//!
//! - [`PoolPolicy`] decides how instances are created and how they are prepared when rented and
//!   when returned. [`DefaultPolicy`], [`ClearPolicy`] and [`FnPolicy`] cover common cases.
//! - [`Pool`] holds idle instances up to a fixed capacity and implements rent, return and
//!   prewarm on top of a policy.
//! - [`PoolLease`] ties a rented instance to a scope and returns it when the scope ends.
//! - [`shared_list`] offers process-wide, thread-safe pools of `Vec<T>` that need no setup.
//! - [`create_pool()`] validates a signed capacity and builds a pool from it.
//!
//! # Example
//!
//! ```rust
//! use rental_pool::{ClearPolicy, Pool};
//!
//! let pool = Pool::<Vec<u8>, _>::builder(ClearPolicy).capacity(8).build();
//!
//! let mut buffer = pool.rent();
//! buffer.extend_from_slice(b"some bytes");
//! pool.return_item(buffer);
//!
//! // The next rent reuses the same allocation, already cleared by the policy.
//! let buffer = pool.rent();
//! assert!(buffer.is_empty());
//! ```
//!
//! # Diagnostics
//!
//! Debug builds (`cfg(debug_assertions)`) additionally count returns that were discarded because
//! the pool was full, readable via `Pool::rejected_count()`. The counter and its accessor do not
//! exist in release builds.
//!
//! # Logging
//!
//! The crate emits `tracing` events: `trace` for every fresh creation and every discard, `debug`
//! for prewarming and for shared pool initialization.

mod builder;
mod error;
mod factory;
mod lease;
mod policy;
mod pool;
pub mod shared_list;

pub use builder::*;
pub use error::*;
pub use factory::*;
pub use lease::*;
pub use policy::*;
pub use pool::*;

//! Query Cache
//!
//! Keyed cache for data fetched from a remote source, with stale tracking,
//! cancellable in-flight fetches and an optimistic update wrapper.
//!
//! The cache never talks to the network itself: callers hand it the future
//! that performs the request and it records the outcome.

mod cache;
mod optimistic;

pub use cache::{Fetched, Listener, QueryCache};
pub use optimistic::Optimistic;

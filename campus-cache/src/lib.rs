//! Response cache and fetch orchestration for the Campus client.
//!
//! This crate sits between the typed API façades and the network. Every read
//! goes through [`CachedClient`], which turns `(endpoint, query params,
//! context dimensions)` into a deterministic cache key, serves cached data
//! when it is fresh, revalidates stale data in the background when the caller
//! opts in, and coalesces concurrent identical requests into a single network
//! call. Mutations bypass the cache and purge the affected resource family.
//!
//! # Context isolation
//!
//! Cache keys always include the request's context dimensions (user,
//! institute, class, subject, role). Two institutes browsing the "same"
//! endpoint therefore occupy disjoint cache entries, and invalidation after a
//! write is scoped to exactly the dimensions the write was issued under.
//!
//! # The one subtle invariant
//!
//! For a given key there is at most one network request in flight at any
//! instant. Callers that arrive while a fetch is outstanding join the same
//! shared future and observe the same eventual result, success or failure.
//! Everything else in this crate is bookkeeping around that rule.

pub mod config;
pub mod entry;
pub mod fetch;
pub mod invalidate;
pub mod key;
pub mod transport;

pub use config::CacheConfig;
pub use entry::{CacheEntry, CacheStats, EntryStore};
pub use fetch::{CachedClient, FetchOptions};
pub use invalidate::InvalidationEngine;
pub use key::CacheKey;
pub use transport::HttpTransport;

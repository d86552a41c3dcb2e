//! In-memory cache for upstream market-data payloads.
//!
//! Entries are keyed by a readable string (see [`keys`]) and stamped with the
//! instant they were stored. Freshness is decided by the caller: every read
//! passes its own TTL, so one cache can hold second-scale spot prices next to
//! slow-moving aggregates.
//!
//! - Stale reads are misses; the entry stays until the next refresh overwrites it
//! - Optional entry bound evicts the least recently used entry on overflow
//! - `purge_older_than` sweeps entries past a maximum age

pub mod keys;
pub mod store;

pub use store::TtlCache;

//! ## nfrelay-enrichment::dns
//! **Reverse-DNS lookups behind a TTL cache**
//!
//! ### Components:
//! - `resolver`: the `ReverseResolver` seam and the system implementation
//! - `cache`: `DnsCache`, shared by every decode task

pub mod cache;
pub mod resolver;

pub use cache::{CacheEntry, DnsCache, DEFAULT_TTL};
pub use resolver::{ReverseResolver, SystemResolver};

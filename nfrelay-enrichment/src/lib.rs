//! # nfrelay Enrichment
//!
//! Turns raw NetFlow v5 records into [`DecodedRecord`]s: address strings,
//! duration, sampling fields and reverse-DNS hostnames.
//!
//! [`DecodedRecord`]: nfrelay_core::DecodedRecord

pub mod dns;
pub mod enricher;

pub use dns::{CacheEntry, DnsCache, ReverseResolver, SystemResolver};
pub use enricher::Enricher;

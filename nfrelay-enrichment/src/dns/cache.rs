//! TTL-bounded reverse-DNS cache.
//!
//! Entries are created or refreshed lazily on a miss and never evicted. The
//! map lock covers only the lookup or the insert, never the resolution, so
//! two tasks missing on the same address at once may both resolve it. The
//! later write wins; both results are equivalent.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use super::resolver::ReverseResolver;

/// How long a resolved (or failed) lookup stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub hostname: String,
    pub expires_at: Instant,
}

pub struct DnsCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    resolver: Arc<dyn ReverseResolver>,
    ttl: Duration,
}

impl DnsCache {
    pub fn new(resolver: Arc<dyn ReverseResolver>) -> Self {
        Self::with_ttl(resolver, DEFAULT_TTL)
    }

    pub fn with_ttl(resolver: Arc<dyn ReverseResolver>, ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            resolver,
            ttl,
        }
    }

    /// Returns the hostname for `ip`, resolving it if the cached entry is
    /// missing or stale. Falls back to `ip` itself when resolution fails.
    pub async fn get(&self, ip: &str) -> String {
        if let Some(hostname) = self.fresh(ip) {
            trace!(ip, hostname = %hostname, "dns cache hit");
            return hostname;
        }

        let hostname = self.resolve(ip).await;
        self.entries.write().insert(
            ip.to_string(),
            CacheEntry {
                hostname: hostname.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        hostname
    }

    /// Snapshot of the entry stored for `ip`, fresh or not.
    pub fn entry(&self, ip: &str) -> Option<CacheEntry> {
        self.entries.read().get(ip).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn fresh(&self, ip: &str) -> Option<String> {
        let entries = self.entries.read();
        entries
            .get(ip)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.hostname.clone())
    }

    async fn resolve(&self, ip: &str) -> String {
        let addr: IpAddr = match ip.parse() {
            Ok(addr) => addr,
            Err(_) => {
                warn!(ip, "not an IP address, skipping reverse lookup");
                return ip.to_string();
            }
        };

        let resolver = Arc::clone(&self.resolver);
        match tokio::task::spawn_blocking(move || resolver.reverse_lookup(addr)).await {
            Ok(Ok(hostname)) => {
                trace!(ip, hostname = %hostname, "reverse lookup resolved");
                hostname
            }
            Ok(Err(e)) => {
                debug!(ip, error = %e, "reverse lookup failed, using address");
                ip.to_string()
            }
            Err(e) => {
                warn!(ip, error = %e, "reverse lookup task failed, using address");
                ip.to_string()
            }
        }
    }
}

impl std::fmt::Debug for DnsCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsCache")
            .field("entries", &self.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

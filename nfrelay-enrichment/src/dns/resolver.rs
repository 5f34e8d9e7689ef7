use std::io;
use std::net::IpAddr;

/// Blocking reverse lookup of one address.
///
/// Implementations may block; the cache always calls them from the blocking
/// thread pool.
pub trait ReverseResolver: Send + Sync + 'static {
    fn reverse_lookup(&self, ip: IpAddr) -> io::Result<String>;
}

/// Reverse lookups through the operating system resolver (`getnameinfo`).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

impl ReverseResolver for SystemResolver {
    fn reverse_lookup(&self, ip: IpAddr) -> io::Result<String> {
        dns_lookup::lookup_addr(&ip)
    }
}

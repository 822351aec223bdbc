// Reverse-DNS collaborator.

use std::net::IpAddr;

use dns_lookup::lookup_addr;

/// Best-effort reverse DNS. A failed lookup means "no hostname", never an
/// error, and is not retried.
pub trait Resolver: Send + Sync {
    fn reverse_lookup(&self, ip: IpAddr) -> Option<String>;
}

/// Resolver backed by the system's stub resolver.
pub struct SystemResolver;

impl Resolver for SystemResolver {
    fn reverse_lookup(&self, ip: IpAddr) -> Option<String> {
        lookup_addr(&ip).ok()
    }
}

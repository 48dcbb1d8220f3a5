pub mod dns;

pub use dns::start_dns_server;

/// One UDP worker per core; every worker binds the same address via SO_REUSEPORT.
#[cfg(unix)]
pub fn worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Without SO_REUSEPORT only one socket may own the address.
#[cfg(not(unix))]
pub fn worker_count() -> usize {
    1
}

pub mod upstream_cache;

pub use upstream_cache::{CacheHit, UpstreamCache};

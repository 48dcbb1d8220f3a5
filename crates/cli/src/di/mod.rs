mod dns;
mod services;

pub use dns::DnsServices;
pub use services::ToyServices;

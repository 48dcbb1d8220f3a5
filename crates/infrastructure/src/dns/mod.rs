pub mod edns;
pub mod record_type_map;
pub mod response;
pub mod server;

pub use edns::{ClientEdns, MAX_UDP_PAYLOAD, SERVER_MAX_PAYLOAD};
pub use record_type_map::RecordTypeMapper;
pub use response::{rcode_for, ResponseAssembler};
pub use server::DnsServerHandler;

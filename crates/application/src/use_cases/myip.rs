use crate::ports::ToyHandler;
use async_trait::async_trait;
use dnstoys_domain::toy_answer::MYIP_TTL;
use dnstoys_domain::{DomainError, RecordType, ToyAnswer, ToyQuery};

/// Echoes the requester's source address.
pub struct MyIpHandler;

#[async_trait]
impl ToyHandler for MyIpHandler {
    async fn handle(&self, query: &ToyQuery) -> Result<ToyAnswer, DomainError> {
        if !query.labels.is_empty() {
            return Err(DomainError::InvalidQuery(format!(
                "myip takes no parameters: {}",
                query.name
            )));
        }

        Ok(match query.record_type {
            RecordType::TXT => ToyAnswer::txt(vec![query.client_ip.to_string()], MYIP_TTL),
            _ => ToyAnswer::address(query.client_ip, MYIP_TTL),
        })
    }
}

use super::ToyServices;
use dnstoys_application::use_cases::HandleToyQueryUseCase;
use dnstoys_domain::Config;
use dnstoys_infrastructure::dns::{DnsServerHandler, ResponseAssembler};
use std::sync::Arc;

pub struct DnsServices {
    pub handler: Arc<DnsServerHandler>,
}

impl DnsServices {
    pub fn new(config: &Config, services: &ToyServices) -> anyhow::Result<Self> {
        let use_case = Arc::new(HandleToyQueryUseCase::new(Arc::clone(&services.router)));
        let assembler = ResponseAssembler::new(&config.server.domain)?;

        Ok(Self {
            handler: Arc::new(DnsServerHandler::new(use_case, assembler)),
        })
    }
}

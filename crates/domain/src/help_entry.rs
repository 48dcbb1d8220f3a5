use super::service::ServiceKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    pub service: ServiceKind,
    pub description: String,
    /// Ready-to-run example, e.g. `dig mumbai.time @dns.toys`.
    pub example: String,
}

impl HelpEntry {
    pub fn for_service(service: ServiceKind, server_domain: &str) -> Self {
        Self {
            service,
            description: service.description().to_string(),
            example: format!("dig {} @{}", service.example(), server_domain),
        }
    }
}

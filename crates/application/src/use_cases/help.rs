use crate::ports::ToyHandler;
use async_trait::async_trait;
use dnstoys_domain::toy_answer::HELP_TTL;
use dnstoys_domain::{AnswerData, DomainError, HelpEntry, ServiceKind, ToyAnswer, ToyQuery};

/// Static catalog of the enabled services, built once.
pub struct HelpHandler {
    answer: ToyAnswer,
}

impl HelpHandler {
    pub fn new(enabled: &[ServiceKind], server_domain: &str) -> Self {
        let records = enabled
            .iter()
            .map(|kind| HelpEntry::for_service(*kind, server_domain))
            .map(|e| AnswerData::Txt(vec![e.description, e.example]))
            .collect();

        Self {
            answer: ToyAnswer::new(records, HELP_TTL),
        }
    }
}

#[async_trait]
impl ToyHandler for HelpHandler {
    async fn handle(&self, _query: &ToyQuery) -> Result<ToyAnswer, DomainError> {
        Ok(self.answer.clone())
    }
}

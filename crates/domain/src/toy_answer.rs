use std::net::IpAddr;

pub const HELP_TTL: u32 = 3_600;
pub const FX_TTL: u32 = 60;
pub const TIME_TTL: u32 = 1;
pub const MYIP_TTL: u32 = 1;
/// TTL of every negative or failure response, and the SOA minimum.
pub const ERROR_TTL: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerData {
    /// One TXT record made of several character-strings.
    Txt(Vec<String>),
    Address(IpAddr),
}

/// A successful service result, ready to be turned into answer records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToyAnswer {
    pub records: Vec<AnswerData>,
    pub ttl: u32,
}

impl ToyAnswer {
    pub fn new(records: Vec<AnswerData>, ttl: u32) -> Self {
        Self { records, ttl }
    }

    pub fn txt(strings: Vec<String>, ttl: u32) -> Self {
        Self {
            records: vec![AnswerData::Txt(strings)],
            ttl,
        }
    }

    pub fn address(ip: IpAddr, ttl: u32) -> Self {
        Self {
            records: vec![AnswerData::Address(ip)],
            ttl,
        }
    }

    /// Flattens TXT records, mainly for logs and tests.
    pub fn txt_strings(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter_map(|r| match r {
                AnswerData::Txt(parts) => Some(parts.iter().map(String::as_str)),
                AnswerData::Address(_) => None,
            })
            .flatten()
            .collect()
    }
}

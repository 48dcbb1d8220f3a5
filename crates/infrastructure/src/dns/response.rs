//! Turns service outcomes into DNS messages.

use dnstoys_domain::toy_answer::ERROR_TTL;
use dnstoys_domain::{AnswerData, DomainError, ErrorKind, ToyAnswer};
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, SOA, TXT};
use hickory_proto::rr::{Name, RData, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use super::edns::{ClientEdns, MAX_UDP_PAYLOAD};
use std::net::IpAddr;
use std::str::FromStr;

const SOA_SERIAL: u32 = 1;
const SOA_REFRESH: i32 = 3_600;
const SOA_RETRY: i32 = 900;
const SOA_EXPIRE: i32 = 604_800;

pub fn rcode_for(error: &DomainError) -> ResponseCode {
    match error.kind() {
        ErrorKind::Format | ErrorKind::Resolution => ResponseCode::NXDomain,
        ErrorKind::Upstream | ErrorKind::Internal | ErrorKind::Config => ResponseCode::ServFail,
    }
}

pub struct ResponseAssembler {
    apex: Name,
    soa: SOA,
}

impl ResponseAssembler {
    pub fn new(server_domain: &str) -> Result<Self, DomainError> {
        let fqdn = format!("{}.", server_domain.trim_end_matches('.'));
        let apex = Name::from_str(&fqdn).map_err(|e| {
            DomainError::ConfigError(format!("invalid server domain '{}': {}", server_domain, e))
        })?;
        let hostmaster = Name::from_str(&format!("hostmaster.{}", fqdn)).map_err(|e| {
            DomainError::ConfigError(format!("invalid server domain '{}': {}", server_domain, e))
        })?;

        let soa = SOA::new(
            apex.clone(),
            hostmaster,
            SOA_SERIAL,
            SOA_REFRESH,
            SOA_RETRY,
            SOA_EXPIRE,
            ERROR_TTL,
        );

        Ok(Self { apex, soa })
    }

    /// Response skeleton echoing the request's id, opcode, RD flag and
    /// question section.
    fn reply_to(request: &Message) -> Message {
        let mut response = Message::new(request.id(), MessageType::Response, request.op_code());
        response.set_recursion_desired(request.recursion_desired());
        response.set_recursion_available(false);
        response.set_authoritative(true);
        for query in request.queries() {
            response.add_query(query.clone());
        }
        response
    }

    pub fn answer(&self, request: &Message, answer: &ToyAnswer) -> Message {
        let mut response = Self::reply_to(request);
        let Some(owner) = request.queries().first().map(|q| q.name().clone()) else {
            response.set_response_code(ResponseCode::FormErr);
            return response;
        };

        for data in &answer.records {
            let rdata = match data {
                AnswerData::Txt(strings) => RData::TXT(TXT::new(strings.clone())),
                AnswerData::Address(IpAddr::V4(ip)) => RData::A(A(*ip)),
                AnswerData::Address(IpAddr::V6(ip)) => RData::AAAA(AAAA(*ip)),
            };
            response.add_answer(Record::from_rdata(owner.clone(), answer.ttl, rdata));
        }

        response.set_response_code(ResponseCode::NoError);
        response
    }

    /// Negative response with the zone SOA in the authority section, so
    /// resolvers cache the failure for `ERROR_TTL` at most.
    pub fn error(&self, request: &Message, error: &DomainError) -> Message {
        let mut response = Self::reply_to(request);
        response.set_response_code(rcode_for(error));
        response.add_name_server(Record::from_rdata(
            self.apex.clone(),
            ERROR_TTL,
            RData::SOA(self.soa.clone()),
        ));
        response
    }

    pub fn not_implemented(request: &Message) -> Message {
        let mut response = Self::reply_to(request);
        response.set_response_code(ResponseCode::NotImp);
        response
    }

    /// FORMERR for a packet that did not decode; only the id is known.
    pub fn format_error(id: u16) -> Message {
        let mut response = Message::new(id, MessageType::Response, OpCode::Query);
        response.set_response_code(ResponseCode::FormErr);
        response
    }

    /// Serializes `response` within the payload the client negotiated,
    /// falling back to an empty truncated reply when it does not fit. EDNS
    /// requests get our OPT record back either way.
    pub fn encode(response: &Message, edns: &ClientEdns) -> Result<Vec<u8>, DomainError> {
        let mut bytes = serialize_message(response)?;
        if bytes.len() + edns.opt_len() <= edns.payload_limit() {
            edns.append_opt(&mut bytes);
            return Ok(bytes);
        }

        let mut truncated =
            Message::new(response.id(), MessageType::Response, response.op_code());
        truncated.set_recursion_desired(response.recursion_desired());
        truncated.set_authoritative(true);
        truncated.set_truncated(true);
        truncated.set_response_code(response.response_code());
        for query in response.queries() {
            truncated.add_query(query.clone());
        }
        let mut bytes = serialize_message(&truncated)?;
        edns.append_opt(&mut bytes);
        Ok(bytes)
    }
}

fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
    let mut buf = Vec::with_capacity(MAX_UDP_PAYLOAD);
    let mut encoder = BinEncoder::new(&mut buf);
    message
        .emit(&mut encoder)
        .map_err(|e| DomainError::Internal(format!("failed to serialize DNS message: {}", e)))?;
    Ok(buf)
}

use super::edns::ClientEdns;
use super::record_type_map::RecordTypeMapper;
use super::response::ResponseAssembler;
use dnstoys_application::use_cases::HandleToyQueryUseCase;
use hickory_proto::op::{Message, MessageType, OpCode};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, error};

/// Wire-level request handling: decode, dispatch, assemble, encode.
///
/// Every decodable query gets exactly one response. Packets too short to
/// carry a header, and stray responses, are dropped.
pub struct DnsServerHandler {
    use_case: Arc<HandleToyQueryUseCase>,
    assembler: ResponseAssembler,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleToyQueryUseCase>, assembler: ResponseAssembler) -> Self {
        Self {
            use_case,
            assembler,
        }
    }

    pub async fn handle_raw(&self, packet: &[u8], client_ip: IpAddr) -> Option<Vec<u8>> {
        let edns = ClientEdns::from_wire(packet);
        let response = match Message::from_vec(packet) {
            Ok(request) => {
                if request.message_type() != MessageType::Query {
                    debug!(client = %client_ip, "Ignoring non-query message");
                    return None;
                }
                self.handle_message(&request, client_ip).await
            }
            Err(e) => {
                let id = header_id(packet)?;
                debug!(client = %client_ip, error = %e, "Malformed DNS message");
                ResponseAssembler::format_error(id)
            }
        };

        match ResponseAssembler::encode(&response, &edns) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!(error = %e, "Failed to encode response");
                None
            }
        }
    }

    pub async fn handle_message(&self, request: &Message, client_ip: IpAddr) -> Message {
        if request.op_code() != OpCode::Query {
            debug!(op_code = ?request.op_code(), "Unsupported opcode");
            return ResponseAssembler::not_implemented(request);
        }

        let [query] = request.queries() else {
            debug!(questions = request.queries().len(), "Expected exactly one question");
            return ResponseAssembler::format_error(request.id());
        };

        let name = query.name().to_utf8();
        let record_type = RecordTypeMapper::from_hickory(query.query_type());

        debug!(
            name = %name,
            record_type = %record_type,
            client = %client_ip,
            "DNS query received"
        );

        match self.use_case.execute(&name, record_type, client_ip).await {
            Ok(answer) => self.assembler.answer(request, &answer),
            Err(e) => self.assembler.error(request, &e),
        }
    }
}

fn header_id(packet: &[u8]) -> Option<u16> {
    // A datagram shorter than a header cannot be answered meaningfully.
    if packet.len() < 12 {
        return None;
    }
    Some(u16::from_be_bytes([packet[0], packet[1]]))
}

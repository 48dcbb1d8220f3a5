mod helpers;

use async_trait::async_trait;
use dnstoys_application::ports::ToyHandler;
use dnstoys_application::use_cases::{
    HandleToyQueryUseCase, HelpHandler, MyIpHandler, ZoneRouter,
};
use dnstoys_domain::toy_answer::{ERROR_TTL, HELP_TTL, MYIP_TTL};
use dnstoys_domain::{AnswerData, DomainError, ServiceKind, ToyAnswer, ToyQuery};
use dnstoys_infrastructure::dns::{DnsServerHandler, ResponseAssembler};
use helpers::{build_query, encode, with_edns};
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::{RData, RecordType};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

const CLIENT_V4: IpAddr = IpAddr::V4(Ipv4Addr::new(198, 51, 100, 7));

struct UnavailableHandler;

#[async_trait]
impl ToyHandler for UnavailableHandler {
    async fn handle(&self, _query: &ToyQuery) -> Result<ToyAnswer, DomainError> {
        Err(DomainError::upstream("test", "down"))
    }
}

/// Five weather-sized TXT records, well past a plain 512-byte datagram.
struct LongForecastHandler;

#[async_trait]
impl ToyHandler for LongForecastHandler {
    async fn handle(&self, _query: &ToyQuery) -> Result<ToyAnswer, DomainError> {
        let record = AnswerData::Txt(vec![
            "Santiago de los Caballeros (DO)".to_string(),
            "31.40C (88.52F)".to_string(),
            "62.10% hu.".to_string(),
            "partlycloudy_day".to_string(),
            "14:00, Tue".to_string(),
        ]);
        Ok(ToyAnswer::new(vec![record; 5], 600))
    }
}

fn handler() -> DnsServerHandler {
    let enabled = [ServiceKind::MyIp, ServiceKind::Weather];
    let mut router = ZoneRouter::new(Arc::new(HelpHandler::new(&enabled, "dns.toys")));
    router.register_service(ServiceKind::MyIp, Arc::new(MyIpHandler));
    router.register_service(ServiceKind::Weather, Arc::new(UnavailableHandler));
    router.register("forecast", Arc::new(LongForecastHandler));

    DnsServerHandler::new(
        Arc::new(HandleToyQueryUseCase::new(Arc::new(router))),
        ResponseAssembler::new("dns.toys").unwrap(),
    )
}

async fn ask(handler: &DnsServerHandler, name: &str, rt: RecordType, client: IpAddr) -> Message {
    let packet = encode(&build_query(0x4242, name, rt));
    let bytes = handler.handle_raw(&packet, client).await.unwrap();
    Message::from_vec(&bytes).unwrap()
}

#[tokio::test]
async fn test_myip_a_answer_owned_by_question_name() {
    let response = ask(&handler(), "myip.", RecordType::A, CLIENT_V4).await;

    assert_eq!(response.id(), 0x4242);
    assert_eq!(response.message_type(), MessageType::Response);
    assert_eq!(response.response_code(), ResponseCode::NoError);
    assert_eq!(response.answers().len(), 1);

    let record = &response.answers()[0];
    assert_eq!(record.name().to_utf8(), "myip.");
    assert_eq!(record.ttl(), MYIP_TTL);
    match record.data() {
        RData::A(a) => assert_eq!(IpAddr::V4(a.0), CLIENT_V4),
        other => panic!("expected A record, got {:?}", other),
    }
}

#[tokio::test]
async fn test_myip_ipv6_client_gets_aaaa() {
    let client = IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1));
    let response = ask(&handler(), "myip.", RecordType::AAAA, client).await;

    match response.answers()[0].data() {
        RData::AAAA(aaaa) => assert_eq!(IpAddr::V6(aaaa.0), client),
        other => panic!("expected AAAA record, got {:?}", other),
    }
}

#[tokio::test]
async fn test_help_txt_records() {
    let response = ask(&handler(), "help.", RecordType::TXT, CLIENT_V4).await;

    assert_eq!(response.response_code(), ResponseCode::NoError);
    assert_eq!(response.answers().len(), 2);
    for record in response.answers() {
        assert_eq!(record.ttl(), HELP_TTL);
        assert!(matches!(record.data(), RData::TXT(_)));
    }
    let RData::TXT(txt) = response.answers()[0].data() else {
        panic!("expected TXT");
    };
    let strings: Vec<String> = txt
        .iter()
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .collect();
    assert_eq!(
        strings,
        vec!["get your host's requesting IP.", "dig myip @dns.toys"]
    );
}

#[tokio::test]
async fn test_unknown_zone_is_nxdomain_with_soa() {
    let response = ask(&handler(), "mumbai.time.", RecordType::TXT, CLIENT_V4).await;

    assert_eq!(response.response_code(), ResponseCode::NXDomain);
    assert!(response.answers().is_empty());
    let soa = &response.name_servers()[0];
    assert_eq!(soa.ttl(), ERROR_TTL);
    match soa.data() {
        RData::SOA(soa) => assert_eq!(soa.minimum(), ERROR_TTL),
        other => panic!("expected SOA, got {:?}", other),
    }
}

#[tokio::test]
async fn test_upstream_failure_is_servfail() {
    let response = ask(&handler(), "berlin.weather.", RecordType::TXT, CLIENT_V4).await;

    assert_eq!(response.response_code(), ResponseCode::ServFail);
    assert_eq!(response.name_servers().len(), 1);
}

#[tokio::test]
async fn test_bad_parameters_are_nxdomain() {
    let response = ask(&handler(), "extra.myip.", RecordType::A, CLIENT_V4).await;
    assert_eq!(response.response_code(), ResponseCode::NXDomain);
}

#[tokio::test]
async fn test_malformed_packet_is_formerr() {
    let mut packet = encode(&build_query(0x1234, "myip.", RecordType::A));
    packet.truncate(packet.len() - 3);

    let bytes = handler().handle_raw(&packet, CLIENT_V4).await.unwrap();
    let response = Message::from_vec(&bytes).unwrap();

    assert_eq!(response.id(), 0x1234);
    assert_eq!(response.response_code(), ResponseCode::FormErr);
}

#[tokio::test]
async fn test_runt_packet_is_dropped() {
    let response = handler().handle_raw(&[0x12, 0x34, 0x01], CLIENT_V4).await;
    assert!(response.is_none());
}

#[tokio::test]
async fn test_non_query_opcode_is_notimp() {
    let mut request = build_query(7, "myip.", RecordType::A);
    request.set_op_code(OpCode::Status);

    let bytes = handler().handle_raw(&encode(&request), CLIENT_V4).await.unwrap();
    let response = Message::from_vec(&bytes).unwrap();

    assert_eq!(response.response_code(), ResponseCode::NotImp);
}

const NAME: &str = "santiago-de-los-caballeros.forecast.";

fn is_truncated(bytes: &[u8]) -> bool {
    bytes[2] & 0x02 != 0
}

fn arcount(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[10], bytes[11]])
}

#[tokio::test]
async fn test_large_answer_fits_negotiated_edns_payload() {
    let packet = with_edns(encode(&build_query(0x5151, NAME, RecordType::TXT)), 1232);

    let bytes = handler().handle_raw(&packet, CLIENT_V4).await.unwrap();

    assert!(bytes.len() > 512 && bytes.len() <= 1232);
    assert!(!is_truncated(&bytes));
    assert_eq!(arcount(&bytes), 1);
    let response = Message::from_vec(&bytes).unwrap();
    assert_eq!(response.response_code(), ResponseCode::NoError);
    assert_eq!(response.answers().len(), 5);
}

#[tokio::test]
async fn test_large_answer_without_edns_is_truncated() {
    let packet = encode(&build_query(0x5151, NAME, RecordType::TXT));

    let bytes = handler().handle_raw(&packet, CLIENT_V4).await.unwrap();

    assert!(bytes.len() <= 512);
    assert!(is_truncated(&bytes));
    assert_eq!(arcount(&bytes), 0);
    let response = Message::from_vec(&bytes).unwrap();
    assert!(response.answers().is_empty());
    assert_eq!(response.queries().len(), 1);
}

#[tokio::test]
async fn test_edns_query_gets_opt_on_small_answer() {
    let packet = with_edns(encode(&build_query(9, "myip.", RecordType::A)), 4096);

    let bytes = handler().handle_raw(&packet, CLIENT_V4).await.unwrap();

    assert!(!is_truncated(&bytes));
    assert_eq!(arcount(&bytes), 1);
    assert_eq!(Message::from_vec(&bytes).unwrap().answers().len(), 1);
}

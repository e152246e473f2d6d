//! Builder -> codec -> parser -> validator flows for each connection role.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use bytes::Bytes;

use tcpros_core::msgs::std_msgs::StringMsg;
use tcpros_core::msgs::std_srvs::{Trigger, TriggerResponse};
use tcpros_core::protocol::{
    decode_service_response, encode_error_header, encode_service_response, publisher_header,
    serialize_fields, service_client_header, service_server_header, subscriber_header,
    validate_publisher_header, validate_service_client_header, validate_subscriber_header,
    ConnectionHeader, RosMessage, RosService, ServiceOutcome, Validation,
};

fn roundtrip(fields: &[String]) -> ConnectionHeader {
    ConnectionHeader::decode(&mut serialize_fields(fields).unwrap()).unwrap()
}

#[test]
fn subscriber_to_publisher_handshake() {
    let sub = subscriber_header(
        "/listener",
        StringMsg::MD5SUM,
        "/chatter",
        StringMsg::TYPE,
        StringMsg::DEFINITION,
        true,
    );
    let seen_by_pub = roundtrip(&sub);
    assert!(seen_by_pub.tcp_nodelay);
    assert_eq!(
        validate_subscriber_header(&seen_by_pub, "/chatter", StringMsg::TYPE, StringMsg::MD5SUM),
        Validation::Accepted
    );

    let reply = publisher_header(
        "/talker",
        StringMsg::MD5SUM,
        StringMsg::TYPE,
        StringMsg::DEFINITION,
        false,
    );
    let seen_by_sub = roundtrip(&reply);
    assert!(!seen_by_sub.latching);
    let verdict = validate_publisher_header(&seen_by_sub, StringMsg::TYPE, StringMsg::MD5SUM);
    assert!(verdict.is_accepted());
}

#[test]
fn rejected_subscriber_gets_error_header() {
    let sub = subscriber_header("/listener", "deadbeef", "/chatter", StringMsg::TYPE, "", false);
    let verdict = validate_subscriber_header(
        &roundtrip(&sub),
        "/chatter",
        StringMsg::TYPE,
        StringMsg::MD5SUM,
    );
    let reason = verdict.reason().expect("must reject").to_string();
    assert!(reason.starts_with("md5sum mismatch"));

    let mut wire = encode_error_header(&reason).unwrap();
    let back = ConnectionHeader::decode(&mut wire).unwrap();
    assert_eq!(back.error.as_deref(), Some(reason.as_str()));
    assert!(back.callerid.is_none());
}

#[test]
fn service_handshake_and_call() {
    let client = service_client_header("/caller", "/trigger", Trigger::MD5SUM, true);
    let seen = roundtrip(&client);
    assert!(seen.persistent);
    assert!(validate_service_client_header(&seen, "/trigger", Trigger::MD5SUM).is_accepted());

    let server = roundtrip(&service_server_header("/server", Trigger::MD5SUM, Trigger::TYPE));
    assert_eq!(server.msg_type.as_deref(), Some("std_srvs/Trigger"));

    let resp = TriggerResponse {
        success: true,
        message: "done".into(),
    };
    let mut wire = encode_service_response(&ServiceOutcome::Success(resp.clone())).unwrap();
    let got: TriggerResponse = decode_service_response(&mut wire).unwrap();
    assert_eq!(got, resp);
}

#[test]
fn builders_always_carry_callerid_and_md5sum() {
    let all = [
        subscriber_header("/a", "m", "/t", "T", "", false),
        publisher_header("/a", "m", "T", "", false),
        service_client_header("/a", "/s", "m", false),
        service_server_header("/a", "m", "T"),
    ];
    for fields in all {
        let h = roundtrip(&fields);
        assert_eq!(h.callerid.as_deref(), Some("/a"));
        assert_eq!(h.md5sum.as_deref(), Some("m"));
    }
}

#[test]
fn header_followed_by_message_on_same_stream() {
    let header = publisher_header("/talker", "*", "*", "", false);
    let mut raw = serialize_fields(&header).unwrap().to_vec();
    let msg = tcpros_core::protocol::encode_message(&StringMsg::new("hi"), true).unwrap();
    raw.extend_from_slice(&msg);
    let mut buf = Bytes::from(raw);

    let header = ConnectionHeader::decode(&mut buf).unwrap();
    assert_eq!(header.callerid.as_deref(), Some("/talker"));
    let msg: StringMsg = tcpros_core::protocol::decode_framed_message(&mut buf).unwrap();
    assert_eq!(msg.data, "hi");
}

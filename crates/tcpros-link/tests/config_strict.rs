#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use tcpros_link::{config, Endpoint};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
node:
  callerid: "/probe"
link:
  max_header_bytez: 123 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_CONFIG");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
node:
  callerid: "/probe"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.node.callerid, "/probe");
    assert!(cfg.link.tcp_nodelay);
    assert_eq!(cfg.link.max_header_bytes, 64 * 1024);
    assert!(cfg.probe.is_none());
}

#[test]
fn wrong_version_rejected() {
    let bad = r#"
version: 2
node:
  callerid: "/probe"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn relative_callerid_rejected() {
    let bad = r#"
version: 1
node:
  callerid: "probe"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("node.callerid"));
}

#[test]
fn limits_out_of_range_rejected() {
    let bad = r#"
version: 1
node:
  callerid: "/probe"
link:
  handshake_timeout_ms: 10
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("handshake_timeout_ms"));
}

#[test]
fn probe_section_parsed_and_checked() {
    let ok = r#"
version: 1
node:
  callerid: "/probe"
link:
  tcp_nodelay: false
  max_message_bytes: 4096
probe:
  publisher: "127.0.0.1:40000"
  topic: "/chatter"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    let probe = cfg.probe.as_ref().unwrap();
    assert_eq!(probe.count, 10);
    assert_eq!(probe.publisher_addr().unwrap().port(), 40000);

    let ep = Endpoint::from_config(&cfg);
    assert_eq!(ep.callerid, "/probe");
    assert!(!ep.tcp_nodelay);
    assert_eq!(ep.limits.max_message_bytes, 4096);

    let bad = ok.replace("127.0.0.1:40000", "not-an-addr");
    let err = config::load_from_str(&bad).expect_err("must fail");
    assert!(err.to_string().contains("probe.publisher"));
}

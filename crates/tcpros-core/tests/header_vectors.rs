//! Header block vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use bytes::Bytes;

use tcpros_core::protocol::{deserialize_fields, serialize_fields, ConnectionHeader};

use vector_loader::HeaderVector;

#[test]
fn header_vectors() {
    let files = [
        "header_publisher.json",
        "header_subscriber_wildcard.json",
        "header_empty.json",
        "header_missing_delimiter.json",
        "header_total_past_end.json",
        "header_truncated_field.json",
        "header_bad_utf8.json",
        "header_short_total.json",
    ];

    for f in files {
        let v = HeaderVector::load(f);
        let raw = v.bytes();
        let res = deserialize_fields(&mut Bytes::from(raw.clone()));

        if let Some(code) = &v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.code().as_str(), code, "vector={}", v.description);
            continue;
        }

        let fields = res.expect("expected ok fields");
        let ex = v.expect.as_ref().expect("missing expect block");
        assert_eq!(fields, ex.fields, "vector={}", v.description);

        // encoder must reproduce the exact bytes
        let again = serialize_fields(&fields).unwrap();
        assert_eq!(again.to_vec(), raw, "vector={}", v.description);

        ex.check(&ConnectionHeader::parse(&fields), &v.description);
    }
}

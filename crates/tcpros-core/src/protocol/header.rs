//! Connection header: builders per role and the typed parsed record.
//!
//! Builders are pure formatting functions. They emit fields in the fixed wire
//! order of each role and never validate their inputs.

use std::collections::BTreeMap;

use bytes::{Buf, Bytes};

use super::fields::{deserialize_fields, serialize_fields};
use crate::error::Result;

/// Well-known header keys.
pub mod keys {
    pub const CALLERID: &str = "callerid";
    pub const MD5SUM: &str = "md5sum";
    pub const TOPIC: &str = "topic";
    pub const SERVICE: &str = "service";
    pub const TYPE: &str = "type";
    pub const MESSAGE_DEFINITION: &str = "message_definition";
    pub const ERROR: &str = "error";
    pub const LATCHING: &str = "latching";
    pub const PERSISTENT: &str = "persistent";
    pub const TCP_NODELAY: &str = "tcp_nodelay";
}

/// Value of `type` or `md5sum` that matches anything.
pub const WILDCARD: &str = "*";

/// Value carried by a set boolean flag.
const FLAG_SET: &str = "1";

fn field(key: &str, value: &str) -> String {
    format!("{key}={value}")
}

fn push_flag(fields: &mut Vec<String>, key: &str, on: bool) {
    if on {
        fields.push(field(key, FLAG_SET));
    }
}

/// Fields sent by a subscriber when connecting to a publisher.
pub fn subscriber_header(
    callerid: &str,
    md5sum: &str,
    topic: &str,
    msg_type: &str,
    message_definition: &str,
    tcp_nodelay: bool,
) -> Vec<String> {
    let mut fields = vec![
        field(keys::CALLERID, callerid),
        field(keys::MD5SUM, md5sum),
        field(keys::TOPIC, topic),
        field(keys::TYPE, msg_type),
        field(keys::MESSAGE_DEFINITION, message_definition),
    ];
    push_flag(&mut fields, keys::TCP_NODELAY, tcp_nodelay);
    fields
}

/// Fields sent by a publisher in reply to an accepted subscriber.
pub fn publisher_header(
    callerid: &str,
    md5sum: &str,
    msg_type: &str,
    message_definition: &str,
    latching: bool,
) -> Vec<String> {
    let mut fields = vec![
        field(keys::CALLERID, callerid),
        field(keys::MD5SUM, md5sum),
        field(keys::TYPE, msg_type),
        field(keys::MESSAGE_DEFINITION, message_definition),
    ];
    push_flag(&mut fields, keys::LATCHING, latching);
    fields
}

/// Fields sent by a service client when connecting to a service server.
pub fn service_client_header(
    callerid: &str,
    service: &str,
    md5sum: &str,
    persistent: bool,
) -> Vec<String> {
    let mut fields = vec![
        field(keys::CALLERID, callerid),
        field(keys::SERVICE, service),
        field(keys::MD5SUM, md5sum),
    ];
    push_flag(&mut fields, keys::PERSISTENT, persistent);
    fields
}

/// Fields sent by a service server in reply to an accepted client.
pub fn service_server_header(callerid: &str, md5sum: &str, msg_type: &str) -> Vec<String> {
    vec![
        field(keys::CALLERID, callerid),
        field(keys::MD5SUM, md5sum),
        field(keys::TYPE, msg_type),
    ]
}

/// Single-field header carrying a rejection reason back to the peer.
pub fn error_header(message: &str) -> Vec<String> {
    vec![field(keys::ERROR, message)]
}

/// Split raw fields into a key/value map.
///
/// Fields without `=` are logged and skipped. Later duplicates overwrite
/// earlier ones.
pub fn parse_fields<I, S>(fields: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut map = BTreeMap::new();
    for f in fields {
        let f = f.as_ref();
        match f.split_once('=') {
            Some((key, value)) => {
                map.insert(key.to_string(), value.to_string());
            }
            None => {
                tracing::warn!(field = %f, "dropping header field without '='");
            }
        }
    }
    map
}

/// Parsed connection header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionHeader {
    pub callerid: Option<String>,
    pub md5sum: Option<String>,
    pub topic: Option<String>,
    pub service: Option<String>,
    /// Message or service type (`type` on the wire).
    pub msg_type: Option<String>,
    pub message_definition: Option<String>,
    /// Rejection reason sent by the peer.
    pub error: Option<String>,
    pub latching: bool,
    pub persistent: bool,
    pub tcp_nodelay: bool,
    /// Keys this crate does not interpret.
    pub extra: BTreeMap<String, String>,
}

impl ConnectionHeader {
    /// Parse a raw field list.
    pub fn parse<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_map(parse_fields(fields))
    }

    /// Build the typed record from a key/value map.
    pub fn from_map(mut map: BTreeMap<String, String>) -> Self {
        let flag = |map: &mut BTreeMap<String, String>, key: &str| {
            map.remove(key).is_some_and(|v| v == FLAG_SET)
        };

        Self {
            callerid: map.remove(keys::CALLERID),
            md5sum: map.remove(keys::MD5SUM),
            topic: map.remove(keys::TOPIC),
            service: map.remove(keys::SERVICE),
            msg_type: map.remove(keys::TYPE),
            message_definition: map.remove(keys::MESSAGE_DEFINITION),
            error: map.remove(keys::ERROR),
            latching: flag(&mut map, keys::LATCHING),
            persistent: flag(&mut map, keys::PERSISTENT),
            tcp_nodelay: flag(&mut map, keys::TCP_NODELAY),
            extra: map,
        }
    }

    /// Decode a header block and parse it.
    pub fn decode<B: Buf>(buf: &mut B) -> Result<Self> {
        Ok(Self::parse(deserialize_fields(buf)?))
    }

    /// Re-encode as a header block (known keys first, then `extra`).
    pub fn encode(&self) -> Result<Bytes> {
        serialize_fields(&self.to_fields())
    }

    /// Field list for this header. Unset flags are omitted.
    pub fn to_fields(&self) -> Vec<String> {
        let known = [
            (keys::CALLERID, &self.callerid),
            (keys::MD5SUM, &self.md5sum),
            (keys::TOPIC, &self.topic),
            (keys::SERVICE, &self.service),
            (keys::TYPE, &self.msg_type),
            (keys::MESSAGE_DEFINITION, &self.message_definition),
            (keys::ERROR, &self.error),
        ];
        let mut fields: Vec<String> = known
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| field(k, v)))
            .collect();
        push_flag(&mut fields, keys::LATCHING, self.latching);
        push_flag(&mut fields, keys::PERSISTENT, self.persistent);
        push_flag(&mut fields, keys::TCP_NODELAY, self.tcp_nodelay);
        fields.extend(self.extra.iter().map(|(k, v)| field(k, v)));
        fields
    }

    /// Look up any field by its wire key.
    pub fn get(&self, key: &str) -> Option<&str> {
        let flag = |on: bool| on.then_some(FLAG_SET);
        match key {
            keys::CALLERID => self.callerid.as_deref(),
            keys::MD5SUM => self.md5sum.as_deref(),
            keys::TOPIC => self.topic.as_deref(),
            keys::SERVICE => self.service.as_deref(),
            keys::TYPE => self.msg_type.as_deref(),
            keys::MESSAGE_DEFINITION => self.message_definition.as_deref(),
            keys::ERROR => self.error.as_deref(),
            keys::LATCHING => flag(self.latching),
            keys::PERSISTENT => flag(self.persistent),
            keys::TCP_NODELAY => flag(self.tcp_nodelay),
            other => self.extra.get(other).map(String::as_str),
        }
    }

    /// True when the peer answered with an error header.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

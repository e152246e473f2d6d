//! Built-in message and service types.
//!
//! [`RawMessage`] carries opaque bytes and negotiates with wildcards, which is
//! what probes and relays need. The `std_msgs` / `std_srvs` types are the
//! canonical definitions with their published hashes.

use bytes::{Buf, BufMut, Bytes};

use crate::error::{Result, TcpRosError};
use crate::protocol::header::WILDCARD;
use crate::protocol::message::RosMessage;
use crate::protocol::wire::{get_string, get_u8, put_string, LEN_PREFIX};

/// Opaque payload of any type. Decoding takes every remaining byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMessage {
    pub data: Bytes,
}

impl RawMessage {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }
}

impl RosMessage for RawMessage {
    const TYPE: &'static str = WILDCARD;
    const MD5SUM: &'static str = WILDCARD;
    const DEFINITION: &'static str = "";

    fn encoded_len(&self) -> usize {
        self.data.len()
    }

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(&self.data);
    }

    fn decode<B: Buf>(buf: &mut B) -> Result<Self> {
        Ok(Self {
            data: buf.copy_to_bytes(buf.remaining()),
        })
    }
}

pub mod std_msgs {
    use super::*;

    /// `std_msgs/String`.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct StringMsg {
        pub data: String,
    }

    impl StringMsg {
        pub fn new(data: impl Into<String>) -> Self {
            Self { data: data.into() }
        }
    }

    impl RosMessage for StringMsg {
        const TYPE: &'static str = "std_msgs/String";
        const MD5SUM: &'static str = "992ce8a1687cec8c8bd883ec73ca41d1";
        const DEFINITION: &'static str = "string data\n";

        fn encoded_len(&self) -> usize {
            LEN_PREFIX + self.data.len()
        }

        fn encode<B: BufMut>(&self, buf: &mut B) {
            put_string(buf, &self.data);
        }

        fn decode<B: Buf>(buf: &mut B) -> Result<Self> {
            Ok(Self {
                data: get_string(buf, TcpRosError::MalformedMessage)?,
            })
        }
    }

    /// `std_msgs/Empty`.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Empty;

    impl RosMessage for Empty {
        const TYPE: &'static str = "std_msgs/Empty";
        const MD5SUM: &'static str = "d41d8cd98f00b204e9800998ecf8427e";
        const DEFINITION: &'static str = "";

        fn encoded_len(&self) -> usize {
            0
        }

        fn encode<B: BufMut>(&self, _buf: &mut B) {}

        fn decode<B: Buf>(_buf: &mut B) -> Result<Self> {
            Ok(Empty)
        }
    }
}

pub mod std_srvs {
    use super::*;
    use crate::protocol::message::RosService;

    /// `std_srvs/Trigger`.
    pub struct Trigger;

    impl RosService for Trigger {
        const TYPE: &'static str = "std_srvs/Trigger";
        const MD5SUM: &'static str = "937c9679a518e3a18d831e57125ea522";
        type Request = TriggerRequest;
        type Response = TriggerResponse;
    }

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct TriggerRequest;

    impl RosMessage for TriggerRequest {
        const TYPE: &'static str = "std_srvs/TriggerRequest";
        const MD5SUM: &'static str = "d41d8cd98f00b204e9800998ecf8427e";
        const DEFINITION: &'static str = "";

        fn encoded_len(&self) -> usize {
            0
        }

        fn encode<B: BufMut>(&self, _buf: &mut B) {}

        fn decode<B: Buf>(_buf: &mut B) -> Result<Self> {
            Ok(TriggerRequest)
        }
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct TriggerResponse {
        pub success: bool,
        pub message: String,
    }

    impl RosMessage for TriggerResponse {
        const TYPE: &'static str = "std_srvs/TriggerResponse";
        const MD5SUM: &'static str = "937c9679a518e3a18d831e57125ea522";
        const DEFINITION: &'static str = "bool success\nstring message\n";

        fn encoded_len(&self) -> usize {
            1 + LEN_PREFIX + self.message.len()
        }

        fn encode<B: BufMut>(&self, buf: &mut B) {
            buf.put_u8(u8::from(self.success));
            put_string(buf, &self.message);
        }

        fn decode<B: Buf>(buf: &mut B) -> Result<Self> {
            let success = get_u8(buf, TcpRosError::MalformedMessage)? != 0;
            let message = get_string(buf, TcpRosError::MalformedMessage)?;
            Ok(Self { success, message })
        }
    }
}

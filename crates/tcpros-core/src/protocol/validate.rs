//! Negotiation checks over a parsed header.
//!
//! Validators never fail: a mismatch is returned as `Validation::Rejected`
//! with a reason the caller can send back in an error header. Checks run in a
//! fixed order and only the first violation is reported.

use super::header::{ConnectionHeader, WILDCARD};
use crate::error::{Result, TcpRosError};

/// Outcome of validating a peer header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Accepted,
    Rejected(String),
}

impl Validation {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Validation::Accepted)
    }

    /// Rejection reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Validation::Accepted => None,
            Validation::Rejected(r) => Some(r),
        }
    }

    /// Convert into a `Result` for callers at the connection boundary.
    pub fn into_result(self) -> Result<()> {
        match self {
            Validation::Accepted => Ok(()),
            Validation::Rejected(r) => Err(TcpRosError::Rejected(r)),
        }
    }
}

fn missing(key: &str) -> Validation {
    Validation::Rejected(format!("header missing required field [{key}]"))
}

fn mismatch(key: &str, expected: &str, got: &str) -> Validation {
    Validation::Rejected(format!("{key} mismatch: expected [{expected}], got [{got}]"))
}

/// A peer value of `*` matches anything; a local `*` only matches itself.
fn matches_wildcard(got: &str, expected: &str) -> bool {
    got == expected || got == WILDCARD
}

fn check_type_and_md5(got_type: &str, got_md5: &str, msg_type: &str, md5sum: &str) -> Validation {
    if !matches_wildcard(got_type, msg_type) {
        return mismatch("type", msg_type, got_type);
    }
    if !matches_wildcard(got_md5, md5sum) {
        return mismatch("md5sum", md5sum, got_md5);
    }
    Validation::Accepted
}

/// Validate a subscriber's header on the publishing side.
pub fn validate_subscriber_header(
    header: &ConnectionHeader,
    topic: &str,
    msg_type: &str,
    md5sum: &str,
) -> Validation {
    let Some(got_topic) = header.topic.as_deref() else {
        return missing("topic");
    };
    let Some(got_type) = header.msg_type.as_deref() else {
        return missing("type");
    };
    let Some(got_md5) = header.md5sum.as_deref() else {
        return missing("md5sum");
    };

    if got_topic != topic {
        return mismatch("topic", topic, got_topic);
    }
    check_type_and_md5(got_type, got_md5, msg_type, md5sum)
}

/// Validate a publisher's reply header on the subscribing side.
pub fn validate_publisher_header(
    header: &ConnectionHeader,
    msg_type: &str,
    md5sum: &str,
) -> Validation {
    let Some(got_type) = header.msg_type.as_deref() else {
        return missing("type");
    };
    let Some(got_md5) = header.md5sum.as_deref() else {
        return missing("md5sum");
    };
    check_type_and_md5(got_type, got_md5, msg_type, md5sum)
}

/// Validate a service client's header on the serving side.
pub fn validate_service_client_header(
    header: &ConnectionHeader,
    service: &str,
    md5sum: &str,
) -> Validation {
    let Some(got_service) = header.service.as_deref() else {
        return missing("service");
    };
    let Some(got_md5) = header.md5sum.as_deref() else {
        return missing("md5sum");
    };

    if got_service != service {
        return mismatch("service", service, got_service);
    }
    if !matches_wildcard(got_md5, md5sum) {
        return mismatch("md5sum", md5sum, got_md5);
    }
    Validation::Accepted
}

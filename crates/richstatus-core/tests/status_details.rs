use std::{collections::BTreeMap, time::Duration};

use richstatus_core::{
    AnyDetail, Code, DetailError, DetailKind, RenderOptions, StatusError, TypedMessage,
    details::{
        BadRequest, DebugInfo, ErrorInfo, Help, HelpLink, LocalizedMessage, PreconditionFailure,
        PreconditionViolation, QuotaFailure, QuotaViolation, RequestInfo, ResourceInfo, RetryInfo,
    },
    extract,
};
use serde::{Deserialize, Serialize, Serializer, ser::Error as _};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct AuditTicket {
    ticket: String,
}

impl TypedMessage for AuditTicket {
    const TYPE_URL: &'static str = "type.example.com/audit.AuditTicket";
}

// Same fields, different identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct SupportTicket {
    ticket: String,
}

impl TypedMessage for SupportTicket {
    const TYPE_URL: &'static str = "type.example.com/support.SupportTicket";
}

// Encoding always fails.
#[derive(Debug, Deserialize)]
struct Unencodable;

impl Serialize for Unencodable {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(S::Error::custom("refuse"))
    }
}

impl TypedMessage for Unencodable {
    const TYPE_URL: &'static str = "type.example.com/test.Unencodable";
}

fn error_info(reason: &str) -> ErrorInfo {
    ErrorInfo {
        reason: reason.to_string(),
        domain: "richstatus.test".to_string(),
        metadata: BTreeMap::from([("field".to_string(), "email".to_string())]),
    }
}

fn fully_loaded() -> StatusError {
    StatusError::new(Code::FailedPrecondition, "everything went wrong")
        .with_error_info(error_info("FIRST"))
        .with_bad_request(BadRequest::single("username", "too long"))
        .with_precondition_failure(PreconditionFailure {
            violations: vec![PreconditionViolation {
                kind: "TOS".to_string(),
                subject: "user".to_string(),
                description: "terms not accepted".to_string(),
            }],
        })
        .with_quota_failure(QuotaFailure {
            violations: vec![QuotaViolation {
                subject: "project:1".to_string(),
                description: "daily limit".to_string(),
            }],
        })
        .with_retry_info(RetryInfo {
            retry_delay: Duration::from_millis(1500),
        })
        .with_resource_info(ResourceInfo {
            resource_type: "user".to_string(),
            resource_name: "bob".to_string(),
            owner: "admin".to_string(),
            description: "locked".to_string(),
        })
        .with_request_info(RequestInfo {
            request_id: "req-1".to_string(),
            serving_data: "node-a".to_string(),
        })
        .with_debug_info(DebugInfo {
            detail: "panic".to_string(),
            stack_entries: vec!["a.rs:1".to_string(), "b.rs:2".to_string()],
        })
        .with_help(Help {
            links: vec![HelpLink {
                description: "docs".to_string(),
                url: "https://example.com/docs".to_string(),
            }],
        })
        .with_localized_message(LocalizedMessage {
            locale: "en-US".to_string(),
            message: "Something failed".to_string(),
        })
        .with_error_info(error_info("SECOND"))
}

#[test]
fn known_slots_hold_last_write_per_kind() {
    let err = fully_loaded();

    assert_eq!(err.details().known().len(), DetailKind::ALL.len());
    assert_eq!(err.reason(), "SECOND");
    assert_eq!(err.domain(), "richstatus.test");
    assert_eq!(err.metadata().get("field").map(String::as_str), Some("email"));
    // The wire list keeps every attachment; the bag keeps one per kind.
    assert_eq!(err.status().details().len(), 11);
    assert!(err.details().unknown().is_empty());
}

#[test]
fn chain_never_mutates_receiver() {
    let base = StatusError::new(Code::InvalidArgument, "bad");
    let with_info = base.with_error_info(error_info("A"));
    let _overwritten = with_info.with_error_info(error_info("B"));

    assert!(base.details().is_empty());
    assert_eq!(with_info.reason(), "A");
}

#[test]
fn custom_details_append_in_order() {
    let err = StatusError::new(Code::Internal, "boom")
        .with_custom_detail(&AuditTicket {
            ticket: "a-1".to_string(),
        })
        .with_custom_detail(&AuditTicket {
            ticket: "a-1".to_string(),
        })
        .with_custom_detail(&SupportTicket {
            ticket: "s-1".to_string(),
        });

    assert_eq!(err.details().unknown().len(), 3);
    assert!(err.details().known().is_empty());
}

#[test]
fn wire_roundtrip_preserves_known_slots() {
    let err = fully_loaded();

    let wire = err.to_wire();
    let rebuilt = StatusError::from_wire_status(Code::from_i32(wire.code), wire.message, wire.details);

    assert_eq!(rebuilt.code(), err.code());
    assert_eq!(rebuilt.message(), err.message());
    assert_eq!(rebuilt.details().known(), err.details().known());
    assert_eq!(rebuilt, err);
}

#[test]
fn byte_roundtrip_preserves_custom_details() {
    let err = StatusError::new(Code::NotFound, "missing")
        .with_bad_request(BadRequest::single("email", "unknown"))
        .with_custom_detail(&AuditTicket {
            ticket: "a-9".to_string(),
        });

    let bytes = err.encode().expect("encode should succeed");
    let parsed = StatusError::parse(&bytes).expect("parse should succeed");

    assert_eq!(parsed, err);
    assert_eq!(
        parsed.extract::<AuditTicket>().expect("ticket should be found"),
        AuditTicket {
            ticket: "a-9".to_string()
        }
    );
}

#[test]
fn wire_import_keeps_unclassifiable_entries() {
    let garbage = AnyDetail {
        type_url: ErrorInfo::TYPE_URL.to_string(),
        value: vec![0xff, 0xff],
    };
    let foreign = AnyDetail {
        type_url: "type.example.com/x.Foreign".to_string(),
        value: b"opaque".to_vec(),
    };

    let err = StatusError::from_wire_status(
        Code::Unknown,
        "mixed",
        vec![garbage.clone(), foreign.clone()],
    );

    assert!(err.details().error_info().is_none());
    assert_eq!(err.details().unknown(), &[garbage, foreign]);
}

#[test]
fn extract_reports_not_found() {
    let empty = StatusError::new(Code::Internal, "boom");
    assert_eq!(
        empty.extract::<AuditTicket>(),
        Err(DetailError::NotFound)
    );
    assert_eq!(extract::<AuditTicket>(None), Err(DetailError::NotFound));

    let other = empty.with_custom_detail(&SupportTicket {
        ticket: "s-1".to_string(),
    });
    assert_eq!(
        other.extract::<AuditTicket>(),
        Err(DetailError::NotFound)
    );
}

#[test]
fn extract_returns_first_match() {
    let err = StatusError::new(Code::Internal, "boom")
        .with_custom_detail(&SupportTicket {
            ticket: "s-1".to_string(),
        })
        .with_custom_detail(&AuditTicket {
            ticket: "first".to_string(),
        })
        .with_custom_detail(&AuditTicket {
            ticket: "second".to_string(),
        });

    let mut dest = AuditTicket::default();
    err.extract_into(&mut dest)
        .expect("audit ticket should be found");
    assert_eq!(dest.ticket, "first");

    let found = extract::<SupportTicket>(Some(&err)).expect("support ticket should be found");
    assert_eq!(found.ticket, "s-1");
}

#[test]
fn extract_into_leaves_destination_on_miss() {
    let err = StatusError::new(Code::Internal, "boom");
    let mut dest = AuditTicket {
        ticket: "keep".to_string(),
    };

    assert_eq!(err.extract_into(&mut dest), Err(DetailError::NotFound));
    assert_eq!(dest.ticket, "keep");
}

#[test]
fn extract_skips_undecodable_entry_of_matching_type() {
    let corrupt = AnyDetail {
        type_url: AuditTicket::TYPE_URL.to_string(),
        value: vec![0xff, 0x00],
    };
    let valid = AnyDetail::pack(&AuditTicket {
        ticket: "valid".to_string(),
    })
    .expect("pack should succeed");

    let err = StatusError::from_wire_status(Code::Internal, "boom", vec![corrupt.clone(), valid]);
    let found = err
        .extract::<AuditTicket>()
        .expect("valid ticket should be reachable");
    assert_eq!(found.ticket, "valid");

    let only_corrupt = StatusError::from_wire_status(Code::Internal, "boom", vec![corrupt]);
    assert_eq!(
        only_corrupt.extract::<AuditTicket>(),
        Err(DetailError::NotFound)
    );
}

#[test]
fn unencodable_payload_leaves_error_unchanged() {
    let base = StatusError::new(Code::Unavailable, "try later");
    assert_eq!(base.with_custom_detail(&Unencodable), base);

    let chained = base
        .with_error_info(error_info("FIRST"))
        .with_custom_detail(&AuditTicket {
            ticket: "kept".to_string(),
        })
        .with_custom_detail(&Unencodable)
        .with_help(Help::default());

    assert_eq!(chained.reason(), "FIRST");
    assert!(chained.details().help().is_some());
    assert_eq!(chained.details().unknown().len(), 1);
    assert_eq!(chained.status().details().len(), 3);
    assert!(
        chained
            .status()
            .details()
            .iter()
            .all(|entry| entry.type_url != Unencodable::TYPE_URL)
    );
    assert_eq!(
        chained.extract::<AuditTicket>().map(|t| t.ticket),
        Ok("kept".to_string())
    );
}

#[test]
fn render_is_deterministic() {
    let err = StatusError::new(Code::AlreadyExists, "Resource already exists")
        .with_error_info(error_info("DUPLICATE_EMAIL"))
        .with_custom_detail(&AuditTicket {
            ticket: "a".to_string(),
        });

    let options = RenderOptions {
        indent: 2,
        multiline: true,
    };
    let rendered = err.render(&options);
    assert_eq!(rendered, err.render(&options));

    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "rpc error: code = ALREADY_EXISTS desc = Resource already exists"
    );
    assert!(lines[1].starts_with("  error details: name = ErrorInfo reason = DUPLICATE_EMAIL"));
    assert!(lines[2].starts_with("  error details: name = Unknown"));

    let flat = err.render(&RenderOptions {
        indent: 0,
        multiline: false,
    });
    assert_eq!(flat.lines().count(), 1);
}

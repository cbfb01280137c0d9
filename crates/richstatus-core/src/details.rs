//! Well-known diagnostic payloads and their fixed type URLs.

use std::{collections::BTreeMap, time::Duration};

use serde::{Deserialize, Serialize};

use crate::TypedMessage;

macro_rules! catalog_prefix {
    () => {
        "type.googleapis.com/google.rpc."
    };
}

/// Prefix shared by every catalog type URL.
pub const TYPE_URL_PREFIX: &str = catalog_prefix!();

/// Machine-readable cause of an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Constant, upper snake case identifier of the cause.
    pub reason: String,
    /// Logical grouping that owns `reason`.
    pub domain: String,
    /// Additional structured context.
    pub metadata: BTreeMap<String, String>,
}

/// One invalid request field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Path to the offending field.
    pub field: String,
    /// Why the field was rejected.
    pub description: String,
}

/// Client request fields that failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadRequest {
    /// Violations in the order they were found.
    pub field_violations: Vec<FieldViolation>,
}

impl BadRequest {
    /// Convenience for the common single-violation case.
    pub fn single(field: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            field_violations: vec![FieldViolation {
                field: field.into(),
                description: description.into(),
            }],
        }
    }
}

/// One failed precondition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreconditionViolation {
    /// Service-specific precondition category.
    #[serde(rename = "type")]
    pub kind: String,
    /// Subject the precondition applies to.
    pub subject: String,
    pub description: String,
}

/// Preconditions that were not met.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreconditionFailure {
    pub violations: Vec<PreconditionViolation>,
}

/// One exhausted quota.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaViolation {
    pub subject: String,
    pub description: String,
}

/// Quota checks that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaFailure {
    pub violations: Vec<QuotaViolation>,
}

/// When a client may retry the failed request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryInfo {
    /// Minimum wait before retrying.
    pub retry_delay: Duration,
}

/// The resource being accessed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInfo {
    pub resource_type: String,
    pub resource_name: String,
    pub owner: String,
    pub description: String,
}

/// Request metadata useful when filing bug reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInfo {
    /// Opaque server-assigned request identifier.
    pub request_id: String,
    /// Data used to serve the request, for debugging.
    pub serving_data: String,
}

/// Server-side debugging information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugInfo {
    pub detail: String,
    pub stack_entries: Vec<String>,
}

/// One documentation link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpLink {
    pub description: String,
    pub url: String,
}

/// Links to documentation for resolving the error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Help {
    pub links: Vec<HelpLink>,
}

/// Error message localized for the end user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedMessage {
    /// BCP-47 locale tag, e.g. `en-US`.
    pub locale: String,
    pub message: String,
}

macro_rules! catalog_type_url {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl TypedMessage for $ty {
                const TYPE_URL: &'static str =
                    concat!(catalog_prefix!(), stringify!($ty));
            }
        )+
    };
}

catalog_type_url!(
    ErrorInfo,
    BadRequest,
    PreconditionFailure,
    QuotaFailure,
    RetryInfo,
    ResourceInfo,
    RequestInfo,
    DebugInfo,
    Help,
    LocalizedMessage,
);

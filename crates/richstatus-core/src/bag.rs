use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    AnyDetail, DetailError, RenderOptions, TypedMessage,
    details::{
        BadRequest, DebugInfo, ErrorInfo, Help, LocalizedMessage, PreconditionFailure,
        QuotaFailure, RequestInfo, ResourceInfo, RetryInfo,
    },
};

/// The closed set of well-known detail kinds, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailKind {
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
}

impl DetailKind {
    /// Every kind in rendering order.
    pub const ALL: [Self; 10] = [
        Self::ErrorInfo,
        Self::BadRequest,
        Self::PreconditionFailure,
        Self::QuotaFailure,
        Self::RetryInfo,
        Self::ResourceInfo,
        Self::RequestInfo,
        Self::DebugInfo,
        Self::Help,
        Self::LocalizedMessage,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::ErrorInfo => "ErrorInfo",
            Self::BadRequest => "BadRequest",
            Self::PreconditionFailure => "PreconditionFailure",
            Self::QuotaFailure => "QuotaFailure",
            Self::RetryInfo => "RetryInfo",
            Self::ResourceInfo => "ResourceInfo",
            Self::RequestInfo => "RequestInfo",
            Self::DebugInfo => "DebugInfo",
            Self::Help => "Help",
            Self::LocalizedMessage => "LocalizedMessage",
        }
    }

    /// Wire type URL for payloads of this kind.
    pub const fn type_url(self) -> &'static str {
        match self {
            Self::ErrorInfo => ErrorInfo::TYPE_URL,
            Self::BadRequest => BadRequest::TYPE_URL,
            Self::PreconditionFailure => PreconditionFailure::TYPE_URL,
            Self::QuotaFailure => QuotaFailure::TYPE_URL,
            Self::RetryInfo => RetryInfo::TYPE_URL,
            Self::ResourceInfo => ResourceInfo::TYPE_URL,
            Self::RequestInfo => RequestInfo::TYPE_URL,
            Self::DebugInfo => DebugInfo::TYPE_URL,
            Self::Help => Help::TYPE_URL,
            Self::LocalizedMessage => LocalizedMessage::TYPE_URL,
        }
    }
}

/// A decoded payload of one of the well-known kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnownDetail {
    ErrorInfo(ErrorInfo),
    BadRequest(BadRequest),
    PreconditionFailure(PreconditionFailure),
    QuotaFailure(QuotaFailure),
    RetryInfo(RetryInfo),
    ResourceInfo(ResourceInfo),
    RequestInfo(RequestInfo),
    DebugInfo(DebugInfo),
    Help(Help),
    LocalizedMessage(LocalizedMessage),
}

impl KnownDetail {
    pub const fn kind(&self) -> DetailKind {
        match self {
            Self::ErrorInfo(_) => DetailKind::ErrorInfo,
            Self::BadRequest(_) => DetailKind::BadRequest,
            Self::PreconditionFailure(_) => DetailKind::PreconditionFailure,
            Self::QuotaFailure(_) => DetailKind::QuotaFailure,
            Self::RetryInfo(_) => DetailKind::RetryInfo,
            Self::ResourceInfo(_) => DetailKind::ResourceInfo,
            Self::RequestInfo(_) => DetailKind::RequestInfo,
            Self::DebugInfo(_) => DetailKind::DebugInfo,
            Self::Help(_) => DetailKind::Help,
            Self::LocalizedMessage(_) => DetailKind::LocalizedMessage,
        }
    }

    /// Encodes the payload into an opaque wire entry.
    pub fn pack(&self) -> Result<AnyDetail, DetailError> {
        match self {
            Self::ErrorInfo(v) => AnyDetail::pack(v),
            Self::BadRequest(v) => AnyDetail::pack(v),
            Self::PreconditionFailure(v) => AnyDetail::pack(v),
            Self::QuotaFailure(v) => AnyDetail::pack(v),
            Self::RetryInfo(v) => AnyDetail::pack(v),
            Self::ResourceInfo(v) => AnyDetail::pack(v),
            Self::RequestInfo(v) => AnyDetail::pack(v),
            Self::DebugInfo(v) => AnyDetail::pack(v),
            Self::Help(v) => AnyDetail::pack(v),
            Self::LocalizedMessage(v) => AnyDetail::pack(v),
        }
    }

    fn summary(&self) -> String {
        match self {
            Self::ErrorInfo(v) => format!(
                "name = ErrorInfo reason = {} domain = {} metadata = {:?}",
                v.reason, v.domain, v.metadata
            ),
            Self::BadRequest(v) => {
                let (fields, descs): (Vec<&str>, Vec<&str>) = v
                    .field_violations
                    .iter()
                    .map(|x| (x.field.as_str(), x.description.as_str()))
                    .unzip();
                format!(
                    "name = BadRequest field = {} desc = {}",
                    fields.join(" "),
                    descs.join(" ")
                )
            }
            Self::PreconditionFailure(v) => {
                let kinds: Vec<&str> = v.violations.iter().map(|x| x.kind.as_str()).collect();
                let subjects: Vec<&str> =
                    v.violations.iter().map(|x| x.subject.as_str()).collect();
                let descs: Vec<&str> =
                    v.violations.iter().map(|x| x.description.as_str()).collect();
                format!(
                    "name = PreconditionFailure type = {} subj = {} desc = {}",
                    kinds.join(" "),
                    subjects.join(" "),
                    descs.join(" ")
                )
            }
            Self::QuotaFailure(v) => {
                let (subjects, descs): (Vec<&str>, Vec<&str>) = v
                    .violations
                    .iter()
                    .map(|x| (x.subject.as_str(), x.description.as_str()))
                    .unzip();
                format!(
                    "name = QuotaFailure subj = {} desc = {}",
                    subjects.join(" "),
                    descs.join(" ")
                )
            }
            Self::RetryInfo(v) => format!("name = RetryInfo retry in {:?}", v.retry_delay),
            Self::ResourceInfo(v) => format!(
                "name = ResourceInfo type = {} resourcename = {} owner = {} desc = {}",
                v.resource_type, v.resource_name, v.owner, v.description
            ),
            Self::RequestInfo(v) => format!(
                "name = RequestInfo id = {} data = {}",
                v.request_id, v.serving_data
            ),
            Self::DebugInfo(v) => format!(
                "name = DebugInfo detail = {} stack = {}",
                v.detail,
                v.stack_entries.join(" ")
            ),
            Self::Help(v) => {
                let (descs, urls): (Vec<&str>, Vec<&str>) = v
                    .links
                    .iter()
                    .map(|x| (x.description.as_str(), x.url.as_str()))
                    .unzip();
                format!(
                    "name = Help desc = {} url = {}",
                    descs.join(" "),
                    urls.join(" ")
                )
            }
            Self::LocalizedMessage(v) => format!(
                "name = LocalizedMessage locale = {} msg = {}",
                v.locale, v.message
            ),
        }
    }
}

/// Outcome of matching an opaque entry against the known catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    Known(KnownDetail),
    Unknown(AnyDetail),
}

/// Routes an opaque entry to a known kind, or leaves it unknown.
///
/// Entries whose type URL names a known kind but whose body does not decode
/// are returned unchanged as `Unknown`.
pub fn classify(detail: AnyDetail) -> Classified {
    fn decode<T: TypedMessage>(
        detail: &AnyDetail,
        wrap: fn(T) -> KnownDetail,
    ) -> Option<KnownDetail> {
        detail.unpack::<T>().ok().flatten().map(wrap)
    }

    let kind = DetailKind::ALL
        .into_iter()
        .find(|kind| kind.type_url() == detail.type_url);

    let known = kind.and_then(|kind| match kind {
        DetailKind::ErrorInfo => decode(&detail, KnownDetail::ErrorInfo),
        DetailKind::BadRequest => decode(&detail, KnownDetail::BadRequest),
        DetailKind::PreconditionFailure => decode(&detail, KnownDetail::PreconditionFailure),
        DetailKind::QuotaFailure => decode(&detail, KnownDetail::QuotaFailure),
        DetailKind::RetryInfo => decode(&detail, KnownDetail::RetryInfo),
        DetailKind::ResourceInfo => decode(&detail, KnownDetail::ResourceInfo),
        DetailKind::RequestInfo => decode(&detail, KnownDetail::RequestInfo),
        DetailKind::DebugInfo => decode(&detail, KnownDetail::DebugInfo),
        DetailKind::Help => decode(&detail, KnownDetail::Help),
        DetailKind::LocalizedMessage => decode(&detail, KnownDetail::LocalizedMessage),
    });

    match known {
        Some(known) => Classified::Known(known),
        None => Classified::Unknown(detail),
    }
}

/// At most one payload per known kind, plus an ordered list of unknown entries.
///
/// All operations return a new bag; the receiver is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailBag {
    error_info: Option<ErrorInfo>,
    bad_request: Option<BadRequest>,
    precondition_failure: Option<PreconditionFailure>,
    quota_failure: Option<QuotaFailure>,
    retry_info: Option<RetryInfo>,
    resource_info: Option<ResourceInfo>,
    request_info: Option<RequestInfo>,
    debug_info: Option<DebugInfo>,
    help: Option<Help>,
    localized_message: Option<LocalizedMessage>,
    unknown: Vec<AnyDetail>,
}

impl DetailBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with the slot for `detail`'s kind replaced.
    #[must_use]
    pub fn with_known(&self, detail: KnownDetail) -> Self {
        let mut next = self.clone();
        next.set_known(detail);
        next
    }

    /// Returns a copy with `detail` appended to the unknown entries.
    #[must_use]
    pub fn append_unknown(&self, detail: AnyDetail) -> Self {
        let mut next = self.clone();
        next.unknown.push(detail);
        next
    }

    /// Builds a bag from a flat wire list. Duplicate known kinds: last wins.
    pub fn from_wire(details: impl IntoIterator<Item = AnyDetail>) -> Self {
        let mut bag = Self::default();
        for detail in details {
            match classify(detail) {
                Classified::Known(known) => bag.set_known(known),
                Classified::Unknown(unknown) => bag.unknown.push(unknown),
            }
        }
        bag
    }

    fn set_known(&mut self, detail: KnownDetail) {
        match detail {
            KnownDetail::ErrorInfo(v) => self.error_info = Some(v),
            KnownDetail::BadRequest(v) => self.bad_request = Some(v),
            KnownDetail::PreconditionFailure(v) => self.precondition_failure = Some(v),
            KnownDetail::QuotaFailure(v) => self.quota_failure = Some(v),
            KnownDetail::RetryInfo(v) => self.retry_info = Some(v),
            KnownDetail::ResourceInfo(v) => self.resource_info = Some(v),
            KnownDetail::RequestInfo(v) => self.request_info = Some(v),
            KnownDetail::DebugInfo(v) => self.debug_info = Some(v),
            KnownDetail::Help(v) => self.help = Some(v),
            KnownDetail::LocalizedMessage(v) => self.localized_message = Some(v),
        }
    }

    /// The payload stored for `kind`, if any.
    pub fn get(&self, kind: DetailKind) -> Option<KnownDetail> {
        match kind {
            DetailKind::ErrorInfo => self.error_info.clone().map(KnownDetail::ErrorInfo),
            DetailKind::BadRequest => self.bad_request.clone().map(KnownDetail::BadRequest),
            DetailKind::PreconditionFailure => self
                .precondition_failure
                .clone()
                .map(KnownDetail::PreconditionFailure),
            DetailKind::QuotaFailure => self.quota_failure.clone().map(KnownDetail::QuotaFailure),
            DetailKind::RetryInfo => self.retry_info.clone().map(KnownDetail::RetryInfo),
            DetailKind::ResourceInfo => self.resource_info.clone().map(KnownDetail::ResourceInfo),
            DetailKind::RequestInfo => self.request_info.clone().map(KnownDetail::RequestInfo),
            DetailKind::DebugInfo => self.debug_info.clone().map(KnownDetail::DebugInfo),
            DetailKind::Help => self.help.clone().map(KnownDetail::Help),
            DetailKind::LocalizedMessage => self
                .localized_message
                .clone()
                .map(KnownDetail::LocalizedMessage),
        }
    }

    /// Populated known slots in rendering order.
    pub fn known(&self) -> Vec<KnownDetail> {
        DetailKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind))
            .collect()
    }

    pub fn error_info(&self) -> Option<&ErrorInfo> {
        self.error_info.as_ref()
    }

    pub fn bad_request(&self) -> Option<&BadRequest> {
        self.bad_request.as_ref()
    }

    pub fn precondition_failure(&self) -> Option<&PreconditionFailure> {
        self.precondition_failure.as_ref()
    }

    pub fn quota_failure(&self) -> Option<&QuotaFailure> {
        self.quota_failure.as_ref()
    }

    pub fn retry_info(&self) -> Option<&RetryInfo> {
        self.retry_info.as_ref()
    }

    pub fn resource_info(&self) -> Option<&ResourceInfo> {
        self.resource_info.as_ref()
    }

    pub fn request_info(&self) -> Option<&RequestInfo> {
        self.request_info.as_ref()
    }

    pub fn debug_info(&self) -> Option<&DebugInfo> {
        self.debug_info.as_ref()
    }

    pub fn help(&self) -> Option<&Help> {
        self.help.as_ref()
    }

    pub fn localized_message(&self) -> Option<&LocalizedMessage> {
        self.localized_message.as_ref()
    }

    /// Entries not recognized as a known kind, in insertion order.
    pub fn unknown(&self) -> &[AnyDetail] {
        &self.unknown
    }

    pub fn is_empty(&self) -> bool {
        self.error_info.is_none()
            && self.bad_request.is_none()
            && self.precondition_failure.is_none()
            && self.quota_failure.is_none()
            && self.retry_info.is_none()
            && self.resource_info.is_none()
            && self.request_info.is_none()
            && self.debug_info.is_none()
            && self.help.is_none()
            && self.localized_message.is_none()
            && self.unknown.is_empty()
    }

    /// Renders one line per populated slot, known kinds first, unknown last.
    pub fn render(&self, options: &RenderOptions) -> String {
        let mut lines: Vec<String> = self
            .known()
            .iter()
            .map(|detail| format!("error details: {}", detail.summary()))
            .collect();

        if !self.unknown.is_empty() {
            let entries: Vec<String> = self.unknown.iter().map(ToString::to_string).collect();
            lines.push(format!(
                "error details: name = Unknown desc = {}",
                entries.join(" ")
            ));
        }

        options.join(&lines)
    }
}

impl fmt::Display for DetailBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&RenderOptions::default()))
    }
}

use std::{collections::BTreeMap, fmt};

use crate::{
    AnyDetail, Code, DetailBag, DetailError, KnownDetail, RenderOptions, Status, TypedMessage,
    WireStatus,
    details::{
        BadRequest, DebugInfo, ErrorInfo, Help, LocalizedMessage, PreconditionFailure,
        QuotaFailure, RequestInfo, ResourceInfo, RetryInfo,
    },
};

static EMPTY_METADATA: BTreeMap<String, String> = BTreeMap::new();

/// An immutable status paired with its classified detail payloads.
///
/// Every `with_*` method returns a new value and leaves the receiver as it
/// was. If a detail cannot be attached, the method returns an unchanged copy
/// of the receiver so earlier attachments are never lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusError {
    status: Status,
    details: DetailBag,
}

impl StatusError {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            status: Status::new(code, message),
            details: DetailBag::new(),
        }
    }

    /// Rebuilds an error from wire parts, classifying each entry once, in order.
    ///
    /// Never fails: entries that cannot be classified land in the unknown list.
    pub fn from_wire_status(
        code: Code,
        message: impl Into<String>,
        details: Vec<AnyDetail>,
    ) -> Self {
        Self {
            details: DetailBag::from_wire(details.iter().cloned()),
            status: Status::from_parts(code, message.into(), details),
        }
    }

    pub fn from_wire(wire: WireStatus) -> Self {
        Self::from_wire_status(Code::from_i32(wire.code), wire.message, wire.details)
    }

    /// Decodes CBOR wire bytes into a classified error.
    pub fn parse(bytes: &[u8]) -> Result<Self, DetailError> {
        WireStatus::decode(bytes).map(Self::from_wire)
    }

    pub fn to_wire(&self) -> WireStatus {
        self.status.to_wire()
    }

    pub fn encode(&self) -> Result<Vec<u8>, DetailError> {
        self.to_wire().encode()
    }

    pub const fn status(&self) -> &Status {
        &self.status
    }

    pub const fn code(&self) -> Code {
        self.status.code()
    }

    pub fn message(&self) -> &str {
        self.status.message()
    }

    pub const fn details(&self) -> &DetailBag {
        &self.details
    }

    /// `ErrorInfo.reason`, or empty when no ErrorInfo is attached.
    pub fn reason(&self) -> &str {
        self.details
            .error_info()
            .map_or("", |info| info.reason.as_str())
    }

    /// `ErrorInfo.domain`, or empty when no ErrorInfo is attached.
    pub fn domain(&self) -> &str {
        self.details
            .error_info()
            .map_or("", |info| info.domain.as_str())
    }

    /// `ErrorInfo.metadata`, or an empty map when no ErrorInfo is attached.
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        self.details
            .error_info()
            .map_or(&EMPTY_METADATA, |info| &info.metadata)
    }

    #[must_use]
    pub fn with_error_info(&self, info: ErrorInfo) -> Self {
        self.with_known(KnownDetail::ErrorInfo(info))
    }

    #[must_use]
    pub fn with_bad_request(&self, bad_request: BadRequest) -> Self {
        self.with_known(KnownDetail::BadRequest(bad_request))
    }

    #[must_use]
    pub fn with_precondition_failure(&self, failure: PreconditionFailure) -> Self {
        self.with_known(KnownDetail::PreconditionFailure(failure))
    }

    #[must_use]
    pub fn with_quota_failure(&self, failure: QuotaFailure) -> Self {
        self.with_known(KnownDetail::QuotaFailure(failure))
    }

    #[must_use]
    pub fn with_retry_info(&self, retry: RetryInfo) -> Self {
        self.with_known(KnownDetail::RetryInfo(retry))
    }

    #[must_use]
    pub fn with_resource_info(&self, resource: ResourceInfo) -> Self {
        self.with_known(KnownDetail::ResourceInfo(resource))
    }

    #[must_use]
    pub fn with_request_info(&self, request: RequestInfo) -> Self {
        self.with_known(KnownDetail::RequestInfo(request))
    }

    #[must_use]
    pub fn with_debug_info(&self, debug: DebugInfo) -> Self {
        self.with_known(KnownDetail::DebugInfo(debug))
    }

    #[must_use]
    pub fn with_help(&self, help: Help) -> Self {
        self.with_known(KnownDetail::Help(help))
    }

    #[must_use]
    pub fn with_localized_message(&self, message: LocalizedMessage) -> Self {
        self.with_known(KnownDetail::LocalizedMessage(message))
    }

    /// Sets the known slot for `detail` and records it on the wire status.
    #[must_use]
    pub fn with_known(&self, detail: KnownDetail) -> Self {
        let attached = detail
            .pack()
            .and_then(|entry| self.status.with_details(&[entry]));

        match attached {
            Ok(status) => Self {
                status,
                details: self.details.with_known(detail),
            },
            Err(err) => self.keep_on_failure(&err, detail.kind().name()),
        }
    }

    /// Appends a payload outside the known catalog to the unknown entries.
    #[must_use]
    pub fn with_custom_detail<T: TypedMessage>(&self, payload: &T) -> Self {
        match AnyDetail::pack(payload) {
            Ok(entry) => self.with_custom_details(vec![entry]),
            Err(err) => self.keep_on_failure(&err, T::TYPE_URL),
        }
    }

    /// Appends already-encoded entries to the unknown entries, in order.
    #[must_use]
    pub fn with_custom_details(&self, entries: Vec<AnyDetail>) -> Self {
        match self.status.with_details(&entries) {
            Ok(status) => Self {
                status,
                details: entries
                    .into_iter()
                    .fold(self.details.clone(), |bag, entry| bag.append_unknown(entry)),
            },
            Err(err) => self.keep_on_failure(&err, "custom"),
        }
    }

    fn keep_on_failure(&self, err: &DetailError, detail: &str) -> Self {
        tracing::warn!(
            error = %err,
            code = %self.code(),
            message = self.message(),
            detail,
            "could not add details to error"
        );
        self.clone()
    }

    /// Decodes the first unknown entry whose type URL is `T::TYPE_URL`.
    ///
    /// Entries that carry the right type URL but an undecodable body are
    /// skipped; `NotFound` means no entry of type `T` could be decoded.
    pub fn extract<T: TypedMessage>(&self) -> Result<T, DetailError> {
        for entry in self.details.unknown() {
            match entry.unpack::<T>() {
                Ok(Some(message)) => return Ok(message),
                Ok(None) => {}
                Err(err) => tracing::debug!(error = %err, "skipping undecodable detail"),
            }
        }

        Err(DetailError::NotFound)
    }

    /// Copies the first unknown entry of type `T` into `dest`.
    ///
    /// `dest` is left untouched when nothing matches.
    pub fn extract_into<T: TypedMessage>(&self, dest: &mut T) -> Result<(), DetailError> {
        *dest = self.extract()?;
        Ok(())
    }

    /// Multi-line summary: the status line, then one line per detail.
    pub fn render(&self, options: &RenderOptions) -> String {
        let head = format!(
            "rpc error: code = {} desc = {}",
            self.code(),
            self.message()
        );

        if self.details.is_empty() {
            return head;
        }

        let body = self.details.render(options);
        if options.multiline {
            format!("{head}\n{body}")
        } else {
            format!("{head}; {body}")
        }
    }
}

/// Like [`StatusError::extract`], treating an absent error as having no details.
pub fn extract<T: TypedMessage>(err: Option<&StatusError>) -> Result<T, DetailError> {
    err.ok_or(DetailError::NotFound)?.extract()
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for StatusError {}

impl From<Status> for StatusError {
    fn from(status: Status) -> Self {
        Self {
            details: DetailBag::from_wire(status.details().iter().cloned()),
            status,
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::{AnyDetail, Code, DetailError};

/// A coarse outcome plus the opaque detail entries attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: Code,
    message: String,
    details: Vec<AnyDetail>,
}

impl Status {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Reassembles a status received from a peer, details included as-is.
    pub(crate) const fn from_parts(code: Code, message: String, details: Vec<AnyDetail>) -> Self {
        Self {
            code,
            message,
            details,
        }
    }

    pub const fn code(&self) -> Code {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Attached entries in attachment order.
    pub fn details(&self) -> &[AnyDetail] {
        &self.details
    }

    /// Returns a copy carrying `details` after the existing entries.
    ///
    /// Fails for an OK status, which cannot carry details.
    pub fn with_details(&self, details: &[AnyDetail]) -> Result<Self, DetailError> {
        if self.code == Code::Ok {
            return Err(DetailError::OkStatus);
        }

        let mut next = self.clone();
        next.details.extend_from_slice(details);
        Ok(next)
    }

    pub fn to_wire(&self) -> WireStatus {
        WireStatus {
            code: self.code.as_i32(),
            message: self.message.clone(),
            details: self.details.clone(),
        }
    }
}

/// Attaches `details`, or logs and returns the original status if it refuses them.
pub fn status_with_details(status: &Status, details: &[AnyDetail]) -> Status {
    match status.with_details(details) {
        Ok(next) => next,
        Err(err) => {
            tracing::warn!(
                error = %err,
                code = %status.code(),
                message = status.message(),
                details = ?details,
                "could not add details to error"
            );
            status.clone()
        }
    }
}

/// Wire shape of a status: numeric code, message, opaque typed entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireStatus {
    pub code: i32,
    pub message: String,
    #[serde(default)]
    pub details: Vec<AnyDetail>,
}

impl WireStatus {
    pub fn into_status(self) -> Status {
        Status::from_parts(Code::from_i32(self.code), self.message, self.details)
    }

    /// Serializes the wire status to CBOR bytes.
    pub fn encode(&self) -> Result<Vec<u8>, DetailError> {
        serde_cbor::to_vec(self).map_err(|err| DetailError::Encode {
            type_url: "status".to_string(),
            message: err.to_string(),
        })
    }

    /// Deserializes a wire status from CBOR bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, DetailError> {
        serde_cbor::from_slice(bytes).map_err(|err| DetailError::Decode {
            type_url: "status".to_string(),
            message: err.to_string(),
        })
    }
}

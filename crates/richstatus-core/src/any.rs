use std::fmt;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::DetailError;

/// A payload that can travel in a status detail slot.
///
/// `TYPE_URL` is the payload's identity on the wire. Two types with identical
/// fields but different URLs are never conflated.
pub trait TypedMessage: Serialize + DeserializeOwned {
    const TYPE_URL: &'static str;
}

/// An opaque typed payload: a type URL plus the CBOR-encoded message body.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnyDetail {
    /// Identity of the encoded message.
    pub type_url: String,
    /// Encoded message body.
    pub value: Vec<u8>,
}

impl AnyDetail {
    /// Serializes `message` and tags it with its type URL.
    pub fn pack<T: TypedMessage>(message: &T) -> Result<Self, DetailError> {
        let value = serde_cbor::to_vec(message).map_err(|err| DetailError::Encode {
            type_url: T::TYPE_URL.to_string(),
            message: err.to_string(),
        })?;

        Ok(Self {
            type_url: T::TYPE_URL.to_string(),
            value,
        })
    }

    /// Returns true when the payload was packed from `T`.
    pub fn is<T: TypedMessage>(&self) -> bool {
        self.type_url == T::TYPE_URL
    }

    /// Decodes the payload as `T`. Returns `Ok(None)` when the type URL differs.
    pub fn unpack<T: TypedMessage>(&self) -> Result<Option<T>, DetailError> {
        if !self.is::<T>() {
            return Ok(None);
        }

        serde_cbor::from_slice(&self.value)
            .map(Some)
            .map_err(|err| DetailError::Decode {
                type_url: self.type_url.clone(),
                message: err.to_string(),
            })
    }
}

impl fmt::Debug for AnyDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyDetail")
            .field("type_url", &self.type_url)
            .field("len", &self.value.len())
            .finish()
    }
}

impl fmt::Display for AnyDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} bytes", self.type_url, self.value.len())
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Ticket {
        id: String,
    }

    impl TypedMessage for Ticket {
        const TYPE_URL: &'static str = "type.example.com/test.Ticket";
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Receipt {
        id: String,
    }

    impl TypedMessage for Receipt {
        const TYPE_URL: &'static str = "type.example.com/test.Receipt";
    }

    #[test]
    fn unpack_ignores_same_shape_other_type() {
        let packed = AnyDetail::pack(&Ticket {
            id: "t-1".to_string(),
        })
        .expect("pack should succeed");

        assert!(packed.is::<Ticket>());
        assert!(!packed.is::<Receipt>());
        assert_eq!(
            packed.unpack::<Receipt>().expect("mismatch is not an error"),
            None
        );
        assert_eq!(
            packed.unpack::<Ticket>().expect("unpack should succeed"),
            Some(Ticket {
                id: "t-1".to_string()
            })
        );
    }

    #[test]
    fn unpack_reports_corrupt_body() {
        let corrupt = AnyDetail {
            type_url: Ticket::TYPE_URL.to_string(),
            value: vec![0xff, 0x00],
        };

        let err = corrupt
            .unpack::<Ticket>()
            .expect_err("corrupt body must fail");
        assert!(matches!(err, DetailError::Decode { .. }));
    }
}

//! JSON codec for typed messages
//!
//! Converts between JSON request/response bodies and the typed messages
//! exchanged with upstream services. Stateless; every message type that
//! derives serde works.
//!
//! ```ignore
//! use gateway_lib::codec::JsonCodec;
//! use proto::GreetRequest;
//!
//! let request: GreetRequest = JsonCodec::decode(br#"{"name":"World"}"#)?;
//! let body = JsonCodec::encode(&request)?;
//! ```

use bytes::Bytes;
use error::{GatewayError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// JSON codec marker type.
pub struct JsonCodec;

impl JsonCodec {
    /// Decode `bytes` into a caller-supplied, freshly zero-valued message.
    ///
    /// On failure `place` keeps whatever value it held before the call.
    pub fn decode_into<M>(bytes: &[u8], place: &mut M) -> Result<()>
    where
        M: DeserializeOwned,
    {
        *place = serde_json::from_slice(bytes).map_err(GatewayError::Decode)?;
        Ok(())
    }

    /// Decode into a destination produced by `factory`.
    pub fn decode_with<M, F>(bytes: &[u8], factory: F) -> Result<M>
    where
        M: DeserializeOwned,
        F: FnOnce() -> M,
    {
        let mut message = factory();
        Self::decode_into(bytes, &mut message)?;
        Ok(message)
    }

    /// Decode into the message type's default value.
    pub fn decode<M>(bytes: &[u8]) -> Result<M>
    where
        M: DeserializeOwned + Default,
    {
        Self::decode_with(bytes, M::default)
    }

    /// Encode a message as JSON.
    pub fn encode<M>(message: &M) -> Result<Bytes>
    where
        M: Serialize,
    {
        serde_json::to_vec(message)
            .map(Bytes::from)
            .map_err(GatewayError::Encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto::{GreetRequest, GreetResponse};

    #[test]
    fn test_decode_valid() {
        let request: GreetRequest = JsonCodec::decode(br#"{"name":"World"}"#).unwrap();
        assert_eq!(request.name, "World");
    }

    #[test]
    fn test_decode_malformed() {
        let result = JsonCodec::decode::<GreetRequest>(b"not-json");
        assert!(matches!(result, Err(GatewayError::Decode(_))));
    }

    #[test]
    fn test_decode_shape_mismatch() {
        let result = JsonCodec::decode::<GreetRequest>(br#"{"name":42}"#);
        assert!(matches!(result, Err(GatewayError::Decode(_))));

        let result = JsonCodec::decode::<GreetRequest>(br#"{"nickname":"x"}"#);
        assert!(matches!(result, Err(GatewayError::Decode(_))));
    }

    #[test]
    fn test_decode_empty_object_is_default() {
        let request: GreetRequest = JsonCodec::decode(b"{}").unwrap();
        assert_eq!(request, GreetRequest::default());
    }

    #[test]
    fn test_decode_into_keeps_destination_on_error() {
        let mut request = GreetRequest {
            name: "before".to_string(),
        };
        assert!(JsonCodec::decode_into(b"[", &mut request).is_err());
        assert_eq!(request.name, "before");

        JsonCodec::decode_into(br#"{"name":"after"}"#, &mut request).unwrap();
        assert_eq!(request.name, "after");
    }

    #[test]
    fn test_decode_with_factory() {
        let request = JsonCodec::decode_with(br#"{"name":"Ada"}"#, GreetRequest::default).unwrap();
        assert_eq!(request.name, "Ada");
    }

    #[test]
    fn test_round_trip() {
        let response = GreetResponse {
            message: "Hello World".to_string(),
        };
        let encoded = JsonCodec::encode(&response).unwrap();
        assert_eq!(&encoded[..], br#"{"message":"Hello World"}"#);

        let decoded: GreetResponse = JsonCodec::decode(&encoded).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn test_encode_failure() {
        struct Unencodable;

        impl Serialize for Unencodable {
            fn serialize<S>(&self, _: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                Err(serde::ser::Error::custom("cannot encode"))
            }
        }

        let result = JsonCodec::encode(&Unencodable);
        assert!(matches!(result, Err(GatewayError::Encode(_))));
    }
}

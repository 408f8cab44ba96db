use bytes::Bytes;
use thiserror::Error;

use super::proto::Envelope;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("envelope codec: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn encode_envelope(env: &Envelope) -> Result<Bytes, CodecError> {
    let buf = serde_json::to_vec(env)?;
    Ok(Bytes::from(buf))
}

pub fn decode_envelope(b: Bytes) -> Result<Envelope, CodecError> {
    serde_json::from_slice(&b).map_err(CodecError::Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::proto::{EnvelopeKind, Request};

    #[test]
    fn encode_decode_round_trip() {
        let original = Envelope {
            correlation_id: "test-123".to_string(),
            kind: EnvelopeKind::Request(Request::Health),
        };

        let encoded = encode_envelope(&original).expect("encoding should succeed");
        let decoded = decode_envelope(encoded).expect("decoding should succeed");

        assert_eq!(decoded.correlation_id, original.correlation_id);
        assert!(matches!(
            decoded.kind,
            EnvelopeKind::Request(Request::Health)
        ));
    }

    #[test]
    fn garbage_frames_are_rejected() {
        assert!(decode_envelope(Bytes::from_static(b"not json")).is_err());
    }
}

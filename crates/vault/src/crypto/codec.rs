//! Base64url text encoding of raw byte strings.
//!
//! The stored form never carries `=` padding. Decoding accepts both padded and
//! unpadded input; padding is implied by the length of the text.

use base64::{
    alphabet,
    engine::{general_purpose::GeneralPurpose, DecodePaddingMode, GeneralPurposeConfig},
    Engine as _,
};

use crate::error::{VaultError, VaultResult};

const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode `bytes` as unpadded base64url text.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    ENGINE.encode(bytes)
}

/// Decode base64url text back to raw bytes.
///
/// # Errors
///
/// Returns [`VaultError::Encoding`] if `text` contains characters outside the
/// URL-safe alphabet or has a length no byte string can encode to.
pub fn decode(text: &str) -> VaultResult<Vec<u8>> {
    ENGINE
        .decode(text)
        .map_err(|e| VaultError::encoding(format!("invalid base64url text: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn encode_has_no_padding() {
        // 1 and 2 byte inputs would carry `==` / `=` in padded form.
        assert_eq!(encode([0xfbu8]), "-w");
        assert_eq!(encode([0xfbu8, 0xff]), "-_8");
        assert!(!encode(b"hello").contains('='));
    }

    #[test]
    fn uses_url_safe_alphabet() {
        let s = encode([0xfbu8, 0xff, 0xbf]);
        assert_eq!(s, "-_-_");
    }

    #[test]
    fn decode_accepts_unpadded_and_padded() {
        assert_eq!(decode("aGVsbG8").unwrap(), b"hello");
        assert_eq!(decode("aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn round_trip_all_lengths() {
        let data: Vec<u8> = (0u8..=64).collect();
        for len in 0..data.len() {
            let chunk = &data[..len];
            assert_eq!(decode(&encode(chunk)).unwrap(), chunk);
        }
    }

    #[test]
    fn decode_rejects_foreign_characters() {
        let err = decode("ab+/").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
        assert!(decode("!!!!").is_err());
    }

    #[test]
    fn decode_rejects_impossible_length() {
        // A single trailing symbol cannot encode any whole byte.
        assert!(decode("aGVsbG8xa").is_err());
    }
}

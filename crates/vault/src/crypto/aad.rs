//! Canonical associated data binding a ciphertext to its tenant, provider and
//! token class.
//!
//! The AAD is a compact JSON object with lexicographically sorted keys:
//!
//! ```text
//! {"provider":"google","token_type":"refresh","workspace_id":"ws-A"}
//! ```
//!
//! Key names and ordering are part of the authenticated bytes. Changing either
//! makes every stored record fail authentication.
//!
//! String values are written ASCII-only: every character outside `0x20..=0x7e`
//! becomes a lowercase `\uXXXX` escape, using a UTF-16 surrogate pair above
//! U+FFFF. Rows written by the existing tooling carry that form.

use std::collections::BTreeMap;
use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;

use crate::error::{VaultError, VaultResult};

const PROVIDER_KEY: &str = "provider";
const TOKEN_CLASS_KEY: &str = "token_type";
const TENANT_KEY: &str = "workspace_id";

/// Serialise the binding triple into canonical AAD bytes.
///
/// # Errors
///
/// Returns [`VaultError::Encoding`] if serialisation fails, which does not
/// happen for string values.
pub fn build(tenant_id: &str, provider: &str, token_class: &str) -> VaultResult<Vec<u8>> {
    // BTreeMap iterates in key order, and serde_json's compact writer emits no
    // whitespace, which together give the canonical form.
    let fields: BTreeMap<&str, &str> = BTreeMap::from([
        (TENANT_KEY, tenant_id),
        (PROVIDER_KEY, provider),
        (TOKEN_CLASS_KEY, token_class),
    ]);
    let mut out = Vec::with_capacity(96);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, AsciiFormatter);
    fields
        .serialize(&mut ser)
        .map_err(|e| VaultError::encoding(format!("aad serialisation failed: {e}")))?;
    Ok(out)
}

/// Compact formatter that escapes everything but printable ASCII.
///
/// serde_json already escapes `"`, `\\` and control characters below 0x20
/// before a fragment reaches this formatter.
struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let bytes = fragment.as_bytes();
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if (' '..='~').contains(&ch) {
                continue;
            }
            writer.write_all(&bytes[start..i])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(&bytes[start..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_bytes() {
        let aad = build("ws-A", "google", "refresh").unwrap();
        assert_eq!(
            aad,
            br#"{"provider":"google","token_type":"refresh","workspace_id":"ws-A"}"#
        );
    }

    #[test]
    fn stable_across_calls() {
        assert_eq!(
            build("t", "meta", "access_long_lived").unwrap(),
            build("t", "meta", "access_long_lived").unwrap()
        );
    }

    #[test]
    fn each_field_changes_output() {
        let base = build("ws-A", "google", "refresh").unwrap();
        assert_ne!(base, build("ws-B", "google", "refresh").unwrap());
        assert_ne!(base, build("ws-A", "meta", "refresh").unwrap());
        assert_ne!(base, build("ws-A", "google", "access").unwrap());
    }

    #[test]
    fn non_ascii_is_escaped() {
        let aad = build("ws-\u{e9}", "google", "refresh").unwrap();
        assert_eq!(
            aad,
            br#"{"provider":"google","token_type":"refresh","workspace_id":"ws-\u00e9"}"#
        );
    }

    #[test]
    fn astral_characters_use_surrogate_pairs() {
        let aad = build("ws-\u{1f600}", "google", "refresh").unwrap();
        assert_eq!(
            aad,
            br#"{"provider":"google","token_type":"refresh","workspace_id":"ws-\ud83d\ude00"}"#
        );
    }

    #[test]
    fn control_characters_and_delete_are_escaped() {
        let aad = build("a\u{1}\nb\u{7f}", "google", "refresh").unwrap();
        assert_eq!(
            aad,
            br#"{"provider":"google","token_type":"refresh","workspace_id":"a\u0001\nb\u007f"}"#
        );
    }

    #[test]
    fn output_is_ascii_and_parses_back() {
        let tenant = "t\u{e9}\u{4e2d}\u{1f600}\"\\";
        let aad = build(tenant, "google", "refresh").unwrap();
        assert!(aad.is_ascii());
        let parsed: BTreeMap<String, String> = serde_json::from_slice(&aad).unwrap();
        assert_eq!(parsed["workspace_id"], tenant);
    }

    #[test]
    fn values_are_escaped_not_spliced() {
        // A quote in one field must not be able to impersonate another field.
        let tricky = build(r#"a","provider":"x"#, "google", "refresh").unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_slice(&tricky).unwrap();
        assert_eq!(parsed["workspace_id"], r#"a","provider":"x"#);
        assert_eq!(parsed["provider"], "google");
    }
}

//! HKDF-SHA256 subkey derivation.
//!
//! One subkey exists per `(provider, token_class, key_version)` triple. The
//! tenant is not an input here; tenant isolation is enforced by the AAD that
//! [`super::aad`] builds.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{VaultError, VaultResult};
use crate::record::BindingContext;
use crate::secret::MasterSecret;

/// Byte length of a derived AES-256 subkey.
pub const SUBKEY_LEN: usize = 32;

/// A derived AES-256 key. Zeroed on drop, never printed.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Subkey([u8; SUBKEY_LEN]);

impl Subkey {
    pub(crate) fn as_bytes(&self) -> &[u8; SUBKEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for Subkey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Subkey([REDACTED])")
    }
}

/// Build the HKDF `info` parameter for a context.
///
/// Every field carries a tag and fields are joined with `|`, which
/// [`BindingContext`] forbids inside `provider` and `token_class`, so distinct
/// triples never produce the same string.
pub fn derivation_info(ctx: &BindingContext) -> String {
    format!(
        "provider={}|type={}|kv={}",
        ctx.provider(),
        ctx.token_class(),
        ctx.key_version()
    )
}

/// Derive the subkey for `ctx` from `secret`.
///
/// No salt is used: the master secret is already uniformly random. The result
/// depends only on the inputs, so it is stable across calls and processes.
///
/// # Errors
///
/// Returns [`VaultError::InputValidation`] if the context fails validation.
pub fn derive(secret: &MasterSecret, ctx: &BindingContext) -> VaultResult<Subkey> {
    ctx.validate()?;
    let info = derivation_info(ctx);
    let hk = Hkdf::<Sha256>::new(None, secret.expose());
    let mut okm = [0u8; SUBKEY_LEN];
    // Expand only fails when the requested length exceeds 255 * HashLen.
    hk.expand(info.as_bytes(), &mut okm)
        .map_err(|_| VaultError::invalid("subkey length rejected by HKDF"))?;
    let key = Subkey(okm);
    okm.zeroize();
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> MasterSecret {
        MasterSecret::from_bytes(&[0x11u8; 32]).unwrap()
    }

    fn ctx(provider: &str, class: &str, kv: u32) -> BindingContext {
        BindingContext::new("ws-A", provider, class, kv).unwrap()
    }

    #[test]
    fn info_format() {
        let info = derivation_info(&ctx("google", "refresh", 1));
        assert_eq!(info, "provider=google|type=refresh|kv=1");
    }

    #[test]
    fn derivation_is_deterministic() {
        let c = ctx("google", "refresh", 1);
        let a = derive(&secret(), &c).unwrap();
        let b = derive(&secret(), &c).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn tenant_does_not_affect_subkey() {
        let a = BindingContext::new("ws-A", "google", "refresh", 1).unwrap();
        let b = BindingContext::new("ws-B", "google", "refresh", 1).unwrap();
        let ka = derive(&secret(), &a).unwrap();
        let kb = derive(&secret(), &b).unwrap();
        assert_eq!(ka.as_bytes(), kb.as_bytes());
    }

    #[test]
    fn each_field_separates_keys() {
        let base = derive(&secret(), &ctx("google", "refresh", 1)).unwrap();
        let other_provider = derive(&secret(), &ctx("meta", "refresh", 1)).unwrap();
        let other_class = derive(&secret(), &ctx("google", "access", 1)).unwrap();
        let other_version = derive(&secret(), &ctx("google", "refresh", 2)).unwrap();
        assert_ne!(base.as_bytes(), other_provider.as_bytes());
        assert_ne!(base.as_bytes(), other_class.as_bytes());
        assert_ne!(base.as_bytes(), other_version.as_bytes());
    }

    #[test]
    fn different_master_secret_changes_subkey() {
        let c = ctx("google", "refresh", 1);
        let other = MasterSecret::from_bytes(&[0x22u8; 32]).unwrap();
        let a = derive(&secret(), &c).unwrap();
        let b = derive(&other, &c).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn output_is_plain_hkdf_sha256_over_info() {
        // IKM = 32 x 0x0b, no salt. Breaks if the info format or KDF drifts.
        let secret = MasterSecret::from_bytes(&[0x0bu8; 32]).unwrap();
        let c = ctx("google", "refresh", 1);
        let first = derive(&secret, &c).unwrap();

        let hk = Hkdf::<Sha256>::new(None, &[0x0bu8; 32]);
        let mut expected = [0u8; SUBKEY_LEN];
        hk.expand(b"provider=google|type=refresh|kv=1", &mut expected)
            .unwrap();
        assert_eq!(first.as_bytes(), &expected);
    }

    #[test]
    fn debug_is_redacted() {
        let k = derive(&secret(), &ctx("google", "refresh", 1)).unwrap();
        assert_eq!(format!("{k:?}"), "Subkey([REDACTED])");
    }
}

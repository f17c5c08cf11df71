//! Password verification using Argon2id.
//!
//! Argon2 verification is constant-time with respect to the secret, which
//! keeps wrong-password and unknown-identifier failures statistically
//! indistinguishable when combined with the dummy verification in the
//! login flow.

use std::sync::OnceLock;

use argon2::{Argon2, PasswordVerifier};

use crate::error::AuthError;

/// Verify a plaintext secret against an Argon2id PHC-format hash.
///
/// If `pepper` is provided it is prepended to the secret before
/// verification — this must match the pepper used during hashing.
///
/// Returns `Ok(true)` on match, `Ok(false)` on mismatch, or
/// `Err(AuthError::Crypto)` if the stored hash is malformed.
pub fn verify_secret(secret: &str, hash: &str, pepper: Option<&str>) -> Result<bool, AuthError> {
    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{secret}");
            peppered.as_bytes()
        }
        None => secret.as_bytes(),
    };

    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|e| AuthError::Crypto(format!("invalid hash format: {e}")))?;

    let argon2 = Argon2::default();
    match argon2.verify_password(input, &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Crypto(format!("verify error: {e}"))),
    }
}

/// Hash a secret with Argon2id using OWASP-recommended parameters
/// (memory: 19 MiB, iterations: 2, parallelism: 1). Salt is randomly
/// generated per hash.
pub fn hash_secret(secret: &str, pepper: Option<&str>) -> Result<String, AuthError> {
    use argon2::PasswordHasher;
    use argon2::password_hash::SaltString;

    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| AuthError::Crypto(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{secret}");
            peppered.as_bytes()
        }
        None => secret.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| AuthError::Crypto(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// A hash of an unguessable value, verified against when a login
/// identifier does not exist so the miss path costs the same as a real
/// verification. Computed once per process.
pub fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| {
        let mut rng = rand::rng();
        let filler: [u8; 32] = rand::Rng::random(&mut rng);
        hash_secret(&hex::encode(filler), None)
            .unwrap_or_else(|_| unreachable!("hashing a fixed-size hex string cannot fail"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_secret_matches() {
        let hash = hash_secret("hunter2", None).unwrap();
        assert!(verify_secret("hunter2", &hash, None).unwrap());
    }

    #[test]
    fn wrong_secret_does_not_match() {
        let hash = hash_secret("hunter2", None).unwrap();
        assert!(!verify_secret("wrong", &hash, None).unwrap());
    }

    #[test]
    fn pepper_is_applied() {
        let hash = hash_secret("hunter2", Some("pepper!")).unwrap();
        assert!(verify_secret("hunter2", &hash, Some("pepper!")).unwrap());
        // Without pepper should fail.
        assert!(!verify_secret("hunter2", &hash, None).unwrap());
    }

    #[test]
    fn malformed_hash_returns_error() {
        assert!(verify_secret("pw", "not-a-hash", None).is_err());
    }

    #[test]
    fn dummy_hash_verifies_to_false_without_error() {
        // The unknown-identifier path must not be distinguishable by an
        // early parse failure.
        assert!(!verify_secret("anything", dummy_hash(), None).unwrap());
    }
}

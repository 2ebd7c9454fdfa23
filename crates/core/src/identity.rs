//! Submitter identity: company name plus 4-digit PIN.
//!
//! The PIN is never stored in the clear. Hashes are Argon2id PHC strings
//! with a random salt, so a submission is found by company name first and
//! the PIN verified against the stored hash second.

use std::sync::LazyLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use regex::Regex;

use crate::error::CoreError;

pub const COMPANY_REQUIRED_MESSAGE: &str = "상호명을 입력해주세요.";
pub const PIN_FORMAT_MESSAGE: &str = "4자리 숫자 비밀번호를 입력해주세요.";

static PIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}$").expect("valid regex"));

/// Validated company name and PIN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionIdentity {
    company_name: String,
    pin: String,
}

impl SubmissionIdentity {
    /// Trim the company name and check the PIN format.
    pub fn new(company_name: &str, pin: &str) -> Result<Self, CoreError> {
        let company_name = company_name.trim();
        if company_name.is_empty() {
            return Err(CoreError::Validation(COMPANY_REQUIRED_MESSAGE.to_string()));
        }
        if !PIN_RE.is_match(pin) {
            return Err(CoreError::Validation(PIN_FORMAT_MESSAGE.to_string()));
        }
        Ok(Self {
            company_name: company_name.to_string(),
            pin: pin.to_string(),
        })
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn pin(&self) -> &str {
        &self.pin
    }

    /// Whether `pin_hash` was produced from this identity's PIN.
    pub fn matches(&self, pin_hash: &str) -> Result<bool, CoreError> {
        verify_pin(&self.pin, pin_hash)
    }
}

/// Hash a PIN with Argon2id and a random salt.
pub fn hash_pin(pin: &str) -> Result<String, CoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(pin.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CoreError::Internal(format!("PIN hashing failed: {e}")))
}

/// Verify a PIN against a stored PHC string.
pub fn verify_pin(pin: &str, pin_hash: &str) -> Result<bool, CoreError> {
    let parsed = PasswordHash::new(pin_hash)
        .map_err(|e| CoreError::Internal(format!("Stored PIN hash is malformed: {e}")))?;
    match Argon2::default().verify_password(pin.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CoreError::Internal(format!("PIN verification failed: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn company_name_is_trimmed() {
        let id = SubmissionIdentity::new("  스테이 한옥 ", "1234").unwrap();
        assert_eq!(id.company_name(), "스테이 한옥");
    }

    #[test]
    fn blank_company_is_rejected() {
        assert_matches!(
            SubmissionIdentity::new("   ", "1234"),
            Err(CoreError::Validation(msg)) if msg == COMPANY_REQUIRED_MESSAGE
        );
    }

    #[test]
    fn pin_must_be_four_ascii_digits() {
        for bad in ["123", "12345", "12a4", "١٢٣٤", " 1234"] {
            assert_matches!(
                SubmissionIdentity::new("a", bad),
                Err(CoreError::Validation(msg)) if msg == PIN_FORMAT_MESSAGE
            );
        }
        assert!(SubmissionIdentity::new("a", "0007").is_ok());
    }

    #[test]
    fn hash_and_verify() {
        let hash = hash_pin("1234").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_pin("1234", &hash).unwrap());
        assert!(!verify_pin("4321", &hash).unwrap());
        assert!(verify_pin("1234", "not-a-hash").is_err());
    }
}

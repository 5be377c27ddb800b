//! Time-based one-time passwords (RFC 6238, HMAC-SHA1, 6 digits, 30 s step).
//!
//! Secrets travel as unpadded upper-case base32, which is what authenticator
//! apps expect in `otpauth://` URIs.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha1::Sha1;
use thiserror::Error;

type HmacSha1 = Hmac<Sha1>;

pub const STEP_SECONDS: u64 = 30;
pub const DIGITS: u32 = 6;
/// Accepted clock drift, in steps, on each side of "now".
pub const SKEW_STEPS: u64 = 1;

const SECRET_BYTES: usize = 20;
const BASE32_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

#[derive(Debug, Error)]
pub enum TotpError {
    #[error("invalid base32 secret")]
    InvalidSecret,
    #[error("hmac key rejected")]
    InvalidKey,
}

/// Fresh random secret, base32 encoded.
pub fn generate_secret() -> String {
    let mut raw = [0u8; SECRET_BYTES];
    rand::thread_rng().fill_bytes(&mut raw);
    base32_encode(&raw)
}

/// `otpauth://` URI for QR provisioning.
pub fn provisioning_uri(issuer: &str, account: &str, secret: &str) -> String {
    let label: String = url::form_urlencoded::byte_serialize(format!("{issuer}:{account}").as_bytes())
        .collect();
    let issuer: String = url::form_urlencoded::byte_serialize(issuer.as_bytes()).collect();
    format!("otpauth://totp/{label}?secret={secret}&issuer={issuer}")
}

/// Check `code` against `secret` at unix time `now`, tolerating `SKEW_STEPS`.
pub fn verify(secret: &str, code: &str, now: u64) -> Result<bool, TotpError> {
    let code = code.trim();
    if code.len() != DIGITS as usize || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(false);
    }
    let Ok(expected) = code.parse::<u32>() else {
        return Ok(false);
    };

    let key = base32_decode(secret)?;
    let counter = now / STEP_SECONDS;
    for candidate in counter.saturating_sub(SKEW_STEPS)..=counter + SKEW_STEPS {
        if code_at(&key, candidate)? == expected {
            return Ok(true);
        }
    }
    Ok(false)
}

/// HOTP value (RFC 4226) for a raw key and counter.
pub fn code_at(key: &[u8], counter: u64) -> Result<u32, TotpError> {
    let mut mac = HmacSha1::new_from_slice(key).map_err(|_| TotpError::InvalidKey)?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    // dynamic truncation
    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let binary = u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);

    Ok(binary % 10u32.pow(DIGITS))
}

/// RFC 4648 base32, upper-case, no padding.
pub fn base32_encode(data: &[u8]) -> String {
    let mut result = String::with_capacity(data.len().div_ceil(5) * 8);
    let mut bits = 0u32;
    let mut bit_count = 0u8;

    for &byte in data {
        bits = (bits << 8) | (byte as u32);
        bit_count += 8;

        while bit_count >= 5 {
            bit_count -= 5;
            let index = ((bits >> bit_count) & 0x1F) as usize;
            result.push(BASE32_ALPHABET[index] as char);
        }
    }

    // Flush remaining bits
    if bit_count > 0 {
        let index = ((bits << (5 - bit_count)) & 0x1F) as usize;
        result.push(BASE32_ALPHABET[index] as char);
    }

    result
}

/// Inverse of `base32_encode`; accepts lower case and `=` padding.
pub fn base32_decode(input: &str) -> Result<Vec<u8>, TotpError> {
    let mut out = Vec::with_capacity(input.len() * 5 / 8);
    let mut bits = 0u32;
    let mut bit_count = 0u8;

    for ch in input.trim_end_matches('=').bytes() {
        let value = BASE32_ALPHABET
            .iter()
            .position(|&a| a == ch.to_ascii_uppercase())
            .ok_or(TotpError::InvalidSecret)? as u32;

        bits = (bits << 5) | value;
        bit_count += 5;

        if bit_count >= 8 {
            bit_count -= 8;
            out.push((bits >> bit_count) as u8);
            bits &= (1 << bit_count) - 1;
        }
    }

    if out.is_empty() {
        return Err(TotpError::InvalidSecret);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RFC_KEY: &[u8] = b"12345678901234567890";

    #[test]
    fn rfc4226_vectors() {
        assert_eq!(code_at(RFC_KEY, 0).unwrap(), 755224);
        assert_eq!(code_at(RFC_KEY, 1).unwrap(), 287082);
        assert_eq!(code_at(RFC_KEY, 9).unwrap(), 520489);
    }

    #[test]
    fn rfc4648_base32() {
        assert_eq!(base32_encode(b"foobar"), "MZXW6YTBOI");
        assert_eq!(base32_decode("MZXW6YTBOI======").unwrap(), b"foobar");
        assert_eq!(base32_decode("mzxw6ytboi").unwrap(), b"foobar");
        assert!(base32_decode("not base32!").is_err());
    }

    #[test]
    fn verify_accepts_current_and_adjacent_steps() {
        let secret = base32_encode(RFC_KEY);
        // counter 1 covers t = 30..59
        assert!(verify(&secret, "287082", 59).unwrap());
        assert!(verify(&secret, "287082", 89).unwrap());
        assert!(!verify(&secret, "287082", 150).unwrap());
    }

    #[test]
    fn verify_rejects_malformed_codes() {
        let secret = base32_encode(RFC_KEY);
        assert!(!verify(&secret, "28708", 59).unwrap());
        assert!(!verify(&secret, "28708a", 59).unwrap());
        assert!(!verify(&secret, "", 59).unwrap());
    }

    #[test]
    fn generated_secret_round_trips() {
        let secret = generate_secret();
        assert_eq!(base32_decode(&secret).unwrap().len(), SECRET_BYTES);
    }

    #[test]
    fn provisioning_uri_escapes_label() {
        let uri = provisioning_uri("Terminal Gateway", "alice", "ABC");
        assert_eq!(
            uri,
            "otpauth://totp/Terminal+Gateway%3Aalice?secret=ABC&issuer=Terminal+Gateway"
        );
    }
}

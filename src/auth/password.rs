use base64::{engine::general_purpose, Engine as _};
use constant_time_eq::constant_time_eq;
use pbkdf2::hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::Sha256;

use crate::api::error::ApiError;

/// Django-compatible hash parameters: pbkdf2_sha256$iterations$salt$hash.
const PBKDF2_ITERATIONS: u32 = 600_000;
const SALT_LEN: usize = 16;

fn derive(password: &str, salt: &str, iterations: u32) -> Result<String, ApiError> {
    let mut output = [0u8; 32];
    pbkdf2::<Hmac<Sha256>>(
        password.as_bytes(),
        salt.as_bytes(),
        iterations,
        &mut output,
    )
    .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

    Ok(general_purpose::STANDARD.encode(output))
}

/// Hash a password into the stored `pbkdf2_sha256$iterations$salt$hash`
/// format.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LEN)
        .map(char::from)
        .collect();

    let hash = derive(password, &salt, PBKDF2_ITERATIONS)?;
    Ok(format!("pbkdf2_sha256${}${}${}", PBKDF2_ITERATIONS, salt, hash))
}

/// Verify a password against a stored hash string. Comparison is
/// constant-time; any parse failure is treated as a mismatch.
pub fn verify_password(password: &str, hash_string: &str) -> bool {
    let parts: Vec<&str> = hash_string.split('$').collect();
    if parts.len() != 4 || parts[0] != "pbkdf2_sha256" {
        return false;
    }

    let iterations: u32 = match parts[1].parse() {
        Ok(i) => i,
        Err(_) => return false,
    };
    let salt = parts[2];
    let expected_hash = parts[3];

    let computed_hash = match derive(password, salt, iterations) {
        Ok(h) => h,
        Err(_) => return false,
    };

    constant_time_eq(computed_hash.as_bytes(), expected_hash.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Derivation with production iteration counts is slow; tests verify
    // against a low-iteration hash built through the same code path.
    fn hash_with(password: &str, salt: &str, iterations: u32) -> String {
        let hash = derive(password, salt, iterations).unwrap();
        format!("pbkdf2_sha256${}${}${}", iterations, salt, hash)
    }

    #[test]
    fn test_round_trip() {
        let stored = hash_with("hunter22", "abcDEF123", 1000);
        assert!(verify_password("hunter22", &stored));
        assert!(!verify_password("hunter23", &stored));
    }

    #[test]
    fn test_rejects_malformed_hash() {
        assert!(!verify_password("pw", "not-a-hash"));
        assert!(!verify_password("pw", "md5$x$y$z"));
        assert!(!verify_password("pw", "pbkdf2_sha256$notanumber$salt$hash"));
        assert!(!verify_password("pw", ""));
    }

    #[test]
    fn test_hash_format() {
        let stored = hash_with("secret", "somesalt", 1000);
        let parts: Vec<&str> = stored.split('$').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "pbkdf2_sha256");
        assert_eq!(parts[1], "1000");
        assert_eq!(parts[2], "somesalt");
    }
}

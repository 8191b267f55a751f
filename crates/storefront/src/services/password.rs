//! Password hashing and generated-password helpers.
//!
//! Hashes are PBKDF2-HMAC-SHA512 in PHC string format with a random per-user
//! salt, so two accounts with the same password never share a hash.

use pbkdf2::{
    Algorithm, Params, Pbkdf2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::Rng;

/// PBKDF2 iteration count.
const PBKDF2_ROUNDS: u32 = 600_000;

/// SHA-512 digest width in bytes.
const PBKDF2_OUTPUT_LENGTH: usize = 64;

/// Characters used for temporary passwords. Excludes lookalikes
/// (I/l/1, O/0) so the password survives being read off a phone screen.
pub const TEMP_PASSWORD_ALPHABET: &str =
    "ABCDEFGHJKMNPQRSTUVWXYZabcdefghijkmnpqrstuvwxyz23456789";

/// Length of generated temporary passwords.
pub const TEMP_PASSWORD_LENGTH: usize = 8;

/// Hash a password into a PHC string with a fresh random salt.
///
/// # Errors
///
/// Returns an error if hashing fails.
pub fn hash_password(password: &str) -> Result<String, pbkdf2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Pbkdf2.hash_password_customized(
        password.as_bytes(),
        Some(Algorithm::Pbkdf2Sha512.ident()),
        None,
        Params {
            rounds: PBKDF2_ROUNDS,
            output_length: PBKDF2_OUTPUT_LENGTH,
        },
        &salt,
    )?;

    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash.
///
/// The algorithm and parameters are read from the hash itself, so hashes
/// written with older parameters keep verifying.
///
/// # Errors
///
/// Returns an error if the hash cannot be parsed or the password does not
/// match.
pub fn verify_password(password: &str, hash: &str) -> Result<(), pbkdf2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    Pbkdf2.verify_password(password.as_bytes(), &parsed)
}

/// Generate the 8-hex-character password assigned at registration when the
/// customer didn't pick one.
#[must_use]
pub fn generate_account_password() -> String {
    let mut bytes = [0u8; 4];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
}

/// Generate a temporary password from the ambiguity-free alphabet.
#[must_use]
pub fn generate_temp_password() -> String {
    let alphabet = TEMP_PASSWORD_ALPHABET.as_bytes();
    let mut rng = rand::rng();

    (0..TEMP_PASSWORD_LENGTH)
        .map(|_| char::from(alphabet[rng.random_range(0..alphabet.len())]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("correct horse battery").expect("hashes");
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(verify_password("wrong password", &hash).is_err());
    }

    #[test]
    fn hash_embeds_algorithm_and_rounds() {
        let hash = hash_password("anything").expect("hashes");
        assert!(hash.starts_with("$pbkdf2-sha512$"));
        assert!(hash.contains("i=600000"));
    }

    #[test]
    fn identical_passwords_get_distinct_hashes() {
        let first = hash_password("same password").expect("hashes");
        let second = hash_password("same password").expect("hashes");
        assert_ne!(first, second);
        assert!(verify_password("same password", &first).is_ok());
        assert!(verify_password("same password", &second).is_ok());
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn verify_reads_parameters_from_the_hash() {
        // A hash written under older, cheaper parameters must keep
        // verifying after the defaults change.
        let salt = SaltString::generate(&mut OsRng);
        let legacy = Pbkdf2
            .hash_password_customized(
                b"migrated password",
                Some(Algorithm::Pbkdf2Sha512.ident()),
                None,
                Params {
                    rounds: 1_000,
                    output_length: 32,
                },
                &salt,
            )
            .expect("hashes")
            .to_string();

        assert!(verify_password("migrated password", &legacy).is_ok());
        assert!(verify_password("different password", &legacy).is_err());
    }

    #[test]
    fn account_password_is_eight_hex_chars() {
        let password = generate_account_password();
        assert_eq!(password.len(), 8);
        assert!(password.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn temp_password_uses_unambiguous_alphabet() {
        for _ in 0..50 {
            let password = generate_temp_password();
            assert_eq!(password.len(), TEMP_PASSWORD_LENGTH);
            assert!(password.chars().all(|c| TEMP_PASSWORD_ALPHABET.contains(c)));
            assert!(!password.contains('I'));
            assert!(!password.contains('l'));
            assert!(!password.contains('O'));
            assert!(!password.contains('0'));
            assert!(!password.contains('1'));
        }
    }
}

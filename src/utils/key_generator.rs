//! Candidate key generation for short URLs.
//!
//! Generators produce candidate keys on demand with no uniqueness
//! guarantee; uniqueness is established by the storage engine's constraint
//! during allocation.

use base64::Engine as _;

/// Length of random bytes before base64 encoding.
const KEY_LENGTH_BYTES: usize = 9;

/// Source of candidate keys.
///
/// `generate` has no side effects and must be safely callable arbitrarily
/// many times; the allocation loop draws from it until an insert succeeds.
#[cfg_attr(test, mockall::automock)]
pub trait KeyGenerator: Send + Sync {
    /// Produces one candidate key. Not guaranteed unique.
    fn generate(&self) -> String;
}

/// Cryptographically secure random key generator.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing a 12-character key.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomKeyGenerator;

impl KeyGenerator for RandomKeyGenerator {
    fn generate(&self) -> String {
        let mut buffer = [0u8; KEY_LENGTH_BYTES];

        getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_key_not_empty() {
        let key = RandomKeyGenerator.generate();
        assert!(!key.is_empty());
    }

    #[test]
    fn test_generate_key_has_correct_length() {
        let key = RandomKeyGenerator.generate();
        assert_eq!(key.len(), 12);
    }

    #[test]
    fn test_generate_key_url_safe_characters() {
        let key = RandomKeyGenerator.generate();
        assert!(
            key.chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_generate_key_no_padding() {
        let key = RandomKeyGenerator.generate();
        assert!(!key.contains('='));
    }

    #[test]
    fn test_generate_key_produces_unique_keys() {
        let mut keys = HashSet::new();

        for _ in 0..1000 {
            keys.insert(RandomKeyGenerator.generate());
        }

        assert_eq!(keys.len(), 1000);
    }
}

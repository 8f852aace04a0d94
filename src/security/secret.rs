use sha2::{Digest, Sha256};

/// Compares two secrets without short-circuiting on the first differing byte.
/// Both sides are hashed first so their lengths don't leak either.
pub fn secrets_match(expected: &str, provided: &str) -> bool {
    let expected = Sha256::digest(expected.as_bytes());
    let provided = Sha256::digest(provided.as_bytes());

    expected
        .iter()
        .zip(provided.iter())
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_secrets_match() {
        assert!(secrets_match("secret", "secret"));
        assert!(secrets_match("", ""));
    }

    #[test]
    fn different_secrets_do_not_match() {
        assert!(!secrets_match("secret", "secreT"));
        assert!(!secrets_match("secret", "secret "));
        assert!(!secrets_match("secret", ""));
    }
}

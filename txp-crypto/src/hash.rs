//! Content hashing used for transaction and block identifiers.

/// Hashes arbitrary bytes to a 32-byte digest.
///
/// The transaction-processing core never hashes directly, it always goes
/// through this function so the digest algorithm can change in one place.
pub fn hash(bytes: &[u8]) -> [u8; 32] {
    *blake3::hash(bytes).as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(hash(b"same input"), hash(b"same input"));
    }

    #[test]
    fn hash_differs_on_different_input() {
        assert_ne!(hash(b"a"), hash(b"b"));
    }
}

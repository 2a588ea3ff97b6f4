//! Signature verification used to authorize a transaction's inputs.

use ed25519_dalek::{PublicKey, Signature, SignatureError, Verifier};

/// Verifies that `signature` over `message` was produced by `public_key`.
///
/// The `Verifier` in `txp-verify` calls this once per input witness and
/// never inspects key material itself.
pub fn verify_signature(
    public_key: &PublicKey,
    message: &[u8],
    signature: &Signature,
) -> Result<(), SignatureError> {
    public_key.verify(message, signature)
}

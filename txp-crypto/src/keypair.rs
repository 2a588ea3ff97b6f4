//! Keypair generation, used by tests to build witnesses that
//! `verify_signature` can check.

use ed25519_dalek::{Keypair, PublicKey, Signature, Signer};
use rand::rngs::OsRng;

/// A cryptographic key pair (public and secret key).
pub struct TxpKeyPair {
    keypair: Keypair,
}

impl TxpKeyPair {
    /// Generates a new random key pair.
    pub fn generate() -> Self {
        let mut csprng = OsRng {};
        let keypair = Keypair::generate(&mut csprng);
        TxpKeyPair { keypair }
    }

    /// Returns the public key of this key pair.
    pub fn public_key(&self) -> PublicKey {
        self.keypair.public
    }

    /// Signs the given message with the secret key.
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.keypair.sign(message)
    }
}

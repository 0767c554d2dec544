use crate::error::Error;
use arrayref::array_ref;
use ed25519_dalek::{ExpandedSecretKey, SecretKey, Signature, Verifier};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct PublicKey {
    key: Vec<u8>,
}

impl PublicKey {
    pub fn new(key: Vec<u8>) -> Self {
        Self { key }
    }

    pub fn key(&self) -> Vec<u8> {
        self.key.clone()
    }

    pub fn key_ref(&self) -> &[u8] {
        &self.key
    }

    /// Checks an Ed25519 signature over `msg`. Malformed keys and
    /// signatures verify as false, they never panic here.
    pub fn verify_ed(&self, msg: &[u8], sig: &[u8]) -> bool {
        if sig.len() != 64 {
            return false;
        }
        let key = match ed25519_dalek::PublicKey::from_bytes(&self.key) {
            Ok(key) => key,
            Err(_) => return false,
        };
        let sig = Signature::from(array_ref!(sig, 0, 64).to_owned());
        key.verify(msg, &sig).is_ok()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct PrivateKey {
    key: Vec<u8>,
}

impl PrivateKey {
    pub fn new(key: Vec<u8>) -> Self {
        Self { key }
    }

    pub fn key(&self) -> Vec<u8> {
        self.key.clone()
    }

    /// Deterministic Ed25519 signature over `msg` (RFC 8032).
    pub fn sign_ed(&self, msg: &[u8]) -> Result<Vec<u8>, Error> {
        let sk = SecretKey::from_bytes(&self.key)?;
        let pk = ed25519_dalek::PublicKey::from(&sk);
        Ok(ExpandedSecretKey::from(&sk)
            .sign(msg, &pk)
            .to_bytes()
            .to_vec())
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.key.zeroize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify() -> Result<(), Error> {
        let seed = [7u8; 32];
        let sk = PrivateKey::new(seed.to_vec());
        let pk = PublicKey::new(
            ed25519_dalek::PublicKey::from(&SecretKey::from_bytes(&seed)?)
                .to_bytes()
                .to_vec(),
        );

        let msg = b"are these keys consistent?";
        let sig = sk.sign_ed(msg)?;
        assert_eq!(sig.len(), 64);
        assert!(pk.verify_ed(msg, &sig));
        assert!(!pk.verify_ed(b"a different message", &sig));
        Ok(())
    }

    #[test]
    fn signing_is_deterministic() -> Result<(), Error> {
        let sk = PrivateKey::new(vec![1u8; 32]);
        let msg = b"same bytes in, same bytes out";
        assert_eq!(sk.sign_ed(msg)?, sk.sign_ed(msg)?);
        Ok(())
    }

    #[test]
    fn malformed_input_verifies_false() {
        let pk = PublicKey::new(vec![0u8; 32]);
        assert!(!pk.verify_ed(b"msg", &[0u8; 63]));
        let short = PublicKey::new(vec![0u8; 31]);
        assert!(!short.verify_ed(b"msg", &[0u8; 64]));
    }
}

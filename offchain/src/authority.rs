use std::{fmt::Debug, str::FromStr};

use secp256k1::{ecdsa, Message, PublicKey, SecretKey, SECP256K1};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use smt::{hash::hash_leaf, Field};

use crate::Result;

/// A secp256k1 key pair that signs ordered lists of field elements
///
/// The signed message is the 32-byte RPO digest of the list.
#[derive(Clone)]
pub struct SigningAuthority {
    secret: SecretKey,
    public: AuthorityKey,
}

impl Debug for SigningAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningAuthority")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

impl SigningAuthority {
    #[must_use]
    pub fn new(secret: SecretKey) -> Self {
        let public = AuthorityKey(PublicKey::from_secret_key(SECP256K1, &secret));
        Self { secret, public }
    }

    /// A fresh random key pair
    #[must_use]
    pub fn generate() -> Self {
        Self::new(SecretKey::new(&mut secp256k1::rand::thread_rng()))
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim()).map_err(|_| secp256k1::Error::InvalidSecretKey)?;
        Ok(Self::new(SecretKey::from_slice(&bytes)?))
    }

    /// The secret key as hex, for writing to a key file
    #[must_use]
    pub fn secret_hex(&self) -> String {
        hex::encode(self.secret.secret_bytes())
    }

    #[must_use]
    pub fn public_key(&self) -> AuthorityKey {
        self.public
    }

    pub fn sign(&self, fields: &[Field]) -> Result<Signature> {
        let message = message(fields)?;
        Ok(Signature(SECP256K1.sign_ecdsa(&message, &self.secret)))
    }
}

/// The public half of a [`SigningAuthority`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthorityKey(PublicKey);

impl AuthorityKey {
    #[must_use]
    pub fn verify(&self, fields: &[Field], signature: &Signature) -> bool {
        match message(fields) {
            Ok(message) => SECP256K1
                .verify_ecdsa(&message, &signature.0, &self.0)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// The compressed key packed into field elements
    #[must_use]
    pub fn to_fields(&self) -> Vec<Field> {
        Field::from_bytes(&self.0.serialize())
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.serialize())
    }
}

impl FromStr for AuthorityKey {
    type Err = secp256k1::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| secp256k1::Error::InvalidPublicKey)?;
        Ok(Self(PublicKey::from_slice(&bytes)?))
    }
}

/// A compact ECDSA signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature(ecdsa::Signature);

impl Signature {
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.serialize_compact())
    }
}

impl FromStr for Signature {
    type Err = secp256k1::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| secp256k1::Error::InvalidSignature)?;
        Ok(Self(ecdsa::Signature::from_compact(&bytes)?))
    }
}

fn message(fields: &[Field]) -> Result<Message> {
    Ok(Message::from_slice(&hash_leaf(fields).to_bytes())?)
}

macro_rules! hex_serde {
    ($t:ty) => {
        impl Serialize for $t {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(D::Error::custom)
            }
        }
    };
}

hex_serde!(AuthorityKey);
hex_serde!(Signature);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_verifies_only_for_the_signed_fields() {
        let authority = SigningAuthority::generate();
        let fields = [Field::from(1), Field::from(2)];
        let signature = authority.sign(&fields).unwrap();

        assert!(authority.public_key().verify(&fields, &signature));
        assert!(!authority
            .public_key()
            .verify(&[Field::from(1), Field::from(3)], &signature));
        assert!(!SigningAuthority::generate()
            .public_key()
            .verify(&fields, &signature));
    }

    #[test]
    fn secret_hex_round_trip() {
        let authority = SigningAuthority::generate();
        let again = SigningAuthority::from_hex(&authority.secret_hex()).unwrap();

        assert_eq!(authority.public_key(), again.public_key());
        assert!(SigningAuthority::from_hex("not hex").is_err());
    }

    #[test]
    fn keys_and_signatures_serialize_as_hex() {
        let authority = SigningAuthority::generate();
        let key = authority.public_key();
        let signature = authority.sign(&[Field::ONE]).unwrap();

        let json = serde_json::to_string(&(key, signature)).unwrap();
        let (key_again, signature_again): (AuthorityKey, Signature) =
            serde_json::from_str(&json).unwrap();

        assert_eq!(key, key_again);
        assert_eq!(signature, signature_again);
        assert_eq!(key.to_hex().len(), 66);
    }

    #[test]
    fn debug_hides_the_secret() {
        let authority = SigningAuthority::generate();
        let debug = format!("{authority:?}");

        assert!(!debug.contains(&authority.secret_hex()));
    }
}

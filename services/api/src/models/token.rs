//! Hashed credential tokens

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use super::nullable::NullString;

/// Errors raised by credential tokens
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// `encrypt` was called on a token that already holds a hash
    #[error("token is already encrypted")]
    AlreadyEncrypted,

    /// `authenticate` needs a hashed receiver and a plaintext candidate
    #[error("invalid tokens")]
    InvalidTokens,

    /// The candidate does not match the hash
    #[error("token mismatch")]
    Mismatch,

    /// The hashing backend failed
    #[error("failed to hash token: {0}")]
    Hash(String),
}

/// Argon2 hasher with tunable cost
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    /// Create a hasher with explicit Argon2id parameters
    pub fn new(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Hash `plain` with a fresh random salt into a PHC string
    fn hash(&self, plain: &str) -> Result<String, TokenError> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        self.argon2
            .hash_password(plain.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| TokenError::Hash(e.to_string()))
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

impl fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}

/// A credential that is either plaintext (fresh from a request) or hashed
/// (ready for, or loaded from, the store)
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Token {
    value: NullString,
    encrypted: bool,
}

impl Token {
    /// A plaintext token; empty text is an unset token
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: NullString::new(value.into()),
            encrypted: false,
        }
    }

    /// A token that already holds a hash, as read from the store
    pub fn hashed(value: impl Into<String>) -> Self {
        Self {
            value: NullString::new(value.into()),
            encrypted: true,
        }
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// The stored text (plaintext or hash)
    pub fn as_deref(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Hash the plaintext in place.
    ///
    /// An unset token stays unset. Hashing a hash is refused.
    pub fn encrypt(&mut self, hasher: &CredentialHasher) -> Result<(), TokenError> {
        if self.is_encrypted() {
            return Err(TokenError::AlreadyEncrypted);
        }
        let Some(plain) = self.value.as_deref() else {
            return Ok(());
        };

        let digest = hasher.hash(plain)?;
        self.value = NullString::new(digest);
        self.encrypted = true;
        Ok(())
    }

    /// Check that `candidate` is the plaintext this hashed token was made from
    pub fn authenticate(&self, candidate: &Token) -> Result<(), TokenError> {
        if !self.is_encrypted() || candidate.is_encrypted() {
            return Err(TokenError::InvalidTokens);
        }
        let (Some(hash), Some(plain)) = (self.as_deref(), candidate.as_deref()) else {
            return Err(TokenError::InvalidTokens);
        };

        let parsed = PasswordHash::new(hash).map_err(|e| TokenError::Hash(e.to_string()))?;
        Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .map_err(|_| TokenError::Mismatch)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("is_null", &self.is_null())
            .field("encrypted", &self.encrypted)
            .finish()
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = NullString::deserialize(deserializer)?;
        Ok(value.into_option().map(Token::plain).unwrap_or_default())
    }
}

#[cfg(test)]
pub(crate) fn test_hasher() -> CredentialHasher {
    let params = Params::new(
        Params::MIN_M_COST,
        Params::MIN_T_COST,
        Params::MIN_P_COST,
        None,
    )
    .unwrap();
    CredentialHasher::new(params)
}

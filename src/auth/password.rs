//! Password strength checks and bcrypt hashes for the shopkeeper's log-in.

use std::{fmt::Display, str::FromStr};

use bcrypt::BcryptError;
use zxcvbn::{Score, zxcvbn};

use crate::Error;

/// A password that zxcvbn rates as strong enough to hash and store.
#[derive(Debug, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check the strength of `password`.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] with zxcvbn's suggestions if the password
    /// scores below three out of four.
    pub fn new(password: &str) -> Result<Self, Error> {
        let estimate = zxcvbn(password, &[]);

        if matches!(estimate.score(), Score::Three | Score::Four) {
            return Ok(Self(password.to_owned()));
        }

        let feedback = estimate
            .feedback()
            .map(ToString::to_string)
            .unwrap_or_default();

        Err(Error::TooWeak(feedback))
    }

    /// Skip the strength check, e.g. for short passwords in tests.
    pub fn new_unchecked(password: &str) -> Self {
        Self(password.to_owned())
    }
}

/// A bcrypt hash of the shopkeeper's password.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The bcrypt cost used for the shopkeeper's password.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with bcrypt using `cost` rounds.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if bcrypt fails, e.g. because `cost` is
    /// out of range.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        bcrypt::hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Check whether `raw_password` hashes to this hash.
    ///
    /// # Errors
    ///
    /// Returns a [BcryptError] if the stored hash is malformed.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        bcrypt::verify(raw_password, &self.0)
    }
}

impl FromStr for PasswordHash {
    type Err = Error;

    /// Parse a hash produced by `hash_password`, e.g. from an environment
    /// variable.
    fn from_str(hash: &str) -> Result<Self, Self::Err> {
        let hash = hash.trim();

        // Malformed hashes fail before any password comparison happens.
        match bcrypt::verify("", hash) {
            Ok(_) => Ok(Self(hash.to_owned())),
            Err(error) => Err(Error::InvalidPasswordHash(error.to_string())),
        }
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod validated_password_tests {
    use crate::{Error, auth::ValidatedPassword};

    #[test]
    fn rejects_weak_password() {
        let result = ValidatedPassword::new("hisab123");

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn accepts_strong_password() {
        let result = ValidatedPassword::new("dukaan-ki-kitaab-2024-surakshit");

        assert!(result.is_ok());
    }
}

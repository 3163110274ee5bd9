//! Guest credential generation
//!
//! Both the username and the password of a guest account are sliced out of a
//! single random v4 UUID. That is plenty for short-lived guest passes but it
//! is not a security-grade password source: the password carries 24 bits of
//! randomness. Keeping the derivation here means a stronger source can be
//! swapped in without touching the provisioning workflow.

use rand::{Rng, RngCore, SeedableRng};
use std::fmt;
use tracing::{debug, warn};
use uuid::Uuid;

/// Prefix of every generated username
pub const USERNAME_PREFIX: &str = "guest-";

/// Number of hex digits following the username prefix
pub const USERNAME_HEX_LEN: usize = 4;

/// Number of hex digits in a generated password
pub const PASSWORD_LEN: usize = 6;

/// Offset of the password inside the hyphenated UUID text
const PASSWORD_OFFSET: usize = 24;

/// Upper bound on candidates tried by [`ensure_unique`]
pub const MAX_UNIQUE_ATTEMPTS: usize = 1000;

/// A username/password pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// `guest-` followed by four lowercase hex digits
    pub username: String,
    /// Six lowercase hex digits
    pub password: String,
}

impl Credentials {
    /// Slice credentials out of a UUID's hyphenated form
    ///
    /// The username takes the first four characters and the password the six
    /// starting at offset 24 (the beginning of the last group), so the two
    /// never share characters.
    pub fn from_token(token: &Uuid) -> Self {
        let text = token.hyphenated().to_string();
        Self {
            username: format!("{}{}", USERNAME_PREFIX, &text[..USERNAME_HEX_LEN]),
            password: text[PASSWORD_OFFSET..PASSWORD_OFFSET + PASSWORD_LEN].to_string(),
        }
    }
}

/// Errors raised while looking for an unused username
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Every candidate tried collided with an existing account
    #[error("No unused guest username found after {attempts} attempts")]
    UsernameSpaceExhausted {
        /// Number of candidates tried
        attempts: usize,
    },

    /// The existence check itself failed
    #[error("Username lookup failed: {0}")]
    Lookup(#[from] crate::directory::DirectoryError),
}

/// Source of candidate guest credentials
pub struct AccountGenerator {
    rng: Box<dyn RngCore>,
}

impl fmt::Debug for AccountGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountGenerator").finish()
    }
}

impl Default for AccountGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountGenerator {
    /// Create a generator backed by the thread-local RNG
    pub fn new() -> Self {
        Self { rng: Box::new(rand::thread_rng()) }
    }

    /// Create a generator with a specific seed for reproducible results
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: Box::new(rand::rngs::StdRng::seed_from_u64(seed)) }
    }

    /// Produce one candidate username/password pair
    pub fn generate_candidate(&mut self) -> Credentials {
        let bytes: [u8; 16] = self.rng.gen();
        let token = uuid::Builder::from_random_bytes(bytes).into_uuid();
        Credentials::from_token(&token)
    }

    /// Produce a candidate whose username `exists` reports as unused
    pub fn generate_unique<E>(&mut self, exists: E) -> Result<Credentials, GenerationError>
    where
        E: FnMut(&str) -> Result<bool, crate::directory::DirectoryError>,
    {
        ensure_unique(|| self.generate_candidate(), exists)
    }
}

/// Draw candidates until one has a username the existence check reports absent
///
/// Lookup errors are returned immediately. After [`MAX_UNIQUE_ATTEMPTS`]
/// collisions the search gives up with
/// [`GenerationError::UsernameSpaceExhausted`].
pub fn ensure_unique<P, E, X>(
    mut candidate: P,
    mut exists: E,
) -> Result<Credentials, GenerationError>
where
    P: FnMut() -> Credentials,
    E: FnMut(&str) -> Result<bool, X>,
    X: Into<GenerationError>,
{
    for attempt in 1..=MAX_UNIQUE_ATTEMPTS {
        let credentials = candidate();
        if !exists(&credentials.username).map_err(Into::into)? {
            debug!(username = %credentials.username, attempt, "Found unused guest username");
            return Ok(credentials);
        }
        debug!(username = %credentials.username, attempt, "Guest username already taken");
    }

    warn!("Gave up looking for an unused guest username");
    Err(GenerationError::UsernameSpaceExhausted { attempts: MAX_UNIQUE_ATTEMPTS })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_from_known_token() {
        let token = Uuid::parse_str("1a2b3c4d-5e6f-4a8b-9c0d-abcdef012345").unwrap();
        let credentials = Credentials::from_token(&token);
        assert_eq!(credentials.username, "guest-1a2b");
        assert_eq!(credentials.password, "abcdef");
    }

    #[test]
    fn test_seeded_generators_agree() {
        let mut first = AccountGenerator::with_seed(42);
        let mut second = AccountGenerator::with_seed(42);
        for _ in 0..10 {
            assert_eq!(first.generate_candidate(), second.generate_candidate());
        }
    }

    #[test]
    fn test_exhaustion_is_reported() {
        let mut generator = AccountGenerator::with_seed(7);
        let result = generator.generate_unique(|_| Ok(true));
        assert!(matches!(
            result,
            Err(GenerationError::UsernameSpaceExhausted { attempts: MAX_UNIQUE_ATTEMPTS })
        ));
    }
}

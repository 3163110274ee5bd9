//! Guest account and batch request value types
//!
//! A [`GuestAccount`] is created once per iteration of the provisioning loop and
//! handed to the directory and the ticket renderer. Nothing here is persisted:
//! once the directory accepts the account it owns the durable record.

use super::ValidityPolicy;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Smallest number of passes in one batch
pub const MIN_BATCH_SIZE: u32 = 1;

/// Largest number of passes in one batch
pub const MAX_BATCH_SIZE: u32 = 25;

/// A freshly generated guest account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestAccount {
    /// Account name, `guest-` followed by four hex digits
    pub username: String,
    /// Six hex digit password
    pub password: String,
    /// Directory expiration instant, `None` for accounts that never expire
    pub expires_at: Option<DateTime<Local>>,
    /// Free-text description stored on the directory object
    pub description: Option<String>,
}

impl GuestAccount {
    /// Create a new guest account value
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        expires_at: Option<DateTime<Local>>,
        description: Option<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            expires_at,
            description,
        }
    }

    /// User principal name formed from the username and a domain suffix
    pub fn user_principal_name(&self, suffix: &str) -> String {
        format!("{}{}", self.username, suffix)
    }

    /// Whether the account carries an expiration date
    pub fn expires(&self) -> bool {
        self.expires_at.is_some()
    }
}

/// Errors raised while building a batch request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchRequestError {
    /// Requested pass count is outside the allowed range
    #[error("Pass count must be between {min} and {max}, got {count}")]
    InvalidCount {
        /// Requested count
        count: u32,
        /// Smallest allowed count
        min: u32,
        /// Largest allowed count
        max: u32,
    },
}

/// Parameters of one provisioning batch
///
/// Deserialized requests go through [`BatchRequest::new`] and are held to the
/// same bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BatchRequestFields")]
pub struct BatchRequest {
    count: u32,
    validity: ValidityPolicy,
    description: Option<String>,
}

impl BatchRequest {
    /// Build a request, rejecting counts outside `1..=25`
    ///
    /// An empty description is treated as absent.
    pub fn new(
        count: u32,
        validity: ValidityPolicy,
        description: Option<String>,
    ) -> Result<Self, BatchRequestError> {
        if !(MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&count) {
            return Err(BatchRequestError::InvalidCount {
                count,
                min: MIN_BATCH_SIZE,
                max: MAX_BATCH_SIZE,
            });
        }

        let description = description.filter(|text| !text.is_empty());

        Ok(Self { count, validity, description })
    }

    /// Number of passes to issue
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Validity tier shared by every pass in the batch
    pub fn validity(&self) -> ValidityPolicy {
        self.validity
    }

    /// Optional description applied to every account
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Unchecked wire form of a batch request
#[derive(Deserialize)]
struct BatchRequestFields {
    count: u32,
    validity: ValidityPolicy,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<BatchRequestFields> for BatchRequest {
    type Error = BatchRequestError;

    fn try_from(fields: BatchRequestFields) -> Result<Self, Self::Error> {
        BatchRequest::new(fields.count, fields.validity, fields.description)
    }
}

impl Default for BatchRequest {
    fn default() -> Self {
        Self { count: MIN_BATCH_SIZE, validity: ValidityPolicy::default(), description: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_request_bounds() {
        assert!(BatchRequest::new(1, ValidityPolicy::OneDay, None).is_ok());
        assert!(BatchRequest::new(25, ValidityPolicy::OneDay, None).is_ok());
        assert_eq!(
            BatchRequest::new(0, ValidityPolicy::OneDay, None).unwrap_err(),
            BatchRequestError::InvalidCount { count: 0, min: 1, max: 25 }
        );
        assert!(BatchRequest::new(26, ValidityPolicy::Never, None).is_err());
    }

    #[test]
    fn test_empty_description_is_dropped() {
        let request =
            BatchRequest::new(3, ValidityPolicy::TwoDays, Some(String::new())).unwrap();
        assert_eq!(request.description(), None);

        let request =
            BatchRequest::new(3, ValidityPolicy::TwoDays, Some("Visitor".to_string())).unwrap();
        assert_eq!(request.description(), Some("Visitor"));
    }

    #[test]
    fn test_user_principal_name() {
        let account = GuestAccount::new("guest-1a2b", "abcdef", None, None);
        assert_eq!(account.user_principal_name("@contoso.com"), "guest-1a2b@contoso.com");
        assert!(!account.expires());
    }
}

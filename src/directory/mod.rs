//! Directory service collaborator
//!
//! The provisioning workflow talks to the directory only through the
//! [`DirectoryClient`] trait: existence checks, account creation, staged group
//! membership and a single membership commit. [`LdapDirectory`] speaks LDAP to
//! an Active Directory domain; [`InMemoryDirectory`] keeps everything in memory
//! for preview runs.

pub mod ldap;
pub mod memory;

pub use ldap::*;
pub use memory::*;

use crate::types::GuestAccount;
use chrono::{DateTime, Local};

/// Errors raised by a directory client
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// The directory could not be reached
    #[error("Cannot connect to directory: {0}")]
    Connect(String),

    /// The service account was rejected
    #[error("Directory bind failed: {0}")]
    Bind(String),

    /// A search failed
    #[error("Directory lookup failed: {0}")]
    Lookup(String),

    /// The guest group does not exist
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    /// A principal referenced by name does not exist
    #[error("Principal not found: {0}")]
    PrincipalNotFound(String),

    /// The account could not be created
    #[error("Cannot create account {username}: {reason}")]
    Create {
        /// Account that failed
        username: String,
        /// Underlying cause
        reason: String,
    },

    /// Staged group membership could not be saved
    #[error("Cannot update membership of {group}: {reason}")]
    Commit {
        /// Group being updated
        group: String,
        /// Underlying cause
        reason: String,
    },

    /// The connection did not close cleanly
    #[error("Error closing directory connection: {0}")]
    Close(String),
}

/// Result type for directory operations
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Attributes of an account to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGuestUser {
    /// Pre-Windows 2000 logon name
    pub sam_account_name: String,
    /// Logon name with domain suffix
    pub user_principal_name: String,
    /// Display name
    pub display_name: String,
    /// Optional description, only written when present
    pub description: Option<String>,
    /// Initial password
    pub password: String,
    /// Whether the account is enabled on creation
    pub enabled: bool,
    /// Expiration instant, `None` for accounts that never expire
    pub account_expires: Option<DateTime<Local>>,
    /// Workstations the account may log on to
    pub permitted_workstations: Vec<String>,
}

impl NewGuestUser {
    /// Describe the directory object for a generated guest account
    pub fn for_account(account: &GuestAccount, upn_suffix: &str, workstation: &str) -> Self {
        Self {
            sam_account_name: account.username.clone(),
            user_principal_name: account.user_principal_name(upn_suffix),
            display_name: account.username.clone(),
            description: account.description.clone().filter(|text| !text.is_empty()),
            password: account.password.clone(),
            enabled: true,
            account_expires: account.expires_at,
            permitted_workstations: vec![workstation.to_string()],
        }
    }
}

/// Group whose membership changes are staged until committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMembership {
    name: String,
    distinguished_name: String,
    pending: Vec<String>,
}

impl GroupMembership {
    /// Handle for the group `name` stored at `distinguished_name`
    pub fn new(name: impl Into<String>, distinguished_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            distinguished_name: distinguished_name.into(),
            pending: Vec::new(),
        }
    }

    /// Group name as configured
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Distinguished name of the group object
    pub fn distinguished_name(&self) -> &str {
        &self.distinguished_name
    }

    /// Stage a member reference
    pub fn stage(&mut self, member: impl Into<String>) {
        self.pending.push(member.into());
    }

    /// Member references not yet committed
    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    /// Remove and return all staged references
    pub fn take_pending(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }
}

/// Capability interface over the directory service
pub trait DirectoryClient {
    /// Whether an account with this logon name exists
    fn user_exists(&mut self, sam_account_name: &str) -> DirectoryResult<bool>;

    /// Look up the group new accounts are added to
    fn find_group(&mut self, name: &str) -> DirectoryResult<GroupMembership>;

    /// Create and persist an account
    fn create_user(&mut self, user: &NewGuestUser) -> DirectoryResult<()>;

    /// Stage membership of the account with this principal name
    fn add_member(
        &mut self,
        group: &mut GroupMembership,
        user_principal_name: &str,
    ) -> DirectoryResult<()>;

    /// Save all staged membership changes in one operation
    fn commit_group(&mut self, group: &mut GroupMembership) -> DirectoryResult<()>;

    /// Release the connection; calling it again has no effect
    fn close(&mut self) -> DirectoryResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_guest_user_from_account() {
        let account =
            GuestAccount::new("guest-beef", "012345", None, Some("Contractor".to_string()));
        let user = NewGuestUser::for_account(&account, "@contoso.com", "CONTOSOSERVER1");

        assert_eq!(user.sam_account_name, "guest-beef");
        assert_eq!(user.user_principal_name, "guest-beef@contoso.com");
        assert_eq!(user.display_name, "guest-beef");
        assert_eq!(user.description.as_deref(), Some("Contractor"));
        assert!(user.enabled);
        assert_eq!(user.account_expires, None);
        assert_eq!(user.permitted_workstations, vec!["CONTOSOSERVER1".to_string()]);
    }

    #[test]
    fn test_group_membership_staging() {
        let mut group = GroupMembership::new("G GuestWireless", "CN=G GuestWireless,DC=contoso");
        group.stage("CN=guest-0001");
        group.stage("CN=guest-0002");
        assert_eq!(group.pending().len(), 2);

        let staged = group.take_pending();
        assert_eq!(staged.len(), 2);
        assert!(group.pending().is_empty());
    }
}

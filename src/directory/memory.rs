//! In-memory directory used for preview runs

use super::{DirectoryClient, DirectoryError, DirectoryResult, GroupMembership, NewGuestUser};
use std::collections::BTreeMap;
use tracing::debug;

/// Directory kept entirely in memory
#[derive(Debug, Default, Clone)]
pub struct InMemoryDirectory {
    users: BTreeMap<String, NewGuestUser>,
    groups: BTreeMap<String, Vec<String>>,
    closed: bool,
}

impl InMemoryDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty group
    pub fn with_group(mut self, name: impl Into<String>) -> Self {
        self.groups.entry(name.into()).or_default();
        self
    }

    /// Reserve a logon name as already taken
    pub fn with_existing_user(mut self, sam_account_name: impl Into<String>) -> Self {
        let name = sam_account_name.into();
        let user = NewGuestUser {
            sam_account_name: name.clone(),
            user_principal_name: name.clone(),
            display_name: name.clone(),
            description: None,
            password: String::new(),
            enabled: true,
            account_expires: None,
            permitted_workstations: Vec::new(),
        };
        self.users.insert(name, user);
        self
    }

    /// Accounts created so far, keyed by logon name
    pub fn users(&self) -> &BTreeMap<String, NewGuestUser> {
        &self.users
    }

    /// Committed members of a group
    pub fn members(&self, group: &str) -> &[String] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether [`DirectoryClient::close`] has been called
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl DirectoryClient for InMemoryDirectory {
    fn user_exists(&mut self, sam_account_name: &str) -> DirectoryResult<bool> {
        Ok(self.users.contains_key(sam_account_name))
    }

    fn find_group(&mut self, name: &str) -> DirectoryResult<GroupMembership> {
        if self.groups.contains_key(name) {
            Ok(GroupMembership::new(name, format!("CN={}", name)))
        } else {
            Err(DirectoryError::GroupNotFound(name.to_string()))
        }
    }

    fn create_user(&mut self, user: &NewGuestUser) -> DirectoryResult<()> {
        if self.users.contains_key(&user.sam_account_name) {
            return Err(DirectoryError::Create {
                username: user.sam_account_name.clone(),
                reason: "the account already exists".to_string(),
            });
        }
        debug!(username = %user.sam_account_name, "Stored account in memory");
        self.users.insert(user.sam_account_name.clone(), user.clone());
        Ok(())
    }

    fn add_member(
        &mut self,
        group: &mut GroupMembership,
        user_principal_name: &str,
    ) -> DirectoryResult<()> {
        if !self.users.values().any(|user| user.user_principal_name == user_principal_name) {
            return Err(DirectoryError::PrincipalNotFound(user_principal_name.to_string()));
        }
        group.stage(user_principal_name);
        Ok(())
    }

    fn commit_group(&mut self, group: &mut GroupMembership) -> DirectoryResult<()> {
        let members = self
            .groups
            .get_mut(group.name())
            .ok_or_else(|| DirectoryError::GroupNotFound(group.name().to_string()))?;
        members.extend(group.take_pending());
        Ok(())
    }

    fn close(&mut self) -> DirectoryResult<()> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_user_is_reported() {
        let mut directory = InMemoryDirectory::new().with_existing_user("guest-aaaa");
        assert!(directory.user_exists("guest-aaaa").unwrap());
        assert!(!directory.user_exists("guest-bbbb").unwrap());
    }

    #[test]
    fn test_membership_is_visible_only_after_commit() {
        let mut directory = InMemoryDirectory::new().with_group("Guests");
        let account = crate::types::GuestAccount::new("guest-0001", "abcdef", None, None);
        directory
            .create_user(&NewGuestUser::for_account(&account, "@contoso.com", "SERVER"))
            .unwrap();

        let mut group = directory.find_group("Guests").unwrap();
        directory.add_member(&mut group, "guest-0001@contoso.com").unwrap();
        assert!(directory.members("Guests").is_empty());

        directory.commit_group(&mut group).unwrap();
        assert_eq!(directory.members("Guests"), ["guest-0001@contoso.com".to_string()]);
    }

    #[test]
    fn test_missing_group() {
        let mut directory = InMemoryDirectory::new();
        assert_eq!(
            directory.find_group("Guests").unwrap_err(),
            DirectoryError::GroupNotFound("Guests".to_string())
        );
    }
}

//! LDAP directory client for Active Directory
//!
//! Accounts are created as `CN=<username>` under the configured search base.
//! The password is written at creation time through `unicodePwd`, which Active
//! Directory only accepts over an encrypted connection, so the URL should use
//! `ldaps://`.

use super::{DirectoryClient, DirectoryError, DirectoryResult, GroupMembership, NewGuestUser};
use chrono::{DateTime, TimeZone};
use ldap3::{dn_escape, ldap_escape, LdapConn, LdapConnSettings, Mod, Scope, SearchEntry};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Seconds between 1601-01-01 and 1970-01-01
const FILETIME_UNIX_OFFSET_SECS: i64 = 11_644_473_600;

/// `userAccountControl` value of an enabled normal account
const NORMAL_ACCOUNT: u32 = 0x0200;

/// `userAccountControl` flag marking an account disabled
const ACCOUNT_DISABLE: u32 = 0x0002;

/// Default connection timeout
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Connection parameters for [`LdapDirectory`]
#[derive(Clone)]
pub struct LdapSettings {
    /// Server URL, e.g. `ldaps://dc1.contoso.com`
    pub url: String,
    /// Distinguished name of the service account, empty for an anonymous bind
    pub bind_dn: String,
    /// Password of the service account
    pub bind_password: String,
    /// Container that holds guest accounts and the guest group
    pub search_base: String,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl fmt::Debug for LdapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LdapSettings")
            .field("url", &self.url)
            .field("bind_dn", &self.bind_dn)
            .field("search_base", &self.search_base)
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}

/// Directory client speaking LDAP
pub struct LdapDirectory {
    conn: Option<LdapConn>,
    search_base: String,
}

impl fmt::Debug for LdapDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LdapDirectory")
            .field("search_base", &self.search_base)
            .field("connected", &self.conn.is_some())
            .finish()
    }
}

impl LdapDirectory {
    /// Connect and bind with the given settings
    #[instrument(skip_all, fields(url = %settings.url))]
    pub fn connect(settings: &LdapSettings) -> DirectoryResult<Self> {
        let conn_settings = LdapConnSettings::new().set_conn_timeout(settings.connect_timeout);
        let mut conn = LdapConn::with_settings(conn_settings, &settings.url)
            .map_err(|e| DirectoryError::Connect(e.to_string()))?;

        if !settings.bind_dn.is_empty() {
            conn.simple_bind(&settings.bind_dn, &settings.bind_password)
                .and_then(|result| result.success())
                .map_err(|e| DirectoryError::Bind(e.to_string()))?;
        }

        info!("Connected to directory");
        Ok(Self { conn: Some(conn), search_base: settings.search_base.clone() })
    }

    fn conn(&mut self) -> DirectoryResult<&mut LdapConn> {
        self.conn
            .as_mut()
            .ok_or_else(|| DirectoryError::Connect("connection already closed".to_string()))
    }

    fn search_dns(&mut self, filter: &str) -> DirectoryResult<Vec<String>> {
        let base = self.search_base.clone();
        let (entries, _) = self
            .conn()?
            .search(&base, Scope::Subtree, filter, vec!["1.1"])
            .and_then(|result| result.success())
            .map_err(|e| DirectoryError::Lookup(e.to_string()))?;

        Ok(entries.into_iter().map(|entry| SearchEntry::construct(entry).dn).collect())
    }

    fn user_dn(&self, sam_account_name: &str) -> String {
        format!("CN={},{}", dn_escape(sam_account_name), self.search_base)
    }
}

impl DirectoryClient for LdapDirectory {
    fn user_exists(&mut self, sam_account_name: &str) -> DirectoryResult<bool> {
        let filter = format!("(sAMAccountName={})", ldap_escape(sam_account_name));
        Ok(!self.search_dns(&filter)?.is_empty())
    }

    fn find_group(&mut self, name: &str) -> DirectoryResult<GroupMembership> {
        let escaped = ldap_escape(name);
        let filter =
            format!("(&(objectClass=group)(|(cn={0})(sAMAccountName={0})))", escaped);

        match self.search_dns(&filter)?.into_iter().next() {
            Some(dn) => {
                debug!(group = name, dn = %dn, "Resolved guest group");
                Ok(GroupMembership::new(name, dn))
            }
            None => Err(DirectoryError::GroupNotFound(name.to_string())),
        }
    }

    #[instrument(skip_all, fields(username = %user.sam_account_name))]
    fn create_user(&mut self, user: &NewGuestUser) -> DirectoryResult<()> {
        let dn = self.user_dn(&user.sam_account_name);
        let attributes = user_attributes(user);

        self.conn()?
            .add(&dn, attributes)
            .and_then(|result| result.success())
            .map_err(|e| DirectoryError::Create {
                username: user.sam_account_name.clone(),
                reason: e.to_string(),
            })?;

        info!(dn = %dn, "Created directory account");
        Ok(())
    }

    fn add_member(
        &mut self,
        group: &mut GroupMembership,
        user_principal_name: &str,
    ) -> DirectoryResult<()> {
        let filter = format!("(userPrincipalName={})", ldap_escape(user_principal_name));
        let dn = self
            .search_dns(&filter)?
            .into_iter()
            .next()
            .ok_or_else(|| DirectoryError::PrincipalNotFound(user_principal_name.to_string()))?;

        group.stage(dn);
        Ok(())
    }

    #[instrument(skip_all, fields(group = %group.name()))]
    fn commit_group(&mut self, group: &mut GroupMembership) -> DirectoryResult<()> {
        if group.pending().is_empty() {
            return Ok(());
        }

        let members: HashSet<String> = group.pending().iter().cloned().collect();
        let count = members.len();
        let group_dn = group.distinguished_name().to_string();

        self.conn()?
            .modify(&group_dn, vec![Mod::Add("member".to_string(), members)])
            .and_then(|result| result.success())
            .map_err(|e| DirectoryError::Commit {
                group: group.name().to_string(),
                reason: e.to_string(),
            })?;

        group.take_pending();
        info!(members = count, "Committed group membership");
        Ok(())
    }

    fn close(&mut self) -> DirectoryResult<()> {
        match self.conn.take() {
            Some(mut conn) => conn.unbind().map_err(|e| DirectoryError::Close(e.to_string())),
            None => Ok(()),
        }
    }
}

/// Windows FILETIME (100ns intervals since 1601-01-01 UTC) for an instant
pub fn to_filetime<Tz: TimeZone>(instant: &DateTime<Tz>) -> i64 {
    (instant.timestamp() + FILETIME_UNIX_OFFSET_SECS) * 10_000_000
        + i64::from(instant.timestamp_subsec_nanos() / 100)
}

/// `unicodePwd` encoding: the quoted password as UTF-16LE
pub fn encode_unicode_password(password: &str) -> Vec<u8> {
    format!("\"{}\"", password).encode_utf16().flat_map(|unit| unit.to_le_bytes()).collect()
}

fn user_attributes(user: &NewGuestUser) -> Vec<(Vec<u8>, HashSet<Vec<u8>>)> {
    fn attr(
        name: &str,
        values: impl IntoIterator<Item = Vec<u8>>,
    ) -> (Vec<u8>, HashSet<Vec<u8>>) {
        (name.as_bytes().to_vec(), values.into_iter().collect())
    }

    let control = if user.enabled { NORMAL_ACCOUNT } else { NORMAL_ACCOUNT | ACCOUNT_DISABLE };

    let mut attributes = vec![
        attr(
            "objectClass",
            ["top", "person", "organizationalPerson", "user"]
                .map(|class| class.as_bytes().to_vec()),
        ),
        attr("sAMAccountName", [user.sam_account_name.as_bytes().to_vec()]),
        attr("userPrincipalName", [user.user_principal_name.as_bytes().to_vec()]),
        attr("displayName", [user.display_name.as_bytes().to_vec()]),
        attr("unicodePwd", [encode_unicode_password(&user.password)]),
        attr("userAccountControl", [control.to_string().into_bytes()]),
    ];

    if let Some(description) = &user.description {
        attributes.push(attr("description", [description.as_bytes().to_vec()]));
    }

    if let Some(expires) = &user.account_expires {
        attributes.push(attr("accountExpires", [to_filetime(expires).to_string().into_bytes()]));
    }

    if !user.permitted_workstations.is_empty() {
        let workstations = user.permitted_workstations.join(",");
        attributes.push(attr("userWorkstations", [workstations.into_bytes()]));
    }

    attributes
}

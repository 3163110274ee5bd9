//! Configuration structures for the guest pass provisioner
//!
//! This module contains the command line interface and the resolved
//! provisioning configuration. Persistent values come from the settings
//! store; each recognised key has a default used when the key is absent.

use super::{OutputFormat, ValidityPolicy};
use crate::directory::{LdapSettings, DEFAULT_CONNECT_TIMEOUT_SECS};
use crate::printer::DEFAULT_DATE_FORMAT;
use crate::settings::{SettingsResult, SettingsStore};
use chrono::format::{Item, StrftimeItems};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Names of the recognised settings
pub mod keys {
    /// Instructional text shown to the operator
    pub const LABEL_TEXT: &str = "LabelText";
    /// Wireless network name printed on tickets
    pub const SSID: &str = "SSID";
    /// Directory container for guest accounts
    pub const SEARCH_BASE: &str = "DN";
    /// Serial port of the receipt printer
    pub const PORT: &str = "Port";
    /// Group that grants guest wireless access
    pub const GROUP: &str = "Group";
    /// Suffix appended to usernames to form principal names
    pub const UPN_SUFFIX: &str = "UPNSuffix";
    /// Workstation guest accounts may log on to
    pub const SERVER: &str = "Server";
    /// Directory server URL
    pub const LDAP_URL: &str = "LdapUrl";
    /// Service account used to bind to the directory
    pub const BIND_DN: &str = "BindDN";
    /// Password of the service account, read through the cipher
    pub const BIND_PASSWORD: &str = "BindPassword";
    /// `strftime` pattern for dates on tickets
    pub const DATE_FORMAT: &str = "DateFormat";
}

/// Values used when a setting is absent
pub mod defaults {
    /// Default operator instructions; `$SSID$` is replaced with the network name
    pub const LABEL_TEXT: &str = "Guests must have a wireless pass in order to access the guest \
        wireless. Passes are valid for 1, 2, 5 or 30 days, or unlimited.\n\
        \"Guest Details\" is not printed on the ticket. This is optional for short length \
        passes but required for 30 day or unlimited passes.\n\
        Instructions for connecting will be on the printed ticket, they will need to use the \
        $SSID$ network and the supplied username/password.\n\
        Staff and students should use the $SSID$ network with their existing school login \
        details and should not be using guest logins.";
    /// Default network name
    pub const SSID: &str = "SSID";
    /// Default directory container
    pub const SEARCH_BASE: &str = "ou=Guest Wireless,DC=contoso,DC=com";
    /// Default printer port
    pub const PORT: &str = "COM7";
    /// Default guest group
    pub const GROUP: &str = "G GuestWireless";
    /// Default principal name suffix
    pub const UPN_SUFFIX: &str = "@contoso.com";
    /// Default permitted workstation
    pub const SERVER: &str = "CONTOSOSERVER1";
    /// Default directory URL
    pub const LDAP_URL: &str = "ldaps://contoso.com";
}

/// Placeholder in the label text replaced by the network name
pub const SSID_PLACEHOLDER: &str = "$SSID$";

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "guest-pass",
    version,
    about = "Guest Wireless Pass Generator - creates guest accounts and prints their tickets",
    long_about = "Creates temporary guest wireless accounts in the directory, adds them to the \
guest group and prints a credential ticket for each one on the receipt printer.

EXAMPLES:
    # Print one pass valid for two days
    guest-pass print

    # Print five 30 day passes with a description
    guest-pass print --count 5 --validity 30 --description \"Auditors, week 12\"

    # Preview tickets without touching the directory or printer
    guest-pass print --count 2 --preview

    # Show or change settings
    guest-pass settings list
    guest-pass settings set SSID CampusGuest

CONFIGURATION:
    Settings are read from config.xml next to the executable unless --config
    is given. The file is created on the first settings change."
)]
pub struct CliArgs {
    /// Settings file path
    #[arg(short, long, global = true, help = "Settings file path (XML)")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub debug: bool,

    /// Also write JSON logs to daily files in this directory
    #[arg(long, global = true, help = "Directory for daily log files")]
    pub log_dir: Option<String>,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top level operations
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create guest accounts and print their tickets
    Print(PrintArgs),

    /// Show the operator instructions
    Info,

    /// Print the resolved configuration as JSON
    PrintConfig,

    /// Inspect or change settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

/// Arguments of the `print` command
#[derive(Debug, Clone, Args)]
pub struct PrintArgs {
    /// Number of passes to print
    #[arg(
        short = 'n',
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..=25),
        help = "Number of passes (1-25)"
    )]
    pub count: u32,

    /// Validity tier
    #[arg(
        long,
        default_value = "2",
        help = "Validity period: 1, 2, 5, 30 or never",
        long_help = "Validity period of the passes. A pass of N days expires in the \
                     directory N+1 days after printing. Default: 2"
    )]
    pub validity: ValidityPolicy,

    /// Description stored on each account, not printed
    #[arg(long, help = "Guest details stored on the accounts")]
    pub description: Option<String>,

    /// Use an in-memory directory and write tickets to stdout
    #[arg(long, help = "Preview tickets without the directory or printer")]
    pub preview: bool,

    /// Format of the batch report
    #[arg(long, default_value = "text", help = "Report format (text or json)")]
    pub output_format: OutputFormat,
}

/// Settings subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum SettingsCommand {
    /// List all stored settings
    List,

    /// Show one setting
    Get {
        /// Setting name
        key: String,
        /// Decrypt the stored value
        #[arg(long)]
        encrypted: bool,
    },

    /// Change one setting and save
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
        /// Encrypt the value before storing it
        #[arg(long)]
        encrypted: bool,
    },
}

/// Validation errors for the provisioning configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigValidationError {
    /// A required value is empty
    #[error("Setting {0} must not be empty")]
    EmptySetting(&'static str),

    /// The date pattern cannot be formatted
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),
}

/// Settings resolved for one provisioning run
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProvisioningConfig {
    /// Operator instructions with `$SSID$` placeholders
    pub label_text: String,
    /// Wireless network name
    pub ssid: String,
    /// Directory container for guest accounts
    pub search_base: String,
    /// Serial port of the receipt printer
    pub port: String,
    /// Guest group name
    pub group: String,
    /// Suffix appended to usernames to form principal names
    pub upn_suffix: String,
    /// Workstation guest accounts may log on to
    pub server: String,
    /// Directory server URL
    pub ldap_url: String,
    /// Service account DN, empty for an anonymous bind
    pub bind_dn: String,
    /// Service account password
    #[serde(skip_serializing, default)]
    pub bind_password: String,
    /// `strftime` pattern for dates on tickets
    pub date_format: String,
}

impl fmt::Debug for ProvisioningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisioningConfig")
            .field("ssid", &self.ssid)
            .field("search_base", &self.search_base)
            .field("port", &self.port)
            .field("group", &self.group)
            .field("upn_suffix", &self.upn_suffix)
            .field("server", &self.server)
            .field("ldap_url", &self.ldap_url)
            .field("bind_dn", &self.bind_dn)
            .field("date_format", &self.date_format)
            .finish_non_exhaustive()
    }
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            label_text: defaults::LABEL_TEXT.to_string(),
            ssid: defaults::SSID.to_string(),
            search_base: defaults::SEARCH_BASE.to_string(),
            port: defaults::PORT.to_string(),
            group: defaults::GROUP.to_string(),
            upn_suffix: defaults::UPN_SUFFIX.to_string(),
            server: defaults::SERVER.to_string(),
            ldap_url: defaults::LDAP_URL.to_string(),
            bind_dn: String::new(),
            bind_password: String::new(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl ProvisioningConfig {
    /// Resolve every recognised setting, falling back to its default
    pub fn from_store(store: &SettingsStore) -> SettingsResult<Self> {
        let fallback = Self::default();

        Ok(Self {
            label_text: store.get_or(keys::LABEL_TEXT, &fallback.label_text),
            ssid: store.get_or(keys::SSID, &fallback.ssid),
            search_base: store.get_or(keys::SEARCH_BASE, &fallback.search_base),
            port: store.get_or(keys::PORT, &fallback.port),
            group: store.get_or(keys::GROUP, &fallback.group),
            upn_suffix: store.get_or(keys::UPN_SUFFIX, &fallback.upn_suffix),
            server: store.get_or(keys::SERVER, &fallback.server),
            ldap_url: store.get_or(keys::LDAP_URL, &fallback.ldap_url),
            bind_dn: store.get_or(keys::BIND_DN, &fallback.bind_dn),
            bind_password: store.get_encrypted(keys::BIND_PASSWORD, Some(""))?,
            date_format: store.get_or(keys::DATE_FORMAT, &fallback.date_format),
        })
    }

    /// Operator instructions with the network name filled in
    pub fn label(&self) -> String {
        self.label_text.replace(SSID_PLACEHOLDER, &self.ssid)
    }

    /// Connection parameters for the LDAP directory client
    pub fn ldap_settings(&self) -> LdapSettings {
        LdapSettings {
            url: self.ldap_url.clone(),
            bind_dn: self.bind_dn.clone(),
            bind_password: self.bind_password.clone(),
            search_base: self.search_base.clone(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Print configuration as JSON, without the bind password
    pub fn print_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Validate the values the workflow depends on
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let required = [
            (keys::SEARCH_BASE, &self.search_base),
            (keys::PORT, &self.port),
            (keys::GROUP, &self.group),
            (keys::SERVER, &self.server),
        ];
        if let Some((key, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigValidationError::EmptySetting(*key));
        }

        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigValidationError::InvalidDateFormat(self.date_format.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_substitutes_ssid() {
        let config = ProvisioningConfig { ssid: "CampusGuest".to_string(), ..Default::default() };
        let label = config.label();
        assert!(label.contains("use the CampusGuest network"));
        assert!(!label.contains(SSID_PLACEHOLDER));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ProvisioningConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_date_format_rejected() {
        let config = ProvisioningConfig { date_format: "%Q".to_string(), ..Default::default() };
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidDateFormat("%Q".to_string()))
        );
    }

    #[test]
    fn test_empty_group_rejected() {
        let config = ProvisioningConfig { group: String::new(), ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptySetting("Group")));
    }

    #[test]
    fn test_print_json_omits_password() {
        let config =
            ProvisioningConfig { bind_password: "hunter2".to_string(), ..Default::default() };
        let json = config.print_json().unwrap();
        assert!(!json.contains("hunter2"));
        assert!(json.contains("G GuestWireless"));
    }
}

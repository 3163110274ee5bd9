//! Guest Wireless Pass
//!
//! Provisions temporary guest wireless accounts in a directory service and
//! prints a credential ticket for each one on a serial receipt printer.
//!
//! # Overview
//!
//! An operator chooses how many passes to print, how long they stay valid and
//! an optional description. For every pass the library generates a random
//! username and password, creates an account restricted
//! to one workstation, stages its membership of the guest group and prints a
//! ticket with the network name, the credentials and the last valid day.
//!
//! ## Key Features
//!
//! - **Settings Store**: flat key/value settings in a `DataSet`-style XML file
//! - **Credential Generation**: short random usernames and passwords, retried until unused
//! - **Directory Clients**: LDAP for production, in-memory for previews and tests
//! - **Ticket Rendering**: ESC/POS control sequences and text lines per pass
//! - **Printer Transports**: serial port or a preview writer
//! - **Batch Workflow**: all-or-stop provisioning with a single group commit
//!
//! ## Quick Start
//!
//! ```rust
//! use guest_wireless_pass::*;
//!
//! let config = ProvisioningConfig {
//!     ssid: "CampusGuest".to_string(),
//!     ..Default::default()
//! };
//!
//! let directory = InMemoryDirectory::new().with_group(config.group.clone());
//! let printer = PreviewPrinter::new(Vec::new());
//! let mut workflow = ProvisioningWorkflow::new(config, directory, printer);
//!
//! let request = BatchRequest::new(2, ValidityPolicy::FiveDays, None)?;
//! let report = workflow.run(&request)?;
//! println!("Printed {} passes", report.issued_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Accounts, validity tiers, configuration and the CLI
//! - [`settings`]: XML settings store and value cipher
//! - [`credentials`]: Username and password generation
//! - [`directory`]: Directory client capability and its implementations
//! - [`printer`]: Ticket rendering and printer transports
//! - [`provisioning`]: Batch workflow, errors and logging
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │  Settings   │───►│    Types    │◄───┤ Credentials │
//! │             │    │             │    │             │
//! │ XML Store   │    │ Config      │    │ Generator   │
//! │ Cipher      │    │ Accounts    │    │             │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!                            ▲                   ▲
//!                            │                   │
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │  Directory  │◄───┤Provisioning │───►│   Printer   │
//! │             │    │             │    │             │
//! │ LDAP        │    │ Workflow    │    │ Tickets     │
//! │ In-memory   │    │ Report      │    │ Serial      │
//! └─────────────┘    └─────────────┘    └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod credentials;
pub mod directory;
pub mod printer;
pub mod provisioning;
pub mod settings;

pub mod types;

// Core types and configuration
pub use types::{
    BatchRequest,
    BatchRequestError,
    // Configuration
    CliArgs,
    Command,
    ConfigValidationError,
    // Accounts
    GuestAccount,
    OutputFormat,
    PrintArgs,
    ProvisioningConfig,
    SettingsCommand,
    // Enums
    ValidityPolicy,
};

// Settings
pub use settings::{Cipher, CipherError, NoopCipher, Setting, SettingsError, SettingsStore};

// Credentials
pub use credentials::{ensure_unique, AccountGenerator, Credentials, GenerationError};

// Directory clients
pub use directory::{
    DirectoryClient, DirectoryError, GroupMembership, InMemoryDirectory, LdapDirectory,
    LdapSettings, NewGuestUser,
};

// Printing
pub use printer::{
    PreviewPrinter, PrinterCommand, PrinterTransport, SerialPrinter, Ticket, TicketLine,
    TicketRenderer, TransportError,
};

// Provisioning
pub use provisioning::{
    BatchReport, GuestPassError, GuestPassResult, IssuedPass, LoggingConfig, ProvisioningWorkflow,
};

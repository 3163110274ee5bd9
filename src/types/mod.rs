//! Core types and configuration for the guest pass provisioner
//!
//! This module contains the value types passed between the provisioning
//! components and the configuration resolved from settings and the CLI.
//!
//! # Overview
//!
//! - **Accounts**: the transient [`GuestAccount`] and the [`BatchRequest`] describing one batch
//! - **Enums**: the five [`ValidityPolicy`] tiers and the report [`OutputFormat`]
//! - **Configuration**: [`ProvisioningConfig`] and the command line interface
//!
//! # Usage Example
//!
//! ```rust
//! use guest_wireless_pass::types::*;
//!
//! let request = BatchRequest::new(3, ValidityPolicy::FiveDays, None).unwrap();
//! assert_eq!(request.validity().expiration_offset_days(), Some(6));
//!
//! let config = ProvisioningConfig {
//!     ssid: "CampusGuest".to_string(),
//!     ..Default::default()
//! };
//! assert!(config.label().contains("CampusGuest"));
//! ```

pub mod account;
pub mod config;
pub mod enums;

// Re-export all public types for convenience
pub use account::*;
pub use config::*;
pub use enums::*;

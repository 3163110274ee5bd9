//! Provisioning orchestration
//!
//! This module contains the provisioning workflow, the batch report, the
//! error taxonomy and logging setup.
//!
//! # Overview
//!
//! - **ProvisioningWorkflow**: runs one batch against a directory client and a printer
//! - **BatchReport**: the accounts a batch created
//! - **GuestPassError**: configuration, provisioning and transport failures
//! - **LoggingConfig**: tracing subscriber setup
//!
//! # Usage Example
//!
//! ```rust
//! use guest_wireless_pass::directory::InMemoryDirectory;
//! use guest_wireless_pass::printer::PreviewPrinter;
//! use guest_wireless_pass::provisioning::ProvisioningWorkflow;
//! use guest_wireless_pass::types::{BatchRequest, ProvisioningConfig, ValidityPolicy};
//!
//! let config = ProvisioningConfig::default();
//! let directory = InMemoryDirectory::new().with_group(config.group.clone());
//! let printer = PreviewPrinter::new(Vec::new());
//! let mut workflow = ProvisioningWorkflow::new(config, directory, printer);
//!
//! let request = BatchRequest::new(2, ValidityPolicy::TwoDays, None).unwrap();
//! let report = workflow.run(&request).unwrap();
//! assert_eq!(report.issued_count(), 2);
//! ```

pub mod error;
pub mod logging;
pub mod report;
pub mod workflow;

// Re-export all public types for convenience
pub use error::*;
pub use logging::*;
pub use report::*;
pub use workflow::*;

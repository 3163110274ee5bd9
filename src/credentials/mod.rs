//! Guest credential generation
//!
//! This module produces candidate guest usernames and passwords and searches
//! for a candidate that does not collide with an existing directory account.
//!
//! # Usage Example
//!
//! ```rust
//! use guest_wireless_pass::credentials::{ensure_unique, AccountGenerator, GenerationError};
//!
//! let mut generator = AccountGenerator::with_seed(1);
//! let taken = ["guest-0000"];
//! let credentials = ensure_unique(
//!     || generator.generate_candidate(),
//!     |username| Ok::<_, GenerationError>(taken.contains(&username)),
//! )?;
//! assert!(credentials.username.starts_with("guest-"));
//! # Ok::<(), GenerationError>(())
//! ```

pub mod generator;

pub use generator::*;

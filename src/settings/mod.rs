//! Persistent settings
//!
//! This module contains the XML-backed key/value settings store and the
//! cipher capability used for values that should not be kept in plain text.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use guest_wireless_pass::settings::SettingsStore;
//!
//! let mut store = SettingsStore::open(true, "config.xml")?;
//! let ssid = store.get_or("SSID", "SSID");
//! store.set("SSID", "CampusGuest");
//! if store.changed() {
//!     store.save()?;
//! }
//! # let _ = ssid;
//! # Ok::<(), guest_wireless_pass::settings::SettingsError>(())
//! ```

pub mod cipher;
pub mod store;

pub use cipher::*;
pub use store::*;

//! Batch reporting
//!
//! A [`BatchReport`] lists the accounts a batch created. Passwords are never
//! recorded here; they exist only on the printed tickets.

use crate::types::{BatchRequest, GuestAccount, ValidityPolicy};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One account created by a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedPass {
    /// Account name
    pub username: String,
    /// Principal name the account was added to the group with
    pub user_principal_name: String,
}

/// Outcome of a completed batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Number of passes requested
    pub requested: u32,
    /// Validity tier of the batch
    pub validity: ValidityPolicy,
    /// When the batch started
    pub started_at: DateTime<Local>,
    /// Directory expiration of every account, `None` when they never expire
    pub expires_at: Option<DateTime<Local>>,
    /// Accounts created, in creation order
    pub issued: Vec<IssuedPass>,
}

impl BatchReport {
    /// Empty report for a batch starting at `started_at`
    pub fn new(
        request: &BatchRequest,
        started_at: DateTime<Local>,
        expires_at: Option<DateTime<Local>>,
    ) -> Self {
        Self {
            requested: request.count(),
            validity: request.validity(),
            started_at,
            expires_at,
            issued: Vec::with_capacity(request.count() as usize),
        }
    }

    /// Record a created account
    pub fn record(&mut self, account: &GuestAccount, upn_suffix: &str) {
        self.issued.push(IssuedPass {
            username: account.username.clone(),
            user_principal_name: account.user_principal_name(upn_suffix),
        });
    }

    /// Number of accounts created
    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Printed {} of {} guest passes ({})",
            self.issued.len(),
            self.requested,
            self.validity
        )?;
        match self.expires_at {
            Some(expires_at) => {
                writeln!(f, "Accounts expire: {}", expires_at.format("%Y-%m-%d %H:%M"))?
            }
            None => writeln!(f, "Accounts do not expire")?,
        }
        for pass in &self.issued {
            writeln!(f, "  {}", pass.username)?;
        }
        Ok(())
    }
}

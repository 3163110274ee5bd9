//! Enumeration types for the guest pass provisioner
//!
//! This module contains the validity tiers offered for a batch of passes and
//! the output formats used when reporting a finished batch.

use chrono::{DateTime, Duration, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Validity tiers selectable for a provisioning batch
///
/// Each tier maps to an expiration offset one day longer than its label:
/// a "1 day" pass expires two calendar days after issue. The ticket shows
/// the day before the directory expiry, so the label counts the issuing day
/// as usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ValidityPolicy {
    /// Valid for the rest of today and tomorrow
    OneDay,
    /// Valid for two days after today
    #[default]
    TwoDays,
    /// Valid for five days after today
    FiveDays,
    /// Valid for thirty days after today
    ThirtyDays,
    /// The account never expires
    Never,
}

impl ValidityPolicy {
    /// All tiers in the order they are offered to the operator
    pub const ALL: [ValidityPolicy; 5] = [
        ValidityPolicy::OneDay,
        ValidityPolicy::TwoDays,
        ValidityPolicy::FiveDays,
        ValidityPolicy::ThirtyDays,
        ValidityPolicy::Never,
    ];

    /// Number of days the tier is advertised as
    pub fn advertised_days(&self) -> Option<i64> {
        match self {
            ValidityPolicy::OneDay => Some(1),
            ValidityPolicy::TwoDays => Some(2),
            ValidityPolicy::FiveDays => Some(5),
            ValidityPolicy::ThirtyDays => Some(30),
            ValidityPolicy::Never => None,
        }
    }

    /// Offset from issue time to the directory expiration, in days
    pub fn expiration_offset_days(&self) -> Option<i64> {
        self.advertised_days().map(|days| days + 1)
    }

    /// Whether accounts issued under this tier expire at all
    pub fn expires(&self) -> bool {
        !matches!(self, ValidityPolicy::Never)
    }

    /// Concrete expiration instant for a pass issued at `issued_at`
    pub fn expires_at<Tz: TimeZone>(&self, issued_at: DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.expiration_offset_days().map(|days| issued_at + Duration::days(days))
    }
}

impl fmt::Display for ValidityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidityPolicy::OneDay => write!(f, "1 day"),
            ValidityPolicy::TwoDays => write!(f, "2 days"),
            ValidityPolicy::FiveDays => write!(f, "5 days"),
            ValidityPolicy::ThirtyDays => write!(f, "30 days"),
            ValidityPolicy::Never => write!(f, "Never expires"),
        }
    }
}

impl FromStr for ValidityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "1d" | "1 day" | "one-day" | "oneday" => Ok(ValidityPolicy::OneDay),
            "2" | "2d" | "2 days" | "two-days" | "twodays" => Ok(ValidityPolicy::TwoDays),
            "5" | "5d" | "5 days" | "five-days" | "fivedays" => Ok(ValidityPolicy::FiveDays),
            "30" | "30d" | "30 days" | "thirty-days" | "thirtydays" => {
                Ok(ValidityPolicy::ThirtyDays)
            }
            "never" | "unlimited" | "never expires" => Ok(ValidityPolicy::Never),
            _ => Err(format!(
                "Unknown validity tier: {} (expected 1, 2, 5, 30 or never)",
                s
            )),
        }
    }
}

/// Output format for the batch report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human readable summary
    #[default]
    Text,
    /// JSON document
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone, Utc};

    #[test]
    fn test_expiration_offsets() {
        assert_eq!(ValidityPolicy::OneDay.expiration_offset_days(), Some(2));
        assert_eq!(ValidityPolicy::TwoDays.expiration_offset_days(), Some(3));
        assert_eq!(ValidityPolicy::FiveDays.expiration_offset_days(), Some(6));
        assert_eq!(ValidityPolicy::ThirtyDays.expiration_offset_days(), Some(31));
        assert_eq!(ValidityPolicy::Never.expiration_offset_days(), None);
    }

    #[test]
    fn test_expires_at_adds_offset() {
        let issued = Utc.with_ymd_and_hms(2024, 3, 10, 14, 30, 0).unwrap();
        let expires = ValidityPolicy::FiveDays.expires_at(issued).unwrap();
        assert_eq!(expires, Utc.with_ymd_and_hms(2024, 3, 16, 14, 30, 0).unwrap());
        assert!(ValidityPolicy::Never.expires_at(Local::now()).is_none());
    }

    #[test]
    fn test_default_is_two_days() {
        assert_eq!(ValidityPolicy::default(), ValidityPolicy::TwoDays);
    }

    #[test]
    fn test_validity_from_str() {
        assert_eq!("1".parse::<ValidityPolicy>().unwrap(), ValidityPolicy::OneDay);
        assert_eq!("30d".parse::<ValidityPolicy>().unwrap(), ValidityPolicy::ThirtyDays);
        assert_eq!("Unlimited".parse::<ValidityPolicy>().unwrap(), ValidityPolicy::Never);
        assert!("7".parse::<ValidityPolicy>().is_err());
    }

    #[test]
    fn test_validity_display_round_trips() {
        for policy in ValidityPolicy::ALL {
            assert_eq!(policy.to_string().parse::<ValidityPolicy>().unwrap(), policy);
        }
    }
}

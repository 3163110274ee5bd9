//! Tests for validity tiers and batch requests

use chrono::{Local, TimeZone};
use guest_wireless_pass::types::{BatchRequest, BatchRequestError, ValidityPolicy};

/// Test the expiry instant of each tier
#[test]
fn test_expiry_for_each_tier() {
    let issued = Local.with_ymd_and_hms(2024, 6, 3, 9, 15, 0).unwrap();

    let expected = [
        (ValidityPolicy::OneDay, Some(Local.with_ymd_and_hms(2024, 6, 5, 9, 15, 0).unwrap())),
        (ValidityPolicy::TwoDays, Some(Local.with_ymd_and_hms(2024, 6, 6, 9, 15, 0).unwrap())),
        (ValidityPolicy::FiveDays, Some(Local.with_ymd_and_hms(2024, 6, 9, 9, 15, 0).unwrap())),
        (ValidityPolicy::ThirtyDays, Some(Local.with_ymd_and_hms(2024, 7, 4, 9, 15, 0).unwrap())),
        (ValidityPolicy::Never, None),
    ];

    for (policy, expires_at) in expected {
        assert_eq!(policy.expires_at(issued), expires_at, "{}", policy);
        assert_eq!(policy.expires(), expires_at.is_some());
    }
}

/// Test that tiers are offered in ascending order with two days preselected
#[test]
fn test_tier_order() {
    let days: Vec<_> = ValidityPolicy::ALL.iter().map(|p| p.advertised_days()).collect();
    assert_eq!(days, vec![Some(1), Some(2), Some(5), Some(30), None]);
    assert_eq!(ValidityPolicy::default(), ValidityPolicy::TwoDays);
}

/// Test batch size bounds
#[test]
fn test_batch_request_bounds() {
    assert!(BatchRequest::new(1, ValidityPolicy::OneDay, None).is_ok());
    assert!(BatchRequest::new(25, ValidityPolicy::Never, None).is_ok());

    assert_eq!(
        BatchRequest::new(0, ValidityPolicy::OneDay, None),
        Err(BatchRequestError::InvalidCount { count: 0, min: 1, max: 25 })
    );
    assert!(BatchRequest::new(26, ValidityPolicy::OneDay, None).is_err());
}

/// Test that only non-empty descriptions are kept
#[test]
fn test_batch_request_description() {
    let request = BatchRequest::new(2, ValidityPolicy::ThirtyDays, Some(String::new())).unwrap();
    assert_eq!(request.description(), None);

    let request =
        BatchRequest::new(2, ValidityPolicy::ThirtyDays, Some("Visiting auditors".to_string()))
            .unwrap();
    assert_eq!(request.description(), Some("Visiting auditors"));
    assert_eq!(request.count(), 2);
    assert_eq!(request.validity(), ValidityPolicy::ThirtyDays);
}

/// Test that deserialized requests are held to the same bounds
#[test]
fn test_batch_request_deserialize_bounds() {
    let zero = r#"{"count":0,"validity":"OneDay","description":""}"#;
    assert!(serde_json::from_str::<BatchRequest>(zero).is_err());

    let too_many = r#"{"count":26,"validity":"OneDay","description":null}"#;
    assert!(serde_json::from_str::<BatchRequest>(too_many).is_err());

    let request: BatchRequest =
        serde_json::from_str(r#"{"count":25,"validity":"Never","description":""}"#).unwrap();
    assert_eq!(request.count(), 25);
    assert_eq!(request.validity(), ValidityPolicy::Never);
    assert_eq!(request.description(), None);

    let request: BatchRequest =
        serde_json::from_str(r#"{"count":3,"validity":"FiveDays"}"#).unwrap();
    assert_eq!(request, BatchRequest::new(3, ValidityPolicy::FiveDays, None).unwrap());
}

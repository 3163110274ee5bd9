// Integration tests test your crate's public API. They only have access to items
// in your crate that are marked pub. See the Cargo Targets page of the Cargo Book
// for more information.
//
//   https://doc.rust-lang.org/cargo/reference/cargo-targets.html#integration-tests
//

use guest_wireless_pass::*;

mod validity_policy_tests;

// Include test modules for the workflow and command line
mod cli_argument_parsing_tests;

#[test]
fn test_enum_types() {
    for policy in ValidityPolicy::ALL {
        assert!(!policy.to_string().is_empty());
    }

    for format in [OutputFormat::Text, OutputFormat::Json] {
        assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
    }
}

#[test]
fn test_serialization_roundtrip() {
    let policy = ValidityPolicy::ThirtyDays;
    let json = serde_json::to_string(&policy).unwrap();
    let deserialized: ValidityPolicy = serde_json::from_str(&json).unwrap();
    assert_eq!(policy, deserialized);

    let request = BatchRequest::new(4, ValidityPolicy::FiveDays, Some("Contractors".to_string()))
        .unwrap();
    let json = serde_json::to_string(&request).unwrap();
    let deserialized: BatchRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(request, deserialized);
}

#[test]
fn test_preview_workflow_through_root_exports() {
    let config = ProvisioningConfig { ssid: "Visitors".to_string(), ..Default::default() };
    let directory = InMemoryDirectory::new().with_group(config.group.clone());
    let printer = PreviewPrinter::new(Vec::new());
    let mut workflow = ProvisioningWorkflow::new(config, directory, printer);

    let report = workflow.run(&BatchRequest::default()).unwrap();
    assert_eq!(report.issued_count(), 1);
    assert_eq!(report.validity, ValidityPolicy::TwoDays);
    assert!(report.issued[0].user_principal_name.ends_with("@contoso.com"));
}

#[test]
fn test_error_categories_from_root_exports() {
    let error: GuestPassError =
        BatchRequestError::InvalidCount { count: 30, min: 1, max: 25 }.into();
    assert_eq!(error.category(), "Request");
    assert_eq!(error.exit_code(), 1);
}

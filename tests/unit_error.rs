//! Display output of every DiError variant

use ioc_wire::{DiError, DiResult};
use std::error::Error;

#[test]
fn test_error_display_no_implementation() {
    let error = DiError::NoImplementationFound {
        contract: "app::Repository",
    };
    assert_eq!(error.to_string(), "No implementation found for app::Repository");
}

#[test]
fn test_error_display_ambiguous() {
    let error = DiError::AmbiguousImplementation {
        contract: "app::Baz",
        count: 2,
    };
    assert_eq!(
        error.to_string(),
        "There are 2 implementations of app::Baz; expected a single implementation or a qualifier to resolve the conflict"
    );
}

#[test]
fn test_error_display_instantiation_failed() {
    let error = DiError::InstantiationFailed {
        component: "app::Mailer",
        cause: "smtp host missing".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Failed to instantiate app::Mailer: smtp host missing"
    );
}

#[test]
fn test_error_display_scan_failure() {
    let error = DiError::ScanFailure("invalid namespace `a::`".to_string());
    assert_eq!(error.to_string(), "Component scan failed: invalid namespace `a::`");
}

#[test]
fn test_error_display_circular() {
    let error = DiError::Circular(vec!["ServiceA", "ServiceB", "ServiceA"]);
    assert_eq!(
        error.to_string(),
        "Circular dependency: ServiceA -> ServiceB -> ServiceA"
    );
}

#[test]
fn test_error_display_misc() {
    assert_eq!(DiError::DepthExceeded(8).to_string(), "Max depth 8 exceeded");
    assert_eq!(
        DiError::TypeMismatch("std::string::String").to_string(),
        "Type mismatch for: std::string::String"
    );
    assert_eq!(
        DiError::UnknownComponent("app::Ghost").to_string(),
        "Unknown component: app::Ghost"
    );
    assert_eq!(
        DiError::InvalidConfig("IOC_MAX_DEPTH".to_string()).to_string(),
        "Invalid configuration: IOC_MAX_DEPTH"
    );
}

#[test]
fn test_error_traits() {
    let error = DiError::UnknownComponent("app::Ghost");
    assert!(error.source().is_none());
    assert_eq!(error.clone(), error);
    assert_ne!(error, DiError::UnknownComponent("app::Other"));

    let result: DiResult<u8> = Err(error);
    assert!(result.is_err());
}

//! Environment overrides. Kept in their own test binary so the variables do
//! not leak into other tests.

use compliance_engine::{ComplianceConfig, ComplianceError};

#[test]
fn test_environment_overrides() {
    std::env::set_var("COMPLIANCE__SEVERITY_WEIGHTS__HIGH", "7");
    std::env::set_var("COMPLIANCE__RISK_THRESHOLDS__LOW", "12");

    let config = ComplianceConfig::from_env().unwrap();
    assert_eq!(config.severity_weights.high, 7);
    assert_eq!(config.severity_weights.medium, 2);
    assert_eq!(config.risk_thresholds.low, 12);

    std::env::set_var("COMPLIANCE__RISK_THRESHOLDS__LOW", "40");
    let err = ComplianceConfig::from_env().unwrap_err();
    assert!(matches!(err, ComplianceError::Config(_)));

    std::env::remove_var("COMPLIANCE__SEVERITY_WEIGHTS__HIGH");
    std::env::remove_var("COMPLIANCE__RISK_THRESHOLDS__LOW");
    assert_eq!(ComplianceConfig::from_env().unwrap(), ComplianceConfig::default());
}

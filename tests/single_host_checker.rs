//! Behaviour of the single host checker on small VirtualService batches.

use meshcheck::domain::VirtualService;
use meshcheck::validation::{
    IstioValidationKey, IstioValidations, SingleHostChecker, ValidationSeverity,
};

fn build_virtual_service(name: &str, host: &str) -> VirtualService {
    build_virtual_service_multiple_hosts(name, &[host])
}

fn build_virtual_service_multiple_hosts(name: &str, hosts: &[&str]) -> VirtualService {
    VirtualService::new(name, hosts.iter().copied()).with_namespace("bookinfo")
}

fn check(vss: Vec<VirtualService>) -> IstioValidations {
    let checker = SingleHostChecker::new("bookinfo", vss);
    let validations = checker.check_indexed();
    assert_eq!(validations, checker.check_exhaustive());
    validations
}

fn no_validation_result(validations: &IstioValidations) {
    assert!(validations.is_empty());
    assert!(validations
        .get(&IstioValidationKey::new("virtualservice", "reviews"))
        .is_none());
}

fn present_validation(validations: &IstioValidations, name: &str) {
    assert!(!validations.is_empty());

    let validation = validations
        .get(&IstioValidationKey::new("virtualservice", name))
        .unwrap_or_else(|| panic!("expected validation for {}", name));

    assert!(validation.valid);
    assert_eq!(validation.checks.len(), 1);
    assert_eq!(validation.checks[0].severity, ValidationSeverity::Warning);
    assert_eq!(validation.checks[0].message, "More than one Virtual Service for same host");
    assert_eq!(validation.checks[0].path, "spec/hosts");
}

#[test]
fn one_virtual_service_per_host() {
    let validations = check(vec![
        build_virtual_service("virtual-1", "reviews"),
        build_virtual_service("virtual-2", "ratings"),
    ]);
    no_validation_result(&validations);
}

#[test]
fn one_virtual_service_per_fqdn_host() {
    let validations = check(vec![
        build_virtual_service("virtual-1", "reviews.bookinfo.svc.cluster.local"),
        build_virtual_service("virtual-2", "ratings.bookinfo.svc.cluster.local"),
    ]);
    no_validation_result(&validations);
}

#[test]
fn one_virtual_service_per_fqdn_wildcard_host() {
    let validations = check(vec![
        build_virtual_service("virtual-1", "*.bookinfo.svc.cluster.local"),
        build_virtual_service("virtual-2", "*.eshop.svc.cluster.local"),
    ]);
    no_validation_result(&validations);
}

#[test]
fn repeating_simple_host() {
    let validations = check(vec![
        build_virtual_service("virtual-1", "reviews"),
        build_virtual_service("virtual-2", "reviews"),
    ]);
    present_validation(&validations, "virtual-1");
    present_validation(&validations, "virtual-2");
}

#[test]
fn repeating_fqdn_host() {
    let validations = check(vec![
        build_virtual_service("virtual-1", "reviews.bookinfo.svc.cluster.local"),
        build_virtual_service("virtual-2", "reviews.bookinfo.svc.cluster.local"),
    ]);
    present_validation(&validations, "virtual-1");
    present_validation(&validations, "virtual-2");
}

#[test]
fn short_name_matches_its_fqdn() {
    let validations = check(vec![
        build_virtual_service("virtual-1", "reviews"),
        build_virtual_service("virtual-2", "reviews.bookinfo.svc.cluster.local"),
    ]);
    present_validation(&validations, "virtual-1");
    present_validation(&validations, "virtual-2");
}

#[test]
fn repeating_fqdn_wildcard_host() {
    let validations = check(vec![
        build_virtual_service("virtual-1", "*.bookinfo.svc.cluster.local"),
        build_virtual_service("virtual-2", "*.bookinfo.svc.cluster.local"),
    ]);
    present_validation(&validations, "virtual-1");
    present_validation(&validations, "virtual-2");
}

#[test]
fn included_into_wildcard() {
    let validations = check(vec![
        build_virtual_service("virtual-1", "*.bookinfo.svc.cluster.local"),
        build_virtual_service("virtual-2", "reviews.bookinfo.svc.cluster.local"),
    ]);
    present_validation(&validations, "virtual-1");
    present_validation(&validations, "virtual-2");

    // Same batch, with different order of appearance
    let validations = check(vec![
        build_virtual_service("virtual-1", "reviews.bookinfo.svc.cluster.local"),
        build_virtual_service("virtual-2", "*.bookinfo.svc.cluster.local"),
    ]);
    present_validation(&validations, "virtual-1");
    present_validation(&validations, "virtual-2");
}

#[test]
fn short_host_name_included_into_wildcard() {
    let validations = check(vec![
        build_virtual_service("virtual-1", "*.bookinfo.svc.cluster.local"),
        build_virtual_service("virtual-2", "reviews"),
    ]);
    present_validation(&validations, "virtual-1");
    present_validation(&validations, "virtual-2");
}

#[test]
fn nested_wildcards_are_not_compared_for_coverage() {
    let validations = check(vec![
        build_virtual_service("virtual-1", "*.svc.cluster.local"),
        build_virtual_service("virtual-2", "*.bookinfo.svc.cluster.local"),
    ]);
    no_validation_result(&validations);
}

#[test]
fn multiple_hosts_in_one_service_do_not_self_conflict() {
    let validations = check(vec![build_virtual_service_multiple_hosts(
        "virtual-1",
        &["reviews", "ratings", "mongo.backup.svc.cluster.local"],
    )]);
    no_validation_result(&validations);
}

#[test]
fn multiple_hosts_failing() {
    let validations = check(vec![
        build_virtual_service("virtual-1", "reviews"),
        build_virtual_service_multiple_hosts(
            "virtual-2",
            &["reviews", "mongo.backup.svc.cluster.local", "mongo.staging.svc.cluster.local"],
        ),
    ]);
    assert_eq!(validations.len(), 2);
    present_validation(&validations, "virtual-1");
    present_validation(&validations, "virtual-2");
}

#[test]
fn multiple_hosts_passing() {
    let validations = check(vec![
        build_virtual_service("virtual-1", "reviews"),
        build_virtual_service_multiple_hosts(
            "virtual-2",
            &["ratings", "mongo.backup.svc.cluster.local", "mongo.staging.svc.cluster.local"],
        ),
    ]);
    no_validation_result(&validations);
}

#[test]
fn external_hosts_are_compared_verbatim() {
    let validations = check(vec![
        build_virtual_service("virtual-1", "www.example.com"),
        build_virtual_service("virtual-2", "WWW.example.com"),
        build_virtual_service("virtual-3", "api.example.com"),
    ]);
    assert_eq!(validations.len(), 2);
    present_validation(&validations, "virtual-1");
    present_validation(&validations, "virtual-2");
}

//! Single host checker
//!
//! Flags every VirtualService whose host is identical to, or covered by, a
//! host of another VirtualService in the same namespace. Istio keeps only
//! one VirtualService per effective host, so all parties to a collision are
//! reported, not just the later one.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, instrument};

use super::Checker;
use crate::domain::virtual_service::VIRTUAL_SERVICE_OBJECT_TYPE;
use crate::domain::{CanonicalHost, VirtualService};
use crate::validation::{CheckCode, IstioValidation, IstioValidations, ValidationCheck};

const HOSTS_PATH: &str = "spec/hosts";

/// Host conflict checker for one namespace.
#[derive(Debug, Clone)]
pub struct SingleHostChecker {
    pub namespace: String,
    pub virtual_services: Vec<VirtualService>,
}

impl SingleHostChecker {
    pub fn new<S: Into<String>>(namespace: S, virtual_services: Vec<VirtualService>) -> Self {
        Self {
            namespace: namespace.into(),
            virtual_services,
        }
    }

    /// Find conflicting VirtualServices using domain and suffix indexes.
    ///
    /// Runs in time proportional to the total number of host labels rather
    /// than the square of the host count.
    #[instrument(skip_all, fields(namespace = %self.namespace))]
    pub fn check_indexed(&self) -> IstioValidations {
        let hosts = self.canonical_hosts();

        // Every host by domain, and wildcard hosts by the suffix they cover.
        let mut by_domain: HashMap<&str, BTreeSet<&str>> = HashMap::new();
        let mut wildcards: HashMap<&str, BTreeSet<&str>> = HashMap::new();
        for &(name, ref host) in &hosts {
            if host.is_empty() {
                continue;
            }
            by_domain.entry(host.domain.as_str()).or_default().insert(name);
            if host.wildcard {
                wildcards.entry(host.domain.as_str()).or_default().insert(name);
            }
        }

        let mut conflicted: BTreeSet<&str> = BTreeSet::new();

        for owners in by_domain.values().filter(|owners| owners.len() > 1) {
            conflicted.extend(owners.iter().copied());
        }

        if !wildcards.is_empty() {
            for &(name, ref host) in hosts.iter().filter(|(_, h)| !h.wildcard && !h.is_empty()) {
                for suffix in host.proper_suffixes() {
                    let Some(owners) = wildcards.get(suffix) else {
                        continue;
                    };
                    let others: Vec<&str> =
                        owners.iter().copied().filter(|owner| *owner != name).collect();
                    if !others.is_empty() {
                        conflicted.insert(name);
                        conflicted.extend(others);
                    }
                }
            }
        }

        self.report(hosts.len(), conflicted)
    }

    /// Reference implementation comparing every pair of hosts.
    ///
    /// Always agrees with [`SingleHostChecker::check`]; kept for auditing and
    /// for cross-checking the indexed path.
    #[instrument(skip_all, fields(namespace = %self.namespace))]
    pub fn check_exhaustive(&self) -> IstioValidations {
        let hosts = self.canonical_hosts();
        let mut conflicted: BTreeSet<&str> = BTreeSet::new();

        for (i, &(name_a, ref host_a)) in hosts.iter().enumerate() {
            for &(name_b, ref host_b) in &hosts[i + 1..] {
                if name_a != name_b && host_a.conflicts_with(host_b) {
                    conflicted.insert(name_a);
                    conflicted.insert(name_b);
                }
            }
        }

        self.report(hosts.len(), conflicted)
    }

    fn canonical_hosts(&self) -> Vec<(&str, CanonicalHost)> {
        self.virtual_services
            .iter()
            .flat_map(|vs| {
                vs.canonical_hosts(&self.namespace)
                    .map(move |host| (vs.name.as_str(), host))
            })
            .collect()
    }

    fn report(&self, host_count: usize, conflicted: BTreeSet<&str>) -> IstioValidations {
        debug!(
            virtual_services = self.virtual_services.len(),
            hosts = host_count,
            conflicted = conflicted.len(),
            "Checked VirtualService hosts"
        );

        conflicted
            .into_iter()
            .map(|name| {
                IstioValidation::new(VIRTUAL_SERVICE_OBJECT_TYPE, name).with_check(
                    ValidationCheck::build(CheckCode::VirtualServiceSingleHost, HOSTS_PATH),
                )
            })
            .collect()
    }
}

impl Checker for SingleHostChecker {
    fn name(&self) -> &'static str {
        "single_host"
    }

    fn check(&self) -> IstioValidations {
        let _span = crate::check_span!(self.name(), self.namespace).entered();
        self.check_indexed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::IstioValidationKey;

    fn key(name: &str) -> IstioValidationKey {
        IstioValidationKey::new("virtualservice", name)
    }

    fn both_paths(checker: &SingleHostChecker) -> IstioValidations {
        let indexed = checker.check_indexed();
        assert_eq!(indexed, checker.check_exhaustive());
        indexed
    }

    #[test]
    fn same_name_is_never_compared() {
        let checker = SingleHostChecker::new(
            "bookinfo",
            vec![VirtualService::new("virtual-1", ["reviews", "reviews.bookinfo.svc.cluster.local"])],
        );
        assert!(both_paths(&checker).is_empty());
    }

    #[test]
    fn wildcard_inside_one_declaration_is_not_self_conflict() {
        let checker = SingleHostChecker::new(
            "bookinfo",
            vec![
                VirtualService::new("virtual-1", ["*.bookinfo.svc.cluster.local", "reviews"]),
                VirtualService::new("virtual-2", ["ratings.eshop.svc.cluster.local"]),
            ],
        );
        assert!(both_paths(&checker).is_empty());
    }

    #[test]
    fn one_wildcard_flags_every_covered_declaration() {
        let checker = SingleHostChecker::new(
            "bookinfo",
            vec![
                VirtualService::new("virtual-1", ["reviews"]),
                VirtualService::new("virtual-2", ["ratings"]),
                VirtualService::new("virtual-3", ["*.bookinfo.svc.cluster.local"]),
                VirtualService::new("virtual-4", ["details.eshop.svc.cluster.local"]),
            ],
        );

        let validations = both_paths(&checker);
        assert_eq!(validations.len(), 3);
        assert!(validations.contains_key(&key("virtual-1")));
        assert!(validations.contains_key(&key("virtual-2")));
        assert!(validations.contains_key(&key("virtual-3")));
        assert!(!validations.contains_key(&key("virtual-4")));
    }

    #[test]
    fn flagged_once_despite_many_conflicts() {
        let checker = SingleHostChecker::new(
            "bookinfo",
            vec![
                VirtualService::new("virtual-1", ["reviews", "ratings"]),
                VirtualService::new("virtual-2", ["reviews"]),
                VirtualService::new("virtual-3", ["ratings", "*.bookinfo.svc.cluster.local"]),
            ],
        );

        let validations = both_paths(&checker);
        assert_eq!(validations.len(), 3);
        for validation in validations.values() {
            assert!(validation.valid);
            assert_eq!(validation.checks.len(), 1);
        }
    }

    #[test]
    fn malformed_hosts_never_conflict() {
        let checker = SingleHostChecker::new(
            "bookinfo",
            vec![
                VirtualService::new("virtual-1", [""]),
                VirtualService::new("virtual-2", ["", "*."]),
            ],
        );
        assert!(both_paths(&checker).is_empty());
    }

    #[test]
    fn bare_star_covers_namespace_services() {
        let checker = SingleHostChecker::new(
            "bookinfo",
            vec![
                VirtualService::new("virtual-1", ["*"]),
                VirtualService::new("virtual-2", ["reviews"]),
            ],
        );
        assert_eq!(both_paths(&checker).len(), 2);
    }

    #[test]
    fn checker_trait_runs_indexed_path() {
        let checker = SingleHostChecker::new(
            "bookinfo",
            vec![
                VirtualService::new("virtual-1", ["reviews"]),
                VirtualService::new("virtual-2", ["*.bookinfo.svc.cluster.local"]),
            ],
        );
        assert_eq!(Checker::name(&checker), "single_host");
        assert_eq!(Checker::check(&checker), checker.check_indexed());
        assert_eq!(Checker::check(&checker).len(), 2);
    }

    #[test]
    fn empty_batch_is_empty_report() {
        let checker = SingleHostChecker::new("bookinfo", vec![]);
        assert!(both_paths(&checker).is_empty());
    }
}

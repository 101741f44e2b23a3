//! Checkers
//!
//! A checker inspects a batch of objects from one namespace and reports the
//! objects it finds problems with. Results from several checkers are merged
//! into a single report by [`run_checkers`].

mod single_host;

pub use single_host::SingleHostChecker;

use tracing::debug;

use super::IstioValidations;

/// A single, independent validation over a batch of objects.
pub trait Checker {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Run the check. Checkers never fail: absence from the result means the
    /// object passed.
    fn check(&self) -> IstioValidations;
}

/// Run every checker and merge their reports.
pub fn run_checkers(checkers: &[&dyn Checker]) -> IstioValidations {
    checkers.iter().fold(IstioValidations::new(), |acc, checker| {
        let validations = checker.check();
        debug!(checker = checker.name(), flagged = validations.len(), "Checker finished");
        acc.merge(validations)
    })
}

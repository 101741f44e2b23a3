//! # Validation Results
//!
//! Result model shared by every checker. A report is a sparse mapping keyed
//! by `(object type, name)`: an object with no issues has no entry at all.
//!
//! Checkers produce [`IstioValidations`] independently; callers combine them
//! with [`IstioValidations::merge`], which is a union over keys and is
//! idempotent, so the order in which checkers (or shards of one checker)
//! report does not change the final result.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

pub mod checkers;
pub mod checks;

pub use checkers::{run_checkers, Checker, SingleHostChecker};
pub use checks::CheckCode;

/// Severity of a single validation check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Warning,
    Error,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationSeverity::Warning => "warning",
            ValidationSeverity::Error => "error",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding attached to an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub message: String,
    pub severity: ValidationSeverity,
    /// Path of the offending field inside the object, e.g. `spec/hosts`.
    pub path: String,
}

impl ValidationCheck {
    /// Build a check from the catalog entry for `code`.
    pub fn build<P: Into<String>>(code: CheckCode, path: P) -> Self {
        Self {
            message: code.message().to_string(),
            severity: code.severity(),
            path: path.into(),
        }
    }
}

/// Identity of a validated object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IstioValidationKey {
    pub object_type: String,
    pub name: String,
}

impl IstioValidationKey {
    pub fn new<T: Into<String>, N: Into<String>>(object_type: T, name: N) -> Self {
        Self {
            object_type: object_type.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for IstioValidationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.object_type, self.name)
    }
}

/// Validation outcome for one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IstioValidation {
    pub name: String,
    pub object_type: String,
    /// False only when at least one check makes the object unusable.
    pub valid: bool,
    pub checks: Vec<ValidationCheck>,
}

impl IstioValidation {
    pub fn new<T: Into<String>, N: Into<String>>(object_type: T, name: N) -> Self {
        Self {
            name: name.into(),
            object_type: object_type.into(),
            valid: true,
            checks: Vec::new(),
        }
    }

    pub fn with_check(mut self, check: ValidationCheck) -> Self {
        self.push_check(check);
        self
    }

    pub fn key(&self) -> IstioValidationKey {
        IstioValidationKey::new(self.object_type.clone(), self.name.clone())
    }

    fn push_check(&mut self, check: ValidationCheck) {
        if !self.checks.contains(&check) {
            self.checks.push(check);
        }
    }

    /// Fold another validation of the same object into this one.
    fn absorb(&mut self, other: IstioValidation) {
        self.valid = self.valid && other.valid;
        for check in other.checks {
            self.push_check(check);
        }
    }
}

/// Sparse validation report keyed by object identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IstioValidations(BTreeMap<IstioValidationKey, IstioValidation>);

impl IstioValidations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &IstioValidationKey) -> Option<&IstioValidation> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &IstioValidationKey) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &IstioValidationKey> {
        self.0.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &IstioValidation> {
        self.0.values()
    }

    /// Insert a validation, merging with an existing entry for the same key.
    pub fn insert(&mut self, validation: IstioValidation) {
        match self.0.entry(validation.key()) {
            btree_map::Entry::Occupied(mut entry) => entry.get_mut().absorb(validation),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(validation);
            }
        }
    }

    /// Union of two reports. Shared keys keep every distinct check and are
    /// valid only if both sides were.
    pub fn merge(mut self, other: IstioValidations) -> Self {
        for validation in other.0.into_values() {
            self.insert(validation);
        }
        self
    }

    /// Number of checks of the given severity across all objects.
    pub fn count_severity(&self, severity: ValidationSeverity) -> usize {
        self.0
            .values()
            .flat_map(|v| v.checks.iter())
            .filter(|c| c.severity == severity)
            .count()
    }
}

impl FromIterator<IstioValidation> for IstioValidations {
    fn from_iter<I: IntoIterator<Item = IstioValidation>>(iter: I) -> Self {
        let mut validations = IstioValidations::new();
        for validation in iter {
            validations.insert(validation);
        }
        validations
    }
}

impl IntoIterator for IstioValidations {
    type Item = (IstioValidationKey, IstioValidation);
    type IntoIter = btree_map::IntoIter<IstioValidationKey, IstioValidation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// Keys are composite, so the report is written as a list of validations
// (each of which carries its own name and object type).
impl Serialize for IstioValidations {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.values())
    }
}

impl<'de> Deserialize<'de> for IstioValidations {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let validations = Vec::<IstioValidation>::deserialize(deserializer)?;
        Ok(validations.into_iter().collect())
    }
}

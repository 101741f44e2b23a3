//! # meshcheck
//!
//! Detects host-routing conflicts between Istio VirtualServices that share a
//! namespace. The mesh routes each effective hostname through a single
//! VirtualService, so any VirtualService whose host is identical to, or
//! covered by, a host of another one is flagged.
//!
//! ## Architecture
//!
//! ```text
//! manifest loading → domain (host normalization) → validation checkers → report
//!                                                         ↓
//!                                          CLI output (json / yaml / table)
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use meshcheck::domain::VirtualService;
//! use meshcheck::validation::{IstioValidationKey, SingleHostChecker};
//!
//! let checker = SingleHostChecker::new(
//!     "bookinfo",
//!     vec![
//!         VirtualService::new("virtual-1", ["reviews"]),
//!         VirtualService::new("virtual-2", ["reviews.bookinfo.svc.cluster.local"]),
//!     ],
//! );
//!
//! let validations = checker.check_indexed();
//! assert!(validations.contains_key(&IstioValidationKey::new("virtualservice", "virtual-1")));
//! assert!(validations.contains_key(&IstioValidationKey::new("virtualservice", "virtual-2")));
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod manifest;
pub mod observability;
pub mod validation;

// Re-export commonly used types and traits
pub use config::AppConfig;
pub use errors::{MeshCheckError, Result};
pub use validation::{IstioValidations, SingleHostChecker};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

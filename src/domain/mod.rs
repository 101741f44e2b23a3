//! Domain layer
//!
//! Pure domain entities for host conflict checking. Nothing in here touches
//! the filesystem, the network, or a logging subscriber.
//!
//! ## Module Organization
//!
//! - `host`: hostname normalization and wildcard coverage rules
//! - `virtual_service`: the VirtualService route declaration

pub mod host;
pub mod virtual_service;

pub use host::{CanonicalHost, CLUSTER_DOMAIN_SUFFIX};
pub use virtual_service::VirtualService;

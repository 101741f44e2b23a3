//! Check catalog
//!
//! Every finding a checker can emit has a code with a fixed message and
//! severity, so the wording stays identical wherever the check is raised.

use std::fmt;

use super::ValidationSeverity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckCode {
    /// Two VirtualServices claim the same (or an overlapping) host.
    VirtualServiceSingleHost,
}

impl CheckCode {
    pub fn code(&self) -> &'static str {
        match self {
            CheckCode::VirtualServiceSingleHost => "virtualservices.singlehost",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            CheckCode::VirtualServiceSingleHost => "More than one Virtual Service for same host",
        }
    }

    pub fn severity(&self) -> ValidationSeverity {
        match self {
            CheckCode::VirtualServiceSingleHost => ValidationSeverity::Warning,
        }
    }
}

impl fmt::Display for CheckCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

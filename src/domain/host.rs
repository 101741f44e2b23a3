//! Host domain types
//!
//! Normalization and coverage rules for VirtualService hostnames. Short
//! in-namespace names, cluster FQDNs and wildcard patterns are all reduced
//! to a [`CanonicalHost`] before any comparison takes place.

use std::fmt;

/// Cluster-local DNS suffix appended to short service names.
pub const CLUSTER_DOMAIN_SUFFIX: &str = "svc.cluster.local";

const WILDCARD_PREFIX: &str = "*.";

/// A hostname reduced to an absolute domain plus a wildcard marker.
///
/// For wildcard hosts `domain` holds the suffix the wildcard label is
/// attached to, so `*.bookinfo.svc.cluster.local` is stored as
/// `bookinfo.svc.cluster.local` with `wildcard = true`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalHost {
    pub domain: String,
    pub wildcard: bool,
}

impl CanonicalHost {
    /// Normalize a raw hostname in the context of `namespace`.
    ///
    /// Never fails: hosts that do not look like domains normalize to
    /// themselves and simply fail to match anything later on.
    pub fn parse(raw: &str, namespace: &str) -> Self {
        let raw = raw.to_ascii_lowercase();

        if raw == "*" {
            return Self {
                domain: format!("{}.{}", namespace, CLUSTER_DOMAIN_SUFFIX),
                wildcard: true,
            };
        }

        let (rest, wildcard) = match raw.strip_prefix(WILDCARD_PREFIX) {
            Some(rest) => (rest, true),
            None => (raw.as_str(), false),
        };

        Self { domain: qualify(rest, namespace), wildcard }
    }

    /// An exact (non-wildcard) host.
    pub fn exact<S: Into<String>>(domain: S) -> Self {
        Self { domain: domain.into(), wildcard: false }
    }

    /// A wildcard host over `suffix`.
    pub fn wildcard<S: Into<String>>(suffix: S) -> Self {
        Self { domain: suffix.into(), wildcard: true }
    }

    /// Hosts with an empty domain are malformed and never conflict.
    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    /// Whether both hosts claim the same effective hostname.
    ///
    /// Equal domains always conflict. A wildcard conflicts with an exact host
    /// it covers. Two wildcards conflict only when their suffixes are equal.
    pub fn conflicts_with(&self, other: &CanonicalHost) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        if self.domain == other.domain {
            return true;
        }

        match (self.wildcard, other.wildcard) {
            (true, false) => self.covers(other),
            (false, true) => other.covers(self),
            _ => false,
        }
    }

    /// Whether this wildcard matches `other`'s full domain.
    ///
    /// The match is label aligned: `*.bookinfo.svc.cluster.local` covers
    /// `reviews.bookinfo.svc.cluster.local` but not
    /// `reviewsbookinfo.svc.cluster.local`.
    pub fn covers(&self, other: &CanonicalHost) -> bool {
        if !self.wildcard || self.is_empty() {
            return false;
        }

        other
            .domain
            .strip_suffix(self.domain.as_str())
            .and_then(|head| head.strip_suffix('.'))
            .is_some_and(|label| !label.is_empty())
    }

    /// Every label-aligned suffix of the domain, excluding the domain itself,
    /// longest first.
    ///
    /// `a.b.c` yields `b.c` then `c`.
    pub fn proper_suffixes(&self) -> impl Iterator<Item = &str> + '_ {
        self.domain
            .match_indices('.')
            .filter(|(idx, _)| *idx > 0)
            .map(move |(idx, _)| &self.domain[idx + 1..])
            .filter(|suffix| !suffix.is_empty())
    }
}

impl fmt::Display for CanonicalHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.wildcard {
            write!(f, "{}{}", WILDCARD_PREFIX, self.domain)
        } else {
            f.write_str(&self.domain)
        }
    }
}

/// Expand a single-label name into its cluster FQDN; anything with a dot
/// (or nothing at all) is kept verbatim.
fn qualify(name: &str, namespace: &str) -> String {
    if name.is_empty() || name.contains('.') {
        return name.to_string();
    }

    format!("{}.{}.{}", name, namespace, CLUSTER_DOMAIN_SUFFIX)
}

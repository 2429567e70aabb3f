//! Locations, branch scopes and the ancestor lookup seam.

pub mod client;

pub use client::LookupClient;

use serde::{Deserialize, Serialize};

/// One node in the hierarchical resource tree (project, directory, file).
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Location {
    pub key: String,
    pub name: String,
}

impl Location {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Location {
        Location {
            key: key.into(),
            name: name.into(),
        }
    }
}

/// Locations are compared by key identity only; display names don't matter.
impl PartialEq for Location {
    fn eq(&self, other: &Location) -> bool {
        self.key == other.key
    }
}

/// Branch or revision context a lookup applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchScope {
    Main,
    Branch(String),
    PullRequest(String),
}

impl BranchScope {
    /// Query parameter selecting this scope.
    ///
    /// The main branch needs none: it is what the server resolves when the
    /// qualifier is absent.
    pub fn query_param(&self) -> Option<(&'static str, &str)> {
        match self {
            BranchScope::Main => None,
            BranchScope::Branch(name) => Some(("branch", name)),
            BranchScope::PullRequest(key) => Some(("pullRequest", key)),
        }
    }
}

/// Equivalence over optional scopes.
///
/// An absent qualifier and an explicit `Main` resolve to the same lookup, so
/// they compare equal here; named branches and pull requests compare by
/// their identifier.
pub fn same_scope(a: Option<&BranchScope>, b: Option<&BranchScope>) -> bool {
    use BranchScope::*;

    match (a, b) {
        (None, None) => true,
        (Some(Main), None) | (None, Some(Main)) => true,
        (Some(Main), Some(Main)) => true,
        (Some(Branch(left)), Some(Branch(right))) => left == right,
        (Some(PullRequest(left)), Some(PullRequest(right))) => left == right,
        _ => false,
    }
}

/// Error types that can occur while resolving an ancestor chain.
#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    /// HTTP request failed during communication with the server
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned an error response
    #[error("lookup API error: {0}")]
    Api(String),

    /// TLS/SSL configuration failed when setting up the HTTPS client
    #[error("TLS configuration error: {0}")]
    TlsConfig(String),
}

/// Resolves the ordered ancestor chain of a location.
///
/// Implementations return the chain from the root down to (and including)
/// the requested location. The widget treats every failure as non-fatal.
pub trait AncestorLookup: Send + Sync {
    fn fetch_ancestors(
        &self,
        key: &str,
        branch: Option<&BranchScope>,
    ) -> Result<Vec<Location>, LookupError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_equality_uses_key_identity() {
        let a = Location::new("prj:src/lib.rs", "lib.rs");
        let b = Location::new("prj:src/lib.rs", "renamed.rs");
        let c = Location::new("prj:src/main.rs", "lib.rs");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn main_scope_is_equivalent_to_absent() {
        assert!(same_scope(None, None));
        assert!(same_scope(Some(&BranchScope::Main), None));
        assert!(same_scope(None, Some(&BranchScope::Main)));
    }

    #[test]
    fn named_scopes_compare_by_identifier() {
        let feature = BranchScope::Branch("feature/x".to_string());
        let other = BranchScope::Branch("feature/y".to_string());
        let pr = BranchScope::PullRequest("42".to_string());

        assert!(same_scope(Some(&feature), Some(&feature.clone())));
        assert!(!same_scope(Some(&feature), Some(&other)));
        assert!(!same_scope(Some(&feature), Some(&pr)));
        assert!(!same_scope(Some(&feature), None));
    }

    #[test]
    fn query_param_maps_scope_kinds() {
        assert_eq!(BranchScope::Main.query_param(), None);
        assert_eq!(
            BranchScope::Branch("dev".to_string()).query_param(),
            Some(("branch", "dev"))
        );
        assert_eq!(
            BranchScope::PullRequest("42".to_string()).query_param(),
            Some(("pullRequest", "42"))
        );
    }
}

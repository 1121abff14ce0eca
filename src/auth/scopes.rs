//! OAuth scope handling for the Nexar identity service.
//!
//! This module provides the [`Scope`] enumeration of known Nexar scopes and
//! the [`ScopeSet`] collection used when requesting tokens.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A single Nexar OAuth scope.
///
/// Scopes gate which API surfaces a token may call. The set is fixed by the
/// identity service; unknown strings are rejected at parse time.
///
/// # Example
///
/// ```rust
/// use nexar_api::Scope;
///
/// let scope: Scope = "design.domain".parse().unwrap();
/// assert_eq!(scope, Scope::DesignDomain);
/// assert_eq!(scope.as_str(), "design.domain");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
    /// Access to the supply-chain (parts) API.
    SupplyDomain,
    /// Access to the design (workspaces, projects) API.
    DesignDomain,
    /// Access to user-level resources.
    UserAccess,
    /// Requests a refresh token alongside the access token.
    OfflineAccess,
}

impl Scope {
    /// Returns the wire form of the scope as sent to the identity service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SupplyDomain => "supply.domain",
            Self::DesignDomain => "design.domain",
            Self::UserAccess => "user.access",
            Self::OfflineAccess => "offline_access",
        }
    }
}

impl FromStr for Scope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "supply.domain" => Ok(Self::SupplyDomain),
            "design.domain" => Ok(Self::DesignDomain),
            "user.access" => Ok(Self::UserAccess),
            "offline_access" => Ok(Self::OfflineAccess),
            other => Err(ConfigError::UnknownScope {
                scope: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered set of Nexar OAuth scopes.
///
/// The wire form is the OAuth2 convention: scope names joined by single
/// spaces. Parsing accepts the same form and deduplicates.
///
/// # Serialization
///
/// `ScopeSet` serializes to and deserializes from the space-separated string
/// for compact JSON representation.
///
/// # Example
///
/// ```rust
/// use nexar_api::{Scope, ScopeSet};
///
/// let scopes: ScopeSet = "design.domain user.access".parse().unwrap();
/// assert!(scopes.contains(Scope::DesignDomain));
/// assert_eq!(scopes.to_string(), "design.domain user.access");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ScopeSet {
    scopes: BTreeSet<Scope>,
}

impl ScopeSet {
    /// Creates an empty scope set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scopes: BTreeSet::new(),
        }
    }

    /// The scope set for supply-chain queries: `supply.domain`.
    #[must_use]
    pub fn supply() -> Self {
        Self::from_iter([Scope::SupplyDomain])
    }

    /// The scope set for design queries: `design.domain`, `user.access`
    /// and `offline_access`.
    ///
    /// Design-domain tokens are user-scoped and refreshable, so the bundle
    /// includes the offline-access scope.
    #[must_use]
    pub fn design() -> Self {
        Self::from_iter([Scope::DesignDomain, Scope::UserAccess, Scope::OfflineAccess])
    }

    /// Returns `true` if the scope set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Returns `true` if the set contains `scope`.
    #[must_use]
    pub fn contains(&self, scope: Scope) -> bool {
        self.scopes.contains(&scope)
    }

    /// Adds a scope to the set.
    pub fn insert(&mut self, scope: Scope) {
        self.scopes.insert(scope);
    }

    /// Returns an iterator over the scopes in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = Scope> + '_ {
        self.scopes.iter().copied()
    }
}

impl FromIterator<Scope> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = Scope>>(iter: I) -> Self {
        Self {
            scopes: iter.into_iter().collect(),
        }
    }
}

impl From<Scope> for ScopeSet {
    fn from(scope: Scope) -> Self {
        Self::from_iter([scope])
    }
}

impl FromStr for ScopeSet {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut scopes = BTreeSet::new();
        for part in s.split_whitespace() {
            scopes.insert(part.parse::<Scope>()?);
        }
        Ok(Self { scopes })
    }
}

impl fmt::Display for ScopeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.scopes.iter().map(|s| s.as_str()).collect();
        f.write_str(&joined.join(" "))
    }
}

impl Serialize for ScopeSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ScopeSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_parses_known_values() {
        assert_eq!("supply.domain".parse::<Scope>().unwrap(), Scope::SupplyDomain);
        assert_eq!("design.domain".parse::<Scope>().unwrap(), Scope::DesignDomain);
        assert_eq!("user.access".parse::<Scope>().unwrap(), Scope::UserAccess);
        assert_eq!(
            "offline_access".parse::<Scope>().unwrap(),
            Scope::OfflineAccess
        );
    }

    #[test]
    fn test_scope_rejects_unknown_value() {
        let result = "admin.domain".parse::<Scope>();
        assert!(matches!(result, Err(ConfigError::UnknownScope { .. })));
    }

    #[test]
    fn test_scope_set_parses_space_separated() {
        let scopes: ScopeSet = "design.domain user.access".parse().unwrap();
        assert!(scopes.contains(Scope::DesignDomain));
        assert!(scopes.contains(Scope::UserAccess));
        assert!(!scopes.contains(Scope::SupplyDomain));
    }

    #[test]
    fn test_scope_set_deduplicates() {
        let scopes: ScopeSet = "supply.domain supply.domain".parse().unwrap();
        assert_eq!(scopes.iter().count(), 1);
    }

    #[test]
    fn test_scope_set_display_is_space_joined() {
        let scopes = ScopeSet::design();
        let wire = scopes.to_string();
        assert!(wire.contains("design.domain"));
        assert!(wire.contains("user.access"));
        assert!(wire.contains("offline_access"));
        assert!(!wire.contains(','));
    }

    #[test]
    fn test_supply_bundle() {
        let scopes = ScopeSet::supply();
        assert!(scopes.contains(Scope::SupplyDomain));
        assert_eq!(scopes.iter().count(), 1);
    }

    #[test]
    fn test_design_bundle_includes_offline_access() {
        let scopes = ScopeSet::design();
        assert!(scopes.contains(Scope::DesignDomain));
        assert!(scopes.contains(Scope::OfflineAccess));
    }

    #[test]
    fn test_empty_scope_set() {
        let empty = ScopeSet::new();
        assert!(empty.is_empty());
        assert_eq!(empty.to_string(), "");
    }

    #[test]
    fn test_scope_set_serde_round_trip() {
        let original = ScopeSet::design();
        let json = serde_json::to_string(&original).unwrap();
        let parsed: ScopeSet = serde_json::from_str(&json).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_scope_set_deserialize_rejects_unknown() {
        let result: Result<ScopeSet, _> = serde_json::from_str(r#""nope.domain""#);
        assert!(result.is_err());
    }
}

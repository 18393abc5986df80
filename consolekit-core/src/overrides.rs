//! Read-only role-override configuration.
//!
//! Overrides map a scope key (an account name or a realm name) to a
//! `default_role`. The core only ever reads them; ownership of the backing
//! configuration stays with the consumer. Account scope always beats realm
//! scope, and the precedence is re-evaluated at every lookup rather than
//! cached across accounts.

use std::collections::HashMap;

use serde::Deserialize;

/// The scope an override is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideScope<'a> {
    /// Override configured for a single account, keyed by account name.
    Account(&'a str),
    /// Override configured for a whole realm, keyed by realm name.
    Realm(&'a str),
}

/// Read-only key→role capability consumed by the role resolver.
pub trait RoleOverrides {
    /// Returns the configured `default_role` for the scope, if any.
    fn default_role(&self, scope: OverrideScope<'_>) -> Option<String>;
}

/// [`RoleOverrides`] backed by two in-memory maps, deserialized from the
/// consumer's configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaticOverrides {
    /// Account-name-keyed overrides.
    #[serde(default)]
    pub accounts: HashMap<String, String>,
    /// Realm-name-keyed overrides.
    #[serde(default)]
    pub realms: HashMap<String, String>,
}

impl RoleOverrides for StaticOverrides {
    fn default_role(&self, scope: OverrideScope<'_>) -> Option<String> {
        match scope {
            OverrideScope::Account(name) => self.accounts.get(name).cloned(),
            OverrideScope::Realm(name) => self.realms.get(name).cloned(),
        }
    }
}

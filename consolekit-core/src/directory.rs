//! Read-only lookup over the persisted account catalog.
//!
//! The catalog is produced by an external provisioning process (SSO
//! directory sync); this crate never creates or mutates accounts. All
//! lookups are scoped to a single realm: returning an account from another
//! realm is a correctness violation, and an identifier that matches nothing
//! yields an empty result, not an error.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::error::BrokerError;

/// An account known to the catalog.
///
/// `name` is unique within a realm; `number` is globally unique. Always
/// materialized from a catalog entry and the realm it was found under,
/// never deserialized directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Catalog-assigned identifier.
    pub id: u64,
    /// Human-readable account name, unique within its realm.
    pub name: String,
    /// The 12-digit account number, globally unique.
    pub number: String,
    /// The realm this account belongs to.
    pub realm: String,
}

/// Realm-scoped read operations over the account catalog.
///
/// Implementations must never leak accounts across realms. Lookups that
/// match nothing return empty results; only infrastructure faults (which
/// shipped implementations avoid by loading the catalog up front) may error.
pub trait AccountDirectory {
    /// Finds the account with the given number inside `realm`.
    fn find_by_number(&self, realm: &str, number: &str) -> Option<Account>;

    /// Finds the account with the given exact name inside `realm`.
    fn find_by_name(&self, realm: &str, name: &str) -> Option<Account>;

    /// Returns all accounts in `realm` whose name matches `pattern`.
    ///
    /// The pattern is a case-sensitive regular expression; a pattern that
    /// fails to compile degrades to case-sensitive substring matching.
    /// Results come back in storage order, not sorted.
    fn search(&self, realm: &str, pattern: &str) -> Vec<Account>;

    /// Returns the roles the trusted identity broker can assume directly on
    /// `account` (the account's permitted-roles set).
    fn assumable_roles(&self, account: &Account) -> Vec<String>;
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: u64,
    name: String,
    number: String,
    #[serde(default)]
    roles: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    realms: HashMap<String, Vec<CatalogEntry>>,
}

/// [`AccountDirectory`] backed by a JSON catalog file loaded once at startup.
#[derive(Debug)]
pub struct CatalogDirectory {
    // realm -> entries, in file order
    realms: HashMap<String, Vec<CatalogEntry>>,
}

impl CatalogDirectory {
    /// Loads the catalog from a JSON file.
    ///
    /// # Errors
    /// Returns [`BrokerError::Catalog`] if the file cannot be read or does
    /// not parse as a catalog.
    pub fn load(path: &Path) -> Result<Self, BrokerError> {
        let raw = std::fs::read_to_string(path).map_err(|e| BrokerError::Catalog {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        let file: CatalogFile =
            serde_json::from_str(&raw).map_err(|e| BrokerError::Catalog {
                path: path.display().to_string(),
                source: Box::new(e),
            })?;
        Ok(Self {
            realms: file.realms,
        })
    }

    /// Builds a directory from already-materialized accounts, mostly useful
    /// for embedding and tests. Each tuple carries the account and its
    /// directly-assumable roles.
    #[must_use]
    pub fn from_accounts(accounts: Vec<(Account, Vec<String>)>) -> Self {
        let mut realms: HashMap<String, Vec<CatalogEntry>> = HashMap::new();
        for (account, roles) in accounts {
            realms.entry(account.realm).or_default().push(CatalogEntry {
                id: account.id,
                name: account.name,
                number: account.number,
                roles,
            });
        }
        Self { realms }
    }

    fn entries(&self, realm: &str) -> &[CatalogEntry] {
        self.realms.get(realm).map_or(&[], Vec::as_slice)
    }

    fn materialize(realm: &str, entry: &CatalogEntry) -> Account {
        Account {
            id: entry.id,
            name: entry.name.clone(),
            number: entry.number.clone(),
            realm: realm.to_owned(),
        }
    }
}

impl AccountDirectory for CatalogDirectory {
    fn find_by_number(&self, realm: &str, number: &str) -> Option<Account> {
        self.entries(realm)
            .iter()
            .find(|e| e.number == number)
            .map(|e| Self::materialize(realm, e))
    }

    fn find_by_name(&self, realm: &str, name: &str) -> Option<Account> {
        self.entries(realm)
            .iter()
            .find(|e| e.name == name)
            .map(|e| Self::materialize(realm, e))
    }

    fn search(&self, realm: &str, pattern: &str) -> Vec<Account> {
        let matcher: Box<dyn Fn(&str) -> bool> = match Regex::new(pattern) {
            Ok(re) => Box::new(move |name: &str| re.is_match(name)),
            Err(_) => {
                let literal = pattern.to_owned();
                Box::new(move |name: &str| name.contains(&literal))
            }
        };

        self.entries(realm)
            .iter()
            .filter(|e| matcher(&e.name))
            .map(|e| Self::materialize(realm, e))
            .collect()
    }

    fn assumable_roles(&self, account: &Account) -> Vec<String> {
        self.entries(&account.realm)
            .iter()
            .find(|e| e.id == account.id)
            .map(|e| e.roles.clone())
            .unwrap_or_default()
    }
}

use crate::directory::Account;
use crate::error::BrokerError;
use crate::overrides::{OverrideScope, RoleOverrides};

/// The role decision for one account: which role to end up in, and which
/// intermediary role (if any) must be assumed first to get there.
///
/// Derived per account and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRole {
    /// The role the caller ends up in.
    pub role: String,
    /// The prerequisite hop when `role` is not directly assumable.
    pub intermediary: Option<String>,
}

impl ResolvedRole {
    /// Whether the credential chain needs two hops.
    #[must_use]
    pub const fn is_two_hop(&self) -> bool {
        self.intermediary.is_some()
    }
}

/// Computes the [`ResolvedRole`] for one account.
///
/// The effective role is the explicitly requested one when present,
/// otherwise the account-scope `default_role` override, otherwise the
/// realm-scope one. When the effective role is not in the account's
/// directly-assumable set, an intermediary is needed: an explicitly
/// requested intermediary is trusted as-is, otherwise the overrides are
/// consulted with the same precedence, restricted to the assumable set.
/// Account scope beats realm scope at both steps, and each step evaluates
/// the precedence independently; nothing is carried over from other
/// accounts.
///
/// # Errors
/// [`BrokerError::RoleUndetermined`] when no requested role and no override
/// yields an effective role; [`BrokerError::IntermediaryUndetermined`] when
/// an intermediary is needed but none can be determined. Both are fatal for
/// this account only.
pub fn resolve_role(
    account: &Account,
    requested_role: Option<&str>,
    requested_intermediary: Option<&str>,
    realm: &str,
    overrides: &impl RoleOverrides,
    assumable: &[String],
) -> Result<ResolvedRole, BrokerError> {
    let role = requested_role
        .filter(|r| !r.is_empty())
        .map(str::to_owned)
        .or_else(|| overrides.default_role(OverrideScope::Account(&account.name)))
        .or_else(|| overrides.default_role(OverrideScope::Realm(realm)))
        .ok_or_else(|| BrokerError::RoleUndetermined {
            account: account.name.clone(),
        })?;

    if assumable.iter().any(|r| r == &role) {
        return Ok(ResolvedRole {
            role,
            intermediary: None,
        });
    }

    let intermediary = requested_intermediary
        .filter(|r| !r.is_empty())
        .map(str::to_owned)
        .or_else(|| {
            [
                OverrideScope::Account(&account.name),
                OverrideScope::Realm(realm),
            ]
            .into_iter()
            .filter_map(|scope| overrides.default_role(scope))
            .find(|candidate| assumable.iter().any(|r| r == candidate))
        })
        .ok_or_else(|| BrokerError::IntermediaryUndetermined {
            account: account.name.clone(),
            role: role.clone(),
        })?;

    Ok(ResolvedRole {
        role,
        intermediary: Some(intermediary),
    })
}

//! Per-account run orchestration.
//!
//! Drives Classifier → Directory → Resolver → Broker → Issuer for every
//! account the identifier selects. Accounts are processed independently
//! with continue-on-error semantics: a failure is recorded as that
//! account's outcome and never aborts the rest of the run.

use crate::directory::{Account, AccountDirectory};
use crate::error::BrokerError;
use crate::federation::ConsoleUrlIssuer;
use crate::overrides::RoleOverrides;
use crate::resolver::resolve_role;
use crate::selector::AccountSelector;
use crate::sts::{CredentialBroker, StsApi};

/// Immutable inputs for one run, passed by value into each component
/// (there is no ambient session state).
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Realm the account lookups are scoped to.
    pub realm: String,
    /// Region for the identity-service calls and the console destination.
    pub region: String,
    /// The loosely-specified account identifier.
    pub identifier: String,
    /// Explicitly requested role, when any.
    pub role: Option<String>,
    /// Explicitly requested intermediary role, when any.
    pub intermediary: Option<String>,
    /// Operator identity used in session names.
    pub user: String,
}

/// The tagged result for one account: its federated console URL, or the
/// error that made the account unresolvable.
#[derive(Debug)]
pub struct AccountOutcome {
    /// The account that was processed.
    pub account: Account,
    /// Console URL on success, the per-account failure otherwise.
    pub result: Result<String, BrokerError>,
}

/// Collected outcomes of one run.
///
/// Zero outcomes means the identifier matched no accounts, which is a
/// reported condition, not an error.
#[derive(Debug, Default)]
pub struct RunReport {
    /// One outcome per matched account, in directory order.
    pub outcomes: Vec<AccountOutcome>,
}

impl RunReport {
    /// Whether the identifier matched at least one account.
    #[must_use]
    pub fn matched_any(&self) -> bool {
        !self.outcomes.is_empty()
    }

    /// Whether at least one account yielded a console URL.
    #[must_use]
    pub fn any_succeeded(&self) -> bool {
        self.outcomes.iter().any(|o| o.result.is_ok())
    }

    /// Whether accounts were matched and every one of them failed.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.matched_any() && !self.any_succeeded()
    }
}

fn select_accounts<D: AccountDirectory>(ctx: &RunContext, directory: &D) -> Vec<Account> {
    match AccountSelector::classify(&ctx.identifier) {
        AccountSelector::Number(number) => directory
            .find_by_number(&ctx.realm, &number)
            .into_iter()
            .collect(),
        AccountSelector::Name(name) => directory
            .find_by_name(&ctx.realm, &name)
            .into_iter()
            .collect(),
        AccountSelector::Pattern(pattern) => directory.search(&ctx.realm, &pattern),
    }
}

async fn open_one<D, O, S>(
    ctx: &RunContext,
    directory: &D,
    overrides: &O,
    broker: &CredentialBroker<S>,
    issuer: &ConsoleUrlIssuer,
    account: &Account,
) -> Result<String, BrokerError>
where
    D: AccountDirectory,
    O: RoleOverrides,
    S: StsApi + Sync,
{
    let assumable = directory.assumable_roles(account);
    let resolved = resolve_role(
        account,
        ctx.role.as_deref(),
        ctx.intermediary.as_deref(),
        &ctx.realm,
        overrides,
        &assumable,
    )?;

    tracing::info!(account = %account.name, role = %resolved.role, "using role");
    if let Some(intermediary) = &resolved.intermediary {
        tracing::info!(
            account = %account.name,
            intermediary = %intermediary,
            "using intermediary role"
        );
    }

    let credential = broker.assume(account, &resolved, &ctx.user).await?;
    issuer.issue(&credential, &ctx.region).await
}

/// Resolves the identifier and produces a federated console URL per
/// matched account.
///
/// Each account gets a fresh credential chain; credentials are never reused
/// across accounts. Failures are collected into the report; nothing in this
/// core is fatal for the whole run.
pub async fn open_consoles<D, O, S>(
    ctx: &RunContext,
    directory: &D,
    overrides: &O,
    broker: &CredentialBroker<S>,
    issuer: &ConsoleUrlIssuer,
) -> RunReport
where
    D: AccountDirectory,
    O: RoleOverrides,
    S: StsApi + Sync,
{
    let accounts = select_accounts(ctx, directory);
    if accounts.is_empty() {
        tracing::warn!(
            identifier = %ctx.identifier,
            realm = %ctx.realm,
            "identifier matched no accounts"
        );
        return RunReport::default();
    }

    let mut outcomes = Vec::with_capacity(accounts.len());
    for account in accounts {
        let result = open_one(ctx, directory, overrides, broker, issuer, &account).await;
        match &result {
            Ok(_) => tracing::info!(account = %account.name, "console url issued"),
            Err(e) => tracing::error!(account = %account.name, error = %e, "account skipped"),
        }
        outcomes.push(AccountOutcome { account, result });
    }

    RunReport { outcomes }
}

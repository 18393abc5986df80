use thiserror::Error;

/// Boxed underlying cause attached to broker failures.
///
/// Causes come from heterogeneous collaborators (the AWS SDK, `reqwest`,
/// `serde_json`, the filesystem) and are preserved verbatim so the operator
/// sees the real service fault, never a swallowed summary.
pub type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Error outputs from the ConsoleKit core.
///
/// Every variant is fatal for a single account only; the run continues with
/// the remaining accounts and collects these into the
/// [`RunReport`](crate::run::RunReport).
#[derive(Debug, Error)]
pub enum BrokerError {
    /// No role was requested and neither the account-scope nor the
    /// realm-scope `default_role` override is configured.
    #[error("role_undetermined: no role requested and no default_role override applies to account `{account}`")]
    RoleUndetermined {
        /// Name of the account whose role could not be determined.
        account: String,
    },

    /// The effective role is not directly assumable on the account and no
    /// override yields an intermediary role from the assumable set.
    #[error("intermediary_undetermined: role `{role}` is not directly assumable on account `{account}` and no assumable intermediary override exists")]
    IntermediaryUndetermined {
        /// Name of the account being resolved.
        account: String,
        /// The effective role that required an intermediary hop.
        role: String,
    },

    /// A role-assumption call against the identity service failed.
    #[error("credential_assumption: failed to assume `{role_arn}`")]
    CredentialAssumption {
        /// ARN of the role whose assumption failed.
        role_arn: String,
        /// Underlying identity-service fault.
        #[source]
        source: Cause,
    },

    /// Exchanging a temporary credential for a federated sign-in URL failed.
    #[error("federation: {error} ({url})")]
    Federation {
        /// The federation endpoint URL involved.
        url: String,
        /// Description of the failure.
        error: String,
        /// Underlying transport fault, when one exists.
        #[source]
        source: Option<Cause>,
    },

    /// The persisted account catalog could not be loaded.
    #[error("catalog: failed to load account catalog from `{path}`")]
    Catalog {
        /// Path of the catalog file.
        path: String,
        /// Underlying read or parse fault.
        #[source]
        source: Cause,
    },
}

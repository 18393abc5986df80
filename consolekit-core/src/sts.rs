//! Credential chain brokering against the identity service.
//!
//! The broker performs one role-assumption call when the resolved role is
//! directly assumable, or a strict two-hop chain (intermediary first) when
//! it is not. Credentials are produced fresh per account per invocation and
//! never cached, reused across accounts, or retried automatically; the
//! caller decides whether to retry a whole account.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};

use crate::directory::Account;
use crate::error::BrokerError;
use crate::resolver::ResolvedRole;
use crate::session::session_name;

/// Short-lived, scoped session credentials returned by the identity service.
///
/// Created and consumed within one resolution cycle, then discarded; never
/// written to storage. Only handed out after the role has been confirmed
/// resolvable.
#[derive(Clone)]
pub struct TemporaryCredential {
    /// Access key identifier.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Session token bound to the access key pair.
    pub session_token: String,
    /// Expiration clock of the identity service.
    pub expiration: aws_smithy_types::DateTime,
}

impl fmt::Debug for TemporaryCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporaryCredential")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// The single identity-service operation the broker depends on.
///
/// `caller` selects the calling identity: `None` uses the ambient trusted
/// broker credentials, `Some` uses a previously issued temporary credential
/// (the intermediary hop of a chain).
#[async_trait]
pub trait StsApi {
    /// Assumes `role_arn` under `session_name` and returns the issued
    /// temporary credential.
    ///
    /// # Errors
    /// Returns [`BrokerError::CredentialAssumption`] wrapping the
    /// identity-service fault.
    async fn assume_role(
        &self,
        role_arn: &str,
        session_name: &str,
        caller: Option<&TemporaryCredential>,
    ) -> Result<TemporaryCredential, BrokerError>;
}

/// Production [`StsApi`] over the AWS STS SDK client.
#[derive(Debug)]
pub struct SdkSts {
    config: aws_config::SdkConfig,
}

impl SdkSts {
    /// Loads ambient AWS configuration for `region` with a per-operation
    /// timeout. An expired timeout surfaces as a normal call failure.
    pub async fn connect(region: &str, timeout: Duration) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_owned()))
            .timeout_config(
                aws_config::timeout::TimeoutConfig::builder()
                    .operation_timeout(timeout)
                    .build(),
            )
            .load()
            .await;
        Self { config }
    }

    fn client(&self, caller: Option<&TemporaryCredential>) -> aws_sdk_sts::Client {
        caller.map_or_else(
            || aws_sdk_sts::Client::new(&self.config),
            |credential| {
                let provider = aws_sdk_sts::config::Credentials::new(
                    credential.access_key_id.clone(),
                    credential.secret_access_key.clone(),
                    Some(credential.session_token.clone()),
                    None,
                    "consolekit-intermediary",
                );
                let conf = aws_sdk_sts::config::Builder::from(&self.config)
                    .credentials_provider(provider)
                    .build();
                aws_sdk_sts::Client::from_conf(conf)
            },
        )
    }
}

#[async_trait]
impl StsApi for SdkSts {
    async fn assume_role(
        &self,
        role_arn: &str,
        session_name: &str,
        caller: Option<&TemporaryCredential>,
    ) -> Result<TemporaryCredential, BrokerError> {
        let output = self
            .client(caller)
            .assume_role()
            .role_arn(role_arn)
            .role_session_name(session_name)
            .send()
            .await
            .map_err(|e| BrokerError::CredentialAssumption {
                role_arn: role_arn.to_owned(),
                source: Box::new(e),
            })?;

        let credentials =
            output
                .credentials()
                .ok_or_else(|| BrokerError::CredentialAssumption {
                    role_arn: role_arn.to_owned(),
                    source: "identity service returned no credentials".into(),
                })?;

        Ok(TemporaryCredential {
            access_key_id: credentials.access_key_id().to_owned(),
            secret_access_key: credentials.secret_access_key().to_owned(),
            session_token: credentials.session_token().to_owned(),
            expiration: *credentials.expiration(),
        })
    }
}

/// Builds the IAM role ARN for a role on an account (standard partition).
#[must_use]
pub fn role_arn(account_number: &str, role_name: &str) -> String {
    format!("arn:aws:iam::{account_number}:role/{role_name}")
}

/// Orchestrates the one- or two-hop credential chain for one account.
#[derive(Debug)]
pub struct CredentialBroker<S> {
    sts: S,
}

impl<S: StsApi + Sync> CredentialBroker<S> {
    /// Wraps an identity-service client.
    pub const fn new(sts: S) -> Self {
        Self { sts }
    }

    /// Consumes the broker and returns the wrapped identity-service client.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.sts
    }

    /// Produces a temporary credential for the resolved role on `account`.
    ///
    /// Single hop when the role is directly assumable. Otherwise the
    /// intermediary role is assumed first and its credential, which never
    /// leaves this function, becomes the calling identity for the second
    /// hop. A failure on the first hop aborts before the second is
    /// attempted. Each hop is tagged with a deterministic session name
    /// composed of the application identifier, the normalized `user`
    /// identity and that hop's role name.
    ///
    /// # Errors
    /// Returns [`BrokerError::CredentialAssumption`] from whichever hop
    /// failed, with the underlying cause attached.
    pub async fn assume(
        &self,
        account: &Account,
        resolved: &ResolvedRole,
        user: &str,
    ) -> Result<TemporaryCredential, BrokerError> {
        let target_arn = role_arn(&account.number, &resolved.role);
        let target_session = session_name(user, &resolved.role);

        match &resolved.intermediary {
            None => {
                tracing::debug!(role_arn = %target_arn, "assuming role directly");
                self.sts
                    .assume_role(&target_arn, &target_session, None)
                    .await
            }
            Some(intermediary) => {
                let hop_arn = role_arn(&account.number, intermediary);
                tracing::debug!(
                    role_arn = %target_arn,
                    intermediary_arn = %hop_arn,
                    "assuming role through intermediary"
                );
                let hop_credential = self
                    .sts
                    .assume_role(&hop_arn, &session_name(user, intermediary), None)
                    .await?;
                self.sts
                    .assume_role(&target_arn, &target_session, Some(&hop_credential))
                    .await
            }
        }
    }
}

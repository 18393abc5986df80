//! Console URL issuance through the sign-in federation endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::BrokerError;
use crate::request::Request;
use crate::sts::TemporaryCredential;
use crate::APP_NAME;

const DEFAULT_FEDERATION_ENDPOINT: &str = "https://signin.aws.amazon.com/federation";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FederationSession<'a> {
    session_id: &'a str,
    session_key: &'a str,
    session_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct SigninTokenResponse {
    #[serde(rename = "SigninToken")]
    signin_token: String,
}

/// Exchanges temporary credentials for one-time federated sign-in URLs.
///
/// The issued URL is opaque to this core; it is handed to the rendering
/// collaborator which owns everything that happens in the browser.
pub struct ConsoleUrlIssuer {
    endpoint: String,
    request: Request,
}

impl ConsoleUrlIssuer {
    /// Creates an issuer against the public federation endpoint with the
    /// given per-call timeout.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self::with_endpoint(DEFAULT_FEDERATION_ENDPOINT, timeout)
    }

    /// Creates an issuer against a non-default federation endpoint
    /// (partitioned deployments, local test servers).
    #[must_use]
    pub fn with_endpoint(endpoint: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_owned(),
            request: Request::new(timeout),
        }
    }

    /// Exchanges `credential` for a single-use federated sign-in URL whose
    /// destination is the console home of `region`.
    ///
    /// No retry happens here; a timeout or service fault surfaces as a
    /// [`BrokerError::Federation`] with the cause attached. Error values
    /// carry the bare endpoint, never the query string (it embeds the
    /// session key).
    ///
    /// # Errors
    /// Returns [`BrokerError::Federation`] when the signin-token request
    /// fails, returns a non-success status, or returns an unparseable body.
    pub async fn issue(
        &self,
        credential: &TemporaryCredential,
        region: &str,
    ) -> Result<String, BrokerError> {
        let session = serde_json::to_string(&FederationSession {
            session_id: &credential.access_key_id,
            session_key: &credential.secret_access_key,
            session_token: &credential.session_token,
        })
        .map_err(|e| self.error("failed to serialize federation session", Some(Box::new(e))))?;

        let token_query =
            serde_urlencoded::to_string([("Action", "getSigninToken"), ("Session", &session)])
                .map_err(|e| {
                    self.error("failed to encode signin token query", Some(Box::new(e)))
                })?;

        let response = self
            .request
            .get(&format!("{}?{token_query}", self.endpoint))
            .send()
            .await
            .map_err(|e| self.error("signin token request failed", Some(Box::new(e))))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.error(
                &format!("signin token request returned status {status}"),
                None,
            ));
        }

        let token: SigninTokenResponse = response
            .json()
            .await
            .map_err(|e| self.error("failed to parse signin token response", Some(Box::new(e))))?;

        let destination =
            format!("https://{region}.console.aws.amazon.com/console/home?region={region}");
        let login_query = serde_urlencoded::to_string([
            ("Action", "login"),
            ("Issuer", APP_NAME),
            ("Destination", &destination),
            ("SigninToken", &token.signin_token),
        ])
        .map_err(|e| self.error("failed to encode login query", Some(Box::new(e))))?;

        Ok(format!("{}?{login_query}", self.endpoint))
    }

    fn error(&self, message: &str, source: Option<crate::Cause>) -> BrokerError {
        BrokerError::Federation {
            url: self.endpoint.clone(),
            error: message.to_owned(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(2);

    fn credential() -> TemporaryCredential {
        TemporaryCredential {
            access_key_id: "AKIAEXAMPLE".to_owned(),
            secret_access_key: "secret-key".to_owned(),
            session_token: "session-token".to_owned(),
            expiration: aws_smithy_types::DateTime::from_secs(1_700_000_000),
        }
    }

    #[tokio::test]
    async fn test_issue_returns_a_login_url() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/federation")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("Action".into(), "getSigninToken".into()),
                mockito::Matcher::Regex("Session=".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"SigninToken": "VGhpcyBpcyBh"}"#)
            .create_async()
            .await;

        let issuer =
            ConsoleUrlIssuer::with_endpoint(&format!("{}/federation", server.url()), TIMEOUT);
        let url = issuer.issue(&credential(), "eu-west-1").await.unwrap();

        assert!(url.starts_with(&format!("{}/federation?Action=login", server.url())));
        assert!(url.contains("Issuer=consolekit"));
        assert!(url.contains("SigninToken=VGhpcyBpcyBh"));
        // The destination is query-encoded and scoped to the region.
        assert!(url.contains("Destination=https%3A%2F%2Feu-west-1.console.aws.amazon.com"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_a_federation_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/federation")
            .match_query(mockito::Matcher::Any)
            .with_status(403)
            .with_body("Forbidden")
            .create_async()
            .await;

        let issuer =
            ConsoleUrlIssuer::with_endpoint(&format!("{}/federation", server.url()), TIMEOUT);
        let err = issuer.issue(&credential(), "eu-west-1").await.unwrap_err();

        match err {
            BrokerError::Federation { url, error, source } => {
                assert!(error.contains("403"));
                assert!(source.is_none());
                // The session key never appears in the reported URL.
                assert!(!url.contains("secret-key"));
            }
            other => panic!("expected Federation error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_body_preserves_the_cause() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/federation")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("<html>surprise</html>")
            .create_async()
            .await;

        let issuer =
            ConsoleUrlIssuer::with_endpoint(&format!("{}/federation", server.url()), TIMEOUT);
        let err = issuer.issue(&credential(), "eu-west-1").await.unwrap_err();

        match err {
            BrokerError::Federation { error, source, .. } => {
                assert!(error.contains("parse"));
                assert!(source.is_some());
            }
            other => panic!("expected Federation error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_expiry_is_a_federation_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/federation")
            .match_query(mockito::Matcher::Any)
            .with_chunked_body(|writer| {
                // Stall well past the issuer's timeout before responding.
                std::thread::sleep(Duration::from_secs(2));
                writer.write_all(br#"{"SigninToken": "VGhpcyBpcyBh"}"#)
            })
            .create_async()
            .await;

        let issuer = ConsoleUrlIssuer::with_endpoint(
            &format!("{}/federation", server.url()),
            Duration::from_millis(250),
        );
        let err = issuer.issue(&credential(), "eu-west-1").await.unwrap_err();

        match err {
            BrokerError::Federation { source, .. } => {
                let cause = source.expect("the transport fault must be attached");
                let request_error = cause
                    .downcast_ref::<reqwest::Error>()
                    .expect("the cause is the underlying client error");
                assert!(request_error.is_timeout());
            }
            other => panic!("expected Federation error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_federation_error() {
        // Nothing listens on this port; the connect error becomes the cause.
        let issuer = ConsoleUrlIssuer::with_endpoint("http://127.0.0.1:9/federation", TIMEOUT);
        let err = issuer.issue(&credential(), "eu-west-1").await.unwrap_err();

        assert!(matches!(
            err,
            BrokerError::Federation { source: Some(_), .. }
        ));
    }
}

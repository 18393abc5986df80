use std::time::Duration;

use reqwest::{Method, RequestBuilder};

/// A simple wrapper on an HTTP client for making requests. Sets sensible
/// defaults such as a per-call timeout and a user-agent. No retry
/// middleware: a failed or timed-out call is a normal per-account outcome
/// and the caller decides whether to retry the whole account.
pub(crate) struct Request {
    client: reqwest::Client,
    timeout: Duration,
}

impl Request {
    /// Initializes a new `Request` instance with the given per-call timeout.
    pub(crate) fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Creates a GET request builder with defaults applied.
    pub(crate) fn get(&self, url: &str) -> RequestBuilder {
        self.client
            .request(Method::GET, url)
            .timeout(self.timeout)
            .header(
                "User-Agent",
                format!("consolekit-core/{}", env!("CARGO_PKG_VERSION")),
            )
    }
}

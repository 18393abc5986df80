//! Core decision logic for brokered, federated AWS console access.
//!
//! Given a loosely-specified account identifier, a realm and an optional
//! role, this crate selects the target accounts from a read-only catalog,
//! resolves the role to assume per account (applying the configuration
//! override hierarchy), brokers a single- or two-hop STS credential chain
//! and exchanges the resulting temporary credential for a one-time federated
//! console sign-in URL.
//!
//! Everything around this (argument parsing, configuration files, browser
//! automation) is plumbing owned by consumers such as `consolekit-cli`.
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

mod error;
pub use error::*;

mod selector;
pub use selector::*;

pub mod directory;
pub use directory::{Account, AccountDirectory, CatalogDirectory};

pub mod overrides;
pub use overrides::{OverrideScope, RoleOverrides, StaticOverrides};

mod resolver;
pub use resolver::*;

mod session;
pub use session::*;

pub mod sts;
pub use sts::{CredentialBroker, SdkSts, StsApi, TemporaryCredential};

mod federation;
pub use federation::*;

pub mod run;
pub use run::{open_consoles, AccountOutcome, RunContext, RunReport};

// private modules
mod request;

/// Application identifier used in session names and as the federation issuer.
pub const APP_NAME: &str = "consolekit";

/// Default timeout applied to identity-service and federation calls.
pub const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

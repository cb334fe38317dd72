//! Credential hashing and bearer token issuance.
//!
//! Both components are leaves: they take their secrets and cost parameters at
//! construction and never read process-wide configuration.

pub mod password;
pub mod token;

pub use password::{CredentialHasher, HashError};
pub use token::{TOKEN_TTL_SECS, TokenError, TokenIssuer};

//! Credential seam.
//!
//! Token acquisition belongs to the hosting environment (CLI context,
//! managed identity, device code flow); the query client only needs
//! something that can hand it a bearer token for a scope. Implement
//! [`TokenCredential`] over whatever identity stack the host uses.

use chrono::{DateTime, Utc};

use crate::error::Result;

/// Default scope for Log Analytics query calls.
pub const LOG_ANALYTICS_SCOPE: &str = "https://api.loganalytics.io/.default";

/// A bearer token plus its expiry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expires_on: DateTime<Utc>,
}

/// Supplies bearer tokens for a set of scopes.
pub trait TokenCredential: Send + Sync {
    fn get_token(&self, scopes: &[&str]) -> Result<AccessToken>;
}

/// Credential wrapping a pre-acquired token. Useful in tests and in hosts
/// that manage refresh themselves.
pub struct StaticTokenCredential {
    token: AccessToken,
}

impl StaticTokenCredential {
    pub fn new(token: impl Into<String>, expires_on: DateTime<Utc>) -> Self {
        Self {
            token: AccessToken {
                token: token.into(),
                expires_on,
            },
        }
    }
}

impl TokenCredential for StaticTokenCredential {
    fn get_token(&self, _scopes: &[&str]) -> Result<AccessToken> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn static_credential_returns_its_token() {
        let expiry = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let credential = StaticTokenCredential::new("tok-123", expiry);
        let token = credential.get_token(&[LOG_ANALYTICS_SCOPE]).unwrap();
        assert_eq!(token.token, "tok-123");
        assert_eq!(token.expires_on, expiry);
    }
}

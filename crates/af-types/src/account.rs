//! Account state as seen by the broker
//!
//! The account/model layer owns identity records; the broker only reads
//! them. [`Account`] is the read-only view, [`StaticAccount`] an in-memory
//! implementation for hosts and tests.

use async_trait::async_trait;

/// Read-only view of an identity record
///
/// Token fields are passed through to the host unexamined except for
/// presence checks. `is_signed_in` is async: resolving it may require a
/// session check against the identity service.
#[async_trait]
pub trait Account: Send + Sync {
    /// Whether the account currently holds a valid session
    async fn is_signed_in(&self) -> bool;

    fn email(&self) -> Option<&str>;
    fn uid(&self) -> Option<&str>;
    fn session_token(&self) -> Option<&str>;
    fn key_fetch_token(&self) -> Option<&str>;
    fn unwrap_b_key(&self) -> Option<&str>;

    /// Whether the account's email address has been verified
    fn verified(&self) -> bool;

    /// Sync engines the user declined during signup
    fn declined_sync_engines(&self) -> &[String];

    /// Sync engines offered to the user during signup
    fn offered_sync_engines(&self) -> &[String];
}

/// In-memory account snapshot
///
/// Holds fixed identity fields resolved up front. Useful for hosts that
/// materialize account state before starting a flow, and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticAccount {
    pub email: Option<String>,
    pub uid: Option<String>,
    pub session_token: Option<String>,
    pub key_fetch_token: Option<String>,
    pub unwrap_b_key: Option<String>,
    pub verified: bool,
    pub signed_in: bool,
    pub declined_sync_engines: Vec<String>,
    pub offered_sync_engines: Vec<String>,
}

#[async_trait]
impl Account for StaticAccount {
    async fn is_signed_in(&self) -> bool {
        self.signed_in
    }

    fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    fn key_fetch_token(&self) -> Option<&str> {
        self.key_fetch_token.as_deref()
    }

    fn unwrap_b_key(&self) -> Option<&str> {
        self.unwrap_b_key.as_deref()
    }

    fn verified(&self) -> bool {
        self.verified
    }

    fn declined_sync_engines(&self) -> &[String] {
        &self.declined_sync_engines
    }

    fn offered_sync_engines(&self) -> &[String] {
        &self.offered_sync_engines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_account_defaults() {
        let account = StaticAccount::default();

        assert!(!account.is_signed_in().await);
        assert!(!account.verified());
        assert!(account.email().is_none());
        assert!(account.session_token().is_none());
        assert!(account.declined_sync_engines().is_empty());
    }

    #[tokio::test]
    async fn test_static_account_fields() {
        let account = StaticAccount {
            email: Some("testuser@testuser.com".to_string()),
            uid: Some("uid".to_string()),
            signed_in: true,
            ..Default::default()
        };

        assert!(account.is_signed_in().await);
        assert_eq!(account.email(), Some("testuser@testuser.com"));
        assert_eq!(account.uid(), Some("uid"));
        assert!(account.key_fetch_token().is_none());
    }
}

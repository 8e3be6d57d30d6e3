//! Login notification payload assembly and validation
//!
//! A `login` notification announces a newly authenticated account to the
//! host application. Only the allowed fields below are carried; everything
//! else on the account stays with the model layer.

use serde::Serialize;
use tracing::debug;

use crate::account::Account;

/// Fields that must be present before a login notification is sent
pub const REQUIRED_LOGIN_FIELDS: [&str; 5] = [
    "email",
    "uid",
    "sessionToken",
    "keyFetchToken",
    "unwrapBKey",
];

/// Payload of a `login` notification sent to the host application
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_fetch_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unwrap_b_key: Option<String>,
    pub verified: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub declined_sync_engines: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub offered_sync_engines: Vec<String>,
    pub verified_can_link_account: bool,
}

impl LoginData {
    /// Snapshot the allowed login fields from an account
    pub fn from_account(account: &dyn Account) -> Self {
        Self {
            email: account.email().map(str::to_string),
            uid: account.uid().map(str::to_string),
            session_token: account.session_token().map(str::to_string),
            key_fetch_token: account.key_fetch_token().map(str::to_string),
            unwrap_b_key: account.unwrap_b_key().map(str::to_string),
            verified: account.verified(),
            declined_sync_engines: account.declined_sync_engines().to_vec(),
            offered_sync_engines: account.offered_sync_engines().to_vec(),
            verified_can_link_account: true,
        }
    }
}

/// Seam for host-specific login-field validation
pub trait LoginValidator: Send + Sync {
    /// Names of required login fields missing from the account. Empty when
    /// the account is ready to be announced to the host.
    fn missing_login_fields(&self, account: &dyn Account) -> Vec<&'static str>;

    fn has_required_login_fields(&self, account: &dyn Account) -> bool {
        self.missing_login_fields(account).is_empty()
    }
}

/// Default validator: requires email, uid, session token, key fetch token,
/// and unwrap key
pub struct RequiredFieldsValidator;

impl LoginValidator for RequiredFieldsValidator {
    fn missing_login_fields(&self, account: &dyn Account) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if account.email().is_none() {
            missing.push("email");
        }
        if account.uid().is_none() {
            missing.push("uid");
        }
        if account.session_token().is_none() {
            missing.push("sessionToken");
        }
        if account.key_fetch_token().is_none() {
            missing.push("keyFetchToken");
        }
        if account.unwrap_b_key().is_none() {
            missing.push("unwrapBKey");
        }

        if !missing.is_empty() {
            debug!("account is missing login fields: {}", missing.join(", "));
        }

        missing
    }
}

/// Validator that accepts any account
///
/// For hosts that validate upstream, and for tests that exercise hooks
/// without assembling full token state.
pub struct PermissiveValidator;

impl LoginValidator for PermissiveValidator {
    fn missing_login_fields(&self, _account: &dyn Account) -> Vec<&'static str> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::StaticAccount;

    fn full_account() -> StaticAccount {
        StaticAccount {
            email: Some("testuser@testuser.com".to_string()),
            uid: Some("uid".to_string()),
            session_token: Some("session-token".to_string()),
            key_fetch_token: Some("key-fetch-token".to_string()),
            unwrap_b_key: Some("unwrap-b-key".to_string()),
            verified: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_required_fields_validator_accepts_full_account() {
        let validator = RequiredFieldsValidator;
        let account = full_account();

        assert!(validator.has_required_login_fields(&account));
        assert!(validator.missing_login_fields(&account).is_empty());
    }

    #[test]
    fn test_required_fields_validator_names_missing_fields() {
        let validator = RequiredFieldsValidator;
        let account = StaticAccount {
            email: Some("testuser@testuser.com".to_string()),
            uid: Some("uid".to_string()),
            ..Default::default()
        };

        let missing = validator.missing_login_fields(&account);
        assert_eq!(missing, vec!["sessionToken", "keyFetchToken", "unwrapBKey"]);
        assert!(!validator.has_required_login_fields(&account));
    }

    #[test]
    fn test_permissive_validator_accepts_empty_account() {
        let validator = PermissiveValidator;
        let account = StaticAccount::default();

        assert!(validator.has_required_login_fields(&account));
    }

    #[test]
    fn test_login_data_from_account() {
        let account = full_account();
        let data = LoginData::from_account(&account);

        assert_eq!(data.email.as_deref(), Some("testuser@testuser.com"));
        assert_eq!(data.session_token.as_deref(), Some("session-token"));
        assert!(data.verified);
        assert!(data.verified_can_link_account);
    }

    #[test]
    fn test_login_data_serializes_to_wire_names() {
        let account = full_account();
        let data = LoginData::from_account(&account);

        let value = serde_json::to_value(&data).expect("Failed to serialize");
        assert_eq!(value["sessionToken"], "session-token");
        assert_eq!(value["keyFetchToken"], "key-fetch-token");
        assert_eq!(value["unwrapBKey"], "unwrap-b-key");
        assert_eq!(value["verifiedCanLinkAccount"], true);
    }

    #[test]
    fn test_login_data_skips_absent_fields() {
        let account = StaticAccount::default();
        let data = LoginData::from_account(&account);

        let value = serde_json::to_value(&data).expect("Failed to serialize");
        let object = value.as_object().expect("Payload is not an object");
        assert!(!object.contains_key("email"));
        assert!(!object.contains_key("declinedSyncEngines"));
        assert_eq!(value["verified"], false);
    }
}

//! Settings redirect for already-signed-in accounts
//!
//! Redirects to settings if the account is signed in, falls back to the
//! wrapped default behavior otherwise.

use af_types::Account;
use tracing::debug;

use crate::behavior::Behavior;

pub const DEFAULT_SETTINGS_ENDPOINT: &str = "settings";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Account verified successfully";

/// Optional overrides for the redirect target and success message
#[derive(Debug, Clone, Default)]
pub struct SettingsRedirectOptions {
    pub success: Option<String>,
    pub endpoint: Option<String>,
}

/// Behavior wrapper that short-circuits signed-in accounts to settings
///
/// Overrides are resolved once at construction; two instances never share
/// override state.
#[derive(Debug, Clone)]
pub struct SettingsRedirect {
    default_behavior: Behavior,
    endpoint: String,
    success: String,
}

impl SettingsRedirect {
    pub fn new(default_behavior: Behavior, options: SettingsRedirectOptions) -> Self {
        Self {
            default_behavior,
            endpoint: options
                .endpoint
                .unwrap_or_else(|| DEFAULT_SETTINGS_ENDPOINT.to_string()),
            success: options
                .success
                .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
        }
    }

    /// Introspection tag. The resolved behavior carries its own kind;
    /// callers deciding navigation must inspect that one, not this tag.
    pub fn kind(&self) -> &'static str {
        "settings"
    }

    /// Decide the next behavior for `account`
    pub async fn resolve(&self, account: &dyn Account) -> Behavior {
        if account.is_signed_in().await {
            debug!("account is signed in, redirecting to `{}`", self.endpoint);
            Behavior::navigate_with_success(self.endpoint.clone(), self.success.clone())
        } else {
            self.default_behavior.clone()
        }
    }
}

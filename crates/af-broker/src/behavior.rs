//! Declarative post-step UI directives
//!
//! A behavior tells the view layer what to do after a flow step. Behaviors
//! are constructed fresh per hook invocation and consumed once; the view
//! layer switches on [`Behavior::kind`] to pick the next screen.

/// Endpoint of the device-pairing promotion
pub const CONNECT_ANOTHER_DEVICE_ENDPOINT: &str = "connect_another_device";

/// Directive describing the next UI action after a flow step
///
/// Halting and navigating are mutually exclusive by construction: `Halt`
/// carries no endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Behavior {
    /// Nothing to do; the flow proceeds as the view layer sees fit
    Null,
    /// Stop the flow without navigating
    Halt,
    /// Redirect to `endpoint`, optionally showing `success` afterwards
    Navigate {
        endpoint: String,
        success: Option<String>,
    },
    /// Redirect to the device-pairing promotion
    ConnectAnotherDevice,
}

impl Behavior {
    pub fn navigate(endpoint: impl Into<String>) -> Self {
        Behavior::Navigate {
            endpoint: endpoint.into(),
            success: None,
        }
    }

    pub fn navigate_with_success(endpoint: impl Into<String>, success: impl Into<String>) -> Self {
        Behavior::Navigate {
            endpoint: endpoint.into(),
            success: Some(success.into()),
        }
    }

    /// Stable discriminant consumed by the view layer
    pub fn kind(&self) -> &'static str {
        match self {
            Behavior::Null => "null",
            Behavior::Halt => "halt",
            Behavior::Navigate { .. } => "navigate",
            Behavior::ConnectAnotherDevice => "connect-another-device",
        }
    }

    /// Whether the flow must stop without navigating
    pub fn halts(&self) -> bool {
        matches!(self, Behavior::Halt)
    }

    /// Navigation target, when the behavior navigates
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Behavior::Navigate { endpoint, .. } => Some(endpoint),
            Behavior::ConnectAnotherDevice => Some(CONNECT_ANOTHER_DEVICE_ENDPOINT),
            Behavior::Null | Behavior::Halt => None,
        }
    }

    /// Message shown after navigation, when one was attached
    pub fn success_message(&self) -> Option<&str> {
        match self {
            Behavior::Navigate { success, .. } => success.as_deref(),
            _ => None,
        }
    }
}

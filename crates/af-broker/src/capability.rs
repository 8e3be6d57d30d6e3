//! Capability negotiation between the broker and the host application
//!
//! Capabilities are named feature flags, boolean or structured, declared per
//! broker variant and refined once per session. The string forms are part of
//! the host interface and must stay stable.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, warn};

/// Sync engines declined by default when the host offers no selection UI
pub const DEFAULT_DECLINED_ENGINES: [&str; 2] = ["creditcards", "addresses"];

/// Closed set of negotiable capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    Signup,
    HandleSignedInNotification,
    ChooseWhatToSyncCheckbox,
    ChooseWhatToSyncWebV1,
    EmailVerificationMarketingSnippet,
    ConvertExternalLinksToText,
    ReuseExistingSession,
}

impl Capability {
    /// Stable wire name of the capability
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Signup => "signup",
            Capability::HandleSignedInNotification => "handleSignedInNotification",
            Capability::ChooseWhatToSyncCheckbox => "chooseWhatToSyncCheckbox",
            Capability::ChooseWhatToSyncWebV1 => "chooseWhatToSyncWebV1",
            Capability::EmailVerificationMarketingSnippet => "emailVerificationMarketingSnippet",
            Capability::ConvertExternalLinksToText => "convertExternalLinksToText",
            Capability::ReuseExistingSession => "reuseExistingSession",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Unknown capability: {0}")]
pub struct UnknownCapability(String);

impl FromStr for Capability {
    type Err = UnknownCapability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "signup" => Ok(Capability::Signup),
            "handleSignedInNotification" => Ok(Capability::HandleSignedInNotification),
            "chooseWhatToSyncCheckbox" => Ok(Capability::ChooseWhatToSyncCheckbox),
            "chooseWhatToSyncWebV1" => Ok(Capability::ChooseWhatToSyncWebV1),
            "emailVerificationMarketingSnippet" => {
                Ok(Capability::EmailVerificationMarketingSnippet)
            }
            "convertExternalLinksToText" => Ok(Capability::ConvertExternalLinksToText),
            "reuseExistingSession" => Ok(Capability::ReuseExistingSession),
            other => Err(UnknownCapability(other.to_string())),
        }
    }
}

/// Value attached to a capability entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityValue {
    Flag(bool),
    /// Structured configuration for the web what-to-sync screen
    SyncEngines { engines: Vec<String> },
}

impl CapabilityValue {
    /// Any value other than an explicit `false` counts as present
    pub fn is_enabled(&self) -> bool {
        !matches!(self, CapabilityValue::Flag(false))
    }
}

impl From<bool> for CapabilityValue {
    fn from(flag: bool) -> Self {
        CapabilityValue::Flag(flag)
    }
}

/// Per-session capability table
///
/// Starts from a variant's defaults; entries may be overridden or disabled
/// until the table is frozen at the end of capability refinement. A frozen
/// table refuses every update, so a disabled capability cannot come back
/// for the rest of the session.
#[derive(Debug, Clone, Default)]
pub struct CapabilityTable {
    entries: BTreeMap<Capability, CapabilityValue>,
    frozen: bool,
}

impl CapabilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default table shared by all broker variants
    pub fn base_defaults() -> Self {
        Self::from_entries([
            (Capability::Signup, CapabilityValue::Flag(true)),
            (
                Capability::HandleSignedInNotification,
                CapabilityValue::Flag(true),
            ),
            (
                Capability::ChooseWhatToSyncCheckbox,
                CapabilityValue::Flag(true),
            ),
            (
                Capability::ChooseWhatToSyncWebV1,
                CapabilityValue::Flag(false),
            ),
            (
                Capability::EmailVerificationMarketingSnippet,
                CapabilityValue::Flag(true),
            ),
            (
                Capability::ConvertExternalLinksToText,
                CapabilityValue::Flag(false),
            ),
            (Capability::ReuseExistingSession, CapabilityValue::Flag(false)),
        ])
    }

    pub fn from_entries(
        entries: impl IntoIterator<Item = (Capability, CapabilityValue)>,
    ) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            frozen: false,
        }
    }

    /// New table with `overrides` layered over `self`
    pub fn merged(
        &self,
        overrides: impl IntoIterator<Item = (Capability, CapabilityValue)>,
    ) -> Self {
        let mut entries = self.entries.clone();
        entries.extend(overrides);
        Self {
            entries,
            frozen: false,
        }
    }

    /// Truthiness lookup: present and not explicitly false
    pub fn has(&self, capability: Capability) -> bool {
        self.entries
            .get(&capability)
            .is_some_and(CapabilityValue::is_enabled)
    }

    /// Structured value of an entry
    pub fn get(&self, capability: Capability) -> Option<&CapabilityValue> {
        self.entries.get(&capability)
    }

    /// Set an entry. Refused once the table is frozen; returns whether the
    /// update was applied.
    pub fn set(&mut self, capability: Capability, value: impl Into<CapabilityValue>) -> bool {
        if self.frozen {
            warn!("capability table is frozen, refusing update to `{}`", capability);
            return false;
        }
        self.entries.insert(capability, value.into());
        true
    }

    /// Disable an entry (records an explicit false)
    pub fn disable(&mut self, capability: Capability) -> bool {
        debug!("disabling capability `{}`", capability);
        self.set(capability, false)
    }

    /// Freeze the table for the remainder of the session
    pub fn freeze(&mut self) {
        debug!("freezing capability table");
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip() {
        for capability in [
            Capability::Signup,
            Capability::HandleSignedInNotification,
            Capability::ChooseWhatToSyncCheckbox,
            Capability::ChooseWhatToSyncWebV1,
            Capability::EmailVerificationMarketingSnippet,
            Capability::ConvertExternalLinksToText,
            Capability::ReuseExistingSession,
        ] {
            let parsed: Capability = capability.as_str().parse().expect("Failed to parse");
            assert_eq!(parsed, capability);
        }
    }

    #[test]
    fn test_unknown_capability_is_rejected() {
        let err = "notACapability".parse::<Capability>().unwrap_err();
        assert!(err.to_string().contains("notACapability"));
    }

    #[test]
    fn test_base_defaults() {
        let table = CapabilityTable::base_defaults();

        assert!(table.has(Capability::Signup));
        assert!(table.has(Capability::HandleSignedInNotification));
        assert!(table.has(Capability::ChooseWhatToSyncCheckbox));
        assert!(table.has(Capability::EmailVerificationMarketingSnippet));
        assert!(!table.has(Capability::ChooseWhatToSyncWebV1));
        assert!(!table.has(Capability::ConvertExternalLinksToText));
        assert!(!table.has(Capability::ReuseExistingSession));
    }

    #[test]
    fn test_structured_value_counts_as_present() {
        let table = CapabilityTable::base_defaults().merged([(
            Capability::ChooseWhatToSyncWebV1,
            CapabilityValue::SyncEngines {
                engines: vec!["creditcards".to_string()],
            },
        )]);

        assert!(table.has(Capability::ChooseWhatToSyncWebV1));
        match table.get(Capability::ChooseWhatToSyncWebV1) {
            Some(CapabilityValue::SyncEngines { engines }) => {
                assert_eq!(engines, &["creditcards".to_string()]);
            }
            other => panic!("Unexpected capability value: {:?}", other),
        }
    }

    #[test]
    fn test_merged_overrides_base_entries() {
        let table = CapabilityTable::base_defaults()
            .merged([(Capability::Signup, CapabilityValue::Flag(false))]);

        assert!(!table.has(Capability::Signup));
        // Untouched entries survive the merge.
        assert!(table.has(Capability::HandleSignedInNotification));
    }

    #[test]
    fn test_absent_entry_is_not_present() {
        let table = CapabilityTable::new();
        assert!(!table.has(Capability::Signup));
        assert!(table.get(Capability::Signup).is_none());
    }

    #[test]
    fn test_disable_records_explicit_false() {
        let mut table = CapabilityTable::base_defaults();

        assert!(table.disable(Capability::ChooseWhatToSyncCheckbox));
        assert!(!table.has(Capability::ChooseWhatToSyncCheckbox));
        assert_eq!(
            table.get(Capability::ChooseWhatToSyncCheckbox),
            Some(&CapabilityValue::Flag(false))
        );
    }

    #[test]
    fn test_frozen_table_refuses_updates() {
        let mut table = CapabilityTable::base_defaults();
        table.disable(Capability::ChooseWhatToSyncCheckbox);
        table.freeze();

        assert!(table.is_frozen());
        assert!(!table.set(Capability::ChooseWhatToSyncCheckbox, true));
        assert!(!table.has(Capability::ChooseWhatToSyncCheckbox));
    }
}

//! Broker variant for the fennec (mobile shell) host integration
//!
//! The fennec host renders its own first-run UI: it owns the what-to-sync
//! checkbox and the post-verification marketing snippet, so those
//! capabilities are off here, while the web what-to-sync screen stays on
//! with the engines the host declines by default.

use std::sync::Arc;

use async_trait::async_trait;

use af_channels::Channel;
use af_metrics::MetricsSink;
use af_types::{Account, BrokerResult, LoginValidator, Relier};

use crate::behavior::Behavior;
use crate::broker::{
    AuthBroker, BrokerCore, CapabilityRefiner, ChannelCommands, FlowStage,
};
use crate::capability::{Capability, CapabilityTable, CapabilityValue, DEFAULT_DECLINED_ENGINES};

/// Channel event names understood by the fennec host
pub const FENNEC_V1_COMMANDS: ChannelCommands = ChannelCommands {
    can_link_account: "fxaccounts:can_link_account",
    change_password: "fxaccounts:change_password",
    delete_account: "fxaccounts:delete_account",
    loaded: "fxaccounts:loaded",
    login: "fxaccounts:login",
};

/// Fennec session refinement: the host renders its own what-to-sync
/// checkbox, so the web flow must not show a second one.
struct FennecRefiner;

#[async_trait]
impl CapabilityRefiner for FennecRefiner {
    async fn unsupported_capabilities(&self, _relier: &Relier) -> anyhow::Result<Vec<Capability>> {
        Ok(vec![Capability::ChooseWhatToSyncCheckbox])
    }
}

/// Authentication broker for the fennec-v1 host integration
pub struct FennecBroker {
    core: BrokerCore,
}

impl FennecBroker {
    pub fn new(channel: Arc<dyn Channel>, metrics: Arc<dyn MetricsSink>, relier: Relier) -> Self {
        Self {
            core: BrokerCore::new(
                channel,
                metrics,
                relier,
                FENNEC_V1_COMMANDS,
                Self::default_capabilities(),
            )
            .with_refiner(Arc::new(FennecRefiner)),
        }
    }

    /// Replace the login-field validator (host-specific validation seam)
    pub fn with_validator(mut self, validator: Arc<dyn LoginValidator>) -> Self {
        self.core = self.core.with_validator(validator);
        self
    }

    /// Replace the capability refiner consulted during `fetch()`
    pub fn with_refiner(mut self, refiner: Arc<dyn CapabilityRefiner>) -> Self {
        self.core = self.core.with_refiner(refiner);
        self
    }

    /// Capability table this variant starts from
    pub fn default_capabilities() -> CapabilityTable {
        CapabilityTable::base_defaults().merged([
            (
                Capability::ChooseWhatToSyncWebV1,
                CapabilityValue::SyncEngines {
                    engines: DEFAULT_DECLINED_ENGINES
                        .iter()
                        .map(|engine| engine.to_string())
                        .collect(),
                },
            ),
            (
                Capability::EmailVerificationMarketingSnippet,
                CapabilityValue::Flag(false),
            ),
        ])
    }
}

#[async_trait]
impl AuthBroker for FennecBroker {
    async fn fetch(&self) -> BrokerResult<()> {
        self.core.fetch().await
    }

    fn has_capability(&self, capability: Capability) -> bool {
        self.core.has_capability(capability)
    }

    fn capability_value(&self, capability: Capability) -> Option<CapabilityValue> {
        self.core.capability_value(capability)
    }

    async fn after_force_auth(&self, account: &dyn Account) -> BrokerResult<Behavior> {
        self.core.handle(FlowStage::ForceAuth, account).await
    }

    async fn after_sign_in(&self, account: &dyn Account) -> BrokerResult<Behavior> {
        self.core.handle(FlowStage::SignIn, account).await
    }

    async fn before_sign_up_confirmation_poll(
        &self,
        account: &dyn Account,
    ) -> BrokerResult<Behavior> {
        self.core
            .handle(FlowStage::BeforeSignUpConfirmationPoll, account)
            .await
    }

    async fn after_sign_up_confirmation_poll(
        &self,
        account: &dyn Account,
    ) -> BrokerResult<Behavior> {
        self.core
            .handle(FlowStage::AfterSignUpConfirmationPoll, account)
            .await
    }

    async fn after_sign_in_confirmation_poll(
        &self,
        account: &dyn Account,
    ) -> BrokerResult<Behavior> {
        self.core
            .handle(FlowStage::AfterSignInConfirmationPoll, account)
            .await
    }

    async fn after_change_password(&self, account: &dyn Account) -> BrokerResult<Behavior> {
        self.core.handle(FlowStage::ChangePassword, account).await
    }

    async fn after_delete_account(&self, account: &dyn Account) -> BrokerResult<Behavior> {
        self.core.handle(FlowStage::DeleteAccount, account).await
    }

    async fn after_loaded(&self) -> BrokerResult<Behavior> {
        self.core.announce_loaded().await?;
        Ok(Behavior::Null)
    }
}

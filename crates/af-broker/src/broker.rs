//! Authentication broker core
//!
//! The broker sits between the identity web flow and the host application.
//! The flow controller invokes one lifecycle hook per step; the broker
//! notifies the host over the channel and hands the resulting behavior to
//! the view layer. Within one hook the channel notification is awaited
//! before the behavior is returned, so the host is informed no later than
//! the view layer.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info};

use af_channels::Channel;
use af_metrics::MetricsSink;
use af_types::{
    Account, BrokerError, BrokerResult, LoginData, LoginValidator, Relier,
    RequiredFieldsValidator,
};

use crate::behavior::Behavior;
use crate::capability::{Capability, CapabilityTable, CapabilityValue};

/// Lifecycle stages dispatched by the flow controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowStage {
    ForceAuth,
    SignIn,
    BeforeSignUpConfirmationPoll,
    AfterSignUpConfirmationPoll,
    AfterSignInConfirmationPoll,
    ChangePassword,
    DeleteAccount,
}

/// Channel event names a broker variant uses
#[derive(Debug, Clone, Copy)]
pub struct ChannelCommands {
    pub can_link_account: &'static str,
    pub change_password: &'static str,
    pub delete_account: &'static str,
    pub loaded: &'static str,
    pub login: &'static str,
}

/// Source of session-time capability refinements
///
/// Consulted exactly once, during `fetch()`. Implementations report the
/// capabilities the current account/relier state cannot support; the broker
/// disables them and freezes the table.
#[async_trait]
pub trait CapabilityRefiner: Send + Sync {
    async fn unsupported_capabilities(&self, relier: &Relier) -> anyhow::Result<Vec<Capability>>;
}

/// Refiner that reports nothing unsupported
pub struct NoRefinements;

#[async_trait]
impl CapabilityRefiner for NoRefinements {
    async fn unsupported_capabilities(&self, _relier: &Relier) -> anyhow::Result<Vec<Capability>> {
        Ok(Vec::new())
    }
}

/// Broker surface invoked by the flow controller
#[async_trait]
pub trait AuthBroker: Send + Sync {
    /// One-time capability refinement. Navigation decisions must not be
    /// trusted before this resolves; afterwards the capability table is
    /// frozen for the session.
    async fn fetch(&self) -> BrokerResult<()>;

    /// Truthiness lookup in the negotiated capability table
    fn has_capability(&self, capability: Capability) -> bool;

    /// Structured value of a capability entry
    fn capability_value(&self, capability: Capability) -> Option<CapabilityValue>;

    async fn after_force_auth(&self, account: &dyn Account) -> BrokerResult<Behavior>;
    async fn after_sign_in(&self, account: &dyn Account) -> BrokerResult<Behavior>;
    async fn before_sign_up_confirmation_poll(
        &self,
        account: &dyn Account,
    ) -> BrokerResult<Behavior>;
    async fn after_sign_up_confirmation_poll(
        &self,
        account: &dyn Account,
    ) -> BrokerResult<Behavior>;
    async fn after_sign_in_confirmation_poll(
        &self,
        account: &dyn Account,
    ) -> BrokerResult<Behavior>;
    async fn after_change_password(&self, account: &dyn Account) -> BrokerResult<Behavior>;
    async fn after_delete_account(&self, account: &dyn Account) -> BrokerResult<Behavior>;

    /// Announce that the web flow finished loading
    async fn after_loaded(&self) -> BrokerResult<Behavior>;
}

/// Shared plumbing for broker variants
///
/// Owns the capability table, holds shared references to the channel and
/// metrics sink, and routes every lifecycle stage through [`BrokerCore::handle`].
pub struct BrokerCore {
    channel: Arc<dyn Channel>,
    metrics: Arc<dyn MetricsSink>,
    relier: Relier,
    validator: Arc<dyn LoginValidator>,
    refiner: Arc<dyn CapabilityRefiner>,
    capabilities: RwLock<CapabilityTable>,
    commands: ChannelCommands,
}

impl BrokerCore {
    pub fn new(
        channel: Arc<dyn Channel>,
        metrics: Arc<dyn MetricsSink>,
        relier: Relier,
        commands: ChannelCommands,
        defaults: CapabilityTable,
    ) -> Self {
        Self {
            channel,
            metrics,
            relier,
            validator: Arc::new(RequiredFieldsValidator),
            refiner: Arc::new(NoRefinements),
            capabilities: RwLock::new(defaults),
            commands,
        }
    }

    /// Replace the login-field validator (host-specific validation seam)
    pub fn with_validator(mut self, validator: Arc<dyn LoginValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Replace the capability refiner consulted during `fetch()`
    pub fn with_refiner(mut self, refiner: Arc<dyn CapabilityRefiner>) -> Self {
        self.refiner = refiner;
        self
    }

    /// One-time capability refinement
    ///
    /// Disables whatever the refiner reports as unsupported, then freezes
    /// the table for the remainder of the session.
    pub async fn fetch(&self) -> BrokerResult<()> {
        let unsupported = self
            .refiner
            .unsupported_capabilities(&self.relier)
            .await
            .map_err(|e| BrokerError::CapabilityFetchFailed(e.to_string()))?;

        let mut capabilities = self.capabilities.write();
        for capability in unsupported {
            capabilities.disable(capability);
        }
        capabilities.freeze();
        Ok(())
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.read().has(capability)
    }

    pub fn capability_value(&self, capability: Capability) -> Option<CapabilityValue> {
        self.capabilities.read().get(capability).cloned()
    }

    pub fn commands(&self) -> &ChannelCommands {
        &self.commands
    }

    pub fn relier(&self) -> &Relier {
        &self.relier
    }

    /// Route one lifecycle stage to its side effects and behavior
    pub async fn handle(&self, stage: FlowStage, account: &dyn Account) -> BrokerResult<Behavior> {
        debug!("handling flow stage {:?}", stage);
        match stage {
            FlowStage::ForceAuth => {
                self.send_login_data(self.commands.login, account).await?;
                Ok(Behavior::Null)
            }
            FlowStage::SignIn => {
                self.send_login_data(self.commands.login, account).await?;
                Ok(Behavior::ConnectAnotherDevice)
            }
            FlowStage::BeforeSignUpConfirmationPoll => {
                self.send_login_data(self.commands.login, account).await?;
                // Interstitial: polling continues whatever we signal here,
                // so the behavior must not halt.
                Ok(Behavior::Null)
            }
            FlowStage::AfterSignUpConfirmationPoll => {
                self.metrics.set_view_name_prefix("signup");
                Ok(Behavior::ConnectAnotherDevice)
            }
            FlowStage::AfterSignInConfirmationPoll => {
                self.metrics.set_view_name_prefix("signin");
                Ok(Behavior::ConnectAnotherDevice)
            }
            FlowStage::ChangePassword => {
                self.send_login_data(self.commands.change_password, account)
                    .await?;
                Ok(Behavior::Null)
            }
            FlowStage::DeleteAccount => {
                let mut payload = serde_json::Map::new();
                if let Some(email) = account.email() {
                    payload.insert("email".to_string(), email.into());
                }
                if let Some(uid) = account.uid() {
                    payload.insert("uid".to_string(), uid.into());
                }
                self.send(self.commands.delete_account, Value::Object(payload))
                    .await?;
                Ok(Behavior::Null)
            }
        }
    }

    /// Announce that the web flow finished loading. Carries no account.
    pub async fn announce_loaded(&self) -> BrokerResult<()> {
        self.send(self.commands.loaded, Value::Null).await
    }

    /// Validate the account and announce it on `event` with the login payload
    async fn send_login_data(&self, event: &str, account: &dyn Account) -> BrokerResult<()> {
        let missing = self.validator.missing_login_fields(account);
        if !missing.is_empty() {
            return Err(BrokerError::InvalidAccountState(missing.join(", ")));
        }

        let payload = serde_json::to_value(LoginData::from_account(account))?;
        self.send(event, payload).await
    }

    async fn send(&self, event: &str, payload: Value) -> BrokerResult<()> {
        info!("notifying host of `{}`", event);
        self.channel
            .send(event, payload)
            .await
            .map_err(|e| BrokerError::ChannelSendFailed(e.to_string()))
    }
}

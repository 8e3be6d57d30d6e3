//! Authentication flow brokering between an identity web flow and a host
//! application
//!
//! At each step of a sign-in/sign-up lifecycle the broker decides what the
//! user interface should do next. It inspects account state and negotiated
//! capabilities, notifies the host application over a message channel, and
//! hands the view layer a declarative [`Behavior`] to execute.

pub mod behavior;
pub mod broker;
pub mod capability;
pub mod fennec;
pub mod settings;

pub use behavior::{Behavior, CONNECT_ANOTHER_DEVICE_ENDPOINT};
pub use broker::{
    AuthBroker, BrokerCore, CapabilityRefiner, ChannelCommands, FlowStage, NoRefinements,
};
pub use capability::{
    Capability, CapabilityTable, CapabilityValue, UnknownCapability, DEFAULT_DECLINED_ENGINES,
};
pub use fennec::{FennecBroker, FENNEC_V1_COMMANDS};
pub use settings::{
    SettingsRedirect, SettingsRedirectOptions, DEFAULT_SETTINGS_ENDPOINT, DEFAULT_SUCCESS_MESSAGE,
};

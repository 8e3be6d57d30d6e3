//! Shared types, error types, and traits for authflow

pub mod account;
pub mod errors;
pub mod login;
pub mod relier;

pub use account::{Account, StaticAccount};
pub use errors::{BrokerError, BrokerResult};
pub use login::{
    LoginData, LoginValidator, PermissiveValidator, RequiredFieldsValidator, REQUIRED_LOGIN_FIELDS,
};
pub use relier::Relier;

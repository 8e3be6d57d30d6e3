//! Relier flow configuration
//!
//! The relier is the party consuming the identity assertion. The broker
//! reads its configuration during capability negotiation and treats it as
//! opaque otherwise.

#[derive(Debug, Clone, Default)]
pub struct Relier {
    /// Service identifier the flow was started for
    pub service: Option<String>,
    /// Context string identifying the host integration
    pub context: Option<String>,
    /// UI surface the flow was entered from
    pub entrypoint: Option<String>,
}

impl Relier {
    pub fn new() -> Self {
        Self::default()
    }
}

mod relay_client;

pub use relay_client::*;

use async_trait::async_trait;

use crate::error::DeliveryResult;
use crate::form::TemplateParams;

/// Anything that can deliver a filled-in form
#[async_trait]
pub trait MessageRelay: Send + Sync {
    /// Deliver `params` with exactly one outbound request
    async fn deliver(&self, params: &TemplateParams) -> DeliveryResult<RelayResponse>;
}

//! Gateway traits — boundary components wrapping the external data
//! providers.
//!
//! A gateway translates one provider's response or failure into the
//! internal data model. The failure contract is deliberate: gateways
//! return [`Fetch::Unavailable`] rather than errors. Provider outages,
//! timeouts, and unknown places are normal, expected outcomes that the
//! orchestrators fold into the answer, not exception paths.
//!
//! No retries — a single attempt per fetch. Retry policy, if any, belongs
//! to the transport layer, not this contract.

use crate::model::{Fetch, LocationContext, WeatherReading};
use async_trait::async_trait;

/// Current-conditions lookup by place name.
#[async_trait]
pub trait WeatherGateway: Send + Sync {
    /// Fetch current conditions for `place`.
    ///
    /// An empty or whitespace-only place is Unavailable without a provider
    /// call.
    async fn fetch(&self, place: &str) -> Fetch<WeatherReading>;
}

/// Place-summary lookup.
#[async_trait]
pub trait ContextGateway: Send + Sync {
    /// Fetch a short description of `place`.
    ///
    /// When the place name is ambiguous at the provider level, the gateway
    /// resolves to the first matching article and reports it through
    /// [`LocationContext::source`].
    async fn fetch(&self, place: &str) -> Fetch<LocationContext>;
}

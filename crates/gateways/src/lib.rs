//! Gateways to the external data providers.
//!
//! Each gateway implements a `nimbus_core::gateway` trait and translates
//! one provider's wire format — or its failure — into the internal data
//! model. The translation is total: every transport error, bad status,
//! timeout, or unparseable body becomes `Fetch::Unavailable`, never an
//! error the orchestrators have to catch.

pub mod weather;
pub mod wiki;

pub use weather::OpenWeatherGateway;
pub use wiki::WikipediaGateway;

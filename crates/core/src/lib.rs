//! # Nimbus Core
//!
//! Domain types, traits, and error definitions for the Nimbus weather agent.
//! This crate has **zero framework dependencies** — it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is defined as a trait here. Implementations
//! live in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with scripted/static doubles
//! - Clean dependency graph (all crates depend inward on core)

pub mod completion;
pub mod error;
pub mod gateway;
pub mod model;

// Re-export key types at crate root for ergonomics
pub use completion::{CompletionRequest, CompletionResponse, CompletionService, Usage};
pub use error::{CompletionError, Error, Result};
pub use gateway::{ContextGateway, WeatherGateway};
pub use model::{Fetch, LocationCandidate, LocationContext, QueryResult, Strategy, WeatherReading};

//! Text-completion service implementations for Nimbus.
//!
//! All backends implement the `nimbus_core::CompletionService` trait.
//! The agent is wired against the trait and never knows which backend
//! answered.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatCompletion;

//! The Nimbus agent — orchestration between free-text location extraction
//! and the two data gateways.
//!
//! One request traverses a fixed shape:
//!
//! ```text
//! START → EXTRACT → FETCH_DATA → SYNTHESIZE → DONE
//!            └──────────────────────↑ (short-circuit when extraction
//!                                      yields zero usable candidates)
//! ```
//!
//! No state is revisited; each invocation is a single linear or
//! fan-out-then-join traversal. The three reasoning strategies share this
//! shape and differ only in how many candidates they carry through it and
//! what they ask of the synthesis step.

pub mod extractor;
pub mod facade;
pub mod strategies;
pub mod synthesis;

pub use extractor::{LocationExtractor, ParseOutcome};
pub use facade::WeatherAgent;
pub use strategies::{CotStrategy, ReactStrategy, ReasoningStrategy, StrategyContext, TotStrategy};
pub use synthesis::Synthesizer;

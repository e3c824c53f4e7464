//! Error handling for the cardroom engine.

pub mod engine;

pub use engine::EngineError;

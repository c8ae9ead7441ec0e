//! # Actors
//!
//! Asynchronous boundary of the classifier.
//!
//! - `traits`: the `LlmActor` capability consumed by the core
//! - `messages`: actor message enums and `ActorError`
//! - `llm`: OpenAI chat-completions actor
//! - `supervisor`: request intake (validation, extraction, failover)

pub mod llm;
pub mod messages;
pub mod supervisor;
pub mod traits;

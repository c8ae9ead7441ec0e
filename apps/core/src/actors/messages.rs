use serde::Serialize;
use tokio::sync::oneshot;

use crate::models::ClassificationResult;

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Serialize, Clone)]
pub enum ActorError {
    /// An error originating from the LLM actor (transport, auth, quota, bad payload).
    #[error("LLM request failed: {0}")]
    LlmError(String),
    /// A generic internal error within an actor.
    #[error("Internal system error: {0}")]
    Internal(String),
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Messages that can be sent to the `LlmActor`.
#[derive(Debug)]
pub enum LlmMessage {
    /// A request for a JSON-object-shaped completion.
    CompleteJson {
        prompt: String,
        temperature: f32,
        /// A channel to send the raw completion text back.
        responder: oneshot::Sender<Result<String, AppError>>,
    },
}

/// Messages that can be sent to the `SupervisorActor`.
#[derive(Debug)]
pub enum SupervisorMessage {
    /// Classify an email submitted as raw text.
    ClassifyText {
        text: String,
        responder: oneshot::Sender<Result<ClassificationResult, AppError>>,
    },
    /// Classify an email submitted as an uploaded file.
    ClassifyFile {
        file_name: String,
        file_data: Vec<u8>,
        responder: oneshot::Sender<Result<ClassificationResult, AppError>>,
    },
    /// A command to shut down the supervisor.
    Shutdown,
}

use crate::actors::messages::{ActorError, AppError, LlmMessage};
use crate::actors::traits::LlmActor;
use crate::config::LlmSettings;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, info, warn};
use url::Url;

/// Extra time the handle waits on top of the HTTP timeout before giving up on the runner.
const HANDLE_GRACE: Duration = Duration::from_secs(5);

/// A handle to the `LlmActor`.
///
/// This struct provides a public, cloneable interface for sending messages to the
/// running LLM actor. It abstracts away the `mpsc::Sender`.
#[derive(Clone)]
pub struct LlmActorHandle {
    sender: mpsc::Sender<LlmMessage>,
    timeout: Duration,
}

impl LlmActorHandle {
    /// Creates a new `LlmActor` and returns a handle to it.
    ///
    /// This will spawn the `LlmActorRunner` in a new Tokio task.
    ///
    /// # Arguments
    ///
    /// * `settings` - API key, base URL, model and timeout of the OpenAI endpoint.
    pub fn new(settings: LlmSettings) -> Result<Self, AppError> {
        let (sender, receiver) = mpsc::channel(32);
        let client = OpenAiClient::new(&settings)?;
        let actor = LlmActorRunner { receiver, client };
        tokio::spawn(async move { actor.run().await });
        Ok(Self {
            sender,
            timeout: settings.timeout + HANDLE_GRACE,
        })
    }
}

#[async_trait]
impl LlmActor for LlmActorHandle {
    async fn complete_json(&self, prompt: String, temperature: f32) -> Result<String, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = LlmMessage::CompleteJson {
            prompt,
            temperature,
            responder: send,
        };

        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(ActorError::Internal(e.to_string())))?;
        timeout(self.timeout, recv)
            .await?
            .map_err(|e| AppError::Actor(ActorError::Internal(e.to_string())))?
    }
}

// --- OpenAI chat-completions client ---
#[derive(Clone)]
struct OpenAiClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    fn new(settings: &LlmSettings) -> Result<Self, AppError> {
        let base = format!("{}/", settings.base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&base)?.join("chat/completions")?;
        let client = Client::builder().timeout(settings.timeout).build()?;

        info!("Cliente OpenAI configurado: {} ({})", endpoint, settings.model);

        Ok(Self {
            client,
            endpoint,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        })
    }

    async fn complete_json(&self, prompt: &str, temperature: f32) -> Result<String, AppError> {
        info!("Enviando requisição para OpenAI {}...", self.model);

        let payload = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": temperature,
            "response_format": { "type": "json_object" }
        });

        let res = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!("OpenAI respondeu com status {}", status);
            return Err(AppError::Actor(ActorError::LlmError(format!(
                "Completion request failed with status {}: {}",
                status, body
            ))));
        }

        let json: Value = res.json().await?;
        json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::Actor(ActorError::LlmError(
                    "Completion response has no message content".to_string(),
                ))
            })
    }
}

// --- Actor Runner (Internal Logic) ---
struct LlmActorRunner {
    receiver: mpsc::Receiver<LlmMessage>,
    client: OpenAiClient,
}

impl LlmActorRunner {
    async fn run(mut self) {
        info!("LlmActor started");

        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg);
        }

        info!("LlmActor stopped");
    }

    /// Serves each request on its own task so callers never queue behind each other.
    fn handle_message(&self, msg: LlmMessage) {
        match msg {
            LlmMessage::CompleteJson {
                prompt,
                temperature,
                mut responder,
            } => {
                let client = self.client.clone();
                tokio::spawn(async move {
                    let result = tokio::select! {
                        result = client.complete_json(&prompt, temperature) => Some(result),
                        _ = responder.closed() => None,
                    };
                    match result {
                        Some(result) => {
                            let _ = responder.send(result);
                        }
                        // Dropping the request future aborts the HTTP call.
                        None => debug!("Requisição abandonada pelo chamador"),
                    }
                });
            }
        }
    }
}

use crate::actors::llm::LlmActorHandle;
use crate::actors::messages::{ActorError, AppError, SupervisorMessage};
use crate::actors::traits::LlmActor;
use crate::brain::EmailClassifier;
use crate::config::{AppConfig, ClassifierSettings, IntakeSettings};
use crate::models::{ClassificationRequest, ClassificationResult};
use crate::text_extract;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, info_span, instrument, warn, Instrument};
use uuid::Uuid;

pub const NO_INPUT_MESSAGE: &str =
    "Por favor, envie um texto ou selecione um arquivo (.txt ou .pdf)";

/// A handle to the `SupervisorActor`.
///
/// This is the entry point for classification requests. It validates the input,
/// extracts text from uploads, answers unusable input with the failover result and
/// hands everything else to the [`EmailClassifier`].
#[derive(Clone)]
pub struct SupervisorHandle {
    sender: mpsc::Sender<SupervisorMessage>,
}

impl SupervisorHandle {
    /// Creates a supervisor wired to the OpenAI actor described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let llm = Arc::new(LlmActorHandle::new(config.llm_settings())?);
        Ok(Self::new(
            llm,
            config.classifier_settings(),
            config.intake_settings(),
        ))
    }

    /// Creates a new `SupervisorActor` around any LLM backend and returns a handle.
    ///
    /// # Arguments
    ///
    /// * `llm_actor` - The language-model backend used by the classifier.
    /// * `classifier_settings` - Prompt truncation and sampling settings.
    /// * `intake` - Failover threshold and upload limits.
    pub fn new<L: LlmActor>(
        llm_actor: Arc<L>,
        classifier_settings: ClassifierSettings,
        intake: IntakeSettings,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let actor = SupervisorRunner {
            receiver,
            classifier: EmailClassifier::new(llm_actor, classifier_settings),
            intake,
        };
        tokio::spawn(async move { actor.run().await });
        Self { sender }
    }

    /// Classifies an email submitted as text.
    #[instrument(skip_all)]
    pub async fn classify_text(&self, text: String) -> Result<ClassificationResult, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::ClassifyText {
            text,
            responder: send,
        };
        self.request(msg, recv).await
    }

    /// Classifies an email submitted as a `.txt` or `.pdf` upload.
    #[instrument(skip(self, file_data), fields(size = file_data.len()))]
    pub async fn classify_file(
        &self,
        file_name: String,
        file_data: Vec<u8>,
    ) -> Result<ClassificationResult, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::ClassifyFile {
            file_name,
            file_data,
            responder: send,
        };
        self.request(msg, recv).await
    }

    /// Stops the supervisor. Requests already in flight still complete.
    pub async fn shutdown(&self) {
        let _ = self.sender.send(SupervisorMessage::Shutdown).await;
    }

    async fn request(
        &self,
        msg: SupervisorMessage,
        recv: oneshot::Receiver<Result<ClassificationResult, AppError>>,
    ) -> Result<ClassificationResult, AppError> {
        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(ActorError::Internal(e.to_string())))?;
        recv.await
            .map_err(|e| AppError::Actor(ActorError::Internal(e.to_string())))?
    }
}

// --- Actor Runner ---
struct SupervisorRunner<L: LlmActor> {
    receiver: mpsc::Receiver<SupervisorMessage>,
    classifier: EmailClassifier<L>,
    intake: IntakeSettings,
}

impl<L: LlmActor> SupervisorRunner<L> {
    async fn run(mut self) {
        info!("Supervisor started");
        while let Some(msg) = self.receiver.recv().await {
            if matches!(msg, SupervisorMessage::Shutdown) {
                break;
            }
            self.handle_message(msg);
        }
        info!("Supervisor stopped");
    }

    /// Every request runs on its own task; nothing is shared between them but
    /// read-only settings and the LLM handle. A request whose caller went away is
    /// dropped, which cancels its model call.
    fn handle_message(&self, msg: SupervisorMessage) {
        let classifier = self.classifier.clone();
        let intake = self.intake.clone();
        let span = info_span!("classify_request", request_id = %Uuid::new_v4());

        match msg {
            SupervisorMessage::ClassifyText {
                text,
                mut responder,
            } => {
                tokio::spawn(
                    async move {
                        info!("Nova requisição de classificação recebida (texto)");
                        let result = tokio::select! {
                            result = process_text(&classifier, &intake, text) => result,
                            _ = responder.closed() => return abandoned(),
                        };
                        let _ = responder.send(result);
                    }
                    .instrument(span),
                );
            }
            SupervisorMessage::ClassifyFile {
                file_name,
                file_data,
                mut responder,
            } => {
                tokio::spawn(
                    async move {
                        info!("Nova requisição de classificação recebida (arquivo)");
                        let result = tokio::select! {
                            result = process_file(&classifier, &intake, &file_name, &file_data) => result,
                            _ = responder.closed() => return abandoned(),
                        };
                        let _ = responder.send(result);
                    }
                    .instrument(span),
                );
            }
            SupervisorMessage::Shutdown => {}
        }
    }
}

fn abandoned() {
    debug!("Requisição abandonada pelo chamador");
}

async fn process_text<L: LlmActor>(
    classifier: &EmailClassifier<L>,
    intake: &IntakeSettings,
    text: String,
) -> Result<ClassificationResult, AppError> {
    if text.is_empty() {
        warn!("Requisição sem texto nem arquivo");
        return Err(AppError::Validation(NO_INPUT_MESSAGE.to_string()));
    }

    let text = text.trim().to_string();
    info!("Texto recebido: {} caracteres", text.chars().count());
    Ok(classify_or_failover(classifier, intake, text).await)
}

async fn process_file<L: LlmActor>(
    classifier: &EmailClassifier<L>,
    intake: &IntakeSettings,
    file_name: &str,
    file_data: &[u8],
) -> Result<ClassificationResult, AppError> {
    text_extract::validate_upload(file_name, file_data.len(), intake.max_file_size)?;
    info!("Arquivo recebido: {} ({} bytes)", file_name, file_data.len());

    let text = text_extract::extract_text_from_file(file_name, file_data);
    Ok(classify_or_failover(classifier, intake, text).await)
}

async fn classify_or_failover<L: LlmActor>(
    classifier: &EmailClassifier<L>,
    intake: &IntakeSettings,
    text: String,
) -> ClassificationResult {
    if text.is_empty() || text.chars().count() < intake.min_text_length {
        warn!("Texto insuficiente - Ativando failover");
        return ClassificationResult::failover();
    }

    info!("Enviando para análise da IA...");
    let result = classifier.classify(ClassificationRequest::new(text)).await;
    info!(
        "Classificação concluída: {} ({}%)",
        result.categoria, result.confianca
    );
    result
}

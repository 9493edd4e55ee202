use super::normalizer::SpeechTextNormalizer;
use crate::domain::language::{detect_language, SpeechLang};
use crate::infrastructure::providers::ProviderRegistry;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::sync::watch;

/// One queued utterance. Immutable after creation; a failed or cancelled
/// request is dropped, never retried in place.
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub text: String,
    pub lang: SpeechLang,
    pub requested_at: DateTime<Utc>,
}

impl SpeechRequest {
    fn new(text: String, lang: SpeechLang) -> Self {
        Self {
            text,
            lang,
            requested_at: Utc::now(),
        }
    }
}

/// UI-visible speech state, published over a watch channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechStatus {
    pub is_speaking: bool,
    pub reading_message_id: Option<String>,
}

impl SpeechStatus {
    fn idle() -> Self {
        Self {
            is_speaking: false,
            reading_message_id: None,
        }
    }
}

/// Liveness bounds for the drain loop. The speak timeout exists because
/// provider completion signals are not always reliable; on expiry the
/// utterance is assumed complete and the queue continues.
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorConfig {
    pub settle_delay: Duration,
    pub speak_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(100),
            speak_timeout: Duration::from_secs(30),
        }
    }
}

struct QueueState {
    queue: VecDeque<SpeechRequest>,
    active: Option<SpeechRequest>,
    draining: bool,
    // Bumped by stop_all; a drain iteration holding an older epoch must
    // discard its result instead of touching shared state.
    epoch: u64,
}

/// Single-flight speech queue over the configured TTS provider.
///
/// At most one provider `speak` call is outstanding system-wide at any
/// instant. Provider failures and hangs degrade to "skip and continue";
/// nothing here is fatal to the host.
pub struct SpeechOrchestrator {
    providers: Arc<ProviderRegistry>,
    config: OrchestratorConfig,
    normalizer: SpeechTextNormalizer,
    state: Mutex<QueueState>,
    status_tx: watch::Sender<SpeechStatus>,
    notice_tx: watch::Sender<Option<String>>,
    // Handle back to ourselves so enqueue can spawn the drain task.
    self_ref: Weak<SpeechOrchestrator>,
}

impl SpeechOrchestrator {
    pub fn new(providers: Arc<ProviderRegistry>, config: OrchestratorConfig) -> Arc<Self> {
        let (status_tx, _) = watch::channel(SpeechStatus::idle());
        let (notice_tx, _) = watch::channel(None);

        Arc::new_cyclic(|self_ref| Self {
            providers,
            config,
            normalizer: SpeechTextNormalizer::new(),
            state: Mutex::new(QueueState {
                queue: VecDeque::new(),
                active: None,
                draining: false,
                epoch: 0,
            }),
            status_tx,
            notice_tx,
            self_ref: self_ref.clone(),
        })
    }

    /// Observe speech state read-only.
    pub fn subscribe(&self) -> watch::Receiver<SpeechStatus> {
        self.status_tx.subscribe()
    }

    /// Transient, user-visible provider failure notices.
    pub fn subscribe_notices(&self) -> watch::Receiver<Option<String>> {
        self.notice_tx.subscribe()
    }

    pub fn status(&self) -> SpeechStatus {
        self.status_tx.borrow().clone()
    }

    pub fn is_speaking(&self) -> bool {
        self.status_tx.borrow().is_speaking
    }

    /// Is this specific message currently being read aloud?
    pub fn is_reading(&self, message_id: &str) -> bool {
        let status = self.status_tx.borrow();
        status.is_speaking && status.reading_message_id.as_deref() == Some(message_id)
    }

    /// Push an utterance and start draining if idle.
    pub fn enqueue(&self, text: String, lang: SpeechLang) {
        tracing::debug!(lang = %lang, text_length = text.len(), "Speech request queued");
        self.push_request(SpeechRequest::new(text, lang), None);
    }

    // All status publishes that contend with the drain loop happen under
    // the state lock, so push-and-publish is atomic with respect to the
    // drain's idle publish.
    fn push_request(&self, request: SpeechRequest, status: Option<SpeechStatus>) {
        let start_drain = {
            let mut state = self.state.lock().unwrap();
            state.queue.push_back(request);
            if let Some(status) = status {
                self.status_tx.send_replace(status);
            }
            if state.draining {
                false
            } else {
                state.draining = true;
                true
            }
        };

        if start_drain {
            if let Some(orchestrator) = self.self_ref.upgrade() {
                tokio::spawn(async move {
                    orchestrator.drain().await;
                });
            }
        }
    }

    /// Toggle read-aloud for one message: stop if it is the one being
    /// read, otherwise normalize, detect the language, and queue it.
    /// The reading state is published before the drain loop starts so
    /// the UI shows "reading" immediately, not only once audio starts.
    pub fn toggle_read(&self, message_id: &str, content: &str) {
        if self.is_reading(message_id) {
            self.stop_all();
            return;
        }

        let clean_text = self.normalizer.normalize(content);
        if clean_text.is_empty() {
            tracing::debug!(message_id = %message_id, "Nothing to speak after normalizing, skipping");
            return;
        }

        let lang = detect_language(&clean_text);

        tracing::info!(
            message_id = %message_id,
            lang = %lang,
            text_length = clean_text.len(),
            "Reading message aloud"
        );

        self.push_request(
            SpeechRequest::new(clean_text, lang),
            Some(SpeechStatus {
                is_speaking: true,
                reading_message_id: Some(message_id.to_string()),
            }),
        );
    }

    /// Clear the queue and cancel any active utterance. Safe to call at
    /// any time, including when idle.
    pub fn stop_all(&self) {
        let dropped = {
            let mut state = self.state.lock().unwrap();
            let dropped = state.queue.len() + usize::from(state.active.is_some());
            state.queue.clear();
            state.active = None;
            state.epoch += 1;
            self.status_tx.send_replace(SpeechStatus::idle());
            dropped
        };

        if let Ok(provider) = self.providers.current() {
            provider.stop();
        }

        if dropped > 0 {
            tracing::info!(dropped_requests = dropped, "All speech stopped");
        }
    }

    async fn drain(self: Arc<Self>) {
        loop {
            let (request, epoch) = {
                let mut state = self.state.lock().unwrap();
                match state.queue.pop_front() {
                    Some(request) => (request, state.epoch),
                    None => {
                        // Published under the lock so a racing enqueue
                        // cannot have its status clobbered by this idle.
                        state.draining = false;
                        self.status_tx.send_replace(SpeechStatus::idle());
                        return;
                    }
                }
            };

            let provider = match self.providers.current() {
                Ok(provider) => provider,
                Err(err) => {
                    tracing::error!(error = %err, "No usable TTS provider, dropping request");
                    self.notice_tx
                        .send_replace(Some("Speech is not available right now".to_string()));
                    continue;
                }
            };

            // Stale native audio guard, then settle before speaking.
            provider.stop();
            tokio::time::sleep(self.config.settle_delay).await;

            if request.text.trim().is_empty() {
                tracing::debug!("Skipping empty text in speech queue");
                continue;
            }

            {
                let mut state = self.state.lock().unwrap();
                if state.epoch != epoch {
                    continue;
                }
                state.active = Some(request.clone());
                self.status_tx.send_modify(|status| status.is_speaking = true);
            }

            tracing::info!(
                provider = provider.name(),
                lang = %request.lang,
                text_length = request.text.len(),
                "Starting utterance"
            );

            let started = std::time::Instant::now();
            let result = tokio::time::timeout(
                self.config.speak_timeout,
                provider.speak(&request.text, request.lang),
            )
            .await;

            let cancelled = {
                let mut state = self.state.lock().unwrap();
                if state.epoch != epoch {
                    true
                } else {
                    state.active = None;
                    false
                }
            };

            if cancelled {
                // stop_all ran while the provider call was in flight; it
                // already reset state, so the resolution is ignored.
                tracing::debug!("Ignoring resolution of a cancelled utterance");
                continue;
            }

            match result {
                Ok(Ok(())) => {
                    tracing::info!(
                        provider = provider.name(),
                        latency_ms = started.elapsed().as_millis() as u64,
                        "Utterance completed"
                    );
                }
                Ok(Err(err)) => {
                    tracing::warn!(
                        provider = provider.name(),
                        error = %err,
                        "Utterance failed, continuing with next request"
                    );
                    self.notice_tx
                        .send_replace(Some("Speak feature is not available currently".to_string()));
                }
                Err(_) => {
                    tracing::warn!(
                        provider = provider.name(),
                        timeout_secs = self.config.speak_timeout.as_secs(),
                        "Speak timeout reached, assuming completion"
                    );
                }
            }
        }
    }
}

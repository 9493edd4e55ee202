use crate::domain::language::SpeechLang;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("synthesis failed: {0}")]
    Synthesis(String),
    #[error("playback failed: {0}")]
    Playback(String),
    #[error("provider '{0}' is not registered")]
    NotRegistered(String),
}

/// Capability interface over a TTS backend.
///
/// Implementations are responsible for:
/// - Provider-specific voice selection for the requested language
/// - Synthesizing the utterance and delivering it to the audio output
/// - Making `speak` resolve when playback finishes or is stopped, and
///   reject on hard provider failure (network/auth)
///
/// `stop` must be idempotent and safe to call when nothing is playing.
/// Callers bound `speak` with a timeout; it must not be relied on to
/// hang forever.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn speak(&self, text: &str, lang: SpeechLang) -> Result<(), ProviderError>;

    fn stop(&self);
}

/// Which backend speaks. External configuration, never computed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Polly,
    OpenAi,
    ElevenLabs,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Polly => "polly",
            ProviderKind::OpenAi => "openai",
            ProviderKind::ElevenLabs => "elevenlabs",
        }
    }

    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "polly" => Some(ProviderKind::Polly),
            "openai" => Some(ProviderKind::OpenAi),
            "elevenlabs" => Some(ProviderKind::ElevenLabs),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Registered adapters plus the currently selected one.
///
/// The orchestrator reads `current()` once per utterance, so switching
/// providers takes effect on the next queue item, never mid-flight.
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Arc<dyn SpeechProvider>>,
    selected: RwLock<ProviderKind>,
}

impl ProviderRegistry {
    pub fn new(selected: ProviderKind) -> Self {
        Self {
            providers: HashMap::new(),
            selected: RwLock::new(selected),
        }
    }

    pub fn register(&mut self, kind: ProviderKind, provider: Arc<dyn SpeechProvider>) {
        self.providers.insert(kind, provider);
    }

    pub fn selected(&self) -> ProviderKind {
        *self.selected.read().unwrap()
    }

    /// Switch the active provider. Fails if nothing is registered for
    /// the requested kind rather than leaving speech silently broken.
    pub fn select(&self, kind: ProviderKind) -> Result<(), ProviderError> {
        if !self.providers.contains_key(&kind) {
            return Err(ProviderError::NotRegistered(kind.to_string()));
        }
        *self.selected.write().unwrap() = kind;
        tracing::info!(provider = %kind, "TTS provider selected");
        Ok(())
    }

    pub fn current(&self) -> Result<Arc<dyn SpeechProvider>, ProviderError> {
        let kind = self.selected();
        self.providers
            .get(&kind)
            .cloned()
            .ok_or_else(|| ProviderError::NotRegistered(kind.to_string()))
    }
}

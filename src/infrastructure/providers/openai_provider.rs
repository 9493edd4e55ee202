use super::speech_provider::{ProviderError, SpeechProvider};
use crate::domain::language::SpeechLang;
use crate::infrastructure::audio::{AudioClip, AudioFormat, AudioOutput};
use async_openai::{
    config::OpenAIConfig,
    types::{CreateSpeechRequest, SpeechModel, Voice},
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

/// OpenAI TTS implementation of the speech provider.
/// OpenAI voices are multilingual, so one configured voice covers all
/// of the Indic languages and English.
pub struct OpenAiSpeechProvider {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
    voice: String,
    audio: Arc<dyn AudioOutput>,
}

impl OpenAiSpeechProvider {
    pub fn new(
        client: Arc<Client<OpenAIConfig>>,
        model: String,
        voice: String,
        audio: Arc<dyn AudioOutput>,
    ) -> Self {
        Self {
            client,
            model,
            voice,
            audio,
        }
    }

    async fn call_openai(&self, text: &str, lang: SpeechLang) -> Result<Vec<u8>, ProviderError> {
        tracing::info!(
            model = %self.model,
            voice = %self.voice,
            lang = %lang,
            text_length = text.len(),
            "Calling OpenAI TTS API"
        );

        let model = match self.model.as_str() {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        };

        let voice = match self.voice.to_lowercase().as_str() {
            "alloy" => Voice::Alloy,
            "echo" => Voice::Echo,
            "fable" => Voice::Fable,
            "onyx" => Voice::Onyx,
            "nova" => Voice::Nova,
            "shimmer" => Voice::Shimmer,
            _ => Voice::Alloy, // Default fallback
        };

        let request = CreateSpeechRequest {
            model,
            input: text.to_string(),
            voice,
            response_format: None, // Defaults to MP3
            speed: None,           // Defaults to 1.0
        };

        let response = self.client.audio().speech(request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                model = %self.model,
                voice = %self.voice,
                text_length = text.len(),
                "OpenAI TTS API call failed"
            );
            ProviderError::Synthesis(format!("OpenAI TTS error: {}", e))
        })?;

        let audio_bytes = response.bytes.to_vec();
        tracing::debug!(
            audio_size = audio_bytes.len(),
            "OpenAI TTS audio received successfully"
        );

        Ok(audio_bytes)
    }
}

#[async_trait]
impl SpeechProvider for OpenAiSpeechProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn speak(&self, text: &str, lang: SpeechLang) -> Result<(), ProviderError> {
        let start_time = std::time::Instant::now();

        let audio_data = self.call_openai(text, lang).await?;
        let synthesis_ms = start_time.elapsed().as_millis() as u64;

        self.audio
            .play(AudioClip {
                audio: audio_data,
                format: AudioFormat::Mp3,
            })
            .await
            .map_err(|e| ProviderError::Playback(e.to_string()))?;

        tracing::info!(
            provider = "openai",
            model = %self.model,
            synthesis_ms = synthesis_ms,
            total_ms = start_time.elapsed().as_millis() as u64,
            characters_count = text.len(),
            "Utterance delivered"
        );

        Ok(())
    }

    fn stop(&self) {
        self.audio.stop();
    }
}

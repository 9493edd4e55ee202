use super::speech_provider::{ProviderError, SpeechProvider};
use crate::domain::language::SpeechLang;
use crate::infrastructure::audio::{AudioClip, AudioFormat, AudioOutput};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

const ELEVENLABS_API_URL: &str = "https://api.elevenlabs.io";

/// The multilingual model covers Hindi, Bengali, Tamil and Telugu with
/// one voice id.
const ELEVENLABS_MODEL: &str = "eleven_multilingual_v2";

/// ElevenLabs implementation of the speech provider
pub struct ElevenLabsSpeechProvider {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    voice_id: String,
    audio: Arc<dyn AudioOutput>,
}

impl ElevenLabsSpeechProvider {
    pub fn new(api_key: String, voice_id: String, audio: Arc<dyn AudioOutput>) -> Self {
        Self::with_base_url(ELEVENLABS_API_URL.to_string(), api_key, voice_id, audio)
    }

    pub fn with_base_url(
        base_url: String,
        api_key: String,
        voice_id: String,
        audio: Arc<dyn AudioOutput>,
    ) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url,
            api_key,
            voice_id,
            audio,
        }
    }

    async fn call_elevenlabs(
        &self,
        text: &str,
        lang: SpeechLang,
    ) -> Result<Vec<u8>, ProviderError> {
        tracing::info!(
            voice_id = %self.voice_id,
            model = ELEVENLABS_MODEL,
            lang = %lang,
            text_length = text.len(),
            "Calling ElevenLabs text-to-speech"
        );

        let url = format!(
            "{}/v1/text-to-speech/{}",
            self.base_url.trim_end_matches('/'),
            self.voice_id
        );

        let body = json!({
            "text": text,
            "model_id": ELEVENLABS_MODEL,
            "voice_settings": {
                "stability": 0.5,
                "similarity_boost": 0.75
            }
        });

        let response = self
            .http_client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "ElevenLabs request failed");
                ProviderError::Synthesis(format!("ElevenLabs request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = %status,
                error = %error_text,
                "ElevenLabs returned an error"
            );
            return Err(ProviderError::Synthesis(format!(
                "ElevenLabs error {}: {}",
                status, error_text
            )));
        }

        let audio_bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Synthesis(format!("Failed to read audio body: {}", e)))?
            .to_vec();

        tracing::debug!(
            audio_size = audio_bytes.len(),
            "ElevenLabs audio received successfully"
        );

        Ok(audio_bytes)
    }
}

#[async_trait]
impl SpeechProvider for ElevenLabsSpeechProvider {
    fn name(&self) -> &'static str {
        "elevenlabs"
    }

    async fn speak(&self, text: &str, lang: SpeechLang) -> Result<(), ProviderError> {
        let start_time = std::time::Instant::now();

        let audio_data = self.call_elevenlabs(text, lang).await?;
        let synthesis_ms = start_time.elapsed().as_millis() as u64;

        self.audio
            .play(AudioClip {
                audio: audio_data,
                format: AudioFormat::Mp3,
            })
            .await
            .map_err(|e| ProviderError::Playback(e.to_string()))?;

        tracing::info!(
            provider = "elevenlabs",
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

use super::speech_provider::{ProviderError, SpeechProvider};
use crate::domain::language::SpeechLang;
use crate::infrastructure::audio::{AudioClip, AudioFormat, AudioOutput};
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, OutputFormat, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly implementation of the speech provider
pub struct PollySpeechProvider {
    polly_client: Arc<PollyClient>,
    audio: Arc<dyn AudioOutput>,
}

impl PollySpeechProvider {
    pub fn new(polly_client: Arc<PollyClient>, audio: Arc<dyn AudioOutput>) -> Self {
        Self {
            polly_client,
            audio,
        }
    }

    /// Select the appropriate Polly voice for a language.
    /// Polly has no Bengali/Tamil/Telugu voices; Aditi handles mixed
    /// Indic text better than the English voices do.
    fn get_voice_for_language(lang: SpeechLang) -> &'static str {
        match lang {
            SpeechLang::Hindi => "Aditi",
            SpeechLang::English => "Raveena",
            SpeechLang::Bengali | SpeechLang::Tamil | SpeechLang::Telugu => "Aditi",
        }
    }

    async fn call_polly(&self, text: &str, lang: SpeechLang) -> Result<Vec<u8>, ProviderError> {
        let voice_name = Self::get_voice_for_language(lang);
        let voice_id = VoiceId::from(voice_name);
        let engine = Engine::Standard;

        tracing::info!(
            lang = %lang,
            locale = lang.locale(),
            voice = voice_name,
            engine = ?engine,
            output_format = "Mp3",
            text_length = text.len(),
            "Calling AWS Polly synthesize_speech"
        );

        let voice_id_for_error = voice_id.clone();

        let result = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .voice_id(voice_id)
            .output_format(OutputFormat::Mp3)
            .engine(engine.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    lang = %lang,
                    voice_id = ?voice_id_for_error,
                    engine = ?engine,
                    text_length = text.len(),
                    "AWS Polly synthesize_speech failed"
                );
                ProviderError::Synthesis(format!("AWS Polly error: {:?}", e))
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            ProviderError::Synthesis(format!("Failed to read audio stream: {}", e))
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();
        tracing::debug!(
            audio_size = audio_bytes.len(),
            "Audio stream collected successfully"
        );

        Ok(audio_bytes)
    }
}

#[async_trait]
impl SpeechProvider for PollySpeechProvider {
    fn name(&self) -> &'static str {
        "polly"
    }

    async fn speak(&self, text: &str, lang: SpeechLang) -> Result<(), ProviderError> {
        let start_time = std::time::Instant::now();

        let audio_data = self.call_polly(text, lang).await?;
        let synthesis_ms = start_time.elapsed().as_millis() as u64;

        self.audio
            .play(AudioClip {
                audio: audio_data,
                format: AudioFormat::Mp3,
            })
            .await
            .map_err(|e| ProviderError::Playback(e.to_string()))?;

        tracing::info!(
            provider = "polly",
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

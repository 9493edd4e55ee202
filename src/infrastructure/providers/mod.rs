pub mod elevenlabs_provider;
pub mod openai_provider;
pub mod polly_provider;
pub mod speech_provider;

pub use elevenlabs_provider::ElevenLabsSpeechProvider;
pub use openai_provider::OpenAiSpeechProvider;
pub use polly_provider::PollySpeechProvider;
pub use speech_provider::{ProviderError, ProviderKind, ProviderRegistry, SpeechProvider};

use crate::infrastructure::audio::AudioOutput;
use crate::infrastructure::config::Config;
use async_openai::{config::OpenAIConfig, Client as OpenAiClient};
use std::sync::Arc;

/// Wire the real provider adapters from configuration. The host calls
/// this once at startup and hands the registry to the orchestrator.
pub async fn build_provider_registry(
    config: &Config,
    audio: Arc<dyn AudioOutput>,
) -> anyhow::Result<ProviderRegistry> {
    tracing::info!(
        selected = %config.tts_provider,
        aws_region = %config.aws_region,
        "Building TTS provider registry"
    );

    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;
    let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));

    let openai_client = Arc::new(OpenAiClient::with_config(
        OpenAIConfig::new().with_api_key(config.openai_api_key.clone()),
    ));

    let mut registry = ProviderRegistry::new(config.tts_provider);
    registry.register(
        ProviderKind::Polly,
        Arc::new(PollySpeechProvider::new(polly_client, audio.clone())),
    );
    registry.register(
        ProviderKind::OpenAi,
        Arc::new(OpenAiSpeechProvider::new(
            openai_client,
            config.openai_model.clone(),
            config.openai_voice.clone(),
            audio.clone(),
        )),
    );
    registry.register(
        ProviderKind::ElevenLabs,
        Arc::new(ElevenLabsSpeechProvider::new(
            config.elevenlabs_api_key.clone(),
            config.elevenlabs_voice_id.clone(),
            audio,
        )),
    );

    Ok(registry)
}

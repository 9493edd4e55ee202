use crate::infrastructure::providers::ProviderKind;
use serde::Deserialize;
use std::env;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone)]
pub struct Config {
    pub chat_backend_url: String,
    pub environment: Environment,
    pub log_format: LogFormat,
    // TTS provider selection and credentials
    pub tts_provider: ProviderKind,
    pub aws_region: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_voice: String,
    pub elevenlabs_api_key: String,
    pub elevenlabs_voice_id: String,
    // Speech queue liveness bounds
    pub speech_settle_delay_ms: u64,
    pub speech_speak_timeout_secs: u64,
    // Parsed-content cache
    pub content_cache_enabled: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            chat_backend_url: env::var("CHAT_BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            tts_provider: env::var("TTS_PROVIDER")
                .ok()
                .and_then(|s| ProviderKind::from_str_opt(&s))
                .unwrap_or(ProviderKind::Polly),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "ap-south-1".to_string()),
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_model: env::var("OPENAI_TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string()),
            openai_voice: env::var("OPENAI_TTS_VOICE").unwrap_or_else(|_| "alloy".to_string()),
            elevenlabs_api_key: env::var("ELEVENLABS_API_KEY").unwrap_or_default(),
            elevenlabs_voice_id: env::var("ELEVENLABS_VOICE_ID").unwrap_or_default(),
            speech_settle_delay_ms: env::var("SPEECH_SETTLE_DELAY_MS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()?,
            speech_speak_timeout_secs: env::var("SPEECH_SPEAK_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            content_cache_enabled: env::var("CONTENT_CACHE_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse::<String>()
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(true),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.speech_settle_delay_ms)
    }

    pub fn speak_timeout(&self) -> Duration {
        Duration::from_secs(self.speech_speak_timeout_secs)
    }
}

/// Initialize logging for the host process. Call once at startup.
pub fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "narad_assistant=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "narad_assistant=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

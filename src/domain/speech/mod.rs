pub mod normalizer;
pub mod orchestrator;

pub use normalizer::SpeechTextNormalizer;
pub use orchestrator::{OrchestratorConfig, SpeechOrchestrator, SpeechRequest, SpeechStatus};

//! Content-rendering and speech-delivery core for the Narad assistant.
//!
//! The host application embeds this crate: it feeds chat messages in,
//! renders them through [`domain::content`], and drives read-aloud
//! commands through the [`domain::speech`] orchestrator, which fans out
//! to the configured TTS provider in [`infrastructure::providers`].

pub mod domain;
pub mod error;
pub mod infrastructure;

pub use domain::content::{parse, ContentNode, ContentRenderer, Span};
pub use domain::language::{detect_language, SpeechLang};
pub use domain::session::{Message, Role, Session, SessionStore};
pub use domain::speech::{OrchestratorConfig, SpeechOrchestrator, SpeechStatus, SpeechTextNormalizer};
pub use error::{AppError, AppResult};

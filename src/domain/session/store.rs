use super::error::SessionServiceError;
use super::model::{Message, Role, Session};
use crate::domain::language::detect_language;
use crate::domain::speech::SpeechOrchestrator;
use crate::infrastructure::chat::ChatBackend;
use std::sync::{Arc, Mutex};

const GREETING: &str = "Namaste! 🙏 I am Narad AI, your guide to the rich heritage and cultural treasures of India.\n\nI can help you discover:\n• Historical monuments and their fascinating stories\n• Ancient myths, legends, and cultural traditions\n• Sacred places and their spiritual significance\n• Art, architecture, and heritage sites\n\nWhat would you like to explore today?";

struct StoreState {
    session: Option<Session>,
    messages: Vec<Message>,
    is_loading: bool,
    has_greeted: bool,
}

/// Owns the conversation lifecycle and the ordered message list that
/// both the content renderer and the speech orchestrator consume.
///
/// Session boundaries also bound speech: starting or ending a session
/// cancels any active or queued utterance so no audio carries over.
pub struct SessionStore {
    state: Mutex<StoreState>,
    backend: Arc<dyn ChatBackend>,
    orchestrator: Arc<SpeechOrchestrator>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn ChatBackend>, orchestrator: Arc<SpeechOrchestrator>) -> Self {
        Self {
            state: Mutex::new(StoreState {
                session: None,
                messages: Vec::new(),
                is_loading: false,
                has_greeted: false,
            }),
            backend,
            orchestrator,
        }
    }

    /// Start a fresh session, clearing messages and any ongoing speech.
    pub fn start_session(&self) -> Session {
        self.orchestrator.stop_all();

        let session = Session::new();
        let mut state = self.state.lock().unwrap();
        state.session = Some(session.clone());
        state.messages.clear();
        state.is_loading = false;
        state.has_greeted = false;

        tracing::info!(session_id = %session.session_id, "Session started");
        session
    }

    /// End the current session. Safe to call when none is active.
    pub fn end_session(&self) {
        self.orchestrator.stop_all();

        let mut state = self.state.lock().unwrap();
        if let Some(session) = state.session.take() {
            tracing::info!(
                session_id = %session.session_id,
                message_count = state.messages.len(),
                "Session ended"
            );
        }
        state.messages.clear();
        state.is_loading = false;
        state.has_greeted = false;
    }

    pub fn clear_messages(&self) {
        let mut state = self.state.lock().unwrap();
        state.messages.clear();
        state.has_greeted = false;
    }

    /// Seed the opening assistant greeting exactly once per fresh store.
    pub fn initialize_with_greeting(&self) {
        let mut state = self.state.lock().unwrap();
        if state.has_greeted || !state.messages.is_empty() {
            return;
        }
        if state.session.is_none() {
            state.session = Some(Session::new());
        }
        state
            .messages
            .push(Message::new(Role::Assistant, GREETING.to_string()));
        state.has_greeted = true;
    }

    /// Send a user message through the chat backend and append both
    /// sides of the exchange. The detected language of the user's input
    /// updates the session language for subsequent speech.
    pub async fn send_message(&self, content: &str) -> Result<Message, SessionServiceError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(SessionServiceError::Invalid(
                "message must not be empty".to_string(),
            ));
        }

        let detected = detect_language(content);

        let (session_id, language) = {
            let mut state = self.state.lock().unwrap();
            let session = state.session.get_or_insert_with(Session::new);
            session.language = detected;
            let session_id = session.session_id.clone();

            state.messages.push(Message::new(Role::User, content.to_string()));
            state.is_loading = true;
            (session_id, detected)
        };

        tracing::info!(
            session_id = %session_id,
            language = %language,
            message_length = content.len(),
            "User message appended, awaiting backend"
        );

        let reply = self
            .backend
            .send(content, &session_id, language)
            .await
            .map_err(|e| {
                self.state.lock().unwrap().is_loading = false;
                SessionServiceError::Dependency(e.to_string())
            })?;

        let message = Message::new(Role::Assistant, reply.response);
        let mut state = self.state.lock().unwrap();
        state.messages.push(message.clone());
        state.is_loading = false;

        Ok(message)
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().unwrap().messages.clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.state.lock().unwrap().session.clone()
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().unwrap().session.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().is_loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::language::SpeechLang;
    use crate::domain::speech::{OrchestratorConfig, SpeechOrchestrator};
    use crate::infrastructure::chat::{ChatBackendError, ChatReply};
    use crate::infrastructure::providers::{ProviderKind, ProviderRegistry};
    use async_trait::async_trait;

    struct FakeChatBackend {
        reply: String,
        fail: bool,
    }

    #[async_trait]
    impl ChatBackend for FakeChatBackend {
        async fn send(
            &self,
            _message: &str,
            _session_id: &str,
            _language: SpeechLang,
        ) -> Result<ChatReply, ChatBackendError> {
            if self.fail {
                return Err(ChatBackendError::Request("connection refused".to_string()));
            }
            Ok(ChatReply {
                response: self.reply.clone(),
                suggestions: Vec::new(),
                metadata: serde_json::Value::Null,
            })
        }
    }

    fn store(reply: &str, fail: bool) -> SessionStore {
        let registry = Arc::new(ProviderRegistry::new(ProviderKind::Polly));
        let orchestrator = SpeechOrchestrator::new(registry, OrchestratorConfig::default());
        SessionStore::new(
            Arc::new(FakeChatBackend {
                reply: reply.to_string(),
                fail,
            }),
            orchestrator,
        )
    }

    #[tokio::test]
    async fn test_send_message_appends_both_sides_in_order() {
        let store = store("The Taj Mahal was built in 1632.", false);

        let reply = store.send_message("Tell me about the Taj Mahal").await.unwrap();
        assert_eq!(reply.role, Role::Assistant);

        let messages = store.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "The Taj Mahal was built in 1632.");
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_send_message_starts_session_and_sets_language() {
        let store = store("उत्तर", false);
        assert!(!store.is_active());

        store.send_message("नमस्ते").await.unwrap();

        let session = store.session().unwrap();
        assert_eq!(session.language, SpeechLang::Hindi);
    }

    #[tokio::test]
    async fn test_send_message_backend_failure_clears_loading() {
        let store = store("", true);

        let result = store.send_message("hello").await;
        assert!(matches!(result, Err(SessionServiceError::Dependency(_))));
        assert!(!store.is_loading());
        // The user's message stays; only the reply is missing.
        assert_eq!(store.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_send_empty_message_rejected() {
        let store = store("x", false);
        let result = store.send_message("   ").await;
        assert!(matches!(result, Err(SessionServiceError::Invalid(_))));
        assert!(store.messages().is_empty());
    }

    #[tokio::test]
    async fn test_start_session_resets_messages() {
        let store = store("reply", false);
        store.send_message("first").await.unwrap();
        assert_eq!(store.messages().len(), 2);

        let session = store.start_session();
        assert!(session.is_active);
        assert!(store.messages().is_empty());
        assert!(store.is_active());
    }

    #[tokio::test]
    async fn test_end_session_clears_everything() {
        let store = store("reply", false);
        store.send_message("first").await.unwrap();

        store.end_session();
        assert!(!store.is_active());
        assert!(store.messages().is_empty());
    }

    #[tokio::test]
    async fn test_greeting_seeded_once() {
        let store = store("reply", false);

        store.initialize_with_greeting();
        store.initialize_with_greeting();

        let messages = store.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::Assistant);
        assert!(messages[0].content.starts_with("Namaste"));
    }

    #[tokio::test]
    async fn test_greeting_skipped_when_conversation_exists() {
        let store = store("reply", false);
        store.send_message("hi").await.unwrap();

        store.initialize_with_greeting();
        assert_eq!(store.messages().len(), 2);
    }
}

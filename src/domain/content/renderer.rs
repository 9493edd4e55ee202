use super::model::ContentNode;
use super::parser::parse;
use crate::domain::session::Message;
use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Renders messages into display nodes, caching per message id.
///
/// Message content is immutable once appended, so the id is a safe cache
/// key; the nodes are recomputable at any time if the cache is disabled.
pub struct ContentRenderer {
    cache: Option<Cache<String, Arc<Vec<ContentNode>>>>,
}

impl ContentRenderer {
    pub fn new(cache_enabled: bool) -> Self {
        let cache = if cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(256)
                    .time_to_idle(Duration::from_secs(30 * 60)) // 30 minutes, refreshes on access
                    .build(),
            )
        } else {
            None
        };

        Self { cache }
    }

    pub fn render(&self, message: &Message) -> Arc<Vec<ContentNode>> {
        if let Some(cache) = &self.cache {
            if let Some(nodes) = cache.get(&message.id) {
                return nodes;
            }
        }

        let nodes = Arc::new(parse(&message.content));

        if let Some(cache) = &self.cache {
            cache.insert(message.id.clone(), nodes.clone());
            tracing::debug!(
                message_id = %message.id,
                node_count = nodes.len(),
                "Parsed content cached"
            );
        }

        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::Role;

    fn message(content: &str) -> Message {
        Message::new(Role::Assistant, content.to_string())
    }

    #[test]
    fn test_render_cache_hit_returns_same_nodes() {
        let renderer = ContentRenderer::new(true);
        let msg = message("## Title\nBody");

        let first = renderer.render(&msg);
        let second = renderer.render(&msg);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_render_without_cache_recomputes() {
        let renderer = ContentRenderer::new(false);
        let msg = message("plain");

        let first = renderer.render(&msg);
        let second = renderer.render(&msg);

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }
}

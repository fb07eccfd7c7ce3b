//! Session state for one UI session.
//!
//! Holds the full conversation thread and the sidebar history. Both are
//! append-only; the only removals are [`ChatSession::clear_history`] and
//! [`ChatSession::reset`].

use codelens_core::{ConversationEntry, EntryContent, HistoryEntry};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ChatSession {
    id: String,
    conversation: Vec<ConversationEntry>,
    history: Vec<HistoryEntry>,
}

impl ChatSession {
    /// A fresh session with both sequences empty.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            conversation: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Record a typed question in both the thread and the sidebar.
    pub fn push_user_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.history.push(HistoryEntry::new(EntryContent::Text(text.clone())));
        self.conversation.push(ConversationEntry::user_text(text));
    }

    /// Record an uploaded image in both the thread and the sidebar.
    pub fn push_user_image(&mut self, bytes: Vec<u8>) {
        self.history.push(HistoryEntry::new(EntryContent::Image(bytes.clone())));
        self.conversation.push(ConversationEntry::user_image(bytes));
    }

    pub fn push_bot_text(&mut self, text: impl Into<String>) {
        self.conversation.push(ConversationEntry::bot_text(text));
    }

    /// Full thread, oldest first.
    pub fn conversation(&self) -> &[ConversationEntry] {
        &self.conversation
    }

    /// User-originated turns, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Empty the sidebar history. The conversation thread is left as is.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Empty both sequences, keeping the session id.
    pub fn reset(&mut self) {
        self.history.clear();
        self.conversation.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.conversation.is_empty() && self.history.is_empty()
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codelens_core::{EntryKind, Role};

    #[test]
    fn new_session_is_empty() {
        let session = ChatSession::new();
        assert!(session.is_empty());
        assert!(!session.id().is_empty());
    }

    #[test]
    fn user_turns_land_in_both_sequences() {
        let mut session = ChatSession::with_id("s");
        session.push_user_text("why?");
        session.push_bot_text("because");
        session.push_user_image(vec![1, 2, 3]);

        let roles: Vec<Role> = session.conversation().iter().map(|e| e.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Bot, Role::User]);

        let kinds: Vec<EntryKind> = session.history().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec![EntryKind::Text, EntryKind::Image]);
    }

    #[test]
    fn clear_history_keeps_conversation() {
        let mut session = ChatSession::new();
        session.push_user_image(vec![0xFF, 0xD8, 0xFF]);
        session.push_bot_text("📄 Extracted Code:\n\nx = 1");

        session.clear_history();
        assert!(session.history().is_empty());
        assert_eq!(session.conversation().len(), 2);
    }

    #[test]
    fn reset_empties_everything() {
        let mut session = ChatSession::with_id("keep-me");
        session.push_user_text("q");
        session.push_bot_text("a");
        session.reset();
        assert!(session.is_empty());
        assert_eq!(session.id(), "keep-me");
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced a conversation entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Bot,
}

/// Whether an entry carries text or an uploaded image.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Text,
    Image,
}

/// Payload of an entry. Images keep the bytes exactly as uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryContent {
    Text(String),
    Image(Vec<u8>),
}

impl EntryContent {
    pub fn kind(&self) -> EntryKind {
        match self {
            EntryContent::Text(_) => EntryKind::Text,
            EntryContent::Image(_) => EntryKind::Image,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            EntryContent::Text(text) => Some(text),
            EntryContent::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&[u8]> {
        match self {
            EntryContent::Image(bytes) => Some(bytes),
            EntryContent::Text(_) => None,
        }
    }
}

/// One message in the main conversation thread.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationEntry {
    pub id: Uuid,
    pub role: Role,
    pub content: EntryContent,
    pub created_at: DateTime<Utc>,
}

impl ConversationEntry {
    pub fn new(role: Role, content: EntryContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            created_at: Utc::now(),
        }
    }

    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(Role::User, EntryContent::Text(text.into()))
    }

    pub fn user_image(bytes: Vec<u8>) -> Self {
        Self::new(Role::User, EntryContent::Image(bytes))
    }

    pub fn bot_text(text: impl Into<String>) -> Self {
        Self::new(Role::Bot, EntryContent::Text(text.into()))
    }

    pub fn kind(&self) -> EntryKind {
        self.content.kind()
    }
}

/// A user-originated turn as listed in the history sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub content: EntryContent,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(content: EntryContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            created_at: Utc::now(),
        }
    }

    pub fn kind(&self) -> EntryKind {
        self.content.kind()
    }
}

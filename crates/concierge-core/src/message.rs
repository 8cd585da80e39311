//! Chat transcript
//!
//! A transcript is append-only: messages are added in submission order and
//! never removed or reordered.

use serde::{Deserialize, Serialize};

use crate::license::LicenseReport;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Plain text message, optionally with source citations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

/// Assistant message carrying a license report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseMessage {
    pub report: LicenseReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    Chat(ChatMessage),
    License(LicenseMessage),
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::Chat(ChatMessage {
            role: Role::User,
            content: content.into(),
            sources: Vec::new(),
        })
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::assistant_with_sources(content, Vec::new())
    }

    pub fn assistant_with_sources(content: impl Into<String>, sources: Vec<String>) -> Self {
        Self::Chat(ChatMessage {
            role: Role::Assistant,
            content: content.into(),
            sources,
        })
    }

    pub fn license(report: LicenseReport) -> Self {
        Self::License(LicenseMessage { report })
    }

    pub fn role(&self) -> Role {
        match self {
            Self::Chat(msg) => msg.role,
            Self::License(_) => Role::Assistant,
        }
    }
}

/// Ordered message history for one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    /// Pretty JSON export of the whole session
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

//! Conversation history: append-only (utterance, reply) pairs for one session.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::llm_client::Turn;

#[derive(Debug, Clone, Serialize)]
pub struct ChatExchange {
    pub user: String,
    pub bot: String,
    pub at: DateTime<Utc>,
    /// The reply is the fallback text, not a model answer.
    pub degraded: bool,
}

/// Stored in submission order; displayed most recent first.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    exchanges: Vec<ChatExchange>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, user: impl Into<String>, bot: impl Into<String>, degraded: bool) {
        self.exchanges.push(ChatExchange {
            user: user.into(),
            bot: bot.into(),
            at: Utc::now(),
            degraded,
        });
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Submission order.
    pub fn chronological(&self) -> &[ChatExchange] {
        &self.exchanges
    }

    /// Display order.
    pub fn most_recent_first(&self) -> impl Iterator<Item = &ChatExchange> {
        self.exchanges.iter().rev()
    }

    /// Model context for the next call: the last `window` answered exchanges
    /// as alternating user/model turns, oldest first. `None` replays all of
    /// them. Fallback replies are never replayed.
    pub fn context_turns(&self, window: Option<usize>) -> Vec<Turn> {
        let answered: Vec<&ChatExchange> =
            self.exchanges.iter().filter(|e| !e.degraded).collect();
        let start = window.map_or(0, |k| answered.len().saturating_sub(k));

        answered[start..]
            .iter()
            .flat_map(|e| [Turn::user(e.user.as_str()), Turn::model(e.bot.as_str())])
            .collect()
    }
}

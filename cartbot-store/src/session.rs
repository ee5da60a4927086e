//! Chat transcript for interactive sessions.

use std::collections::VecDeque;

use cartbot_core::{ChatOutcome, ProductSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default maximum number of turns kept.
pub const DEFAULT_MAX_TURNS: usize = 100;

/// Who spoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The shopper.
    User,
    /// The shopping assistant.
    Assistant,
}

/// A single transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who spoke.
    pub role: ChatRole,
    /// What was said.
    pub text: String,
    /// Products shown alongside an assistant turn.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<ProductSummary>,
    /// When the turn was recorded.
    pub at: DateTime<Utc>,
    /// Whether this turn reports a failure rather than a reply.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

/// Bounded in-memory transcript; the oldest turns are evicted first.
#[derive(Debug, Clone)]
pub struct ChatSession {
    turns: VecDeque<ChatTurn>,
    max_turns: usize,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TURNS)
    }
}

impl ChatSession {
    /// Creates an empty session keeping at most `max_turns` turns (at least one).
    pub fn new(max_turns: usize) -> Self {
        Self {
            turns: VecDeque::new(),
            max_turns: max_turns.max(1),
        }
    }

    /// Records a message from the shopper.
    pub fn record_user(&mut self, text: impl Into<String>) {
        self.push(ChatTurn {
            role: ChatRole::User,
            text: text.into(),
            recommendations: Vec::new(),
            at: Utc::now(),
            is_error: false,
        });
    }

    /// Records a processed assistant reply.
    pub fn record_outcome(&mut self, outcome: &ChatOutcome) {
        self.push(ChatTurn {
            role: ChatRole::Assistant,
            text: outcome.display_text.clone(),
            recommendations: outcome.recommendations.clone(),
            at: Utc::now(),
            is_error: false,
        });
    }

    /// Records a failed invocation.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.push(ChatTurn {
            role: ChatRole::Assistant,
            text: message.into(),
            recommendations: Vec::new(),
            at: Utc::now(),
            is_error: true,
        });
    }

    /// Turns in chronological order.
    pub fn turns(&self) -> impl Iterator<Item = &ChatTurn> {
        self.turns.iter()
    }

    /// Number of turns kept.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Recommendations from the most recent successful assistant turn.
    pub fn last_recommendations(&self) -> &[ProductSummary] {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == ChatRole::Assistant && !t.is_error)
            .map(|t| t.recommendations.as_slice())
            .unwrap_or_default()
    }

    /// Drops every turn.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    fn push(&mut self, turn: ChatTurn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.max_turns {
            self.turns.pop_front();
        }
    }
}

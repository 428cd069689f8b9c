//! Conversation history normalization
//!
//! Browser clients send prior exchanges as loosely-shaped JSON. This module
//! reshapes them into the ordered, role-tagged turns a completion call expects.
//! Entries that are not records are skipped with a warning rather than
//! failing the request.

use crate::protocol::Turn;
use serde_json::Value;
use tracing::warn;

/// Key holding the user's side of an exchange
pub const USER_KEY: &str = "user";

/// Key holding the assistant's side of an exchange
pub const BOT_KEY: &str = "bot";

/// A prior user/assistant pair supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Exchange {
    /// What the user said
    pub user: String,
    /// What the assistant answered
    pub bot: String,
}

impl Exchange {
    /// Create an exchange from both sides
    pub fn new(user: impl Into<String>, bot: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            bot: bot.into(),
        }
    }

    /// Parse one history entry.
    ///
    /// Any JSON object is accepted; absent or `null` sides become empty text.
    /// Returns `None` for entries that are not objects.
    pub fn from_entry(entry: &Value) -> Option<Self> {
        let record = entry.as_object()?;
        Some(Self {
            user: field_text(record.get(USER_KEY)),
            bot: field_text(record.get(BOT_KEY)),
        })
    }

    /// Expand into a user turn followed by an assistant turn
    pub fn into_turns(self) -> [Turn; 2] {
        [Turn::user(self.user), Turn::assistant(self.bot)]
    }
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Build the turn sequence for one completion call.
///
/// Every well-formed history entry contributes two turns in order, and the
/// current `message` is always appended last as a single user turn.
pub fn normalize(history: &[Value], message: &str) -> Vec<Turn> {
    let mut turns = Vec::with_capacity(history.len() * 2 + 1);

    for (index, entry) in history.iter().enumerate() {
        match Exchange::from_entry(entry) {
            Some(exchange) => turns.extend(exchange.into_turns()),
            None => {
                warn!(
                    index,
                    kind = json_kind(entry),
                    "Skipping history entry with unexpected format: {}",
                    entry
                );
            }
        }
    }

    turns.push(Turn::user(message));
    turns
}

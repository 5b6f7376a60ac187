//! Ordered conversation log.

use crate::types::{Message, Role};

/// Role-tagged conversation history owned by one agent.
///
/// At most one system message exists and it is always first. The structure
/// stores it apart from the rest of the log, so the invariant holds after
/// any sequence of operations.
#[derive(Debug, Clone, Default)]
pub struct History {
    system: Option<Message>,
    turns: Vec<Message>,
}

impl History {
    /// Create a history, optionally seeded with a system message.
    pub fn new(system_prompt: Option<&str>) -> Self {
        Self {
            system: system_prompt.map(Message::system),
            turns: Vec::new(),
        }
    }

    /// Append a message. A system message replaces the current one instead
    /// of being appended, keeping the invariant without erroring.
    pub fn push(&mut self, message: Message) {
        if message.role == Role::System {
            self.system = Some(message);
        } else {
            self.turns.push(message);
        }
    }

    /// Append a tool-result turn answering `tool_call_id`.
    pub fn push_tool_result(
        &mut self,
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        content: impl Into<String>,
    ) {
        self.turns
            .push(Message::tool_result(tool_call_id, tool_name, content));
    }

    /// Discard all non-system history. `new_system` replaces the system
    /// message when given; `None` keeps the current one. Never errors.
    pub fn reset(&mut self, new_system: Option<&str>) {
        self.turns.clear();
        if let Some(prompt) = new_system {
            self.system = Some(Message::system(prompt));
        }
    }

    /// Ordered sequence for payload construction: system message first when
    /// present, then every other turn in append order.
    pub fn snapshot(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.turns.len() + 1);
        if let Some(system) = &self.system {
            messages.push(system.clone());
        }
        messages.extend(self.turns.iter().cloned());
        messages
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system.as_ref().map(|m| m.text())
    }

    /// Number of messages, system message included.
    pub fn len(&self) -> usize {
        self.turns.len() + usize::from(self.system.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! The capped room chat buffer.

use std::collections::VecDeque;

use tempo_core::events::ChatMessage;

/// A FIFO chat buffer bounded to the most recent `cap` messages.
///
/// Messages arrive in server order and are never reordered; overflow
/// evicts from the oldest end.
#[derive(Clone, Debug)]
pub struct ChatLog {
    messages: VecDeque<ChatMessage>,
    cap: usize,
}

impl ChatLog {
    /// An empty log holding at most `cap` messages.
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(cap.min(64)),
            cap,
        }
    }

    /// Append a message, evicting the oldest on overflow.
    pub fn append(&mut self, message: ChatMessage) {
        if self.cap == 0 {
            return;
        }
        if self.messages.len() == self.cap {
            let _ = self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// Replace the whole buffer with a server-provided history,
    /// keeping only the most recent `cap` entries.
    pub fn replace_all(&mut self, history: Vec<ChatMessage>) {
        let skip = history.len().saturating_sub(self.cap);
        self.messages.clear();
        self.messages.extend(history.into_iter().skip(skip));
    }

    /// Messages oldest-first.
    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    /// Number of buffered messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop all messages.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

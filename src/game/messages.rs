//! # Messages
//!
//! Outcome text produced by turn resolution, and the capped backlog the
//! renderer shows.

use crate::Color;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One line of narration with its display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub color: Color,
}

impl Message {
    pub fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

/// Fixed-size message backlog; the oldest message is dropped first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageLog {
    messages: VecDeque<Message>,
    capacity: usize,
}

impl MessageLog {
    /// Creates an empty log holding at most `capacity` messages.
    ///
    /// # Examples
    ///
    /// ```
    /// use gid::{Color, Message, MessageLog};
    ///
    /// let mut log = MessageLog::new(2);
    /// log.push(Message::new("one", Color::WHITE));
    /// log.push(Message::new("two", Color::WHITE));
    /// log.push(Message::new("three", Color::WHITE));
    /// let texts: Vec<_> = log.iter().map(|m| m.text.as_str()).collect();
    /// assert_eq!(texts, ["two", "three"]);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, message: Message) {
        if self.capacity == 0 {
            return;
        }
        while self.messages.len() >= self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        for message in messages {
            self.push(message);
        }
    }

    /// Messages from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
